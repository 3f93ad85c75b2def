//! The persisted product record and its assembly at creation time.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use inventory_core::{CompositeKey, ProductId};

use crate::keys::ProductKeys;
use crate::validation::ValidatedInput;

/// Version stamped on every freshly created record.
pub const INITIAL_VERSION: u32 = 1;

/// Product status lifecycle. Creation always yields `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
}

/// A product as written to the store and returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "PK")]
    pub partition_key: String,
    #[serde(rename = "SK")]
    pub sort_key: String,
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(serialize_with = "price::serialize")]
    pub price: f64,
    pub quantity: u64,
    pub status: ProductStatus,
    pub version: u32,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Assemble a new record: status `ACTIVE`, version 1, `created_at == updated_at`.
    ///
    /// `now` is truncated to millisecond precision so the record survives a
    /// serialization round trip unchanged.
    pub fn new(keys: ProductKeys, input: ValidatedInput, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            partition_key: keys.key.partition_key,
            sort_key: keys.key.sort_key,
            product_id: keys.product_id,
            name: input.name,
            category: input.category,
            price: input.price,
            quantity: input.quantity,
            status: ProductStatus::Active,
            version: INITIAL_VERSION,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(self.partition_key.clone(), self.sort_key.clone())
    }

    /// Store item representation (a JSON object keyed by attribute name).
    pub fn to_item(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

mod price {
    use serde::Serializer;

    // 2^53: the largest range where every integer is exactly representable.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    /// Integral prices are written as JSON integers (`1500`, not `1500.0`).
    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            s.serialize_i64(*value as i64)
        } else {
            s.serialize_f64(*value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use inventory_core::{FixedIdGenerator, WarehouseId};

    use crate::keys::build_keys;

    fn input(product_id: Option<&str>) -> ValidatedInput {
        ValidatedInput {
            name: "Laptop".to_string(),
            category: "Electronics".to_string(),
            price: 1500.0,
            quantity: 10,
            product_id: product_id.map(ProductId::new),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789)
    }

    fn record(product_id: Option<&str>) -> ProductRecord {
        let ids = FixedIdGenerator::new("generated-1");
        let input = input(product_id);
        let keys = build_keys(&WarehouseId::new("WH1"), input.product_id.clone(), &ids);
        ProductRecord::new(keys, input, fixed_time())
    }

    #[test]
    fn new_record_has_creation_defaults() {
        let r = record(None);

        assert_eq!(r.partition_key, "WAREHOUSE#WH1");
        assert_eq!(r.sort_key, "PRODUCT#generated-1");
        assert_eq!(r.product_id.as_str(), "generated-1");
        assert_eq!(r.status, ProductStatus::Active);
        assert_eq!(r.version, INITIAL_VERSION);
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn timestamps_are_truncated_to_millis() {
        let r = record(Some("P1"));
        assert_eq!(r.created_at.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn item_uses_store_attribute_names() {
        let item = record(Some("P999")).to_item().unwrap();

        assert_eq!(
            item,
            serde_json::json!({
                "PK": "WAREHOUSE#WH1",
                "SK": "PRODUCT#P999",
                "productId": "P999",
                "name": "Laptop",
                "category": "Electronics",
                "price": 1500,
                "quantity": 10,
                "status": "ACTIVE",
                "version": 1,
                "createdAt": "2026-10-19T08:30:00.123Z",
                "updatedAt": "2026-10-19T08:30:00.123Z",
            })
        );
    }

    #[test]
    fn fractional_price_is_written_as_float() {
        let mut r = record(Some("P1"));
        r.price = 19.99;

        let item = r.to_item().unwrap();
        assert_eq!(item["price"], serde_json::json!(19.99));
    }

    #[test]
    fn item_deserializes_back_into_the_record() {
        let r = record(Some("P1"));
        let back: ProductRecord = serde_json::from_value(r.to_item().unwrap()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn key_matches_record_fields() {
        let r = record(Some("P1"));
        assert_eq!(r.key(), CompositeKey::new("WAREHOUSE#WH1", "PRODUCT#P1"));
    }
}
