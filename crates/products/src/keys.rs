//! Composite-key derivation for product records.
//!
//! Keys are plain concatenations of a fixed prefix and the identifier. No
//! escaping is applied: a `#` inside an identifier ends up verbatim in the key.

use inventory_core::{CompositeKey, IdGenerator, ProductId, WarehouseId};

pub const PARTITION_KEY_PREFIX: &str = "WAREHOUSE#";
pub const SORT_KEY_PREFIX: &str = "PRODUCT#";

/// Keys for one product plus the identifier they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKeys {
    pub key: CompositeKey,
    pub product_id: ProductId,
}

pub fn partition_key(warehouse_id: &WarehouseId) -> String {
    format!("{PARTITION_KEY_PREFIX}{warehouse_id}")
}

pub fn sort_key(product_id: &ProductId) -> String {
    format!("{SORT_KEY_PREFIX}{product_id}")
}

/// Derive the store keys for a product.
///
/// A caller-supplied `product_id` is used verbatim; otherwise one is drawn from `ids`.
pub fn build_keys(
    warehouse_id: &WarehouseId,
    product_id: Option<ProductId>,
    ids: &dyn IdGenerator,
) -> ProductKeys {
    let product_id = product_id.unwrap_or_else(|| ids.next_id());
    ProductKeys {
        key: CompositeKey::new(partition_key(warehouse_id), sort_key(&product_id)),
        product_id,
    }
}
