//! Request validation.
//!
//! Checks run in a fixed order: key parameter, then body shape, then field
//! rules. Field rules never short-circuit; every violation is collected into a
//! single [`FieldErrors`] map.

use serde_json::{Map, Value};

use inventory_core::{DomainError, DomainResult, FieldErrors, ProductId, WarehouseId};

/// Name of the routed path parameter carrying the tenant identifier.
pub const WAREHOUSE_ID_PARAM: &str = "warehouseId";

const REQUIRED: &str = "Required";
const MIN_ONE_CHAR: &str = "String must contain at least 1 character(s)";
const NON_NEGATIVE: &str = "Number must be greater than or equal to 0";
const NOT_INTEGER: &str = "Expected integer, received float";
const ABOVE_U64: &str = "Number must be less than or equal to 18446744073709551615";

// 2^64; every integral f64 below it converts to u64 exactly.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// Input that passed every field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u64,
    pub product_id: Option<ProductId>,
}

/// Validate a raw create request.
///
/// A missing or empty `warehouse_id` is rejected before the body is looked at.
/// An absent body is treated as `{}`.
pub fn validate(
    warehouse_id: Option<&str>,
    body: Option<&str>,
) -> DomainResult<(WarehouseId, ValidatedInput)> {
    let warehouse_id = match warehouse_id {
        Some(id) if !id.is_empty() => WarehouseId::new(id),
        _ => return Err(DomainError::missing_key(WAREHOUSE_ID_PARAM)),
    };

    let input = parse_body(body.unwrap_or("{}"))?;
    Ok((warehouse_id, input))
}

/// Parse and check a request body. Unrecognized fields are ignored.
pub fn parse_body(raw: &str) -> DomainResult<ValidatedInput> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DomainError::malformed(e.to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(DomainError::malformed(format!(
                "expected object, received {}",
                type_name(&other)
            )));
        }
    };

    let mut errors = FieldErrors::new();
    let name = required_string(&fields, "name", &mut errors);
    let category = required_string(&fields, "category", &mut errors);
    let price = non_negative_number(&fields, "price", &mut errors);
    let quantity = non_negative_integer(&fields, "quantity", &mut errors);
    let product_id = optional_string(&fields, "productId", &mut errors);

    match (name, category, price, quantity) {
        (Some(name), Some(category), Some(price), Some(quantity)) if errors.is_empty() => {
            Ok(ValidatedInput {
                name,
                category,
                price,
                quantity,
                product_id: product_id.map(ProductId::new),
            })
        }
        _ => Err(DomainError::SchemaInvalid(errors)),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(expected: &str, actual: &Value) -> String {
    format!("Expected {expected}, received {}", type_name(actual))
}

fn non_empty_string(value: &Value, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => {
            errors.add(field, MIN_ONE_CHAR);
            None
        }
        Value::String(s) => Some(s.clone()),
        other => {
            errors.add(field, type_mismatch("string", other));
            None
        }
    }
}

fn required_string(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match fields.get(field) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => non_empty_string(value, field, errors),
    }
}

fn optional_string(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    fields
        .get(field)
        .and_then(|value| non_empty_string(value, field, errors))
}

fn required_number(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    match fields.get(field) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        // Always `Some`: out-of-range literals already fail to parse.
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            errors.add(field, type_mismatch("number", other));
            None
        }
    }
}

fn non_negative_number(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    let value = required_number(fields, field, errors)?;
    if value < 0.0 {
        errors.add(field, NON_NEGATIVE);
        return None;
    }
    Some(value)
}

fn non_negative_integer(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<u64> {
    let value = required_number(fields, field, errors)?;

    // Both rules are reported when both fail (e.g. -1.5).
    let integral = value.fract() == 0.0;
    if !integral {
        errors.add(field, NOT_INTEGER);
    }
    if value < 0.0 {
        errors.add(field, NON_NEGATIVE);
    }
    if !integral || value < 0.0 {
        return None;
    }

    if let Some(exact) = fields.get(field).and_then(Value::as_u64) {
        return Some(exact);
    }
    if value >= U64_BOUND {
        errors.add(field, ABOVE_U64);
        return None;
    }
    Some(value as u64)
}
