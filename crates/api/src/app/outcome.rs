//! Outcome classification.
//!
//! A total, IO-free mapping from every way a creation request can end to one
//! [`ResultKind`], a caller-facing message and (on success) the created record.
//! Internal causes never appear in messages.

use inventory_core::{DomainError, FieldErrors, ProductId, WarehouseId};
use inventory_products::{ProductRecord, WAREHOUSE_ID_PARAM};

use crate::app::dto::ProductResponse;
use crate::app::errors;

pub const CREATED_MESSAGE: &str = "Product created successfully.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Stage a request had reached when it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Validated,
    KeyBuilt,
    Written,
}

impl core::fmt::Display for RequestStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RequestStage::Received => "received",
            RequestStage::Validated => "validated",
            RequestStage::KeyBuilt => "key_built",
            RequestStage::Written => "written",
        };
        f.write_str(s)
    }
}

/// Every terminal state of one creation request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    MissingKeyParameter,
    MalformedBody,
    SchemaInvalid(FieldErrors),
    Created(ProductRecord),
    AlreadyExists {
        warehouse_id: WarehouseId,
        product_id: ProductId,
    },
    StoreFailure,
}

impl CreateOutcome {
    pub fn stage(&self) -> RequestStage {
        match self {
            CreateOutcome::MissingKeyParameter => RequestStage::Received,
            CreateOutcome::MalformedBody | CreateOutcome::SchemaInvalid(_) => {
                RequestStage::Validated
            }
            CreateOutcome::Created(_)
            | CreateOutcome::AlreadyExists { .. }
            | CreateOutcome::StoreFailure => RequestStage::Written,
        }
    }
}

impl From<DomainError> for CreateOutcome {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::MissingKeyParameter(_) => CreateOutcome::MissingKeyParameter,
            DomainError::MalformedBody(_) => CreateOutcome::MalformedBody,
            DomainError::SchemaInvalid(errors) => CreateOutcome::SchemaInvalid(errors),
        }
    }
}

/// Caller-visible result kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Created,
    MissingKeyParameter,
    MalformedBody,
    SchemaInvalid,
    Conflict,
    StoreFailure,
}

impl ResultKind {
    pub fn status_code(self) -> u16 {
        match self {
            ResultKind::Created => 201,
            ResultKind::MissingKeyParameter
            | ResultKind::MalformedBody
            | ResultKind::SchemaInvalid => 400,
            ResultKind::Conflict => 409,
            ResultKind::StoreFailure => 500,
        }
    }
}

/// A classified outcome, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub kind: ResultKind,
    pub message: String,
    pub product: Option<ProductRecord>,
    pub errors: Option<FieldErrors>,
}

impl Classified {
    fn message_only(kind: ResultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            product: None,
            errors: None,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn into_response(self) -> ProductResponse {
        match (&self.product, &self.errors) {
            (Some(product), _) => errors::created_response(&self.message, product),
            (None, Some(field_errors)) => errors::validation_response(&self.message, field_errors),
            (None, None) => errors::message_response(self.kind, &self.message),
        }
    }
}

pub fn classify(outcome: CreateOutcome) -> Classified {
    match outcome {
        CreateOutcome::MissingKeyParameter => Classified::message_only(
            ResultKind::MissingKeyParameter,
            format!("Missing {WAREHOUSE_ID_PARAM} in path."),
        ),
        CreateOutcome::MalformedBody => {
            Classified::message_only(ResultKind::MalformedBody, INVALID_JSON_MESSAGE)
        }
        CreateOutcome::SchemaInvalid(errors) => Classified {
            kind: ResultKind::SchemaInvalid,
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            product: None,
            errors: Some(errors),
        },
        CreateOutcome::Created(record) => Classified {
            kind: ResultKind::Created,
            message: CREATED_MESSAGE.to_string(),
            product: Some(record),
            errors: None,
        },
        CreateOutcome::AlreadyExists {
            warehouse_id,
            product_id,
        } => Classified::message_only(
            ResultKind::Conflict,
            format!("Product {product_id} already exists in warehouse {warehouse_id}."),
        ),
        CreateOutcome::StoreFailure => {
            Classified::message_only(ResultKind::StoreFailure, INTERNAL_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use inventory_core::FixedIdGenerator;
    use inventory_products::{ValidatedInput, build_keys};

    use super::*;

    fn record() -> ProductRecord {
        let keys = build_keys(
            &WarehouseId::new("WH1"),
            Some(ProductId::new("P1")),
            &FixedIdGenerator::new("unused"),
        );
        let input = ValidatedInput {
            name: "Laptop".to_string(),
            category: "Electronics".to_string(),
            price: 1500.0,
            quantity: 10,
            product_id: None,
        };
        ProductRecord::new(keys, input, Utc::now())
    }

    #[test]
    fn every_outcome_maps_to_its_status_code() {
        let mut field_errors = FieldErrors::new();
        field_errors.add("price", "Number must be greater than or equal to 0");

        let cases = vec![
            (CreateOutcome::MissingKeyParameter, ResultKind::MissingKeyParameter, 400),
            (CreateOutcome::MalformedBody, ResultKind::MalformedBody, 400),
            (CreateOutcome::SchemaInvalid(field_errors), ResultKind::SchemaInvalid, 400),
            (CreateOutcome::Created(record()), ResultKind::Created, 201),
            (
                CreateOutcome::AlreadyExists {
                    warehouse_id: WarehouseId::new("WH1"),
                    product_id: ProductId::new("P1"),
                },
                ResultKind::Conflict,
                409,
            ),
            (CreateOutcome::StoreFailure, ResultKind::StoreFailure, 500),
        ];

        for (outcome, kind, status) in cases {
            let classified = classify(outcome);
            assert_eq!(classified.kind, kind);
            assert_eq!(classified.status_code(), status);
        }
    }

    #[test]
    fn messages_match_the_external_contract() {
        assert_eq!(
            classify(CreateOutcome::MissingKeyParameter).message,
            "Missing warehouseId in path."
        );
        assert_eq!(classify(CreateOutcome::MalformedBody).message, "Invalid JSON body.");
        assert_eq!(
            classify(CreateOutcome::AlreadyExists {
                warehouse_id: WarehouseId::new("WH1"),
                product_id: ProductId::new("P100"),
            })
            .message,
            "Product P100 already exists in warehouse WH1."
        );
        assert_eq!(
            classify(CreateOutcome::StoreFailure).message,
            "Internal server error."
        );
    }

    #[test]
    fn created_response_carries_the_record() {
        let r = record();
        let response = classify(CreateOutcome::Created(r.clone())).into_response();

        assert_eq!(response.status_code, 201);
        let body = response.body_json().unwrap();
        assert_eq!(body["message"], "Product created successfully.");
        assert_eq!(body["product"], r.to_item().unwrap());
    }

    #[test]
    fn validation_response_carries_field_errors() {
        let mut field_errors = FieldErrors::new();
        field_errors.add("name", "Required");

        let response = classify(CreateOutcome::SchemaInvalid(field_errors)).into_response();
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": "Validation failed.", "errors": { "name": ["Required"] } })
        );
    }

    #[test]
    fn responses_carry_json_and_cors_headers() {
        let response = classify(CreateOutcome::StoreFailure).into_response();

        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": "Internal server error." })
        );
    }

    #[test]
    fn domain_errors_convert_to_outcomes() {
        assert_eq!(
            CreateOutcome::from(DomainError::missing_key("warehouseId")),
            CreateOutcome::MissingKeyParameter
        );
        assert_eq!(
            CreateOutcome::from(DomainError::malformed("eof")),
            CreateOutcome::MalformedBody
        );
    }

    #[test]
    fn stages_reflect_where_requests_stop() {
        assert_eq!(CreateOutcome::MissingKeyParameter.stage(), RequestStage::Received);
        assert_eq!(CreateOutcome::MalformedBody.stage(), RequestStage::Validated);
        assert_eq!(CreateOutcome::StoreFailure.stage(), RequestStage::Written);
    }
}
