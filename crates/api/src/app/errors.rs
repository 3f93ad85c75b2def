//! Consistent JSON response bodies.

use serde::Serialize;
use tracing::error;

use inventory_core::FieldErrors;
use inventory_products::ProductRecord;

use crate::app::dto::ProductResponse;
use crate::app::outcome::{INTERNAL_ERROR_MESSAGE, ResultKind};

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct CreatedBody<'a> {
    message: &'a str,
    product: &'a ProductRecord,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    message: &'a str,
    errors: &'a FieldErrors,
}

pub fn message_response(kind: ResultKind, message: &str) -> ProductResponse {
    json_response(kind.status_code(), &MessageBody { message })
}

pub fn created_response(message: &str, product: &ProductRecord) -> ProductResponse {
    json_response(
        ResultKind::Created.status_code(),
        &CreatedBody { message, product },
    )
}

pub fn validation_response(message: &str, errors: &FieldErrors) -> ProductResponse {
    json_response(
        ResultKind::SchemaInvalid.status_code(),
        &ValidationBody { message, errors },
    )
}

fn json_response<B: Serialize>(status_code: u16, body: &B) -> ProductResponse {
    match serde_json::to_string(body) {
        Ok(text) => ProductResponse::json(status_code, text),
        Err(e) => {
            error!(error = %e, status_code, "failed to serialize response body");
            internal_error()
        }
    }
}

fn internal_error() -> ProductResponse {
    ProductResponse::json(
        ResultKind::StoreFailure.status_code(),
        format!(r#"{{"message":"{INTERNAL_ERROR_MESSAGE}"}}"#),
    )
}
