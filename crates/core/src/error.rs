//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field-level validation failures, keyed by request field name.
///
/// Every violated rule for a field is kept, in the order the rules were
/// evaluated. Serializes as a plain JSON object of `field -> [messages]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violated rule for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded, otherwise `DomainError::SchemaInvalid`.
    pub fn into_result(self) -> DomainResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::SchemaInvalid(self))
        }
    }
}

/// Domain-level error.
///
/// Covers the deterministic ways an untrusted request can be rejected before
/// anything touches the store. Store failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The routing layer did not supply a required key parameter.
    #[error("missing key parameter: {0}")]
    MissingKeyParameter(&'static str),

    /// The body could not be parsed into a JSON object.
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// One or more field rules were violated.
    #[error("schema validation failed for {} field(s)", .0.len())]
    SchemaInvalid(FieldErrors),
}

impl DomainError {
    pub fn missing_key(parameter: &'static str) -> Self {
        Self::MissingKeyParameter(parameter)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }
}
