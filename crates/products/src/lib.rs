//! Products domain module.
//!
//! Turns an untrusted create request into a persisted-ready [`ProductRecord`]:
//! validation, composite-key derivation and record assembly. Pure logic only
//! (no IO, no storage).

pub mod keys;
pub mod record;
pub mod validation;

pub use keys::{PARTITION_KEY_PREFIX, ProductKeys, SORT_KEY_PREFIX, build_keys};
pub use record::{INITIAL_VERSION, ProductRecord, ProductStatus};
pub use validation::{ValidatedInput, WAREHOUSE_ID_PARAM, parse_body, validate};
