//! Product creation core: request in, classified response out.
//!
//! Routing and transport live outside this crate; callers hand over the routed
//! warehouse id and the raw body and get back a status code, headers and a JSON
//! body.

pub mod app;

pub use app::bootstrap;
pub use app::dto::{CreateProductRequest, ProductResponse};
pub use app::outcome::{Classified, CreateOutcome, RequestStage, ResultKind, classify};
pub use app::services::{ProductCreationService, build_services};
