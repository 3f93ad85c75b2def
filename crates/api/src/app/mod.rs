//! Product creation application wiring.
//!
//! - `services.rs`: the orchestrating service and its process-wide wiring
//! - `outcome.rs`: classification of terminal states into result kinds
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent JSON response bodies

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use inventory_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod outcome;
pub mod services;

/// Process entrypoint: initialize logging, load configuration from the
/// environment and build the shared service once.
///
/// Call this once at startup and hand the returned `Arc` to every invocation.
pub async fn bootstrap() -> anyhow::Result<Arc<services::ProductCreationService>> {
    inventory_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(?config, "configuration loaded");

    let service = services::build_services(&config).await?;
    Ok(Arc::new(service))
}
