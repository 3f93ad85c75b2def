//! Request orchestration and process-wide service wiring.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use inventory_core::{IdGenerator, UuidV4Generator};
use inventory_infra::{
    AppConfig, ConditionalStore, ConditionalWriter, InMemoryConditionalStore,
    PostgresConditionalStore, WriteResult,
};
use inventory_products::{ProductRecord, build_keys, validate};

use crate::app::dto::{CreateProductRequest, ProductResponse};
use crate::app::outcome::{Classified, CreateOutcome, RequestStage, classify};

/// Creates products: validate, derive keys, assemble, write once, classify.
///
/// Holds only read-only shared handles (the store writer and the identifier
/// generator); every request is handled independently, so one instance can be
/// shared across any number of concurrent callers.
#[derive(Clone)]
pub struct ProductCreationService {
    writer: Arc<ConditionalWriter>,
    ids: Arc<dyn IdGenerator>,
}

impl core::fmt::Debug for ProductCreationService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductCreationService")
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

impl ProductCreationService {
    pub fn new(writer: Arc<ConditionalWriter>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { writer, ids }
    }

    /// Run one request through the pipeline and classify the result.
    #[instrument(
        skip(self, request),
        fields(warehouse_id = request.warehouse_id.as_deref().unwrap_or(""))
    )]
    pub async fn create(&self, request: &CreateProductRequest) -> Classified {
        let outcome = self.run(request).await;
        debug!(stage = %outcome.stage(), "request terminated");
        classify(outcome)
    }

    /// Same as [`create`](Self::create), rendered as a response.
    pub async fn handle(&self, request: &CreateProductRequest) -> ProductResponse {
        self.create(request).await.into_response()
    }

    async fn run(&self, request: &CreateProductRequest) -> CreateOutcome {
        let (warehouse_id, mut input) =
            match validate(request.warehouse_id.as_deref(), request.body.as_deref()) {
                Ok(validated) => validated,
                Err(e) => {
                    debug!(error = %e, "request rejected");
                    return e.into();
                }
            };

        let keys = build_keys(&warehouse_id, input.product_id.take(), self.ids.as_ref());
        let product_id = keys.product_id.clone();
        debug!(stage = %RequestStage::KeyBuilt, key = %keys.key, "keys derived");

        let record = ProductRecord::new(keys, input, Utc::now());

        match self.writer.attempt_create(&record).await {
            WriteResult::Created => {
                info!(%warehouse_id, %product_id, "product created");
                CreateOutcome::Created(record)
            }
            WriteResult::AlreadyExists => CreateOutcome::AlreadyExists {
                warehouse_id,
                product_id,
            },
            // Cause already logged by the writer; it never reaches the caller.
            WriteResult::StoreFailure(_) => CreateOutcome::StoreFailure,
        }
    }
}

/// Build the service from configuration: Postgres when `DATABASE_URL` is set,
/// in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<ProductCreationService> {
    let store: Arc<dyn ConditionalStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresConditionalStore::connect(
                url,
                config.max_connections,
                config.table_name.clone(),
            )
            .await
            .context("failed to connect to Postgres")?;
            store
                .ensure_schema()
                .await
                .with_context(|| format!("failed to prepare table {}", config.table_name))?;
            info!(table = %config.table_name, "using postgres conditional store");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory conditional store");
            Arc::new(InMemoryConditionalStore::new())
        }
    };

    let writer = ConditionalWriter::new(store).with_timeout(config.write_timeout);
    Ok(ProductCreationService::new(
        Arc::new(writer),
        Arc::new(UuidV4Generator),
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn in_memory_services_are_built_without_a_database() {
        let config = AppConfig {
            write_timeout: Duration::from_millis(250),
            ..AppConfig::default()
        };

        let service = build_services(&config).await.unwrap();
        assert_eq!(service.writer.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn generated_ids_are_uuids() {
        let service = build_services(&AppConfig::default()).await.unwrap();
        let request = CreateProductRequest::new(
            Some("WH1"),
            Some(r#"{"name":"Laptop","category":"Electronics","price":1500,"quantity":10}"#),
        );

        let classified = service.create(&request).await;
        let product = classified.product.unwrap();
        assert_eq!(product.product_id.as_str().len(), 36);
        assert_eq!(product.sort_key, format!("PRODUCT#{}", product.product_id));
    }
}
