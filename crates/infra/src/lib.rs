//! Infrastructure layer: store adapters, the conditional writer and configuration.

pub mod config;
pub mod store;
pub mod writer;

pub use config::{AppConfig, ConfigError, TableName};
pub use store::{
    ConditionalStore, InMemoryConditionalStore, InsertOutcome, PostgresConditionalStore,
    StoreError,
};
pub use writer::{ConditionalWriter, WriteResult};
