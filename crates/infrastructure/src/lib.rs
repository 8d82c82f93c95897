//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database;
mod env_config;
mod in_memory_secret_store;
mod postgres_secret_store;

pub use database::connect_and_migrate;
pub use env_config::{
    RECONCILER_IDENTITY_ENV, REMOVAL_POLICY_ENV, load_orchestrator_config,
    load_orchestrator_config_from,
};
pub use in_memory_secret_store::InMemorySecretStore;
pub use postgres_secret_store::PostgresSecretStore;
