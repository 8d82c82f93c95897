//! Application services and ports.

#![forbid(unsafe_code)]

mod config;
mod credential_provisioner;
mod dependency_binder;
mod reconciler_ports;
mod role_orchestrator;
mod secret_ports;
mod topology_resolver;

pub use config::OrchestratorConfig;
pub use credential_provisioner::{CredentialProvisioner, ProvisionCredentialInput};
pub use dependency_binder::DependencyBinder;
pub use reconciler_ports::RoleReconciler;
pub use role_orchestrator::{ProvisionedRole, ProvisioningStage, RoleOrchestrator, TeardownOutcome};
pub use secret_ports::{NewSecret, SecretStore, StoredSecret};
pub use topology_resolver::{resolve_endpoint, resolve_topology};
