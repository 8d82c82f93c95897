//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod credential;
mod graph;
mod reconciliation;
mod role;
mod topology;

pub use credential::{
    CredentialHandle, CredentialTemplate, EXCLUDED_PASSWORD_CHARACTERS, GeneratedPassword,
    POSTGRES_ENGINE, POSTGRES_PASSWORD_LENGTH, PASSWORD_JSON_KEY, PasswordPolicy, PasswordRef,
    RemovalPolicy,
};
pub use graph::{
    DependencyEdge, GrantAction, GrantResource, PermissionEdge, ProvisioningGraph, ResourceNode,
};
pub use reconciliation::{ReconciliationRequest, RoleLifecycleEvent};
pub use role::{DatabaseRef, DatabaseTarget, EncryptionKeyRef, RoleSpec};
pub use topology::{DatabaseTopology, Endpoint, TopologyDescriptor};
