//! Top-level role provisioning use-case.
//!
//! A provisioning pass validates the role descriptor, resolves the topology,
//! persists a generated credential and wires the edges the reconciler needs.
//! Validation and resolution failures stop the pass before the secret store
//! is touched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use roleforge_core::{AppResult, NonEmptyString};
use roleforge_domain::{
    CredentialHandle, DatabaseTarget, DatabaseTopology, EncryptionKeyRef, ProvisioningGraph,
    ReconciliationRequest, RoleSpec,
};

use crate::topology_resolver::resolve_topology;
use crate::{
    CredentialProvisioner, DependencyBinder, OrchestratorConfig, ProvisionCredentialInput,
    SecretStore,
};

mod teardown;

#[cfg(test)]
mod tests;

pub use teardown::TeardownOutcome;

/// Stages of one provisioning pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStage {
    /// Checking the role descriptor.
    Validating,
    /// Resolving connection coordinates.
    Resolving,
    /// Generating and persisting the credential.
    Provisioning,
    /// Emitting dependency and permission edges.
    Binding,
    /// Handed over to the reconciler.
    Delegated,
}

impl ProvisioningStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Provisioning => "provisioning",
            Self::Binding => "binding",
            Self::Delegated => "delegated",
        }
    }
}

/// Result of a completed provisioning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedRole {
    /// Role name echoed from the descriptor.
    pub role_name: NonEmptyString,
    /// Handle to the persisted credential.
    pub credential: CredentialHandle,
    /// Topology the role lives on.
    pub topology: DatabaseTopology,
    /// Descriptor for the external reconciler.
    pub request: ReconciliationRequest,
    /// Ordering and permission edges.
    pub graph: ProvisioningGraph,
}

struct ValidatedSpec {
    role_name: NonEmptyString,
    database: DatabaseTarget,
    encryption_key: Option<EncryptionKeyRef>,
    secret_name: Option<NonEmptyString>,
}

/// Entry point for provisioning database roles.
#[derive(Clone)]
pub struct RoleOrchestrator {
    config: OrchestratorConfig,
    secret_store: Arc<dyn SecretStore>,
    credential_provisioner: CredentialProvisioner,
    dependency_binder: DependencyBinder,
}

impl RoleOrchestrator {
    /// Creates an orchestrator from configuration and a secret store.
    #[must_use]
    pub fn new(config: OrchestratorConfig, secret_store: Arc<dyn SecretStore>) -> Self {
        let credential_provisioner =
            CredentialProvisioner::new(secret_store.clone(), config.password_policy);
        let dependency_binder = DependencyBinder::new(config.reconciler_identity.clone());

        Self {
            config,
            secret_store,
            credential_provisioner,
            dependency_binder,
        }
    }

    /// Runs one provisioning pass for a role descriptor.
    pub async fn provision(&self, spec: &RoleSpec) -> AppResult<ProvisionedRole> {
        enter_stage(spec, ProvisioningStage::Validating);
        let validated = validate(spec).inspect_err(|error| {
            warn!(role_name = %spec.role_name, error = %error, "role descriptor rejected");
        })?;

        enter_stage(spec, ProvisioningStage::Resolving);
        let topology = resolve_topology(&spec.topology).inspect_err(|error| {
            warn!(role_name = %spec.role_name, error = %error, "topology resolution failed");
        })?;

        enter_stage(spec, ProvisioningStage::Provisioning);
        let credential = self
            .credential_provisioner
            .provision(ProvisionCredentialInput {
                endpoint: topology.endpoint().clone(),
                role_name: validated.role_name.clone(),
                database: validated.database.clone(),
                encryption_key: validated.encryption_key,
                secret_name: validated.secret_name,
                removal_policy: self.config.removal_policy,
            })
            .await?;

        enter_stage(spec, ProvisioningStage::Binding);
        let graph = self
            .dependency_binder
            .bind(&credential, &validated.role_name);
        let request = ReconciliationRequest {
            role_name: validated.role_name.clone(),
            password_ref: credential.password_ref(),
            database: validated.database,
        };

        enter_stage(spec, ProvisioningStage::Delegated);
        info!(
            role_name = %validated.role_name,
            topology = topology.kind(),
            secret_id = %credential.secret_id,
            grants = graph.grants.len(),
            "role provisioning delegated to reconciler"
        );

        Ok(ProvisionedRole {
            role_name: validated.role_name,
            credential,
            topology,
            request,
            graph,
        })
    }
}

fn enter_stage(spec: &RoleSpec, stage: ProvisioningStage) {
    debug!(role_name = %spec.role_name, stage = stage.as_str(), "entering provisioning stage");
}

fn validate(spec: &RoleSpec) -> AppResult<ValidatedSpec> {
    let database = spec.database_target()?;
    let role_name = spec.validated_role_name()?;
    let secret_name = spec.validated_secret_name()?;

    Ok(ValidatedSpec {
        role_name,
        database,
        encryption_key: spec.encryption_key.clone(),
        secret_name,
    })
}
