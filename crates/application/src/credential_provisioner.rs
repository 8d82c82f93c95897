//! Credential generation and persistence for provisioned roles.

use std::sync::Arc;

use tracing::debug;

use roleforge_core::{AppResult, NonEmptyString};
use roleforge_domain::{
    CredentialHandle, CredentialTemplate, DatabaseTarget, EncryptionKeyRef, Endpoint,
    PasswordPolicy, RemovalPolicy,
};

use crate::{NewSecret, SecretStore};

mod password;

/// Input for generating one role credential.
#[derive(Debug, Clone)]
pub struct ProvisionCredentialInput {
    /// Resolved connection coordinates.
    pub endpoint: Endpoint,
    /// Role the credential logs in as.
    pub role_name: NonEmptyString,
    /// Database the role connects to.
    pub database: DatabaseTarget,
    /// Key protecting the stored credential.
    pub encryption_key: Option<EncryptionKeyRef>,
    /// Explicit secret name.
    pub secret_name: Option<NonEmptyString>,
    /// Teardown behavior of the stored credential.
    pub removal_policy: RemovalPolicy,
}

/// Generates role passwords and persists them with their connection template.
#[derive(Clone)]
pub struct CredentialProvisioner {
    secret_store: Arc<dyn SecretStore>,
    password_policy: PasswordPolicy,
}

impl CredentialProvisioner {
    /// Creates a provisioner writing to the given store.
    #[must_use]
    pub fn new(secret_store: Arc<dyn SecretStore>, password_policy: PasswordPolicy) -> Self {
        Self {
            secret_store,
            password_policy,
        }
    }

    /// Generates and persists a credential, returning a handle to it.
    ///
    /// The secret is durable when this returns. The password itself is not
    /// part of the returned handle.
    pub async fn provision(&self, input: ProvisionCredentialInput) -> AppResult<CredentialHandle> {
        let template = CredentialTemplate::postgres(
            &input.endpoint,
            input.role_name.as_str(),
            input.database.database_name(),
        );
        let password = password::generate_password(&self.password_policy)?;
        let value = template.with_password(&password)?;

        let stored = self
            .secret_store
            .put_secret(NewSecret {
                name: input.secret_name,
                value,
                encryption_key: input.encryption_key,
                removal_policy: input.removal_policy,
            })
            .await?;

        debug!(
            role_name = %input.role_name,
            secret_id = %stored.secret_id,
            secret_name = %stored.name,
            encrypted = stored.encryption_key.is_some(),
            "role credential persisted"
        );

        Ok(CredentialHandle {
            secret_id: stored.secret_id,
            secret_name: stored.name,
            encryption_key: stored.encryption_key,
            removal_policy: stored.removal_policy,
        })
    }
}
