use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use roleforge_core::{AppResult, NonEmptyString, SecretId};
use roleforge_domain::{EncryptionKeyRef, RemovalPolicy};

/// Secret to persist.
#[derive(Clone)]
pub struct NewSecret {
    /// Requested secret name; the store assigns one when absent.
    pub name: Option<NonEmptyString>,
    /// JSON value holding the template fields and the password.
    pub value: Value,
    /// Key protecting the value at rest.
    pub encryption_key: Option<EncryptionKeyRef>,
    /// Teardown behavior recorded with the secret.
    pub removal_policy: RemovalPolicy,
}

/// Secret as persisted by a store.
#[derive(Clone)]
pub struct StoredSecret {
    /// Store-assigned identifier.
    pub secret_id: SecretId,
    /// Effective secret name.
    pub name: String,
    /// JSON value holding the template fields and the password.
    pub value: Value,
    /// Key protecting the value at rest.
    pub encryption_key: Option<EncryptionKeyRef>,
    /// Teardown behavior recorded with the secret.
    pub removal_policy: RemovalPolicy,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredSecret {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StoredSecret")
            .field("secret_id", &self.secret_id)
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("encryption_key", &self.encryption_key)
            .field("removal_policy", &self.removal_policy)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Storage port for generated credentials.
///
/// `put_secret` returns only after the value is durable. Secret names are
/// unique per store; a duplicate name yields `AppError::Conflict`.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Persists a new secret.
    async fn put_secret(&self, secret: NewSecret) -> AppResult<StoredSecret>;

    /// Loads a secret by identifier.
    async fn get_secret(&self, secret_id: SecretId) -> AppResult<Option<StoredSecret>>;

    /// Deletes a secret. Returns `false` when it did not exist.
    async fn delete_secret(&self, secret_id: SecretId) -> AppResult<bool>;
}
