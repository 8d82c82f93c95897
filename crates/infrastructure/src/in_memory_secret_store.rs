use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use roleforge_application::{NewSecret, SecretStore, StoredSecret};
use roleforge_core::{AppError, AppResult, SecretId};

/// In-memory secret store for tests and local planning runs.
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<SecretId, StoredSecret>>,
}

impl InMemorySecretStore {
    /// Creates an empty in-memory secret store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored secrets.
    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }

    /// Returns whether the store holds no secrets.
    pub async fn is_empty(&self) -> bool {
        self.secrets.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn put_secret(&self, secret: NewSecret) -> AppResult<StoredSecret> {
        let secret_id = SecretId::new();
        let name = secret
            .name
            .map(String::from)
            .unwrap_or_else(|| format!("roleforge/{secret_id}"));

        let mut secrets = self.secrets.write().await;
        if secrets.values().any(|stored| stored.name == name) {
            return Err(AppError::Conflict(format!(
                "secret '{name}' already exists"
            )));
        }

        let stored = StoredSecret {
            secret_id,
            name,
            value: secret.value,
            encryption_key: secret.encryption_key,
            removal_policy: secret.removal_policy,
            created_at: Utc::now(),
        };
        secrets.insert(secret_id, stored.clone());

        debug!(secret_id = %secret_id, secret_name = %stored.name, "secret stored in memory");
        Ok(stored)
    }

    async fn get_secret(&self, secret_id: SecretId) -> AppResult<Option<StoredSecret>> {
        Ok(self.secrets.read().await.get(&secret_id).cloned())
    }

    async fn delete_secret(&self, secret_id: SecretId) -> AppResult<bool> {
        Ok(self.secrets.write().await.remove(&secret_id).is_some())
    }
}
