//! PostgreSQL-backed credential store using the `provisioned_secrets` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use roleforge_application::{NewSecret, SecretStore, StoredSecret};
use roleforge_core::{AppError, AppResult, SecretId};
use roleforge_domain::{EncryptionKeyRef, RemovalPolicy};


/// PostgreSQL implementation of the secret store port.
#[derive(Clone)]
pub struct PostgresSecretStore {
    pool: PgPool,
}

impl PostgresSecretStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SecretRow {
    id: Uuid,
    name: String,
    value: Value,
    encryption_key: Option<String>,
    removal_policy: String,
    created_at: DateTime<Utc>,
}

impl SecretRow {
    fn into_stored_secret(self) -> AppResult<StoredSecret> {
        let encryption_key = self
            .encryption_key
            .map(EncryptionKeyRef::new)
            .transpose()
            .map_err(|error| {
                AppError::Internal(format!(
                    "persisted encryption key for secret '{}' is invalid: {error}",
                    self.name
                ))
            })?;
        let removal_policy = RemovalPolicy::parse(self.removal_policy.as_str())?;

        Ok(StoredSecret {
            secret_id: SecretId::from_uuid(self.id),
            name: self.name,
            value: self.value,
            encryption_key,
            removal_policy,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl SecretStore for PostgresSecretStore {
    async fn put_secret(&self, secret: NewSecret) -> AppResult<StoredSecret> {
        let secret_id = SecretId::new();
        let name = secret
            .name
            .map(String::from)
            .unwrap_or_else(|| format!("roleforge/{secret_id}"));

        let result = sqlx::query_as::<_, SecretRow>(
            r#"
            INSERT INTO provisioned_secrets (id, name, value, encryption_key, removal_policy)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, value, encryption_key, removal_policy, created_at
            "#,
        )
        .bind(secret_id.as_uuid())
        .bind(name.as_str())
        .bind(&secret.value)
        .bind(secret.encryption_key.as_ref().map(EncryptionKeyRef::as_str))
        .bind(secret.removal_policy.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => row.into_stored_secret(),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "secret '{name}' already exists"
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to persist secret '{name}': {error}"
                )))
            }
        }
    }

    async fn get_secret(&self, secret_id: SecretId) -> AppResult<Option<StoredSecret>> {
        let row = sqlx::query_as::<_, SecretRow>(
            r#"
            SELECT id, name, value, encryption_key, removal_policy, created_at
            FROM provisioned_secrets
            WHERE id = $1
            "#,
        )
        .bind(secret_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load secret '{secret_id}': {error}"))
        })?;

        row.map(SecretRow::into_stored_secret).transpose()
    }

    async fn delete_secret(&self, secret_id: SecretId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM provisioned_secrets
            WHERE id = $1
            "#,
        )
        .bind(secret_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete secret '{secret_id}': {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
