use roleforge_core::AppError;
use roleforge_domain::RemovalPolicy;

use super::*;

/// What happened to a credential when its role was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// The credential was deleted from the store.
    Destroyed,
    /// The credential was kept under a retain policy.
    Retained,
}

impl RoleOrchestrator {
    /// Tears down the credential of a role that is being removed.
    ///
    /// Run after the reconciler has processed the delete event; the
    /// credential's recorded removal policy decides whether it is deleted.
    pub async fn deprovision(&self, credential: &CredentialHandle) -> AppResult<TeardownOutcome> {
        match credential.removal_policy {
            RemovalPolicy::Retain => {
                info!(
                    secret_id = %credential.secret_id,
                    secret_name = %credential.secret_name,
                    "role credential retained after teardown"
                );
                Ok(TeardownOutcome::Retained)
            }
            RemovalPolicy::Destroy => {
                let deleted = self.secret_store.delete_secret(credential.secret_id).await?;
                if !deleted {
                    return Err(AppError::NotFound(format!(
                        "credential '{}' does not exist",
                        credential.secret_name
                    )));
                }

                info!(
                    secret_id = %credential.secret_id,
                    secret_name = %credential.secret_name,
                    "role credential destroyed"
                );
                Ok(TeardownOutcome::Destroyed)
            }
        }
    }
}
