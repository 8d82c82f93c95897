//! Credential policy and the artifacts describing a generated credential.

use roleforge_core::{AppError, AppResult, SecretId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::role::EncryptionKeyRef;
use crate::topology::Endpoint;

/// Engine tag written into every credential template.
pub const POSTGRES_ENGINE: &str = "postgres";

/// Password length accepted by the database engine.
pub const POSTGRES_PASSWORD_LENGTH: usize = 30;

/// Characters never emitted in generated passwords.
pub const EXCLUDED_PASSWORD_CHARACTERS: &str = " %+~`#$&*()|[]{}:;<>?!'/@\"\\";

/// JSON key under which the password is stored next to the template.
pub const PASSWORD_JSON_KEY: &str = "password";

/// Rules applied to generated role passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    length: usize,
    excluded_characters: &'static str,
}

impl PasswordPolicy {
    /// Policy used for Postgres role credentials.
    #[must_use]
    pub const fn postgres() -> Self {
        Self {
            length: POSTGRES_PASSWORD_LENGTH,
            excluded_characters: EXCLUDED_PASSWORD_CHARACTERS,
        }
    }

    /// Returns the exact password length.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns whether a character may appear in a password.
    #[must_use]
    pub fn allows(&self, character: char) -> bool {
        character.is_ascii_graphic() && !self.excluded_characters.contains(character)
    }

    /// Returns every character a password may be drawn from, in ASCII order.
    #[must_use]
    pub fn alphabet(&self) -> Vec<u8> {
        (0x21_u8..=0x7e)
            .filter(|byte| self.allows(char::from(*byte)))
            .collect()
    }

    /// Accepts a candidate password when it satisfies the policy.
    pub fn accept(&self, candidate: String) -> AppResult<GeneratedPassword> {
        let length = candidate.chars().count();
        if length != self.length {
            return Err(AppError::Validation(format!(
                "password must be exactly {} characters, got {length}",
                self.length
            )));
        }

        if let Some(character) = candidate.chars().find(|character| !self.allows(*character)) {
            return Err(AppError::Validation(format!(
                "password contains disallowed character {character:?}"
            )));
        }

        Ok(GeneratedPassword(candidate))
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::postgres()
    }
}

/// Password value that satisfied a [`PasswordPolicy`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedPassword(String);

impl GeneratedPassword {
    /// Returns the raw password value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for GeneratedPassword {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("GeneratedPassword(<redacted>)")
    }
}

/// Connection metadata persisted alongside a generated password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTemplate {
    /// Cluster or instance identifier.
    #[serde(rename = "dbClusterIdentifier")]
    pub identifier: String,
    /// Database engine tag.
    pub engine: String,
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Role name used to log in.
    pub username: String,
    /// Database the role connects to.
    pub dbname: String,
}

impl CredentialTemplate {
    /// Builds the Postgres template for a role on a resolved endpoint.
    #[must_use]
    pub fn postgres(endpoint: &Endpoint, role_name: &str, database_name: &str) -> Self {
        Self {
            identifier: endpoint.identifier.clone(),
            engine: POSTGRES_ENGINE.to_owned(),
            host: endpoint.host.clone(),
            port: endpoint.port,
            username: role_name.to_owned(),
            dbname: database_name.to_owned(),
        }
    }

    /// Renders the stored secret value: the template plus the password.
    pub fn with_password(&self, password: &GeneratedPassword) -> AppResult<Value> {
        let mut value = serde_json::to_value(self).map_err(|error| {
            AppError::Internal(format!("failed to serialize credential template: {error}"))
        })?;

        let Some(object) = value.as_object_mut() else {
            return Err(AppError::Internal(
                "credential template must serialize to a JSON object".to_owned(),
            ));
        };
        object.insert(
            PASSWORD_JSON_KEY.to_owned(),
            Value::String(password.expose().to_owned()),
        );

        Ok(value)
    }
}

/// What happens to a credential when its role is torn down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Delete the credential together with the role.
    #[default]
    Destroy,
    /// Keep the credential after the role is gone.
    Retain,
}

impl RemovalPolicy {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Retain => "retain",
        }
    }

    /// Parses a storage string into a removal policy.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "destroy" => Ok(Self::Destroy),
            "retain" => Ok(Self::Retain),
            _ => Err(AppError::Validation(format!(
                "unknown removal policy '{value}'"
            ))),
        }
    }
}

/// Reference to the password field of a stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRef {
    /// Secret holding the password.
    pub secret_id: SecretId,
    /// Field of the secret's JSON value holding the password.
    pub json_key: String,
}

/// Opaque handle to a persisted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialHandle {
    /// Store identifier of the secret.
    pub secret_id: SecretId,
    /// Effective secret name.
    pub secret_name: String,
    /// Key the secret is encrypted with, if any.
    pub encryption_key: Option<EncryptionKeyRef>,
    /// Teardown behavior of the secret.
    pub removal_policy: RemovalPolicy,
}

impl CredentialHandle {
    /// Returns a reference to the password without exposing it.
    #[must_use]
    pub fn password_ref(&self) -> PasswordRef {
        PasswordRef {
            secret_id: self.secret_id,
            json_key: PASSWORD_JSON_KEY.to_owned(),
        }
    }
}
