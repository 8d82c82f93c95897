use roleforge_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::topology::TopologyDescriptor;

/// Handle to a database managed by the same deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseRef {
    name: NonEmptyString,
}

impl DatabaseRef {
    /// Creates a handle for the managed database with the given name.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the resolved database name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Opaque reference to the encryption key protecting a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptionKeyRef(NonEmptyString);

impl EncryptionKeyRef {
    /// Creates a key reference from its identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the key identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// The database a role is granted access to, named in exactly one way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseTarget {
    /// Database managed by the same deployment.
    Reference(DatabaseRef),
    /// Database known only by name.
    Name(NonEmptyString),
}

impl DatabaseTarget {
    /// Returns the database name written into the credential template.
    #[must_use]
    pub fn database_name(&self) -> &str {
        match self {
            Self::Reference(database) => database.name(),
            Self::Name(name) => name.as_str(),
        }
    }
}

/// Input descriptor for one provisioned database role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    /// Intended database principal name.
    pub role_name: String,
    /// Managed database the role connects to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_ref: Option<DatabaseRef>,
    /// Plain database name the role connects to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Topology hosting the database.
    pub topology: TopologyDescriptor,
    /// Key used to encrypt the generated credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<EncryptionKeyRef>,
    /// Explicit name for the generated credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

impl RoleSpec {
    /// Returns the validated role name.
    pub fn validated_role_name(&self) -> AppResult<NonEmptyString> {
        NonEmptyString::new(self.role_name.as_str())
            .map_err(|_| AppError::Validation("role name must not be empty".to_owned()))
    }

    /// Returns the validated secret name, if one was requested.
    pub fn validated_secret_name(&self) -> AppResult<Option<NonEmptyString>> {
        self.secret_name
            .as_deref()
            .map(|name| {
                NonEmptyString::new(name).map_err(|_| {
                    AppError::Validation("secret name must not be empty when set".to_owned())
                })
            })
            .transpose()
    }

    /// Resolves the target database, enforcing that exactly one of
    /// `database_ref` and `database_name` is set.
    pub fn database_target(&self) -> AppResult<DatabaseTarget> {
        match (&self.database_ref, &self.database_name) {
            (Some(_), Some(_)) => Err(AppError::Configuration(
                "specify either databaseRef or databaseName, not both".to_owned(),
            )),
            (None, None) => Err(AppError::Configuration(
                "one of databaseRef or databaseName is required".to_owned(),
            )),
            (Some(database), None) => Ok(DatabaseTarget::Reference(database.clone())),
            (None, Some(name)) => NonEmptyString::new(name.as_str())
                .map(DatabaseTarget::Name)
                .map_err(|_| AppError::Validation("database name must not be empty".to_owned())),
        }
    }
}
