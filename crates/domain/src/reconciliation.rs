use roleforge_core::NonEmptyString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::credential::PasswordRef;
use crate::role::DatabaseTarget;

/// Descriptor handed to the external role reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRequest {
    /// Database principal to manage.
    pub role_name: NonEmptyString,
    /// Where the reconciler reads the role password from.
    pub password_ref: PasswordRef,
    /// Database the role is granted connect on.
    pub database: DatabaseTarget,
}

impl ReconciliationRequest {
    /// Renders the property bag delivered with lifecycle events.
    #[must_use]
    pub fn to_properties(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            "RoleName".to_owned(),
            Value::String(self.role_name.as_str().to_owned()),
        );
        properties.insert(
            "PasswordRef".to_owned(),
            json!({
                "SecretId": self.password_ref.secret_id.to_string(),
                "JsonKey": self.password_ref.json_key,
            }),
        );

        match &self.database {
            DatabaseTarget::Reference(database) => {
                properties.insert(
                    "DatabaseRef".to_owned(),
                    json!({ "Name": database.name() }),
                );
            }
            DatabaseTarget::Name(name) => {
                properties.insert(
                    "DatabaseName".to_owned(),
                    Value::String(name.as_str().to_owned()),
                );
            }
        }

        Value::Object(properties)
    }
}

/// Lifecycle events the deployment engine delivers to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLifecycleEvent {
    /// The role is new.
    Create,
    /// The role was re-derived from a changed descriptor.
    Update {
        /// Request the role was last reconciled with.
        previous: ReconciliationRequest,
    },
    /// The role is being removed.
    Delete,
}

impl RoleLifecycleEvent {
    /// Returns a stable label for the event.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update { .. } => "update",
            Self::Delete => "delete",
        }
    }
}
