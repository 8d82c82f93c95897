use roleforge_core::{NonEmptyString, SecretId};
use serde::{Deserialize, Serialize};

use crate::role::EncryptionKeyRef;

/// Artifact participating in the provisioning graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceNode {
    /// Persisted credential.
    Credential(SecretId),
    /// Reconciliation request for the named role.
    ReconciliationRequest(String),
}

/// Ordering constraint: `prerequisite` must be durable before `dependent`
/// is acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Artifact that waits.
    pub dependent: ResourceNode,
    /// Artifact that must exist first.
    pub prerequisite: ResourceNode,
}

/// Resource a permission is granted on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantResource {
    /// Stored credential.
    Secret(SecretId),
    /// Key protecting a stored credential.
    EncryptionKey(EncryptionKeyRef),
}

/// Actions the reconciler identity may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantAction {
    /// Read the secret value.
    ReadSecretValue,
    /// Decrypt with the key.
    Decrypt,
}

impl GrantAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadSecretValue => "secret.value.read",
            Self::Decrypt => "key.decrypt",
        }
    }
}

/// Access-control entry granted to the reconciler's execution identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionEdge {
    /// Identity receiving the grant.
    pub principal: NonEmptyString,
    /// Resource the grant applies to.
    pub resource: GrantResource,
    /// Granted action.
    pub action: GrantAction,
}

/// Dependency and permission edges emitted for one provisioned role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningGraph {
    /// Ordering edges.
    pub dependencies: Vec<DependencyEdge>,
    /// Permission grants.
    pub grants: Vec<PermissionEdge>,
}

impl ProvisioningGraph {
    /// Returns whether `dependent` is ordered after `prerequisite`.
    #[must_use]
    pub fn depends_on(&self, dependent: &ResourceNode, prerequisite: &ResourceNode) -> bool {
        self.dependencies
            .iter()
            .any(|edge| &edge.dependent == dependent && &edge.prerequisite == prerequisite)
    }

    /// Returns the grants carrying the given action.
    pub fn grants_with_action(&self, action: GrantAction) -> impl Iterator<Item = &PermissionEdge> {
        self.grants.iter().filter(move |grant| grant.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depends_on_matches_edge_direction() {
        let secret_id = SecretId::new();
        let credential = ResourceNode::Credential(secret_id);
        let request = ResourceNode::ReconciliationRequest("svc".to_owned());
        let graph = ProvisioningGraph {
            dependencies: vec![DependencyEdge {
                dependent: request.clone(),
                prerequisite: credential.clone(),
            }],
            grants: Vec::new(),
        };

        assert!(graph.depends_on(&request, &credential));
        assert!(!graph.depends_on(&credential, &request));
    }

    #[test]
    fn grant_actions_have_stable_storage_values() {
        assert_eq!(GrantAction::ReadSecretValue.as_str(), "secret.value.read");
        assert_eq!(GrantAction::Decrypt.as_str(), "key.decrypt");
    }
}
