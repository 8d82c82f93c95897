use roleforge_core::NonEmptyString;
use roleforge_domain::{
    CredentialHandle, DependencyEdge, GrantAction, GrantResource, PermissionEdge,
    ProvisioningGraph, ResourceNode,
};

/// Wires the ordering and permission edges between a credential and the
/// reconciler that consumes it.
#[derive(Debug, Clone)]
pub struct DependencyBinder {
    reconciler_identity: NonEmptyString,
}

impl DependencyBinder {
    /// Creates a binder granting access to the given reconciler identity.
    #[must_use]
    pub fn new(reconciler_identity: NonEmptyString) -> Self {
        Self {
            reconciler_identity,
        }
    }

    /// Returns the edges for one role.
    ///
    /// The decrypt grant is emitted only for encrypted credentials; key and
    /// secret permissions are independent.
    #[must_use]
    pub fn bind(&self, credential: &CredentialHandle, role_name: &NonEmptyString) -> ProvisioningGraph {
        let dependencies = vec![DependencyEdge {
            dependent: ResourceNode::ReconciliationRequest(role_name.as_str().to_owned()),
            prerequisite: ResourceNode::Credential(credential.secret_id),
        }];

        let mut grants = vec![PermissionEdge {
            principal: self.reconciler_identity.clone(),
            resource: GrantResource::Secret(credential.secret_id),
            action: GrantAction::ReadSecretValue,
        }];

        if let Some(encryption_key) = &credential.encryption_key {
            grants.push(PermissionEdge {
                principal: self.reconciler_identity.clone(),
                resource: GrantResource::EncryptionKey(encryption_key.clone()),
                action: GrantAction::Decrypt,
            });
        }

        ProvisioningGraph {
            dependencies,
            grants,
        }
    }
}
