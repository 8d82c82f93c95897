use roleforge_core::NonEmptyString;
use roleforge_domain::{PasswordPolicy, RemovalPolicy};

/// Settings shared by every provisioning pass.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Execution identity of the role reconciler.
    pub reconciler_identity: NonEmptyString,
    /// Teardown behavior applied to generated credentials.
    pub removal_policy: RemovalPolicy,
    /// Rules for generated passwords.
    pub password_policy: PasswordPolicy,
}

impl OrchestratorConfig {
    /// Creates a configuration with the default removal and password policies.
    #[must_use]
    pub fn new(reconciler_identity: NonEmptyString) -> Self {
        Self {
            reconciler_identity,
            removal_policy: RemovalPolicy::default(),
            password_policy: PasswordPolicy::default(),
        }
    }

    /// Overrides the removal policy.
    #[must_use]
    pub fn with_removal_policy(mut self, removal_policy: RemovalPolicy) -> Self {
        self.removal_policy = removal_policy;
        self
    }
}
