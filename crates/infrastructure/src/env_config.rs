//! Environment-driven orchestrator configuration.

use std::env;

use roleforge_application::OrchestratorConfig;
use roleforge_core::{AppError, AppResult, NonEmptyString};
use roleforge_domain::RemovalPolicy;

/// Variable naming the reconciler's execution identity.
pub const RECONCILER_IDENTITY_ENV: &str = "ROLEFORGE_RECONCILER_IDENTITY";

/// Variable selecting the credential removal policy.
pub const REMOVAL_POLICY_ENV: &str = "ROLEFORGE_REMOVAL_POLICY";

/// Loads orchestrator configuration from process environment variables.
pub fn load_orchestrator_config() -> AppResult<OrchestratorConfig> {
    load_orchestrator_config_from(|name| env::var(name).ok())
}

/// Loads orchestrator configuration through a variable lookup function.
pub fn load_orchestrator_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> AppResult<OrchestratorConfig> {
    let reconciler_identity = required_var(&lookup, RECONCILER_IDENTITY_ENV)?;
    let reconciler_identity = NonEmptyString::new(reconciler_identity.trim()).map_err(|_| {
        AppError::Validation(format!("{RECONCILER_IDENTITY_ENV} must not be empty"))
    })?;

    let removal_policy = match lookup(REMOVAL_POLICY_ENV) {
        Some(value) => RemovalPolicy::parse(value.trim().to_lowercase().as_str()).map_err(|_| {
            AppError::Validation(format!(
                "invalid {REMOVAL_POLICY_ENV} value '{value}': expected 'destroy' or 'retain'"
            ))
        })?,
        None => RemovalPolicy::default(),
    };

    Ok(OrchestratorConfig::new(reconciler_identity).with_removal_policy(removal_policy))
}

fn required_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
