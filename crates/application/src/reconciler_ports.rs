use async_trait::async_trait;

use roleforge_core::AppResult;
use roleforge_domain::{ReconciliationRequest, RoleLifecycleEvent};

/// Port for the external component that manages roles in the live database.
///
/// Implementations must be idempotent on `Create`, grant connect on the
/// target database when it exists, reconfigure in place on `Update` and
/// remove the role on `Delete`. Their failures are returned untouched.
#[async_trait]
pub trait RoleReconciler: Send + Sync {
    /// Applies a lifecycle event for the requested role.
    async fn reconcile(
        &self,
        event: RoleLifecycleEvent,
        request: &ReconciliationRequest,
    ) -> AppResult<()>;
}
