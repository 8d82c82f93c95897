use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use roleforge_core::{AppError, AppResult, NonEmptyString, SecretId};
use roleforge_domain::{
    DatabaseRef, DatabaseTopology, EncryptionKeyRef, Endpoint, GrantAction, GrantResource,
    POSTGRES_PASSWORD_LENGTH, PasswordPolicy, ReconciliationRequest, RemovalPolicy, ResourceNode,
    RoleLifecycleEvent, RoleSpec, TopologyDescriptor,
};

use crate::{
    NewSecret, OrchestratorConfig, RoleReconciler, SecretStore, StoredSecret, TeardownOutcome,
};

use super::RoleOrchestrator;

#[derive(Default)]
struct FakeSecretStore {
    secrets: Mutex<HashMap<SecretId, StoredSecret>>,
}

impl FakeSecretStore {
    async fn len(&self) -> usize {
        self.secrets.lock().await.len()
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn put_secret(&self, secret: NewSecret) -> AppResult<StoredSecret> {
        let secret_id = SecretId::new();
        let stored = StoredSecret {
            secret_id,
            name: secret
                .name
                .map(String::from)
                .unwrap_or_else(|| format!("fake/{secret_id}")),
            value: secret.value,
            encryption_key: secret.encryption_key,
            removal_policy: secret.removal_policy,
            created_at: Utc::now(),
        };
        self.secrets.lock().await.insert(secret_id, stored.clone());
        Ok(stored)
    }

    async fn get_secret(&self, secret_id: SecretId) -> AppResult<Option<StoredSecret>> {
        Ok(self.secrets.lock().await.get(&secret_id).cloned())
    }

    async fn delete_secret(&self, secret_id: SecretId) -> AppResult<bool> {
        Ok(self.secrets.lock().await.remove(&secret_id).is_some())
    }
}

/// Reconciler that only succeeds when it can read the referenced password.
struct PasswordReadingReconciler {
    secret_store: Arc<FakeSecretStore>,
    seen_passwords: Mutex<Vec<String>>,
}

#[async_trait]
impl RoleReconciler for PasswordReadingReconciler {
    async fn reconcile(
        &self,
        _event: RoleLifecycleEvent,
        request: &ReconciliationRequest,
    ) -> AppResult<()> {
        let secret = self
            .secret_store
            .get_secret(request.password_ref.secret_id)
            .await?
            .ok_or_else(|| AppError::NotFound("credential is not durable yet".to_owned()))?;
        let password = secret.value[request.password_ref.json_key.as_str()]
            .as_str()
            .ok_or_else(|| AppError::Internal("password field missing".to_owned()))?
            .to_owned();

        self.seen_passwords.lock().await.push(password);
        Ok(())
    }
}

fn orchestrator(secret_store: Arc<FakeSecretStore>) -> RoleOrchestrator {
    orchestrator_with_policy(secret_store, RemovalPolicy::Destroy)
}

fn orchestrator_with_policy(
    secret_store: Arc<FakeSecretStore>,
    removal_policy: RemovalPolicy,
) -> RoleOrchestrator {
    let identity = NonEmptyString::new("role-reconciler").unwrap_or_else(|_| panic!("test"));
    RoleOrchestrator::new(
        OrchestratorConfig::new(identity).with_removal_policy(removal_policy),
        secret_store,
    )
}

fn instance_spec(role_name: &str, database_name: &str) -> RoleSpec {
    RoleSpec {
        role_name: role_name.to_owned(),
        database_ref: None,
        database_name: Some(database_name.to_owned()),
        topology: TopologyDescriptor::instance(Endpoint::new("db.instance", 5432, "db-1")),
        encryption_key: None,
        secret_name: None,
    }
}

fn cluster_spec_with_key() -> RoleSpec {
    RoleSpec {
        role_name: "svc".to_owned(),
        database_ref: Some(DatabaseRef::new("orders").unwrap_or_else(|_| panic!("test"))),
        database_name: None,
        topology: TopologyDescriptor::cluster(Endpoint::new("db.cluster", 5432, "cl-1")),
        encryption_key: Some(EncryptionKeyRef::new("key-1").unwrap_or_else(|_| panic!("test"))),
        secret_name: None,
    }
}

#[tokio::test]
async fn both_database_fields_abort_before_any_side_effect() {
    let secret_store = Arc::new(FakeSecretStore::default());
    let mut spec = instance_spec("app_user", "appdb");
    spec.database_ref = Some(DatabaseRef::new("appdb").unwrap_or_else(|_| panic!("test")));

    let result = orchestrator(secret_store.clone()).provision(&spec).await;

    assert!(matches!(result, Err(AppError::Configuration(_))));
    assert_eq!(secret_store.len().await, 0);
}

#[tokio::test]
async fn missing_database_fields_abort_before_any_side_effect() {
    let secret_store = Arc::new(FakeSecretStore::default());
    let mut spec = instance_spec("app_user", "appdb");
    spec.database_name = None;

    let result = orchestrator(secret_store.clone()).provision(&spec).await;

    assert!(matches!(result, Err(AppError::Configuration(_))));
    assert_eq!(secret_store.len().await, 0);
}

#[tokio::test]
async fn blank_role_name_is_rejected_before_any_side_effect() {
    let secret_store = Arc::new(FakeSecretStore::default());
    let spec = instance_spec("  ", "appdb");

    let result = orchestrator(secret_store.clone()).provision(&spec).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(secret_store.len().await, 0);
}

#[tokio::test]
async fn unresolvable_topology_persists_nothing() {
    let secret_store = Arc::new(FakeSecretStore::default());
    let mut spec = instance_spec("app_user", "appdb");
    spec.topology = TopologyDescriptor::default();

    let result = orchestrator(secret_store.clone()).provision(&spec).await;

    assert!(matches!(result, Err(AppError::TopologyResolution(_))));
    assert_eq!(secret_store.len().await, 0);
}

#[tokio::test]
async fn database_name_role_gets_template_and_read_grant_only() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());

    let provisioned = orchestrator(secret_store.clone())
        .provision(&instance_spec("app_user", "appdb"))
        .await?;

    let stored = secret_store
        .get_secret(provisioned.credential.secret_id)
        .await?
        .ok_or_else(|| AppError::NotFound("secret".to_owned()))?;
    assert_eq!(stored.value["engine"], "postgres");
    assert_eq!(stored.value["username"], "app_user");
    assert_eq!(stored.value["dbname"], "appdb");
    assert_eq!(stored.value["host"], "db.instance");
    assert_eq!(stored.value["dbClusterIdentifier"], "db-1");
    assert_eq!(stored.removal_policy, RemovalPolicy::Destroy);

    assert_eq!(provisioned.role_name.as_str(), "app_user");
    assert_eq!(
        provisioned.topology,
        DatabaseTopology::SingleInstance(Endpoint::new("db.instance", 5432, "db-1"))
    );
    assert_eq!(
        provisioned
            .graph
            .grants_with_action(GrantAction::ReadSecretValue)
            .count(),
        1
    );
    assert_eq!(
        provisioned
            .graph
            .grants_with_action(GrantAction::Decrypt)
            .count(),
        0
    );
    Ok(())
}

#[tokio::test]
async fn cluster_role_with_key_gets_cluster_coordinates_and_both_grants() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());

    let provisioned = orchestrator(secret_store.clone())
        .provision(&cluster_spec_with_key())
        .await?;

    let stored = secret_store
        .get_secret(provisioned.credential.secret_id)
        .await?
        .ok_or_else(|| AppError::NotFound("secret".to_owned()))?;
    assert_eq!(stored.value["host"], "db.cluster");
    assert_eq!(stored.value["port"], 5432);
    assert_eq!(stored.value["dbClusterIdentifier"], "cl-1");
    assert_eq!(stored.value["dbname"], "orders");
    assert_eq!(
        stored.encryption_key.as_ref().map(EncryptionKeyRef::as_str),
        Some("key-1")
    );

    let read_grants = provisioned
        .graph
        .grants_with_action(GrantAction::ReadSecretValue)
        .collect::<Vec<_>>();
    let decrypt_grants = provisioned
        .graph
        .grants_with_action(GrantAction::Decrypt)
        .collect::<Vec<_>>();
    assert_eq!(read_grants.len(), 1);
    assert_eq!(decrypt_grants.len(), 1);
    assert_eq!(
        read_grants[0].resource,
        GrantResource::Secret(provisioned.credential.secret_id)
    );
    assert_eq!(decrypt_grants[0].principal.as_str(), "role-reconciler");
    Ok(())
}

#[tokio::test]
async fn reconciliation_request_depends_on_credential() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());

    let provisioned = orchestrator(secret_store)
        .provision(&instance_spec("app_user", "appdb"))
        .await?;

    assert!(provisioned.graph.depends_on(
        &ResourceNode::ReconciliationRequest("app_user".to_owned()),
        &ResourceNode::Credential(provisioned.credential.secret_id),
    ));
    assert_eq!(provisioned.request.role_name.as_str(), "app_user");
    assert_eq!(
        provisioned.request.password_ref,
        provisioned.credential.password_ref()
    );
    assert_eq!(provisioned.request.database.database_name(), "appdb");
    Ok(())
}

#[tokio::test]
async fn reconciler_reads_password_through_reference() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());
    let reconciler = PasswordReadingReconciler {
        secret_store: secret_store.clone(),
        seen_passwords: Mutex::new(Vec::new()),
    };

    let provisioned = orchestrator(secret_store)
        .provision(&instance_spec("app_user", "appdb"))
        .await?;
    reconciler
        .reconcile(RoleLifecycleEvent::Create, &provisioned.request)
        .await?;

    let seen_passwords = reconciler.seen_passwords.lock().await;
    assert_eq!(seen_passwords.len(), 1);
    assert!(
        PasswordPolicy::postgres()
            .accept(seen_passwords[0].clone())
            .is_ok()
    );
    assert_eq!(seen_passwords[0].chars().count(), POSTGRES_PASSWORD_LENGTH);
    Ok(())
}

#[tokio::test]
async fn explicit_secret_name_is_kept() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());
    let mut spec = instance_spec("app_user", "appdb");
    spec.secret_name = Some("app/app_user".to_owned());

    let provisioned = orchestrator(secret_store).provision(&spec).await?;

    assert_eq!(provisioned.credential.secret_name, "app/app_user");
    Ok(())
}

#[tokio::test]
async fn deprovision_destroys_credential_by_default() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());
    let orchestrator = orchestrator(secret_store.clone());
    let provisioned = orchestrator
        .provision(&instance_spec("app_user", "appdb"))
        .await?;

    let outcome = orchestrator.deprovision(&provisioned.credential).await?;

    assert_eq!(outcome, TeardownOutcome::Destroyed);
    assert_eq!(secret_store.len().await, 0);

    let repeated = orchestrator.deprovision(&provisioned.credential).await;
    assert!(matches!(repeated, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn deprovision_keeps_retained_credential() -> AppResult<()> {
    let secret_store = Arc::new(FakeSecretStore::default());
    let orchestrator = orchestrator_with_policy(secret_store.clone(), RemovalPolicy::Retain);
    let provisioned = orchestrator
        .provision(&instance_spec("app_user", "appdb"))
        .await?;

    let outcome = orchestrator.deprovision(&provisioned.credential).await?;

    assert_eq!(outcome, TeardownOutcome::Retained);
    assert_eq!(secret_store.len().await, 1);
    Ok(())
}
