#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use authz_engine_sdk::RoleType;
use uuid::Uuid;

use crate::catalog::{ROLE_DEFAULTS, fixed};
use crate::config::{AssignmentMode, AuthzEngineConfig, RoleDefaultsConfig};
use crate::test_support::{build_services, inmem_db, new_role, reconciled_services};

fn declared(role_type: &str) -> BTreeSet<String> {
    ROLE_DEFAULTS
        .iter()
        .find(|d| d.role_type == role_type)
        .unwrap()
        .capabilities
        .iter()
        .map(|c| (*c).to_owned())
        .collect()
}

fn as_set(names: &[String]) -> BTreeSet<String> {
    names.iter().cloned().collect()
}

#[tokio::test]
async fn principals_receive_their_role_type_defaults() {
    let svc = reconciled_services().await;
    let clients = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let providers = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();
    let alice = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(clients.id))
        .await
        .unwrap();
    let bob = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(providers.id))
        .await
        .unwrap();
    let nobody = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();

    let report = svc.assignment.assign_role_permissions().await.unwrap();

    assert_eq!(report.updated, 2);
    assert!(report.skipped.is_empty());
    let alice = svc.principals.get_principal(alice.id).await.unwrap();
    let bob = svc.principals.get_principal(bob.id).await.unwrap();
    let nobody = svc.principals.get_principal(nobody.id).await.unwrap();
    assert_eq!(as_set(&alice.capabilities), declared("client"));
    assert_eq!(as_set(&bob.capabilities), declared("provider"));
    assert!(nobody.capabilities.is_empty());
    assert_eq!(
        report.assigned,
        u64::try_from(declared("client").len() + declared("provider").len()).unwrap()
    );
}

#[tokio::test]
async fn assignment_is_idempotent() {
    let svc = reconciled_services().await;
    let providers = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();
    let bob = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(providers.id))
        .await
        .unwrap();

    let first = svc.assignment.assign_role_permissions().await.unwrap();
    let after_first = svc.principals.get_principal(bob.id).await.unwrap();
    let second = svc.assignment.assign_role_permissions().await.unwrap();
    let after_second = svc.principals.get_principal(bob.id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn replace_mode_drops_ad_hoc_grants() {
    let svc = reconciled_services().await;
    let clients = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let alice = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(clients.id))
        .await
        .unwrap();
    svc.principals
        .grant(alice.id, fixed::SHOW_DIAGRAM_UML)
        .await
        .unwrap();

    svc.assignment.assign_role_permissions().await.unwrap();

    let alice = svc.principals.get_principal(alice.id).await.unwrap();
    assert!(
        !alice
            .capabilities
            .contains(&fixed::SHOW_DIAGRAM_UML.to_owned())
    );
    assert_eq!(as_set(&alice.capabilities), declared("client"));
}

#[tokio::test]
async fn merge_mode_keeps_ad_hoc_grants() {
    let cfg = AuthzEngineConfig {
        assignment_mode: AssignmentMode::Merge,
        ..AuthzEngineConfig::default()
    };
    let svc = build_services(inmem_db().await, &cfg);
    svc.capabilities.reconcile().await.unwrap();
    let clients = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let alice = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(clients.id))
        .await
        .unwrap();
    svc.principals
        .grant(alice.id, fixed::SHOW_DIAGRAM_UML)
        .await
        .unwrap();

    let first = svc.assignment.assign_role_permissions().await.unwrap();
    let second = svc.assignment.assign_role_permissions().await.unwrap();

    let alice = svc.principals.get_principal(alice.id).await.unwrap();
    let mut expected = declared("client");
    expected.insert(fixed::SHOW_DIAGRAM_UML.to_owned());
    assert_eq!(as_set(&alice.capabilities), expected);
    assert_eq!(
        first.assigned,
        u64::try_from(declared("client").len()).unwrap()
    );
    assert_eq!(second.assigned, 0);
}

#[tokio::test]
async fn unpersisted_defaults_are_skipped_and_reported() {
    let mut cfg = AuthzEngineConfig::default();
    cfg.role_defaults.insert(
        "client".to_owned(),
        RoleDefaultsConfig {
            label: "Client Permissions".to_owned(),
            description: String::new(),
            capabilities: vec![
                fixed::UPDATE_PROFILE.to_owned(),
                "loyalty.redeem_points".to_owned(),
            ],
        },
    );
    let svc = build_services(inmem_db().await, &cfg);
    svc.capabilities.reconcile().await.unwrap();
    let clients = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let alice = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(clients.id))
        .await
        .unwrap();

    let report = svc.assignment.assign_role_permissions().await.unwrap();

    assert_eq!(
        report.skipped,
        BTreeSet::from(["loyalty.redeem_points".to_owned()])
    );
    let alice = svc.principals.get_principal(alice.id).await.unwrap();
    assert_eq!(alice.capabilities, [fixed::UPDATE_PROFILE]);
}

#[tokio::test]
async fn nothing_persisted_means_nothing_assigned() {
    let svc = build_services(inmem_db().await, &AuthzEngineConfig::default());
    let providers = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();
    let bob = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(providers.id))
        .await
        .unwrap();

    let report = svc.assignment.assign_role_permissions().await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.assigned, 0);
    assert_eq!(report.skipped, declared("provider"));
    assert!(
        svc.principals
            .get_principal(bob.id)
            .await
            .unwrap()
            .capabilities
            .is_empty()
    );
}

#[tokio::test]
async fn sync_role_defaults_rewrites_persisted_roles() {
    let svc = reconciled_services().await;
    let providers = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(providers.id, vec!["core.destroy_role".to_owned()])
        .await
        .unwrap();

    let report = svc.assignment.sync_role_defaults().await.unwrap();

    assert_eq!(report.updated, 1);
    let providers = svc.roles.get_role(providers.id).await.unwrap();
    assert_eq!(as_set(&providers.capabilities), declared("provider"));
    assert!(
        !providers
            .capabilities
            .contains(&"core.destroy_role".to_owned())
    );
}
