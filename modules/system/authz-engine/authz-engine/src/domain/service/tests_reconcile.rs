#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use authz_engine_sdk::RoleType;
use tracing_test::traced_test;

use crate::catalog::fixed;
use crate::config::{
    AuthzEngineConfig, EntityConfig, FixedCapabilityConfig, ObsoleteCapabilityPolicy,
};
use crate::domain::error::DomainError;
use crate::test_support::{build_services, inmem_db, new_role};

fn with_billing() -> AuthzEngineConfig {
    AuthzEngineConfig {
        extra_entities: vec![EntityConfig {
            namespace: "billing".to_owned(),
            name: "invoice".to_owned(),
        }],
        ..AuthzEngineConfig::default()
    }
}

async fn stored_names(svc: &crate::module::ConcreteAppServices) -> BTreeSet<String> {
    svc.capabilities
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[tokio::test]
#[traced_test]
async fn first_run_creates_every_declared_capability() {
    let svc = build_services(inmem_db().await, &AuthzEngineConfig::default());

    let report = svc.capabilities.reconcile().await.unwrap();

    let declared: BTreeSet<String> = svc
        .capabilities
        .registry()
        .enumerate()
        .keys()
        .cloned()
        .collect();
    assert_eq!(report.created.len(), declared.len());
    assert!(report.updated.is_empty());
    assert!(report.deleted.is_empty());
    assert_eq!(stored_names(&svc).await, declared);
    assert!(logs_contain("capability reconciliation complete"));
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let svc = build_services(inmem_db().await, &AuthzEngineConfig::default());
    svc.capabilities.reconcile().await.unwrap();
    let before = svc.capabilities.list().await.unwrap();

    let report = svc.capabilities.reconcile().await.unwrap();

    assert!(report.is_noop());
    assert_eq!(svc.capabilities.list().await.unwrap(), before);
}

#[tokio::test]
async fn excluded_namespaces_never_reach_the_store() {
    let svc = build_services(inmem_db().await, &AuthzEngineConfig::default());
    svc.capabilities.reconcile().await.unwrap();

    let names = stored_names(&svc).await;

    assert!(
        names
            .iter()
            .all(|n| !n.starts_with("auth.") && !n.starts_with("sessions."))
    );
    assert!(names.contains("messages.partial_update_message"));
    assert!(names.contains(fixed::SHOW_DIAGRAM_UML));
}

#[tokio::test]
async fn changed_description_is_updated_in_place() {
    let db = inmem_db().await;
    let mut cfg = AuthzEngineConfig {
        extra_fixed_capabilities: vec![FixedCapabilityConfig {
            name: "CAN_EXPORT_REPORTS".to_owned(),
            description: "Export reports".to_owned(),
        }],
        ..AuthzEngineConfig::default()
    };
    build_services(db.clone(), &cfg)
        .capabilities
        .reconcile()
        .await
        .unwrap();

    cfg.extra_fixed_capabilities[0].description = "Export monthly reports".to_owned();
    let svc = build_services(db, &cfg);
    let report = svc.capabilities.reconcile().await.unwrap();

    assert_eq!(report.updated, ["CAN_EXPORT_REPORTS"]);
    assert!(report.created.is_empty() && report.deleted.is_empty());
    let stored = svc
        .capabilities
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "CAN_EXPORT_REPORTS")
        .unwrap();
    assert_eq!(stored.description, "Export monthly reports");
}

#[tokio::test]
async fn removed_entity_cascades_out_of_roles_and_principals() {
    let db = inmem_db().await;
    let old = build_services(db.clone(), &with_billing());
    old.capabilities.reconcile().await.unwrap();

    let role = old
        .roles
        .create_role(new_role("Accounting", RoleType::provider()))
        .await
        .unwrap();
    old.roles
        .set_role_capabilities(
            role.id,
            vec![
                "billing.list_invoice".to_owned(),
                "messages.list_message".to_owned(),
            ],
        )
        .await
        .unwrap();
    let principal = old
        .principals
        .register_principal(uuid::Uuid::new_v4(), Some(role.id))
        .await
        .unwrap();
    assert!(
        principal
            .capabilities
            .contains(&"billing.list_invoice".to_owned())
    );

    let svc = build_services(db, &AuthzEngineConfig::default());
    let report = svc.capabilities.reconcile().await.unwrap();

    assert_eq!(
        report.deleted,
        [
            "billing.create_invoice",
            "billing.destroy_invoice",
            "billing.list_invoice",
            "billing.partial_update_invoice",
            "billing.retrieve_invoice",
            "billing.update_invoice",
        ]
    );
    let role = svc.roles.get_role(role.id).await.unwrap();
    assert_eq!(role.capabilities, ["messages.list_message"]);
    let principal = svc.principals.get_principal(principal.id).await.unwrap();
    assert_eq!(principal.capabilities, ["messages.list_message"]);
}

#[tokio::test]
async fn restrict_policy_refuses_while_obsolete_names_are_referenced() {
    let db = inmem_db().await;
    let old = build_services(db.clone(), &with_billing());
    old.capabilities.reconcile().await.unwrap();
    let role = old
        .roles
        .create_role(new_role("Accounting", RoleType::provider()))
        .await
        .unwrap();
    old.roles
        .set_role_capabilities(role.id, vec!["billing.retrieve_invoice".to_owned()])
        .await
        .unwrap();
    let before = old.capabilities.list().await.unwrap();

    let cfg = AuthzEngineConfig {
        obsolete_capabilities: ObsoleteCapabilityPolicy::Restrict,
        ..AuthzEngineConfig::default()
    };
    let svc = build_services(db, &cfg);
    let err = svc.capabilities.reconcile().await.unwrap_err();

    match err {
        DomainError::Reconciliation(msg) => assert!(msg.contains("billing.retrieve_invoice")),
        other => panic!("expected Reconciliation, got {other:?}"),
    }
    assert_eq!(svc.capabilities.list().await.unwrap(), before);
    let role = svc.roles.get_role(role.id).await.unwrap();
    assert_eq!(role.capabilities, ["billing.retrieve_invoice"]);
}

#[tokio::test]
async fn restrict_policy_deletes_unreferenced_names() {
    let db = inmem_db().await;
    build_services(db.clone(), &with_billing())
        .capabilities
        .reconcile()
        .await
        .unwrap();

    let cfg = AuthzEngineConfig {
        obsolete_capabilities: ObsoleteCapabilityPolicy::Restrict,
        ..AuthzEngineConfig::default()
    };
    let svc = build_services(db, &cfg);
    let report = svc.capabilities.reconcile().await.unwrap();

    assert_eq!(report.deleted.len(), 6);
    assert!(
        stored_names(&svc)
            .await
            .iter()
            .all(|n| !n.starts_with("billing."))
    );
}

#[tokio::test]
async fn concurrent_runs_serialize() {
    let svc = std::sync::Arc::new(build_services(
        inmem_db().await,
        &AuthzEngineConfig::default(),
    ));

    let (a, b) = tokio::join!(svc.capabilities.reconcile(), svc.capabilities.reconcile());
    let (a, b) = (a.unwrap(), b.unwrap());

    // Exactly one of the two runs did the work.
    assert!(a.is_noop() ^ b.is_noop());
}
