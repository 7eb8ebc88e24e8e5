#![allow(clippy::unwrap_used, clippy::expect_used)]

use agenda_security::SecurityContext;
use authz_engine_sdk::{CrudAction, RequiredCapability, RoleType};
use uuid::Uuid;

use crate::catalog::{entities, fixed};
use crate::config::AuthzEngineConfig;
use crate::test_support::{build_services, ctx_for, inmem_db, new_role, reconciled_services};

#[tokio::test]
async fn provider_default_is_granted_only_once_persisted() {
    let db = inmem_db().await;
    let svc = build_services(db, &AuthzEngineConfig::default());
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
    let ctx = ctx_for(bob.id);

    svc.assignment.assign_role_permissions().await.unwrap();
    assert!(
        !svc.decisions
            .is_authorized(&ctx, fixed::SHOW_HOME_DASHBOARDS)
            .await
            .unwrap()
    );

    svc.capabilities.reconcile().await.unwrap();
    svc.assignment.assign_role_permissions().await.unwrap();
    assert!(
        svc.decisions
            .is_authorized(&ctx, fixed::SHOW_HOME_DASHBOARDS)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn principal_without_role_or_grants_is_always_denied() {
    let svc = reconciled_services().await;
    let p = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();
    let ctx = ctx_for(p.id);

    for name in svc.capabilities.registry().enumerate().keys() {
        assert!(
            !svc.decisions.is_authorized(&ctx, name).await.unwrap(),
            "{name}"
        );
    }
    assert!(
        svc.decisions
            .effective_capabilities(&ctx)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn grant_then_revoke_leaves_nothing() {
    let svc = reconciled_services().await;
    let p = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();
    let ctx = ctx_for(p.id);

    svc.principals
        .grant(p.id, "documents.download_document")
        .await
        .unwrap();
    assert!(
        svc.decisions
            .is_authorized(&ctx, "documents.download_document")
            .await
            .unwrap()
    );

    svc.principals
        .revoke(p.id, "documents.download_document")
        .await
        .unwrap();
    assert!(
        svc.principals
            .get_principal(p.id)
            .await
            .unwrap()
            .capabilities
            .is_empty()
    );
    assert!(
        !svc.decisions
            .is_authorized(&ctx, "documents.download_document")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn decision_is_the_union_of_direct_and_role_sets() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let p = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(role.id))
        .await
        .unwrap();
    let from_role = RequiredCapability::crud(&entities::MESSAGE, CrudAction::Create);
    svc.roles
        .set_role_capabilities(role.id, vec![from_role.name().into_owned()])
        .await
        .unwrap();
    svc.principals
        .grant(p.id, fixed::UPDATE_PROFILE)
        .await
        .unwrap();
    let ctx = ctx_for(p.id);

    assert!(
        svc.decisions
            .is_authorized(&ctx, &from_role.name())
            .await
            .unwrap()
    );
    assert!(
        svc.decisions
            .is_authorized(&ctx, fixed::UPDATE_PROFILE)
            .await
            .unwrap()
    );
    assert!(
        !svc.decisions
            .is_authorized(&ctx, "messages.destroy_message")
            .await
            .unwrap()
    );

    let effective = svc.decisions.effective_capabilities(&ctx).await.unwrap();
    assert!(effective.direct.contains(fixed::UPDATE_PROFILE));
    assert!(effective.from_role.contains("messages.create_message"));
    assert_eq!(effective.union().len(), 2);
}

#[tokio::test]
async fn role_change_takes_effect_on_the_next_decision() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(role.id, vec![fixed::SHOW_CLIENTS_MENU.to_owned()])
        .await
        .unwrap();
    let p = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();
    let ctx = ctx_for(p.id);

    assert!(
        !svc.decisions
            .is_authorized(&ctx, fixed::SHOW_CLIENTS_MENU)
            .await
            .unwrap()
    );
    svc.principals
        .set_principal_role(p.id, Some(role.id))
        .await
        .unwrap();
    assert!(
        svc.decisions
            .is_authorized(&ctx, fixed::SHOW_CLIENTS_MENU)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn anonymous_unregistered_and_unknown_are_denied_without_error() {
    let svc = reconciled_services().await;
    let p = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();
    svc.principals
        .grant(p.id, fixed::UPDATE_PROFILE)
        .await
        .unwrap();

    let anonymous = SecurityContext::anonymous();
    assert!(
        !svc.decisions
            .is_authorized(&anonymous, fixed::UPDATE_PROFILE)
            .await
            .unwrap()
    );
    assert!(
        svc.decisions
            .effective_capabilities(&anonymous)
            .await
            .unwrap()
            .is_empty()
    );

    let stranger = ctx_for(Uuid::new_v4());
    assert!(
        !svc.decisions
            .is_authorized(&stranger, fixed::UPDATE_PROFILE)
            .await
            .unwrap()
    );

    let ctx = ctx_for(p.id);
    assert!(
        !svc.decisions
            .is_authorized(&ctx, "no.such_capability")
            .await
            .unwrap()
    );
}
