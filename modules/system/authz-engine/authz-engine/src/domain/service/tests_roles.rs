#![allow(clippy::unwrap_used, clippy::expect_used)]

use authz_engine_sdk::{RoleType, RoleUpdate};
use uuid::Uuid;

use crate::catalog::fixed;
use crate::domain::error::DomainError;
use crate::test_support::{new_role, reconciled_services};

#[tokio::test]
async fn create_and_get_role() {
    let svc = reconciled_services().await;

    let created = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let fetched = svc.roles.get_role(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.role_type, RoleType::client());
    assert!(fetched.capabilities.is_empty());
}

#[tokio::test]
async fn duplicate_role_name_is_rejected() {
    let svc = reconciled_services().await;
    svc.roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();

    let err = svc
        .roles
        .create_role(new_role("Clients", RoleType::provider()))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DuplicateName { name } if name == "Clients"));
    assert_eq!(svc.roles.list_roles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_role_type_is_rejected() {
    let svc = reconciled_services().await;

    let err = svc
        .roles
        .create_role(new_role("Admins", RoleType::new("admin")))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::UnknownRoleType { role_type } if role_type == "admin"));
}

#[tokio::test]
async fn update_role_changes_only_the_given_fields() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(role.id, vec!["messages.list_message".to_owned()])
        .await
        .unwrap();

    let renamed = svc
        .roles
        .update_role(
            role.id,
            RoleUpdate {
                name: Some("Patients".to_owned()),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Patients");
    assert_eq!(renamed.description, role.description);
    assert_eq!(renamed.role_type, RoleType::client());
    assert_eq!(renamed.capabilities, ["messages.list_message"]);

    let retyped = svc
        .roles
        .update_role(
            role.id,
            RoleUpdate {
                description: Some("Booking clients".to_owned()),
                role_type: Some(RoleType::provider()),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(retyped.name, "Patients");
    assert_eq!(retyped.description, "Booking clients");
    assert_eq!(retyped.role_type, RoleType::provider());
    assert_eq!(svc.roles.get_role(role.id).await.unwrap(), retyped);
}

#[tokio::test]
async fn update_role_keeps_its_own_name() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();

    let same = svc
        .roles
        .update_role(
            role.id,
            RoleUpdate {
                name: Some("Clients".to_owned()),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.name, "Clients");

    let untouched = svc
        .roles
        .update_role(role.id, RoleUpdate::default())
        .await
        .unwrap();
    assert_eq!(untouched, role);
}

#[tokio::test]
async fn rename_onto_a_taken_name_is_rejected() {
    let svc = reconciled_services().await;
    svc.roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let providers = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();

    let err = svc
        .roles
        .update_role(
            providers.id,
            RoleUpdate {
                name: Some("Clients".to_owned()),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DuplicateName { name } if name == "Clients"));
    let providers = svc.roles.get_role(providers.id).await.unwrap();
    assert_eq!(providers.name, "Providers");
}

#[tokio::test]
async fn update_role_rejects_unknown_type_and_missing_role() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();

    let err = svc
        .roles
        .update_role(
            role.id,
            RoleUpdate {
                role_type: Some(RoleType::new("admin")),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::UnknownRoleType { role_type } if role_type == "admin"));
    let role = svc.roles.get_role(role.id).await.unwrap();
    assert_eq!(role.role_type, RoleType::client());

    let missing = Uuid::new_v4();
    let err = svc
        .roles
        .update_role(
            missing,
            RoleUpdate {
                name: Some("Ghosts".to_owned()),
                ..RoleUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { kind: "role", id } if id == missing));
}

#[tokio::test]
async fn set_role_capabilities_replaces_the_whole_set() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();

    svc.roles
        .set_role_capabilities(
            role.id,
            vec![
                fixed::SHOW_SERVICES_MENU.to_owned(),
                "services.list_service".to_owned(),
            ],
        )
        .await
        .unwrap();
    let role = svc
        .roles
        .set_role_capabilities(
            role.id,
            vec![
                "services.create_service".to_owned(),
                "services.list_service".to_owned(),
                "services.list_service".to_owned(),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        role.capabilities,
        ["services.create_service", "services.list_service"]
    );
}

#[tokio::test]
async fn unknown_names_are_all_reported_and_nothing_changes() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Providers", RoleType::provider()))
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(role.id, vec!["services.list_service".to_owned()])
        .await
        .unwrap();

    let err = svc
        .roles
        .set_role_capabilities(
            role.id,
            vec![
                "zzz.fly".to_owned(),
                "services.create_service".to_owned(),
                "aaa.swim".to_owned(),
                "zzz.fly".to_owned(),
            ],
        )
        .await
        .unwrap_err();

    match err {
        DomainError::UnknownCapability { names } => assert_eq!(names, ["aaa.swim", "zzz.fly"]),
        other => panic!("expected UnknownCapability, got {other:?}"),
    }
    let role = svc.roles.get_role(role.id).await.unwrap();
    assert_eq!(role.capabilities, ["services.list_service"]);
}

#[tokio::test]
async fn missing_role_is_not_found() {
    let svc = reconciled_services().await;
    let id = Uuid::new_v4();

    let err = svc.roles.get_role(id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { kind: "role", id: got } if got == id));

    let err = svc
        .roles
        .set_role_capabilities(id, vec!["services.list_service".to_owned()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_a_role_orphans_its_principals() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(role.id, vec!["messages.list_message".to_owned()])
        .await
        .unwrap();
    let principal = svc
        .principals
        .register_principal(Uuid::new_v4(), Some(role.id))
        .await
        .unwrap();

    svc.roles.delete_role(role.id).await.unwrap();

    let principal = svc.principals.get_principal(principal.id).await.unwrap();
    assert_eq!(principal.role_id, None);
    assert_eq!(principal.capabilities, ["messages.list_message"]);
    assert!(svc.roles.list_roles().await.unwrap().is_empty());
    assert!(
        svc.roles
            .delete_role(role.id)
            .await
            .unwrap_err()
            .to_string()
            .contains("not found")
    );
}

#[tokio::test]
async fn register_seeds_direct_set_only_once() {
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
    svc.roles
        .set_role_capabilities(clients.id, vec![fixed::SHOW_CLIENTS_MENU.to_owned()])
        .await
        .unwrap();
    svc.roles
        .set_role_capabilities(providers.id, vec![fixed::SHOW_PROVIDERS_MENU.to_owned()])
        .await
        .unwrap();
    let id = Uuid::new_v4();

    let first = svc
        .principals
        .register_principal(id, Some(clients.id))
        .await
        .unwrap();
    let again = svc
        .principals
        .register_principal(id, Some(providers.id))
        .await
        .unwrap();

    assert_eq!(first.capabilities, [fixed::SHOW_CLIENTS_MENU]);
    assert_eq!(again.role_id, Some(providers.id));
    assert_eq!(again.capabilities, [fixed::SHOW_CLIENTS_MENU]);
}

#[tokio::test]
async fn register_with_unknown_role_fails() {
    let svc = reconciled_services().await;
    let id = Uuid::new_v4();

    let err = svc
        .principals
        .register_principal(id, Some(Uuid::new_v4()))
        .await
        .unwrap_err();

    match err {
        DomainError::NotFound { kind, .. } => assert_eq!(kind, "role"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    match svc.principals.get_principal(id).await.unwrap_err() {
        DomainError::NotFound { kind, .. } => assert_eq!(kind, "principal"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn set_principal_role_keeps_direct_set() {
    let svc = reconciled_services().await;
    let role = svc
        .roles
        .create_role(new_role("Clients", RoleType::client()))
        .await
        .unwrap();
    let principal = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();
    svc.principals
        .grant(principal.id, fixed::UPDATE_PROFILE)
        .await
        .unwrap();

    let updated = svc
        .principals
        .set_principal_role(principal.id, Some(role.id))
        .await
        .unwrap();
    assert_eq!(updated.role_id, Some(role.id));
    assert_eq!(updated.capabilities, [fixed::UPDATE_PROFILE]);

    let cleared = svc
        .principals
        .set_principal_role(principal.id, None)
        .await
        .unwrap();
    assert_eq!(cleared.role_id, None);
}

#[tokio::test]
async fn grant_and_revoke_validate_their_inputs() {
    let svc = reconciled_services().await;
    let principal = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();

    let err = svc
        .principals
        .grant(principal.id, "nope.fly_dragon")
        .await
        .unwrap_err();
    match err {
        DomainError::UnknownCapability { names } => assert_eq!(names, ["nope.fly_dragon"]),
        other => panic!("expected UnknownCapability, got {other:?}"),
    }

    let err = svc
        .principals
        .revoke(Uuid::new_v4(), fixed::UPDATE_PROFILE)
        .await
        .unwrap_err();
    match err {
        DomainError::NotFound { kind, .. } => assert_eq!(kind, "principal"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn grant_twice_and_revoke_absent_are_noops() {
    let svc = reconciled_services().await;
    let principal = svc
        .principals
        .register_principal(Uuid::new_v4(), None)
        .await
        .unwrap();

    for _ in 0..2 {
        svc.principals
            .grant(principal.id, fixed::UPDATE_PROFILE)
            .await
            .unwrap();
    }
    svc.principals
        .revoke(principal.id, fixed::SHOW_DIAGRAM_UML)
        .await
        .unwrap();

    let principal = svc.principals.get_principal(principal.id).await.unwrap();
    assert_eq!(principal.capabilities, [fixed::UPDATE_PROFILE]);
}
