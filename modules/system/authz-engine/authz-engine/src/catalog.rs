//! Built-in catalog of the booking platform: the entities every deployment
//! ships with, the fixed capabilities that do not follow the CRUD pattern and
//! the default capability set of each role type.

use authz_engine_sdk::{EntityRef, RoleType};

pub mod entities {
    use super::EntityRef;

    pub static APPOINTMENT: EntityRef = EntityRef::from_static("appointments", "appointment");
    pub static REVIEW: EntityRef = EntityRef::from_static("appointments", "review");
    pub static USER: EntityRef = EntityRef::from_static("authentication", "user");
    pub static PROFILE: EntityRef = EntityRef::from_static("core", "profile");
    pub static FEATURE: EntityRef = EntityRef::from_static("core", "feature");
    pub static ROLE: EntityRef = EntityRef::from_static("core", "role");
    pub static DOCUMENT: EntityRef = EntityRef::from_static("documents", "document");
    pub static DOCUMENT_TEMPLATE: EntityRef =
        EntityRef::from_static("documents", "documenttemplate");
    pub static SERVICE_DOCUMENT_REQUIREMENT: EntityRef =
        EntityRef::from_static("documents", "servicedocumentrequirement");
    pub static CHAT: EntityRef = EntityRef::from_static("messages", "chat");
    pub static MESSAGE: EntityRef = EntityRef::from_static("messages", "message");
    pub static SERVICE: EntityRef = EntityRef::from_static("services", "service");

    // Framework tables; filtered out by the default namespace deny-list.
    pub static LOG_ENTRY: EntityRef = EntityRef::from_static("admin", "logentry");
    pub static PERMISSION: EntityRef = EntityRef::from_static("auth", "permission");
    pub static GROUP: EntityRef = EntityRef::from_static("auth", "group");
    pub static CONTENT_TYPE: EntityRef = EntityRef::from_static("contenttypes", "contenttype");
    pub static SESSION: EntityRef = EntityRef::from_static("sessions", "session");
}

/// Every entity known to the platform, infrastructure tables included.
pub static ENTITIES: &[&EntityRef] = &[
    &entities::APPOINTMENT,
    &entities::REVIEW,
    &entities::USER,
    &entities::PROFILE,
    &entities::FEATURE,
    &entities::ROLE,
    &entities::DOCUMENT,
    &entities::DOCUMENT_TEMPLATE,
    &entities::SERVICE_DOCUMENT_REQUIREMENT,
    &entities::CHAT,
    &entities::MESSAGE,
    &entities::SERVICE,
    &entities::LOG_ENTRY,
    &entities::PERMISSION,
    &entities::GROUP,
    &entities::CONTENT_TYPE,
    &entities::SESSION,
];

/// Namespaces whose entities never produce capabilities.
pub const EXCLUDED_NAMESPACES: &[&str] = &["admin", "auth", "contenttypes", "sessions"];

pub mod fixed {
    pub const LIST_CLIENTS: &str = "clients_userviewset";
    pub const LIST_PROVIDERS: &str = "providers_userviewset";
    pub const UPDATE_USER_PROFILE: &str = "update_user_profile_userviewset";
    pub const DOWNLOAD_DOCUMENT: &str = "documents.download_document";
    pub const PREVIEW_DOCUMENT: &str = "documents.preview_document";

    pub const SHOW_APPOINTMENTS_MENU: &str = "CAN_SHOW_APPOINTMENTS_MENU";
    pub const SHOW_MESSAGES_MENU: &str = "CAN_SHOW_MESSAGES_MENU";
    pub const SHOW_DOCUMENTS_MENU: &str = "CAN_SHOW_DOCUMENTS_MENU";
    pub const SHOW_SERVICES_MENU: &str = "CAN_SHOW_SERVICES_MENU";
    pub const SHOW_CLIENTS_MENU: &str = "CAN_SHOW_CLIENTS_MENU";
    pub const SHOW_PROVIDERS_MENU: &str = "CAN_SHOW_PROVIDERS_MENU";
    pub const SHOW_HOME_DASHBOARDS: &str = "CAN_SHOW_HOME_DASHBOARDS";
    pub const SHOW_HOME_DEFAULT: &str = "CAN_SHOW_HOME_DEFAULT";
    pub const UPDATE_PROFILE: &str = "CAN_UPDATE_PROFILE";
    pub const SHOW_DIAGRAM_UML: &str = "CAN_SHOW_DIAGRAM_UML";
}

/// Capabilities that are not derived from an entity, with their descriptions.
pub const FIXED_CAPABILITIES: &[(&str, &str)] = &[
    (fixed::LIST_CLIENTS, "List the registered clients"),
    (fixed::LIST_PROVIDERS, "List the registered providers"),
    (fixed::UPDATE_USER_PROFILE, "Update the profile of a user"),
    (fixed::DOWNLOAD_DOCUMENT, "Download documents"),
    (fixed::PREVIEW_DOCUMENT, "Preview documents"),
    (fixed::SHOW_APPOINTMENTS_MENU, "Show the appointments menu"),
    (fixed::SHOW_MESSAGES_MENU, "Show the messages menu"),
    (fixed::SHOW_DOCUMENTS_MENU, "Show the documents menu"),
    (fixed::SHOW_SERVICES_MENU, "Show the services menu"),
    (fixed::SHOW_CLIENTS_MENU, "Show the clients menu"),
    (fixed::SHOW_PROVIDERS_MENU, "Show the providers menu"),
    (fixed::SHOW_HOME_DASHBOARDS, "Show the home page dashboards"),
    (fixed::SHOW_HOME_DEFAULT, "Show the default home page"),
    (fixed::UPDATE_PROFILE, "Update one's own profile"),
    (fixed::SHOW_DIAGRAM_UML, "Show the system UML diagrams"),
];

/// Default capability set of a role type.
pub struct RoleTypeDefaults {
    pub role_type: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

pub const ROLE_DEFAULTS: &[RoleTypeDefaults] = &[
    RoleTypeDefaults {
        role_type: RoleType::CLIENT,
        label: "Client Permissions",
        description: "Capabilities granted to clients booking services",
        capabilities: &[
            fixed::SHOW_APPOINTMENTS_MENU,
            fixed::SHOW_MESSAGES_MENU,
            fixed::SHOW_CLIENTS_MENU,
            fixed::SHOW_HOME_DEFAULT,
            fixed::UPDATE_PROFILE,
            fixed::PREVIEW_DOCUMENT,
            "appointments.list_appointment",
            "appointments.retrieve_appointment",
            "appointments.create_appointment",
            "appointments.update_appointment",
            "messages.list_message",
            "messages.create_message",
        ],
    },
    RoleTypeDefaults {
        role_type: RoleType::PROVIDER,
        label: "Provider Permissions",
        description: "Capabilities granted to service providers",
        capabilities: &[
            fixed::SHOW_APPOINTMENTS_MENU,
            fixed::SHOW_MESSAGES_MENU,
            fixed::SHOW_DOCUMENTS_MENU,
            fixed::SHOW_SERVICES_MENU,
            fixed::SHOW_PROVIDERS_MENU,
            fixed::SHOW_HOME_DASHBOARDS,
            fixed::UPDATE_PROFILE,
            fixed::SHOW_DIAGRAM_UML,
            fixed::DOWNLOAD_DOCUMENT,
            fixed::PREVIEW_DOCUMENT,
            "appointments.list_appointment",
            "appointments.retrieve_appointment",
            "appointments.update_appointment",
            "appointments.partial_update_appointment",
            "services.list_service",
            "services.create_service",
            "services.update_service",
            "messages.list_message",
            "messages.create_message",
        ],
    },
];
