use uuid::Uuid;

/// Identity of the caller, resolved by the authentication layer before any
/// domain code runs.
///
/// The subject id doubles as the principal id in the authorization store.
/// A nil subject id means the request is anonymous.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[allow(clippy::struct_field_names)] // field names are the serialized wire names
pub struct SecurityContext {
    /// Authenticated subject (user or service account).
    subject_id: Uuid,
    /// Optional classification such as "user" or "service".
    subject_type: Option<String>,
    /// Tenant the subject belongs to. Nil for anonymous contexts.
    subject_tenant_id: Uuid,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Context for a request that carried no credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Shorthand for a user context with no tenant information.
    #[must_use]
    pub fn for_subject(subject_id: Uuid) -> Self {
        Self::builder()
            .subject_id(subject_id)
            .subject_type("user")
            .build()
    }

    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        self.subject_type.as_deref()
    }

    #[must_use]
    pub fn subject_tenant_id(&self) -> Uuid {
        self.subject_tenant_id
    }

    /// `true` when the request carries a resolved subject.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.subject_id.is_nil()
    }
}

#[derive(Default)]
#[allow(clippy::struct_field_names)] // mirrors `SecurityContext`
pub struct SecurityContextBuilder {
    subject_id: Option<Uuid>,
    subject_type: Option<String>,
    subject_tenant_id: Option<Uuid>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = Some(subject_type.to_owned());
        self
    }

    #[must_use]
    pub fn subject_tenant_id(mut self, subject_tenant_id: Uuid) -> Self {
        self.subject_tenant_id = Some(subject_tenant_id);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_type: self.subject_type,
            subject_tenant_id: self.subject_tenant_id.unwrap_or_default(),
        }
    }
}
