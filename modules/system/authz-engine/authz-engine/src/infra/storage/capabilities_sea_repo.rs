use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use authz_engine_sdk::Capability;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::domain::error::DomainError;
use crate::domain::repos::CapabilitiesRepository;

use super::INSERT_CHUNK;
use super::entity::{capability, principal_capability, role_capability};

#[derive(Debug, Clone, Copy, Default)]
pub struct OrmCapabilitiesRepository;

impl OrmCapabilitiesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilitiesRepository for OrmCapabilitiesRepository {
    async fn load_all<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<BTreeMap<String, String>, DomainError> {
        let rows = capability::Entity::find().all(conn).await?;
        Ok(rows.into_iter().map(|m| (m.name, m.description)).collect())
    }

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Capability>, DomainError> {
        let rows = capability::Entity::find()
            .order_by_asc(capability::Column::Name)
            .all(conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|m| Capability {
                name: m.name,
                description: m.description,
            })
            .collect())
    }

    async fn all_names<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<BTreeSet<String>, DomainError> {
        let names = capability::Entity::find()
            .select_only()
            .column(capability::Column::Name)
            .into_tuple::<String>()
            .all(conn)
            .await?;
        Ok(names.into_iter().collect())
    }

    async fn existing<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, DomainError> {
        if names.is_empty() {
            return Ok(BTreeSet::new());
        }
        let found = capability::Entity::find()
            .select_only()
            .column(capability::Column::Name)
            .filter(capability::Column::Name.is_in(names.iter().map(String::as_str)))
            .into_tuple::<String>()
            .all(conn)
            .await?;
        Ok(found.into_iter().collect())
    }

    async fn exists<C: ConnectionTrait>(&self, conn: &C, name: &str) -> Result<bool, DomainError> {
        Ok(capability::Entity::find_by_id(name.to_owned())
            .one(conn)
            .await?
            .is_some())
    }

    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        capabilities: &BTreeMap<String, String>,
    ) -> Result<(), DomainError> {
        let rows: Vec<capability::ActiveModel> = capabilities
            .iter()
            .map(|(name, description)| capability::ActiveModel {
                name: ActiveValue::Set(name.clone()),
                description: ActiveValue::Set(description.clone()),
            })
            .collect();

        for chunk in rows.chunks(INSERT_CHUNK) {
            capability::Entity::insert_many(chunk.to_vec())
                .exec_without_returning(conn)
                .await?;
        }
        Ok(())
    }

    async fn update_descriptions<C: ConnectionTrait>(
        &self,
        conn: &C,
        capabilities: &BTreeMap<String, String>,
    ) -> Result<(), DomainError> {
        for (name, description) in capabilities {
            capability::Entity::update_many()
                .col_expr(
                    capability::Column::Description,
                    Expr::value(description.as_str()),
                )
                .filter(capability::Column::Name.eq(name.as_str()))
                .exec(conn)
                .await?;
        }
        Ok(())
    }

    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<u64, DomainError> {
        if names.is_empty() {
            return Ok(0);
        }
        let res = capability::Entity::delete_many()
            .filter(capability::Column::Name.is_in(names.iter().map(String::as_str)))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    async fn referenced<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<BTreeSet<String>, DomainError> {
        if names.is_empty() {
            return Ok(BTreeSet::new());
        }

        let by_roles = role_capability::Entity::find()
            .select_only()
            .column(role_capability::Column::CapabilityName)
            .filter(
                role_capability::Column::CapabilityName
                    .is_in(names.iter().map(String::as_str)),
            )
            .distinct()
            .into_tuple::<String>()
            .all(conn)
            .await?;

        let by_principals = principal_capability::Entity::find()
            .select_only()
            .column(principal_capability::Column::CapabilityName)
            .filter(
                principal_capability::Column::CapabilityName
                    .is_in(names.iter().map(String::as_str)),
            )
            .distinct()
            .into_tuple::<String>()
            .all(conn)
            .await?;

        Ok(by_roles.into_iter().chain(by_principals).collect())
    }

    async fn unlink<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<u64, DomainError> {
        if names.is_empty() {
            return Ok(0);
        }

        let roles = role_capability::Entity::delete_many()
            .filter(
                role_capability::Column::CapabilityName
                    .is_in(names.iter().map(String::as_str)),
            )
            .exec(conn)
            .await?;

        let principals = principal_capability::Entity::delete_many()
            .filter(
                principal_capability::Column::CapabilityName
                    .is_in(names.iter().map(String::as_str)),
            )
            .exec(conn)
            .await?;

        Ok(roles.rows_affected + principals.rows_affected)
    }
}
