use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use authz_engine_sdk::{NewRole, Role, RoleType, RoleUpdate};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::RolesRepository;

use super::INSERT_CHUNK;
use super::entity::{role, role_capability};

#[derive(Debug, Clone, Copy, Default)]
pub struct OrmRolesRepository;

impl OrmRolesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn to_role(model: role::Model, capabilities: Vec<String>) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
        role_type: RoleType::new(model.role_type),
        capabilities,
    }
}

#[async_trait]
impl RolesRepository for OrmRolesRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        new_role: &NewRole,
        now: OffsetDateTime,
    ) -> Result<Role, DomainError> {
        let model = role::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(new_role.name.clone()),
            description: ActiveValue::Set(new_role.description.clone()),
            role_type: ActiveValue::Set(new_role.role_type.as_str().to_owned()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        role::Entity::insert(model)
            .exec_without_returning(conn)
            .await
            .map_err(|e| DomainError::from_role_write(e, &new_role.name))?;

        Ok(Role {
            id,
            name: new_role.name.clone(),
            description: new_role.description.clone(),
            role_type: new_role.role_type.clone(),
            capabilities: Vec::new(),
        })
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Role>, DomainError> {
        let Some(model) = role::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let capabilities = self.capabilities(conn, id).await?;
        Ok(Some(to_role(model, capabilities.into_iter().collect())))
    }

    async fn name_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<bool, DomainError> {
        Ok(role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await?
            .is_some())
    }

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Role>, DomainError> {
        let roles = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await?;

        let mut members: BTreeMap<Uuid, Vec<String>> = BTreeMap::new();
        for link in role_capability::Entity::find()
            .order_by_asc(role_capability::Column::CapabilityName)
            .all(conn)
            .await?
        {
            members
                .entry(link.role_id)
                .or_default()
                .push(link.capability_name);
        }

        Ok(roles
            .into_iter()
            .map(|m| {
                let caps = members.remove(&m.id).unwrap_or_default();
                to_role(m, caps)
            })
            .collect())
    }

    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        update: &RoleUpdate,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let mut query = role::Entity::update_many()
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(id));
        if let Some(name) = &update.name {
            query = query.col_expr(role::Column::Name, Expr::value(name.clone()));
        }
        if let Some(description) = &update.description {
            query = query.col_expr(role::Column::Description, Expr::value(description.clone()));
        }
        if let Some(role_type) = &update.role_type {
            query = query.col_expr(role::Column::RoleType, Expr::value(role_type.as_str()));
        }

        let name = update.name.as_deref().unwrap_or_default();
        query
            .exec(conn)
            .await
            .map_err(|e| DomainError::from_role_write(e, name))?;
        Ok(())
    }

    async fn replace_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        names: &BTreeSet<String>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        role_capability::Entity::delete_many()
            .filter(role_capability::Column::RoleId.eq(id))
            .exec(conn)
            .await?;

        let rows: Vec<role_capability::ActiveModel> = names
            .iter()
            .map(|name| role_capability::ActiveModel {
                role_id: ActiveValue::Set(id),
                capability_name: ActiveValue::Set(name.clone()),
            })
            .collect();
        for chunk in rows.chunks(INSERT_CHUNK) {
            role_capability::Entity::insert_many(chunk.to_vec())
                .exec_without_returning(conn)
                .await?;
        }

        role::Entity::update_many()
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> Result<bool, DomainError> {
        role_capability::Entity::delete_many()
            .filter(role_capability::Column::RoleId.eq(id))
            .exec(conn)
            .await?;
        let res = role::Entity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn has_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError> {
        Ok(role_capability::Entity::find_by_id((id, name.to_owned()))
            .one(conn)
            .await?
            .is_some())
    }

    async fn capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<BTreeSet<String>, DomainError> {
        let names = role_capability::Entity::find()
            .select_only()
            .column(role_capability::Column::CapabilityName)
            .filter(role_capability::Column::RoleId.eq(id))
            .into_tuple::<String>()
            .all(conn)
            .await?;
        Ok(names.into_iter().collect())
    }
}
