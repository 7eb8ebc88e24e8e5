use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{PrincipalRecord, PrincipalsRepository};

use super::INSERT_CHUNK;
use super::entity::{principal, principal_capability, role};

#[derive(Debug, Clone, Copy, Default)]
pub struct OrmPrincipalsRepository;

impl OrmPrincipalsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl From<principal::Model> for PrincipalRecord {
    fn from(m: principal::Model) -> Self {
        Self {
            id: m.id,
            role_id: m.role_id,
        }
    }
}

#[async_trait]
impl PrincipalsRepository for OrmPrincipalsRepository {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        role_id: Option<Uuid>,
        now: OffsetDateTime,
    ) -> Result<PrincipalRecord, DomainError> {
        let model = principal::ActiveModel {
            id: ActiveValue::Set(id),
            role_id: ActiveValue::Set(role_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        principal::Entity::insert(model)
            .exec_without_returning(conn)
            .await?;
        Ok(PrincipalRecord { id, role_id })
    }

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<PrincipalRecord>, DomainError> {
        Ok(principal::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(Into::into))
    }

    async fn set_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        role_id: Option<Uuid>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        principal::Entity::update_many()
            .col_expr(principal::Column::RoleId, Expr::value(role_id))
            .col_expr(principal::Column::UpdatedAt, Expr::value(now))
            .filter(principal::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    async fn detach_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        now: OffsetDateTime,
    ) -> Result<u64, DomainError> {
        let res = principal::Entity::update_many()
            .col_expr(principal::Column::RoleId, Expr::value(Option::<Uuid>::None))
            .col_expr(principal::Column::UpdatedAt, Expr::value(now))
            .filter(principal::Column::RoleId.eq(role_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    async fn list_with_role_type<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<(Uuid, String)>, DomainError> {
        let rows = principal::Entity::find()
            .filter(principal::Column::RoleId.is_not_null())
            .find_also_related(role::Entity)
            .all(conn)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(p, r)| r.map(|r| (p.id, r.role_type)))
            .collect())
    }

    async fn capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<BTreeSet<String>, DomainError> {
        let names = principal_capability::Entity::find()
            .select_only()
            .column(principal_capability::Column::CapabilityName)
            .filter(principal_capability::Column::PrincipalId.eq(id))
            .into_tuple::<String>()
            .all(conn)
            .await?;
        Ok(names.into_iter().collect())
    }

    async fn has_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError> {
        Ok(principal_capability::Entity::find_by_id((id, name.to_owned()))
            .one(conn)
            .await?
            .is_some())
    }

    async fn add_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        names: &BTreeSet<String>,
    ) -> Result<u64, DomainError> {
        let rows: Vec<principal_capability::ActiveModel> = names
            .iter()
            .map(|name| principal_capability::ActiveModel {
                principal_id: ActiveValue::Set(id),
                capability_name: ActiveValue::Set(name.clone()),
            })
            .collect();

        let mut written = 0;
        for chunk in rows.chunks(INSERT_CHUNK) {
            written += principal_capability::Entity::insert_many(chunk.to_vec())
                .on_conflict(
                    OnConflict::columns([
                        principal_capability::Column::PrincipalId,
                        principal_capability::Column::CapabilityName,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
        }
        Ok(written)
    }

    async fn remove_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError> {
        let res = principal_capability::Entity::delete_by_id((id, name.to_owned()))
            .exec(conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn clear_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<u64, DomainError> {
        let res = principal_capability::Entity::delete_many()
            .filter(principal_capability::Column::PrincipalId.eq(id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
