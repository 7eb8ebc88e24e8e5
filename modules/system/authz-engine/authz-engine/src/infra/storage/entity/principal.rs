use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// An authenticated actor. The id is the subject id from the security context.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "principals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub role_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
    #[sea_orm(has_many = "super::principal_capability::Entity")]
    PrincipalCapability,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::principal_capability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrincipalCapability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
