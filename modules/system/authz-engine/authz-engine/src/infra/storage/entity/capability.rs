use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "capabilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_capability::Entity")]
    RoleCapability,
    #[sea_orm(has_many = "super::principal_capability::Entity")]
    PrincipalCapability,
}

impl Related<super::role_capability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleCapability.def()
    }
}

impl Related<super::principal_capability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrincipalCapability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
