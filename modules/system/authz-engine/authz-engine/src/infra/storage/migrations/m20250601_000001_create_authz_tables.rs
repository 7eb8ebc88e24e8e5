use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(capabilities_table()).await?;
        manager.create_table(roles_table()).await?;
        manager.create_table(role_capabilities_table()).await?;
        manager.create_table(principals_table()).await?;
        manager.create_table(principal_capabilities_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_principals_role_id")
                    .table(Principals::Table)
                    .col(Principals::RoleId)
                    .to_owned(),
            )
            .await?;

        // Reverse lookups for reconciliation's reference checks.
        manager
            .create_index(
                Index::create()
                    .name("idx_role_capabilities_capability")
                    .table(RoleCapabilities::Table)
                    .col(RoleCapabilities::CapabilityName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_principal_capabilities_capability")
                    .table(PrincipalCapabilities::Table)
                    .col(PrincipalCapabilities::CapabilityName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PrincipalCapabilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Principals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleCapabilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Capabilities::Table).to_owned())
            .await
    }
}

fn capabilities_table() -> TableCreateStatement {
    Table::create()
        .table(Capabilities::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Capabilities::Name)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Capabilities::Description).text().not_null())
        .to_owned()
}

fn roles_table() -> TableCreateStatement {
    Table::create()
        .table(Roles::Table)
        .if_not_exists()
        .col(ColumnDef::new(Roles::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
        .col(ColumnDef::new(Roles::Description).text().not_null())
        .col(ColumnDef::new(Roles::RoleType).string().not_null())
        .col(
            ColumnDef::new(Roles::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Roles::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

fn role_capabilities_table() -> TableCreateStatement {
    Table::create()
        .table(RoleCapabilities::Table)
        .if_not_exists()
        .col(ColumnDef::new(RoleCapabilities::RoleId).uuid().not_null())
        .col(
            ColumnDef::new(RoleCapabilities::CapabilityName)
                .string()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(RoleCapabilities::RoleId)
                .col(RoleCapabilities::CapabilityName),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_role_capabilities_role")
                .from(RoleCapabilities::Table, RoleCapabilities::RoleId)
                .to(Roles::Table, Roles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_role_capabilities_capability")
                .from(RoleCapabilities::Table, RoleCapabilities::CapabilityName)
                .to(Capabilities::Table, Capabilities::Name)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

/// A deleted role leaves its holders without a role.
fn principals_table() -> TableCreateStatement {
    Table::create()
        .table(Principals::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Principals::Id)
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Principals::RoleId).uuid().null())
        .col(
            ColumnDef::new(Principals::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Principals::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_principals_role")
                .from(Principals::Table, Principals::RoleId)
                .to(Roles::Table, Roles::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn principal_capabilities_table() -> TableCreateStatement {
    Table::create()
        .table(PrincipalCapabilities::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(PrincipalCapabilities::PrincipalId)
                .uuid()
                .not_null(),
        )
        .col(
            ColumnDef::new(PrincipalCapabilities::CapabilityName)
                .string()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(PrincipalCapabilities::PrincipalId)
                .col(PrincipalCapabilities::CapabilityName),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_principal_capabilities_principal")
                .from(
                    PrincipalCapabilities::Table,
                    PrincipalCapabilities::PrincipalId,
                )
                .to(Principals::Table, Principals::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_principal_capabilities_capability")
                .from(
                    PrincipalCapabilities::Table,
                    PrincipalCapabilities::CapabilityName,
                )
                .to(Capabilities::Table, Capabilities::Name)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Capabilities {
    Table,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    RoleType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RoleCapabilities {
    Table,
    RoleId,
    CapabilityName,
}

#[derive(DeriveIden)]
enum Principals {
    Table,
    Id,
    RoleId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PrincipalCapabilities {
    Table,
    PrincipalId,
    CapabilityName,
}
