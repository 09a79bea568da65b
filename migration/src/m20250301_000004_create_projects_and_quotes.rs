use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    ClientId,
    VendorId,
    Name,
    Description,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
    ProjectId,
    VendorId,
    Status,
    LineItems,
    TotalAmount,
    TimelineDays,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProfiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Projects::VendorId).uuid().null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Location).string().not_null())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string()
                            .not_null()
                            .default("seeking_quotes"),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_client_id")
                            .from(Projects::Table, Projects::ClientId)
                            .to(ClientProfiles::Table, ClientProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_vendor_id")
                            .from(Projects::Table, Projects::VendorId)
                            .to(VendorProfiles::Table, VendorProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Quotes::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Quotes::LineItems).json_binary().not_null())
                    .col(ColumnDef::new(Quotes::TotalAmount).double().null())
                    .col(ColumnDef::new(Quotes::TimelineDays).integer().null())
                    .col(ColumnDef::new(Quotes::Notes).text().null())
                    .col(
                        ColumnDef::new(Quotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_project_id")
                            .from(Quotes::Table, Quotes::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_vendor_id")
                            .from(Quotes::Table, Quotes::VendorId)
                            .to(VendorProfiles::Table, VendorProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One quote per vendor per project.
        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_unique_project_vendor")
                    .table(Quotes::Table)
                    .col(Quotes::ProjectId)
                    .col(Quotes::VendorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_vendor_id")
                    .table(Quotes::Table)
                    .col(Quotes::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_client_id")
                    .table(Projects::Table)
                    .col(Projects::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_vendor_id")
                    .table(Projects::Table)
                    .col(Projects::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}
