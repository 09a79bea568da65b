use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `profiles` table. `id` is the auth provider's user id.
#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Role,
    FullName,
    Phone,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClientProfiles {
    Table,
    Id,
    CurrentResidence,
    TargetCity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
    BusinessName,
    Bio,
    ServiceAreas,
    VerificationStatus,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::Role).string().not_null())
                    .col(ColumnDef::new(Profiles::FullName).string().null())
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).text().null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Both role tables share the profile's id (1:1).
        manager
            .create_table(
                Table::create()
                    .table(ClientProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClientProfiles::CurrentResidence).string().null())
                    .col(ColumnDef::new(ClientProfiles::TargetCity).string().null())
                    .col(
                        ColumnDef::new(ClientProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_profiles_id")
                            .from(ClientProfiles::Table, ClientProfiles::Id)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VendorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VendorProfiles::BusinessName).string().not_null())
                    .col(ColumnDef::new(VendorProfiles::Bio).text().null())
                    .col(ColumnDef::new(VendorProfiles::ServiceAreas).json_binary().not_null())
                    .col(
                        ColumnDef::new(VendorProfiles::VerificationStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_profiles_id")
                            .from(VendorProfiles::Table, VendorProfiles::Id)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Discovery only ever lists approved vendors.
        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_profiles_verification_status")
                    .table(VendorProfiles::Table)
                    .col(VendorProfiles::VerificationStatus)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClientProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}
