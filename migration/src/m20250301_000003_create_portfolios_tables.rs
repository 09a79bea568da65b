use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `portfolios` table and its columns.
#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    VendorId,
    ProjectName,
    Description,
    Location,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PortfolioImages {
    Table,
    Id,
    PortfolioId,
    ImageUrl,
    StoragePath,
    DisplayOrder,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Portfolios::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Portfolios::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Portfolios::ProjectName).string().not_null())
                    .col(ColumnDef::new(Portfolios::Description).text().null())
                    .col(ColumnDef::new(Portfolios::Location).string().null())
                    .col(
                        ColumnDef::new(Portfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolios_vendor_id")
                            .from(Portfolios::Table, Portfolios::VendorId)
                            .to(VendorProfiles::Table, VendorProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioImages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioImages::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioImages::ImageUrl).text().not_null())
                    .col(ColumnDef::new(PortfolioImages::StoragePath).string().not_null())
                    .col(
                        ColumnDef::new(PortfolioImages::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PortfolioImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_images_portfolio_id")
                            .from(PortfolioImages::Table, PortfolioImages::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_vendor_id")
                    .table(Portfolios::Table)
                    .col(Portfolios::VendorId)
                    .to_owned(),
            )
            .await?;

        // Images are always read per portfolio in display order.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_images_portfolio_order")
                    .table(PortfolioImages::Table)
                    .col(PortfolioImages::PortfolioId)
                    .col(PortfolioImages::DisplayOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await
    }
}
