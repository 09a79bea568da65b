use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ServiceCategories {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
enum VendorCategories {
    Table,
    Id,
    VendorId,
    CategoryId,
}

#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
}

/// Reference list shown in vendor profiles and discovery filters.
const CATEGORIES: &[(&str, &str)] = &[
    ("Architecture & Design", "architecture"),
    ("Borehole Drilling", "borehole-drilling"),
    ("Building Contractors", "building-contractors"),
    ("Carpentry", "carpentry"),
    ("Electrical", "electrical"),
    ("Interior Design", "interior-design"),
    ("Landscaping", "landscaping"),
    ("Painting", "painting"),
    ("Plumbing", "plumbing"),
    ("Quantity Surveying", "quantity-surveying"),
    ("Roofing", "roofing"),
    ("Solar Installation", "solar-installation"),
    ("Tiling & Flooring", "tiling-flooring"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(ServiceCategories::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VendorCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VendorCategories::VendorId).uuid().not_null())
                    .col(ColumnDef::new(VendorCategories::CategoryId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_categories_vendor_id")
                            .from(VendorCategories::Table, VendorCategories::VendorId)
                            .to(VendorProfiles::Table, VendorProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_categories_category_id")
                            .from(VendorCategories::Table, VendorCategories::CategoryId)
                            .to(ServiceCategories::Table, ServiceCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A vendor lists each category once; also serves lookups by vendor.
        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_categories_unique_vendor_category")
                    .table(VendorCategories::Table)
                    .col(VendorCategories::VendorId)
                    .col(VendorCategories::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Discovery resolves a category to its vendors.
        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_categories_category_id")
                    .table(VendorCategories::Table)
                    .col(VendorCategories::CategoryId)
                    .to_owned(),
            )
            .await?;

        for (name, slug) in CATEGORIES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(ServiceCategories::Table)
                        .columns([
                            ServiceCategories::Id,
                            ServiceCategories::Name,
                            ServiceCategories::Slug,
                        ])
                        .values_panic([Uuid::new_v4().into(), (*name).into(), (*slug).into()])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceCategories::Table).to_owned())
            .await
    }
}
