pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_profiles_tables;
mod m20250301_000002_create_service_categories;
mod m20250301_000003_create_portfolios_tables;
mod m20250301_000004_create_projects_and_quotes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profiles_tables::Migration),
            Box::new(m20250301_000002_create_service_categories::Migration),
            Box::new(m20250301_000003_create_portfolios_tables::Migration),
            Box::new(m20250301_000004_create_projects_and_quotes::Migration),
        ]
    }
}
