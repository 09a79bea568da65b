pub mod categories;
pub mod portfolios;
pub mod profiles;
pub mod projects;
pub mod quotes;
pub mod vendors;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
