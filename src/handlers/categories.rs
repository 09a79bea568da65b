use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::db::categories as category_db;
use crate::errors::AppError;

use super::cache_ref;

/// GET /api/categories — every service category, by name.
pub async fn list_categories(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
) -> Result<HttpResponse, AppError> {
    let categories = cache::cached(
        cache_ref(&cache),
        &keys::categories(),
        |c| c.categories_ttl,
        || category_db::get_all_categories(db.get_ref()),
    )
    .await?;

    Ok(HttpResponse::Ok().json(categories))
}
