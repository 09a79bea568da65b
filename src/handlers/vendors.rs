use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData, keys};
use crate::errors::AppError;
use crate::models::projects::QuoteRequest;
use crate::models::vendor_profiles::{UpdateVendorProfile, VendorFilter};
use crate::services::{quotes as quote_service, vendors as vendor_service};

use super::cache_ref;

/// GET /api/vendors?search=&city=&category= — approved vendors matching every given filter.
pub async fn discover(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    query: web::Query<VendorFilter>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner();
    let key = keys::vendor_list(&filter.cache_fragment());

    let vendors = cache::cached(
        cache_ref(&cache),
        &key,
        |c| c.vendor_list_ttl,
        || vendor_service::discover_vendors(db.get_ref(), &filter),
    )
    .await?;

    Ok(HttpResponse::Ok().json(vendors))
}

/// GET /api/vendors/{id} — vendor page with categories and portfolio.
pub async fn get_vendor(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let detail = vendor_service::get_vendor_detail(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/vendors/{id}/portfolios
pub async fn get_vendor_portfolios(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let portfolios =
        vendor_service::get_vendor_portfolios(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(portfolios))
}

/// PUT /api/vendors/me — edit the caller's business profile and categories.
pub async fn update_me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: Option<web::Data<CacheData>>,
    body: web::Json<UpdateVendorProfile>,
) -> Result<HttpResponse, AppError> {
    let summary =
        vendor_service::update_vendor_profile(db.get_ref(), &user.0, body.into_inner()).await?;

    cache::invalidate_vendor_lists(cache_ref(&cache)).await;

    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/vendors/{id}/quote-requests — start a project by asking this vendor for a quote.
pub async fn request_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let requested = quote_service::request_quote(
        db.get_ref(),
        &user.0,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(requested))
}
