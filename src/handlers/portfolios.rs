use actix_web::{HttpRequest, HttpResponse, http::header, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::portfolio_images::UploadImageQuery;
use crate::models::portfolios::{CreatePortfolio, UpdatePortfolio};
use crate::services::portfolios as portfolio_service;
use crate::storage::SupabaseStorage;

/// GET /api/portfolios/{id} — one portfolio entry with its images.
pub async fn get_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item = portfolio_service::get_portfolio(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// POST /api/portfolios — add a past project to the caller's portfolio.
pub async fn create_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreatePortfolio>,
) -> Result<HttpResponse, AppError> {
    let item =
        portfolio_service::create_portfolio(db.get_ref(), &user.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/portfolios/{id}
pub async fn update_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePortfolio>,
) -> Result<HttpResponse, AppError> {
    let item = portfolio_service::update_portfolio(
        db.get_ref(),
        &user.0,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// DELETE /api/portfolios/{id} — removes the entry, its images and their stored files.
pub async fn delete_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<SupabaseStorage>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    portfolio_service::delete_portfolio(db.get_ref(), storage.get_ref(), &user.0, id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Portfolio item {id} deleted"),
    })))
}

/// POST /api/portfolios/{id}/images?file_name=house.jpg — raw image bytes as the body.
pub async fn upload_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<SupabaseStorage>,
    path: web::Path<Uuid>,
    query: web::Query<UploadImageQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let image = portfolio_service::upload_image(
        db.get_ref(),
        storage.get_ref(),
        &user.0,
        path.into_inner(),
        &query.file_name,
        content_type,
        body.to_vec(),
    )
    .await?;

    Ok(HttpResponse::Created().json(image))
}

/// DELETE /api/portfolio-images/{id}
pub async fn delete_image(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<SupabaseStorage>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    portfolio_service::delete_image(db.get_ref(), storage.get_ref(), &user.0, id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Image {id} deleted"),
    })))
}
