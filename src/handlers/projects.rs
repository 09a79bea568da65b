use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::quotes::QuoteSubmission;
use crate::services::{projects as project_service, quotes as quote_service};

/// GET /api/projects — the caller's projects (posted, quoted on, or assigned).
pub async fn list_projects(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let projects = project_service::list_projects(db.get_ref(), &user.0).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// GET /api/projects/{id} — project with the quotes the caller may see.
pub async fn get_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let detail =
        project_service::get_project_detail(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /api/projects/{id}/quote — the vendor prices (or re-prices) their quote.
pub async fn submit_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<QuoteSubmission>,
) -> Result<HttpResponse, AppError> {
    let quote = quote_service::submit_quote(
        db.get_ref(),
        &user.0,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// POST /api/projects/{id}/cancel
pub async fn cancel_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let project = quote_service::cancel_project(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects/{id}/complete
pub async fn complete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let project =
        quote_service::complete_project(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}
