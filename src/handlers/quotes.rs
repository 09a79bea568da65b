use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::quotes::SimulatedPayment;
use crate::services::{projects as project_service, quotes as quote_service};

/// GET /api/quotes/{id}
pub async fn get_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let quote = project_service::get_quote(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// GET /api/quotes/{id}/payment-summary — amount, 5% platform fee and total.
pub async fn payment_summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let summary =
        quote_service::payment_summary(db.get_ref(), &user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/quotes/{id}/accept — the client accepts after the (simulated) payment step.
pub async fn accept_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    payment: Option<web::Json<SimulatedPayment>>,
) -> Result<HttpResponse, AppError> {
    let quote_id = path.into_inner();
    if let Some(payment) = payment {
        tracing::debug!(
            %quote_id,
            card_last4 = payment.card_last4.as_deref().unwrap_or(""),
            "Simulated payment received"
        );
    }

    let accepted = quote_service::accept_quote(db.get_ref(), &user.0, quote_id).await?;
    Ok(HttpResponse::Ok().json(accepted))
}
