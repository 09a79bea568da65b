use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles as profile_db;
use crate::db::vendors as vendor_db;
use crate::errors::AppError;
use crate::models::profiles::{MeResponse, Roles};

/// GET /api/auth/me — the caller's profile with its client or vendor half.
pub async fn me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let (client_profile, vendor_profile) = match user.role() {
        Roles::Client => (
            profile_db::get_client_profile(db.get_ref(), user.id()).await?,
            None,
        ),
        Roles::Vendor => (
            None,
            vendor_db::get_vendor_by_id(db.get_ref(), user.id()).await?,
        ),
    };

    Ok(HttpResponse::Ok().json(MeResponse {
        profile: user.0,
        client_profile,
        vendor_profile,
    }))
}
