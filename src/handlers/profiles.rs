use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles as profile_db;
use crate::errors::AppError;
use crate::models::client_profiles::UpdateClientProfile;
use crate::models::profiles::{Roles, UpdateProfile};

/// PUT /api/profiles/me — update name, phone and avatar.
pub async fn update_me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, AppError> {
    let updated = profile_db::update_profile(db.get_ref(), user.id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/clients/me — update where the client lives and where they are building.
pub async fn update_client(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateClientProfile>,
) -> Result<HttpResponse, AppError> {
    require_role(&user.0, Roles::Client, "edit client profiles")?;

    let updated =
        profile_db::update_client_profile(db.get_ref(), user.id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
