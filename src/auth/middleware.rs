use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::{self, TokenVerifier};
use crate::db::profiles::find_or_create_from_auth;
use crate::errors::AppError;
use crate::models::profiles::{self, Roles};

/// The caller's profile, resolved once per request from the bearer token.
///
/// The profile (and its client/vendor half) is created the first time a new
/// auth user reaches the API.
pub struct AuthenticatedUser(pub profiles::Model);

impl AuthenticatedUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }

    pub fn role(&self) -> Roles {
        self.0.role
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Unauthorized("Authorization header must be: Bearer <token>".into())
            })?;

            // 2. Validate the token.
            let verifier = req
                .app_data::<web::Data<TokenVerifier>>()
                .ok_or_else(|| AppError::Internal("Token verifier not configured".into()))?;

            let claims = jwt::validate_token(token, verifier.get_ref())
                .await
                .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;

            let new_profile = claims.to_new_profile().map_err(AppError::Unauthorized)?;

            // 3. Find or create the profile.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::Internal("Database not configured".into()))?;

            let profile = find_or_create_from_auth(db.get_ref(), new_profile).await?;

            Ok(AuthenticatedUser(profile))
        })
    }
}
