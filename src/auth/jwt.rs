use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwks::JwksCache;
use crate::models::profiles::{CreateProfileFromAuth, Roles};

/// Supabase JWT claims.
///
/// The `sub` field is the user's UUID in `auth.users`. `user_metadata` holds
/// what the front end passed to `signUp` (role, full name, phone).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The Supabase auth user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role (e.g. "authenticated"), not the marketplace role.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

/// Sign-up metadata.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Marketplace role picked at sign-up: "client" or "vendor".
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn marketplace_role(&self) -> Roles {
        Roles::from_metadata(self.user_metadata.as_ref().and_then(|m| m.role.as_deref()))
    }

    /// Best-effort display name from metadata.
    pub fn full_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    pub fn phone(&self) -> Option<String> {
        self.user_metadata.as_ref().and_then(|m| m.phone.clone())
    }

    /// Best-effort avatar URL from metadata.
    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// The profile to create the first time this user calls the API.
    pub fn to_new_profile(&self) -> Result<CreateProfileFromAuth, String> {
        Ok(CreateProfileFromAuth {
            id: self.user_id()?,
            role: self.marketplace_role(),
            full_name: self.full_name(),
            phone: self.phone(),
            avatar_url: self.avatar_url(),
        })
    }
}

/// How incoming access tokens are verified.
pub enum TokenVerifier {
    /// Asymmetric keys published by the Supabase project.
    Jwks(JwksCache),
    /// Legacy shared HS256 JWT secret.
    Secret(String),
}

/// Validate a Supabase JWT and return the decoded claims.
pub async fn validate_token(token: &str, verifier: &TokenVerifier) -> Result<Claims, String> {
    match verifier {
        TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
        TokenVerifier::Secret(secret) => validate_with_secret(token, secret),
    }
}

/// Validate a token signed with HS256 using the project's JWT secret.
pub fn validate_with_secret(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|td| td.claims)
        .map_err(|e| format!("Token validation failed: {e}"))
}
