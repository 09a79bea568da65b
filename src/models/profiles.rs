use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
///
/// A profile's role is chosen at signup and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "vendor")]
    Vendor,
}

impl Roles {
    /// Parse the role a user picked at signup (stored in the auth provider's metadata).
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("vendor") => Roles::Vendor,
            _ => Roles::Client,
        }
    }
}

/// SeaORM entity for the `profiles` table. The id is the Supabase auth user id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub role: Roles,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::client_profiles::Entity")]
    ClientProfile,
    #[sea_orm(has_one = "super::vendor_profiles::Entity")]
    VendorProfile,
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientProfile.def()
    }
}

impl Related<super::vendor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Used internally by the auth extractor to create a profile from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateProfileFromAuth {
    pub id: Uuid,
    pub role: Roles,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Used by `PUT /api/profiles/me`. The role is not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// `GET /api/auth/me` response: the profile plus its role-specific half.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub profile: Model,
    pub client_profile: Option<super::client_profiles::Model>,
    pub vendor_profile: Option<super::vendor_profiles::Model>,
}
