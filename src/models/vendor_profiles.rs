use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin-controlled gate: only `Approved` vendors are discoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// City names a vendor works in, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ServiceAreas(pub Vec<String>);

impl ServiceAreas {
    /// Case-insensitive membership test.
    pub fn contains(&self, city: &str) -> bool {
        let city = city.trim();
        self.0.iter().any(|c| c.trim().eq_ignore_ascii_case(city))
    }
}

/// SeaORM entity for the `vendor_profiles` table (1:1 with a vendor profile, same id).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub service_areas: ServiceAreas,
    pub verification_status: VerificationStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_approved(&self) -> bool {
        self.verification_status == VerificationStatus::Approved
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::Id",
        to = "super::profiles::Column::Id"
    )]
    Profile,
    #[sea_orm(has_many = "super::vendor_categories::Entity")]
    VendorCategories,
    #[sea_orm(has_many = "super::portfolios::Entity")]
    Portfolios,
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::vendor_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorCategories.def()
    }
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolios.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `PUT /api/vendors/me`. `category_ids`, when present, replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVendorProfile {
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub service_areas: Option<Vec<String>>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// A discoverable vendor with its categories attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSummary {
    #[serde(flatten)]
    pub vendor: Model,
    pub categories: Vec<super::service_categories::Model>,
}

/// Vendor detail page: summary plus portfolios with their images.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDetail {
    #[serde(flatten)]
    pub summary: VendorSummary,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub portfolios: Vec<super::portfolios::PortfolioWithImages>,
}

/// Query string of `GET /api/vendors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
}

impl VendorFilter {
    /// Stable cache-key fragment for this filter set.
    ///
    /// The normalized values are written as a JSON array, so separators inside
    /// user input cannot make two different filters share a key.
    pub fn cache_fragment(&self) -> String {
        fn norm(v: &Option<String>) -> String {
            v.as_deref().map(|s| s.trim().to_lowercase()).unwrap_or_default()
        }
        serde_json::json!([norm(&self.search), norm(&self.city), norm(&self.category)]).to_string()
    }
}
