use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "seeking_quotes")]
    SeekingQuotes,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    /// Set once a quote is accepted.
    pub vendor_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_profiles::Entity",
        from = "Column::ClientId",
        to = "super::client_profiles::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::vendor_profiles::Entity",
        from = "Column::VendorId",
        to = "super::vendor_profiles::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/vendors/{vendor_id}/quote-requests`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub project_name: String,
    pub location: String,
    pub description: String,
}

/// A quote as shown on the project page, with the vendor's business name.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: super::quotes::Model,
    pub business_name: Option<String>,
}

/// `GET /api/projects/{id}` response.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Model,
    pub quotes: Vec<QuoteView>,
    pub accepted_quote_id: Option<Uuid>,
}
