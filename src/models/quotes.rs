use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// One priced row of a quote. `total` is always `quantity * unit_price` rounded to cents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Ordered line items, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

/// SeaORM entity for the `quotes` table. One row per (project, vendor).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub vendor_id: Uuid,
    pub status: QuoteStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub line_items: LineItems,
    #[sea_orm(column_type = "Double", nullable)]
    pub total_amount: Option<f64>,
    pub timeline_days: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::vendor_profiles::Entity",
        from = "Column::VendorId",
        to = "super::vendor_profiles::Column::Id"
    )]
    Vendor,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::vendor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// A line item as typed by the vendor. `total` is optional; when sent it must match.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    pub total: Option<f64>,
}

/// Body of `PUT /api/projects/{id}/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSubmission {
    pub line_items: Vec<LineItemInput>,
    pub timeline_days: Option<i32>,
    pub notes: Option<String>,
    /// Echo of the total the front end displayed; checked, never trusted.
    pub total_amount: Option<f64>,
}

/// Optional body of `POST /api/quotes/{id}/accept`. The payment step is simulated:
/// nothing here is validated or stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulatedPayment {
    pub cardholder_name: Option<String>,
    pub card_last4: Option<String>,
}
