use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `portfolios` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub project_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_profiles::Entity",
        from = "Column::VendorId",
        to = "super::vendor_profiles::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::portfolio_images::Entity")]
    Images,
}

impl Related<super::vendor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::portfolio_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePortfolio {
    pub project_name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePortfolio {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// A portfolio with its images ordered by `display_order` (the first one is the cover).
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioWithImages {
    #[serde(flatten)]
    pub portfolio: Model,
    pub images: Vec<super::portfolio_images::Model>,
}

impl PortfolioWithImages {
    pub fn cover(&self) -> Option<&super::portfolio_images::Model> {
        self.images.first()
    }
}
