use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `portfolio_images` table.
///
/// The bytes live in object storage; only the public URL and the object path are kept here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub portfolio_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    #[serde(skip_serializing)]
    pub storage_path: String,
    /// 0 is the cover image.
    pub display_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::portfolios::Entity",
        from = "Column::PortfolioId",
        to = "super::portfolios::Column::Id"
    )]
    Portfolio,
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Query string of `POST /api/portfolios/{id}/images`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadImageQuery {
    pub file_name: String,
}
