use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `service_categories` reference table (seeded by migration).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vendor_categories::Entity")]
    VendorCategories,
}

impl Related<super::vendor_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
