use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table between vendors and service categories.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_profiles::Entity",
        from = "Column::VendorId",
        to = "super::vendor_profiles::Column::Id"
    )]
    Vendor,
    #[sea_orm(
        belongs_to = "super::service_categories::Entity",
        from = "Column::CategoryId",
        to = "super::service_categories::Column::Id"
    )]
    Category,
}

impl Related<super::vendor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::service_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
