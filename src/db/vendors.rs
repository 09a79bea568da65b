use sea_orm::*;
use uuid::Uuid;

use crate::models::vendor_profiles::{self, ServiceAreas, VerificationStatus};

/// Fetch a single vendor profile by ID (any verification status).
pub async fn get_vendor_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<vendor_profiles::Model>, DbErr> {
    vendor_profiles::Entity::find_by_id(id).one(db).await
}

/// Fetch approved vendors ordered by business name, optionally restricted to a set of IDs.
pub async fn get_approved_vendors<C: ConnectionTrait>(
    db: &C,
    only_ids: Option<Vec<Uuid>>,
) -> Result<Vec<vendor_profiles::Model>, DbErr> {
    let mut query = vendor_profiles::Entity::find().filter(
        vendor_profiles::Column::VerificationStatus.eq(VerificationStatus::Approved),
    );

    if let Some(ids) = only_ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(vendor_profiles::Column::Id.is_in(ids));
    }

    query
        .order_by_asc(vendor_profiles::Column::BusinessName)
        .all(db)
        .await
}

/// Business names for a set of vendors, as (id, name) pairs.
pub async fn get_business_names<C: ConnectionTrait>(
    db: &C,
    ids: Vec<Uuid>,
) -> Result<Vec<(Uuid, String)>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let vendors = vendor_profiles::Entity::find()
        .filter(vendor_profiles::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(vendors.into_iter().map(|v| (v.id, v.business_name)).collect())
}

/// Update the editable fields of a vendor profile. Categories are handled separately.
pub async fn update_vendor_fields<C: ConnectionTrait>(
    db: &C,
    vendor: vendor_profiles::Model,
    business_name: Option<String>,
    bio: Option<String>,
    service_areas: Option<Vec<String>>,
) -> Result<vendor_profiles::Model, DbErr> {
    let mut active: vendor_profiles::ActiveModel = vendor.into();

    if let Some(business_name) = business_name {
        active.business_name = Set(business_name);
    }
    if let Some(bio) = bio {
        active.bio = Set(Some(bio));
    }
    if let Some(service_areas) = service_areas {
        active.service_areas = Set(ServiceAreas(service_areas));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
