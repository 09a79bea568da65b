use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{service_categories, vendor_categories};

/// Fetch the full category reference list, ordered by name.
pub async fn get_all_categories<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<service_categories::Model>, DbErr> {
    service_categories::Entity::find()
        .order_by_asc(service_categories::Column::Name)
        .all(db)
        .await
}

pub async fn get_category_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<Option<service_categories::Model>, DbErr> {
    service_categories::Entity::find()
        .filter(service_categories::Column::Slug.eq(slug))
        .one(db)
        .await
}

/// Fetch the categories with the given IDs (unknown IDs are simply absent).
pub async fn get_categories_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<Uuid>,
) -> Result<Vec<service_categories::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    service_categories::Entity::find()
        .filter(service_categories::Column::Id.is_in(ids))
        .all(db)
        .await
}

/// IDs of every vendor tagged with the given category.
pub async fn get_vendor_ids_in_category<C: ConnectionTrait>(
    db: &C,
    category_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    let rows = vendor_categories::Entity::find()
        .filter(vendor_categories::Column::CategoryId.eq(category_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|row| row.vendor_id).collect())
}

/// Category IDs currently attached to a vendor.
pub async fn get_category_ids_for_vendor<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    let rows = vendor_categories::Entity::find()
        .filter(vendor_categories::Column::VendorId.eq(vendor_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|row| row.category_id).collect())
}

/// Categories for many vendors in two queries, as a vendor_id -> categories map.
pub async fn get_categories_for_vendors<C: ConnectionTrait>(
    db: &C,
    vendor_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<service_categories::Model>>, DbErr> {
    if vendor_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = vendor_categories::Entity::find()
        .filter(vendor_categories::Column::VendorId.is_in(vendor_ids))
        .all(db)
        .await?;

    let category_ids: Vec<Uuid> = links.iter().map(|l| l.category_id).collect();
    let categories: HashMap<Uuid, service_categories::Model> =
        get_categories_by_ids(db, category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    let mut by_vendor: HashMap<Uuid, Vec<service_categories::Model>> = HashMap::new();
    for link in links {
        if let Some(category) = categories.get(&link.category_id) {
            by_vendor
                .entry(link.vendor_id)
                .or_default()
                .push(category.clone());
        }
    }
    for list in by_vendor.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(by_vendor)
}

/// Attach categories to a vendor.
pub async fn insert_vendor_categories<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), DbErr> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows = category_ids.iter().map(|category_id| vendor_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor_id),
        category_id: Set(*category_id),
    });

    vendor_categories::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Detach categories from a vendor. Returns the number of links removed.
pub async fn delete_vendor_categories<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    category_ids: Vec<Uuid>,
) -> Result<u64, DbErr> {
    if category_ids.is_empty() {
        return Ok(0);
    }

    let result = vendor_categories::Entity::delete_many()
        .filter(vendor_categories::Column::VendorId.eq(vendor_id))
        .filter(vendor_categories::Column::CategoryId.is_in(category_ids))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
