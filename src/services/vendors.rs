//! Vendor discovery and vendor profile editing.

use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::db::categories as category_db;
use crate::db::portfolios as portfolio_db;
use crate::db::profiles as profile_db;
use crate::db::vendors as vendor_db;
use crate::errors::{AppError, AppResult};
use crate::models::portfolios::PortfolioWithImages;
use crate::models::profiles::{self, Roles};
use crate::models::vendor_profiles::{
    self, UpdateVendorProfile, VendorDetail, VendorFilter, VendorSummary,
};

/// Approved vendors matching the filter, ordered by business name.
///
/// The category filter is resolved to vendor IDs and pushed into the main
/// query. Name and service-area matching run over the returned rows because
/// `service_areas` is a JSON column; that in-memory pass is the scaling limit
/// to revisit before paginating this list.
pub async fn discover_vendors<C>(db: &C, filter: &VendorFilter) -> AppResult<Vec<VendorSummary>>
where
    C: sea_orm::ConnectionTrait,
{
    let only_ids = match filter.category.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => {
            match category_db::get_category_by_slug(db, &slug.to_lowercase()).await? {
                Some(category) => Some(category_db::get_vendor_ids_in_category(db, category.id).await?),
                None => return Ok(Vec::new()),
            }
        }
        _ => None,
    };

    let vendors: Vec<vendor_profiles::Model> = vendor_db::get_approved_vendors(db, only_ids)
        .await?
        .into_iter()
        .filter(|vendor| matches_filter(vendor, filter))
        .collect();

    let ids = vendors.iter().map(|v| v.id).collect();
    let mut categories = category_db::get_categories_for_vendors(db, ids).await?;

    Ok(vendors
        .into_iter()
        .map(|vendor| VendorSummary {
            categories: categories.remove(&vendor.id).unwrap_or_default(),
            vendor,
        })
        .collect())
}

/// Name substring and service-area checks (both case-insensitive). Blank filters match.
pub fn matches_filter(vendor: &vendor_profiles::Model, filter: &VendorFilter) -> bool {
    if let Some(search) = filter.search.as_deref().map(str::trim) {
        if !search.is_empty()
            && !vendor
                .business_name
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }
    }

    if let Some(city) = filter.city.as_deref().map(str::trim) {
        if !city.is_empty() && !vendor.service_areas.contains(city) {
            return false;
        }
    }

    true
}

/// Vendor page: profile, categories and portfolio.
///
/// Vendors that are not approved are only visible to themselves.
pub async fn get_vendor_detail(
    db: &DatabaseConnection,
    viewer: &profiles::Model,
    vendor_id: Uuid,
) -> AppResult<VendorDetail> {
    let vendor = visible_vendor(db, viewer, vendor_id).await?;

    let profile = profile_db::get_profile_by_id(db, vendor_id).await?;
    let mut categories = category_db::get_categories_for_vendors(db, vec![vendor_id]).await?;
    let portfolios = portfolio_db::get_portfolios_with_images(db, vendor_id).await?;

    Ok(VendorDetail {
        summary: VendorSummary {
            categories: categories.remove(&vendor_id).unwrap_or_default(),
            vendor,
        },
        full_name: profile.as_ref().and_then(|p| p.full_name.clone()),
        avatar_url: profile.and_then(|p| p.avatar_url),
        portfolios,
    })
}

/// A vendor's portfolio entries, under the same visibility rule as the vendor page.
pub async fn get_vendor_portfolios(
    db: &DatabaseConnection,
    viewer: &profiles::Model,
    vendor_id: Uuid,
) -> AppResult<Vec<PortfolioWithImages>> {
    let vendor = visible_vendor(db, viewer, vendor_id).await?;
    Ok(portfolio_db::get_portfolios_with_images(db, vendor.id).await?)
}

async fn visible_vendor(
    db: &DatabaseConnection,
    viewer: &profiles::Model,
    vendor_id: Uuid,
) -> AppResult<vendor_profiles::Model> {
    vendor_db::get_vendor_by_id(db, vendor_id)
        .await?
        .filter(|v| v.is_approved() || v.id == viewer.id)
        .ok_or_else(|| AppError::not_found("Vendor", vendor_id))
}

/// Split the wanted category set against the current one into (to_add, to_remove).
pub fn diff_category_sets(current: &[Uuid], wanted: &[Uuid]) -> (Vec<Uuid>, Vec<Uuid>) {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let wanted_set: HashSet<Uuid> = wanted.iter().copied().collect();

    let mut to_add = Vec::new();
    let mut seen = HashSet::new();
    for id in wanted {
        if !current_set.contains(id) && seen.insert(*id) {
            to_add.push(*id);
        }
    }

    let to_remove = current
        .iter()
        .copied()
        .filter(|id| !wanted_set.contains(id))
        .collect();

    (to_add, to_remove)
}

fn clean_service_areas(areas: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    areas
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty() && seen.insert(a.to_lowercase()))
        .collect()
}

/// Edit the caller's vendor profile. A supplied category list replaces the
/// current set; only the differences are written, in the same transaction as
/// the profile fields.
pub async fn update_vendor_profile(
    db: &DatabaseConnection,
    user: &profiles::Model,
    input: UpdateVendorProfile,
) -> AppResult<VendorSummary> {
    require_role(user, Roles::Vendor, "edit vendor profiles")?;

    let business_name = match input.business_name {
        Some(name) if name.trim().is_empty() => {
            return Err(AppError::validation("Business name cannot be empty"));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };
    let service_areas = input.service_areas.map(clean_service_areas);

    let txn = db.begin().await?;

    let vendor = vendor_db::get_vendor_by_id(&txn, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Vendor", user.id))?;

    if let Some(wanted) = input.category_ids {
        let unique: HashSet<Uuid> = wanted.iter().copied().collect();
        let known = category_db::get_categories_by_ids(&txn, unique.iter().copied().collect()).await?;
        if known.len() != unique.len() {
            return Err(AppError::validation("Unknown service category"));
        }

        let current = category_db::get_category_ids_for_vendor(&txn, vendor.id).await?;
        let (to_add, to_remove) = diff_category_sets(&current, &wanted);
        category_db::delete_vendor_categories(&txn, vendor.id, to_remove).await?;
        category_db::insert_vendor_categories(&txn, vendor.id, &to_add).await?;
    }

    let vendor =
        vendor_db::update_vendor_fields(&txn, vendor, business_name, input.bio, service_areas)
            .await?;
    let mut categories = category_db::get_categories_for_vendors(&txn, vec![vendor.id]).await?;

    txn.commit().await?;

    tracing::info!(vendor_id = %vendor.id, "Vendor profile updated");

    Ok(VendorSummary {
        categories: categories.remove(&vendor.id).unwrap_or_default(),
        vendor,
    })
}
