//! Shared setup for the database-backed integration tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema
//! applied by the migrator.
#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use nests_backend::db::profiles::find_or_create_from_auth;
use nests_backend::models::profiles::{self, CreateProfileFromAuth, Roles};
use nests_backend::models::service_categories;
use nests_backend::models::vendor_profiles::{self, UpdateVendorProfile, VerificationStatus};
use nests_backend::services::vendors::update_vendor_profile;

/// Creates an in-memory SQLite database with every migration applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// A profile as the auth extractor would create it on first sight.
pub async fn create_profile(db: &DatabaseConnection, role: Roles, full_name: &str) -> profiles::Model {
    find_or_create_from_auth(
        db,
        CreateProfileFromAuth {
            id: Uuid::new_v4(),
            role,
            full_name: Some(full_name.to_string()),
            phone: None,
            avatar_url: None,
        },
    )
    .await
    .expect("Failed to create profile")
}

pub async fn create_client(db: &DatabaseConnection, full_name: &str) -> profiles::Model {
    create_profile(db, Roles::Client, full_name).await
}

/// A vendor with a business name, service areas and categories, left pending.
pub async fn create_pending_vendor(
    db: &DatabaseConnection,
    business_name: &str,
    areas: &[&str],
    category_ids: &[Uuid],
) -> profiles::Model {
    let profile = create_profile(db, Roles::Vendor, business_name).await;

    update_vendor_profile(
        db,
        &profile,
        UpdateVendorProfile {
            business_name: Some(business_name.to_string()),
            bio: None,
            service_areas: Some(areas.iter().map(|a| a.to_string()).collect()),
            category_ids: Some(category_ids.to_vec()),
        },
    )
    .await
    .expect("Failed to set up vendor profile");

    profile
}

/// Same as `create_pending_vendor`, then approved (approval happens out of band).
pub async fn create_approved_vendor(
    db: &DatabaseConnection,
    business_name: &str,
    areas: &[&str],
    category_ids: &[Uuid],
) -> profiles::Model {
    let profile = create_pending_vendor(db, business_name, areas, category_ids).await;
    set_verification(db, profile.id, VerificationStatus::Approved).await;
    profile
}

pub async fn set_verification(db: &DatabaseConnection, vendor_id: Uuid, status: VerificationStatus) {
    vendor_profiles::ActiveModel {
        id: Set(vendor_id),
        verification_status: Set(status),
        ..Default::default()
    }
    .update(db)
    .await
    .expect("Failed to update verification status");
}

/// A category with a slug no seeded category uses.
pub async fn create_category(db: &DatabaseConnection, name: &str, slug: &str) -> service_categories::Model {
    service_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
    }
    .insert(db)
    .await
    .expect("Failed to create category")
}
