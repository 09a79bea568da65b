use sea_orm::*;
use uuid::Uuid;

use crate::models::client_profiles::{self, UpdateClientProfile};
use crate::models::profiles::{self, CreateProfileFromAuth, Roles, UpdateProfile};
use crate::models::vendor_profiles::{self, ServiceAreas, VerificationStatus};

/// Find the caller's profile, or create it (with its client/vendor half) from JWT claims.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateProfileFromAuth,
) -> Result<profiles::Model, DbErr> {
    if let Some(existing) = profiles::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let id = input.id;
    match create_profile(db, input).await {
        Ok(profile) => {
            tracing::info!(profile_id = %profile.id, role = ?profile.role, "Created profile");
            Ok(profile)
        }
        // Two first requests raced; the other one won.
        Err(e) => match profiles::Entity::find_by_id(id).one(db).await? {
            Some(existing) => Ok(existing),
            None => Err(e),
        },
    }
}

async fn create_profile(
    db: &DatabaseConnection,
    input: CreateProfileFromAuth,
) -> Result<profiles::Model, DbErr> {
    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    let business_name = input.full_name.clone().unwrap_or_default();
    let profile = profiles::ActiveModel {
        id: Set(input.id),
        role: Set(input.role),
        full_name: Set(input.full_name),
        phone: Set(input.phone),
        avatar_url: Set(input.avatar_url),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await?;

    match profile.role {
        Roles::Client => {
            client_profiles::ActiveModel {
                id: Set(profile.id),
                current_residence: Set(None),
                target_city: Set(None),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
        Roles::Vendor => {
            vendor_profiles::ActiveModel {
                id: Set(profile.id),
                business_name: Set(business_name),
                bio: Set(None),
                service_areas: Set(ServiceAreas::default()),
                verification_status: Set(VerificationStatus::Pending),
                created_at: Set(now),
                updated_at: Set(None),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(profile)
}

/// Fetch a single profile by ID.
pub async fn get_profile_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(db).await
}

/// Update the caller's own profile. The role never changes.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(full_name) = input.full_name {
        active.full_name = Set(Some(full_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn get_client_profile<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<client_profiles::Model>, DbErr> {
    client_profiles::Entity::find_by_id(id).one(db).await
}

pub async fn update_client_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateClientProfile,
) -> Result<client_profiles::Model, DbErr> {
    let client = client_profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Client profile not found".to_string()))?;

    let mut active: client_profiles::ActiveModel = client.into();

    if let Some(current_residence) = input.current_residence {
        active.current_residence = Set(Some(current_residence));
    }
    if let Some(target_city) = input.target_city {
        active.target_city = Set(Some(target_city));
    }

    active.update(db).await
}
