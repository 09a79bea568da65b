use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_portfolio_owner};
use crate::db::portfolios as portfolio_db;
use crate::db::vendors as vendor_db;
use crate::errors::{AppError, AppResult};
use crate::models::portfolio_images;
use crate::models::portfolios::{self, CreatePortfolio, PortfolioWithImages, UpdatePortfolio};
use crate::models::profiles::{self, Roles};
use crate::storage::{ObjectStorage, portfolio_image_path};

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// One portfolio entry with its images. Entries of unapproved vendors are
/// only visible to the vendor.
pub async fn get_portfolio(
    db: &DatabaseConnection,
    viewer: &profiles::Model,
    portfolio_id: Uuid,
) -> AppResult<PortfolioWithImages> {
    let portfolio = portfolio_db::get_portfolio_by_id(db, portfolio_id)
        .await?
        .ok_or_else(|| AppError::not_found("Portfolio", portfolio_id))?;

    if portfolio.vendor_id != viewer.id {
        let approved = vendor_db::get_vendor_by_id(db, portfolio.vendor_id)
            .await?
            .is_some_and(|v| v.is_approved());
        if !approved {
            return Err(AppError::not_found("Portfolio", portfolio_id));
        }
    }

    let images = portfolio_db::get_images_by_portfolio(db, portfolio.id).await?;
    Ok(PortfolioWithImages { portfolio, images })
}

pub async fn create_portfolio(
    db: &DatabaseConnection,
    user: &profiles::Model,
    mut input: CreatePortfolio,
) -> AppResult<portfolios::Model> {
    require_role(user, Roles::Vendor, "create portfolio entries")?;

    input.project_name = input.project_name.trim().to_string();
    if input.project_name.is_empty() {
        return Err(AppError::validation("Project name is required"));
    }

    let portfolio = portfolio_db::insert_portfolio(db, user.id, input).await?;
    tracing::info!(portfolio_id = %portfolio.id, vendor_id = %user.id, "Portfolio created");
    Ok(portfolio)
}

pub async fn update_portfolio(
    db: &DatabaseConnection,
    user: &profiles::Model,
    portfolio_id: Uuid,
    input: UpdatePortfolio,
) -> AppResult<portfolios::Model> {
    if matches!(&input.project_name, Some(name) if name.trim().is_empty()) {
        return Err(AppError::validation("Project name cannot be empty"));
    }

    let portfolio = verify_portfolio_owner(db, portfolio_id, user.id).await?;
    Ok(portfolio_db::update_portfolio(db, portfolio, input).await?)
}

/// Delete a portfolio entry, its image rows, and (best effort) its stored images.
pub async fn delete_portfolio<S: ObjectStorage>(
    db: &DatabaseConnection,
    storage: &S,
    user: &profiles::Model,
    portfolio_id: Uuid,
) -> AppResult<()> {
    let portfolio = verify_portfolio_owner(db, portfolio_id, user.id).await?;
    let images = portfolio_db::get_images_by_portfolio(db, portfolio.id).await?;

    portfolio_db::delete_portfolio(db, portfolio.id).await?;

    let paths: Vec<String> = images.into_iter().map(|i| i.storage_path).collect();
    if let Err(e) = storage.remove(&paths).await {
        tracing::warn!(portfolio_id = %portfolio.id, error = %e, "Orphaned portfolio images in storage");
    }

    tracing::info!(portfolio_id = %portfolio.id, "Portfolio deleted");
    Ok(())
}

/// Store an image and append it to the portfolio. The first image is the cover.
pub async fn upload_image<S: ObjectStorage>(
    db: &DatabaseConnection,
    storage: &S,
    user: &profiles::Model,
    portfolio_id: Uuid,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> AppResult<portfolio_images::Model> {
    if bytes.is_empty() {
        return Err(AppError::validation("Image is empty"));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation("Image is larger than 10 MB"));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::validation("Only image uploads are allowed"));
    }

    let portfolio = verify_portfolio_owner(db, portfolio_id, user.id).await?;

    let path = portfolio_image_path(user.id, portfolio.id, file_name);
    storage.upload(&path, bytes, content_type).await?;
    let url = storage.public_url(&path);

    let saved = async {
        let txn = db.begin().await?;
        let image = portfolio_db::append_image(&txn, portfolio.id, url, path.clone()).await?;
        txn.commit().await?;
        Ok::<_, sea_orm::DbErr>(image)
    }
    .await;

    match saved {
        Ok(image) => {
            tracing::info!(image_id = %image.id, portfolio_id = %portfolio.id, order = image.display_order, "Image uploaded");
            Ok(image)
        }
        Err(e) => {
            // Don't leave an object nothing points at.
            if let Err(cleanup) = storage.remove(std::slice::from_ref(&path)).await {
                tracing::warn!(path = %path, error = %cleanup, "Failed to remove unsaved upload");
            }
            Err(e.into())
        }
    }
}

/// Remove an image from storage and from the portfolio, closing the ordering gap.
pub async fn delete_image<S: ObjectStorage>(
    db: &DatabaseConnection,
    storage: &S,
    user: &profiles::Model,
    image_id: Uuid,
) -> AppResult<()> {
    let image = portfolio_db::get_image_by_id(db, image_id)
        .await?
        .ok_or_else(|| AppError::not_found("Image", image_id))?;
    verify_portfolio_owner(db, image.portfolio_id, user.id).await?;

    storage.remove(std::slice::from_ref(&image.storage_path)).await?;

    let txn = db.begin().await?;
    portfolio_db::delete_image_and_renumber(&txn, image).await?;
    txn.commit().await?;

    tracing::info!(image_id = %image_id, "Image deleted");
    Ok(())
}
