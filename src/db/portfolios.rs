use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::portfolio_images;
use crate::models::portfolios::{self, CreatePortfolio, PortfolioWithImages, UpdatePortfolio};

/// Insert a new portfolio entry for a vendor.
pub async fn insert_portfolio<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    input: CreatePortfolio,
) -> Result<portfolios::Model, DbErr> {
    let new_portfolio = portfolios::ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor_id),
        project_name: Set(input.project_name),
        description: Set(input.description),
        location: Set(input.location),
        created_at: Set(chrono::Utc::now()),
    };

    new_portfolio.insert(db).await
}

/// Fetch a single portfolio entry by ID.
pub async fn get_portfolio_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<portfolios::Model>, DbErr> {
    portfolios::Entity::find_by_id(id).one(db).await
}

/// A vendor's portfolio entries with their images, newest entry first.
pub async fn get_portfolios_with_images<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<Vec<PortfolioWithImages>, DbErr> {
    let items = portfolios::Entity::find()
        .filter(portfolios::Column::VendorId.eq(vendor_id))
        .order_by_desc(portfolios::Column::CreatedAt)
        .all(db)
        .await?;

    if items.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = items.iter().map(|p| p.id).collect();
    let images = portfolio_images::Entity::find()
        .filter(portfolio_images::Column::PortfolioId.is_in(ids))
        .order_by_asc(portfolio_images::Column::DisplayOrder)
        .all(db)
        .await?;

    let mut by_portfolio: HashMap<Uuid, Vec<portfolio_images::Model>> = HashMap::new();
    for image in images {
        by_portfolio.entry(image.portfolio_id).or_default().push(image);
    }

    Ok(items
        .into_iter()
        .map(|portfolio| PortfolioWithImages {
            images: by_portfolio.remove(&portfolio.id).unwrap_or_default(),
            portfolio,
        })
        .collect())
}

/// Update an existing portfolio entry.
pub async fn update_portfolio<C: ConnectionTrait>(
    db: &C,
    portfolio: portfolios::Model,
    input: UpdatePortfolio,
) -> Result<portfolios::Model, DbErr> {
    let mut active: portfolios::ActiveModel = portfolio.into();

    if let Some(project_name) = input.project_name {
        active.project_name = Set(project_name);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }

    active.update(db).await
}

/// Delete a portfolio entry by ID (images cascade).
pub async fn delete_portfolio<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolios::Entity::delete_by_id(id).exec(db).await
}

/// Images of one portfolio, cover first.
pub async fn get_images_by_portfolio<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_images::Model>, DbErr> {
    portfolio_images::Entity::find()
        .filter(portfolio_images::Column::PortfolioId.eq(portfolio_id))
        .order_by_asc(portfolio_images::Column::DisplayOrder)
        .all(db)
        .await
}

pub async fn get_image_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<portfolio_images::Model>, DbErr> {
    portfolio_images::Entity::find_by_id(id).one(db).await
}

/// Append an image after the existing ones; the first image becomes the cover.
pub async fn append_image<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
    image_url: String,
    storage_path: String,
) -> Result<portfolio_images::Model, DbErr> {
    let count = portfolio_images::Entity::find()
        .filter(portfolio_images::Column::PortfolioId.eq(portfolio_id))
        .count(db)
        .await?;

    let new_image = portfolio_images::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(portfolio_id),
        image_url: Set(image_url),
        storage_path: Set(storage_path),
        display_order: Set(count as i32),
        created_at: Set(chrono::Utc::now()),
    };

    new_image.insert(db).await
}

/// Delete one image and close the gap it leaves in `display_order`.
pub async fn delete_image_and_renumber<C: ConnectionTrait>(
    db: &C,
    image: portfolio_images::Model,
) -> Result<(), DbErr> {
    let portfolio_id = image.portfolio_id;
    portfolio_images::Entity::delete_by_id(image.id).exec(db).await?;

    let remaining = get_images_by_portfolio(db, portfolio_id).await?;
    for (index, image) in remaining.into_iter().enumerate() {
        let order = index as i32;
        if image.display_order != order {
            let mut active: portfolio_images::ActiveModel = image.into();
            active.display_order = Set(order);
            active.update(db).await?;
        }
    }

    Ok(())
}
