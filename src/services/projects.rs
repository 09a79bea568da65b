use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::projects as project_db;
use crate::db::quotes as quote_db;
use crate::db::vendors as vendor_db;
use crate::errors::{AppError, AppResult};
use crate::models::profiles::{self, Roles};
use crate::models::projects::{self, ProjectDetail, QuoteView};
use crate::models::quotes::{self, QuoteStatus};

/// Projects relevant to the caller: posted by a client, or quoted on / assigned to a vendor.
pub async fn list_projects(
    db: &DatabaseConnection,
    user: &profiles::Model,
) -> AppResult<Vec<projects::Model>> {
    let projects = match user.role {
        Roles::Client => project_db::get_projects_by_client(db, user.id).await?,
        Roles::Vendor => project_db::get_projects_for_vendor(db, user.id).await?,
    };
    Ok(projects)
}

/// A project with the quotes the caller may see.
///
/// The owning client sees every quote; a vendor sees only their own.
pub async fn get_project_detail(
    db: &DatabaseConnection,
    user: &profiles::Model,
    project_id: Uuid,
) -> AppResult<ProjectDetail> {
    let project = project_db::get_project_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    let all_quotes = quote_db::get_quotes_by_project(db, project_id).await?;

    let visible: Vec<quotes::Model> = match user.role {
        Roles::Client if project.client_id == user.id => all_quotes,
        Roles::Vendor => {
            let own: Vec<quotes::Model> = all_quotes
                .into_iter()
                .filter(|q| q.vendor_id == user.id)
                .collect();
            if own.is_empty() && project.vendor_id != Some(user.id) {
                return Err(AppError::forbidden("You have no quote on this project"));
            }
            own
        }
        Roles::Client => return Err(AppError::forbidden("You do not own this project")),
    };

    let accepted_quote_id = visible
        .iter()
        .find(|q| q.status == QuoteStatus::Accepted)
        .map(|q| q.id);

    let vendor_ids: Vec<Uuid> = visible.iter().map(|q| q.vendor_id).collect();
    let names: HashMap<Uuid, String> = vendor_db::get_business_names(db, vendor_ids)
        .await?
        .into_iter()
        .collect();

    let quotes = visible
        .into_iter()
        .map(|quote| QuoteView {
            business_name: names.get(&quote.vendor_id).cloned(),
            quote,
        })
        .collect();

    Ok(ProjectDetail {
        project,
        quotes,
        accepted_quote_id,
    })
}

/// A single quote, visible to the project owner and the quoting vendor.
pub async fn get_quote(
    db: &DatabaseConnection,
    user: &profiles::Model,
    quote_id: Uuid,
) -> AppResult<quotes::Model> {
    let quote = quote_db::get_quote_by_id(db, quote_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", quote_id))?;

    if quote.vendor_id == user.id {
        return Ok(quote);
    }

    match project_db::get_project_by_id(db, quote.project_id).await? {
        Some(project) if project.client_id == user.id => Ok(quote),
        Some(_) => Err(AppError::forbidden(
            "You can only view quotes you are involved in",
        )),
        None => Err(AppError::not_found("Project", quote.project_id)),
    }
}
