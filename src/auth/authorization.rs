use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db::portfolios as portfolio_db;
use crate::db::projects as project_db;
use crate::errors::{AppError, AppResult};
use crate::models::portfolios;
use crate::models::profiles::{self, Roles};
use crate::models::projects;

/// Reject callers whose role cannot perform `action`.
pub fn require_role(user: &profiles::Model, role: Roles, action: &str) -> AppResult<()> {
    if user.role == role {
        return Ok(());
    }
    let who = match role {
        Roles::Client => "clients",
        Roles::Vendor => "vendors",
    };
    Err(AppError::forbidden(format!("Only {who} can {action}")))
}

/// Load a project and check that `client_id` posted it.
pub async fn verify_project_owner<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    client_id: Uuid,
) -> AppResult<projects::Model> {
    let project = project_db::get_project_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    if project.client_id != client_id {
        return Err(AppError::forbidden("You do not own this project"));
    }

    Ok(project)
}

/// Load a portfolio entry and check that `vendor_id` owns it.
pub async fn verify_portfolio_owner<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
    vendor_id: Uuid,
) -> AppResult<portfolios::Model> {
    let portfolio = portfolio_db::get_portfolio_by_id(db, portfolio_id)
        .await?
        .ok_or_else(|| AppError::not_found("Portfolio", portfolio_id))?;

    if portfolio.vendor_id != vendor_id {
        return Err(AppError::forbidden("You do not own this portfolio"));
    }

    Ok(portfolio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Roles) -> profiles::Model {
        profiles::Model {
            id: Uuid::new_v4(),
            role,
            full_name: None,
            phone: None,
            avatar_url: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn require_role_names_the_allowed_role() {
        assert!(require_role(&profile(Roles::Client), Roles::Client, "request quotes").is_ok());

        let err = require_role(&profile(Roles::Client), Roles::Vendor, "submit quotes").unwrap_err();
        assert_eq!(err.to_string(), "Only vendors can submit quotes");
    }
}
