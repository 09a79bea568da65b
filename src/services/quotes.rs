//! The quote/project lifecycle: request -> submit -> accept, plus closing a project.
//!
//! Every multi-row step runs in one database transaction, and status changes
//! are guarded updates (`... WHERE status = <expected>`), so a concurrent
//! writer makes the loser fail with a conflict instead of leaving mixed state.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authorization::{require_role, verify_project_owner};
use crate::db::projects::{self as project_db, NewProject};
use crate::db::quotes::{self as quote_db, QuoteContent};
use crate::db::vendors as vendor_db;
use crate::errors::{AppError, AppResult};
use crate::models::profiles::{self, Roles};
use crate::models::projects::{self, ProjectStatus, QuoteRequest};
use crate::models::quotes::{self, LineItems, QuoteStatus, QuoteSubmission};
use crate::services::pricing::{PaymentSummary, price_line_items};

/// Cities a project can be located in.
pub const SUPPORTED_CITIES: &[&str] = &[
    "Harare",
    "Bulawayo",
    "Chitungwiza",
    "Mutare",
    "Gweru",
    "Kwekwe",
    "Kadoma",
    "Masvingo",
    "Chinhoyi",
    "Marondera",
    "Norton",
    "Victoria Falls",
];

/// Canonical spelling of a supported city, if `input` names one.
pub fn normalize_city(input: &str) -> Option<&'static str> {
    let input = input.trim();
    SUPPORTED_CITIES
        .iter()
        .copied()
        .find(|city| city.eq_ignore_ascii_case(input))
}

fn required_field(value: &str, name: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{name} is required")));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestedQuote {
    pub project: projects::Model,
    pub quote: quotes::Model,
}

/// A client asks one vendor for a quote: creates the project and its pending quote together.
pub async fn request_quote(
    db: &DatabaseConnection,
    client: &profiles::Model,
    vendor_id: Uuid,
    input: QuoteRequest,
) -> AppResult<RequestedQuote> {
    require_role(client, Roles::Client, "request quotes")?;

    let name = required_field(&input.project_name, "Project name")?;
    let description = required_field(&input.description, "Project description")?;
    let location = normalize_city(&input.location).ok_or_else(|| {
        AppError::validation(format!(
            "Location must be one of: {}",
            SUPPORTED_CITIES.join(", ")
        ))
    })?;

    let vendor = vendor_db::get_vendor_by_id(db, vendor_id)
        .await?
        .filter(|v| v.is_approved())
        .ok_or_else(|| AppError::not_found("Vendor", vendor_id))?;

    let txn = db.begin().await?;

    let project = project_db::insert_project(
        &txn,
        NewProject {
            client_id: client.id,
            name,
            description,
            location: location.to_string(),
        },
    )
    .await?;
    let quote = quote_db::insert_pending_quote(&txn, project.id, vendor.id).await?;

    txn.commit().await?;

    tracing::info!(
        project_id = %project.id,
        quote_id = %quote.id,
        client_id = %client.id,
        vendor_id = %vendor.id,
        "Quote requested"
    );

    Ok(RequestedQuote { project, quote })
}

/// A vendor prices their quote for a project.
///
/// The vendor's existing quote (normally the pending placeholder) is updated in
/// place; otherwise a new submitted quote is created. Validation happens before
/// anything is written.
pub async fn submit_quote(
    db: &DatabaseConnection,
    vendor: &profiles::Model,
    project_id: Uuid,
    input: QuoteSubmission,
) -> AppResult<quotes::Model> {
    require_role(vendor, Roles::Vendor, "submit quotes")?;

    let priced = price_line_items(&input.line_items, input.total_amount)?;
    if let Some(days) = input.timeline_days {
        if days <= 0 {
            return Err(AppError::validation("Timeline must be at least one day"));
        }
    }
    let notes = input
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let content = QuoteContent {
        line_items: LineItems(priced.line_items),
        total_amount: priced.total_amount,
        timeline_days: input.timeline_days,
        notes,
    };

    let txn = db.begin().await?;

    let project = project_db::get_project_by_id(&txn, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    if !project_db::lock_in_status(&txn, project.id, ProjectStatus::SeekingQuotes).await? {
        return Err(AppError::conflict("This project is no longer accepting quotes"));
    }

    let existing = quote_db::get_quote_for_project_and_vendor(&txn, project_id, vendor.id).await?;
    let quote_id = match existing {
        Some(quote) if quote.status.can_transition_to(QuoteStatus::Submitted) => {
            if !quote_db::overwrite_with_submission(&txn, quote.id, content).await? {
                tracing::warn!(quote_id = %quote.id, "Quote closed while being resubmitted");
                return Err(AppError::conflict("Quote was closed before it could be updated"));
            }
            quote.id
        }
        Some(quote) => {
            tracing::warn!(quote_id = %quote.id, status = ?quote.status, "Resubmission refused");
            return Err(AppError::conflict(format!(
                "Quote is already {} and can no longer be changed",
                quote.status.as_str()
            )));
        }
        None => {
            quote_db::insert_submitted_quote(&txn, project_id, vendor.id, content)
                .await?
                .id
        }
    };

    let quote = quote_db::get_quote_by_id(&txn, quote_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", quote_id))?;

    txn.commit().await?;

    tracing::info!(
        quote_id = %quote.id,
        project_id = %project_id,
        vendor_id = %vendor.id,
        total_amount = quote.total_amount,
        "Quote submitted"
    );

    Ok(quote)
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptedQuote {
    pub quote: quotes::Model,
    pub project: projects::Model,
    pub rejected_quotes: u64,
}

/// A client accepts a submitted quote.
///
/// In one transaction, in this order: the quote becomes accepted, the project
/// moves to in_progress with the quote's vendor assigned, and every other open
/// quote on the project is rejected.
pub async fn accept_quote(
    db: &DatabaseConnection,
    client: &profiles::Model,
    quote_id: Uuid,
) -> AppResult<AcceptedQuote> {
    require_role(client, Roles::Client, "accept quotes")?;

    let txn = db.begin().await?;

    let quote = quote_db::get_quote_by_id(&txn, quote_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", quote_id))?;
    let project = verify_project_owner(&txn, quote.project_id, client.id).await?;

    if !quote.status.can_transition_to(QuoteStatus::Accepted) {
        return Err(AppError::conflict(format!(
            "Only submitted quotes can be accepted; this quote is {}",
            quote.status.as_str()
        )));
    }
    if !project.status.can_transition_to(ProjectStatus::InProgress) {
        return Err(AppError::conflict(format!(
            "Project is already {}",
            project.status.as_str()
        )));
    }

    let rejected_quotes = apply_acceptance(&txn, &quote).await?;

    let quote = quote_db::get_quote_by_id(&txn, quote.id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", quote_id))?;
    let project = project_db::get_project_by_id(&txn, project.id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project.id))?;

    txn.commit().await?;

    tracing::info!(
        quote_id = %quote.id,
        project_id = %project.id,
        vendor_id = %quote.vendor_id,
        rejected_quotes,
        "Quote accepted"
    );

    Ok(AcceptedQuote {
        quote,
        project,
        rejected_quotes,
    })
}

/// The three acceptance writes for a quote the caller has already read and checked.
///
/// Each write re-checks the status it expects, so a snapshot that went stale
/// (another acceptance, a cancellation) fails with a conflict. Run it inside a
/// transaction: a conflict after the first write must roll that write back.
pub async fn apply_acceptance<C: ConnectionTrait>(db: &C, quote: &quotes::Model) -> AppResult<u64> {
    // 1. The chosen quote.
    if !quote_db::transition_quote(db, quote.id, QuoteStatus::Submitted, QuoteStatus::Accepted)
        .await?
    {
        tracing::warn!(quote_id = %quote.id, "Quote closed while being accepted");
        return Err(AppError::conflict("Quote changed while it was being accepted"));
    }

    // 2. The project and its vendor.
    if !project_db::transition_project(
        db,
        quote.project_id,
        ProjectStatus::SeekingQuotes,
        ProjectStatus::InProgress,
        Some(quote.vendor_id),
    )
    .await?
    {
        tracing::warn!(project_id = %quote.project_id, quote_id = %quote.id, "Lost acceptance race");
        return Err(AppError::conflict("Another quote was accepted for this project"));
    }

    // 3. Everyone else.
    Ok(quote_db::reject_open_quotes(db, quote.project_id, Some(quote.id)).await?)
}

/// Amount, fee and total shown before the client confirms. Nothing is stored.
pub async fn payment_summary(
    db: &DatabaseConnection,
    client: &profiles::Model,
    quote_id: Uuid,
) -> AppResult<PaymentSummary> {
    require_role(client, Roles::Client, "pay for quotes")?;

    let quote = quote_db::get_quote_by_id(db, quote_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", quote_id))?;
    verify_project_owner(db, quote.project_id, client.id).await?;

    match (quote.status, quote.total_amount) {
        (QuoteStatus::Submitted | QuoteStatus::Accepted, Some(amount)) => {
            Ok(PaymentSummary::for_amount(amount))
        }
        _ => Err(AppError::conflict("This quote has not been priced yet")),
    }
}

/// Withdraw a project that is still collecting quotes; its open quotes are rejected.
pub async fn cancel_project(
    db: &DatabaseConnection,
    client: &profiles::Model,
    project_id: Uuid,
) -> AppResult<projects::Model> {
    require_role(client, Roles::Client, "cancel projects")?;

    let txn = db.begin().await?;
    let project = verify_project_owner(&txn, project_id, client.id).await?;

    if !project.status.can_transition_to(ProjectStatus::Cancelled)
        || !project_db::transition_project(
            &txn,
            project.id,
            project.status,
            ProjectStatus::Cancelled,
            None,
        )
        .await?
    {
        return Err(AppError::conflict(format!(
            "Only projects seeking quotes can be cancelled; this one is {}",
            project.status.as_str()
        )));
    }
    let rejected = quote_db::reject_open_quotes(&txn, project.id, None).await?;

    let project = project_db::get_project_by_id(&txn, project.id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    txn.commit().await?;

    tracing::info!(project_id = %project.id, rejected_quotes = rejected, "Project cancelled");
    Ok(project)
}

/// Mark an in-progress project as finished.
pub async fn complete_project(
    db: &DatabaseConnection,
    client: &profiles::Model,
    project_id: Uuid,
) -> AppResult<projects::Model> {
    require_role(client, Roles::Client, "complete projects")?;

    let project = verify_project_owner(db, project_id, client.id).await?;

    if !project.status.can_transition_to(ProjectStatus::Completed)
        || !project_db::transition_project(
            db,
            project.id,
            project.status,
            ProjectStatus::Completed,
            None,
        )
        .await?
    {
        return Err(AppError::conflict(format!(
            "Only projects in progress can be completed; this one is {}",
            project.status.as_str()
        )));
    }

    tracing::info!(project_id = %project.id, "Project completed");

    project_db::get_project_by_id(db, project.id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))
}
