use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::quotes::{self, LineItems, QuoteStatus};

/// Insert the pending placeholder quote for a freshly requested project.
pub async fn insert_pending_quote<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    vendor_id: Uuid,
) -> Result<quotes::Model, DbErr> {
    let new_quote = quotes::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        vendor_id: Set(vendor_id),
        status: Set(QuoteStatus::Pending),
        line_items: Set(LineItems::default()),
        total_amount: Set(None),
        timeline_days: Set(None),
        notes: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_quote.insert(db).await
}

/// Priced content of a submitted quote.
#[derive(Debug, Clone)]
pub struct QuoteContent {
    pub line_items: LineItems,
    pub total_amount: f64,
    pub timeline_days: Option<i32>,
    pub notes: Option<String>,
}

/// Insert a quote that arrives already submitted (no placeholder existed).
pub async fn insert_submitted_quote<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    vendor_id: Uuid,
    content: QuoteContent,
) -> Result<quotes::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_quote = quotes::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        vendor_id: Set(vendor_id),
        status: Set(QuoteStatus::Submitted),
        line_items: Set(content.line_items),
        total_amount: Set(Some(content.total_amount)),
        timeline_days: Set(content.timeline_days),
        notes: Set(content.notes),
        created_at: Set(now),
        updated_at: Set(Some(now)),
    };

    new_quote.insert(db).await
}

/// Overwrite a quote's content and mark it submitted, but only while it is still
/// open (pending or submitted). Returns whether the row was updated.
pub async fn overwrite_with_submission<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    content: QuoteContent,
) -> Result<bool, DbErr> {
    let result = quotes::Entity::update_many()
        .col_expr(quotes::Column::Status, Expr::value(QuoteStatus::Submitted))
        .col_expr(quotes::Column::LineItems, Expr::value(content.line_items))
        .col_expr(quotes::Column::TotalAmount, Expr::value(Some(content.total_amount)))
        .col_expr(quotes::Column::TimelineDays, Expr::value(content.timeline_days))
        .col_expr(quotes::Column::Notes, Expr::value(content.notes))
        .col_expr(quotes::Column::UpdatedAt, Expr::value(Some(chrono::Utc::now())))
        .filter(quotes::Column::Id.eq(id))
        .filter(quotes::Column::Status.is_in(open_statuses()))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

fn open_statuses() -> Vec<QuoteStatus> {
    QuoteStatus::iter().filter(|s| s.is_open()).collect()
}

/// Fetch a single quote by ID.
pub async fn get_quote_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find_by_id(id).one(db).await
}

/// The quote a vendor holds on a project, if any.
pub async fn get_quote_for_project_and_vendor<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    vendor_id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::ProjectId.eq(project_id))
        .filter(quotes::Column::VendorId.eq(vendor_id))
        .one(db)
        .await
}

/// All quotes on a project, oldest first.
pub async fn get_quotes_by_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::ProjectId.eq(project_id))
        .order_by_asc(quotes::Column::CreatedAt)
        .order_by_asc(quotes::Column::Id)
        .all(db)
        .await
}

/// Move one quote from `from` to `to`. Returns whether the row was still in `from`.
pub async fn transition_quote<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: QuoteStatus,
    to: QuoteStatus,
) -> Result<bool, DbErr> {
    let result = quotes::Entity::update_many()
        .col_expr(quotes::Column::Status, Expr::value(to))
        .col_expr(quotes::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(quotes::Column::Id.eq(id))
        .filter(quotes::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Reject every still-open (pending or submitted) quote on a project, except `keep`.
pub async fn reject_open_quotes<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    keep: Option<Uuid>,
) -> Result<u64, DbErr> {
    let mut update = quotes::Entity::update_many()
        .col_expr(quotes::Column::Status, Expr::value(QuoteStatus::Rejected))
        .col_expr(quotes::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(quotes::Column::ProjectId.eq(project_id))
        .filter(quotes::Column::Status.is_in(open_statuses()));

    if let Some(keep) = keep {
        update = update.filter(quotes::Column::Id.ne(keep));
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}
