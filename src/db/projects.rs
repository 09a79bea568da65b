use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::projects::{self, ProjectStatus};
use crate::models::quotes;

/// Input for a new project; always starts in `seeking_quotes`.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
}

/// Insert a new project seeking quotes.
pub async fn insert_project<C: ConnectionTrait>(
    db: &C,
    input: NewProject,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(input.client_id),
        vendor_id: Set(None),
        name: Set(input.name),
        description: Set(input.description),
        location: Set(input.location),
        status: Set(ProjectStatus::SeekingQuotes),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_project.insert(db).await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// Projects posted by a client, newest first.
pub async fn get_projects_by_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::ClientId.eq(client_id))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Projects a vendor is quoting on or assigned to, newest first.
pub async fn get_projects_for_vendor<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    let quoted: Vec<Uuid> = quotes::Entity::find()
        .filter(quotes::Column::VendorId.eq(vendor_id))
        .all(db)
        .await?
        .into_iter()
        .map(|q| q.project_id)
        .collect();

    let mut condition = Condition::any().add(projects::Column::VendorId.eq(vendor_id));
    if !quoted.is_empty() {
        condition = condition.add(projects::Column::Id.is_in(quoted));
    }

    projects::Entity::find()
        .filter(condition)
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Move a project from `from` to `to`, optionally assigning a vendor.
///
/// The update only applies while the row is still in `from`; returns whether it did.
pub async fn transition_project<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: ProjectStatus,
    to: ProjectStatus,
    vendor_id: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut update = projects::Entity::update_many()
        .col_expr(projects::Column::Status, Expr::value(to))
        .col_expr(projects::Column::UpdatedAt, Expr::value(chrono::Utc::now()));

    if let Some(vendor_id) = vendor_id {
        update = update.col_expr(projects::Column::VendorId, Expr::value(vendor_id));
    }

    let result = update
        .filter(projects::Column::Id.eq(id))
        .filter(projects::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Touch a project that must still be in `status`, taking its row lock for the
/// rest of the transaction. Returns false when the project has moved on.
///
/// A concurrent guarded transition on the same row waits for this transaction,
/// so whichever commits second sees the other's status.
pub async fn lock_in_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: ProjectStatus,
) -> Result<bool, DbErr> {
    let result = projects::Entity::update_many()
        .col_expr(projects::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(projects::Column::Id.eq(id))
        .filter(projects::Column::Status.eq(status))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
