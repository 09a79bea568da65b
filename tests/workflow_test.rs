//! Quote/project lifecycle against a real (in-memory SQLite) database.
//!
//! Run with: `cargo test --test workflow_test`
mod common;

use nests_backend::db::projects as project_db;
use nests_backend::db::quotes::{self as quote_db, QuoteContent};
use nests_backend::errors::AppError;
use nests_backend::models::projects::{ProjectStatus, QuoteRequest};
use nests_backend::models::quotes::{LineItem, LineItemInput, LineItems, QuoteStatus, QuoteSubmission};
use nests_backend::services::{projects, quotes};
use sea_orm::TransactionTrait;

use common::*;

fn test_build() -> QuoteRequest {
    QuoteRequest {
        project_name: "Test Build".to_string(),
        location: "Harare".to_string(),
        description: "Three-bedroom house on a 600 m² stand".to_string(),
    }
}

fn item(description: &str, quantity: f64, unit_price: f64) -> LineItemInput {
    LineItemInput {
        description: description.to_string(),
        quantity,
        unit_price,
        total: None,
    }
}

fn foundation_and_roof() -> QuoteSubmission {
    QuoteSubmission {
        line_items: vec![item("Foundation", 1.0, 1000.0), item("Roof", 2.0, 500.0)],
        timeline_days: Some(90),
        notes: Some("Materials included".to_string()),
        total_amount: Some(2000.0),
    }
}

#[tokio::test]
async fn test_request_creates_project_and_pending_quote() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;

    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    assert_eq!(requested.project.status, ProjectStatus::SeekingQuotes);
    assert_eq!(requested.project.client_id, client.id);
    assert_eq!(requested.project.vendor_id, None);
    assert_eq!(requested.project.location, "Harare");

    let project_quotes = quote_db::get_quotes_by_project(&db, requested.project.id)
        .await
        .unwrap();
    assert_eq!(project_quotes.len(), 1);
    assert_eq!(project_quotes[0].vendor_id, acme.id);
    assert_eq!(project_quotes[0].status, QuoteStatus::Pending);
    assert_eq!(project_quotes[0].total_amount, None);
}

#[tokio::test]
async fn test_request_validation_and_visibility() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let approved = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let pending = create_pending_vendor(&db, "New Builders", &["Harare"], &[]).await;

    let mut no_description = test_build();
    no_description.description = "   ".to_string();
    let err = quotes::request_quote(&db, &client, approved.id, no_description)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut unknown_city = test_build();
    unknown_city.location = "London".to_string();
    let err = quotes::request_quote(&db, &client, approved.id, unknown_city)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = quotes::request_quote(&db, &client, pending.id, test_build())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // Vendors cannot request quotes.
    let err = quotes::request_quote(&db, &approved, pending.id, test_build())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    assert!(projects::list_projects(&db, &client).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submission_prices_the_quote() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    let quote = quotes::submit_quote(&db, &acme, requested.project.id, foundation_and_roof())
        .await
        .unwrap();

    assert_eq!(quote.id, requested.quote.id);
    assert_eq!(quote.status, QuoteStatus::Submitted);
    assert_eq!(quote.total_amount, Some(2000.0));
    assert_eq!(quote.timeline_days, Some(90));
    let totals: Vec<f64> = quote.line_items.0.iter().map(|i| i.total).collect();
    assert_eq!(totals, vec![1000.0, 1000.0]);
}

#[tokio::test]
async fn test_empty_submission_is_rejected_without_writing() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    let empty = QuoteSubmission {
        line_items: vec![item("", 0.0, 0.0), item("  ", 3.0, 0.0)],
        timeline_days: None,
        notes: None,
        total_amount: None,
    };
    let err = quotes::submit_quote(&db, &acme, requested.project.id, empty)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let quote = quote_db::get_quote_by_id(&db, requested.quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert!(quote.line_items.0.is_empty());
    assert_eq!(quote.total_amount, None);
}

#[tokio::test]
async fn test_resubmission_keeps_a_single_quote() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    quotes::submit_quote(&db, &acme, requested.project.id, foundation_and_roof())
        .await
        .unwrap();

    let revised = QuoteSubmission {
        line_items: vec![item("Foundation", 1.0, 1200.0)],
        timeline_days: Some(60),
        notes: None,
        total_amount: None,
    };
    let quote = quotes::submit_quote(&db, &acme, requested.project.id, revised)
        .await
        .unwrap();
    assert_eq!(quote.total_amount, Some(1200.0));

    let project_quotes = quote_db::get_quotes_by_project(&db, requested.project.id)
        .await
        .unwrap();
    assert_eq!(project_quotes.len(), 1);
    assert_eq!(project_quotes[0].total_amount, Some(1200.0));
}

#[tokio::test]
async fn test_mismatched_total_is_rejected() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    let mut submission = foundation_and_roof();
    submission.total_amount = Some(1999.0);
    let err = quotes::submit_quote(&db, &acme, requested.project.id, submission)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_accepting_a_quote_settles_the_project() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let rival = create_approved_vendor(&db, "Rival Builders", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    let project_id = requested.project.id;

    let chosen = quotes::submit_quote(&db, &acme, project_id, foundation_and_roof())
        .await
        .unwrap();
    let other = quotes::submit_quote(
        &db,
        &rival,
        project_id,
        QuoteSubmission {
            line_items: vec![item("Everything", 1.0, 1800.0)],
            timeline_days: Some(120),
            notes: None,
            total_amount: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(other.status, QuoteStatus::Submitted);

    let summary = quotes::payment_summary(&db, &client, chosen.id).await.unwrap();
    assert_eq!(summary.subtotal, 2000.0);
    assert_eq!(summary.platform_fee, 100.0);
    assert_eq!(summary.total, 2100.0);

    let accepted = quotes::accept_quote(&db, &client, chosen.id).await.unwrap();
    assert_eq!(accepted.quote.status, QuoteStatus::Accepted);
    assert_eq!(accepted.project.status, ProjectStatus::InProgress);
    assert_eq!(accepted.project.vendor_id, Some(acme.id));
    assert_eq!(accepted.rejected_quotes, 1);

    let other = quote_db::get_quote_by_id(&db, other.id).await.unwrap().unwrap();
    assert_eq!(other.status, QuoteStatus::Rejected);

    let detail = projects::get_project_detail(&db, &client, project_id)
        .await
        .unwrap();
    assert_eq!(detail.accepted_quote_id, Some(chosen.id));
    let accepted_count = detail
        .quotes
        .iter()
        .filter(|q| q.quote.status == QuoteStatus::Accepted)
        .count();
    assert_eq!(accepted_count, 1);

    // Nothing moves once the project is settled.
    let err = quotes::accept_quote(&db, &client, other.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = quotes::accept_quote(&db, &client, chosen.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = quotes::submit_quote(&db, &rival, project_id, foundation_and_roof())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

fn priced_content(amount: f64) -> QuoteContent {
    QuoteContent {
        line_items: LineItems(vec![LineItem {
            description: "Everything".to_string(),
            quantity: 1.0,
            unit_price: amount,
            total: amount,
        }]),
        total_amount: amount,
        timeline_days: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_submission_read_before_acceptance_cannot_reopen_a_quote() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let rival = create_approved_vendor(&db, "Rival Builders", &["Harare"], &[]).await;
    let late = create_approved_vendor(&db, "Late Builders", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    let project_id = requested.project.id;

    quotes::submit_quote(&db, &acme, project_id, foundation_and_roof())
        .await
        .unwrap();
    quotes::submit_quote(&db, &rival, project_id, foundation_and_roof())
        .await
        .unwrap();

    // The rival's resubmission has read its quote as submitted...
    let seen = quote_db::get_quote_for_project_and_vendor(&db, project_id, rival.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen.status, QuoteStatus::Submitted);

    // ...when the client accepts Acme.
    quotes::accept_quote(&db, &client, requested.quote.id)
        .await
        .unwrap();

    let written = quote_db::overwrite_with_submission(&db, seen.id, priced_content(1500.0))
        .await
        .unwrap();
    assert!(!written);
    assert!(
        !project_db::lock_in_status(&db, project_id, ProjectStatus::SeekingQuotes)
            .await
            .unwrap()
    );

    let rival_quote = quote_db::get_quote_by_id(&db, seen.id).await.unwrap().unwrap();
    assert_eq!(rival_quote.status, QuoteStatus::Rejected);
    assert_eq!(rival_quote.total_amount, Some(2000.0));

    // A vendor without a quote cannot add one to the settled project either.
    let err = quotes::submit_quote(&db, &late, project_id, foundation_and_roof())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let project_quotes = quote_db::get_quotes_by_project(&db, project_id).await.unwrap();
    assert_eq!(project_quotes.len(), 2);
    let accepted = project_quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Accepted)
        .count();
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn test_acceptance_from_a_stale_read_is_rolled_back() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let rival = create_approved_vendor(&db, "Rival Builders", &["Harare"], &[]).await;

    // The quote was rejected after it was read.
    let first = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    quotes::submit_quote(&db, &acme, first.project.id, foundation_and_roof())
        .await
        .unwrap();
    let rival_quote = quotes::submit_quote(&db, &rival, first.project.id, foundation_and_roof())
        .await
        .unwrap();
    quotes::accept_quote(&db, &client, first.quote.id).await.unwrap();

    let txn = db.begin().await.unwrap();
    let err = quotes::apply_acceptance(&txn, &rival_quote).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    txn.rollback().await.unwrap();

    // The project was taken after the quote was read.
    let second = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    quotes::submit_quote(&db, &acme, second.project.id, foundation_and_roof())
        .await
        .unwrap();
    let rival_quote = quotes::submit_quote(&db, &rival, second.project.id, foundation_and_roof())
        .await
        .unwrap();
    let taken = project_db::transition_project(
        &db,
        second.project.id,
        ProjectStatus::SeekingQuotes,
        ProjectStatus::InProgress,
        Some(acme.id),
    )
    .await
    .unwrap();
    assert!(taken);

    let txn = db.begin().await.unwrap();
    let err = quotes::apply_acceptance(&txn, &rival_quote).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    txn.rollback().await.unwrap();

    // The quote write made before the project check did not survive.
    let rival_quote = quote_db::get_quote_by_id(&db, rival_quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rival_quote.status, QuoteStatus::Submitted);
    let project = project_db::get_project_by_id(&db, second.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.vendor_id, Some(acme.id));
}

#[tokio::test]
async fn test_duplicate_quote_insert_is_a_conflict() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let rival = create_approved_vendor(&db, "Rival Builders", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    // Two first submissions from the same vendor that both found no quote.
    quote_db::insert_submitted_quote(&db, requested.project.id, rival.id, priced_content(900.0))
        .await
        .unwrap();
    let err = quote_db::insert_submitted_quote(
        &db,
        requested.project.id,
        rival.id,
        priced_content(950.0),
    )
    .await
    .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));

    let rival_quote =
        quote_db::get_quote_for_project_and_vendor(&db, requested.project.id, rival.id)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(rival_quote.total_amount, Some(900.0));
}

#[tokio::test]
async fn test_overflowing_line_item_is_a_validation_error() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();

    let err = quotes::submit_quote(
        &db,
        &acme,
        requested.project.id,
        QuoteSubmission {
            line_items: vec![item("Roof", 1e200, 1e200)],
            timeline_days: None,
            notes: None,
            total_amount: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let quote = quote_db::get_quote_by_id(&db, requested.quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quote.status, QuoteStatus::Pending);
}

#[tokio::test]
async fn test_only_the_owner_accepts_submitted_quotes() {
    let db = setup_test_db().await;
    let owner = create_client(&db, "Chipo").await;
    let stranger = create_client(&db, "Farai").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let requested = quotes::request_quote(&db, &owner, acme.id, test_build())
        .await
        .unwrap();

    // Still pending: nothing to accept yet.
    let err = quotes::accept_quote(&db, &owner, requested.quote.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = quotes::payment_summary(&db, &owner, requested.quote.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    quotes::submit_quote(&db, &acme, requested.project.id, foundation_and_roof())
        .await
        .unwrap();

    let err = quotes::accept_quote(&db, &stranger, requested.quote.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = projects::get_project_detail(&db, &stranger, requested.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_vendor_sees_only_their_own_quote() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;
    let rival = create_approved_vendor(&db, "Rival Builders", &["Harare"], &[]).await;
    let outsider = create_approved_vendor(&db, "Outsider", &["Mutare"], &[]).await;
    let requested = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    quotes::submit_quote(&db, &rival, requested.project.id, foundation_and_roof())
        .await
        .unwrap();

    let detail = projects::get_project_detail(&db, &acme, requested.project.id)
        .await
        .unwrap();
    assert_eq!(detail.quotes.len(), 1);
    assert_eq!(detail.quotes[0].quote.vendor_id, acme.id);
    assert_eq!(detail.quotes[0].business_name.as_deref(), Some("Acme Co"));

    let owner_view = projects::get_project_detail(&db, &client, requested.project.id)
        .await
        .unwrap();
    assert_eq!(owner_view.quotes.len(), 2);

    let err = projects::get_project_detail(&db, &outsider, requested.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = projects::get_quote(&db, &outsider, requested.quote.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    assert_eq!(projects::list_projects(&db, &rival).await.unwrap().len(), 1);
    assert!(projects::list_projects(&db, &outsider).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_and_complete() {
    let db = setup_test_db().await;
    let client = create_client(&db, "Chipo").await;
    let acme = create_approved_vendor(&db, "Acme Co", &["Harare"], &[]).await;

    let cancelled = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    let project = quotes::cancel_project(&db, &client, cancelled.project.id)
        .await
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Cancelled);
    let quote = quote_db::get_quote_by_id(&db, cancelled.quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quote.status, QuoteStatus::Rejected);

    // Only in-progress projects complete.
    let err = quotes::complete_project(&db, &client, cancelled.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let active = quotes::request_quote(&db, &client, acme.id, test_build())
        .await
        .unwrap();
    quotes::submit_quote(&db, &acme, active.project.id, foundation_and_roof())
        .await
        .unwrap();
    quotes::accept_quote(&db, &client, active.quote.id).await.unwrap();

    let err = quotes::cancel_project(&db, &client, active.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let project = quotes::complete_project(&db, &client, active.project.id)
        .await
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.vendor_id, Some(acme.id));
}
