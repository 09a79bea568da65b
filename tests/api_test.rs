//! End-to-end HTTP scenarios: real routes, HS256 tokens, in-memory SQLite.
//!
//! Run with: `cargo test --test api_test`
mod common;

use actix_web::{App, http::StatusCode, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use uuid::Uuid;

use nests_backend::auth::jwt::{Claims, TokenVerifier, UserMetadata};
use nests_backend::handlers;
use nests_backend::models::vendor_profiles::VerificationStatus;

use common::*;

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn token_for(user_id: Uuid, role: &str, full_name: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
        email: None,
        role: Some("authenticated".to_string()),
        user_metadata: Some(UserMetadata {
            role: Some(role.to_string()),
            full_name: Some(full_name.to_string()),
            ..Default::default()
        }),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! init_app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .app_data(web::Data::new(TokenVerifier::Secret(TEST_SECRET.to_string())))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requests_without_a_valid_token_are_rejected() {
    let db = setup_test_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_first_request_creates_the_profile() {
    let db = setup_test_db().await;
    let app = init_app!(db);
    let vendor_id = Uuid::new_v4();
    let token = token_for(vendor_id, "vendor", "Acme Co");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], json!(vendor_id));
    assert_eq!(body["role"], "vendor");
    assert_eq!(body["vendor_profile"]["business_name"], "Acme Co");
    assert_eq!(body["vendor_profile"]["verification_status"], "pending");
    assert!(body["client_profile"].is_null());

    // Second call finds the same profile.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], json!(vendor_id));
}

#[actix_web::test]
async fn test_quote_lifecycle_over_http() {
    let db = setup_test_db().await;
    let app = init_app!(db);

    let client_token = token_for(Uuid::new_v4(), "client", "Chipo");
    let vendor_id = Uuid::new_v4();
    let vendor_token = token_for(vendor_id, "vendor", "Acme");

    // The vendor signs in, fills in the profile and is approved out of band.
    let req = test::TestRequest::put()
        .uri("/api/vendors/me")
        .insert_header(bearer(&vendor_token))
        .set_json(json!({ "business_name": "Acme Co", "service_areas": ["Harare"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    set_verification(&db, vendor_id, VerificationStatus::Approved).await;

    let req = test::TestRequest::get()
        .uri("/api/vendors?city=harare&search=acme")
        .insert_header(bearer(&client_token))
        .to_request();
    let vendors: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(vendors.as_array().map(Vec::len), Some(1));
    assert_eq!(vendors[0]["business_name"], "Acme Co");

    // Request.
    let req = test::TestRequest::post()
        .uri(&format!("/api/vendors/{vendor_id}/quote-requests"))
        .insert_header(bearer(&client_token))
        .set_json(json!({
            "project_name": "Test Build",
            "location": "Harare",
            "description": "Three-bedroom house",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let requested: Value = test::read_body_json(resp).await;
    assert_eq!(requested["project"]["status"], "seeking_quotes");
    assert_eq!(requested["quote"]["status"], "pending");
    let project_id = requested["project"]["id"].as_str().unwrap().to_string();
    let quote_id = requested["quote"]["id"].as_str().unwrap().to_string();

    // An all-blank submission is refused with a message.
    let req = test::TestRequest::put()
        .uri(&format!("/api/projects/{project_id}/quote"))
        .insert_header(bearer(&vendor_token))
        .set_json(json!({ "line_items": [{ "description": "", "quantity": 0, "unit_price": 0 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Please add at least one line item with a description and amount"
    );

    // Submit.
    let req = test::TestRequest::put()
        .uri(&format!("/api/projects/{project_id}/quote"))
        .insert_header(bearer(&vendor_token))
        .set_json(json!({
            "line_items": [
                { "description": "Foundation", "quantity": 1, "unit_price": 1000 },
                { "description": "Roof", "quantity": 2, "unit_price": 500 },
            ],
            "timeline_days": 90,
        }))
        .to_request();
    let quote: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(quote["id"], quote_id.as_str());
    assert_eq!(quote["status"], "submitted");
    assert_eq!(quote["total_amount"], 2000.0);

    // Payment summary, then accept with the simulated card details.
    let req = test::TestRequest::get()
        .uri(&format!("/api/quotes/{quote_id}/payment-summary"))
        .insert_header(bearer(&client_token))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["platform_fee"], 100.0);
    assert_eq!(summary["total"], 2100.0);

    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/{quote_id}/accept"))
        .insert_header(bearer(&client_token))
        .set_json(json!({ "cardholder_name": "Chipo M", "card_last4": "4242" }))
        .to_request();
    let accepted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accepted["quote"]["status"], "accepted");
    assert_eq!(accepted["project"]["status"], "in_progress");
    assert_eq!(accepted["project"]["vendor_id"], json!(vendor_id));

    // A second acceptance conflicts.
    let req = test::TestRequest::post()
        .uri(&format!("/api/quotes/{quote_id}/accept"))
        .insert_header(bearer(&client_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/projects/{project_id}"))
        .insert_header(bearer(&client_token))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["accepted_quote_id"], quote_id.as_str());
    assert_eq!(detail["quotes"][0]["business_name"], "Acme Co");
}

#[actix_web::test]
async fn test_role_checks_over_http() {
    let db = setup_test_db().await;
    let app = init_app!(db);
    let client_token = token_for(Uuid::new_v4(), "client", "Chipo");

    let req = test::TestRequest::post()
        .uri("/api/portfolios")
        .insert_header(bearer(&client_token))
        .set_json(json!({ "project_name": "My house" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/projects/{}", Uuid::new_v4()))
        .insert_header(bearer(&client_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/categories")
        .insert_header(bearer(&client_token))
        .to_request();
    let categories: Value = test::call_and_read_body_json(&app, req).await;
    assert!(!categories.as_array().unwrap().is_empty());
}
