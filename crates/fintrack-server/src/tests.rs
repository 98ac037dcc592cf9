//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fintrack_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API and return their session token
async fn register_user(app: &Router, username: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "Str0ng!pass"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

async fn authed_get(app: &Router, token: &str, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn authed_json(
    app: &Router,
    token: &str,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// ========== Authentication Tests ==========

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "Str0ng!pass"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(!json["token"].as_str().unwrap().is_empty());
    assert_eq!(json["user"]["username"], "alice");
    // Password hashes must never leave the server
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_weak_password_rejected() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "weak"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = setup_test_app();
    register_user(&app, "alice").await;

    let body = serde_json::json!({
        "username": "alice",
        "email": "other@example.com",
        "password": "Str0ng!pass"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_flow() {
    let app = setup_test_app();
    register_user(&app, "alice").await;

    let body = serde_json::json!({
        "username": "alice",
        "password": "Str0ng!pass"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(!json["token"].as_str().unwrap().is_empty());
    assert_eq!(json["user"]["username"], "alice");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();
    register_user(&app, "alice").await;

    let body = serde_json::json!({
        "username": "alice",
        "password": "Wr0ng!pass"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_require_session() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transactions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = setup_test_app();
    register_user(&app, "alice").await;

    let response = authed_get(&app, "not-a-real-token", "/api/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_me() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["username"], "alice");
    assert_eq!(json["is_admin"], false);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = authed_get(&app, &token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_credentials_rotates_session() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    // Wrong current password
    let response = authed_json(
        &app,
        &token,
        "PUT",
        "/api/me/credentials",
        serde_json::json!({
            "current_password": "Wr0ng!pass",
            "new_password": "N3w!passwd"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = authed_json(
        &app,
        &token,
        "PUT",
        "/api/me/credentials",
        serde_json::json!({
            "current_password": "Str0ng!pass",
            "new_password": "N3w!passwd"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let new_token = json["token"].as_str().unwrap().to_string();

    // The old session dies with the old password
    let response = authed_get(&app, &token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = authed_get(&app, &new_token, "/api/me").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Only the new password logs in
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({
                        "username": "alice",
                        "password": "N3w!passwd"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_credentials_rejects_taken_username() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;
    register_user(&app, "bob").await;

    let response = authed_json(
        &app,
        &token,
        "PUT",
        "/api/me/credentials",
        serde_json::json!({
            "current_password": "Str0ng!pass",
            "new_username": "bob"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_transaction_crud() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Groceries",
        "amount": 85.50,
        "category": "Food",
        "type": "expense",
        "payment_method": "Credit Card",
        "notes": "weekly shop"
    });

    let response = authed_json(&app, &token, "POST", "/api/transactions", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let tx_id = json["id"].as_i64().unwrap();
    assert_eq!(json["description"], "Groceries");
    assert_eq!(json["category"], "Food");
    assert_eq!(json["type"], "expense");

    // List contains it
    let response = authed_get(&app, &token, "/api/transactions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Update
    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Groceries and snacks",
        "amount": 92.00,
        "category": "Food",
        "type": "expense",
        "payment_method": "Cash",
        "notes": null
    });
    let response = authed_json(
        &app,
        &token,
        "PUT",
        &format!("/api/transactions/{}", tx_id),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["description"], "Groceries and snacks");
    assert_eq!(json["payment_method"], "Cash");

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", tx_id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = authed_get(&app, &token, &format!("/api/transactions/{}", tx_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transaction_invalid_amount() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Bad",
        "amount": -5.0,
        "category": "Food",
        "type": "expense",
        "payment_method": "Cash",
        "notes": null
    });

    let response = authed_json(&app, &token, "POST", "/api/transactions", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transactions_isolated_between_users() {
    let app = setup_test_app();
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Private",
        "amount": 10.0,
        "category": "Other",
        "type": "expense",
        "payment_method": "Cash",
        "notes": null
    });
    let response = authed_json(&app, &alice, "POST", "/api/transactions", body).await;
    let json = get_body_json(response).await;
    let tx_id = json["id"].as_i64().unwrap();

    // Bob sees an empty ledger and cannot fetch Alice's transaction
    let response = authed_get(&app, &bob, "/api/transactions").await;
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());

    let response = authed_get(&app, &bob, &format!("/api/transactions/{}", tx_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transaction_search() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    for (desc, notes) in [("Coffee shop", None), ("Rent", Some("monthly payment"))] {
        let body = serde_json::json!({
            "date": "2026-01-15T10:30:00",
            "description": desc,
            "amount": 10.0,
            "category": "Other",
            "type": "expense",
            "payment_method": "Cash",
            "notes": notes
        });
        let response = authed_json(&app, &token, "POST", "/api/transactions", body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = authed_get(&app, &token, "/api/transactions/search?q=coffee").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["description"], "Coffee shop");

    // Notes are searched too
    let response = authed_get(&app, &token, "/api/transactions/search?q=monthly").await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transaction_export_csv() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Groceries",
        "amount": 85.50,
        "category": "Food",
        "type": "expense",
        "payment_method": "Cash",
        "notes": null
    });
    authed_json(&app, &token, "POST", "/api/transactions", body).await;

    let response = authed_get(&app, &token, "/api/transactions/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("date,description,amount,category,type,payment_method,notes"));
    assert!(csv.contains("Groceries"));
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_budget_overlap_conflict() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "category": "Food",
        "amount": 400.0,
        "period": "monthly"
    });
    let response = authed_json(&app, &token, "POST", "/api/budgets", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Same category, same period: overlaps
    let response = authed_json(&app, &token, "POST", "/api/budgets", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Different category is fine
    let body = serde_json::json!({
        "category": "Entertainment",
        "amount": 100.0,
        "period": "monthly"
    });
    let response = authed_json(&app, &token, "POST", "/api/budgets", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_budget_status_tracks_spending() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "category": "Food",
        "amount": 100.0,
        "period": "monthly"
    });
    let response = authed_json(&app, &token, "POST", "/api/budgets", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // An expense inside the current month counts against the budget
    let now = chrono::Local::now().naive_local();
    let body = serde_json::json!({
        "date": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "description": "Dinner",
        "amount": 60.0,
        "category": "Food",
        "type": "expense",
        "payment_method": "Cash",
        "notes": null
    });
    let response = authed_json(&app, &token, "POST", "/api/transactions", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = authed_get(&app, &token, "/api/budgets/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let statuses = json.as_array().unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["spent"].as_f64().unwrap(), 60.0);
    assert_eq!(statuses[0]["progress"].as_f64().unwrap(), 60.0);
}

#[tokio::test]
async fn test_budget_invalid_threshold() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "category": "Food",
        "amount": 100.0,
        "period": "monthly",
        "alert_threshold": 150.0
    });
    let response = authed_json(&app, &token, "POST", "/api/budgets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Savings Goal API Tests ==========

#[tokio::test]
async fn test_goal_lifecycle() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "name": "Emergency Fund",
        "target_amount": 1000.0,
        "deadline": "2026-12-31"
    });
    let response = authed_json(&app, &token, "POST", "/api/goals", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let goal_id = json["id"].as_i64().unwrap();
    assert_eq!(json["status"], "active");
    assert_eq!(json["current_amount"].as_f64().unwrap(), 0.0);

    // Partial progress stays active
    let body = serde_json::json!({ "current_amount": 400.0 });
    let response = authed_json(
        &app,
        &token,
        "PUT",
        &format!("/api/goals/{}/progress", goal_id),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "active");

    // Reaching the target completes the goal
    let body = serde_json::json!({ "current_amount": 1000.0 });
    let response = authed_json(
        &app,
        &token,
        "PUT",
        &format!("/api/goals/{}/progress", goal_id),
        body,
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "completed");
}

#[tokio::test]
async fn test_goal_negative_progress_rejected() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "name": "Vacation",
        "target_amount": 500.0,
        "deadline": null
    });
    let response = authed_json(&app, &token, "POST", "/api/goals", body).await;
    let json = get_body_json(response).await;
    let goal_id = json["id"].as_i64().unwrap();

    let body = serde_json::json!({ "current_amount": -10.0 });
    let response = authed_json(
        &app,
        &token,
        "PUT",
        &format!("/api/goals/{}/progress", goal_id),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Report API Tests ==========

#[tokio::test]
async fn test_report_summary_empty() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/reports/summary").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["income"].as_f64().unwrap(), 0.0);
    assert_eq!(json["expenses"].as_f64().unwrap(), 0.0);
    assert_eq!(json["savings"].as_f64().unwrap(), 0.0);
    assert!(json["categories"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_report_summary_with_window() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let now = chrono::Local::now().naive_local();
    let body = serde_json::json!({
        "date": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "description": "Salary",
        "amount": 3000.0,
        "category": "Salary",
        "type": "income",
        "payment_method": "Direct Deposit",
        "notes": null
    });
    authed_json(&app, &token, "POST", "/api/transactions", body).await;

    let response = authed_get(&app, &token, "/api/reports/summary?window=weekly").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["income"].as_f64().unwrap(), 3000.0);
    assert_eq!(json["income_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_report_invalid_window() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/reports/summary?window=decade").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_balance_is_signed() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    for (amount, kind, category, method) in [
        (1000.0, "income", "Salary", "Direct Deposit"),
        (400.0, "expense", "Housing", "Bank Transfer"),
    ] {
        let body = serde_json::json!({
            "date": "2026-01-15T10:30:00",
            "description": "entry",
            "amount": amount,
            "category": category,
            "type": kind,
            "payment_method": method,
            "notes": null
        });
        authed_json(&app, &token, "POST", "/api/transactions", body).await;
    }

    let response = authed_get(&app, &token, "/api/balance").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["balance"].as_f64().unwrap(), 600.0);
}

#[tokio::test]
async fn test_report_monthly_rollup() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Rent",
        "amount": 800.0,
        "category": "Housing",
        "type": "expense",
        "payment_method": "Bank Transfer",
        "notes": null
    });
    authed_json(&app, &token, "POST", "/api/transactions", body).await;

    let response = authed_get(&app, &token, "/api/reports/monthly").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let months = json.as_array().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0]["month"], "2026-01");
    assert_eq!(months[0]["expenses"].as_f64().unwrap(), 800.0);
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_insights_fallback_on_empty_ledger() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/insights").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["type"], "info");
    assert_eq!(
        insights[0]["message"],
        "Add more transactions to get detailed financial insights."
    );
}

#[tokio::test]
async fn test_insights_flag_exceeded_budget() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "category": "Food",
        "amount": 100.0,
        "period": "monthly"
    });
    authed_json(&app, &token, "POST", "/api/budgets", body).await;

    let now = chrono::Local::now().naive_local();
    let body = serde_json::json!({
        "date": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "description": "Restaurant",
        "amount": 150.0,
        "category": "Food",
        "type": "expense",
        "payment_method": "Credit Card",
        "notes": null
    });
    authed_json(&app, &token, "POST", "/api/transactions", body).await;

    let response = authed_get(&app, &token, "/api/insights").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    let exceeded = insights.iter().find(|i| {
        i["message"]
            .as_str()
            .unwrap()
            .contains("exceeded your Food budget")
    });
    assert!(exceeded.is_some());
    assert_eq!(exceeded.unwrap()["type"], "danger");
}

// ========== Settings API Tests ==========

#[tokio::test]
async fn test_settings_roundtrip() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/settings").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["currency"], "USD");

    let body = serde_json::json!({
        "currency": "EUR",
        "notification_budget": true,
        "notification_goals": false
    });
    let response = authed_json(&app, &token, "PUT", "/api/settings", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = authed_get(&app, &token, "/api/settings").await;
    let json = get_body_json(response).await;
    assert_eq!(json["currency"], "EUR");
    assert_eq!(json["notification_budget"], true);
}

// ========== Admin API Tests ==========

async fn setup_admin(app: &Router) -> String {
    let body = serde_json::json!({
        "username": "admin",
        "email": "admin@example.com",
        "password": "Adm1n!pass"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/setup-admin")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_setup_admin_only_once() {
    let app = setup_test_app();
    setup_admin(&app).await;

    let body = serde_json::json!({
        "username": "admin2",
        "email": "admin2@example.com",
        "password": "Adm1n!pass"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/setup-admin")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_endpoints_require_admin() {
    let app = setup_test_app();
    let token = register_user(&app, "alice").await;

    let response = authed_get(&app, &token, "/api/admin/users").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_list_users_with_balances() {
    let app = setup_test_app();
    let admin = setup_admin(&app).await;
    let alice = register_user(&app, "alice").await;

    let body = serde_json::json!({
        "date": "2026-01-15T10:30:00",
        "description": "Salary",
        "amount": 2000.0,
        "category": "Salary",
        "type": "income",
        "payment_method": "Direct Deposit",
        "notes": null
    });
    authed_json(&app, &alice, "POST", "/api/transactions", body).await;

    let response = authed_get(&app, &admin, "/api/admin/users").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let users = json.as_array().unwrap();
    // Admin accounts are not listed
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[0]["balance"].as_f64().unwrap(), 2000.0);
}

#[tokio::test]
async fn test_admin_toggle_revokes_sessions() {
    let app = setup_test_app();
    let admin = setup_admin(&app).await;
    let alice = register_user(&app, "alice").await;

    // Look up Alice's id through the admin listing
    let response = authed_get(&app, &admin, "/api/admin/users").await;
    let json = get_body_json(response).await;
    let alice_id = json.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/admin/users/{}/toggle", alice_id))
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["active"], false);

    // Deactivation invalidated Alice's session
    let response = authed_get(&app, &alice, "/api/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // And she cannot log back in until reactivated
    let body = serde_json::json!({
        "username": "alice",
        "password": "Str0ng!pass"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_toggle_admin() {
    let app = setup_test_app();
    let admin = setup_admin(&app).await;

    let response = authed_get(&app, &admin, "/api/me").await;
    let json = get_body_json(response).await;
    let admin_id = json["id"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/admin/users/{}/toggle", admin_id))
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
