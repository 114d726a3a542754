mod common;

use chrono::Duration;
use chrono::Utc;
use common::SentEmail;
use common::TestApp;
use serde_json::json;
use serde_json::Value;

async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> reqwest::Response {
    app.post("/api/auth/register")
        .json(&json!({ "name": name, "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn login(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request")
}

/// Register and verify an account, draining its notification emails.
async fn register_verified(app: &TestApp, name: &str, email: &str, password: &str) {
    let response = register(app, name, email, password).await;
    assert_eq!(response.status(), 201);

    let token = app.verification_token_for(email).await;
    let response = app
        .get(&format!("/api/auth/verify/{}", token))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    // verification_token_for consumed the verification email; drain the
    // welcome email registration also sent so the queue is clean.
    let _ = app.next_email().await;
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = register(&app, "Jane Doe", "jane@example.com", "password123").await;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["msg"],
        "User registered. Check your email for verification link."
    );

    // Verification email first, then the welcome email
    let first = app.next_email().await;
    match first {
        SentEmail::Verification { email, token } => {
            assert_eq!(email, "jane@example.com");
            assert_eq!(token.len(), 64);
        }
        other => panic!("Expected verification email, got {:?}", other),
    }
    assert_eq!(
        app.next_email().await,
        SentEmail::Welcome {
            email: "jane@example.com".to_string()
        }
    );
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    let response = register(&app, "Jane", "jane@example.com", "password123").await;
    assert_eq!(response.status(), 201);

    let response = register(&app, "Other Jane", "jane@example.com", "different456").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Email already registered");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::spawn().await;

    let response = register(&app, "   ", "jane@example.com", "password123").await;
    assert_eq!(response.status(), 400);

    let response = register(&app, "Jane", "not-an-email", "password123").await;
    assert_eq!(response.status(), 400);

    let response = register(&app, "Jane", "jane@example.com", "short").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Password must be at least 6 characters long");
}

#[tokio::test]
async fn test_verify_email_page_and_single_use() {
    let app = TestApp::spawn().await;

    let response = register(&app, "Jane", "jane@example.com", "password123").await;
    assert_eq!(response.status(), 201);
    let token = app.verification_token_for("jane@example.com").await;

    let response = app
        .get(&format!("/api/auth/verify/{}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("/login"));

    // The token was consumed; a second visit must fail
    let response = app
        .get(&format!("/api/auth/verify/{}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let html = response.text().await.unwrap();
    assert!(html.contains("Invalid or expired verification token"));
}

#[tokio::test]
async fn test_verify_email_unknown_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/auth/verify/0000000000000000000000000000000000000000000000000000000000000000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_login_before_verification() {
    let app = TestApp::spawn().await;

    let response = register(&app, "Jane", "jane@example.com", "password123").await;
    assert_eq!(response.status(), 201);

    let response = login(&app, "jane@example.com", "password123").await;

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Please verify your email first");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane Doe", "jane@example.com", "password123").await;

    let response = login(&app, "jane@example.com", "password123").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Login successful");
    assert_eq!(body["user"]["name"], "Jane Doe");
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert!(body["user"]["id"].is_string());

    // Session token is a valid 7-day JWT whose subject is the user id
    let claims: auth::Claims = app
        .jwt_handler
        .decode(body["token"].as_str().unwrap())
        .expect("Session token should decode");
    assert_eq!(claims.sub, body["user"]["id"].as_str().unwrap());
    assert_eq!(claims.exp - claims.iat, 168 * 3600);
}

#[tokio::test]
async fn test_login_sends_alert_email() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let response = login(&app, "jane@example.com", "password123").await;
    assert_eq!(response.status(), 200);

    assert_eq!(
        app.next_email().await,
        SentEmail::LoginAlert {
            email: "jane@example.com".to_string()
        }
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let response = login(&app, "jane@example.com", "wrong-password").await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::spawn().await;

    let response = login(&app, "nobody@example.com", "password123").await;

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "User not found");
}

#[tokio::test]
async fn test_forgot_password_sends_reset_email() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let response = app
        .post("/api/auth/forgot")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Password reset email sent. Check your inbox.");

    let token = app.reset_token_for("jane@example.com").await;
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/forgot")
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_reset_password_full_flow() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "old-password").await;

    let response = app
        .post("/api/auth/forgot")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let token = app.reset_token_for("jane@example.com").await;

    let response = app
        .post(&format!("/api/auth/reset/{}", token))
        .json(&json!({ "password": "new-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Password reset successful. You can now log in.");

    // Old password no longer works, new one does
    let response = login(&app, "jane@example.com", "old-password").await;
    assert_eq!(response.status(), 400);
    let response = login(&app, "jane@example.com", "new-password").await;
    assert_eq!(response.status(), 200);

    // The token was consumed and cannot be replayed
    let response = app
        .post(&format!("/api/auth/reset/{}", token))
        .json(&json!({ "password": "third-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Invalid or expired token");
}

#[tokio::test]
async fn test_reset_password_expired_token() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let response = app
        .post("/api/auth/forgot")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let token = app.reset_token_for("jane@example.com").await;

    app.repository
        .expire_reset_token("jane@example.com", Utc::now() - Duration::minutes(1));

    let response = app
        .post(&format!("/api/auth/reset/{}", token))
        .json(&json!({ "password": "new-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Invalid or expired token");
}

#[tokio::test]
async fn test_reset_password_rejects_short_password() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let response = app
        .post("/api/auth/forgot")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let token = app.reset_token_for("jane@example.com").await;

    let response = app
        .post(&format!("/api/auth/reset/{}", token))
        .json(&json!({ "password": "short" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    // Policy rejection must not have consumed the token
    let response = app
        .post(&format!("/api/auth/reset/{}", token))
        .json(&json!({ "password": "long-enough" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_forgot_password_latest_token_wins() {
    let app = TestApp::spawn().await;
    register_verified(&app, "Jane", "jane@example.com", "password123").await;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let response = app
            .post("/api/auth/forgot")
            .json(&json!({ "email": "jane@example.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        tokens.push(app.reset_token_for("jane@example.com").await);
    }
    let (first, second) = (tokens[0].clone(), tokens[1].clone());
    assert_ne!(first, second);

    // The first token was overwritten by the second request
    let response = app
        .post(&format!("/api/auth/reset/{}", first))
        .json(&json!({ "password": "new-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .post(&format!("/api/auth/reset/{}", second))
        .json(&json!({ "password": "new-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
