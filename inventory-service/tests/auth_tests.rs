mod common;

use common::TestApp;
use common::ADMIN_PASSWORD;
use common::ADMIN_USERNAME;
use common::OPERATOR_PASSWORD;
use common::OPERATOR_USERNAME;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

#[tokio::test]
async fn test_login_with_json_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["token"]["id"].as_str().expect("token.id is a string");
    assert_eq!(id.len(), 36);

    // "%Y-%m-%d %H:%M:%S"
    let expire = body["token"]["expire"].as_str().expect("token.expire is a string");
    assert_eq!(expire.len(), 19);
    assert_eq!(&expire[10..11], " ");
}

#[tokio::test]
async fn test_login_with_form_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"]["id"].is_string());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_login_unknown_user_looks_like_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .json(&json!({ "username": "nobody", "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unsupported_content_type() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .header("Content-Type", "text/plain")
        .body("admin:secret")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unsupported Content-Type");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/osimages")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_unknown_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/osimages", "0b8e4c2a-1f7d-4a8e-9c3b-5d6e7f809a1b")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, "Logged out");

    let response = app
        .get_authenticated("/osimages", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_accepts_stale_token() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_active_token() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .post_authenticated("/auth/refresh", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, "Token refreshed");
}

#[tokio::test]
async fn test_stale_token_without_credentials_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .get_authenticated("/osimages", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_token_with_owner_credentials_is_accepted() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .get_authenticated("/osimages", &token)
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stale_token_refreshed_with_form_credentials() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .post_authenticated("/auth/refresh", &token)
        .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Active again, so no credentials needed.
    let response = app
        .get_authenticated("/osimages", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stale_token_with_other_account_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .get_authenticated("/osimages", &token)
        .json(&json!({ "username": OPERATOR_USERNAME, "password": OPERATOR_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_token_with_wrong_password_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 1).await;

    let response = app
        .get_authenticated("/osimages", &token)
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dead_token_is_rejected_even_with_credentials() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 48).await;

    let response = app
        .get_authenticated("/osimages", &token)
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_without_token_then_with_token() {
    let app = TestApp::spawn().await;
    let document = json!({
        "meta": { "name": "compute" },
        "spec": { "imagetype": "linux", "provmethod": "install" }
    });

    let response = app
        .post("/osimages")
        .json(&document)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login().await;
    let response = app
        .post_authenticated("/osimages", &token)
        .json(&document)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    app.post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post_authenticated("/osimages", &token)
        .json(&document)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_dead_token_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.insert_expired_token(ADMIN_USERNAME, 48).await;

    let response = app
        .post_authenticated("/auth/refresh", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_authenticated("/auth/refresh", &token)
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_without_content_type_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login")
        .body(r#"{"username":"admin","password":"secret"}"#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
