mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::auth::{auth_header, register_and_get_token};
use common::http::{assert_json_error, assert_status_ok_json, request, response_json};

#[tokio::test]
async fn it_register_login_logout_flow() {
    let app = spawn_test_app().await;

    let email = format!("flow-{}@test.com", uuid::Uuid::new_v4());
    let register = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": "flow user",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, body) = response_json(register).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["email"], email);
    assert!(body["data"]["accessToken"].is_string());

    let login = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": email,
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (login_status, login_body) = response_json(login).await;
    assert_status_ok_json(login_status, &login_body);
    let token = login_body["data"]["accessToken"].as_str().unwrap().to_string();

    let logout = request(
        &app.app,
        Method::POST,
        "/api/auth/logout",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (logout_status, _) = response_json(logout).await;
    assert_eq!(logout_status, StatusCode::OK);

    // The revoked token no longer authenticates.
    let me = request(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (me_status, _) = response_json(me).await;
    assert_eq!(me_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_register_rejects_duplicate_email() {
    let app = spawn_test_app().await;

    let email = format!("dup-{}@test.com", uuid::Uuid::new_v4());
    let payload = serde_json::json!({
        "email": email,
        "username": "dup user",
        "password": "Passw0rd!",
    });

    let first = request(&app.app, Method::POST, "/api/auth/register", Some(payload.clone()), &[]).await;
    let (first_status, _) = response_json(first).await;
    assert_eq!(first_status, StatusCode::CREATED);

    let second = request(&app.app, Method::POST, "/api/auth/register", Some(payload), &[]).await;
    let (second_status, body) = response_json(second).await;
    assert_eq!(second_status, StatusCode::CONFLICT);
    assert_json_error(&body, "AUTH_EMAIL_EXISTS");
}

#[tokio::test]
async fn it_register_validates_inputs() {
    let app = spawn_test_app().await;

    let bad_email = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "not-an-email",
            "username": "someone",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;
    let (status, body) = response_json(bad_email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "AUTH_INVALID_EMAIL");

    let weak_password = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": format!("weak-{}@test.com", uuid::Uuid::new_v4()),
            "username": "someone",
            "password": "short",
        })),
        &[],
    )
    .await;
    let (status, body) = response_json(weak_password).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "AUTH_WEAK_PASSWORD");
}

#[tokio::test]
async fn it_login_rejects_wrong_password() {
    let app = spawn_test_app().await;

    let email = format!("wrong-{}@test.com", uuid::Uuid::new_v4());
    let register = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": "wrong pass",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;
    let (status, _) = response_json(register).await;
    assert_eq!(status, StatusCode::CREATED);

    let login = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": email,
            "password": "NotThePassword1",
        })),
        &[],
    )
    .await;
    let (login_status, body) = response_json(login).await;
    assert_eq!(login_status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_unknown_email_login_is_unauthorized() {
    let app = spawn_test_app().await;

    let login = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "ghost@test.com",
            "password": "Whatever1",
        })),
        &[],
    )
    .await;
    let (status, _) = response_json(login).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_password_change_revokes_sessions() {
    let app = spawn_test_app().await;
    let token = register_and_get_token(&app.app).await;

    let change = request(
        &app.app,
        Method::PUT,
        "/api/users/me/password",
        Some(serde_json::json!({
            "currentPassword": "Passw0rd!",
            "newPassword": "NewPassw0rd!",
        })),
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, body) = response_json(change).await;
    assert_status_ok_json(status, &body);

    let me = request(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (me_status, _) = response_json(me).await;
    assert_eq!(me_status, StatusCode::UNAUTHORIZED);
}
