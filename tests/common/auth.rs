use axum::http::Method;
use axum::Router;

use super::http::{request, response_json};

/// Registers a fresh random user and returns their access token.
pub async fn register_and_get_token(app: &Router) -> String {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());
    let password = "Passw0rd!";

    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": username,
            "password": password,
        })),
        &[],
    )
    .await;

    let (status, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    body["data"]["accessToken"]
        .as_str()
        .expect("access token in register response")
        .to_string()
}

/// Registers a fresh random user and returns (access_token, user_id).
pub async fn register_and_get_user(app: &Router) -> (String, String) {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());

    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": username,
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    let token = body["data"]["accessToken"]
        .as_str()
        .expect("access token in register response")
        .to_string();
    let user_id = body["data"]["user"]["id"]
        .as_str()
        .expect("user id in register response")
        .to_string();

    (token, user_id)
}

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}
