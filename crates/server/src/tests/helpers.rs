// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use cargolink_persistence::Persistence;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const ADMIN_PASSWORD: &str = "admin-password";
pub const USER_PASSWORD: &str = "user-password";

/// Builds a router over a fresh in-memory database with a seeded admin.
pub fn create_test_app() -> Router {
    let mut persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_hash_cost(4);
    persistence
        .ensure_admin("admin", ADMIN_PASSWORD)
        .expect("Failed to seed admin");
    build_router(AppState::new(persistence, false))
}

/// Sends one request, with an optional bearer token and JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Sends a request and asserts the status, returning the JSON body.
pub async fn expect_status(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    status: StatusCode,
) -> Value {
    let response: Response = send(app, method, uri, token, body).await;
    assert_eq!(response.status(), status, "{method} {uri}");
    body_json(response).await
}

/// Logs in and returns the session token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body: Value = expect_status(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
        StatusCode::OK,
    )
    .await;
    body["sessionToken"].as_str().unwrap().to_string()
}

/// Registers a user, has the admin approve it, and logs it in.
pub async fn approved_user(app: &Router, admin_token: &str, username: &str, role: &str) -> String {
    let registered: Value = expect_status(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "password": USER_PASSWORD,
            "fullName": format!("Test {username}"),
            "role": role,
        })),
        StatusCode::OK,
    )
    .await;
    let user_id: i64 = registered["userId"].as_i64().unwrap();
    expect_status(
        app,
        "POST",
        &format!("/api/admin/approve-user/{user_id}"),
        Some(admin_token),
        None,
        StatusCode::OK,
    )
    .await;
    login(app, username, USER_PASSWORD).await
}

/// Tokens for an admin, a partner and two agents on one router.
pub struct Marketplace {
    pub app: Router,
    pub admin: String,
    pub partner: String,
    pub agent: String,
    pub other_agent: String,
}

pub async fn marketplace() -> Marketplace {
    let app: Router = create_test_app();
    let admin: String = login(&app, "admin", ADMIN_PASSWORD).await;
    let partner: String = approved_user(&app, &admin, "partner", "partner").await;
    let agent: String = approved_user(&app, &admin, "agent", "agent").await;
    let other_agent: String = approved_user(&app, &admin, "agent2", "agent").await;
    Marketplace {
        app,
        admin,
        partner,
        agent,
        other_agent,
    }
}

pub fn shipment_body() -> Value {
    json!({
        "origin": "A",
        "destination": "B",
        "shipmentType": "delivery",
        "cargoType": "Electronics",
        "weight": "12.50",
        "currency": "NGN",
        "offeredAmount": 1000,
        "pickupDate": "2026-03-01",
    })
}

/// Creates a shipment as the partner and returns its id.
pub async fn create_shipment(m: &Marketplace) -> i64 {
    let shipment: Value = expect_status(
        &m.app,
        "POST",
        "/api/shipments",
        Some(&m.partner),
        Some(shipment_body()),
        StatusCode::OK,
    )
    .await;
    shipment["id"].as_i64().unwrap()
}
