// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{FromRequest, Path, Request, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use cargolink_api::{
    ApiError, ConfirmDeliveryRequest, CreateNegotiationRequest, CreatePaymentRequest,
    CreateShipmentRequest, HealthResponse, LoginRequest, LoginResponse, MessageInfo,
    MessageResponse, NegotiationInfo, PaymentInfo, PayoutInfo, RegisterRequest, RegisterResponse,
    RespondNegotiationRequest, SendMessageRequest, ShipmentEventInfo, ShipmentInfo,
    UpdateShipmentRequest, UserInfo,
};
use cargolink_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SessionUser, expired_session_cookie, session_cookie};

/// Cargolink Server - HTTP server for the Cargolink shipment marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "CARGOLINK_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "CARGOLINK_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "CARGOLINK_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Username of the platform administrator seeded at startup
    #[arg(long, env = "CARGOLINK_ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Password of the seeded administrator. No admin is seeded without it.
    #[arg(long, env = "CARGOLINK_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// Mark the session cookie `Secure` (serve over HTTPS)
    #[arg(long, env = "CARGOLINK_SECURE_COOKIES")]
    secure_cookies: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Whether session cookies carry the `Secure` flag.
    secure_cookies: bool,
}

impl AppState {
    fn new(persistence: Persistence, secure_cookies: bool) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            secure_cookies,
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } | ApiError::CodeMismatch => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::PendingApproval | ApiError::Rejected | ApiError::Unauthorized { .. } => {
                StatusCode::FORBIDDEN
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { ref message } => {
                error!(error = %message, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Server error"),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// JSON body extractor whose rejections use the error body shape.
struct ValidatedJson<T>(T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected request body");
                Err(HttpError {
                    status: StatusCode::BAD_REQUEST,
                    message: rejection.body_text(),
                })
            }
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Handler for POST `/api/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpError> {
    info!(username = %req.username, role = %req.role, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterResponse = cargolink_api::register(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/auth/login`.
///
/// Sets the session cookie on success.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = cargolink_api::login(&mut persistence, &req)?;
    drop(persistence);

    let jar: CookieJar = jar.add(session_cookie(
        response.session_token.clone(),
        app_state.secure_cookies,
    ));
    Ok((jar, Json(response)))
}

/// Handler for POST `/api/auth/logout`.
///
/// Clears the session cookie.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    jar: CookieJar,
    session: SessionUser,
) -> Result<(CookieJar, Json<MessageResponse>), HttpError> {
    info!(user_id = session.actor.user_id, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = cargolink_api::logout(&mut persistence, &session.token)?;
    drop(persistence);

    Ok((jar.remove(expired_session_cookie()), Json(response)))
}

/// Handler for GET `/api/auth/me`.
async fn handle_me(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<UserInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = cargolink_api::current_user(&mut persistence, &actor)?;
    Ok(Json(user))
}

/// Handler for GET `/api/admin/pending-users`.
async fn handle_pending_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<UserInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let users: Vec<UserInfo> = cargolink_api::list_pending_users(&mut persistence, &actor)?;
    Ok(Json(users))
}

/// Handler for POST `/api/admin/approve-user/{id}`.
async fn handle_approve_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(admin_id = actor.user_id, user_id, "Handling approve_user request");

    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = cargolink_api::approve_user(&mut persistence, user_id, &actor)?;
    Ok(Json(user))
}

/// Handler for POST `/api/admin/reject-user/{id}`.
async fn handle_reject_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(admin_id = actor.user_id, user_id, "Handling reject_user request");

    let mut persistence = app_state.persistence.lock().await;
    let user: UserInfo = cargolink_api::reject_user(&mut persistence, user_id, &actor)?;
    Ok(Json(user))
}

// ============================================================================
// Shipments
// ============================================================================

/// Handler for POST `/api/shipments`.
async fn handle_create_shipment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    ValidatedJson(req): ValidatedJson<CreateShipmentRequest>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    info!(user_id = actor.user_id, "Handling create_shipment request");

    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo = cargolink_api::create_shipment(&mut persistence, &req, &actor)?;
    Ok(Json(shipment))
}

/// Handler for GET `/api/shipments`.
async fn handle_list_shipments(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<ShipmentInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let shipments: Vec<ShipmentInfo> = cargolink_api::list_shipments(&mut persistence, &actor)?;
    Ok(Json(shipments))
}

/// Handler for GET `/api/shipments/available`.
async fn handle_available_shipments(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<ShipmentInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let shipments: Vec<ShipmentInfo> =
        cargolink_api::list_available_shipments(&mut persistence, &actor)?;
    Ok(Json(shipments))
}

/// Handler for GET `/api/shipments/{id}`.
async fn handle_get_shipment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo =
        cargolink_api::get_shipment(&mut persistence, shipment_id, &actor)?;
    Ok(Json(shipment))
}

/// Handler for PUT `/api/shipments/{id}`.
async fn handle_update_shipment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateShipmentRequest>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    info!(user_id = actor.user_id, shipment_id, "Handling update_shipment request");

    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo =
        cargolink_api::update_shipment(&mut persistence, shipment_id, &req, &actor)?;
    Ok(Json(shipment))
}

/// Handler for POST `/api/shipments/{id}/accept`.
async fn handle_accept_shipment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    info!(user_id = actor.user_id, shipment_id, "Handling accept_shipment request");

    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo =
        cargolink_api::accept_shipment(&mut persistence, shipment_id, &actor)?;
    Ok(Json(shipment))
}

/// Handler for POST `/api/shipments/{id}/decline`.
async fn handle_decline_shipment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    info!(user_id = actor.user_id, shipment_id, "Handling decline_shipment request");

    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo =
        cargolink_api::decline_shipment(&mut persistence, shipment_id, &actor)?;
    Ok(Json(shipment))
}

/// Handler for POST `/api/shipments/{id}/confirm-delivery`.
async fn handle_confirm_delivery(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ConfirmDeliveryRequest>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    info!(user_id = actor.user_id, shipment_id, "Handling confirm_delivery request");

    let mut persistence = app_state.persistence.lock().await;
    let shipment: ShipmentInfo =
        cargolink_api::confirm_delivery(&mut persistence, shipment_id, &req, &actor)?;
    Ok(Json(shipment))
}

/// Handler for GET `/api/shipments/{id}/history`.
async fn handle_shipment_history(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<Vec<ShipmentEventInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<ShipmentEventInfo> =
        cargolink_api::shipment_history(&mut persistence, shipment_id, &actor)?;
    Ok(Json(events))
}

// ============================================================================
// Payments
// ============================================================================

/// Handler for POST `/api/payments`.
async fn handle_create_payment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    ValidatedJson(req): ValidatedJson<CreatePaymentRequest>,
) -> Result<Json<PaymentInfo>, HttpError> {
    info!(
        user_id = actor.user_id,
        shipment_id = req.shipment_id,
        "Handling create_payment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let payment: PaymentInfo = cargolink_api::create_payment(&mut persistence, &req, &actor)?;
    Ok(Json(payment))
}

/// Handler for GET `/api/payments/earnings`.
async fn handle_earnings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<PayoutInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let payouts: Vec<PayoutInfo> = cargolink_api::list_earnings(&mut persistence, &actor)?;
    Ok(Json(payouts))
}

/// Handler for GET `/api/payments/spending`.
async fn handle_spending(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<PaymentInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let payments: Vec<PaymentInfo> = cargolink_api::list_spending(&mut persistence, &actor)?;
    Ok(Json(payments))
}

/// Handler for GET `/api/admin/pending-payouts`.
async fn handle_pending_payouts(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
) -> Result<Json<Vec<PayoutInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let payouts: Vec<PayoutInfo> = cargolink_api::list_pending_payouts(&mut persistence, &actor)?;
    Ok(Json(payouts))
}

/// Handler for POST `/api/admin/process-payout/{id}`.
async fn handle_process_payout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(payment_id): Path<i64>,
) -> Result<Json<PayoutInfo>, HttpError> {
    info!(admin_id = actor.user_id, payment_id, "Handling process_payout request");

    let mut persistence = app_state.persistence.lock().await;
    let payout: PayoutInfo = cargolink_api::process_payout(&mut persistence, payment_id, &actor)?;
    Ok(Json(payout))
}

// ============================================================================
// Negotiations
// ============================================================================

/// Handler for POST `/api/negotiations`.
async fn handle_create_negotiation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    ValidatedJson(req): ValidatedJson<CreateNegotiationRequest>,
) -> Result<Json<NegotiationInfo>, HttpError> {
    info!(
        user_id = actor.user_id,
        shipment_id = req.shipment_id,
        "Handling create_negotiation request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let negotiation: NegotiationInfo =
        cargolink_api::create_negotiation(&mut persistence, &req, &actor)?;
    Ok(Json(negotiation))
}

/// Handler for GET `/api/negotiations/{id}`, keyed by shipment.
async fn handle_list_negotiations(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<Vec<NegotiationInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let negotiations: Vec<NegotiationInfo> =
        cargolink_api::list_negotiations(&mut persistence, shipment_id, &actor)?;
    Ok(Json(negotiations))
}

/// Handler for POST `/api/negotiations/{id}/respond`.
async fn handle_respond_negotiation(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(negotiation_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<RespondNegotiationRequest>,
) -> Result<Json<NegotiationInfo>, HttpError> {
    info!(
        user_id = actor.user_id,
        negotiation_id,
        status = %req.status,
        "Handling respond_negotiation request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let negotiation: NegotiationInfo =
        cargolink_api::respond_to_negotiation(&mut persistence, negotiation_id, &req, &actor)?;
    Ok(Json(negotiation))
}

// ============================================================================
// Messages
// ============================================================================

/// Handler for POST `/api/messages`.
async fn handle_send_message(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<Json<MessageInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let message: MessageInfo = cargolink_api::send_message(&mut persistence, &req, &actor)?;
    Ok(Json(message))
}

/// Handler for GET `/api/messages/{id}`, keyed by shipment.
async fn handle_list_messages(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { actor, .. }: SessionUser,
    Path(shipment_id): Path<i64>,
) -> Result<Json<Vec<MessageInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let messages: Vec<MessageInfo> =
        cargolink_api::list_messages(&mut persistence, shipment_id, &actor)?;
    Ok(Json(messages))
}

/// Handler for GET `/api/health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(cargolink_api::health())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/auth/me", get(handle_me))
        .route("/api/admin/pending-users", get(handle_pending_users))
        .route("/api/admin/approve-user/{id}", post(handle_approve_user))
        .route("/api/admin/reject-user/{id}", post(handle_reject_user))
        .route("/api/admin/pending-payouts", get(handle_pending_payouts))
        .route("/api/admin/process-payout/{id}", post(handle_process_payout))
        .route(
            "/api/shipments",
            post(handle_create_shipment).get(handle_list_shipments),
        )
        .route("/api/shipments/available", get(handle_available_shipments))
        .route(
            "/api/shipments/{id}",
            get(handle_get_shipment).put(handle_update_shipment),
        )
        .route("/api/shipments/{id}/accept", post(handle_accept_shipment))
        .route("/api/shipments/{id}/decline", post(handle_decline_shipment))
        .route(
            "/api/shipments/{id}/confirm-delivery",
            post(handle_confirm_delivery),
        )
        .route("/api/shipments/{id}/history", get(handle_shipment_history))
        .route("/api/payments", post(handle_create_payment))
        .route("/api/payments/earnings", get(handle_earnings))
        .route("/api/payments/spending", get(handle_spending))
        .route("/api/negotiations", post(handle_create_negotiation))
        .route("/api/negotiations/{id}", get(handle_list_negotiations))
        .route(
            "/api/negotiations/{id}/respond",
            post(handle_respond_negotiation),
        )
        .route("/api/messages", post(handle_send_message))
        .route("/api/messages/{id}", get(handle_list_messages))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Cargolink Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(password) = &args.admin_password {
        let admin_id: i64 = persistence.ensure_admin(&args.admin_username, password)?;
        info!(admin_id, username = %args.admin_username, "Platform administrator ready");
    } else {
        warn!("No admin password configured; skipping administrator seed");
    }

    let app: Router = build_router(AppState::new(persistence, args.secure_cookies));

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
