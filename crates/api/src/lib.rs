// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The API boundary of the Cargolink marketplace.
//!
//! Handlers here are synchronous and transport-agnostic: they take the
//! persistence layer, a typed request and the authenticated caller, and
//! return a response DTO or an `ApiError`. The HTTP server wraps them.

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

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    accept_shipment, approve_user, confirm_delivery, create_negotiation, create_payment,
    create_shipment, current_user, decline_shipment, get_shipment, health, list_available_shipments,
    list_earnings, list_messages, list_negotiations, list_pending_payouts, list_pending_users,
    list_shipments, list_spending, login, logout, process_payout, register, reject_user,
    respond_to_negotiation, send_message, shipment_history, update_shipment,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ConfirmDeliveryRequest, CreateNegotiationRequest, CreatePaymentRequest,
    CreateShipmentRequest, HealthResponse, LoginRequest, LoginResponse, MessageInfo,
    MessageResponse, NegotiationInfo, PaymentInfo, PayoutInfo, RegisterRequest, RegisterResponse,
    RespondNegotiationRequest, SendMessageRequest, ShipmentEventInfo, ShipmentInfo,
    UpdateShipmentRequest, UserInfo,
};

// The role type is shared with the domain so handlers and callers agree on it.
pub use cargolink_domain::Role;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
