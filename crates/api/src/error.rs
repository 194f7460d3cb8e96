// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API-specific error types.
//!
//! These errors are distinct from domain and core errors and represent
//! the API contract. Each lower layer's error is translated explicitly.

use cargolink::CoreError;
use cargolink_domain::DomainError;
use cargolink_persistence::PersistenceError;
use thiserror::Error;

use crate::password_policy::PasswordPolicyError;

/// Authentication and account-gate errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The account exists but has not been approved yet.
    #[error("Your account is pending admin approval")]
    PendingApproval,
    /// The account was rejected by an admin.
    #[error("Your account registration has been rejected")]
    Rejected,
    /// Only partners and agents may self-register.
    #[error("Role '{role}' cannot self-register")]
    ForbiddenRole {
        /// The requested role.
        role: String,
    },
    /// The username is already taken.
    #[error("Username '{username}' is already taken")]
    DuplicateUsername {
        /// The requested username.
        username: String,
    },
    /// Missing, unknown or expired session.
    #[error("Not authenticated: {reason}")]
    SessionInvalid {
        /// Why the session was refused.
        reason: String,
    },
    /// The caller's role or relationship to the resource does not permit the action.
    #[error("Unauthorized: cannot {action} ({reason})")]
    Unauthorized {
        /// The attempted action.
        action: String,
        /// Why it was refused.
        reason: String,
    },
}

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// The error message.
        message: String,
    },
    /// The caller could not be authenticated.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason for failure.
        reason: String,
    },
    /// The account has not been approved yet.
    #[error("Your account is pending admin approval")]
    PendingApproval,
    /// The account was rejected.
    #[error("Your account registration has been rejected")]
    Rejected,
    /// The caller may not perform the action.
    #[error("Unauthorized: cannot {action} ({reason})")]
    Unauthorized {
        /// The attempted action.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// A requested resource does not exist.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The kind of resource.
        resource_type: String,
        /// Details.
        message: String,
    },
    /// The resource is not in the state the request requires.
    #[error("{message}")]
    Conflict {
        /// Details.
        message: String,
    },
    /// The delivery code does not match the code issued at payment.
    #[error("Customer code does not match")]
    CodeMismatch,
    /// Something failed that the caller cannot fix.
    #[error("Internal error: {message}")]
    Internal {
        /// Details, logged but not shown to callers.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::SessionInvalid { reason } => Self::AuthenticationFailed { reason },
            AuthError::PendingApproval => Self::PendingApproval,
            AuthError::Rejected => Self::Rejected,
            AuthError::ForbiddenRole { role } => Self::Unauthorized {
                action: String::from("register"),
                reason: format!("role '{role}' cannot self-register"),
            },
            AuthError::DuplicateUsername { username } => Self::Conflict {
                message: format!("Username '{username}' is already taken"),
            },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// Lifecycle violations become `Conflict`; malformed values become
/// `InvalidInput`.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(role) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role: {role}"),
        },
        DomainError::InvalidApprovalStatus(value) => ApiError::InvalidInput {
            field: String::from("isApproved"),
            message: format!("Invalid approval status: {value}"),
        },
        DomainError::InvalidShipmentStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid shipment status: {status}"),
        },
        DomainError::InvalidShipmentType(value) => ApiError::InvalidInput {
            field: String::from("shipmentType"),
            message: format!("Invalid shipment type: {value}"),
        },
        DomainError::InvalidPaymentStatus(value) => ApiError::InvalidInput {
            field: String::from("paymentStatus"),
            message: format!("Invalid payment status: {value}"),
        },
        DomainError::InvalidPaymentType(value) => ApiError::InvalidInput {
            field: String::from("paymentType"),
            message: format!("Invalid payment type: {value}"),
        },
        DomainError::InvalidNegotiationStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid negotiation status: {value}"),
        },
        e @ (DomainError::InvalidStatusTransition { .. }
        | DomainError::PriceLocked { .. }
        | DomainError::NegotiationAlreadyAccepted { .. }
        | DomainError::ShipmentClosed { .. }) => ApiError::Conflict {
            message: e.to_string(),
        },
        DomainError::InvalidCustomerCode(msg) => ApiError::InvalidInput {
            field: String::from("customerCode"),
            message: msg,
        },
        DomainError::CustomerCodeMismatch => ApiError::CodeMismatch,
        DomainError::InvalidUsername(msg) => ApiError::InvalidInput {
            field: String::from("username"),
            message: msg,
        },
        DomainError::InvalidFullName(msg) => ApiError::InvalidInput {
            field: String::from("fullName"),
            message: msg,
        },
        DomainError::InvalidCurrency(msg) => ApiError::InvalidInput {
            field: String::from("currency"),
            message: msg,
        },
        DomainError::InvalidAmount { field, reason }
        | DomainError::InvalidShipmentField { field, reason } => ApiError::InvalidInput {
            field: field.to_string(),
            message: reason,
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("pickupDate"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::MissingDestination => ApiError::InvalidInput {
            field: String::from("destination"),
            message: String::from("Delivery shipments require a destination"),
        },
        DomainError::InvalidMessage(msg) => ApiError::InvalidInput {
            field: String::from("message"),
            message: msg,
        },
        e @ DomainError::AmountMismatch { .. } => ApiError::InvalidInput {
            field: String::from("amount"),
            message: e.to_string(),
        },
        e @ DomainError::CurrencyMismatch { .. } => ApiError::InvalidInput {
            field: String::from("currency"),
            message: e.to_string(),
        },
        DomainError::SelfResponse => ApiError::Unauthorized {
            action: String::from("respond to negotiation"),
            reason: String::from("you made this proposal"),
        },
        e @ DomainError::SplitOverflow { .. } => ApiError::Internal {
            message: e.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// Inputs that no longer belong together mean the shipment moved on
/// between the read and the transition, which the caller sees as a
/// conflict.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InconsistentInput(msg) => ApiError::Conflict { message: msg },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::Conflict(msg) => ApiError::Conflict { message: msg },
        PersistenceError::DuplicateUsername(username) => ApiError::Conflict {
            message: format!("Username '{username}' is already taken"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
