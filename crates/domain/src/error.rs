// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not one of `partner`, `agent`, `admin`.
    InvalidRole(String),
    /// Approval flag is not 0, 1 or 2.
    InvalidApprovalStatus(i32),
    /// Shipment status string is not recognised.
    InvalidShipmentStatus {
        /// The invalid status string.
        status: String,
    },
    /// Shipment type string is not recognised.
    InvalidShipmentType(String),
    /// Payment status string is not recognised.
    InvalidPaymentStatus(String),
    /// Payment type string is not recognised.
    InvalidPaymentType(String),
    /// Negotiation status string is not recognised.
    InvalidNegotiationStatus(String),
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// Customer code is malformed.
    InvalidCustomerCode(String),
    /// The submitted customer code does not match the stored one.
    CustomerCodeMismatch,
    /// Username is empty, too long, or contains forbidden characters.
    InvalidUsername(String),
    /// Full name is empty or too long.
    InvalidFullName(String),
    /// Currency is not a three letter code.
    InvalidCurrency(String),
    /// A monetary or measured quantity is out of range.
    InvalidAmount {
        /// The field carrying the amount.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// Failed to parse a date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A free-text shipment field is empty or too long.
    InvalidShipmentField {
        /// The field name.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A delivery shipment was created without a destination.
    MissingDestination,
    /// Message text is empty or too long.
    InvalidMessage(String),
    /// The amount offered with a payment differs from the payable amount.
    AmountMismatch {
        /// The payable amount.
        expected: Decimal,
        /// The submitted amount.
        actual: Decimal,
    },
    /// The currency offered with a payment differs from the shipment currency.
    CurrencyMismatch {
        /// The shipment currency.
        expected: String,
        /// The submitted currency.
        actual: String,
    },
    /// The shipment has been paid, so its price can no longer change.
    PriceLocked {
        /// The shipment identifier.
        shipment_id: i64,
    },
    /// Another negotiation on the shipment is already accepted.
    NegotiationAlreadyAccepted {
        /// The shipment identifier.
        shipment_id: i64,
    },
    /// The proposer tried to answer their own proposal.
    SelfResponse,
    /// A stored amount cannot be split exactly into agent share and fee.
    SplitOverflow {
        /// The amount that failed to split.
        amount: String,
    },
    /// The shipment is delivered or declined.
    ShipmentClosed {
        /// The shipment identifier.
        shipment_id: i64,
        /// The terminal status.
        status: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidApprovalStatus(value) => {
                write!(f, "Invalid approval status: {value}")
            }
            Self::InvalidShipmentStatus { status } => {
                write!(f, "Invalid shipment status: {status}")
            }
            Self::InvalidShipmentType(value) => write!(f, "Invalid shipment type: {value}"),
            Self::InvalidPaymentStatus(value) => write!(f, "Invalid payment status: {value}"),
            Self::InvalidPaymentType(value) => write!(f, "Invalid payment type: {value}"),
            Self::InvalidNegotiationStatus(value) => {
                write!(f, "Invalid negotiation status: {value}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidCustomerCode(msg) => write!(f, "Invalid customer code: {msg}"),
            Self::CustomerCodeMismatch => {
                write!(f, "Customer code does not match the code issued at payment")
            }
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidFullName(msg) => write!(f, "Invalid full name: {msg}"),
            Self::InvalidCurrency(msg) => write!(f, "Invalid currency: {msg}"),
            Self::InvalidAmount { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidShipmentField { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            Self::MissingDestination => {
                write!(f, "Delivery shipments require a destination")
            }
            Self::InvalidMessage(msg) => write!(f, "Invalid message: {msg}"),
            Self::AmountMismatch { expected, actual } => {
                write!(
                    f,
                    "Payment amount {actual} does not match the payable amount {expected}"
                )
            }
            Self::CurrencyMismatch { expected, actual } => {
                write!(
                    f,
                    "Payment currency {actual} does not match the shipment currency {expected}"
                )
            }
            Self::PriceLocked { shipment_id } => {
                write!(
                    f,
                    "Shipment {shipment_id} has already been paid; its price can no longer change"
                )
            }
            Self::NegotiationAlreadyAccepted { shipment_id } => {
                write!(
                    f,
                    "Shipment {shipment_id} already has an accepted negotiation"
                )
            }
            Self::SelfResponse => write!(f, "You cannot respond to your own proposal"),
            Self::SplitOverflow { amount } => {
                write!(f, "Amount {amount} cannot be split into agent share and fee")
            }
            Self::ShipmentClosed {
                shipment_id,
                status,
            } => {
                write!(f, "Shipment {shipment_id} is {status} and can no longer change")
            }
        }
    }
}

impl std::error::Error for DomainError {}
