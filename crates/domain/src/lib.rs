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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod account;
mod customer_code;
mod error;
mod negotiation_status;
mod payment;
mod shipment_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use account::{ApprovalStatus, Role, may_log_in};
pub use customer_code::{CUSTOMER_CODE_LENGTH, CustomerCode};
pub use error::DomainError;
pub use negotiation_status::NegotiationStatus;
pub use payment::{AGENT_SHARE_PERCENT, PaymentStatus, PaymentType, PayoutSplit};
pub use shipment_status::{ShipmentStatus, ShipmentType};
pub use types::{Message, Negotiation, Payment, Shipment, User};
pub use validation::{
    MAX_AMOUNT, MAX_AMOUNT_SCALE, MAX_MESSAGE_LENGTH, normalize_currency, parse_pickup_date,
    validate_amount, validate_destination, validate_full_name, validate_message_text,
    validate_notes, validate_positive, validate_shipment_text, validate_username,
};

// Decimal is part of the public surface of every amount-carrying type.
pub use rust_decimal::Decimal;
