// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::account::{ApprovalStatus, Role};
use crate::customer_code::CustomerCode;
use crate::error::DomainError;
use crate::negotiation_status::NegotiationStatus;
use crate::payment::{PaymentStatus, PaymentType, PayoutSplit};
use crate::shipment_status::{ShipmentStatus, ShipmentType};
use rust_decimal::Decimal;

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Database identifier.
    pub user_id: i64,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// The account's role.
    pub role: Role,
    /// Where the account stands at the approval gate.
    pub approval: ApprovalStatus,
    /// Creation timestamp.
    pub created_at: String,
}

impl User {
    /// Returns true if this account may log in.
    #[must_use]
    pub const fn may_log_in(&self) -> bool {
        crate::account::may_log_in(self.role, self.approval)
    }
}

/// A transport job offered by a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    /// Database identifier.
    pub shipment_id: i64,
    /// The owning partner.
    pub partner_id: i64,
    /// The assigned agent, if any.
    pub agent_id: Option<i64>,
    /// Pickup location.
    pub origin: String,
    /// Drop-off location; absent for pickup-only jobs.
    pub destination: Option<String>,
    pub shipment_type: ShipmentType,
    pub cargo_type: String,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Distance in kilometres, if known.
    pub distance: Option<Decimal>,
    /// ISO 4217 currency code.
    pub currency: String,
    /// The price the partner offered.
    pub offered_amount: Decimal,
    /// The price agreed through negotiation, overriding the offer.
    pub negotiated_amount: Option<Decimal>,
    /// Pickup date (`YYYY-MM-DD`).
    pub pickup_date: Option<String>,
    pub notes: Option<String>,
    /// Recorded when delivery is confirmed.
    pub proof_of_delivery: Option<String>,
    pub status: ShipmentStatus,
    pub payment_status: PaymentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Shipment {
    /// The amount the partner must pay: the negotiated price if one was
    /// agreed, otherwise the original offer.
    #[must_use]
    pub fn payable_amount(&self) -> Decimal {
        self.negotiated_amount.unwrap_or(self.offered_amount)
    }

    /// Returns true if `user_id` owns this shipment.
    #[must_use]
    pub const fn is_owned_by(&self, user_id: i64) -> bool {
        self.partner_id == user_id
    }

    /// Returns true if `user_id` is the assigned agent.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.agent_id == Some(user_id)
    }

    /// Returns true if `user_id` is the partner or the assigned agent.
    #[must_use]
    pub fn is_participant(&self, user_id: i64) -> bool {
        self.is_owned_by(user_id) || self.is_assigned_to(user_id)
    }
}

/// A proposed alternate price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    pub negotiation_id: i64,
    pub shipment_id: i64,
    /// The user who made the proposal.
    pub proposed_by: i64,
    pub proposed_amount: Decimal,
    pub currency: String,
    pub message: Option<String>,
    pub status: NegotiationStatus,
    pub created_at: String,
}

/// A recorded money movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub payment_id: i64,
    pub shipment_id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    /// Present on partner payments only.
    pub customer_code: Option<CustomerCode>,
    pub processed_at: Option<String>,
    pub created_at: String,
}

impl Payment {
    /// The agent share and platform fee for this payment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SplitOverflow` if the stored amount cannot be split.
    pub fn split(&self) -> Result<PayoutSplit, DomainError> {
        PayoutSplit::compute(self.amount)
    }
}

/// A message in a shipment thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message_id: i64,
    pub shipment_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}
