// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_audit::AuditEvent;
use cargolink_domain::{
    CustomerCode, Decimal, NegotiationStatus, PaymentStatus, PaymentType, Shipment,
    ShipmentStatus, ShipmentType,
};

/// The lifecycle fields of a shipment that transitions read and write.
///
/// A transition is persisted as a conditional update: the row is only
/// changed if it still matches the expected `LifecycleState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleState {
    pub status: ShipmentStatus,
    pub payment_status: PaymentStatus,
    pub agent_id: Option<i64>,
}

impl LifecycleState {
    /// Captures the lifecycle fields of a shipment.
    #[must_use]
    pub const fn of(shipment: &Shipment) -> Self {
        Self {
            status: shipment.status,
            payment_status: shipment.payment_status,
            agent_id: shipment.agent_id,
        }
    }
}

/// A payment row to be written alongside a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub shipment_id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub customer_code: Option<CustomerCode>,
}

/// The result of a successful lifecycle transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The shipment being changed.
    pub shipment_id: i64,
    /// The state the row must still be in for the change to apply.
    pub expected: LifecycleState,
    /// The state after the transition.
    pub new_state: LifecycleState,
    /// Set when the transition records a delivery.
    pub proof_of_delivery: Option<String>,
    /// A payment row created by the transition, if any.
    pub ledger_entry: Option<LedgerEntry>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The descriptive fields of a shipment, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDetails {
    pub origin: String,
    pub destination: Option<String>,
    pub cargo_type: String,
    pub weight: Decimal,
    pub distance: Option<Decimal>,
    pub currency: String,
    pub offered_amount: Decimal,
    pub pickup_date: Option<String>,
}

impl ShipmentDetails {
    /// Extracts the descriptive fields of a shipment.
    #[must_use]
    pub fn of(shipment: &Shipment) -> Self {
        Self {
            origin: shipment.origin.clone(),
            destination: shipment.destination.clone(),
            cargo_type: shipment.cargo_type.clone(),
            weight: shipment.weight,
            distance: shipment.distance,
            currency: shipment.currency.clone(),
            offered_amount: shipment.offered_amount,
            pickup_date: shipment.pickup_date.clone(),
        }
    }
}

/// A partial update to the descriptive fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentChanges {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub cargo_type: Option<String>,
    pub weight: Option<Decimal>,
    pub distance: Option<Decimal>,
    pub currency: Option<String>,
    pub offered_amount: Option<Decimal>,
    pub pickup_date: Option<String>,
}

impl ShipmentChanges {
    /// Returns true if no field is being changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.origin.is_none()
            && self.destination.is_none()
            && self.cargo_type.is_none()
            && self.weight.is_none()
            && self.distance.is_none()
            && self.currency.is_none()
            && self.offered_amount.is_none()
            && self.pickup_date.is_none()
    }
}

/// The result of a successful details update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsUpdate {
    pub shipment_id: i64,
    /// The row must still be in this state for the update to apply.
    pub expected: LifecycleState,
    /// The merged and validated fields.
    pub details: ShipmentDetails,
    pub audit_event: AuditEvent,
}

/// A validated shipment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub partner_id: i64,
    pub shipment_type: ShipmentType,
    pub details: ShipmentDetails,
    pub notes: Option<String>,
}

/// A validated price proposal ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNegotiation {
    pub shipment_id: i64,
    pub proposed_by: i64,
    pub proposed_amount: Decimal,
    pub currency: String,
    pub message: Option<String>,
}

/// A negotiated price written onto a shipment when a proposal is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceUpdate {
    pub shipment_id: i64,
    pub negotiated_amount: Decimal,
    /// The shipment's payment status must still match for the price to change.
    pub expected_payment_status: PaymentStatus,
    pub audit_event: AuditEvent,
}

/// The result of answering a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationResponse {
    pub negotiation_id: i64,
    pub new_status: NegotiationStatus,
    /// Present when the proposal was accepted.
    pub price_update: Option<PriceUpdate>,
}

/// The result of processing a payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutCompletion {
    pub payment_id: i64,
    pub shipment_id: i64,
    /// The shipment's payment status must still match for the payout to apply.
    pub expected_shipment_payment_status: PaymentStatus,
    pub audit_event: AuditEvent,
}
