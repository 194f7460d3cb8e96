// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are camelCase on the wire. Requests reject unknown fields,
//! so a client cannot slip `status` or `paymentStatus` into an edit.

use cargolink_domain::{
    Decimal, Message, Negotiation, NegotiationStatus, Payment, PaymentStatus, PaymentType,
    PayoutSplit, Role, Shipment, ShipmentStatus, ShipmentType, User,
};
use cargolink_persistence::ShipmentEventData;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, translate_domain_error};

// ============================================================================
// Accounts
// ============================================================================

/// API request to register a partner or agent account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    /// `partner` or `agent`.
    pub role: String,
}

/// API response for a successful registration.
///
/// Registration never logs the caller in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
    pub role: Role,
    pub is_approved: i32,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user as shown to clients. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    /// 0 pending, 1 approved, 2 rejected.
    pub is_approved: i32,
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_approved: user.approval.as_flag(),
            created_at: user.created_at.clone(),
        }
    }
}

/// API response for a successful login.
///
/// The token is also set as a cookie by the server; it is returned here
/// for clients that authenticate with a bearer header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub session_token: String,
}

/// A plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Shipments
// ============================================================================

/// API request to post a new shipment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateShipmentRequest {
    pub origin: String,
    #[serde(default)]
    pub destination: Option<String>,
    /// `pickup_only` or `delivery`.
    pub shipment_type: String,
    pub cargo_type: String,
    pub weight: Decimal,
    #[serde(default)]
    pub distance: Option<Decimal>,
    pub currency: String,
    pub offered_amount: Decimal,
    /// ISO 8601 calendar date.
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to edit the descriptive fields of a shipment.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateShipmentRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub cargo_type: Option<String>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub distance: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub offered_amount: Option<Decimal>,
    #[serde(default)]
    pub pickup_date: Option<String>,
}

/// API request for the assigned agent to confirm delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfirmDeliveryRequest {
    pub customer_code: String,
}

/// A shipment as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInfo {
    pub id: i64,
    pub partner_id: i64,
    pub agent_id: Option<i64>,
    pub origin: String,
    pub destination: Option<String>,
    pub shipment_type: ShipmentType,
    pub cargo_type: String,
    pub weight: Decimal,
    pub distance: Option<Decimal>,
    pub currency: String,
    pub offered_amount: Decimal,
    pub negotiated_amount: Option<Decimal>,
    /// The negotiated amount if one was accepted, otherwise the offer.
    pub payable_amount: Decimal,
    pub pickup_date: Option<String>,
    pub notes: Option<String>,
    pub proof_of_delivery: Option<String>,
    pub status: ShipmentStatus,
    pub payment_status: PaymentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Shipment> for ShipmentInfo {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: shipment.shipment_id,
            partner_id: shipment.partner_id,
            agent_id: shipment.agent_id,
            origin: shipment.origin.clone(),
            destination: shipment.destination.clone(),
            shipment_type: shipment.shipment_type,
            cargo_type: shipment.cargo_type.clone(),
            weight: shipment.weight,
            distance: shipment.distance,
            currency: shipment.currency.clone(),
            offered_amount: shipment.offered_amount,
            negotiated_amount: shipment.negotiated_amount,
            payable_amount: shipment.payable_amount(),
            pickup_date: shipment.pickup_date.clone(),
            notes: shipment.notes.clone(),
            proof_of_delivery: shipment.proof_of_delivery.clone(),
            status: shipment.status,
            payment_status: shipment.payment_status,
            created_at: shipment.created_at.clone(),
            updated_at: shipment.updated_at.clone(),
        }
    }
}

/// One entry of a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentEventInfo {
    pub id: i64,
    pub shipment_id: i64,
    pub actor_user_id: i64,
    pub actor_role: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    pub created_at: String,
}

impl From<ShipmentEventData> for ShipmentEventInfo {
    fn from(event: ShipmentEventData) -> Self {
        Self {
            id: event.event_id,
            shipment_id: event.shipment_id,
            actor_user_id: event.actor_user_id,
            actor_role: event.actor_role,
            action: event.action_name,
            details: event.action_details,
            before: event.before_snapshot,
            after: event.after_snapshot,
            created_at: event.created_at,
        }
    }
}

// ============================================================================
// Payments
// ============================================================================

/// API request to pay for an accepted shipment.
///
/// `amount` and `currency` are optional cross-checks against the payable
/// amount. The customer code is generated when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePaymentRequest {
    pub shipment_id: i64,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_code: Option<String>,
}

/// A payment or payout as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub id: i64,
    pub shipment_id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub customer_code: Option<String>,
    pub processed_at: Option<String>,
    pub created_at: String,
}

impl From<&Payment> for PaymentInfo {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.payment_id,
            shipment_id: payment.shipment_id,
            from_user_id: payment.from_user_id,
            to_user_id: payment.to_user_id,
            amount: payment.amount,
            currency: payment.currency.clone(),
            payment_type: payment.payment_type,
            status: payment.status,
            customer_code: payment
                .customer_code
                .as_ref()
                .map(|code| code.value().to_string()),
            processed_at: payment.processed_at.clone(),
            created_at: payment.created_at.clone(),
        }
    }
}

/// A payout with its 95/5 split.
///
/// Used for agent earnings, the admin payout queue, and processed payouts,
/// so every view reports the same split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutInfo {
    #[serde(flatten)]
    pub payment: PaymentInfo,
    pub agent_amount: Decimal,
    pub admin_fee: Decimal,
}

impl TryFrom<&Payment> for PayoutInfo {
    type Error = ApiError;

    fn try_from(payment: &Payment) -> Result<Self, Self::Error> {
        let split: PayoutSplit = payment.split().map_err(translate_domain_error)?;
        Ok(Self {
            payment: PaymentInfo::from(payment),
            agent_amount: split.agent_amount,
            admin_fee: split.admin_fee,
        })
    }
}

// ============================================================================
// Negotiations
// ============================================================================

/// API request to propose a different price.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateNegotiationRequest {
    pub shipment_id: i64,
    pub proposed_amount: Decimal,
    /// Defaults to the shipment's currency.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// API request to answer a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RespondNegotiationRequest {
    /// `accepted` or `rejected`.
    pub status: String,
}

/// A proposal as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationInfo {
    pub id: i64,
    pub shipment_id: i64,
    pub proposed_by: i64,
    pub proposed_amount: Decimal,
    pub currency: String,
    pub message: Option<String>,
    pub status: NegotiationStatus,
    pub created_at: String,
}

impl From<&Negotiation> for NegotiationInfo {
    fn from(negotiation: &Negotiation) -> Self {
        Self {
            id: negotiation.negotiation_id,
            shipment_id: negotiation.shipment_id,
            proposed_by: negotiation.proposed_by,
            proposed_amount: negotiation.proposed_amount,
            currency: negotiation.currency.clone(),
            message: negotiation.message.clone(),
            status: negotiation.status,
            created_at: negotiation.created_at.clone(),
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// API request to send a message on a shipment thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub shipment_id: i64,
    pub receiver_id: i64,
    pub message: String,
}

/// A message as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInfo {
    pub id: i64,
    pub shipment_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    /// 0 unread, 1 read.
    pub is_read: i32,
    pub created_at: String,
}

impl From<&Message> for MessageInfo {
    fn from(message: &Message) -> Self {
        Self {
            id: message.message_id,
            shipment_id: message.shipment_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            message: message.body.clone(),
            is_read: i32::from(message.is_read),
            created_at: message.created_at.clone(),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Liveness probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
