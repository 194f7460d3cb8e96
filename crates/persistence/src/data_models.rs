// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Rows mirror the `SQLite` columns exactly. Amounts are read back from their
//! canonical decimal text; a value that fails to parse is reported as a
//! `ReconstructionError` rather than silently coerced.

use std::str::FromStr;

use cargolink_domain::{
    ApprovalStatus, CustomerCode, Decimal, Message, Negotiation, NegotiationStatus, Payment,
    PaymentStatus, PaymentType, Role, Shipment, ShipmentStatus, ShipmentType, User,
};
use diesel::prelude::*;

use crate::diesel_schema::{
    messages, negotiations, payments, sessions, shipment_events, shipments, users,
};
use crate::error::PersistenceError;

/// A stored user together with its password hash.
///
/// The hash never leaves the persistence and authentication layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user: User,
    pub password_hash: String,
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A recorded shipment transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentEventData {
    pub event_id: i64,
    pub shipment_id: i64,
    pub actor_user_id: i64,
    pub actor_role: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_snapshot: String,
    pub after_snapshot: String,
    pub created_at: String,
}

fn reconstruction<E: std::fmt::Display>(entity: &str, id: i64, err: E) -> PersistenceError {
    PersistenceError::ReconstructionError(format!("{entity} {id}: {err}"))
}

fn parse_decimal(entity: &str, id: i64, value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value).map_err(|e| reconstruction(entity, id, e))
}

fn parse_optional_decimal(
    entity: &str,
    id: i64,
    value: Option<&str>,
) -> Result<Option<Decimal>, PersistenceError> {
    value.map(|v| parse_decimal(entity, id, v)).transpose()
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    full_name: String,
    role: String,
    approval_status: i32,
    created_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role =
            Role::from_str(&row.role).map_err(|e| reconstruction("user", row.user_id, e))?;
        let approval: ApprovalStatus = ApprovalStatus::from_flag(row.approval_status)
            .map_err(|e| reconstruction("user", row.user_id, e))?;
        Ok(Self {
            user: User {
                user_id: row.user_id,
                username: row.username,
                full_name: row.full_name,
                role,
                approval,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shipments)]
pub(crate) struct ShipmentRow {
    shipment_id: i64,
    partner_id: i64,
    agent_id: Option<i64>,
    origin: String,
    destination: Option<String>,
    shipment_type: String,
    cargo_type: String,
    weight: String,
    distance: Option<String>,
    currency: String,
    offered_amount: String,
    negotiated_amount: Option<String>,
    pickup_date: Option<String>,
    notes: Option<String>,
    proof_of_delivery: Option<String>,
    status: String,
    payment_status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = PersistenceError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        let id: i64 = row.shipment_id;
        Ok(Self {
            shipment_id: id,
            partner_id: row.partner_id,
            agent_id: row.agent_id,
            origin: row.origin,
            destination: row.destination,
            shipment_type: ShipmentType::from_str(&row.shipment_type)
                .map_err(|e| reconstruction("shipment", id, e))?,
            cargo_type: row.cargo_type,
            weight: parse_decimal("shipment", id, &row.weight)?,
            distance: parse_optional_decimal("shipment", id, row.distance.as_deref())?,
            currency: row.currency,
            offered_amount: parse_decimal("shipment", id, &row.offered_amount)?,
            negotiated_amount: parse_optional_decimal(
                "shipment",
                id,
                row.negotiated_amount.as_deref(),
            )?,
            pickup_date: row.pickup_date,
            notes: row.notes,
            proof_of_delivery: row.proof_of_delivery,
            status: ShipmentStatus::from_str(&row.status)
                .map_err(|e| reconstruction("shipment", id, e))?,
            payment_status: PaymentStatus::from_str(&row.payment_status)
                .map_err(|e| reconstruction("shipment", id, e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = negotiations)]
pub(crate) struct NegotiationRow {
    negotiation_id: i64,
    shipment_id: i64,
    proposed_by: i64,
    proposed_amount: String,
    currency: String,
    message: Option<String>,
    status: String,
    created_at: String,
}

impl TryFrom<NegotiationRow> for Negotiation {
    type Error = PersistenceError;

    fn try_from(row: NegotiationRow) -> Result<Self, Self::Error> {
        let id: i64 = row.negotiation_id;
        Ok(Self {
            negotiation_id: id,
            shipment_id: row.shipment_id,
            proposed_by: row.proposed_by,
            proposed_amount: parse_decimal("negotiation", id, &row.proposed_amount)?,
            currency: row.currency,
            message: row.message,
            status: NegotiationStatus::from_str(&row.status)
                .map_err(|e| reconstruction("negotiation", id, e))?,
            created_at: row.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = payments)]
pub(crate) struct PaymentRow {
    payment_id: i64,
    shipment_id: i64,
    from_user_id: i64,
    to_user_id: i64,
    amount: String,
    currency: String,
    payment_type: String,
    status: String,
    customer_code: Option<String>,
    processed_at: Option<String>,
    created_at: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = PersistenceError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let id: i64 = row.payment_id;
        let customer_code: Option<CustomerCode> = row
            .customer_code
            .as_deref()
            .map(CustomerCode::parse)
            .transpose()
            .map_err(|e| reconstruction("payment", id, e))?;
        Ok(Self {
            payment_id: id,
            shipment_id: row.shipment_id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            amount: parse_decimal("payment", id, &row.amount)?,
            currency: row.currency,
            payment_type: PaymentType::from_str(&row.payment_type)
                .map_err(|e| reconstruction("payment", id, e))?,
            status: PaymentStatus::from_str(&row.status)
                .map_err(|e| reconstruction("payment", id, e))?,
            customer_code,
            processed_at: row.processed_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = messages)]
pub(crate) struct MessageRow {
    message_id: i64,
    shipment_id: i64,
    sender_id: i64,
    receiver_id: i64,
    body: String,
    is_read: i32,
    created_at: String,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            message_id: row.message_id,
            shipment_id: row.shipment_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            body: row.body,
            is_read: row.is_read != 0,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shipment_events)]
pub(crate) struct ShipmentEventRow {
    event_id: i64,
    shipment_id: i64,
    actor_user_id: i64,
    actor_role: String,
    action_name: String,
    action_details: Option<String>,
    before_snapshot: String,
    after_snapshot: String,
    created_at: String,
}

impl From<ShipmentEventRow> for ShipmentEventData {
    fn from(row: ShipmentEventRow) -> Self {
        Self {
            event_id: row.event_id,
            shipment_id: row.shipment_id,
            actor_user_id: row.actor_user_id,
            actor_role: row.actor_role,
            action_name: row.action_name,
            action_details: row.action_details,
            before_snapshot: row.before_snapshot,
            after_snapshot: row.after_snapshot,
            created_at: row.created_at,
        }
    }
}
