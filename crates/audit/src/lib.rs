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
    clippy::all
)]

use cargolink_domain::{Role, Shipment};

/// Represents the user performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's identifier.
    pub user_id: i64,
    /// The role the user acted in.
    pub role: Role,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user's identifier
    /// * `role` - The role the user acted in
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`AcceptShipment`", "`RecordPayment`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the lifecycle fields of a shipment at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// `status=..,payment_status=..,agent_id=..`
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot` from raw data.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Captures the lifecycle fields of a shipment.
    #[must_use]
    pub fn of(shipment: &Shipment) -> Self {
        let agent: String = shipment
            .agent_id
            .map_or_else(|| String::from("none"), |id| id.to_string());
        Self::new(format!(
            "status={},payment_status={},agent_id={agent}",
            shipment.status.as_str(),
            shipment.payment_status.as_str()
        ))
    }
}

/// An immutable audit event representing a shipment transition.
///
/// Every successful shipment transition produces exactly one audit event,
/// written in the same transaction as the change it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The shipment that changed.
    pub shipment_id: i64,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    #[must_use]
    pub const fn new(
        shipment_id: i64,
        actor: Actor,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            shipment_id,
            actor,
            action,
            before,
            after,
        }
    }
}
