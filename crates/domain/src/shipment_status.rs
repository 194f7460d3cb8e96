// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shipment status tracking and transition logic.
//!
//! The lifecycle is `pending -> agent_accepted -> in_transit -> delivered`.
//! A pending offer may be withdrawn and an accepted one abandoned; both
//! land in `declined`. `delivered` and `declined` are terminal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a shipment is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Offered to agents, nobody assigned.
    Pending,
    /// An agent took the job; awaiting payment.
    AgentAccepted,
    /// Paid and on its way.
    InTransit,
    /// Delivery confirmed with the customer code.
    Delivered,
    /// Withdrawn by the partner or abandoned by the agent.
    Declined,
}

impl ShipmentStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AgentAccepted => "agent_accepted",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Declined => "declined",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShipmentStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "agent_accepted" => Ok(Self::AgentAccepted),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "declined" => Ok(Self::Declined),
            _ => Err(DomainError::InvalidShipmentStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Declined)
    }

    /// Returns true if a shipment in this status must have an assigned agent.
    ///
    /// The inverse also holds: pending and declined shipments never carry one.
    #[must_use]
    pub const fn requires_agent(&self) -> bool {
        matches!(self, Self::AgentAccepted | Self::InTransit | Self::Delivered)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(new_status, Self::AgentAccepted | Self::Declined),
            Self::AgentAccepted => matches!(new_status, Self::InTransit | Self::Declined),
            Self::InTransit => matches!(new_status, Self::Delivered),
            Self::Delivered | Self::Declined => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by shipment lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for ShipmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the agent only collects the cargo or also carries it to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentType {
    /// Collection only; no destination.
    PickupOnly,
    /// Collection and delivery to a destination.
    Delivery,
}

impl ShipmentType {
    /// Returns the string representation of the shipment type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PickupOnly => "pickup_only",
            Self::Delivery => "delivery",
        }
    }

    /// Returns true if shipments of this type must name a destination.
    #[must_use]
    pub const fn requires_destination(&self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl FromStr for ShipmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup_only" => Ok(Self::PickupOnly),
            "delivery" => Ok(Self::Delivery),
            _ => Err(DomainError::InvalidShipmentType(s.to_string())),
        }
    }
}
