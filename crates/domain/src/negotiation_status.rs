// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// State of a price proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// Awaiting an answer from the other party.
    Pending,
    /// Agreed; the proposed amount becomes the shipment price.
    Accepted,
    /// Turned down.
    Rejected,
}

impl NegotiationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Validates that a proposal in this status can be answered with `new_status`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the proposal is
    /// pending and the answer is accept or reject.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        match (self, new_status) {
            (Self::Pending, Self::Accepted | Self::Rejected) => Ok(()),
            (Self::Pending, Self::Pending) => Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "a response must accept or reject".to_string(),
            }),
            _ => Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "negotiation has already been answered".to_string(),
            }),
        }
    }
}

impl FromStr for NegotiationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidNegotiationStatus(s.to_string())),
        }
    }
}
