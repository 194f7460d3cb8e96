// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account roles and the approval gate.
//!
//! Partners and agents register themselves and wait for an admin to approve
//! them. Admin accounts are created approved and never pass through the gate.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role an account holds in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Originates shipments and pays for fulfillment.
    Partner,
    /// Fulfills shipments for payment.
    Agent,
    /// Approves registrations and mediates payouts.
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Returns true if accounts with this role may register themselves.
    #[must_use]
    pub const fn can_self_register(&self) -> bool {
        matches!(self, Self::Partner | Self::Agent)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partner" => Ok(Self::Partner),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval state of a self-registered account.
///
/// Stored as the integers 0, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Allowed to log in.
    Approved,
    /// Refused by an admin.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the stored integer flag.
    #[must_use]
    pub const fn as_flag(&self) -> i32 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
        }
    }

    /// Parses the stored integer flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidApprovalStatus` for any other value.
    pub const fn from_flag(flag: i32) -> Result<Self, DomainError> {
        match flag {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Approved),
            2 => Ok(Self::Rejected),
            other => Err(DomainError::InvalidApprovalStatus(other)),
        }
    }
}

/// Returns true if an account with this role and approval state may log in.
///
/// Admins are always allowed; everyone else needs an approval.
#[must_use]
pub const fn may_log_in(role: Role, approval: ApprovalStatus) -> bool {
    matches!(role, Role::Admin) || matches!(approval, ApprovalStatus::Approved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("partner".parse::<Role>(), Ok(Role::Partner));
        assert_eq!("agent".parse::<Role>(), Ok(Role::Agent));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("Admin".parse::<Role>().is_err());
        assert!("courier".parse::<Role>().is_err());
    }

    #[test]
    fn test_only_partners_and_agents_self_register() {
        assert!(Role::Partner.can_self_register());
        assert!(Role::Agent.can_self_register());
        assert!(!Role::Admin.can_self_register());
    }

    #[test]
    fn test_approval_flags() {
        assert_eq!(ApprovalStatus::from_flag(0), Ok(ApprovalStatus::Pending));
        assert_eq!(ApprovalStatus::from_flag(1), Ok(ApprovalStatus::Approved));
        assert_eq!(ApprovalStatus::from_flag(2), Ok(ApprovalStatus::Rejected));
        assert_eq!(
            ApprovalStatus::from_flag(3),
            Err(DomainError::InvalidApprovalStatus(3))
        );
    }

    #[test]
    fn test_login_gate() {
        for approval in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert!(may_log_in(Role::Admin, approval));
        }

        for role in [Role::Partner, Role::Agent] {
            assert!(!may_log_in(role, ApprovalStatus::Pending));
            assert!(may_log_in(role, ApprovalStatus::Approved));
            assert!(!may_log_in(role, ApprovalStatus::Rejected));
        }
    }
}
