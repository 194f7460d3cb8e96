// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment kinds, payment status and the payout split.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a recorded money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// The partner pays the platform for a shipment.
    PartnerToAdmin,
    /// The platform pays the agent's share out after delivery.
    AdminToAgent,
}

impl PaymentType {
    /// Returns the string representation of the payment type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PartnerToAdmin => "partner_to_admin",
            Self::AdminToAgent => "admin_to_agent",
        }
    }
}

impl FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partner_to_admin" => Ok(Self::PartnerToAdmin),
            "admin_to_agent" => Ok(Self::AdminToAgent),
            _ => Err(DomainError::InvalidPaymentType(s.to_string())),
        }
    }
}

/// Settlement state of a payment record, and of a shipment's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has moved yet.
    Pending,
    /// The partner has paid.
    Paid,
    /// The agent's share has been paid out.
    PayoutCompleted,
}

impl PaymentStatus {
    /// Returns the string representation of the payment status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::PayoutCompleted => "payout_completed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "payout_completed" => Ok(Self::PayoutCompleted),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The agent's share of every payment, in percent.
pub const AGENT_SHARE_PERCENT: u32 = 95;

/// A payment amount divided between the agent and the platform.
///
/// `agent_amount + admin_fee == amount` holds exactly for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSplit {
    /// The full amount paid by the partner.
    pub amount: Decimal,
    /// The agent's 95% share.
    pub agent_amount: Decimal,
    /// The platform's 5% fee.
    pub admin_fee: Decimal,
}

impl PayoutSplit {
    /// Splits an amount into the agent share and the platform fee.
    ///
    /// The fee is the remainder after the agent share, so the two parts
    /// always add back up to the input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SplitOverflow` if the amount is too large or
    /// too precise to split exactly.
    pub fn compute(amount: Decimal) -> Result<Self, DomainError> {
        let overflow = || DomainError::SplitOverflow {
            amount: amount.to_string(),
        };
        let scaled: Decimal = amount
            .checked_mul(Decimal::from(AGENT_SHARE_PERCENT))
            .ok_or_else(overflow)?;
        let agent_amount: Decimal = scaled
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(overflow)?
            .normalize();
        // Division rounds once the quotient runs out of scale.
        if agent_amount.checked_mul(Decimal::ONE_HUNDRED) != Some(scaled) {
            return Err(overflow());
        }
        let admin_fee: Decimal = amount
            .checked_sub(agent_amount)
            .ok_or_else(overflow)?
            .normalize();
        Ok(Self {
            amount,
            agent_amount,
            admin_fee,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_amount_splits_evenly() {
        let split: PayoutSplit = PayoutSplit::compute(Decimal::new(10000, 2)).unwrap();
        assert_eq!(split.agent_amount, Decimal::new(95, 0));
        assert_eq!(split.admin_fee, Decimal::new(5, 0));
    }

    #[test]
    fn test_fractional_amount_keeps_every_digit() {
        let amount: Decimal = Decimal::new(3333, 2);
        let split: PayoutSplit = PayoutSplit::compute(amount).unwrap();
        assert_eq!(split.agent_amount, Decimal::new(316_635, 4));
        assert_eq!(split.admin_fee, Decimal::new(16665, 4));
        assert_eq!(split.agent_amount + split.admin_fee, amount);
    }

    #[test]
    fn test_fee_equals_five_percent() {
        for cents in [1_i64, 7, 99, 12345, 100_001, 999_999_999] {
            let amount: Decimal = Decimal::new(cents, 2);
            let split: PayoutSplit = PayoutSplit::compute(amount).unwrap();
            assert_eq!(split.admin_fee, amount * Decimal::new(5, 2));
            assert_eq!(split.agent_amount, amount * Decimal::new(95, 2));
            assert_eq!(split.agent_amount + split.admin_fee, amount);
        }
    }

    #[test]
    fn test_largest_accepted_amount_splits() {
        let amount: Decimal = Decimal::from(1_000_000_000_000_000_i64);
        let split: PayoutSplit = PayoutSplit::compute(amount).unwrap();
        assert_eq!(split.agent_amount, Decimal::from(950_000_000_000_000_i64));
        assert_eq!(split.agent_amount + split.admin_fee, amount);

        let precise: Decimal = Decimal::new(9_999_999_999_999_999, 4);
        let split: PayoutSplit = PayoutSplit::compute(precise).unwrap();
        assert_eq!(split.agent_amount, precise * Decimal::new(95, 2));
        assert_eq!(split.agent_amount + split.admin_fee, precise);
    }

    #[test]
    fn test_oversized_amount_is_an_error() {
        let huge: Decimal = "1000000000000000000000000000".parse().unwrap();
        assert_eq!(
            PayoutSplit::compute(huge),
            Err(DomainError::SplitOverflow {
                amount: huge.to_string(),
            })
        );
        assert!(PayoutSplit::compute(Decimal::MAX).is_err());
    }

    #[test]
    fn test_amount_too_precise_to_split_is_an_error() {
        let tiny: Decimal = Decimal::new(1, 28);
        assert!(PayoutSplit::compute(tiny).is_err());
    }

    #[test]
    fn test_payment_type_strings() {
        assert_eq!(PaymentType::PartnerToAdmin.as_str(), "partner_to_admin");
        assert_eq!(
            "admin_to_agent".parse::<PaymentType>(),
            Ok(PaymentType::AdminToAgent)
        );
        assert!("refund".parse::<PaymentType>().is_err());
    }
}
