// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_domain::{CustomerCode, Decimal, Payment};

/// A command represents user intent against one shipment, as data only.
///
/// Commands are the only way to request lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// An agent takes a pending job.
    AcceptShipment {
        /// The accepting agent.
        agent_id: i64,
    },
    /// The assigned agent backs out of an accepted job.
    DeclineAssignment {
        /// The assigned agent.
        agent_id: i64,
    },
    /// The partner withdraws a job nobody has taken yet.
    WithdrawShipment,
    /// The partner pays for an accepted job.
    RecordPayment {
        /// The platform account receiving the money.
        platform_admin_id: i64,
        /// The amount the payer believes is due, if they sent one.
        amount: Option<Decimal>,
        /// The currency the payer believes applies, if they sent one.
        currency: Option<String>,
        /// The code the agent will need at delivery.
        customer_code: CustomerCode,
    },
    /// The assigned agent confirms delivery with the customer code.
    ConfirmDelivery {
        /// The assigned agent.
        agent_id: i64,
        /// The platform account paying the agent out.
        platform_admin_id: i64,
        /// The code entered by the agent.
        submitted_code: CustomerCode,
        /// The partner payment carrying the issued code.
        payment: Payment,
    },
}

impl Command {
    /// The name recorded in the audit trail for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::AcceptShipment { .. } => "AcceptShipment",
            Self::DeclineAssignment { .. } => "DeclineAssignment",
            Self::WithdrawShipment => "WithdrawShipment",
            Self::RecordPayment { .. } => "RecordPayment",
            Self::ConfirmDelivery { .. } => "ConfirmDelivery",
        }
    }
}
