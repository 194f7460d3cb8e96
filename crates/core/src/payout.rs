// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::PayoutCompletion;
use cargolink_audit::{Action, Actor, AuditEvent, StateSnapshot};
use cargolink_domain::{DomainError, Payment, PaymentStatus, PaymentType, PayoutSplit, Shipment};

/// Marks a pending agent payout as completed.
///
/// # Errors
///
/// Returns an error if the payment is not an agent payout, has already been
/// processed, does not belong to the shipment, or its amount cannot be split.
pub fn complete_payout(
    payment: &Payment,
    shipment: &Shipment,
    actor: Actor,
) -> Result<PayoutCompletion, CoreError> {
    if payment.shipment_id != shipment.shipment_id {
        return Err(CoreError::InconsistentInput(format!(
            "payment {} does not belong to shipment {}",
            payment.payment_id, shipment.shipment_id
        )));
    }
    if payment.payment_type != PaymentType::AdminToAgent {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: payment.status.as_str().to_string(),
                to: PaymentStatus::PayoutCompleted.as_str().to_string(),
                reason: "only agent payouts can be processed".to_string(),
            },
        ));
    }
    if payment.status != PaymentStatus::Pending {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: payment.status.as_str().to_string(),
                to: PaymentStatus::PayoutCompleted.as_str().to_string(),
                reason: "payout has already been processed".to_string(),
            },
        ));
    }

    let split: PayoutSplit = payment.split()?;
    let mut after: Shipment = shipment.clone();
    after.payment_status = PaymentStatus::PayoutCompleted;
    let audit_event: AuditEvent = AuditEvent::new(
        shipment.shipment_id,
        actor,
        Action::new(
            String::from("CompletePayout"),
            Some(format!(
                "Paid out {} {} to agent {} (fee {})",
                split.agent_amount, payment.currency, payment.to_user_id, split.admin_fee
            )),
        ),
        StateSnapshot::of(shipment),
        StateSnapshot::of(&after),
    );

    Ok(PayoutCompletion {
        payment_id: payment.payment_id,
        shipment_id: shipment.shipment_id,
        expected_shipment_payment_status: shipment.payment_status,
        audit_event,
    })
}
