// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{admin, in_transit_shipment, partner_payment, pending_payout};
use crate::{CoreError, PayoutCompletion, complete_payout};
use cargolink_domain::{DomainError, Payment, PaymentStatus, Shipment, ShipmentStatus};

fn delivered_shipment() -> Shipment {
    Shipment {
        status: ShipmentStatus::Delivered,
        ..in_transit_shipment()
    }
}

#[test]
fn test_pending_payout_completes() {
    let shipment: Shipment = delivered_shipment();
    let completion: PayoutCompletion =
        complete_payout(&pending_payout(), &shipment, admin()).unwrap();

    assert_eq!(completion.payment_id, 31);
    assert_eq!(completion.expected_shipment_payment_status, PaymentStatus::Paid);
    assert_eq!(
        completion.audit_event.action.details.as_deref(),
        Some("Paid out 950 NGN to agent 20 (fee 50)")
    );
    assert!(
        completion
            .audit_event
            .after
            .data
            .contains("payment_status=payout_completed")
    );
}

#[test]
fn test_completed_payout_is_refused() {
    let mut payout: Payment = pending_payout();
    payout.status = PaymentStatus::PayoutCompleted;

    assert!(matches!(
        complete_payout(&payout, &delivered_shipment(), admin()),
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_partner_payment_is_not_a_payout() {
    assert!(complete_payout(&partner_payment("ABCD1234"), &delivered_shipment(), admin()).is_err());
}

#[test]
fn test_unsplittable_stored_amount_is_an_error() {
    let mut payout: Payment = pending_payout();
    payout.amount = "1000000000000000000000000000".parse().unwrap();

    assert!(matches!(
        complete_payout(&payout, &delivered_shipment(), admin()),
        Err(CoreError::DomainViolation(DomainError::SplitOverflow { .. }))
    ));
}
