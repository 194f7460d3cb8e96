// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink::{Command, apply, complete_payout};
use cargolink_domain::{
    CustomerCode, Decimal, PaymentStatus, PaymentType, Shipment, ShipmentStatus,
};

use super::helpers::{Fixture, admin, agent, create_fixture, create_test_shipment, partner};
use crate::PersistenceError;

fn accepted_shipment(fixture: &mut Fixture) -> Shipment {
    let shipment = create_test_shipment(fixture);
    let result = apply(
        &shipment,
        Command::AcceptShipment {
            agent_id: fixture.agent_id,
        },
        agent(fixture),
    )
    .unwrap();
    fixture.persistence.apply_transition(&result).unwrap()
}

fn paid_shipment(fixture: &mut Fixture) -> Shipment {
    let shipment = accepted_shipment(fixture);
    let result = apply(
        &shipment,
        Command::RecordPayment {
            platform_admin_id: fixture.admin_id,
            amount: None,
            currency: None,
            customer_code: CustomerCode::parse("ABCD1234").unwrap(),
        },
        partner(fixture),
    )
    .unwrap();
    fixture.persistence.apply_transition(&result).unwrap()
}

fn delivered_shipment(fixture: &mut Fixture) -> Shipment {
    let shipment = paid_shipment(fixture);
    let payment = fixture
        .persistence
        .get_partner_payment(shipment.shipment_id)
        .unwrap()
        .unwrap();
    let result = apply(
        &shipment,
        Command::ConfirmDelivery {
            agent_id: fixture.agent_id,
            platform_admin_id: fixture.admin_id,
            submitted_code: CustomerCode::parse("abcd1234").unwrap(),
            payment,
        },
        agent(fixture),
    )
    .unwrap();
    fixture.persistence.apply_transition(&result).unwrap()
}

#[test]
fn test_payment_records_ledger_row_and_moves_to_transit() {
    let mut fixture = create_fixture();
    let shipment = paid_shipment(&mut fixture);

    assert_eq!(shipment.status, ShipmentStatus::InTransit);
    assert_eq!(shipment.payment_status, PaymentStatus::Paid);

    let payment = fixture
        .persistence
        .get_partner_payment(shipment.shipment_id)
        .unwrap()
        .unwrap();
    assert_eq!(payment.payment_type, PaymentType::PartnerToAdmin);
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.from_user_id, fixture.partner_id);
    assert_eq!(payment.to_user_id, fixture.admin_id);
    assert_eq!(payment.amount, Decimal::new(1000, 0));
    assert_eq!(
        payment.customer_code.as_ref().map(CustomerCode::value),
        Some("ABCD1234")
    );

    let spending = fixture
        .persistence
        .list_payments_by_partner(fixture.partner_id)
        .unwrap();
    assert_eq!(spending.len(), 1);
}

#[test]
fn test_delivery_records_proof_and_pending_payout() {
    let mut fixture = create_fixture();
    let shipment = delivered_shipment(&mut fixture);

    assert_eq!(shipment.status, ShipmentStatus::Delivered);
    assert_eq!(
        shipment.proof_of_delivery.as_deref(),
        Some("Delivered and verified with code: ABCD1234")
    );

    let payouts = fixture.persistence.list_pending_payouts().unwrap();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].payment_type, PaymentType::AdminToAgent);
    assert_eq!(payouts[0].to_user_id, fixture.agent_id);
    assert_eq!(payouts[0].customer_code, None);

    let earnings = fixture
        .persistence
        .list_payouts_for_agent(fixture.agent_id)
        .unwrap();
    assert_eq!(earnings.len(), 1);
    assert_eq!(earnings[0].split().unwrap().agent_amount, Decimal::new(950, 0));
}

#[test]
fn test_complete_payout_closes_shipment_and_cannot_repeat() {
    let mut fixture = create_fixture();
    let shipment = delivered_shipment(&mut fixture);
    let payout = fixture.persistence.list_pending_payouts().unwrap().remove(0);
    let completion = complete_payout(&payout, &shipment, admin(&fixture)).unwrap();

    let processed = fixture.persistence.complete_payout(&completion).unwrap();

    assert_eq!(processed.status, PaymentStatus::PayoutCompleted);
    assert!(processed.processed_at.is_some());
    let stored = fixture
        .persistence
        .get_shipment(shipment.shipment_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.payment_status, PaymentStatus::PayoutCompleted);
    assert!(fixture.persistence.list_pending_payouts().unwrap().is_empty());

    let repeat = fixture.persistence.complete_payout(&completion);
    assert!(matches!(repeat, Err(PersistenceError::Conflict(_))));
}

#[test]
fn test_paying_twice_from_stale_read_conflicts() {
    let mut fixture = create_fixture();
    let shipment = accepted_shipment(&mut fixture);
    let command = Command::RecordPayment {
        platform_admin_id: fixture.admin_id,
        amount: Some(Decimal::new(1000, 0)),
        currency: Some(String::from("ngn")),
        customer_code: CustomerCode::parse("ZZZZ9999").unwrap(),
    };
    let first = apply(&shipment, command.clone(), partner(&fixture)).unwrap();
    let second = apply(&shipment, command, admin(&fixture)).unwrap();

    fixture.persistence.apply_transition(&first).unwrap();
    let result = fixture.persistence.apply_transition(&second);

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
    assert_eq!(
        fixture
            .persistence
            .list_payments_by_partner(fixture.partner_id)
            .unwrap()
            .len(),
        1
    );
}
