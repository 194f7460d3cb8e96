// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    AGENT_ID, PARTNER_ID, accepted_shipment, agent, in_transit_shipment, partner, proposal,
};
use crate::{CoreError, NegotiationResponse, NewNegotiation, propose, respond};
use cargolink_domain::{Decimal, DomainError, NegotiationStatus, Negotiation, Shipment};

#[test]
fn test_proposal_defaults_to_shipment_currency() {
    let shipment: Shipment = accepted_shipment();
    let negotiation: NewNegotiation = propose(
        &shipment,
        AGENT_ID,
        Decimal::new(1200, 0),
        None,
        Some(String::from("Fuel prices went up")),
    )
    .unwrap();

    assert_eq!(negotiation.currency, "NGN");
    assert_eq!(negotiation.proposed_by, AGENT_ID);
}

#[test]
fn test_proposal_in_other_currency_is_refused() {
    let shipment: Shipment = accepted_shipment();
    let result = propose(&shipment, AGENT_ID, Decimal::new(12, 0), Some("usd"), None);
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::CurrencyMismatch { .. }
        ))
    ));
}

#[test]
fn test_proposal_after_payment_is_refused() {
    let shipment: Shipment = in_transit_shipment();
    assert_eq!(
        propose(&shipment, PARTNER_ID, Decimal::new(900, 0), None, None),
        Err(CoreError::DomainViolation(DomainError::PriceLocked {
            shipment_id: shipment.shipment_id
        }))
    );
}

#[test]
fn test_proposal_amount_must_be_in_range() {
    let shipment: Shipment = accepted_shipment();
    assert!(propose(&shipment, PARTNER_ID, Decimal::ZERO, None, None).is_err());
    assert!(propose(&shipment, PARTNER_ID, Decimal::MAX, None, None).is_err());
    assert!(propose(&shipment, PARTNER_ID, Decimal::new(100_001, 5), None, None).is_err());
}

#[test]
fn test_accepting_sets_negotiated_amount() {
    let shipment: Shipment = accepted_shipment();
    let negotiation: Negotiation = proposal(AGENT_ID, Decimal::new(1250, 0));

    let response: NegotiationResponse =
        respond(&shipment, &negotiation, true, false, partner()).unwrap();

    assert_eq!(response.new_status, NegotiationStatus::Accepted);
    let update = response.price_update.unwrap();
    assert_eq!(update.negotiated_amount, Decimal::new(1250, 0));
    assert_eq!(update.shipment_id, shipment.shipment_id);
    assert_eq!(update.audit_event.action.name, "ApplyNegotiatedPrice");
}

#[test]
fn test_rejecting_leaves_price_alone() {
    let shipment: Shipment = accepted_shipment();
    let negotiation: Negotiation = proposal(AGENT_ID, Decimal::new(1250, 0));

    let response: NegotiationResponse =
        respond(&shipment, &negotiation, false, true, partner()).unwrap();

    assert_eq!(response.new_status, NegotiationStatus::Rejected);
    assert!(response.price_update.is_none());
}

#[test]
fn test_proposer_cannot_answer_own_proposal() {
    let shipment: Shipment = accepted_shipment();
    let negotiation: Negotiation = proposal(AGENT_ID, Decimal::new(1250, 0));

    assert_eq!(
        respond(&shipment, &negotiation, true, false, agent()),
        Err(CoreError::DomainViolation(DomainError::SelfResponse))
    );
}

#[test]
fn test_second_acceptance_is_refused() {
    let shipment: Shipment = accepted_shipment();
    let negotiation: Negotiation = proposal(AGENT_ID, Decimal::new(1250, 0));

    assert_eq!(
        respond(&shipment, &negotiation, true, true, partner()),
        Err(CoreError::DomainViolation(
            DomainError::NegotiationAlreadyAccepted {
                shipment_id: shipment.shipment_id
            }
        ))
    );
}

#[test]
fn test_answered_proposal_cannot_be_answered_again() {
    let shipment: Shipment = accepted_shipment();
    let mut negotiation: Negotiation = proposal(AGENT_ID, Decimal::new(1250, 0));
    negotiation.status = NegotiationStatus::Rejected;

    assert!(matches!(
        respond(&shipment, &negotiation, true, false, partner()),
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}
