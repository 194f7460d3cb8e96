// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    PARTNER_ID, accepted_shipment, agent, in_transit_shipment, partner, pending_shipment,
};
use crate::{
    CoreError, DetailsUpdate, NewShipment, ShipmentChanges, ShipmentDetails, apply_details,
    prepare_shipment,
};
use cargolink_domain::{Decimal, DomainError, Shipment, ShipmentStatus, ShipmentType};

fn details() -> ShipmentDetails {
    ShipmentDetails {
        origin: String::from("A"),
        destination: Some(String::from("B")),
        cargo_type: String::from("Furniture"),
        weight: Decimal::new(80, 0),
        distance: None,
        currency: String::from("ngn"),
        offered_amount: Decimal::new(1000, 0),
        pickup_date: Some(String::from("2026-04-10")),
    }
}

#[test]
fn test_prepare_shipment_normalizes_currency() {
    let shipment: NewShipment =
        prepare_shipment(PARTNER_ID, ShipmentType::Delivery, details(), None).unwrap();
    assert_eq!(shipment.details.currency, "NGN");
    assert_eq!(shipment.partner_id, PARTNER_ID);
}

#[test]
fn test_prepare_shipment_requires_destination_for_delivery() {
    let mut fields: ShipmentDetails = details();
    fields.destination = None;

    assert_eq!(
        prepare_shipment(PARTNER_ID, ShipmentType::Delivery, fields.clone(), None),
        Err(CoreError::DomainViolation(DomainError::MissingDestination))
    );
    assert!(prepare_shipment(PARTNER_ID, ShipmentType::PickupOnly, fields, None).is_ok());
}

#[test]
fn test_prepare_shipment_rejects_bad_values() {
    let mut fields: ShipmentDetails = details();
    fields.offered_amount = Decimal::ZERO;
    assert!(prepare_shipment(PARTNER_ID, ShipmentType::Delivery, fields, None).is_err());

    let mut fields: ShipmentDetails = details();
    fields.pickup_date = Some(String::from("tomorrow"));
    assert!(prepare_shipment(PARTNER_ID, ShipmentType::Delivery, fields, None).is_err());

    let notes: Option<String> = Some("n".repeat(1001));
    assert!(prepare_shipment(PARTNER_ID, ShipmentType::Delivery, details(), notes).is_err());
}

#[test]
fn test_prepare_shipment_rejects_unbounded_offer() {
    let mut fields: ShipmentDetails = details();
    fields.offered_amount = "1000000000000000000000000000".parse().unwrap();
    assert!(matches!(
        prepare_shipment(PARTNER_ID, ShipmentType::Delivery, fields, None),
        Err(CoreError::DomainViolation(DomainError::InvalidAmount {
            field: "offeredAmount",
            ..
        }))
    ));

    let mut fields: ShipmentDetails = details();
    fields.offered_amount = Decimal::new(1, 28);
    assert!(prepare_shipment(PARTNER_ID, ShipmentType::Delivery, fields, None).is_err());
}

#[test]
fn test_partial_update_keeps_untouched_fields() {
    let shipment: Shipment = pending_shipment();
    let changes = ShipmentChanges {
        origin: Some(String::from("Ibadan")),
        offered_amount: Some(Decimal::new(1200, 0)),
        ..ShipmentChanges::default()
    };

    let update: DetailsUpdate = apply_details(&shipment, changes, partner()).unwrap();
    assert_eq!(update.details.origin, "Ibadan");
    assert_eq!(update.details.offered_amount, Decimal::new(1200, 0));
    assert_eq!(update.details.destination.as_deref(), Some("B"));
    assert_eq!(update.details.cargo_type, "Textiles");
    assert_eq!(
        update.audit_event.action.details.as_deref(),
        Some("Changed origin, offeredAmount")
    );
}

#[test]
fn test_assigned_agent_can_adjust_weight() {
    let shipment: Shipment = accepted_shipment();
    let changes = ShipmentChanges {
        weight: Some(Decimal::new(455, 1)),
        ..ShipmentChanges::default()
    };

    let update: DetailsUpdate = apply_details(&shipment, changes, agent()).unwrap();
    assert_eq!(update.details.weight, Decimal::new(455, 1));
    assert_eq!(update.expected.status, ShipmentStatus::AgentAccepted);
}

#[test]
fn test_price_is_locked_after_payment() {
    let shipment: Shipment = in_transit_shipment();
    let changes = ShipmentChanges {
        offered_amount: Some(Decimal::new(1, 0)),
        ..ShipmentChanges::default()
    };

    assert_eq!(
        apply_details(&shipment, changes, agent()),
        Err(CoreError::DomainViolation(DomainError::PriceLocked {
            shipment_id: shipment.shipment_id
        }))
    );

    let same_price = ShipmentChanges {
        offered_amount: Some(shipment.offered_amount),
        currency: Some(String::from("ngn")),
        ..ShipmentChanges::default()
    };
    assert!(apply_details(&shipment, same_price, agent()).is_ok());
}

#[test]
fn test_closed_shipment_cannot_be_edited() {
    let mut shipment: Shipment = pending_shipment();
    shipment.status = ShipmentStatus::Declined;

    let changes = ShipmentChanges {
        origin: Some(String::from("C")),
        ..ShipmentChanges::default()
    };
    assert!(matches!(
        apply_details(&shipment, changes, partner()),
        Err(CoreError::DomainViolation(DomainError::ShipmentClosed { .. }))
    ));
}
