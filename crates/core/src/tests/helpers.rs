// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_audit::Actor;
use cargolink_domain::{
    CustomerCode, Decimal, Negotiation, NegotiationStatus, Payment, PaymentStatus, PaymentType,
    Role, Shipment, ShipmentStatus, ShipmentType,
};

pub const PARTNER_ID: i64 = 10;
pub const AGENT_ID: i64 = 20;
pub const OTHER_AGENT_ID: i64 = 21;
pub const ADMIN_ID: i64 = 1;

pub fn partner() -> Actor {
    Actor::new(PARTNER_ID, Role::Partner)
}

pub fn agent() -> Actor {
    Actor::new(AGENT_ID, Role::Agent)
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, Role::Admin)
}

pub fn pending_shipment() -> Shipment {
    Shipment {
        shipment_id: 5,
        partner_id: PARTNER_ID,
        agent_id: None,
        origin: String::from("A"),
        destination: Some(String::from("B")),
        shipment_type: ShipmentType::Delivery,
        cargo_type: String::from("Textiles"),
        weight: Decimal::new(40, 0),
        distance: Some(Decimal::new(120, 0)),
        currency: String::from("NGN"),
        offered_amount: Decimal::new(1000, 0),
        negotiated_amount: None,
        pickup_date: Some(String::from("2026-03-01")),
        notes: None,
        proof_of_delivery: None,
        status: ShipmentStatus::Pending,
        payment_status: PaymentStatus::Pending,
        created_at: String::from("2026-02-01 09:00:00"),
        updated_at: String::from("2026-02-01 09:00:00"),
    }
}

pub fn accepted_shipment() -> Shipment {
    Shipment {
        agent_id: Some(AGENT_ID),
        status: ShipmentStatus::AgentAccepted,
        ..pending_shipment()
    }
}

pub fn in_transit_shipment() -> Shipment {
    Shipment {
        status: ShipmentStatus::InTransit,
        payment_status: PaymentStatus::Paid,
        ..accepted_shipment()
    }
}

pub fn partner_payment(code: &str) -> Payment {
    Payment {
        payment_id: 30,
        shipment_id: 5,
        from_user_id: PARTNER_ID,
        to_user_id: ADMIN_ID,
        amount: Decimal::new(1000, 0),
        currency: String::from("NGN"),
        payment_type: PaymentType::PartnerToAdmin,
        status: PaymentStatus::Paid,
        customer_code: Some(CustomerCode::parse(code).unwrap()),
        processed_at: None,
        created_at: String::from("2026-02-02 09:00:00"),
    }
}

pub fn pending_payout() -> Payment {
    Payment {
        payment_id: 31,
        shipment_id: 5,
        from_user_id: ADMIN_ID,
        to_user_id: AGENT_ID,
        amount: Decimal::new(1000, 0),
        currency: String::from("NGN"),
        payment_type: PaymentType::AdminToAgent,
        status: PaymentStatus::Pending,
        customer_code: None,
        processed_at: None,
        created_at: String::from("2026-02-03 09:00:00"),
    }
}

pub fn proposal(proposed_by: i64, amount: Decimal) -> Negotiation {
    Negotiation {
        negotiation_id: 40,
        shipment_id: 5,
        proposed_by,
        proposed_amount: amount,
        currency: String::from("NGN"),
        message: None,
        status: NegotiationStatus::Pending,
        created_at: String::from("2026-02-01 10:00:00"),
    }
}
