// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink::{ShipmentDetails, prepare_shipment};
use cargolink_audit::Actor;
use cargolink_domain::{ApprovalStatus, Decimal, Role, Shipment, ShipmentType};

use crate::Persistence;

/// The lowest bcrypt cost, so tests don't spend time hashing.
pub const TEST_HASH_COST: u32 = 4;

pub struct Fixture {
    pub persistence: Persistence,
    pub admin_id: i64,
    pub partner_id: i64,
    pub agent_id: i64,
    pub other_agent_id: i64,
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_hash_cost(TEST_HASH_COST)
}

/// An admin, an approved partner and two approved agents.
pub fn create_fixture() -> Fixture {
    let mut persistence = create_test_persistence();
    let admin_id = persistence.ensure_admin("admin", "admin-password").unwrap();
    let partner_id = persistence
        .create_user(
            "partner",
            "Pat Partner",
            "partner-password",
            Role::Partner,
            ApprovalStatus::Approved,
        )
        .unwrap();
    let agent_id = persistence
        .create_user(
            "agent",
            "Ada Agent",
            "agent-password",
            Role::Agent,
            ApprovalStatus::Approved,
        )
        .unwrap();
    let other_agent_id = persistence
        .create_user(
            "agent2",
            "Abe Agent",
            "agent-password",
            Role::Agent,
            ApprovalStatus::Approved,
        )
        .unwrap();

    Fixture {
        persistence,
        admin_id,
        partner_id,
        agent_id,
        other_agent_id,
    }
}

pub fn create_test_details(offered_amount: Decimal) -> ShipmentDetails {
    ShipmentDetails {
        origin: String::from("A"),
        destination: Some(String::from("B")),
        cargo_type: String::from("Electronics"),
        weight: Decimal::new(1250, 2),
        distance: Some(Decimal::new(42, 0)),
        currency: String::from("NGN"),
        offered_amount,
        pickup_date: Some(String::from("2026-03-01")),
    }
}

pub fn create_test_shipment(fixture: &mut Fixture) -> Shipment {
    let new_shipment = prepare_shipment(
        fixture.partner_id,
        ShipmentType::Delivery,
        create_test_details(Decimal::new(1000, 0)),
        Some(String::from("Handle with care")),
    )
    .unwrap();
    let actor = partner(fixture);
    fixture
        .persistence
        .create_shipment(&new_shipment, actor)
        .unwrap()
}

pub const fn partner(fixture: &Fixture) -> Actor {
    Actor::new(fixture.partner_id, Role::Partner)
}

pub const fn agent(fixture: &Fixture) -> Actor {
    Actor::new(fixture.agent_id, Role::Agent)
}

pub const fn admin(fixture: &Fixture) -> Actor {
    Actor::new(fixture.admin_id, Role::Admin)
}
