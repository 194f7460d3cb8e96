// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use cargolink_domain::{ApprovalStatus, Decimal, Role};
use cargolink_persistence::Persistence;

use crate::{
    AuthenticatedActor, CreatePaymentRequest, CreateShipmentRequest, PaymentInfo, ShipmentInfo,
    accept_shipment, create_payment, create_shipment,
};

/// Low bcrypt cost so tests stay fast.
pub const TEST_HASH_COST: u32 = 4;

pub const TEST_PASSWORD: &str = "correct-horse";

/// A database with an admin, two partners and two agents, all approved.
pub struct TestContext {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub partner: AuthenticatedActor,
    pub other_partner: AuthenticatedActor,
    pub agent: AuthenticatedActor,
    pub other_agent: AuthenticatedActor,
}

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_hash_cost(TEST_HASH_COST)
}

fn approved_actor(persistence: &mut Persistence, username: &str, role: Role) -> AuthenticatedActor {
    let full_name: String = format!("Test {username}");
    let user_id: i64 = persistence
        .create_user(
            username,
            &full_name,
            TEST_PASSWORD,
            role,
            ApprovalStatus::Approved,
        )
        .expect("Failed to create user");
    AuthenticatedActor::new(user_id, username.to_string(), full_name, role)
}

pub fn setup() -> TestContext {
    let mut persistence: Persistence = setup_test_persistence();
    let admin_id: i64 = persistence
        .ensure_admin("admin", TEST_PASSWORD)
        .expect("Failed to seed admin");
    let admin: AuthenticatedActor = AuthenticatedActor::new(
        admin_id,
        String::from("admin"),
        String::from("Platform Administrator"),
        Role::Admin,
    );
    let partner = approved_actor(&mut persistence, "partner", Role::Partner);
    let other_partner = approved_actor(&mut persistence, "partner2", Role::Partner);
    let agent = approved_actor(&mut persistence, "agent", Role::Agent);
    let other_agent = approved_actor(&mut persistence, "agent2", Role::Agent);

    TestContext {
        persistence,
        admin,
        partner,
        other_partner,
        agent,
        other_agent,
    }
}

pub fn shipment_request(offered_amount: Decimal) -> CreateShipmentRequest {
    CreateShipmentRequest {
        origin: String::from("A"),
        destination: Some(String::from("B")),
        shipment_type: String::from("delivery"),
        cargo_type: String::from("Electronics"),
        weight: Decimal::new(1250, 2),
        distance: Some(Decimal::from(42)),
        currency: String::from("NGN"),
        offered_amount,
        pickup_date: Some(String::from("2026-03-01")),
        notes: None,
    }
}

/// A pending shipment offered at 1000 NGN by `ctx.partner`.
pub fn create_test_shipment(ctx: &mut TestContext) -> ShipmentInfo {
    create_shipment(
        &mut ctx.persistence,
        &shipment_request(Decimal::from(1000)),
        &ctx.partner,
    )
    .expect("Failed to create shipment")
}

/// A shipment accepted by `ctx.agent`.
pub fn create_accepted_shipment(ctx: &mut TestContext) -> ShipmentInfo {
    let shipment: ShipmentInfo = create_test_shipment(ctx);
    accept_shipment(&mut ctx.persistence, shipment.id, &ctx.agent).expect("Failed to accept")
}

pub fn payment_request(shipment_id: i64, customer_code: &str) -> CreatePaymentRequest {
    CreatePaymentRequest {
        shipment_id,
        amount: None,
        currency: None,
        customer_code: Some(customer_code.to_string()),
    }
}

/// A shipment accepted by `ctx.agent` and paid with code `ABCD1234`.
pub fn create_paid_shipment(ctx: &mut TestContext) -> (ShipmentInfo, PaymentInfo) {
    let shipment: ShipmentInfo = create_accepted_shipment(ctx);
    let payment: PaymentInfo = create_payment(
        &mut ctx.persistence,
        &payment_request(shipment.id, "ABCD1234"),
        &ctx.partner,
    )
    .expect("Failed to pay");
    (shipment, payment)
}
