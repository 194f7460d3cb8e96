// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shipment mutations.
//!
//! Every lifecycle change is a conditional update keyed on the status,
//! payment status and agent the caller last observed. When no row matches,
//! the shipment changed underneath the caller and the whole transaction is
//! rolled back with `Conflict`. The audit event and any ledger row are
//! written in the same transaction.

use cargolink::{DetailsUpdate, LedgerEntry, LifecycleState, NewShipment, TransitionResult};
use cargolink_audit::{Action, Actor, AuditEvent, StateSnapshot};
use cargolink_domain::{CustomerCode, Shipment};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{payments, shipments};
use crate::error::PersistenceError;
use crate::mutations::events::persist_audit_event;
use crate::queries::shipments::get_shipment;

fn current_timestamp() -> diesel::expression::SqlLiteral<Text> {
    diesel::dsl::sql::<Text>("CURRENT_TIMESTAMP")
}

fn reload(conn: &mut SqliteConnection, shipment_id: i64) -> Result<Shipment, PersistenceError> {
    get_shipment(conn, shipment_id)?.ok_or_else(|| {
        PersistenceError::NotFound(format!("Shipment with ID {shipment_id} not found"))
    })
}

fn stale(shipment_id: i64) -> PersistenceError {
    PersistenceError::Conflict(format!(
        "Shipment {shipment_id} changed since it was read"
    ))
}

/// Inserts a new shipment and records its creation.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_shipment(
    conn: &mut SqliteConnection,
    new_shipment: &NewShipment,
    actor: Actor,
) -> Result<Shipment, PersistenceError> {
    conn.transaction::<Shipment, PersistenceError, _>(|conn| {
        let details = &new_shipment.details;
        diesel::insert_into(shipments::table)
            .values((
                shipments::partner_id.eq(new_shipment.partner_id),
                shipments::origin.eq(&details.origin),
                shipments::destination.eq(details.destination.as_deref()),
                shipments::shipment_type.eq(new_shipment.shipment_type.as_str()),
                shipments::cargo_type.eq(&details.cargo_type),
                shipments::weight.eq(details.weight.to_string()),
                shipments::distance.eq(details.distance.map(|d| d.to_string())),
                shipments::currency.eq(&details.currency),
                shipments::offered_amount.eq(details.offered_amount.to_string()),
                shipments::pickup_date.eq(details.pickup_date.as_deref()),
                shipments::notes.eq(new_shipment.notes.as_deref()),
            ))
            .execute(conn)?;

        let shipment_id: i64 = get_last_insert_rowid(conn)?;
        let shipment: Shipment = reload(conn, shipment_id)?;

        let event: AuditEvent = AuditEvent::new(
            shipment_id,
            actor,
            Action::new(
                String::from("CreateShipment"),
                Some(format!(
                    "Offered {} {} for {}",
                    shipment.offered_amount, shipment.currency, shipment.cargo_type
                )),
            ),
            StateSnapshot::new(String::from("none")),
            StateSnapshot::of(&shipment),
        );
        persist_audit_event(conn, &event)?;

        info!(
            shipment_id,
            partner_id = new_shipment.partner_id,
            "Shipment created"
        );
        Ok(shipment)
    })
}

/// Inserts a ledger row produced by a transition.
fn insert_ledger_entry(
    conn: &mut SqliteConnection,
    entry: &LedgerEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(payments::table)
        .values((
            payments::shipment_id.eq(entry.shipment_id),
            payments::from_user_id.eq(entry.from_user_id),
            payments::to_user_id.eq(entry.to_user_id),
            payments::amount.eq(entry.amount.to_string()),
            payments::currency.eq(&entry.currency),
            payments::payment_type.eq(entry.payment_type.as_str()),
            payments::status.eq(entry.status.as_str()),
            payments::customer_code.eq(entry.customer_code.as_ref().map(CustomerCode::value)),
        ))
        .execute(conn)?;

    let payment_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        payment_id,
        shipment_id = entry.shipment_id,
        payment_type = entry.payment_type.as_str(),
        "Recorded ledger entry"
    );
    Ok(payment_id)
}

/// Persists a lifecycle transition.
///
/// # Errors
///
/// Returns `Conflict` if the shipment no longer matches the state the
/// transition was computed from, or an error if any write fails.
pub fn apply_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<Shipment, PersistenceError> {
    let shipment_id: i64 = result.shipment_id;
    let expected: LifecycleState = result.expected;
    let next: LifecycleState = result.new_state;

    conn.transaction::<Shipment, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(
            shipments::table
                .filter(shipments::shipment_id.eq(shipment_id))
                .filter(shipments::status.eq(expected.status.as_str()))
                .filter(shipments::payment_status.eq(expected.payment_status.as_str()))
                .filter(shipments::agent_id.is(expected.agent_id)),
        )
        .set((
            shipments::status.eq(next.status.as_str()),
            shipments::payment_status.eq(next.payment_status.as_str()),
            shipments::agent_id.eq(next.agent_id),
            shipments::updated_at.eq(current_timestamp()),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(stale(shipment_id));
        }

        if let Some(proof) = &result.proof_of_delivery {
            diesel::update(shipments::table.filter(shipments::shipment_id.eq(shipment_id)))
                .set(shipments::proof_of_delivery.eq(proof))
                .execute(conn)?;
        }

        if let Some(entry) = &result.ledger_entry {
            insert_ledger_entry(conn, entry)?;
        }

        persist_audit_event(conn, &result.audit_event)?;

        info!(
            shipment_id,
            from = expected.status.as_str(),
            to = next.status.as_str(),
            action = %result.audit_event.action.name,
            "Shipment transition applied"
        );
        reload(conn, shipment_id)
    })
}

/// Persists an edit to a shipment's descriptive fields.
///
/// # Errors
///
/// Returns `Conflict` if the shipment's lifecycle state changed since it
/// was read, or an error if any write fails.
pub fn update_details(
    conn: &mut SqliteConnection,
    update: &DetailsUpdate,
) -> Result<Shipment, PersistenceError> {
    let shipment_id: i64 = update.shipment_id;
    let expected: LifecycleState = update.expected;
    let details = &update.details;

    conn.transaction::<Shipment, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(
            shipments::table
                .filter(shipments::shipment_id.eq(shipment_id))
                .filter(shipments::status.eq(expected.status.as_str()))
                .filter(shipments::payment_status.eq(expected.payment_status.as_str()))
                .filter(shipments::agent_id.is(expected.agent_id)),
        )
        .set((
            shipments::origin.eq(&details.origin),
            shipments::destination.eq(details.destination.as_deref()),
            shipments::cargo_type.eq(&details.cargo_type),
            shipments::weight.eq(details.weight.to_string()),
            shipments::distance.eq(details.distance.map(|d| d.to_string())),
            shipments::currency.eq(&details.currency),
            shipments::offered_amount.eq(details.offered_amount.to_string()),
            shipments::pickup_date.eq(details.pickup_date.as_deref()),
            shipments::updated_at.eq(current_timestamp()),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(stale(shipment_id));
        }

        persist_audit_event(conn, &update.audit_event)?;
        info!(shipment_id, "Shipment details updated");
        reload(conn, shipment_id)
    })
}
