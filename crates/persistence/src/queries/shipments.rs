// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shipment and shipment history queries.
//!
//! Listings are newest first; rows created within the same second are
//! ordered by descending ID.

use cargolink_domain::{Shipment, ShipmentStatus};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{ShipmentEventData, ShipmentEventRow, ShipmentRow};
use crate::diesel_schema::{shipment_events, shipments};
use crate::error::PersistenceError;

/// Retrieves a shipment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the shipment is not found.
pub fn get_shipment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Option<Shipment>, PersistenceError> {
    debug!("Looking up shipment ID: {}", shipment_id);

    let row: Option<ShipmentRow> = shipments::table
        .filter(shipments::shipment_id.eq(shipment_id))
        .select(ShipmentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Shipment::try_from).transpose()
}

fn collect(rows: Vec<ShipmentRow>) -> Result<Vec<Shipment>, PersistenceError> {
    rows.into_iter().map(Shipment::try_from).collect()
}

/// Lists the shipments a partner owns.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_shipments_for_partner(
    conn: &mut SqliteConnection,
    partner_id: i64,
) -> Result<Vec<Shipment>, PersistenceError> {
    let rows: Vec<ShipmentRow> = shipments::table
        .filter(shipments::partner_id.eq(partner_id))
        .select(ShipmentRow::as_select())
        .order_by((shipments::created_at.desc(), shipments::shipment_id.desc()))
        .load(conn)?;

    collect(rows)
}

/// Lists the shipments assigned to an agent.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_shipments_for_agent(
    conn: &mut SqliteConnection,
    agent_id: i64,
) -> Result<Vec<Shipment>, PersistenceError> {
    let rows: Vec<ShipmentRow> = shipments::table
        .filter(shipments::agent_id.eq(agent_id))
        .select(ShipmentRow::as_select())
        .order_by((shipments::created_at.desc(), shipments::shipment_id.desc()))
        .load(conn)?;

    collect(rows)
}

/// Lists every shipment.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_all_shipments(conn: &mut SqliteConnection) -> Result<Vec<Shipment>, PersistenceError> {
    let rows: Vec<ShipmentRow> = shipments::table
        .select(ShipmentRow::as_select())
        .order_by((shipments::created_at.desc(), shipments::shipment_id.desc()))
        .load(conn)?;

    collect(rows)
}

/// Lists every shipment still waiting for an agent.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_pending_shipments(
    conn: &mut SqliteConnection,
) -> Result<Vec<Shipment>, PersistenceError> {
    let rows: Vec<ShipmentRow> = shipments::table
        .filter(shipments::status.eq(ShipmentStatus::Pending.as_str()))
        .select(ShipmentRow::as_select())
        .order_by((shipments::created_at.desc(), shipments::shipment_id.desc()))
        .load(conn)?;

    collect(rows)
}

/// Lists the recorded transitions of a shipment, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shipment_events(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Vec<ShipmentEventData>, PersistenceError> {
    debug!("Loading history for shipment ID: {}", shipment_id);

    let rows: Vec<ShipmentEventRow> = shipment_events::table
        .filter(shipment_events::shipment_id.eq(shipment_id))
        .select(ShipmentEventRow::as_select())
        .order_by(shipment_events::event_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(ShipmentEventData::from).collect())
}
