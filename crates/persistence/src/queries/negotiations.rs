// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_domain::{Negotiation, NegotiationStatus};
use diesel::SqliteConnection;
use diesel::dsl::count;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::NegotiationRow;
use crate::diesel_schema::negotiations;
use crate::error::PersistenceError;

/// Retrieves a negotiation by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the negotiation is not found.
pub fn get_negotiation(
    conn: &mut SqliteConnection,
    negotiation_id: i64,
) -> Result<Option<Negotiation>, PersistenceError> {
    let row: Option<NegotiationRow> = negotiations::table
        .filter(negotiations::negotiation_id.eq(negotiation_id))
        .select(NegotiationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Negotiation::try_from).transpose()
}

/// Lists the proposals made on a shipment, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_negotiations(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Vec<Negotiation>, PersistenceError> {
    debug!("Listing negotiations for shipment ID: {}", shipment_id);

    let rows: Vec<NegotiationRow> = negotiations::table
        .filter(negotiations::shipment_id.eq(shipment_id))
        .select(NegotiationRow::as_select())
        .order_by((
            negotiations::created_at.desc(),
            negotiations::negotiation_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter().map(Negotiation::try_from).collect()
}

/// Checks whether the shipment already has an accepted proposal.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_accepted_negotiation(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<bool, PersistenceError> {
    let accepted: i64 = negotiations::table
        .filter(negotiations::shipment_id.eq(shipment_id))
        .filter(negotiations::status.eq(NegotiationStatus::Accepted.as_str()))
        .select(count(negotiations::negotiation_id))
        .first(conn)?;

    Ok(accepted > 0)
}
