// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink::{NegotiationResponse, NewNegotiation};
use cargolink_domain::{Negotiation, NegotiationStatus, ShipmentStatus};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{negotiations, shipments};
use crate::error::PersistenceError;
use crate::mutations::events::persist_audit_event;
use crate::queries::negotiations::get_negotiation;

fn reload(
    conn: &mut SqliteConnection,
    negotiation_id: i64,
) -> Result<Negotiation, PersistenceError> {
    get_negotiation(conn, negotiation_id)?.ok_or_else(|| {
        PersistenceError::NotFound(format!("Negotiation with ID {negotiation_id} not found"))
    })
}

/// Records a new price proposal.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_negotiation(
    conn: &mut SqliteConnection,
    proposal: &NewNegotiation,
) -> Result<Negotiation, PersistenceError> {
    diesel::insert_into(negotiations::table)
        .values((
            negotiations::shipment_id.eq(proposal.shipment_id),
            negotiations::proposed_by.eq(proposal.proposed_by),
            negotiations::proposed_amount.eq(proposal.proposed_amount.to_string()),
            negotiations::currency.eq(&proposal.currency),
            negotiations::message.eq(proposal.message.as_deref()),
        ))
        .execute(conn)?;

    let negotiation_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        negotiation_id,
        shipment_id = proposal.shipment_id,
        proposed_by = proposal.proposed_by,
        "Negotiation proposed"
    );
    reload(conn, negotiation_id)
}

/// Persists the answer to a proposal.
///
/// The negotiation moves out of `pending` only if it is still pending. An
/// acceptance also sets the shipment's negotiated amount, provided the
/// shipment is still open and its payment status is unchanged. Both writes
/// and the audit event commit together.
///
/// # Errors
///
/// Returns `Conflict` if the proposal was already answered, the shipment
/// moved on, or another proposal on the shipment was accepted first.
pub fn respond_to_negotiation(
    conn: &mut SqliteConnection,
    response: &NegotiationResponse,
) -> Result<Negotiation, PersistenceError> {
    let negotiation_id: i64 = response.negotiation_id;

    conn.transaction::<Negotiation, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(
            negotiations::table
                .filter(negotiations::negotiation_id.eq(negotiation_id))
                .filter(negotiations::status.eq(NegotiationStatus::Pending.as_str())),
        )
        .set(negotiations::status.eq(response.new_status.as_str()))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::Conflict(format!(
                "Negotiation {negotiation_id} has already been answered"
            )));
        }

        if let Some(price_update) = &response.price_update {
            let shipment_id: i64 = price_update.shipment_id;
            let rows_affected: usize = diesel::update(
                shipments::table
                    .filter(shipments::shipment_id.eq(shipment_id))
                    .filter(
                        shipments::payment_status
                            .eq(price_update.expected_payment_status.as_str()),
                    )
                    .filter(shipments::status.ne_all([
                        ShipmentStatus::Delivered.as_str(),
                        ShipmentStatus::Declined.as_str(),
                    ])),
            )
            .set((
                shipments::negotiated_amount.eq(Some(price_update.negotiated_amount.to_string())),
                shipments::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                    "CURRENT_TIMESTAMP",
                )),
            ))
            .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::Conflict(format!(
                    "Shipment {shipment_id} can no longer be repriced"
                )));
            }

            persist_audit_event(conn, &price_update.audit_event)?;
            info!(
                negotiation_id,
                shipment_id,
                amount = %price_update.negotiated_amount,
                "Negotiated price applied"
            );
        }

        info!(
            negotiation_id,
            status = response.new_status.as_str(),
            "Negotiation answered"
        );
        reload(conn, negotiation_id)
    })
}
