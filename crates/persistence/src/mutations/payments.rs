// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink::PayoutCompletion;
use cargolink_domain::{Payment, PaymentStatus, PaymentType};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use tracing::info;

use crate::diesel_schema::{payments, shipments};
use crate::error::PersistenceError;
use crate::mutations::events::persist_audit_event;
use crate::queries::payments::get_payment;

/// Marks a pending agent payout as completed and closes out the shipment's
/// payment status.
///
/// # Errors
///
/// Returns `Conflict` if the payout was already processed or the shipment's
/// payment status changed, or an error if any write fails.
pub fn complete_payout(
    conn: &mut SqliteConnection,
    completion: &PayoutCompletion,
) -> Result<Payment, PersistenceError> {
    let payment_id: i64 = completion.payment_id;
    let shipment_id: i64 = completion.shipment_id;

    conn.transaction::<Payment, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(
            payments::table
                .filter(payments::payment_id.eq(payment_id))
                .filter(payments::payment_type.eq(PaymentType::AdminToAgent.as_str()))
                .filter(payments::status.eq(PaymentStatus::Pending.as_str())),
        )
        .set((
            payments::status.eq(PaymentStatus::PayoutCompleted.as_str()),
            payments::processed_at.eq(diesel::dsl::sql::<Nullable<Text>>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::Conflict(format!(
                "Payout {payment_id} has already been processed"
            )));
        }

        let rows_affected: usize = diesel::update(
            shipments::table
                .filter(shipments::shipment_id.eq(shipment_id))
                .filter(
                    shipments::payment_status
                        .eq(completion.expected_shipment_payment_status.as_str()),
                ),
        )
        .set((
            shipments::payment_status.eq(PaymentStatus::PayoutCompleted.as_str()),
            shipments::updated_at.eq(diesel::dsl::sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::Conflict(format!(
                "Shipment {shipment_id} payment status changed during payout"
            )));
        }

        persist_audit_event(conn, &completion.audit_event)?;
        info!(payment_id, shipment_id, "Payout completed");

        get_payment(conn, payment_id)?.ok_or_else(|| {
            PersistenceError::NotFound(format!("Payment with ID {payment_id} not found"))
        })
    })
}
