// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger queries.

use cargolink_domain::{Payment, PaymentStatus, PaymentType};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::PaymentRow;
use crate::diesel_schema::payments;
use crate::error::PersistenceError;

/// Retrieves a payment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the payment is not found.
pub fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Option<Payment>, PersistenceError> {
    let row: Option<PaymentRow> = payments::table
        .filter(payments::payment_id.eq(payment_id))
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Payment::try_from).transpose()
}

/// Retrieves the partner's payment for a shipment, which carries the
/// customer code.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
pub fn get_partner_payment(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Option<Payment>, PersistenceError> {
    let row: Option<PaymentRow> = payments::table
        .filter(payments::shipment_id.eq(shipment_id))
        .filter(payments::payment_type.eq(PaymentType::PartnerToAdmin.as_str()))
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Payment::try_from).transpose()
}

/// Lists payouts addressed to an agent, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_payouts_for_agent(
    conn: &mut SqliteConnection,
    agent_id: i64,
) -> Result<Vec<Payment>, PersistenceError> {
    debug!("Listing payouts for agent ID: {}", agent_id);

    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::to_user_id.eq(agent_id))
        .filter(payments::payment_type.eq(PaymentType::AdminToAgent.as_str()))
        .select(PaymentRow::as_select())
        .order_by((payments::created_at.desc(), payments::payment_id.desc()))
        .load(conn)?;

    rows.into_iter().map(Payment::try_from).collect()
}

/// Lists payments made by a partner, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_payments_by_partner(
    conn: &mut SqliteConnection,
    partner_id: i64,
) -> Result<Vec<Payment>, PersistenceError> {
    debug!("Listing payments made by partner ID: {}", partner_id);

    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::from_user_id.eq(partner_id))
        .filter(payments::payment_type.eq(PaymentType::PartnerToAdmin.as_str()))
        .select(PaymentRow::as_select())
        .order_by((payments::created_at.desc(), payments::payment_id.desc()))
        .load(conn)?;

    rows.into_iter().map(Payment::try_from).collect()
}

/// Lists agent payouts the platform has not yet processed, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_pending_payouts(conn: &mut SqliteConnection) -> Result<Vec<Payment>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::payment_type.eq(PaymentType::AdminToAgent.as_str()))
        .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
        .select(PaymentRow::as_select())
        .order_by((payments::created_at.asc(), payments::payment_id.asc()))
        .load(conn)?;

    rows.into_iter().map(Payment::try_from).collect()
}
