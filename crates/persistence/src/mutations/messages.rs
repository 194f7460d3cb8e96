// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_domain::Message;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::MessageRow;
use crate::diesel_schema::messages;
use crate::error::PersistenceError;

/// Stores a message on a shipment thread.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_message(
    conn: &mut SqliteConnection,
    shipment_id: i64,
    sender_id: i64,
    receiver_id: i64,
    body: &str,
) -> Result<Message, PersistenceError> {
    diesel::insert_into(messages::table)
        .values((
            messages::shipment_id.eq(shipment_id),
            messages::sender_id.eq(sender_id),
            messages::receiver_id.eq(receiver_id),
            messages::body.eq(body),
        ))
        .execute(conn)?;

    let message_id: i64 = get_last_insert_rowid(conn)?;
    debug!(message_id, shipment_id, sender_id, receiver_id, "Message stored");

    let row: MessageRow = messages::table
        .filter(messages::message_id.eq(message_id))
        .select(MessageRow::as_select())
        .first(conn)?;
    Ok(Message::from(row))
}

/// Marks every unread message addressed to `receiver_id` on a thread as read.
///
/// # Returns
///
/// The number of messages flipped.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_thread_read(
    conn: &mut SqliteConnection,
    shipment_id: i64,
    receiver_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::update(
        messages::table
            .filter(messages::shipment_id.eq(shipment_id))
            .filter(messages::receiver_id.eq(receiver_id))
            .filter(messages::is_read.eq(0)),
    )
    .set(messages::is_read.eq(1))
    .execute(conn)?;

    debug!(shipment_id, receiver_id, rows_affected, "Marked messages read");
    Ok(rows_affected)
}
