// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_domain::Message;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::MessageRow;
use crate::diesel_schema::messages;
use crate::error::PersistenceError;

/// Loads a shipment's message thread in conversation order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_thread(
    conn: &mut SqliteConnection,
    shipment_id: i64,
) -> Result<Vec<Message>, PersistenceError> {
    let rows: Vec<MessageRow> = messages::table
        .filter(messages::shipment_id.eq(shipment_id))
        .select(MessageRow::as_select())
        .order_by((messages::created_at.asc(), messages::message_id.asc()))
        .load(conn)?;

    Ok(rows.into_iter().map(Message::from).collect())
}
