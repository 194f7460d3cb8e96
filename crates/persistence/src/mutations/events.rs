// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_audit::AuditEvent;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::shipment_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// Callers run this inside the transaction that applies the change the
/// event describes.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shipment_events::table)
        .values((
            shipment_events::shipment_id.eq(event.shipment_id),
            shipment_events::actor_user_id.eq(event.actor.user_id),
            shipment_events::actor_role.eq(event.actor.role.as_str()),
            shipment_events::action_name.eq(&event.action.name),
            shipment_events::action_details.eq(event.action.details.as_deref()),
            shipment_events::before_snapshot.eq(&event.before.data),
            shipment_events::after_snapshot.eq(&event.after.data),
        ))
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        event_id,
        shipment_id = event.shipment_id,
        action = %event.action.name,
        "Persisted audit event"
    );
    Ok(event_id)
}
