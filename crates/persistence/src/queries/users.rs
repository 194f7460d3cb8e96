// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.

use cargolink_domain::{ApprovalStatus, Role, User};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{SessionData, SessionRow, UserData, UserRow};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Retrieves a user by username.
///
/// The lookup is case-insensitive; the column is declared `COLLATE NOCASE`.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by username: {}", username);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(UserData::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(UserData::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists partner and agent accounts awaiting approval, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_pending_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    debug!("Listing users pending approval");

    let rows: Vec<UserRow> = users::table
        .filter(users::approval_status.eq(ApprovalStatus::Pending.as_flag()))
        .filter(users::role.ne(Role::Admin.as_str()))
        .select(UserRow::as_select())
        .order_by((users::created_at.asc(), users::user_id.asc()))
        .load(conn)?;

    rows.into_iter()
        .map(|row| UserData::try_from(row).map(|data| data.user))
        .collect()
}

/// Returns the platform account: the admin with the lowest ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_platform_admin_id(conn: &mut SqliteConnection) -> Result<Option<i64>, PersistenceError> {
    let admin_id: Option<i64> = users::table
        .filter(users::role.eq(Role::Admin.as_str()))
        .select(users::user_id)
        .order_by(users::user_id.asc())
        .first(conn)
        .optional()?;

    Ok(admin_id)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SessionData::from))
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
