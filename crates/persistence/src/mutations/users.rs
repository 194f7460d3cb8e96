// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session mutations.

use cargolink_domain::{ApprovalStatus, Role};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use tracing::{debug, error, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::queries::users::get_user_by_username;

/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The username, unique without regard to case
/// * `full_name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The account role
/// * `approval` - The initial approval state
/// * `hash_cost` - The bcrypt cost factor
///
/// # Errors
///
/// Returns `DuplicateUsername` if the username is taken, or an error if the
/// password cannot be hashed or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    username: &str,
    full_name: &str,
    password: &str,
    role: Role,
    approval: ApprovalStatus,
    hash_cost: u32,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating user with username: {}, role: {}",
        username,
        role.as_str()
    );

    let password_hash: String = bcrypt::hash(password, hash_cost)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let inserted: Result<usize, diesel::result::Error> = diesel::insert_into(users::table)
        .values((
            users::username.eq(username),
            users::password_hash.eq(&password_hash),
            users::full_name.eq(full_name),
            users::role.eq(role.as_str()),
            users::approval_status.eq(approval.as_flag()),
        ))
        .execute(conn);

    match inserted {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateUsername(username.to_string()));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, "User created");
    Ok(user_id)
}

/// Sets a user's approval state.
///
/// # Errors
///
/// Returns `NotFound` if no such user exists.
pub fn set_approval(
    conn: &mut SqliteConnection,
    user_id: i64,
    approval: ApprovalStatus,
) -> Result<(), PersistenceError> {
    info!(user_id, approval = approval.as_flag(), "Setting approval state");

    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::approval_status.eq(approval.as_flag()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User with ID {user_id} not found"
        )));
    }
    Ok(())
}

/// Makes sure an admin account with the given username exists.
///
/// An existing admin with that username is left untouched.
///
/// # Errors
///
/// Returns `InitializationError` if the username belongs to a partner or
/// agent, or an error if the lookup or insert fails.
pub fn ensure_admin(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    hash_cost: u32,
) -> Result<i64, PersistenceError> {
    if let Some(existing) = get_user_by_username(conn, username)? {
        if existing.user.role != Role::Admin {
            error!(
                user_id = existing.user.user_id,
                role = existing.user.role.as_str(),
                "Seed username belongs to a non-admin account"
            );
            return Err(PersistenceError::InitializationError(format!(
                "Admin username '{username}' already belongs to a {} account",
                existing.user.role.as_str()
            )));
        }
        debug!(user_id = existing.user.user_id, "Admin account already present");
        return Ok(existing.user.user_id);
    }

    create_user(
        conn,
        username,
        "Platform Administrator",
        password,
        Role::Admin,
        ApprovalStatus::Approved,
        hash_cost,
    )
}

/// Creates a new session for a user.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes every session that expired before `now`.
///
/// `now` must use the same ISO 8601 layout as the stored `expires_at`
/// values, so the comparison is a plain string ordering.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
