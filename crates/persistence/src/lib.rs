// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Cargolink shipment marketplace.
//!
//! This crate stores users, sessions, shipments, negotiations, payments,
//! messages and shipment history in `SQLite` through Diesel. It holds no
//! business rules: every change it applies was computed by the `cargolink`
//! core crate, and every lifecycle write is a conditional update keyed on
//! the state that computation started from.
//!
//! ## Storage
//!
//! - Schema migrations are embedded and applied when a connection opens
//! - Foreign key enforcement is verified at startup
//! - File databases run in WAL mode
//! - Amounts, weights and distances are canonical decimal strings
//!
//! ## Concurrency
//!
//! A conditional update that matches no row means another caller changed
//! the row first. Such writes fail with `PersistenceError::Conflict` and
//! roll back the surrounding transaction, including any ledger row and
//! audit event written alongside.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` opens an isolated, uniquely named shared
//! in-memory database, so tests never interfere with each other.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use cargolink::{
    DetailsUpdate, NegotiationResponse, NewNegotiation, NewShipment, PayoutCompletion,
    TransitionResult,
};
use cargolink_audit::Actor;
use cargolink_domain::{ApprovalStatus, Message, Negotiation, Payment, Role, Shipment, User};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{SessionData, ShipmentEventData, UserData};
pub use error::PersistenceError;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    hash_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_cargolink_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used for new password hashes.
    ///
    /// Tests lower this to keep hashing fast.
    #[must_use]
    pub const fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a new user, hashing the password.
    ///
    /// # Arguments
    ///
    /// * `username` - The username, unique without regard to case
    /// * `full_name` - The display name
    /// * `password` - The plain-text password (will be hashed)
    /// * `role` - The account role
    /// * `approval` - The initial approval state
    ///
    /// # Errors
    ///
    /// Returns `DuplicateUsername` if the username is taken.
    pub fn create_user(
        &mut self,
        username: &str,
        full_name: &str,
        password: &str,
        role: Role,
        approval: ApprovalStatus,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(
            &mut self.conn,
            username,
            full_name,
            password,
            role,
            approval,
            self.hash_cost,
        )
    }

    /// Retrieves a user by username, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_username(&mut self.conn, username)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists partner and agent accounts awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_pending_users(&mut self.conn)
    }

    /// Sets a user's approval state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    pub fn set_approval(
        &mut self,
        user_id: i64,
        approval: ApprovalStatus,
    ) -> Result<(), PersistenceError> {
        mutations::users::set_approval(&mut self.conn, user_id, approval)
    }

    /// Makes sure the seed admin account exists, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the username is held by a non-admin,
    /// or an error if the lookup or insert fails.
    pub fn ensure_admin(&mut self, username: &str, password: &str) -> Result<i64, PersistenceError> {
        mutations::users::ensure_admin(&mut self.conn, username, password, self.hash_cost)
    }

    /// Returns the platform account that payments are made to and payouts
    /// are made from.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_platform_admin_id(&mut self) -> Result<Option<i64>, PersistenceError> {
        queries::users::get_platform_admin_id(&mut self.conn)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    // ========================================================================
    // Session Management
    // ========================================================================

    /// Creates a new session for a user.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `user_id` - The user ID
    /// * `expires_at` - The expiration timestamp (ISO 8601 format)
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions that expired before `now` (ISO 8601).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Shipments
    // ========================================================================

    /// Stores a validated new shipment and records its creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_shipment(
        &mut self,
        new_shipment: &NewShipment,
        actor: Actor,
    ) -> Result<Shipment, PersistenceError> {
        mutations::shipments::create_shipment(&mut self.conn, new_shipment, actor)
    }

    /// Retrieves a shipment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_shipment(&mut self, shipment_id: i64) -> Result<Option<Shipment>, PersistenceError> {
        queries::shipments::get_shipment(&mut self.conn, shipment_id)
    }

    /// Lists a partner's shipments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shipments_for_partner(
        &mut self,
        partner_id: i64,
    ) -> Result<Vec<Shipment>, PersistenceError> {
        queries::shipments::list_shipments_for_partner(&mut self.conn, partner_id)
    }

    /// Lists an agent's assigned shipments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shipments_for_agent(
        &mut self,
        agent_id: i64,
    ) -> Result<Vec<Shipment>, PersistenceError> {
        queries::shipments::list_shipments_for_agent(&mut self.conn, agent_id)
    }

    /// Lists every shipment, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_all_shipments(&mut self) -> Result<Vec<Shipment>, PersistenceError> {
        queries::shipments::list_all_shipments(&mut self.conn)
    }

    /// Lists shipments still open for an agent to accept, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_shipments(&mut self) -> Result<Vec<Shipment>, PersistenceError> {
        queries::shipments::list_pending_shipments(&mut self.conn)
    }

    /// Persists a lifecycle transition computed by `cargolink::apply`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the shipment changed since it was read.
    pub fn apply_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<Shipment, PersistenceError> {
        mutations::shipments::apply_transition(&mut self.conn, result)
    }

    /// Persists an edit computed by `cargolink::apply_details`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the shipment changed since it was read.
    pub fn update_shipment_details(
        &mut self,
        update: &DetailsUpdate,
    ) -> Result<Shipment, PersistenceError> {
        mutations::shipments::update_details(&mut self.conn, update)
    }

    /// Lists a shipment's recorded transitions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shipment_events(
        &mut self,
        shipment_id: i64,
    ) -> Result<Vec<ShipmentEventData>, PersistenceError> {
        queries::shipments::list_shipment_events(&mut self.conn, shipment_id)
    }

    // ========================================================================
    // Negotiations
    // ========================================================================

    /// Stores a validated proposal.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_negotiation(
        &mut self,
        proposal: &NewNegotiation,
    ) -> Result<Negotiation, PersistenceError> {
        mutations::negotiations::create_negotiation(&mut self.conn, proposal)
    }

    /// Retrieves a negotiation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_negotiation(
        &mut self,
        negotiation_id: i64,
    ) -> Result<Option<Negotiation>, PersistenceError> {
        queries::negotiations::get_negotiation(&mut self.conn, negotiation_id)
    }

    /// Lists a shipment's proposals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_negotiations(
        &mut self,
        shipment_id: i64,
    ) -> Result<Vec<Negotiation>, PersistenceError> {
        queries::negotiations::list_negotiations(&mut self.conn, shipment_id)
    }

    /// Checks whether any proposal on the shipment has been accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn has_accepted_negotiation(&mut self, shipment_id: i64) -> Result<bool, PersistenceError> {
        queries::negotiations::has_accepted_negotiation(&mut self.conn, shipment_id)
    }

    /// Persists an answer computed by `cargolink::respond`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the proposal was answered concurrently or the
    /// shipment can no longer be repriced.
    pub fn respond_to_negotiation(
        &mut self,
        response: &NegotiationResponse,
    ) -> Result<Negotiation, PersistenceError> {
        mutations::negotiations::respond_to_negotiation(&mut self.conn, response)
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// Retrieves a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_payment(&mut self, payment_id: i64) -> Result<Option<Payment>, PersistenceError> {
        queries::payments::get_payment(&mut self.conn, payment_id)
    }

    /// Retrieves the partner payment that carries a shipment's customer code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_partner_payment(
        &mut self,
        shipment_id: i64,
    ) -> Result<Option<Payment>, PersistenceError> {
        queries::payments::get_partner_payment(&mut self.conn, shipment_id)
    }

    /// Lists payouts addressed to an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_payouts_for_agent(
        &mut self,
        agent_id: i64,
    ) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_payouts_for_agent(&mut self.conn, agent_id)
    }

    /// Lists payments made by a partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_payments_by_partner(
        &mut self,
        partner_id: i64,
    ) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_payments_by_partner(&mut self.conn, partner_id)
    }

    /// Lists agent payouts awaiting processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_payouts(&mut self) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_pending_payouts(&mut self.conn)
    }

    /// Persists a payout computed by `cargolink::complete_payout`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the payout was already processed.
    pub fn complete_payout(
        &mut self,
        completion: &PayoutCompletion,
    ) -> Result<Payment, PersistenceError> {
        mutations::payments::complete_payout(&mut self.conn, completion)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Stores a message on a shipment thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_message(
        &mut self,
        shipment_id: i64,
        sender_id: i64,
        receiver_id: i64,
        body: &str,
    ) -> Result<Message, PersistenceError> {
        mutations::messages::create_message(
            &mut self.conn,
            shipment_id,
            sender_id,
            receiver_id,
            body,
        )
    }

    /// Marks the reader's unread messages on a thread as read, then returns
    /// the whole thread in conversation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the update or query fails.
    pub fn read_thread(
        &mut self,
        shipment_id: i64,
        reader_id: i64,
    ) -> Result<Vec<Message>, PersistenceError> {
        mutations::messages::mark_thread_read(&mut self.conn, shipment_id, reader_id)?;
        queries::messages::list_thread(&mut self.conn, shipment_id)
    }
}
