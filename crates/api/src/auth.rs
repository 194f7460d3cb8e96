// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use cargolink_audit::Actor;
use cargolink_domain::{ApprovalStatus, Role, Shipment, ShipmentStatus, User};
use cargolink_persistence::{Persistence, SessionData, UserData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::{ApiError, AuthError};

/// An authenticated caller, resolved from a session.
///
/// Handlers receive this explicitly; nothing looks the caller up on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user's canonical identifier.
    pub user_id: i64,
    /// The login name.
    pub username: String,
    /// The display name.
    pub full_name: String,
    /// The user's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, username: String, full_name: String, role: Role) -> Self {
        Self {
            user_id,
            username,
            full_name,
            role,
        }
    }

    /// Builds the actor for a stored user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::new(
            user.user_id,
            user.username.clone(),
            user.full_name.clone(),
            user.role,
        )
    }

    /// Converts this actor into the audit actor recorded on shipment events.
    #[must_use]
    pub const fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }

    /// Returns true if the caller is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

fn unauthorized(action: &str, reason: &str) -> AuthError {
    AuthError::Unauthorized {
        action: action.to_string(),
        reason: reason.to_string(),
    }
}

/// Authorization service for role and ownership checks.
///
/// A partner acts only on shipments it owns and an agent only on shipments
/// assigned to it. Admins bypass ownership for reads, payments and payouts.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the caller has exactly the given role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller has a different role.
    pub fn require_role(
        actor: &AuthenticatedActor,
        role: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == role {
            Ok(())
        } else {
            Err(unauthorized(
                action,
                &format!("requires the {} role", role.as_str()),
            ))
        }
    }

    /// Checks that the caller may see a shipment.
    ///
    /// Any agent may see an unassigned pending shipment so it can be accepted.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller is neither a participant nor an admin.
    pub fn authorize_view_shipment(
        actor: &AuthenticatedActor,
        shipment: &Shipment,
    ) -> Result<(), AuthError> {
        let allowed: bool = match actor.role {
            Role::Admin => true,
            Role::Partner => shipment.is_owned_by(actor.user_id),
            Role::Agent => {
                shipment.is_assigned_to(actor.user_id)
                    || (shipment.status == ShipmentStatus::Pending && shipment.agent_id.is_none())
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(unauthorized("view shipment", "not a participant"))
        }
    }

    /// Checks that the caller is the shipment's partner or assigned agent.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_participant(
        actor: &AuthenticatedActor,
        shipment: &Shipment,
        action: &str,
    ) -> Result<(), AuthError> {
        let allowed: bool = match actor.role {
            Role::Partner => shipment.is_owned_by(actor.user_id),
            Role::Agent => shipment.is_assigned_to(actor.user_id),
            Role::Admin => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(unauthorized(action, "not a participant"))
        }
    }

    /// Checks that the caller is a participant or an admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_participant_or_admin(
        actor: &AuthenticatedActor,
        shipment: &Shipment,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is_admin() {
            return Ok(());
        }
        Self::authorize_participant(actor, shipment, action)
    }

    /// Checks that the caller may pay for a shipment: its partner or an admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` otherwise.
    pub fn authorize_payment(
        actor: &AuthenticatedActor,
        shipment: &Shipment,
    ) -> Result<(), AuthError> {
        let allowed: bool = match actor.role {
            Role::Admin => true,
            Role::Partner => shipment.is_owned_by(actor.user_id),
            Role::Agent => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(unauthorized("pay for shipment", "not the shipment's partner"))
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and opens a session.
    ///
    /// The password is checked before the approval state, so a caller
    /// without the password learns nothing about the account.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials`, `PendingApproval` or `Rejected` from
    /// the account gate, or an internal error if storage fails.
    pub fn login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor), ApiError> {
        let Some(stored): Option<UserData> = persistence.get_user_by_username(username)? else {
            debug!("Login for unknown username");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !Persistence::verify_password(password, &stored.password_hash)? {
            warn!(user_id = stored.user.user_id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        Self::check_account_gate(&stored.user)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let purged: usize = persistence.delete_expired_sessions(&Self::format_timestamp(now)?)?;
        if purged > 0 {
            debug!(purged, "Removed expired sessions");
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String = Self::format_timestamp(now + Self::DEFAULT_SESSION_EXPIRATION)?;
        persistence.create_session(&session_token, stored.user.user_id, &expires_at)?;

        info!(
            user_id = stored.user.user_id,
            role = %stored.user.role,
            "User logged in"
        );
        Ok((session_token, AuthenticatedActor::from_user(&stored.user)))
    }

    /// Resolves the caller behind a session token.
    ///
    /// An expired session is deleted. A session whose user is no longer
    /// approved is refused.
    ///
    /// # Errors
    ///
    /// Returns `SessionInvalid` for unknown or expired tokens, and
    /// `PendingApproval` or `Rejected` if the account lost its approval.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, ApiError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)?
            .ok_or_else(|| AuthError::SessionInvalid {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to parse session expiration: {e}"),
            })?;
        if OffsetDateTime::now_utc() > expires_at {
            persistence.delete_session(session_token)?;
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::SessionInvalid {
                reason: String::from("Session expired"),
            }
            .into());
        }

        let stored: UserData = persistence.get_user_by_id(session.user_id)?.ok_or_else(|| {
            AuthError::SessionInvalid {
                reason: String::from("User not found"),
            }
        })?;
        Self::check_account_gate(&stored.user)?;

        persistence.update_session_activity(session.session_id)?;

        Ok(AuthenticatedActor::from_user(&stored.user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
        persistence.delete_session(session_token)?;
        Ok(())
    }

    fn check_account_gate(user: &User) -> Result<(), AuthError> {
        if user.may_log_in() {
            return Ok(());
        }
        match user.approval {
            ApprovalStatus::Rejected => Err(AuthError::Rejected),
            ApprovalStatus::Pending | ApprovalStatus::Approved => Err(AuthError::PendingApproval),
        }
    }

    fn format_timestamp(at: OffsetDateTime) -> Result<String, ApiError> {
        at.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
    }

    /// Generates an opaque 256-bit session token.
    fn generate_session_token() -> String {
        let parts: [u64; 4] = [
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
        ];
        parts.iter().map(|part| format!("{part:016x}")).collect()
    }
}
