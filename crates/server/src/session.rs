// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Browsers carry the session token in the `cargolink_session` cookie;
//! other clients may send `Authorization: Bearer <token>` instead.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cargolink_api::{ApiError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "cargolink_session";

/// Extractor for authenticated, approved users.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionUser { actor, .. }: SessionUser,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. Read the session cookie, falling back to the `Authorization` header
/// 2. Validate the token via `AuthenticationService::validate_session`
/// 3. Re-check the account's approval state
/// 4. Return the `AuthenticatedActor` and the token it was resolved from
///
/// # Errors
///
/// Returns HTTP 401 if no token is present or the session is unknown or
/// expired, and HTTP 403 if the account is pending or rejected.
pub struct SessionUser {
    /// The caller.
    pub actor: AuthenticatedActor,
    /// The token the caller presented.
    pub token: String,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = session_token(&parts.headers)?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::validate_session(&mut persistence, &token).map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::Refused(e)
            })?;
        drop(persistence);

        debug!(
            user_id = actor.user_id,
            role = %actor.role,
            "Session validated successfully"
        );

        Ok(Self { actor, token })
    }
}

/// Finds the session token on a request, preferring the cookie.
fn session_token(headers: &HeaderMap) -> Result<String, SessionError> {
    let jar: CookieJar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        debug!("No session cookie or Authorization header");
        return Err(SessionError::MissingToken);
    };
    let auth_value: &str = auth_header.to_str().map_err(|_| {
        warn!("Invalid Authorization header encoding");
        SessionError::InvalidAuthorizationHeader
    })?;
    auth_value
        .strip_prefix("Bearer ")
        .map(ToString::to_string)
        .ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })
}

/// Builds the cookie that carries a freshly issued session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(AuthenticationService::DEFAULT_SESSION_EXPIRATION)
        .build()
}

/// Builds a cookie matching the session cookie's path, for removal.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Neither a session cookie nor an `Authorization` header was sent.
    MissingToken,
    /// The `Authorization` header is not `Bearer <token>`.
    InvalidAuthorizationHeader,
    /// The token did not resolve to an approved user.
    Refused(ApiError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let err: ApiError = match self {
            Self::MissingToken => ApiError::AuthenticationFailed {
                reason: String::from("Not authenticated"),
            },
            Self::InvalidAuthorizationHeader => ApiError::AuthenticationFailed {
                reason: String::from(
                    "Invalid Authorization header format. Expected: 'Bearer <token>'",
                ),
            },
            Self::Refused(err) => err,
        };
        HttpError::from(err).into_response()
    }
}
