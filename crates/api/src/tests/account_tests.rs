// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cargolink_domain::Role;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::{
    ApiError, AuthenticatedActor, AuthenticationService, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, UserInfo, approve_user, current_user, list_pending_users,
    login, logout, register, reject_user,
};

use super::helpers::{TEST_PASSWORD, setup};

fn register_request(username: &str, role: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: String::from("s3cret-pass"),
        full_name: String::from("Ada Obi"),
        role: role.to_string(),
    }
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_creates_pending_account() {
    let mut ctx = setup();

    let response: RegisterResponse =
        register(&mut ctx.persistence, &register_request("newpartner", "partner")).unwrap();

    assert_eq!(response.role, Role::Partner);
    assert_eq!(response.is_approved, 0);
    let pending: Vec<UserInfo> = list_pending_users(&mut ctx.persistence, &ctx.admin).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, response.user_id);
    assert_eq!(pending[0].username, "newpartner");
}

#[test]
fn test_register_rejects_admin_role() {
    let mut ctx = setup();

    let result = register(&mut ctx.persistence, &register_request("sneaky", "admin"));

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(
        ctx.persistence
            .get_user_by_username("sneaky")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_register_rejects_unknown_role() {
    let mut ctx = setup();

    let result = register(&mut ctx.persistence, &register_request("courier", "courier"));

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "role"
    ));
}

#[test]
fn test_register_rejects_taken_username_case_insensitively() {
    let mut ctx = setup();

    let result = register(&mut ctx.persistence, &register_request("PARTNER", "agent"));

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_register_validates_fields() {
    let mut ctx = setup();

    let short_name = register(&mut ctx.persistence, &register_request("ab", "agent"));
    assert!(matches!(
        short_name,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "username"
    ));

    let mut weak = register_request("weakling", "agent");
    weak.password = String::from("short");
    let result = register(&mut ctx.persistence, &weak);
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "password"
    ));

    let mut same = register_request("samesame", "agent");
    same.password = String::from("SameSame");
    let result = register(&mut ctx.persistence, &same);
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "password"
    ));

    let mut blank = register_request("blankname", "agent");
    blank.full_name = String::from("   ");
    let result = register(&mut ctx.persistence, &blank);
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "fullName"
    ));
}

// ============================================================================
// Approval gate
// ============================================================================

#[test]
fn test_pending_account_cannot_log_in_until_approved() {
    let mut ctx = setup();
    let registered: RegisterResponse =
        register(&mut ctx.persistence, &register_request("newagent", "agent")).unwrap();

    let before = login(&mut ctx.persistence, &login_request("newagent", "s3cret-pass"));
    assert_eq!(before.unwrap_err(), ApiError::PendingApproval);

    let approved: UserInfo =
        approve_user(&mut ctx.persistence, registered.user_id, &ctx.admin).unwrap();
    assert_eq!(approved.is_approved, 1);

    let response: LoginResponse =
        login(&mut ctx.persistence, &login_request("newagent", "s3cret-pass")).unwrap();
    assert_eq!(response.user.id, registered.user_id);
    assert!(!response.session_token.is_empty());
}

#[test]
fn test_wrong_password_is_checked_before_approval() {
    let mut ctx = setup();
    register(&mut ctx.persistence, &register_request("newagent", "agent")).unwrap();

    let result = login(&mut ctx.persistence, &login_request("newagent", "not-the-password"));

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_unknown_username_fails_like_wrong_password() {
    let mut ctx = setup();

    let unknown = login(&mut ctx.persistence, &login_request("nobody", TEST_PASSWORD));
    let wrong = login(&mut ctx.persistence, &login_request("partner", "wrong-password"));

    assert_eq!(unknown.unwrap_err(), wrong.unwrap_err());
}

#[test]
fn test_rejected_account_cannot_log_in() {
    let mut ctx = setup();
    let registered: RegisterResponse =
        register(&mut ctx.persistence, &register_request("newagent", "agent")).unwrap();

    let rejected: UserInfo =
        reject_user(&mut ctx.persistence, registered.user_id, &ctx.admin).unwrap();
    assert_eq!(rejected.is_approved, 2);

    let result = login(&mut ctx.persistence, &login_request("newagent", "s3cret-pass"));
    assert_eq!(result.unwrap_err(), ApiError::Rejected);
}

#[test]
fn test_admin_logs_in_regardless_of_flag() {
    let mut ctx = setup();

    let response: LoginResponse =
        login(&mut ctx.persistence, &login_request("admin", TEST_PASSWORD)).unwrap();

    assert_eq!(response.user.role, Role::Admin);
}

#[test]
fn test_approval_is_idempotent() {
    let mut ctx = setup();
    let partner_id: i64 = ctx.partner.user_id;

    let first: UserInfo = approve_user(&mut ctx.persistence, partner_id, &ctx.admin).unwrap();
    let second: UserInfo = approve_user(&mut ctx.persistence, partner_id, &ctx.admin).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_admin_accounts_cannot_be_approved_or_rejected() {
    let mut ctx = setup();
    let admin_id: i64 = ctx.admin.user_id;

    let result = reject_user(&mut ctx.persistence, admin_id, &ctx.admin);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_only_admins_manage_approvals() {
    let mut ctx = setup();
    let agent_id: i64 = ctx.agent.user_id;

    let approve = approve_user(&mut ctx.persistence, agent_id, &ctx.partner);
    let pending = list_pending_users(&mut ctx.persistence, &ctx.agent);

    assert!(matches!(approve, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(pending, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_approving_unknown_user_is_not_found() {
    let mut ctx = setup();

    let result = approve_user(&mut ctx.persistence, 9999, &ctx.admin);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_session_resolves_caller() {
    let mut ctx = setup();
    let response: LoginResponse =
        login(&mut ctx.persistence, &login_request("partner", TEST_PASSWORD)).unwrap();

    let actor: AuthenticatedActor =
        AuthenticationService::validate_session(&mut ctx.persistence, &response.session_token)
            .unwrap();

    assert_eq!(actor, ctx.partner);
    let me: UserInfo = current_user(&mut ctx.persistence, &actor).unwrap();
    assert_eq!(me.username, "partner");
}

#[test]
fn test_logout_ends_session() {
    let mut ctx = setup();
    let response: LoginResponse =
        login(&mut ctx.persistence, &login_request("partner", TEST_PASSWORD)).unwrap();

    logout(&mut ctx.persistence, &response.session_token).unwrap();

    let result =
        AuthenticationService::validate_session(&mut ctx.persistence, &response.session_token);
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_expired_session_is_refused_and_deleted() {
    let mut ctx = setup();
    let expired: String = (OffsetDateTime::now_utc() - time::Duration::hours(1))
        .format(&Iso8601::DEFAULT)
        .unwrap();
    ctx.persistence
        .create_session("stale-token", ctx.partner.user_id, &expired)
        .unwrap();

    let result = AuthenticationService::validate_session(&mut ctx.persistence, "stale-token");

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
    assert!(
        ctx.persistence
            .get_session_by_token("stale-token")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_session_refused_after_account_is_rejected() {
    let mut ctx = setup();
    let response: LoginResponse =
        login(&mut ctx.persistence, &login_request("agent", TEST_PASSWORD)).unwrap();

    reject_user(&mut ctx.persistence, ctx.agent.user_id, &ctx.admin).unwrap();

    let result =
        AuthenticationService::validate_session(&mut ctx.persistence, &response.session_token);
    assert_eq!(result.unwrap_err(), ApiError::Rejected);
}
