// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler receives the caller explicitly, checks role and ownership,
//! runs the pure rules from `cargolink`, and hands the result to persistence.

use cargolink::{
    Command, DetailsUpdate, NegotiationResponse, NewNegotiation, NewShipment, PayoutCompletion,
    ShipmentChanges, ShipmentDetails, TransitionResult, apply, apply_details, complete_payout,
    prepare_shipment, propose, respond,
};
use cargolink_domain::{
    ApprovalStatus, CustomerCode, Negotiation, Payment, Role, Shipment, ShipmentType, User,
    validate_full_name, validate_message_text, validate_username,
};
use cargolink_persistence::{Persistence, PersistenceError, UserData};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, AuthError, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ConfirmDeliveryRequest, CreateNegotiationRequest, CreatePaymentRequest,
    CreateShipmentRequest, HealthResponse, LoginRequest, LoginResponse, MessageInfo,
    MessageResponse, NegotiationInfo, PaymentInfo, PayoutInfo, RegisterRequest, RegisterResponse,
    RespondNegotiationRequest, SendMessageRequest, ShipmentEventInfo, ShipmentInfo,
    UpdateShipmentRequest, UserInfo,
};

/// Loads a shipment or reports it missing.
fn load_shipment(persistence: &mut Persistence, shipment_id: i64) -> Result<Shipment, ApiError> {
    persistence
        .get_shipment(shipment_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Shipment"),
            message: format!("Shipment {shipment_id} does not exist"),
        })
}

fn load_user(persistence: &mut Persistence, user_id: i64) -> Result<User, ApiError> {
    persistence
        .get_user_by_id(user_id)?
        .map(|stored| stored.user)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })
}

/// The account payments are made to and payouts are made from.
fn platform_admin_id(persistence: &mut Persistence) -> Result<i64, ApiError> {
    persistence
        .get_platform_admin_id()?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("No platform admin account exists"),
        })
}

fn parse_customer_code(input: &str) -> Result<CustomerCode, ApiError> {
    CustomerCode::parse(input).map_err(translate_domain_error)
}

// ============================================================================
// Accounts
// ============================================================================

/// Registers a partner or agent account awaiting admin approval.
///
/// The caller is not logged in by registering.
///
/// # Errors
///
/// Returns an error if:
/// - The role is not `partner` or `agent`
/// - The username, full name or password is invalid
/// - The username is already taken
pub fn register(
    persistence: &mut Persistence,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let role: Role = request
        .role
        .parse::<Role>()
        .map_err(translate_domain_error)?;
    if !role.can_self_register() {
        return Err(AuthError::ForbiddenRole {
            role: request.role.clone(),
        }
        .into());
    }

    validate_username(&request.username).map_err(translate_domain_error)?;
    validate_full_name(&request.full_name).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(&request.password, &request.username)?;

    let user_id: i64 = persistence
        .create_user(
            &request.username,
            request.full_name.trim(),
            &request.password,
            role,
            ApprovalStatus::Pending,
        )
        .map_err(|e| match e {
            PersistenceError::DuplicateUsername(username) => {
                ApiError::from(AuthError::DuplicateUsername { username })
            }
            other => ApiError::from(other),
        })?;

    info!(user_id, role = %role, "Registered account pending approval");

    Ok(RegisterResponse {
        message: String::from("Registration successful. Your account is pending admin approval."),
        user_id,
        role,
        is_approved: ApprovalStatus::Pending.as_flag(),
    })
}

/// Logs in and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the account is not approved.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("username"),
            message: String::from("Username and password are required"),
        });
    }

    let (session_token, actor): (String, AuthenticatedActor) =
        AuthenticationService::login(persistence, &request.username, &request.password)?;
    let user: User = load_user(persistence, actor.user_id)?;

    Ok(LoginResponse {
        user: UserInfo::from(&user),
        session_token,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse::new("Logged out successfully"))
}

/// Returns the caller's own account.
///
/// # Errors
///
/// Returns an error if the account no longer exists.
pub fn current_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    let user: User = load_user(persistence, actor.user_id)?;
    Ok(UserInfo::from(&user))
}

/// Lists accounts awaiting approval. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_pending_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<UserInfo>, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "list pending users")?;
    let users: Vec<User> = persistence.list_pending_users()?;
    Ok(users.iter().map(UserInfo::from).collect())
}

fn set_approval(
    persistence: &mut Persistence,
    user_id: i64,
    approval: ApprovalStatus,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "change account approval")?;

    let target: User = load_user(persistence, user_id)?;
    if target.role == Role::Admin {
        return Err(ApiError::InvalidInput {
            field: String::from("userId"),
            message: String::from("Admin accounts cannot be approved or rejected"),
        });
    }

    persistence.set_approval(user_id, approval)?;
    info!(
        user_id,
        admin_id = actor.user_id,
        approval = approval.as_flag(),
        "Account approval changed"
    );

    let updated: User = load_user(persistence, user_id)?;
    Ok(UserInfo::from(&updated))
}

/// Approves a partner or agent account. Admin only; idempotent.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the user does not
/// exist, or the user is an admin.
pub fn approve_user(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    set_approval(persistence, user_id, ApprovalStatus::Approved, actor)
}

/// Rejects a partner or agent account. Admin only; idempotent.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the user does not
/// exist, or the user is an admin.
pub fn reject_user(
    persistence: &mut Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    set_approval(persistence, user_id, ApprovalStatus::Rejected, actor)
}

// ============================================================================
// Shipments
// ============================================================================

/// Posts a new shipment. Partner only.
///
/// # Errors
///
/// Returns an error if the caller is not a partner or a field is invalid.
pub fn create_shipment(
    persistence: &mut Persistence,
    request: &CreateShipmentRequest,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Partner, "create shipment")?;

    let shipment_type: ShipmentType = request
        .shipment_type
        .parse::<ShipmentType>()
        .map_err(translate_domain_error)?;
    let details = ShipmentDetails {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        cargo_type: request.cargo_type.clone(),
        weight: request.weight,
        distance: request.distance,
        currency: request.currency.clone(),
        offered_amount: request.offered_amount,
        pickup_date: request.pickup_date.clone(),
    };
    let new_shipment: NewShipment = prepare_shipment(
        actor.user_id,
        shipment_type,
        details,
        request.notes.clone(),
    )
    .map_err(translate_core_error)?;

    let shipment: Shipment =
        persistence.create_shipment(&new_shipment, actor.to_audit_actor())?;
    info!(
        shipment_id = shipment.shipment_id,
        partner_id = actor.user_id,
        "Shipment created"
    );
    Ok(ShipmentInfo::from(&shipment))
}

/// Lists the caller's shipments: owned for a partner, assigned for an
/// agent, everything for an admin. Newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shipments(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<ShipmentInfo>, ApiError> {
    let shipments: Vec<Shipment> = match actor.role {
        Role::Partner => persistence.list_shipments_for_partner(actor.user_id)?,
        Role::Agent => persistence.list_shipments_for_agent(actor.user_id)?,
        Role::Admin => persistence.list_all_shipments()?,
    };
    Ok(shipments.iter().map(ShipmentInfo::from).collect())
}

/// Lists every pending shipment. Agent only.
///
/// # Errors
///
/// Returns an error if the caller is not an agent.
pub fn list_available_shipments(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<ShipmentInfo>, ApiError> {
    AuthorizationService::require_role(actor, Role::Agent, "view available shipments")?;
    let shipments: Vec<Shipment> = persistence.list_pending_shipments()?;
    Ok(shipments.iter().map(ShipmentInfo::from).collect())
}

/// Returns one shipment.
///
/// # Errors
///
/// Returns an error if the shipment does not exist or the caller may not see it.
pub fn get_shipment(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_view_shipment(actor, &shipment)?;
    Ok(ShipmentInfo::from(&shipment))
}

fn persist_transition(
    persistence: &mut Persistence,
    shipment: &Shipment,
    command: Command,
    actor: &AuthenticatedActor,
) -> Result<Shipment, ApiError> {
    let result: TransitionResult =
        apply(shipment, command, actor.to_audit_actor()).map_err(translate_core_error)?;
    let updated: Shipment = persistence.apply_transition(&result)?;
    info!(
        shipment_id = updated.shipment_id,
        user_id = actor.user_id,
        action = %result.audit_event.action.name,
        status = %updated.status.as_str(),
        "Shipment transition applied"
    );
    Ok(updated)
}

/// Takes a pending shipment. Agent only.
///
/// # Errors
///
/// Returns `Conflict` if the shipment is no longer pending, including when
/// another agent accepted it first.
pub fn accept_shipment(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Agent, "accept shipment")?;
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    let updated: Shipment = persist_transition(
        persistence,
        &shipment,
        Command::AcceptShipment {
            agent_id: actor.user_id,
        },
        actor,
    )?;
    Ok(ShipmentInfo::from(&updated))
}

/// Declines a shipment.
///
/// The assigned agent backs out of an accepted job; the owning partner
/// withdraws a pending offer. Both end in `declined`.
///
/// # Errors
///
/// Returns an error if the caller has no claim on the shipment or its
/// status does not allow the decline.
pub fn decline_shipment(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    let command: Command = match actor.role {
        Role::Agent => {
            AuthorizationService::authorize_participant(actor, &shipment, "decline shipment")?;
            Command::DeclineAssignment {
                agent_id: actor.user_id,
            }
        }
        Role::Partner => {
            AuthorizationService::authorize_participant(actor, &shipment, "withdraw shipment")?;
            Command::WithdrawShipment
        }
        Role::Admin => {
            return Err(AuthError::Unauthorized {
                action: String::from("decline shipment"),
                reason: String::from("only the partner or assigned agent may decline"),
            }
            .into());
        }
    };
    let updated: Shipment = persist_transition(persistence, &shipment, command, actor)?;
    Ok(ShipmentInfo::from(&updated))
}

/// Edits the descriptive fields of a shipment.
///
/// Status and payment fields cannot be changed here.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or admin, nothing
/// was sent, the shipment is closed, or the price is locked by payment.
pub fn update_shipment(
    persistence: &mut Persistence,
    shipment_id: i64,
    request: &UpdateShipmentRequest,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_participant_or_admin(actor, &shipment, "update shipment")?;

    let changes = ShipmentChanges {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        cargo_type: request.cargo_type.clone(),
        weight: request.weight,
        distance: request.distance,
        currency: request.currency.clone(),
        offered_amount: request.offered_amount,
        pickup_date: request.pickup_date.clone(),
    };
    if changes.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from("No fields to update"),
        });
    }

    let update: DetailsUpdate = apply_details(&shipment, changes, actor.to_audit_actor())
        .map_err(translate_core_error)?;
    let updated: Shipment = persistence.update_shipment_details(&update)?;
    info!(shipment_id, user_id = actor.user_id, "Shipment details updated");
    Ok(ShipmentInfo::from(&updated))
}

/// Confirms delivery with the customer code issued at payment. Assigned
/// agent only.
///
/// The code is compared case-insensitively against the stored code and a
/// pending payout is queued for the agent.
///
/// # Errors
///
/// Returns an error if:
/// - The code is malformed (checked before anything is read)
/// - The caller is not the assigned agent
/// - The shipment is not in transit
/// - The code does not match
pub fn confirm_delivery(
    persistence: &mut Persistence,
    shipment_id: i64,
    request: &ConfirmDeliveryRequest,
    actor: &AuthenticatedActor,
) -> Result<ShipmentInfo, ApiError> {
    let submitted_code: CustomerCode = parse_customer_code(&request.customer_code)?;
    AuthorizationService::require_role(actor, Role::Agent, "confirm delivery")?;

    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_participant(actor, &shipment, "confirm delivery")?;

    let payment: Payment = persistence
        .get_partner_payment(shipment_id)?
        .ok_or_else(|| ApiError::Conflict {
            message: format!("Shipment {shipment_id} has not been paid"),
        })?;
    let platform_admin_id: i64 = platform_admin_id(persistence)?;

    let updated: Shipment = persist_transition(
        persistence,
        &shipment,
        Command::ConfirmDelivery {
            agent_id: actor.user_id,
            platform_admin_id,
            submitted_code,
            payment,
        },
        actor,
    )?;
    Ok(ShipmentInfo::from(&updated))
}

/// Returns a shipment's recorded transitions, oldest first.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or admin.
pub fn shipment_history(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<Vec<ShipmentEventInfo>, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_participant_or_admin(actor, &shipment, "view history")?;
    let events = persistence.list_shipment_events(shipment_id)?;
    Ok(events.into_iter().map(ShipmentEventInfo::from).collect())
}

// ============================================================================
// Payments
// ============================================================================

/// Pays for an accepted shipment, moving it in transit.
///
/// # Errors
///
/// Returns an error if:
/// - The customer code is malformed (checked before anything is read)
/// - The caller is neither the owning partner nor an admin
/// - The shipment is not accepted or is already paid
/// - A submitted amount or currency does not match
pub fn create_payment(
    persistence: &mut Persistence,
    request: &CreatePaymentRequest,
    actor: &AuthenticatedActor,
) -> Result<PaymentInfo, ApiError> {
    let customer_code: CustomerCode = match &request.customer_code {
        Some(code) => parse_customer_code(code)?,
        None => CustomerCode::generate(),
    };

    let shipment: Shipment = load_shipment(persistence, request.shipment_id)?;
    AuthorizationService::authorize_payment(actor, &shipment)?;
    let platform_admin_id: i64 = platform_admin_id(persistence)?;

    persist_transition(
        persistence,
        &shipment,
        Command::RecordPayment {
            platform_admin_id,
            amount: request.amount,
            currency: request.currency.clone(),
            customer_code,
        },
        actor,
    )?;

    let payment: Payment = persistence
        .get_partner_payment(request.shipment_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!(
                "Payment for shipment {} missing after it was recorded",
                request.shipment_id
            ),
        })?;
    Ok(PaymentInfo::from(&payment))
}

/// Lists payouts addressed to the calling agent.
///
/// # Errors
///
/// Returns an error if the caller is not an agent.
pub fn list_earnings(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<PayoutInfo>, ApiError> {
    AuthorizationService::require_role(actor, Role::Agent, "view earnings")?;
    let payouts: Vec<Payment> = persistence.list_payouts_for_agent(actor.user_id)?;
    payouts.iter().map(PayoutInfo::try_from).collect()
}

/// Lists payments made by the calling partner.
///
/// # Errors
///
/// Returns an error if the caller is not a partner.
pub fn list_spending(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<PaymentInfo>, ApiError> {
    AuthorizationService::require_role(actor, Role::Partner, "view spending")?;
    let payments: Vec<Payment> = persistence.list_payments_by_partner(actor.user_id)?;
    Ok(payments.iter().map(PaymentInfo::from).collect())
}

/// Lists agent payouts awaiting processing. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_pending_payouts(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<PayoutInfo>, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "view pending payouts")?;
    let payouts: Vec<Payment> = persistence.list_pending_payouts()?;
    payouts.iter().map(PayoutInfo::try_from).collect()
}

/// Marks a pending agent payout as completed. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the payment does not
/// exist, or it is not a pending payout.
pub fn process_payout(
    persistence: &mut Persistence,
    payment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<PayoutInfo, ApiError> {
    AuthorizationService::require_role(actor, Role::Admin, "process payout")?;

    let payment: Payment =
        persistence
            .get_payment(payment_id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Payment"),
                message: format!("Payment {payment_id} does not exist"),
            })?;
    let shipment: Shipment = load_shipment(persistence, payment.shipment_id)?;

    let completion: PayoutCompletion =
        complete_payout(&payment, &shipment, actor.to_audit_actor())
            .map_err(translate_core_error)?;
    let processed: Payment = persistence.complete_payout(&completion)?;
    info!(
        payment_id,
        shipment_id = processed.shipment_id,
        admin_id = actor.user_id,
        "Payout processed"
    );
    PayoutInfo::try_from(&processed)
}

// ============================================================================
// Negotiations
// ============================================================================

/// Proposes a different price for a shipment.
///
/// # Errors
///
/// Returns an error if the caller is not the partner or assigned agent,
/// or the shipment is closed or paid.
pub fn create_negotiation(
    persistence: &mut Persistence,
    request: &CreateNegotiationRequest,
    actor: &AuthenticatedActor,
) -> Result<NegotiationInfo, ApiError> {
    let shipment: Shipment = load_shipment(persistence, request.shipment_id)?;
    AuthorizationService::authorize_participant(actor, &shipment, "propose price")?;

    let proposal: NewNegotiation = propose(
        &shipment,
        actor.user_id,
        request.proposed_amount,
        request.currency.as_deref(),
        request.message.clone(),
    )
    .map_err(translate_core_error)?;
    let negotiation: Negotiation = persistence.create_negotiation(&proposal)?;
    info!(
        negotiation_id = negotiation.negotiation_id,
        shipment_id = negotiation.shipment_id,
        proposed_by = actor.user_id,
        "Price proposed"
    );
    Ok(NegotiationInfo::from(&negotiation))
}

/// Lists a shipment's proposals, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or admin.
pub fn list_negotiations(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<Vec<NegotiationInfo>, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_participant_or_admin(
        actor,
        &shipment,
        "view negotiations",
    )?;
    let negotiations: Vec<Negotiation> = persistence.list_negotiations(shipment_id)?;
    Ok(negotiations.iter().map(NegotiationInfo::from).collect())
}

/// Accepts or rejects a pending proposal.
///
/// Accepting sets the shipment's negotiated amount in the same transaction.
///
/// # Errors
///
/// Returns an error if:
/// - The status is not `accepted` or `rejected`
/// - The caller is not a participant, or made the proposal
/// - The proposal was already answered, or another one is accepted
pub fn respond_to_negotiation(
    persistence: &mut Persistence,
    negotiation_id: i64,
    request: &RespondNegotiationRequest,
    actor: &AuthenticatedActor,
) -> Result<NegotiationInfo, ApiError> {
    let accept: bool = match request.status.as_str() {
        "accepted" => true,
        "rejected" => false,
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("status"),
                message: format!("Expected 'accepted' or 'rejected', got '{other}'"),
            });
        }
    };

    let negotiation: Negotiation = persistence
        .get_negotiation(negotiation_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Negotiation"),
            message: format!("Negotiation {negotiation_id} does not exist"),
        })?;
    let shipment: Shipment = load_shipment(persistence, negotiation.shipment_id)?;
    AuthorizationService::authorize_participant(actor, &shipment, "respond to negotiation")?;

    let has_accepted_sibling: bool = persistence.has_accepted_negotiation(shipment.shipment_id)?;
    let response: NegotiationResponse = respond(
        &shipment,
        &negotiation,
        accept,
        has_accepted_sibling,
        actor.to_audit_actor(),
    )
    .map_err(translate_core_error)?;
    let answered: Negotiation = persistence.respond_to_negotiation(&response)?;
    info!(
        negotiation_id,
        shipment_id = shipment.shipment_id,
        status = %answered.status.as_str(),
        "Negotiation answered"
    );
    Ok(NegotiationInfo::from(&answered))
}

// ============================================================================
// Messages
// ============================================================================

/// Sends a message on a shipment thread.
///
/// # Errors
///
/// Returns an error if:
/// - The text is empty or too long
/// - The sender is not the partner, assigned agent, or an admin
/// - The receiver does not exist, is the sender, or has no part in the shipment
pub fn send_message(
    persistence: &mut Persistence,
    request: &SendMessageRequest,
    actor: &AuthenticatedActor,
) -> Result<MessageInfo, ApiError> {
    validate_message_text(&request.message).map_err(translate_domain_error)?;

    let shipment: Shipment = load_shipment(persistence, request.shipment_id)?;
    AuthorizationService::authorize_participant_or_admin(actor, &shipment, "send message")?;

    if request.receiver_id == actor.user_id {
        return Err(ApiError::InvalidInput {
            field: String::from("receiverId"),
            message: String::from("You cannot message yourself"),
        });
    }
    let receiver: UserData = persistence
        .get_user_by_id(request.receiver_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {} does not exist", request.receiver_id),
        })?;
    if receiver.user.role != Role::Admin && !shipment.is_participant(receiver.user.user_id) {
        return Err(ApiError::InvalidInput {
            field: String::from("receiverId"),
            message: format!(
                "User {} is not part of shipment {}",
                receiver.user.user_id, shipment.shipment_id
            ),
        });
    }

    let message = persistence.create_message(
        shipment.shipment_id,
        actor.user_id,
        receiver.user.user_id,
        &request.message,
    )?;
    debug!(
        message_id = message.message_id,
        shipment_id = message.shipment_id,
        "Message sent"
    );
    Ok(MessageInfo::from(&message))
}

/// Returns a shipment's thread in conversation order, marking the caller's
/// unread messages as read first.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or admin.
pub fn list_messages(
    persistence: &mut Persistence,
    shipment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<Vec<MessageInfo>, ApiError> {
    let shipment: Shipment = load_shipment(persistence, shipment_id)?;
    AuthorizationService::authorize_participant_or_admin(actor, &shipment, "read messages")?;
    let thread = persistence.read_thread(shipment_id, actor.user_id)?;
    Ok(thread.iter().map(MessageInfo::from).collect())
}

// ============================================================================
// Health
// ============================================================================

/// Liveness probe.
#[must_use]
pub fn health() -> HealthResponse {
    HealthResponse {
        status: String::from("ok"),
    }
}
