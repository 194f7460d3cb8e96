// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{
    DetailsUpdate, LedgerEntry, LifecycleState, NewShipment, ShipmentChanges, ShipmentDetails,
    TransitionResult,
};
use cargolink_audit::{Action, Actor, AuditEvent, StateSnapshot};
use cargolink_domain::{
    Decimal, DomainError, PaymentStatus, PaymentType, Shipment, ShipmentStatus, ShipmentType,
    normalize_currency, parse_pickup_date, validate_destination, validate_notes,
    validate_amount, validate_positive, validate_shipment_text,
};

/// Applies a lifecycle command to a shipment, producing the conditional
/// update to persist and its audit event.
///
/// # Arguments
///
/// * `shipment` - The shipment as last read (immutable)
/// * `command` - The command to apply
/// * `actor` - The user performing this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` describing the expected and new lifecycle state
/// * `Err(CoreError)` if the command is invalid for the shipment's state
///
/// # Errors
///
/// Returns an error if:
/// - The status transition is not permitted by the lifecycle rules
/// - A payment does not match the payable amount or currency
/// - The delivery code does not match the code issued at payment
#[allow(clippy::too_many_lines)]
pub fn apply(
    shipment: &Shipment,
    command: Command,
    actor: Actor,
) -> Result<TransitionResult, CoreError> {
    let expected: LifecycleState = LifecycleState::of(shipment);
    let action_name: &'static str = command.action_name();

    let (new_state, proof_of_delivery, ledger_entry, details) = match command {
        Command::AcceptShipment { agent_id } => {
            shipment
                .status
                .validate_transition(ShipmentStatus::AgentAccepted)?;
            let new_state = LifecycleState {
                status: ShipmentStatus::AgentAccepted,
                payment_status: shipment.payment_status,
                agent_id: Some(agent_id),
            };
            (new_state, None, None, None)
        }
        Command::DeclineAssignment { agent_id } => {
            if shipment.status != ShipmentStatus::AgentAccepted {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition {
                        from: shipment.status.as_str().to_string(),
                        to: ShipmentStatus::Declined.as_str().to_string(),
                        reason: "only an accepted, unpaid job can be declined".to_string(),
                    },
                ));
            }
            if !shipment.is_assigned_to(agent_id) {
                return Err(CoreError::InconsistentInput(format!(
                    "agent {agent_id} is not assigned to shipment {}",
                    shipment.shipment_id
                )));
            }
            let new_state = LifecycleState {
                status: ShipmentStatus::Declined,
                payment_status: shipment.payment_status,
                agent_id: None,
            };
            (new_state, None, None, None)
        }
        Command::WithdrawShipment => {
            if shipment.status != ShipmentStatus::Pending {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition {
                        from: shipment.status.as_str().to_string(),
                        to: ShipmentStatus::Declined.as_str().to_string(),
                        reason: "only a pending offer can be withdrawn".to_string(),
                    },
                ));
            }
            let new_state = LifecycleState {
                status: ShipmentStatus::Declined,
                payment_status: shipment.payment_status,
                agent_id: None,
            };
            (new_state, None, None, None)
        }
        Command::RecordPayment {
            platform_admin_id,
            amount,
            currency,
            customer_code,
        } => {
            shipment
                .status
                .validate_transition(ShipmentStatus::InTransit)?;
            if shipment.payment_status != PaymentStatus::Pending {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition {
                        from: shipment.payment_status.as_str().to_string(),
                        to: PaymentStatus::Paid.as_str().to_string(),
                        reason: "shipment has already been paid".to_string(),
                    },
                ));
            }

            let payable: Decimal = shipment.payable_amount();
            if let Some(amount) = amount {
                validate_amount("amount", amount)?;
            }
            if let Some(amount) = amount
                && amount != payable
            {
                return Err(CoreError::DomainViolation(DomainError::AmountMismatch {
                    expected: payable,
                    actual: amount,
                }));
            }
            if let Some(currency) = currency {
                let currency: String = normalize_currency(&currency)?;
                if currency != shipment.currency {
                    return Err(CoreError::DomainViolation(DomainError::CurrencyMismatch {
                        expected: shipment.currency.clone(),
                        actual: currency,
                    }));
                }
            }

            let new_state = LifecycleState {
                status: ShipmentStatus::InTransit,
                payment_status: PaymentStatus::Paid,
                agent_id: shipment.agent_id,
            };
            let ledger_entry = LedgerEntry {
                shipment_id: shipment.shipment_id,
                from_user_id: shipment.partner_id,
                to_user_id: platform_admin_id,
                amount: payable,
                currency: shipment.currency.clone(),
                payment_type: PaymentType::PartnerToAdmin,
                status: PaymentStatus::Paid,
                customer_code: Some(customer_code),
            };
            let details: String = format!("Paid {payable} {}", shipment.currency);
            (new_state, None, Some(ledger_entry), Some(details))
        }
        Command::ConfirmDelivery {
            agent_id,
            platform_admin_id,
            submitted_code,
            payment,
        } => {
            shipment
                .status
                .validate_transition(ShipmentStatus::Delivered)?;
            if !shipment.is_assigned_to(agent_id) {
                return Err(CoreError::InconsistentInput(format!(
                    "agent {agent_id} is not assigned to shipment {}",
                    shipment.shipment_id
                )));
            }
            if payment.shipment_id != shipment.shipment_id
                || payment.payment_type != PaymentType::PartnerToAdmin
            {
                return Err(CoreError::InconsistentInput(format!(
                    "payment {} is not the partner payment for shipment {}",
                    payment.payment_id, shipment.shipment_id
                )));
            }
            let issued_code = payment.customer_code.as_ref().ok_or_else(|| {
                CoreError::InconsistentInput(format!(
                    "payment {} carries no customer code",
                    payment.payment_id
                ))
            })?;
            issued_code.verify(&submitted_code)?;

            let new_state = LifecycleState {
                status: ShipmentStatus::Delivered,
                payment_status: shipment.payment_status,
                agent_id: shipment.agent_id,
            };
            let proof: String = format!(
                "Delivered and verified with code: {}",
                submitted_code.value()
            );
            let ledger_entry = LedgerEntry {
                shipment_id: shipment.shipment_id,
                from_user_id: platform_admin_id,
                to_user_id: agent_id,
                amount: payment.amount,
                currency: payment.currency.clone(),
                payment_type: PaymentType::AdminToAgent,
                status: PaymentStatus::Pending,
                customer_code: None,
            };
            (new_state, Some(proof), Some(ledger_entry), None)
        }
    };

    let mut after: Shipment = shipment.clone();
    after.status = new_state.status;
    after.payment_status = new_state.payment_status;
    after.agent_id = new_state.agent_id;

    let audit_event: AuditEvent = AuditEvent::new(
        shipment.shipment_id,
        actor,
        Action::new(action_name.to_string(), details),
        StateSnapshot::of(shipment),
        StateSnapshot::of(&after),
    );

    Ok(TransitionResult {
        shipment_id: shipment.shipment_id,
        expected,
        new_state,
        proof_of_delivery,
        ledger_entry,
        audit_event,
    })
}

/// Validates and normalizes the descriptive fields of a shipment.
///
/// # Errors
///
/// Returns an error if any field is blank, non-positive, unparseable or
/// inconsistent with the shipment type.
pub fn validate_details(
    shipment_type: ShipmentType,
    details: ShipmentDetails,
) -> Result<ShipmentDetails, CoreError> {
    validate_shipment_text("origin", &details.origin)?;
    validate_destination(shipment_type, details.destination.as_deref())?;
    validate_shipment_text("cargoType", &details.cargo_type)?;
    validate_positive("weight", details.weight)?;
    if let Some(distance) = details.distance {
        validate_positive("distance", distance)?;
    }
    validate_amount("offeredAmount", details.offered_amount)?;
    let currency: String = normalize_currency(&details.currency)?;
    if let Some(pickup_date) = &details.pickup_date {
        parse_pickup_date(pickup_date)?;
    }

    Ok(ShipmentDetails {
        currency,
        ..details
    })
}

/// Validates a shipment a partner is about to create.
///
/// # Errors
///
/// Returns an error if the details or notes are invalid.
pub fn prepare_shipment(
    partner_id: i64,
    shipment_type: ShipmentType,
    details: ShipmentDetails,
    notes: Option<String>,
) -> Result<NewShipment, CoreError> {
    let details: ShipmentDetails = validate_details(shipment_type, details)?;
    if let Some(notes) = &notes {
        validate_notes(notes)?;
    }

    Ok(NewShipment {
        partner_id,
        shipment_type,
        details,
        notes,
    })
}

/// Applies a partial edit to the descriptive fields of a shipment.
///
/// # Errors
///
/// Returns an error if:
/// - The shipment is delivered or declined
/// - The price or currency changes after payment
/// - The merged fields fail validation
pub fn apply_details(
    shipment: &Shipment,
    changes: ShipmentChanges,
    actor: Actor,
) -> Result<DetailsUpdate, CoreError> {
    if shipment.status.is_terminal() {
        return Err(CoreError::DomainViolation(DomainError::ShipmentClosed {
            shipment_id: shipment.shipment_id,
            status: shipment.status.as_str().to_string(),
        }));
    }

    let current: ShipmentDetails = ShipmentDetails::of(shipment);
    let reprices: bool = changes
        .offered_amount
        .is_some_and(|amount| amount != current.offered_amount)
        || changes
            .currency
            .as_deref()
            .is_some_and(|currency| !currency.eq_ignore_ascii_case(&current.currency));
    if reprices && shipment.payment_status != PaymentStatus::Pending {
        return Err(CoreError::DomainViolation(DomainError::PriceLocked {
            shipment_id: shipment.shipment_id,
        }));
    }

    let changed_fields: Vec<&str> = [
        ("origin", changes.origin.is_some()),
        ("destination", changes.destination.is_some()),
        ("cargoType", changes.cargo_type.is_some()),
        ("weight", changes.weight.is_some()),
        ("distance", changes.distance.is_some()),
        ("currency", changes.currency.is_some()),
        ("offeredAmount", changes.offered_amount.is_some()),
        ("pickupDate", changes.pickup_date.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, changed)| changed.then_some(name))
    .collect();

    let merged = ShipmentDetails {
        origin: changes.origin.unwrap_or(current.origin),
        destination: changes.destination.or(current.destination),
        cargo_type: changes.cargo_type.unwrap_or(current.cargo_type),
        weight: changes.weight.unwrap_or(current.weight),
        distance: changes.distance.or(current.distance),
        currency: changes.currency.unwrap_or(current.currency),
        offered_amount: changes.offered_amount.unwrap_or(current.offered_amount),
        pickup_date: changes.pickup_date.or(current.pickup_date),
    };
    let details: ShipmentDetails = validate_details(shipment.shipment_type, merged)?;

    let snapshot: StateSnapshot = StateSnapshot::of(shipment);
    let audit_event: AuditEvent = AuditEvent::new(
        shipment.shipment_id,
        actor,
        Action::new(
            String::from("UpdateDetails"),
            Some(format!("Changed {}", changed_fields.join(", "))),
        ),
        snapshot.clone(),
        snapshot,
    );

    Ok(DetailsUpdate {
        shipment_id: shipment.shipment_id,
        expected: LifecycleState::of(shipment),
        details,
        audit_event,
    })
}
