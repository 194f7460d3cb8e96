// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Price proposals and their answers.

use crate::error::CoreError;
use crate::state::{NegotiationResponse, NewNegotiation, PriceUpdate};
use cargolink_audit::{Action, Actor, AuditEvent, StateSnapshot};
use cargolink_domain::{
    Decimal, DomainError, Negotiation, NegotiationStatus, PaymentStatus, Shipment,
    normalize_currency, validate_amount, validate_message_text,
};

/// Checks that the shipment's price is still open to change.
fn ensure_price_open(shipment: &Shipment) -> Result<(), DomainError> {
    if shipment.status.is_terminal() {
        return Err(DomainError::ShipmentClosed {
            shipment_id: shipment.shipment_id,
            status: shipment.status.as_str().to_string(),
        });
    }
    if shipment.payment_status != PaymentStatus::Pending {
        return Err(DomainError::PriceLocked {
            shipment_id: shipment.shipment_id,
        });
    }
    Ok(())
}

/// Validates a new price proposal.
///
/// The currency defaults to the shipment's currency and must match it.
///
/// # Errors
///
/// Returns an error if the shipment is closed or already paid, the amount
/// is not positive, or the currency or message is malformed.
pub fn propose(
    shipment: &Shipment,
    proposed_by: i64,
    proposed_amount: Decimal,
    currency: Option<&str>,
    message: Option<String>,
) -> Result<NewNegotiation, CoreError> {
    ensure_price_open(shipment)?;
    validate_amount("proposedAmount", proposed_amount)?;
    let currency: String = match currency {
        Some(currency) => normalize_currency(currency)?,
        None => shipment.currency.clone(),
    };
    if currency != shipment.currency {
        return Err(CoreError::DomainViolation(DomainError::CurrencyMismatch {
            expected: shipment.currency.clone(),
            actual: currency,
        }));
    }
    if let Some(message) = &message {
        validate_message_text(message)?;
    }

    Ok(NewNegotiation {
        shipment_id: shipment.shipment_id,
        proposed_by,
        proposed_amount,
        currency,
        message,
    })
}

/// Answers a pending proposal.
///
/// Accepting produces a `PriceUpdate` that sets the shipment's negotiated
/// amount. Sibling proposals are left untouched, but a second acceptance
/// on the same shipment is refused.
///
/// # Arguments
///
/// * `shipment` - The shipment the proposal is for
/// * `negotiation` - The proposal being answered
/// * `accept` - `true` to accept, `false` to reject
/// * `has_accepted_sibling` - Whether another proposal on the shipment is accepted
/// * `actor` - The user answering
///
/// # Errors
///
/// Returns an error if:
/// - The responder made the proposal
/// - The proposal has already been answered
/// - Accepting while another proposal is accepted or after payment
pub fn respond(
    shipment: &Shipment,
    negotiation: &Negotiation,
    accept: bool,
    has_accepted_sibling: bool,
    actor: Actor,
) -> Result<NegotiationResponse, CoreError> {
    if negotiation.shipment_id != shipment.shipment_id {
        return Err(CoreError::InconsistentInput(format!(
            "negotiation {} does not belong to shipment {}",
            negotiation.negotiation_id, shipment.shipment_id
        )));
    }
    if negotiation.proposed_by == actor.user_id {
        return Err(CoreError::DomainViolation(DomainError::SelfResponse));
    }

    let new_status: NegotiationStatus = if accept {
        NegotiationStatus::Accepted
    } else {
        NegotiationStatus::Rejected
    };
    negotiation.status.validate_transition(new_status)?;

    if !accept {
        return Ok(NegotiationResponse {
            negotiation_id: negotiation.negotiation_id,
            new_status,
            price_update: None,
        });
    }

    ensure_price_open(shipment)?;
    if has_accepted_sibling {
        return Err(CoreError::DomainViolation(
            DomainError::NegotiationAlreadyAccepted {
                shipment_id: shipment.shipment_id,
            },
        ));
    }

    let snapshot: StateSnapshot = StateSnapshot::of(shipment);
    let audit_event: AuditEvent = AuditEvent::new(
        shipment.shipment_id,
        actor,
        Action::new(
            String::from("ApplyNegotiatedPrice"),
            Some(format!(
                "Negotiation {} set the price to {} {}",
                negotiation.negotiation_id, negotiation.proposed_amount, negotiation.currency
            )),
        ),
        snapshot.clone(),
        snapshot,
    );

    Ok(NegotiationResponse {
        negotiation_id: negotiation.negotiation_id,
        new_status,
        price_update: Some(PriceUpdate {
            shipment_id: shipment.shipment_id,
            negotiated_amount: negotiation.proposed_amount,
            expected_payment_status: shipment.payment_status,
            audit_event,
        }),
    })
}
