// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::shipment_status::ShipmentType;
use rust_decimal::Decimal;
use time::Date;
use time::macros::format_description;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 50;
/// Minimum length of a username.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum length of a full name.
pub const MAX_FULL_NAME_LENGTH: usize = 100;
/// Maximum length of a location or cargo description.
pub const MAX_SHIPMENT_FIELD_LENGTH: usize = 200;
/// Maximum length of shipment notes.
pub const MAX_NOTES_LENGTH: usize = 1000;
/// Maximum length of a thread message or negotiation note.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Validates a username chosen at registration.
///
/// # Errors
///
/// Returns an error if:
/// - The username is shorter than 3 or longer than 50 characters
/// - The username contains anything but letters, digits, `_`, `-` and `.`
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let length: usize = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(DomainError::InvalidUsername(format!(
            "must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(DomainError::InvalidUsername(String::from(
            "may only contain letters, digits, '_', '-' and '.'",
        )));
    }

    Ok(())
}

/// Validates a display name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than 100 characters.
pub fn validate_full_name(full_name: &str) -> Result<(), DomainError> {
    if full_name.trim().is_empty() {
        return Err(DomainError::InvalidFullName(String::from(
            "Full name cannot be empty",
        )));
    }

    if full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(DomainError::InvalidFullName(format!(
            "Full name cannot exceed {MAX_FULL_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Normalizes a currency code to upper case.
///
/// # Errors
///
/// Returns `DomainError::InvalidCurrency` unless the input is three ASCII letters.
pub fn normalize_currency(currency: &str) -> Result<String, DomainError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidCurrency(format!(
            "'{currency}' is not a three letter currency code"
        )));
    }
    Ok(currency.to_ascii_uppercase())
}

/// Validates that a monetary amount or measurement is strictly positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` for zero or negative values.
pub fn validate_positive(field: &'static str, value: Decimal) -> Result<(), DomainError> {
    if value <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount {
            field,
            reason: format!("must be greater than zero, got {value}"),
        });
    }
    Ok(())
}

/// Largest accepted monetary amount, in whole currency units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;
/// Most decimal places accepted on a monetary amount.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Validates a monetary amount: positive, at most `MAX_AMOUNT`, and with at
/// most `MAX_AMOUNT_SCALE` decimal places.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` if any bound is violated.
pub fn validate_amount(field: &'static str, value: Decimal) -> Result<(), DomainError> {
    validate_positive(field, value)?;
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(DomainError::InvalidAmount {
            field,
            reason: format!("cannot exceed {MAX_AMOUNT}, got {value}"),
        });
    }
    if value.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(DomainError::InvalidAmount {
            field,
            reason: format!("cannot have more than {MAX_AMOUNT_SCALE} decimal places, got {value}"),
        });
    }
    Ok(())
}

/// Validates a required free-text shipment field such as origin or cargo type.
///
/// # Errors
///
/// Returns `DomainError::InvalidShipmentField` if the text is blank or too long.
pub fn validate_shipment_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidShipmentField {
            field,
            reason: String::from("cannot be empty"),
        });
    }

    if value.chars().count() > MAX_SHIPMENT_FIELD_LENGTH {
        return Err(DomainError::InvalidShipmentField {
            field,
            reason: format!("cannot exceed {MAX_SHIPMENT_FIELD_LENGTH} characters"),
        });
    }

    Ok(())
}

/// Validates the destination against the shipment type.
///
/// # Errors
///
/// Returns `DomainError::MissingDestination` when a delivery has no destination,
/// or a field error when a given destination is blank or too long.
pub fn validate_destination(
    shipment_type: ShipmentType,
    destination: Option<&str>,
) -> Result<(), DomainError> {
    match destination {
        Some(value) => validate_shipment_text("destination", value),
        None if shipment_type.requires_destination() => Err(DomainError::MissingDestination),
        None => Ok(()),
    }
}

/// Validates optional shipment notes.
///
/// # Errors
///
/// Returns `DomainError::InvalidShipmentField` if the notes are too long.
pub fn validate_notes(notes: &str) -> Result<(), DomainError> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(DomainError::InvalidShipmentField {
            field: "notes",
            reason: format!("cannot exceed {MAX_NOTES_LENGTH} characters"),
        });
    }
    Ok(())
}

/// Parses a pickup date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid calendar date.
pub fn parse_pickup_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(date_string, format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: date_string.to_string(),
            error: e.to_string(),
        }
    })
}

/// Validates message text for threads and negotiation notes.
///
/// # Errors
///
/// Returns `DomainError::InvalidMessage` if the text is blank or too long.
pub fn validate_message_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::InvalidMessage(String::from(
            "Message cannot be empty",
        )));
    }

    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DomainError::InvalidMessage(format!(
            "Message cannot exceed {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    Ok(())
}
