// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The customer code shared between partner and agent.
//!
//! The partner receives the code when paying and hands it to the recipient.
//! The agent must reproduce it to confirm delivery.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Exact length of every customer code.
pub const CUSTOMER_CODE_LENGTH: usize = 8;

/// Characters used for generated codes. Excludes 0/O and 1/I.
const GENERATED_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// An eight character alphanumeric code, stored upper-cased.
///
/// Two codes are equal regardless of the case they were entered in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerCode(String);

impl CustomerCode {
    /// Parses a code entered by a user.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCustomerCode` if the input is not exactly
    /// eight ASCII letters or digits. Surrounding whitespace is not stripped.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let length: usize = input.chars().count();
        if length != CUSTOMER_CODE_LENGTH {
            return Err(DomainError::InvalidCustomerCode(format!(
                "must be exactly {CUSTOMER_CODE_LENGTH} characters, got {length}"
            )));
        }

        if !input.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidCustomerCode(String::from(
                "only letters and digits are allowed",
            )));
        }

        Ok(Self(input.to_ascii_uppercase()))
    }

    /// Generates a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        let mut bits: u64 = rand::random::<u64>();
        let mut code: String = String::with_capacity(CUSTOMER_CODE_LENGTH);
        for _ in 0..CUSTOMER_CODE_LENGTH {
            let index: usize = usize::try_from(bits % 32).unwrap_or_default();
            code.push(char::from(GENERATED_ALPHABET[index]));
            bits >>= 5;
        }
        Self(code)
    }

    /// Returns the upper-cased code.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Compares a submitted code against this one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CustomerCodeMismatch` if the codes differ.
    pub fn verify(&self, submitted: &Self) -> Result<(), DomainError> {
        if self.0.eq_ignore_ascii_case(&submitted.0) {
            Ok(())
        } else {
            Err(DomainError::CustomerCodeMismatch)
        }
    }
}

impl TryFrom<String> for CustomerCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerCode> for String {
    fn from(code: CustomerCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for CustomerCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        let code: CustomerCode = CustomerCode::parse("abcd1234").unwrap();
        assert_eq!(code.value(), "ABCD1234");
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let stored: CustomerCode = CustomerCode::parse("ABCD1234").unwrap();
        let submitted: CustomerCode = CustomerCode::parse("aBcD1234").unwrap();
        assert!(stored.verify(&submitted).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_codes() {
        let stored: CustomerCode = CustomerCode::parse("ABCD1234").unwrap();
        let submitted: CustomerCode = CustomerCode::parse("ABCD1235").unwrap();
        assert_eq!(
            stored.verify(&submitted),
            Err(DomainError::CustomerCodeMismatch)
        );
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        for input in ["", "ABCD123", "ABCD12345", " ABCD1234", "ABCD1234 "] {
            assert!(
                matches!(
                    CustomerCode::parse(input),
                    Err(DomainError::InvalidCustomerCode(_))
                ),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_symbols() {
        assert!(CustomerCode::parse("ABCD-234").is_err());
        assert!(CustomerCode::parse("ÄBCD1234").is_err());
    }

    #[test]
    fn test_generated_codes_are_valid() {
        for _ in 0..64 {
            let code: CustomerCode = CustomerCode::generate();
            assert_eq!(code.value().len(), CUSTOMER_CODE_LENGTH);
            assert_eq!(CustomerCode::parse(code.value()).unwrap(), code);
        }
    }
}
