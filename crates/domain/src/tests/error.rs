// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Decimal, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidRole(String::from("courier"));
    assert_eq!(format!("{err}"), "Invalid role: courier");

    let err: DomainError = DomainError::InvalidStatusTransition {
        from: String::from("delivered"),
        to: String::from("pending"),
        reason: String::from("cannot transition from terminal state"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot transition from 'delivered' to 'pending': cannot transition from terminal state"
    );

    let err: DomainError = DomainError::CustomerCodeMismatch;
    assert_eq!(
        format!("{err}"),
        "Customer code does not match the code issued at payment"
    );

    let err: DomainError = DomainError::AmountMismatch {
        expected: Decimal::new(1000, 0),
        actual: Decimal::new(900, 0),
    };
    assert_eq!(
        format!("{err}"),
        "Payment amount 900 does not match the payable amount 1000"
    );

    let err: DomainError = DomainError::InvalidAmount {
        field: "weight",
        reason: String::from("must be greater than zero, got 0"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid weight: must be greater than zero, got 0"
    );

    let err: DomainError = DomainError::SplitOverflow {
        amount: String::from("1000000000000000000000000000"),
    };
    assert_eq!(
        format!("{err}"),
        "Amount 1000000000000000000000000000 cannot be split into agent share and fee"
    );

    let err: DomainError = DomainError::PriceLocked { shipment_id: 7 };
    assert_eq!(
        format!("{err}"),
        "Shipment 7 has already been paid; its price can no longer change"
    );

    let err: DomainError = DomainError::ShipmentClosed {
        shipment_id: 3,
        status: String::from("delivered"),
    };
    assert_eq!(
        format!("{err}"),
        "Shipment 3 is delivered and can no longer change"
    );
}
