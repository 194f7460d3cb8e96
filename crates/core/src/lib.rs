// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod apply;
mod command;
mod error;
mod negotiation;
mod payout;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, apply_details, prepare_shipment, validate_details};
pub use command::Command;
pub use error::CoreError;
pub use negotiation::{propose, respond};
pub use payout::complete_payout;
pub use state::{
    DetailsUpdate, LedgerEntry, LifecycleState, NegotiationResponse, NewNegotiation,
    NewShipment, PayoutCompletion, PriceUpdate, ShipmentChanges, ShipmentDetails,
    TransitionResult,
};
