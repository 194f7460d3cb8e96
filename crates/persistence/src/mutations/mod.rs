// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Accounts, approval, seeding and sessions
//! - `shipments`: Shipment creation, lifecycle transitions and edits
//! - `negotiations`: Proposals and their answers
//! - `payments`: Payout processing
//! - `messages`: Message threads and read tracking
//! - `events`: Shipment history

pub mod events;
pub mod messages;
pub mod negotiations;
pub mod payments;
pub mod shipments;
pub mod users;
