// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Users, sessions and password verification
//! - `shipments`: Shipments, listings and shipment history
//! - `negotiations`: Price proposals
//! - `payments`: Partner payments and agent payouts
//! - `messages`: Per-shipment message threads

pub mod messages;
pub mod negotiations;
pub mod payments;
pub mod shipments;
pub mod users;
