// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragline Event State: small state machines for pointer-driven drag interactions.
//!
//! Each module handles one piece of a drag gesture and knows nothing about
//! elements, rendering or event routing:
//!
//! - [`pointer`]: unify pointer, touch and mouse input into one page-space stream
//! - [`drag`]: the session lifecycle ([`drag::DragSession`]) with movement
//!   deltas, tolerance and axis constraints
//! - [`channel`]: decide whether a drag source and a drop zone are linked
//! - [`scroll`]: detect when the pointer sits near a scrollable edge and compute
//!   capped scroll steps on a fixed cadence
//!
//! The engine in `dragline_dragdrop` composes these with a scene; applications
//! can also use them directly with their own node types.
//!
//! ## Drag session
//!
//! ```rust
//! use kurbo::Point;
//! use dragline_event_state::drag::{DragPhase, DragSession};
//!
//! let mut session = DragSession::<u32>::default();
//! session.arm(7, Some(1), Point::new(100.0, 100.0));
//! assert_eq!(session.phase(), DragPhase::Armed);
//!
//! // Still within the default tolerance of 5 pixels.
//! assert!(!session.exceeds_tolerance(Point::new(103.0, 101.0), 5.0));
//! assert!(session.exceeds_tolerance(Point::new(108.0, 101.0), 5.0));
//! ```
//!
//! ## Channels
//!
//! ```rust
//! use dragline_event_state::channel::{is_linked, Channel};
//!
//! let odd = Channel::from("odd");
//! let zone = Channel::from(["odd", "irrational"]);
//! assert!(is_linked(&odd, &zone));
//! assert!(!is_linked(&Channel::from("even"), &zone));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod channel;
pub mod drag;
pub mod pointer;
pub mod scroll;
