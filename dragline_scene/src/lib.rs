// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragline Scene: a headless element tree standing in for a host document.
//!
//! The drag/drop engine in `dragline_dragdrop` never talks to a real browser or
//! widget toolkit. Instead it reads and mutates a [`Scene`]: a small document
//! model that answers the questions a pointer-driven interaction needs.
//!
//! - Structure: a body root, parent/child links, detachable subtrees, deep clones
//!   and shadow roots (a second, encapsulated child list per host).
//! - Geometry: each element has local bounds relative to its parent's content
//!   origin; [`Scene::page_rect`] and [`Scene::client_rect`] resolve document and
//!   viewport coordinates, taking absolute positioning, translation, margins and
//!   scroll containers into account.
//! - Inline [`Style`]: position mode, left/top, translate, margins, transition and
//!   free-form properties.
//! - Scrolling: per-element scroll containers and a window scroll offset, both
//!   clamped to their scrollable extent.
//! - Point queries: [`Scene::elements_from_point`] and
//!   [`Scene::shadow_elements_from_point`] return topmost-first stacks.
//! - Pointer capture: capture follows one element per pointer id; losing it is
//!   recorded as a [`LostCapture`] for the host to forward.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything. Hosts compute layout
//! elsewhere and write the resulting local bounds into the scene.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use dragline_scene::Scene;
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let body = scene.body();
//! let card = scene.create_element("div");
//! scene.set_bounds(card, Rect::new(100.0, 100.0, 200.0, 150.0)).unwrap();
//! scene.append_child(body, card).unwrap();
//!
//! let hits = scene.elements_from_point(Point::new(120.0, 120.0));
//! assert_eq!(hits.first(), Some(&card));
//! assert_eq!(hits.last(), Some(&body));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod query;
mod scene;
mod types;

pub use error::SceneError;
pub use scene::{LostCapture, Scene};
pub use types::{ElementFlags, ElementId, Position, ScrollState, Style, Transition};
