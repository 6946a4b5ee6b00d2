// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragline Drag and Drop: a pointer-driven drag and drop engine over a [`Scene`].
//!
//! The engine is split along the seams of a drag gesture:
//!
//! - [`drag`]: [`DragDirective`] turns input on a source element into a drag,
//!   with tolerance, axis constraints, ghosts, auto-scroll and programmatic
//!   transitions. [`DragBehavior`] specializes it.
//! - [`drop`]: [`DropDirective`] reacts to drags over a zone and performs a
//!   [`DropStrategy`] on drop.
//! - [`registry`]: [`DropRegistry`] carries signals from drags to zones by element,
//!   so the two sides never reference each other.
//! - [`resolve`]: finds the drop zone under the pointer, looking through shadow roots.
//! - [`ghost`]: creates, positions and removes the ghost element.
//! - [`autoscroll`]: scrolls the window or a container while the pointer is near an edge.
//! - [`column`]: column reordering built from the pieces above.
//! - [`notify`] and [`events`]: listener lists and their payloads.
//!
//! Everything runs on the caller's thread. The host forwards input events,
//! animation frame timestamps and transition ends; nothing blocks or spawns.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect, Size};
//! use dragline_scene::Scene;
//! use dragline_event_state::pointer::{InputEvent, InputModality, InputPhase};
//! use dragline_dragdrop::{AppendDropStrategy, DragConfig, DragDirective, DropConfig, DropRegistry};
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let body = scene.body();
//! let chip = scene.create_element("chip");
//! scene.set_bounds(chip, Rect::new(10.0, 10.0, 60.0, 40.0)).unwrap();
//! scene.append_child(body, chip).unwrap();
//! let area = scene.create_element("area");
//! scene.set_bounds(area, Rect::new(300.0, 0.0, 600.0, 300.0)).unwrap();
//! scene.append_child(body, area).unwrap();
//!
//! let mut zones = DropRegistry::<()>::new();
//! let zone = zones.attach(&mut scene, area, DropConfig::default());
//! zones.zone_mut(zone).unwrap().set_strategy(AppendDropStrategy);
//! let dropped = Rc::new(Cell::new(false));
//! let flag = dropped.clone();
//! zones.zone_mut(zone).unwrap().events.dropped.subscribe(move |_| flag.set(true));
//!
//! let mut drag = DragDirective::attach(&mut scene, chip, DragConfig::default(), InputModality::Pointer);
//! let mut frame = 0;
//! for (phase, x, y) in [
//!     (InputPhase::Down, 20.0, 20.0),
//!     (InputPhase::Move, 40.0, 20.0),
//!     (InputPhase::Move, 400.0, 100.0),
//!     (InputPhase::Up, 400.0, 100.0),
//! ] {
//!     frame += 16;
//!     drag.on_animation_frame(&mut scene, frame);
//!     let mut event = InputEvent::pointer(phase, chip, Point::new(x, y), 1);
//!     drag.handle_input(&mut scene, &mut zones, &mut event);
//! }
//!
//! assert!(dropped.get());
//! assert_eq!(scene.parent(chip), Some(area));
//! assert!(drag.ghost_element().is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod autoscroll;
pub mod column;
pub mod drag;
pub mod drop;
pub mod events;
pub mod ghost;
pub mod notify;
pub mod registry;
pub mod resolve;

pub use autoscroll::{AutoScrollDriver, ScrollTarget};
pub use column::{ColumnDropStrategy, ColumnInfo, ColumnMoveBehavior, DragCoordinator};
pub use drag::{
    DefaultDragBehavior, DragBehavior, DragConfig, DragDirective, DragEvents, DragLocation,
    DragTarget, MoveVerdict, TransitionArgs,
};
pub use drop::{
    AppendDropStrategy, DefaultDropStrategy, DropConfig, DropDirective, DropStrategy,
    InsertDropStrategy, PrependDropStrategy,
};
pub use events::{
    DragBaseArgs, DragMoveArgs, DragNotice, DragSignal, DragStartArgs, DropEventArgs,
    DroppedArgs, GhostArgs,
};
pub use ghost::{GhostConfig, GhostManager};
pub use registry::{DropRegistry, DropZoneId};
pub use resolve::DropTargetResolver;

pub use dragline_scene::Scene;
