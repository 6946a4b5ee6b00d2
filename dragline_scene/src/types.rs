// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: element handles, flags, inline style and scroll state.

use alloc::string::String;
use hashbrown::HashMap;
use kurbo::{Insets, Size, Vec2};

/// Identifier for an element in a [`Scene`](crate::Scene).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; every `ElementId` pointing at it becomes stale.
/// - On reuse of a freed slot, its generation is incremented, so stale handles
///   never alias a different live element.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility and point queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered.
        const VISIBLE  = 0b0000_0001;
        /// Element participates in point queries (`pointer-events`).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// How an element is placed relative to its surroundings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Placed at its local bounds inside the parent content box.
    #[default]
    Static,
    /// Like [`Position::Static`], shifted by `left`/`top`. Establishes a containing block.
    Relative,
    /// Placed at `left`/`top` (plus margins) inside the nearest positioned ancestor,
    /// or the body when there is none. Establishes a containing block.
    Absolute,
}

/// Inline transition settings.
///
/// Durations and delays are expressed in seconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    /// Transitioned properties, e.g. `"left, top"` or `"transform"`. Empty means none.
    pub property: String,
    /// Transition duration in seconds.
    pub duration: f64,
    /// Timing function name; empty uses the host default.
    pub timing_function: String,
    /// Delay in seconds.
    pub delay: f64,
}

impl Transition {
    /// Returns `true` if a change to the tracked properties would animate.
    pub fn is_animated(&self) -> bool {
        !self.property.is_empty() && self.duration + self.delay > 0.0
    }
}

/// Inline style of an element.
#[derive(Clone, Debug, Default)]
pub struct Style {
    /// Positioning mode.
    pub position: Position,
    /// Horizontal offset for relative/absolute positioning.
    pub left: f64,
    /// Vertical offset for relative/absolute positioning.
    pub top: f64,
    /// 2D translation applied on top of the resolved position.
    pub translate: Vec2,
    /// Margins (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub margin: Insets,
    /// Transition settings.
    pub transition: Transition,
    /// Free-form properties that have no geometric meaning to the scene.
    pub properties: HashMap<String, String>,
}

/// Scroll state of a scroll container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Current scroll offset; content is shifted by `-offset`.
    pub offset: Vec2,
    /// Total scrollable content size (`scrollWidth`/`scrollHeight`).
    pub content: Size,
}
