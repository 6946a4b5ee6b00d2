// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sessions.
//!
//! A [`DragSession`] tracks one press-and-drag gesture on a source element
//! through its phases: `Idle → Armed → Dragging → Settling → Idle`. It also
//! keeps the press position and the last applied pointer position, so callers
//! get movement deltas and total displacement without extra bookkeeping.
//!
//! ## Session phases
//!
//! A session is armed by a press and stays armed until the pointer travels
//! further than the tolerance on either axis; it then becomes a drag. Releasing
//! an armed session is a click. Releasing a drag moves the session into
//! settling until the return animation reports its end (or immediately, when
//! nothing animates).
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use dragline_event_state::drag::{DragPhase, DragSession};
//!
//! let mut s = DragSession::<u8>::default();
//! s.arm(1, None, Point::new(10.0, 20.0));
//! s.begin_drag();
//! assert_eq!(s.phase(), DragPhase::Dragging);
//!
//! // Deltas are measured from the previous move, totals from the press.
//! assert_eq!(s.record_move(Point::new(15.0, 25.0)), Vec2::new(5.0, 5.0));
//! assert_eq!(s.total_moved(Point::new(18.0, 25.0)), Vec2::new(8.0, 5.0));
//!
//! assert!(s.release());
//! assert_eq!(s.phase(), DragPhase::Settling);
//! assert!(s.should_settle());
//! s.finish();
//! assert_eq!(s.phase(), DragPhase::Idle);
//! ```

use kurbo::{Point, Vec2};

/// Axis a dragged element is allowed to move along.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragAxis {
    /// Only vertical movement is applied.
    Vertical,
    /// Only horizontal movement is applied.
    Horizontal,
    /// Movement is unconstrained.
    #[default]
    Both,
}

impl DragAxis {
    /// Zeroes the components of `delta` that this axis forbids.
    pub fn constrain(self, delta: Vec2) -> Vec2 {
        match self {
            Self::Vertical => Vec2::new(0.0, delta.y),
            Self::Horizontal => Vec2::new(delta.x, 0.0),
            Self::Both => delta,
        }
    }
}

/// Observable phase of a [`DragSession`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// No press is being tracked and nothing animates.
    #[default]
    Idle,
    /// Pressed, but the pointer has not left the tolerance box.
    Armed,
    /// Tolerance exceeded and the drag was accepted.
    Dragging,
    /// Released (or moved programmatically); waiting for the animation to end.
    Settling,
}

/// One press-and-drag gesture on a source element.
///
/// The phase is derived from three flags: whether a press is being tracked,
/// whether the drag was accepted, and whether a return animation is running.
/// Keeping the flags separate lets a programmatic transition settle without a
/// prior drag, and lets a new press arrive while the previous drop still settles.
#[derive(Clone, Debug)]
pub struct DragSession<K> {
    origin: Option<K>,
    pointer_id: Option<u32>,
    start: Point,
    last: Option<Point>,
    pressed: bool,
    started: bool,
    animating: bool,
    axis: DragAxis,
    drop_zone: Option<K>,
}

impl<K> Default for DragSession<K> {
    fn default() -> Self {
        Self {
            origin: None,
            pointer_id: None,
            start: Point::ZERO,
            last: None,
            pressed: false,
            started: false,
            animating: false,
            axis: DragAxis::Both,
            drop_zone: None,
        }
    }
}

impl<K: Copy + PartialEq> DragSession<K> {
    /// Creates an idle session constrained to `axis`.
    pub fn new(axis: DragAxis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match (self.pressed, self.started, self.animating) {
            (true, true, _) => DragPhase::Dragging,
            (true, false, _) => DragPhase::Armed,
            (false, true, _) | (false, false, true) => DragPhase::Settling,
            (false, false, false) => DragPhase::Idle,
        }
    }

    /// Records a press at `page` on `origin`.
    pub fn arm(&mut self, origin: K, pointer_id: Option<u32>, page: Point) {
        self.origin = Some(origin);
        self.pointer_id = pointer_id;
        self.pressed = true;
        self.start = page;
        self.last = Some(page);
    }

    /// Stops tracking the press without finishing a drag; later moves are ignored.
    pub fn abort(&mut self) {
        self.pressed = false;
        self.pointer_id = None;
    }

    /// Marks the drag as accepted.
    pub fn begin_drag(&mut self) {
        self.started = true;
    }

    /// Ends the press. Returns `true` if a drag had been accepted (drag end),
    /// `false` if the press never left the tolerance box (click).
    pub fn release(&mut self) -> bool {
        self.pressed = false;
        self.pointer_id = None;
        self.started
    }

    /// Marks a return or programmatic animation as running.
    pub fn begin_animation(&mut self) {
        self.animating = true;
    }

    /// Returns `true` if a transition end should complete the session.
    pub fn should_settle(&self) -> bool {
        !self.pressed && (self.started || self.animating)
    }

    /// Returns the session to idle once settling completed.
    pub fn finish(&mut self) {
        self.animating = false;
        self.started = false;
    }

    /// Element the press started on.
    pub fn origin(&self) -> Option<K> {
        self.origin
    }

    /// Pointer being tracked, if the input modality carries ids.
    pub fn pointer_id(&self) -> Option<u32> {
        self.pointer_id
    }

    /// Whether a press is being tracked.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether the drag was accepted and has not settled yet.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether an animation is running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Press position.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Moves the recorded press position, e.g. after a programmatic relocation.
    ///
    /// A last position recorded earlier is kept.
    pub fn set_start(&mut self, page: Point) {
        self.start = page;
    }

    /// Last applied pointer position.
    pub fn last(&self) -> Point {
        self.last.unwrap_or(self.start)
    }

    /// Records `page` as the last position and returns the delta from the previous one.
    pub fn record_move(&mut self, page: Point) -> Vec2 {
        let previous = self.last();
        self.last = Some(page);
        page - previous
    }

    /// Displacement of `page` from the press position.
    pub fn total_moved(&self, page: Point) -> Vec2 {
        page - self.start
    }

    /// Returns `true` if `page` lies strictly further than `tolerance` from the
    /// press position on either axis.
    pub fn exceeds_tolerance(&self, page: Point, tolerance: f64) -> bool {
        let moved = self.total_moved(page);
        moved.x.abs() > tolerance || moved.y.abs() > tolerance
    }

    /// Allowed movement axis.
    pub fn axis(&self) -> DragAxis {
        self.axis
    }

    /// Changes the allowed movement axis.
    pub fn set_axis(&mut self, axis: DragAxis) {
        self.axis = axis;
    }

    /// Applies the axis constraint to `delta`.
    pub fn constrain(&self, delta: Vec2) -> Vec2 {
        self.axis.constrain(delta)
    }

    /// Drop zone recorded by the last drop-target resolution.
    pub fn drop_zone(&self) -> Option<K> {
        self.drop_zone
    }

    /// Replaces the recorded drop zone, returning the previous one.
    pub fn set_drop_zone(&mut self, zone: Option<K>) -> Option<K> {
        core::mem::replace(&mut self.drop_zone, zone)
    }
}
