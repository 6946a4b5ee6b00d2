// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer normalization: turn pointer, touch and mouse input into one page-space stream.
//!
//! Hosts deliver whichever input family their platform supports. A consumer
//! detects the [`InputModality`] once from a [`PlatformGlobals`] probe and then
//! runs every incoming [`InputEvent`] through [`normalize`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use dragline_event_state::pointer::{
//!     normalize, InputEvent, InputModality, InputPhase, Platform, TouchPoint,
//! };
//!
//! let modality = InputModality::detect(&Platform { pointer_events: false, touch_events: true });
//! assert_eq!(modality, InputModality::Touch);
//!
//! let mut ev = InputEvent::touch(InputPhase::Move, 1_u32, [TouchPoint::new(0, Point::new(4.0, 9.0))]);
//! let p = normalize(&mut ev, modality);
//! assert_eq!(p.page, Point::new(4.0, 9.0));
//! // Touch input suppresses page scrolling while it is being tracked.
//! assert!(ev.default_prevented);
//! ```

use kurbo::Point;
use smallvec::SmallVec;

/// Capabilities of the host platform relevant to input selection.
pub trait PlatformGlobals {
    /// Returns `true` if native pointer events are available.
    fn has_pointer_event(&self) -> bool;
    /// Returns `true` if touch events are available.
    fn has_touch_start(&self) -> bool;
}

/// Plain capability record for hosts that know their features up front.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Platform {
    /// Native pointer events are available.
    pub pointer_events: bool,
    /// Touch events are available.
    pub touch_events: bool,
}

impl PlatformGlobals for Platform {
    fn has_pointer_event(&self) -> bool {
        self.pointer_events
    }

    fn has_touch_start(&self) -> bool {
        self.touch_events
    }
}

/// Input family a consumer listens to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputModality {
    /// Native pointer events (preferred).
    #[default]
    Pointer,
    /// Touch events, used only when pointer events are missing.
    Touch,
    /// Mouse events, the last resort.
    Mouse,
}

impl InputModality {
    /// Picks the modality in priority order pointer, touch, mouse.
    pub fn detect(platform: &(impl PlatformGlobals + ?Sized)) -> Self {
        if platform.has_pointer_event() {
            Self::Pointer
        } else if platform.has_touch_start() {
            Self::Touch
        } else {
            Self::Mouse
        }
    }
}

/// Stage of a pointer interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputPhase {
    /// `pointerdown` / `touchstart` / `mousedown`.
    Down,
    /// `pointermove` / `touchmove` / `mousemove`.
    Move,
    /// `pointerup` / `touchend` / `mouseup`.
    Up,
    /// `lostpointercapture`.
    LostCapture,
}

/// One active touch contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Platform identifier of the contact.
    pub identifier: u32,
    /// Page-space position.
    pub page: Point,
}

impl TouchPoint {
    /// Creates a touch point.
    pub const fn new(identifier: u32, page: Point) -> Self {
        Self { identifier, page }
    }
}

/// Raw input as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent<K> {
    /// Family the event belongs to.
    pub source: InputModality,
    /// Interaction stage.
    pub phase: InputPhase,
    /// Innermost element the event was dispatched to.
    pub target: K,
    /// Element whose listener is handling the event, when it differs from `target`.
    pub current_target: Option<K>,
    /// Page-space position. Ignored for touch input, which carries `touches`.
    pub page: Point,
    /// Pointer identity; only pointer events carry one.
    pub pointer_id: Option<u32>,
    /// Active touch contacts.
    pub touches: SmallVec<[TouchPoint; 2]>,
    /// Set once a handler asked the host to suppress the default action.
    pub default_prevented: bool,
}

impl<K> InputEvent<K> {
    /// A native pointer event.
    pub fn pointer(phase: InputPhase, target: K, page: Point, pointer_id: u32) -> Self {
        Self {
            source: InputModality::Pointer,
            phase,
            target,
            current_target: None,
            page,
            pointer_id: Some(pointer_id),
            touches: SmallVec::new(),
            default_prevented: false,
        }
    }

    /// A touch event with the given active contacts.
    pub fn touch(phase: InputPhase, target: K, touches: impl IntoIterator<Item = TouchPoint>) -> Self {
        let touches: SmallVec<[TouchPoint; 2]> = touches.into_iter().collect();
        let page = touches.first().map(|t| t.page).unwrap_or(Point::ZERO);
        Self {
            source: InputModality::Touch,
            phase,
            target,
            current_target: None,
            page,
            pointer_id: None,
            touches,
            default_prevented: false,
        }
    }

    /// A mouse event.
    pub fn mouse(phase: InputPhase, target: K, page: Point) -> Self {
        Self {
            source: InputModality::Mouse,
            phase,
            target,
            current_target: None,
            page,
            pointer_id: None,
            touches: SmallVec::new(),
            default_prevented: false,
        }
    }

    /// Sets the element whose listener handles the event.
    #[must_use]
    pub fn with_current_target(mut self, current: K) -> Self {
        self.current_target = Some(current);
        self
    }

    /// Asks the host to suppress the default action (scrolling, text selection).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Position and identity extracted from an [`InputEvent`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormalizedPointer {
    /// Page-space position.
    pub page: Point,
    /// Pointer identity, when the modality has one.
    pub pointer_id: Option<u32>,
}

/// Reads the page position of `event` according to `modality`.
///
/// Pointer and mouse modalities read [`InputEvent::page`]. The touch modality
/// reads the first touch contact and prevents the default action so the page
/// does not scroll under the finger; when no contact remains (touch end) the
/// event's own `page` is used.
pub fn normalize<K>(event: &mut InputEvent<K>, modality: InputModality) -> NormalizedPointer {
    match modality {
        InputModality::Pointer | InputModality::Mouse => NormalizedPointer {
            page: event.page,
            pointer_id: event.pointer_id,
        },
        InputModality::Touch => {
            let page = event.touches.first().map(|t| t.page).unwrap_or(event.page);
            event.prevent_default();
            NormalizedPointer {
                page,
                pointer_id: event.pointer_id,
            }
        }
    }
}
