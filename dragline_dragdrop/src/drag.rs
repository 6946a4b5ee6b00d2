// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag orchestrator.
//!
//! A [`DragDirective`] turns raw input on one source element into a drag:
//!
//! - pointer-down arms a [`DragSession`] (unless the press landed on an ignored
//!   element, outside the configured handles, or was refused by the
//!   [`DragBehavior`]);
//! - pointer-move checks the tolerance, starts the drag (cancelable), creates
//!   the ghost, applies the move, checks the auto-scroll edges and publishes
//!   enter/over/leave signals to the [`DropRegistry`];
//! - pointer-up (or capture loss) delivers the drop, emits `drag_end` or
//!   `drag_click` and settles the session once the return animation ends.
//!
//! The directive never waits on anything. The host forwards input with
//! [`DragDirective::handle_input`], frame timestamps with
//! [`DragDirective::on_animation_frame`] and transition ends with
//! [`DragDirective::on_transition_end`].
//!
//! All positions are page (document) coordinates.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use dragline_event_state::channel::Channel;
use dragline_event_state::drag::{DragAxis, DragPhase, DragSession};
use dragline_event_state::pointer::{InputEvent, InputModality, InputPhase, normalize};
use dragline_event_state::scroll::ScrollConfig;
use dragline_scene::{ElementId, Scene, Transition};
use kurbo::{Point, Vec2};

use crate::autoscroll::{AutoScrollDriver, ScrollTarget};
use crate::events::{
    DragBaseArgs, DragMoveArgs, DragNotice, DragSignal, DragStartArgs, GhostArgs, OriginalEvent,
};
use crate::ghost::{GhostConfig, GhostManager};
use crate::notify::Emitter;
use crate::registry::DropRegistry;
use crate::resolve::{DropTargetResolver, release, transitions};

/// Builds a ghost from a template. Returning `None` refuses the ghost.
pub type GhostTemplate = Box<dyn FnMut(&mut Scene) -> Option<ElementId>>;

/// Settings of a drag source.
#[derive(Clone, Debug)]
pub struct DragConfig {
    /// Distance in pixels the pointer must travel on either axis before a press becomes a drag.
    pub tolerance: f64,
    /// Axes the dragged element may move along.
    pub axis: DragAxis,
    /// Channel used to pick compatible drop zones.
    pub channel: Channel,
    /// Render a ghost instead of moving the source element.
    pub ghost: bool,
    /// Ghost appearance and host.
    pub ghost_config: GhostConfig,
    /// Horizontal offset of the ghost from the pointer; keeps the grab point when `None`.
    pub ghost_offset_x: Option<f64>,
    /// Vertical offset of the ghost from the pointer; keeps the grab point when `None`.
    pub ghost_offset_y: Option<f64>,
    /// Scroll container to auto-scroll; the window when `None`.
    pub scroll_container: Option<ElementId>,
    /// Auto-scroll tuning.
    pub scroll: ScrollConfig,
    /// Sub-elements that activate the drag. Any part of the source when empty.
    pub handles: Vec<ElementId>,
    /// Sub-elements on which a press never starts a drag.
    pub ignored: Vec<ElementId>,
    /// Duration in seconds of programmatic transitions without an explicit duration.
    pub default_return_duration: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            tolerance: 5.0,
            axis: DragAxis::Both,
            channel: Channel::Unset,
            ghost: true,
            ghost_config: GhostConfig::default(),
            ghost_offset_x: None,
            ghost_offset_y: None,
            scroll_container: None,
            scroll: ScrollConfig::default(),
            handles: Vec::new(),
            ignored: Vec::new(),
            default_return_duration: 0.5,
        }
    }
}

/// Overrides for programmatic transitions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionArgs {
    /// Duration in seconds; [`DragConfig::default_return_duration`] when `None`.
    pub duration: Option<f64>,
    /// Timing function name; the host default when `None`.
    pub timing_function: Option<String>,
    /// Delay in seconds.
    pub delay: Option<f64>,
}

/// A page position of the dragged element (or its ghost).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragLocation {
    /// Page coordinates of the border box origin.
    pub page: Point,
}

impl DragLocation {
    /// Creates a location at `page`.
    pub fn new(page: Point) -> Self {
        Self { page }
    }
}

/// Destination of [`DragDirective::transition_to`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragTarget {
    /// An explicit page position.
    Location(DragLocation),
    /// The page origin of another element.
    Element(ElementId),
}

/// Outcome of [`DragBehavior::after_move`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Keep dragging.
    #[default]
    Continue,
    /// End the drag as if the pointer was released where it last was.
    Interrupt,
}

/// Hooks that specialize a [`DragDirective`] without touching its tolerance,
/// scrolling or drop resolution.
///
/// Every hook has a default that keeps the plain behavior.
pub trait DragBehavior {
    /// Decides whether a press on `target` inside `source` may arm a session.
    fn allow_pointer_down(&mut self, scene: &Scene, source: ElementId, target: ElementId) -> bool {
        let _ = (scene, source, target);
        true
    }

    /// Called after a session was armed.
    fn pointer_down(&mut self, scene: &mut Scene, source: ElementId) {
        let _ = (scene, source);
    }

    /// Called once the drag was accepted and its ghost (if any) exists.
    fn drag_started(&mut self, scene: &mut Scene, source: ElementId) {
        let _ = (scene, source);
    }

    /// Builds a detached ghost element. Defaults to a deep clone of `source`.
    fn build_ghost(&mut self, scene: &mut Scene, source: ElementId) -> Option<ElementId> {
        scene.deep_clone(source)
    }

    /// Called after the ghost was mounted under the pointer at `page`.
    ///
    /// Returning a position moves the ghost there; later moves keep that anchor.
    fn ghost_mounted(&mut self, scene: &mut Scene, ghost: ElementId, page: Point) -> Option<Point> {
        let _ = (scene, ghost, page);
        None
    }

    /// Called after every applied move.
    fn after_move(&mut self, scene: &mut Scene, source: ElementId, page: Point) -> MoveVerdict {
        let _ = (scene, source, page);
        MoveVerdict::Continue
    }

    /// Called after `drag_end` was emitted.
    fn pointer_released(&mut self, scene: &mut Scene, source: ElementId) {
        let _ = (scene, source);
    }
}

/// The plain drag behavior.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultDragBehavior;

impl DragBehavior for DefaultDragBehavior {}

/// Listener lists of a drag source.
#[derive(Debug, Default)]
pub struct DragEvents {
    /// The tolerance was exceeded. Cancel to refuse the drag.
    pub drag_start: Emitter<DragStartArgs>,
    /// A move is about to be applied. Cancel to skip it.
    pub drag_move: Emitter<DragMoveArgs>,
    /// A drag was released or lost.
    pub drag_end: Emitter<DragBaseArgs>,
    /// A press was released without leaving the tolerance box.
    pub drag_click: Emitter<DragBaseArgs>,
    /// A ghost is about to be mounted. Cancel to abort the drag.
    pub ghost_create: Emitter<GhostArgs>,
    /// A ghost is about to be removed. Cancel to keep it.
    pub ghost_destroy: Emitter<GhostArgs>,
    /// The element (or ghost) finished settling.
    pub transitioned: Emitter<DragBaseArgs>,
}

/// A drag source attached to one element.
pub struct DragDirective<T> {
    element: ElementId,
    config: DragConfig,
    modality: InputModality,
    data: Option<Rc<T>>,
    session: DragSession<ElementId>,
    ghost: GhostManager,
    template: Option<GhostTemplate>,
    behavior: Box<dyn DragBehavior>,
    scroll: AutoScrollDriver,
    resolver: DropTargetResolver,
    default_offset: Vec2,
    ghost_start: Point,
    now_ms: u64,
    move_gate: bool,
    /// Listener lists.
    pub events: DragEvents,
}

impl<T> fmt::Debug for DragDirective<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDirective")
            .field("element", &self.element)
            .field("config", &self.config)
            .field("modality", &self.modality)
            .field("session", &self.session)
            .field("ghost", &self.ghost)
            .field("scroll", &self.scroll)
            .field("ghost_start", &self.ghost_start)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> DragDirective<T> {
    /// Makes `element` draggable.
    ///
    /// The element's transition is cleared so that moves apply instantly.
    pub fn attach(scene: &mut Scene, element: ElementId, config: DragConfig, modality: InputModality) -> Self {
        if let Some(style) = scene.style_mut(element) {
            style.transition = Transition::default();
        }
        Self {
            element,
            modality,
            data: None,
            session: DragSession::new(config.axis),
            ghost: GhostManager::new(config.ghost_config.clone()),
            template: None,
            behavior: Box::new(DefaultDragBehavior),
            scroll: AutoScrollDriver::new(config.scroll, config.scroll_container),
            resolver: DropTargetResolver::new(),
            default_offset: Vec2::ZERO,
            ghost_start: Point::ZERO,
            now_ms: 0,
            move_gate: true,
            events: DragEvents::default(),
            config,
        }
    }

    /// Replaces the hooks.
    pub fn with_behavior(mut self, behavior: impl DragBehavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    /// Builds ghosts from `template` instead of cloning the source.
    pub fn set_ghost_template(&mut self, template: Option<GhostTemplate>) {
        self.template = template;
    }

    /// Tears the directive down, removing a live ghost and any capture it holds.
    ///
    /// A drop zone the drag is over receives `Leave` first.
    pub fn detach(mut self, scene: &mut Scene, zones: &mut DropRegistry<T>) {
        self.scroll.stop();
        if let Some(zone) = self.session.set_drop_zone(None) {
            let notice = self.notice(self.session.last(), None);
            zones.notify(scene, zone, DragSignal::Leave, &notice);
        }
        if let Some(id) = self.session.pointer_id() {
            scene.release_pointer_capture(id);
        }
        self.ghost.clear(scene);
    }

    /// Source element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Settings in use.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Input modality events are read with.
    pub fn modality(&self) -> InputModality {
        self.modality
    }

    /// Payload handed to drop zones.
    pub fn data(&self) -> Option<&Rc<T>> {
        self.data.as_ref()
    }

    /// Replaces the payload handed to drop zones.
    pub fn set_data(&mut self, data: Option<Rc<T>>) {
        self.data = data;
    }

    /// Current phase of the session.
    pub fn phase(&self) -> DragPhase {
        self.session.phase()
    }

    /// Returns `true` while waiting for a transition end.
    pub fn is_settling(&self) -> bool {
        self.session.phase() == DragPhase::Settling
    }

    /// The mounted ghost.
    pub fn ghost_element(&self) -> Option<ElementId> {
        self.ghost.element()
    }

    /// What auto-scrolling moves.
    pub fn scroll_target(&self) -> ScrollTarget {
        self.scroll.target()
    }

    /// Drop zone element the pointer was last over.
    pub fn drop_zone(&self) -> Option<ElementId> {
        self.session.drop_zone()
    }

    /// Routes a raw input event by phase.
    pub fn handle_input(
        &mut self,
        scene: &mut Scene,
        zones: &mut DropRegistry<T>,
        event: &mut InputEvent<ElementId>,
    ) {
        match event.phase {
            InputPhase::Down => {
                self.pointer_down(scene, event);
            }
            InputPhase::Move => self.pointer_move(scene, zones, event),
            InputPhase::Up => self.pointer_up(scene, zones, Some(event)),
            InputPhase::LostCapture => self.lost_capture(scene, zones, event),
        }
    }

    /// Starts tracking a press. Returns `true` if a session was armed.
    pub fn pointer_down(&mut self, scene: &mut Scene, event: &mut InputEvent<ElementId>) -> bool {
        let target = event.target;
        if !scene.is_connected(target) || !scene.contains(self.element, target) {
            return false;
        }
        if self.config.ignored.iter().any(|&i| scene.contains(i, target)) {
            return false;
        }
        let handle = self.config.handles.iter().copied().find(|&h| scene.contains(h, target));
        if !self.config.handles.is_empty() && handle.is_none() {
            return false;
        }
        if !self.behavior.allow_pointer_down(scene, self.element, target) {
            return false;
        }

        let pointer = normalize(event, self.modality);
        if self.modality == InputModality::Pointer {
            if let Some(id) = pointer.pointer_id {
                // The capture target is connected; failure means a stale handle.
                let _ = scene.set_pointer_capture(handle.unwrap_or(self.element), id);
            }
        } else {
            event.prevent_default();
        }

        self.session.arm(self.element, pointer.pointer_id, pointer.page);
        let base = scene.page_origin(self.element).unwrap_or(pointer.page);
        self.default_offset = base - pointer.page;
        self.ghost_start = pointer.page
            + Vec2::new(
                self.config.ghost_offset_x.unwrap_or(self.default_offset.x),
                self.config.ghost_offset_y.unwrap_or(self.default_offset.y),
            );
        self.behavior.pointer_down(scene, self.element);
        #[cfg(feature = "tracing")]
        tracing::debug!(element = ?self.element, page = ?pointer.page, "drag session armed");
        true
    }

    fn tracks(&self, event: &InputEvent<ElementId>) -> bool {
        if !self.session.is_pressed() {
            return false;
        }
        match (self.modality, self.session.pointer_id()) {
            (InputModality::Pointer, Some(id)) => event.pointer_id.is_none_or(|p| p == id),
            _ => true,
        }
    }

    /// Processes a pointer move.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        zones: &mut DropRegistry<T>,
        event: &mut InputEvent<ElementId>,
    ) {
        if !self.tracks(event) || !self.move_gate {
            return;
        }
        self.move_gate = false;
        let page = normalize(event, self.modality).page;
        let original: OriginalEvent = Some(event.clone());

        if !self.session.is_started() {
            if !self.session.exceeds_tolerance(page, self.config.tolerance) {
                return;
            }
            let mut args = DragStartArgs {
                base: DragBaseArgs {
                    owner: self.element,
                    original_event: original.clone(),
                    start: self.session.start(),
                    page,
                },
                cancel: false,
            };
            self.events.drag_start.emit(&mut args);
            if args.cancel {
                #[cfg(feature = "tracing")]
                tracing::debug!(element = ?self.element, "drag start canceled");
                self.abort(scene);
                return;
            }
            self.session.begin_drag();
            if self.config.ghost {
                if !self.create_ghost(scene, page) {
                    self.abort(scene);
                    self.session.finish();
                    return;
                }
            } else if self.config.ghost_offset_x.is_some() || self.config.ghost_offset_y.is_some() {
                let adjust = Vec2::new(
                    self.config.ghost_offset_x.map_or(0.0, |x| x - self.default_offset.x),
                    self.config.ghost_offset_y.map_or(0.0, |y| y - self.default_offset.y),
                );
                self.translate_source(scene, adjust);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(element = ?self.element, start = ?self.session.start(), ?page, "drag started");
            self.behavior.drag_started(scene, self.element);
        }

        let last = self.session.last();
        let mut args = DragMoveArgs {
            base: DragBaseArgs {
                owner: self.element,
                original_event: original,
                start: self.session.start(),
                page: last,
            },
            next_page: page,
            cancel: false,
        };
        self.events.drag_move.emit(&mut args);
        let next = args.next_page;
        let mut verdict = MoveVerdict::Continue;
        if !args.cancel {
            self.apply_move(scene, next, last);
            self.scroll.check(scene, page, self.now_ms);
            self.dispatch_drag_events(scene, zones, page, args.base.original_event);
            verdict = self.behavior.after_move(scene, self.element, page);
        }
        self.session.record_move(next);
        if verdict == MoveVerdict::Interrupt {
            self.interrupt(scene, zones);
        }
    }

    /// Finishes a press, delivering the drop if a zone was recorded.
    ///
    /// With `event == None` the release happens at the last applied position.
    pub fn pointer_up(
        &mut self,
        scene: &mut Scene,
        zones: &mut DropRegistry<T>,
        event: Option<&mut InputEvent<ElementId>>,
    ) {
        let (page, original) = match event {
            Some(event) => {
                if !self.tracks(event) {
                    return;
                }
                (normalize(event, self.modality).page, Some(event.clone()))
            }
            None => {
                if !self.session.is_pressed() {
                    return;
                }
                (self.session.last(), None)
            }
        };
        let pointer_id = self.session.pointer_id();
        let started = self.session.release();
        self.scroll.stop();

        let mut args = DragBaseArgs {
            owner: self.element,
            original_event: original.clone(),
            start: self.session.start(),
            page,
        };
        if started {
            if let Some(zone) = self.session.set_drop_zone(None) {
                if zone != self.element {
                    let notice = self.notice(page, original);
                    for (element, signal) in release(zone) {
                        zones.notify(scene, element, signal, &notice);
                    }
                }
            }
            self.events.drag_end.emit(&mut args);
            self.behavior.pointer_released(scene, self.element);
            if !self.session.is_animating() {
                self.on_transition_end(scene, None);
            }
        } else {
            self.events.drag_click.emit(&mut args);
        }
        if let Some(id) = pointer_id {
            scene.release_pointer_capture(id);
        }
    }

    /// Handles the loss of pointer capture.
    ///
    /// In ghost mode only the ghost's capture matters. A ghost that was removed
    /// from the document is re-attached and re-captured instead of ending the
    /// drag. Otherwise the drag ends without a drop.
    pub fn lost_capture(
        &mut self,
        scene: &mut Scene,
        zones: &mut DropRegistry<T>,
        event: &mut InputEvent<ElementId>,
    ) {
        if !self.session.is_pressed() {
            return;
        }
        if self.config.ghost {
            let Some(ghost) = self.ghost.element() else {
                return;
            };
            if event.target != ghost {
                return;
            }
            if !scene.is_connected(ghost) && self.ghost.reattach(scene) {
                if let Some(id) = self.session.pointer_id() {
                    let _ = scene.set_pointer_capture(ghost, id);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(?ghost, "ghost re-attached after capture loss");
                return;
            }
        } else if !scene.contains(self.element, event.target) {
            return;
        }

        let page = normalize(event, self.modality).page;
        let started = self.session.release();
        self.scroll.stop();
        if !started {
            return;
        }
        if let Some(zone) = self.session.set_drop_zone(None) {
            let notice = self.notice(page, Some(event.clone()));
            zones.notify(scene, zone, DragSignal::Leave, &notice);
        }
        let mut args = DragBaseArgs {
            owner: self.element,
            original_event: Some(event.clone()),
            start: self.session.start(),
            page,
        };
        self.events.drag_end.emit(&mut args);
        self.behavior.pointer_released(scene, self.element);
        if !self.session.is_animating() {
            self.on_transition_end(scene, None);
        }
    }

    /// Ends the drag as if the pointer was released at its last position.
    pub fn interrupt(&mut self, scene: &mut Scene, zones: &mut DropRegistry<T>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(element = ?self.element, "drag interrupted");
        self.pointer_up(scene, zones, None);
    }

    /// Reports the end of a transition on `target`, or of the pending
    /// settle when `None`.
    pub fn on_transition_end(&mut self, scene: &mut Scene, target: Option<ElementId>) {
        if let Some(target) = target {
            if target != self.element && Some(target) != self.ghost.element() {
                return;
            }
        }
        if !self.session.should_settle() {
            return;
        }
        if self.config.ghost {
            if let Some(ghost) = self.ghost.element() {
                if let Some(origin) = scene.page_origin(self.element) {
                    self.ghost_start = origin;
                }
                let mut args = GhostArgs {
                    owner: self.element,
                    ghost,
                    cancel: false,
                };
                self.events.ghost_destroy.emit(&mut args);
                if args.cancel {
                    // The session stays settling until an uncanceled transition end.
                    return;
                }
                self.ghost.clear(scene);
            }
        } else if let Some(style) = scene.style_mut(self.element) {
            style.transition = Transition::default();
        }
        self.session.finish();
        let start = self.session.start();
        let mut args = DragBaseArgs {
            owner: self.element,
            original_event: None,
            start,
            page: start,
        };
        self.events.transitioned.emit(&mut args);
    }

    /// Advances time: reopens the move throttle and runs due auto-scroll steps.
    pub fn on_animation_frame(&mut self, scene: &mut Scene, now_ms: u64) {
        self.now_ms = now_ms;
        self.move_gate = true;
        if self.session.phase() != DragPhase::Dragging {
            return;
        }
        let applied = self.scroll.tick(scene, now_ms);
        if applied == Vec2::ZERO {
            return;
        }
        match (self.ghost.element(), self.scroll.target()) {
            (Some(_), ScrollTarget::Window) => self.ghost.shift(scene, applied),
            (Some(_), ScrollTarget::Container(_)) => {}
            (None, target) => {
                let delta = self.session.constrain(applied);
                self.translate_source(scene, delta);
                if target == ScrollTarget::Window {
                    // The pointer's page position grows with the window scroll.
                    let last = self.session.last();
                    self.session.record_move(last + applied);
                }
            }
        }
    }

    /// Current position of the ghost, or of the source element.
    pub fn location(&self, scene: &Scene) -> Option<DragLocation> {
        if self.config.ghost {
            if let Some(page) = self.ghost.page_position(scene) {
                return Some(DragLocation::new(page));
            }
        }
        scene.page_origin(self.element).map(DragLocation::new)
    }

    /// Position of the source element without its drag translation.
    pub fn origin_location(&self, scene: &Scene) -> Option<DragLocation> {
        let origin = scene.page_origin(self.element)?;
        let translate = scene.style(self.element)?.translate;
        Some(DragLocation::new(origin - translate))
    }

    /// Moves the ghost (or the source element) to `location`.
    pub fn set_location(&mut self, scene: &mut Scene, location: DragLocation) {
        if self.config.ghost {
            self.ghost.set_page_position(scene, location.page);
        } else if let Some(current) = self.location(scene) {
            self.translate_source(scene, location.page - current.page);
        }
        if !self.session.is_pressed() {
            if let Some(base) = scene.page_origin(self.element) {
                self.session.set_start(base);
            }
        }
    }

    /// Animates the ghost (or the source element) back to where the source sits.
    ///
    /// With `start`, the animation begins there; a ghost is created first if
    /// ghosts are enabled and none exists. Returns `false` if there was
    /// nothing to animate.
    pub fn transition_to_origin(
        &mut self,
        scene: &mut Scene,
        args: Option<TransitionArgs>,
        start: Option<DragLocation>,
    ) -> bool {
        let Some(origin) = self.origin_location(scene) else {
            return false;
        };
        match start {
            Some(start) if start == origin => return false,
            None if self.config.ghost && self.ghost.element().is_none() => return false,
            _ => {}
        }
        if let Some(start) = start {
            if Some(start) != self.location(scene) {
                if self.config.ghost && self.ghost.element().is_none() {
                    self.session.set_start(start.page);
                    self.ghost_start = start.page;
                    if !self.create_ghost(scene, start.page) {
                        return false;
                    }
                }
                self.set_location(scene, start);
            }
        }

        self.session.begin_animation();
        let transition = self.transition_for(args);
        let animated = transition.is_animated();
        if self.config.ghost {
            self.ghost.set_transition(scene, transition);
            if let Some(base) = scene.page_origin(self.element) {
                self.set_location(scene, DragLocation::new(base));
            }
        } else {
            if let Some(base) = scene.page_origin(self.element) {
                self.session.set_start(base);
            }
            if let Some(style) = scene.style_mut(self.element) {
                style.transition = transition;
                style.translate = Vec2::ZERO;
            }
        }
        if !animated {
            self.on_transition_end(scene, None);
        }
        true
    }

    /// Animates the ghost (or the source element) to `target`.
    ///
    /// Ghosts are created on demand. Returns `false` if the target has no
    /// position or the ghost could not be created.
    pub fn transition_to(
        &mut self,
        scene: &mut Scene,
        target: DragTarget,
        args: Option<TransitionArgs>,
        start: Option<DragLocation>,
    ) -> bool {
        let destination = match target {
            DragTarget::Location(location) => location.page,
            DragTarget::Element(element) => match scene.page_origin(element) {
                Some(origin) => origin,
                None => return false,
            },
        };
        let ghost_missing = self.config.ghost && self.ghost.element().is_none();
        match start {
            Some(start) if ghost_missing => {
                self.session.set_start(start.page);
                self.ghost_start = start.page;
            }
            Some(start) => self.set_location(scene, start),
            None if ghost_missing => {
                let Some(base) = scene.page_origin(self.element) else {
                    return false;
                };
                self.session.set_start(base);
                self.ghost_start = base;
            }
            None => {}
        }
        if ghost_missing && !self.create_ghost(scene, self.session.start()) {
            return false;
        }

        self.session.begin_animation();
        let transition = self.transition_for(args);
        let animated = transition.is_animated();
        if self.config.ghost {
            self.ghost.set_transition(scene, transition);
        } else if let Some(style) = scene.style_mut(self.element) {
            style.transition = transition;
        }
        self.set_location(scene, DragLocation::new(destination));
        if !animated {
            self.on_transition_end(scene, None);
        }
        true
    }

    fn transition_for(&self, args: Option<TransitionArgs>) -> Transition {
        let args = args.unwrap_or_default();
        let property = if self.config.ghost && self.ghost.element().is_some() {
            "left, top"
        } else {
            "transform"
        };
        Transition {
            property: property.into(),
            duration: args.duration.unwrap_or(self.config.default_return_duration),
            timing_function: args.timing_function.unwrap_or_default(),
            delay: args.delay.unwrap_or(0.0),
        }
    }

    /// Drops the press without a drag end and gives the pointer back.
    fn abort(&mut self, scene: &mut Scene) {
        if let Some(id) = self.session.pointer_id() {
            scene.release_pointer_capture(id);
        }
        self.session.abort();
    }

    fn translate_source(&self, scene: &mut Scene, delta: Vec2) {
        if let Some(style) = scene.style_mut(self.element) {
            style.translate += delta;
        }
    }

    fn apply_move(&mut self, scene: &mut Scene, next: Point, last: Point) {
        if self.ghost.element().is_some() {
            let moved = self.session.constrain(next - self.session.start());
            self.ghost.set_page_position(scene, self.ghost_start + moved);
        } else if !self.config.ghost {
            let delta = self.session.constrain(next - last);
            self.translate_source(scene, delta);
        }
    }

    /// Builds, vets and mounts a ghost for a pointer at `page`.
    fn create_ghost(&mut self, scene: &mut Scene, page: Point) -> bool {
        let built = match self.template.as_mut() {
            Some(template) => template(scene).map(|g| (g, true)),
            None => self.behavior.build_ghost(scene, self.element).map(|g| (g, false)),
        };
        let Some((ghost, from_template)) = built else {
            return false;
        };
        if self.ghost.prepare(scene, ghost).is_err() {
            self.ghost.discard(scene, ghost);
            return false;
        }
        let mut args = GhostArgs {
            owner: self.element,
            ghost,
            cancel: false,
        };
        self.events.ghost_create.emit(&mut args);
        if args.cancel {
            #[cfg(feature = "tracing")]
            tracing::debug!(element = ?self.element, "ghost creation canceled");
            self.ghost.discard(scene, ghost);
            return false;
        }
        let moved = self.session.constrain(self.session.total_moved(page));
        if self.ghost.mount(scene, ghost, from_template, self.ghost_start + moved).is_err() {
            self.ghost.discard(scene, ghost);
            return false;
        }
        if let Some(anchor) = self.behavior.ghost_mounted(scene, ghost, page) {
            self.ghost.set_page_position(scene, anchor);
            self.ghost_start = anchor - moved;
        }
        if self.modality == InputModality::Pointer {
            if let Some(id) = self.session.pointer_id() {
                let _ = scene.set_pointer_capture(ghost, id);
            }
        }
        true
    }

    fn notice(&self, page: Point, original_event: OriginalEvent) -> DragNotice<T> {
        DragNotice {
            drag: self.element,
            ghost: self.ghost.element(),
            channel: self.config.channel.clone(),
            data: self.data.clone(),
            original_event,
            start: self.session.start(),
            page,
        }
    }

    fn dispatch_drag_events(
        &mut self,
        scene: &mut Scene,
        zones: &mut DropRegistry<T>,
        page: Point,
        original_event: OriginalEvent,
    ) {
        let client = page - scene.window_scroll();
        let next = self
            .resolver
            .find_zone(scene, client, self.ghost.element(), self.element);
        let previous = self.session.set_drop_zone(next);
        let signals = transitions(previous, next);
        if signals.is_empty() {
            return;
        }
        let notice = self.notice(page, original_event);
        for (element, signal) in signals {
            zones.notify(scene, element, signal, &notice);
        }
    }
}
