// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notification payloads exchanged between drag sources, drop zones and listeners.

use alloc::rc::Rc;

use dragline_event_state::channel::Channel;
use dragline_event_state::pointer::InputEvent;
use dragline_scene::ElementId;
use kurbo::{Point, Vec2};

use crate::registry::DropZoneId;

/// Raw input that caused a notification, if any.
pub type OriginalEvent = Option<InputEvent<ElementId>>;

/// Fields shared by every drag-side notification.
#[derive(Clone, Debug, PartialEq)]
pub struct DragBaseArgs {
    /// Source element of the drag directive.
    pub owner: ElementId,
    /// Input that triggered the notification; `None` for programmatic calls.
    pub original_event: OriginalEvent,
    /// Page position where the press started.
    pub start: Point,
    /// Current page position.
    pub page: Point,
}

/// Cancelable notification fired when the tolerance is exceeded.
#[derive(Clone, Debug, PartialEq)]
pub struct DragStartArgs {
    /// Common fields.
    pub base: DragBaseArgs,
    /// Set to refuse the drag; the press is ignored until the next pointer-down.
    pub cancel: bool,
}

/// Cancelable notification fired for every move while dragging.
#[derive(Clone, Debug, PartialEq)]
pub struct DragMoveArgs {
    /// Common fields; `page` is the last applied position.
    pub base: DragBaseArgs,
    /// Position about to be applied. Listeners may overwrite it.
    pub next_page: Point,
    /// Set to skip applying the move, scrolling and drop-target detection for this tick.
    pub cancel: bool,
}

/// Cancelable notification fired around the ghost's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostArgs {
    /// Source element of the drag directive.
    pub owner: ElementId,
    /// The ghost element.
    pub ghost: ElementId,
    /// Set to keep the ghost from being created (or destroyed).
    pub cancel: bool,
}

/// Kind of notification a drop zone receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragSignal {
    /// A drag moved onto the zone.
    Enter,
    /// A drag moved while staying on the zone.
    Over,
    /// A drag left the zone (or was dropped on it).
    Leave,
    /// A drag was released on the zone.
    Drop,
}

/// What the drag side publishes to drop zones.
#[derive(Debug)]
pub struct DragNotice<T> {
    /// Source element of the drag.
    pub drag: ElementId,
    /// Ghost element, if one is rendered.
    pub ghost: Option<ElementId>,
    /// Channel of the drag source.
    pub channel: Channel,
    /// Payload attached to the drag source.
    pub data: Option<Rc<T>>,
    /// Input that triggered the notification.
    pub original_event: OriginalEvent,
    /// Page position where the press started.
    pub start: Point,
    /// Current pointer page position.
    pub page: Point,
}

impl<T> Clone for DragNotice<T> {
    fn clone(&self) -> Self {
        Self {
            drag: self.drag,
            ghost: self.ghost,
            channel: self.channel.clone(),
            data: self.data.clone(),
            original_event: self.original_event.clone(),
            start: self.start,
            page: self.page,
        }
    }
}

/// Payload of drop-zone enter, over and leave notifications.
#[derive(Debug)]
pub struct DropEventArgs<T> {
    /// Zone that emitted the notification.
    pub owner: DropZoneId,
    /// Element the zone is attached to.
    pub zone: ElementId,
    /// Source element of the drag.
    pub drag: ElementId,
    /// Payload attached to the drag source.
    pub drag_data: Option<Rc<T>>,
    /// Payload attached to the drop zone.
    pub zone_data: Option<Rc<T>>,
    /// Input that triggered the notification.
    pub original_event: OriginalEvent,
    /// Page position where the press started.
    pub start: Point,
    /// Current pointer page position.
    pub page: Point,
    /// Pointer position relative to the zone's page origin.
    pub offset: Vec2,
}

/// Cancelable payload of the drop zone's `dropped` notification.
#[derive(Debug)]
pub struct DroppedArgs<T> {
    /// Common fields.
    pub args: DropEventArgs<T>,
    /// Set to skip the zone's drop strategy.
    pub cancel: bool,
}
