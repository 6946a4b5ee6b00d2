// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column reordering built on the generic drag and drop directives.
//!
//! Every column header gets a [`DragDirective`](crate::drag::DragDirective)
//! with a [`ColumnMoveBehavior`] and a drop zone with a
//! [`ColumnDropStrategy`]. Both hold a clone of the same [`DragCoordinator`],
//! which carries the column being moved and the status icon shown in its
//! ghost. The coordinator is passed explicitly; nothing here is global.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{RefCell, RefMut};
use core::fmt;

use dragline_scene::{ElementId, Scene};
use kurbo::{Point, Vec2};

use crate::drag::{DragBehavior, MoveVerdict};
use crate::drop::DropStrategy;
use crate::events::{DragNotice, DragSignal, DropEventArgs};
use crate::notify::Emitter;

/// Icon text shown while the ghost is over a valid target.
pub const ICON_SWAP: &str = "swap";
/// Icon text shown while the ghost is over no valid target.
pub const ICON_BLOCK: &str = "block";
/// Class carried by selected headers; ghosts never show it.
pub const SELECTED_CLASS: &str = "selected";

/// What the grid knows about a column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Unique key.
    pub key: String,
    /// Whether the column may be reordered.
    pub movable: bool,
    /// Whether the column may be dragged into a group-by area.
    pub groupable: bool,
    /// Whether the column is a column group.
    pub is_group: bool,
    /// Key of the enclosing column group.
    pub parent: Option<String>,
}

impl ColumnInfo {
    /// A movable, non-grouped column.
    pub fn movable(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            movable: true,
            ..Self::default()
        }
    }

    /// Returns `true` if `self` may be moved next to `target`.
    pub fn can_move_next_to(&self, target: &Self) -> bool {
        self.movable && self.key != target.key && self.parent == target.parent
    }
}

/// Side of the target a column lands on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropPosition {
    /// In front of the target.
    Before,
    /// Behind the target.
    After,
}

/// Payload of the moving-start notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMovingStartArgs {
    /// Column being moved.
    pub source: ColumnInfo,
}

/// Payload of the cancelable per-move notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMovingArgs {
    /// Column being moved.
    pub source: ColumnInfo,
    /// Set to interrupt the move; the drop is skipped.
    pub cancel: bool,
}

/// Payload of the cancelable moving-end notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMovingEndArgs {
    /// Column being moved.
    pub source: ColumnInfo,
    /// Column it was dropped on.
    pub target: ColumnInfo,
    /// Side of `target` it lands on.
    pub position: DropPosition,
    /// Set to keep the current order.
    pub cancel: bool,
}

/// State of the column move in flight.
#[derive(Clone, Debug, Default)]
pub struct MoveState {
    /// Column being moved.
    pub column: Option<ColumnInfo>,
    /// Status icon inside the ghost.
    pub icon: Option<ElementId>,
    /// The move was interrupted; the next drop is ignored.
    pub cancel_drop: bool,
    /// A move is in progress.
    pub is_moving: bool,
}

#[derive(Default)]
struct CoordinatorInner {
    state: RefCell<MoveState>,
    moving_start: RefCell<Emitter<ColumnMovingStartArgs>>,
    moving: RefCell<Emitter<ColumnMovingArgs>>,
    moving_end: RefCell<Emitter<ColumnMovingEndArgs>>,
}

/// Shared context between the dragged header and every potential target.
///
/// Cloning is cheap; clones share state. Listeners must not subscribe to the
/// emitter that is currently calling them.
#[derive(Clone, Default)]
pub struct DragCoordinator {
    inner: Rc<CoordinatorInner>,
}

impl fmt::Debug for DragCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCoordinator")
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

impl DragCoordinator {
    /// Creates an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the move state.
    pub fn state(&self) -> MoveState {
        self.inner.state.borrow().clone()
    }

    /// Column being moved.
    pub fn column(&self) -> Option<ColumnInfo> {
        self.inner.state.borrow().column.clone()
    }

    /// Returns `true` while a column is being moved.
    pub fn is_moving(&self) -> bool {
        self.inner.state.borrow().is_moving
    }

    /// Status icon inside the current ghost.
    pub fn icon(&self) -> Option<ElementId> {
        self.inner.state.borrow().icon
    }

    /// Returns `true` if the next drop will be ignored.
    pub fn cancel_drop(&self) -> bool {
        self.inner.state.borrow().cancel_drop
    }

    /// Listeners notified when a column starts moving.
    pub fn moving_start(&self) -> RefMut<'_, Emitter<ColumnMovingStartArgs>> {
        self.inner.moving_start.borrow_mut()
    }

    /// Listeners notified on every move; cancel to interrupt.
    pub fn moving(&self) -> RefMut<'_, Emitter<ColumnMovingArgs>> {
        self.inner.moving.borrow_mut()
    }

    /// Listeners notified before a column is reordered; cancel to keep the order.
    pub fn moving_end(&self) -> RefMut<'_, Emitter<ColumnMovingEndArgs>> {
        self.inner.moving_end.borrow_mut()
    }

    fn update(&self, f: impl FnOnce(&mut MoveState)) {
        f(&mut self.inner.state.borrow_mut());
    }

    fn set_icon_text(&self, scene: &mut Scene, text: &str) {
        if let Some(icon) = self.icon() {
            scene.set_text(icon, text);
        }
    }
}

/// Drag hooks of a column header.
#[derive(Clone, Debug)]
pub struct ColumnMoveBehavior {
    column: ColumnInfo,
    coordinator: DragCoordinator,
}

impl ColumnMoveBehavior {
    /// Hooks for the header of `column`.
    pub fn new(column: ColumnInfo, coordinator: DragCoordinator) -> Self {
        Self { column, coordinator }
    }
}

impl DragBehavior for ColumnMoveBehavior {
    fn allow_pointer_down(&mut self, scene: &Scene, _source: ElementId, target: ElementId) -> bool {
        let draggable = self.column.movable || (self.column.groupable && !self.column.is_group);
        draggable && scene.attribute(target, "draggable") != Some("false")
    }

    fn pointer_down(&mut self, _scene: &mut Scene, _source: ElementId) {
        self.coordinator.update(|s| s.cancel_drop = false);
    }

    fn drag_started(&mut self, _scene: &mut Scene, _source: ElementId) {
        self.coordinator.update(|s| {
            s.column = Some(self.column.clone());
            s.is_moving = true;
        });
        let mut args = ColumnMovingStartArgs {
            source: self.column.clone(),
        };
        self.coordinator.moving_start().emit(&mut args);
    }

    fn build_ghost(&mut self, scene: &mut Scene, source: ElementId) -> Option<ElementId> {
        let ghost = scene.deep_clone(source)?;
        if let Some(style) = scene.style_mut(ghost) {
            for prop in ["height", "min-width", "flex-basis"] {
                style.properties.remove(prop);
            }
        }
        scene.remove_class(ghost, SELECTED_CLASS);

        let icon = scene.create_element("i");
        scene.add_class(icon, "material-icons");
        scene.set_text(icon, ICON_BLOCK);
        let first = scene.children(ghost).first().copied();
        if scene.insert_before(ghost, icon, first).is_err() {
            let _ = scene.destroy(icon);
            return Some(ghost);
        }
        self.coordinator.update(|s| s.icon = Some(icon));
        Some(ghost)
    }

    fn ghost_mounted(&mut self, scene: &mut Scene, ghost: ElementId, page: Point) -> Option<Point> {
        let size = scene.size(ghost)?;
        Some(page - Vec2::new(size.width * 2.0 / 3.0, size.height * 2.0 / 3.0))
    }

    fn after_move(&mut self, _scene: &mut Scene, _source: ElementId, _page: Point) -> MoveVerdict {
        let Some(source) = self.coordinator.column() else {
            return MoveVerdict::Continue;
        };
        let mut args = ColumnMovingArgs { source, cancel: false };
        self.coordinator.moving().emit(&mut args);
        if !args.cancel {
            return MoveVerdict::Continue;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(column = %self.column.key, "column move interrupted");
        self.coordinator.update(|s| s.cancel_drop = true);
        MoveVerdict::Interrupt
    }

    fn pointer_released(&mut self, _scene: &mut Scene, _source: ElementId) {
        self.coordinator.update(|s| {
            s.column = None;
            s.icon = None;
            s.is_moving = false;
        });
    }
}

/// Drop handling of a column header.
#[derive(Clone, Debug)]
pub struct ColumnDropStrategy {
    column: ColumnInfo,
    coordinator: DragCoordinator,
}

impl ColumnDropStrategy {
    /// Drop handling for the header of `column`.
    pub fn new(column: ColumnInfo, coordinator: DragCoordinator) -> Self {
        Self { column, coordinator }
    }

    fn accepts(&self, source: &ColumnInfo) -> bool {
        source.can_move_next_to(&self.column)
    }
}

impl<T> DropStrategy<T> for ColumnDropStrategy {
    fn dragged_over(&mut self, scene: &mut Scene, signal: DragSignal, _args: &DropEventArgs<T>) {
        let text = match signal {
            DragSignal::Enter | DragSignal::Over => match self.coordinator.column() {
                Some(source) if self.accepts(&source) => ICON_SWAP,
                _ => ICON_BLOCK,
            },
            DragSignal::Leave | DragSignal::Drop => ICON_BLOCK,
        };
        self.coordinator.set_icon_text(scene, text);
    }

    fn drop_action(
        &mut self,
        scene: &mut Scene,
        notice: &DragNotice<T>,
        zone: ElementId,
        _index: Option<usize>,
    ) {
        if self.coordinator.cancel_drop() {
            self.coordinator.update(|s| s.cancel_drop = false);
            return;
        }
        let Some(source) = self.coordinator.column() else {
            return;
        };
        if !self.accepts(&source) {
            return;
        }
        let Some(parent) = scene.parent_element(zone) else {
            return;
        };
        if scene.parent_element(notice.drag) != Some(parent) {
            return;
        }
        let Some(rect) = scene.page_rect(zone) else {
            return;
        };
        let position = if notice.page.x < rect.center().x {
            DropPosition::Before
        } else {
            DropPosition::After
        };

        let mut args = ColumnMovingEndArgs {
            source,
            target: self.column.clone(),
            position,
            cancel: false,
        };
        self.coordinator.moving_end().emit(&mut args);
        if args.cancel {
            return;
        }
        let reference = match position {
            DropPosition::Before => Some(zone),
            DropPosition::After => scene
                .index_of(parent, zone)
                .and_then(|i| scene.children(parent).get(i + 1).copied()),
        };
        if reference == Some(notice.drag) {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(source = %args.source.key, target = %args.target.key, ?position, "column moved");
        let _ = scene.insert_before(parent, notice.drag, reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use kurbo::{Rect, Size};

    fn header(scene: &mut Scene) -> ElementId {
        let th = scene.create_element("th");
        scene.set_bounds(th, Rect::new(0.0, 0.0, 120.0, 30.0)).unwrap();
        scene.append_child(scene.body(), th).unwrap();
        th
    }

    #[test]
    fn pointer_down_gate() {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let th = header(&mut scene);
        let resize = scene.create_element("span");
        scene.set_attribute(resize, "draggable", "false");
        scene.append_child(th, resize).unwrap();
        let c = DragCoordinator::new();

        let mut fixed = ColumnMoveBehavior::new(ColumnInfo::default(), c.clone());
        assert!(!fixed.allow_pointer_down(&scene, th, th));

        let groupable = ColumnInfo {
            groupable: true,
            ..ColumnInfo::default()
        };
        let mut b = ColumnMoveBehavior::new(groupable.clone(), c.clone());
        assert!(b.allow_pointer_down(&scene, th, th));
        let group = ColumnInfo {
            is_group: true,
            ..groupable
        };
        let mut b = ColumnMoveBehavior::new(group, c.clone());
        assert!(!b.allow_pointer_down(&scene, th, th));

        let mut movable = ColumnMoveBehavior::new(ColumnInfo::movable("id"), c);
        assert!(movable.allow_pointer_down(&scene, th, th));
        assert!(!movable.allow_pointer_down(&scene, th, resize));
    }

    #[test]
    fn ghost_drops_selection_and_sizing_and_gains_icon() {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let th = header(&mut scene);
        let title = scene.create_element("span");
        scene.append_child(th, title).unwrap();
        scene.add_class(th, SELECTED_CLASS);
        for prop in ["height", "min-width", "flex-basis", "color"] {
            scene
                .style_mut(th)
                .unwrap()
                .properties
                .insert(prop.to_string(), "1".to_string());
        }
        let c = DragCoordinator::new();
        let mut b = ColumnMoveBehavior::new(ColumnInfo::movable("id"), c.clone());

        let ghost = b.build_ghost(&mut scene, th).unwrap();
        assert!(!scene.has_class(ghost, SELECTED_CLASS));
        let props = &scene.style(ghost).unwrap().properties;
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("color"));

        let icon = c.icon().unwrap();
        assert_eq!(scene.children(ghost)[0], icon);
        assert_eq!(scene.text(icon), Some(ICON_BLOCK));
        assert!(scene.has_class(icon, "material-icons"));
        // The source is untouched.
        assert!(scene.has_class(th, SELECTED_CLASS));
    }

    #[test]
    fn ghost_is_anchored_at_two_thirds() {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let th = header(&mut scene);
        let mut b = ColumnMoveBehavior::new(ColumnInfo::movable("id"), DragCoordinator::new());
        let anchor = b.ghost_mounted(&mut scene, th, Point::new(300.0, 100.0));
        assert_eq!(anchor, Some(Point::new(220.0, 80.0)));
    }

    #[test]
    fn canceled_moving_interrupts_and_cancels_drop() {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let th = header(&mut scene);
        let c = DragCoordinator::new();
        c.moving().subscribe(|a| a.cancel = true);
        let mut b = ColumnMoveBehavior::new(ColumnInfo::movable("id"), c.clone());

        assert_eq!(b.after_move(&mut scene, th, Point::ZERO), MoveVerdict::Continue);
        b.drag_started(&mut scene, th);
        assert!(c.is_moving());
        assert_eq!(b.after_move(&mut scene, th, Point::ZERO), MoveVerdict::Interrupt);
        assert!(c.cancel_drop());

        b.pointer_released(&mut scene, th);
        assert!(!c.is_moving());
        assert!(c.column().is_none());
        b.pointer_down(&mut scene, th);
        assert!(!c.cancel_drop());
    }

    #[test]
    fn validity_needs_same_parent_and_other_key() {
        let a = ColumnInfo::movable("a");
        let b = ColumnInfo::movable("b");
        let grouped = ColumnInfo {
            parent: Some("address".to_string()),
            ..ColumnInfo::movable("city")
        };
        assert!(a.can_move_next_to(&b));
        assert!(!a.can_move_next_to(&a));
        assert!(!a.can_move_next_to(&grouped));
        let pinned = ColumnInfo {
            movable: false,
            ..ColumnInfo::movable("c")
        };
        assert!(!pinned.can_move_next_to(&b));
    }
}
