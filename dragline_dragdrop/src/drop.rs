// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop zones and drop strategies.
//!
//! A [`DropDirective`] reacts to the signals a drag delivers through the
//! [`DropRegistry`](crate::registry::DropRegistry). Every signal is first
//! checked against the zone's channel; unlinked drags are ignored entirely.
//! On a drop the zone emits a cancelable `dropped` notification and then lets
//! its [`DropStrategy`] perform the structural change.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use dragline_event_state::channel::{Channel, is_linked};
use dragline_scene::{ElementId, Scene};
use kurbo::{Point, Vec2};

use crate::events::{DragNotice, DragSignal, DropEventArgs, DroppedArgs};
use crate::notify::Emitter;
use crate::registry::DropZoneId;

/// Settings of a drop zone.
#[derive(Clone, Debug, Default)]
pub struct DropConfig {
    /// Channel drags must be linked to.
    pub channel: Channel,
}

/// Structural action performed when a drag is dropped on a zone.
pub trait DropStrategy<T> {
    /// Called for enter, over and leave after the zone's own listeners ran.
    fn dragged_over(&mut self, scene: &mut Scene, signal: DragSignal, args: &DropEventArgs<T>) {
        let _ = (scene, signal, args);
    }

    /// Moves the dragged element into `zone`.
    ///
    /// `index` is the position of the child under the pointer (see
    /// [`insert_index`]), or `None` when there is none.
    fn drop_action(
        &mut self,
        scene: &mut Scene,
        notice: &DragNotice<T>,
        zone: ElementId,
        index: Option<usize>,
    );
}

/// Does nothing; listeners of `dropped` are expected to react.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultDropStrategy;

impl<T> DropStrategy<T> for DefaultDropStrategy {
    fn drop_action(&mut self, _: &mut Scene, _: &DragNotice<T>, _: ElementId, _: Option<usize>) {}
}

/// Appends the dragged element as the last child.
#[derive(Copy, Clone, Debug, Default)]
pub struct AppendDropStrategy;

impl<T> DropStrategy<T> for AppendDropStrategy {
    fn drop_action(&mut self, scene: &mut Scene, notice: &DragNotice<T>, zone: ElementId, _: Option<usize>) {
        let _ = scene.append_child(zone, notice.drag);
    }
}

/// Inserts the dragged element as the first child.
#[derive(Copy, Clone, Debug, Default)]
pub struct PrependDropStrategy;

impl<T> DropStrategy<T> for PrependDropStrategy {
    fn drop_action(&mut self, scene: &mut Scene, notice: &DragNotice<T>, zone: ElementId, _: Option<usize>) {
        let first = scene.children(zone).first().copied();
        if first == Some(notice.drag) {
            return;
        }
        let _ = scene.insert_before(zone, notice.drag, first);
    }
}

/// Inserts the dragged element in front of the child under the pointer, or
/// appends it when there is no such child.
///
/// A drag released over its own zone but not over a sibling stays where it is.
#[derive(Copy, Clone, Debug, Default)]
pub struct InsertDropStrategy;

impl<T> DropStrategy<T> for InsertDropStrategy {
    fn drop_action(
        &mut self,
        scene: &mut Scene,
        notice: &DragNotice<T>,
        zone: ElementId,
        index: Option<usize>,
    ) {
        let is_child = scene.parent_element(notice.drag) == Some(zone);
        let Some(index) = index else {
            if !is_child {
                let _ = scene.append_child(zone, notice.drag);
            }
            return;
        };
        // The reference is resolved before the dragged element leaves its slot.
        let reference = scene.children(zone).get(index).copied();
        if reference == Some(notice.drag) {
            return;
        }
        let _ = scene.insert_before(zone, notice.drag, reference);
    }
}

/// Index of the direct child of `zone` under `page`.
///
/// When the dragged element is itself an earlier child of `zone`, the index is
/// bumped by one so that inserting before it lands after the hovered child.
/// Returns `None` when the zone has no children or none is under the pointer.
pub fn insert_index(scene: &Scene, zone: ElementId, dragged: ElementId, page: Point) -> Option<usize> {
    let children = scene.children(zone);
    if children.is_empty() {
        return None;
    }
    let client = page - scene.window_scroll();
    let under = scene
        .elements_from_point(client)
        .into_iter()
        .find(|&el| scene.parent_element(el) == Some(zone))?;
    let index = scene.index_of(zone, under)?;
    match scene.index_of(zone, dragged) {
        Some(dragged_index) if dragged_index < index => Some(index + 1),
        _ => Some(index),
    }
}

/// Listener lists of a drop zone.
pub struct DropEvents<T> {
    /// A linked drag entered the zone.
    pub enter: Emitter<DropEventArgs<T>>,
    /// A linked drag moved over the zone.
    pub over: Emitter<DropEventArgs<T>>,
    /// A linked drag left the zone.
    pub leave: Emitter<DropEventArgs<T>>,
    /// A linked drag was released on the zone. Cancel to skip the strategy.
    pub dropped: Emitter<DroppedArgs<T>>,
}

impl<T> Default for DropEvents<T> {
    fn default() -> Self {
        Self {
            enter: Emitter::new(),
            over: Emitter::new(),
            leave: Emitter::new(),
            dropped: Emitter::new(),
        }
    }
}

impl<T> fmt::Debug for DropEvents<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropEvents")
            .field("enter", &self.enter)
            .field("over", &self.over)
            .field("leave", &self.leave)
            .field("dropped", &self.dropped)
            .finish()
    }
}

/// A drop zone attached to an element.
pub struct DropDirective<T> {
    id: DropZoneId,
    element: ElementId,
    channel: Channel,
    strategy: Box<dyn DropStrategy<T>>,
    data: Option<Rc<T>>,
    dragover: bool,
    /// Listener lists.
    pub events: DropEvents<T>,
}

impl<T> fmt::Debug for DropDirective<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropDirective")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("channel", &self.channel)
            .field("has_data", &self.data.is_some())
            .field("dragover", &self.dragover)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> DropDirective<T> {
    pub(crate) fn new(id: DropZoneId, element: ElementId, config: DropConfig) -> Self {
        Self {
            id,
            element,
            channel: config.channel,
            strategy: Box::new(DefaultDropStrategy),
            data: None,
            dragover: false,
            events: DropEvents::default(),
        }
    }

    /// Handle of this zone in its registry.
    pub fn id(&self) -> DropZoneId {
        self.id
    }

    /// Element the zone is attached to.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Channel drags must be linked to.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Replaces the channel.
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Replaces the drop strategy.
    pub fn set_strategy(&mut self, strategy: impl DropStrategy<T> + 'static) {
        self.strategy = Box::new(strategy);
    }

    /// Payload of this zone, handed to its listeners next to the drag's payload.
    pub fn data(&self) -> Option<&Rc<T>> {
        self.data.as_ref()
    }

    /// Replaces the payload of this zone.
    pub fn set_data(&mut self, data: Option<Rc<T>>) {
        self.data = data;
    }

    /// Returns `true` while a linked drag is over the zone.
    pub fn dragover(&self) -> bool {
        self.dragover
    }

    /// Reacts to a drag signal. Returns `false` if the drag is not linked.
    pub fn notify(&mut self, scene: &mut Scene, signal: DragSignal, notice: &DragNotice<T>) -> bool {
        if !is_linked(&notice.channel, &self.channel) {
            return false;
        }
        let offset = scene
            .page_origin(self.element)
            .map_or(Vec2::ZERO, |origin| notice.page - origin);
        let mut args = DropEventArgs {
            owner: self.id,
            zone: self.element,
            drag: notice.drag,
            drag_data: notice.data.clone(),
            zone_data: self.data.clone(),
            original_event: notice.original_event.clone(),
            start: notice.start,
            page: notice.page,
            offset,
        };
        match signal {
            DragSignal::Enter => {
                self.dragover = true;
                self.events.enter.emit(&mut args);
                self.strategy.dragged_over(scene, signal, &args);
            }
            DragSignal::Over => {
                self.events.over.emit(&mut args);
                self.strategy.dragged_over(scene, signal, &args);
            }
            DragSignal::Leave => {
                self.dragover = false;
                self.events.leave.emit(&mut args);
                self.strategy.dragged_over(scene, signal, &args);
            }
            DragSignal::Drop => {
                let mut dropped = DroppedArgs { args, cancel: false };
                self.events.dropped.emit(&mut dropped);
                if dropped.cancel {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(zone = ?self.element, "drop canceled by listener");
                    return true;
                }
                let index = insert_index(scene, self.element, notice.drag, notice.page);
                #[cfg(feature = "tracing")]
                tracing::debug!(zone = ?self.element, drag = ?notice.drag, ?index, "drop");
                self.strategy.drop_action(scene, notice, self.element, index);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DropRegistry;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::{Rect, Size};

    struct Row {
        scene: Scene,
        zone: ElementId,
        items: Vec<ElementId>,
    }

    /// A zone at (0, 0) with three 100x50 children laid out left to right.
    fn row() -> Row {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let zone = scene.create_element("zone");
        scene.set_bounds(zone, Rect::new(0.0, 0.0, 300.0, 50.0)).unwrap();
        scene.append_child(scene.body(), zone).unwrap();
        let items = (0..3)
            .map(|i| {
                let el = scene.create_element("item");
                let x = f64::from(i) * 100.0;
                scene.set_bounds(el, Rect::new(x, 0.0, x + 100.0, 50.0)).unwrap();
                scene.append_child(zone, el).unwrap();
                el
            })
            .collect();
        Row { scene, zone, items }
    }

    fn notice(drag: ElementId, page: Point, channel: Channel) -> DragNotice<()> {
        DragNotice {
            drag,
            ghost: None,
            channel,
            data: None,
            original_event: None,
            start: Point::ZERO,
            page,
        }
    }

    #[test]
    fn index_is_bumped_past_hovered_child_for_earlier_sibling() {
        let Row { scene, zone, items } = row();
        let [a, b, c] = [items[0], items[1], items[2]];
        assert_eq!(insert_index(&scene, zone, a, Point::new(150.0, 10.0)), Some(2));
        assert_eq!(insert_index(&scene, zone, c, Point::new(150.0, 10.0)), Some(1));
        assert_eq!(insert_index(&scene, zone, b, Point::new(50.0, 10.0)), Some(0));
        assert_eq!(insert_index(&scene, zone, b, Point::new(400.0, 10.0)), None);
    }

    #[test]
    fn insert_strategy_reorders_children() {
        let Row { mut scene, zone, items } = row();
        let [a, b, c] = [items[0], items[1], items[2]];

        let mut strategy = InsertDropStrategy;
        let n = notice(a, Point::new(150.0, 10.0), Channel::Unset);
        let index = insert_index(&scene, zone, a, n.page);
        strategy.drop_action(&mut scene, &n, zone, index);
        assert_eq!(scene.children(zone), &[b, a, c]);

        // Released over the zone but over no child: stays put.
        strategy.drop_action(&mut scene, &n, zone, None);
        assert_eq!(scene.children(zone), &[b, a, c]);
    }

    #[test]
    fn append_and_prepend_strategies() {
        let Row { mut scene, zone, items } = row();
        let outsider = scene.create_element("chip");
        scene.append_child(scene.body(), outsider).unwrap();

        let n = notice(outsider, Point::ZERO, Channel::Unset);
        DropStrategy::<()>::drop_action(&mut PrependDropStrategy, &mut scene, &n, zone, None);
        assert_eq!(scene.children(zone)[0], outsider);
        DropStrategy::<()>::drop_action(&mut AppendDropStrategy, &mut scene, &n, zone, None);
        assert_eq!(scene.children(zone), &[items[0], items[1], items[2], outsider]);
    }

    #[test]
    fn unlinked_drags_are_ignored() {
        let Row { mut scene, zone, items } = row();
        let mut registry = DropRegistry::<()>::new();
        let id = registry.attach(
            &mut scene,
            zone,
            DropConfig {
                channel: Channel::from(["odd", "irrational"]),
            },
        );
        let entered = Rc::new(RefCell::new(Vec::new()));
        let log = entered.clone();
        registry
            .zone_mut(id)
            .unwrap()
            .events
            .enter
            .subscribe(move |args| log.borrow_mut().push(args.offset));

        let odd = notice(items[0], Point::new(30.0, 20.0), Channel::from("odd"));
        let even = notice(items[0], Point::new(30.0, 20.0), Channel::from("even"));
        assert!(!registry.notify(&mut scene, zone, DragSignal::Enter, &even));
        assert!(!registry.zone(id).unwrap().dragover());
        assert!(registry.notify(&mut scene, zone, DragSignal::Enter, &odd));
        assert!(registry.zone(id).unwrap().dragover());
        assert_eq!(*entered.borrow(), vec![Vec2::new(30.0, 20.0)]);
    }

    #[test]
    fn listeners_see_both_payloads() {
        let Row { mut scene, zone, items } = row();
        let mut registry = DropRegistry::<&'static str>::new();
        let id = registry.attach(&mut scene, zone, DropConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let zone_dir = registry.zone_mut(id).unwrap();
        zone_dir.set_data(Some(Rc::new("backlog")));
        zone_dir.events.dropped.subscribe(move |d| {
            log.borrow_mut()
                .push((d.args.drag_data.as_deref().copied(), d.args.zone_data.as_deref().copied()));
        });

        let n = DragNotice {
            drag: items[0],
            ghost: None,
            channel: Channel::Unset,
            data: Some(Rc::new("card-7")),
            original_event: None,
            start: Point::ZERO,
            page: Point::new(250.0, 10.0),
        };
        registry.notify(&mut scene, zone, DragSignal::Drop, &n);
        registry.zone_mut(id).unwrap().set_data(None);
        registry.notify(&mut scene, zone, DragSignal::Drop, &n);
        assert_eq!(
            *seen.borrow(),
            vec![(Some("card-7"), Some("backlog")), (Some("card-7"), None)]
        );
    }

    #[test]
    fn canceled_drop_skips_strategy() {
        let Row { mut scene, zone, items } = row();
        let mut registry = DropRegistry::<()>::new();
        let id = registry.attach(&mut scene, zone, DropConfig::default());
        let zone_dir = registry.zone_mut(id).unwrap();
        zone_dir.set_strategy(PrependDropStrategy);
        let cancel = zone_dir.events.dropped.subscribe(|d| d.cancel = true);

        let n = notice(items[2], Point::new(250.0, 10.0), Channel::Unset);
        registry.notify(&mut scene, zone, DragSignal::Drop, &n);
        assert_eq!(scene.children(zone), &[items[0], items[1], items[2]]);

        registry.zone_mut(id).unwrap().events.dropped.unsubscribe(cancel);
        registry.notify(&mut scene, zone, DragSignal::Drop, &n);
        assert_eq!(scene.children(zone), &[items[2], items[0], items[1]]);
    }
}
