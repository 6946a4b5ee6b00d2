// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bus between drag sources and drop zones.
//!
//! Drag directives never hold references to drop zones. They resolve an
//! element under the pointer and publish a [`DragSignal`] for that element;
//! the registry fans it out to every zone attached to it.

use alloc::vec::Vec;

use dragline_scene::{ElementId, Scene};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::drop::{DropConfig, DropDirective};
use crate::events::{DragNotice, DragSignal};
use crate::resolve::DROPPABLE_ATTR;

/// Handle of a drop zone in a [`DropRegistry`].
///
/// Like element handles, zone handles are generational: a handle of a
/// detached zone never refers to a zone attached later in the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropZoneId(u32, u32);

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    zone: Option<DropDirective<T>>,
}

/// Drop zones keyed by the element they are attached to.
#[derive(Debug)]
pub struct DropRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    by_element: HashMap<ElementId, SmallVec<[DropZoneId; 1]>>,
}

impl<T> Default for DropRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_element: HashMap::new(),
        }
    }
}

impl<T: 'static> DropRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns `element` into a drop zone and marks it `droppable="true"`.
    pub fn attach(&mut self, scene: &mut Scene, element: ElementId, config: DropConfig) -> DropZoneId {
        let id = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.generation = slot.generation.wrapping_add(1);
                DropZoneId(idx, slot.generation)
            }
            None => {
                let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot {
                    generation: 1,
                    zone: None,
                });
                DropZoneId(idx, 1)
            }
        };
        self.slots[id.0 as usize].zone = Some(DropDirective::new(id, element, config));
        self.by_element.entry(element).or_default().push(id);
        scene.set_attribute(element, DROPPABLE_ATTR, "true");
        #[cfg(feature = "tracing")]
        tracing::debug!(zone = ?id, ?element, "drop zone attached");
        id
    }

    /// Removes a zone. The element loses `droppable` once no zone remains on it.
    pub fn detach(&mut self, scene: &mut Scene, id: DropZoneId) -> Option<DropDirective<T>> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        if slot.generation != id.1 {
            return None;
        }
        let zone = slot.zone.take()?;
        self.free.push(id.0);
        let element = zone.element();
        if let Some(ids) = self.by_element.get_mut(&element) {
            ids.retain(|z| *z != id);
            if ids.is_empty() {
                self.by_element.remove(&element);
                scene.remove_attribute(element, DROPPABLE_ATTR);
            }
        }
        Some(zone)
    }

    /// The zone behind `id`.
    pub fn zone(&self, id: DropZoneId) -> Option<&DropDirective<T>> {
        let slot = self.slots.get(id.0 as usize)?;
        if slot.generation != id.1 {
            return None;
        }
        slot.zone.as_ref()
    }

    /// Mutable access to the zone behind `id`, e.g. to subscribe or swap the strategy.
    pub fn zone_mut(&mut self, id: DropZoneId) -> Option<&mut DropDirective<T>> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        if slot.generation != id.1 {
            return None;
        }
        slot.zone.as_mut()
    }

    /// Zones attached to `element`, in attach order.
    pub fn zones_on(&self, element: ElementId) -> &[DropZoneId] {
        self.by_element.get(&element).map_or(&[], |ids| ids.as_slice())
    }

    /// Delivers `signal` to every zone on `element`.
    ///
    /// Returns `true` if at least one zone was linked to the drag.
    pub fn notify(
        &mut self,
        scene: &mut Scene,
        element: ElementId,
        signal: DragSignal,
        notice: &DragNotice<T>,
    ) -> bool {
        let ids: SmallVec<[DropZoneId; 1]> = match self.by_element.get(&element) {
            Some(ids) => ids.clone(),
            None => return false,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(?element, ?signal, zones = ids.len(), "drag signal");
        let mut handled = false;
        for id in ids {
            if let Some(zone) = self.zone_mut(id) {
                handled |= zone.notify(scene, signal, notice);
            }
        }
        handled
    }

    /// Number of attached zones.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.zone.is_some()).count()
    }

    /// Returns `true` if no zone is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragline_event_state::channel::Channel;
    use kurbo::{Point, Size};

    #[test]
    fn droppable_attribute_follows_attached_zones() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        let el = scene.create_element("div");
        let mut registry = DropRegistry::<()>::new();

        let a = registry.attach(&mut scene, el, DropConfig::default());
        let b = registry.attach(&mut scene, el, DropConfig::default());
        assert_eq!(scene.attribute(el, DROPPABLE_ATTR), Some("true"));
        assert_eq!(registry.zones_on(el), &[a, b]);

        assert!(registry.detach(&mut scene, a).is_some());
        assert_eq!(scene.attribute(el, DROPPABLE_ATTR), Some("true"));
        assert!(registry.detach(&mut scene, b).is_some());
        assert_eq!(scene.attribute(el, DROPPABLE_ATTR), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn stale_zone_handles_do_not_alias() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        let el = scene.create_element("div");
        let mut registry = DropRegistry::<()>::new();

        let old = registry.attach(&mut scene, el, DropConfig::default());
        registry.detach(&mut scene, old);
        let new = registry.attach(&mut scene, el, DropConfig::default());
        assert_ne!(old, new);
        assert!(registry.zone(old).is_none());
        assert!(registry.detach(&mut scene, old).is_none());
        assert_eq!(registry.zone(new).map(|z| z.element()), Some(el));
    }

    #[test]
    fn elements_without_zones_are_not_notified() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        let el = scene.create_element("div");
        let mut registry = DropRegistry::<()>::new();
        let notice = DragNotice {
            drag: el,
            ghost: None,
            channel: Channel::Unset,
            data: None,
            original_event: None,
            start: Point::ZERO,
            page: Point::ZERO,
        };
        assert!(!registry.notify(&mut scene, el, DragSignal::Enter, &notice));
    }
}
