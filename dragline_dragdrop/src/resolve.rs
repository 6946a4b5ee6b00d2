// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop-target resolution.
//!
//! The resolver asks the scene which elements lie under the pointer, expands
//! shadow hosts into their shadow content (depth first, shadow content before
//! its host) and picks the first element marked `droppable="true"` that is
//! neither the ghost nor the drag source. Comparing that zone with the one
//! recorded on the previous move yields enter, leave and over signals.

use alloc::vec::Vec;

use dragline_scene::{ElementId, Scene};
use hashbrown::HashSet;
use kurbo::Point;
use smallvec::SmallVec;

use crate::events::DragSignal;

/// Attribute that marks an element as a drop zone.
pub const DROPPABLE_ATTR: &str = "droppable";

/// Signals to deliver for one resolution, in order.
pub type Transitions = SmallVec<[(ElementId, DragSignal); 2]>;

/// Flattens point queries across shadow roots and picks drop zones.
#[derive(Clone, Debug, Default)]
pub struct DropTargetResolver {
    seen: HashSet<ElementId>,
}

impl DropTargetResolver {
    /// Creates a resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every element under the viewport point `client`, topmost first, with
    /// shadow content listed ahead of its host and each element listed once.
    pub fn candidates(&mut self, scene: &Scene, client: Point) -> Vec<ElementId> {
        self.seen.clear();
        let mut out = Vec::new();
        let top = scene.elements_from_point(client);
        self.flatten(scene, &top, None, client, &mut out);
        out
    }

    fn flatten(
        &mut self,
        scene: &Scene,
        list: &[ElementId],
        scope: Option<ElementId>,
        client: Point,
        out: &mut Vec<ElementId>,
    ) {
        for &el in list {
            // Shadow-scope queries repeat the enclosing scope; those entries are
            // handled by the caller.
            if let Some(host) = scope {
                if el == host || !scene.contains(host, el) {
                    continue;
                }
            }
            if !self.seen.insert(el) {
                continue;
            }
            if scene.shadow_children(el).is_some() {
                let inner = scene.shadow_elements_from_point(el, client);
                self.flatten(scene, &inner, Some(el), client, out);
            }
            out.push(el);
        }
    }

    /// The topmost droppable element under `client`, skipping `ghost` and `origin`.
    pub fn find_zone(
        &mut self,
        scene: &Scene,
        client: Point,
        ghost: Option<ElementId>,
        origin: ElementId,
    ) -> Option<ElementId> {
        self.candidates(scene, client).into_iter().find(|&el| {
            Some(el) != ghost && el != origin && scene.attribute(el, DROPPABLE_ATTR) == Some("true")
        })
    }
}

/// Signals produced when the recorded zone changes from `previous` to `next`.
///
/// - no previous zone, new zone: enter on the new zone;
/// - different zone (or none): leave on the previous zone, then enter on the new one if any;
/// - same zone: over.
pub fn transitions(previous: Option<ElementId>, next: Option<ElementId>) -> Transitions {
    let mut out = Transitions::new();
    match (previous, next) {
        (None, None) => {}
        (None, Some(n)) => out.push((n, DragSignal::Enter)),
        (Some(p), Some(n)) if p == n => out.push((n, DragSignal::Over)),
        (Some(p), next) => {
            out.push((p, DragSignal::Leave));
            if let Some(n) = next {
                out.push((n, DragSignal::Enter));
            }
        }
    }
    out
}

/// Signals delivered when a drag is released over `zone`.
pub fn release(zone: ElementId) -> Transitions {
    let mut out = Transitions::new();
    out.push((zone, DragSignal::Drop));
    out.push((zone, DragSignal::Leave));
    out
}
