// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point queries.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::scene::Scene;
use crate::types::{ElementFlags, ElementId};

#[derive(Copy, Clone, Debug)]
struct Hit {
    z: i32,
    order: usize,
    id: ElementId,
}

impl Scene {
    /// Elements under a viewport-space point, topmost first.
    ///
    /// Only the light tree is searched; shadow content is represented by its
    /// host. Elements must be both visible and pickable, and scroll containers
    /// clip their descendants. Paint order is `z_index` first, then tree order.
    pub fn elements_from_point(&self, client: Point) -> Vec<ElementId> {
        let page = client + self.window_scroll();
        let mut hits = Vec::new();
        let mut order = 0;
        self.collect_hits(self.body(), page, None, &mut order, &mut hits);
        finish(hits)
    }

    /// Elements under a viewport-space point as seen from the shadow root of
    /// `host`: hits inside that shadow scope (topmost first), followed by the
    /// hits of the enclosing document scope.
    ///
    /// The enclosing hits repeat elements that callers may already have seen,
    /// so consumers that merge several scopes must de-duplicate. Returns an
    /// empty list if `host` has no shadow root.
    pub fn shadow_elements_from_point(&self, host: ElementId, client: Point) -> Vec<ElementId> {
        let Some(roots) = self.shadow_children(host) else {
            return Vec::new();
        };
        let page = client + self.window_scroll();
        let clip = self.clip_for_children_of(host);
        let mut hits = Vec::new();
        let mut order = 0;
        for &child in roots {
            self.collect_hits(child, page, clip, &mut order, &mut hits);
        }
        let mut out = finish(hits);
        out.extend(self.elements_from_point(client));
        out
    }

    fn collect_hits(
        &self,
        id: ElementId,
        page: Point,
        clip: Option<Rect>,
        order: &mut usize,
        hits: &mut Vec<Hit>,
    ) {
        let Some(el) = self.get(id) else {
            return;
        };
        let Some(rect) = self.page_rect(id) else {
            return;
        };
        let inside_clip = clip.is_none_or(|c| c.contains(page));
        if el.flags.contains(ElementFlags::VISIBLE | ElementFlags::PICKABLE)
            && inside_clip
            && rect.contains(page)
        {
            hits.push(Hit {
                z: el.z_index,
                order: *order,
                id,
            });
        }
        *order += 1;
        let child_clip = if el.scroll.is_some() {
            Some(clip.map_or(rect, |c| c.intersect(rect)))
        } else {
            clip
        };
        for &child in &el.children {
            self.collect_hits(child, page, child_clip, order, hits);
        }
    }

    /// Intersection of every scroll container from `id` up to the body.
    fn clip_for_children_of(&self, id: ElementId) -> Option<Rect> {
        let mut clip: Option<Rect> = None;
        let mut cur = Some(id);
        while let Some(e) = cur {
            if self.scroll_state(e).is_some() {
                if let Some(rect) = self.page_rect(e) {
                    clip = Some(clip.map_or(rect, |c| c.intersect(rect)));
                }
            }
            cur = self.parent(e);
        }
        clip
    }
}

fn finish(mut hits: Vec<Hit>) -> Vec<ElementId> {
    hits.sort_by_key(|h| (h.z, h.order));
    hits.into_iter().rev().map(|h| h.id).collect()
}
