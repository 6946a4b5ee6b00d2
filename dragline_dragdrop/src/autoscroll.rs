// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applies edge auto-scrolling to a scene.

use dragline_event_state::scroll::{
    AutoScroller, EdgeProbe, ScrollConfig, ScrollDirection, ScrollUpdate, detect_direction,
};
use dragline_scene::{ElementId, Scene};
use kurbo::{Point, Rect, Vec2};

/// What gets scrolled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    /// The document viewport.
    Window,
    /// A scroll container element.
    Container(ElementId),
}

/// Drives an [`AutoScroller`] against the window or a scroll container.
#[derive(Clone, Debug)]
pub struct AutoScrollDriver {
    scroller: AutoScroller,
    target: ScrollTarget,
}

impl AutoScrollDriver {
    /// Scrolls `container`, or the window when `None`.
    pub fn new(config: ScrollConfig, container: Option<ElementId>) -> Self {
        Self {
            scroller: AutoScroller::new(config),
            target: container.map_or(ScrollTarget::Window, ScrollTarget::Container),
        }
    }

    /// What gets scrolled.
    pub fn target(&self) -> ScrollTarget {
        self.target
    }

    /// Direction of the running interval.
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.scroller.direction()
    }

    /// Returns `true` while an interval is running.
    pub fn is_active(&self) -> bool {
        self.scroller.is_active()
    }

    /// Describes the scroll target in viewport coordinates.
    pub fn probe(&self, scene: &Scene) -> Option<EdgeProbe> {
        match self.target {
            ScrollTarget::Window => Some(EdgeProbe {
                viewport: Rect::from_origin_size(Point::ZERO, scene.viewport()),
                offset: scene.window_scroll(),
                max: scene.max_window_scroll(),
            }),
            ScrollTarget::Container(el) => {
                scene.scroll_state(el)?;
                Some(EdgeProbe {
                    viewport: scene.client_rect(el)?,
                    offset: scene.scroll_offset(el),
                    max: scene.max_scroll(el),
                })
            }
        }
    }

    /// Re-evaluates the edge under `page` after a move.
    pub fn check(&mut self, scene: &Scene, page: Point, now_ms: u64) -> ScrollUpdate {
        let Some(probe) = self.probe(scene) else {
            return if self.scroller.stop() {
                ScrollUpdate::Stopped
            } else {
                ScrollUpdate::Unchanged
            };
        };
        let client = page - scene.window_scroll();
        let direction = detect_direction(&probe, client, self.scroller.config().threshold);
        let update = self.scroller.update(direction, now_ms, probe.max);
        #[cfg(feature = "tracing")]
        match update {
            ScrollUpdate::Started(direction) => {
                tracing::debug!(?direction, target = ?self.target, "auto-scroll started");
            }
            ScrollUpdate::Stopped => tracing::debug!(target = ?self.target, "auto-scroll stopped"),
            ScrollUpdate::Unchanged => {}
        }
        update
    }

    /// Scrolls by every step due at `now_ms`. Returns the delta actually applied.
    pub fn tick(&mut self, scene: &mut Scene, now_ms: u64) -> Vec2 {
        if !self.scroller.is_active() {
            return Vec2::ZERO;
        }
        match self.target {
            ScrollTarget::Window => {
                let delta = self.scroller.tick(now_ms, scene.window_scroll());
                scene.scroll_window_by(delta)
            }
            ScrollTarget::Container(el) => {
                let before = scene.scroll_offset(el);
                let delta = self.scroller.tick(now_ms, before);
                scene
                    .set_scroll_offset(el, before + delta)
                    .map_or(Vec2::ZERO, |after| after - before)
            }
        }
    }

    /// Clears the running interval.
    pub fn stop(&mut self) -> bool {
        self.scroller.stop()
    }
}
