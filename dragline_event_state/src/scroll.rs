// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while a drag is in progress.
//!
//! Two pieces cooperate:
//!
//! - [`detect_direction`] looks at the pointer and an [`EdgeProbe`] describing
//!   the scrollable area and reports which edge (if any) the pointer is close to.
//!   A direction only counts while that edge can still scroll further.
//! - [`AutoScroller`] owns at most one running interval. It is fed the detected
//!   direction on every move and host frame timestamps on every animation frame,
//!   and answers with the scroll delta that is due. Deltas are capped against the
//!   scrollable extent recorded when the interval started, so content that grows
//!   while scrolling cannot cause runaway scrolling.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use dragline_event_state::scroll::{
//!     detect_direction, AutoScroller, EdgeProbe, ScrollConfig, ScrollDirection,
//! };
//!
//! let config = ScrollConfig::default();
//! let probe = EdgeProbe {
//!     viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
//!     offset: Vec2::ZERO,
//!     max: Vec2::new(0.0, 400.0),
//! };
//! let dir = detect_direction(&probe, Point::new(300.0, 590.0), config.threshold);
//! assert_eq!(dir, Some(ScrollDirection::Down));
//!
//! let mut scroller = AutoScroller::new(config);
//! scroller.update(dir, 1_000, probe.max);
//! // Two intervals of 10ms elapsed: two steps of 5px.
//! assert_eq!(scroller.tick(1_020, probe.offset), Vec2::new(0.0, 10.0));
//! ```

use kurbo::{Point, Rect, Vec2};

/// Auto-scroll tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Distance from an edge, in pixels, within which scrolling starts.
    pub threshold: f64,
    /// Pixels scrolled per step.
    pub step: f64,
    /// Milliseconds between steps.
    pub step_interval_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 25.0,
            step: 5.0,
            step_interval_ms: 10,
        }
    }
}

/// Direction content is scrolled in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards the top (offset decreases).
    Up,
    /// Towards the bottom (offset increases).
    Down,
    /// Towards the left (offset decreases).
    Left,
    /// Towards the right (offset increases).
    Right,
}

impl ScrollDirection {
    /// Unit vector in scroll-offset space.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Snapshot of a scrollable area as seen by the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeProbe {
    /// Visible area in the pointer's coordinate space.
    pub viewport: Rect,
    /// Current scroll offset.
    pub offset: Vec2,
    /// Largest reachable scroll offset.
    pub max: Vec2,
}

/// Picks the edge the pointer is within `threshold` of, checking up, down,
/// left and right in that order. Edges that cannot scroll further are skipped.
pub fn detect_direction(probe: &EdgeProbe, pointer: Point, threshold: f64) -> Option<ScrollDirection> {
    let v = probe.viewport;
    if pointer.y - v.y0 < threshold && probe.offset.y > 0.0 {
        Some(ScrollDirection::Up)
    } else if v.y1 - pointer.y < threshold && probe.offset.y < probe.max.y {
        Some(ScrollDirection::Down)
    } else if pointer.x - v.x0 < threshold && probe.offset.x > 0.0 {
        Some(ScrollDirection::Left)
    } else if v.x1 - pointer.x < threshold && probe.offset.x < probe.max.x {
        Some(ScrollDirection::Right)
    } else {
        None
    }
}

/// What [`AutoScroller::update`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollUpdate {
    /// Nothing changed.
    Unchanged,
    /// A new interval started.
    Started(ScrollDirection),
    /// The running interval was cleared.
    Stopped,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct ScrollInterval {
    direction: ScrollDirection,
    started_at: u64,
    steps_taken: u64,
    limit: Vec2,
}

/// Runs at most one scroll interval at a time.
#[derive(Clone, Debug, Default)]
pub struct AutoScroller {
    config: ScrollConfig,
    active: Option<ScrollInterval>,
}

impl AutoScroller {
    /// Creates an idle scroller.
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Direction of the running interval.
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.active.map(|a| a.direction)
    }

    /// Returns `true` while an interval is running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Feeds the direction detected on a move.
    ///
    /// `None` clears a running interval. A direction starts an interval when none
    /// runs, capturing `limit` (the largest offset reachable right now) as the
    /// cap for its whole lifetime. A different direction restarts the interval.
    pub fn update(&mut self, direction: Option<ScrollDirection>, now_ms: u64, limit: Vec2) -> ScrollUpdate {
        match (direction, self.active) {
            (None, None) => ScrollUpdate::Unchanged,
            (None, Some(_)) => {
                self.active = None;
                ScrollUpdate::Stopped
            }
            (Some(d), Some(a)) if a.direction == d => ScrollUpdate::Unchanged,
            (Some(d), _) => {
                self.active = Some(ScrollInterval {
                    direction: d,
                    started_at: now_ms,
                    steps_taken: 0,
                    limit,
                });
                ScrollUpdate::Started(d)
            }
        }
    }

    /// Clears the running interval.
    pub fn stop(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Number of whole steps that elapsed since the last call.
    pub fn due_steps(&mut self, now_ms: u64) -> u64 {
        let Some(active) = self.active.as_mut() else {
            return 0;
        };
        let interval = self.config.step_interval_ms.max(1);
        let total = now_ms.saturating_sub(active.started_at) / interval;
        let due = total.saturating_sub(active.steps_taken);
        active.steps_taken = active.steps_taken.max(total);
        due
    }

    /// Single step from `offset`, capped to `[0, limit]` on the scrolled axis.
    pub fn capped_step(&self, offset: Vec2) -> Vec2 {
        let Some(active) = self.active else {
            return Vec2::ZERO;
        };
        let step = self.config.step;
        match active.direction {
            ScrollDirection::Up => Vec2::new(0.0, -step.min(offset.y.max(0.0))),
            ScrollDirection::Down => Vec2::new(0.0, step.min((active.limit.y - offset.y).max(0.0))),
            ScrollDirection::Left => Vec2::new(-step.min(offset.x.max(0.0)), 0.0),
            ScrollDirection::Right => Vec2::new(step.min((active.limit.x - offset.x).max(0.0)), 0.0),
        }
    }

    /// Total capped delta for every step due at `now_ms`, starting from `offset`.
    pub fn tick(&mut self, now_ms: u64, offset: Vec2) -> Vec2 {
        let steps = self.due_steps(now_ms);
        let mut current = offset;
        for _ in 0..steps {
            let delta = self.capped_step(current);
            if delta == Vec2::ZERO {
                break;
            }
            current += delta;
        }
        current - offset
    }
}
