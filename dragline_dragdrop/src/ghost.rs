// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ghost: a visual proxy that follows the pointer instead of the dragged element.
//!
//! A ghost goes through three steps:
//!
//! 1. [`GhostManager::prepare`] styles a freshly built element (a deep clone or a
//!    template instance): no transition, absolute positioning, the configured
//!    class and inline properties.
//! 2. Listeners get a chance to veto it. A vetoed ghost is thrown away with
//!    [`GhostManager::discard`].
//! 3. [`GhostManager::mount`] appends it to the configured host (or the body)
//!    and positions it.
//!
//! Positions handed to the manager are page coordinates of the ghost's border
//! box. The inline `left`/`top` it writes are relative to the ghost's containing
//! block, so the manager subtracts the containing block origin of the host (the
//! "host offset") and the ghost's own margins.

use alloc::string::String;
use alloc::vec::Vec;

use dragline_scene::{ElementId, Position, Scene, SceneError, Transition};
use kurbo::{Point, Vec2};

/// Appearance and placement of ghosts.
#[derive(Clone, Debug, Default)]
pub struct GhostConfig {
    /// Class added to every ghost.
    pub class: Option<String>,
    /// Inline properties applied to every ghost.
    pub style: Vec<(String, String)>,
    /// Element ghosts are appended to; the body when `None`.
    pub host: Option<ElementId>,
}

/// A mounted ghost.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GhostHandle {
    /// The ghost element, owned by the manager.
    pub element: ElementId,
    /// Host it was appended to; `None` for the body.
    pub host: Option<ElementId>,
    /// Whether it was instantiated from a template rather than cloned.
    pub from_template: bool,
}

/// Owns at most one ghost.
#[derive(Clone, Debug, Default)]
pub struct GhostManager {
    config: GhostConfig,
    handle: Option<GhostHandle>,
    host_offset: Vec2,
}

impl GhostManager {
    /// Creates a manager without a ghost.
    pub fn new(config: GhostConfig) -> Self {
        Self {
            config,
            handle: None,
            host_offset: Vec2::ZERO,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// The mounted ghost.
    pub fn handle(&self) -> Option<GhostHandle> {
        self.handle
    }

    /// The mounted ghost element.
    pub fn element(&self) -> Option<ElementId> {
        self.handle.map(|h| h.element)
    }

    /// Containing block origin of the host, subtracted from page positions.
    pub fn host_offset(&self) -> Vec2 {
        self.host_offset
    }

    /// Applies ghost styling to a freshly built, detached element.
    pub fn prepare(&self, scene: &mut Scene, ghost: ElementId) -> Result<(), SceneError> {
        let style = scene.style_mut(ghost).ok_or(SceneError::StaleElement(ghost))?;
        style.transition = Transition::default();
        style.position = Position::Absolute;
        for (name, value) in &self.config.style {
            style.properties.insert(name.clone(), value.clone());
        }
        if let Some(class) = &self.config.class {
            scene.add_class(ghost, class);
        }
        Ok(())
    }

    /// Throws away a ghost that was prepared but never mounted.
    pub fn discard(&self, scene: &mut Scene, ghost: ElementId) {
        if self.handle.map(|h| h.element) == Some(ghost) {
            return;
        }
        // Detached ghosts can only fail on stale handles, which are already gone.
        let _ = scene.destroy(ghost);
    }

    /// Appends `ghost` to the host and places it at `page`.
    ///
    /// An already mounted ghost is cleared first.
    pub fn mount(
        &mut self,
        scene: &mut Scene,
        ghost: ElementId,
        from_template: bool,
        page: Point,
    ) -> Result<GhostHandle, SceneError> {
        self.clear(scene);
        let host = self.config.host.filter(|h| scene.is_connected(*h));
        let parent = host.unwrap_or(scene.body());
        scene.append_child(parent, ghost)?;
        self.host_offset = scene
            .containing_block_origin(parent)
            .map(|p| p.to_vec2())
            .unwrap_or(Vec2::ZERO);
        let handle = GhostHandle {
            element: ghost,
            host,
            from_template,
        };
        self.handle = Some(handle);
        self.set_page_position(scene, page);
        #[cfg(feature = "tracing")]
        tracing::debug!(ghost = ?ghost, ?page, from_template, "ghost mounted");
        Ok(handle)
    }

    /// Moves the ghost so that its border box starts at `page`.
    pub fn set_page_position(&self, scene: &mut Scene, page: Point) {
        let Some(ghost) = self.element() else {
            return;
        };
        let host_offset = self.host_offset;
        if let Some(style) = scene.style_mut(ghost) {
            style.left = page.x - style.margin.x0 - host_offset.x;
            style.top = page.y - style.margin.y0 - host_offset.y;
        }
    }

    /// Inline `left`/`top` plus the host offset. Margins are not included.
    pub fn page_position(&self, scene: &Scene) -> Option<Point> {
        let style = scene.style(self.element()?)?;
        Some(Point::new(style.left, style.top) + self.host_offset)
    }

    /// Shifts the ghost by `delta`.
    pub fn shift(&self, scene: &mut Scene, delta: Vec2) {
        let Some(ghost) = self.element() else {
            return;
        };
        if let Some(style) = scene.style_mut(ghost) {
            style.left += delta.x;
            style.top += delta.y;
        }
    }

    /// Sets the ghost's transition.
    pub fn set_transition(&self, scene: &mut Scene, transition: Transition) {
        if let Some(style) = self.element().and_then(|g| scene.style_mut(g)) {
            style.transition = transition;
        }
    }

    /// Re-appends a ghost that was removed from the document behind our back.
    ///
    /// Returns `true` if the ghost had to be re-attached.
    pub fn reattach(&mut self, scene: &mut Scene) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        if !scene.is_alive(handle.element) || scene.is_connected(handle.element) {
            return false;
        }
        let parent = handle
            .host
            .filter(|h| scene.is_connected(*h))
            .unwrap_or(scene.body());
        scene.append_child(parent, handle.element).is_ok()
    }

    /// Removes and frees the ghost. Calling it without a ghost does nothing.
    pub fn clear(&mut self, scene: &mut Scene) -> Option<GhostHandle> {
        let handle = self.handle.take()?;
        // A ghost destroyed by someone else is already gone.
        let _ = scene.destroy(handle.element);
        self.host_offset = Vec2::ZERO;
        #[cfg(feature = "tracing")]
        tracing::debug!(ghost = ?handle.element, "ghost cleared");
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use kurbo::{Insets, Rect, Size};

    fn scene_with_source() -> (Scene, ElementId) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let source = scene.create_element("div");
        scene.set_bounds(source, Rect::new(100.0, 100.0, 150.0, 130.0)).unwrap();
        scene.append_child(scene.body(), source).unwrap();
        (scene, source)
    }

    #[test]
    fn prepare_applies_configured_look() {
        let (mut scene, source) = scene_with_source();
        scene.style_mut(source).unwrap().transition.property = "left".to_string();
        scene.style_mut(source).unwrap().transition.duration = 1.0;
        let manager = GhostManager::new(GhostConfig {
            class: Some("ghost".to_string()),
            style: vec![("opacity".to_string(), "0.5".to_string())],
            host: None,
        });
        let ghost = scene.deep_clone(source).unwrap();
        manager.prepare(&mut scene, ghost).unwrap();

        let style = scene.style(ghost).unwrap();
        assert_eq!(style.position, Position::Absolute);
        assert!(!style.transition.is_animated());
        assert_eq!(style.properties.get("opacity").map(String::as_str), Some("0.5"));
        assert!(scene.has_class(ghost, "ghost"));
    }

    #[test]
    fn mount_positions_border_box_at_page_point() {
        let (mut scene, source) = scene_with_source();
        let mut manager = GhostManager::default();
        let ghost = scene.deep_clone(source).unwrap();
        manager.prepare(&mut scene, ghost).unwrap();
        scene.style_mut(ghost).unwrap().margin = Insets::new(4.0, 2.0, 0.0, 0.0);
        manager.mount(&mut scene, ghost, false, Point::new(108.0, 101.0)).unwrap();

        assert_eq!(scene.page_origin(ghost), Some(Point::new(108.0, 101.0)));
        assert_eq!(scene.style(ghost).unwrap().left, 104.0);
        // The accessor reports inline left/top plus the host offset, without margins.
        assert_eq!(manager.page_position(&scene), Some(Point::new(104.0, 99.0)));
    }

    #[test]
    fn positioned_host_offsets_left_and_top() {
        let (mut scene, source) = scene_with_source();
        let host = scene.create_element("section");
        scene.set_bounds(host, Rect::new(50.0, 40.0, 450.0, 440.0)).unwrap();
        scene.style_mut(host).unwrap().position = Position::Relative;
        scene.append_child(scene.body(), host).unwrap();

        let mut manager = GhostManager::new(GhostConfig {
            host: Some(host),
            ..GhostConfig::default()
        });
        let ghost = scene.deep_clone(source).unwrap();
        manager.prepare(&mut scene, ghost).unwrap();
        let handle = manager.mount(&mut scene, ghost, false, Point::new(200.0, 200.0)).unwrap();

        assert_eq!(handle.host, Some(host));
        assert_eq!(manager.host_offset(), Vec2::new(50.0, 40.0));
        assert_eq!(scene.style(ghost).unwrap().left, 150.0);
        assert_eq!(scene.page_origin(ghost), Some(Point::new(200.0, 200.0)));
        assert_eq!(manager.page_position(&scene), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn clear_is_idempotent() {
        let (mut scene, source) = scene_with_source();
        let mut manager = GhostManager::default();
        let ghost = scene.deep_clone(source).unwrap();
        manager.prepare(&mut scene, ghost).unwrap();
        manager.mount(&mut scene, ghost, false, Point::ZERO).unwrap();

        assert!(manager.clear(&mut scene).is_some());
        assert!(!scene.is_alive(ghost));
        assert!(manager.clear(&mut scene).is_none());
        assert!(manager.element().is_none());
    }

    #[test]
    fn discarded_ghost_is_freed() {
        let (mut scene, source) = scene_with_source();
        let manager = GhostManager::default();
        let ghost = scene.deep_clone(source).unwrap();
        manager.discard(&mut scene, ghost);
        assert!(!scene.is_alive(ghost));
    }

    #[test]
    fn reattach_restores_detached_ghost() {
        let (mut scene, source) = scene_with_source();
        let mut manager = GhostManager::default();
        let ghost = scene.deep_clone(source).unwrap();
        manager.mount(&mut scene, ghost, false, Point::ZERO).unwrap();
        assert!(!manager.reattach(&mut scene));
        scene.detach(ghost).unwrap();
        assert!(manager.reattach(&mut scene));
        assert!(scene.is_connected(ghost));
    }
}
