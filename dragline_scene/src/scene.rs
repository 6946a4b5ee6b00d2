// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element arena: structure, geometry, style, scrolling and pointer capture.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};

use crate::error::SceneError;
use crate::types::{ElementFlags, ElementId, Position, ScrollState, Style};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ChildList {
    Light,
    Shadow,
}

#[derive(Clone, Debug)]
pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) parent: Option<(ElementId, ChildList)>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) shadow_root: Option<Vec<ElementId>>,
    pub(crate) bounds: Rect,
    pub(crate) z_index: i32,
    pub(crate) flags: ElementFlags,
    pub(crate) style: Style,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) text: Option<String>,
    pub(crate) scroll: Option<ScrollState>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            bounds: Rect::ZERO,
            z_index: 0,
            flags: ElementFlags::default(),
            style: Style::default(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            text: None,
            scroll: None,
        }
    }

    /// Copy of everything except tree links.
    fn detached_copy(&self) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            shadow_root: self.shadow_root.as_ref().map(|_| Vec::new()),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// A pointer capture that ended without the holder releasing it explicitly.
///
/// Hosts drain these with [`Scene::take_lost_captures`] and forward them as
/// lost-capture input to whoever listens on `element`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LostCapture {
    /// Pointer whose capture was lost.
    pub pointer_id: u32,
    /// Element that held the capture.
    pub element: ElementId,
}

/// Headless document: an arena of elements plus window state.
#[derive(Clone, Debug)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    body: ElementId,
    viewport: Size,
    document_size: Size,
    window_scroll: Vec2,
    captures: Vec<(u32, ElementId)>,
    lost_captures: Vec<LostCapture>,
}

impl Scene {
    /// Creates a document whose body covers `viewport`.
    pub fn new(viewport: Size) -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: ElementId::new(0, 1),
            viewport,
            document_size: viewport,
            window_scroll: Vec2::ZERO,
            captures: Vec::new(),
            lost_captures: Vec::new(),
        };
        let mut body = Element::new("body");
        body.bounds = Rect::from_origin_size(Point::ZERO, viewport);
        scene.body = scene.allocate(body);
        scene
    }

    /// The document body; the root of every connected element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    fn allocate(&mut self, element: Element) -> ElementId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            ElementId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
            });
            ElementId::new(idx, 1)
        }
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.element.as_ref()
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.element.as_mut()
    }

    fn live(&self, id: ElementId) -> Result<&Element, SceneError> {
        self.get(id).ok_or(SceneError::StaleElement(id))
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Creates a detached element with the given tag.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.allocate(Element::new(tag))
    }

    /// Tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    // --- structure -------------------------------------------------------

    /// Parent of `id`. For direct shadow children this is the shadow host.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent.map(|(p, _)| p)
    }

    /// Light (non-shadow) parent of `id`, i.e. `parentElement`.
    pub fn parent_element(&self, id: ElementId) -> Option<ElementId> {
        match self.get(id)?.parent {
            Some((p, ChildList::Light)) => Some(p),
            _ => None,
        }
    }

    /// Host of the shadow root `id` is a direct child of.
    pub fn shadow_host_of(&self, id: ElementId) -> Option<ElementId> {
        match self.get(id)?.parent {
            Some((p, ChildList::Shadow)) => Some(p),
            _ => None,
        }
    }

    /// Light children in document order. Empty for stale handles.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Children of the shadow root attached to `id`, if any.
    pub fn shadow_children(&self, id: ElementId) -> Option<&[ElementId]> {
        self.get(id)?.shadow_root.as_deref()
    }

    /// Position of `child` within the light children of `parent`.
    pub fn index_of(&self, parent: ElementId, child: ElementId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants,
    /// crossing shadow boundaries.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return self.is_alive(id);
            }
            cur = self.parent(id);
        }
        false
    }

    /// Returns `true` if `id` is reachable from the body.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.contains(self.body, id)
    }

    fn unlink(&mut self, id: ElementId) {
        let Some((parent, list)) = self.get(id).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            let siblings = match list {
                ChildList::Light => Some(&mut p.children),
                ChildList::Shadow => p.shadow_root.as_mut(),
            };
            if let Some(siblings) = siblings {
                siblings.retain(|&c| c != id);
            }
        }
        if let Some(e) = self.get_mut(id) {
            e.parent = None;
        }
    }

    fn check_insert(&self, parent: ElementId, child: ElementId) -> Result<(), SceneError> {
        self.live(parent)?;
        self.live(child)?;
        if child == self.body || self.contains(child, parent) {
            return Err(SceneError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Appends `child` as the last light child of `parent`, moving it if needed.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), SceneError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` before `reference` (or last when `None`) among the light
    /// children of `parent`, moving it if needed.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> Result<(), SceneError> {
        self.check_insert(parent, child)?;
        if reference == Some(child) {
            return Ok(());
        }
        if let Some(r) = reference {
            if self.parent_element(r) != Some(parent) {
                return Err(SceneError::NotAChild { parent, child: r });
            }
        }
        self.unlink(child);
        let p = self.get_mut(parent).ok_or(SceneError::StaleElement(parent))?;
        let at = reference
            .and_then(|r| p.children.iter().position(|&c| c == r))
            .unwrap_or(p.children.len());
        p.children.insert(at, child);
        if let Some(c) = self.get_mut(child) {
            c.parent = Some((parent, ChildList::Light));
        }
        self.release_disconnected_captures();
        Ok(())
    }

    /// Removes `id` from its parent. The subtree stays alive and can be re-inserted.
    pub fn detach(&mut self, id: ElementId) -> Result<(), SceneError> {
        self.live(id)?;
        if id == self.body {
            return Err(SceneError::HierarchyRequest {
                parent: id,
                child: id,
            });
        }
        self.unlink(id);
        self.release_disconnected_captures();
        #[cfg(feature = "tracing")]
        tracing::trace!(element = ?id, "element detached");
        Ok(())
    }

    /// Detaches `id` and frees it together with its whole subtree.
    pub fn destroy(&mut self, id: ElementId) -> Result<(), SceneError> {
        self.detach(id)?;
        let mut stack = Vec::from([id]);
        while let Some(cur) = stack.pop() {
            let slot = &mut self.slots[cur.idx()];
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
                stack.extend(element.shadow_root.into_iter().flatten());
                self.free.push(cur.0);
            }
        }
        self.release_disconnected_captures();
        Ok(())
    }

    /// Attaches an (empty) shadow root to `host`. Idempotent.
    pub fn attach_shadow(&mut self, host: ElementId) -> Result<(), SceneError> {
        let e = self.get_mut(host).ok_or(SceneError::StaleElement(host))?;
        if e.shadow_root.is_none() {
            e.shadow_root = Some(Vec::new());
        }
        Ok(())
    }

    /// Appends `child` to the shadow root of `host`.
    pub fn append_shadow_child(
        &mut self,
        host: ElementId,
        child: ElementId,
    ) -> Result<(), SceneError> {
        self.check_insert(host, child)?;
        if self.live(host)?.shadow_root.is_none() {
            return Err(SceneError::NoShadowRoot(host));
        }
        self.unlink(child);
        if let Some(root) = self.get_mut(host).and_then(|h| h.shadow_root.as_mut()) {
            root.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some((host, ChildList::Shadow));
        }
        self.release_disconnected_captures();
        Ok(())
    }

    /// Deep-clones `id` (light children and shadow content) into a detached subtree.
    pub fn deep_clone(&mut self, id: ElementId) -> Option<ElementId> {
        let source = self.get(id)?;
        let copy = source.detached_copy();
        let children = source.children.clone();
        let shadow = source.shadow_root.clone();
        let root = self.allocate(copy);
        for child in children {
            if let Some(c) = self.deep_clone(child) {
                self.append_child(root, c).ok()?;
            }
        }
        for child in shadow.into_iter().flatten() {
            if let Some(c) = self.deep_clone(child) {
                self.append_shadow_child(root, c).ok()?;
            }
        }
        Some(root)
    }

    // --- attributes, classes, text ----------------------------------------

    /// Sets an attribute.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        e.attributes.insert(name.to_string(), value.to_string());
        true
    }

    /// Reads an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?.attributes.get(name).map(String::as_str)
    }

    /// Removes an attribute, returning the previous value.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Option<String> {
        self.get_mut(id)?.attributes.remove(name)
    }

    /// Adds a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        if !e.classes.iter().any(|c| c == class) {
            e.classes.push(class.to_string());
        }
        true
    }

    /// Removes a class. Returns `true` if it was present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        let before = e.classes.len();
        e.classes.retain(|c| c != class);
        before != e.classes.len()
    }

    /// Returns `true` if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// Classes in insertion order.
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.get(id).map(|e| e.classes.as_slice()).unwrap_or(&[])
    }

    /// Replaces the text content of an element.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        e.text = Some(text.to_string());
        true
    }

    /// Text content, if any was set.
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id)?.text.as_deref()
    }

    /// Updates visibility/picking flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        e.flags = flags;
        true
    }

    /// Current flags.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.get(id).map(|e| e.flags)
    }

    /// Sets the stacking order among painted elements. Higher is on top.
    pub fn set_z_index(&mut self, id: ElementId, z: i32) -> bool {
        let Some(e) = self.get_mut(id) else {
            return false;
        };
        e.z_index = z;
        true
    }

    // --- style and geometry ------------------------------------------------

    /// Inline style.
    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.get(id).map(|e| &e.style)
    }

    /// Mutable inline style.
    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut Style> {
        self.get_mut(id).map(|e| &mut e.style)
    }

    /// Sets local bounds, relative to the parent content origin.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), SceneError> {
        let e = self.get_mut(id).ok_or(SceneError::StaleElement(id))?;
        e.bounds = bounds;
        Ok(())
    }

    /// Local bounds.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|e| e.bounds)
    }

    /// Size of the element box (`offsetWidth`/`offsetHeight`).
    pub fn size(&self, id: ElementId) -> Option<Size> {
        self.bounds(id).map(|b| b.size())
    }

    /// Document-space origin of the element box.
    pub fn page_origin(&self, id: ElementId) -> Option<Point> {
        let e = self.get(id)?;
        let parent = e.parent.map(|(p, _)| p);
        let style = &e.style;
        let origin = match style.position {
            Position::Absolute => {
                let cb = match parent {
                    Some(p) => self.containing_block_origin(p)?,
                    None => Point::ZERO,
                };
                cb + Vec2::new(style.left + style.margin.x0, style.top + style.margin.y0)
            }
            Position::Relative | Position::Static => {
                let base = match parent {
                    Some(p) => self.content_origin(p)?,
                    None => Point::ZERO,
                };
                let mut origin = base + e.bounds.origin().to_vec2();
                if style.position == Position::Relative {
                    origin += Vec2::new(style.left, style.top);
                }
                origin
            }
        };
        Some(origin + style.translate)
    }

    /// Origin that children are laid out against: page origin minus own scroll.
    pub fn content_origin(&self, id: ElementId) -> Option<Point> {
        Some(self.page_origin(id)? - self.scroll_offset(id))
    }

    /// Origin absolutely positioned children of `id` are placed against: the
    /// content origin of the nearest positioned ancestor-or-self, or of the body.
    pub fn containing_block_origin(&self, id: ElementId) -> Option<Point> {
        let mut cur = id;
        loop {
            let e = self.get(cur)?;
            if e.style.position != Position::Static || cur == self.body {
                return self.content_origin(cur);
            }
            match e.parent {
                Some((p, _)) => cur = p,
                None => return self.content_origin(cur),
            }
        }
    }

    /// Document-space rectangle of the element box.
    pub fn page_rect(&self, id: ElementId) -> Option<Rect> {
        let size = self.size(id)?;
        Some(Rect::from_origin_size(self.page_origin(id)?, size))
    }

    /// Viewport-space rectangle (`getBoundingClientRect`).
    pub fn client_rect(&self, id: ElementId) -> Option<Rect> {
        Some(self.page_rect(id)? - self.window_scroll)
    }

    // --- scrolling ---------------------------------------------------------

    /// Turns `id` into a scroll container with the given content extent.
    pub fn make_scroll_container(&mut self, id: ElementId, content: Size) -> Result<(), SceneError> {
        let e = self.get_mut(id).ok_or(SceneError::StaleElement(id))?;
        let offset = e.scroll.map(|s| s.offset).unwrap_or(Vec2::ZERO);
        e.scroll = Some(ScrollState { offset, content });
        let clamped = self.clamp_scroll(id, offset);
        if let Some(s) = self.get_mut(id).and_then(|e| e.scroll.as_mut()) {
            s.offset = clamped;
        }
        Ok(())
    }

    /// Scroll state, if `id` is a scroll container.
    pub fn scroll_state(&self, id: ElementId) -> Option<ScrollState> {
        self.get(id)?.scroll
    }

    /// Scroll offset; zero for elements that do not scroll.
    pub fn scroll_offset(&self, id: ElementId) -> Vec2 {
        self.scroll_state(id).map(|s| s.offset).unwrap_or(Vec2::ZERO)
    }

    /// Largest reachable scroll offset of a scroll container.
    pub fn max_scroll(&self, id: ElementId) -> Vec2 {
        match (self.scroll_state(id), self.size(id)) {
            (Some(s), Some(client)) => Vec2::new(
                (s.content.width - client.width).max(0.0),
                (s.content.height - client.height).max(0.0),
            ),
            _ => Vec2::ZERO,
        }
    }

    fn clamp_scroll(&self, id: ElementId, offset: Vec2) -> Vec2 {
        let max = self.max_scroll(id);
        Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y))
    }

    /// Sets the scroll offset of a container, clamped to its extent. Returns the applied offset.
    pub fn set_scroll_offset(&mut self, id: ElementId, offset: Vec2) -> Option<Vec2> {
        let clamped = self.clamp_scroll(id, offset);
        let state = self.get_mut(id)?.scroll.as_mut()?;
        state.offset = clamped;
        Some(clamped)
    }

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resizes the viewport; the window scroll is re-clamped.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.set_window_scroll(self.window_scroll);
    }

    /// Scrollable document size (`scrollWidth`/`scrollHeight` of the root).
    pub fn document_size(&self) -> Size {
        self.document_size
    }

    /// Sets the scrollable document size; the window scroll is re-clamped.
    pub fn set_document_size(&mut self, size: Size) {
        self.document_size = size;
        self.set_window_scroll(self.window_scroll);
    }

    /// Window scroll offset.
    pub fn window_scroll(&self) -> Vec2 {
        self.window_scroll
    }

    /// Largest reachable window scroll offset.
    pub fn max_window_scroll(&self) -> Vec2 {
        Vec2::new(
            (self.document_size.width - self.viewport.width).max(0.0),
            (self.document_size.height - self.viewport.height).max(0.0),
        )
    }

    /// Sets the window scroll offset, clamped. Returns the applied offset.
    pub fn set_window_scroll(&mut self, offset: Vec2) -> Vec2 {
        let max = self.max_window_scroll();
        self.window_scroll = Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        self.window_scroll
    }

    /// Scrolls the window by `delta`, returning the delta actually applied.
    pub fn scroll_window_by(&mut self, delta: Vec2) -> Vec2 {
        let before = self.window_scroll;
        self.set_window_scroll(before + delta) - before
    }

    // --- pointer capture -----------------------------------------------------

    /// Routes `pointer_id` to `id` until released. The previous holder, if any,
    /// loses capture.
    pub fn set_pointer_capture(&mut self, id: ElementId, pointer_id: u32) -> Result<(), SceneError> {
        self.live(id)?;
        if !self.is_connected(id) {
            return Err(SceneError::NotConnected(id));
        }
        if let Some(slot) = self.captures.iter_mut().find(|(p, _)| *p == pointer_id) {
            let previous = slot.1;
            slot.1 = id;
            if previous != id {
                self.lost_captures.push(LostCapture {
                    pointer_id,
                    element: previous,
                });
            }
        } else {
            self.captures.push((pointer_id, id));
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(element = ?id, pointer_id, "pointer captured");
        Ok(())
    }

    /// Releases capture of `pointer_id`, returning the former holder.
    pub fn release_pointer_capture(&mut self, pointer_id: u32) -> Option<ElementId> {
        let at = self.captures.iter().position(|(p, _)| *p == pointer_id)?;
        let (_, element) = self.captures.remove(at);
        self.lost_captures.push(LostCapture {
            pointer_id,
            element,
        });
        Some(element)
    }

    /// Current capture holder of `pointer_id`.
    pub fn pointer_capture(&self, pointer_id: u32) -> Option<ElementId> {
        self.captures
            .iter()
            .find(|(p, _)| *p == pointer_id)
            .map(|&(_, e)| e)
    }

    /// Drains lost captures recorded since the last call.
    pub fn take_lost_captures(&mut self) -> Vec<LostCapture> {
        core::mem::take(&mut self.lost_captures)
    }

    fn release_disconnected_captures(&mut self) {
        let mut i = 0;
        while i < self.captures.len() {
            let (pointer_id, element) = self.captures[i];
            if self.is_connected(element) {
                i += 1;
            } else {
                self.captures.remove(i);
                self.lost_captures.push(LostCapture {
                    pointer_id,
                    element,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn scene_with_box(bounds: Rect) -> (Scene, ElementId) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let el = scene.create_element("div");
        scene.set_bounds(el, bounds).unwrap();
        scene.append_child(scene.body(), el).unwrap();
        (scene, el)
    }

    #[test]
    fn stale_ids_do_not_alias_reused_slots() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        let a = scene.create_element("a");
        scene.destroy(a).unwrap();
        let b = scene.create_element("b");
        assert!(!scene.is_alive(a));
        assert!(scene.is_alive(b));
        assert_eq!(a.0, b.0, "slot should be reused");
        assert_eq!(scene.tag(a), None);
    }

    #[test]
    fn page_rect_accumulates_parent_origins_and_translate() {
        let (mut scene, outer) = scene_with_box(Rect::new(50.0, 40.0, 250.0, 240.0));
        let inner = scene.create_element("span");
        scene.set_bounds(inner, Rect::new(10.0, 5.0, 30.0, 25.0)).unwrap();
        scene.append_child(outer, inner).unwrap();
        scene.style_mut(inner).unwrap().translate = Vec2::new(3.0, 4.0);

        assert_eq!(scene.page_rect(inner), Some(Rect::new(63.0, 49.0, 83.0, 69.0)));
    }

    #[test]
    fn client_rect_subtracts_window_scroll() {
        let (mut scene, el) = scene_with_box(Rect::new(100.0, 100.0, 200.0, 200.0));
        scene.set_document_size(Size::new(800.0, 2000.0));
        scene.set_window_scroll(Vec2::new(0.0, 50.0));
        assert_eq!(scene.client_rect(el), Some(Rect::new(100.0, 50.0, 200.0, 150.0)));
    }

    #[test]
    fn absolute_children_use_nearest_positioned_ancestor() {
        let (mut scene, host) = scene_with_box(Rect::new(100.0, 60.0, 300.0, 260.0));
        let ghost = scene.create_element("div");
        scene.set_bounds(ghost, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        {
            let s = scene.style_mut(ghost).unwrap();
            s.position = Position::Absolute;
            s.left = 10.0;
            s.top = 15.0;
        }
        scene.append_child(host, ghost).unwrap();
        // Static host: positioned against the body.
        assert_eq!(scene.page_origin(ghost), Some(Point::new(10.0, 15.0)));

        scene.style_mut(host).unwrap().position = Position::Relative;
        assert_eq!(scene.page_origin(ghost), Some(Point::new(110.0, 75.0)));
        assert_eq!(scene.containing_block_origin(host), Some(Point::new(100.0, 60.0)));
    }

    #[test]
    fn absolute_position_includes_margins() {
        let (mut scene, el) = scene_with_box(Rect::new(0.0, 0.0, 20.0, 20.0));
        let s = scene.style_mut(el).unwrap();
        s.position = Position::Absolute;
        s.left = 40.0;
        s.top = 30.0;
        s.margin = kurbo::Insets::new(5.0, 6.0, 0.0, 0.0);
        assert_eq!(scene.page_origin(el), Some(Point::new(45.0, 36.0)));
    }

    #[test]
    fn scroll_containers_shift_content_and_clamp() {
        let (mut scene, list) = scene_with_box(Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.make_scroll_container(list, Size::new(100.0, 400.0)).unwrap();
        let item = scene.create_element("li");
        scene.set_bounds(item, Rect::new(0.0, 150.0, 100.0, 180.0)).unwrap();
        scene.append_child(list, item).unwrap();

        assert_eq!(scene.set_scroll_offset(list, Vec2::new(0.0, 120.0)), Some(Vec2::new(0.0, 120.0)));
        assert_eq!(scene.page_origin(item), Some(Point::new(0.0, 30.0)));
        assert_eq!(scene.set_scroll_offset(list, Vec2::new(-5.0, 900.0)), Some(Vec2::new(0.0, 300.0)));
    }

    #[test]
    fn window_scroll_is_clamped_to_document() {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        scene.set_document_size(Size::new(1000.0, 1000.0));
        assert_eq!(scene.scroll_window_by(Vec2::new(500.0, 500.0)), Vec2::new(200.0, 400.0));
        assert_eq!(scene.scroll_window_by(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn append_rejects_cycles_and_body() {
        let (mut scene, a) = scene_with_box(Rect::ZERO);
        let b = scene.create_element("b");
        scene.append_child(a, b).unwrap();
        assert_eq!(
            scene.append_child(b, a),
            Err(SceneError::HierarchyRequest { parent: b, child: a })
        );
        let body = scene.body();
        assert!(scene.append_child(a, body).is_err());
        assert!(scene.detach(body).is_err());
    }

    #[test]
    fn insert_before_moves_existing_child() {
        let (mut scene, list) = scene_with_box(Rect::ZERO);
        let items: Vec<ElementId> = (0..3).map(|_| scene.create_element("li")).collect();
        for &i in &items {
            scene.append_child(list, i).unwrap();
        }
        scene.insert_before(list, items[2], Some(items[0])).unwrap();
        assert_eq!(scene.children(list), &[items[2], items[0], items[1]]);
        let stranger = scene.create_element("li");
        assert!(matches!(
            scene.insert_before(list, items[0], Some(stranger)),
            Err(SceneError::NotAChild { .. })
        ));
    }

    #[test]
    fn deep_clone_copies_subtree_detached() {
        let (mut scene, card) = scene_with_box(Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.add_class(card, "card");
        let label = scene.create_element("span");
        scene.set_text(label, "hello");
        scene.append_child(card, label).unwrap();

        let copy = scene.deep_clone(card).unwrap();
        assert!(!scene.is_connected(copy));
        assert!(scene.has_class(copy, "card"));
        let copied_label = scene.children(copy)[0];
        assert_ne!(copied_label, label);
        assert_eq!(scene.text(copied_label), Some("hello"));
    }

    #[test]
    fn destroying_captured_element_records_lost_capture() {
        let (mut scene, el) = scene_with_box(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.set_pointer_capture(el, 7).unwrap();
        scene.destroy(el).unwrap();
        assert_eq!(scene.pointer_capture(7), None);
        assert_eq!(
            scene.take_lost_captures(),
            vec![LostCapture {
                pointer_id: 7,
                element: el
            }]
        );
        assert!(scene.take_lost_captures().is_empty());
    }

    #[test]
    fn capture_moves_between_elements() {
        let (mut scene, a) = scene_with_box(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = scene.create_element("b");
        assert_eq!(scene.set_pointer_capture(b, 1), Err(SceneError::NotConnected(b)));
        scene.append_child(scene.body(), b).unwrap();
        scene.set_pointer_capture(a, 1).unwrap();
        scene.set_pointer_capture(b, 1).unwrap();
        assert_eq!(scene.pointer_capture(1), Some(b));
        assert_eq!(scene.take_lost_captures()[0].element, a);
    }
}
