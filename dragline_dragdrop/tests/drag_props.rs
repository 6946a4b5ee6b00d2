// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for drags driven by arbitrary pointer paths.

use std::cell::RefCell;
use std::rc::Rc;

use dragline_dragdrop::{DragConfig, DragDirective, DragSignal, DropConfig, DropRegistry};
use dragline_event_state::drag::{DragAxis, DragPhase};
use dragline_event_state::pointer::{InputEvent, InputModality, InputPhase};
use dragline_scene::{ElementId, Scene};
use kurbo::{Point, Rect, Size, Vec2};
use proptest::prelude::*;

fn send(
    scene: &mut Scene,
    zones: &mut DropRegistry<()>,
    drag: &mut DragDirective<()>,
    now: u64,
    phase: InputPhase,
    page: Point,
) {
    drag.on_animation_frame(scene, now);
    let target = scene.pointer_capture(1).unwrap_or(drag.element());
    let mut event = InputEvent::pointer(phase, target, page, 1);
    drag.handle_input(scene, zones, &mut event);
    for lost in scene.take_lost_captures() {
        let mut event = InputEvent::pointer(InputPhase::LostCapture, lost.element, page, lost.pointer_id);
        drag.handle_input(scene, zones, &mut event);
    }
}

fn boxed(scene: &mut Scene, parent: ElementId, bounds: Rect) -> ElementId {
    let el = scene.create_element("div");
    scene.set_bounds(el, bounds).unwrap();
    scene.append_child(parent, el).unwrap();
    el
}

proptest! {
    /// While a container auto-scrolls under a directly dragged element, the
    /// element keeps its offset to the pointer and the scroll stays in range.
    #[test]
    fn direct_drag_follows_pointer_through_container_scroll(
        content in 200.0_f64..1_000.0,
        path in proptest::collection::vec((1.0_f64..199.0, 1.0_f64..199.0, 1_u64..80), 1..30),
    ) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let body = scene.body();
        let list = boxed(&mut scene, body, Rect::new(0.0, 0.0, 200.0, 200.0));
        scene.make_scroll_container(list, Size::new(200.0, content)).unwrap();
        let item = boxed(&mut scene, list, Rect::new(0.0, 0.0, 200.0, 40.0));
        let mut zones = DropRegistry::new();
        let config = DragConfig {
            ghost: false,
            scroll_container: Some(list),
            ..DragConfig::default()
        };
        let mut drag = DragDirective::attach(&mut scene, item, config, InputModality::Pointer);
        let grab = Vec2::new(-100.0, -20.0);
        let max = scene.max_scroll(list);

        let mut now = 16;
        send(&mut scene, &mut zones, &mut drag, now, InputPhase::Down, Point::new(100.0, 20.0));
        let mut pointer = Point::new(100.0, 20.0);
        for (x, y, dt) in path {
            now += dt.max(16);
            let page = Point::new(x, y);
            send(&mut scene, &mut zones, &mut drag, now, InputPhase::Move, page);
            if drag.phase() == DragPhase::Dragging {
                pointer = page;
            }
            let offset = scene.scroll_offset(list);
            prop_assert!(offset.y >= 0.0 && offset.y <= max.y + 1e-9);
            // Frames without a move scroll content and element together.
            drag.on_animation_frame(&mut scene, now + 8);
            let origin = scene.page_origin(item).unwrap();
            prop_assert!((origin - (pointer + grab)).hypot() < 1e-6, "item at {origin:?}, pointer {pointer:?}");
        }
    }

    /// Zones see a well formed signal sequence: enter, any overs, an optional
    /// drop, then leave. Nothing stays marked as dragged over.
    #[test]
    fn zone_signals_are_balanced(
        path in proptest::collection::vec((0.0_f64..600.0, 0.0_f64..120.0), 1..40),
    ) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let body = scene.body();
        let source = boxed(&mut scene, body, Rect::new(700.0, 500.0, 750.0, 530.0));
        let mut zones = DropRegistry::<()>::new();
        let mut logs = Vec::new();
        let mut ids = Vec::new();
        for x in [0.0, 200.0, 400.0] {
            let el = boxed(&mut scene, body, Rect::new(x, 0.0, x + 200.0, 100.0));
            let id = zones.attach(&mut scene, el, DropConfig::default());
            let log = Rc::new(RefCell::new(Vec::new()));
            let events = &mut zones.zone_mut(id).unwrap().events;
            for (signal, emitter) in [
                (DragSignal::Enter, &mut events.enter),
                (DragSignal::Over, &mut events.over),
                (DragSignal::Leave, &mut events.leave),
            ] {
                let log = log.clone();
                emitter.subscribe(move |_| log.borrow_mut().push(signal));
            }
            let drops = log.clone();
            events.dropped.subscribe(move |_| drops.borrow_mut().push(DragSignal::Drop));
            logs.push(log);
            ids.push(id);
        }
        let mut drag = DragDirective::attach(&mut scene, source, DragConfig::default(), InputModality::Pointer);

        let mut now = 16;
        send(&mut scene, &mut zones, &mut drag, now, InputPhase::Down, Point::new(710.0, 510.0));
        let mut last = Point::new(710.0, 510.0);
        for (x, y) in path {
            now += 16;
            last = Point::new(x, y);
            send(&mut scene, &mut zones, &mut drag, now, InputPhase::Move, last);
        }
        send(&mut scene, &mut zones, &mut drag, now + 16, InputPhase::Up, last);

        for (log, id) in logs.iter().zip(&ids) {
            let mut inside = false;
            let mut dropped = false;
            for signal in log.borrow().iter() {
                match signal {
                    DragSignal::Enter => {
                        prop_assert!(!inside);
                        inside = true;
                    }
                    DragSignal::Over => prop_assert!(inside),
                    DragSignal::Drop => {
                        prop_assert!(inside && !dropped);
                        dropped = true;
                    }
                    DragSignal::Leave => {
                        prop_assert!(inside);
                        inside = false;
                    }
                }
            }
            prop_assert!(!inside);
            prop_assert!(!zones.zone(*id).unwrap().dragover());
        }
        prop_assert!(drag.ghost_element().is_none());
    }

    /// A horizontally constrained ghost never leaves its starting row.
    #[test]
    fn horizontal_axis_pins_ghost_row(
        path in proptest::collection::vec((0.0_f64..800.0, 0.0_f64..600.0), 1..30),
    ) {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let body = scene.body();
        let source = boxed(&mut scene, body, Rect::new(300.0, 300.0, 350.0, 330.0));
        let mut zones = DropRegistry::new();
        let config = DragConfig {
            axis: DragAxis::Horizontal,
            tolerance: 0.0,
            ..DragConfig::default()
        };
        let mut drag = DragDirective::attach(&mut scene, source, config, InputModality::Pointer);

        let mut now = 16;
        send(&mut scene, &mut zones, &mut drag, now, InputPhase::Down, Point::new(310.0, 310.0));
        for (x, y) in path {
            now += 16;
            send(&mut scene, &mut zones, &mut drag, now, InputPhase::Move, Point::new(x, y));
            if let Some(ghost) = drag.ghost_element() {
                prop_assert_eq!(scene.page_origin(ghost).map(|p| p.y), Some(300.0));
            }
        }
    }
}
