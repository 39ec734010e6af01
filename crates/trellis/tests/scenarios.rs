//! End-to-end scenarios driven through the headless host.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use common::{settle, slider, toggle, window, Recorder};
use trellis::render::Color;
use trellis::style::{keys, Fill, Style};
use trellis::{
    Area, Capability, Event, EventType, HeadlessHost, HostEvent, MouseButton, Point, WidgetBuilder,
};

fn push(window: &mut trellis::Window, event: HostEvent) {
    window
        .host_as_mut::<HeadlessHost>()
        .expect("headless host")
        .push_event(event);
}

#[test]
fn button_click_shows_label() {
    let mut w = window(200, 100);
    let root = w.root();
    let label = w.create(
        WidgetBuilder::new("label")
            .with_area(Area::new(10.0, 10.0, 50.0, 20.0))
            .with_style(Style::new().with(keys::background(), Fill::Solid(Color::GREEN)))
            .hidden(),
    );
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    let button = w.create(toggle("button").with_area(Area::new(70.0, 40.0, 60.0, 20.0)).with_callback(
        EventType::VALUE_CHANGED,
        move |window, event| {
            counter.set(counter.get() + 1);
            let on = match event {
                Event::ValueChanged(e) => e.value::<bool>().copied().unwrap_or(false),
                _ => false,
            };
            let result = if on { window.show(label) } else { window.hide(label) };
            result.expect("label is alive");
        },
    ));
    w.add(root, label).unwrap();
    w.add(root, button).unwrap();
    settle(&mut w);

    push(&mut w, HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(100.0, 50.0) });
    push(&mut w, HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(100.0, 50.0) });
    // Press, release and click; the click changes the value.
    w.step();
    // The value change shows the label.
    w.handle_events();

    assert_eq!(fired.get(), 1);
    assert!(w.is_visible(label));
    let label_exposes: Vec<Area> = w
        .queue()
        .iter()
        .filter_map(|e| match e {
            Event::Expose(x) if x.kind == EventType::EXPOSE_REQUEST && x.request_widget == label => Some(x.area),
            _ => None,
        })
        .collect();
    assert_eq!(label_exposes, vec![Area::new(10.0, 10.0, 50.0, 20.0)]);

    settle(&mut w);
    let composed = w.composed().expect("composed frame");
    assert_eq!(composed.pixel(35, 20), Some(Color::GREEN));
    let host = w.host_as::<HeadlessHost>().unwrap();
    assert_eq!(host.surface().unwrap().pixel(35, 20), Some(Color::GREEN));
}

#[test]
fn drag_quantizes_to_step() {
    let mut w = window(200, 100);
    let root = w.root();
    let id = w.create(slider("slider", 0.3).with_area(Area::new(50.0, 40.0, 100.0, 20.0)));
    w.add(root, id).unwrap();
    w.set_range(id, 0.0, 1.0, 0.1).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    w.set_callback(id, EventType::VALUE_CHANGED, move |_, event| {
        if let Event::ValueChanged(e) = event {
            log.borrow_mut().extend(e.value::<f64>().copied());
        }
    })
    .unwrap();
    settle(&mut w);
    seen.borrow_mut().clear();

    push(&mut w, HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(80.0, 50.0) });
    for x in [85.0, 90.0, 97.0] {
        push(&mut w, HostEvent::Motion { position: Point::new(x, 50.0) });
    }
    push(&mut w, HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(97.0, 50.0) });
    settle(&mut w);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!((seen[0] - 0.5).abs() < 1e-12);
    assert!((w.value::<f64>(id).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn exposes_merge_into_union() {
    let mut w = window(100, 100);
    let root = w.root();
    let id = w.create(WidgetBuilder::new("w").with_area(Area::new(0.0, 0.0, 50.0, 50.0)));
    w.add(root, id).unwrap();
    w.handle_events();

    for area in [
        Area::new(0.0, 0.0, 10.0, 10.0),
        Area::new(5.0, 5.0, 10.0, 10.0),
        Area::new(20.0, 0.0, 5.0, 5.0),
    ] {
        w.add_event(Event::expose_request(id, id, area));
    }

    let exposes: Vec<Area> = w
        .queue()
        .iter()
        .filter_map(|e| match e {
            Event::Expose(x) if x.widget == id => Some(x.area),
            _ => None,
        })
        .collect();
    assert_eq!(exposes, vec![Area::new(0.0, 0.0, 25.0, 15.0)]);
}

#[test]
fn release_purges_pending_events() {
    let mut w = window(100, 100);
    let root = w.root();
    let id = w.create(
        WidgetBuilder::new("w")
            .with_area(Area::new(10.0, 10.0, 30.0, 30.0))
            .with_capabilities(Capability::POINTABLE | Capability::SCROLLABLE),
    );
    w.add(root, id).unwrap();
    w.handle_events();
    let recorder = Recorder::new();
    recorder.watch(&mut w, id, EventType::POINTER_MOTION | EventType::WHEEL_SCROLL);

    w.add_event(Event::pointer(
        id,
        EventType::POINTER_MOTION,
        Point::new(5.0, 5.0),
        Point::new(5.0, 5.0),
        Point::new(1.0, 0.0),
        MouseButton::NoButton,
    ));
    w.add_event(Event::wheel(id, Point::new(5.0, 5.0), Point::new(0.0, 1.0)));
    w.release(root, id).unwrap();
    assert!(w.queue().iter().all(|e| !e.involves(id)));

    w.handle_events();
    assert!(recorder.events().is_empty());
    assert!(w.queue().is_empty());
}

#[test]
fn click_requires_release_on_target() {
    let mut w = window(200, 100);
    let root = w.root();
    let id = w.create(
        WidgetBuilder::new("w")
            .with_area(Area::new(50.0, 20.0, 40.0, 20.0))
            .with_capabilities(Capability::CLICKABLE),
    );
    w.add(root, id).unwrap();
    let recorder = Recorder::new();
    recorder.watch(&mut w, id, EventType::BUTTON_EVENTS);

    push(&mut w, HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(60.0, 30.0) });
    push(&mut w, HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(150.0, 80.0) });
    w.step();

    assert_eq!(recorder.kinds_for(id), vec![EventType::BUTTON_PRESS, EventType::BUTTON_RELEASE]);
    assert_eq!(recorder.count(EventType::BUTTON_CLICK), 0);
}

#[test]
fn focus_follows_activation_time() {
    let mut w = window(400, 300);
    let root = w.root();
    let id = w.create(
        WidgetBuilder::new("tip")
            .with_area(Area::new(0.0, 0.0, 50.0, 50.0))
            .with_capabilities(Capability::POINTER_FOCUSABLE)
            .with_focus_delay(Duration::from_millis(500)),
    );
    w.add(root, id).unwrap();
    let recorder = Recorder::new();
    recorder.watch(&mut w, id, EventType::POINTER_FOCUS_EVENTS);

    let t0 = Instant::now();
    let at = |ms| t0 + Duration::from_millis(ms);
    w.translate_at(HostEvent::Motion { position: Point::new(10.0, 10.0) }, t0);
    w.handle_events_at(t0);
    w.handle_events_at(at(300));
    assert!(recorder.events().is_empty());

    w.handle_events_at(at(600));
    w.handle_events_at(at(610));
    assert_eq!(recorder.kinds_for(id), vec![EventType::POINTER_FOCUS_IN]);

    w.translate_at(HostEvent::Motion { position: Point::new(200.0, 200.0) }, at(700));
    for ms in [700, 710, 1500, 3000] {
        w.handle_events_at(at(ms));
    }
    assert_eq!(
        recorder.kinds_for(id),
        vec![EventType::POINTER_FOCUS_IN, EventType::POINTER_FOCUS_OUT]
    );
    assert_eq!(w.focused(), None);
}

#[test]
fn host_close_ends_main_loop() {
    let mut w = window(100, 100);
    push(&mut w, HostEvent::Close);
    w.run();
    assert!(w.is_quit());
}

#[test]
fn host_resize_follows_configure() {
    let mut w = window(100, 100);
    push(&mut w, HostEvent::Configure { area: Area::new(0.0, 0.0, 160.0, 120.0) });
    settle(&mut w);

    let root = w.root();
    assert_eq!(w.widget(root).unwrap().extends(), Point::new(160.0, 120.0));
    let host = w.host_as::<HeadlessHost>().unwrap();
    assert_eq!(host.surface().map(|s| (s.width(), s.height())), Some((160, 120)));
}
