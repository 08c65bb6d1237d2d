use super::*;
use crate::host::NodeSurface;
use crate::host::sim::{NodeId, SimHost};

fn stacked(host: &SimHost, n: usize) -> Vec<NodeId> {
    (0..n)
        .map(|_| {
            let id = host.create_element("div");
            host.append_child(host.root(), id);
            id
        })
        .collect()
}

#[test]
fn register_is_idempotent() {
    let host = SimHost::new();
    let [a] = stacked(&host, 1)[..] else { panic!() };
    let mut t = PositionTracker::new();

    assert!(t.register(&host, &a));
    assert!(!t.register(&host, &a));
    assert_eq!(t.len(), 1);
}

#[test]
fn unregister_absent_is_noop() {
    let host = SimHost::new();
    let [a] = stacked(&host, 1)[..] else { panic!() };
    let mut t = PositionTracker::<NodeId>::new();

    assert!(!t.unregister(&a));
    t.register(&host, &a);
    assert!(t.unregister(&a));
    assert!(!t.unregister(&a));
    assert!(t.is_empty());
}

#[test]
fn first_capture_has_no_previous() {
    let host = SimHost::new();
    let [_, b] = stacked(&host, 2)[..] else { panic!() };
    let mut t = PositionTracker::new();

    let c = t.capture(&host, &b);
    assert_eq!(c.previous, None);
    assert_eq!(c.current, Point::new(0.0, 20.0));
    assert_eq!(c.delta(), None);
}

#[test]
fn capture_returns_previous_and_records_current() {
    let host = SimHost::new();
    let [a, b] = stacked(&host, 2)[..] else { panic!() };
    let mut t = PositionTracker::new();
    t.register(&host, &b);

    host.detach(&a);
    let c = t.capture(&host, &b);
    assert_eq!(c.previous, Some(Point::new(0.0, 20.0)));
    assert_eq!(c.current, Point::ZERO);
    assert_eq!(c.delta(), Some(Vec2::new(0.0, 20.0)));

    let again = t.capture(&host, &b);
    assert_eq!(again.delta(), Some(Vec2::ZERO));
}

#[test]
fn captures_are_persisted_as_attributes() {
    let host = SimHost::new();
    let [_, b] = stacked(&host, 2)[..] else { panic!() };
    let mut t = PositionTracker::new();
    t.capture(&host, &b);

    assert_eq!(host.attr(&b, ATTR_X).as_deref(), Some("0"));
    assert_eq!(host.attr(&b, ATTR_Y).as_deref(), Some("20"));
}

#[test]
fn persisted_position_survives_a_new_tracker() {
    let host = SimHost::new();
    let [a, b] = stacked(&host, 2)[..] else { panic!() };
    PositionTracker::new().register(&host, &b);

    host.detach(&a);
    let mut fresh = PositionTracker::new();
    let c = fresh.capture(&host, &b);
    assert_eq!(c.previous, Some(Point::new(0.0, 20.0)));
}

#[test]
fn update_all_refreshes_every_tracked_node() {
    let host = SimHost::new();
    let nodes = stacked(&host, 3);
    let mut t = PositionTracker::new();
    for n in &nodes[..2] {
        t.register(&host, n);
    }

    host.scroll_to(0.0, 50.0);
    t.update_all(&host);

    let tops = t.entries().map(|(_, e)| e.last_y).collect::<Vec<_>>();
    assert_eq!(tops, vec![-50.0, -30.0]);
    assert!(host.attr(&nodes[2], ATTR_Y).is_none());
}

#[test]
fn update_all_forgets_detached_nodes() {
    let host = SimHost::new();
    let [a, b, c] = stacked(&host, 3)[..] else { panic!() };
    let mut t = PositionTracker::new();
    for n in [a, b, c] {
        t.register(&host, &n);
    }

    host.detach(&a);
    host.detach(&c);
    t.update_all(&host);

    assert_eq!(t.len(), 1);
    assert!(t.is_tracked(&b));
    assert_eq!(t.last_position(&host, &b), Some(Point::new(0.0, 0.0)));
}
