use std::cell::Cell;
use std::time::Duration;

use super::*;
use crate::foundation::core::Point;
use crate::host::NodeSurface;
use crate::host::sim::{NodeId, SimHost};

struct Fixture {
    host: Rc<SimHost>,
    tracker: SharedTracker<NodeId>,
    binder: TransitionBinder<SimHost>,
}

impl Fixture {
    fn new() -> Self {
        let host = Rc::new(SimHost::new());
        let tracker = Rc::new(RefCell::new(PositionTracker::new()));
        let binder = TransitionBinder::new(Rc::clone(&host), Rc::clone(&tracker));
        Self {
            host,
            tracker,
            binder,
        }
    }

    fn node(&self) -> NodeId {
        let n = self.host.create_element("div");
        self.host.append_child(self.host.root(), n);
        n
    }

    fn fire(&self, kind: TransitionKind, cfg: TransitionConfig, node: NodeId) {
        self.binder.handler(kind, cfg.into())(&node, &Completion::inert());
    }

    fn style(&self, node: NodeId, name: &str) -> Option<String> {
        self.host.style(&node, name)
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn enter_runs_from_css_to_natural_style() {
    let fx = Fixture::new();
    let n = fx.node();
    let cfg = TransitionConfig::new()
        .time(ms(100))
        .easing("bar")
        .css([("opacity", "0")]);
    fx.fire(TransitionKind::Enter, cfg, n);

    assert!(fx.tracker.borrow().is_tracked(&n));
    assert_eq!(fx.style(n, "opacity").as_deref(), Some("0"));
    assert_eq!(fx.style(n, TRANSITION), None);

    fx.host.flush();
    assert_eq!(fx.style(n, "opacity"), None);
    assert_eq!(fx.style(n, TRANSITION).as_deref(), Some("all bar 100ms"));

    fx.host.advance(ms(100));
    assert_eq!(fx.style(n, TRANSITION), None);
}

#[test]
fn enter_toggles_named_class() {
    let fx = Fixture::new();
    let n = fx.node();
    fx.fire(TransitionKind::Enter, TransitionConfig::new().name("fade"), n);

    assert!(fx.host.has_class(&n, "fade-enter"));
    fx.host.flush();
    assert!(!fx.host.has_class(&n, "fade-enter"));
}

#[test]
fn enter_ready_recaptures_after_layout_settles() {
    let fx = Fixture::new();
    let spacer = fx.host.create_element("div");
    let n = fx.node();
    fx.fire(
        TransitionKind::Enter,
        TransitionConfig::new().time(ms(500)).ready(ms(30)),
        n,
    );
    assert_eq!(
        fx.tracker.borrow().last_position(&*fx.host, &n),
        Some(Point::new(0.0, 0.0))
    );

    fx.host.append_child(fx.host.root(), spacer);
    fx.host.append_child(fx.host.root(), n);
    fx.host.advance(ms(30));
    assert_eq!(
        fx.tracker.borrow().last_position(&*fx.host, &n),
        Some(Point::new(0.0, 20.0))
    );
}

#[test]
fn move_inverts_then_plays_back_to_rest() {
    let fx = Fixture::new();
    let n = fx.node();
    fx.tracker.borrow_mut().register(&*fx.host, &n);

    let above = fx.host.create_element("div");
    fx.host.append_child(fx.host.root(), above);
    fx.host.append_child(fx.host.root(), n);

    let cfg = TransitionConfig::new().time(ms(200)).easing("bar");
    fx.fire(TransitionKind::Move, cfg, n);
    assert_eq!(
        fx.style(n, TRANSFORM).as_deref(),
        Some("translate(0px, -20px)")
    );

    fx.host.flush();
    assert_eq!(fx.style(n, TRANSFORM), None);
    assert_eq!(fx.style(n, TRANSITION).as_deref(), Some("all bar 200ms"));

    fx.host.advance(ms(200));
    assert_eq!(fx.style(n, TRANSITION), None);
    assert_eq!(fx.style(n, TRANSFORM), None);
}

#[test]
fn first_move_does_not_translate() {
    let fx = Fixture::new();
    let n = fx.node();
    fx.fire(TransitionKind::Move, TransitionConfig::new(), n);
    assert_eq!(fx.style(n, TRANSFORM).as_deref(), Some("translate(0px, 0px)"));
    assert!(!fx.tracker.borrow().is_tracked(&n));
    assert_eq!(
        fx.host.attr(&n, crate::track::tracker::ATTR_Y).as_deref(),
        Some("0")
    );
}

#[test]
fn exit_animates_to_css_then_removes() {
    let fx = Fixture::new();
    let n = fx.node();
    fx.tracker.borrow_mut().register(&*fx.host, &n);
    let cfg = TransitionConfig::new()
        .time(ms(100))
        .delay(ms(50))
        .css([("opacity", "0"), ("transform", "scale(0.5)")]);
    fx.fire(TransitionKind::Exit, cfg, n);

    assert!(!fx.tracker.borrow().is_tracked(&n));
    assert_eq!(fx.style(n, TRANSFORM).as_deref(), Some("translate(0px, 0px)"));

    fx.host.advance(ms(50));
    assert_eq!(fx.style(n, "opacity").as_deref(), Some("0"));
    assert_eq!(
        fx.style(n, TRANSFORM).as_deref(),
        Some("translate(0px, 0px) scale(0.5)")
    );
    assert!(fx.host.is_attached(n));

    fx.host.advance(ms(99));
    assert!(fx.host.is_attached(n));
    fx.host.advance(ms(1));
    assert!(!fx.host.is_attached(n));
}

#[test]
fn exit_keep_leaves_node_mounted() {
    let fx = Fixture::new();
    let n = fx.node();
    fx.fire(TransitionKind::Exit, TransitionConfig::new().keep(true), n);
    fx.host.run_until_idle();
    assert!(fx.host.is_attached(n));

    let m = fx.node();
    fx.fire(TransitionKind::Exit, TransitionConfig::new().last(false), m);
    fx.host.run_until_idle();
    assert!(fx.host.is_attached(m));
}

#[test]
fn exit_class_matrix_keeps_positional_delta() {
    let fx = Fixture::new();
    fx.host
        .define_class_transform("shrink-exit", "matrix(0.5, 0, 0, 0.5, 4, 0)");
    let n = fx.node();
    fx.tracker.borrow_mut().register(&*fx.host, &n);

    let above = fx.host.create_element("div");
    fx.host.append_child(fx.host.root(), above);
    fx.host.append_child(fx.host.root(), n);

    fx.fire(TransitionKind::Exit, TransitionConfig::new().name("shrink"), n);
    assert_eq!(
        fx.style(n, TRANSFORM).as_deref(),
        Some("translate(0px, -20px)")
    );
    assert!(!fx.host.has_class(&n, "shrink-exit"));

    fx.host.flush();
    assert!(fx.host.has_class(&n, "shrink-exit"));
    assert_eq!(
        fx.style(n, TRANSFORM).as_deref(),
        Some("matrix(0.5, 0, 0, 0.5, 4, -20)")
    );
}

#[test]
fn unparsable_class_transform_degrades_to_identity() {
    let fx = Fixture::new();
    fx.host.define_class_transform("odd-exit", "perspective(10px)");
    let n = fx.node();
    fx.fire(TransitionKind::Exit, TransitionConfig::new().name("odd"), n);

    fx.host.flush();
    assert_eq!(fx.style(n, TRANSFORM).as_deref(), Some("translate(0px, 0px)"));
}

#[test]
fn change_sets_transition_immediately() {
    let fx = Fixture::new();
    let n = fx.node();
    let cfg = TransitionConfig::new()
        .time(ms(50))
        .css([("color", "red")]);
    fx.fire(TransitionKind::Change, cfg, n);

    assert_eq!(fx.style(n, "color").as_deref(), Some("red"));
    assert_eq!(fx.style(n, TRANSITION).as_deref(), Some("all linear 50ms"));
    assert_eq!(fx.host.pending_tasks(), 0);
}

#[test]
fn deferred_css_is_evaluated_per_firing() {
    let fx = Fixture::new();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let cfg = TransitionConfig::new().css_with(move || {
        counter.set(counter.get() + 1);
        [("opacity".to_owned(), "0".to_owned())].into()
    });
    let handler = fx.binder.handler(TransitionKind::Enter, cfg.into());
    assert_eq!(calls.get(), 0);

    handler(&fx.node(), &Completion::inert());
    handler(&fx.node(), &Completion::inert());
    assert_eq!(calls.get(), 2);
}

#[test]
fn deferred_config_is_resolved_per_firing() {
    let fx = Fixture::new();
    let calls = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&calls);
    let source = ConfigSource::thunk(move || {
        counter.set(counter.get() + 1);
        TransitionConfig::new().time(ms(10 * counter.get()))
    });
    let handler = fx.binder.handler(TransitionKind::Change, source);
    assert_eq!(calls.get(), 0);

    let n = fx.node();
    handler(&n, &Completion::inert());
    handler(&n, &Completion::inert());
    assert_eq!(fx.style(n, TRANSITION).as_deref(), Some("all linear 20ms"));
}

#[test]
fn installer_fills_every_slot_of_the_kind() {
    let fx = Fixture::new();
    let install = fx.binder.installer(TransitionKind::Change, ConfigSource::default());

    let vnode = install(VNode::element("div").id("x"));
    let hooks = vnode.hooks().unwrap();
    assert_eq!(hooks.len(HookSlot::Create), 1);
    assert_eq!(hooks.len(HookSlot::Update), 1);
    assert!(hooks.is_empty(HookSlot::Remove));

    let bare = install(VNode::text("plain"));
    assert!(bare.hooks().is_none());
}
