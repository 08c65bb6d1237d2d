use std::cell::RefCell;
use std::rc::Rc;

use crate::flip::css::{StylePatch, TRANSFORM, TRANSITION, format_transform, parse_transform};
use crate::flip::math::{invert, invert_with_style};
use crate::foundation::core::Affine;
use crate::hooks::compose::{Completion, Handler, HookSlot};
use crate::hooks::vnode::VNode;
use crate::host::{Geometry, Host};
use crate::track::tracker::PositionTracker;
use crate::transition::config::{ConfigSource, TransitionConfig};
use crate::transition::run::{ClassOp, Run, RunPlan, Settle, apply_patch};

/// Transforms a virtual node, typically by installing hooks into it.
pub type Installer<N> = Rc<dyn Fn(VNode<N>) -> VNode<N>>;

/// Tracker shared by every binding of one [`crate::Transitions`] instance.
pub type SharedTracker<N> = Rc<RefCell<PositionTracker<N>>>;

/// Behaviour a binder attaches to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Start tracking on create.
    Track,
    /// Fade/slide in from the `css` start state on create.
    Enter,
    /// FLIP from the previous position on update.
    Move,
    /// Animate to the `css` end state on remove, then remove.
    Exit,
    /// Keep a transition enabled so attribute changes animate.
    Change,
}

impl TransitionKind {
    /// Hook slots the kind is installed into.
    pub fn slots(self) -> &'static [HookSlot] {
        match self {
            Self::Track | Self::Enter => &[HookSlot::Create],
            Self::Move => &[HookSlot::Update],
            Self::Exit => &[HookSlot::Remove],
            Self::Change => &[HookSlot::Create, HookSlot::Update],
        }
    }
}

/// Turns configurations into lifecycle handlers bound to one host and tracker.
pub struct TransitionBinder<H: Host> {
    host: Rc<H>,
    tracker: SharedTracker<H::Node>,
}

impl<H: Host> Clone for TransitionBinder<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
            tracker: Rc::clone(&self.tracker),
        }
    }
}

impl<H: Host> TransitionBinder<H> {
    /// Binder writing to `host` and recording positions in `tracker`.
    pub fn new(host: Rc<H>, tracker: SharedTracker<H::Node>) -> Self {
        Self { host, tracker }
    }

    /// Handler running `kind` with `source` resolved at every firing.
    pub fn handler(&self, kind: TransitionKind, source: ConfigSource) -> Handler<H::Node> {
        let host = Rc::clone(&self.host);
        let tracker = Rc::clone(&self.tracker);
        Rc::new(move |node: &H::Node, done: &Completion| {
            let cfg = source.resolve();
            match kind {
                TransitionKind::Track => {
                    tracker.borrow_mut().register(&*host, node);
                }
                TransitionKind::Enter => run_enter(&host, &tracker, node, &cfg),
                TransitionKind::Move => run_move(&host, &tracker, node, &cfg),
                TransitionKind::Exit => run_exit(&host, &tracker, node, &cfg, done),
                TransitionKind::Change => run_change(&*host, node, &cfg),
            }
        })
    }

    /// Installer binding the `kind` handler into each of its slots.
    pub fn installer(&self, kind: TransitionKind, source: ConfigSource) -> Installer<H::Node> {
        let handler = self.handler(kind, source);
        Rc::new(move |mut vnode: VNode<H::Node>| {
            if let Some(hooks) = vnode.hooks_mut() {
                for &slot in kind.slots() {
                    hooks.bind(slot, Rc::clone(&handler));
                }
            }
            vnode
        })
    }
}

#[tracing::instrument(level = "debug", skip(host, tracker, cfg))]
fn run_enter<H: Host>(
    host: &Rc<H>,
    tracker: &SharedTracker<H::Node>,
    node: &H::Node,
    cfg: &TransitionConfig,
) {
    let css = cfg.resolve_css();
    tracker.borrow_mut().register(&**host, node);
    if !cfg.ready.is_zero() {
        let (h, t, n) = (Rc::clone(host), Rc::clone(tracker), node.clone());
        host.set_timeout(
            cfg.ready,
            Box::new(move || {
                let mut t = t.borrow_mut();
                if t.is_tracked(&n) {
                    t.capture(&*h, &n);
                }
            }),
        );
    }

    let mut plan = RunPlan::new(Settle::Recapture(Rc::clone(tracker)));
    plan.before.insert(TRANSITION.to_owned(), None);
    for (name, value) in css {
        plan.after.insert(name.clone(), None);
        plan.before.insert(name, Some(value));
    }
    if let Some(class) = cfg.enter_class() {
        plan.before_classes.push(ClassOp::Add(class.clone()));
        plan.after_classes.push(ClassOp::Remove(class));
    }
    start(host, node, cfg, plan);
}

#[tracing::instrument(level = "debug", skip(host, tracker, cfg))]
fn run_move<H: Host>(
    host: &Rc<H>,
    tracker: &SharedTracker<H::Node>,
    node: &H::Node,
    cfg: &TransitionConfig,
) {
    let capture = tracker.borrow_mut().capture(&**host, node);
    let inverse = invert(capture.previous, capture.current);

    let mut plan = RunPlan::new(Settle::Nothing);
    plan.before.insert(TRANSITION.to_owned(), None);
    plan.before
        .insert(TRANSFORM.to_owned(), Some(format_transform(inverse)));
    plan.after.insert(TRANSFORM.to_owned(), None);
    plan.clear_on_settle.push(TRANSFORM);
    start(host, node, cfg, plan);
}

#[tracing::instrument(level = "debug", skip(host, tracker, cfg, done))]
fn run_exit<H: Host>(
    host: &Rc<H>,
    tracker: &SharedTracker<H::Node>,
    node: &H::Node,
    cfg: &TransitionConfig,
    done: &Completion,
) {
    let mut css = cfg.resolve_css();
    let capture = {
        let mut t = tracker.borrow_mut();
        let capture = t.capture(&**host, node);
        t.unregister(node);
        capture
    };
    let inverse = invert(capture.previous, capture.current);
    let start_transform = format_transform(inverse);

    let end_transform = match (css.remove(TRANSFORM), cfg.exit_class()) {
        (Some(target), _) => format!("{start_transform} {target}"),
        (None, Some(class)) => {
            let target = resolve_class_transform(&**host, node, &class);
            format_transform(invert_with_style(capture.previous, capture.current, target))
        }
        (None, None) => start_transform.clone(),
    };

    let settle = if cfg.removes() {
        Settle::Remove(done.clone())
    } else {
        Settle::Nothing
    };
    let mut plan = RunPlan::new(settle);
    plan.before.insert(TRANSITION.to_owned(), None);
    plan.before
        .insert(TRANSFORM.to_owned(), Some(start_transform));
    plan.after.extend(css.into_iter().map(|(k, v)| (k, Some(v))));
    plan.after.insert(TRANSFORM.to_owned(), Some(end_transform));
    if let Some(class) = cfg.exit_class() {
        plan.after_classes.push(ClassOp::Add(class));
    }
    start(host, node, cfg, plan);
}

fn run_change<H: Host>(host: &H, node: &H::Node, cfg: &TransitionConfig) {
    let mut patch = cfg
        .resolve_css()
        .into_iter()
        .map(|(k, v)| (k, Some(v)))
        .collect::<StylePatch>();
    patch.insert(TRANSITION.to_owned(), Some(cfg.transition()));
    apply_patch(host, node, &patch);
}

fn start<H: Host>(host: &Rc<H>, node: &H::Node, cfg: &TransitionConfig, plan: RunPlan<H::Node>) {
    Run::new(
        Rc::clone(host),
        node.clone(),
        cfg.delay,
        cfg.time,
        cfg.transition(),
        plan,
    )
    .start();
}

/// Matrix the node would have with `class` applied, read by toggling the class on and off.
///
/// Unresolvable transforms degrade to the identity.
fn resolve_class_transform<H>(host: &H, node: &H::Node, class: &str) -> Affine
where
    H: Geometry + ?Sized,
{
    let present = host.has_class(node, class);
    if !present {
        host.add_class(node, class);
    }
    let raw = host.computed_transform(node);
    if !present {
        host.remove_class(node, class);
    }
    parse_transform(&raw).unwrap_or_else(|err| {
        tracing::debug!(?node, %err, "unresolvable exit transform, using identity");
        Affine::IDENTITY
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transition/binder.rs"]
mod tests;
