//! Public transition vocabulary: `enter`, `moves`, `exit`/`leave`, `change`, and the
//! `combine`/`group` helpers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::hooks::vnode::VNode;
use crate::host::Host;
use crate::track::tracker::PositionTracker;
use crate::transition::binder::{Installer, SharedTracker, TransitionBinder, TransitionKind};
use crate::transition::config::ConfigSource;

/// Entry point binding transitions to one host.
///
/// Owns the position tracker shared by every installer it hands out, and keeps it fresh on
/// viewport scroll and resize.
pub struct Transitions<H: Host> {
    host: Rc<H>,
    tracker: SharedTracker<H::Node>,
    binder: TransitionBinder<H>,
}

impl<H: Host> Transitions<H> {
    /// Create a tracker for `host` and subscribe it to viewport changes.
    pub fn new(host: Rc<H>) -> Self {
        let tracker = Rc::new(RefCell::new(PositionTracker::new()));

        let weak_host = Rc::downgrade(&host);
        let weak_tracker = Rc::downgrade(&tracker);
        host.on_viewport_change(Box::new(move || {
            let (Some(host), Some(tracker)) = (weak_host.upgrade(), weak_tracker.upgrade()) else {
                return false;
            };
            tracker.borrow_mut().update_all(&*host);
            true
        }));

        let binder = TransitionBinder::new(Rc::clone(&host), Rc::clone(&tracker));
        Self {
            host,
            tracker,
            binder,
        }
    }

    /// Host the installers write to.
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Binder behind the installers, for custom kind/config pairings.
    pub fn binder(&self) -> &TransitionBinder<H> {
        &self.binder
    }

    /// Number of nodes currently tracked.
    pub fn tracked_count(&self) -> usize {
        self.tracker.borrow().len()
    }

    /// `true` when `node` is tracked.
    pub fn is_tracked(&self, node: &H::Node) -> bool {
        self.tracker.borrow().is_tracked(node)
    }

    /// Re-capture every tracked node now.
    pub fn update_all(&self) {
        self.tracker.borrow_mut().update_all(&*self.host);
    }

    /// Start tracking the node when it is created.
    pub fn track(&self) -> Installer<H::Node> {
        self.binder
            .installer(TransitionKind::Track, ConfigSource::default())
    }

    /// Animate from the `css` start state into the natural style on create.
    pub fn enter(&self, cfg: impl Into<ConfigSource>) -> Installer<H::Node> {
        self.binder.installer(TransitionKind::Enter, cfg.into())
    }

    /// FLIP the node from its previous position whenever it is updated.
    pub fn moves(&self, cfg: impl Into<ConfigSource>) -> Installer<H::Node> {
        combine([
            self.track(),
            self.binder.installer(TransitionKind::Move, cfg.into()),
        ])
    }

    /// Animate into the `css` end state on removal, then remove the node.
    pub fn exit(&self, cfg: impl Into<ConfigSource>) -> Installer<H::Node> {
        combine([
            self.track(),
            self.binder.installer(TransitionKind::Exit, cfg.into()),
        ])
    }

    /// Alias of [`Transitions::exit`].
    pub fn leave(&self, cfg: impl Into<ConfigSource>) -> Installer<H::Node> {
        self.exit(cfg)
    }

    /// Keep a transition enabled on the node so attribute changes animate.
    pub fn change(&self, cfg: impl Into<ConfigSource>) -> Installer<H::Node> {
        self.binder.installer(TransitionKind::Change, cfg.into())
    }

    /// [`Transitions::enter`] over a child list.
    pub fn enter_all(
        &self,
        cfg: impl Into<ConfigSource>,
        children: Vec<VNode<H::Node>>,
    ) -> Vec<VNode<H::Node>> {
        apply_all(&self.enter(cfg), children)
    }

    /// [`Transitions::moves`] over a child list.
    pub fn moves_all(
        &self,
        cfg: impl Into<ConfigSource>,
        children: Vec<VNode<H::Node>>,
    ) -> Vec<VNode<H::Node>> {
        apply_all(&self.moves(cfg), children)
    }

    /// [`Transitions::exit`] over a child list.
    pub fn exit_all(
        &self,
        cfg: impl Into<ConfigSource>,
        children: Vec<VNode<H::Node>>,
    ) -> Vec<VNode<H::Node>> {
        apply_all(&self.exit(cfg), children)
    }
}

/// Apply `installer` to every child with a property bag; children without one are dropped.
pub fn apply_all<N: 'static>(installer: &Installer<N>, children: Vec<VNode<N>>) -> Vec<VNode<N>> {
    children
        .into_iter()
        .filter(VNode::is_bindable)
        .map(|child| installer(child))
        .collect()
}

/// Fold installers into one that applies them left to right.
pub fn combine<N: 'static>(installers: impl IntoIterator<Item = Installer<N>>) -> Installer<N> {
    let installers = installers.into_iter().collect::<Vec<_>>();
    let identity: Installer<N> = Rc::new(|vnode: VNode<N>| vnode);
    installers
        .into_iter()
        .rfold(identity, |next, f| -> Installer<N> {
            Rc::new(move |vnode: VNode<N>| next(f(vnode)))
        })
}

/// Installer applying `f` to each direct child of a node, leaving the node itself as is.
pub fn group<N: 'static>(f: Installer<N>) -> Installer<N> {
    Rc::new(move |mut vnode: VNode<N>| {
        vnode.children = std::mem::take(&mut vnode.children)
            .into_iter()
            .map(|child| f(child))
            .collect();
        vnode
    })
}

#[cfg(test)]
#[path = "../tests/unit/lifecycle.rs"]
mod tests;
