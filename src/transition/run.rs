use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::flip::css::{StylePatch, TRANSITION};
use crate::hooks::compose::Completion;
use crate::host::{Host, NodeSurface};
use crate::track::tracker::PositionTracker;

/// Progress of one transition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Geometry captured, nothing written yet.
    Captured,
    /// Start state written; waiting for `delay`.
    StyleApplied,
    /// Two frames requested so the start state is committed before the end state.
    FlushForced,
    /// End state and transition written; waiting for `time`.
    TransitionEnabled,
    /// Transition styling cleared and the terminal action taken.
    Settled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ClassOp {
    Add(String),
    Remove(String),
}

/// Terminal action of a run.
pub(crate) enum Settle<N> {
    Nothing,
    /// Refresh the node's tracked position once it is at rest.
    Recapture(Rc<RefCell<PositionTracker<N>>>),
    /// Finish the removal, through the framework's continuation when there is one.
    Remove(Completion),
}

/// Styles and classes written at each step of a run.
pub(crate) struct RunPlan<N> {
    pub(crate) before: StylePatch,
    pub(crate) before_classes: Vec<ClassOp>,
    pub(crate) after: StylePatch,
    pub(crate) after_classes: Vec<ClassOp>,
    /// Properties cleared when the run settles, besides `transition`.
    pub(crate) clear_on_settle: Vec<&'static str>,
    pub(crate) settle: Settle<N>,
}

impl<N> RunPlan<N> {
    pub(crate) fn new(settle: Settle<N>) -> Self {
        Self {
            before: StylePatch::new(),
            before_classes: Vec::new(),
            after: StylePatch::new(),
            after_classes: Vec::new(),
            clear_on_settle: Vec::new(),
            settle,
        }
    }
}

/// One `capture → start style → flush → end style → settle` sequence on a node.
///
/// Each step schedules the next through the host, moving the run into the task; nothing
/// cancels a run once started.
pub(crate) struct Run<H: Host> {
    host: Rc<H>,
    node: H::Node,
    phase: Phase,
    delay: Duration,
    time: Duration,
    transition: String,
    plan: RunPlan<H::Node>,
}

impl<H: Host> Run<H> {
    pub(crate) fn new(
        host: Rc<H>,
        node: H::Node,
        delay: Duration,
        time: Duration,
        transition: String,
        plan: RunPlan<H::Node>,
    ) -> Self {
        Self {
            host,
            node,
            phase: Phase::Captured,
            delay,
            time,
            transition,
            plan,
        }
    }

    /// Write the start state now and schedule the rest.
    pub(crate) fn start(self) {
        self.advance();
    }

    fn advance(mut self) {
        tracing::trace!(node = ?self.node, phase = ?self.phase, "run step");
        match self.phase {
            Phase::Captured => {
                apply_classes(&*self.host, &self.node, &self.plan.before_classes);
                apply_patch(&*self.host, &self.node, &self.plan.before);
                self.phase = Phase::StyleApplied;
                if self.delay.is_zero() {
                    self.advance();
                } else {
                    let host = Rc::clone(&self.host);
                    host.set_timeout(self.delay, Box::new(move || self.advance()));
                }
            }
            Phase::StyleApplied => {
                self.phase = Phase::FlushForced;
                // Some engines batch a single frame with the preceding style writes.
                let host = Rc::clone(&self.host);
                host.request_frame(Box::new(move || {
                    let host = Rc::clone(&self.host);
                    host.request_frame(Box::new(move || self.advance()));
                }));
            }
            Phase::FlushForced => {
                apply_classes(&*self.host, &self.node, &self.plan.after_classes);
                apply_patch(&*self.host, &self.node, &self.plan.after);
                self.host
                    .set_style(&self.node, TRANSITION, Some(self.transition.as_str()));
                self.phase = Phase::TransitionEnabled;
                let host = Rc::clone(&self.host);
                host.set_timeout(self.time, Box::new(move || self.advance()));
            }
            Phase::TransitionEnabled => {
                self.host.set_style(&self.node, TRANSITION, None);
                for name in &self.plan.clear_on_settle {
                    self.host.set_style(&self.node, name, None);
                }
                self.phase = Phase::Settled;
                self.settle();
            }
            Phase::Settled => {}
        }
    }

    fn settle(self) {
        match self.plan.settle {
            Settle::Nothing => {}
            Settle::Recapture(tracker) => {
                let mut tracker = tracker.borrow_mut();
                if tracker.is_tracked(&self.node) {
                    tracker.capture(&*self.host, &self.node);
                }
            }
            Settle::Remove(done) => {
                if !done.complete() {
                    detach_if_attached(&*self.host, &self.node);
                }
            }
        }
    }
}

pub(crate) fn apply_patch<H>(host: &H, node: &H::Node, patch: &StylePatch)
where
    H: NodeSurface + ?Sized,
{
    for (name, value) in patch {
        host.set_style(node, name, value.as_deref());
    }
}

fn apply_classes<H>(host: &H, node: &H::Node, ops: &[ClassOp])
where
    H: NodeSurface + ?Sized,
{
    for op in ops {
        match op {
            ClassOp::Add(class) => host.add_class(node, class),
            ClassOp::Remove(class) => host.remove_class(node, class),
        }
    }
}

/// Detach `node`, or do nothing when it no longer has a parent.
pub(crate) fn detach_if_attached<H>(host: &H, node: &H::Node)
where
    H: NodeSurface + ?Sized,
{
    if host.parent(node).is_some() {
        host.detach(node);
    } else {
        tracing::debug!(?node, "removal skipped: node already detached");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/run.rs"]
mod tests;
