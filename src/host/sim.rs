//! Headless host: an arena document with a vertical stack layout, a virtual clock and a
//! minimal keyed reconciler that fires lifecycle hooks.
//!
//! Layout model: children stack top to bottom inside their parent, each taking its own
//! `height`; `left` is inherited from the parent. The root sits at the negated scroll offset.
//! Transforms never affect reported geometry.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::flip::css::TRANSFORM;
use crate::foundation::core::{Point, Vec2};
use crate::hooks::compose::{Completion, HookSlot, Hooks};
use crate::hooks::vnode::VNode;
use crate::host::{Geometry, NodeSurface, Scheduler, Task, ViewportListener};

/// Node handle of a [`SimHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Height given to new nodes.
pub const DEFAULT_NODE_HEIGHT: f64 = 20.0;

struct SimNode {
    tag: String,
    key: Option<String>,
    text: Option<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    classes: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    height: f64,
    hooks: Hooks<NodeId>,
    removing: bool,
}

impl SimNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            key: None,
            text: None,
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            height: DEFAULT_NODE_HEIGHT,
            hooks: Hooks::new(),
            removing: false,
        }
    }
}

#[derive(Default)]
struct Clock {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), Task>,
}

enum Lifecycle {
    Create(NodeId),
    Update(NodeId),
    Remove(NodeId),
}

/// Deterministic in-memory document, scheduler and renderer.
///
/// Time only moves through [`SimHost::advance`] and friends. Frame callbacks are timers of
/// `frame_interval` (zero by default, i.e. the next scheduling turn).
pub struct SimHost {
    nodes: RefCell<Vec<SimNode>>,
    clock: RefCell<Clock>,
    listeners: RefCell<Vec<ViewportListener>>,
    class_transforms: RefCell<BTreeMap<String, String>>,
    scroll: Cell<Vec2>,
    frame_interval: Duration,
    root: NodeId,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![SimNode::new("body")]),
            clock: RefCell::new(Clock::default()),
            listeners: RefCell::new(Vec::new()),
            class_transforms: RefCell::new(BTreeMap::new()),
            scroll: Cell::new(Vec2::ZERO),
            frame_interval: Duration::ZERO,
            root: NodeId(0),
        }
    }

    /// Use a non-zero delay for frame callbacks.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    // -------------------------------------------------------------------------------------
    // Document construction

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(SimNode::new(tag));
        NodeId((nodes.len() - 1) as u32)
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.detach(&child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.idx()].parent = Some(parent);
        nodes[parent.idx()].children.push(child);
    }

    /// Set the layout height of a node.
    pub fn set_height(&self, node: NodeId, height: f64) {
        self.nodes.borrow_mut()[node.idx()].height = height;
    }

    /// Stylesheet rule: nodes carrying `class` resolve their transform to `transform`.
    pub fn define_class_transform(&self, class: impl Into<String>, transform: impl Into<String>) {
        self.class_transforms
            .borrow_mut()
            .insert(class.into(), transform.into());
    }

    /// Scroll the viewport and notify listeners.
    pub fn scroll_to(&self, x: f64, y: f64) {
        self.scroll.set(Vec2::new(x, y));
        self.notify_viewport();
    }

    /// Signal a viewport resize.
    pub fn resize(&self) {
        self.notify_viewport();
    }

    fn notify_viewport(&self) {
        self.listeners.borrow_mut().retain(|listener| listener());
    }

    /// Number of live viewport listeners.
    pub fn viewport_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    // -------------------------------------------------------------------------------------
    // Queries

    /// First attached node whose `id` attribute equals `id`, in document order.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut stack = vec![self.root];
        while let Some(n) = stack.pop() {
            let node = &nodes[n.idx()];
            if node.attrs.get("id").is_some_and(|v| v == id) {
                return Some(n);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// `true` when the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = node;
        loop {
            if cur == self.root {
                return true;
            }
            match nodes[cur.idx()].parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Children of `node` in document order, including nodes awaiting removal.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.idx()].children.clone()
    }

    /// Element tag.
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.idx()].tag.clone()
    }

    /// Text content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow()[node.idx()].text.clone()
    }

    // -------------------------------------------------------------------------------------
    // Clock

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of scheduled tasks not yet run.
    pub fn pending_tasks(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Run every task due now, including tasks they schedule for now.
    pub fn flush(&self) {
        self.advance(Duration::ZERO);
    }

    /// Move time forward by `by`, running due tasks in order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.advance_to(target);
    }

    /// Move time forward to `target` (never backward), running due tasks in order.
    pub fn advance_to(&self, target: Duration) {
        while let Some(task) = self.pop_due(target) {
            task();
        }
        let mut clock = self.clock.borrow_mut();
        if clock.now < target {
            clock.now = target;
        }
    }

    /// Run tasks until the queue is empty.
    pub fn run_until_idle(&self) {
        loop {
            let next = self.clock.borrow().queue.keys().next().map(|&(due, _)| due);
            match next {
                Some(due) => self.advance_to(due),
                None => return,
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut clock = self.clock.borrow_mut();
        let due = clock.queue.keys().next().map(|&(due, _)| due)?;
        if due > target {
            return None;
        }
        let (_, task) = clock.queue.pop_first()?;
        clock.now = clock.now.max(due);
        Some(task)
    }

    // -------------------------------------------------------------------------------------
    // Reconciler

    /// Patch `container`'s children to match `vnodes` and fire the resulting hooks.
    ///
    /// Children match by key, or by tag among unkeyed children. Hooks fire after the whole
    /// structural pass, children before parents. A removed node with remove handlers stays in
    /// place until its [`Completion`] runs; without handlers it is detached at once.
    pub fn render(self: &Rc<Self>, container: NodeId, vnodes: Vec<VNode<NodeId>>) {
        let mut events = Vec::new();
        self.patch_children(container, vnodes, &mut events);
        for event in events {
            self.dispatch(event);
        }
    }

    fn patch_children(
        &self,
        parent: NodeId,
        vnodes: Vec<VNode<NodeId>>,
        events: &mut Vec<Lifecycle>,
    ) {
        let previous = self.children(parent);
        let live = {
            let nodes = self.nodes.borrow();
            previous
                .iter()
                .copied()
                .filter(|id| !nodes[id.idx()].removing)
                .collect::<Vec<_>>()
        };

        let mut claimed = HashSet::new();
        let mut next = Vec::with_capacity(vnodes.len());
        for vnode in vnodes {
            let VNode {
                tag,
                key,
                text,
                props,
                children,
            } = vnode;

            let matched = {
                let nodes = self.nodes.borrow();
                live.iter().copied().find(|id| {
                    let n = &nodes[id.idx()];
                    !claimed.contains(id) && n.tag == tag && n.key == key
                })
            };
            let (id, created) = match matched {
                Some(id) => (id, false),
                None => (self.create_element(&tag), true),
            };
            claimed.insert(id);

            {
                let mut nodes = self.nodes.borrow_mut();
                let n = &mut nodes[id.idx()];
                n.key = key;
                n.text = text;
                n.parent = Some(parent);
                match props {
                    Some(props) => {
                        n.attrs.extend(props.attrs);
                        n.hooks = props.hooks;
                    }
                    None => n.hooks = Hooks::new(),
                }
            }

            self.patch_children(id, children, events);
            events.push(if created {
                Lifecycle::Create(id)
            } else {
                Lifecycle::Update(id)
            });
            next.push(id);
        }

        let mut nodes = self.nodes.borrow_mut();
        for &id in live.iter().filter(|id| !claimed.contains(id)) {
            nodes[id.idx()].removing = true;
            events.push(Lifecycle::Remove(id));
        }

        // Nodes awaiting removal keep their slot until they are detached.
        let mut ordered = next;
        for (i, &id) in previous.iter().enumerate() {
            if nodes[id.idx()].removing {
                ordered.insert(i.min(ordered.len()), id);
            }
        }
        nodes[parent.idx()].children = ordered;
    }

    fn dispatch(self: &Rc<Self>, event: Lifecycle) {
        let (slot, id) = match event {
            Lifecycle::Create(id) => (HookSlot::Create, id),
            Lifecycle::Update(id) => (HookSlot::Update, id),
            Lifecycle::Remove(id) => (HookSlot::Remove, id),
        };
        let hooks = self.nodes.borrow()[id.idx()].hooks.clone();
        tracing::trace!(?slot, node = ?id, "dispatch");

        if slot != HookSlot::Remove {
            hooks.fire(slot, &id, &Completion::inert());
            return;
        }
        if hooks.is_empty(HookSlot::Remove) {
            self.detach(&id);
            return;
        }
        let host = Rc::downgrade(self);
        let done = Completion::new(move || {
            if let Some(host) = host.upgrade()
                && host.parent(&id).is_some()
            {
                host.detach(&id);
            }
        });
        hooks.fire(HookSlot::Remove, &id, &done);
    }

    fn origin_of(&self, nodes: &[SimNode], id: NodeId) -> Point {
        let Some(parent) = nodes[id.idx()].parent else {
            if id == self.root {
                return Point::ZERO - self.scroll.get();
            }
            return Point::ZERO;
        };
        let base = self.origin_of(nodes, parent);
        let offset: f64 = nodes[parent.idx()]
            .children
            .iter()
            .take_while(|&&c| c != id)
            .map(|c| nodes[c.idx()].height)
            .sum();
        Point::new(base.x, base.y + offset)
    }
}

impl NodeSurface for SimHost {
    type Node = NodeId;

    fn style(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.idx()].style.get(name).cloned()
    }

    fn set_style(&self, node: &NodeId, name: &str, value: Option<&str>) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.idx()].style;
        match value {
            Some(v) if !v.is_empty() => {
                style.insert(name.to_owned(), v.to_owned());
            }
            _ => {
                style.remove(name);
            }
        }
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.idx()].attrs.get(name).cloned()
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: Option<&str>) {
        let mut nodes = self.nodes.borrow_mut();
        let attrs = &mut nodes[node.idx()].attrs;
        match value {
            Some(v) => {
                attrs.insert(name.to_owned(), v.to_owned());
            }
            None => {
                attrs.remove(name);
            }
        }
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.idx()].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.idx()]
            .classes
            .retain(|c| c != class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.idx()]
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.idx()].parent
    }

    fn detach(&self, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[node.idx()].parent.take() else {
            return;
        };
        nodes[node.idx()].removing = false;
        nodes[parent.idx()].children.retain(|c| c != node);
    }
}

impl Geometry for SimHost {
    fn origin(&self, node: &NodeId) -> Point {
        let nodes = self.nodes.borrow();
        self.origin_of(&nodes, *node)
    }

    fn computed_transform(&self, node: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let n = &nodes[node.idx()];
        let rules = self.class_transforms.borrow();
        n.classes
            .iter()
            .find_map(|c| rules.get(c).cloned())
            .or_else(|| n.style.get(TRANSFORM).cloned())
            .unwrap_or_else(|| "none".to_owned())
    }

    fn on_viewport_change(&self, listener: ViewportListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

impl Scheduler for SimHost {
    fn set_timeout(&self, after: Duration, task: Task) {
        let mut clock = self.clock.borrow_mut();
        clock.seq += 1;
        let key = (clock.now + after, clock.seq);
        clock.queue.insert(key, task);
    }

    fn request_frame(&self, task: Task) {
        self.set_timeout(self.frame_interval, task);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/sim.rs"]
mod tests;
