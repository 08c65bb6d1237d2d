//! Seams to the outside world.
//!
//! flipkit never talks to a document directly. The visual layer (geometry, styles, classes),
//! the structural surface of the tree and the scheduler primitives are all reached through the
//! traits below, so the engine runs the same against a browser binding or the headless
//! [`sim::SimHost`].

/// Deterministic in-memory host for tests and debugging.
pub mod sim;

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use crate::foundation::core::Point;

/// A deferred unit of work handed to a [`Scheduler`].
pub type Task = Box<dyn FnOnce()>;

/// Callback fired on viewport resize or scroll. Returns `false` once it should be dropped.
pub type ViewportListener = Box<dyn Fn() -> bool>;

/// Mutable style/attribute surface and structure of attached nodes.
pub trait NodeSurface {
    /// Node handle. Used as a map key, so it must be cheap to clone and compare.
    type Node: Clone + Eq + Hash + fmt::Debug + 'static;

    /// Inline style value, `None` when unset.
    fn style(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// Set (`Some`) or clear (`None`) an inline style property.
    fn set_style(&self, node: &Self::Node, name: &str, value: Option<&str>);
    /// Attribute value, `None` when unset.
    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// Set (`Some`) or clear (`None`) an attribute.
    fn set_attr(&self, node: &Self::Node, name: &str, value: Option<&str>);
    /// Add a class; adding a present class is a no-op.
    fn add_class(&self, node: &Self::Node, class: &str);
    /// Remove a class; removing an absent class is a no-op.
    fn remove_class(&self, node: &Self::Node, class: &str);
    /// `true` when the class is present.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    /// Current parent, `None` once detached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Detach the node from its parent.
    fn detach(&self, node: &Self::Node);
}

/// Geometry and computed-style queries of the visual layer.
pub trait Geometry: NodeSurface {
    /// `{left, top}` of the node's box in viewport pixels.
    fn origin(&self, node: &Self::Node) -> Point;
    /// Resolved transform of the node, e.g. `none` or `matrix(1, 0, 0, 1, 0, 0)`.
    fn computed_transform(&self, node: &Self::Node) -> String;
    /// Subscribe to viewport resize and scroll notifications until the listener returns
    /// `false`.
    fn on_viewport_change(&self, listener: ViewportListener);
}

/// Asynchronous scheduling primitives.
///
/// Ordering contract: tasks due at the same instant run in the order they were scheduled.
pub trait Scheduler {
    /// Run `task` once `after` has elapsed (a macrotask timer).
    fn set_timeout(&self, after: Duration, task: Task);
    /// Run `task` on the next visual frame.
    fn request_frame(&self, task: Task);
}

/// Everything a transition needs from its environment.
pub trait Host: Geometry + Scheduler + 'static {}

impl<T> Host for T where T: Geometry + Scheduler + 'static {}
