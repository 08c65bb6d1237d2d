use std::hash::Hash;

use indexmap::IndexMap;

use crate::foundation::core::{Point, Vec2};
use crate::host::Geometry;

/// Attribute mirroring the last observed `left` of a tracked node.
pub const ATTR_X: &str = "data-flip-x";
/// Attribute mirroring the last observed `top` of a tracked node.
pub const ATTR_Y: &str = "data-flip-y";

/// Last observed position of a monitored node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedNode {
    /// Last observed `left`, viewport pixels.
    pub last_x: f64,
    /// Last observed `top`, viewport pixels.
    pub last_y: f64,
}

impl TrackedNode {
    fn at(p: Point) -> Self {
        Self {
            last_x: p.x,
            last_y: p.y,
        }
    }

    /// Position as a point.
    pub fn point(self) -> Point {
        Point::new(self.last_x, self.last_y)
    }
}

/// Outcome of [`PositionTracker::capture`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capture {
    /// Position before this capture; `None` on a first observation.
    pub previous: Option<Point>,
    /// Position read by this capture.
    pub current: Point,
}

impl Capture {
    /// Raw `previous - current`, `None` on a first observation.
    pub fn delta(self) -> Option<Vec2> {
        self.previous.map(|p| p - self.current)
    }
}

/// Registry of monitored nodes and their last observed positions.
///
/// Every capture is mirrored into the node's [`ATTR_X`]/[`ATTR_Y`] attributes, and those are
/// consulted when the registry itself has no entry, so positions survive across independent
/// tracker instances bound to the same tree.
#[derive(Debug)]
pub struct PositionTracker<N> {
    tracked: IndexMap<N, TrackedNode>,
}

impl<N> Default for PositionTracker<N> {
    fn default() -> Self {
        Self {
            tracked: IndexMap::new(),
        }
    }
}

impl<N> PositionTracker<N>
where
    N: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked nodes.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// `true` when `node` is in the tracked set.
    pub fn is_tracked(&self, node: &N) -> bool {
        self.tracked.contains_key(node)
    }

    /// Start tracking `node`, capturing its current position.
    ///
    /// Returns `false` (and does nothing) when the node is already tracked.
    pub fn register<H>(&mut self, host: &H, node: &N) -> bool
    where
        H: Geometry<Node = N> + ?Sized,
    {
        if self.tracked.contains_key(node) {
            return false;
        }
        let current = host.origin(node);
        persist(host, node, current);
        self.tracked.insert(node.clone(), TrackedNode::at(current));
        tracing::trace!(?node, x = current.x, y = current.y, "tracking registered");
        true
    }

    /// Stop tracking `node`. Absent nodes are ignored.
    pub fn unregister(&mut self, node: &N) -> bool {
        self.tracked.shift_remove(node).is_some()
    }

    /// Last recorded position of `node`, from the registry or its persisted attributes.
    pub fn last_position<H>(&self, host: &H, node: &N) -> Option<Point>
    where
        H: Geometry<Node = N> + ?Sized,
    {
        if let Some(entry) = self.tracked.get(node) {
            return Some(entry.point());
        }
        let x = host.attr(node, ATTR_X)?.parse::<f64>().ok()?;
        let y = host.attr(node, ATTR_Y)?.parse::<f64>().ok()?;
        Some(Point::new(x, y))
    }

    /// Read the node's geometry, record it and return it with the previous position.
    pub fn capture<H>(&mut self, host: &H, node: &N) -> Capture
    where
        H: Geometry<Node = N> + ?Sized,
    {
        let previous = self.last_position(host, node);
        let current = host.origin(node);
        persist(host, node, current);
        if let Some(entry) = self.tracked.get_mut(node) {
            *entry = TrackedNode::at(current);
        }
        Capture { previous, current }
    }

    /// Re-capture every tracked node, in registration order.
    ///
    /// Nodes no longer attached to a parent are dropped from the tracked set.
    pub fn update_all<H>(&mut self, host: &H)
    where
        H: Geometry<Node = N> + ?Sized,
    {
        let before = self.tracked.len();
        self.tracked.retain(|node, entry| {
            if host.parent(node).is_none() {
                return false;
            }
            let current = host.origin(node);
            persist(host, node, current);
            *entry = TrackedNode::at(current);
            true
        });
        tracing::trace!(
            count = self.tracked.len(),
            dropped = before - self.tracked.len(),
            "tracked positions refreshed"
        );
    }

    /// Tracked entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&N, &TrackedNode)> {
        self.tracked.iter()
    }
}

fn persist<H>(host: &H, node: &H::Node, p: Point)
where
    H: Geometry + ?Sized,
{
    host.set_attr(node, ATTR_X, Some(&p.x.to_string()));
    host.set_attr(node, ATTR_Y, Some(&p.y.to_string()));
}

#[cfg(test)]
#[path = "../../tests/unit/track/tracker.rs"]
mod tests;
