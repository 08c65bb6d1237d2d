use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle hook slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookSlot {
    /// Node was created and attached.
    Create,
    /// Node was patched in place (possibly moved).
    Update,
    /// Node is about to be removed; transition bindings own the removal through a
    /// [`Completion`].
    Remove,
}

impl HookSlot {
    /// All slots in dispatch-table order.
    pub const ALL: [HookSlot; 3] = [HookSlot::Create, HookSlot::Update, HookSlot::Remove];

    fn index(self) -> usize {
        match self {
            Self::Create => 0,
            Self::Update => 1,
            Self::Remove => 2,
        }
    }
}

/// A lifecycle callback. Every slot uses the same shape; create and update receive an inert
/// [`Completion`].
pub type Handler<N> = Rc<dyn Fn(&N, &Completion)>;

type Finalizer = Box<dyn FnOnce()>;

/// One-shot continuation finalizing a deferred removal.
///
/// Clones share the same finalizer, so whichever party calls [`Completion::complete`] first
/// runs it and every later call is a no-op.
#[derive(Clone, Default)]
pub struct Completion {
    finalizer: Option<Rc<RefCell<Option<Finalizer>>>>,
}

impl Completion {
    /// Completion that runs `f` on the first `complete` call.
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            finalizer: Some(Rc::new(RefCell::new(Some(Box::new(f))))),
        }
    }

    /// Completion with nothing to finalize.
    pub fn inert() -> Self {
        Self::default()
    }

    /// `true` while a finalizer is still pending.
    pub fn is_armed(&self) -> bool {
        self.finalizer
            .as_ref()
            .is_some_and(|cell| cell.borrow().is_some())
    }

    /// Run the finalizer if it has not run yet. Returns whether it ran.
    pub fn complete(&self) -> bool {
        let Some(cell) = self.finalizer.as_ref() else {
            return false;
        };
        let pending = cell.borrow_mut().take();
        match pending {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Combine two optional handlers for the same slot.
///
/// An absent side yields the other unchanged. Otherwise the result calls `f1` then `f2` with
/// the same arguments and returns nothing; removal timing stays with whoever completes the
/// shared [`Completion`].
pub fn compose<N: 'static>(f1: Option<Handler<N>>, f2: Option<Handler<N>>) -> Option<Handler<N>> {
    match (f1, f2) {
        (None, f) | (f, None) => f,
        (Some(a), Some(b)) => Some(Rc::new(move |node: &N, done: &Completion| {
            a(node, done);
            b(node, done);
        })),
    }
}

struct Entry<N> {
    handler: Handler<N>,
    binding: bool,
}

impl<N> Clone for Entry<N> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
            binding: self.binding,
        }
    }
}

/// Ordered handler lists, one per [`HookSlot`].
///
/// Handlers are either application hooks ([`Hooks::push`]) or transition bindings
/// ([`Hooks::bind`]). When a slot holds at least one binding, only the bindings receive the
/// firing's [`Completion`]; application hooks get an inert one and cannot finish a removal.
pub struct Hooks<N> {
    slots: [Vec<Entry<N>>; 3],
}

impl<N> Default for Hooks<N> {
    fn default() -> Self {
        Self {
            slots: [Vec::new(), Vec::new(), Vec::new()],
        }
    }
}

impl<N> Clone for Hooks<N> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<N> fmt::Debug for Hooks<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("create", &self.slots[0].len())
            .field("update", &self.slots[1].len())
            .field("remove", &self.slots[2].len())
            .finish()
    }
}

impl<N: 'static> Hooks<N> {
    /// Empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an application `handler` to `slot`; it fires after every handler already there.
    pub fn push(&mut self, slot: HookSlot, handler: Handler<N>) {
        self.slots[slot.index()].push(Entry {
            handler,
            binding: false,
        });
    }

    /// Append a transition binding to `slot`. Bindings own the slot's [`Completion`].
    pub fn bind(&mut self, slot: HookSlot, handler: Handler<N>) {
        self.slots[slot.index()].push(Entry {
            handler,
            binding: true,
        });
    }

    /// Builder form of [`Hooks::push`].
    pub fn on(mut self, slot: HookSlot, f: impl Fn(&N, &Completion) + 'static) -> Self {
        self.push(slot, Rc::new(f));
        self
    }

    /// Number of handlers registered for `slot`.
    pub fn len(&self, slot: HookSlot) -> usize {
        self.slots[slot.index()].len()
    }

    /// `true` when `slot` has no handler.
    pub fn is_empty(&self, slot: HookSlot) -> bool {
        self.slots[slot.index()].is_empty()
    }

    /// Number of transition bindings in `slot`.
    pub fn bindings(&self, slot: HookSlot) -> usize {
        self.slots[slot.index()]
            .iter()
            .filter(|e| e.binding)
            .count()
    }

    /// The slot's handlers folded into a single callback with [`compose`].
    ///
    /// Application hooks are shielded from the completion when the slot has a binding.
    pub fn handler(&self, slot: HookSlot) -> Option<Handler<N>> {
        let shield = self.bindings(slot) > 0;
        self.slots[slot.index()]
            .iter()
            .map(|entry| {
                if shield && !entry.binding {
                    let app = Rc::clone(&entry.handler);
                    Rc::new(move |node: &N, _: &Completion| app(node, &Completion::inert()))
                        as Handler<N>
                } else {
                    Rc::clone(&entry.handler)
                }
            })
            .fold(None, |acc, h| compose(acc, Some(h)))
    }

    /// Invoke every handler of `slot` once, in registration order.
    pub fn fire(&self, slot: HookSlot, node: &N, done: &Completion) {
        let shield = self.bindings(slot) > 0;
        let inert = Completion::inert();
        for entry in &self.slots[slot.index()] {
            let done = if shield && !entry.binding { &inert } else { done };
            (entry.handler)(node, done);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hooks/compose.rs"]
mod tests;
