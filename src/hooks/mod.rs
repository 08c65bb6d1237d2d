//! Lifecycle hook slots, their composition and the virtual node description carrying them.

/// Handler lists per slot, the dispatcher and `compose`.
pub mod compose;
/// Virtual node description handed to the rendering framework.
pub mod vnode;
