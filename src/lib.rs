//! flipkit binds FLIP (First, Last, Invert, Play) transitions to the lifecycle hooks of a
//! diffed UI tree.
//!
//! - [`Transitions`] hands out installers (`enter`, `moves`, `exit`, `change`) that add hooks
//!   to a [`VNode`] before the rendering framework mounts it.
//! - Hooks compose: application handlers and any number of transitions share a slot.
//! - The visual layer and scheduler are reached through [`host::Host`]; [`host::sim::SimHost`]
//!   is a deterministic in-memory implementation.
#![forbid(unsafe_code)]

mod foundation;

pub mod flip;
pub mod hooks;
pub mod host;
pub mod lifecycle;
pub mod track;
pub mod transition;

pub use crate::foundation::core::{Affine, Point, Vec2};
pub use crate::foundation::error::{FlipError, FlipResult};

pub use crate::hooks::compose::{Completion, Handler, HookSlot, Hooks, compose};
pub use crate::hooks::vnode::{Props, VNode};
pub use crate::host::Host;
pub use crate::lifecycle::{Transitions, apply_all, combine, group};
pub use crate::track::tracker::{Capture, PositionTracker};
pub use crate::transition::binder::{Installer, TransitionBinder, TransitionKind};
pub use crate::transition::config::{ConfigSource, Css, TransitionConfig, TransitionDef};
