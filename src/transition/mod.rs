//! Transition configuration, the per-run state machine and the binder turning both into hooks.

/// Handlers for each transition kind and their installers.
pub mod binder;
/// Transition options and their JSON boundary model.
pub mod config;
/// One capture → style → flush → transition → settle sequence.
pub(crate) mod run;
