use std::time::Duration;

pub use kurbo::{Affine, Point, Vec2};

/// Truncate both components toward zero, normalizing `-0.0` to `0.0`.
pub(crate) fn trunc_vec(v: Vec2) -> Vec2 {
    Vec2::new(v.x.trunc() + 0.0, v.y.trunc() + 0.0)
}

/// Whole milliseconds of `d` as written into CSS time values.
pub(crate) fn millis(d: Duration) -> u128 {
    d.as_millis()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
