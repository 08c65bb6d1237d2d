use crate::foundation::core::{Affine, Point, Vec2, trunc_vec};

/// Pixel delta that moves a node drawn at `current` back to `previous`.
///
/// Truncated toward zero to whole device pixels; zero when there is no prior position.
pub fn inverse_delta(previous: Option<Point>, current: Point) -> Vec2 {
    match previous {
        Some(p) => trunc_vec(p - current),
        None => Vec2::ZERO,
    }
}

/// Translation that makes a node appear at its previous position.
///
/// A first observation (`previous == None`) yields the identity, so freshly mounted nodes never
/// animate from a meaningless delta.
pub fn invert(previous: Option<Point>, current: Point) -> Affine {
    match previous {
        Some(_) => Affine::translate(inverse_delta(previous, current)),
        None => Affine::IDENTITY,
    }
}

/// Like [`invert`], but layered on top of a target-style matrix.
///
/// The linear part (scale, rotation, skew) of `target` is kept and its translation is offset by
/// the positional delta.
pub fn invert_with_style(previous: Option<Point>, current: Point, target: Affine) -> Affine {
    let delta = inverse_delta(previous, current);
    target.with_translation(target.translation() + delta)
}

#[cfg(test)]
#[path = "../../tests/unit/flip/math.rs"]
mod tests;
