use std::collections::BTreeMap;
use std::time::Duration;

use crate::foundation::core::{Affine, Vec2, millis};
use crate::foundation::error::{FlipError, FlipResult};

/// Inline style declarations, property name to value.
pub type StyleMap = BTreeMap<String, String>;

/// Style mutations: `Some` sets a property, `None` clears it.
pub type StylePatch = BTreeMap<String, Option<String>>;

/// Inline style property holding the transform.
pub const TRANSFORM: &str = "transform";
/// Inline style property holding the transition.
pub const TRANSITION: &str = "transition";

/// `translate(Xpx, Ypx)`.
pub fn format_translate(v: Vec2) -> String {
    format!("translate({}px, {}px)", v.x, v.y)
}

/// `matrix(a, b, c, d, e, f)`.
pub fn format_matrix(a: Affine) -> String {
    let [a, b, c, d, e, f] = a.as_coeffs();
    format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
}

/// Shortest CSS form of `a`: a translation when the linear part is the identity.
pub fn format_transform(a: Affine) -> String {
    let [sx, ky, kx, sy, _, _] = a.as_coeffs();
    if [sx, ky, kx, sy] == [1.0, 0.0, 0.0, 1.0] {
        format_translate(a.translation())
    } else {
        format_matrix(a)
    }
}

/// `all <easing> <time>ms`.
pub fn transition_value(easing: &str, time: Duration) -> String {
    format!("all {easing} {}ms", millis(time))
}

/// Resolve a computed transform string into an affine matrix.
///
/// Accepts `none` (and the empty string), `matrix(..)`, `matrix3d(..)` (its 2D part) and
/// `translate(..)`.
pub fn parse_transform(s: &str) -> FlipResult<Affine> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(Affine::IDENTITY);
    }

    let (name, rest) = s
        .split_once('(')
        .ok_or_else(|| FlipError::transform(format!("expected a transform function in '{s}'")))?;
    let args = rest
        .strip_suffix(')')
        .ok_or_else(|| FlipError::transform(format!("unterminated transform '{s}'")))?;
    let values = args
        .split(',')
        .map(|v| parse_number(v, s))
        .collect::<FlipResult<Vec<f64>>>()?;

    match (name.trim().to_ascii_lowercase().as_str(), values.as_slice()) {
        ("matrix", &[a, b, c, d, e, f]) => Ok(Affine::new([a, b, c, d, e, f])),
        ("matrix3d", m) if m.len() == 16 => Ok(Affine::new([m[0], m[1], m[4], m[5], m[12], m[13]])),
        ("translate", &[x]) => Ok(Affine::translate((x, 0.0))),
        ("translate", &[x, y]) => Ok(Affine::translate((x, y))),
        (other, _) => Err(FlipError::transform(format!(
            "unsupported transform '{other}' with {} arguments",
            values.len()
        ))),
    }
}

fn parse_number(raw: &str, whole: &str) -> FlipResult<f64> {
    let t = raw.trim();
    let t = t.strip_suffix("px").unwrap_or(t);
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FlipError::transform(format!(
            "invalid number '{}' in '{whole}'",
            raw.trim()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flip/css.rs"]
mod tests;
