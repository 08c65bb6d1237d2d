//! FLIP geometry and its CSS representation.

/// Transform and style-value formatting/parsing.
pub mod css;
/// Inverse transforms from old/new positions.
pub mod math;
