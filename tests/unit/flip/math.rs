use super::*;

#[test]
fn first_observation_is_identity() {
    for current in [Point::ZERO, Point::new(10.0, -4.0), Point::new(1e6, 3.5)] {
        assert_eq!(invert(None, current), Affine::IDENTITY);
    }
}

#[test]
fn invert_translates_by_old_minus_new() {
    let a = invert(Some(Point::new(0.0, 40.0)), Point::new(0.0, 0.0));
    assert_eq!(a.as_coeffs(), [1.0, 0.0, 0.0, 1.0, 0.0, 40.0]);
}

#[test]
fn invert_truncates_toward_zero() {
    let a = invert(Some(Point::new(10.7, 0.0)), Point::new(0.0, 10.7));
    assert_eq!(a.translation(), Vec2::new(10.0, -10.0));
}

#[test]
fn inverse_cancels_layout_move() {
    let pairs = [
        (Point::new(0.0, 0.0), Point::new(0.0, 20.0)),
        (Point::new(5.0, 60.0), Point::new(5.0, 0.0)),
        (Point::new(-30.0, 12.0), Point::new(44.0, -8.0)),
    ];
    for (old, new) in pairs {
        let drawn = invert(Some(old), new) * new;
        assert_eq!(drawn, old);
    }
}

#[test]
fn with_style_keeps_linear_part() {
    let target = Affine::new([2.0, 0.0, 0.0, 2.0, 5.0, 0.0]);
    let a = invert_with_style(Some(Point::new(0.0, 30.0)), Point::new(0.0, 10.0), target);
    assert_eq!(a.as_coeffs(), [2.0, 0.0, 0.0, 2.0, 5.0, 20.0]);
}

#[test]
fn with_style_without_prior_is_target() {
    let target = Affine::new([0.0, 1.0, -1.0, 0.0, 3.0, 4.0]);
    assert_eq!(invert_with_style(None, Point::new(9.0, 9.0), target), target);
}
