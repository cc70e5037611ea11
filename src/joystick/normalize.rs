//! Drag-to-vector normalization for the virtual joystick.
//!
//! # Stick Projection
//!
//! The stick travels inside a boundary circle of radius `max_distance`.
//! Drags that leave the circle are projected back onto its edge along the
//! drag direction (radial clamp), never clamped per axis. This keeps the
//! reported magnitude at or below 1.0 in every direction, diagonals included.
//!
//! # Key Functions
//!
//! - [`project_to_circle`]: raw drag displacement -> visual stick offset
//! - [`normalize_offset`]: stick offset -> reported input vector in [-1, 1]
//! - [`radial_clamp`]: cap an already-normalized vector at magnitude 1.0

use crate::geometry::Vec2;

/// Constrain a drag displacement to the boundary circle.
///
/// Inside the circle (distance <= `max_distance`) the displacement is
/// returned unchanged. Outside, the result is the point on the circle at
/// angle `atan2(dy, dx)`.
///
/// # Example
/// ```
/// use touchstick::joystick::normalize::project_to_circle;
///
/// let offset = project_to_circle(100.0, 0.0, 45.0);
/// assert_eq!((offset.x, offset.y), (45.0, 0.0));
///
/// let offset = project_to_circle(30.0, 0.0, 45.0);
/// assert_eq!((offset.x, offset.y), (30.0, 0.0));
/// ```
pub fn project_to_circle(dx: f32, dy: f32, max_distance: f32) -> Vec2 {
    let distance = (dx * dx + dy * dy).sqrt();

    if distance <= max_distance {
        return Vec2::new(dx, dy);
    }

    let angle = dy.atan2(dx);
    Vec2::new(max_distance * angle.cos(), max_distance * angle.sin())
}

/// Convert a stick offset into the reported input vector.
///
/// `max_distance` must be positive; the joystick configuration guarantees it.
pub fn normalize_offset(offset: Vec2, max_distance: f32) -> Vec2 {
    Vec2::new(offset.x / max_distance, offset.y / max_distance)
}

/// Clamp input to unit circle.
///
/// Only modifies vectors outside the unit circle by scaling them back
/// to magnitude 1.0. Interior vectors are preserved exactly.
///
/// - At (0.5, 0.5): magnitude = 0.707, output = (0.5, 0.5) unchanged
/// - At (1, 1): magnitude = 1.414 > 1, output = (0.707, 0.707)
pub fn radial_clamp(input: Vec2) -> Vec2 {
    let magnitude = input.length();

    if magnitude <= 1.0 {
        input
    } else {
        Vec2::new(input.x / magnitude, input.y / magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX: f32 = 45.0;

    #[test]
    fn test_inside_circle_unchanged() {
        let offset = project_to_circle(30.0, 0.0, MAX);
        assert_eq!(offset, Vec2::new(30.0, 0.0));

        let reported = normalize_offset(offset, MAX);
        assert_eq!(reported, Vec2::new(30.0 / 45.0, 0.0));
        assert!((reported.x - 0.667).abs() < 0.001);
    }

    #[test]
    fn test_on_circle_unchanged() {
        let offset = project_to_circle(27.0, 36.0, MAX); // 3-4-5 triangle, distance 45
        assert_eq!(offset, Vec2::new(27.0, 36.0));
    }

    #[test]
    fn test_beyond_circle_projected() {
        let offset = project_to_circle(100.0, 0.0, MAX);
        assert_eq!(normalize_offset(offset, MAX), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_diagonal_projected_jointly() {
        // Per-axis clamping would give (1, 1); projection keeps the direction
        let reported = normalize_offset(project_to_circle(100.0, -100.0, MAX), MAX);
        assert!((reported.length() - 1.0).abs() < 1e-5);
        assert!((reported.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((reported.y + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_centre() {
        assert_eq!(project_to_circle(0.0, 0.0, MAX), Vec2::ZERO);
    }

    #[test]
    fn test_radial_clamp() {
        assert_eq!(radial_clamp(Vec2::new(0.5, 0.5)), Vec2::new(0.5, 0.5));
        let clamped = radial_clamp(Vec2::new(1.0, 1.0));
        assert!((clamped.length() - 1.0).abs() < 1e-6);
        assert_eq!(radial_clamp(Vec2::ZERO), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_inside_reports_exact_ratio(dx in -45.0f32..45.0, dy in -45.0f32..45.0) {
            prop_assume!((dx * dx + dy * dy).sqrt() <= MAX);
            let reported = normalize_offset(project_to_circle(dx, dy, MAX), MAX);
            prop_assert_eq!(reported, Vec2::new(dx / MAX, dy / MAX));
        }

        #[test]
        fn prop_outside_reports_unit_length_same_direction(
            dx in -10_000.0f32..10_000.0,
            dy in -10_000.0f32..10_000.0,
        ) {
            prop_assume!((dx * dx + dy * dy).sqrt() > MAX);
            let reported = normalize_offset(project_to_circle(dx, dy, MAX), MAX);
            prop_assert!((reported.length() - 1.0).abs() < 1e-4);

            let expected = dy.atan2(dx);
            let actual = reported.y.atan2(reported.x);
            let diff = (expected - actual).abs();
            let diff = diff.min(2.0 * std::f32::consts::PI - diff);
            prop_assert!(diff < 1e-4, "angle {} vs {}", actual, expected);
        }

        #[test]
        fn prop_reported_magnitude_never_exceeds_one(
            dx in -10_000.0f32..10_000.0,
            dy in -10_000.0f32..10_000.0,
        ) {
            let reported = normalize_offset(project_to_circle(dx, dy, MAX), MAX);
            prop_assert!(reported.length() <= 1.0 + 1e-5);
            prop_assert!(reported.x.abs() <= 1.0 + 1e-6);
            prop_assert!(reported.y.abs() <= 1.0 + 1e-6);
        }
    }
}
