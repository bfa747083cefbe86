//! Collision detection primitives
//!
//! Everything in the arena collides as a circle (bullets as points). These
//! functions only answer geometric questions; `damage` decides what a hit does.

use glam::Vec2;

use super::state::Asteroid;

/// Point strictly inside a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Two circles overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    point_in_circle(a, b, radius_a + radius_b)
}

/// Index of the asteroid a bullet at `point` hits, searching from the back
/// of the list so that the lookup agrees with reverse-order removal.
pub fn bullet_target(point: Vec2, asteroids: &[Asteroid]) -> Option<usize> {
    (0..asteroids.len())
        .rev()
        .find(|&i| point_in_circle(point, asteroids[i].pos, asteroids[i].radius))
}

/// Ship has crossed the arena edge
#[inline]
pub fn outside_arena(pos: Vec2, center: Vec2, arena_radius: f32) -> bool {
    pos.distance(center) > arena_radius
}

/// How deep into the warning band a position is.
///
/// 0 inside `warning_dist`, rising linearly to 1 at `arena_radius`, clamped.
pub fn boundary_danger(dist: f32, warning_dist: f32, arena_radius: f32) -> f32 {
    if dist <= warning_dist {
        return 0.0;
    }
    let band = (arena_radius - warning_dist).max(f32::EPSILON);
    ((dist - warning_dist) / band).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::AsteroidKind;

    fn rock(x: f32, y: f32, radius: f32) -> Asteroid {
        Asteroid {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            kind: AsteroidKind::Large,
            hp: 3,
            radius,
            spin: 0.0,
            angle: 0.0,
            outline: Vec::new(),
        }
    }

    #[test]
    fn test_point_in_circle_is_strict() {
        assert!(point_in_circle(Vec2::new(39.0, 0.0), Vec2::ZERO, 40.0));
        assert!(!point_in_circle(Vec2::new(40.0, 0.0), Vec2::ZERO, 40.0));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 40.0, Vec2::new(50.0, 0.0), 12.0));
        assert!(!circles_overlap(Vec2::ZERO, 40.0, Vec2::new(60.0, 0.0), 12.0));
    }

    #[test]
    fn test_bullet_target_prefers_last() {
        let rocks = vec![rock(0.0, 0.0, 40.0), rock(10.0, 0.0, 40.0), rock(500.0, 0.0, 40.0)];
        assert_eq!(bullet_target(Vec2::new(5.0, 0.0), &rocks), Some(1));
        assert_eq!(bullet_target(Vec2::new(250.0, 0.0), &rocks), None);
    }

    #[test]
    fn test_outside_arena() {
        assert!(!outside_arena(Vec2::new(1800.0, 0.0), Vec2::ZERO, 1800.0));
        assert!(outside_arena(Vec2::new(1801.0, 0.0), Vec2::ZERO, 1800.0));
    }

    #[test]
    fn test_boundary_danger_ramp() {
        assert_eq!(boundary_danger(1000.0, 1440.0, 1800.0), 0.0);
        assert!((boundary_danger(1620.0, 1440.0, 1800.0) - 0.5).abs() < 1e-5);
        assert_eq!(boundary_danger(1800.0, 1440.0, 1800.0), 1.0);
        assert_eq!(boundary_danger(2500.0, 1440.0, 1800.0), 1.0);
    }
}
