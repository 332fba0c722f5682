//! Space Shooter - A top-down arcade survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, session state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Run-loop preferences
//! - `renderer`: Terminal presentation of simulation snapshots
//! - `platform`: Terminal input sampling and frame clock

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Result, ShooterError};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Run-loop configuration constants
pub mod consts {
    /// Default playfield size (world units) when no terminal is attached
    pub const DEFAULT_WIDTH: f32 = 900.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Frames per second the run loop aims for
    pub const TARGET_FPS: u32 = 60;
    /// Largest dt handed to a single step (a stalled frame never teleports entities)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World units covered by one terminal cell
    pub const CELL_WIDTH: f32 = 10.0;
    pub const CELL_HEIGHT: f32 = 20.0;

    /// Straight up in screen space (y grows downward)
    pub const UP_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;
}

/// Clamp a scalar into [lo, hi]
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(v))
}

/// True iff two circles touch or overlap (equality counts as a hit)
#[inline]
pub fn circle_collide(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    p1.distance(p2) <= r1 + r2
}

/// Unit vector pointing along `angle` (radians, screen space)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a velocity vector, or straight up when nearly at rest
#[inline]
pub fn facing_angle(vel: Vec2) -> f32 {
    if vel.length_squared() > 10.0 {
        vel.y.atan2(vel.x)
    } else {
        consts::UP_ANGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_circle_collide_touching_counts() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(circle_collide(a, 4.0, b, 6.0));
        assert!(!circle_collide(a, 4.0, b, 5.9));
    }

    #[test]
    fn test_facing_angle_at_rest_points_up() {
        assert_eq!(facing_angle(Vec2::ZERO), consts::UP_ANGLE);
        let right = facing_angle(Vec2::new(100.0, 0.0));
        assert!(right.abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn circle_collide_matches_distance(
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0,
            x2 in -500.0f32..500.0, y2 in -500.0f32..500.0,
            r1 in 0.0f32..50.0, r2 in 0.0f32..50.0,
        ) {
            let p1 = Vec2::new(x1, y1);
            let p2 = Vec2::new(x2, y2);
            prop_assert_eq!(circle_collide(p1, r1, p2, r2), p1.distance(p2) <= r1 + r2);
            prop_assert_eq!(circle_collide(p1, r1, p2, r2), circle_collide(p2, r2, p1, r1));
        }
    }
}
