//! Read-only view of the world handed to presentation
//!
//! Borrowed from `GameState` once per frame; serializable so the headless
//! run can dump it as JSON.

use glam::Vec2;
use serde::Serialize;

use super::state::{
    Bounds, Bullet, Enemy, GamePhase, GameState, Particle, PowerTimers, PowerUp, SessionStats,
    Star,
};
use crate::facing_angle;

/// Player fields presentation needs
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    /// Facing in radians (straight up when nearly still)
    pub heading: f32,
    pub hp: u8,
    pub max_hp: u8,
    pub powers: PowerTimers,
    pub score: u64,
    pub multiplier: u32,
    pub invulnerable: bool,
    /// Draw dimmed this frame
    pub flicker: bool,
    pub dash_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub bounds: Bounds,
    pub elapsed: f32,
    pub difficulty: u32,
    pub player: PlayerView,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub particles: &'a [Particle],
    pub powerups: &'a [PowerUp],
    pub stars: &'a [Star],
    pub stats: SessionStats,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let p = &state.player;
        Self {
            phase: state.phase,
            bounds: state.bounds,
            elapsed: state.elapsed,
            difficulty: state.difficulty,
            player: PlayerView {
                pos: p.pos,
                heading: facing_angle(p.vel),
                hp: p.hp,
                max_hp: p.max_hp,
                powers: p.powers,
                score: p.score,
                multiplier: p.multiplier,
                invulnerable: p.invuln > 0.0,
                flicker: p.flicker(),
                dash_active: p.is_dashing(),
            },
            bullets: &state.bullets,
            enemies: &state.enemies,
            particles: &state.particles,
            powerups: &state.powerups,
            stars: &state.stars,
            stats: state.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::UP_ANGLE;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(17, Bounds::new(900.0, 600.0), Tuning::default());
        state.player.score = 42;
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.player.score, 42);
        assert_eq!(snap.player.heading, UP_ANGLE);
        assert!(snap.player.invulnerable);
        assert_eq!(snap.stars.len(), state.stars.len());
        assert_eq!(snap.phase, GamePhase::Playing);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3, Bounds::new(300.0, 200.0), Tuning::default());
        let json = serde_json::to_value(Snapshot::capture(&state)).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["difficulty"], 1);
        assert_eq!(json["player"]["hp"], 4);
        assert!(json["stars"].as_array().is_some_and(|s| s.len() == 140));
    }
}
