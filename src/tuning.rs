//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The simulation holds one
//! immutable copy for the whole session; a JSON file can override any
//! subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShooterError};

/// Gameplay constants (times in seconds, distances in world units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_accel: f32,
    /// Velocity multiplier applied once per step (not scaled by dt)
    pub player_friction: f32,
    pub player_radius: f32,
    pub player_max_hp: u8,
    pub player_fire_cooldown: f32,
    /// Cooldown multiplier while the rapid power is active
    pub rapid_fire_factor: f32,
    pub player_dash_cooldown: f32,
    pub player_dash_time: f32,
    pub player_dash_mult: f32,
    /// Extra invulnerability past the end of a dash
    pub dash_invuln_margin: f32,
    /// Invulnerability granted to a freshly spawned ship
    pub spawn_invuln: f32,
    /// Recovery window after taking damage
    pub hit_invuln: f32,
    pub shield_pickup_invuln: f32,
    /// Extra radius when testing power-up pickups
    pub pickup_margin: f32,

    // === Scoring ===
    pub score_normal: u64,
    pub score_elite: u64,
    pub multiplier_max: u32,
    pub multiplier_window: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Angular offset of the outer bullets with the spread power (radians)
    pub bullet_spread: f32,
    /// Fraction of `bullet_spread` used as random jitter for held fire
    pub bullet_jitter: f32,
    pub bullet_life: f32,
    /// Gap between the ship hull and a fresh bullet
    pub bullet_nose_gap: f32,

    // === Enemies & spawning ===
    pub enemy_min_spawn: f32,
    pub enemy_max_spawn: f32,
    pub spawn_floor: f32,
    pub spawn_min_window: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_variance: f32,
    pub enemy_radius: f32,
    pub elite_radius: f32,
    pub elite_hp: u8,
    pub elite_chance_per_level: f32,
    pub elite_chance_cap: f32,
    pub wobble_amplitude: f32,
    pub elite_wobble_amplitude: f32,
    pub elite_wobble_rate: f32,
    /// Seconds per difficulty level
    pub wave_time: f32,
    /// Horizontal keep-out from the side edges for spawns
    pub spawn_edge_margin: f32,
    pub spawn_height: f32,

    // === Power-ups ===
    pub powerup_chance: f32,
    pub elite_drop_boost: f32,
    pub powerup_duration: f32,
    pub powerup_radius: f32,
    pub powerup_bob_speed: f32,
    pub powerup_bob_rate: f32,

    // === Particles & decoration ===
    pub particle_shrink: f32,
    pub particle_drag: f32,
    pub max_stars: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_accel: 1800.0,
            player_friction: 0.85,
            player_radius: 14.0,
            player_max_hp: 4,
            player_fire_cooldown: 0.14,
            rapid_fire_factor: 0.55,
            player_dash_cooldown: 1.6,
            player_dash_time: 0.18,
            player_dash_mult: 3.6,
            dash_invuln_margin: 0.05,
            spawn_invuln: 1.2,
            hit_invuln: 1.0,
            shield_pickup_invuln: 0.75,
            pickup_margin: 4.0,

            score_normal: 7,
            score_elite: 15,
            multiplier_max: 8,
            multiplier_window: 4.0,

            bullet_speed: 700.0,
            bullet_radius: 3.0,
            bullet_spread: 0.06,
            bullet_jitter: 0.6,
            bullet_life: 1.4,
            bullet_nose_gap: 2.0,

            enemy_min_spawn: 0.45,
            enemy_max_spawn: 0.9,
            spawn_floor: 0.18,
            spawn_min_window: 0.05,
            enemy_base_speed: 90.0,
            enemy_speed_variance: 90.0,
            enemy_radius: 16.0,
            elite_radius: 22.0,
            elite_hp: 3,
            elite_chance_per_level: 0.05,
            elite_chance_cap: 0.4,
            wobble_amplitude: 40.0,
            elite_wobble_amplitude: 60.0,
            elite_wobble_rate: 1.3,
            wave_time: 35.0,
            spawn_edge_margin: 40.0,
            spawn_height: -30.0,

            powerup_chance: 0.12,
            elite_drop_boost: 1.2,
            powerup_duration: 12.0,
            powerup_radius: 12.0,
            powerup_bob_speed: 20.0,
            powerup_bob_rate: 2.0,

            particle_shrink: 40.0,
            particle_drag: 0.98,
            max_stars: 140,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("player_accel", self.player_accel),
            ("player_radius", self.player_radius),
            ("player_fire_cooldown", self.player_fire_cooldown),
            ("rapid_fire_factor", self.rapid_fire_factor),
            ("player_dash_time", self.player_dash_time),
            ("player_dash_mult", self.player_dash_mult),
            ("multiplier_window", self.multiplier_window),
            ("bullet_speed", self.bullet_speed),
            ("bullet_radius", self.bullet_radius),
            ("bullet_life", self.bullet_life),
            ("enemy_min_spawn", self.enemy_min_spawn),
            ("enemy_max_spawn", self.enemy_max_spawn),
            ("spawn_floor", self.spawn_floor),
            ("enemy_radius", self.enemy_radius),
            ("elite_radius", self.elite_radius),
            ("wave_time", self.wave_time),
            ("powerup_duration", self.powerup_duration),
            ("powerup_radius", self.powerup_radius),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        // These bound random ranges, which must never be empty
        let non_negative = [
            ("enemy_speed_variance", self.enemy_speed_variance),
            ("enemy_base_speed", self.enemy_base_speed),
            ("spawn_min_window", self.spawn_min_window),
            ("spawn_edge_margin", self.spawn_edge_margin),
            ("bullet_jitter", self.bullet_jitter),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(invalid(field, format!("must be zero or more, got {value}")));
            }
        }

        if !(self.player_friction > 0.0 && self.player_friction <= 1.0) {
            return Err(invalid(
                "player_friction",
                format!("must be in (0, 1], got {}", self.player_friction),
            ));
        }
        if !(self.particle_drag > 0.0 && self.particle_drag <= 1.0) {
            return Err(invalid(
                "particle_drag",
                format!("must be in (0, 1], got {}", self.particle_drag),
            ));
        }
        if self.enemy_max_spawn < self.enemy_min_spawn {
            return Err(invalid(
                "enemy_max_spawn",
                format!("must be >= enemy_min_spawn ({})", self.enemy_min_spawn),
            ));
        }
        if self.player_max_hp == 0 {
            return Err(invalid("player_max_hp", "must be at least 1".into()));
        }
        if self.elite_hp == 0 {
            return Err(invalid("elite_hp", "must be at least 1".into()));
        }
        if self.multiplier_max == 0 {
            return Err(invalid("multiplier_max", "must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(invalid(
                "powerup_chance",
                format!("must be a probability, got {}", self.powerup_chance),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ShooterError {
    ShooterError::InvalidTuning { field, reason }
}
