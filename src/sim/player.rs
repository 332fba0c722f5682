//! The player's ship: movement, dash, firing, damage and scoring

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Bounds, Bullet, PowerTimers, PowerUpKind};
use super::tick::TickInput;
use crate::consts::UP_ANGLE;
use crate::tuning::Tuning;
use crate::{clamp, heading};

/// Result of trying to hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerability or shield ate the hit
    Absorbed,
    /// Hit points were removed
    Applied,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: u8,
    pub max_hp: u8,
    /// Seconds of invulnerability left
    pub invuln: f32,
    pub fire_cooldown: f32,
    pub dash_cooldown: f32,
    /// Seconds of dash burst left
    pub dash_time: f32,
    pub score: u64,
    /// Combo multiplier, 1..=multiplier_max
    pub multiplier: u32,
    /// Seconds until the combo lapses
    pub multiplier_timer: f32,
    pub powers: PowerTimers,
}

impl Player {
    /// A fresh ship at the bottom-centre of the field with spawn protection
    pub fn spawn(bounds: Bounds, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(bounds.width / 2.0, bounds.height * 0.75),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            hp: tuning.player_max_hp,
            max_hp: tuning.player_max_hp,
            invuln: tuning.spawn_invuln,
            fire_cooldown: 0.0,
            dash_cooldown: 0.0,
            dash_time: 0.0,
            score: 0,
            multiplier: 1,
            multiplier_timer: 0.0,
            powers: PowerTimers::default(),
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_time > 0.0
    }

    /// Advance timers, movement and dash by one step
    ///
    /// Friction is applied once per call rather than scaled by `dt`, so the
    /// ship glides further at lower frame rates.
    pub fn advance(&mut self, dt: f32, input: &TickInput, bounds: Bounds, tuning: &Tuning) {
        self.powers.decay(dt);
        self.multiplier_timer = (self.multiplier_timer - dt).max(0.0);
        if self.multiplier_timer <= 0.0 {
            self.multiplier = 1;
        }

        self.vel += input.move_axis() * tuning.player_accel * dt;
        self.vel *= tuning.player_friction;

        // Cooldown ticks down before the trigger test, so a dash can fire
        // on the frame the cooldown runs out
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        if input.dash
            && self.dash_cooldown <= 0.0
            && self.dash_time <= 0.0
            && self.vel.length_squared() > 1.0
        {
            self.dash_time = tuning.player_dash_time;
            self.dash_cooldown = tuning.player_dash_cooldown;
            self.invuln = self
                .invuln
                .max(tuning.player_dash_time + tuning.dash_invuln_margin);
            log::trace!("Dash at ({:.0}, {:.0})", self.pos.x, self.pos.y);
        }

        if self.dash_time > 0.0 {
            self.dash_time = (self.dash_time - dt).max(0.0);
            self.pos += self.vel * (tuning.player_dash_mult * dt);
        } else {
            self.pos += self.vel * dt;
        }

        self.invuln = (self.invuln - dt).max(0.0);

        self.pos.x = clamp(self.pos.x, self.radius, bounds.width - self.radius);
        self.pos.y = clamp(self.pos.y, self.radius, bounds.height - self.radius);

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }

    /// Fire if the gun is ready; returns the number of bullets emitted
    ///
    /// `held` is auto-fire: it adds a small random jitter to each angle.
    pub fn try_fire(
        &mut self,
        bullets: &mut Vec<Bullet>,
        held: bool,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> usize {
        if self.fire_cooldown > 0.0 {
            return 0;
        }
        self.fire_cooldown = if self.powers.is_active(PowerUpKind::Rapid) {
            tuning.player_fire_cooldown * tuning.rapid_fire_factor
        } else {
            tuning.player_fire_cooldown
        };

        let offsets: &[f32] = if self.powers.is_active(PowerUpKind::Spread) {
            &[-1.0, 0.0, 1.0]
        } else {
            &[0.0]
        };
        let jitter = tuning.bullet_spread * tuning.bullet_jitter;
        let origin = self.pos + Vec2::new(0.0, -(self.radius + tuning.bullet_nose_gap));

        for &offset in offsets {
            let mut angle = UP_ANGLE + offset * tuning.bullet_spread;
            if held && jitter > 0.0 {
                angle += rng.random_range(-jitter..=jitter);
            }
            bullets.push(Bullet {
                pos: origin,
                vel: heading(angle) * tuning.bullet_speed,
                life: tuning.bullet_life,
                radius: tuning.bullet_radius,
            });
        }
        offsets.len()
    }

    /// Apply damage unless invulnerable or shielded
    pub fn damage(&mut self, amount: u8, tuning: &Tuning) -> DamageOutcome {
        if self.invuln > 0.0 || self.powers.is_active(PowerUpKind::Shield) {
            return DamageOutcome::Absorbed;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.invuln = tuning.hit_invuln;
        DamageOutcome::Applied
    }

    /// Score `base` at the current multiplier, then grow and refresh the combo
    pub fn add_score(&mut self, base: u64, tuning: &Tuning) {
        self.score += base * self.multiplier as u64;
        self.multiplier = (self.multiplier + 1).min(tuning.multiplier_max);
        self.multiplier_timer = tuning.multiplier_window;
    }

    pub fn apply_powerup(&mut self, kind: PowerUpKind, tuning: &Tuning) {
        self.powers[kind] = tuning.powerup_duration;
        if kind == PowerUpKind::Shield {
            self.invuln = self.invuln.max(tuning.shield_pickup_invuln);
        }
    }

    /// Blink phase for the invulnerability flicker (true on "dim" frames)
    pub fn flicker(&self) -> bool {
        self.invuln > 0.0 && (self.invuln * 20.0) as u32 % 2 == 0
    }
}
