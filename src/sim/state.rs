//! Game state and core simulation types
//!
//! The world owns every live entity; entities never reference each other.

use std::f32::consts::TAU;
use std::ops::{Index, IndexMut};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::spawn;
use crate::heading;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (world frozen)
    Paused,
    /// Player ran out of hit points
    GameOver,
}

/// Playable area in world units; origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if `pos` lies inside the bounds grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Shorter fire cooldown
    Rapid,
    /// Damage is absorbed while active
    Shield,
    /// Three-bullet fan
    Spread,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Rapid, PowerUpKind::Shield, PowerUpKind::Spread];

    fn index(self) -> usize {
        match self {
            PowerUpKind::Rapid => 0,
            PowerUpKind::Shield => 1,
            PowerUpKind::Spread => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Rapid => "Rapid",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Spread => "Spread",
        }
    }
}

/// Remaining seconds for each power, indexed by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerTimers([f32; 3]);

impl PowerTimers {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self[kind] > 0.0
    }

    /// Count every timer down, flooring at zero
    pub fn decay(&mut self, dt: f32) {
        for remaining in self.0.iter_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }
}

impl Index<PowerUpKind> for PowerTimers {
    type Output = f32;

    fn index(&self, kind: PowerUpKind) -> &f32 {
        &self.0[kind.index()]
    }
}

impl IndexMut<PowerUpKind> for PowerTimers {
    fn index_mut(&mut self, kind: PowerUpKind) -> &mut f32 {
        &mut self.0[kind.index()]
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds until expiry
    pub life: f32,
    pub radius: f32,
}

impl Bullet {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    /// Alive and inside the horizontal bounds / vertical bounds ±30
    pub fn in_play(&self, bounds: Bounds) -> bool {
        self.life > 0.0
            && self.pos.x >= 0.0
            && self.pos.x <= bounds.width
            && self.pos.y >= -30.0
            && self.pos.y <= bounds.height + 30.0
    }
}

/// A cosmetic spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub radius: f32,
}

impl Particle {
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.pos += self.vel * dt;
        self.life -= dt;
        self.radius = (self.radius - tuning.particle_shrink * dt).max(0.0);
        self.vel *= tuning.particle_drag;
    }

    pub fn in_play(&self, bounds: Bounds) -> bool {
        self.life > 0.0 && self.radius > 0.0 && bounds.contains_with_margin(self.pos, 40.0)
    }
}

/// A homing enemy; elites are tougher, larger and wobble harder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub elite: bool,
    pub hp: u8,
    wobble_phase: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32, elite: bool, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            speed,
            radius: if elite { tuning.elite_radius } else { tuning.enemy_radius },
            elite,
            hp: if elite { tuning.elite_hp } else { 1 },
            wobble_phase: rng.random_range(0.0..10.0),
        }
    }

    /// Seek the player with a circular wander layered on top
    pub fn advance(&mut self, dt: f32, player_pos: Vec2, tuning: &Tuning) {
        let to_player = player_pos - self.pos;
        let dist = to_player.length() + 1e-5;
        let dir = to_player / dist;

        let (rate, amplitude) = if self.elite {
            (tuning.elite_wobble_rate, tuning.elite_wobble_amplitude)
        } else {
            (1.0, tuning.wobble_amplitude)
        };
        self.wobble_phase += dt * rate;
        let wobble = Vec2::new(self.wobble_phase.cos(), self.wobble_phase.sin()) * amplitude;

        self.pos += (dir * self.speed + wobble) * dt;
    }

    /// Within the vertical band [-60, h+120]
    pub fn in_play(&self, bounds: Bounds) -> bool {
        self.pos.y >= -60.0 && self.pos.y <= bounds.height + 120.0
    }
}

/// A collectible that bobs in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
    /// Seconds since the drop
    pub age: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: tuning.powerup_radius,
            kind,
            age: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.age += dt;
        self.pos.y += (self.age * tuning.powerup_bob_rate).sin() * tuning.powerup_bob_speed * dt;
    }

    pub fn in_play(&self, bounds: Bounds) -> bool {
        bounds.contains_with_margin(self.pos, self.radius)
    }
}

/// Background star (decoration only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub size: u8,
}

impl Star {
    fn random(bounds: Bounds, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..=bounds.width),
                rng.random_range(0.0..=bounds.height),
            ),
            speed: rng.random_range(20.0..=120.0),
            size: rng.random_range(1..=3),
        }
    }
}

/// Fill a fresh starfield for the given bounds
pub fn make_stars(count: usize, bounds: Bounds, rng: &mut impl Rng) -> Vec<Star> {
    (0..count).map(|_| Star::random(bounds, rng)).collect()
}

/// Scroll stars downward, recycling any that fall off the bottom
pub fn scroll_stars(stars: &mut [Star], dt: f32, bounds: Bounds, rng: &mut impl Rng) {
    for star in stars.iter_mut() {
        star.pos.y += star.speed * dt;
        if star.pos.y > bounds.height {
            star.pos.x = rng.random_range(0.0..=bounds.width);
            star.pos.y = -5.0;
            star.speed = rng.random_range(20.0..=120.0);
        }
    }
}

/// Spray `amount` particles outward from `pos`; `power` scales their speed
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    amount: usize,
    power: f32,
) {
    particles.reserve(amount);
    for _ in 0..amount {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(80.0..=260.0) * power;
        particles.push(Particle {
            pos,
            vel: heading(angle) * speed,
            life: rng.random_range(0.4..=0.9),
            radius: rng.random_range(2.0..=5.0),
        });
    }
}

/// Running totals for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots_fired: u64,
    /// Bullets that struck an enemy, lethal or not
    pub bullet_hits: u64,
    pub enemies_spawned: u64,
    pub enemies_destroyed: u64,
    /// Enemies lost by ramming the ship
    pub rams: u64,
    /// Rams that cost hit points
    pub hits_taken: u64,
    pub powerups_dropped: u64,
    pub powerups_collected: u64,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (spawns, particles, drops, jitter)
    pub rng: Pcg32,
    /// Immutable balance constants
    pub tuning: Tuning,
    pub bounds: Bounds,
    pub phase: GamePhase,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<PowerUp>,
    pub stars: Vec<Star>,
    /// Seconds of unpaused play this session
    pub elapsed: f32,
    /// Difficulty level (1-based, never decreases within a session)
    pub difficulty: u32,
    /// Seconds until the next enemy spawn
    pub spawn_countdown: f32,
    /// Steps simulated this session
    pub frame: u64,
    pub stats: SessionStats,
}

impl GameState {
    /// Create a new session with the given seed, bounds and tuning
    pub fn new(seed: u64, bounds: Bounds, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::spawn(bounds, &tuning);
        let stars = make_stars(tuning.max_stars, bounds, &mut rng);
        let spawn_countdown = spawn::roll_spawn_interval(1, &tuning, &mut rng);

        log::info!(
            "New session (seed {seed}, bounds {}x{})",
            bounds.width,
            bounds.height
        );

        Self {
            seed,
            rng,
            tuning,
            bounds,
            phase: GamePhase::Playing,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
            stars,
            elapsed: 0.0,
            difficulty: 1,
            spawn_countdown,
            frame: 0,
            stats: SessionStats::default(),
        }
    }

    /// Start a fresh session in place; the RNG stream continues
    pub fn reset(&mut self) {
        self.player = Player::spawn(self.bounds, &self.tuning);
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.powerups.clear();
        self.stars = make_stars(self.tuning.max_stars, self.bounds, &mut self.rng);
        self.elapsed = 0.0;
        self.difficulty = 1;
        self.spawn_countdown = spawn::roll_spawn_interval(1, &self.tuning, &mut self.rng);
        self.frame = 0;
        self.stats = SessionStats::default();
        self.phase = GamePhase::Playing;
        log::info!("Session restarted (seed {}, RNG stream continues)", self.seed);
    }

    /// Adopt new bounds (window/terminal resize); gameplay continues
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.stars = make_stars(self.tuning.max_stars, bounds, &mut self.rng);
        log::debug!("Resized playfield to {}x{}", bounds.width, bounds.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_new_session_defaults() {
        let state = GameState::new(7, Bounds::new(900.0, 600.0), tuning());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.difficulty, 1);
        assert_eq!(state.stars.len(), 140);
        assert!(state.bullets.is_empty() && state.enemies.is_empty());
        assert!((0.45..=0.9).contains(&state.spawn_countdown));
        assert_eq!(state.player.pos, Vec2::new(450.0, 450.0));
    }

    #[test]
    fn test_power_timers_index_by_kind() {
        let mut timers = PowerTimers::default();
        timers[PowerUpKind::Spread] = 3.0;
        assert!(timers.is_active(PowerUpKind::Spread));
        assert!(!timers.is_active(PowerUpKind::Rapid));
        timers.decay(5.0);
        assert_eq!(timers[PowerUpKind::Spread], 0.0);
    }

    #[test]
    fn test_bullet_culling_bounds() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut bullet = Bullet {
            pos: Vec2::new(50.0, -29.0),
            vel: Vec2::ZERO,
            life: 1.0,
            radius: 3.0,
        };
        assert!(bullet.in_play(bounds));
        bullet.pos.y = -31.0;
        assert!(!bullet.in_play(bounds));
        bullet.pos = Vec2::new(-1.0, 50.0);
        assert!(!bullet.in_play(bounds));
        bullet.pos = Vec2::new(50.0, 50.0);
        bullet.life = 0.0;
        assert!(!bullet.in_play(bounds));
    }

    #[test]
    fn test_enemy_hp_and_radius_by_variant() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(1);
        let normal = Enemy::new(Vec2::ZERO, 90.0, false, &t, &mut rng);
        let elite = Enemy::new(Vec2::ZERO, 90.0, true, &t, &mut rng);
        assert_eq!((normal.hp, normal.radius), (1, 16.0));
        assert_eq!((elite.hp, elite.radius), (3, 22.0));
        assert!((0.0..10.0).contains(&normal.wobble_phase));
    }

    #[test]
    fn test_enemy_seeks_player() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(Vec2::new(0.0, 0.0), 200.0, false, &t, &mut rng);
        let target = Vec2::new(0.0, 1000.0);
        let before = enemy.pos.distance(target);
        for _ in 0..60 {
            enemy.advance(1.0 / 60.0, target, &t);
        }
        assert!(enemy.pos.distance(target) < before);
    }

    #[test]
    fn test_wobble_rate_and_amplitude_by_variant() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(3);
        let target = Vec2::new(0.0, 1000.0);
        let dt = 0.5;

        for (elite, rate, amplitude) in [(false, 1.0f32, 40.0f32), (true, 1.3, 60.0)] {
            let mut enemy = Enemy::new(Vec2::ZERO, 100.0, elite, &t, &mut rng);
            enemy.wobble_phase = 0.0;
            enemy.advance(dt, target, &t);

            let phase = dt * rate;
            let expected = (Vec2::new(0.0, 100.0)
                + Vec2::new(phase.cos(), phase.sin()) * amplitude)
                * dt;
            assert!((enemy.wobble_phase - phase).abs() < 1e-6);
            assert!(
                enemy.pos.distance(expected) < 1e-3,
                "elite={elite}: {:?} vs {expected:?}",
                enemy.pos
            );
        }
    }

    #[test]
    fn test_enemy_on_top_of_player_stays_finite() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(Vec2::new(5.0, 5.0), 100.0, true, &t, &mut rng);
        enemy.advance(0.016, Vec2::new(5.0, 5.0), &t);
        assert!(enemy.pos.is_finite());
    }

    #[test]
    fn test_enemy_culling_band() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Bounds::new(900.0, 600.0);
        let mut enemy = Enemy::new(Vec2::new(100.0, -60.0), 90.0, false, &t, &mut rng);
        assert!(enemy.in_play(bounds));
        enemy.pos.y = -61.0;
        assert!(!enemy.in_play(bounds));
        enemy.pos.y = 720.0;
        assert!(enemy.in_play(bounds));
        enemy.pos.y = 721.0;
        assert!(!enemy.in_play(bounds));
    }

    #[test]
    fn test_particle_shrinks_and_drags() {
        let t = tuning();
        let mut particle = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 0.5,
            radius: 4.0,
        };
        particle.advance(0.05, &t);
        assert!((particle.radius - 2.0).abs() < 1e-5);
        assert!((particle.vel.x - 98.0).abs() < 1e-3);
        particle.advance(0.1, &t);
        assert_eq!(particle.radius, 0.0);
        assert!(!particle.in_play(Bounds::new(100.0, 100.0)));
    }

    #[test]
    fn test_powerup_bobs_vertically_only() {
        let t = tuning();
        let mut powerup = PowerUp::new(Vec2::new(50.0, 50.0), PowerUpKind::Shield, &t);
        powerup.advance(0.25, &t);
        assert_eq!(powerup.pos.x, 50.0);
        assert!(powerup.pos.y > 50.0);
        assert_eq!(powerup.age, 0.25);
    }

    #[test]
    fn test_emit_burst_count_and_ranges() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut particles = Vec::new();
        emit_burst(&mut particles, &mut rng, Vec2::new(10.0, 10.0), 24, 1.4);
        assert_eq!(particles.len(), 24);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(10.0, 10.0));
            let speed = p.vel.length();
            assert!(speed >= 80.0 * 1.4 - 0.01 && speed <= 260.0 * 1.4 + 0.01);
            assert!((0.4..=0.9).contains(&p.life));
            assert!((2.0..=5.0).contains(&p.radius));
        }
    }

    #[test]
    fn test_stars_wrap_at_bottom() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stars = vec![Star {
            pos: Vec2::new(10.0, 99.0),
            speed: 100.0,
            size: 1,
        }];
        scroll_stars(&mut stars, 0.1, bounds, &mut rng);
        assert_eq!(stars[0].pos.y, -5.0);
        assert!((20.0..=120.0).contains(&stars[0].speed));
    }

    #[test]
    fn test_resize_rebuilds_starfield_only() {
        let mut state = GameState::new(9, Bounds::new(900.0, 600.0), tuning());
        state.elapsed = 12.0;
        state.resize(Bounds::new(200.0, 100.0));
        assert_eq!(state.elapsed, 12.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.stars.iter().all(|s| s.pos.x <= 200.0 && s.pos.y <= 100.0));
    }

    proptest! {
        #[test]
        fn power_timers_never_negative(start in 0.0f32..20.0, dt in 0.0f32..30.0) {
            let mut timers = PowerTimers::default();
            timers[PowerUpKind::Rapid] = start;
            timers.decay(dt);
            prop_assert!(timers[PowerUpKind::Rapid] >= 0.0);
            prop_assert_eq!(timers[PowerUpKind::Rapid], (start - dt).max(0.0));
        }
    }
}
