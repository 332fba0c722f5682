//! Enemy spawn scheduling and the difficulty curve

use glam::Vec2;
use rand::Rng;

use super::state::{Bounds, Enemy, PowerUpKind};
use crate::clamp;
use crate::tuning::Tuning;

/// Difficulty level for a given elapsed time: `1 + floor(elapsed / wave_time)`
pub fn difficulty_for(elapsed: f32, tuning: &Tuning) -> u32 {
    1 + (elapsed.max(0.0) / tuning.wave_time).floor() as u32
}

/// Inclusive range the next spawn countdown is drawn from
pub fn spawn_interval_range(difficulty: u32, tuning: &Tuning) -> (f32, f32) {
    let level = difficulty.max(1) as f32;
    let min = (tuning.enemy_min_spawn / level).max(tuning.spawn_floor);
    let max = (tuning.enemy_max_spawn / level).max(min + tuning.spawn_min_window);
    (min, max)
}

pub fn roll_spawn_interval(difficulty: u32, tuning: &Tuning, rng: &mut impl Rng) -> f32 {
    let (min, max) = spawn_interval_range(difficulty, tuning);
    rng.random_range(min..=max)
}

/// Chance that a fresh spawn is an elite
pub fn elite_chance(difficulty: u32, tuning: &Tuning) -> f32 {
    clamp(
        tuning.elite_chance_per_level * difficulty as f32,
        0.0,
        tuning.elite_chance_cap,
    )
}

/// Speed multiplier applied to every spawn at this difficulty
pub fn speed_scale(difficulty: u32) -> f32 {
    0.8 + 0.25 * difficulty as f32
}

/// Create one enemy just above the top edge
pub fn spawn_enemy(bounds: Bounds, difficulty: u32, tuning: &Tuning, rng: &mut impl Rng) -> Enemy {
    let margin = tuning.spawn_edge_margin.min(bounds.width / 2.0);
    let x = rng.random_range(margin..=bounds.width - margin);
    let elite = rng.random::<f32>() < elite_chance(difficulty, tuning);
    let variance = tuning.enemy_speed_variance;
    let speed = (tuning.enemy_base_speed + rng.random_range(-variance..=variance))
        * speed_scale(difficulty);

    log::trace!("Spawn {} enemy at x={x:.0} speed={speed:.0}", if elite { "elite" } else { "normal" });
    Enemy::new(Vec2::new(x, tuning.spawn_height), speed, elite, tuning, rng)
}

/// Roll whether a destroyed enemy leaves a power-up behind
pub fn roll_drop(elite: bool, tuning: &Tuning, rng: &mut impl Rng) -> Option<PowerUpKind> {
    let boost = if elite { tuning.elite_drop_boost } else { 1.0 };
    if rng.random::<f32>() < tuning.powerup_chance * boost {
        Some(PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_difficulty_steps() {
        let t = Tuning::default();
        assert_eq!(difficulty_for(0.0, &t), 1);
        assert_eq!(difficulty_for(34.9, &t), 1);
        assert_eq!(difficulty_for(35.0, &t), 2);
        assert_eq!(difficulty_for(71.0, &t), 3);
    }

    #[test]
    fn test_interval_range_shrinks_with_floor() {
        let t = Tuning::default();
        assert_eq!(spawn_interval_range(1, &t), (0.45, 0.9));
        let (min2, max2) = spawn_interval_range(2, &t);
        assert!((min2 - 0.225).abs() < 1e-6 && (max2 - 0.45).abs() < 1e-6);
        let (min10, max10) = spawn_interval_range(10, &t);
        assert_eq!(min10, 0.18);
        assert!((max10 - 0.23).abs() < 1e-6);
    }

    #[test]
    fn test_elite_chance_caps() {
        let t = Tuning::default();
        assert!((elite_chance(1, &t) - 0.05).abs() < 1e-6);
        assert!((elite_chance(4, &t) - 0.2).abs() < 1e-6);
        assert_eq!(elite_chance(20, &t), 0.4);
    }

    #[test]
    fn test_spawn_position_and_speed() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let bounds = Bounds::new(900.0, 600.0);
        for _ in 0..200 {
            let enemy = spawn_enemy(bounds, 1, &t, &mut rng);
            assert!((40.0..=860.0).contains(&enemy.pos.x));
            assert_eq!(enemy.pos.y, -30.0);
            assert!(enemy.speed >= 0.0 && enemy.speed <= 180.0 * 1.05 + 1e-3);
        }
    }

    #[test]
    fn test_narrow_field_still_spawns() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let enemy = spawn_enemy(Bounds::new(50.0, 100.0), 1, &t, &mut rng);
        assert_eq!(enemy.pos.x, 25.0);
    }

    #[test]
    fn test_drop_rate_roughly_matches_chance() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4242);
        let trials = 20_000;
        let drops = (0..trials)
            .filter(|_| roll_drop(false, &t, &mut rng).is_some())
            .count();
        let rate = drops as f32 / trials as f32;
        assert!((rate - 0.12).abs() < 0.015, "drop rate {rate}");
    }

    #[test]
    fn test_elite_drop_rate_is_boosted() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(777);
        let trials = 40_000;
        let drops = (0..trials)
            .filter(|_| roll_drop(true, &t, &mut rng).is_some())
            .count();
        let rate = drops as f32 / trials as f32;
        assert!((rate - 0.144).abs() < 0.012, "elite drop rate {rate}");
    }

    proptest! {
        #[test]
        fn spawn_interval_within_bounds(difficulty in 1u32..50, seed in any::<u64>()) {
            let t = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let d = difficulty as f32;
            let lo = (0.45 / d).max(0.18);
            let hi = (0.9 / d).max(lo + 0.05);
            let interval = roll_spawn_interval(difficulty, &t, &mut rng);
            prop_assert!(interval >= lo && interval <= hi);
        }

        #[test]
        fn difficulty_is_monotonic(a in 0.0f32..10_000.0, b in 0.0f32..10_000.0) {
            let t = Tuning::default();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_for(early, &t) <= difficulty_for(late, &t));
        }
    }
}
