//! Collision resolution between bullets, enemies, power-ups and the ship
//!
//! Every pass uses the plain circle overlap test and removes entities by
//! index, so nothing is skipped or resolved twice within a step.

use super::player::DamageOutcome;
use super::spawn;
use super::state::{GameState, PowerUp, emit_burst};
use crate::circle_collide;

/// What happened during one step's collision passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Bullet impacts on enemies (lethal or not)
    pub enemy_hits: u32,
    pub enemies_destroyed: u32,
    pub powerups_dropped: u32,
    /// Ramming enemies removed on contact with the ship
    pub rams: u32,
    pub damage_applied: u32,
    pub powerups_collected: u32,
}

/// Bullets against enemies
///
/// Each enemy takes at most one bullet per step: the first overlapping
/// bullet in list order is consumed and the enemy stops testing.
pub fn resolve_bullets_vs_enemies(state: &mut GameState, report: &mut CollisionReport) {
    let GameState {
        tuning,
        rng,
        player,
        bullets,
        enemies,
        particles,
        powerups,
        ..
    } = state;

    let mut i = 0;
    while i < enemies.len() {
        let (pos, radius) = (enemies[i].pos, enemies[i].radius);
        let Some(hit) = bullets
            .iter()
            .position(|b| circle_collide(pos, radius, b.pos, b.radius))
        else {
            i += 1;
            continue;
        };

        let bullet = bullets.remove(hit);
        emit_burst(particles, rng, bullet.pos, 6, 0.5);
        report.enemy_hits += 1;

        let enemy = &mut enemies[i];
        enemy.hp = enemy.hp.saturating_sub(1);
        if enemy.hp > 0 {
            i += 1;
            continue;
        }

        let enemy = enemies.remove(i);
        report.enemies_destroyed += 1;
        let base = if enemy.elite { tuning.score_elite } else { tuning.score_normal };
        player.add_score(base, tuning);

        let (amount, power) = if enemy.elite { (24, 1.4) } else { (16, 1.0) };
        emit_burst(particles, rng, enemy.pos, amount, power);

        if let Some(kind) = spawn::roll_drop(enemy.elite, tuning, rng) {
            powerups.push(PowerUp::new(enemy.pos, kind, tuning));
            report.powerups_dropped += 1;
            log::debug!("{} power-up dropped", kind.label());
        }
    }
}

/// Enemies ramming the ship
pub fn resolve_enemies_vs_player(state: &mut GameState, report: &mut CollisionReport) {
    let GameState {
        tuning,
        rng,
        player,
        enemies,
        particles,
        ..
    } = state;

    if !player.alive() {
        return;
    }

    let mut i = 0;
    while i < enemies.len() {
        if !circle_collide(enemies[i].pos, enemies[i].radius, player.pos, player.radius) {
            i += 1;
            continue;
        }

        if player.damage(1, tuning) == DamageOutcome::Applied {
            emit_burst(particles, rng, player.pos, 20, 1.2);
            report.damage_applied += 1;
            log::debug!("Player hit, hp {}/{}", player.hp, player.max_hp);
        }
        let enemy = enemies.remove(i);
        emit_burst(particles, rng, enemy.pos, 12, 0.9);
        report.rams += 1;
    }
}

/// Ship collecting power-ups (pickup radius is slightly generous)
pub fn resolve_powerups_vs_player(state: &mut GameState, report: &mut CollisionReport) {
    let GameState {
        tuning,
        rng,
        player,
        particles,
        powerups,
        ..
    } = state;

    if !player.alive() {
        return;
    }

    let reach = player.radius + tuning.pickup_margin;
    let mut i = 0;
    while i < powerups.len() {
        if !circle_collide(powerups[i].pos, powerups[i].radius, player.pos, reach) {
            i += 1;
            continue;
        }
        let powerup = powerups.remove(i);
        player.apply_powerup(powerup.kind, tuning);
        emit_burst(particles, rng, powerup.pos, 10, 0.7);
        report.powerups_collected += 1;
        log::debug!("Picked up {}", powerup.kind.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bounds, Bullet, Enemy, PowerUpKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_state() -> GameState {
        let mut state = GameState::new(1234, Bounds::new(900.0, 600.0), Tuning::default());
        state.player.invuln = 0.0;
        state.particles.clear();
        state
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        Bullet {
            pos,
            vel: Vec2::ZERO,
            life: 1.0,
            radius: 3.0,
        }
    }

    fn enemy_at(state: &mut GameState, pos: Vec2, elite: bool) -> Enemy {
        Enemy::new(pos, 90.0, elite, &state.tuning, &mut state.rng)
    }

    #[test]
    fn test_kill_scores_and_bursts() {
        let mut state = quiet_state();
        let enemy = enemy_at(&mut state, Vec2::new(100.0, 100.0), false);
        state.enemies.push(enemy);
        state.bullets.push(bullet_at(Vec2::new(100.0, 110.0)));

        let mut report = CollisionReport::default();
        resolve_bullets_vs_enemies(&mut state, &mut report);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.score, 7);
        assert_eq!(state.player.multiplier, 2);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(state.particles.len(), 6 + 16);
        assert_eq!(state.powerups.len() as u32, report.powerups_dropped);
    }

    #[test]
    fn test_elite_takes_one_bullet_per_step() {
        let mut state = quiet_state();
        let elite = enemy_at(&mut state, Vec2::new(200.0, 200.0), true);
        state.enemies.push(elite);
        for _ in 0..3 {
            state.bullets.push(bullet_at(Vec2::new(200.0, 205.0)));
        }

        let mut report = CollisionReport::default();
        resolve_bullets_vs_enemies(&mut state, &mut report);
        assert_eq!(state.enemies[0].hp, 2);
        assert_eq!(state.bullets.len(), 2);

        resolve_bullets_vs_enemies(&mut state, &mut report);
        resolve_bullets_vs_enemies(&mut state, &mut report);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.score, 15);
        assert_eq!(report.enemy_hits, 3);
        // 3 impact bursts + elite death burst
        assert_eq!(state.particles.len(), 3 * 6 + 24);
    }

    #[test]
    fn test_bullet_strikes_only_one_enemy() {
        let mut state = quiet_state();
        let a = enemy_at(&mut state, Vec2::new(300.0, 300.0), false);
        let b = enemy_at(&mut state, Vec2::new(302.0, 300.0), false);
        state.enemies.extend([a, b]);
        state.bullets.push(bullet_at(Vec2::new(301.0, 300.0)));

        let mut report = CollisionReport::default();
        resolve_bullets_vs_enemies(&mut state, &mut report);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(report.enemies_destroyed, 1);
    }

    #[test]
    fn test_touching_edges_register() {
        let mut state = quiet_state();
        let enemy = enemy_at(&mut state, Vec2::new(100.0, 100.0), false);
        state.enemies.push(enemy);
        // 16 + 3 = 19 apart exactly
        state.bullets.push(bullet_at(Vec2::new(119.0, 100.0)));
        let mut report = CollisionReport::default();
        resolve_bullets_vs_enemies(&mut state, &mut report);
        assert_eq!(report.enemy_hits, 1);
    }

    #[test]
    fn test_ram_applies_damage_once() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        let a = enemy_at(&mut state, pos, false);
        let b = enemy_at(&mut state, pos + Vec2::new(5.0, 0.0), false);
        state.enemies.extend([a, b]);

        let mut report = CollisionReport::default();
        resolve_enemies_vs_player(&mut state, &mut report);

        assert!(state.enemies.is_empty());
        assert_eq!(state.player.hp, 3);
        assert_eq!(report.rams, 2);
        assert_eq!(report.damage_applied, 1);
        // Player burst once, enemy burst per ram
        assert_eq!(state.particles.len(), 20 + 12 * 2);
    }

    #[test]
    fn test_shielded_ram_is_absorbed() {
        let mut state = quiet_state();
        state.player.powers[PowerUpKind::Shield] = 5.0;
        let pos = state.player.pos;
        let enemy = enemy_at(&mut state, pos, true);
        state.enemies.push(enemy);

        let mut report = CollisionReport::default();
        resolve_enemies_vs_player(&mut state, &mut report);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.hp, 4);
        assert_eq!(report.damage_applied, 0);
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_pickup_uses_margin() {
        let mut state = quiet_state();
        let t = state.tuning.clone();
        // 14 + 4 + 12 = 30 reach
        let pos = state.player.pos + Vec2::new(30.0, 0.0);
        state.powerups.push(PowerUp::new(pos, PowerUpKind::Rapid, &t));
        let far = state.player.pos + Vec2::new(31.0, 0.0);
        state.powerups.push(PowerUp::new(far, PowerUpKind::Spread, &t));

        let mut report = CollisionReport::default();
        resolve_powerups_vs_player(&mut state, &mut report);
        assert_eq!(report.powerups_collected, 1);
        assert!(state.player.powers.is_active(PowerUpKind::Rapid));
        assert!(!state.player.powers.is_active(PowerUpKind::Spread));
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_dead_player_collects_nothing() {
        let mut state = quiet_state();
        state.player.hp = 0;
        let t = state.tuning.clone();
        let pos = state.player.pos;
        state.powerups.push(PowerUp::new(pos, PowerUpKind::Shield, &t));
        let enemy = enemy_at(&mut state, pos, false);
        state.enemies.push(enemy);

        let mut report = CollisionReport::default();
        resolve_enemies_vs_player(&mut state, &mut report);
        resolve_powerups_vs_player(&mut state, &mut report);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.powerups.len(), 1);
    }
}
