//! Per-frame simulation step
//!
//! Core game loop that advances the session by one (variable) time step.

use std::cmp::Ordering;

use glam::Vec2;

use super::collision::{self, CollisionReport};
use super::spawn;
use super::state::{GamePhase, GameState, scroll_stars};

/// Logical actions sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Fire key is being held (auto-fire, jittered)
    pub fire_held: bool,
    /// Fire key was pressed this frame (tight shot)
    pub fire_tap: bool,
    /// Dash key was pressed this frame
    pub dash: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a fresh session after game over
    pub restart: bool,
    /// Leave the game (handled by the run loop)
    pub quit: bool,
    /// Demo mode - the autopilot flies the ship
    pub autopilot: bool,
}

impl TickInput {
    /// Unnormalised movement axis; opposing keys cancel
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.move_left {
            axis.x -= 1.0;
        }
        if self.move_right {
            axis.x += 1.0;
        }
        if self.move_up {
            axis.y -= 1.0;
        }
        if self.move_down {
            axis.y += 1.0;
        }
        axis
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing if state.player.alive() => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.elapsed);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if input.restart && state.phase == GamePhase::GameOver {
        state.reset();
        return;
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    let dt = dt.max(0.0);
    state.frame += 1;
    state.elapsed += dt;
    let level = spawn::difficulty_for(state.elapsed, &state.tuning);
    if level > state.difficulty {
        state.difficulty = level;
        log::debug!("Difficulty raised to {level} at {:.1}s", state.elapsed);
    }

    // Discrete taps fire before the ship moves
    if input.fire_tap && state.player.alive() {
        let shots = state
            .player
            .try_fire(&mut state.bullets, false, &state.tuning, &mut state.rng);
        state.stats.shots_fired += shots as u64;
    }

    state.player.advance(dt, input, state.bounds, &state.tuning);
    scroll_stars(&mut state.stars, dt, state.bounds, &mut state.rng);

    // Spawn scheduler
    state.spawn_countdown -= dt;
    if state.spawn_countdown <= 0.0 {
        let enemy = spawn::spawn_enemy(state.bounds, state.difficulty, &state.tuning, &mut state.rng);
        state.enemies.push(enemy);
        state.stats.enemies_spawned += 1;
        state.spawn_countdown =
            spawn::roll_spawn_interval(state.difficulty, &state.tuning, &mut state.rng);
    }

    if input.fire_held && state.player.alive() {
        let shots = state
            .player
            .try_fire(&mut state.bullets, true, &state.tuning, &mut state.rng);
        state.stats.shots_fired += shots as u64;
    }

    let bounds = state.bounds;
    for bullet in state.bullets.iter_mut() {
        bullet.advance(dt);
    }
    state.bullets.retain(|b| b.in_play(bounds));

    let player_pos = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        enemy.advance(dt, player_pos, &state.tuning);
    }
    state.enemies.retain(|e| e.in_play(bounds));

    let mut report = CollisionReport::default();
    collision::resolve_bullets_vs_enemies(state, &mut report);

    for powerup in state.powerups.iter_mut() {
        powerup.advance(dt, &state.tuning);
    }
    collision::resolve_enemies_vs_player(state, &mut report);
    collision::resolve_powerups_vs_player(state, &mut report);
    state.powerups.retain(|p| p.in_play(bounds));

    for particle in state.particles.iter_mut() {
        particle.advance(dt, &state.tuning);
    }
    state.particles.retain(|p| p.in_play(bounds));

    let stats = &mut state.stats;
    stats.bullet_hits += report.enemy_hits as u64;
    stats.enemies_destroyed += report.enemies_destroyed as u64;
    stats.rams += report.rams as u64;
    stats.hits_taken += report.damage_applied as u64;
    stats.powerups_dropped += report.powerups_dropped as u64;
    stats.powerups_collected += report.powerups_collected as u64;

    if !state.player.alive() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {} after {:.1}s (seed {}, difficulty {}, {} kills, {}/{} shots hit)",
            state.player.score,
            state.elapsed,
            state.seed,
            state.difficulty,
            state.stats.enemies_destroyed,
            state.stats.bullet_hits,
            state.stats.shots_fired,
        );
    }
}

/// Distance from the ship to an enemy before the autopilot dashes away,
/// as a multiple of the combined radii
const AUTOPILOT_PANIC: f32 = 3.0;
/// Enemies closer than this take priority over power-ups
const AUTOPILOT_THREAT_RANGE: f32 = 250.0;
const AUTOPILOT_DEADZONE: f32 = 8.0;

/// Synthesize movement and fire for demo mode
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let by_distance = |a: &Vec2, b: &Vec2| {
        a.distance_squared(player.pos)
            .partial_cmp(&b.distance_squared(player.pos))
            .unwrap_or(Ordering::Equal)
    };

    let threat = state.enemies.iter().min_by(|a, b| by_distance(&a.pos, &b.pos));
    let pickup = state.powerups.iter().map(|p| p.pos).min_by(by_distance);
    let home_y = state.bounds.height * 0.8;

    let target = match (threat, pickup) {
        (Some(enemy), Some(pos)) if enemy.pos.distance(player.pos) > AUTOPILOT_THREAT_RANGE => pos,
        (Some(enemy), _) => Vec2::new(enemy.pos.x, home_y),
        (None, Some(pos)) => pos,
        (None, None) => Vec2::new(state.bounds.width / 2.0, home_y),
    };

    input.move_left = target.x < player.pos.x - AUTOPILOT_DEADZONE;
    input.move_right = target.x > player.pos.x + AUTOPILOT_DEADZONE;
    input.move_up = target.y < player.pos.y - AUTOPILOT_DEADZONE;
    input.move_down = target.y > player.pos.y + AUTOPILOT_DEADZONE;
    input.fire_held = !state.enemies.is_empty();

    if let Some(enemy) = threat {
        let panic = AUTOPILOT_PANIC * (enemy.radius + player.radius);
        if enemy.pos.distance(player.pos) < panic {
            input.move_left = enemy.pos.x >= player.pos.x;
            input.move_right = !input.move_left;
            input.dash = true;
        }
    }
}
