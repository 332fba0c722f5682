//! Terminal rendering module
//!
//! Draws a `Snapshot` into a character cell buffer with `crossterm`. The top
//! row is the HUD; the rest of the terminal is the playfield.

pub mod canvas;
pub mod shapes;

use std::io::Write;

use crossterm::style::Color;
use glam::Vec2;

use crate::consts::{CELL_HEIGHT, CELL_WIDTH};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{Bounds, GamePhase, PowerUpKind, Snapshot};
use canvas::Canvas;
use shapes::{Viewport, disc, heading_glyph, heat_color, point};

/// Rows reserved above the playfield
const HUD_ROWS: u16 = 1;
/// Smallest terminal the playfield is laid out for
const MIN_COLS: u16 = 20;
const MIN_ROWS: u16 = 6;
/// Longest particle life, used to fade colours
const PARTICLE_MAX_LIFE: f32 = 0.9;
const POWER_BAR_CELLS: usize = 6;

/// Playfield bounds in world units for a terminal of `cols` x `rows`
pub fn bounds_for_terminal(cols: u16, rows: u16) -> Bounds {
    let cols = cols.max(MIN_COLS);
    let rows = rows.max(MIN_ROWS) - HUD_ROWS;
    Bounds::new(cols as f32 * CELL_WIDTH, rows as f32 * CELL_HEIGHT)
}

fn powerup_style(kind: PowerUpKind) -> (char, Color) {
    match kind {
        PowerUpKind::Rapid => ('!', Color::Yellow),
        PowerUpKind::Shield => ('O', Color::Cyan),
        PowerUpKind::Spread => ('*', Color::Magenta),
    }
}

/// Frame-level extras that live outside the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct HudExtras {
    pub fps: u32,
    pub autopilot: bool,
}

pub struct TerminalRenderer {
    canvas: Canvas,
    view: Viewport,
    quality: QualityPreset,
    show_fps: bool,
    /// Seconds a fresh power-up lasts (full bar)
    power_duration: f32,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16, settings: &Settings, power_duration: f32) -> Self {
        Self {
            canvas: Canvas::new(cols, rows),
            view: Viewport {
                origin_row: HUD_ROWS as i32,
            },
            quality: settings.quality,
            show_fps: settings.show_fps,
            power_duration: power_duration.max(f32::EPSILON),
        }
    }

    /// Adopt a new terminal size; returns the matching world bounds
    pub fn resize(&mut self, cols: u16, rows: u16) -> Bounds {
        self.canvas.resize(cols, rows);
        log::debug!("Terminal resized to {cols}x{rows}");
        bounds_for_terminal(cols, rows)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Compose and flush one frame
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        snap: &Snapshot,
        extras: HudExtras,
    ) -> std::io::Result<()> {
        self.compose(snap, extras);
        self.canvas.flush(out)
    }

    /// Draw the frame into the cell buffer without touching the terminal
    pub fn compose(&mut self, snap: &Snapshot, extras: HudExtras) {
        self.canvas.clear();

        if self.quality.starfield_enabled() {
            self.draw_stars(snap);
        }
        self.draw_particles(snap);
        self.draw_powerups(snap);
        self.draw_enemies(snap);
        self.draw_bullets(snap);
        self.draw_ship(snap);
        self.draw_hud(snap, extras);

        match snap.phase {
            GamePhase::Paused => self.draw_paused(),
            GamePhase::GameOver => self.draw_game_over(snap),
            GamePhase::Playing => {}
        }
    }

    fn draw_stars(&mut self, snap: &Snapshot) {
        for star in snap.stars {
            let (ch, fg) = match star.size {
                0 | 1 => ('.', Color::DarkGrey),
                2 => ('.', Color::Grey),
                _ => ('+', Color::White),
            };
            point(&mut self.canvas, self.view, star.pos, ch, fg);
        }
    }

    fn draw_particles(&mut self, snap: &Snapshot) {
        let cap = self.quality.max_particles();
        for particle in snap.particles.iter().take(cap) {
            let t = particle.life / PARTICLE_MAX_LIFE;
            let ch = if particle.radius > 3.0 { '*' } else { '.' };
            point(&mut self.canvas, self.view, particle.pos, ch, heat_color(t));
        }
    }

    fn draw_powerups(&mut self, snap: &Snapshot) {
        for powerup in snap.powerups {
            let (ch, fg) = powerup_style(powerup.kind);
            point(&mut self.canvas, self.view, powerup.pos, ch, fg);
        }
    }

    fn draw_enemies(&mut self, snap: &Snapshot) {
        for enemy in snap.enemies {
            let (fill, core, fg) = if enemy.elite {
                ('▒', '@', Color::Magenta)
            } else {
                ('░', 'o', Color::Red)
            };
            disc(&mut self.canvas, self.view, enemy.pos, enemy.radius, fill, fg);
            point(&mut self.canvas, self.view, enemy.pos, core, fg);
        }
    }

    fn draw_bullets(&mut self, snap: &Snapshot) {
        for bullet in snap.bullets {
            point(&mut self.canvas, self.view, bullet.pos, '|', Color::Cyan);
        }
    }

    fn draw_ship(&mut self, snap: &Snapshot) {
        let player = &snap.player;
        if player.hp == 0 {
            return;
        }

        let fg = if player.flicker {
            Color::DarkGrey
        } else if player.dash_active {
            Color::Cyan
        } else if player.powers.is_active(PowerUpKind::Shield) {
            Color::Blue
        } else {
            Color::White
        };

        if player.dash_active {
            // Streak behind the ship
            let back = Vec2::new(player.heading.cos(), player.heading.sin()) * -CELL_WIDTH;
            point(&mut self.canvas, self.view, player.pos + back, '~', Color::DarkCyan);
            point(&mut self.canvas, self.view, player.pos + back * 2.0, '~', Color::DarkCyan);
        }
        point(&mut self.canvas, self.view, player.pos, heading_glyph(player.heading), fg);
    }

    fn draw_hud(&mut self, snap: &Snapshot, extras: HudExtras) {
        let player = &snap.player;
        self.canvas.fill_row(0, ' ', Color::Reset);

        let hearts: String = (0..player.max_hp)
            .map(|i| if i < player.hp { '♥' } else { '·' })
            .collect();
        let mut col = 0;
        col = self.hud_item(col, &hearts, Color::Red);
        col = self.hud_item(col, &format!("{:>7}", player.score), Color::Yellow);
        if player.multiplier > 1 {
            col = self.hud_item(col, &format!("x{}", player.multiplier), Color::Green);
        }
        col = self.hud_item(col, &format!("L{}", snap.difficulty), Color::Grey);

        for kind in PowerUpKind::ALL {
            let remaining = player.powers[kind];
            if remaining <= 0.0 {
                continue;
            }
            let fraction = (remaining / self.power_duration).clamp(0.0, 1.0);
            let filled = (fraction * POWER_BAR_CELLS as f32).ceil() as usize;
            let bar: String = (0..POWER_BAR_CELLS)
                .map(|i| if i < filled { '█' } else { '░' })
                .collect();
            let (_, fg) = powerup_style(kind);
            col = self.hud_item(col, &format!("{} {bar}", kind.label()), fg);
        }

        let mut right = String::new();
        if extras.autopilot {
            right.push_str("DEMO ");
        }
        if self.show_fps {
            right.push_str(&format!("{:>3} fps", extras.fps));
        }
        let right_col = self.canvas.cols() as i32 - right.chars().count() as i32;
        if right_col > col {
            self.canvas.text(right_col, 0, &right, Color::DarkGrey);
        }
    }

    /// Print one HUD field and return the column after it
    fn hud_item(&mut self, col: i32, text: &str, fg: Color) -> i32 {
        self.canvas.text(col, 0, text, fg);
        col + text.chars().count() as i32 + 2
    }

    fn middle_row(&self) -> i32 {
        let rows = self.canvas.rows() as i32;
        HUD_ROWS as i32 + (rows - HUD_ROWS as i32) / 2
    }

    fn draw_paused(&mut self) {
        let mid = self.middle_row();
        self.canvas.centered_text(mid - 1, "PAUSED", Color::Yellow);
        self.canvas.centered_text(mid + 1, "P to resume  Q to quit", Color::DarkGrey);
    }

    fn draw_game_over(&mut self, snap: &Snapshot) {
        let mid = self.middle_row();
        self.canvas.centered_text(mid - 2, "GAME OVER", Color::Red);
        self.canvas.centered_text(
            mid,
            &format!("Score {}  Level {}", snap.player.score, snap.difficulty),
            Color::Yellow,
        );
        self.canvas.centered_text(
            mid + 1,
            &format!(
                "{} kills  {} shots  {:.0}s",
                snap.stats.enemies_destroyed, snap.stats.shots_fired, snap.elapsed
            ),
            Color::Grey,
        );
        self.canvas.centered_text(mid + 3, "Enter/R to restart  Q to quit", Color::DarkGrey);
    }
}
