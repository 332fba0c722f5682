//! Rasterizing world-space primitives onto terminal cells

use std::f32::consts::FRAC_PI_4;

use crossterm::style::Color;
use glam::Vec2;

use super::canvas::Canvas;
use crate::consts::{CELL_HEIGHT, CELL_WIDTH, UP_ANGLE};

/// Maps world units to cells; the playfield starts `origin_row` rows down
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub origin_row: i32,
}

impl Viewport {
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / CELL_WIDTH).floor() as i32,
            (pos.y / CELL_HEIGHT).floor() as i32 + self.origin_row,
        )
    }

    /// World position of a cell's centre
    fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * CELL_WIDTH,
            ((row - self.origin_row) as f32 + 0.5) * CELL_HEIGHT,
        )
    }
}

/// Plot a single point
pub fn point(canvas: &mut Canvas, view: Viewport, pos: Vec2, ch: char, fg: Color) {
    let (col, row) = view.cell_of(pos);
    if row >= view.origin_row {
        canvas.put(col, row, ch, fg);
    }
}

/// Fill every cell whose centre lies inside the circle; tiny circles
/// still cover the cell under their centre
pub fn disc(canvas: &mut Canvas, view: Viewport, center: Vec2, radius: f32, ch: char, fg: Color) {
    point(canvas, view, center, ch, fg);

    let (min_col, min_row) = view.cell_of(center - Vec2::splat(radius));
    let (max_col, max_row) = view.cell_of(center + Vec2::splat(radius));
    for row in min_row.max(view.origin_row)..=max_row {
        for col in min_col..=max_col {
            if view.cell_center(col, row).distance(center) <= radius {
                canvas.put(col, row, ch, fg);
            }
        }
    }
}

/// Arrow glyph for a screen-space heading (0 = right, y down)
pub fn heading_glyph(angle: f32) -> char {
    const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let steps = ((angle - UP_ANGLE) / FRAC_PI_4).round() as i32;
    ARROWS[steps.rem_euclid(8) as usize]
}

/// Gradient from hot to cold as `t` goes 1 -> 0 (white, yellow, orange, red)
pub fn heat_color(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);

    let (r, g, b) = if t > 0.75 {
        // White to yellow
        let u = (t - 0.75) / 0.25;
        (1.0, 1.0, 0.3 + 0.7 * u)
    } else if t > 0.4 {
        // Yellow to orange
        let u = (t - 0.4) / 0.35;
        (1.0, 0.55 + 0.45 * u, 0.2 + 0.1 * u)
    } else {
        // Orange to dark red
        let u = t / 0.4;
        (0.5 + 0.5 * u, 0.1 + 0.45 * u, 0.1 + 0.1 * u)
    };

    Color::Rgb {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const VIEW: Viewport = Viewport { origin_row: 1 };

    #[test]
    fn test_cell_mapping() {
        assert_eq!(VIEW.cell_of(Vec2::new(0.0, 0.0)), (0, 1));
        assert_eq!(VIEW.cell_of(Vec2::new(25.0, 45.0)), (2, 3));
    }

    #[test]
    fn test_heading_glyphs() {
        assert_eq!(heading_glyph(UP_ANGLE), '↑');
        assert_eq!(heading_glyph(0.0), '→');
        assert_eq!(heading_glyph(FRAC_PI_2), '↓');
        assert_eq!(heading_glyph(PI), '←');
        assert_eq!(heading_glyph(-PI), '←');
    }

    #[test]
    fn test_disc_covers_center_and_stays_below_hud() {
        let mut canvas = Canvas::new(20, 6);
        disc(&mut canvas, VIEW, Vec2::new(100.0, 0.0), 30.0, '#', Color::Red);
        assert!(canvas.row_text(0).trim().is_empty());
        assert_eq!(canvas.get(10, 1).map(|c| c.ch), Some('#'));

        let mut tiny = Canvas::new(20, 6);
        disc(&mut tiny, VIEW, Vec2::new(55.0, 30.0), 1.0, '.', Color::White);
        assert_eq!(tiny.get(5, 2).map(|c| c.ch), Some('.'));
    }

    #[test]
    fn test_heat_color_ends() {
        assert_eq!(heat_color(1.0), Color::Rgb { r: 255, g: 255, b: 255 });
        assert!(matches!(heat_color(0.0), Color::Rgb { r: 127, .. }));
    }
}
