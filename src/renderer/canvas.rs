//! Character cell buffer composed each frame and flushed in one pass

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
};

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
    };
}

#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::BLANK; cols as usize * rows as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Write one cell; out-of-range coordinates are ignored
    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { ch, fg };
        }
    }

    pub fn text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(col + offset as i32, row, ch, fg);
        }
    }

    /// Text centred horizontally on `row`
    pub fn centered_text(&mut self, row: i32, text: &str, fg: Color) {
        let width = text.chars().count() as i32;
        self.text((self.cols as i32 - width) / 2, row, text, fg);
    }

    pub fn fill_row(&mut self, row: i32, ch: char, fg: Color) {
        for col in 0..self.cols as i32 {
            self.put(col, row, ch, fg);
        }
    }

    /// Characters of one row (for tests and debugging)
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols as i32)
            .filter_map(|col| self.get(col, row as i32))
            .map(|cell| cell.ch)
            .collect()
    }

    /// Queue every row, switching colour only between runs
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut run = String::with_capacity(self.cols as usize);
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let cells = &self.cells[start..start + self.cols as usize];

            let mut color = None;
            for cell in cells {
                if color != Some(cell.fg) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    color = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                out.queue(Print(&run))?;
                run.clear();
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}
