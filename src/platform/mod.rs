//! Platform abstraction layer
//!
//! Handles terminal differences for:
//! - Input events (held keys on terminals with and without release events)
//! - Frame timing

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::consts::MAX_FRAME_DT;
use crate::sim::TickInput;

/// How long a key counts as held after its last press/repeat when the
/// terminal never reports releases. OS key-repeat refreshes it well inside
/// this window once repeating starts.
const HOLD_MILLIS: u64 = 150;

/// Logical action a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Dash,
    Pause,
    Restart,
    Quit,
    ToggleAutopilot,
}

/// Map a key event to its action
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Enter => Some(Action::Restart),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => Some(Action::Left),
            'd' => Some(Action::Right),
            'w' => Some(Action::Up),
            's' => Some(Action::Down),
            ' ' => Some(Action::Fire),
            'x' | 'k' => Some(Action::Dash),
            'p' => Some(Action::Pause),
            'r' => Some(Action::Restart),
            'q' => Some(Action::Quit),
            'i' => Some(Action::ToggleAutopilot),
            _ => None,
        },
        _ => None,
    }
}

/// Turns the terminal's key event stream into per-frame `TickInput`s
///
/// Each held action remembers the frame it was last pressed or repeated.
/// Once a `Release` event has been seen the terminal is known to report
/// them, and held actions stay live until released; otherwise they expire
/// after the hold window.
#[derive(Debug)]
pub struct KeyTracker {
    last_seen: HashMap<Action, u64>,
    frame: u64,
    hold_frames: u64,
    releases_reported: bool,
    /// One-shot actions pressed since the last sample
    pending: TickInput,
    autopilot: bool,
}

impl KeyTracker {
    pub fn new(target_fps: u32) -> Self {
        let hold_frames = (target_fps as u64 * HOLD_MILLIS).div_ceil(1000).max(1);
        Self {
            last_seen: HashMap::new(),
            frame: 0,
            hold_frames,
            releases_reported: false,
            pending: TickInput::default(),
            autopilot: false,
        }
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Feed one key event
    pub fn handle(&mut self, key: &KeyEvent) {
        let Some(action) = action_for(key) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press => {
                self.last_seen.insert(action, self.frame);
                match action {
                    Action::Fire => self.pending.fire_tap = true,
                    Action::Dash => self.pending.dash = true,
                    Action::Pause => self.pending.pause = true,
                    Action::Restart => self.pending.restart = true,
                    Action::Quit => self.pending.quit = true,
                    Action::ToggleAutopilot => {
                        self.autopilot = !self.autopilot;
                        log::info!("Autopilot: {}", self.autopilot);
                    }
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(action, self.frame);
            }
            KeyEventKind::Release => {
                self.releases_reported = true;
                self.last_seen.remove(&action);
            }
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.last_seen.get(&action).is_some_and(|&last| {
            self.releases_reported || self.frame.saturating_sub(last) <= self.hold_frames
        })
    }

    /// Build this frame's input, clear one-shots and advance the frame counter
    pub fn sample(&mut self) -> TickInput {
        let one_shot = std::mem::take(&mut self.pending);
        let input = TickInput {
            move_left: self.is_held(Action::Left),
            move_right: self.is_held(Action::Right),
            move_up: self.is_held(Action::Up),
            move_down: self.is_held(Action::Down),
            fire_held: self.is_held(Action::Fire),
            dash: one_shot.dash || self.is_held(Action::Dash),
            autopilot: self.autopilot,
            ..one_shot
        };
        self.frame += 1;
        input
    }
}

/// Real-time frame clock with a rolling FPS estimate
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    budget: Duration,
    frame_times: [f32; 60],
    index: usize,
    filled: usize,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(Instant::now(), target_fps)
    }

    pub fn starting_at(start: Instant, target_fps: u32) -> Self {
        Self {
            last: start,
            budget: Duration::from_secs_f32(1.0 / target_fps.max(1) as f32),
            frame_times: [0.0; 60],
            index: 0,
            filled: 0,
        }
    }

    /// Seconds since the previous frame, clamped to `MAX_FRAME_DT`
    pub fn tick(&mut self) -> f32 {
        self.measure(Instant::now())
    }

    pub fn measure(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;

        self.frame_times[self.index] = dt;
        self.index = (self.index + 1) % self.frame_times.len();
        self.filled = (self.filled + 1).min(self.frame_times.len());

        dt.min(MAX_FRAME_DT)
    }

    /// Average frames per second over the last (up to) 60 frames
    pub fn fps(&self) -> u32 {
        let total: f32 = self.frame_times[..self.filled].iter().sum();
        if total > 0.0 {
            (self.filled as f32 / total).round() as u32
        } else {
            0
        }
    }

    /// Time left in this frame's budget
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.last.elapsed())
    }

    /// Sleep out the remainder of the frame budget
    pub fn sleep_remaining(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}
