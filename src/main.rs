//! Space Shooter entry point
//!
//! Loads configuration, then runs either the interactive terminal game or a
//! headless autopilot session that prints its final snapshot as JSON.

use std::io::{BufWriter, Write, stdout};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
};

use space_shooter::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use space_shooter::platform::{FrameClock, KeyTracker};
use space_shooter::renderer::{HudExtras, TerminalRenderer, bounds_for_terminal};
use space_shooter::sim::{Bounds, GamePhase, GameState, Snapshot, TickInput, tick};
use space_shooter::{Result, Settings, Tuning};

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load();
    let tuning = match &settings.tuning_path {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "Space Shooter starting (seed {seed}, quality {}, {} fps)",
        settings.quality.as_str(),
        settings.target_fps
    );

    match settings.headless_frames {
        Some(frames) => run_headless(&settings, tuning, seed, frames),
        None => run_interactive(&settings, tuning, seed),
    }
}

/// Fly the autopilot for `frames` nominal frames and dump the final snapshot
fn run_headless(settings: &Settings, tuning: Tuning, seed: u64, frames: u32) -> Result<()> {
    let bounds = Bounds::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let mut state = GameState::new(seed, bounds, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let dt = settings.frame_dt();

    for _ in 0..frames {
        tick(&mut state, &input, dt);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    log::info!(
        "Headless run finished after {} frames, score {}",
        state.frame,
        state.player.score
    );

    let json = serde_json::to_string_pretty(&Snapshot::capture(&state))?;
    println!("{json}");
    Ok(())
}

fn run_interactive(settings: &Settings, tuning: Tuning, seed: u64) -> Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    // Release events let held keys end exactly; other terminals fall back
    // to the tracker's hold window
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Blocking reads stay on their own thread so the frame loop never waits on input
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, settings, tuning, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    tuning: Tuning,
    seed: u64,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(cols, rows, settings, tuning.powerup_duration);
    let mut state = GameState::new(seed, bounds_for_terminal(cols, rows), tuning);
    let mut keys = KeyTracker::new(settings.target_fps);
    let mut clock = FrameClock::new(settings.target_fps);

    loop {
        // Drain pending events without blocking
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => keys.handle(&key),
                Event::Resize(cols, rows) => {
                    let bounds = renderer.resize(cols, rows);
                    state.resize(bounds);
                }
                _ => {}
            }
        }

        let input = keys.sample();
        if input.quit {
            log::info!(
                "Quit at {:.1}s with score {}",
                state.elapsed,
                state.player.score
            );
            return Ok(());
        }

        let dt = clock.tick();
        tick(&mut state, &input, dt);

        let extras = HudExtras {
            fps: clock.fps(),
            autopilot: keys.autopilot(),
        };
        renderer.render(out, &Snapshot::capture(&state), extras)?;

        clock.sleep_remaining();
    }
}
