//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of terminal
//! and platform concerns:
//! - Variable timestep supplied by the caller
//! - Seeded RNG only (reproducible per seed and input sequence)
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod player;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::CollisionReport;
pub use player::{DamageOutcome, Player};
pub use snapshot::{PlayerView, Snapshot};
pub use state::{
    Bounds, Bullet, Enemy, GamePhase, GameState, Particle, PowerTimers, PowerUp, PowerUpKind,
    SessionStats, Star,
};
pub use tick::{TickInput, tick};
