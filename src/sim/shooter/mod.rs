//! Space-shooter: a ship, descending enemy waves and two bullet streams

pub mod state;
pub mod tick;
pub mod wave;

pub use state::{Bullet, Enemy, Player, RunResult, RunStats, ShooterState};
pub use tick::tick;
pub use wave::{WaveLayout, spawn_wave};
