//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only advances through the `dt_ms` handed to `tick`
//! - Seeded RNG only, owned by the session state
//! - No rendering, storage or platform dependencies

pub mod breaker;
pub mod collision;
pub mod entity;
pub mod movement;
pub mod session;
pub mod shooter;
pub mod snapshot;

pub use breaker::BreakerState;
pub use collision::{circle_rect_overlap, rects_overlap};
pub use entity::{Bounded, Particle, ParticleKind, Rect, Trail};
pub use movement::{EnemyKind, MovePhase};
pub use session::{Command, Countdown, GameEvent, GamePhase, TickInput};
pub use shooter::{RunResult, ShooterState};
pub use snapshot::{RenderSnapshot, SpriteInstance, SpriteKind};
