//! Scripted enemy movement
//!
//! Each enemy kind maps to one movement formula. Formulas read the enemy's
//! own kinematic state plus the shared context (stage, field size) and never
//! touch other entities. Per-kind mutable state (zigzag heading, circle
//! angle, dive status) lives in [`MovePhase`].

use glam::Vec2;
use rand::Rng;

use crate::consts::shooter::ZIGZAG_MARGIN;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Zigzag,
    Advanced,
    Circler,
    Boss,
    Diver,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Basic,
        EnemyKind::Zigzag,
        EnemyKind::Advanced,
        EnemyKind::Circler,
        EnemyKind::Boss,
        EnemyKind::Diver,
    ];

    pub fn max_health(self) -> u32 {
        match self {
            EnemyKind::Basic | EnemyKind::Zigzag => 1,
            EnemyKind::Advanced | EnemyKind::Circler | EnemyKind::Diver => 2,
            EnemyKind::Boss => 3,
        }
    }

    /// Points before the size multiplier is applied
    pub fn base_score(self) -> u64 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Zigzag => 150,
            EnemyKind::Advanced => 200,
            EnemyKind::Circler => 250,
            EnemyKind::Boss => 500,
            EnemyKind::Diver => 300,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Basic => 0xff4444,
            EnemyKind::Zigzag => 0x44ff44,
            EnemyKind::Advanced => 0xff8844,
            EnemyKind::Circler => 0x4488ff,
            EnemyKind::Boss => 0xff2266,
            EnemyKind::Diver => 0xff44ff,
        }
    }

    /// Lighter tint shown once the enemy has taken damage
    pub fn damaged_color(self) -> u32 {
        match self {
            EnemyKind::Basic => 0xff6666,
            EnemyKind::Zigzag => 0x66ff66,
            EnemyKind::Advanced => 0xffaa66,
            EnemyKind::Circler => 0x66aaff,
            EnemyKind::Boss => 0xff4488,
            EnemyKind::Diver => 0xff66ff,
        }
    }

    /// Downward drift factor (fraction of base speed) for a stage
    pub fn drift_factor(self, stage: u32) -> f32 {
        let (base, per_stage) = match self {
            EnemyKind::Basic => (0.10, 0.02),
            EnemyKind::Zigzag => (0.15, 0.02),
            EnemyKind::Advanced => (0.12, 0.02),
            EnemyKind::Circler | EnemyKind::Diver => (0.08, 0.02),
            EnemyKind::Boss => (0.05, 0.01),
        };
        base + stage.saturating_sub(1) as f32 * per_stage
    }
}

/// Sine oscillation around the spawn column
#[derive(Debug, Clone, Copy)]
struct Wave {
    amplitude: f32,
    /// Radians per ms
    rate: f32,
}

impl Wave {
    #[inline]
    fn at(self, timer_ms: f32) -> f32 {
        (timer_ms * self.rate).sin() * self.amplitude
    }
}

const BASIC_WAVE: Wave = Wave { amplitude: 50.0, rate: 0.002 };
const ADVANCED_WAVE: Wave = Wave { amplitude: 70.0, rate: 0.004 };
const DIVER_WAVE: Wave = Wave { amplitude: 30.0, rate: 0.003 };
const BOSS_SLOW_WAVE: Wave = Wave { amplitude: 80.0, rate: 0.001 };
const BOSS_FAST_WAVE: Wave = Wave { amplitude: 20.0, rate: 0.01 };

const ZIGZAG_SPEED_FACTOR: f32 = 0.5;
const CIRCLE_RADIUS: f32 = 40.0;
const CIRCLE_RATE: f32 = 0.003;
const CIRCLE_VERTICAL_AMPLITUDE: f32 = 20.0;
/// Chance per tick that an idle diver starts a dive
pub const DIVE_CHANCE: f64 = 0.0005;
const DIVE_START_SPEED: f32 = 200.0;
/// px/s²
const DIVE_ACCELERATION: f32 = 50.0;
/// How far below the field a dive continues before it ends
const DIVE_EXIT_MARGIN: f32 = 50.0;

/// Per-kind mutable movement state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovePhase {
    /// Formula depends only on the move timer
    Steady,
    Zigzag { direction: f32 },
    Circle { angle: f32 },
    Dive { diving: bool, speed: f32 },
}

impl MovePhase {
    /// Initial phase for a freshly spawned enemy
    pub fn for_kind(kind: EnemyKind, rng: &mut impl Rng) -> Self {
        match kind {
            EnemyKind::Zigzag => MovePhase::Zigzag {
                direction: if rng.random_bool(0.5) { -1.0 } else { 1.0 },
            },
            EnemyKind::Circler => MovePhase::Circle { angle: 0.0 },
            EnemyKind::Diver => MovePhase::Dive {
                diving: false,
                speed: 0.0,
            },
            EnemyKind::Basic | EnemyKind::Advanced | EnemyKind::Boss => MovePhase::Steady,
        }
    }
}

/// Position state the formulas integrate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Top-left corner
    pub pos: Vec2,
    /// Column the oscillating formulas swing around
    pub origin_x: f32,
    /// Accumulated movement time (ms)
    pub timer_ms: f32,
    /// Base speed in px/s
    pub speed: f32,
}

/// Shared read-only inputs to every formula
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    pub stage: u32,
    pub field_width: f32,
    pub field_height: f32,
}

/// Advance one enemy by `dt_ms` using its kind's formula
pub fn advance(
    kind: EnemyKind,
    phase: &mut MovePhase,
    body: &mut Kinematics,
    ctx: &MoveContext,
    rng: &mut impl Rng,
    dt_ms: f32,
) {
    body.timer_ms += dt_ms;
    let dt = dt_ms / 1000.0;
    let drift = body.speed * dt * kind.drift_factor(ctx.stage);

    match (kind, phase) {
        (EnemyKind::Basic, _) => {
            body.pos.x = body.origin_x + BASIC_WAVE.at(body.timer_ms);
            body.pos.y += drift;
        }
        (EnemyKind::Advanced, _) => {
            body.pos.x = body.origin_x + ADVANCED_WAVE.at(body.timer_ms);
            body.pos.y += drift;
        }
        (EnemyKind::Boss, _) => {
            body.pos.x =
                body.origin_x + BOSS_SLOW_WAVE.at(body.timer_ms) + BOSS_FAST_WAVE.at(body.timer_ms);
            body.pos.y += drift;
        }
        (EnemyKind::Zigzag, MovePhase::Zigzag { direction }) => {
            body.pos.x += *direction * body.speed * dt * ZIGZAG_SPEED_FACTOR;
            if body.pos.x < ZIGZAG_MARGIN || body.pos.x > ctx.field_width - ZIGZAG_MARGIN {
                *direction = -*direction;
            }
            body.pos.y += drift;
        }
        (EnemyKind::Circler, MovePhase::Circle { angle }) => {
            *angle += dt_ms * CIRCLE_RATE;
            body.pos.x = body.origin_x + angle.cos() * CIRCLE_RADIUS;
            body.pos.y += drift + angle.sin() * CIRCLE_VERTICAL_AMPLITUDE * dt;
        }
        (EnemyKind::Diver, MovePhase::Dive { diving, speed }) => {
            if !*diving && rng.random_bool(DIVE_CHANCE) {
                *diving = true;
                *speed = DIVE_START_SPEED;
            }
            if *diving {
                body.pos.y += *speed * dt;
                *speed += DIVE_ACCELERATION * dt;
                if body.pos.y > ctx.field_height + DIVE_EXIT_MARGIN {
                    *diving = false;
                    *speed = 0.0;
                }
            } else {
                body.pos.x = body.origin_x + DIVER_WAVE.at(body.timer_ms);
                body.pos.y += drift;
            }
        }
        // Phase payload out of sync with the kind; rebuild it and hold still this tick
        (kind, phase) => {
            log::debug!("Resetting movement phase for {:?}", kind);
            *phase = MovePhase::for_kind(kind, rng);
        }
    }
}
