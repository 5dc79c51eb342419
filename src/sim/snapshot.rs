//! Read-only view of a session for the renderer
//!
//! The renderer never sees game state directly. Each frame it receives a
//! `RenderSnapshot`: HUD values plus one flat list of sprite instances that
//! can be uploaded as-is into an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::breaker::BreakerState;
use super::entity::{Bounded, Particle, Rect};
use super::session::GamePhase;
use super::shooter::ShooterState;
use crate::consts::shooter::{INVULNERABLE_MS, SCREEN_FLASH_MS};

const PADDLE_COLOR: u32 = 0x4d9de0;
const BALL_COLOR: u32 = 0xffffff;
const PLAYER_COLOR: u32 = 0x00ff88;

/// What a sprite instance depicts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Paddle = 0,
    Ball = 1,
    Trail = 2,
    Brick = 3,
    PowerUp = 4,
    Player = 5,
    PlayerBullet = 6,
    EnemyBullet = 7,
    Enemy = 8,
    Particle = 9,
}

/// One drawable box, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner (center for the ball and trail)
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// `SpriteKind` discriminant
    pub kind: u32,
    /// Remaining life in 0..=1 (particles, trail fade, invulnerability)
    pub life: f32,
}

impl SpriteInstance {
    fn new(kind: SpriteKind, position: Vec2, size: Vec2, color: u32, life: f32) -> Self {
        Self {
            position: position.to_array(),
            size: size.to_array(),
            color: rgb(color, 1.0),
            kind: kind as u32,
            life,
        }
    }

    fn from_rect(kind: SpriteKind, rect: Rect, color: u32) -> Self {
        Self::new(kind, rect.pos, rect.size, color, 1.0)
    }

    fn particle(p: &Particle) -> Self {
        let life = p.life_fraction();
        let mut sprite = Self::new(SpriteKind::Particle, p.pos, Vec2::splat(p.size), p.color, life);
        sprite.color[3] = life;
        sprite
    }

    pub fn sprite_kind(&self) -> SpriteKind {
        match self.kind {
            0 => SpriteKind::Paddle,
            1 => SpriteKind::Ball,
            2 => SpriteKind::Trail,
            3 => SpriteKind::Brick,
            4 => SpriteKind::PowerUp,
            5 => SpriteKind::Player,
            6 => SpriteKind::PlayerBullet,
            7 => SpriteKind::EnemyBullet,
            8 => SpriteKind::Enemy,
            _ => SpriteKind::Particle,
        }
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats
pub fn rgb(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Everything the renderer and HUD need for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Level (breaker) or stage (shooter)
    pub stage: u32,
    /// Red overlay strength in 0..=1
    pub screen_flash: f32,
    /// Time left on the stage banner, 0 when none is showing
    pub banner_ms: f32,
    pub invulnerable: bool,
    pub paddle_expanded: bool,
    pub sprites: Vec<SpriteInstance>,
}

impl RenderSnapshot {
    /// Drop every sprite of one kind (used when an effect is disabled)
    pub fn strip(&mut self, kind: SpriteKind) {
        self.sprites.retain(|s| s.kind != kind as u32);
    }

    pub fn count(&self, kind: SpriteKind) -> usize {
        self.sprites.iter().filter(|s| s.kind == kind as u32).count()
    }

    /// Raw bytes of the sprite list for an instance buffer upload
    pub fn sprite_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }
}

/// Build the breaker frame
pub fn breaker(state: &BreakerState) -> RenderSnapshot {
    let mut sprites = Vec::with_capacity(
        state.bricks.len() + state.power_ups.len() + state.particles.len() + state.ball.trail.len() + 2,
    );

    for brick in &state.bricks {
        let alpha = brick.health as f32 / brick.max_health as f32;
        let mut sprite = SpriteInstance::from_rect(SpriteKind::Brick, brick.bounds(), brick.color);
        sprite.life = alpha;
        sprites.push(sprite);
    }

    // Oldest point first, fading in towards the ball
    let trail_len = state.ball.trail.len() as f32;
    for (i, point) in state.ball.trail.iter().enumerate() {
        let t = (i + 1) as f32 / trail_len;
        let mut sprite = SpriteInstance::new(
            SpriteKind::Trail,
            *point,
            Vec2::splat(state.ball.radius * 2.0 * t),
            BALL_COLOR,
            t,
        );
        sprite.color[3] = t * 0.5;
        sprites.push(sprite);
    }

    sprites.push(SpriteInstance::new(
        SpriteKind::Ball,
        state.ball.pos,
        Vec2::splat(state.ball.radius * 2.0),
        BALL_COLOR,
        1.0,
    ));
    sprites.push(SpriteInstance::from_rect(SpriteKind::Paddle, state.paddle.bounds(), PADDLE_COLOR));

    for power_up in &state.power_ups {
        sprites.push(SpriteInstance::from_rect(SpriteKind::PowerUp, power_up.bounds(), power_up.kind.color()));
    }
    sprites.extend(state.particles.iter().map(SpriteInstance::particle));

    RenderSnapshot {
        field: state.field,
        phase: state.phase,
        score: state.score,
        lives: state.lives,
        stage: state.level,
        screen_flash: 0.0,
        banner_ms: 0.0,
        invulnerable: false,
        paddle_expanded: state.paddle.is_expanded(),
        sprites,
    }
}

/// Build the shooter frame
pub fn shooter(state: &ShooterState) -> RenderSnapshot {
    let mut sprites = Vec::with_capacity(
        state.enemies.len() + state.bullets.len() + state.enemy_bullets.len() + state.particles.len() + 1,
    );

    for enemy in &state.enemies {
        sprites.push(SpriteInstance::from_rect(SpriteKind::Enemy, enemy.bounds(), enemy.color()));
    }
    for bullet in &state.bullets {
        sprites.push(SpriteInstance::from_rect(SpriteKind::PlayerBullet, bullet.bounds(), bullet.color));
    }
    for bullet in &state.enemy_bullets {
        sprites.push(SpriteInstance::from_rect(SpriteKind::EnemyBullet, bullet.bounds(), bullet.color));
    }

    let player = &state.player;
    let mut ship = SpriteInstance::from_rect(SpriteKind::Player, player.bounds(), PLAYER_COLOR);
    if player.is_invulnerable() {
        ship.life = 1.0 - (player.invulnerable_ms / INVULNERABLE_MS).clamp(0.0, 1.0);
    }
    sprites.push(ship);
    sprites.extend(state.particles.iter().map(SpriteInstance::particle));

    RenderSnapshot {
        field: state.field,
        phase: state.phase,
        score: state.score,
        lives: state.lives,
        stage: state.stage,
        screen_flash: (state.screen_flash_ms / SCREEN_FLASH_MS).clamp(0.0, 1.0),
        banner_ms: state.stage_pause.map_or(0.0, |c| c.remaining_ms()),
        invulnerable: player.is_invulnerable(),
        paddle_expanded: false,
        sprites,
    }
}
