//! Enemy wave generation
//!
//! Waves get wider, deeper, denser and bigger with each stage, and new
//! enemy kinds unlock as stages go up.

use glam::Vec2;
use rand::Rng;

use super::state::Enemy;
use crate::consts::shooter::*;
use crate::sim::movement::EnemyKind;

/// Grid geometry of one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveLayout {
    pub rows: u32,
    pub cols: u32,
    pub size_multiplier: f32,
    /// Horizontal distance between columns
    pub spacing: f32,
    pub start_x: f32,
}

impl WaveLayout {
    pub fn for_stage(stage: u32, field_width: f32) -> Self {
        let rows = (2 + stage / 2).min(WAVE_MAX_ROWS);
        let cols = (4 + stage / 3).min(WAVE_MAX_COLS);
        let size_multiplier = 1.0 + stage.saturating_sub(1) as f32 * SIZE_GROWTH_PER_STAGE;
        let spacing = (100.0 - stage as f32 * 5.0).max(60.0);
        let start_x = (field_width - (cols - 1) as f32 * spacing) / 2.0;
        Self {
            rows,
            cols,
            size_multiplier,
            spacing,
            start_x,
        }
    }

    pub fn enemy_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

/// Pick the kind for one grid slot; the first matching rule wins
///
/// Bosses take the back rows before the advanced rule claims the back half,
/// otherwise the boss band would always be shadowed.
pub fn choose_kind(stage: u32, row: u32, rows: u32, rng: &mut impl Rng) -> EnemyKind {
    if stage >= 2 && rng.random_bool(0.2) {
        EnemyKind::Zigzag
    } else if stage >= 5 && row >= (rows as f32 * 0.7).floor() as u32 {
        EnemyKind::Boss
    } else if stage >= 3 && row >= rows / 2 {
        EnemyKind::Advanced
    } else if stage >= 4 && rng.random_bool(0.15) {
        EnemyKind::Circler
    } else if stage >= 6 && rng.random_bool(0.1) {
        EnemyKind::Diver
    } else {
        EnemyKind::Basic
    }
}

/// Build the full wave for a stage, row by row
pub fn spawn_wave(stage: u32, field_width: f32, rng: &mut impl Rng) -> Vec<Enemy> {
    let layout = WaveLayout::for_stage(stage, field_width);
    let mut enemies = Vec::with_capacity(layout.enemy_count());

    for row in 0..layout.rows {
        for col in 0..layout.cols {
            let pos = Vec2::new(
                layout.start_x + col as f32 * layout.spacing,
                WAVE_TOP_OFFSET + row as f32 * WAVE_ROW_PITCH,
            );
            let kind = choose_kind(stage, row, layout.rows, rng);
            enemies.push(Enemy::new(pos, kind, layout.size_multiplier, rng));
        }
    }

    log::info!(
        "Stage {}: {}x{} wave, size x{:.2}",
        stage,
        layout.rows,
        layout.cols,
        layout.size_multiplier
    );
    enemies
}
