//! Shared entity shapes
//!
//! Every moving thing in either game is an axis-aligned box (or, for the
//! ball, a circle) with a position and optional velocity. The types here
//! carry no game rules; the per-game state modules build on them.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

/// Axis-aligned bounding box, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Anything that occupies a box on the field
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

/// Visual flavour of a particle, decides its motion constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Debris from a destroyed brick (falls under gravity)
    Debris,
    /// Burst from a destroyed enemy or a hit player
    Explosion,
    /// Rising sparks along the bottom edge when an enemy slips past
    Warning,
}

impl ParticleKind {
    /// Lifetime in ms at spawn
    pub fn lifetime_ms(self) -> f32 {
        match self {
            ParticleKind::Debris | ParticleKind::Explosion => 1000.0,
            ParticleKind::Warning => 800.0,
        }
    }

    /// Per-tick velocity multipliers (x, y)
    fn friction(self) -> (f32, f32) {
        match self {
            ParticleKind::Debris => (0.98, 1.0),
            ParticleKind::Explosion => (0.98, 0.98),
            ParticleKind::Warning => (0.95, 0.98),
        }
    }

    /// Downward acceleration in px/s²
    fn gravity(self) -> f32 {
        match self {
            ParticleKind::Debris => crate::consts::breaker::PARTICLE_GRAVITY,
            _ => 0.0,
        }
    }
}

/// A short-lived visual particle (not gameplay-affecting)
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ms
    pub life: f32,
    pub size: f32,
    pub color: u32,
}

impl Particle {
    /// Brick debris: scatters sideways and pops upward
    pub fn debris(rng: &mut impl Rng, pos: Vec2, color: u32) -> Self {
        let vx = (rng.random::<f32>() - 0.5) * 200.0;
        let vy = -rng.random::<f32>() * 150.0 - 50.0;
        Self {
            kind: ParticleKind::Debris,
            pos,
            vel: Vec2::new(vx, vy),
            life: ParticleKind::Debris.lifetime_ms(),
            size: rng.random::<f32>() * 4.0 + 2.0,
            color,
        }
    }

    /// Explosion spark: uniform spread in both axes
    pub fn explosion(rng: &mut impl Rng, pos: Vec2) -> Self {
        let vx = (rng.random::<f32>() - 0.5) * 200.0;
        let vy = (rng.random::<f32>() - 0.5) * 200.0;
        Self {
            kind: ParticleKind::Explosion,
            pos,
            vel: Vec2::new(vx, vy),
            life: ParticleKind::Explosion.lifetime_ms(),
            size: rng.random::<f32>() * 3.0 + 1.0,
            color: 0xffaa00,
        }
    }

    /// Warning spark rising from the bottom edge
    pub fn warning(rng: &mut impl Rng, pos: Vec2) -> Self {
        let vx = (rng.random::<f32>() - 0.5) * 100.0;
        let vy = -rng.random::<f32>() * 150.0 - 50.0;
        Self {
            kind: ParticleKind::Warning,
            pos,
            vel: Vec2::new(vx, vy),
            life: ParticleKind::Warning.lifetime_ms(),
            size: rng.random::<f32>() * 4.0 + 2.0,
            color: 0xff4444,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        self.pos += self.vel * dt;
        self.life -= dt_ms;
        let (fx, fy) = self.kind.friction();
        self.vel.x *= fx;
        self.vel.y *= fy;
        self.vel.y += self.kind.gravity() * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life in 0..=1 for fading
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.kind.lifetime_ms()).clamp(0.0, 1.0)
    }
}

/// Advance every particle and drop the expired ones
pub fn advance_particles(particles: &mut Vec<Particle>, dt_ms: f32) {
    for particle in particles.iter_mut() {
        particle.advance(dt_ms);
    }
    particles.retain(Particle::is_alive);
}

/// Push particles while respecting a cap, oldest are evicted first
pub fn push_capped(particles: &mut Vec<Particle>, new: impl IntoIterator<Item = Particle>, cap: usize) {
    particles.extend(new);
    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

/// Fixed-length position history, oldest first
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = Trail::new(10);
        for i in 0..25 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), 10);
        // Oldest surviving point is the 16th pushed
        assert_eq!(trail.iter().next().map(|p| p.x), Some(15.0));
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particles: Vec<Particle> = (0..5)
            .map(|_| Particle::warning(&mut rng, Vec2::ZERO))
            .collect();
        advance_particles(&mut particles, 500.0);
        assert_eq!(particles.len(), 5);
        advance_particles(&mut particles, 400.0);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_debris_falls_under_gravity() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = Particle::debris(&mut rng, Vec2::ZERO, 0xffffff);
        let vy0 = p.vel.y;
        p.advance(100.0);
        assert!((p.vel.y - (vy0 + 20.0)).abs() < 0.001);
    }

    #[test]
    fn test_push_capped_evicts_oldest() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        push_capped(
            &mut particles,
            (0..4).map(|i| Particle::explosion(&mut rng, Vec2::splat(i as f32))),
            3,
        );
        assert_eq!(particles.len(), 3);
        assert_eq!(particles[0].pos.x, 1.0);
    }
}
