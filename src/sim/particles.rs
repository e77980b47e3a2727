//! Short-lived burst particles
//!
//! Purely visual: particles never collide and never affect scoring. The
//! system owns every particle; callers only see them through [`ParticleSystem::particles`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Settings;
use crate::consts::*;

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: u32,
}

/// Burst shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    /// Particles per explosion
    pub count: usize,
    /// Ticks a particle lives
    pub life: u32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Radius of the marker drawn for each particle
    pub radius: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            life: PARTICLE_LIFE,
            min_speed: PARTICLE_MIN_SPEED,
            max_speed: PARTICLE_MAX_SPEED,
            radius: PARTICLE_RADIUS,
        }
    }
}

impl From<&Settings> for ParticleConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            count: settings.particle_count,
            life: settings.particle_life,
            min_speed: settings.particle_min_speed,
            max_speed: settings.particle_max_speed,
            radius: settings.particle_radius,
        }
    }
}

/// Owner of all live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    config: ParticleConfig,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Spawn a burst of the configured size at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2) {
        self.spawn_burst(pos, self.config.count);
    }

    /// Spawn exactly `count` particles radiating from `pos` in random
    /// directions with random speeds
    pub fn spawn_burst(&mut self, pos: Vec2, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self
                .rng
                .random_range(self.config.min_speed..=self.config.max_speed);
            self.particles.push(Particle {
                pos,
                vel: crate::polar_to_cartesian(speed, angle),
                life: self.config.life,
            });
        }
    }

    /// Move every particle one tick, age it, and drop the expired ones.
    /// Returns the survivors for rendering.
    pub fn advance(&mut self) -> &[Particle] {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
        &self.particles
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Positions paired with the fixed marker radius
    pub fn markers(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        let radius = self.config.radius;
        self.particles.iter().map(move |p| (p.pos, radius))
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
