//! Particle system scenario.
//!
//! Every particle owns Position, Velocity, Lifetime and Color. Each frame integrates movement,
//! decays lifetimes, fades colors, and replaces expired particles with fresh ones. Replacement
//! destroys the old entity and creates a new one, so the frame also exercises id recycling and
//! swap-remove in every store.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ecs::ecs::{EcsError, Entity, Registry};

use crate::components::{Color, Lifetime, Position, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle scenario.
pub struct ParticleConfig {
    /// Number of particles kept alive.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

/// Particle workload over a single registry.
pub struct ParticleScenario {
    config: ParticleConfig,
    registry: Registry,
    rng: ChaCha8Rng,
    respawned: usize,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: Registry::new(),
            respawned: 0,
            config,
        }
    }

    /// The registry holding the particles.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of particles replaced since setup.
    pub fn respawned(&self) -> usize {
        self.respawned
    }

    fn spawn_particle(&mut self) -> Result<Entity, EcsError> {
        let rng = &mut self.rng;
        let entity = self.registry.create();
        self.registry.insert(
            entity,
            Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            },
        )?;
        self.registry.insert(
            entity,
            Velocity {
                x: rng.gen_range(-10.0..10.0),
                y: rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-10.0..10.0),
            },
        )?;
        self.registry.insert(
            entity,
            Lifetime {
                remaining: rng.gen_range(0.1..2.0),
                total: 2.0,
            },
        )?;
        self.registry.insert(
            entity,
            Color {
                r: rng.gen_range(0.0..1.0),
                g: rng.gen_range(0.0..1.0),
                b: rng.gen_range(0.0..1.0),
                a: 1.0,
            },
        )?;
        Ok(entity)
    }

    /// Integrate positions.
    pub fn movement(&mut self) {
        let dt = self.config.delta_time;
        for (_, (position, velocity)) in self.registry.view::<(&mut Position, &Velocity)>() {
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
            position.z += velocity.z * dt;
        }
    }

    /// Decay lifetimes and fade colors, returning the expired particles.
    pub fn decay(&mut self) -> Vec<Entity> {
        let dt = self.config.delta_time;
        let mut expired = Vec::new();
        for (entity, (lifetime, color)) in self.registry.view::<(&mut Lifetime, &mut Color)>() {
            lifetime.remaining -= dt;
            color.a = (lifetime.remaining / lifetime.total).max(0.0);
            if lifetime.remaining <= 0.0 {
                expired.push(entity);
            }
        }
        expired
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "high entity count with constant destroy/create churn"
    }

    fn entity_count(&self) -> usize {
        self.registry.len()
    }

    fn setup(&mut self) {
        for _ in 0..self.config.particle_count {
            self.spawn_particle().expect("fresh particle entity");
        }
    }

    fn update(&mut self) {
        self.movement();
        for entity in self.decay() {
            self.registry.destroy(entity);
            self.spawn_particle().expect("fresh particle entity");
            self.respawned += 1;
        }
    }

    fn teardown(&mut self) {
        self.registry.clear();
    }
}
