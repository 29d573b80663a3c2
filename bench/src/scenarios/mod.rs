//! Workload scenarios.
//!
//! - **Particles**: high entity count, simple components, constant destroy/create churn

pub mod particles;

pub use particles::{ParticleConfig, ParticleScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of live entities in this scenario.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (create entities, initialize state).
    fn setup(&mut self);

    /// Run one frame of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
