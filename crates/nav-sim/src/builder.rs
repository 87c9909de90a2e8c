//! Fluent builder for constructing a [`Simulation`].

use nav_core::SampleRng;
use nav_world::Environment;
use nav_plan::{GlobalPlanner, LocalPlanner, MotionLimits};

use crate::error::{SimError, SimResult};
use crate::sim::Simulation;

/// Builder for [`Simulation<G, L>`].
///
/// # Required inputs
///
/// - [`Environment`] — usually from
///   [`ScenarioConfig::build_environment`][crate::ScenarioConfig::build_environment]
/// - `G: GlobalPlanner` — e.g. [`nav_plan::AStarPlanner`]
/// - `L: LocalPlanner` — e.g. [`nav_plan::DwaPlanner`]
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                                         |
/// |--------------|-------------------------------------------------|
/// | `.limits(l)` | `MotionLimits::default()` (5.0 u/s, 2.0 rad)    |
/// | `.seed(n)`   | OS entropy (pass a seed for reproducible runs)  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimulationBuilder::new(env, AStarPlanner::new(), DwaPlanner::default())
///     .seed(42)
///     .build()?;
/// sim.start();
/// ```
pub struct SimulationBuilder<G: GlobalPlanner, L: LocalPlanner> {
    env: Environment,
    global: G,
    local: L,
    limits: Option<MotionLimits>,
    seed: Option<u64>,
}

impl<G: GlobalPlanner, L: LocalPlanner> SimulationBuilder<G, L> {
    /// Create a builder with all required inputs.
    pub fn new(env: Environment, global: G, local: L) -> Self {
        Self {
            env,
            global,
            local,
            limits: None,
            seed: None,
        }
    }

    /// Supply the agent's velocity envelope.
    pub fn limits(mut self, limits: MotionLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Seed the sampler RNG for a reproducible run.  Without a seed the
    /// generator draws from OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate inputs and return a ready-to-drive [`Simulation`] in the
    /// `Idle` state.
    pub fn build(self) -> SimResult<Simulation<G, L>> {
        let limits = self.limits.unwrap_or_default();
        if !limits.max_speed.is_finite() || limits.max_speed <= 0.0 {
            return Err(SimError::Config(format!(
                "max_speed must be positive and finite, got {}",
                limits.max_speed
            )));
        }
        if !limits.max_turn_rate.is_finite() || limits.max_turn_rate <= 0.0 {
            return Err(SimError::Config(format!(
                "max_turn_rate must be positive and finite, got {}",
                limits.max_turn_rate
            )));
        }

        let rng = match self.seed {
            Some(seed) => SampleRng::seeded(seed),
            None => SampleRng::from_entropy(),
        };

        Ok(Simulation::from_parts(
            self.env,
            self.global,
            self.local,
            rng,
            limits,
        ))
    }
}
