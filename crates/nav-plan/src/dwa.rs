//! Local planning: dynamic-window-style velocity selection.
//!
//! Each query samples ~20 candidate velocities around the agent's current
//! speed and heading, rolls each one forward over a short horizon at
//! constant velocity, and scores the rollouts on three criteria:
//!
//! - **clearance** — minimum distance to any obstacle along the rollout,
//!   saturating at [`DwaConfig::clearance_saturation`]; a rollout that
//!   leaves the grid or collides is rejected outright;
//! - **heading** — cosine similarity between the candidate direction and the
//!   straight line to the target, rescaled to `[0, 1]`;
//! - **distance** — `exp(-d / decay)` of the rollout endpoint's distance to
//!   the target.
//!
//! Static obstacles are tested where they stand; dynamic obstacles at their
//! *predicted* position for each rollout instant, so the agent threads
//! between moving obstacles instead of dodging where they used to be.
//!
//! Sampling entropy comes from a caller-owned [`SampleRng`]: a seeded
//! generator makes the whole selection deterministic for tests.

use nav_core::{Point, SampleRng, Vec2};
use nav_world::Environment;

/// Samples below this speed are lifted back up so candidates keep moving;
/// stopping is expressed by the explicit zero-velocity outcomes, not by
/// sampling a crawl.
const MIN_SAMPLE_SPEED: f64 = 0.1;

// ── MotionLimits ──────────────────────────────────────────────────────────────

/// Agent velocity envelope.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionLimits {
    /// Maximum speed in grid units per second.
    pub max_speed: f64,
    /// Maximum heading perturbation per query, radians.
    pub max_turn_rate: f64,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            max_turn_rate: 2.0,
        }
    }
}

// ── LocalPlanner trait ────────────────────────────────────────────────────────

/// Pluggable reactive velocity selector.
pub trait LocalPlanner: Send + Sync {
    /// Choose the velocity the agent should use right now.
    ///
    /// `target` is typically the next waypoint of the global route.  Returns
    /// zero when the target is effectively reached or no candidate survives
    /// collision screening — both mean "hold position this tick".
    fn choose_velocity(
        &self,
        env: &Environment,
        position: Point,
        velocity: Vec2,
        target: Point,
        limits: MotionLimits,
        rng: &mut SampleRng,
    ) -> Vec2;
}

// ── DwaConfig ─────────────────────────────────────────────────────────────────

/// Tuning knobs for [`DwaPlanner`].
///
/// The three weights must sum to 1 with the clearance weight largest —
/// validated at construction, the one place a bad value can come from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DwaConfig {
    /// Candidate velocities drawn per query (the unperturbed current
    /// velocity is always evaluated in addition).
    pub samples: usize,
    /// Rollout horizon in seconds.
    pub horizon_secs: f64,
    /// Subdivisions of the horizon; collision and clearance are evaluated at
    /// each step.
    pub rollout_steps: usize,
    /// Weight of the clearance score.
    pub obstacle_weight: f64,
    /// Weight of the goal-heading score.
    pub heading_weight: f64,
    /// Weight of the goal-distance score.
    pub distance_weight: f64,
    /// Decay constant of the goal-distance score, `exp(-d / decay)`.
    pub distance_decay: f64,
    /// Clearance beyond this distance stops improving the score.
    pub clearance_saturation: f64,
    /// Agent collision radius used during rollout screening.
    pub agent_radius: f64,
    /// Target distance below which the planner stops sampling and holds.
    pub stop_distance: f64,
}

impl Default for DwaConfig {
    fn default() -> Self {
        Self {
            samples: 20,
            horizon_secs: 2.0,
            rollout_steps: 10,
            obstacle_weight: 0.4,
            heading_weight: 0.3,
            distance_weight: 0.3,
            distance_decay: 10.0,
            clearance_saturation: 5.0,
            agent_radius: 0.5,
            stop_distance: 0.1,
        }
    }
}

// ── DwaPlanner ────────────────────────────────────────────────────────────────

/// Sampled dynamic-window velocity selector.
pub struct DwaPlanner {
    config: DwaConfig,
}

impl DwaPlanner {
    /// Build a planner, validating the configuration.
    ///
    /// # Panics
    /// Panics on a malformed configuration (weights not summing to 1,
    /// clearance not the dominant criterion, non-positive horizons or radii).
    /// Configuration is assembled once at startup; failing fast there beats
    /// scoring garbage every tick.
    pub fn new(config: DwaConfig) -> Self {
        let weight_sum = config.obstacle_weight + config.heading_weight + config.distance_weight;
        assert!(
            (weight_sum - 1.0).abs() < 1e-9,
            "score weights must sum to 1, got {weight_sum}"
        );
        assert!(
            config.obstacle_weight >= config.heading_weight
                && config.obstacle_weight >= config.distance_weight,
            "obstacle avoidance must carry the largest weight"
        );
        assert!(config.samples > 0, "need at least one sample");
        assert!(
            config.horizon_secs > 0.0 && config.rollout_steps > 0,
            "rollout horizon must be non-trivial"
        );
        assert!(
            config.distance_decay > 0.0
                && config.clearance_saturation > 0.0
                && config.agent_radius > 0.0
                && config.stop_distance >= 0.0,
            "distances must be positive"
        );
        Self { config }
    }

    pub fn config(&self) -> &DwaConfig {
        &self.config
    }

    /// Score one candidate, or `None` if its rollout leaves the grid or
    /// collides.
    fn score_candidate(
        &self,
        env: &Environment,
        position: Point,
        velocity: Vec2,
        target: Point,
    ) -> Option<f64> {
        let cfg = &self.config;
        let grid = env.grid();

        let mut min_clearance = f64::INFINITY;
        let mut end = position;
        for i in 0..=cfg.rollout_steps {
            let t = cfg.horizon_secs * i as f64 / cfg.rollout_steps as f64;
            let p = position + velocity * t;

            if !grid.contains(p) {
                return None;
            }
            if env.check_static_collision(p, cfg.agent_radius) {
                return None;
            }
            if let Some(d) = env.nearest_static_clearance(p) {
                min_clearance = min_clearance.min(d);
            }
            for obstacle in env.dynamic_obstacles() {
                let d = obstacle.predicted_position(t).distance(p);
                if d < obstacle.radius() + cfg.agent_radius {
                    return None;
                }
                min_clearance = min_clearance.min(d);
            }
            end = p;
        }

        // An unobstructed world saturates the clearance term.
        let clearance_score = (min_clearance / cfg.clearance_saturation).clamp(0.0, 1.0);

        let to_target = position.to(target);
        let heading_score = if to_target.length() < 1e-3 {
            1.0
        } else {
            (to_target.normalized().dot(velocity.normalized()) + 1.0) / 2.0
        };

        let distance_score = (-end.distance(target) / cfg.distance_decay).exp();

        Some(
            cfg.obstacle_weight * clearance_score
                + cfg.heading_weight * heading_score
                + cfg.distance_weight * distance_score,
        )
    }
}

impl Default for DwaPlanner {
    fn default() -> Self {
        Self::new(DwaConfig::default())
    }
}

impl LocalPlanner for DwaPlanner {
    fn choose_velocity(
        &self,
        env: &Environment,
        position: Point,
        velocity: Vec2,
        target: Point,
        limits: MotionLimits,
        rng: &mut SampleRng,
    ) -> Vec2 {
        // Effectively on target: hold instead of sampling noise around it.
        if position.distance(target) < self.config.stop_distance {
            return Vec2::ZERO;
        }

        let current_speed = velocity.length();
        let current_heading = velocity.heading();

        // The unperturbed current velocity is candidate zero, so "keep doing
        // what you're doing" always competes.
        let mut candidates = Vec::with_capacity(self.config.samples + 1);
        candidates.push(velocity);
        for _ in 0..self.config.samples {
            let speed = (current_speed + rng.gen_range(0.0..=limits.max_speed))
                .clamp(MIN_SAMPLE_SPEED, limits.max_speed);
            let heading =
                current_heading + rng.gen_range(-limits.max_turn_rate..=limits.max_turn_rate);
            candidates.push(Vec2::from_polar(speed, heading));
        }

        // Strict `>` keeps the earliest of equally scored candidates, so a
        // seeded RNG makes the selection fully deterministic.
        let mut best: Option<(f64, Vec2)> = None;
        for candidate in candidates {
            if let Some(score) = self.score_candidate(env, position, candidate, target) {
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, candidate));
                }
            }
        }

        match best {
            Some((_, velocity)) => velocity,
            // Every rollout collides: hold position rather than pick a crash.
            None => Vec2::ZERO,
        }
    }
}
