//! The `Simulation` struct and its tick loop.

use nav_core::{Point, SampleRng, Vec2};
use nav_world::{Environment, Obstacle, ObstacleId, REMOVE_TOLERANCE};
use nav_plan::{GlobalPlanner, LocalPlanner, MotionLimits};

use crate::observer::{NoopObserver, SimObserver};

/// Minimum spacing between recorded trace points; integration steps closer
/// than this to the last recorded point are not appended.
const TRACE_MIN_STEP: f64 = 0.01;

// ── SimState ──────────────────────────────────────────────────────────────────

/// Simulation lifecycle.
///
/// ```text
/// Idle ──start()──▶ Running ──goal reached──▶ Finished
///  ▲                   │                         │
///  └───────────────reset()◀──────────────────────┘
/// ```
///
/// No other transitions exist: `start()` outside `Idle` is a no-op, and only
/// `reset()` leaves `Finished`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimState {
    Idle,
    Running,
    Finished,
}

impl SimState {
    #[inline]
    pub fn is_idle(self) -> bool {
        self == SimState::Idle
    }

    #[inline]
    pub fn is_running(self) -> bool {
        self == SimState::Running
    }

    #[inline]
    pub fn is_finished(self) -> bool {
        self == SimState::Finished
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The simulation runner: owns the environment, both planners, the sampler
/// RNG, and the agent's kinematic state.
///
/// `Simulation<G, L>` is generic over the global and local planner so either
/// strategy can be swapped at compile time with no runtime overhead.  Create
/// via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation<G: GlobalPlanner, L: LocalPlanner> {
    env: Environment,
    global: G,
    local: L,
    rng: SampleRng,
    limits: MotionLimits,
    state: SimState,
    /// Accumulated simulated seconds since `start()`.
    time: f64,
    /// The agent's velocity; magnitude never exceeds `limits.max_speed`.
    /// Mutated only by the local-planner integration step.
    velocity: Vec2,
    /// Positions the agent has actually traversed this run.
    trace: Vec<Point>,
}

impl<G: GlobalPlanner, L: LocalPlanner> Simulation<G, L> {
    pub(crate) fn from_parts(
        env: Environment,
        global: G,
        local: L,
        rng: SampleRng,
        limits: MotionLimits,
    ) -> Self {
        Self {
            env,
            global,
            local,
            rng,
            limits,
            state: SimState::Idle,
            time: 0.0,
            velocity: Vec2::ZERO,
            trace: Vec::new(),
        }
    }

    // ── Simulation control ────────────────────────────────────────────────

    /// Transition `Idle → Running`.
    ///
    /// Refused (returns `false`, nothing changes) unless the simulation is
    /// `Idle` and both start and goal are set in bounds.  Accepting resets
    /// simulation time, the trace, the agent velocity, and every dynamic
    /// obstacle's pose.
    pub fn start(&mut self) -> bool {
        if self.state != SimState::Idle {
            return false;
        }
        if !self.env.is_in_bounds(self.env.start()) || !self.env.is_in_bounds(self.env.goal()) {
            return false;
        }
        self.time = 0.0;
        self.trace.clear();
        self.velocity = Vec2::ZERO;
        self.env.reset();
        self.state = SimState::Running;
        true
    }

    /// Return to `Idle` from any state: clear the trace and stored path,
    /// restore obstacle spawn poses, and put the agent back on the start.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.state = SimState::Idle;
        self.time = 0.0;
        self.trace.clear();
        self.velocity = Vec2::ZERO;
        self.env.reset();
    }

    /// Advance the simulation by `dt` seconds.  A no-op unless `Running`.
    pub fn advance<O: SimObserver>(&mut self, dt: f64, observer: &mut O) {
        if self.state != SimState::Running {
            return;
        }
        self.time += dt;

        // ── Phase 1: obstacle kinematics ──────────────────────────────────
        //
        // May invalidate the stored plan if a path cell becomes blocked.
        self.env.update_obstacles(dt);

        // ── Phase 2: replan if the plan is gone or stale ──────────────────
        if !self.env.has_current_path() && !self.replan(observer) {
            // No route right now: hold position and retry next tick.
            self.velocity = Vec2::ZERO;
            observer.on_tick_end(self.time, &self.env);
            return;
        }

        // ── Phase 3+4: pick a velocity toward the next waypoint, integrate ─
        let target = self.next_waypoint();
        self.velocity = self.local.choose_velocity(
            &self.env,
            self.env.current(),
            self.velocity,
            target,
            self.limits,
            &mut self.rng,
        );
        let new_pos = self.env.current() + self.velocity * dt;
        self.env.set_current(new_pos);
        self.record_trace(new_pos);

        // ── Phase 5: goal arrival ─────────────────────────────────────────
        if self.env.has_reached_goal() {
            self.state = SimState::Finished;
            self.velocity = Vec2::ZERO;
            // Freeze the traversed trace as the published path.
            self.env.set_path(self.trace.clone());
            observer.on_goal_reached(self.time, &self.env);
        }

        observer.on_tick_end(self.time, &self.env);
    }

    /// Run `n` fixed-step ticks.  Convenience for tests and headless hosts.
    pub fn run_ticks<O: SimObserver>(&mut self, n: usize, dt: f64, observer: &mut O) {
        for _ in 0..n {
            if !self.state.is_running() {
                break;
            }
            self.advance(dt, observer);
        }
    }

    // ── Editor command surface ────────────────────────────────────────────

    pub fn set_start(&mut self, p: Point) -> bool {
        self.env.set_start(p)
    }

    pub fn set_goal(&mut self, p: Point) -> bool {
        self.env.set_goal(p)
    }

    pub fn add_static_obstacle(&mut self, p: Point) -> Option<ObstacleId> {
        self.env.add_obstacle(Obstacle::fixed(p))
    }

    pub fn add_linear_obstacle(&mut self, p: Point, speed: f64, direction: Vec2) -> Option<ObstacleId> {
        self.env.add_obstacle(Obstacle::linear(p, speed, direction))
    }

    pub fn add_circular_obstacle(
        &mut self,
        p: Point,
        center: Point,
        orbit_radius: f64,
        angular_speed: f64,
    ) -> Option<ObstacleId> {
        self.env
            .add_obstacle(Obstacle::circular(p, center, orbit_radius, angular_speed))
    }

    /// Remove every obstacle within the default tolerance of `p`.
    pub fn remove_obstacle(&mut self, p: Point) -> usize {
        self.env.remove_obstacle(p, REMOVE_TOLERANCE)
    }

    /// Discard the stored plan and plan again immediately.  Returns whether
    /// a route was found.
    pub fn request_replan(&mut self) -> bool {
        self.replan(&mut NoopObserver)
    }

    // ── Render / query surface ────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Simulated seconds since the last `start()`.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn agent_position(&self) -> Point {
        self.env.current()
    }

    #[inline]
    pub fn agent_velocity(&self) -> Vec2 {
        self.velocity
    }

    /// The published global plan (or, once `Finished`, the frozen trace).
    #[inline]
    pub fn path(&self) -> &[Point] {
        self.env.path()
    }

    /// Positions the agent has traversed since `start()`.
    #[inline]
    pub fn traversed_path(&self) -> &[Point] {
        &self.trace
    }

    #[inline]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Mutable environment access for hosts that edit the world directly.
    /// Edits must happen between ticks, never concurrently with `advance`.
    #[inline]
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    #[inline]
    pub fn limits(&self) -> MotionLimits {
        self.limits
    }

    /// Replace the agent's velocity envelope (the host's parameter panel).
    ///
    /// # Panics
    /// Panics on non-positive or non-finite limits, like the builder.
    pub fn set_limits(&mut self, limits: MotionLimits) {
        assert!(
            limits.max_speed.is_finite() && limits.max_speed > 0.0,
            "max_speed must be positive"
        );
        assert!(
            limits.max_turn_rate.is_finite() && limits.max_turn_rate > 0.0,
            "max_turn_rate must be positive"
        );
        self.limits = limits;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Clear any stored plan and run the global planner from the agent's
    /// cell.  Stores and reports the fresh path on success.
    fn replan<O: SimObserver>(&mut self, observer: &mut O) -> bool {
        let from = self.env.current().to_cell();
        let to = self.env.goal().to_cell();
        self.env.invalidate_plan();
        let path = self.global.plan(&self.env, from, to);
        if path.is_empty() {
            observer.on_plan_unavailable(self.time);
            return false;
        }
        observer.on_replan(self.time, &path);
        self.env.set_path(path);
        true
    }

    /// Waypoint to steer toward: the successor of the nearest path point
    /// (the nearest itself when the agent is at the path's end).
    fn next_waypoint(&self) -> Point {
        let path = self.env.path();
        debug_assert!(!path.is_empty());

        let pos = self.env.current();
        let mut nearest = 0;
        let mut best = f64::INFINITY;
        for (i, p) in path.iter().enumerate() {
            let d = pos.distance(*p);
            if d < best {
                best = d;
                nearest = i;
            }
        }
        path[(nearest + 1).min(path.len() - 1)]
    }

    fn record_trace(&mut self, p: Point) {
        if self
            .trace
            .last()
            .is_none_or(|last| last.distance(p) > TRACE_MIN_STEP)
        {
            self.trace.push(p);
        }
    }
}
