//! Simulation observer trait for progress reporting and data collection.

use nav_core::Point;
use nav_world::Environment;

/// Callbacks invoked by [`Simulation::advance`][crate::Simulation::advance]
/// at key points in the tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Hooks receive the environment by
/// reference; output writers record position snapshots from it without the
/// simulation knowing about any particular format.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, time: f64, env: &Environment) {
///         println!("t={time:.1}s agent at {}", env.current());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the end of every `Running` tick, after integration.
    fn on_tick_end(&mut self, _time: f64, _env: &Environment) {}

    /// Called when the global planner produced a fresh path this tick.
    fn on_replan(&mut self, _time: f64, _path: &[Point]) {}

    /// Called when a replan found no route.  Recoverable: the agent holds
    /// position and the planner retries after the next invalidation.
    fn on_plan_unavailable(&mut self, _time: f64) {}

    /// Called once when the agent reaches the goal and the simulation
    /// transitions to `Finished`.
    fn on_goal_reached(&mut self, _time: f64, _env: &Environment) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `advance`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
