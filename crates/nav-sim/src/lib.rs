//! `nav-sim` — the tick-driven simulation around the planners.
//!
//! # Tick anatomy
//!
//! ```text
//! advance(dt):                           (no-op unless Running)
//!   ① Kinematics — advance dynamic obstacles; motion that blocks a path
//!                  cell invalidates the stored plan.
//!   ② Replan     — no current plan? run the global planner from the
//!                  agent's cell.  Empty result → hold position, report
//!                  via the observer, retry after the next invalidation.
//!   ③ Target     — nearest path waypoint, then the one after it.
//!   ④ Velocity   — ask the local planner; integrate position by v·dt;
//!                  extend the traversed trace.
//!   ⑤ Arrival    — within 0.5 of the goal → Finished; the trace is
//!                  frozen as the published path.
//! ```
//!
//! The core is single-threaded and cooperative: the host calls
//! [`Simulation::advance`] once per frame and issues editor commands between
//! ticks.  Nothing here blocks, suspends, or spawns.
//!
//! # Crate layout
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`sim`]      | `Simulation`, `SimState` — the state machine    |
//! | [`builder`]  | `SimulationBuilder` — validated construction    |
//! | [`config`]   | `ScenarioConfig` — JSON scenario loading        |
//! | [`observer`] | `SimObserver`, `NoopObserver`                   |
//! | [`error`]    | `SimError`, `SimResult`                         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_plan::{AStarPlanner, DwaPlanner};
//! use nav_sim::{NoopObserver, ScenarioConfig, SimulationBuilder};
//!
//! let env = ScenarioConfig::from_json_str(json)?.build_environment()?;
//! let mut sim = SimulationBuilder::new(env, AStarPlanner::new(), DwaPlanner::default())
//!     .seed(42)
//!     .build()?;
//! sim.start();
//! while sim.state().is_running() {
//!     sim.advance(1.0 / 60.0, &mut NoopObserver);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimulationBuilder;
pub use config::{DynamicObstacleSpec, MovementType, ScenarioConfig, StaticObstacleSpec};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{SimState, Simulation};
