//! `nav-plan` — the two planners of the rust_nav motion-planning core.
//!
//! # Crate layout
//!
//! | Module    | Contents                                             |
//! |-----------|------------------------------------------------------|
//! | [`astar`] | `GlobalPlanner` trait, `AStarPlanner`                |
//! | [`dwa`]   | `LocalPlanner` trait, `DwaPlanner`, `MotionLimits`   |
//!
//! # Division of labor
//!
//! The **global** planner searches integer grid cells and answers "which
//! cells connect here to the goal", ignoring short-horizon dynamics.  The
//! **local** planner answers "what velocity right now", sampling candidate
//! velocities and scoring short rollouts against the obstacles' predicted
//! motion.  The simulation crate feeds the global route's next waypoint to
//! the local planner as its target.
//!
//! Neither planner has an error channel: an unreachable goal is an empty
//! path, and a fully blocked velocity space is a zero velocity.  Callers
//! treat both as "hold and retry", not failure.

pub mod astar;
pub mod dwa;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use astar::{AStarPlanner, GlobalPlanner};
pub use dwa::{DwaConfig, DwaPlanner, LocalPlanner, MotionLimits};
