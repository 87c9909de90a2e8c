//! `nav-world` — the editable world model: grid bounds, obstacles, and the
//! environment both planners query.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`grid`]        | `Grid` — bounds and cell indexing                     |
//! | [`obstacle`]    | `Obstacle`, `Motion` — kinematics and prediction      |
//! | [`arena`]       | `ObstacleArena`, `ObstacleId` — handle-stable storage |
//! | [`environment`] | `Environment`, `PlanVersion` — the editing surface    |
//!
//! # Plan invalidation
//!
//! Every mutation that can make a previously computed global path unsafe or
//! obsolete funnels through [`Environment::invalidate_plan`], which clears
//! the stored path and bumps a [`PlanVersion`] counter.  Consumers that
//! cache plan-derived state compare versions instead of guessing which
//! setter might have cleared what.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.    |

pub mod arena;
pub mod environment;
pub mod grid;
pub mod obstacle;

mod index;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arena::{ObstacleArena, ObstacleId};
pub use environment::{Environment, PlanVersion, GOAL_REACHED_DISTANCE, REMOVE_TOLERANCE};
pub use grid::Grid;
pub use obstacle::{Motion, Obstacle, DEFAULT_OBSTACLE_RADIUS};
