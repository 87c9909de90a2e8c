//! `nav-core` — foundational types for the `rust_nav` motion-planning core.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                       |
//! |----------|------------------------------------------------|
//! | [`geom`] | `Point`, `Cell`, `Vec2`, distance helpers      |
//! | [`rng`]  | `SampleRng` (seedable sampler entropy source)  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geom;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geom::{Cell, Point, Vec2};
pub use rng::SampleRng;
