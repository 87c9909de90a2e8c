//! `nav-output` — recording backends for simulation runs.
//!
//! Bridges the simulation's observer hooks to an [`OutputWriter`] backend so
//! hosts can record a run without the simulation knowing about file formats.
//! CSV is the only backend; it produces two files per run:
//!
//! - `agent_trace.csv` — one row per tick: time, agent position, velocity
//!   magnitude.
//! - `obstacle_snapshots.csv` — one row per obstacle per tick: time, handle,
//!   position, radius, kind.
//!
//! # Usage
//!
//! ```rust,ignore
//! let writer = CsvWriter::new(Path::new("output"))?;
//! let mut observer = SimOutputObserver::new(writer);
//! while sim.state().is_running() {
//!     sim.advance(dt, &mut observer);
//! }
//! observer.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentTraceRow, ObstacleSnapshotRow};
pub use writer::OutputWriter;
