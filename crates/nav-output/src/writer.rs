//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentTraceRow, ObstacleSnapshotRow, OutputResult};

/// Backend sink for simulation recordings.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one agent trace row.
    fn write_trace(&mut self, row: &AgentTraceRow) -> OutputResult<()>;

    /// Write a batch of obstacle snapshots.
    fn write_obstacles(&mut self, rows: &[ObstacleSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
