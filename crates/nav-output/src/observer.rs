//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use nav_sim::SimObserver;
use nav_world::Environment;

use crate::row::{AgentTraceRow, ObstacleSnapshotRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that records agent and obstacle positions to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After the run, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, time: f64, env: &Environment) {
        let pos = env.current();
        let trace = AgentTraceRow {
            time_secs: time,
            x: pos.x,
            y: pos.y,
        };
        let result = self.writer.write_trace(&trace);
        self.store_err(result);

        let rows: Vec<ObstacleSnapshotRow> = env
            .obstacles()
            .map(|(id, o)| ObstacleSnapshotRow {
                time_secs: time,
                obstacle_id: id.0,
                x: o.position().x,
                y: o.position().y,
                radius: o.radius(),
                dynamic: o.is_dynamic(),
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_obstacles(&rows);
            self.store_err(result);
        }
    }

    fn on_goal_reached(&mut self, _time: f64, _env: &Environment) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
