//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_trace.csv`
//! - `obstacle_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentTraceRow, ObstacleSnapshotRow, OutputResult};

/// Writes simulation recordings to two CSV files.
pub struct CsvWriter {
    trace: Writer<File>,
    obstacles: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trace = Writer::from_path(dir.join("agent_trace.csv"))?;
        trace.write_record(["time_secs", "x", "y"])?;

        let mut obstacles = Writer::from_path(dir.join("obstacle_snapshots.csv"))?;
        obstacles.write_record(["time_secs", "obstacle_id", "x", "y", "radius", "dynamic"])?;

        Ok(Self {
            trace,
            obstacles,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trace(&mut self, row: &AgentTraceRow) -> OutputResult<()> {
        self.trace.write_record(&[
            row.time_secs.to_string(),
            row.x.to_string(),
            row.y.to_string(),
        ])?;
        Ok(())
    }

    fn write_obstacles(&mut self, rows: &[ObstacleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.obstacles.write_record(&[
                row.time_secs.to_string(),
                row.obstacle_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.radius.to_string(),
                (row.dynamic as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trace.flush()?;
        self.obstacles.flush()?;
        Ok(())
    }
}
