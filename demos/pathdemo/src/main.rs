//! pathdemo — smallest end-to-end run of the rust_nav planning core.
//!
//! Loads an embedded 30×30 scenario with a static wall and two moving
//! obstacles, then drives the simulation at 20 Hz until the agent reaches
//! the goal, printing progress once a simulated second and recording the
//! run to CSV under `output/`.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Result};

use nav_core::Point;
use nav_output::{CsvWriter, SimOutputObserver};
use nav_plan::{AStarPlanner, DwaPlanner};
use nav_sim::{ScenarioConfig, SimObserver, SimulationBuilder};
use nav_world::Environment;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const DT: f64 = 0.05; // 20 Hz
const MAX_TICKS: usize = 40_000; // 2,000 simulated seconds
const OUTPUT_DIR: &str = "output";

// ── Scenario ──────────────────────────────────────────────────────────────────

// A wall across the middle with a gap near the top, one patrolling linear
// obstacle in the gap's corridor, and one orbiting obstacle near the goal.
const SCENARIO_JSON: &str = r#"{
    "width": 30, "height": 30,
    "start": [2, 2], "goal": [27, 27],
    "static_obstacles": [
        { "x": 15, "y": 0 },  { "x": 15, "y": 1 },  { "x": 15, "y": 2 },
        { "x": 15, "y": 3 },  { "x": 15, "y": 4 },  { "x": 15, "y": 5 },
        { "x": 15, "y": 6 },  { "x": 15, "y": 7 },  { "x": 15, "y": 8 },
        { "x": 15, "y": 9 },  { "x": 15, "y": 10 }, { "x": 15, "y": 11 },
        { "x": 15, "y": 12 }, { "x": 15, "y": 13 }, { "x": 15, "y": 14 },
        { "x": 15, "y": 15 }, { "x": 15, "y": 16 }, { "x": 15, "y": 17 },
        { "x": 15, "y": 18 }, { "x": 15, "y": 19 }, { "x": 15, "y": 20 },
        { "x": 15, "y": 21 }, { "x": 15, "y": 22 }
    ],
    "dynamic_obstacles": [
        { "x": 18, "y": 25, "movement_type": "linear",
          "speed": 2.0, "direction": [0, -1] },
        { "x": 25, "y": 21, "movement_type": "circular",
          "center": [22, 21], "radius": 3.0, "angular_speed": 0.8 }
    ]
}"#;

// ── Progress observer ─────────────────────────────────────────────────────────

struct Progress<O: SimObserver> {
    inner: O,
    last_report: f64,
    replans: usize,
    stalled_ticks: usize,
}

impl<O: SimObserver> Progress<O> {
    fn new(inner: O) -> Self {
        Self {
            inner,
            last_report: 0.0,
            replans: 0,
            stalled_ticks: 0,
        }
    }
}

impl<O: SimObserver> SimObserver for Progress<O> {
    fn on_tick_end(&mut self, time: f64, env: &Environment) {
        if time - self.last_report >= 1.0 {
            self.last_report = time;
            println!(
                "t={time:6.2}s  agent {}  goal distance {:.2}",
                env.current(),
                env.current().distance(env.goal())
            );
        }
        self.inner.on_tick_end(time, env);
    }

    fn on_replan(&mut self, time: f64, path: &[Point]) {
        self.replans += 1;
        println!("t={time:6.2}s  planned {} waypoints", path.len());
        self.inner.on_replan(time, path);
    }

    fn on_plan_unavailable(&mut self, time: f64) {
        self.stalled_ticks += 1;
        self.inner.on_plan_unavailable(time);
    }

    fn on_goal_reached(&mut self, time: f64, env: &Environment) {
        println!("t={time:6.2}s  goal reached at {}", env.current());
        self.inner.on_goal_reached(time, env);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== pathdemo — rust_nav planning core ===");
    println!("Seed: {SEED}  |  dt: {DT}s  |  output: {OUTPUT_DIR}/");
    println!();

    // 1. Scenario → environment.
    let env = ScenarioConfig::from_json_str(SCENARIO_JSON)?.build_environment()?;
    println!(
        "World: {}x{} grid, {} static + {} dynamic obstacles",
        env.grid().width(),
        env.grid().height(),
        env.static_obstacles().count(),
        env.dynamic_obstacles().count()
    );

    // 2. Simulation with the default planner pair.
    let mut sim = SimulationBuilder::new(env, AStarPlanner::new(), DwaPlanner::default())
        .seed(SEED)
        .build()?;

    // 3. CSV recording under output/.
    fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut observer = Progress::new(SimOutputObserver::new(writer));

    if !sim.start() {
        bail!("scenario has no valid start/goal");
    }

    // 4. Drive.
    let wall_start = Instant::now();
    let mut ticks = 0usize;
    while sim.state().is_running() && ticks < MAX_TICKS {
        sim.advance(DT, &mut observer);
        ticks += 1;
    }
    let elapsed = wall_start.elapsed();

    // 5. Summary.
    println!();
    if sim.state().is_finished() {
        println!(
            "Finished in {:.2} simulated seconds ({} ticks, {} replans, {} stalled ticks)",
            sim.time(),
            ticks,
            observer.replans,
            observer.stalled_ticks
        );
        println!("Traversed {} trace points", sim.traversed_path().len());
    } else {
        println!("Gave up after {ticks} ticks (agent at {})", sim.agent_position());
    }
    println!("Wall clock: {elapsed:?}");

    if let Some(e) = observer.inner.take_error() {
        eprintln!("output error: {e}");
    }
    Ok(())
}
