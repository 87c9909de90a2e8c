//! Scenario configuration.
//!
//! A scenario is a JSON document describing the world: grid size, endpoints,
//! and the obstacle population.  Missing fields fall back to component
//! defaults; structurally broken documents and non-finite or non-positive
//! numeric values are rejected here, at the configuration boundary — never
//! mid-simulation.
//!
//! ```json
//! {
//!   "width": 50, "height": 50,
//!   "start": [0, 0], "goal": [49, 49],
//!   "static_obstacles": [ { "x": 10, "y": 12 } ],
//!   "dynamic_obstacles": [
//!     { "x": 20, "y": 5, "movement_type": "linear",
//!       "speed": 3.0, "direction": [1, 0] },
//!     { "x": 33, "y": 30, "movement_type": "circular",
//!       "center": [30, 30], "radius": 3.0, "angular_speed": 1.0 }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use nav_core::{Point, Vec2};
use nav_world::{Environment, Obstacle};

use crate::error::{SimError, SimResult};

// ── Specs ─────────────────────────────────────────────────────────────────────

/// One static obstacle entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticObstacleSpec {
    pub x: f64,
    pub y: f64,
    /// Collision radius; defaults to half a cell.
    #[serde(default)]
    pub radius: Option<f64>,
}

/// Motion variant selector for dynamic obstacle entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    #[default]
    Linear,
    Circular,
}

/// One dynamic obstacle entry.  Motion parameters not relevant to the chosen
/// `movement_type` are ignored; missing ones take the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicObstacleSpec {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub movement_type: MovementType,
    /// Linear speed, grid units per second.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Linear direction (normalized on load).
    #[serde(default = "default_direction")]
    pub direction: [f64; 2],
    /// Orbit center for circular motion; defaults to the origin.
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    /// Orbit radius for circular motion (not the collision radius).
    #[serde(default = "default_orbit_radius")]
    pub radius: f64,
    /// Angular speed in rad/s for circular motion.
    #[serde(default = "default_angular_speed")]
    pub angular_speed: f64,
}

fn default_speed() -> f64 {
    3.0
}

fn default_direction() -> [f64; 2] {
    [1.0, 0.0]
}

fn default_orbit_radius() -> f64 {
    5.0
}

fn default_angular_speed() -> f64 {
    1.0
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// A complete scenario description.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub width: u32,
    pub height: u32,
    /// Defaults to `(0, 0)` when absent.
    pub start: Option<[f64; 2]>,
    /// Defaults to `(width - 1, height - 1)` when absent.
    pub goal: Option<[f64; 2]>,
    pub static_obstacles: Vec<StaticObstacleSpec>,
    pub dynamic_obstacles: Vec<DynamicObstacleSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            start: None,
            goal: None,
            static_obstacles: Vec::new(),
            dynamic_obstacles: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    // ── Loading ───────────────────────────────────────────────────────────

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> SimResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    // ── Application ───────────────────────────────────────────────────────

    /// Apply this scenario to a fresh [`Environment`].
    ///
    /// Numeric values are validated first (`Err` on anything non-finite or
    /// non-positive where positivity is required).  Individually invalid
    /// obstacle *placements* — out of bounds, overlapping, on an endpoint —
    /// are skipped with the editor's silent-reject semantics rather than
    /// failing the load.
    pub fn build_environment(&self) -> SimResult<Environment> {
        self.validate()?;

        let mut env = Environment::new(self.width, self.height);

        let start = self
            .start
            .map_or(Point::new(0.0, 0.0), |[x, y]| Point::new(x, y));
        let goal = self.goal.map_or(
            Point::new(self.width as f64 - 1.0, self.height as f64 - 1.0),
            |[x, y]| Point::new(x, y),
        );
        env.set_start(start);
        env.set_goal(goal);

        for spec in &self.static_obstacles {
            let p = Point::new(spec.x, spec.y);
            let obstacle = match spec.radius {
                Some(r) => Obstacle::fixed_with_radius(p, r),
                None => Obstacle::fixed(p),
            };
            env.add_obstacle(obstacle);
        }

        for spec in &self.dynamic_obstacles {
            let p = Point::new(spec.x, spec.y);
            let obstacle = match spec.movement_type {
                MovementType::Linear => Obstacle::linear(
                    p,
                    spec.speed,
                    Vec2::new(spec.direction[0], spec.direction[1]),
                ),
                MovementType::Circular => {
                    let center = spec
                        .center
                        .map_or(Point::new(0.0, 0.0), |[x, y]| Point::new(x, y));
                    Obstacle::circular(p, center, spec.radius, spec.angular_speed)
                }
            };
            env.add_obstacle(obstacle);
        }

        Ok(env)
    }

    fn validate(&self) -> SimResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::Config(format!(
                "grid dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        for (label, point) in [("start", self.start), ("goal", self.goal)] {
            if let Some([x, y]) = point {
                require_finite(label, x)?;
                require_finite(label, y)?;
            }
        }
        for (i, s) in self.static_obstacles.iter().enumerate() {
            let label = format!("static_obstacles[{i}]");
            require_finite(&label, s.x)?;
            require_finite(&label, s.y)?;
            if let Some(r) = s.radius {
                if !r.is_finite() || r <= 0.0 {
                    return Err(SimError::Config(format!(
                        "{label}: radius must be positive, got {r}"
                    )));
                }
            }
        }
        for (i, d) in self.dynamic_obstacles.iter().enumerate() {
            let label = format!("dynamic_obstacles[{i}]");
            require_finite(&label, d.x)?;
            require_finite(&label, d.y)?;
            require_finite(&label, d.direction[0])?;
            require_finite(&label, d.direction[1])?;
            require_finite(&label, d.angular_speed)?;
            if let Some([cx, cy]) = d.center {
                require_finite(&label, cx)?;
                require_finite(&label, cy)?;
            }
            if !d.speed.is_finite() || d.speed < 0.0 {
                return Err(SimError::Config(format!(
                    "{label}: speed must be non-negative, got {}",
                    d.speed
                )));
            }
            if d.movement_type == MovementType::Circular && (!d.radius.is_finite() || d.radius <= 0.0)
            {
                return Err(SimError::Config(format!(
                    "{label}: orbit radius must be positive, got {}",
                    d.radius
                )));
            }
        }
        Ok(())
    }
}

fn require_finite(label: &str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{label}: expected a finite number, got {value}"
        )))
    }
}
