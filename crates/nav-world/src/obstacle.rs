//! Obstacle representation and kinematics.
//!
//! One struct, three motion variants.  The motion model is a sum type rather
//! than a class hierarchy so the hot collision loop dispatches with a `match`
//! and every variant is handled exhaustively.
//!
//! # Boundary reflection
//!
//! Dynamic obstacles never leave the grid.  Each `update` first *predicts*
//! the post-step position; if that cell would fall outside the grid, the
//! motion direction is corrected (axis sign flip for linear motion, angular
//! speed sign flip for circular motion) *before* the step is taken.
//! Correcting pre-step instead of clamping post-step means an obstacle turns
//! back at a wall instead of sticking to it.

use std::f64::consts::TAU;

use nav_core::{Cell, Point, Vec2};

use crate::grid::Grid;

/// Collision radius used when none is specified — half a grid cell, so an
/// obstacle blocks exactly the cell it sits on.
pub const DEFAULT_OBSTACLE_RADIUS: f64 = 0.5;

// ── Motion ────────────────────────────────────────────────────────────────────

/// How an obstacle moves.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    /// Never moves.
    Static,
    /// Constant speed along `direction`, reflecting off grid walls.
    Linear { speed: f64, direction: Vec2 },
    /// Orbits `center` at `orbit_radius`; `angular_speed` is rad/s and flips
    /// sign when the orbit would leave the grid.  `angle` is kept in
    /// `[0, 2π)`.  `orbit_radius` is the path radius, distinct from the
    /// obstacle's collision radius.
    Circular {
        center: Point,
        orbit_radius: f64,
        angular_speed: f64,
        angle: f64,
    },
}

impl Motion {
    #[inline]
    fn is_dynamic(&self) -> bool {
        !matches!(self, Motion::Static)
    }
}

#[inline]
fn orbit_point(center: Point, orbit_radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + orbit_radius * angle.cos(),
        center.y + orbit_radius * angle.sin(),
    )
}

#[inline]
fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A circular obstacle, static or moving.
///
/// The spawn pose (position plus motion state) is captured at construction so
/// [`reset`](Self::reset) restores the obstacle exactly, including a linear
/// direction or angular speed whose sign has flipped through reflections.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    position: Point,
    radius: f64,
    motion: Motion,
    spawn_position: Point,
    spawn_motion: Motion,
}

impl Obstacle {
    fn with_motion(position: Point, radius: f64, motion: Motion) -> Self {
        assert!(
            position.x.is_finite() && position.y.is_finite(),
            "obstacle position must be finite"
        );
        assert!(
            radius.is_finite() && radius > 0.0,
            "obstacle radius must be positive"
        );
        Self {
            position,
            radius,
            motion,
            spawn_position: position,
            spawn_motion: motion,
        }
    }

    /// A static obstacle with the default collision radius.
    pub fn fixed(position: Point) -> Self {
        Self::with_motion(position, DEFAULT_OBSTACLE_RADIUS, Motion::Static)
    }

    /// A static obstacle with an explicit collision radius.
    pub fn fixed_with_radius(position: Point, radius: f64) -> Self {
        Self::with_motion(position, radius, Motion::Static)
    }

    /// A linearly moving obstacle.  `direction` is normalized; `speed` is in
    /// grid units per second.
    pub fn linear(position: Point, speed: f64, direction: Vec2) -> Self {
        assert!(speed.is_finite() && speed >= 0.0, "speed must be non-negative");
        let direction = direction.normalized();
        Self::with_motion(
            position,
            DEFAULT_OBSTACLE_RADIUS,
            Motion::Linear { speed, direction },
        )
    }

    /// A circularly moving obstacle.  The starting angle is derived from the
    /// given position relative to `center`; the first update snaps the
    /// position onto the orbit circle.
    pub fn circular(position: Point, center: Point, orbit_radius: f64, angular_speed: f64) -> Self {
        assert!(
            orbit_radius.is_finite() && orbit_radius > 0.0,
            "orbit radius must be positive"
        );
        assert!(angular_speed.is_finite(), "angular speed must be finite");
        let angle = wrap_angle((position.y - center.y).atan2(position.x - center.x));
        Self::with_motion(
            position,
            DEFAULT_OBSTACLE_RADIUS,
            Motion::Circular {
                center,
                orbit_radius,
                angular_speed,
                angle,
            },
        )
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.motion.is_dynamic()
    }

    /// `true` iff this obstacle's collision circle covers the center of
    /// `cell` — the planner's blocked-cell predicate.
    #[inline]
    pub fn covers_cell(&self, cell: Cell) -> bool {
        self.position.distance(cell.to_point()) < self.radius
    }

    /// Circle-vs-circle collision against an agent of `agent_radius` at `p`.
    #[inline]
    pub fn intersects(&self, p: Point, agent_radius: f64) -> bool {
        self.position.distance(p) < self.radius + agent_radius
    }

    /// Closed-form position `dt` seconds ahead, without mutating state.
    ///
    /// Ignores boundary reflection: this is the lookahead both the local
    /// planner and path-validity checks use, and over their short horizons
    /// the straight extrapolation is the intended approximation.
    pub fn predicted_position(&self, dt: f64) -> Point {
        match self.motion {
            Motion::Static => self.position,
            Motion::Linear { speed, direction } => self.position + direction * (speed * dt),
            Motion::Circular {
                center,
                orbit_radius,
                angular_speed,
                angle,
            } => orbit_point(center, orbit_radius, angle + angular_speed * dt),
        }
    }

    // ── Kinematics ────────────────────────────────────────────────────────

    /// Advance the obstacle by `dt` seconds, reflecting at grid boundaries.
    pub fn update(&mut self, dt: f64, grid: &Grid) {
        match &mut self.motion {
            Motion::Static => {}

            Motion::Linear { speed, direction } => {
                let step = *speed * dt;
                let next_cell = (self.position + *direction * step).to_cell();
                if !grid.contains_x(next_cell.x) {
                    direction.x = -direction.x;
                }
                if !grid.contains_y(next_cell.y) {
                    direction.y = -direction.y;
                }
                self.position = self.position + *direction * step;
            }

            Motion::Circular {
                center,
                orbit_radius,
                angular_speed,
                angle,
            } => {
                let predicted = orbit_point(*center, *orbit_radius, *angle + *angular_speed * dt);
                if !grid.contains(predicted) {
                    *angular_speed = -*angular_speed;
                }
                *angle = wrap_angle(*angle + *angular_speed * dt);
                self.position = orbit_point(*center, *orbit_radius, *angle);
            }
        }
    }

    /// Restore the spawn pose captured at construction.
    pub fn reset(&mut self) {
        self.position = self.spawn_position;
        self.motion = self.spawn_motion;
    }
}
