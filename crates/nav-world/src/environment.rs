//! The editable environment: start/goal/agent positions, the obstacle
//! registry, and the stored global plan.
//!
//! # Command semantics
//!
//! Editor commands mirror an interactive editor: an invalid command (start on
//! an obstacle, placement out of bounds) is *silently rejected* — the method
//! returns a value that says nothing happened and state is untouched.  There
//! is no error channel for commands; malformed configuration is rejected
//! before it reaches this type.
//!
//! # Plan invalidation
//!
//! The stored path is cleared and [`PlanVersion`] bumped by every mutation
//! that can invalidate it: endpoint changes, obstacle edits, obstacle motion
//! blocking a path cell, and `reset`.  All of it funnels through
//! [`invalidate_plan`](Environment::invalidate_plan), so the version counter
//! is a complete record of "the plan you cached may be stale".

use std::fmt;

use nav_core::{Cell, Point};

use crate::arena::{ObstacleArena, ObstacleId};
use crate::grid::Grid;
use crate::index::StaticIndex;
use crate::obstacle::Obstacle;

/// Agent-to-goal distance below which the goal counts as reached.
pub const GOAL_REACHED_DISTANCE: f64 = 0.5;

/// Default center-distance tolerance for [`Environment::remove_obstacle`].
pub const REMOVE_TOLERANCE: f64 = 0.5;

/// Distance below which a position counts as "on" the start or goal point.
const ENDPOINT_RADIUS: f64 = 0.5;

// ── PlanVersion ───────────────────────────────────────────────────────────────

/// Monotonic counter of plan-invalidating mutations.
///
/// Consumers cache the version alongside plan-derived state and replan when
/// the environment's current version differs.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanVersion(u64);

impl PlanVersion {
    #[inline]
    fn bump(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Display for PlanVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// The world the planners read and the editor mutates.
pub struct Environment {
    grid: Grid,
    start: Point,
    goal: Point,
    /// The agent's live position.  Initialized to `start`, advanced by the
    /// simulation's integration step.
    current: Point,
    obstacles: ObstacleArena,
    static_index: StaticIndex,
    /// Last computed global plan; empty when none exists or it was
    /// invalidated.
    path: Vec<Point>,
    version: PlanVersion,
    /// The version the stored path was planned at.
    path_version: PlanVersion,
}

impl Environment {
    /// A fresh environment with no endpoints and no obstacles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
            start: Point::UNSET,
            goal: Point::UNSET,
            current: Point::UNSET,
            obstacles: ObstacleArena::new(),
            static_index: StaticIndex::empty(),
            path: Vec::new(),
            version: PlanVersion::default(),
            path_version: PlanVersion::default(),
        }
    }

    // ── Read surface ──────────────────────────────────────────────────────

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn current(&self) -> Point {
        self.current
    }

    #[inline]
    pub fn is_in_bounds(&self, p: Point) -> bool {
        self.grid.contains(p)
    }

    pub fn is_start_point(&self, p: Point) -> bool {
        self.start.is_set() && self.start.distance(p) < ENDPOINT_RADIUS
    }

    pub fn is_goal_point(&self, p: Point) -> bool {
        self.goal.is_set() && self.goal.distance(p) < ENDPOINT_RADIUS
    }

    /// `true` while the agent sits within [`GOAL_REACHED_DISTANCE`] of a set
    /// goal.
    pub fn has_reached_goal(&self) -> bool {
        self.goal.is_set() && self.current.is_set() && self.current.distance(self.goal) < GOAL_REACHED_DISTANCE
    }

    // ── Obstacle queries ──────────────────────────────────────────────────

    /// `true` iff any obstacle's collision circle covers the center of
    /// `cell` — the planner's blocked-cell predicate.  Statics are answered
    /// through the index broad phase; dynamics by scan at their *current*
    /// positions.
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        let center = cell.to_point();
        let static_hit = self
            .static_index
            .candidates_near(center, 0.0)
            .any(|id| self.obstacles.get(id).is_some_and(|o| o.covers_cell(cell)));
        static_hit
            || self
                .obstacles
                .dynamics()
                .any(|(_, o)| o.covers_cell(cell))
    }

    /// Circle-vs-circle collision test for an agent of `agent_radius` at `p`.
    pub fn check_collision(&self, p: Point, agent_radius: f64) -> bool {
        let static_hit = self
            .static_index
            .candidates_near(p, agent_radius)
            .any(|id| {
                self.obstacles
                    .get(id)
                    .is_some_and(|o| o.intersects(p, agent_radius))
            });
        static_hit
            || self
                .obstacles
                .dynamics()
                .any(|(_, o)| o.intersects(p, agent_radius))
    }

    /// Like [`check_collision`](Self::check_collision) but against static
    /// obstacles only.  Rollout scoring checks dynamic obstacles separately,
    /// at their predicted positions rather than their current ones.
    pub fn check_static_collision(&self, p: Point, agent_radius: f64) -> bool {
        self.static_index.candidates_near(p, agent_radius).any(|id| {
            self.obstacles
                .get(id)
                .is_some_and(|o| o.intersects(p, agent_radius))
        })
    }

    /// Distance from `p` to the nearest *static* obstacle center, if any.
    /// The local planner's clearance term.
    pub fn nearest_static_clearance(&self, p: Point) -> Option<f64> {
        self.static_index.nearest_center_distance(p)
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.obstacles.iter()
    }

    pub fn static_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.statics().map(|(_, o)| o)
    }

    pub fn dynamic_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.dynamics().map(|(_, o)| o)
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    // ── Endpoint commands ─────────────────────────────────────────────────

    /// Set the start point.  Rejected (returns `false`, state unchanged) if
    /// out of bounds or on an obstacle.  Accepting moves the agent to the new
    /// start and invalidates the plan.
    pub fn set_start(&mut self, p: Point) -> bool {
        if !self.is_in_bounds(p) || self.is_obstacle(p.to_cell()) {
            return false;
        }
        self.start = p;
        self.current = p;
        self.invalidate_plan();
        true
    }

    /// Set the goal point.  Same acceptance rule as [`set_start`](Self::set_start).
    pub fn set_goal(&mut self, p: Point) -> bool {
        if !self.is_in_bounds(p) || self.is_obstacle(p.to_cell()) {
            return false;
        }
        self.goal = p;
        self.invalidate_plan();
        true
    }

    pub fn clear_start(&mut self) {
        self.start = Point::UNSET;
        self.current = Point::UNSET;
        self.invalidate_plan();
    }

    pub fn clear_goal(&mut self) {
        self.goal = Point::UNSET;
        self.invalidate_plan();
    }

    /// Move the agent.  No validation: the integration step owns this value
    /// and the local planner has already vetted the motion.
    #[inline]
    pub fn set_current(&mut self, p: Point) {
        self.current = p;
    }

    // ── Obstacle commands ─────────────────────────────────────────────────

    /// Add an obstacle.  Rejected (returns `None`, state unchanged) if its
    /// position is out of bounds, its cell is already covered by another
    /// obstacle, or it sits on the start or goal point.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Option<ObstacleId> {
        let p = obstacle.position();
        if !self.is_in_bounds(p)
            || self.is_obstacle(p.to_cell())
            || self.is_start_point(p)
            || self.is_goal_point(p)
        {
            return None;
        }
        let is_static = !obstacle.is_dynamic();
        let id = self.obstacles.insert(obstacle);
        if is_static {
            self.static_index.rebuild(&self.obstacles);
        }
        self.invalidate_plan();
        Some(id)
    }

    /// Remove every obstacle whose center lies within `tolerance` of `p`
    /// (static or dynamic).  Returns how many were removed.
    pub fn remove_obstacle(&mut self, p: Point, tolerance: f64) -> usize {
        let mut doomed: Vec<ObstacleId> = self.static_index.ids_within(p, tolerance);
        doomed.extend(
            self.obstacles
                .dynamics()
                .filter(|(_, o)| o.position().distance(p) <= tolerance)
                .map(|(id, _)| id),
        );

        if doomed.is_empty() {
            return 0;
        }
        let mut removed_static = false;
        for id in &doomed {
            if let Some(o) = self.obstacles.remove(*id) {
                removed_static |= !o.is_dynamic();
            }
        }
        if removed_static {
            self.static_index.rebuild(&self.obstacles);
        }
        self.invalidate_plan();
        doomed.len()
    }

    /// Drop all obstacles.
    pub fn clear_obstacles(&mut self) {
        if self.obstacles.is_empty() {
            return;
        }
        self.obstacles.clear();
        self.static_index.rebuild(&self.obstacles);
        self.invalidate_plan();
    }

    // ── Kinematics ────────────────────────────────────────────────────────

    /// Advance every dynamic obstacle by `dt`.  If the motion blocks a cell
    /// of the stored path, the plan is invalidated.
    pub fn update_obstacles(&mut self, dt: f64) {
        let grid = self.grid;
        for (_, obstacle) in self.obstacles.iter_mut() {
            obstacle.update(dt, &grid);
        }
        if !self.path.is_empty() && self.is_path_blocked() {
            self.invalidate_plan();
        }
    }

    /// Restore every dynamic obstacle's spawn pose and move the agent back to
    /// the start.
    pub fn reset(&mut self) {
        for (_, obstacle) in self.obstacles.iter_mut() {
            obstacle.reset();
        }
        self.current = self.start;
        self.invalidate_plan();
    }

    // ── Plan storage ──────────────────────────────────────────────────────

    /// The stored global plan; empty when none exists.
    #[inline]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Store a freshly computed plan, recording the version it was planned
    /// against.
    pub fn set_path(&mut self, path: Vec<Point>) {
        self.path = path;
        self.path_version = self.version;
    }

    /// `true` while a non-empty plan computed against the current world is
    /// stored.
    pub fn has_current_path(&self) -> bool {
        !self.path.is_empty() && self.path_version == self.version
    }

    /// `true` if any cell of the stored path is blocked right now.
    pub fn is_path_blocked(&self) -> bool {
        self.path.iter().any(|p| self.is_obstacle(p.to_cell()))
    }

    /// Discard the stored plan and bump the version.  The single choke point
    /// for plan invalidation.
    pub fn invalidate_plan(&mut self) {
        self.path.clear();
        self.version.bump();
    }

    #[inline]
    pub fn plan_version(&self) -> PlanVersion {
        self.version
    }
}
