//! Spatial index over static obstacle centers.
//!
//! Static obstacles change only on editor commands, so an R-tree over their
//! centers is rebuilt per edit and then serves every per-tick query: the
//! broad phase for cell/collision checks, exact center-distance removal
//! lookups, and the nearest-obstacle clearance the local planner scores
//! against.  Dynamic obstacles move every tick and are scanned linearly by
//! the environment instead — an index over them would be stale by
//! construction.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::Point;

use crate::arena::{ObstacleArena, ObstacleId};

/// Entry stored in the R-tree: an obstacle center with its handle.
#[derive(Clone)]
struct ObstacleEntry {
    point: [f64; 2],
    id: ObstacleId,
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ObstacleEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over static obstacle centers plus the largest static radius, which
/// bounds the broad-phase query circle.
pub(crate) struct StaticIndex {
    tree: RTree<ObstacleEntry>,
    max_radius: f64,
}

impl StaticIndex {
    pub(crate) fn empty() -> Self {
        Self {
            tree: RTree::new(),
            max_radius: 0.0,
        }
    }

    /// Rebuild from the arena's current static population (bulk load).
    pub(crate) fn rebuild(&mut self, arena: &ObstacleArena) {
        let mut max_radius: f64 = 0.0;
        let entries: Vec<ObstacleEntry> = arena
            .statics()
            .map(|(id, o)| {
                max_radius = max_radius.max(o.radius());
                ObstacleEntry {
                    point: [o.position().x, o.position().y],
                    id,
                }
            })
            .collect();
        self.tree = RTree::bulk_load(entries);
        self.max_radius = max_radius;
    }

    /// Distance from `p` to the nearest static obstacle *center*.
    /// `None` when no static obstacle exists.
    pub(crate) fn nearest_center_distance(&self, p: Point) -> Option<f64> {
        self.tree
            .nearest_neighbor(&[p.x, p.y])
            .map(|e| e.distance_2(&[p.x, p.y]).sqrt())
    }

    /// Handles of static obstacles whose centers lie within `radius` of `p`
    /// (inclusive) — the removal query.
    pub(crate) fn ids_within(&self, p: Point, radius: f64) -> Vec<ObstacleId> {
        self.tree
            .locate_within_distance([p.x, p.y], radius * radius)
            .map(|e| e.id)
            .collect()
    }

    /// Broad phase: handles whose collision circle *could* reach within
    /// `extra` of `p`.  Callers confirm with the exact predicate.
    pub(crate) fn candidates_near(
        &self,
        p: Point,
        extra: f64,
    ) -> impl Iterator<Item = ObstacleId> + '_ {
        let reach = self.max_radius + extra;
        self.tree
            .locate_within_distance([p.x, p.y], reach * reach)
            .map(|e| e.id)
    }
}
