//! R-tree over agent positions.
//!
//! Each entry stores the agent's position together with its `AgentId` and
//! its slot in the population at build time.  Slots are only valid until
//! the population's membership changes, which is why the scheduler rebuilds
//! the index every tick.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nm_core::{AgentId, Vector2};

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexedPoint {
    pub point: [f32; 2],
    pub id: AgentId,
    /// Slot in the population the index was built from.
    pub slot: usize,
}

impl IndexedPoint {
    #[inline]
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.point[0], self.point[1])
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index answering "who is within `r` of this point".
pub struct NeighborIndex {
    tree: RTree<IndexedPoint>,
}

impl NeighborIndex {
    /// An index with no points.
    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load from `(slot, id, position)` triples.
    pub fn build(points: impl IntoIterator<Item = (usize, AgentId, Vector2)>) -> Self {
        let entries: Vec<IndexedPoint> = points
            .into_iter()
            .map(|(slot, id, pos)| IndexedPoint { point: pos.to_array(), id, slot })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All points strictly closer than `radius` to `center`, in ascending
    /// slot order so callers see a deterministic sequence.
    pub fn within(&self, center: Vector2, radius: f32) -> Vec<IndexedPoint> {
        let r2 = radius * radius;
        let mut hits: Vec<IndexedPoint> = self
            .tree
            .locate_within_distance(center.to_array(), r2)
            .filter(|p| p.distance_2(&center.to_array()) < r2)
            .copied()
            .collect();
        hits.sort_unstable_by_key(|p| p.slot);
        hits
    }

    /// Like [`within`](Self::within) but excluding `exclude`.
    pub fn within_except(&self, center: Vector2, radius: f32, exclude: AgentId) -> Vec<IndexedPoint> {
        let mut hits = self.within(center, radius);
        hits.retain(|p| p.id != exclude);
        hits
    }

    /// The point closest to `center`, if any.
    pub fn nearest(&self, center: Vector2) -> Option<IndexedPoint> {
        self.tree.nearest_neighbor(&center.to_array()).copied()
    }
}

impl Default for NeighborIndex {
    fn default() -> Self {
        Self::empty()
    }
}
