//! Bounding volume hierarchy over entry boxes.
//!
//! The tree is built top-down: split the node's entries on the axis of
//! largest extent, at the median of their box centers, and recurse until a
//! node holds at most the leaf size. Queries only descend into nodes whose
//! bounds overlap the query box.

use clash_types::{Aabb, Axis};

use crate::broad_phase::{BroadPhase, CandidatePair};

/// A box stored in the BVH with the index of the entry it came from.
#[derive(Debug, Clone, Copy)]
pub struct BvhPrimitive {
    /// Bounding box of the entry.
    pub aabb: Aabb,
    /// Index of the entry.
    pub index: usize,
}

impl BvhPrimitive {
    /// Create a new primitive.
    #[must_use]
    pub const fn new(aabb: Aabb, index: usize) -> Self {
        Self { aabb, index }
    }

    fn centroid_on(&self, axis: Axis) -> f64 {
        0.5 * (self.aabb.min_on_axis(axis) + self.aabb.max_on_axis(axis))
    }
}

#[derive(Debug, Clone)]
enum BvhNode {
    Internal {
        aabb: Aabb,
        left: usize,
        right: usize,
    },
    Leaf {
        aabb: Aabb,
        first_primitive: usize,
        primitive_count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Internal { aabb, .. } | Self::Leaf { aabb, .. } => aabb,
        }
    }
}

/// Bounding volume hierarchy of entry boxes.
///
/// # Example
///
/// ```
/// use clash_detect::{Bvh, BvhPrimitive};
/// use clash_types::{Aabb, Point3, Vector3};
///
/// let primitives = (0..10_u32)
///     .map(|i| {
///         let center = Point3::new(f64::from(i) * 3.0, 0.0, 0.0);
///         BvhPrimitive::new(Aabb::from_center(center, Vector3::repeat(0.5)), i as usize)
///     })
///     .collect();
/// let bvh = Bvh::build(primitives, 2);
///
/// let window = Aabb::from_center(Point3::new(6.0, 0.0, 0.0), Vector3::repeat(0.1));
/// assert_eq!(bvh.query(&window), vec![2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<BvhPrimitive>,
}

impl Bvh {
    /// Build a BVH with at most `max_leaf_size` primitives per leaf.
    ///
    /// A leaf size of zero is treated as one.
    #[must_use]
    pub fn build(mut primitives: Vec<BvhPrimitive>, max_leaf_size: usize) -> Self {
        let mut bvh = Self::default();
        if primitives.is_empty() {
            return bvh;
        }

        bvh.nodes.reserve(primitives.len() * 2);
        let len = primitives.len();
        bvh.build_recursive(&mut primitives, 0, len, max_leaf_size.max(1));
        bvh.primitives = primitives;
        bvh
    }

    fn build_recursive(
        &mut self,
        primitives: &mut [BvhPrimitive],
        start: usize,
        end: usize,
        max_leaf_size: usize,
    ) -> usize {
        let count = end - start;
        let aabb = primitives[start..end]
            .iter()
            .fold(Aabb::empty(), |acc, p| acc.union(&p.aabb));

        if count <= max_leaf_size {
            let node_idx = self.nodes.len();
            self.nodes.push(BvhNode::Leaf {
                aabb,
                first_primitive: start,
                primitive_count: count,
            });
            return node_idx;
        }

        let axis = aabb.longest_axis();
        primitives[start..end].sort_by(|a, b| a.centroid_on(axis).total_cmp(&b.centroid_on(axis)));
        let mid = start + count / 2;

        let node_idx = self.nodes.len();
        self.nodes.push(BvhNode::Internal {
            aabb,
            left: 0,
            right: 0,
        });

        let left_idx = self.build_recursive(primitives, start, mid, max_leaf_size);
        let right_idx = self.build_recursive(primitives, mid, end, max_leaf_size);

        if let BvhNode::Internal { left, right, .. } = &mut self.nodes[node_idx] {
            *left = left_idx;
            *right = right_idx;
        }

        node_idx
    }

    /// Number of primitives stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Check if the BVH holds no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Depth of the tree (0 when empty, 1 for a single leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            0
        } else {
            self.depth_of(0)
        }
    }

    fn depth_of(&self, node_idx: usize) -> usize {
        match &self.nodes[node_idx] {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Internal { left, right, .. } => {
                1 + self.depth_of(*left).max(self.depth_of(*right))
            }
        }
    }

    /// Indices of every primitive whose box overlaps `query_aabb`.
    #[must_use]
    pub fn query(&self, query_aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        self.query_callback(query_aabb, |p| results.push(p.index));
        results
    }

    /// Call `callback` for every primitive whose box overlaps `query_aabb`.
    pub fn query_callback<F>(&self, query_aabb: &Aabb, mut callback: F)
    where
        F: FnMut(&BvhPrimitive),
    {
        if !self.nodes.is_empty() {
            self.query_recursive(0, query_aabb, &mut callback);
        }
    }

    fn query_recursive<F>(&self, node_idx: usize, query_aabb: &Aabb, callback: &mut F)
    where
        F: FnMut(&BvhPrimitive),
    {
        let node = &self.nodes[node_idx];
        if !node.aabb().overlaps(query_aabb) {
            return;
        }

        match node {
            BvhNode::Internal { left, right, .. } => {
                self.query_recursive(*left, query_aabb, callback);
                self.query_recursive(*right, query_aabb, callback);
            }
            BvhNode::Leaf {
                first_primitive,
                primitive_count,
                ..
            } => {
                let leaf = *first_primitive..*first_primitive + *primitive_count;
                for primitive in &self.primitives[leaf] {
                    if primitive.aabb.overlaps(query_aabb) {
                        callback(primitive);
                    }
                }
            }
        }
    }
}

/// Broad phase that builds a [`Bvh`] and queries it once per entry.
#[derive(Debug, Clone, Copy)]
pub struct BvhBroadPhase {
    max_leaf_size: usize,
}

impl Default for BvhBroadPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl BvhBroadPhase {
    /// Create a BVH broad phase with four entries per leaf.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_leaf_size: 4 }
    }

    /// Set the maximum entries per leaf (minimum 1).
    #[must_use]
    pub fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size.max(1);
        self
    }
}

impl BroadPhase for BvhBroadPhase {
    fn find_candidates(&mut self, boxes: &[Aabb]) -> Vec<CandidatePair> {
        let primitives = boxes
            .iter()
            .enumerate()
            .map(|(index, aabb)| BvhPrimitive::new(*aabb, index))
            .collect();
        let bvh = Bvh::build(primitives, self.max_leaf_size);

        let mut pairs = Vec::new();
        for (i, aabb) in boxes.iter().enumerate() {
            bvh.query_callback(aabb, |hit| {
                // Each unordered pair is found from both sides; keep one.
                if hit.index > i
                    && let Some(pair) = CandidatePair::new(i, hit.index)
                {
                    pairs.push(pair);
                }
            });
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clash_types::{Point3, Vector3};

    fn line_of_boxes(n: usize, spacing: f64) -> Vec<BvhPrimitive> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64 * spacing;
                BvhPrimitive::new(
                    Aabb::from_center(Point3::new(x, 0.0, 0.0), Vector3::repeat(0.5)),
                    i,
                )
            })
            .collect()
    }

    #[test]
    fn empty_bvh() {
        let bvh = Bvh::build(Vec::new(), 4);
        assert!(bvh.is_empty());
        assert_eq!(bvh.depth(), 0);
        let around_origin = Aabb::from_center(Point3::origin(), Vector3::repeat(1.0));
        assert!(bvh.query(&around_origin).is_empty());
    }

    #[test]
    fn leaf_size_bounds_depth() {
        let bvh = Bvh::build(line_of_boxes(16, 2.0), 4);
        assert_eq!(bvh.len(), 16);
        assert_eq!(bvh.depth(), 3);

        let single_leaf = Bvh::build(line_of_boxes(3, 2.0), 4);
        assert_eq!(single_leaf.depth(), 1);

        let zero = Bvh::build(line_of_boxes(2, 2.0), 0);
        assert_eq!(zero.depth(), 2);
    }

    #[test]
    fn query_returns_overlapping_only() {
        let bvh = Bvh::build(line_of_boxes(20, 2.0), 2);
        let window = Aabb::new(Point3::new(3.5, -1.0, -1.0), Point3::new(6.5, 1.0, 1.0));
        let mut hits = bvh.query(&window);
        hits.sort_unstable();
        assert_eq!(hits, vec![2, 3]);
    }

    #[test]
    fn broad_phase_reports_each_pair_once() {
        let boxes: Vec<Aabb> = line_of_boxes(10, 0.75).iter().map(|p| p.aabb).collect();
        let mut pairs = BvhBroadPhase::new()
            .with_max_leaf_size(1)
            .find_candidates(&boxes);
        pairs.sort_unstable();

        // Spacing 0.75 with width 1.0: only neighbours overlap.
        assert_eq!(pairs.len(), 9);
        assert!(pairs.iter().all(|p| p.second() == p.first() + 1));
    }
}
