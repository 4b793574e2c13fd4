//! Broad-Phase Filter: bounding-box candidate generation.
//!
//! Every strategy reports each unordered pair of overlapping boxes exactly
//! once, as entry indices `(i, j)` with `i < j`. Overlap is inclusive, so
//! boxes that only touch are still candidates. The filter never drops a pair
//! whose boxes overlap; false positives are left to the narrow phase.
//!
//! # Example
//!
//! ```
//! use clash_detect::{BroadPhase, BruteForce, SweepAndPrune};
//! use clash_types::{Aabb, Point3, Vector3};
//!
//! let half = Vector3::new(0.5, 0.5, 0.5);
//! let boxes = [
//!     Aabb::from_center(Point3::new(0.0, 0.0, 0.0), half),
//!     Aabb::from_center(Point3::new(0.5, 0.0, 0.0), half),
//!     Aabb::from_center(Point3::new(5.0, 5.0, 5.0), half),
//! ];
//!
//! let brute = BruteForce::new().find_candidates(&boxes);
//! let sweep = SweepAndPrune::new().find_candidates(&boxes);
//! assert_eq!(brute.len(), 1);
//! assert_eq!(brute, sweep);
//! ```

use clash_types::{Aabb, Axis, Vector3};
use tracing::debug;

use crate::bvh::BvhBroadPhase;
use crate::{BroadPhaseStrategy, DetectConfig};

/// An unordered pair of entry indices whose boxes overlap.
///
/// Always stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidatePair {
    first: usize,
    second: usize,
}

impl CandidatePair {
    /// Create a pair from two distinct indices, in either order.
    ///
    /// Returns `None` when both indices are equal.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller index.
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// The larger index.
    #[must_use]
    pub const fn second(&self) -> usize {
        self.second
    }
}

/// Trait for broad-phase candidate generation.
pub trait BroadPhase {
    /// Find every unordered pair of overlapping boxes.
    ///
    /// Indices refer to positions in `boxes`. Boxes must be finite and
    /// non-empty.
    fn find_candidates(&mut self, boxes: &[Aabb]) -> Vec<CandidatePair>;
}

/// O(n²) scan over every unordered pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl BruteForce {
    /// Create a brute-force broad phase.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BroadPhase for BruteForce {
    fn find_candidates(&mut self, boxes: &[Aabb]) -> Vec<CandidatePair> {
        let mut pairs = Vec::new();

        for (i, a) in boxes.iter().enumerate() {
            for (j, b) in boxes.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push(CandidatePair {
                        first: i,
                        second: j,
                    });
                }
            }
        }

        pairs
    }
}

/// Sort-and-sweep along the axis with the widest spread of box centers.
///
/// Intervals are sorted by their minimum on the sweep axis; the inner loop
/// stops at the first interval starting past the current one's end, and the
/// surviving pairs are confirmed on all three axes.
#[derive(Debug, Clone, Default)]
pub struct SweepAndPrune {
    intervals: Vec<Interval>,
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    index: usize,
    min: f64,
    max: f64,
}

impl SweepAndPrune {
    /// Create a sweep-and-prune broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn choose_sweep_axis(boxes: &[Aabb]) -> Axis {
        let mut lo = Vector3::repeat(f64::INFINITY);
        let mut hi = Vector3::repeat(f64::NEG_INFINITY);
        for aabb in boxes {
            let center = aabb.center().coords;
            lo = lo.inf(&center);
            hi = hi.sup(&center);
        }

        let spread = hi - lo;
        if spread.x >= spread.y && spread.x >= spread.z {
            Axis::X
        } else if spread.y >= spread.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

impl BroadPhase for SweepAndPrune {
    fn find_candidates(&mut self, boxes: &[Aabb]) -> Vec<CandidatePair> {
        let axis = Self::choose_sweep_axis(boxes);

        self.intervals.clear();
        self.intervals
            .extend(boxes.iter().enumerate().map(|(index, aabb)| Interval {
                index,
                min: aabb.min_on_axis(axis),
                max: aabb.max_on_axis(axis),
            }));
        self.intervals.sort_by(|a, b| a.min.total_cmp(&b.min));

        let mut pairs = Vec::new();
        for (k, current) in self.intervals.iter().enumerate() {
            for other in &self.intervals[k + 1..] {
                if other.min > current.max {
                    break;
                }
                if boxes[current.index].overlaps(&boxes[other.index])
                    && let Some(pair) = CandidatePair::new(current.index, other.index)
                {
                    pairs.push(pair);
                }
            }
        }

        pairs
    }
}

/// The candidate pairs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    strategy: BroadPhaseStrategy,
    pairs: Vec<CandidatePair>,
}

impl CandidateSet {
    /// The strategy that produced this set.
    #[must_use]
    pub const fn strategy(&self) -> BroadPhaseStrategy {
        self.strategy
    }

    /// Pairs in ascending `(first, second)` order.
    #[must_use]
    pub fn pairs(&self) -> &[CandidatePair] {
        &self.pairs
    }

    /// Number of candidate pairs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no pair survived the broad phase.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Dispatches to the configured [`BroadPhase`] strategy.
#[derive(Debug, Clone)]
pub struct BroadPhaseFilter {
    strategy: BroadPhaseStrategy,
    brute: BruteForce,
    sap: SweepAndPrune,
    bvh: BvhBroadPhase,
}

impl Default for BroadPhaseFilter {
    fn default() -> Self {
        Self::new(&DetectConfig::default())
    }
}

impl BroadPhaseFilter {
    /// Create a filter for the given configuration.
    #[must_use]
    pub fn new(config: &DetectConfig) -> Self {
        Self {
            strategy: config.strategy,
            brute: BruteForce::new(),
            sap: SweepAndPrune::new(),
            bvh: BvhBroadPhase::new().with_max_leaf_size(config.bvh_leaf_size),
        }
    }

    /// Find candidate pairs among `boxes`.
    ///
    /// The result is sorted, so every strategy yields an identical set.
    pub fn find_candidates(&mut self, boxes: &[Aabb]) -> CandidateSet {
        let mut pairs = match self.strategy {
            BroadPhaseStrategy::BruteForce => self.brute.find_candidates(boxes),
            BroadPhaseStrategy::SweepAndPrune => self.sap.find_candidates(boxes),
            BroadPhaseStrategy::Bvh => self.bvh.find_candidates(boxes),
        };
        pairs.sort_unstable();

        debug!(
            strategy = %self.strategy,
            entry_count = boxes.len(),
            candidate_count = pairs.len(),
            "Broad phase complete"
        );

        CandidateSet {
            strategy: self.strategy,
            pairs,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clash_types::Point3;

    fn unit_box(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::from_center(Point3::new(x, y, z), Vector3::repeat(0.5))
    }

    fn all_strategies(boxes: &[Aabb]) -> Vec<CandidateSet> {
        BroadPhaseStrategy::all()
            .into_iter()
            .map(|strategy| {
                BroadPhaseFilter::new(&DetectConfig::default().with_strategy(strategy))
                    .find_candidates(boxes)
            })
            .collect()
    }

    #[test]
    fn candidate_pair_is_canonical() {
        let pair = CandidatePair::new(5, 2).unwrap();
        assert_eq!((pair.first(), pair.second()), (2, 5));
        assert_eq!(CandidatePair::new(2, 5), Some(pair));
        assert!(CandidatePair::new(3, 3).is_none());
    }

    #[test]
    fn brute_force_finds_overlap() {
        let boxes = [
            unit_box(0.0, 0.0, 0.0),
            unit_box(0.5, 0.0, 0.0),
            unit_box(5.0, 5.0, 5.0),
        ];
        let pairs = BruteForce::new().find_candidates(&boxes);
        assert_eq!(pairs, vec![CandidatePair::new(0, 1).unwrap()]);
    }

    #[test]
    fn touching_boxes_are_candidates() {
        let boxes = [unit_box(0.0, 0.0, 0.0), unit_box(1.0, 0.0, 0.0)];
        for set in all_strategies(&boxes) {
            assert_eq!(set.count(), 1, "{}", set.strategy());
        }
    }

    #[test]
    fn sweep_confirms_all_axes() {
        // Overlapping on x only.
        let boxes = [unit_box(0.0, 0.0, 0.0), unit_box(0.5, 3.0, 0.0)];
        assert!(SweepAndPrune::new().find_candidates(&boxes).is_empty());
    }

    #[test]
    fn sweep_axis_follows_spread() {
        let boxes = [unit_box(0.0, 0.0, 0.0), unit_box(0.0, 0.0, 10.0)];
        assert_eq!(SweepAndPrune::choose_sweep_axis(&boxes), Axis::Z);
        assert_eq!(SweepAndPrune::choose_sweep_axis(&[]), Axis::X);
    }

    #[test]
    fn strategies_agree_on_cluster() {
        let mut boxes = Vec::new();
        for i in 0..6 {
            for j in 0..4 {
                let (x, y) = (f64::from(i) * 0.8, f64::from(j) * 1.5);
                boxes.push(unit_box(x, y, f64::from(i % 2) * 0.3));
            }
        }

        let sets = all_strategies(&boxes);
        assert!(!sets[0].is_empty());
        assert_eq!(sets[0].pairs(), sets[1].pairs());
        assert_eq!(sets[0].pairs(), sets[2].pairs());
    }

    #[test]
    fn empty_and_single_inputs() {
        for set in all_strategies(&[]) {
            assert!(set.is_empty());
        }
        for set in all_strategies(&[unit_box(0.0, 0.0, 0.0)]) {
            assert!(set.is_empty());
        }
    }
}
