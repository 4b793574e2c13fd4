//! Result Aggregator: confirmed clashes and run diagnostics.

use std::collections::BTreeSet;
use std::fmt;

use clash_types::BodyId;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::SkippedBody;

/// Two bodies confirmed to overlap with positive volume.
///
/// Stored with the smaller id first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClashPair {
    first: BodyId,
    second: BodyId,
    first_label: String,
    second_label: String,
}

impl ClashPair {
    /// Create a pair from two `(id, label)` sides, in either order.
    #[must_use]
    pub fn new(a: (BodyId, &str), b: (BodyId, &str)) -> Self {
        let ((first, first_label), (second, second_label)) =
            if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            first_label: first_label.to_string(),
            second_label: second_label.to_string(),
        }
    }

    /// The body with the smaller id.
    #[must_use]
    pub const fn first(&self) -> BodyId {
        self.first
    }

    /// The body with the larger id.
    #[must_use]
    pub const fn second(&self) -> BodyId {
        self.second
    }

    /// Both ids, smaller first.
    #[must_use]
    pub const fn ids(&self) -> (BodyId, BodyId) {
        (self.first, self.second)
    }

    /// Label of [`first`](Self::first).
    #[must_use]
    pub fn first_label(&self) -> &str {
        &self.first_label
    }

    /// Label of [`second`](Self::second).
    #[must_use]
    pub fn second_label(&self) -> &str {
        &self.second_label
    }
}

impl fmt::Display for ClashPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.first_label, self.second_label)
    }
}

/// A candidate pair the narrow phase could not classify.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FailedPair {
    /// The body with the smaller id.
    pub first: BodyId,
    /// The body with the larger id.
    pub second: BodyId,
    /// The geometry error text.
    pub reason: String,
}

impl fmt::Display for FailedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed pair {} / {}: {}",
            self.first, self.second, self.reason
        )
    }
}

/// Intermediate counts and recovered failures of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostics {
    /// Valid entries built.
    pub entry_count: usize,
    /// Pairs that survived the broad phase.
    pub candidate_count: usize,
    /// Candidates classified as touching (never clashes).
    pub touching_count: usize,
    /// Bodies left out of the run.
    pub skipped_bodies: Vec<SkippedBody>,
    /// Candidate pairs that failed in the narrow phase.
    pub failed_pairs: Vec<FailedPair>,
}

/// Final output of a reported run.
///
/// # Example
///
/// ```
/// use clash_detect::{ClashPair, ClashResult, Diagnostics};
/// use clash_types::BodyId;
///
/// let pairs = vec![
///     ClashPair::new((BodyId::new(1), "a"), (BodyId::new(2), "b")),
///     ClashPair::new((BodyId::new(3), "c"), (BodyId::new(1), "a")),
/// ];
/// let diagnostics = Diagnostics { entry_count: 3, candidate_count: 2, ..Diagnostics::default() };
/// let result = ClashResult::aggregate(pairs, diagnostics);
///
/// assert_eq!(result.clash_count(), 2);
/// assert_eq!(result.body_count(), 3);
/// assert_eq!(result.summary(), "Found 2 clash(es) involving 3 bodies");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClashResult {
    pairs: Vec<ClashPair>,
    bodies: BTreeSet<BodyId>,
    diagnostics: Diagnostics,
}

impl ClashResult {
    /// Collect confirmed pairs into a result.
    ///
    /// Pairs are kept as given; the broad phase already visits each unordered
    /// pair once. Clashing bodies are collected with set semantics.
    #[must_use]
    pub fn aggregate(pairs: Vec<ClashPair>, diagnostics: Diagnostics) -> Self {
        let bodies = pairs.iter().flat_map(|p| [p.first, p.second]).collect();
        Self {
            pairs,
            bodies,
            diagnostics,
        }
    }

    /// Confirmed clash pairs.
    #[must_use]
    pub fn pairs(&self) -> &[ClashPair] {
        &self.pairs
    }

    /// Number of clash pairs.
    #[must_use]
    pub fn clash_count(&self) -> usize {
        self.pairs.len()
    }

    /// Distinct clashing bodies, ascending.
    #[must_use]
    pub fn clashing_bodies(&self) -> &BTreeSet<BodyId> {
        &self.bodies
    }

    /// Number of distinct clashing bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Check if any clash was found.
    #[must_use]
    pub fn has_clashes(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Run diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// One-line status text.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.has_clashes() {
            format!(
                "Found {} clash(es) involving {} bodies",
                self.clash_count(),
                self.body_count()
            )
        } else {
            format!(
                "No clashes found among {} bodies",
                self.diagnostics.entry_count
            )
        }
    }
}

impl fmt::Display for ClashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for pair in &self.pairs {
            write!(f, "\n  {pair}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u64, b: u64) -> ClashPair {
        ClashPair::new(
            (BodyId::new(a), &format!("b{a}")),
            (BodyId::new(b), &format!("b{b}")),
        )
    }

    #[test]
    fn pair_orders_by_id() {
        let p = pair(9, 2);
        assert_eq!(p.ids(), (BodyId::new(2), BodyId::new(9)));
        assert_eq!(p.first_label(), "b2");
        assert_eq!(p.to_string(), "b2 <-> b9");
    }

    #[test]
    fn body_set_has_set_semantics() {
        // One body against three others contributes once.
        let result = ClashResult::aggregate(
            vec![pair(1, 2), pair(1, 3), pair(1, 4)],
            Diagnostics::default(),
        );
        assert_eq!(result.clash_count(), 3);
        assert_eq!(result.body_count(), 4);
        let ids: Vec<u64> = result.clashing_bodies().iter().map(|id| id.raw()).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn empty_summary_counts_entries() {
        let result = ClashResult::aggregate(
            Vec::new(),
            Diagnostics {
                entry_count: 50,
                ..Diagnostics::default()
            },
        );
        assert!(!result.has_clashes());
        assert_eq!(result.summary(), "No clashes found among 50 bodies");
        assert_eq!(result.to_string(), result.summary());
    }

    #[test]
    fn display_lists_pairs() {
        let result = ClashResult::aggregate(vec![pair(1, 2)], Diagnostics::default());
        assert_eq!(
            result.to_string(),
            "Found 1 clash(es) involving 2 bodies\n  b1 <-> b2"
        );
    }

    #[test]
    fn failed_pair_display() {
        let failed = FailedPair {
            first: BodyId::new(1),
            second: BodyId::new(2),
            reason: "unsupported".to_string(),
        };
        assert_eq!(
            failed.to_string(),
            "Failed pair Body(1) / Body(2): unsupported"
        );
    }
}
