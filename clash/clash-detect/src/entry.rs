//! Entry Builder: bodies to detection-ready records.

use clash_types::{Aabb, Body, BodyId, GeometryKernel};
use hashbrown::HashSet;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::RunContext;

/// A body paired with its precomputed world-space bounding box.
///
/// Entries live for one run only.
#[derive(Debug, Clone)]
pub struct Entry<S> {
    body: Body<S>,
    aabb: Aabb,
}

impl<S> Entry<S> {
    /// Get the body.
    #[must_use]
    pub fn body(&self) -> &Body<S> {
        &self.body
    }

    /// Get the body id.
    #[must_use]
    pub fn id(&self) -> BodyId {
        self.body.id()
    }

    /// Get the world-space bounding box.
    #[must_use]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }
}

/// A body that did not become an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SkippedBody {
    /// Identity of the skipped body.
    pub id: BodyId,
    /// Label of the skipped body.
    pub label: String,
    /// Why it was skipped.
    pub reason: String,
}

impl std::fmt::Display for SkippedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { id, label, reason } = self;
        write!(f, "Skipped body '{label}' ({id}): {reason}")
    }
}

/// Output of [`build_entries`].
#[derive(Debug, Clone)]
pub struct EntrySet<S> {
    entries: Vec<Entry<S>>,
    skipped: Vec<SkippedBody>,
}

impl<S> EntrySet<S> {
    /// Valid entries, in scene order.
    #[must_use]
    pub fn entries(&self) -> &[Entry<S>] {
        &self.entries
    }

    /// Bodies that were skipped, in scene order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedBody] {
        &self.skipped
    }

    /// Number of valid entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// World-space boxes of the entries, index-aligned with [`entries`](Self::entries).
    #[must_use]
    pub fn boxes(&self) -> Vec<Aabb> {
        self.entries.iter().map(|e| e.aabb).collect()
    }

    pub(crate) fn into_skipped(self) -> Vec<SkippedBody> {
        self.skipped
    }
}

/// Build one entry per distinct body identity.
///
/// A body is skipped, logged, and recorded when the kernel cannot bound it,
/// when its box is empty or non-finite, or when an earlier body already
/// claimed its id. Skipping never fails the run.
pub fn build_entries<K: GeometryKernel>(
    kernel: &K,
    bodies: Vec<Body<K::Shape>>,
    ctx: &mut RunContext<'_>,
) -> EntrySet<K::Shape> {
    let mut seen = HashSet::with_capacity(bodies.len());
    let mut entries = Vec::with_capacity(bodies.len());
    let mut skipped = Vec::new();

    for body in bodies {
        let checked = if seen.contains(&body.id()) {
            Err("duplicate body id".to_string())
        } else {
            match kernel.world_bounding_box(&body) {
                Ok(aabb) if aabb.is_empty() || !aabb.is_finite() => {
                    Err("bounding box is empty or non-finite".to_string())
                }
                Ok(aabb) => Ok(aabb),
                Err(err) => Err(err.to_string()),
            }
        };

        match checked {
            Ok(aabb) => {
                seen.insert(body.id());
                entries.push(Entry { body, aabb });
            }
            Err(reason) => {
                let skip = SkippedBody {
                    id: body.id(),
                    label: body.label().to_string(),
                    reason,
                };
                warn!(
                    body = %skip.id,
                    label = %skip.label,
                    reason = %skip.reason,
                    "Skipping body"
                );
                ctx.log(&skip.to_string());
                skipped.push(skip);
            }
        }
    }

    debug!(
        entry_count = entries.len(),
        skipped_count = skipped.len(),
        "Built entries"
    );

    EntrySet { entries, skipped }
}
