//! Exact pairwise classification returned by the geometry kernel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How two world-space solids relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Classification {
    /// The solids are separated.
    Disjoint,
    /// The solids share boundary only (zero-volume contact).
    Touching,
    /// The solids overlap with positive volume.
    Intersect,
}

impl Classification {
    /// Whether this classification is a clash.
    ///
    /// Only [`Classification::Intersect`] counts; surface contact does not.
    #[must_use]
    pub const fn is_clash(self) -> bool {
        matches!(self, Self::Intersect)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disjoint => "disjoint",
            Self::Touching => "touching",
            Self::Intersect => "intersecting",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_intersect_is_a_clash() {
        assert!(Classification::Intersect.is_clash());
        assert!(!Classification::Touching.is_clash());
        assert!(!Classification::Disjoint.is_clash());
    }
}
