//! Hierarchical assembly management.
//!
//! The [`Assembly`] struct holds named parts with parent-child relationships
//! and flattens them into a [`Scene`] of world-placed bodies.

use clash_types::{Body, BodyId, Scene, Solid};
use hashbrown::{HashMap, HashSet};
use nalgebra::Isometry3;
use tracing::warn;

use crate::error::{AssemblyError, AssemblyResult};
use crate::part::Part;
use crate::validation::AssemblyValidation;

/// A hierarchical assembly of parts.
///
/// Parts keep their insertion order, which fixes the [`BodyId`] each solid
/// receives when the assembly is used as a [`Scene`].
///
/// # Example
///
/// ```
/// use clash_assembly::{Assembly, Part};
/// use clash_types::{Scene, Solid};
///
/// let mut assembly = Assembly::new("fixture");
/// assembly.add_part(Part::group("frame").with_translation(10.0, 0.0, 0.0)).unwrap();
/// assembly.add_part(
///     Part::solid("clamp", Solid::unit_cube())
///         .with_parent("frame")
///         .with_translation(1.0, 0.0, 0.0),
/// ).unwrap();
///
/// let bodies = assembly.solid_bodies();
/// assert_eq!(bodies.len(), 1);
/// assert_eq!(bodies[0].label(), "clamp");
/// assert!((bodies[0].placement().translation.vector.x - 11.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    parts: HashMap<String, Part>,
    order: Vec<String>,
}

impl Assembly {
    /// Create a new empty assembly.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Get the assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Part Management
    // =========================================================================

    /// Add a part to the assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A part with the same ID already exists
    /// - The specified parent part does not exist
    pub fn add_part(&mut self, part: Part) -> AssemblyResult<()> {
        if self.parts.contains_key(part.id()) {
            return Err(AssemblyError::DuplicatePart {
                id: part.id().to_string(),
            });
        }

        if let Some(parent_id) = part.parent_id()
            && !self.parts.contains_key(parent_id)
        {
            return Err(AssemblyError::ParentNotFound {
                child_id: part.id().to_string(),
                parent_id: parent_id.to_string(),
            });
        }

        self.order.push(part.id().to_string());
        self.parts.insert(part.id().to_string(), part);
        Ok(())
    }

    /// Remove a part from the assembly.
    ///
    /// Children of the removed part become roots. Their local transforms are
    /// kept, so they now resolve relative to world space.
    ///
    /// # Errors
    ///
    /// Returns an error if the part does not exist.
    pub fn remove_part(&mut self, part_id: &str) -> AssemblyResult<Part> {
        let part = self
            .parts
            .remove(part_id)
            .ok_or_else(|| AssemblyError::PartNotFound {
                id: part_id.to_string(),
            })?;

        self.order.retain(|id| id != part_id);
        for other in self.parts.values_mut() {
            if other.parent_id() == Some(part_id) {
                other.set_parent(None);
            }
        }

        Ok(part)
    }

    /// Get a part by ID.
    #[must_use]
    pub fn get_part(&self, part_id: &str) -> Option<&Part> {
        self.parts.get(part_id)
    }

    /// Get a mutable reference to a part by ID.
    pub fn get_part_mut(&mut self, part_id: &str) -> Option<&mut Part> {
        self.parts.get_mut(part_id)
    }

    /// Check if a part exists.
    #[must_use]
    pub fn contains_part(&self, part_id: &str) -> bool {
        self.parts.contains_key(part_id)
    }

    /// Iterate over parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.order.iter().filter_map(|id| self.parts.get(id))
    }

    /// Get the number of parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Check if the assembly is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Get child parts of a parent, in insertion order.
    #[must_use]
    pub fn get_children(&self, parent_id: &str) -> Vec<&Part> {
        self.parts()
            .filter(|p| p.parent_id() == Some(parent_id))
            .collect()
    }

    /// Get root parts (parts with no parent), in insertion order.
    #[must_use]
    pub fn get_root_parts(&self) -> Vec<&Part> {
        self.parts().filter(|p| p.parent_id().is_none()).collect()
    }

    /// Compose the local-to-world transform of a part.
    ///
    /// Returns `None` if the part does not exist or its parent chain is
    /// circular. A missing ancestor ends the chain at world space.
    #[must_use]
    pub fn world_transform(&self, part_id: &str) -> Option<Isometry3<f64>> {
        let part = self.parts.get(part_id)?;
        let mut transform = *part.transform();

        let mut visited = HashSet::new();
        visited.insert(part_id);
        let mut current_parent_id = part.parent_id();
        while let Some(parent_id) = current_parent_id {
            if !visited.insert(parent_id) {
                return None;
            }
            let Some(parent) = self.parts.get(parent_id) else {
                break;
            };
            transform = parent.transform() * transform;
            current_parent_id = parent.parent_id();
        }

        Some(transform)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the assembly structure.
    #[must_use]
    pub fn validate(&self) -> AssemblyValidation {
        let mut result = AssemblyValidation::new();

        for part in self.parts() {
            if let Some(parent_id) = part.parent_id()
                && !self.parts.contains_key(parent_id)
            {
                result
                    .orphan_references
                    .push((part.id().to_string(), parent_id.to_string()));
            }

            if self.has_circular_reference(part.id()) {
                result.circular_references.push(part.id().to_string());
            }

            if part.solid_handle().is_some_and(|s| s.is_empty()) {
                result.empty_solids.push(part.id().to_string());
            }
        }

        result
    }

    fn has_circular_reference(&self, part_id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(part_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                return true;
            }
            current = self.parts.get(id).and_then(Part::parent_id);
        }

        false
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new("assembly")
    }
}

impl Scene for Assembly {
    type Shape = Solid;

    fn solid_bodies(&self) -> Vec<Body<Solid>> {
        let mut bodies = Vec::new();

        for (index, part) in self.parts().enumerate() {
            let Some(solid) = part.solid_handle() else {
                continue;
            };
            let Some(placement) = self.world_transform(part.id()) else {
                warn!(part = part.id(), "Skipping part with circular parent chain");
                continue;
            };

            bodies.push(
                Body::from_shared(BodyId::new(index as u64 + 1), part.id(), solid.clone())
                    .with_placement(placement),
            );
        }

        bodies
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;

    fn cube(id: &str) -> Part {
        Part::solid(id, Solid::unit_cube())
    }

    #[test]
    fn add_part() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(cube("a")).unwrap();
        assert_eq!(assembly.part_count(), 1);
        assert!(assembly.contains_part("a"));
        assert_eq!(assembly.name(), "test");
    }

    #[test]
    fn add_duplicate_part_fails() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(cube("a")).unwrap();
        let result = assembly.add_part(cube("a"));
        assert!(matches!(result, Err(AssemblyError::DuplicatePart { .. })));
    }

    #[test]
    fn add_part_missing_parent_fails() {
        let mut assembly = Assembly::new("test");
        let result = assembly.add_part(cube("child").with_parent("nowhere"));
        assert!(matches!(result, Err(AssemblyError::ParentNotFound { .. })));
    }

    #[test]
    fn remove_part_detaches_children() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::group("g")).unwrap();
        assembly.add_part(cube("c").with_parent("g")).unwrap();

        assembly.remove_part("g").unwrap();
        assert!(assembly.get_part("c").unwrap().parent_id().is_none());
        assert_eq!(assembly.get_root_parts().len(), 1);
        assert!(matches!(
            assembly.remove_part("g"),
            Err(AssemblyError::PartNotFound { .. })
        ));
    }

    #[test]
    fn hierarchy_queries_keep_insertion_order() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(Part::group("root")).unwrap();
        assembly.add_part(cube("z").with_parent("root")).unwrap();
        assembly.add_part(cube("a").with_parent("root")).unwrap();
        assembly.add_part(cube("free")).unwrap();

        let children: Vec<_> = assembly
            .get_children("root")
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(children, ["z", "a"]);
        let roots: Vec<_> = assembly.get_root_parts().iter().map(|p| p.id()).collect();
        assert_eq!(roots, ["root", "free"]);
    }

    #[test]
    fn world_transform_composes_chain() {
        let mut assembly = Assembly::new("test");
        assembly
            .add_part(
                Part::group("arm")
                    .with_translation(10.0, 0.0, 0.0)
                    .with_rotation(Vector3::z(), FRAC_PI_2),
            )
            .unwrap();
        assembly
            .add_part(
                cube("tip")
                    .with_parent("arm")
                    .with_translation(5.0, 0.0, 0.0),
            )
            .unwrap();

        let world = assembly.world_transform("tip").unwrap();
        assert_relative_eq!(world.translation.vector.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(world.translation.vector.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn circular_chain_is_reported_and_not_placed() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(cube("a")).unwrap();
        assembly.add_part(cube("b").with_parent("a")).unwrap();
        assembly
            .get_part_mut("a")
            .unwrap()
            .set_parent(Some("b".to_string()));

        let validation = assembly.validate();
        assert_eq!(validation.circular_references.len(), 2);
        assert!(assembly.world_transform("a").is_none());
        assert!(assembly.solid_bodies().is_empty());
    }

    #[test]
    fn validate_reports_orphans_and_empty_solids() {
        let mut assembly = Assembly::new("test");
        assembly
            .add_part(Part::solid("hollow", Solid::empty()))
            .unwrap();
        assembly.add_part(cube("c")).unwrap();
        assembly
            .get_part_mut("c")
            .unwrap()
            .set_parent(Some("ghost".to_string()));

        let validation = assembly.validate();
        assert!(!validation.is_valid());
        assert_eq!(
            validation.orphan_references,
            vec![("c".to_string(), "ghost".to_string())]
        );
        assert_eq!(validation.empty_solids, vec!["hollow".to_string()]);
    }

    #[test]
    fn scene_skips_groups_and_numbers_by_insertion() {
        let mut assembly = Assembly::new("test");
        assembly.add_part(cube("first")).unwrap();
        assembly.add_part(Part::group("group")).unwrap();
        assembly
            .add_part(cube("second").with_parent("group"))
            .unwrap();

        let bodies = assembly.solid_bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].id(), BodyId::new(1));
        assert_eq!(bodies[0].label(), "first");
        assert_eq!(bodies[1].id(), BodyId::new(3));
        assert_eq!(bodies[1].label(), "second");

        // Stable across repeated enumeration.
        let again = assembly.solid_bodies();
        assert_eq!(again[1].id(), bodies[1].id());
    }
}
