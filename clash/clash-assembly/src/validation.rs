//! Assembly validation results.

/// Structural issues found in an assembly.
#[derive(Debug, Clone, Default)]
pub struct AssemblyValidation {
    /// Parts whose parent is missing (`child_id`, `missing_parent_id`).
    pub orphan_references: Vec<(String, String)>,

    /// Parts whose parent chain loops back on itself.
    pub circular_references: Vec<String>,

    /// Leaf parts whose solid is empty.
    pub empty_solids: Vec<String>,
}

impl AssemblyValidation {
    /// Create a new empty validation result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the assembly is valid (no issues found).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issue_count() == 0
    }

    /// Get the total number of issues found.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.orphan_references.len() + self.circular_references.len() + self.empty_solids.len()
    }

    /// Get a one-line summary of the issues.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return "Assembly is valid".to_string();
        }

        let mut issues = Vec::new();
        if !self.orphan_references.is_empty() {
            issues.push(format!(
                "{} orphan parent reference(s)",
                self.orphan_references.len()
            ));
        }
        if !self.circular_references.is_empty() {
            issues.push(format!(
                "{} circular reference(s)",
                self.circular_references.len()
            ));
        }
        if !self.empty_solids.is_empty() {
            issues.push(format!("{} empty solid(s)", self.empty_solids.len()));
        }

        format!("Validation failed: {}", issues.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_valid() {
        let validation = AssemblyValidation::new();
        assert!(validation.is_valid());
        assert_eq!(validation.summary(), "Assembly is valid");
    }

    #[test]
    fn summary_lists_every_kind() {
        let mut validation = AssemblyValidation::new();
        validation
            .orphan_references
            .push(("a".to_string(), "b".to_string()));
        validation.circular_references.push("c".to_string());
        validation.empty_solids.push("d".to_string());

        assert_eq!(validation.issue_count(), 3);
        let summary = validation.summary();
        assert!(summary.contains("orphan"));
        assert!(summary.contains("circular"));
        assert!(summary.contains("empty solid"));
    }
}
