//! JSON scene files.
//!
//! ```json
//! {
//!   "name": "fixture",
//!   "parts": [
//!     { "id": "frame", "translation": [10.0, 0.0, 0.0] },
//!     {
//!       "id": "clamp",
//!       "parent": "frame",
//!       "rotation": { "axis": [0.0, 0.0, 1.0], "degrees": 45.0 },
//!       "shape": { "cuboid": { "half_extents": [0.5, 0.5, 0.5] } }
//!     }
//!   ]
//! }
//! ```
//!
//! Parents must be listed before their children. A part without a `shape` is
//! a grouping node.

use std::path::Path;

use clash_types::{Point3, Solid, Vector3};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AssemblyError, AssemblyResult};
use crate::{Assembly, Part};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartEntry {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    translation: [f64; 3],
    #[serde(default)]
    rotation: Option<RotationEntry>,
    #[serde(default)]
    shape: Option<ShapeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RotationEntry {
    axis: [f64; 3],
    degrees: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum ShapeEntry {
    Cuboid {
        half_extents: [f64; 3],
    },
    Mesh {
        vertices: Vec<[f64; 3]>,
        faces: Vec<[u32; 3]>,
    },
}

fn default_name() -> String {
    "scene".to_string()
}

impl ShapeEntry {
    fn into_solid(self) -> Solid {
        match self {
            Self::Cuboid { half_extents } => Solid::cuboid(Vector3::from(half_extents)),
            Self::Mesh { vertices, faces } => {
                Solid::new(vertices.into_iter().map(Point3::from).collect(), faces)
            }
        }
    }
}

impl PartEntry {
    fn into_part(self) -> Part {
        let mut part = match self.shape {
            Some(shape) => Part::solid(self.id, shape.into_solid()),
            None => Part::group(self.id),
        };

        let [x, y, z] = self.translation;
        part = part.with_translation(x, y, z);
        if let Some(rotation) = self.rotation {
            part = part.with_rotation(Vector3::from(rotation.axis), rotation.degrees.to_radians());
        }
        if let Some(parent) = self.parent {
            part = part.with_parent(parent);
        }
        part
    }
}

/// Parse an assembly from JSON scene text.
///
/// Shapes are not checked for validity here: degenerate solids are the
/// detection pipeline's concern and are skipped there.
///
/// # Errors
///
/// Returns [`AssemblyError::Parse`] for malformed JSON, or a structural
/// error if a part id repeats or a parent is not listed before its child.
pub fn parse_assembly(text: &str) -> AssemblyResult<Assembly> {
    let file: SceneFile = serde_json::from_str(text)?;

    let mut assembly = Assembly::new(file.name);
    for entry in file.parts {
        assembly.add_part(entry.into_part())?;
    }

    debug!(
        name = assembly.name(),
        parts = assembly.part_count(),
        "Parsed scene"
    );
    Ok(assembly)
}

/// Read and parse a JSON scene file.
///
/// # Errors
///
/// Returns [`AssemblyError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_assembly`].
pub fn load_assembly(path: &Path) -> AssemblyResult<Assembly> {
    let text = std::fs::read_to_string(path).map_err(|source| AssemblyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_assembly(&text)
}
