//! Facts manifests: the JSON dumps the engine-side enumerator writes.
//!
//! ```json
//! {
//!   "classes":   [ { "name": "Character", ... } ],
//!   "structs":   [ ... ],
//!   "enums":     [ ... ],
//!   "nodes":     [ { "class": "Character", "id": "Jump", ... } ],
//!   "variables": [ { "class": "Character", "name": "MaxHealth", ... } ]
//! }
//! ```
//!
//! Nodes and variables name their owning class by id; the class may come from
//! any manifest of the same run.

use anyhow::{Context, Result};
use bpdoc_core::facts::{ClassFacts, EnumFacts, MemberFacts, NodeFacts, StructFacts};
use bpdoc_core::FactsRegistry;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub classes: Vec<ClassFacts>,
    pub structs: Vec<StructFacts>,
    pub enums: Vec<EnumFacts>,
    pub nodes: Vec<NodeRecord>,
    pub variables: Vec<VariableRecord>,
}

#[derive(Debug, Deserialize)]
pub struct NodeRecord {
    pub class: String,
    #[serde(flatten)]
    pub node: NodeFacts,
}

#[derive(Debug, Deserialize)]
pub struct VariableRecord {
    pub class: String,
    #[serde(flatten)]
    pub member: MemberFacts,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a manifest; relative node image paths are resolved against the
    /// manifest's directory.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut manifest = Self::parse(&content).with_context(|| format!("invalid manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for record in &mut manifest.nodes {
            if let Some(image) = record.node.image.as_mut() {
                *image = base.join(&*image).to_string_lossy().into_owned();
            }
        }
        Ok(manifest)
    }
}

/// Facts of every manifest of a run, plus what could not be attached.
#[derive(Debug, Default)]
pub struct Loaded {
    pub registry: FactsRegistry,
    /// Problems found while attaching nodes and variables.
    pub warnings: Vec<String>,
}

/// Merge `manifests` into one registry. Types are registered before any node
/// or variable so owners may live in another manifest.
pub fn load(manifests: Vec<(PathBuf, Manifest)>) -> Loaded {
    let mut loaded = Loaded::default();
    let mut pending = Vec::new();

    for (path, manifest) in manifests {
        debug!(
            manifest = %path.display(),
            classes = manifest.classes.len(),
            structs = manifest.structs.len(),
            enums = manifest.enums.len(),
            "loaded manifest"
        );
        for class in manifest.classes {
            loaded.registry.add_class(class);
        }
        for facts in manifest.structs {
            loaded.registry.add_struct(facts);
        }
        for facts in manifest.enums {
            loaded.registry.add_enum(facts);
        }
        pending.push((path, manifest.nodes, manifest.variables));
    }

    for (path, nodes, variables) in pending {
        for record in nodes {
            let id = record.node.id.clone();
            if !loaded.registry.add_node(&record.class, record.node) {
                loaded.warnings.push(format!(
                    "{}: node {} names unknown class {}",
                    path.display(),
                    id,
                    record.class
                ));
            }
        }
        for record in variables {
            let name = record.member.name.clone();
            if !loaded.registry.add_variable(&record.class, record.member) {
                loaded.warnings.push(format!(
                    "{}: variable {} names unknown class {}",
                    path.display(),
                    name,
                    record.class
                ));
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdoc_core::facts::SpawnerKind;
    use bpdoc_core::FactsSource;

    const CHARACTER: &str = r#"{
        "classes": [{ "name": "Character", "blueprintable": true, "abstract": true }],
        "nodes": [{ "class": "Character", "id": "Jump", "short_title": "Jump", "spawner": "function" }],
        "variables": [{ "class": "Character", "name": "MaxHealth", "type": "float", "blueprint_visible": true }]
    }"#;

    #[test]
    fn parses_flattened_records() {
        let manifest = Manifest::parse(CHARACTER).unwrap();
        assert_eq!(manifest.classes.len(), 1);
        assert!(manifest.classes[0].is_abstract);
        assert_eq!(manifest.nodes[0].class, "Character");
        assert_eq!(manifest.nodes[0].node.id, "Jump");
        assert_eq!(manifest.nodes[0].node.spawner, SpawnerKind::Function);
        assert_eq!(manifest.variables[0].member.type_name, "float");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let manifest = Manifest::parse("{}").unwrap();
        assert!(manifest.classes.is_empty());
        assert!(manifest.nodes.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Manifest::parse("{ not json").is_err());
    }

    #[test]
    fn owners_may_come_from_another_manifest() {
        let types = Manifest::parse(r#"{ "classes": [{ "name": "Character" }] }"#).unwrap();
        let nodes = Manifest::parse(r#"{ "nodes": [{ "class": "Character", "id": "Jump" }] }"#).unwrap();
        let loaded = load(vec![(PathBuf::from("b.json"), nodes), (PathBuf::from("a.json"), types)]);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.registry.nodes().len(), 1);
    }

    #[test]
    fn unknown_owner_is_reported() {
        let manifest = Manifest::parse(r#"{ "variables": [{ "class": "Ghost", "name": "Speed" }] }"#).unwrap();
        let loaded = load(vec![(PathBuf::from("m.json"), manifest)]);
        assert_eq!(loaded.warnings, vec!["m.json: variable Speed names unknown class Ghost"]);
        assert!(loaded.registry.variables().is_empty());
    }

    #[test]
    fn image_paths_resolve_against_manifest_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        fs::write(
            &path,
            r#"{ "classes": [{ "name": "A" }], "nodes": [{ "class": "A", "id": "N", "image": "img/n.png" }] }"#,
        )
        .unwrap();
        let manifest = Manifest::read(&path).unwrap();
        assert_eq!(
            manifest.nodes[0].node.image.as_deref(),
            Some(dir.path().join("img/n.png").to_string_lossy().as_ref())
        );
    }
}
