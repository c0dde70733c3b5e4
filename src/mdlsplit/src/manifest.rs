//! Documents written into every export unit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

pub const MANIFEST_FILE: &str = "split_manifest.json";
pub const ADDON_FILE: &str = "addon.json";

/// Troubleshooting record of what an export copied and what it couldn't find.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitManifest {
    pub model: String,
    pub copied_files: Vec<String>,
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absent_sidecars: Vec<String>,
}

impl SplitManifest {
    pub fn write(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    pub fn read(dir: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Addon descriptor so the unit can be packed or mounted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDescriptor {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub ignore: Vec<String>,
}

impl AddonDescriptor {
    /// Descriptor for a unit exported from the model with the given stem.
    pub fn for_model(stem: &str) -> Self {
        Self {
            title: format!("{stem} (exported)"),
            kind: "model".to_string(),
            tags: vec!["model".to_string(), "prop".to_string()],
            ignore: [".psd", ".db", ".blend1", ".md"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(ADDON_FILE), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addon_descriptor_shape() {
        let json = serde_json::to_value(AddonDescriptor::for_model("chair")).unwrap();
        assert_eq!(json["title"], "chair (exported)");
        assert_eq!(json["type"], "model");
        assert_eq!(json["tags"], serde_json::json!(["model", "prop"]));
        assert_eq!(json["ignore"], serde_json::json!([".psd", ".db", ".blend1", ".md"]));
    }

    #[test]
    fn test_manifest_written_to_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = SplitManifest {
            model: "models/chair.mdl".to_string(),
            copied_files: vec!["models/chair.mdl".to_string()],
            missing: vec!["materials/gone.vtf".to_string()],
            absent_sidecars: Vec::new(),
        };
        manifest.write(temp_dir.path()).unwrap();

        let text = std::fs::read_to_string(temp_dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(!text.contains("absent_sidecars"));
        assert_eq!(SplitManifest::read(temp_dir.path()).unwrap(), manifest);
    }
}
