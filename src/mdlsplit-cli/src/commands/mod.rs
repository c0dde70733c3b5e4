//! CLI subcommand implementations

pub mod configure;
pub mod deps;
pub mod export;
pub mod list;

use anyhow::{bail, Context, Result};
use mdlsplit::{looks_like_pack, FileIndex};
use std::path::{Path, PathBuf};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Effective settings after merging flags, environment and the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub prefix: String,
    pub page_size: usize,
}

/// An opened pack: its file index and the models it lists.
pub struct Pack {
    pub index: FileIndex,
    pub models: Vec<String>,
}

impl Pack {
    /// Validate `root`, index it and collect its models.
    pub fn open(root: &Path, prefix: &str) -> Result<Self> {
        if !root.is_dir() || !looks_like_pack(root) {
            bail!(
                "{} is not an extracted pack root (expected models/ and/or materials/ inside)",
                root.display()
            );
        }

        let index = FileIndex::build_excluding_units(root, prefix)
            .with_context(|| format!("Failed to index {}", root.display()))?;
        let models = index.models();
        if models.is_empty() {
            bail!("No .mdl files found under {}", root.display());
        }

        tracing::debug!("{} files, {} models", index.len(), models.len());
        Ok(Self { index, models })
    }
}

pub fn root_or_cwd(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_rejects_non_pack() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("sound")).unwrap();
        assert!(Pack::open(temp_dir.path(), "EXPORTED").is_err());
        assert!(Pack::open(&temp_dir.path().join("missing"), "EXPORTED").is_err());
    }

    #[test]
    fn test_open_requires_models() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("materials")).unwrap();
        fs::write(temp_dir.path().join("materials/a.vmt"), b"").unwrap();

        let err = Pack::open(temp_dir.path(), "EXPORTED").err().unwrap();
        assert!(err.to_string().contains("No .mdl files"));
    }

    #[test]
    fn test_open_lists_models() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("models/props")).unwrap();
        fs::write(temp_dir.path().join("models/props/a.mdl"), b"").unwrap();

        let pack = Pack::open(temp_dir.path(), "EXPORTED").unwrap();
        assert_eq!(pack.models, vec!["models/props/a.mdl"]);
    }
}
