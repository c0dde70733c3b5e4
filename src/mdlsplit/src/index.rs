//! Case-insensitive index of every file under a pack root.
//!
//! All lookups in the rest of the crate go through [`FileIndex::resolve`],
//! which maps a guessed path (any case, either separator) to the real
//! relative path on disk. The index is built once and never refreshed.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::export::unit_number;
use crate::{Error, Result, MATERIALS_PREFIX, MODELS_PREFIX, MODEL_EXT};

/// Normalize a guessed relative path into an index key.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim().to_lowercase()
}

/// Check whether `root` looks like an extracted pack (has `models/` or `materials/`).
pub fn looks_like_pack(root: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(root) else {
        return false;
    };

    entries.filter_map(|e| e.ok()).any(|entry| {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let name = entry.file_name().to_string_lossy().to_lowercase();
        is_dir && (name == "models" || name == "materials")
    })
}

#[derive(Debug, Clone)]
pub struct FileIndex {
    root: PathBuf,
    files: Vec<String>,
    by_lower: HashMap<String, String>,
}

impl FileIndex {
    /// Walk `root` and index every regular file beneath it.
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        Self::build_filtered(root, |_| false)
    }

    /// Like [`FileIndex::build`], but leaves out top-level export unit folders
    /// (`<prefix><n>`) so earlier exports don't show up as models again.
    pub fn build_excluding_units(root: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        Self::build_filtered(root, |name| unit_number(name, prefix).is_some())
    }

    fn build_filtered(root: impl AsRef<Path>, skip_top_dir: impl Fn(&str) -> bool) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        let walker = WalkDir::new(root).sort_by_file_name().into_iter();
        let walker = walker.filter_entry(|e| {
            !(e.depth() == 1
                && e.file_type().is_dir()
                && skip_top_dir(&e.file_name().to_string_lossy()))
        });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            match to_slash_path(rel) {
                Some(rel) => files.push(rel),
                None => tracing::warn!("Skipping non UTF-8 path: {}", rel.display()),
            }
        }

        tracing::debug!("Indexed {} files under {}", files.len(), root.display());
        Ok(Self::from_files(root, files))
    }

    /// Build an index from an already known file list.
    pub fn from_files(root: impl Into<PathBuf>, files: Vec<String>) -> Self {
        let by_lower = files.iter().map(|f| (f.to_lowercase(), f.clone())).collect();
        Self {
            root: root.into(),
            files,
            by_lower,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All indexed relative paths, in walk order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Translate a guessed relative path into the real indexed path.
    pub fn resolve(&self, guess: &str) -> Option<&str> {
        self.by_lower.get(&normalize(guess)).map(String::as_str)
    }

    pub fn contains(&self, guess: &str) -> bool {
        self.resolve(guess).is_some()
    }

    /// Resolve a material or texture path, collapsing a doubled
    /// `materials/materials/` prefix when the literal path is absent.
    pub fn resolve_asset(&self, guess: &str) -> Option<&str> {
        self.resolve(guess).or_else(|| {
            let doubled = format!("{MATERIALS_PREFIX}{MATERIALS_PREFIX}");
            let key = normalize(guess);
            if key.contains(&doubled) {
                self.resolve(&key.replace(&doubled, MATERIALS_PREFIX))
            } else {
                None
            }
        })
    }

    /// Absolute on-disk path for an indexed relative path.
    pub fn absolute(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Every `.mdl` in the pack: `models/` first, then the rest, alphabetical
    /// (case-insensitive) within each group.
    pub fn models(&self) -> Vec<String> {
        let mut models: Vec<String> = self
            .files
            .iter()
            .filter(|f| f.to_lowercase().ends_with(MODEL_EXT))
            .cloned()
            .collect();

        models.sort_by_cached_key(|m| {
            let lower = m.to_lowercase();
            (!lower.starts_with(MODELS_PREFIX), lower)
        });
        models
    }
}

fn to_slash_path(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
