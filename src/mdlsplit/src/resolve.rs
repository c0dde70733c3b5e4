//! Dependency resolution for a single model.
//!
//! Candidate materials come from three places: the model's embedded strings,
//! the conventional `materials/<model folder>/<model name>.vmt` path, and a
//! substring search of the pack for materials sharing the model's folder and
//! name. Candidates that exist seed a worklist walk over `include` chains that
//! collects every reachable texture.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::index::FileIndex;
use crate::material::parse_material;
use crate::scanner::scan_model;
use crate::{Error, Result, MATERIALS_PREFIX, MATERIAL_EXT, MODEL_EXT};

/// Companion files sharing the model's stem.
pub const SIDECAR_EXTS: &[&str] = &[
    ".vvd",
    ".phy",
    ".ani",
    ".vtx",
    ".dx80.vtx",
    ".dx90.vtx",
    ".sw.vtx",
];

/// Everything one model needs, as real indexed paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependencies {
    /// The model as requested
    pub model: String,
    /// The `.mdl` and its sidecars
    pub model_files: BTreeSet<String>,
    pub materials: BTreeSet<String>,
    pub textures: BTreeSet<String>,
    /// Included materials and referenced textures that are not in the pack
    pub unresolved: BTreeSet<String>,
    /// Sidecar names looked for but absent
    pub absent_sidecars: BTreeSet<String>,
}

impl Dependencies {
    /// Every resolved file, model files first.
    pub fn all_files(&self) -> impl Iterator<Item = &String> {
        self.model_files
            .iter()
            .chain(&self.materials)
            .chain(&self.textures)
    }
}

/// Split a model path into its stem (path without `.mdl`).
fn model_stem(model: &str) -> &str {
    let Some(at) = model.len().checked_sub(MODEL_EXT.len()) else {
        return model;
    };
    match model.get(at..) {
        Some(ext) if ext.eq_ignore_ascii_case(MODEL_EXT) => &model[..at],
        _ => model,
    }
}

/// Find the model file and whichever sidecars exist.
fn find_model_files(index: &FileIndex, model: &str, deps: &mut Dependencies) {
    if let Some(real) = index.resolve(model) {
        deps.model_files.insert(real.to_string());
    }

    let stem = model_stem(model);
    for ext in SIDECAR_EXTS {
        let wanted = format!("{stem}{ext}");
        match index.resolve(&wanted) {
            Some(real) => {
                deps.model_files.insert(real.to_string());
            }
            None => {
                tracing::debug!("No sidecar {}", wanted);
                deps.absent_sidecars.insert(wanted);
            }
        }
    }
}

/// Materials next to the model by convention: same folder tree under
/// `materials/`, basename containing the model's name.
pub fn folder_candidates(index: &FileIndex, model: &str) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    let lower = model.replace('\\', "/").to_lowercase();
    let path = Path::new(&lower);
    let Some(folder) = path.parent().and_then(|p| p.to_str()) else {
        return candidates;
    };
    if folder.is_empty() {
        return candidates;
    }
    let Some(base) = path.file_stem().and_then(|s| s.to_str()) else {
        return candidates;
    };

    candidates.insert(format!("{MATERIALS_PREFIX}{folder}/{base}{MATERIAL_EXT}"));

    for file in index.files() {
        let file_lower = file.to_lowercase();
        if !file_lower.ends_with(MATERIAL_EXT) || !file_lower.contains(folder) {
            continue;
        }
        let stem = Path::new(&file_lower)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        if stem.contains(base) {
            candidates.insert(file_lower);
        }
    }

    candidates
}

/// Follow `include` chains from `start`, returning (materials, textures, unresolved).
///
/// Materials are visited once each, so cyclic includes terminate.
pub fn collect_materials<'a>(
    index: &FileIndex,
    start: impl IntoIterator<Item = &'a str>,
) -> (BTreeSet<String>, BTreeSet<String>, BTreeSet<String>) {
    let mut to_visit: Vec<String> = start.into_iter().map(str::to_lowercase).collect();
    to_visit.sort();
    to_visit.dedup();
    to_visit.reverse();

    let mut seen: HashSet<String> = HashSet::new();
    let mut materials = BTreeSet::new();
    let mut textures = BTreeSet::new();
    let mut unresolved = BTreeSet::new();
    let mut wanted_textures = BTreeSet::new();

    while let Some(vmt) = to_visit.pop() {
        if !seen.insert(vmt.clone()) {
            continue;
        }

        let Some(real) = index.resolve_asset(&vmt) else {
            tracing::warn!("Material missing: {}", vmt);
            unresolved.insert(vmt);
            continue;
        };

        let data = match std::fs::read(index.absolute(real)) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Failed reading material {}: {}", real, e);
                unresolved.insert(real.to_string());
                continue;
            }
        };
        materials.insert(real.to_string());

        let refs = parse_material(&String::from_utf8_lossy(&data));
        tracing::debug!(
            "{}: {} textures, {} includes",
            real,
            refs.textures.len(),
            refs.includes.len()
        );

        wanted_textures.extend(refs.textures);
        for include in refs.includes.into_iter().rev() {
            if !seen.contains(&include) {
                to_visit.push(include);
            }
        }
    }

    for texture in wanted_textures {
        match index.resolve_asset(&texture) {
            Some(real) => {
                textures.insert(real.to_string());
            }
            None => {
                tracing::warn!("Texture missing: {}", texture);
                unresolved.insert(texture);
            }
        }
    }

    (materials, textures, unresolved)
}

/// Resolve every file `model` depends on.
pub fn resolve(index: &FileIndex, model: &str) -> Result<Dependencies> {
    let real_model = index
        .resolve(model)
        .ok_or_else(|| Error::ModelNotFound(model.to_string()))?;

    let mut deps = Dependencies {
        model: real_model.to_string(),
        ..Default::default()
    };
    find_model_files(index, real_model, &mut deps);

    let mut candidates = match std::fs::read(index.absolute(real_model)) {
        Ok(data) => scan_model(&data),
        Err(e) => {
            tracing::warn!("Could not scan model bytes {}: {}", real_model, e);
            BTreeSet::new()
        }
    };
    candidates.extend(folder_candidates(index, real_model));
    tracing::debug!("{}: {} material candidates", real_model, candidates.len());

    let existing: BTreeSet<&str> = candidates
        .iter()
        .filter_map(|c| index.resolve(c))
        .collect();

    let (materials, textures, unresolved) = collect_materials(index, existing);
    deps.materials = materials;
    deps.textures = textures;
    deps.unresolved = unresolved;

    Ok(deps)
}
