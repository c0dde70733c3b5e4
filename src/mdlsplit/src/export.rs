//! Export units: numbered output folders holding one model and its dependencies.

use std::collections::BTreeSet;
use std::fs::{self, File, FileTimes};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::index::FileIndex;
use crate::manifest::{AddonDescriptor, SplitManifest};
use crate::resolve::{resolve, Dependencies};
use crate::Result;

/// Default folder name prefix for export units.
pub const DEFAULT_PREFIX: &str = "EXPORTED";

/// Parse the unit number out of a folder name like `EXPORTED12` or `exported 3`.
pub fn unit_number(name: &str, prefix: &str) -> Option<u64> {
    let head = name.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let digits = name[prefix.len()..].trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Hands out export unit folders, never reusing an existing one.
#[derive(Debug, Clone)]
pub struct ExportNumbering {
    root: PathBuf,
    prefix: String,
    next: u64,
}

impl ExportNumbering {
    /// Start numbering after the highest unit already present under `root`.
    pub fn scan(root: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let root = root.into();
        let mut highest = 0;

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(n) = unit_number(&entry.file_name().to_string_lossy(), prefix) {
                highest = highest.max(n);
            }
        }

        Ok(Self {
            root,
            prefix: prefix.to_string(),
            next: highest + 1,
        })
    }

    /// Number the next unit will try first.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn name_for(&self, n: u64) -> String {
        format!("{}{}", self.prefix, n)
    }

    /// Create the next free unit folder, returning its name and path.
    pub fn create_next(&mut self) -> Result<(String, PathBuf)> {
        loop {
            let name = self.name_for(self.next);
            let path = self.root.join(&name);
            self.next += 1;

            match fs::create_dir(&path) {
                Ok(()) => return Ok((name, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("{} already exists, skipping", name);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// What one export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub model: String,
    pub copied_files: Vec<String>,
    pub missing: Vec<String>,
    pub absent_sidecars: Vec<String>,
}

impl ExportReport {
    pub fn manifest(&self) -> SplitManifest {
        SplitManifest {
            model: self.model.clone(),
            copied_files: self.copied_files.clone(),
            missing: self.missing.clone(),
            absent_sidecars: self.absent_sidecars.clone(),
        }
    }
}

/// Copy a file, carrying over its access and modification times.
fn copy_with_times(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst)?;

    let meta = fs::metadata(src)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // `fs::copy` carries the permission bits over, so the copy may already be
    // read-only. Setting times only needs ownership, not write access.
    File::open(dst)?.set_times(times)
}

/// Copy `rel` into `dest`, preserving its subdirectory. Returns the real path
/// copied, or `None` if the index doesn't know it.
fn copy_into(
    index: &FileIndex,
    rel: &str,
    dest: &Path,
    copied: &mut BTreeSet<String>,
) -> std::io::Result<Option<String>> {
    let Some(real) = index.resolve(rel) else {
        return Ok(None);
    };
    if copied.contains(real) {
        return Ok(Some(real.to_string()));
    }

    let target = dest.join(real);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    copy_with_times(&index.absolute(real), &target)?;

    copied.insert(real.to_string());
    Ok(Some(real.to_string()))
}

/// Copy everything in `deps` into `dest` and write the unit's documents.
pub fn export(index: &FileIndex, deps: &Dependencies, dest: &Path) -> Result<ExportReport> {
    let mut copied = BTreeSet::new();
    let mut missing: BTreeSet<String> = deps.unresolved.clone();

    for rel in deps.all_files() {
        match copy_into(index, rel, dest, &mut copied) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("Not in pack: {}", rel);
                missing.insert(rel.clone());
            }
            Err(e) => {
                tracing::warn!("Failed copying {}: {}", rel, e);
                missing.insert(rel.clone());
            }
        }
    }

    let report = ExportReport {
        model: deps.model.clone(),
        copied_files: copied.into_iter().collect(),
        missing: missing.into_iter().collect(),
        absent_sidecars: deps.absent_sidecars.iter().cloned().collect(),
    };

    report.manifest().write(dest)?;

    let stem = Path::new(&deps.model)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&deps.model);
    AddonDescriptor::for_model(stem).write(dest)?;

    tracing::info!(
        "{}: copied {} files, {} missing",
        report.model,
        report.copied_files.len(),
        report.missing.len()
    );
    Ok(report)
}

/// Resolve and export `model` into `dest` in one step.
pub fn export_model(index: &FileIndex, model: &str, dest: &Path) -> Result<ExportReport> {
    let deps = resolve(index, model)?;
    export(index, &deps, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ADDON_FILE, MANIFEST_FILE};

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_pack(root: &Path) {
        write(root, "models/props/Barrel.mdl", b"IDST\x00models\\props\\barrel\x00");
        write(root, "models/props/Barrel.vvd", b"IDSV barrel vertices");
        write(root, "models/props/Barrel.dx90.vtx", b"strip data");
        write(
            root,
            "materials/models/props/barrel.vmt",
            b"\"VertexLitGeneric\"\n{\n\"$basetexture\" \"models/props/barrel\"\n\"$bumpmap\" \"models/props/barrel_missing_normal\"\n}",
        );
        write(root, "materials/models/props/Barrel.vtf", b"VTF\x00pixels");
    }

    #[test]
    fn test_unit_number() {
        assert_eq!(unit_number("EXPORTED12", "EXPORTED"), Some(12));
        assert_eq!(unit_number("exported 3", "EXPORTED"), Some(3));
        assert_eq!(unit_number("EXPORTED", "EXPORTED"), None);
        assert_eq!(unit_number("EXPORTEDx1", "EXPORTED"), None);
        assert_eq!(unit_number("EXP", "EXPORTED"), None);
        assert_eq!(unit_number("models", "EXPORTED"), None);
    }

    #[test]
    fn test_numbering_skips_existing_units() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("EXPORTED1")).unwrap();
        fs::create_dir(temp_dir.path().join("EXPORTED3")).unwrap();
        fs::write(temp_dir.path().join("EXPORTED9"), b"a file, not a unit").unwrap();

        let mut numbering = ExportNumbering::scan(temp_dir.path(), DEFAULT_PREFIX).unwrap();
        assert_eq!(numbering.peek(), 4);

        let (name, path) = numbering.create_next().unwrap();
        assert_eq!(name, "EXPORTED4");
        assert!(path.is_dir());

        let (name, _) = numbering.create_next().unwrap();
        assert_eq!(name, "EXPORTED5");
    }

    #[test]
    fn test_numbering_bumps_past_collisions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut numbering = ExportNumbering::scan(temp_dir.path(), DEFAULT_PREFIX).unwrap();
        fs::create_dir(temp_dir.path().join("EXPORTED1")).unwrap();
        fs::create_dir(temp_dir.path().join("EXPORTED2")).unwrap();

        let (name, _) = numbering.create_next().unwrap();
        assert_eq!(name, "EXPORTED3");
    }

    #[test]
    fn test_export_model_copies_and_records_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        sample_pack(root);

        let index = FileIndex::build(root).unwrap();
        let mut numbering = ExportNumbering::scan(root, DEFAULT_PREFIX).unwrap();
        let (_, unit) = numbering.create_next().unwrap();

        let report = export_model(&index, "models/props/barrel.mdl", &unit).unwrap();

        assert_eq!(report.model, "models/props/Barrel.mdl");
        assert_eq!(
            report.copied_files,
            vec![
                "materials/models/props/Barrel.vtf",
                "materials/models/props/barrel.vmt",
                "models/props/Barrel.dx90.vtx",
                "models/props/Barrel.mdl",
                "models/props/Barrel.vvd",
            ]
        );
        assert_eq!(
            report.missing,
            vec!["materials/models/props/barrel_missing_normal.vtf"]
        );
        assert!(unit.join("models/props/Barrel.vvd").is_file());
        assert!(unit.join(ADDON_FILE).is_file());

        let manifest = SplitManifest::read(&unit).unwrap();
        assert_eq!(manifest, report.manifest());
    }

    #[test]
    fn test_export_twice_is_identical() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        sample_pack(root);

        let index = FileIndex::build(root).unwrap();
        let mut numbering = ExportNumbering::scan(root, DEFAULT_PREFIX).unwrap();
        let (_, first) = numbering.create_next().unwrap();
        let (_, second) = numbering.create_next().unwrap();

        let a = export_model(&index, "models/props/Barrel.mdl", &first).unwrap();
        let b = export_model(&index, "models/props/Barrel.mdl", &second).unwrap();
        assert_eq!(a, b);

        for rel in &a.copied_files {
            let left = fs::read(first.join(rel)).unwrap();
            let right = fs::read(second.join(rel)).unwrap();
            assert_eq!(left, right, "{rel} differs");
        }
        assert_eq!(
            fs::read(first.join(MANIFEST_FILE)).unwrap(),
            fs::read(second.join(MANIFEST_FILE)).unwrap()
        );
    }

    #[test]
    fn test_export_preserves_modified_time() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        sample_pack(root);

        let index = FileIndex::build(root).unwrap();
        let unit = root.join("EXPORTED1");
        fs::create_dir(&unit).unwrap();
        export_model(&index, "models/props/Barrel.mdl", &unit).unwrap();

        let src = fs::metadata(root.join("models/props/Barrel.mdl")).unwrap();
        let dst = fs::metadata(unit.join("models/props/Barrel.mdl")).unwrap();
        assert_eq!(src.modified().unwrap(), dst.modified().unwrap());
    }

    #[test]
    fn test_export_reports_unindexed_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let index = FileIndex::from_files(temp_dir.path(), Vec::new());
        let deps = Dependencies {
            model: "models/ghost.mdl".to_string(),
            model_files: ["models/ghost.mdl".to_string()].into_iter().collect(),
            ..Default::default()
        };

        let unit = temp_dir.path().join("EXPORTED1");
        fs::create_dir(&unit).unwrap();
        let report = export(&index, &deps, &unit).unwrap();

        assert!(report.copied_files.is_empty());
        assert_eq!(report.missing, vec!["models/ghost.mdl"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_export_read_only_source() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "models/a.mdl", b"IDST");
        let src = root.join("models/a.mdl");
        fs::set_permissions(&src, fs::Permissions::from_mode(0o444)).unwrap();

        let index = FileIndex::build(root).unwrap();
        let unit = root.join("EXPORTED1");
        fs::create_dir(&unit).unwrap();
        let report = export_model(&index, "models/a.mdl", &unit).unwrap();

        assert_eq!(report.copied_files, vec!["models/a.mdl"]);
        assert!(report.missing.is_empty());
        assert_eq!(
            fs::metadata(&src).unwrap().modified().unwrap(),
            fs::metadata(unit.join("models/a.mdl")).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_export_records_unreadable_material() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "models/a.mdl", b"IDST\x00materials/models/a.vmt\x00");
        write(root, "materials/models/a.vmt", b"\"$basetexture\" \"models/a\"");

        let index = FileIndex::build(root).unwrap();
        fs::remove_file(root.join("materials/models/a.vmt")).unwrap();

        let unit = root.join("EXPORTED1");
        fs::create_dir(&unit).unwrap();
        let report = export_model(&index, "models/a.mdl", &unit).unwrap();

        assert_eq!(report.copied_files, vec!["models/a.mdl"]);
        assert_eq!(report.missing, vec!["materials/models/a.vmt"]);
    }

    #[test]
    fn test_export_copies_shared_path_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "models/a.mdl", b"IDST");

        let index = FileIndex::build(root).unwrap();
        let deps = Dependencies {
            model: "models/a.mdl".to_string(),
            model_files: ["models/a.mdl".to_string()].into_iter().collect(),
            materials: ["MODELS/A.MDL".to_string()].into_iter().collect(),
            ..Default::default()
        };

        let unit = root.join("EXPORTED1");
        fs::create_dir(&unit).unwrap();
        let report = export(&index, &deps, &unit).unwrap();

        assert_eq!(report.copied_files, vec!["models/a.mdl"]);
        assert!(report.missing.is_empty());
        assert_eq!(fs::read(unit.join("models/a.mdl")).unwrap(), b"IDST");
    }
}
