//! # mdlsplit
//!
//! Splits single models out of an extracted Source engine content pack.
//!
//! Given a pack root (the folder holding `models/` and/or `materials/`) and a
//! `.mdl` inside it, this library works out the minimal self-contained set of
//! files needed to use that model on its own:
//! - the model binary and its sidecars (`.vvd`, `.phy`, `.ani`, `.vtx` variants)
//! - every material (`.vmt`) the model appears to reference
//! - every material reachable through `include` chains
//! - every texture (`.vtf`) those materials reference
//!
//! Model-to-material association is heuristic. Models are scanned for
//! path-like strings and the pack is searched for materials that share the
//! model's folder and basename. False positives are filtered against the file
//! index; the bias is towards recall.
//!
//! ## Example
//!
//! ```no_run
//! use mdlsplit::{export_model, ExportNumbering, FileIndex};
//!
//! # fn main() -> mdlsplit::Result<()> {
//! let index = FileIndex::build("addon")?;
//! let mut numbering = ExportNumbering::scan(index.root(), "EXPORTED")?;
//!
//! for model in index.models() {
//!     let (_name, dir) = numbering.create_next()?;
//!     let report = export_model(&index, &model, &dir)?;
//!     println!("{}: {} copied, {} missing", model, report.copied_files.len(), report.missing.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod index;
pub mod manifest;
pub mod material;
pub mod resolve;
pub mod scanner;
pub mod selection;

use thiserror::Error;

#[doc(inline)]
pub use export::{export, export_model, ExportNumbering, ExportReport};
#[doc(inline)]
pub use index::{looks_like_pack, normalize, FileIndex};
#[doc(inline)]
pub use manifest::{AddonDescriptor, SplitManifest};
#[doc(inline)]
pub use material::{parse_material, MaterialRefs};
#[doc(inline)]
pub use resolve::{resolve, Dependencies};
#[doc(inline)]
pub use scanner::scan_model;
#[doc(inline)]
pub use selection::parse_selection;

/// Namespace prefix every material and texture path lives under.
pub const MATERIALS_PREFIX: &str = "materials/";

/// Namespace prefix for model paths.
pub const MODELS_PREFIX: &str = "models/";

/// Extension of model files.
pub const MODEL_EXT: &str = ".mdl";

/// Extension of material descriptors.
pub const MATERIAL_EXT: &str = ".vmt";

/// Extension of textures.
pub const TEXTURE_EXT: &str = ".vtf";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    InvalidRoot(std::path::PathBuf),

    #[error("Model not found in index: {0}")]
    ModelNotFound(String),

    #[error("Bad {kind} token: {token}")]
    Selection { kind: &'static str, token: String },
}

pub type Result<T> = std::result::Result<T, Error>;
