//! VMT material descriptor parsing.
//!
//! This is a pattern scan over the text, not a KeyValues parser. It pulls out
//! texture references and `include` references and normalizes both into
//! pack-relative paths under `materials/`.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{MATERIALS_PREFIX, MATERIAL_EXT, TEXTURE_EXT};

/// Keys whose values name a texture (compared lower-case, without `$`).
pub const TEXTURE_KEYS: &[&str] = &[
    "basetexture",
    "basetexture2",
    "bumpmap",
    "normalmap",
    "phongalbedotint",
    "phongexponenttexture",
    "selfillumtint",
    "lightwarptexture",
    "detail",
    "envmapmask",
    "ambientoccltexture",
    "blendmodulatetexture",
    "albedo",
    "heightmap",
    "mraotexture",
    "roughnesstexture",
    "metalictexture",
];

/// Keys whose values name another material to pull in.
pub const INCLUDE_KEYS: &[&str] = &["include"];

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());

/// `"key" "value"` and `"$key" "value"`
static QUOTED_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"\$?([a-z0-9_]+)"\s*"([^"]+)""#).unwrap());

/// `$key value` and `$key "value"`
static DOLLAR_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|[^"$a-z0-9_])\$([a-z0-9_]+)\s+(?:"([^"]+)"|([^\s"}]+))"#).unwrap()
});

/// References found in one material file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialRefs {
    /// Texture candidates, `materials/...vtf`
    pub textures: BTreeSet<String>,
    /// Nested material candidates, `materials/...vmt`
    pub includes: BTreeSet<String>,
}

impl MaterialRefs {
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.includes.is_empty()
    }
}

/// Extract raw `(key, value)` pairs from material text, comments removed.
pub fn key_values(text: &str) -> Vec<(String, String)> {
    let text = LINE_COMMENT.replace_all(text, "");

    let quoted = QUOTED_PAIR
        .captures_iter(&text)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()));

    let dollar = DOLLAR_PAIR.captures_iter(&text).filter_map(|cap| {
        let value = cap.get(2).or_else(|| cap.get(3))?;
        Some((cap[1].to_string(), value.as_str().to_string()))
    });

    quoted.chain(dollar).collect()
}

/// Normalize a material value into a path under `materials/` ending in `ext`.
///
/// The prefix check is textual; `materials/materials/x` is left alone.
pub fn normalize_reference(value: &str, ext: &str) -> Option<String> {
    let mut path = value.replace('\\', "/").trim().to_lowercase();
    if path.is_empty() {
        return None;
    }
    if !path.ends_with(ext) {
        path.push_str(ext);
    }
    if !path.starts_with(MATERIALS_PREFIX) {
        path.insert_str(0, MATERIALS_PREFIX);
    }
    Some(path)
}

/// Parse material text into its texture and include references.
pub fn parse_material(text: &str) -> MaterialRefs {
    let mut refs = MaterialRefs::default();

    for (key, value) in key_values(text) {
        let key = key.to_lowercase();
        if TEXTURE_KEYS.contains(&key.as_str()) {
            refs.textures.extend(normalize_reference(&value, TEXTURE_EXT));
        } else if INCLUDE_KEYS.contains(&key.as_str()) {
            refs.includes.extend(normalize_reference(&value, MATERIAL_EXT));
        }
    }

    refs
}
