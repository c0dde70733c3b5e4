//! Heuristic material discovery in compiled model binaries.
//!
//! `.mdl` files embed their material directories and names as plain strings.
//! Rather than parse the studio header, scan for runs of path-like bytes and
//! keep the ones that look like material references. Expect false positives;
//! the resolver drops anything that isn't in the file index.

use std::collections::BTreeSet;

use crate::{MATERIALS_PREFIX, MATERIAL_EXT, MODELS_PREFIX};

/// Shortest byte run considered a token.
pub const MIN_TOKEN_LEN: usize = 4;

fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'/' | b'\\' | b'.')
}

/// Split `data` into maximal runs of path-like bytes at least `MIN_TOKEN_LEN` long.
pub fn path_tokens(data: &[u8]) -> impl Iterator<Item = String> + '_ {
    data.split(|&b| !is_path_byte(b))
        .filter(|run| run.len() >= MIN_TOKEN_LEN)
        .map(|run| String::from_utf8_lossy(run).replace('\\', "/"))
}

/// Turn one scanned token into a material candidate, if it looks like one.
pub fn material_candidate(token: &str) -> Option<String> {
    if !token.contains('/') {
        return None;
    }

    let token = token.to_lowercase();
    if token.ends_with(MATERIAL_EXT) {
        if token.starts_with(MATERIALS_PREFIX) {
            return Some(token);
        }
        return Some(format!("{MATERIALS_PREFIX}{token}"));
    }

    if token.contains(MODELS_PREFIX) || token.contains(MATERIALS_PREFIX) {
        let bare = token.strip_prefix(MATERIALS_PREFIX).unwrap_or(&token);
        return Some(format!("{MATERIALS_PREFIX}{bare}{MATERIAL_EXT}"));
    }

    None
}

/// Scan raw model bytes for material path candidates.
pub fn scan_model(data: &[u8]) -> BTreeSet<String> {
    path_tokens(data)
        .filter_map(|token| material_candidate(&token))
        .collect()
}
