//! Dependency inspection for a single model

use anyhow::{Context, Result};
use mdlsplit::{resolve, Dependencies};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use super::{Outcome, Pack, Settings};

/// Accept either a listing number or a model path (any case).
fn pick_model(pack: &Pack, arg: &str) -> Result<String> {
    if let Ok(n) = arg.trim().parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| pack.models.get(i))
            .cloned()
            .with_context(|| format!("No model #{} (pack has {})", n, pack.models.len()));
    }

    pack.index
        .resolve(arg)
        .map(str::to_string)
        .with_context(|| format!("Model not found: {}", arg))
}

fn write_section<W: Write>(out: &mut W, title: &str, items: &BTreeSet<String>) -> Result<()> {
    writeln!(out, "{} ({}):", title, items.len())?;
    for item in items {
        writeln!(out, "  {}", item)?;
    }
    Ok(())
}

pub fn write_text<W: Write>(out: &mut W, deps: &Dependencies) -> Result<()> {
    writeln!(out, "Model: {}", deps.model)?;
    write_section(out, "Model files", &deps.model_files)?;
    write_section(out, "Materials", &deps.materials)?;
    write_section(out, "Textures", &deps.textures)?;
    if !deps.unresolved.is_empty() {
        write_section(out, "Missing", &deps.unresolved)?;
    }
    Ok(())
}

pub fn handle(root: &Path, model: &str, json: bool, settings: &Settings) -> Result<Outcome> {
    let pack = Pack::open(root, &settings.prefix)?;
    let model = pick_model(&pack, model)?;
    let deps = resolve(&pack.index, &model)
        .with_context(|| format!("Failed to resolve {}", model))?;

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&deps)?)?;
    } else {
        write_text(&mut out, &deps)?;
    }
    Ok(Outcome::Completed)
}
