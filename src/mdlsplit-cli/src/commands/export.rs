//! Export commands: interactive selection and batch `--select`.

use anyhow::{bail, Context, Result};
use mdlsplit::manifest::MANIFEST_FILE;
use mdlsplit::{export_model, parse_selection, ExportNumbering};
use std::io::{self, Write};
use std::path::Path;

use super::{Outcome, Pack, Settings};
use crate::prompt::{display_name, print_models, prompt_selection};

/// Result of exporting a selection.
#[derive(Debug, Default)]
pub struct Summary {
    pub created: Vec<String>,
    pub failures: usize,
}

/// Create one unit and export `model` into it, returning the unit name.
fn export_one<W: Write>(
    out: &mut W,
    pack: &Pack,
    numbering: &mut ExportNumbering,
    model: &str,
) -> Result<String> {
    let (name, dir) = numbering
        .create_next()
        .context("Failed to create export folder")?;
    writeln!(out, "  -> {}: {}", name, display_name(model))?;

    let report = export_model(&pack.index, model, &dir)
        .with_context(|| format!("Failed to export {}", model))?;

    if !report.missing.is_empty() {
        tracing::warn!(
            "Missing {} referenced file(s). See {}",
            report.missing.len(),
            dir.join(MANIFEST_FILE).display()
        );
    }
    Ok(name)
}

/// Export each picked model (1-based) into its own unit. A failing model is
/// logged and counted; the rest still run.
pub fn export_picks<W: Write>(
    out: &mut W,
    pack: &Pack,
    picks: &[usize],
    prefix: &str,
) -> Result<Summary> {
    let mut numbering = ExportNumbering::scan(pack.index.root(), prefix)
        .context("Failed to scan for existing export folders")?;
    let mut summary = Summary::default();

    writeln!(out, "\nExporting {} props...", picks.len())?;

    for &pick in picks {
        let Some(model) = pick.checked_sub(1).and_then(|i| pack.models.get(i)) else {
            continue;
        };

        match export_one(out, pack, &mut numbering, model) {
            Ok(name) => summary.created.push(name),
            Err(e) => {
                summary.failures += 1;
                tracing::error!("{:#}", e);
            }
        }
    }

    Ok(summary)
}

pub fn print_summary<W: Write>(out: &mut W, summary: &Summary) -> Result<()> {
    writeln!(out, "\n=== Done ===")?;
    writeln!(out, "Created: {} folder(s):", summary.created.len())?;
    for name in &summary.created {
        writeln!(out, "  {}", name)?;
    }
    if summary.failures > 0 {
        writeln!(out, "Failures: {} (see stderr for details)", summary.failures)?;
    }
    Ok(())
}

/// List models, prompt for a selection and export it.
pub fn interactive(root: &Path, settings: &Settings) -> Result<Outcome> {
    let pack = Pack::open(root, &settings.prefix)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Addon root: {}", root.display())?;

    let listed = print_models(
        &mut out,
        &pack.models,
        Some((&mut input, settings.page_size)),
    )?;
    if !listed {
        writeln!(out, "\nCancelled.")?;
        return Ok(Outcome::Cancelled);
    }

    let Some(picks) = prompt_selection(&mut out, &mut input, pack.models.len())? else {
        writeln!(out, "\nCancelled.")?;
        return Ok(Outcome::Cancelled);
    };

    let summary = export_picks(&mut out, &pack, &picks, &settings.prefix)?;
    print_summary(&mut out, &summary)?;
    Ok(Outcome::Completed)
}

/// Export the models matched by `select` without prompting.
pub fn batch(root: &Path, select: &str, settings: &Settings) -> Result<Outcome> {
    let pack = Pack::open(root, &settings.prefix)?;

    let picks = parse_selection(select, pack.models.len())?;
    if picks.is_empty() {
        bail!("Nothing selected (pack has {} models)", pack.models.len());
    }

    let mut out = io::stdout().lock();
    let summary = export_picks(&mut out, &pack, &picks, &settings.prefix)?;
    print_summary(&mut out, &summary)?;
    Ok(Outcome::Completed)
}
