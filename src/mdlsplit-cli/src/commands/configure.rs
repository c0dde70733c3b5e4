//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting mdlsplit defaults.

use crate::config::{validate_prefix, Config};
use anyhow::Result;

use super::Outcome;

/// Handle the configure command
///
/// # Arguments
/// * `export_prefix` - Optional new default export folder prefix
/// * `page_size` - Optional new listing page size
/// * `show` - If true, show current configuration
pub fn handle(export_prefix: Option<String>, page_size: Option<usize>, show: bool) -> Result<Outcome> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(Outcome::Completed);
    }

    if export_prefix.is_none() && page_size.is_none() {
        show_usage();
        return Ok(Outcome::Completed);
    }

    apply(&mut config, export_prefix, page_size)?;
    config.save()?;

    println!("Export prefix: {}", config.prefix());
    println!("Page size: {}", config.page_size());
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(Outcome::Completed)
}

fn apply(config: &mut Config, export_prefix: Option<String>, page_size: Option<usize>) -> Result<()> {
    if let Some(prefix) = export_prefix {
        validate_prefix(&prefix)?;
        config.export_prefix = Some(prefix);
    }
    if let Some(size) = page_size {
        if size == 0 {
            anyhow::bail!("Page size must be at least 1");
        }
        config.page_size = Some(size);
    }
    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("Export prefix: {}", config.prefix());
    println!("Page size: {}", config.page_size());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: mdlsplit configure --export-prefix PREFIX");
    println!("   or: mdlsplit configure --page-size N");
    println!("   or: mdlsplit configure --show");
}
