//! CLI argument definitions for mdlsplit

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdlsplit")]
#[command(about = "Split single models (with materials and textures) out of an extracted content pack")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Pack root containing models/ and/or materials/ (default: current directory)
    pub root: Option<PathBuf>,

    /// Folder name prefix for export units (default: EXPORTED)
    #[arg(long, global = true, env = "MDLSPLIT_PREFIX")]
    pub prefix: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the numbered model listing
    #[command(visible_alias = "l")]
    List {
        /// Pack root (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Export a selection of models without prompting
    #[command(visible_alias = "e")]
    Export {
        /// Pack root (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Selection expression, e.g. "1,5-7,12" or "all"
        #[arg(short, long)]
        select: String,
    },

    /// Show the files a model depends on
    #[command(visible_alias = "d")]
    Deps {
        /// Model path (any case) or its number in the listing
        model: String,

        /// Pack root (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default export folder prefix
        #[arg(long)]
        export_prefix: Option<String>,

        /// Set how many models are listed before pausing
        #[arg(long)]
        page_size: Option<usize>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
