// Tokensync — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: sync, status, list, rename, delete.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Tokensync — keep refresh-tokens.json identical across repository folders.
#[derive(Parser, Debug)]
#[command(name = "tokensync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory whose sub-folders hold the token files (default: home directory).
    #[arg(long, global = true, env = "TOKENSYNC_ROOT")]
    pub root: Option<PathBuf>,

    /// Token file name looked up in each sub-folder.
    #[arg(long, global = true, env = "TOKENSYNC_FILE")]
    pub file_name: Option<String>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge every token file and write the deduplicated union back to all of them.
    Sync,

    /// Show each discovered token file with its record and duplicate counts.
    Status,

    /// List known numbers with their display names.
    List,

    /// Give a display name to every record of a number.
    Rename {
        /// A number from `list`, or its position in the list.
        selection: String,

        /// The new display name.
        name: String,
    },

    /// Delete every record of a number from every token file.
    Delete {
        /// A number from `list`, or its position in the list.
        selection: String,

        /// Skip the interactive confirmation prompt.
        #[arg(long, short = 'y', default_value = "false")]
        yes: bool,
    },
}
