// Argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keyscope - scope-aware keyboard shortcut checks for IDE command catalogs
#[derive(Parser, Debug)]
#[command(name = "keyscope")]
#[command(bin_name = "keyscope")]
#[command(about = "Check, search and plan IDE keyboard shortcuts")]
#[command(version)]
pub struct Cli {
    /// Host snapshot (JSON) exported from the IDE
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Configuration file (default: <config dir>/keyscope/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the bindings a new shortcut would replace, hide or be hidden by
    Check {
        /// Binding text, e.g. "Text Editor::Ctrl+K, Ctrl+D"
        #[arg(value_name = "BINDING")]
        binding: String,
    },

    /// Search commands by name
    Search {
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,

        /// Case-sensitive matching
        #[arg(long)]
        match_case: bool,

        /// Substring matching instead of fuzzy matching
        #[arg(long)]
        exact: bool,
    },

    /// List binding scopes, pinned scopes first
    Scopes,

    /// Print the binding list to submit so COMMAND gains BINDING
    Plan {
        /// Canonical command name, e.g. "Edit.Undo"
        #[arg(value_name = "COMMAND")]
        command: String,

        #[arg(value_name = "BINDING")]
        binding: String,
    },
}
