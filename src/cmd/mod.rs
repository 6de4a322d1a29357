//! CLI subcommand infrastructure for logdeck.
//!
//! The default action replays a recorded event log; `config` inspects the
//! effective configuration.

pub mod config;
pub mod replay;

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available subcommands for logdeck.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Config file commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the config file
    Validate,
    /// Show effective configuration
    Show,
}

/// Options for replaying an event log.
#[derive(Args, Debug, Default)]
pub struct ReplayArgs {
    /// JSON-lines event log to replay (use - or omit for stdin)
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Show one row per (severity, tag, message) with a count
    #[arg(long)]
    pub collapse: bool,

    /// Only show rows whose message or severity name matches
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Treat --search as a case-insensitive regular expression
    #[arg(long)]
    pub regex: bool,

    /// Only show rows with this tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub hide_info: bool,

    #[arg(long)]
    pub hide_warnings: bool,

    #[arg(long)]
    pub hide_errors: bool,

    /// Print parsed stack frames and the jump target under each row
    #[arg(long)]
    pub frames: bool,

    /// Start from the saved filter preferences instead of the defaults
    #[arg(long)]
    pub use_prefs: bool,

    /// Save the resulting filter as the new preferences
    #[arg(long)]
    pub save_prefs: bool,

    /// Slot file carrying snapshots between runs (default: ~/.config/logdeck/state.json)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Config file to use instead of discovery
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
