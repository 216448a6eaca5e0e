//! CLI subcommand implementations for the maskbind binary.

pub mod bind_cmd;
pub mod doctor;
pub mod format_cmd;
pub mod probe_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "maskbind",
    version,
    about = "Bind phone input masks to live web pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bind masks on a live page and report what was attached.
    Bind(bind_cmd::BindArgs),
    /// Format a stored phone value for display.
    Format { value: String },
    /// Strip a phone value to digits only.
    Strip { value: String },
    /// HEAD-check the vendor script CDNs.
    Probe,
    /// Check the local environment (browser present, headless launch works).
    Doctor,
}
