//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the layout mode,
//! the operating mode (layout, format, round-trip check), configuration
//! file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Trellis mind-map tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input markdown file
    #[arg(help = "Path to the input markdown file")]
    pub input: String,

    /// Path to the output file (JSON layout, or markdown with --fmt)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Layout mode override (radial, horizontal); defaults to the document's directive
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Verify the parse/serialize round-trip instead of producing output
    #[arg(long)]
    pub check: bool,

    /// Write the canonical markdown serialization instead of a layout
    #[arg(long)]
    pub fmt: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
