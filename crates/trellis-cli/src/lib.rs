//! CLI logic for the Trellis mind-map tool.
//!
//! Three operating modes, selected by flags on [`Args`]:
//!
//! - default: parse the input, estimate node sizes, run the layout engine,
//!   and write the positioned nodes as JSON
//! - `--fmt`: write the canonical markdown serialization
//! - `--check`: verify the parse/serialize round-trip and write nothing

pub mod error_adapter;

mod args;
mod config;
mod measure;

pub use args::Args;

use std::fs;

use log::info;
use serde::Serialize;

use trellis::{LayoutMode, MapBuilder, Node, TrellisError};

use config::ConfigError;

/// JSON payload written by the default layout mode.
#[derive(Debug, Serialize)]
struct LayoutOutput<'a> {
    mode: LayoutMode,
    nodes: &'a [Node],
}

/// Run the Trellis CLI application
///
/// # Errors
///
/// Returns `TrellisError` for file I/O errors, configuration errors,
/// parsing errors, layout errors, and serialization errors.
pub fn run(args: &Args) -> Result<(), TrellisError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = MapBuilder::new(app_config.clone());
    let mut document = builder.parse(&source)?;

    if let Some(mode) = &args.mode {
        let mode: LayoutMode = mode
            .parse()
            .map_err(|err: String| ConfigError::Validation(err))?;
        document.set_layout_mode(mode);
    }

    if args.check {
        let canonical = builder.serialize(&document)?;
        let reparsed = builder.parse(&canonical)?;
        if !document.structurally_equal(&reparsed) {
            return Err(ConfigError::Validation(
                "round-trip check failed: re-parsed structure differs".to_string(),
            )
            .into());
        }
        if builder.serialize(&reparsed)? != canonical {
            return Err(ConfigError::Validation(
                "round-trip check failed: serialization is not byte-stable".to_string(),
            )
            .into());
        }
        info!(nodes = document.nodes().len(); "Round-trip check passed");
        return Ok(());
    }

    if args.fmt {
        let canonical = builder.serialize(&document)?;
        fs::write(&args.output, canonical)?;
        info!(output_file = args.output; "Canonical markdown written");
        return Ok(());
    }

    measure::measure_document(&mut document, app_config.measure());
    let nodes = builder.layout(&document)?;

    let payload = LayoutOutput {
        mode: document.layout_mode(),
        nodes: &nodes,
    };
    let json = serde_json::to_string_pretty(&payload)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output, nodes = nodes.len(); "Layout exported successfully");

    Ok(())
}
