//! Design Token Compiler
//!
//! Resolves a snapshot of design variables (typed values grouped into
//! collections with one or more modes, possibly aliasing each other) and
//! renders it as CSS custom properties, SCSS variables, a DTCG-style JSON
//! token document and a TypeScript declaration file.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use tokenc::{export_file_with_options, ExportFormat, ExportOptions, Result};
//!
//! fn main() -> Result<()> {
//!     export_file_with_options("variables.json", "tokens.css", ExportFormat::Css, &ExportOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! # Export Pipeline
//!
//! 1. **Snapshot**: the host JSON is loaded into an id-indexed arena
//! 2. **Query**: collections are filtered by the selection, variables sorted by normalized name
//! 3. **Resolve**: each (variable, mode) value is formatted per its type and description directives;
//!    aliases become native references after their chain is checked for cycles and depth
//! 4. **Render**: the target exporter assembles the resolved values into its grammar
//!
//! Resolution never fails. A broken alias renders as `/* unresolved alias */`
//! and a cyclic or overlong chain as `/* circular reference */`; use
//! [`diagnostics::validate`] to surface those up front.

pub mod types;
pub mod error;
pub mod naming;
pub mod directives;
pub mod color;
pub mod number;
pub mod query;
pub mod resolver;
pub mod exporters;
pub mod diagnostics;
pub mod cli;

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

// Re-export commonly used types and functions
pub use error::{ExportError, Result};
pub use types::*;
pub use directives::{ColorFormat, FormatConfig, PartialFormatConfig, Unit};
pub use resolver::{AliasTarget, ValueResolver};
pub use exporters::{export_css, export_json, export_scss, export_typescript, ExportFormat};
pub use diagnostics::{validate, Diagnostic, Severity};
pub use cli::EnhancedCli;

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Options shared by every exporter
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Selector of the single CSS block, and of default-mode blocks
    pub selector: String,

    /// Emit a comment naming each collection
    pub include_collection_comments: bool,

    /// Emit a comment naming the mode a group of values comes from
    pub include_mode_comments: bool,

    /// One CSS block per (collection, mode) instead of a single block
    pub use_modes_as_selectors: bool,

    /// Prepended to every token name (`ds` gives `--ds-colors-primary`)
    pub prefix: Option<String>,

    /// Collection ids to export; `None` exports all
    pub selected_collections: Option<HashSet<String>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            selector: ":root".to_string(),
            include_collection_comments: true,
            include_mode_comments: true,
            use_modes_as_selectors: false,
            prefix: None,
            selected_collections: None,
        }
    }
}

/// One rendered file, ready to be persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub path: String,
    pub content: String,
}

/// Export statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportStats {
    /// Number of collections in the snapshot
    pub collection_count: usize,

    /// Modes summed over all collections
    pub mode_count: usize,

    /// Number of variables in the snapshot
    pub variable_count: usize,

    /// Stored values that are aliases, over all modes
    pub alias_count: usize,

    /// Alias values whose chain is cyclic or too deep
    pub circular_count: usize,

    /// Alias values whose target does not exist
    pub unresolved_count: usize,

    /// Bytes of rendered output
    pub output_size: u64,

    /// Export time in milliseconds
    pub export_time_ms: u64,
}

/// Render one format
pub fn export(snapshot: &VariableSnapshot, format: ExportFormat, options: &ExportOptions) -> String {
    let start_time = Instant::now();
    let output = format.export(snapshot, options);
    log::info!(
        "Exported {} variables as {} ({} bytes) in {:?}",
        snapshot.variables().len(),
        format,
        output.len(),
        start_time.elapsed()
    );
    output
}

/// Render every format under its default file name
pub fn export_all(snapshot: &VariableSnapshot, options: &ExportOptions) -> Vec<OutputFile> {
    ExportFormat::ALL
        .iter()
        .map(|format| OutputFile {
            path: format.default_file_name().to_string(),
            content: export(snapshot, *format, options),
        })
        .collect()
}

/// Read a host snapshot from disk
pub fn load_snapshot(input_path: &str) -> Result<VariableSnapshot> {
    let source = fs::read_to_string(input_path).map_err(|e| ExportError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;

    let snapshot = VariableSnapshot::from_json(&source)?;
    log::debug!(
        "Loaded {} variables in {} collections from '{}'",
        snapshot.variables().len(),
        snapshot.collections().len(),
        input_path
    );
    Ok(snapshot)
}

/// Main export entry point with default options
pub fn export_file(input_path: &str, output_path: &str, format: ExportFormat) -> Result<ExportStats> {
    export_file_with_options(input_path, output_path, format, &ExportOptions::default())
}

/// Export a snapshot file to a single output file
pub fn export_file_with_options(
    input_path: &str,
    output_path: &str,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportStats> {
    let start_time = Instant::now();
    log::info!("Exporting '{}' to '{}' as {}...", input_path, output_path, format);
    log::debug!("Export options: {:?}", options);

    let snapshot = load_snapshot(input_path)?;
    let output = export(&snapshot, format, options);

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, &output)?;

    let mut stats = compute_stats(&snapshot);
    stats.output_size = output.len() as u64;
    stats.export_time_ms = start_time.elapsed().as_millis() as u64;

    log::info!("Export successful!");
    log::info!("Output size: {} bytes", stats.output_size);
    log::info!("Export time: {}ms", stats.export_time_ms);
    log::debug!("Full stats: {:?}", stats);

    Ok(stats)
}

/// Write a bundle into `directory`, creating it when needed
pub fn write_bundle(directory: &Path, files: &[OutputFile]) -> Result<()> {
    fs::create_dir_all(directory)?;
    for file in files {
        let path = directory.join(&file.path);
        fs::write(&path, &file.content)?;
        log::info!("Wrote {} ({} bytes)", path.display(), file.content.len());
    }
    Ok(())
}

/// Count collections, modes, variables and alias health of a snapshot
pub fn compute_stats(snapshot: &VariableSnapshot) -> ExportStats {
    let resolver = ValueResolver::new(snapshot, None);
    let mut stats = ExportStats {
        collection_count: snapshot.collections().len(),
        mode_count: snapshot.collections().iter().map(|c| c.modes.len()).sum(),
        variable_count: snapshot.variables().len(),
        ..ExportStats::default()
    };

    for variable in snapshot.variables() {
        for mode_id in variable.values_by_mode.keys() {
            match resolver.trace_alias(variable, mode_id) {
                Some(AliasTarget::Found(_)) => stats.alias_count += 1,
                Some(AliasTarget::Circular) => {
                    stats.alias_count += 1;
                    stats.circular_count += 1;
                }
                Some(AliasTarget::Missing) => {
                    stats.alias_count += 1;
                    stats.unresolved_count += 1;
                }
                None => {}
            }
        }
    }

    stats
}

/// Load a snapshot and measure a full export of it
pub fn analyze_snapshot(input_path: &str, options: &ExportOptions) -> Result<ExportStats> {
    let start_time = Instant::now();
    let snapshot = load_snapshot(input_path)?;
    let bundle = export_all(&snapshot, options);

    let mut stats = compute_stats(&snapshot);
    stats.output_size = bundle.iter().map(|file| file.content.len() as u64).sum();
    stats.export_time_ms = start_time.elapsed().as_millis() as u64;
    Ok(stats)
}
