//! Output grammars
//!
//! Each exporter walks the selected collections in order, their variables
//! sorted by normalized name, and asks the [`ValueResolver`](crate::resolver::ValueResolver)
//! for every value it writes.

pub mod css;
pub mod json;
pub mod scss;
pub mod typescript;

use crate::types::VariableSnapshot;
use crate::ExportOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use css::export_css;
pub use json::export_json;
pub use scss::export_scss;
pub use typescript::export_typescript;

/// Supported output targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Css,
    Scss,
    Json,
    Typescript,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Css,
        ExportFormat::Scss,
        ExportFormat::Json,
        ExportFormat::Typescript,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "css" => Some(ExportFormat::Css),
            "scss" | "sass" => Some(ExportFormat::Scss),
            "json" | "dtcg" => Some(ExportFormat::Json),
            "ts" | "typescript" | "d.ts" => Some(ExportFormat::Typescript),
            _ => None,
        }
    }

    /// File name used when writing an export bundle
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Css => "tokens.css",
            ExportFormat::Scss => "_tokens.scss",
            ExportFormat::Json => "tokens.json",
            ExportFormat::Typescript => "tokens.d.ts",
        }
    }

    pub fn export(&self, snapshot: &VariableSnapshot, options: &ExportOptions) -> String {
        match self {
            ExportFormat::Css => export_css(snapshot, options),
            ExportFormat::Scss => export_scss(snapshot, options),
            ExportFormat::Json => export_json(snapshot, options),
            ExportFormat::Typescript => export_typescript(snapshot, options),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
            ExportFormat::Json => "json",
            ExportFormat::Typescript => "typescript",
        };
        f.write_str(name)
    }
}

/// Text safe to embed in a `/* */` comment
pub(crate) fn comment_text(text: &str) -> String {
    text.replace("*/", "* /").replace('\n', " ")
}
