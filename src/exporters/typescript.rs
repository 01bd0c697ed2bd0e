//! Type declaration exporter
//!
//! Emits a union of every exported token name plus a template-literal type
//! for the matching custom property.

use crate::query::{collection_variables, filter_collections, SortKey};
use crate::resolver::ValueResolver;
use crate::types::VariableSnapshot;
use crate::ExportOptions;
use std::collections::BTreeSet;

pub const NO_VARIABLES_COMMENT: &str = "// No variables to export";
pub const HEADER_COMMENT: &str = "// Generated by tokenc. Do not edit.";

pub fn export_typescript(snapshot: &VariableSnapshot, options: &ExportOptions) -> String {
    let resolver = ValueResolver::new(snapshot, options.prefix.as_deref());

    let names: BTreeSet<String> =
        filter_collections(snapshot.collections(), options.selected_collections.as_ref())
            .into_iter()
            .flat_map(|collection| collection_variables(snapshot, collection, SortKey::Raw))
            .map(|variable| resolver.token_name(variable))
            .filter(|name| !name.is_empty())
            .collect();

    if names.is_empty() {
        return format!("{}\n", NO_VARIABLES_COMMENT);
    }
    log::debug!("typescript: {} token names", names.len());

    let members: Vec<String> = names
        .iter()
        .map(|name| format!("  | '{}'", escape(name)))
        .collect();

    format!(
        "{}\nexport type DesignTokenName =\n{};\n\nexport type CssVariable = `--${{DesignTokenName}}`;\n",
        HEADER_COMMENT,
        members.join("\n")
    )
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}
