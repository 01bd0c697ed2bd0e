//! Style-sheet custom property exporter

use super::comment_text;
use crate::naming::normalize;
use crate::query::{collection_variables, filter_collections, SortKey};
use crate::resolver::ValueResolver;
use crate::types::{Collection, Mode, VariableSnapshot};
use crate::ExportOptions;

pub const NO_VARIABLES_COMMENT: &str = "/* No variables to export */";

const INDENT: &str = "  ";

/// Render the snapshot as CSS custom properties.
///
/// By default every collection contributes its default-mode values to a
/// single block under `options.selector`. With `use_modes_as_selectors`
/// each (collection, mode) pair gets its own block instead.
pub fn export_css(snapshot: &VariableSnapshot, options: &ExportOptions) -> String {
    let output = if options.use_modes_as_selectors {
        export_mode_blocks(snapshot, options)
    } else {
        export_single_block(snapshot, options)
    };

    output.unwrap_or_else(|| format!("{}\n", NO_VARIABLES_COMMENT))
}

fn declarations(
    resolver: &ValueResolver<'_>,
    snapshot: &VariableSnapshot,
    collection: &Collection,
    mode_id: &str,
) -> Vec<String> {
    collection_variables(snapshot, collection, SortKey::Normalized)
        .into_iter()
        .filter_map(|variable| {
            let name = resolver.token_name(variable);
            // `--` alone is reserved, not a custom property
            if name.is_empty() {
                log::warn!("Variable '{}' has no usable name, skipped", variable.id);
                return None;
            }
            let value = resolver.resolve_variable(variable, mode_id)?;
            Some(format!("{}--{}: {};", INDENT, name, value))
        })
        .collect()
}

fn export_single_block(snapshot: &VariableSnapshot, options: &ExportOptions) -> Option<String> {
    let resolver = ValueResolver::new(snapshot, options.prefix.as_deref());
    let mut groups: Vec<String> = Vec::new();

    for collection in filter_collections(snapshot.collections(), options.selected_collections.as_ref()) {
        let lines = declarations(&resolver, snapshot, collection, &collection.default_mode_id);
        if lines.is_empty() {
            continue;
        }
        log::debug!("css: {} declarations from '{}'", lines.len(), collection.name);

        let mut group = Vec::with_capacity(lines.len() + 2);
        if options.include_collection_comments {
            group.push(format!("{}/* {} */", INDENT, comment_text(&collection.name)));
        }
        if options.include_mode_comments {
            if let Some(mode) = collection.default_mode() {
                group.push(format!("{}/* Mode: {} */", INDENT, comment_text(&mode.name)));
            }
        }
        group.extend(lines);
        groups.push(group.join("\n"));
    }

    if groups.is_empty() {
        return None;
    }

    Some(format!("{} {{\n{}\n}}\n", options.selector, groups.join("\n\n")))
}

fn export_mode_blocks(snapshot: &VariableSnapshot, options: &ExportOptions) -> Option<String> {
    let resolver = ValueResolver::new(snapshot, options.prefix.as_deref());
    let mut blocks: Vec<String> = Vec::new();

    for collection in filter_collections(snapshot.collections(), options.selected_collections.as_ref()) {
        let mut first_block = true;

        for mode in &collection.modes {
            let lines = declarations(&resolver, snapshot, collection, &mode.mode_id);
            if lines.is_empty() {
                continue;
            }
            log::debug!(
                "css: {} declarations from '{}' / '{}'",
                lines.len(),
                collection.name,
                mode.name
            );

            let mut block = String::new();
            if options.include_collection_comments && first_block {
                block.push_str(&format!("/* {} */\n", comment_text(&collection.name)));
            }
            if options.include_mode_comments {
                block.push_str(&format!("/* Mode: {} */\n", comment_text(&mode.name)));
            }
            block.push_str(&format!(
                "{} {{\n{}\n}}",
                mode_selector(collection, mode, &options.selector),
                lines.join("\n")
            ));
            blocks.push(block);
            first_block = false;
        }
    }

    if blocks.is_empty() {
        return None;
    }

    Some(format!("{}\n", blocks.join("\n\n")))
}

/// Selector of one mode block.
///
/// A mode named "default" (any case) and the only mode of a single-mode
/// collection use the base selector; any other mode is addressed by both a
/// `data-theme` attribute and a class derived from its name. A class cannot
/// start with a digit, so such names get a `mode-` prefix on the class only.
pub fn mode_selector(collection: &Collection, mode: &Mode, base_selector: &str) -> String {
    if mode.name.eq_ignore_ascii_case("default") || collection.modes.len() == 1 {
        return base_selector.to_string();
    }

    let mut slug = normalize(&mode.name);
    if slug.is_empty() {
        slug = normalize(&mode.mode_id);
    }
    if slug.is_empty() {
        return base_selector.to_string();
    }

    let class = if slug.starts_with(|c: char| c.is_ascii_digit()) {
        format!("mode-{}", slug)
    } else {
        slug.clone()
    };

    format!("[data-theme=\"{}\"], .{}", slug, class)
}
