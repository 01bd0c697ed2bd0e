//! Preprocessor (SCSS) variable exporter

use crate::query::{collection_variables, filter_collections, SortKey};
use crate::resolver::ValueResolver;
use crate::types::VariableSnapshot;
use crate::ExportOptions;
use regex::Regex;
use std::sync::OnceLock;

pub const NO_VARIABLES_COMMENT: &str = "// No variables to export";

fn custom_property_reference() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"var\(--([A-Za-z0-9_-]+)\)").unwrap())
}

/// Rewrite every `var(--name)` in a resolved value to `$name`
pub fn rewrite_references(value: &str) -> String {
    custom_property_reference()
        .replace_all(value, "$$$1")
        .into_owned()
}

/// Render the default-mode value of every variable as `$name: value;`
///
/// Lines follow the normalized-name order of the other exporters, not
/// dependency order, so an alias can be declared before its target
/// (`$colors-link: $colors-primary;` ahead of `$colors-primary`). Sass
/// resolves variables eagerly and rejects that; consumers compiling this
/// file directly should reorder or load the targets first.
pub fn export_scss(snapshot: &VariableSnapshot, options: &ExportOptions) -> String {
    let resolver = ValueResolver::new(snapshot, options.prefix.as_deref());
    let mut groups: Vec<String> = Vec::new();

    for collection in filter_collections(snapshot.collections(), options.selected_collections.as_ref()) {
        let lines: Vec<String> = collection_variables(snapshot, collection, SortKey::Normalized)
            .into_iter()
            .filter_map(|variable| {
                let name = resolver.token_name(variable);
                if name.is_empty() {
                    log::warn!("Variable '{}' has no usable name, skipped", variable.id);
                    return None;
                }
                let value = resolver.resolve_variable(variable, &collection.default_mode_id)?;
                Some(format!("${}: {};", name, rewrite_references(&value)))
            })
            .collect();

        if lines.is_empty() {
            continue;
        }
        log::debug!("scss: {} variables from '{}'", lines.len(), collection.name);

        let mut group = Vec::with_capacity(lines.len() + 2);
        if options.include_collection_comments {
            group.push(format!("// {}", single_line(&collection.name)));
        }
        if options.include_mode_comments {
            if let Some(mode) = collection.default_mode() {
                group.push(format!("// Mode: {}", single_line(&mode.name)));
            }
        }
        group.extend(lines);
        groups.push(group.join("\n"));
    }

    if groups.is_empty() {
        return format!("{}\n", NO_VARIABLES_COMMENT);
    }

    format!("{}\n", groups.join("\n\n"))
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, ColorValue, Mode, RawValue, ResolvedType, Variable};

    fn snapshot() -> VariableSnapshot {
        let variables = vec![
            Variable::new("blue", "Blue/500", ResolvedType::Color, "prims")
                .with_value("p", RawValue::Color(ColorValue::rgb(0.0, 0.0, 1.0))),
            Variable::new("action", "Action", ResolvedType::Color, "sem")
                .with_value("light", RawValue::alias("blue"))
                .with_value("dark", RawValue::Color(ColorValue::rgb(1.0, 1.0, 1.0))),
            Variable::new("label", "Label", ResolvedType::String, "sem")
                .with_value("light", RawValue::String("Go".into())),
        ];
        let mut semantic = Collection::new(
            "sem",
            "Semantic",
            vec![Mode::new("light", "Light"), Mode::new("dark", "Dark")],
        );
        semantic.default_mode_id = "light".to_string();
        VariableSnapshot::new(
            variables,
            vec![Collection::new("prims", "Primitives", vec![Mode::new("p", "Value")]), semantic],
        )
    }

    #[test]
    fn test_rewrite_references() {
        assert_eq!(rewrite_references("var(--colors-primary)"), "$colors-primary");
        assert_eq!(
            rewrite_references("0 0 var(--a) var(--b-2)"),
            "0 0 $a $b-2"
        );
        assert_eq!(rewrite_references("#ffffff"), "#ffffff");
    }

    #[test]
    fn test_export_scss() {
        let output = export_scss(&snapshot(), &ExportOptions::default());
        assert_eq!(
            output,
            "// Primitives\n// Mode: Value\n$primitives-blue-500: #0000ff;\n\n// Semantic\n// Mode: Light\n$semantic-action: $primitives-blue-500;\n$semantic-label: \"Go\";\n"
        );
        assert!(!output.contains("var("));
    }

    #[test]
    fn test_export_scss_with_prefix_and_no_comments() {
        let options = ExportOptions {
            prefix: Some("ds".to_string()),
            include_collection_comments: false,
            include_mode_comments: false,
            ..ExportOptions::default()
        };
        let output = export_scss(&snapshot(), &options);
        assert_eq!(
            output,
            "$ds-primitives-blue-500: #0000ff;\n\n$ds-semantic-action: $ds-primitives-blue-500;\n$ds-semantic-label: \"Go\";\n"
        );
    }

    #[test]
    fn test_alias_may_precede_its_target() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("p", "primary", ResolvedType::Color, "c")
                    .with_value("m", RawValue::Color(ColorValue::rgb(0.0, 0.5, 1.0))),
                Variable::new("l", "link", ResolvedType::Color, "c")
                    .with_value("m", RawValue::alias("p")),
            ],
            vec![Collection::new("c", "Colors", vec![Mode::new("m", "Default")])],
        );
        let options = ExportOptions {
            include_collection_comments: false,
            include_mode_comments: false,
            ..ExportOptions::default()
        };
        assert_eq!(
            export_scss(&snapshot, &options),
            "$colors-link: $colors-primary;\n$colors-primary: #0080ff;\n"
        );
    }

    #[test]
    fn test_unnameable_variables_are_skipped() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("red", "🔴", ResolvedType::Color, "emoji")
                    .with_value("m", RawValue::Color(ColorValue::rgb(1.0, 0.0, 0.0))),
                Variable::new("ok", "ok", ResolvedType::String, "emoji")
                    .with_value("m", RawValue::String("fine".into())),
            ],
            vec![Collection::new("emoji", "🎨", vec![Mode::new("m", "Default")])],
        );
        let output = export_scss(&snapshot, &ExportOptions::default());
        assert_eq!(output, "// 🎨\n// Mode: Default\n$ok: \"fine\";\n");
        assert!(!output.contains("$:"));

        let lone = VariableSnapshot::new(
            vec![Variable::new("red", "🔴", ResolvedType::Color, "emoji")
                .with_value("m", RawValue::Color(ColorValue::rgb(1.0, 0.0, 0.0)))],
            vec![Collection::new("emoji", "🎨", vec![Mode::new("m", "Default")])],
        );
        assert_eq!(export_scss(&lone, &ExportOptions::default()), "// No variables to export\n");
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            export_scss(&VariableSnapshot::default(), &ExportOptions::default()),
            "// No variables to export\n"
        );
    }
}
