//! Structured token document exporter (DTCG style)
//!
//! Each collection becomes a top-level group keyed by its name, and each
//! variable a token nested under its `/`-separated name segments:
//!
//! ```json
//! { "Colors": { "brand": { "primary": { "$type": "color", "$value": "#0080ff" } } } }
//! ```
//!
//! Multi-mode collections store a map from mode name to value in `$value`.

use crate::directives::{FormatConfig, Unit, DEFAULT_REM_BASE};
use crate::naming::name_segments;
use crate::query::{collection_variables, filter_collections, SortKey};
use crate::resolver::ValueResolver;
use crate::types::{Collection, Variable, VariableSnapshot};
use crate::ExportOptions;
use serde_json::{json, Map, Value};

/// Namespace of the `$extensions` entry written for non-px units
pub const EXTENSION_NAMESPACE: &str = "tokenc";

pub fn export_json(snapshot: &VariableSnapshot, options: &ExportOptions) -> String {
    let document = build_document(snapshot, options);
    serde_json::to_string_pretty(&Value::Object(document)).unwrap_or_else(|_| "{}".to_string())
}

/// The token tree as a JSON object
pub fn build_document(snapshot: &VariableSnapshot, options: &ExportOptions) -> Map<String, Value> {
    // References point into this document, so names are never prefixed here
    let resolver = ValueResolver::new(snapshot, None);
    let mut document = Map::new();

    for collection in filter_collections(snapshot.collections(), options.selected_collections.as_ref()) {
        let mut group = Map::new();

        for variable in collection_variables(snapshot, collection, SortKey::Normalized) {
            let Some(token) = build_token(&resolver, collection, variable) else {
                continue;
            };
            let segments = name_segments(&variable.name);
            if segments.is_empty() {
                insert_token(&mut group, &[variable.id.as_str()], token);
            } else {
                insert_token(&mut group, &segments, token);
            }
        }

        if group.is_empty() {
            continue;
        }
        log::debug!("json: {} top-level entries in '{}'", group.len(), collection.name);

        match document.get_mut(&collection.name) {
            Some(Value::Object(existing)) => existing.extend(group),
            _ => {
                document.insert(collection.name.clone(), Value::Object(group));
            }
        }
    }

    document
}

fn build_token(
    resolver: &ValueResolver<'_>,
    collection: &Collection,
    variable: &Variable,
) -> Option<Map<String, Value>> {
    let value = if collection.modes.len() <= 1 {
        resolver.resolve_token_value(variable, &collection.default_mode_id)?
    } else {
        let mut by_mode = Map::new();
        for mode in &collection.modes {
            if let Some(value) = resolver.resolve_token_value(variable, &mode.mode_id) {
                by_mode.insert(mode.name.clone(), value);
            }
        }
        if by_mode.is_empty() {
            return None;
        }
        Value::Object(by_mode)
    };

    let mut token = Map::new();
    token.insert("$type".to_string(), Value::from(variable.resolved_type.token_type()));
    if !variable.description.trim().is_empty() {
        token.insert("$description".to_string(), Value::from(variable.description.clone()));
    }
    token.insert("$value".to_string(), value);

    let config = FormatConfig::for_description(&variable.description);
    if config.unit != Unit::Px {
        let mut extension = json!({ "unit": config.unit.as_str() });
        if config.unit == Unit::Rem && config.rem_base != DEFAULT_REM_BASE {
            extension["remBase"] = json!(config.rem_base);
        }
        let mut extensions = Map::new();
        extensions.insert(EXTENSION_NAMESPACE.to_string(), extension);
        token.insert("$extensions".to_string(), Value::Object(extensions));
    }

    Some(token)
}

/// Place `token` at `segments`, merging with groups or tokens already there
fn insert_token(root: &mut Map<String, Value>, segments: &[&str], token: Map<String, Value>) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        node = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }

    match node.get_mut(*last) {
        Some(Value::Object(existing)) => existing.extend(token),
        _ => {
            node.insert(last.to_string(), Value::Object(token));
        }
    }
}
