//! Identifier normalization for exported token names
//!
//! Variable names arrive as `/`-separated display paths such as
//! `Color/Brand/Primary 500`. Every output grammar needs a flat identifier
//! (`color-brand-primary-500`), and the structured document needs the
//! dotted path form (`Color.Brand.Primary 500`).

/// Flatten a hierarchical name into a lowercase, hyphenated identifier.
///
/// `/` and whitespace become `-`, a lowercase letter followed by an
/// uppercase one is split (`primaryColor` -> `primary-color`), every other
/// character outside `[a-zA-Z0-9-]` becomes `-`, and runs of `-` collapse.
/// Uppercase runs are not split: `HTMLParser` -> `htmlparser`.
pub fn normalize(name: &str) -> String {
    let mut expanded = String::with_capacity(name.len() + 8);
    let mut previous: Option<char> = None;

    for ch in name.chars() {
        if ch == '/' || ch.is_whitespace() {
            expanded.push('-');
        } else if ch.is_ascii_alphanumeric() || ch == '-' {
            if ch.is_ascii_uppercase() && previous.map_or(false, |p| p.is_ascii_lowercase()) {
                expanded.push('-');
            }
            expanded.push(ch);
        } else {
            expanded.push('-');
        }
        previous = Some(ch);
    }

    let mut result = String::with_capacity(expanded.len());
    for ch in expanded.chars() {
        if ch == '-' && (result.is_empty() || result.ends_with('-')) {
            continue;
        }
        result.push(ch.to_ascii_lowercase());
    }

    while result.ends_with('-') {
        result.pop();
    }

    result
}

/// Prepend `<prefix>-` when a non-empty prefix is configured; an empty name stays empty
pub fn prefixed(name: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() && !name.is_empty() => format!("{}-{}", prefix, name),
        _ => name.to_string(),
    }
}

/// Flat identifier of a variable qualified by its collection name
pub fn qualified_name(collection_name: Option<&str>, variable_name: &str) -> String {
    match collection_name {
        Some(collection) => normalize(&format!("{}/{}", collection, variable_name)),
        None => normalize(variable_name),
    }
}

/// Non-empty, trimmed `/` segments of a display name
pub fn name_segments(name: &str) -> Vec<&str> {
    name.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Dotted token path (`Colors.brand.primary`) used by structured-document references
pub fn token_path(collection_name: Option<&str>, variable_name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(collection) = collection_name {
        let collection = collection.trim();
        if !collection.is_empty() {
            segments.push(collection);
        }
    }
    segments.extend(name_segments(variable_name));
    segments.join(".")
}
