//! Value resolution for (variable, mode) pairs
//!
//! Literals are formatted according to the variable's declared type and its
//! description directives. Aliases are emitted as native references to the
//! target token, never as the target's literal, so the exported files keep
//! the same reference graph as the design file.
//!
//! Before an alias is emitted its chain is walked with an explicit depth
//! counter and a visited set local to that one resolution. A chain longer
//! than [`MAX_ALIAS_DEPTH`] or one that revisits a variable renders as
//! [`CIRCULAR_REFERENCE_MARKER`]; a missing target renders as
//! [`UNRESOLVED_ALIAS_MARKER`]. Nothing in here fails.

use crate::color;
use crate::directives::FormatConfig;
use crate::naming::{prefixed, qualified_name, token_path};
use crate::number;
use crate::types::*;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of following an alias chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AliasTarget<'a> {
    /// The immediate target exists and its chain terminates
    Found(&'a Variable),
    /// The chain revisits a variable or exceeds the depth limit
    Circular,
    /// The immediate target id names no variable
    Missing,
}

pub struct ValueResolver<'a> {
    snapshot: &'a VariableSnapshot,
    prefix: Option<&'a str>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(snapshot: &'a VariableSnapshot, prefix: Option<&'a str>) -> Self {
        Self { snapshot, prefix }
    }

    pub fn snapshot(&self) -> &'a VariableSnapshot {
        self.snapshot
    }

    /// Flat, prefixed identifier of a variable (`ds-colors-primary`)
    pub fn token_name(&self, variable: &Variable) -> String {
        let collection_name = self
            .snapshot
            .collection_of(variable)
            .map(|collection| collection.name.as_str());
        prefixed(&qualified_name(collection_name, &variable.name), self.prefix)
    }

    /// Dotted path of a variable inside the structured document
    pub fn token_path(&self, variable: &Variable) -> String {
        let collection_name = self
            .snapshot
            .collection_of(variable)
            .map(|collection| collection.name.as_str());
        token_path(collection_name, &variable.name)
    }

    /// Style-sheet reference to a variable: `var(--name)`
    pub fn reference(&self, variable: &Variable) -> String {
        format!("var(--{})", self.token_name(variable))
    }

    /// Resolve the value `variable` stores for `mode_id`.
    ///
    /// Returns `None` when the variable has no value for that mode.
    pub fn resolve_variable(&self, variable: &Variable, mode_id: &str) -> Option<String> {
        let value = variable.values_by_mode.get(mode_id)?;
        let config = FormatConfig::for_description(&variable.description);
        let mut visited = HashSet::from([variable.id.clone()]);

        let resolved = self.resolve(
            value,
            mode_id,
            variable.resolved_type,
            &config,
            0,
            &mut visited,
        );
        Some(resolved)
    }

    /// Resolve one raw value to its style-sheet text
    pub fn resolve(
        &self,
        value: &RawValue,
        mode_id: &str,
        resolved_type: ResolvedType,
        config: &FormatConfig,
        depth: usize,
        visited: &mut HashSet<String>,
    ) -> String {
        if depth > MAX_ALIAS_DEPTH {
            log::warn!("Alias depth limit ({}) exceeded", MAX_ALIAS_DEPTH);
            return CIRCULAR_REFERENCE_MARKER.to_string();
        }

        match value {
            RawValue::Alias(alias) => {
                match self.follow_alias(&alias.target_variable_id, mode_id, depth, visited) {
                    AliasTarget::Found(target) => self.reference(target),
                    AliasTarget::Circular => CIRCULAR_REFERENCE_MARKER.to_string(),
                    AliasTarget::Missing => UNRESOLVED_ALIAS_MARKER.to_string(),
                }
            }
            literal => format_literal(literal, resolved_type, config),
        }
    }

    /// Resolve the value `variable` stores for `mode_id` for the structured
    /// document: aliases become `{Collection.path}` and colors are always hex.
    pub fn resolve_token_value(&self, variable: &Variable, mode_id: &str) -> Option<Value> {
        let value = variable.values_by_mode.get(mode_id)?;
        let mut visited = HashSet::from([variable.id.clone()]);
        Some(self.format_raw_value(value, mode_id, variable.resolved_type, &mut visited))
    }

    /// Raw-value formatter of the structured document
    pub fn format_raw_value(
        &self,
        value: &RawValue,
        mode_id: &str,
        resolved_type: ResolvedType,
        visited: &mut HashSet<String>,
    ) -> Value {
        match (resolved_type, value) {
            (_, RawValue::Alias(alias)) => {
                match self.follow_alias(&alias.target_variable_id, mode_id, 0, visited) {
                    AliasTarget::Found(target) => {
                        Value::String(format!("{{{}}}", self.token_path(target)))
                    }
                    AliasTarget::Circular => Value::String(CIRCULAR_REFERENCE_MARKER.to_string()),
                    AliasTarget::Missing => Value::String(UNRESOLVED_ALIAS_MARKER.to_string()),
                }
            }
            (ResolvedType::Color, RawValue::Color(color)) => Value::String(color::to_hex(color)),
            (ResolvedType::Number, RawValue::Number(n)) if n.is_finite() => json_number(*n),
            (ResolvedType::String, RawValue::String(s)) => Value::String(s.clone()),
            (ResolvedType::Boolean, RawValue::Boolean(b)) => Value::Bool(*b),
            (expected, other) => {
                log::debug!("{:?} value does not match declared type {:?}", other, expected);
                Value::String(coerce_to_string(other))
            }
        }
    }

    /// Follow the alias chain starting at `target_id`.
    ///
    /// `depth` is the depth of the alias value itself; each hop adds one.
    /// `visited` is extended with every variable entered.
    pub fn follow_alias(
        &self,
        target_id: &str,
        mode_id: &str,
        depth: usize,
        visited: &mut HashSet<String>,
    ) -> AliasTarget<'a> {
        if visited.contains(target_id) {
            log::warn!("Circular alias through variable '{}'", target_id);
            return AliasTarget::Circular;
        }

        let Some(target) = self.snapshot.variable(target_id) else {
            log::warn!("Alias target '{}' does not exist", target_id);
            return AliasTarget::Missing;
        };
        visited.insert(target.id.clone());

        let mut current = target;
        let mut depth = depth + 1;
        loop {
            if depth > MAX_ALIAS_DEPTH {
                log::warn!(
                    "Alias chain from '{}' exceeds {} hops",
                    target_id,
                    MAX_ALIAS_DEPTH
                );
                return AliasTarget::Circular;
            }

            let next_id = match self.snapshot.value_for_mode(current, mode_id) {
                Some(RawValue::Alias(next)) => &next.target_variable_id,
                _ => break,
            };

            if visited.contains(next_id.as_str()) {
                log::warn!("Circular alias through variable '{}'", next_id);
                return AliasTarget::Circular;
            }

            // A dangling link further down is reported on its own variable
            let Some(next) = self.snapshot.variable(next_id) else {
                break;
            };
            visited.insert(next.id.clone());
            current = next;
            depth += 1;
        }

        AliasTarget::Found(target)
    }

    /// Classify the alias stored in `variable` for `mode_id` without rendering it
    pub fn trace_alias(&self, variable: &Variable, mode_id: &str) -> Option<AliasTarget<'a>> {
        let target_id = variable.values_by_mode.get(mode_id)?.alias_target()?;
        let mut visited = HashSet::from([variable.id.clone()]);
        Some(self.follow_alias(target_id, mode_id, 0, &mut visited))
    }
}

/// Format a non-alias value by declared type
pub fn format_literal(value: &RawValue, resolved_type: ResolvedType, config: &FormatConfig) -> String {
    match (resolved_type, value) {
        (ResolvedType::Color, RawValue::Color(c)) => color::format(c, config.color_format),
        (ResolvedType::Number, RawValue::Number(n)) if n.is_finite() => number::format(*n, config),
        (ResolvedType::String, RawValue::String(s)) => quote(s),
        (ResolvedType::Boolean, RawValue::Boolean(b)) => (if *b { "1" } else { "0" }).to_string(),
        (expected, other) => {
            log::debug!("{:?} value does not match declared type {:?}", other, expected);
            coerce_to_string(other)
        }
    }
}

/// Double-quoted string literal with `\` and `"` escaped
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Generic text form of a value whose shape does not match its declared type
pub fn coerce_to_string(value: &RawValue) -> String {
    match value {
        RawValue::Alias(alias) => alias.target_variable_id.clone(),
        RawValue::Color(c) => color::to_hex(c),
        RawValue::Boolean(b) => b.to_string(),
        RawValue::Number(n) => number::clean_default(*n),
        RawValue::String(s) => s.clone(),
        RawValue::Null => String::new(),
    }
}

fn json_number(value: f64) -> Value {
    // Integral values stay integers in the document
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Value::from(value as i64);
    }
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(number::clean_default(value)))
}
