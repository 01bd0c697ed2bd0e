//! Snapshot validation
//!
//! Exporters never fail on a malformed snapshot; they degrade to markers or
//! skip lines. `validate` reports the same problems up front so a caller can
//! decide whether the output is worth writing.

use crate::resolver::{AliasTarget, ValueResolver};
use crate::types::{RawValue, VariableSnapshot, MAX_ALIAS_DEPTH};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One problem found in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Id of the offending variable or collection
    pub subject_id: String,
    pub message: String,
}

impl Diagnostic {
    fn error(subject_id: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            subject_id: subject_id.to_string(),
            message: message.into(),
        }
    }

    fn warning(subject_id: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            subject_id: subject_id.to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.subject_id, self.message)
    }
}

/// Check a snapshot for structural and alias problems.
///
/// Collections are reported first, then variables in snapshot order. Within
/// one variable, mode keys are visited in sorted order.
pub fn validate(snapshot: &VariableSnapshot) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for collection in snapshot.collections() {
        if collection.modes.is_empty() {
            diagnostics.push(Diagnostic::warning(
                &collection.id,
                format!("collection '{}' has no modes", collection.name),
            ));
        } else if !collection.has_mode(&collection.default_mode_id) {
            diagnostics.push(Diagnostic::error(
                &collection.id,
                format!(
                    "default mode '{}' is not a mode of collection '{}'",
                    collection.default_mode_id, collection.name
                ),
            ));
        }
    }

    let resolver = ValueResolver::new(snapshot, None);

    for variable in snapshot.variables() {
        let Some(collection) = snapshot.collection_of(variable) else {
            diagnostics.push(Diagnostic::error(
                &variable.id,
                format!(
                    "variable '{}' belongs to unknown collection '{}'",
                    variable.name, variable.collection_id
                ),
            ));
            continue;
        };

        let mut mode_ids: Vec<&String> = variable.values_by_mode.keys().collect();
        mode_ids.sort();

        for mode_id in mode_ids {
            if !collection.has_mode(mode_id) {
                diagnostics.push(Diagnostic::warning(
                    &variable.id,
                    format!(
                        "value for mode '{}' which collection '{}' does not define",
                        mode_id, collection.name
                    ),
                ));
            }

            match resolver.trace_alias(variable, mode_id) {
                Some(AliasTarget::Missing) => {
                    let target = variable
                        .values_by_mode
                        .get(mode_id)
                        .and_then(RawValue::alias_target)
                        .unwrap_or_default();
                    diagnostics.push(Diagnostic::error(
                        &variable.id,
                        format!(
                            "'{}' aliases missing variable '{}' in mode '{}'",
                            variable.name, target, mode_id
                        ),
                    ));
                }
                Some(AliasTarget::Circular) => {
                    diagnostics.push(Diagnostic::error(
                        &variable.id,
                        format!(
                            "'{}' has a circular alias chain or one longer than {} hops in mode '{}'",
                            variable.name, MAX_ALIAS_DEPTH, mode_id
                        ),
                    ));
                }
                Some(AliasTarget::Found(_)) | None => {}
            }
        }
    }

    log::info!(
        "Validated {} variables: {} errors, {} warnings",
        snapshot.variables().len(),
        diagnostics.iter().filter(|d| d.is_error()).count(),
        diagnostics.iter().filter(|d| !d.is_error()).count()
    );

    diagnostics
}

/// Number of error-severity entries
pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collection, Mode, ResolvedType, Variable};

    fn collection() -> Collection {
        Collection::new("c", "Core", vec![Mode::new("m", "Default")])
    }

    #[test]
    fn test_clean_snapshot() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("a", "a", ResolvedType::Number, "c").with_value("m", RawValue::Number(1.0)),
                Variable::new("b", "b", ResolvedType::Number, "c").with_value("m", RawValue::alias("a")),
            ],
            vec![collection()],
        );
        assert!(validate(&snapshot).is_empty());
    }

    #[test]
    fn test_unknown_collection_and_stray_mode() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("orphan", "orphan", ResolvedType::String, "nowhere"),
                Variable::new("v", "v", ResolvedType::Number, "c")
                    .with_value("m", RawValue::Number(1.0))
                    .with_value("other", RawValue::Number(2.0)),
            ],
            vec![collection()],
        );
        let diagnostics = validate(&snapshot);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].subject_id, "orphan");
        assert!(diagnostics[0].message.contains("nowhere"));
        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert!(diagnostics[1].message.contains("'other'"));
        assert_eq!(error_count(&diagnostics), 1);
    }

    #[test]
    fn test_bad_default_mode() {
        let mut broken = collection();
        broken.default_mode_id = "gone".to_string();
        let diagnostics = validate(&VariableSnapshot::new(Vec::new(), vec![broken]));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].subject_id, "c");
    }

    #[test]
    fn test_alias_problems() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("x", "x", ResolvedType::Color, "c").with_value("m", RawValue::alias("y")),
                Variable::new("y", "y", ResolvedType::Color, "c").with_value("m", RawValue::alias("x")),
                Variable::new("z", "z", ResolvedType::Color, "c").with_value("m", RawValue::alias("ghost")),
            ],
            vec![collection()],
        );
        let diagnostics = validate(&snapshot);
        let subjects: Vec<&str> = diagnostics.iter().map(|d| d.subject_id.as_str()).collect();
        assert_eq!(subjects, vec!["x", "y", "z"]);
        assert!(diagnostics.iter().all(Diagnostic::is_error));
        assert!(diagnostics[2].message.contains("ghost"));
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::warning("v1", "something odd");
        assert_eq!(diagnostic.to_string(), "warning [v1]: something odd");
    }
}
