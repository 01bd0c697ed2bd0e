//! Core types and constants for the token compiler
//!
//! The host bridge hands over one immutable snapshot of the design file per
//! export request. Variables are kept in an arena (a flat vector plus an id
//! index) so alias targets can be looked up across every collection.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Resolution limits
pub const MAX_ALIAS_DEPTH: usize = 10;

// Inline markers written in place of a value that cannot be resolved
pub const CIRCULAR_REFERENCE_MARKER: &str = "/* circular reference */";
pub const UNRESOLVED_ALIAS_MARKER: &str = "/* unresolved alias */";

/// The declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedType {
    #[serde(rename = "COLOR")]
    Color,
    #[serde(rename = "FLOAT", alias = "NUMBER")]
    Number,
    #[serde(rename = "STRING")]
    String,
    #[serde(rename = "BOOLEAN")]
    Boolean,
}

impl ResolvedType {
    /// `$type` used in the structured token document
    pub fn token_type(&self) -> &'static str {
        match self {
            ResolvedType::Color => "color",
            ResolvedType::Number => "number",
            ResolvedType::String => "string",
            ResolvedType::Boolean => "boolean",
        }
    }
}

fn opaque() -> f64 {
    1.0
}

/// RGBA color with every channel normalized to 0..1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

impl ColorValue {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

/// Reference from one variable value to another variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasReference {
    #[serde(rename = "id")]
    pub target_variable_id: String,
}

/// A stored value as delivered by the host: a literal or an alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Alias(AliasReference),
    Color(ColorValue),
    Boolean(bool),
    Number(f64),
    String(String),
    Null,
}

impl RawValue {
    pub fn alias(target_variable_id: impl Into<String>) -> Self {
        RawValue::Alias(AliasReference {
            target_variable_id: target_variable_id.into(),
        })
    }

    pub fn alias_target(&self) -> Option<&str> {
        match self {
            RawValue::Alias(alias) => Some(&alias.target_variable_id),
            _ => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, RawValue::Alias(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    /// Path name, segments separated by `/`
    pub name: String,
    pub resolved_type: ResolvedType,
    #[serde(default)]
    pub values_by_mode: HashMap<String, RawValue>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "variableCollectionId", alias = "collectionId")]
    pub collection_id: String,
}

impl Variable {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resolved_type: ResolvedType,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resolved_type,
            values_by_mode: HashMap::new(),
            description: String::new(),
            collection_id: collection_id.into(),
        }
    }

    pub fn with_value(mut self, mode_id: impl Into<String>, value: RawValue) -> Self {
        self.values_by_mode.insert(mode_id.into(), value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: String,
    pub name: String,
}

impl Mode {
    pub fn new(mode_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mode_id: mode_id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub modes: Vec<Mode>,
    pub default_mode_id: String,
    #[serde(default)]
    pub variable_ids: Vec<String>,
}

impl Collection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, modes: Vec<Mode>) -> Self {
        let default_mode_id = modes.first().map(|m| m.mode_id.clone()).unwrap_or_default();
        Self {
            id: id.into(),
            name: name.into(),
            modes,
            default_mode_id,
            variable_ids: Vec::new(),
        }
    }

    pub fn mode(&self, mode_id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.mode_id == mode_id)
    }

    pub fn default_mode(&self) -> Option<&Mode> {
        self.mode(&self.default_mode_id)
    }

    pub fn has_mode(&self, mode_id: &str) -> bool {
        self.mode(mode_id).is_some()
    }
}

/// Wire shape of the host snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SnapshotData {
    #[serde(default)]
    variables: Vec<Variable>,
    #[serde(default)]
    collections: Vec<Collection>,
}

/// Immutable variable graph for one export invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SnapshotData", into = "SnapshotData")]
pub struct VariableSnapshot {
    variables: Vec<Variable>,
    collections: Vec<Collection>,
    variable_index: HashMap<String, usize>,
    collection_index: HashMap<String, usize>,
}

impl From<SnapshotData> for VariableSnapshot {
    fn from(data: SnapshotData) -> Self {
        Self::new(data.variables, data.collections)
    }
}

impl From<VariableSnapshot> for SnapshotData {
    fn from(snapshot: VariableSnapshot) -> Self {
        Self {
            variables: snapshot.variables,
            collections: snapshot.collections,
        }
    }
}

impl VariableSnapshot {
    pub fn new(variables: Vec<Variable>, collections: Vec<Collection>) -> Self {
        // First definition wins when the host sends duplicate ids
        let mut variable_index = HashMap::with_capacity(variables.len());
        for (index, variable) in variables.iter().enumerate() {
            variable_index.entry(variable.id.clone()).or_insert(index);
        }

        let mut collection_index = HashMap::with_capacity(collections.len());
        for (index, collection) in collections.iter().enumerate() {
            collection_index.entry(collection.id.clone()).or_insert(index);
        }

        Self {
            variables,
            collections,
            variable_index,
            collection_index,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExportError::snapshot(format!("Failed to parse snapshot JSON: {}", e)))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variable_index.get(id).map(|&index| &self.variables[index])
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collection_index.get(id).map(|&index| &self.collections[index])
    }

    pub fn collection_of(&self, variable: &Variable) -> Option<&Collection> {
        self.collection(&variable.collection_id)
    }

    /// Value for `mode_id`, falling back to the owning collection's default
    /// mode. Used when following aliases into another collection, whose mode
    /// ids never match the consuming collection's.
    pub fn value_for_mode<'s>(&'s self, variable: &'s Variable, mode_id: &str) -> Option<&'s RawValue> {
        variable.values_by_mode.get(mode_id).or_else(|| {
            self.collection_of(variable)
                .and_then(|collection| variable.values_by_mode.get(&collection.default_mode_id))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r#"{
        "variables": [
            {
                "id": "VariableID:1:1",
                "name": "Brand/Primary",
                "resolvedType": "COLOR",
                "valuesByMode": { "1:0": { "r": 0, "g": 0.5, "b": 1 } },
                "description": "format: oklch",
                "variableCollectionId": "VariableCollectionId:1:0"
            },
            {
                "id": "VariableID:1:2",
                "name": "Brand/Link",
                "resolvedType": "COLOR",
                "valuesByMode": { "1:0": { "type": "VARIABLE_ALIAS", "id": "VariableID:1:1" } },
                "variableCollectionId": "VariableCollectionId:1:0"
            },
            {
                "id": "VariableID:1:3",
                "name": "Spacing/Base",
                "resolvedType": "FLOAT",
                "valuesByMode": { "1:0": 16, "1:1": null },
                "collectionId": "VariableCollectionId:1:0"
            },
            {
                "id": "VariableID:1:4",
                "name": "Flags/Beta",
                "resolvedType": "BOOLEAN",
                "valuesByMode": { "1:0": true },
                "variableCollectionId": "VariableCollectionId:1:0"
            }
        ],
        "collections": [
            {
                "id": "VariableCollectionId:1:0",
                "name": "Primitives",
                "modes": [ { "modeId": "1:0", "name": "Light" }, { "modeId": "1:1", "name": "Dark" } ],
                "defaultModeId": "1:0",
                "variableIds": [ "VariableID:1:1", "VariableID:1:2" ]
            }
        ]
    }"#;

    #[test]
    fn test_snapshot_from_host_json() {
        let snapshot = VariableSnapshot::from_json(SNAPSHOT_JSON).unwrap();
        assert_eq!(snapshot.variables().len(), 4);
        assert_eq!(snapshot.collections().len(), 1);

        let primary = snapshot.variable("VariableID:1:1").unwrap();
        assert_eq!(primary.resolved_type, ResolvedType::Color);
        assert_eq!(
            primary.values_by_mode["1:0"],
            RawValue::Color(ColorValue::new(0.0, 0.5, 1.0, 1.0))
        );

        let link = snapshot.variable("VariableID:1:2").unwrap();
        assert_eq!(link.values_by_mode["1:0"].alias_target(), Some("VariableID:1:1"));

        let spacing = snapshot.variable("VariableID:1:3").unwrap();
        assert_eq!(spacing.resolved_type, ResolvedType::Number);
        assert_eq!(spacing.values_by_mode["1:0"], RawValue::Number(16.0));
        assert_eq!(spacing.values_by_mode["1:1"], RawValue::Null);
        assert_eq!(spacing.collection_id, "VariableCollectionId:1:0");

        let beta = snapshot.variable("VariableID:1:4").unwrap();
        assert_eq!(beta.values_by_mode["1:0"], RawValue::Boolean(true));
    }

    #[test]
    fn test_value_for_mode_falls_back_to_default() {
        let snapshot = VariableSnapshot::from_json(SNAPSHOT_JSON).unwrap();
        let primary = snapshot.variable("VariableID:1:1").unwrap();

        assert!(snapshot.value_for_mode(primary, "1:1").is_some());
        assert!(snapshot.value_for_mode(primary, "other-collection-mode").is_some());
    }

    #[test]
    fn test_duplicate_ids_keep_first_definition() {
        let snapshot = VariableSnapshot::new(
            vec![
                Variable::new("a", "First", ResolvedType::String, "c"),
                Variable::new("a", "Second", ResolvedType::String, "c"),
            ],
            vec![],
        );
        assert_eq!(snapshot.variable("a").unwrap().name, "First");
    }

    #[test]
    fn test_invalid_snapshot_is_an_error() {
        let result = VariableSnapshot::from_json(r#"{ "variables": [ { "id": 1 } ] }"#);
        assert!(matches!(result, Err(ExportError::Snapshot { .. })));
    }

    #[test]
    fn test_collection_modes() {
        let collection = Collection::new(
            "c",
            "Theme",
            vec![Mode::new("m1", "Light"), Mode::new("m2", "Dark")],
        );
        assert_eq!(collection.default_mode_id, "m1");
        assert_eq!(collection.default_mode().unwrap().name, "Light");
        assert!(collection.has_mode("m2"));
        assert!(!collection.has_mode("m3"));
    }
}
