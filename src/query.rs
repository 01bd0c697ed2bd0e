//! Collection and variable selection helpers shared by every exporter

use crate::naming::normalize;
use crate::types::{Collection, Variable, VariableSnapshot};
use std::collections::HashSet;

/// Ordering applied to the variables of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// By normalized identifier (what the text exporters emit)
    Normalized,
    /// By raw display name
    Raw,
}

/// Collections in their given order, restricted to `selected` when it is non-empty
pub fn filter_collections<'a>(
    collections: &'a [Collection],
    selected: Option<&HashSet<String>>,
) -> Vec<&'a Collection> {
    match selected {
        Some(ids) if !ids.is_empty() => collections
            .iter()
            .filter(|collection| ids.contains(&collection.id))
            .collect(),
        _ => collections.iter().collect(),
    }
}

/// Variables belonging to `collection`, sorted by `key`; ties keep snapshot order
pub fn collection_variables<'a>(
    snapshot: &'a VariableSnapshot,
    collection: &Collection,
    key: SortKey,
) -> Vec<&'a Variable> {
    let mut variables: Vec<&Variable> = snapshot
        .variables()
        .iter()
        .filter(|variable| variable.collection_id == collection.id)
        .collect();

    match key {
        SortKey::Normalized => variables.sort_by_cached_key(|variable| normalize(&variable.name)),
        SortKey::Raw => variables.sort_by(|a, b| a.name.cmp(&b.name)),
    }

    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mode, ResolvedType};

    fn snapshot() -> VariableSnapshot {
        let collections = vec![
            Collection::new("c1", "Colors", vec![Mode::new("m1", "Default")]),
            Collection::new("c2", "Spacing", vec![Mode::new("m2", "Default")]),
        ];
        let variables = vec![
            Variable::new("v1", "b/Second", ResolvedType::String, "c1"),
            Variable::new("v2", "a/first", ResolvedType::String, "c1"),
            Variable::new("v3", "sm", ResolvedType::Number, "c2"),
            Variable::new("v4", "B/second", ResolvedType::String, "c1"),
            Variable::new("v5", "a/First", ResolvedType::String, "c1"),
        ];
        VariableSnapshot::new(variables, collections)
    }

    #[test]
    fn test_filter_collections() {
        let snapshot = snapshot();
        let all = filter_collections(snapshot.collections(), None);
        assert_eq!(all.len(), 2);

        let empty = HashSet::new();
        assert_eq!(filter_collections(snapshot.collections(), Some(&empty)).len(), 2);

        let selected: HashSet<String> = ["c2".to_string()].into_iter().collect();
        let filtered = filter_collections(snapshot.collections(), Some(&selected));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Spacing");
    }

    #[test]
    fn test_sorted_by_normalized_name_is_stable() {
        let snapshot = snapshot();
        let colors = &snapshot.collections()[0];
        let ids: Vec<&str> = collection_variables(&snapshot, colors, SortKey::Normalized)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        // "a-first" ties keep their snapshot order, as do "b-second"
        assert_eq!(ids, vec!["v2", "v5", "v1", "v4"]);
    }

    #[test]
    fn test_sorted_by_raw_name() {
        let snapshot = snapshot();
        let colors = &snapshot.collections()[0];
        let names: Vec<&str> = collection_variables(&snapshot, colors, SortKey::Raw)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["B/second", "a/First", "a/first", "b/Second"]);
    }
}
