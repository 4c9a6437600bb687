// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use graphql_parser::query as q;

use crate::CatalogError;

/// Maximum nesting depth when resolving a selection set, spreads included.
const MAX_SELECTION_DEPTH: usize = 16;

/// Response shape of a selection set.
///
/// Maps every response key (the alias, or the field name) to the shape
/// selected below it. Leaf fields map to an empty tree. Fragment spreads and
/// inline fragments are merged into the enclosing selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionTree(BTreeMap<String, SelectionTree>);

impl SelectionTree {
    pub fn is_leaf(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SelectionTree> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Key tree of a JSON value. Lists take the shape of their first
    /// element, `null` and scalars are leaves.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Self(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
            serde_json::Value::Array(items) => {
                items.first().map(Self::from_json).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    fn merge(&mut self, other: SelectionTree) {
        for (key, subtree) in other.0 {
            self.0.entry(key).or_default().merge(subtree);
        }
    }

    pub(crate) fn resolve<'a, 'd>(
        selection_set: &'a q::SelectionSet<'d, String>,
        fragments: &HashMap<&'a str, &'a q::FragmentDefinition<'d, String>>,
        visiting: &mut HashSet<&'a str>,
        depth: usize,
    ) -> Result<Self, CatalogError> {
        if depth > MAX_SELECTION_DEPTH {
            return Err(CatalogError::TooDeep(MAX_SELECTION_DEPTH));
        }

        let mut tree = SelectionTree::default();
        for item in &selection_set.items {
            match item {
                q::Selection::Field(field) => {
                    let key = field.alias.as_ref().unwrap_or(&field.name).clone();
                    let subtree =
                        Self::resolve(&field.selection_set, fragments, visiting, depth + 1)?;
                    tree.0.entry(key).or_default().merge(subtree);
                }
                q::Selection::InlineFragment(inline) => {
                    tree.merge(Self::resolve(
                        &inline.selection_set,
                        fragments,
                        visiting,
                        depth + 1,
                    )?);
                }
                q::Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_str();
                    let fragment: &'a q::FragmentDefinition<'d, String> = fragments
                        .get(name)
                        .copied()
                        .ok_or_else(|| CatalogError::UndefinedFragment(name.to_string()))?;
                    if !visiting.insert(name) {
                        return Err(CatalogError::CircularFragment(name.to_string()));
                    }
                    tree.merge(Self::resolve(
                        &fragment.selection_set,
                        fragments,
                        visiting,
                        depth + 1,
                    )?);
                    visiting.remove(name);
                }
            }
        }
        Ok(tree)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for (key, subtree) in &self.0 {
            if subtree.is_leaf() {
                writeln!(f, "{:indent$}{key}", "")?;
            } else {
                writeln!(f, "{:indent$}{key} {{", "")?;
                subtree.write_indented(f, indent + 2)?;
                writeln!(f, "{:indent$}}}", "")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SelectionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Fragment definitions of a parsed document, by name.
pub(crate) fn fragment_definitions<'a, 'd>(
    document: &'a q::Document<'d, String>,
) -> HashMap<&'a str, &'a q::FragmentDefinition<'d, String>> {
    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            q::Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
            _ => None,
        })
        .collect()
}
