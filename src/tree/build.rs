//! Options-tree construction and the inverse model transform.
//!
//! [`build`] turns a nested options mapping (and the current model value)
//! into a seeded node forest; [`serialize`] walks the same shape and emits
//! the selected subset back in the original nested encoding.

use std::collections::HashSet;

use log::warn;
use serde_json::{Map, Value};

use super::node::{TreeNode, child_path};
use super::selection::TreeSelection;

/// Result of a build pass.
#[derive(Debug, Default)]
pub struct Built {
    /// Root nodes, in options insertion order.
    pub roots: Vec<TreeNode>,
    /// Leaf paths seeded selected from the model value.
    pub seeded: HashSet<String>,
}

/// Build the node forest from an options tree, seeding selection from the
/// current model value.
///
/// `None` or a non-mapping value yields an empty forest, not an error.
/// Iteration order is the mapping's insertion order; that order is the sole
/// rendering-order guarantee.
///
/// Value dispatch at each key: `null` is a bare leaf labeled by the key; a
/// nested mapping is a category; a sequence is a category whose children are
/// leaves labeled by each entry; a string is the shorthand "label-as-value"
/// leaf; any other scalar degrades to a leaf labeled by its raw value (logged,
/// siblings unaffected).
pub fn build(options: Option<&Value>, model: Option<&Value>) -> Built {
    let Some(Value::Object(map)) = options else {
        return Built::default();
    };
    let mut seeded = HashSet::new();
    let roots = build_level(map, model, None, &mut seeded);
    Built { roots, seeded }
}

fn build_level(
    map: &Map<String, Value>,
    model: Option<&Value>,
    parent: Option<&str>,
    seeded: &mut HashSet<String>,
) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(map.len());
    for (key, value) in map {
        let path = child_path(parent, key);
        // Same key lookup chain on the model side; a resolved entry (even a
        // null one) marks the corresponding leaf selected.
        let model_child = model.and_then(|m| m.get(key.as_str()));
        match value {
            Value::Null => {
                if model_child.is_some() {
                    seeded.insert(path.clone());
                }
                nodes.push(TreeNode::leaf(key.clone(), path, parent));
            }
            Value::Object(children) => {
                let built = build_level(children, model_child, Some(&path), seeded);
                nodes.push(TreeNode::category(key.clone(), path, parent, built));
            }
            Value::Array(entries) => {
                let mut built = Vec::with_capacity(entries.len());
                for entry in entries {
                    let label = display_label(entry);
                    if !entry.is_string() {
                        warn!("non-string entry under {path:?}; degrading to leaf {label:?}");
                    }
                    let entry_path = child_path(Some(&path), &label);
                    let selected =
                        matches!(model_child, Some(Value::Array(chosen)) if chosen.contains(entry));
                    if selected {
                        seeded.insert(entry_path.clone());
                    }
                    built.push(TreeNode::leaf(label, entry_path, Some(&path)));
                }
                nodes.push(TreeNode::category(key.clone(), path, parent, built));
            }
            Value::String(label) => {
                // Shorthand leaf: the label comes from the value, not the key.
                if model_child.is_some() {
                    seeded.insert(path.clone());
                }
                nodes.push(TreeNode::leaf(label.clone(), path, parent));
            }
            other => {
                warn!("unexpected value at {path:?}; degrading to leaf {other}");
                if model_child.is_some() {
                    seeded.insert(path.clone());
                }
                nodes.push(TreeNode::leaf(other.to_string(), path, parent));
            }
        }
    }
    nodes
}

/// Display label for a leaf-list entry.
fn display_label(value: &Value) -> String {
    match value {
        Value::String(label) => label.clone(),
        other => other.to_string(),
    }
}

/// Serialize the current selection back into the options tree's shape.
///
/// Walks the options mapping: a fully selected category re-emits its original
/// subtree verbatim; a partially selected category recurses and keeps only
/// selected descendants; a key with nothing selected under it is omitted. For
/// leaf-list categories only the individually selected entries are retained,
/// in their original relative order. Empty categories, bare leaves, and
/// shorthand leaves are emitted verbatim when their own path is selected.
pub fn serialize(options: &Value, selection: &TreeSelection) -> Value {
    let Value::Object(map) = options else {
        return Value::Object(Map::new());
    };
    Value::Object(serialize_level(map, selection, None))
}

fn serialize_level(
    map: &Map<String, Value>,
    selection: &TreeSelection,
    parent: Option<&str>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        let path = child_path(parent, key);
        match value {
            Value::Object(children) if !children.is_empty() => {
                if selection.is_fully_selected(&path) {
                    out.insert(key.clone(), value.clone());
                } else {
                    let pruned = serialize_level(children, selection, Some(&path));
                    if !pruned.is_empty() {
                        out.insert(key.clone(), Value::Object(pruned));
                    }
                }
            }
            Value::Array(entries) if !entries.is_empty() => {
                let kept: Vec<Value> = entries
                    .iter()
                    .filter(|entry| {
                        selection.contains(&child_path(Some(&path), &display_label(entry)))
                    })
                    .cloned()
                    .collect();
                if !kept.is_empty() {
                    out.insert(key.clone(), Value::Array(kept));
                }
            }
            // Bare leaves, shorthand leaves, and empty categories all hinge
            // on their own membership.
            other => {
                if selection.contains(&path) {
                    out.insert(key.clone(), other.clone());
                }
            }
        }
    }
    out
}
