//! Flat projection of the node forest.
//!
//! Converts the nested node graph into the ordered flat sequence consumed by
//! flat/virtualized tree renderers. Entries are cheap-clone handles cached by
//! path, so a re-flatten after an incidental rebuild hands consumers the same
//! handles back and UI state keyed on node identity (expansion, focus)
//! survives.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::node::TreeNode;
use super::selection::TreeSelection;

/// Mutable fields of a flat entry, refreshed on every flatten pass.
#[derive(Debug)]
struct FlatState {
    depth: u16,
    expandable: bool,
    checked: bool,
    indeterminate: bool,
}

#[derive(Debug)]
struct FlatShared {
    label: String,
    path: String,
    state: RwLock<FlatState>,
}

/// One entry of the flattened render sequence.
///
/// Cheap-clone handle. The flattener reuses the same handle for a given path
/// across refresh passes and only rewrites the mutable fields, so
/// [`FlatNode::ptr_eq`] holds across rebuilds of an unchanged shape.
#[derive(Debug, Clone)]
pub struct FlatNode {
    shared: Arc<FlatShared>,
}

impl FlatNode {
    fn new(node: &TreeNode, depth: u16, checked: bool, indeterminate: bool) -> Self {
        Self {
            shared: Arc::new(FlatShared {
                label: node.label().to_string(),
                path: node.path().to_string(),
                state: RwLock::new(FlatState {
                    depth,
                    expandable: !node.is_leaf(),
                    checked,
                    indeterminate,
                }),
            }),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Stable path identifier.
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    /// Nesting depth (number of ancestors).
    pub fn depth(&self) -> u16 {
        self.shared.state.read().map(|s| s.depth).unwrap_or(0)
    }

    /// Whether the node can be expanded (not a leaf).
    pub fn is_expandable(&self) -> bool {
        self.shared.state.read().map(|s| s.expandable).unwrap_or(false)
    }

    /// Mirror of the node's selection membership.
    pub fn is_checked(&self) -> bool {
        self.shared.state.read().map(|s| s.checked).unwrap_or(false)
    }

    /// Mirror of the node's partial-selection state (some but not all leaf
    /// descendants selected).
    pub fn is_indeterminate(&self) -> bool {
        self.shared
            .state
            .read()
            .map(|s| s.indeterminate)
            .unwrap_or(false)
    }

    /// Whether two handles are the same flat node.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.shared, &b.shared)
    }

    fn refresh(&self, node: &TreeNode, depth: u16, checked: bool, indeterminate: bool) {
        if let Ok(mut state) = self.shared.state.write() {
            state.depth = depth;
            state.expandable = !node.is_leaf();
            state.checked = checked;
            state.indeterminate = indeterminate;
        }
    }

    fn set_selection(&self, checked: bool, indeterminate: bool) {
        if let Ok(mut state) = self.shared.state.write() {
            state.checked = checked;
            state.indeterminate = indeterminate;
        }
    }
}

/// Re-derives the flat sequence while preserving handle identity by path.
#[derive(Debug, Default)]
pub struct Flattener {
    cache: HashMap<String, FlatNode>,
    flat: Vec<FlatNode>,
}

impl Flattener {
    /// Create an empty flattener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the flat sequence in pre-order (parent immediately followed
    /// by its subtree), one entry per node.
    ///
    /// Handles for paths seen in a previous pass are reused with their
    /// mutable fields rewritten; handles for vanished paths are dropped from
    /// the cache.
    pub fn refresh(&mut self, roots: &[TreeNode], selection: &TreeSelection) {
        let mut previous = std::mem::take(&mut self.cache);
        self.flat.clear();
        for root in roots {
            root.walk(0, &mut |node, depth| {
                let checked = selection.contains(node.path());
                let indeterminate = selection.is_partially_selected(node.path());
                let entry = match previous.remove(node.path()) {
                    Some(existing) => {
                        existing.refresh(node, depth, checked, indeterminate);
                        existing
                    }
                    None => FlatNode::new(node, depth, checked, indeterminate),
                };
                self.cache.insert(node.path().to_string(), entry.clone());
                self.flat.push(entry);
            });
        }
    }

    /// Re-mirror checked/indeterminate flags after a selection change,
    /// without reordering.
    pub(crate) fn refresh_checked(&self, selection: &TreeSelection) {
        for entry in &self.flat {
            entry.set_selection(
                selection.contains(entry.path()),
                selection.is_partially_selected(entry.path()),
            );
        }
    }

    /// The current flat sequence, in render order.
    pub fn nodes(&self) -> &[FlatNode] {
        &self.flat
    }

    /// Look up a flat node by path.
    pub fn get(&self, path: &str) -> Option<&FlatNode> {
        self.cache.get(path)
    }

    /// Number of flat entries.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }
}
