//! Hierarchical selection state.

use std::collections::{HashMap, HashSet};

use super::node::TreeNode;

/// Per-path structural metadata, rebuilt on every reseed.
#[derive(Debug, Default)]
struct NodeMeta {
    /// Parent path (`None` for roots).
    parent: Option<String>,
    /// Every descendant path, pre-order.
    descendants: Vec<String>,
    /// Leaf descendant paths. Empty for leaves and empty categories.
    leaves: Vec<String>,
    /// Whether the node itself is a leaf.
    leaf: bool,
}

/// Tracks which nodes are selected and derives category state from it.
///
/// The set stores node paths. Category checked/indeterminate are never
/// stored: both are computed from leaf-descendant membership on every query,
/// so they cannot drift out of sync with the leaves. Toggles cascade
/// downward over descendants and then reconverge the ancestor chain.
///
/// Operations on a path that is not part of the current tree (a stale
/// reference from before a rebuild) are a programming error and panic.
#[derive(Debug, Default)]
pub struct TreeSelection {
    selected: HashSet<String>,
    meta: HashMap<String, NodeMeta>,
}

impl TreeSelection {
    /// Build selection state for a freshly built forest, seeding the given
    /// leaf paths as selected.
    ///
    /// Ancestors of seeded leaves are converged immediately, so category
    /// membership satisfies the derived-state invariant from the start.
    pub fn seed(roots: &[TreeNode], seeded: &HashSet<String>) -> Self {
        let mut meta = HashMap::new();
        for root in roots {
            index(root, &mut meta);
        }
        let selected: HashSet<String> = seeded
            .iter()
            .filter(|path| meta.contains_key(*path))
            .cloned()
            .collect();
        let mut selection = Self { selected, meta };
        for path in seeded {
            if selection.meta.contains_key(path) {
                selection.check_ancestors(path);
            }
        }
        selection
    }

    fn meta(&self, path: &str) -> &NodeMeta {
        self.meta
            .get(path)
            .unwrap_or_else(|| panic!("operation on stale node path: {path:?}"))
    }

    // -------------------------------------------------------------------------
    // Toggles
    // -------------------------------------------------------------------------

    /// Flip a node's membership, cascading over its whole subtree, then
    /// reconverge the ancestor chain.
    pub fn toggle_node(&mut self, path: &str) {
        let descendants = self.meta(path).descendants.clone();
        if self.selected.contains(path) {
            self.selected.remove(path);
            for descendant in &descendants {
                self.selected.remove(descendant);
            }
        } else {
            self.selected.insert(path.to_string());
            self.selected.extend(descendants);
        }
        self.check_ancestors(path);
    }

    /// Flip a single leaf's membership, then reconverge the ancestor chain.
    ///
    /// # Panics
    ///
    /// Panics if `path` names a category; use [`toggle_node`](Self::toggle_node).
    pub fn toggle_leaf(&mut self, path: &str) {
        assert!(self.meta(path).leaf, "toggle_leaf on category {path:?}");
        if !self.selected.remove(path) {
            self.selected.insert(path.to_string());
        }
        self.check_ancestors(path);
    }

    /// Walk upward from `path`, re-deriving each ancestor's membership.
    ///
    /// Membership is set to exactly "all leaf descendants selected", so the
    /// walk is idempotent and independent of which leaf triggered it.
    pub fn check_ancestors(&mut self, path: &str) {
        let mut current = self.meta(path).parent.clone();
        while let Some(ancestor) = current {
            if self.all_leaves_selected(&ancestor) {
                self.selected.insert(ancestor.clone());
            } else {
                self.selected.remove(&ancestor);
            }
            current = self.meta(&ancestor).parent.clone();
        }
    }

    fn all_leaves_selected(&self, path: &str) -> bool {
        let leaves = &self.meta(path).leaves;
        // A node with no leaf descendants never counts as fully selected;
        // the vacuous truth would force ancestors into the checked state.
        !leaves.is_empty() && leaves.iter().all(|leaf| self.selected.contains(leaf))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether the path is in the selection set.
    pub fn contains(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    /// Whether the node is fully selected.
    ///
    /// For a leaf: set membership. For a category: every leaf descendant is
    /// selected and there is at least one.
    pub fn is_fully_selected(&self, path: &str) -> bool {
        if self.meta(path).leaf {
            self.selected.contains(path)
        } else {
            self.all_leaves_selected(path)
        }
    }

    /// Whether some but not all of the node's leaf descendants are selected.
    ///
    /// Always `false` for leaves and empty categories.
    pub fn is_partially_selected(&self, path: &str) -> bool {
        let meta = self.meta(path);
        if meta.leaf {
            return false;
        }
        let any = meta
            .leaves
            .iter()
            .any(|leaf| self.selected.contains(leaf));
        any && !self.all_leaves_selected(path)
    }

    /// Selected paths, in arbitrary order.
    pub fn selected_paths(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Number of selected paths.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Index a subtree: parent links plus descendant and leaf lists per path.
fn index(node: &TreeNode, meta: &mut HashMap<String, NodeMeta>) {
    let mut descendants = Vec::new();
    let mut leaves = Vec::new();
    for child in node.children() {
        collect(child, &mut descendants, &mut leaves);
    }
    meta.insert(
        node.path().to_string(),
        NodeMeta {
            parent: node.parent().map(str::to_string),
            descendants,
            leaves,
            leaf: node.is_leaf(),
        },
    );
    for child in node.children() {
        index(child, meta);
    }
}

fn collect(node: &TreeNode, descendants: &mut Vec<String>, leaves: &mut Vec<String>) {
    descendants.push(node.path().to_string());
    if node.is_leaf() {
        leaves.push(node.path().to_string());
    }
    for child in node.children() {
        collect(child, descendants, leaves);
    }
}
