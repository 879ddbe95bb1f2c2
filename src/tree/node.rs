//! Tree node model.

/// One node of the options tree: a category or a leaf.
///
/// The parent owns its children; the back-reference is the parent's path
/// identifier, never an owning link. Path identifiers are the `/`-joined key
/// chain from the root, unique across the tree and stable across rebuilds as
/// long as the options shape is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Display label.
    label: String,
    /// Stable path identifier.
    path: String,
    /// Path of the parent node (`None` for roots).
    parent: Option<String>,
    /// Whether this node was built from a leaf-shaped value.
    ///
    /// An empty category also has no children but is not a leaf; it is never
    /// individually selectable through seeding and contributes nothing to
    /// ancestor state.
    leaf: bool,
    /// Ordered children (insertion order of the options mapping).
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub(crate) fn leaf(label: impl Into<String>, path: String, parent: Option<&str>) -> Self {
        Self {
            label: label.into(),
            path,
            parent: parent.map(str::to_string),
            leaf: true,
            children: Vec::new(),
        }
    }

    pub(crate) fn category(
        label: impl Into<String>,
        path: String,
        parent: Option<&str>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            label: label.into(),
            path,
            parent: parent.map(str::to_string),
            leaf: false,
            children,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stable path identifier.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the parent node, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Whether this node is an individually selectable terminal option.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Ordered child nodes (empty for leaves and empty categories).
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Pre-order walk over this node and its subtree.
    ///
    /// `depth` is the number of ancestors of the visited node.
    pub fn walk(&self, depth: u16, f: &mut impl FnMut(&TreeNode, u16)) {
        f(self, depth);
        for child in &self.children {
            child.walk(depth + 1, f);
        }
    }
}

/// Join a parent path and a key into a child path identifier.
pub(crate) fn child_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}/{key}"),
        None => key.to_string(),
    }
}
