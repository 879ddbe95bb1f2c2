//! Tree-select widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, warn};
use serde_json::Value;

use crate::error::FieldError;
use crate::form::FormControl;
use crate::source::{OptionsSource, SnapshotHandler, Subscription};
use crate::tree::{Flattener, FlatNode, TreeNode, TreeSelection, build, serialize};

/// Unique identifier for a TreeSelect widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeSelectId(usize);

impl TreeSelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TreeSelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__tree_select_{}", self.0)
    }
}

/// Internal state for the TreeSelect widget.
#[derive(Debug, Default)]
struct TreeSelectInner {
    /// Unwrapped current options tree (`None` until a snapshot arrives).
    options: Option<Value>,
    /// Node forest built from the options.
    roots: Vec<TreeNode>,
    /// Identity-preserving flat projection.
    flat: Flattener,
    /// Hierarchical selection state.
    selection: TreeSelection,
    /// Bound form control.
    control: Option<FormControl>,
    /// Live options subscription, released on drop or disconnect.
    subscription: Option<Subscription>,
}

/// A tree-structured multi-select field.
///
/// `TreeSelect` owns its node graph, flat sequence, and selection set
/// exclusively; clones share the same instance. The render surface is
/// [`flat_nodes`](Self::flat_nodes) plus the [`is_checked`](Self::is_checked)
/// / [`is_indeterminate`](Self::is_indeterminate) queries plus the two
/// toggles.
///
/// Emission contract: each snapshot from the options source is a sequence
/// expected to hold exactly one nested mapping. The single element is
/// unwrapped; zero-element and multi-element snapshots are treated as "no
/// tree" (empty). A rebuild always completes (build → reseed → flatten)
/// before any subsequent toggle is processed, since everything runs
/// synchronously to completion.
#[derive(Debug)]
pub struct TreeSelect {
    /// Unique identifier.
    id: TreeSelectId,
    /// Internal state.
    inner: Arc<RwLock<TreeSelectInner>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl TreeSelect {
    /// Create a widget with no bound control and no options source.
    pub fn new() -> Self {
        Self {
            id: TreeSelectId::new(),
            inner: Arc::new(RwLock::new(TreeSelectInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> TreeSelectId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Bind the form control the model is read from and written to.
    pub fn bind(&self, control: FormControl) {
        if let Ok(mut guard) = self.inner.write() {
            guard.control = Some(control);
        }
    }

    /// Subscribe to an options source.
    ///
    /// One-shot sources emit during this call, so the tree is built before
    /// `connect` returns. A second connect is an error; disconnect first.
    pub fn connect(&self, source: &impl OptionsSource) -> Result<(), FieldError> {
        if let Ok(guard) = self.inner.read()
            && guard.subscription.is_some()
        {
            return Err(FieldError::AlreadyConnected);
        }
        // The handler captures the widget weakly: once every widget handle
        // is gone the stored subscription drops and the handler unregisters,
        // so a long-lived stream can never call back into a torn-down widget.
        // It also runs re-entrantly during subscribe for one-shot sources,
        // so the lock must not be held across this call.
        let id = self.id;
        let inner = Arc::downgrade(&self.inner);
        let dirty = Arc::clone(&self.dirty);
        let handler: SnapshotHandler = Arc::new(move |snapshot| {
            if let Some(inner) = inner.upgrade() {
                let widget = TreeSelect {
                    id,
                    inner,
                    dirty: Arc::clone(&dirty),
                };
                widget.on_snapshot(snapshot);
            }
        });
        let subscription = source.subscribe(handler);
        if let Ok(mut guard) = self.inner.write() {
            guard.subscription = Some(subscription);
        }
        Ok(())
    }

    /// Release the options subscription, if any.
    ///
    /// Dropping the last widget handle has the same effect; the subscription
    /// guard is released unconditionally on teardown.
    pub fn disconnect(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.subscription = None;
        }
    }

    fn on_snapshot(&self, snapshot: &[Value]) {
        let options = match snapshot {
            [single] => Some(single.clone()),
            [] => None,
            _ => {
                warn!(
                    "{}: expected one-element options snapshot, got {}; treating as empty",
                    self.id,
                    snapshot.len()
                );
                None
            }
        };
        self.rebuild(options);
    }

    /// Rebuild the node graph, reseed selection from the bound control's
    /// current value, and re-flatten. Discards the previous selection set.
    fn rebuild(&self, options: Option<Value>) {
        if let Ok(mut guard) = self.inner.write() {
            let model = guard.control.as_ref().map(|control| control.value());
            let built = build(options.as_ref(), model.as_ref());
            guard.selection = TreeSelection::seed(&built.roots, &built.seeded);
            guard.roots = built.roots;
            guard.options = options;
            let inner = &mut *guard;
            inner.flat.refresh(&inner.roots, &inner.selection);
            debug!(
                "{}: rebuilt tree with {} nodes, {} seeded selected",
                self.id,
                inner.flat.len(),
                built.seeded.len()
            );
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Toggles
    // -------------------------------------------------------------------------

    /// Toggle a node and its whole subtree, then write the updated model to
    /// the bound control.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not exist in the current tree (a stale
    /// reference from before a rebuild).
    pub fn toggle(&self, path: &str) -> Result<(), FieldError> {
        self.apply_toggle(path, TreeSelection::toggle_node)
    }

    /// Toggle a single leaf, then write the updated model to the bound
    /// control.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not exist in the current tree, or names a
    /// category.
    pub fn toggle_leaf(&self, path: &str) -> Result<(), FieldError> {
        self.apply_toggle(path, TreeSelection::toggle_leaf)
    }

    fn apply_toggle(
        &self,
        path: &str,
        toggle: fn(&mut TreeSelection, &str),
    ) -> Result<(), FieldError> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        let Some(options) = guard.options.clone() else {
            // No tree yet; selection operations are no-ops.
            return Ok(());
        };
        let control = guard.control.clone().ok_or(FieldError::Unbound)?;
        toggle(&mut guard.selection, path);
        let inner = &mut *guard;
        inner.flat.refresh_checked(&inner.selection);
        let model = serialize(&options, &guard.selection);
        control.set_value(model);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Render surface
    // -------------------------------------------------------------------------

    /// The ordered flat node sequence, one handle per node in pre-order.
    pub fn flat_nodes(&self) -> Vec<FlatNode> {
        self.inner
            .read()
            .map(|guard| guard.flat.nodes().to_vec())
            .unwrap_or_default()
    }

    /// Look up a flat node handle by path.
    pub fn flat_node(&self, path: &str) -> Option<FlatNode> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.flat.get(path).cloned())
    }

    /// Whether the node is fully selected.
    ///
    /// Derived from leaf-descendant membership for categories. Returns
    /// `false` when no tree is loaded; panics on a stale path otherwise.
    pub fn is_checked(&self, path: &str) -> bool {
        self.inner
            .read()
            .map(|guard| guard.options.is_some() && guard.selection.is_fully_selected(path))
            .unwrap_or(false)
    }

    /// Whether the node is partially selected (some but not all leaf
    /// descendants).
    pub fn is_indeterminate(&self, path: &str) -> bool {
        self.inner
            .read()
            .map(|guard| guard.options.is_some() && guard.selection.is_partially_selected(path))
            .unwrap_or(false)
    }

    /// Number of flat nodes.
    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.flat.len()).unwrap_or(0)
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the current selection against the current options tree.
    pub fn model(&self) -> Value {
        self.inner
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .options
                    .as_ref()
                    .map(|options| serialize(options, &guard.selection))
            })
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the widget state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for TreeSelect {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for TreeSelect {
    fn default() -> Self {
        Self::new()
    }
}
