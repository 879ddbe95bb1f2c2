//! Dynamic form-field widgets with a hierarchical selection engine.
//!
//! `treeform` provides two field widgets for declarative form layers:
//!
//! - [`TreeSelect`](widgets::tree_select::TreeSelect): a tree-structured
//!   multi-select. An arbitrary nested key/value options tree becomes a
//!   navigable node graph; selection propagates down to descendants and is
//!   derived upward for ancestors (checked/indeterminate); the selected
//!   subset is serialized back into the original nested shape and written to
//!   the bound form control on every toggle.
//! - [`SearchSelect`](widgets::search_select::SearchSelect): a flat select
//!   with fuzzy or prefix filtering over configurable match fields.
//!
//! Rendering is out of scope: the tree widget exposes an ordered flat node
//! sequence (label, depth, expandable, checked), per-node selection queries,
//! and the two toggle operations. That is the entire surface a view layer
//! needs.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use treeform::prelude::*;
//!
//! let control = FormControl::with_value(json!({ "A": { "x": null } }));
//! let select = TreeSelect::new();
//! select.bind(control.clone());
//!
//! // A one-shot source is just the wrapped options tree.
//! let options = vec![json!({ "A": { "x": null, "y": null } })];
//! select.connect(&options).unwrap();
//!
//! assert!(select.is_indeterminate("A"));
//! select.toggle_leaf("A/y").unwrap();
//! assert!(select.is_checked("A"));
//! assert_eq!(control.value(), json!({ "A": { "x": null, "y": null } }));
//! ```

pub mod error;
pub mod form;
pub mod source;
pub mod tree;
pub mod widgets;

pub mod prelude {
    pub use crate::error::FieldError;
    pub use crate::form::FormControl;
    pub use crate::source::{OptionsSource, SnapshotHandler, Subscription, ValueStream};
    pub use crate::tree::{FlatNode, Flattener, TreeNode, TreeSelection, build, serialize};
    pub use crate::widgets::search_select::{FilterMatch, MatchMode, SearchSelect, filter_options};
    pub use crate::widgets::tree_select::{TreeSelect, TreeSelectId};
}
