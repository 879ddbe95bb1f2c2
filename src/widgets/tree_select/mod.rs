//! Tree-select field widget.
//!
//! `TreeSelect` binds the tree-selection engine to a form: it subscribes to
//! an options source, rebuilds the node graph and flat sequence on every
//! emission (reseeding selection from the bound control's current value),
//! and writes the serialized selection back to the control on every toggle.
//!
//! # Example
//!
//! ```ignore
//! let control = FormControl::new();
//! let select = TreeSelect::new();
//! select.bind(control.clone());
//! select.connect(&vec![json!({ "user": ["manage", "group"] })])?;
//!
//! for node in select.flat_nodes() {
//!     println!("{}{}", "  ".repeat(node.depth() as usize), node.label());
//! }
//!
//! select.toggle("user")?;
//! assert_eq!(control.value(), json!({ "user": ["manage", "group"] }));
//! ```

mod state;

pub use state::{TreeSelect, TreeSelectId};
