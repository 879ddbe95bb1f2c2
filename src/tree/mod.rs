//! The tree-selection engine.
//!
//! Pipeline: options tree → [`build`] → node forest → [`Flattener`] → flat
//! render sequence, with [`TreeSelection`] tracking hierarchical selection
//! state and [`serialize`] producing the updated model on selection change.

mod build;
mod flatten;
mod node;
mod selection;

pub use build::{Built, build, serialize};
pub use flatten::{FlatNode, Flattener};
pub use node::TreeNode;
pub use selection::TreeSelection;
