//! Field widgets.

pub mod search_select;
pub mod tree_select;
