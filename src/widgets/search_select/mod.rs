//! Search-select field widget.
//!
//! A flat (non-hierarchical) select with fuzzy or prefix filtering over a
//! list of options. Options are either plain strings or objects; for object
//! options the fields used for matching are configurable, and the `value`
//! field (falling back to the whole option) is what gets written to the
//! bound control on selection.

mod filter;
mod state;

pub use filter::{FilterMatch, MatchMode, filter_options};
pub use state::{SearchSelect, SearchSelectId};
