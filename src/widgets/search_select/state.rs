//! Search-select widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::FieldError;
use crate::form::FormControl;

use super::filter::{MatchMode, filter_options};

/// Unique identifier for a SearchSelect widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchSelectId(usize);

impl SearchSelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SearchSelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__search_select_{}", self.0)
    }
}

/// Internal state for a SearchSelect widget.
#[derive(Debug)]
struct SearchSelectInner {
    /// Option list (strings or objects).
    options: Vec<Value>,
    /// Object fields the query is matched against.
    match_fields: Vec<String>,
    /// Match strategy.
    mode: MatchMode,
    /// Current query text.
    query: String,
    /// Bound form control.
    control: Option<FormControl>,
}

impl Default for SearchSelectInner {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            match_fields: vec!["label".to_string()],
            mode: MatchMode::default(),
            query: String::new(),
            control: None,
        }
    }
}

/// A flat select with query filtering.
///
/// Options are filtered against the current query; selecting a filtered
/// option writes its value (the `value` field for object options, the option
/// itself otherwise) to the bound control.
#[derive(Debug)]
pub struct SearchSelect {
    /// Unique identifier.
    id: SearchSelectId,
    /// Internal state.
    inner: Arc<RwLock<SearchSelectInner>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl SearchSelect {
    /// Create an empty widget.
    pub fn new() -> Self {
        Self {
            id: SearchSelectId::new(),
            inner: Arc::new(RwLock::new(SearchSelectInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> SearchSelectId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Bind the form control selections are written to.
    pub fn bind(&self, control: FormControl) {
        if let Ok(mut guard) = self.inner.write() {
            guard.control = Some(control);
        }
    }

    /// Replace the option list.
    pub fn set_options(&self, options: Vec<Value>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.options = options;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the object fields the query is matched against.
    pub fn set_match_fields(&self, fields: Vec<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.match_fields = fields;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Set the match strategy.
    pub fn set_match_mode(&self, mode: MatchMode) {
        if let Ok(mut guard) = self.inner.write() {
            guard.mode = mode;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Update the query text.
    pub fn set_query(&self, query: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.query = query.into();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Current query text.
    pub fn query(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.query.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Filtering and selection
    // -------------------------------------------------------------------------

    /// Options matching the current query, best match first.
    pub fn matches(&self) -> Vec<Value> {
        self.inner
            .read()
            .map(|guard| {
                let haystacks: Vec<String> = guard
                    .options
                    .iter()
                    .map(|option| match_text(option, &guard.match_fields))
                    .collect();
                filter_options(&guard.query, &haystacks, guard.mode)
                    .into_iter()
                    .map(|matched| guard.options[matched.index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Select one of the currently matching options by its index in
    /// [`matches`](Self::matches), writing its value to the bound control.
    ///
    /// Out-of-range indices are ignored.
    pub fn select(&self, index: usize) -> Result<(), FieldError> {
        let matched = self.matches();
        let Some(option) = matched.get(index) else {
            return Ok(());
        };
        let control = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.control.clone())
            .ok_or(FieldError::Unbound)?;
        control.set_value(selected_value(option));
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
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

/// The text a query is matched against for one option.
///
/// Strings match on themselves; objects match on the configured fields,
/// joined with spaces (missing or non-string fields are skipped).
fn match_text(option: &Value, match_fields: &[String]) -> String {
    match option {
        Value::Object(map) => {
            let parts: Vec<&str> = match_fields
                .iter()
                .filter_map(|field| map.get(field).and_then(Value::as_str))
                .collect();
            parts.join(" ")
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// The value written to the control for a selected option.
fn selected_value(option: &Value) -> Value {
    match option {
        Value::Object(map) => map.get("value").cloned().unwrap_or_else(|| option.clone()),
        other => other.clone(),
    }
}

impl Clone for SearchSelect {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for SearchSelect {
    fn default() -> Self {
        Self::new()
    }
}
