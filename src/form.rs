//! Form-control binding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

/// The bound value cell shared between a field widget and the host form.
///
/// A widget reads the current value once per rebuild (as the seed model) and
/// writes a newly computed value on every selection change. Clones share the
/// same cell, so the host keeps one handle and hands another to the widget.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use treeform::form::FormControl;
///
/// let control = FormControl::with_value(json!({ "A": { "x": null } }));
/// assert_eq!(control.value(), json!({ "A": { "x": null } }));
///
/// control.set_value(json!({}));
/// assert!(control.take_changed());
/// ```
#[derive(Debug, Default)]
pub struct FormControl {
    /// Current bound value.
    value: Arc<RwLock<Value>>,
    /// Set whenever a widget writes a new value.
    changed: Arc<AtomicBool>,
}

impl FormControl {
    /// Create a control holding `Value::Null`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a control with an initial value.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            changed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the current value.
    pub fn value(&self) -> Value {
        self.value
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(Value::Null)
    }

    /// Replace the current value.
    pub fn set_value(&self, value: Value) {
        if let Ok(mut guard) = self.value.write() {
            *guard = value;
            self.changed.store(true, Ordering::SeqCst);
        }
    }

    /// Check and clear the changed flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::SeqCst)
    }
}

impl Clone for FormControl {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            changed: Arc::clone(&self.changed),
        }
    }
}
