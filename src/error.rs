//! Error types for the field-adapter boundary.

use thiserror::Error;

/// Errors surfaced by field widgets.
///
/// Engine-internal invariant violations (stale node paths, drifted derived
/// state) are programming errors and panic instead; see the selection
/// manager. These variants cover the recoverable misuses of the adapter
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The widget is already connected to an options source.
    #[error("field is already connected to an options source")]
    AlreadyConnected,
    /// The widget has no bound form control to write the model to.
    #[error("field is not bound to a form control")]
    Unbound,
}
