//! Error types for the render crate.

/// Errors that can occur while rendering.
///
/// Malformed input that breaks the renderer's own contracts (a prefixed row
/// at indent level zero, an object diff entered at level zero) panics instead:
/// those are bugs in the caller, not conditions to recover from.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// The property tree nests deeper than [`RenderOptions::max_depth`](crate::RenderOptions::max_depth).
    #[error("property tree nests deeper than the limit of {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Convenience alias for render results.
pub type RenderResult<T> = Result<T, RenderError>;
