use thiserror::Error;

/// Errors produced while constructing or parsing model types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown step operation: {0}")]
    UnknownStepOp(String),

    #[error("invalid URN {0:?}: expected a `urn:` prefix")]
    InvalidUrn(String),
}
