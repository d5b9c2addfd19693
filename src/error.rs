//! Error types for the state container.

use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `set_state` was handed something other than an object.
    #[error("set_state expects an object, got {0}")]
    InvalidArgument(&'static str),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
