//! Convenience result type alias for Keepsake.

use crate::error::StoreError;

/// A specialized `Result` type for Keepsake operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, StoreError>` explicitly.
pub type StoreResult<T> = Result<T, StoreError>;
