//! Result alias for Genie operations.

use super::genie_error::GenieError;

/// Result type for functions that can fail with any [`GenieError`] kind.
pub type GenieResult<T> = Result<T, GenieError>;
