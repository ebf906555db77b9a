//! Error types for `swatboard-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

/// Unified error type for all core operations.
///
/// Every variant is recoverable by the caller: correct the input, or wait
/// and try again. None of them leave the store in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A submission field failed validation. The message is shown to players
    /// verbatim.
    #[error("{0}")]
    Validation(String),

    /// The client submitted again before its cooldown elapsed.
    #[error("too many requests, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A difficulty tag other than `easy`, `medium` or `hard`.
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Convenience alias used throughout `swatboard-core`.
pub type CoreResult<T> = Result<T, CoreError>;
