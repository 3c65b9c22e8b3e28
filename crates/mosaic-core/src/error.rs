use thiserror::Error;

/// Programmer errors surfaced synchronously by the hook APIs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HookError {
    /// A dynamic entry point was handed a value it cannot treat as an
    /// awaitable. This is a contract violation by the caller, not a runtime
    /// condition the tracker recovers from.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
