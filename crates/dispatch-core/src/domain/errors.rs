use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Transient backing-store failure. No decision was produced; the caller
    /// must not retry silently because ticket state may have changed.
    #[error("Store error: {0}")]
    Store(String),

    /// A ticket or similar-ticket entry failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal contract was broken (weight row not summing to 1.0,
    /// snapshot cross-reference failure). Fatal for the call.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    /// Wrap an error coming back through the store seam.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}
