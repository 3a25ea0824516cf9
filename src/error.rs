//! Error types for the walkthrough core.
//!
//! The taxonomy is deliberately small: everything that can go wrong here is a
//! configuration mistake caught eagerly at registry construction. Navigation
//! past the ends and canceling a dead timer are no-ops, never errors.

use thiserror::Error;

/// Result type alias for walkthrough operations.
pub type Result<T> = std::result::Result<T, WalkthroughError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalkthroughError {
    /// A step's highlight range is inverted or points past the end of the
    /// reference text.
    #[error("step {step}: highlight range {start}..={end} is invalid for a {line_count}-line script")]
    InvalidRange {
        step: usize,
        start: usize,
        end: usize,
        line_count: usize,
    },

    /// Step ids must be dense and 0-indexed in registry order.
    #[error("step at position {index} has id {id}, expected {index}")]
    MisnumberedStep { index: usize, id: usize },

    /// A walkthrough with no steps cannot be navigated.
    #[error("step registry must contain at least one step")]
    EmptyRegistry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WalkthroughError::InvalidRange {
            step: 3,
            start: 30,
            end: 12,
            line_count: 167,
        };
        assert_eq!(
            err.to_string(),
            "step 3: highlight range 30..=12 is invalid for a 167-line script"
        );
    }
}
