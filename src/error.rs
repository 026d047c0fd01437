//! Error types for ferrous-pairhmm.
//!
//! Errors exist only at the input boundary: malformed test cases are
//! rejected before they can reach the kernel. Numerical unreliability is
//! not an error; the evaluator handles it internally via escalation.

use thiserror::Error;

/// Result type alias for ferrous-pairhmm operations
pub type Result<T> = std::result::Result<T, PairHmmError>;

#[derive(Debug, Error)]
pub enum PairHmmError {
    /// I/O error while reading test cases
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed test-case line
    #[error("Invalid test case at line {line}: {msg}")]
    InvalidFormat {
        /// Line number where the error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Test case violating a structural invariant (empty sequence,
    /// quality-track length mismatch)
    #[error("Invalid test case: {0}")]
    InvalidTestCase(String),
}
