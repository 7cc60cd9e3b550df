//! Error types for the pietc compiler

use thiserror::Error;

/// Pietc compiler errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    // Assembly parse errors
    /// Unrecognized mnemonic in an assembly listing
    ///
    /// **Triggered by:** A line whose first token is not a known instruction
    /// **Example:** `PUHS 3` (misspelled `PUSH`)
    #[error("Unknown mnemonic at line {line}: {token}")]
    UnknownMnemonic {
        /// Line number (1-indexed)
        line: usize,
        /// The offending token
        token: String,
    },

    /// Jump or branch to a label no `LABEL` line declares
    ///
    /// **Triggered by:** `JMP loop` without a matching `LABEL loop`
    #[error("Undefined label at line {line}: {label}")]
    UndefinedLabel {
        /// Line number (1-indexed)
        line: usize,
        /// The unresolved label name
        label: String,
    },

    /// Instruction requires an operand the line does not provide
    #[error("Missing operand at line {line} for {mnemonic}")]
    MissingOperand {
        /// Line number (1-indexed)
        line: usize,
        /// The mnemonic that wanted an operand
        mnemonic: String,
    },

    /// Operand token is not a valid signed 32-bit integer
    #[error("Invalid operand at line {line}: {token}")]
    InvalidOperand {
        /// Line number (1-indexed)
        line: usize,
        /// The offending token
        token: String,
    },

    // Grid errors
    /// Input grid has zero width or height
    #[error("Empty codel grid")]
    EmptyGrid,

    /// Rows of an ASCII grid differ in length
    #[error("Ragged codel grid: row {row} has width {got}, expected {expected}")]
    RaggedGrid {
        /// Row index (0-indexed)
        row: usize,
        /// Width found
        got: usize,
        /// Width of the first row
        expected: usize,
    },

    /// Character in an ASCII grid with no palette assignment
    #[error("Unknown codel character: {0:?}")]
    UnknownCodelChar(char),

    // Resource errors
    /// Worker pool construction failed
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for pietc operations
pub type Result<T> = std::result::Result<T, Error>;
