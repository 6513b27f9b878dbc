use std::fmt;
use std::path::PathBuf;

use crate::memory::Cell;

/// Errors raised while building or running a machine.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// Memory parameters (or factory arguments) do not make sense together.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The program file could not be read.
    #[error("Source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A program or memory index fell outside `[0, size)`.
    #[error("Index out of bounds: {index} (size={size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A value fell outside the permitted `[minimum, maximum]` range.
    #[error("Value out of range: {value} not in [{minimum}, {maximum}]")]
    ValueOutOfRange { value: Cell, minimum: Cell, maximum: Cell },

    /// The program failed validation and was never started.
    #[error("Invalid program: {reason}")]
    InvalidProgram { reason: ProgramDefect },

    /// A fetched symbol has no operation.
    #[error("Invalid instruction '{}' at instruction {ip}", char::from(*symbol))]
    InvalidInstruction { ip: usize, symbol: u8 },

    /// The input source or output sink failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MachineError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        MachineError::InvalidConfiguration { reason: reason.into() }
    }
}

/// Why a program is not runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramDefect {
    /// No instructions survived parsing.
    Empty,
    /// The `[` at this instruction index is never closed.
    UnmatchedOpen { index: usize },
    /// The `]` at this instruction index closes nothing.
    UnmatchedClose { index: usize },
}

impl fmt::Display for ProgramDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramDefect::Empty => write!(f, "empty program"),
            ProgramDefect::UnmatchedOpen { index } => {
                write!(f, "unmatched '[' at instruction {index}")
            }
            ProgramDefect::UnmatchedClose { index } => {
                write!(f, "unmatched ']' at instruction {index}")
            }
        }
    }
}
