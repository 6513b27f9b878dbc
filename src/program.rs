use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::bounds::check_index;
use crate::error::{MachineError, ProgramDefect};

/// The eight instruction symbols, in no particular order.
pub const INSTRUCTION_SET: [u8; 8] = [b'>', b'<', b'+', b'-', b',', b'.', b'[', b']'];

/// Returns true if `symbol` is one of the eight instructions.
pub fn is_instruction(symbol: u8) -> bool {
    INSTRUCTION_SET.contains(&symbol)
}

/// Source text plus the instruction sequence extracted from it.
///
/// Everything outside `><+-,.[]` is a comment. Extraction happens once, on
/// first use, and the result is cached for the life of the program. A
/// `Program` never changes after construction, so it can be shared between
/// machines (see [`Machine::new`](crate::Machine::new)).
#[derive(Debug, Default)]
pub struct Program {
    source: String,
    instructions: OnceLock<Vec<u8>>,
}

impl Program {
    /// Wrap raw source text. Never fails; validity is checked separately.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            instructions: OnceLock::new(),
        }
    }

    /// Read a program from `path`.
    ///
    /// Comment bytes need not be UTF-8; invalid sequences are replaced in
    /// [`source`](Self::source) and never affect the instructions.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MachineError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| MachineError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(String::from_utf8_lossy(&bytes)))
    }

    /// The source text exactly as supplied.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The instruction symbols in source order, comments removed.
    pub fn instructions(&self) -> &[u8] {
        self.instructions.get_or_init(|| {
            self.source
                .bytes()
                .filter(|&symbol| is_instruction(symbol))
                .collect()
        })
    }

    /// Number of instructions.
    pub fn size(&self) -> usize {
        self.instructions().len()
    }

    /// The instruction at `index`.
    pub fn instruction(&self, index: usize) -> Result<u8, MachineError> {
        let instructions = self.instructions();
        check_index(index, instructions.len())?;
        Ok(instructions[index])
    }

    /// Non-empty with every bracket matched in nesting order.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Like [`is_valid`](Self::is_valid), but reports the first defect found.
    pub fn validate(&self) -> Result<(), ProgramDefect> {
        let instructions = self.instructions();
        if instructions.is_empty() {
            return Err(ProgramDefect::Empty);
        }

        // Indices of the `[` still waiting for their `]`.
        let mut open: Vec<usize> = Vec::new();
        for (index, &symbol) in instructions.iter().enumerate() {
            match symbol {
                b'[' => open.push(index),
                b']' => {
                    if open.pop().is_none() {
                        return Err(ProgramDefect::UnmatchedClose { index });
                    }
                }
                _ => {}
            }
        }

        match open.first() {
            Some(&index) => Err(ProgramDefect::UnmatchedOpen { index }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl Program {
    /// A program whose instruction cache is pre-filled with `instructions`,
    /// bypassing extraction from `source`.
    pub(crate) fn with_instructions(source: &str, instructions: &[u8]) -> Self {
        let program = Self::from_source(source);
        let _ = program.instructions.set(instructions.to_vec());
        program
    }
}

impl Clone for Program {
    fn clone(&self) -> Self {
        let instructions = OnceLock::new();
        if let Some(parsed) = self.instructions.get() {
            let _ = instructions.set(parsed.clone());
        }
        Self {
            source: self.source.clone(),
            instructions,
        }
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Program::from_source(source)
    }
}

impl From<String> for Program {
    fn from(source: String) -> Self {
        Program::from_source(source)
    }
}
