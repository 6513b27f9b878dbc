//! A small virtual machine for Brainfuck.
//!
//! The crate is split into three pieces:
//! - [`Program`] extracts the eight instruction symbols `><+-,.[]` from
//!   source text (everything else is a comment) and checks that the result
//!   is non-empty with balanced brackets.
//! - [`Memory`] is a fixed-size tape (30,000 cells by default) whose cells
//!   hold values in a configurable range (`[0, 255]` by default).
//! - [`Machine`] runs a program against a tape, reading `,` bytes from an
//!   [`Input`] and writing `.` bytes to an [`Output`].
//!
//! Behaviors:
//! - The data pointer wraps around both ends of the tape.
//! - Cell values wrap around both ends of the memory's range.
//! - `[` and `]` jump one past their matching bracket, at any nesting depth.
//! - Invalid programs are rejected before any instruction runs.
//!
//! Quick start:
//!
//! ```no_run
//! use bfvm::interpreter;
//!
//! let mut machine = interpreter(None, Some("++++++++[>++++++++<-]>+.")).expect("valid arguments");
//! machine.run().expect("program should run"); // prints "A"
//! ```
//!
//! With in-memory streams:
//!
//! ```
//! use bfvm::{ByteInput, Machine, Memory, Program};
//!
//! let program = Program::from_source(",+.");
//! let mut machine = Machine::with_parts(program, Memory::default(), ByteInput::new(&b"a"[..]), Vec::new());
//! machine.run().unwrap();
//! assert_eq!(machine.output(), b"b");
//! ```

mod bounds;
pub mod config;
pub mod error;
pub mod io;
pub mod machine;
pub mod memory;
pub mod program;

use std::path::Path;

pub use crate::config::{MemoryConfig, MemoryOverrides};
pub use crate::error::{MachineError, ProgramDefect};
pub use crate::io::{ByteInput, ByteOutput, Input, Output, StdInput, StdOutput};
pub use crate::machine::{Machine, Operation};
pub use crate::memory::{Cell, Memory};
pub use crate::program::Program;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a machine over a program taken from exactly one of `file` or `source`.
///
/// The machine gets a default tape and the process's stdin/stdout. Passing
/// both or neither fails with [`MachineError::InvalidConfiguration`] before
/// any file is touched. The program itself is not validated here; an
/// invalid one fails when the machine runs.
pub fn interpreter(file: Option<&Path>, source: Option<&str>) -> Result<Machine, MachineError> {
    let program = load_program(file, source)?;
    Ok(Machine::new(program))
}

/// The argument checks and program loading behind [`interpreter`].
pub fn load_program(file: Option<&Path>, source: Option<&str>) -> Result<Program, MachineError> {
    match (file, source) {
        (Some(_), Some(_)) => Err(MachineError::configuration("must pass only one of file or source")),
        (None, None) => Err(MachineError::configuration("must pass file or source")),
        (Some(path), None) => Program::from_file(path),
        (None, Some(source)) => Ok(Program::from_source(source)),
    }
}
