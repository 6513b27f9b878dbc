use std::io::{self, Write};

use bfvm::{MachineError, Program, ProgramDefect};

/// Print `err` to stderr, prefixed with the binary name.
///
/// Errors tied to an instruction get a caret under that instruction.
pub fn print_machine_error(program_name: &str, program: &Program, err: &MachineError) {
    match err {
        MachineError::InvalidProgram { reason: ProgramDefect::UnmatchedOpen { index } } => {
            let msg = format!("{program_name}: Parse error: unmatched bracket '['");
            print_error_with_context(&msg, program.instructions(), *index);
        }
        MachineError::InvalidProgram { reason: ProgramDefect::UnmatchedClose { index } } => {
            let msg = format!("{program_name}: Parse error: unmatched bracket ']'");
            print_error_with_context(&msg, program.instructions(), *index);
        }
        MachineError::InvalidInstruction { ip, symbol } => {
            let msg = format!("{program_name}: Runtime error: invalid instruction {symbol:#04x}");
            print_error_with_context(&msg, program.instructions(), *ip);
        }
        other => {
            eprintln!("{program_name}: {other}");
        }
    }
    let _ = io::stderr().flush();
}

/// Print a message and a window of instructions with a caret under `pos`.
pub fn print_error_with_context(prefix: &str, instructions: &[u8], pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(instructions.len());
    let slice = String::from_utf8_lossy(&instructions[start.min(end)..end]);

    eprintln!("  {}", slice);
    eprintln!("  {}^", " ".repeat(pos - start));
}
