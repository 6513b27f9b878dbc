mod cli_util;

use std::env;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use bfvm::{ByteInput, ByteOutput, Cell, Machine, MachineError, MemoryConfig, MemoryOverrides, load_program};
use clap::Parser;

use crate::cli_util::print_machine_error;

fn print_usage(program: &str) {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] "<code>"        # Run Brainfuck code (args are concatenated)
  {0} [OPTIONS] --file <PATH>   # Run Brainfuck code loaded from file

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --cells <N>         Number of memory cells (fallback BF_MEMORY_SIZE; default 30000)
  --min <N>           Smallest cell value (fallback BF_MEMORY_MIN; default 0)
  --max <N>           Largest cell value (fallback BF_MEMORY_MAX; default 255)
  --default <N>       Initial cell value (fallback BF_MEMORY_DEFAULT; default 0)

Notes:
- Characters outside of ><+-.,[] are comments.
- Input (`,`) reads one byte from stdin; end of input is an error.
- Output (`.`) writes the raw cell byte to stdout.
"#,
        program
    );
    let _ = io::stderr().flush();
}

#[derive(Parser, Debug)]
#[command(name = "bf", version, about = "Run a Brainfuck program")]
struct Cli {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Number of memory cells
    #[arg(long = "cells", value_name = "N")]
    cells: Option<usize>,

    /// Smallest cell value
    #[arg(long = "min", value_name = "N", allow_negative_numbers = true)]
    min: Option<Cell>,

    /// Largest cell value
    #[arg(long = "max", value_name = "N", allow_negative_numbers = true)]
    max: Option<Cell>,

    /// Initial cell value
    #[arg(long = "default", value_name = "N", allow_negative_numbers = true)]
    default: Option<Cell>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    code: Vec<String>,
}

fn run(program_name: &str, cli: Cli) -> i32 {
    let Cli { file, cells, min, max, default, code } = cli;

    let source = if code.is_empty() { None } else { Some(code.join("")) };
    let program = match load_program(file.as_deref(), source.as_deref()) {
        Ok(program) => program,
        Err(err @ MachineError::InvalidConfiguration { .. }) => {
            eprintln!("{program_name}: {err}");
            print_usage(program_name);
            return 2;
        }
        Err(err) => {
            eprintln!("{program_name}: {err}");
            return 1;
        }
    };

    let flags = MemoryOverrides { size: cells, minimum: min, maximum: max, default };
    let memory = match MemoryConfig::resolve(flags).build() {
        Ok(memory) => memory,
        Err(err) => {
            eprintln!("{program_name}: {err}");
            return 2;
        }
    };

    let input = ByteInput::new(io::stdin().lock());
    let output = ByteOutput::new(BufWriter::new(io::stdout().lock()));
    let mut machine = Machine::with_parts(program, memory, input, output);

    let result = machine.run();
    let program = machine.program().clone();
    // Dropping the machine flushes whatever the program wrote before failing.
    drop(machine);

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_machine_error(program_name, &program, &err);
            1
        }
    }
}

fn main() {
    let program_name = env::args().next().unwrap_or_else(|| String::from("bf"));
    let cli = Cli::parse();
    std::process::exit(run(&program_name, cli));
}
