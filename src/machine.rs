use std::sync::Arc;

use crate::error::MachineError;
use crate::io::{Input, Output, StdInput, StdOutput};
use crate::memory::{Cell, Memory};
use crate::program::Program;

/// The operation an instruction symbol decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `>`
    IncrementDataPointer,
    /// `<`
    DecrementDataPointer,
    /// `+`
    IncrementCell,
    /// `-`
    DecrementCell,
    /// `,`
    ReadInput,
    /// `.`
    WriteOutput,
    /// `[`
    JumpForwardIfZero,
    /// `]`
    JumpBackwardIfNonZero,
}

impl Operation {
    /// Map a symbol to its operation; anything outside the instruction set is `None`.
    pub fn decode(symbol: u8) -> Option<Self> {
        match symbol {
            b'>' => Some(Operation::IncrementDataPointer),
            b'<' => Some(Operation::DecrementDataPointer),
            b'+' => Some(Operation::IncrementCell),
            b'-' => Some(Operation::DecrementCell),
            b',' => Some(Operation::ReadInput),
            b'.' => Some(Operation::WriteOutput),
            b'[' => Some(Operation::JumpForwardIfZero),
            b']' => Some(Operation::JumpBackwardIfNonZero),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// +1 for the bracket that opens a level in this direction, -1 for the
    /// one that closes it.
    fn nesting(self, symbol: u8) -> isize {
        match (symbol, self) {
            (b'[', Direction::Forward) | (b']', Direction::Backward) => 1,
            (b']', Direction::Forward) | (b'[', Direction::Backward) => -1,
            _ => 0,
        }
    }
}

/// Executes a [`Program`] against a [`Memory`] tape and a pair of byte streams.
///
/// The machine keeps an instruction pointer into the program and a data
/// pointer into memory. [`run`](Self::run) loops fetch, decode, dispatch and
/// advance until the instruction pointer reaches the end of the program.
/// Data pointer moves wrap around the tape; cell increments and decrements
/// wrap around the memory's value range.
///
/// A machine is spent once it finishes: running it again is a no-op because
/// the instruction pointer already sits at the end.
#[derive(Debug)]
pub struct Machine<I = StdInput, O = StdOutput> {
    program: Arc<Program>,
    memory: Memory,
    input: I,
    output: O,
    instruction_pointer: usize,
    data_pointer: usize,
}

impl Machine<StdInput, StdOutput> {
    /// A machine over `program` with a default tape, stdin and stdout.
    pub fn new(program: impl Into<Arc<Program>>) -> Self {
        Self::with_parts(program, Memory::default(), StdInput::stdin(), StdOutput::stdout())
    }
}

impl<I: Input, O: Output> Machine<I, O> {
    /// A machine over `program` with caller-supplied memory and streams.
    pub fn with_parts(program: impl Into<Arc<Program>>, memory: Memory, input: I, output: O) -> Self {
        Self {
            program: program.into(),
            memory,
            input,
            output,
            instruction_pointer: 0,
            data_pointer: 0,
        }
    }

    /// Run until the instruction pointer passes the last instruction.
    ///
    /// An invalid program fails with [`MachineError::InvalidProgram`] before
    /// anything executes. Any other error aborts the run where it happened.
    pub fn run(&mut self) -> Result<(), MachineError> {
        if let Err(reason) = self.program.validate() {
            return Err(MachineError::InvalidProgram { reason });
        }

        tracing::debug!(
            instructions = self.program.size(),
            cells = self.memory.size(),
            "starting run"
        );

        while self.instruction_pointer < self.program.size() {
            self.step()?;
        }
        self.output.flush()?;

        tracing::debug!(
            ip = self.instruction_pointer,
            ptr = self.data_pointer,
            "run finished"
        );
        Ok(())
    }

    /// One fetch, decode, dispatch and advance cycle.
    fn step(&mut self) -> Result<(), MachineError> {
        let symbol = self.program.instruction(self.instruction_pointer)?;
        let Some(operation) = Operation::decode(symbol) else {
            return Err(MachineError::InvalidInstruction {
                ip: self.instruction_pointer,
                symbol,
            });
        };
        self.dispatch(operation)?;
        // A taken jump leaves the pointer on the matching bracket; this
        // moves it one past.
        self.instruction_pointer += 1;
        Ok(())
    }

    fn dispatch(&mut self, operation: Operation) -> Result<(), MachineError> {
        match operation {
            Operation::IncrementDataPointer => {
                self.data_pointer = (self.data_pointer + 1) % self.memory.size();
            }
            Operation::DecrementDataPointer => {
                self.data_pointer = match self.data_pointer {
                    0 => self.memory.size() - 1,
                    ptr => ptr - 1,
                };
            }
            Operation::IncrementCell => {
                let value = self.current_cell()?;
                let next = if value == self.memory.maximum_value() {
                    self.memory.minimum_value()
                } else {
                    value + 1
                };
                self.memory.write(self.data_pointer, next)?;
            }
            Operation::DecrementCell => {
                let value = self.current_cell()?;
                let next = if value == self.memory.minimum_value() {
                    self.memory.maximum_value()
                } else {
                    value - 1
                };
                self.memory.write(self.data_pointer, next)?;
            }
            Operation::ReadInput => {
                // Make any prompt visible before blocking on input.
                self.output.flush()?;
                let value = loop {
                    let value = Cell::from(self.input.read()?);
                    if self.memory.contains(value) {
                        break value;
                    }
                    tracing::warn!(
                        value,
                        minimum = self.memory.minimum_value(),
                        maximum = self.memory.maximum_value(),
                        "discarding input outside the cell range"
                    );
                };
                self.memory.write(self.data_pointer, value)?;
            }
            Operation::WriteOutput => {
                let value = self.current_cell()?;
                self.output.write(value)?;
            }
            Operation::JumpForwardIfZero => {
                if self.current_cell()? == 0 {
                    self.jump(Direction::Forward)?;
                }
            }
            Operation::JumpBackwardIfNonZero => {
                if self.current_cell()? != 0 {
                    self.jump(Direction::Backward)?;
                }
            }
        }
        Ok(())
    }

    fn current_cell(&self) -> Result<Cell, MachineError> {
        self.memory.read(self.data_pointer)
    }

    /// Move the instruction pointer onto the bracket matching the one under it.
    fn jump(&mut self, direction: Direction) -> Result<(), MachineError> {
        let distance = self.jump_distance(direction)?;
        let target = self.instruction_pointer.wrapping_add_signed(distance);
        tracing::trace!(from = self.instruction_pointer, to = target, "jump");
        self.instruction_pointer = target;
        Ok(())
    }

    /// Signed distance from the instruction pointer to its matching bracket.
    fn jump_distance(&self, direction: Direction) -> Result<isize, MachineError> {
        let mut distance: isize = 0;
        let mut depth: isize = 0;
        loop {
            // Walking off the front wraps to a huge index, which the
            // program's bounds check rejects.
            let index = self.instruction_pointer.wrapping_add_signed(distance);
            depth += direction.nesting(self.program.instruction(index)?);
            if depth == 0 {
                return Ok(distance);
            }
            distance += direction.step();
        }
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Consume the machine, handing back its output sink.
    pub fn into_output(self) -> O {
        self.output
    }
}
