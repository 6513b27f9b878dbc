//! Byte-stream collaborators for `,` and `.`.
//!
//! The machine only sees the [`Input`] and [`Output`] traits, so tests and
//! embedders can swap the process streams for anything that yields or
//! accepts single bytes.

use std::io::{self, Read, Stdin, Stdout, Write};

use crate::error::MachineError;
use crate::memory::Cell;

/// Values an [`Output`] accepts.
pub const BYTE_VALUE_RANGE: std::ops::RangeInclusive<Cell> = 0..=255;

/// A source of single bytes for the `,` instruction.
pub trait Input {
    /// Read exactly one byte, blocking if necessary.
    fn read(&mut self) -> io::Result<u8>;
}

/// A sink of single bytes for the `.` instruction.
pub trait Output {
    /// Write one value, which must lie in [`BYTE_VALUE_RANGE`].
    fn write(&mut self, value: Cell) -> Result<(), MachineError>;

    /// Push any buffered bytes to the underlying sink.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Any closure yielding bytes can feed a machine.
impl<F> Input for F
where
    F: FnMut() -> io::Result<u8>,
{
    fn read(&mut self) -> io::Result<u8> {
        self()
    }
}

/// Collects written bytes in memory.
impl Output for Vec<u8> {
    fn write(&mut self, value: Cell) -> Result<(), MachineError> {
        self.push(to_byte(value)?);
        Ok(())
    }
}

impl<T: Output + ?Sized> Output for &mut T {
    fn write(&mut self, value: Cell) -> Result<(), MachineError> {
        (**self).write(value)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Narrow a cell value to a raw output byte.
pub fn to_byte(value: Cell) -> Result<u8, MachineError> {
    u8::try_from(value).map_err(|_| MachineError::ValueOutOfRange {
        value,
        minimum: *BYTE_VALUE_RANGE.start(),
        maximum: *BYTE_VALUE_RANGE.end(),
    })
}

/// Reads one byte per call from any [`Read`]er.
///
/// End of stream is reported as an [`io::ErrorKind::UnexpectedEof`] error.
#[derive(Debug)]
pub struct ByteInput<R> {
    reader: R,
}

/// The default input: the process's standard input.
pub type StdInput = ByteInput<Stdin>;

impl<R: Read> ByteInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl ByteInput<Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl Default for ByteInput<Stdin> {
    fn default() -> Self {
        Self::stdin()
    }
}

impl<R: Read> Input for ByteInput<R> {
    fn read(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

/// Writes each value as one raw byte to any [`Write`]r.
#[derive(Debug)]
pub struct ByteOutput<W> {
    writer: W,
}

/// The default output: the process's standard output.
pub type StdOutput = ByteOutput<Stdout>;

impl<W: Write> ByteOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ByteOutput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for ByteOutput<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> Output for ByteOutput<W> {
    fn write(&mut self, value: Cell) -> Result<(), MachineError> {
        let byte = to_byte(value)?;
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
