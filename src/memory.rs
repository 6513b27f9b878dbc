use crate::bounds::check_index;
use crate::error::MachineError;

/// Value stored in a single memory cell.
pub type Cell = i64;

/// Number of cells in a default memory tape.
pub const DEFAULT_SIZE: usize = 30_000;
/// Smallest value a default cell may hold.
pub const MIN_VALUE: Cell = 0;
/// Largest value a default cell may hold.
pub const MAX_VALUE: Cell = 255;

/// A fixed-size tape of cells whose values stay within `[minimum, maximum]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Cell>,
    minimum: Cell,
    maximum: Cell,
}

impl Memory {
    /// Create a tape of `size` cells, each holding `default`.
    ///
    /// Fails with [`MachineError::InvalidConfiguration`] if `size` is zero,
    /// `minimum > maximum`, or `default` lies outside `[minimum, maximum]`.
    pub fn new(size: usize, minimum: Cell, maximum: Cell, default: Cell) -> Result<Self, MachineError> {
        if size == 0 {
            return Err(MachineError::configuration("invalid memory size"));
        }
        if minimum > maximum {
            return Err(MachineError::configuration("invalid minimum memory value"));
        }
        if !(minimum..=maximum).contains(&default) {
            return Err(MachineError::configuration("invalid default memory value"));
        }
        Ok(Self {
            cells: vec![default; size],
            minimum,
            maximum,
        })
    }

    /// A default tape with `size` cells.
    pub fn with_size(size: usize) -> Result<Self, MachineError> {
        Self::new(size, MIN_VALUE, MAX_VALUE, MIN_VALUE)
    }

    pub fn read(&self, index: usize) -> Result<Cell, MachineError> {
        check_index(index, self.cells.len())?;
        Ok(self.cells[index])
    }

    pub fn write(&mut self, index: usize, value: Cell) -> Result<(), MachineError> {
        check_index(index, self.cells.len())?;
        if !self.contains(value) {
            return Err(MachineError::ValueOutOfRange {
                value,
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        self.cells[index] = value;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn minimum_value(&self) -> Cell {
        self.minimum
    }

    pub fn maximum_value(&self) -> Cell {
        self.maximum
    }

    /// Whether `value` may be stored in a cell.
    pub fn contains(&self, value: Cell) -> bool {
        (self.minimum..=self.maximum).contains(&value)
    }

    /// All cells, in tape order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            cells: vec![MIN_VALUE; DEFAULT_SIZE],
            minimum: MIN_VALUE,
            maximum: MAX_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Memory {
        Memory::new(3, 0, 5, 1).unwrap()
    }

    #[test]
    fn custom_values_are_kept() {
        let memory = small();
        assert_eq!(memory.size(), 3);
        assert_eq!(memory.minimum_value(), 0);
        assert_eq!(memory.maximum_value(), 5);
        assert!(memory.cells().iter().all(|&cell| cell == 1));
    }

    #[test]
    fn default_memory_matches_constants() {
        let memory = Memory::default();
        assert_eq!(memory.size(), DEFAULT_SIZE);
        assert_eq!(memory.minimum_value(), MIN_VALUE);
        assert_eq!(memory.maximum_value(), MAX_VALUE);
        assert!(memory.cells().iter().all(|&cell| cell == MIN_VALUE));
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(Memory::new(0, 0, 255, 0), Err(MachineError::InvalidConfiguration { .. })));
        assert!(matches!(Memory::new(10, 6, 5, 5), Err(MachineError::InvalidConfiguration { .. })));
        assert!(matches!(Memory::new(10, 0, 5, 6), Err(MachineError::InvalidConfiguration { .. })));
        assert!(matches!(Memory::new(10, 0, 5, -1), Err(MachineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn single_value_range_is_allowed() {
        let memory = Memory::new(1, 7, 7, 7).unwrap();
        assert_eq!(memory.read(0).unwrap(), 7);
    }

    #[test]
    fn write_then_read() {
        let mut memory = small();
        memory.write(2, 4).unwrap();
        assert_eq!(memory.read(2).unwrap(), 4);
        assert_eq!(memory.read(0).unwrap(), 1);
    }

    #[test]
    fn out_of_range_index_fails() {
        let mut memory = small();
        assert!(matches!(memory.read(3), Err(MachineError::IndexOutOfBounds { index: 3, size: 3 })));
        assert!(matches!(memory.write(3, 0), Err(MachineError::IndexOutOfBounds { .. })));
        assert!(matches!(memory.read(usize::MAX), Err(MachineError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn out_of_range_value_fails_and_leaves_cell_alone() {
        let mut memory = small();
        assert!(matches!(
            memory.write(0, 6),
            Err(MachineError::ValueOutOfRange { value: 6, minimum: 0, maximum: 5 })
        ));
        assert!(matches!(memory.write(0, -1), Err(MachineError::ValueOutOfRange { .. })));
        assert_eq!(memory.read(0).unwrap(), 1);
    }

    #[test]
    fn index_is_checked_before_value() {
        let mut memory = small();
        assert!(matches!(memory.write(99, 99), Err(MachineError::IndexOutOfBounds { .. })));
    }
}
