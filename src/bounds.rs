use crate::error::MachineError;

/// Reject `index` unless it lies in `[0, size)`.
///
/// Every index-taking accessor on [`Program`](crate::Program) and
/// [`Memory`](crate::Memory) calls this before touching its storage.
#[inline]
pub(crate) fn check_index(index: usize, size: usize) -> Result<(), MachineError> {
    if index < size {
        Ok(())
    } else {
        Err(MachineError::IndexOutOfBounds { index, size })
    }
}
