use thiserror::Error;

/// Outcome of a single successful `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An instruction executed normally
    Ok,
    /// An `FX0A` is waiting for a key to be pressed; the pc has not moved
    AwaitingInput,
    /// The word wasn't a known instruction and was skipped
    UnknownOpcode(u16),
}

/// Conditions that stop the machine.
///
/// The state is left as it was before the failing operation so an embedder can report the
/// problem and then `reset` or load another ROM.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM is {size} bytes but only {max} bytes of program memory are available")]
    OutOfSpace { size: usize, max: usize },

    #[error("stack overflow calling a subroutine at {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from a subroutine at {pc:#06X}")]
    StackUnderflow { pc: u16 },

    #[error("cannot fetch an instruction at {pc:#06X}")]
    InvalidFetch { pc: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("failed to read ROM")]
    Io(#[from] std::io::Error),
}
