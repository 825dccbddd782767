use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cpu::exception::ExceptionVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FaultKind {
    /// The condition passed but no instruction class matched the word.
    #[error("undefined instruction")]
    UndefinedInstruction,
}

impl FaultKind {
    /// Vector a complete machine would jump to. Nothing dispatches to it yet.
    #[must_use]
    pub const fn vector(self) -> ExceptionVector {
        match self {
            Self::UndefinedInstruction => ExceptionVector::UndefinedInstruction,
        }
    }
}

/// A step that could not complete. The machine state is left as it was
/// before the faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind} at {address:#010X} (word {word:#010X})")]
pub struct Fault {
    pub kind: FaultKind,

    /// Fetch address of the faulting instruction.
    pub address: u32,

    pub word: u32,
}

impl Fault {
    #[must_use]
    pub const fn undefined_instruction(address: u32, word: u32) -> Self {
        Self {
            kind: FaultKind::UndefinedInstruction,
            address,
            word,
        }
    }
}
