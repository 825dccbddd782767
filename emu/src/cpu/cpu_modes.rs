//! # Processor Modes
//!
//! The ARM2 keeps its mode in the two lowest bits of R15 (which are never
//! part of the program counter, since instructions are word aligned).
//!
//! | Bits | Mode       | Banked registers |
//! |------|------------|------------------|
//! | 00   | User       | none             |
//! | 01   | FIQ        | R8-R14           |
//! | 10   | IRQ        | R13-R14          |
//! | 11   | Supervisor | R13-R14          |
//!
//! See [`registers`](super::registers) for how banking selects the storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum Mode {
    /// The normal program execution state.
    #[default]
    User = 0b00,

    /// Fast interrupt, designed to support a data transfer or channel process.
    Fiq = 0b01,

    /// Used for general-purpose interrupt handling.
    Irq = 0b10,

    /// Protected mode for the operating system.
    Supervisor = 0b11,
}

impl Mode {
    /// First banked register number for this mode, if any.
    #[must_use]
    pub const fn first_banked_register(self) -> Option<usize> {
        match self {
            Self::User => None,
            Self::Fiq => Some(8),
            Self::Irq | Self::Supervisor => Some(13),
        }
    }
}

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m as Self
    }
}

impl From<u32> for Mode {
    /// Only the two lowest bits are considered, so every value maps to a mode.
    fn from(n: u32) -> Self {
        match n & 0b11 {
            0b00 => Self::User,
            0b01 => Self::Fiq,
            0b10 => Self::Irq,
            _ => Self::Supervisor,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("USR"),
            Self::Fiq => f.write_str("FIQ"),
            Self::Irq => f.write_str("IRQ"),
            Self::Supervisor => f.write_str("SVC"),
        }
    }
}
