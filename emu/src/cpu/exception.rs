//! # Exception Vectors
//!
//! The first eight words of the address space. Only [`ExceptionVector::Reset`]
//! is used, to seed the program counter at power on; the others are not
//! dispatched to.
//!
//! | Address | Vector                | Entered on                          |
//! |---------|-----------------------|-------------------------------------|
//! | 0x00    | Reset                 | power on                            |
//! | 0x04    | Undefined instruction | no instruction class matched        |
//! | 0x08    | Software interrupt    | SWI                                 |
//! | 0x0C    | Prefetch abort        | fetch from an aborted address       |
//! | 0x10    | Data abort            | data access to an aborted address   |
//! | 0x14    | Address exception     | address outside the 26-bit space    |
//! | 0x18    | IRQ                   | interrupt request                   |
//! | 0x1C    | FIRQ                  | fast interrupt request              |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ExceptionVector {
    Reset = 0x00,
    UndefinedInstruction = 0x04,
    SoftwareInterrupt = 0x08,
    PrefetchAbort = 0x0C,
    DataAbort = 0x10,
    AddressException = 0x14,
    Irq = 0x18,
    Firq = 0x1C,
}

impl ExceptionVector {
    pub const ALL: [Self; 8] = [
        Self::Reset,
        Self::UndefinedInstruction,
        Self::SoftwareInterrupt,
        Self::PrefetchAbort,
        Self::DataAbort,
        Self::AddressException,
        Self::Irq,
        Self::Firq,
    ];

    #[must_use]
    pub const fn address(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for ExceptionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reset => "reset",
            Self::UndefinedInstruction => "undefined instruction",
            Self::SoftwareInterrupt => "software interrupt",
            Self::PrefetchAbort => "prefetch abort",
            Self::DataAbort => "data abort",
            Self::AddressException => "address exception",
            Self::Irq => "IRQ",
            Self::Firq => "FIRQ",
        };
        write!(f, "{name} ({:#04X})", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vectors_are_consecutive_words() {
        for (i, vector) in ExceptionVector::ALL.into_iter().enumerate() {
            assert_eq!(vector.address(), i as u32 * 4);
        }
    }

    #[test]
    fn display() {
        assert_eq!(ExceptionVector::Firq.to_string(), "FIRQ (0x1C)");
    }
}
