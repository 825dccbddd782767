//! # ARM Conditional Execution
//!
//! Every ARM instruction carries a condition in its top 4 bits (31-28). The
//! instruction only executes when the condition holds for the current flags,
//! otherwise it behaves as a NOP.
//!
//! ## The Flags (R15 bits 28-31)
//!
//! On the ARM2 the flags are not kept in a separate CPSR: they live in the top
//! of R15, next to the program counter and the mode bits.
//!
//! ```text
//! 31 30 29 28 27 26 25                                 2 1 0
//! ┌──┬──┬──┬──┬──┬──┬────────────────────────────────────┬───┐
//! │N │Z │C │V │I │F │        Program counter (word)      │ M │
//! └──┴──┴──┴──┴──┴──┴────────────────────────────────────┴───┘
//! ```
//!
//! ## Condition Codes
//!
//! ```text
//! ┌───────┬────────┬─────────────────────────────────┐
//! │ Code  │ Suffix │          Flags Tested           │
//! ├───────┼────────┼─────────────────────────────────┤
//! │ 0000  │   EQ   │ Z=1                             │
//! │ 0001  │   NE   │ Z=0                             │
//! │ 0010  │   CS   │ C=1                             │
//! │ 0011  │   CC   │ C=0                             │
//! │ 0100  │   MI   │ N=1                             │
//! │ 0101  │   PL   │ N=0                             │
//! │ 0110  │   VS   │ Z=1 (see note)                  │
//! │ 0111  │   VC   │ Z=0 (see note)                  │
//! │ 1000  │   HI   │ C=1 AND Z=0                     │
//! │ 1001  │   LS   │ C=0 OR Z=1                      │
//! │ 1010  │   GE   │ N=V                             │
//! │ 1011  │   LT   │ N≠V                             │
//! │ 1100  │   GT   │ Z=0 AND N=V                     │
//! │ 1101  │   LE   │ Z=1 OR N≠V                      │
//! │ 1110  │   AL   │ (unconditional)                 │
//! │ 1111  │   NV   │ (never)                         │
//! └───────┴────────┴─────────────────────────────────┘
//! ```
//!
//! NOTE: VS and VC test the Z flag here, not V as the architecture manual
//! says. Leave it alone until it can be checked against a hardware trace.
//!
//! The evaluation itself lives in [`Psr::can_execute`](super::psr::Psr::can_execute).

use serde::{Deserialize, Serialize};

/// Condition codes for ARM conditional execution.
///
/// See the [module-level documentation](self) for the flags each one tests.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Condition {
    /// Equal (Z=1)
    EQ = 0x0,

    /// Not equal (Z=0)
    NE = 0x1,

    /// Carry set / unsigned higher or same (C=1)
    CS = 0x2,

    /// Carry clear / unsigned lower (C=0)
    CC = 0x3,

    /// Minus / negative (N=1)
    MI = 0x4,

    /// Plus / positive or zero (N=0)
    PL = 0x5,

    /// Overflow set.
    VS = 0x6,

    /// Overflow clear.
    VC = 0x7,

    /// Unsigned higher (C=1 AND Z=0)
    HI = 0x8,

    /// Unsigned lower or same (C=0 OR Z=1)
    LS = 0x9,

    /// Signed greater or equal (N=V)
    GE = 0xA,

    /// Signed less than (N≠V)
    LT = 0xB,

    /// Signed greater than (Z=0 AND N=V)
    GT = 0xC,

    /// Signed less than or equal (Z=1 OR N≠V)
    LE = 0xD,

    /// Always (unconditional)
    ///
    /// This is the default when no condition suffix is written in assembly
    /// (e.g., `B` = `BAL`), so it prints as an empty suffix.
    AL = 0xE,

    /// Never
    ///
    /// On the ARM2 this really means "never execute".
    NV = 0xF,
}

impl Condition {
    /// Reads the condition field (bits 28-31) of an instruction word.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn of_word(word: u32) -> Self {
        Self::from_nibble((word >> 28) as u8)
    }

    /// Maps the low 4 bits of `item` to a condition.
    #[must_use]
    pub const fn from_nibble(item: u8) -> Self {
        match item & 0xF {
            0x0 => Self::EQ,
            0x1 => Self::NE,
            0x2 => Self::CS,
            0x3 => Self::CC,
            0x4 => Self::MI,
            0x5 => Self::PL,
            0x6 => Self::VS,
            0x7 => Self::VC,
            0x8 => Self::HI,
            0x9 => Self::LS,
            0xA => Self::GE,
            0xB => Self::LT,
            0xC => Self::GT,
            0xD => Self::LE,
            0xE => Self::AL,
            _ => Self::NV,
        }
    }
}

impl From<u8> for Condition {
    fn from(item: u8) -> Self {
        Self::from_nibble(item)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EQ => f.write_str("EQ"),
            Self::NE => f.write_str("NE"),
            Self::CS => f.write_str("CS"),
            Self::CC => f.write_str("CC"),
            Self::MI => f.write_str("MI"),
            Self::PL => f.write_str("PL"),
            Self::VS => f.write_str("VS"),
            Self::VC => f.write_str("VC"),
            Self::HI => f.write_str("HI"),
            Self::LS => f.write_str("LS"),
            Self::GE => f.write_str("GE"),
            Self::LT => f.write_str("LT"),
            Self::GT => f.write_str("GT"),
            Self::LE => f.write_str("LE"),
            Self::AL => Ok(()),
            Self::NV => f.write_str("NV"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn condition_from_word() {
        assert_eq!(Condition::of_word(0xEA00_0000), Condition::AL);
        assert_eq!(Condition::of_word(0x0A00_0000), Condition::EQ);
        assert_eq!(Condition::of_word(0xF000_0000), Condition::NV);
        assert_eq!(Condition::of_word(0x6500_0000), Condition::VS);
    }

    #[test]
    fn every_nibble_roundtrips() {
        for code in 0..=0xF_u8 {
            assert_eq!(Condition::from(code) as u8, code);
        }
    }

    #[test]
    fn mnemonic_suffixes() {
        assert_eq!(Condition::EQ.to_string(), "EQ");
        assert_eq!(Condition::LE.to_string(), "LE");
        assert_eq!(Condition::AL.to_string(), "");
        assert_eq!(Condition::NV.to_string(), "NV");
    }
}
