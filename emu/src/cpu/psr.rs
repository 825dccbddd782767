//! # Processor Status in R15
//!
//! The ARM2 has no separate CPSR: flags, interrupt masks and mode share R15
//! with the program counter.
//!
//! ```text
//! 31 30 29 28 27 26 25                                 2 1 0
//! ┌──┬──┬──┬──┬──┬──┬────────────────────────────────────┬───┐
//! │N │Z │C │V │I │F │        Program counter (word)      │ M │
//! └──┴──┴──┴──┴──┴──┴────────────────────────────────────┴───┘
//! ```
//!
//! - **Flags (28-31)**: See [`condition`](super::condition) for how these are tested
//! - **I/F bits (26-27)**: IRQ/FIQ disable
//! - **Mode (0-1)**: See [`cpu_modes`](super::cpu_modes)

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::{condition::Condition, cpu_modes::Mode};

/// Mask of the program counter bits of R15 (26-bit, word aligned).
pub const PC_MASK: u32 = 0x03FF_FFFC;

/// Typed view over the packed value of R15.
///
/// # Example
///
/// ```
/// use emu::cpu::psr::Psr;
///
/// let mut psr = Psr::default();
///
/// psr.set_zero_flag(true);
/// assert!(psr.zero_flag());
/// assert_eq!(psr.raw(), 0x4000_0000);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Tells whether an instruction guarded by `cond` executes with these flags.
    #[must_use]
    pub fn can_execute(self, cond: Condition) -> bool {
        use Condition::{AL, CC, CS, EQ, GE, GT, HI, LE, LS, LT, MI, NE, NV, PL, VC, VS};
        match cond {
            EQ => self.zero_flag(),                         // Equal (Z=1)
            NE => !self.zero_flag(),                        // Not equal (Z=0)
            CS => self.carry_flag(),                        // Unsigned higher or same (C=1)
            CC => !self.carry_flag(),                       // Unsigned lower (C=0)
            MI => self.sign_flag(),                         // Negative (N=1)
            PL => !self.sign_flag(),                        // Positive or zero (N=0)
            // Z, not V. Divergent from the architecture, see `condition`.
            VS => self.zero_flag(),
            VC => !self.zero_flag(),
            HI => self.carry_flag() && !self.zero_flag(),   // Unsigned higher (C=1 and Z=0)
            LS => !self.carry_flag() || self.zero_flag(),   // Unsigned lower or same (C=0 or Z=1)
            GE => self.sign_flag() == self.overflow_flag(), // Greater or equal (N=V)
            LT => self.sign_flag() != self.overflow_flag(), // Less than (N<>V)
            GT => !self.zero_flag() && (self.sign_flag() == self.overflow_flag()), // Greater than (Z=0 and N=V)
            LE => self.zero_flag() || (self.sign_flag() != self.overflow_flag()), // Less or equal (Z=1 or N<>V)
            AL => true,
            NV => false,
        }
    }

    /// N => Bit 31, (0=Not Signed, 1=Signed)
    #[must_use]
    pub fn sign_flag(self) -> bool {
        self.0.get_bit(31)
    }

    /// Z => Bit 30, (0=Not Zero, 1=Zero)
    #[must_use]
    pub fn zero_flag(self) -> bool {
        self.0.get_bit(30)
    }

    /// C => Bit 29, (0=Borrow/No Carry, 1=Carry/No Borrow)
    #[must_use]
    pub fn carry_flag(self) -> bool {
        self.0.get_bit(29)
    }

    /// V => Bit 28, (0=No Overflow, 1=Overflow)
    #[must_use]
    pub fn overflow_flag(self) -> bool {
        self.0.get_bit(28)
    }

    /// I => Bit 27, (0=Enable, 1=Disable)
    #[must_use]
    pub fn irq_disable(self) -> bool {
        self.0.get_bit(27)
    }

    /// F => Bit 26, (0=Enable, 1=Disable)
    #[must_use]
    pub fn fiq_disable(self) -> bool {
        self.0.get_bit(26)
    }

    /// M1-M0 => Bits 1-0
    #[must_use]
    pub fn mode(self) -> Mode {
        Mode::from(self.0)
    }

    #[must_use]
    pub const fn program_counter(self) -> u32 {
        self.0 & PC_MASK
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(31, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(30, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(29, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(28, value);
    }

    pub fn set_irq_disable(&mut self, value: bool) {
        self.0.set_bit(27, value);
    }

    pub fn set_fiq_disable(&mut self, value: bool) {
        self.0.set_bit(26, value);
    }

    pub fn set_mode(&mut self, m: Mode) {
        self.0.set_bits(0..=1, m.into());
    }

    /// Replaces the program counter bits, leaving flags and mode untouched.
    pub const fn set_program_counter(&mut self, value: u32) {
        self.0 = (self.0 & !PC_MASK) | (value & PC_MASK);
    }
}

impl From<u32> for Psr {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Psr> for u32 {
    fn from(psr: Psr) -> Self {
        psr.0
    }
}

impl std::fmt::Display for Psr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { c.to_ascii_lowercase() };
        write!(
            f,
            "{}{}{}{}{}{} {} PC={:08X}",
            flag(self.sign_flag(), 'N'),
            flag(self.zero_flag(), 'Z'),
            flag(self.carry_flag(), 'C'),
            flag(self.overflow_flag(), 'V'),
            flag(self.irq_disable(), 'I'),
            flag(self.fiq_disable(), 'F'),
            self.mode(),
            self.program_counter(),
        )
    }
}
