//! # ARM2 Register File
//!
//! 16 registers are visible at any time:
//!
//! - **R0-R12**: General purpose
//! - **R13**: Stack pointer (by convention)
//! - **R14 (LR)**: Link register (return address)
//! - **R15**: Program counter, flags and mode packed together, see [`psr`](super::psr)
//!
//! Some of them are banked: the storage behind a register number depends on
//! the mode held in R15. All 27 physical registers are kept in one array:
//!
//! ```text
//! slot  0..=15   R0-R15 (User, and unbanked registers of every mode)
//! slot 16..=22   R8_fiq-R14_fiq
//! slot 23..=24   R13_irq, R14_irq
//! slot 25..=26   R13_svc, R14_svc
//! ```

use serde::{Deserialize, Serialize};

use crate::cpu::cpu_modes::Mode;
use crate::cpu::psr::Psr;

/// Link Register index (return address for subroutines).
pub const REG_LR: usize = 0xE;

/// Program Counter register index.
pub const REG_PROGRAM_COUNTER: usize = 0xF;

/// Number of physical register slots, banked copies included.
pub const PHYSICAL_REGISTERS: usize = 27;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    registers: [u32; PHYSICAL_REGISTERS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            registers: [0; PHYSICAL_REGISTERS],
        }
    }
}

impl RegisterFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical slot holding `reg` in `mode`.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is not a register number (0..=15).
    #[must_use]
    pub fn slot(mode: Mode, reg: usize) -> usize {
        assert!(reg <= 15, "Invalid register index: {reg} (0x{reg:X})");

        if reg == REG_PROGRAM_COUNTER {
            return REG_PROGRAM_COUNTER;
        }

        match mode {
            Mode::Fiq if reg >= 8 => reg + 8,
            Mode::Irq if reg >= 13 => reg + 10,
            Mode::Supervisor if reg >= 13 => reg + 12,
            _ => reg,
        }
    }

    /// Current mode, from the two lowest bits of R15.
    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode::from(self.registers[REG_PROGRAM_COUNTER])
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let mut psr = self.psr();
        psr.set_mode(mode);
        self.registers[REG_PROGRAM_COUNTER] = psr.into();
    }

    /// Reads `reg` through the banking of the current mode.
    /// For R15 this is the whole packed value (flags, mode and address).
    #[must_use]
    pub fn get(&self, reg: usize) -> u32 {
        self.registers[Self::slot(self.mode(), reg)]
    }

    /// Writes `reg` through the banking of the current mode.
    /// For R15 this replaces flags and mode too: the low two bits of `value`
    /// become the mode, so the address part stays word aligned.
    pub fn set(&mut self, reg: usize, value: u32) {
        self.registers[Self::slot(self.mode(), reg)] = value;
    }

    /// Like [`get`](Self::get), but only the address bits of R15 are returned.
    #[must_use]
    pub fn get_address(&self, reg: usize) -> u32 {
        if reg == REG_PROGRAM_COUNTER {
            self.psr().program_counter()
        } else {
            self.get(reg)
        }
    }

    /// Like [`set`](Self::set), but for R15 only the address bits are written.
    pub fn set_address(&mut self, reg: usize, value: u32) {
        if reg == REG_PROGRAM_COUNTER {
            let mut psr = self.psr();
            psr.set_program_counter(value);
            self.registers[REG_PROGRAM_COUNTER] = psr.into();
        } else {
            self.set(reg, value);
        }
    }

    #[must_use]
    pub fn program_counter(&self) -> u32 {
        self.get_address(REG_PROGRAM_COUNTER)
    }

    pub fn set_program_counter(&mut self, value: u32) {
        self.set_address(REG_PROGRAM_COUNTER, value);
    }

    #[must_use]
    pub fn psr(&self) -> Psr {
        Psr::from(self.registers[REG_PROGRAM_COUNTER])
    }

    pub fn set_psr(&mut self, psr: Psr) {
        self.registers[REG_PROGRAM_COUNTER] = psr.into();
    }

    /// The 16 registers visible in the current mode.
    #[must_use]
    pub fn visible(&self) -> [u32; 16] {
        std::array::from_fn(|reg| self.get(reg))
    }
}
