//! # ARM2 Core
//!
//! One [`Arm2::step`] is a full fetch, decode, condition, execute and advance
//! cycle. There is no real pipeline: the program counter simply stays
//! [`PIPELINE_OFFSET`] bytes ahead of the instruction being fetched.
//!
//! ```text
//!   PC - 8 ──fetch──▶ word ──decode──▶ ArmModeOpcode
//!                                          │
//!                          condition fails │ condition passes
//!                     ┌────────────────────┴──────────────┐
//!                     ▼                                   ▼
//!                  PC += 4                             execute
//!                                                         │
//!                               ┌─────────────────────────┴───────────┐
//!                               ▼                                     ▼
//!                 PC untouched, no flush: PC += 4      PC moved or flushed: PC += 8
//! ```
//!
//! Control flow instructions compute their target from the pipelined PC and
//! the step adds the 8 bytes back on top: a `B` with offset 0 fetched at 0
//! continues at 8.

use serde::{Deserialize, Serialize};

use crate::cpu::arm::mode::ArmModeOpcode;
use crate::cpu::arm::operations::{Flow, SIZE_OF_INSTRUCTION};
use crate::cpu::exception::ExceptionVector;
use crate::cpu::fault::Fault;
use crate::cpu::psr::PC_MASK;
use crate::cpu::registers::{REG_PROGRAM_COUNTER, RegisterFile};
use crate::disassembly::{DisassemblySink, TracingSink, format_line};
use crate::memory::Memory;

/// Bytes the program counter runs ahead of the fetched instruction.
pub const PIPELINE_OFFSET: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The condition passed and the instruction ran.
    Executed,

    /// The condition failed, only the program counter moved.
    Skipped,
}

/// Everything needed to resume a machine, except the ROM image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub registers: RegisterFile,
    pub ram: Vec<u8>,
    pub rom_mapped_low: bool,
    pub steps: u64,
}

pub struct Arm2<'rom, S: DisassemblySink = TracingSink> {
    pub registers: RegisterFile,
    pub memory: Memory<'rom>,

    sink: S,
    steps: u64,
}

impl<'rom> Arm2<'rom> {
    /// Powers on a machine reading `rom`, with disassembly sent to `tracing`.
    #[must_use]
    pub fn new(rom: &'rom [u8]) -> Self {
        Self::with_sink(rom, TracingSink)
    }
}

impl<'rom, S: DisassemblySink> Arm2<'rom, S> {
    /// Powers on a machine reading `rom`: User mode, flags clear, and the
    /// program counter at the reset vector plus the pipeline offset.
    #[must_use]
    pub fn with_sink(rom: &'rom [u8], sink: S) -> Self {
        let mut registers = RegisterFile::new();
        registers.set(
            REG_PROGRAM_COUNTER,
            ExceptionVector::Reset.address() + PIPELINE_OFFSET,
        );

        Self {
            registers,
            memory: Memory::new(rom),
            sink,
            steps: 0,
        }
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Steps completed so far, skipped ones included.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Address the next step fetches from.
    #[must_use]
    pub fn fetch_address(&self) -> u32 {
        self.registers.program_counter().wrapping_sub(PIPELINE_OFFSET) & PC_MASK
    }

    /// Runs exactly one cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] when the condition passes on an undefined
    /// instruction. Registers and memory are left as they were, including the
    /// program counter, so stepping again faults again.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        let pc_before = self.registers.program_counter();
        let fetch_address = self.fetch_address();

        let word = self.memory.load_word(fetch_address);
        let op_code = ArmModeOpcode::from(word);

        let text = op_code.instruction.disassembler(fetch_address);
        self.sink.consume(format_line(fetch_address, word, &text));

        if !self.registers.psr().can_execute(op_code.condition) {
            self.registers
                .set_program_counter(pc_before.wrapping_add(SIZE_OF_INSTRUCTION));
            self.steps += 1;
            return Ok(StepOutcome::Skipped);
        }

        let flow = self.execute_arm(fetch_address, op_code)?;

        let pc_after = self.registers.program_counter();
        let advance = if flow == Flow::Flush || pc_after != pc_before {
            PIPELINE_OFFSET
        } else {
            SIZE_OF_INSTRUCTION
        };
        self.registers
            .set_program_counter(pc_after.wrapping_add(advance));
        self.steps += 1;

        Ok(StepOutcome::Executed)
    }

    /// Steps until one faults. Never returns otherwise.
    pub fn run(&mut self) -> Fault {
        loop {
            if let Err(fault) = self.step() {
                return fault;
            }
        }
    }

    /// Runs at most `max_steps` cycles and returns how many completed.
    ///
    /// # Errors
    ///
    /// Stops at the first [`Fault`] and returns it.
    pub fn run_for(&mut self, max_steps: u64) -> Result<u64, Fault> {
        for done in 0..max_steps {
            if let Err(fault) = self.step() {
                tracing::debug!("stopped after {done} steps: {fault}");
                return Err(fault);
            }
        }

        Ok(max_steps)
    }

    #[must_use]
    pub fn snapshot(&self) -> MachineState {
        MachineState {
            registers: self.registers.clone(),
            ram: self.memory.ram().to_vec(),
            rom_mapped_low: self.memory.is_rom_mapped_low(),
            steps: self.steps,
        }
    }

    pub fn restore(&mut self, state: MachineState) {
        self.memory.load_ram(&state.ram);
        self.memory.map_rom_low(state.rom_mapped_low);
        self.registers = state.registers;
        self.steps = state.steps;
    }
}

impl<S: DisassemblySink> std::fmt::Debug for Arm2<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arm2")
            .field("psr", &self.registers.psr().to_string())
            .field("registers", &self.registers.visible())
            .field("memory", &self.memory)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::condition::Condition;
    use crate::cpu::fault::FaultKind;
    use crate::cpu::registers::REG_LR;
    use pretty_assertions::assert_eq;

    fn rom_with(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn power_on_state() {
        let cpu = Arm2::new(&[]);
        assert_eq!(cpu.registers.get(15), 8);
        assert_eq!(cpu.fetch_address(), 0);
        assert_eq!(cpu.steps(), 0);
        assert!(cpu.memory.is_rom_mapped_low());
    }

    #[test]
    fn branch_with_zero_offset() {
        let rom = rom_with(&[0xEA00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        cpu.registers.set(REG_LR, 0x1234);

        assert_eq!(cpu.step(), Ok(StepOutcome::Executed));
        assert_eq!(cpu.fetch_address(), 0x8);
        assert_eq!(cpu.registers.get(REG_LR), 0x1234);
    }

    #[test]
    fn branch_with_link() {
        let rom = rom_with(&[0xEB00_0010]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

        cpu.step().unwrap();
        assert_eq!(cpu.registers.get(REG_LR), 0x8);
        assert_eq!(cpu.fetch_address(), 0x48);
    }

    #[test]
    fn straight_line_advances_by_one_word() {
        // Two ALU placeholders.
        let rom = rom_with(&[0xE3A0_0001, 0xE3A0_1002]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

        cpu.step().unwrap();
        assert_eq!(cpu.fetch_address(), 4);
        cpu.step().unwrap();
        assert_eq!(cpu.fetch_address(), 8);
        assert_eq!(cpu.steps(), 2);
    }

    #[test]
    fn failed_condition_skips() {
        // BEQ with Z clear, then BNE.
        let rom = rom_with(&[0x0A00_0010, 0x1A00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

        assert_eq!(cpu.step(), Ok(StepOutcome::Skipped));
        assert_eq!(cpu.fetch_address(), 4);
        assert_eq!(cpu.step(), Ok(StepOutcome::Executed));
        assert_eq!(cpu.fetch_address(), 4 + 8);
    }

    #[test]
    fn condition_uses_flags_in_r15() {
        let rom = rom_with(&[0x0A00_0010]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        let mut psr = cpu.registers.psr();
        psr.set_zero_flag(true);
        cpu.registers.set_psr(psr);

        assert_eq!(cpu.step(), Ok(StepOutcome::Executed));
        assert_eq!(cpu.fetch_address(), 0x48);
        assert!(cpu.registers.psr().zero_flag());
    }

    #[test]
    fn undefined_instruction_faults_without_moving() {
        let rom = rom_with(&[0xEF00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

        let fault = cpu.step().unwrap_err();
        assert_eq!(fault.kind, FaultKind::UndefinedInstruction);
        assert_eq!(fault.address, 0);
        assert_eq!(fault.word, 0xEF00_0000);
        assert_eq!(cpu.fetch_address(), 0);
        assert_eq!(cpu.steps(), 0);
    }

    #[test]
    fn undefined_instruction_with_failed_condition_is_skipped() {
        let rom = rom_with(&[0xFF00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        assert_eq!(cpu.step(), Ok(StepOutcome::Skipped));
        assert_eq!(Condition::of_word(0xFF00_0000), Condition::NV);
    }

    #[test]
    fn every_step_logs_a_line() {
        let rom = rom_with(&[0x0A00_0010, 0xE3A0_0001, 0xEF00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

        assert!(cpu.run_for(10).is_err());
        assert_eq!(
            cpu.sink(),
            &vec![
                "00000000  0A000010  BEQ 0x00000048".to_string(),
                "00000004  E3A00001  ... ; ALU instruction".to_string(),
                "00000008  EF000000  ...".to_string(),
            ]
        );
    }

    #[test]
    fn run_returns_the_fault() {
        let rom = rom_with(&[0xE3A0_0001, 0xE3A0_0001, 0xE800_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        let fault = cpu.run();
        assert_eq!(fault, Fault::undefined_instruction(8, 0xE800_0000));
        assert_eq!(cpu.steps(), 2);
    }

    #[test]
    fn run_for_is_bounded() {
        // The unsigned offset wraps around the 26-bit space back to 0.
        let rom = rom_with(&[0xEAFF_FFFE]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        assert_eq!(cpu.run_for(100), Ok(100));
        assert_eq!(cpu.steps(), 100);
        assert_eq!(cpu.fetch_address(), 0);
        assert_eq!(cpu.sink().len(), 100);
    }

    #[test]
    fn snapshot_and_restore() {
        let rom = rom_with(&[0xEA00_0000]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        cpu.step().unwrap();
        cpu.memory.store_word(0x0200_0000, 0xFEED);
        let state = cpu.snapshot();

        cpu.step().unwrap();
        cpu.memory.store_word(0x0200_0000, 0);
        cpu.memory.map_rom_low(false);

        cpu.restore(state.clone());
        assert_eq!(cpu.snapshot(), state);
        assert_eq!(cpu.memory.load_word(0x0200_0000), 0xFEED);
        assert!(cpu.memory.is_rom_mapped_low());
        assert_eq!(cpu.steps(), 1);
    }
}
