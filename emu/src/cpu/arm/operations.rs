use crate::cpu::arm::instructions::{
    ArmModeInstruction, BRANCH_TARGET_MASK, SingleDataTransferOffsetInfo,
};
use crate::cpu::arm::mode::ArmModeOpcode;
use crate::cpu::arm2::Arm2;
use crate::cpu::fault::Fault;
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, ReadWriteKind};
use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER};
use crate::disassembly::DisassemblySink;

pub const SIZE_OF_INSTRUCTION: u32 = 4;

/// What the step has to do with the pipeline once an instruction ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Nothing special, the next word follows.
    Continue,

    /// R15 was written: the next fetch comes from the new program counter.
    Flush,
}

impl<S: DisassemblySink> Arm2<'_, S> {
    /// Runs an instruction whose condition already passed.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] for [`ArmModeInstruction::Undefined`], leaving the
    /// machine untouched.
    pub(crate) fn execute_arm(&mut self, address: u32, op_code: ArmModeOpcode) -> Result<Flow, Fault> {
        let flow = match op_code.instruction {
            ArmModeInstruction::Branch { link, offset, .. } => self.branch(link, offset),
            ArmModeInstruction::DataProcessing { .. } => self.data_processing(op_code),
            ArmModeInstruction::SingleDataTransfer {
                kind,
                quantity,
                indexing,
                offsetting,
                rd,
                base_register,
                offset_info,
                ..
            } => self.single_data_transfer(
                kind,
                quantity,
                op_code.instruction.writes_back(),
                indexing,
                offsetting,
                rd,
                base_register,
                offset_info,
            ),
            ArmModeInstruction::Undefined { .. } => {
                return Err(Fault::undefined_instruction(address, op_code.raw));
            }
        };

        Ok(flow)
    }

    /// B and BL. `offset` is added to the pipelined program counter as is.
    pub(crate) fn branch(&mut self, is_link: bool, offset: u32) -> Flow {
        let pc = self.registers.program_counter();

        if is_link {
            self.registers.set(REG_LR, pc);
        }

        let target = pc.wrapping_add(offset) & BRANCH_TARGET_MASK;
        tracing::trace!("branch to {target:#010X}");
        self.registers.set_program_counter(target);

        Flow::Flush
    }

    /// Placeholder for the ALU family, it changes nothing.
    #[allow(clippy::unused_self)]
    pub(crate) fn data_processing(&self, op_code: ArmModeOpcode) -> Flow {
        tracing::trace!("data processing {:#010X} not executed", op_code.raw);
        Flow::Continue
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn single_data_transfer(
        &mut self,
        kind: LoadStoreKind,
        quantity: ReadWriteKind,
        write_back: bool,
        indexing: Indexing,
        offsetting: Offsetting,
        rd: usize,
        base_register: usize,
        offset_info: SingleDataTransferOffsetInfo,
    ) -> Flow {
        let base = self.registers.get_address(base_register);

        let amount = match offset_info {
            SingleDataTransferOffsetInfo::Immediate { offset } => offset,
            SingleDataTransferOffsetInfo::RegisterImmediate {
                shift_amount,
                shift_kind,
                reg_offset,
            } => shift_kind.apply(self.registers.get(reg_offset), shift_amount),
        };

        let offset_address = offsetting.apply(base, amount);

        let address = match indexing {
            Indexing::Pre => offset_address,
            Indexing::Post => base,
        };

        match (kind, quantity) {
            (LoadStoreKind::Load, ReadWriteKind::Word) => {
                let value = self.memory.load_word(address);
                self.registers.set_address(rd, value);
            }
            (LoadStoreKind::Load, ReadWriteKind::Byte) => {
                let value = self.memory.load_byte(address);
                self.registers.set_address(rd, u32::from(value));
            }
            (LoadStoreKind::Store, ReadWriteKind::Word) => {
                let value = self.registers.get(rd);
                self.memory.store_word(address, value);
            }
            (LoadStoreKind::Store, ReadWriteKind::Byte) => {
                let value = self.registers.get(rd) as u8;
                self.memory.store_byte(address, value);
            }
        }

        // Runs after the transfer, so it wins over a load into the base register.
        if write_back {
            self.registers.set_address(base_register, offset_address);
        }

        let loads_pc = kind == LoadStoreKind::Load && rd == REG_PROGRAM_COUNTER;
        let updates_pc = write_back && base_register == REG_PROGRAM_COUNTER;
        if loads_pc || updates_pc {
            Flow::Flush
        } else {
            Flow::Continue
        }
    }
}
