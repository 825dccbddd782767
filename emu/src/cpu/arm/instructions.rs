//! # ARM2 Instruction Decoding
//!
//! Every instruction is one 32-bit word. The decoder looks at bits 25-27 (and
//! only those) to pick the instruction class, the remaining fields are pulled
//! out into the matching [`ArmModeInstruction`] variant.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ARM2 Instruction Classes                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  word & 0x0E00_0000 == 0x0A00_0000   →  Branch (B/BL)                   │
//! │  word & 0x0C00_0000 == 0x0000_0000   →  Data Processing (decoded only)  │
//! │  word & 0x0C00_0000 == 0x0400_0000   →  Single Data Transfer (LDR/STR)  │
//! │  anything else                       →  Undefined                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checks run in that order, so the first match wins.
//!
//! ## Single Data Transfer Encoding
//!
//! ```text
//! LDRB R5, [R1, -R12 LSL 2]!
//!
//! 31-28  27-26  25  24  23  22  21  20  19-16  15-12  11-7    6-5  4  3-0
//! [1110] [ 01 ] [1] [1] [0] [1] [1] [1] [0001] [0101] [00010] [00] [0][1100]
//!   ↑       ↑    ↑   ↑   ↑   ↑   ↑   ↑    ↑      ↑      ↑      ↑       ↑
//!   │       │    │   │   │   │   │   │    │      │      │      │       └─ Rm = R12
//!   │       │    │   │   │   │   │   │    │      │      │      └───────── LSL
//!   │       │    │   │   │   │   │   │    │      │      └──────────────── Shift = 2
//!   │       │    │   │   │   │   │   │    │      └─────────────────────── Rd = R5
//!   │       │    │   │   │   │   │   │    └────────────────────────────── Rn = R1
//!   │       │    │   │   │   │   │   └─────────────────────────────────── Load
//!   │       │    │   │   │   │   └─────────────────────────────────────── Write back
//!   │       │    │   │   │   └─────────────────────────────────────────── Byte
//!   │       │    │   │   └─────────────────────────────────────────────── Down
//!   │       │    │   └─────────────────────────────────────────────────── Pre-indexed
//!   │       │    └─────────────────────────────────────────────────────── Register offset
//!   │       └──────────────────────────────────────────────────────────── Data transfer
//!   └──────────────────────────────────────────────────────────────────── Always execute
//! ```

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::condition::Condition;
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, OperandKind, ReadWriteKind, ShiftKind};

/// Mask applied to branch targets (26-bit address space).
pub const BRANCH_TARGET_MASK: u32 = 0x03FF_FFFF;

const CLASS_BRANCH_MASK: u32 = 0x0E00_0000;
const CLASS_BRANCH: u32 = 0x0A00_0000;
const CLASS_MASK: u32 = 0x0C00_0000;
const CLASS_DATA_PROCESSING: u32 = 0x0000_0000;
const CLASS_DATA_TRANSFER: u32 = 0x0400_0000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SingleDataTransferOffsetInfo {
    /// 12-bit unsigned offset.
    Immediate { offset: u32 },

    /// Register offset shifted by a 5-bit immediate amount.
    RegisterImmediate {
        shift_amount: u32,
        shift_kind: ShiftKind,
        reg_offset: usize,
    },
}

impl SingleDataTransferOffsetInfo {
    /// Whether the offset adds nothing, in which case the disassembly omits it.
    const fn is_zero_immediate(self) -> bool {
        matches!(self, Self::Immediate { offset: 0 })
    }
}

impl std::fmt::Display for SingleDataTransferOffsetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate { offset } => write!(f, "{offset}"),
            Self::RegisterImmediate {
                shift_amount,
                shift_kind,
                reg_offset,
            } => {
                write!(f, "R{reg_offset}")?;
                if *shift_amount > 0 {
                    write!(f, " {shift_kind} {shift_amount}")?;
                }
                Ok(())
            }
        }
    }
}

/// All ARM2 instruction classes after decoding.
///
/// | Variant              | Example Instructions | Executed           |
/// |----------------------|----------------------|--------------------|
/// | `Branch`             | B, BL                | yes                |
/// | `DataProcessing`     | AND, ADD, CMP, MOV   | no-op placeholder  |
/// | `SingleDataTransfer` | LDR, STR, LDRB, STRB | yes                |
/// | `Undefined`          | -                    | faults             |
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum ArmModeInstruction {
    Branch {
        condition: Condition,
        link: bool,
        /// Byte offset, the 24-bit field shifted left by 2. Never sign extended.
        offset: u32,
    },

    /// Recognised but not executed yet.
    DataProcessing { condition: Condition },

    SingleDataTransfer {
        condition: Condition,
        kind: LoadStoreKind,
        quantity: ReadWriteKind,
        /// Raw W bit. Post-indexed transfers write back regardless,
        /// see [`ArmModeInstruction::writes_back`].
        write_back: bool,
        indexing: Indexing,
        offsetting: Offsetting,
        rd: usize,
        base_register: usize,
        offset_info: SingleDataTransferOffsetInfo,
    },

    Undefined { condition: Condition },
}

impl ArmModeInstruction {
    #[must_use]
    pub const fn condition(&self) -> Condition {
        match self {
            Self::Branch { condition, .. }
            | Self::DataProcessing { condition }
            | Self::SingleDataTransfer { condition, .. }
            | Self::Undefined { condition } => *condition,
        }
    }

    /// Whether the base register is updated after the transfer.
    /// `false` for anything but a single data transfer.
    #[must_use]
    pub fn writes_back(&self) -> bool {
        matches!(
            self,
            Self::SingleDataTransfer { write_back, indexing, .. }
                if *write_back || *indexing == Indexing::Post
        )
    }

    /// Renders the instruction as assembly, `address` being where it was fetched from.
    #[must_use]
    pub fn disassembler(&self, address: u32) -> String {
        match self {
            Self::Branch {
                condition,
                link,
                offset,
            } => {
                let target = address.wrapping_add(*offset).wrapping_add(8) & BRANCH_TARGET_MASK;
                let op = if *link { "BL" } else { "B" };
                format!("{op}{condition} 0x{target:08X}")
            }
            Self::DataProcessing { condition } => format!("...{condition} ; ALU instruction"),
            Self::SingleDataTransfer {
                condition,
                kind,
                quantity,
                write_back,
                indexing,
                offsetting,
                rd,
                base_register: rn,
                offset_info,
            } => {
                let op = match kind {
                    LoadStoreKind::Load => "LDR",
                    LoadStoreKind::Store => "STR",
                };
                let b = match quantity {
                    ReadWriteKind::Byte => "B",
                    ReadWriteKind::Word => "",
                };
                let minus = match offsetting {
                    Offsetting::Down => "-",
                    Offsetting::Up => "",
                };
                let pling = if *write_back { "!" } else { "" };

                let address_text = match (indexing, offset_info.is_zero_immediate()) {
                    (Indexing::Pre, true) => format!("[R{rn}]{pling}"),
                    (Indexing::Pre, false) => format!("[R{rn}, {minus}{offset_info}]{pling}"),
                    (Indexing::Post, true) => format!("[R{rn}]"),
                    (Indexing::Post, false) => format!("[R{rn}], {minus}{offset_info}"),
                };

                format!("{op}{condition}{b} R{rd}, {address_text}")
            }
            Self::Undefined { condition } => format!("...{condition}"),
        }
    }
}

impl From<u32> for ArmModeInstruction {
    fn from(op_code: u32) -> Self {
        let condition = Condition::of_word(op_code);

        if op_code & CLASS_BRANCH_MASK == CLASS_BRANCH {
            let link = op_code.get_bit(24);
            let offset = op_code.get_bits(0..=23) << 2;
            Self::Branch {
                condition,
                link,
                offset,
            }
        } else if op_code & CLASS_MASK == CLASS_DATA_PROCESSING {
            Self::DataProcessing { condition }
        } else if op_code & CLASS_MASK == CLASS_DATA_TRANSFER {
            // NOTE: I=1 selects the register form here, unlike data processing.
            let op_kind = if op_code.get_bit(25) {
                OperandKind::Register
            } else {
                OperandKind::Immediate
            };
            let indexing: Indexing = op_code.get_bit(24).into();
            let offsetting: Offsetting = op_code.get_bit(23).into();
            let quantity: ReadWriteKind = op_code.get_bit(22).into();
            let write_back = op_code.get_bit(21);
            let kind: LoadStoreKind = op_code.get_bit(20).into();
            let rn = op_code.get_bits(16..=19) as usize;
            let rd = op_code.get_bits(12..=15) as usize;

            let offset_info = match op_kind {
                OperandKind::Immediate => SingleDataTransferOffsetInfo::Immediate {
                    offset: op_code.get_bits(0..=11),
                },
                OperandKind::Register => SingleDataTransferOffsetInfo::RegisterImmediate {
                    shift_amount: op_code.get_bits(7..=11),
                    shift_kind: op_code.get_bits(5..=6).into(),
                    reg_offset: op_code.get_bits(0..=3) as usize,
                },
            };

            Self::SingleDataTransfer {
                condition,
                kind,
                quantity,
                write_back,
                indexing,
                offsetting,
                rd,
                base_register: rn,
                offset_info,
            }
        } else {
            tracing::trace!("no instruction class matches {op_code:#010X}");
            Self::Undefined { condition }
        }
    }
}

impl std::fmt::Display for ArmModeInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
