use serde::{Deserialize, Serialize};

use crate::cpu::arm::instructions::ArmModeInstruction;
use crate::cpu::condition::Condition;

/// A fetched word together with its decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmModeOpcode {
    pub instruction: ArmModeInstruction,
    pub condition: Condition,
    pub raw: u32,
}

impl From<u32> for ArmModeOpcode {
    fn from(op_code: u32) -> Self {
        Self {
            instruction: ArmModeInstruction::from(op_code),
            condition: Condition::of_word(op_code),
            raw: op_code,
        }
    }
}

impl std::ops::Deref for ArmModeOpcode {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl std::fmt::Display for ArmModeOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instruction = format!("INS: {}\n", self.instruction);

        let bytes_pos1 = "POS: |..3 ..................2 ..................1 ..................0|\n";
        let bytes_pos2 = "     |1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|\n";

        let op_code_format = match &self.instruction {
            ArmModeInstruction::Branch { .. } => {
                "FMT: |_Cond__|1_0_1|L|______________________Offset___________________|"
            }
            ArmModeInstruction::DataProcessing { .. } => {
                "FMT: |_Cond__|0_0|I|_code__|S|__Rn___|__Rd___|_______operand2________|"
            }
            ArmModeInstruction::SingleDataTransfer { .. } => {
                "FMT: |_Cond__|0_1|I|P|U|B|W|L|__Rn___|__Rd___|________Offset_________|"
            }
            ArmModeInstruction::Undefined { .. } => "FMT: |_Cond__|",
        };

        let mut raw_bits = String::new();
        for i in format!("{:#034b}", self.raw).chars().skip(2) {
            raw_bits.push(i);
            raw_bits.push('_');
        }
        raw_bits.pop();
        let raw_bits = format!("RAW: |{raw_bits}|\n");

        writeln!(
            f,
            "{instruction}{bytes_pos1}{bytes_pos2}{raw_bits}{op_code_format}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn condition_comes_from_top_nibble() {
        let op = ArmModeOpcode::from(0x1A00_0000);
        assert_eq!(op.condition, Condition::NE);
        assert_eq!(op.instruction.condition(), Condition::NE);
        assert_eq!(*op, 0x1A00_0000);
    }

    #[test]
    fn display_shows_layout() {
        let op = ArmModeOpcode::from(0xEA00_0000);
        let text = op.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[3],
            "RAW: |1_1_1_0_1_0_1_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0_0|"
        );
        assert!(lines[4].starts_with("FMT: |_Cond__|1_0_1|L|"));
    }
}
