use serde::{Deserialize, Serialize};

/// There two different kind of write or read for memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadWriteKind {
    /// Word is a u32 value.
    #[default]
    Word,

    /// Byte is a u8 value.
    Byte,
}

impl From<bool> for ReadWriteKind {
    fn from(value: bool) -> Self {
        if value { Self::Byte } else { Self::Word }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStoreKind {
    Store,
    Load,
}

impl From<bool> for LoadStoreKind {
    fn from(b: bool) -> Self {
        if b { Self::Load } else { Self::Store }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indexing {
    /// Add offset after transfer.
    Post,

    /// Add offset before transfer.
    Pre,
}

impl From<bool> for Indexing {
    fn from(state: bool) -> Self {
        if state { Self::Pre } else { Self::Post }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offsetting {
    /// Substract the offset from base.
    Down,

    /// Add the offset to base.
    Up,
}

impl From<bool> for Offsetting {
    fn from(state: bool) -> Self {
        if state { Self::Up } else { Self::Down }
    }
}

impl Offsetting {
    #[must_use]
    pub const fn apply(self, base: u32, amount: u32) -> u32 {
        match self {
            Self::Down => base.wrapping_sub(amount),
            Self::Up => base.wrapping_add(amount),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum OperandKind {
    Immediate,
    Register,
}

/// Shift applied to a register operand, encoded in bits 5-6.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl From<u32> for ShiftKind {
    fn from(op: u32) -> Self {
        match op & 0b11 {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            _ => Self::Ror,
        }
    }
}

impl ShiftKind {
    /// Shifts `value` by a 5-bit immediate amount.
    ///
    /// An amount of 0 leaves the value untouched for every kind.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn apply(self, value: u32, amount: u32) -> u32 {
        let amount = amount & 0x1F;
        match self {
            Self::Lsl => value << amount,
            Self::Lsr => value >> amount,
            Self::Asr => ((value as i32) >> amount) as u32,
            Self::Ror => value.rotate_right(amount),
        }
    }
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lsl => f.write_str("LSL"),
            Self::Lsr => f.write_str("LSR"),
            Self::Asr => f.write_str("ASR"),
            Self::Ror => f.write_str("ROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shift_kinds() {
        assert_eq!(ShiftKind::Lsl.apply(0x0000_0003, 4), 0x30);
        assert_eq!(ShiftKind::Lsr.apply(0x8000_0000, 4), 0x0800_0000);
        assert_eq!(ShiftKind::Asr.apply(0x8000_0000, 4), 0xF800_0000);
        assert_eq!(ShiftKind::Ror.apply(0x0000_000F, 4), 0xF000_0000);
    }

    #[test]
    fn zero_amount_is_identity() {
        for kind in [ShiftKind::Lsl, ShiftKind::Lsr, ShiftKind::Asr, ShiftKind::Ror] {
            assert_eq!(kind.apply(0x8765_4321, 0), 0x8765_4321);
        }
    }

    #[test]
    fn shift_kind_encoding() {
        assert_eq!(ShiftKind::from(0b00), ShiftKind::Lsl);
        assert_eq!(ShiftKind::from(0b01), ShiftKind::Lsr);
        assert_eq!(ShiftKind::from(0b10), ShiftKind::Asr);
        assert_eq!(ShiftKind::from(0b11), ShiftKind::Ror);
    }

    #[test]
    fn offsetting_wraps() {
        assert_eq!(Offsetting::Up.apply(0xFFFF_FFFC, 8), 4);
        assert_eq!(Offsetting::Down.apply(4, 8), 0xFFFF_FFFC);
    }
}
