use std::ops::RangeInclusive;

/// Helper methods to read and write bit fields of an instruction word or register.
///
/// Bit indexes go from lsb to msb (right to left), so bit 0 is the least
/// significant one and bit 31 the most significant one.
pub trait Bits: Copy {
    fn is_bit_on(self, bit_idx: u8) -> bool;

    #[must_use]
    fn with_bit(self, bit_idx: u8, value: bool) -> Self;

    /// Extracts the bits in `bits_range` and moves them to position 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Replaces the bits in `bits_range` with the low bits of `value`.
    #[must_use]
    fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self;

    /// Reads the `byte_nth` octet, 0 being the least significant.
    fn get_byte(self, byte_nth: u8) -> u8;

    /// Replaces the `byte_nth` octet, leaving the others untouched.
    #[must_use]
    fn with_byte(self, byte_nth: u8, value: u8) -> Self;

    fn get_bit(self, bit_idx: u8) -> bool {
        self.is_bit_on(bit_idx)
    }

    fn is_bit_off(self, bit_idx: u8) -> bool {
        !self.is_bit_on(bit_idx)
    }

    fn set_bit(&mut self, bit_idx: u8, value: bool) {
        *self = self.with_bit(bit_idx, value);
    }

    fn set_bits(&mut self, bits_range: RangeInclusive<u8>, value: Self) {
        *self = self.with_bits(bits_range, value);
    }
}

/// Mask with `length` ones starting at bit 0.
const fn low_mask(length: u32) -> u32 {
    if length >= 32 {
        u32::MAX
    } else {
        (1 << length) - 1
    }
}

impl Bits for u32 {
    fn is_bit_on(self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < 32);
        self & (1 << bit_idx) != 0
    }

    fn with_bit(self, bit_idx: u8, value: bool) -> Self {
        debug_assert!(bit_idx < 32);
        if value {
            self | (1 << bit_idx)
        } else {
            self & !(1 << bit_idx)
        }
    }

    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        let start = u32::from(*bits_range.start());
        let length = u32::from(*bits_range.end()) - start + 1;
        (self >> start) & low_mask(length)
    }

    fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self {
        let start = u32::from(*bits_range.start());
        let length = u32::from(*bits_range.end()) - start + 1;
        let mask = low_mask(length) << start;
        (self & !mask) | ((value << start) & mask)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn get_byte(self, byte_nth: u8) -> u8 {
        debug_assert!(byte_nth < 4);
        (self >> (u32::from(byte_nth) * 8)) as u8
    }

    fn with_byte(self, byte_nth: u8, value: u8) -> Self {
        debug_assert!(byte_nth < 4);

        // Clear the selected octet and OR the new one in place.
        let shift = u32::from(byte_nth) * 8;
        (self & !(0xFF << shift)) | (u32::from(value) << shift)
    }
}
