//! # Instruction Word Packing
//!
//! Every SPLICE word is four 8-bit fields packed big-endian:
//!
//! ```text
//! [byte0:8][byte1:8][byte2:8][byte3:8]
//!  opcode    a        b        c        (instruction)
//!  group     task     freq     offset   (task header)
//! ```
//!
//! Data words hold either a two's complement `i32` or the IEEE-754 bit
//! pattern of an `f32`.

// ============================================================================
// Field Masks
// ============================================================================

/// Mask for a single 8-bit field
pub const BYTE_MASK: u32 = 0x0000_00FF;

/// Shift of the first (opcode / group) field
pub const FIELD0_SHIFT: u32 = 24;

/// Shift of the second field
pub const FIELD1_SHIFT: u32 = 16;

/// Shift of the third field
pub const FIELD2_SHIFT: u32 = 8;

/// Shift of the fourth field
pub const FIELD3_SHIFT: u32 = 0;

// ============================================================================
// Packing
// ============================================================================

/// Pack four bytes into one word
#[inline]
pub const fn pack4x8to32(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((a as u32) << FIELD0_SHIFT)
        | ((b as u32) << FIELD1_SHIFT)
        | ((c as u32) << FIELD2_SHIFT)
        | ((d as u32) << FIELD3_SHIFT)
}

/// Split a word into its four bytes
#[inline]
pub const fn unpack32to4x8(word: u32) -> [u8; 4] {
    [
        ((word >> FIELD0_SHIFT) & BYTE_MASK) as u8,
        ((word >> FIELD1_SHIFT) & BYTE_MASK) as u8,
        ((word >> FIELD2_SHIFT) & BYTE_MASK) as u8,
        ((word >> FIELD3_SHIFT) & BYTE_MASK) as u8,
    ]
}

/// Extract the opcode field
#[inline]
pub const fn extract_opcode(word: u32) -> u8 {
    ((word >> FIELD0_SHIFT) & BYTE_MASK) as u8
}

/// Extract the three operand fields
#[inline]
pub const fn extract_operands(word: u32) -> (u8, u8, u8) {
    (
        ((word >> FIELD1_SHIFT) & BYTE_MASK) as u8,
        ((word >> FIELD2_SHIFT) & BYTE_MASK) as u8,
        ((word >> FIELD3_SHIFT) & BYTE_MASK) as u8,
    )
}

// ============================================================================
// Data Words
// ============================================================================

/// Reinterpret a float as its bit pattern
#[inline]
pub fn pack_float(value: f32) -> u32 {
    value.to_bits()
}

/// Reinterpret a bit pattern as a float
#[inline]
pub fn unpack_float(word: u32) -> f32 {
    f32::from_bits(word)
}

/// Store a signed integer as a word
#[inline]
pub const fn pack_int(value: i32) -> u32 {
    value as u32
}

/// Read a word as a signed integer
#[inline]
pub const fn unpack_int(word: u32) -> i32 {
    word as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_known_values() {
        let cases: [([u8; 4], u32); 12] = [
            ([0x00, 0x00, 0x00, 0x00], 0x0000_0000),
            ([0x00, 0x00, 0x00, 0xFF], 0x0000_00FF),
            ([0x00, 0x00, 0x01, 0x00], 0x0000_0100),
            ([0x00, 0x00, 0x01, 0xFF], 0x0000_01FF),
            ([0x00, 0x00, 0x02, 0x00], 0x0000_0200),
            ([0x00, 0x00, 0xFF, 0xFF], 0x0000_FFFF),
            ([0x00, 0x01, 0x00, 0x00], 0x0001_0000),
            ([0x00, 0x01, 0xFF, 0xFF], 0x0001_FFFF),
            ([0x00, 0x02, 0x00, 0x00], 0x0002_0000),
            ([0x00, 0xFF, 0xFF, 0xFF], 0x00FF_FFFF),
            ([0x01, 0x00, 0x00, 0x00], 0x0100_0000),
            ([0xFF, 0xFF, 0xFF, 0xFF], 0xFFFF_FFFF),
        ];

        for (bytes, expected) in cases {
            assert_eq!(pack4x8to32(bytes[0], bytes[1], bytes[2], bytes[3]), expected);
        }
    }

    #[test]
    fn test_extract_fields() {
        let word = pack4x8to32(0x09, 0x10, 0x11, 0x12);
        assert_eq!(extract_opcode(word), 0x09);
        assert_eq!(extract_operands(word), (0x10, 0x11, 0x12));
    }

    #[test]
    fn test_float_round_trip_representative() {
        let values = [0.0f32, 1.0, -1.0, 3.14159, f32::MAX, f32::MIN, f32::MIN_POSITIVE];
        for value in values {
            assert_eq!(unpack_float(pack_float(value)), value);
        }
        assert_eq!(pack_float(1.0), 0x3F80_0000);
    }

    #[test]
    fn test_int_round_trip() {
        assert_eq!(pack_int(-1), 0xFFFF_FFFF);
        assert_eq!(unpack_int(pack_int(i32::MIN)), i32::MIN);
        assert_eq!(unpack_int(42), 42);
    }
}
