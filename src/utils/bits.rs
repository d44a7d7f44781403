// Bit-level field access over big-endian byte buffers
//
// FLAC packs most of its metadata fields without regard for byte
// boundaries, so every read takes a byte offset, a bit offset inside that
// first byte (0 = most significant bit) and a field width in bits.

use crate::error::{Error, Result};

/// Widest field a single read can return
pub const MAX_BIT_COUNT: u32 = 64;

/// Highest bit position inside the first byte
pub const MAX_BIT_OFFSET: u32 = 7;

/// Read an unsigned big-endian field of `bit_count` bits.
///
/// The field starts `bit_offset` bits into `buffer[byte_offset]`. The
/// accumulator is 128 bits wide, so every combination of a 64-bit field and
/// a 7-bit offset still returns the exact value.
///
/// # Errors
///
/// * [`Error::InvalidArgument`] when `bit_count > 64` or `bit_offset > 7`,
///   checked before the buffer is touched.
/// * [`Error::OutOfRange`] when the field runs past the end of `buffer`.
pub fn read_bits(buffer: &[u8], byte_offset: usize, bit_count: u32, bit_offset: u32) -> Result<u64> {
    if bit_count > MAX_BIT_COUNT {
        return Err(Error::InvalidArgument {
            name: "bit_count",
            value: u64::from(bit_count),
            reason: "must be between 0 and 64",
        });
    }
    if bit_offset > MAX_BIT_OFFSET {
        return Err(Error::InvalidArgument {
            name: "bit_offset",
            value: u64::from(bit_offset),
            reason: "must be between 0 and 7",
        });
    }

    let total_bits = bit_count + bit_offset;
    let byte_count = total_bits.div_ceil(8) as usize;
    if byte_count > buffer.len().saturating_sub(byte_offset) {
        return Err(Error::out_of_range(byte_offset, byte_count, buffer.len()));
    }
    if byte_count == 0 {
        return Ok(0);
    }

    let bytes = &buffer[byte_offset..byte_offset + byte_count];

    // Drop the leading bits that belong to the previous field
    let mut acc = u128::from(bytes[0] & (0xFF >> bit_offset));
    for &byte in &bytes[1..] {
        acc = (acc << 8) | u128::from(byte);
    }

    // Drop the trailing bits that belong to the next field
    let trailing = byte_count as u32 * 8 - total_bits;
    Ok((acc >> trailing) as u64)
}

/// Read big-endian 16-bit integer
pub fn read_u16(buffer: &[u8], byte_offset: usize) -> Result<u16> {
    read_bits(buffer, byte_offset, 16, 0).map(|v| v as u16)
}

/// Read big-endian 24-bit integer
pub fn read_u24(buffer: &[u8], byte_offset: usize) -> Result<u32> {
    read_bits(buffer, byte_offset, 24, 0).map(|v| v as u32)
}

/// Read big-endian 32-bit integer
pub fn read_u32(buffer: &[u8], byte_offset: usize) -> Result<u32> {
    read_bits(buffer, byte_offset, 32, 0).map(|v| v as u32)
}

/// Read big-endian 64-bit integer
pub fn read_u64(buffer: &[u8], byte_offset: usize) -> Result<u64> {
    read_bits(buffer, byte_offset, 64, 0)
}

/// Read a single bit as a flag
pub fn read_bool(buffer: &[u8], byte_offset: usize, bit_offset: u32) -> Result<bool> {
    read_bits(buffer, byte_offset, 1, bit_offset).map(|v| v == 1)
}

/// Encode `value` as exactly `byte_count` big-endian bytes.
///
/// Bits above `byte_count * 8` are discarded; callers range-check first.
pub fn write_bits(value: u64, byte_count: usize) -> Vec<u8> {
    let mut result = vec![0u8; byte_count];
    let mut value = value;
    for slot in result.iter_mut().rev() {
        *slot = (value & 0xFF) as u8;
        value >>= 8;
    }
    result
}

pub fn write_u16(value: u16) -> Vec<u8> {
    write_bits(u64::from(value), 2)
}

pub fn write_u24(value: u32) -> Vec<u8> {
    write_bits(u64::from(value), 3)
}

pub fn write_u32(value: u32) -> Vec<u8> {
    write_bits(u64::from(value), 4)
}

pub fn write_u64(value: u64) -> Vec<u8> {
    write_bits(value, 8)
}

/// Encode text into a zero-padded buffer of exactly `size` bytes.
///
/// Only printable ASCII (0x20..=0x7E) is copied; every other byte position
/// stays zero, as does everything past the end of `text`.
pub fn encode_padded_ascii(text: &str, size: usize) -> Vec<u8> {
    let mut result = vec![0u8; size];
    for (slot, &byte) in result.iter_mut().zip(text.as_bytes()) {
        if (0x20..=0x7E).contains(&byte) {
            *slot = byte;
        }
    }
    result
}

/// Copy `length` bytes starting at `offset` out of `buffer`
pub fn data_subset(buffer: &[u8], offset: usize, length: usize) -> Result<Vec<u8>> {
    if length > buffer.len().saturating_sub(offset) {
        return Err(Error::out_of_range(offset, length, buffer.len()));
    }
    Ok(buffer[offset..offset + length].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reads_across_byte_boundary() {
        // low nibble of the first byte, then five high bits of the second
        assert_eq!(read_bits(&[0xFF, 0x00], 0, 9, 4).unwrap(), 0b1_1110_0000);
        assert_eq!(read_bits(&[0x0F, 0xFF], 0, 9, 4).unwrap(), 0b1_1111_1111);
        assert_eq!(read_bits(&[0xF0, 0x07], 0, 9, 4).unwrap(), 0);
    }

    #[test]
    fn zero_width_reads_return_zero() {
        assert_eq!(read_bits(&[], 0, 0, 0).unwrap(), 0);
        assert_eq!(read_bits(&[0xFF], 0, 0, 3).unwrap(), 0);
    }

    #[test]
    fn full_width_read_with_max_offset_is_exact() {
        let buffer = [0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];
        assert_eq!(read_bits(&buffer, 0, 64, 7).unwrap(), u64::MAX);
    }

    #[test]
    fn rejects_invalid_widths_before_touching_buffer() {
        assert!(matches!(
            read_bits(&[], 0, 65, 0),
            Err(Error::InvalidArgument { name: "bit_count", value: 65, .. })
        ));
        assert!(matches!(
            read_bits(&[], 0, 1, 8),
            Err(Error::InvalidArgument { name: "bit_offset", value: 8, .. })
        ));
    }

    #[test]
    fn rejects_reads_past_the_end() {
        let err = read_bits(&[0, 0, 0], 1, 17, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange { offset: 1, needed: 3, available: 2 }
        ));
        assert!(matches!(read_u16(&[0xAB], 0), Err(Error::OutOfRange { .. })));
        assert!(matches!(read_bool(&[0xAB], 5, 0), Err(Error::OutOfRange { available: 0, .. })));
    }

    #[test]
    fn byte_aligned_helpers() {
        let buffer = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        assert_eq!(read_u16(&buffer, 0).unwrap(), 0x1234);
        assert_eq!(read_u24(&buffer, 1).unwrap(), 0x34_5678);
        assert_eq!(read_u32(&buffer, 4).unwrap(), 0x9ABC_DEF0);
        assert_eq!(read_u64(&buffer, 0).unwrap(), 0x1234_5678_9ABC_DEF0);
        assert!(!read_bool(&buffer, 0, 0).unwrap());
        assert!(read_bool(&buffer, 0, 3).unwrap());
    }

    #[test]
    fn write_discards_high_bits() {
        assert_eq!(write_bits(0x0102_0304, 2), vec![0x03, 0x04]);
        assert_eq!(write_bits(0xFF, 3), vec![0, 0, 0xFF]);
        assert_eq!(write_bits(u64::MAX, 10), vec![0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(write_u24(0xAB_CDEF), vec![0xAB, 0xCD, 0xEF]);
        assert!(write_bits(42, 0).is_empty());
    }

    #[test]
    fn padded_ascii_strips_and_pads() {
        assert_eq!(encode_padded_ascii("riff", 6), b"riff\0\0".to_vec());
        assert_eq!(encode_padded_ascii("toolong", 3), b"too".to_vec());
        assert_eq!(encode_padded_ascii("a\tb", 3), vec![b'a', 0, b'b']);
        // both UTF-8 bytes of 'é' are outside printable ASCII
        assert_eq!(encode_padded_ascii("é!", 4), vec![0, 0, b'!', 0]);
    }

    #[test]
    fn subset_copies_and_checks_bounds() {
        assert_eq!(data_subset(&[1, 2, 3, 4], 1, 2).unwrap(), vec![2, 3]);
        assert!(matches!(data_subset(&[1, 2], 1, 2), Err(Error::OutOfRange { .. })));
    }

    proptest! {
        #[test]
        fn write_then_read_returns_value(byte_count in 1usize..=8, raw: u64) {
            let value = if byte_count == 8 { raw } else { raw & ((1u64 << (byte_count * 8)) - 1) };
            let bytes = write_bits(value, byte_count);
            prop_assert_eq!(bytes.len(), byte_count);
            prop_assert_eq!(read_bits(&bytes, 0, byte_count as u32 * 8, 0).unwrap(), value);
        }

        #[test]
        fn aligned_read_then_write_reproduces_bytes(bytes in proptest::collection::vec(any::<u8>(), 1..=8)) {
            let value = read_bits(&bytes, 0, bytes.len() as u32 * 8, 0).unwrap();
            prop_assert_eq!(write_bits(value, bytes.len()), bytes);
        }

        #[test]
        fn field_ignores_surrounding_bits(
            bit_offset in 0u32..=7,
            bit_count in 0u32..=64,
            raw: u64,
            noise: u128,
        ) {
            let value = if bit_count == 64 { raw } else { raw & ((1u64 << bit_count) - 1) };
            let total = bit_count + bit_offset;
            let byte_count = total.div_ceil(8) as usize;
            let field = u128::from(value) << (byte_count as u32 * 8 - total);
            let field_mask = if bit_count == 0 {
                0
            } else {
                ((1u128 << bit_count) - 1) << (byte_count as u32 * 8 - total)
            };
            let packed = field | (noise & !field_mask);
            let bytes: Vec<u8> = packed.to_be_bytes()[16 - byte_count.max(1)..].to_vec();
            prop_assert_eq!(read_bits(&bytes, 0, bit_count, bit_offset).unwrap(), value);
        }
    }
}
