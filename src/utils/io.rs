// I/O utilities for reading metadata payloads

use std::io::Read;

use crate::error::{Error, Result};
use crate::utils::bits;

/// Forward-only reader over a payload slice
///
/// Every read is bounds-checked and reports [`Error::OutOfRange`] instead
/// of panicking, so decoders can walk untrusted length prefixes with `?`.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrow the next `len` bytes
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::out_of_range(self.pos, len, self.data.len()));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read little-endian 32-bit integer
    pub fn le_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read big-endian 32-bit integer
    pub fn be_u32(&mut self) -> Result<u32> {
        let value = bits::read_u32(self.data, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Read a 32-bit length prefix followed by that many bytes
    pub fn le_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.le_u32()? as usize;
        self.take(len)
    }

    /// Big-endian counterpart of [`ByteCursor::le_prefixed`]
    pub fn be_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.be_u32()? as usize;
        self.take(len)
    }
}

/// Read up to `len` bytes, stopping early only at end of stream
pub fn read_up_to<R: Read>(reader: &mut R, len: u64) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(len.min(1 << 20) as usize);
    reader.by_ref().take(len).read_to_end(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_both_endiannesses() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.le_u32().unwrap(), 1);
        assert_eq!(cursor.be_u32().unwrap(), 2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn prefixed_reads_respect_length() {
        let data = [3, 0, 0, 0, b'a', b'b', b'c', 0, 0, 0, 1, b'z'];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.le_prefixed().unwrap(), b"abc");
        assert_eq!(cursor.be_prefixed().unwrap(), b"z");
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn overrun_reports_out_of_range() {
        let data = [9, 0, 0, 0, b'x'];
        let mut cursor = ByteCursor::new(&data);
        let err = cursor.le_prefixed().unwrap_err();
        assert!(matches!(err, Error::OutOfRange { offset: 4, needed: 9, available: 1 }));
    }

    #[test]
    fn read_up_to_stops_at_end_of_stream() {
        let mut reader = std::io::Cursor::new(vec![1u8, 2, 3]);
        assert_eq!(read_up_to(&mut reader, 2).unwrap(), vec![1, 2]);
        assert_eq!(read_up_to(&mut reader, 10).unwrap(), vec![3]);
    }
}
