// Pass-through storage for blocks without a typed decoder

use crate::error::{Error, Result};
use crate::flac::header::BlockType;
use crate::utils::bits;

/// Raw payload of any block type that is not decoded further
///
/// The bytes are written back exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueBlock {
    block_type: u8,
    pub data: Vec<u8>,
}

impl OpaqueBlock {
    pub fn new(block_type: u8, data: Vec<u8>) -> Result<Self> {
        if block_type > 0x7F {
            return Err(Error::InvalidArgument {
                name: "block_type",
                value: u64::from(block_type),
                reason: "must fit in 7 bits",
            });
        }
        Ok(OpaqueBlock { block_type, data })
    }

    /// Zero-filled PADDING block of `len` bytes
    pub fn padding(len: usize) -> Self {
        OpaqueBlock {
            block_type: BlockType::Padding.code(),
            data: vec![0u8; len],
        }
    }

    /// APPLICATION block: 4-byte ASCII registered ID followed by data
    pub fn application(id: &str, data: &[u8]) -> Self {
        let mut payload = bits::encode_padded_ascii(id, 4);
        payload.extend_from_slice(data);
        OpaqueBlock {
            block_type: BlockType::Application.code(),
            data: payload,
        }
    }

    pub fn block_type(&self) -> u8 {
        self.block_type
    }

    pub fn kind(&self) -> BlockType {
        BlockType::from_code(self.block_type)
    }

    /// Registered ID of an APPLICATION block
    pub fn application_id(&self) -> Option<u32> {
        if self.kind() != BlockType::Application {
            return None;
        }
        bits::read_u32(&self.data, 0).ok()
    }
}
