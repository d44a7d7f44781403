// FLAC metadata block header

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::bits;

/// Largest payload a 24-bit length field can describe
pub const MAX_PAYLOAD_LEN: u32 = 0x00FF_FFFF;

/// FLAC metadata block types
///
/// Codes without a dedicated variant keep their number in `Reserved`, so
/// converting to and from the wire code never loses information. A
/// hand-built `Reserved` is read through its 7-bit code, so `Reserved(4)`
/// names itself VORBIS_COMMENT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum BlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    Reserved(u8),
    Invalid,
}

impl BlockType {
    /// Map a 7-bit wire code to a block type
    pub fn from_code(code: u8) -> Self {
        match code & 0x7F {
            0 => BlockType::StreamInfo,
            1 => BlockType::Padding,
            2 => BlockType::Application,
            3 => BlockType::SeekTable,
            4 => BlockType::VorbisComment,
            5 => BlockType::CueSheet,
            6 => BlockType::Picture,
            127 => BlockType::Invalid,
            other => BlockType::Reserved(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            BlockType::StreamInfo => 0,
            BlockType::Padding => 1,
            BlockType::Application => 2,
            BlockType::SeekTable => 3,
            BlockType::VorbisComment => 4,
            BlockType::CueSheet => 5,
            BlockType::Picture => 6,
            BlockType::Reserved(code) => code & 0x7F,
            BlockType::Invalid => 127,
        }
    }

    pub fn name(self) -> &'static str {
        match BlockType::from_code(self.code()) {
            BlockType::StreamInfo => "STREAMINFO",
            BlockType::Padding => "PADDING",
            BlockType::Application => "APPLICATION",
            BlockType::SeekTable => "SEEKTABLE",
            BlockType::VorbisComment => "VORBIS_COMMENT",
            BlockType::CueSheet => "CUESHEET",
            BlockType::Picture => "PICTURE",
            BlockType::Reserved(_) => "RESERVED",
            BlockType::Invalid => "INVALID",
        }
    }
}

impl From<BlockType> for u8 {
    fn from(block_type: BlockType) -> u8 {
        block_type.code()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match BlockType::from_code(self.code()) {
            BlockType::Reserved(code) => write!(f, "RESERVED({})", code),
            other => f.write_str(other.name()),
        }
    }
}

/// FLAC metadata block header
///
/// Layout (4 bytes, big-endian):
/// - bit 0: last-block flag
/// - bits 1..8: block type code
/// - bytes 1..4: payload length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_last: bool,
    pub block_type: u8,
    pub length: u32,
}

impl BlockHeader {
    pub const SIZE: usize = 4;

    /// Decode a header from the first four bytes of `data`
    pub fn decode(data: &[u8]) -> Result<Self> {
        let is_last = bits::read_bool(data, 0, 0)?;
        let block_type = bits::read_bits(data, 0, 7, 1)? as u8;
        let length = bits::read_u24(data, 1)?;

        Ok(BlockHeader {
            is_last,
            block_type,
            length,
        })
    }

    /// Build the header for a payload that has already been serialized
    ///
    /// The length always comes from `payload_len`, never from a stored
    /// header, so the two cannot drift apart.
    pub fn for_payload(is_last: bool, block_type: u8, payload_len: usize) -> Result<Self> {
        if payload_len > MAX_PAYLOAD_LEN as usize {
            return Err(Error::PayloadTooLarge {
                block_type,
                len: payload_len,
            });
        }
        if block_type > 0x7F {
            return Err(Error::InvalidArgument {
                name: "block_type",
                value: u64::from(block_type),
                reason: "must fit in 7 bits",
            });
        }

        Ok(BlockHeader {
            is_last,
            block_type,
            length: payload_len as u32,
        })
    }

    pub fn kind(&self) -> BlockType {
        BlockType::from_code(self.block_type)
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let flag = if self.is_last { 0x80 } else { 0x00 };
        let length = bits::write_u24(self.length);
        [flag | (self.block_type & 0x7F), length[0], length[1], length[2]]
    }
}
