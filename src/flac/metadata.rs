// FLAC metadata block implementation

use crate::error::Result;
use crate::flac::header::{BlockHeader, BlockType};
use crate::flac::opaque::OpaqueBlock;
use crate::flac::streaminfo::{StreamInfo, STREAMINFO_SIZE};
use crate::flac::vorbis::VorbisComment;

/// Decoded contents of a metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockData {
    StreamInfo(StreamInfo),
    VorbisComment(VorbisComment),
    Opaque(OpaqueBlock),
}

/// FLAC metadata block
///
/// `is_last` records the flag as it was read. The writer recomputes it from
/// the block's position, so a stale value here never reaches the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    pub is_last: bool,
    pub data: BlockData,
}

impl MetadataBlock {
    /// Decode a payload according to the type in its header
    pub fn decode(header: &BlockHeader, payload: Vec<u8>) -> Result<Self> {
        let data = match header.kind() {
            BlockType::StreamInfo if payload.len() == STREAMINFO_SIZE => {
                BlockData::StreamInfo(StreamInfo::decode(&payload)?)
            }
            BlockType::StreamInfo => {
                tracing::warn!(
                    length = payload.len(),
                    "STREAMINFO payload is not 34 bytes, keeping it as raw data"
                );
                BlockData::Opaque(OpaqueBlock::new(header.block_type, payload)?)
            }
            BlockType::VorbisComment => BlockData::VorbisComment(VorbisComment::decode(&payload)?),
            _ => BlockData::Opaque(OpaqueBlock::new(header.block_type, payload)?),
        };

        Ok(MetadataBlock {
            is_last: header.is_last,
            data,
        })
    }

    pub fn block_type(&self) -> u8 {
        match &self.data {
            BlockData::StreamInfo(_) => BlockType::StreamInfo.code(),
            BlockData::VorbisComment(_) => BlockType::VorbisComment.code(),
            BlockData::Opaque(block) => block.block_type(),
        }
    }

    pub fn kind(&self) -> BlockType {
        BlockType::from_code(self.block_type())
    }

    /// Serialize the payload, without header
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        match &self.data {
            BlockData::StreamInfo(info) => info.encode(),
            BlockData::VorbisComment(comment) => comment.encode(),
            BlockData::Opaque(block) => Ok(block.data.clone()),
        }
    }

    /// Serialize header and payload; the header length comes from the payload
    pub fn encode(&self, is_last: bool) -> Result<Vec<u8>> {
        let payload = self.encode_payload()?;
        let header = BlockHeader::for_payload(is_last, self.block_type(), payload.len())?;

        let mut result = Vec::with_capacity(BlockHeader::SIZE + payload.len());
        result.extend_from_slice(&header.encode());
        result.extend_from_slice(&payload);
        Ok(result)
    }

    pub fn as_stream_info(&self) -> Option<&StreamInfo> {
        match &self.data {
            BlockData::StreamInfo(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_vorbis_comment(&self) -> Option<&VorbisComment> {
        match &self.data {
            BlockData::VorbisComment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueBlock> {
        match &self.data {
            BlockData::Opaque(block) => Some(block),
            _ => None,
        }
    }
}

impl From<StreamInfo> for BlockData {
    fn from(info: StreamInfo) -> Self {
        BlockData::StreamInfo(info)
    }
}

impl From<VorbisComment> for BlockData {
    fn from(comment: VorbisComment) -> Self {
        BlockData::VorbisComment(comment)
    }
}

impl From<OpaqueBlock> for BlockData {
    fn from(block: OpaqueBlock) -> Self {
        BlockData::Opaque(block)
    }
}

impl From<BlockData> for MetadataBlock {
    fn from(data: BlockData) -> Self {
        MetadataBlock { is_last: false, data }
    }
}

impl From<StreamInfo> for MetadataBlock {
    fn from(info: StreamInfo) -> Self {
        BlockData::from(info).into()
    }
}

impl From<VorbisComment> for MetadataBlock {
    fn from(comment: VorbisComment) -> Self {
        BlockData::from(comment).into()
    }
}

impl From<OpaqueBlock> for MetadataBlock {
    fn from(block: OpaqueBlock) -> Self {
        BlockData::from(block).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(block_type: u8, length: usize) -> BlockHeader {
        BlockHeader::for_payload(false, block_type, length).unwrap()
    }

    #[test]
    fn dispatches_on_block_type() {
        let comment = VorbisComment::new("v").encode().unwrap();
        let block = MetadataBlock::decode(&header(4, comment.len()), comment).unwrap();
        assert!(block.as_vorbis_comment().is_some());

        let block = MetadataBlock::decode(&header(6, 3), vec![1, 2, 3]).unwrap();
        assert_eq!(block.as_opaque().unwrap().data, vec![1, 2, 3]);
        assert_eq!(block.kind(), BlockType::Picture);

        let block = MetadataBlock::decode(&header(100, 0), Vec::new()).unwrap();
        assert_eq!(block.kind(), BlockType::Reserved(100));
    }

    #[test]
    fn odd_sized_streaminfo_stays_raw() {
        let block = MetadataBlock::decode(&header(0, 5), vec![0; 5]).unwrap();
        assert_eq!(block.block_type(), 0);
        assert!(block.as_stream_info().is_none());
        assert_eq!(block.encode(true).unwrap(), vec![0x80, 0, 0, 5, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn block_data_converts_from_payload_types() {
        let block = MetadataBlock {
            is_last: true,
            data: OpaqueBlock::padding(2).into(),
        };
        assert_eq!(block.kind(), BlockType::Padding);

        let data: BlockData = VorbisComment::new("v").into();
        assert_eq!(MetadataBlock::from(data).block_type(), 4);
    }

    #[test]
    fn irregular_tag_list_keeps_its_bytes() {
        let mut payload = VorbisComment::new("v").encode().unwrap();
        // entry count follows the 1-byte vendor string
        payload[5] = 1;
        payload.extend_from_slice(&[3, 0, 0, 0, b'A', b'=', 0xFF, 0, 0]);
        let block = MetadataBlock::decode(&header(4, payload.len()), payload.clone()).unwrap();
        assert!(block.as_vorbis_comment().is_some());
        assert_eq!(block.encode_payload().unwrap(), payload);
    }

    #[test]
    fn encode_recomputes_header() {
        let block: MetadataBlock = OpaqueBlock::new(9, vec![7; 10]).unwrap().into();
        let bytes = block.encode(false).unwrap();
        assert_eq!(&bytes[..4], &[0x09, 0, 0, 10]);
        assert_eq!(bytes.len(), 14);
    }
}
