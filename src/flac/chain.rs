//! Metadata chain parser and writer.
//!
//! A FLAC stream starts with the `fLaC` marker followed by metadata blocks,
//! each framed by a 4-byte header. The block whose header carries the last
//! flag ends the chain; audio frames follow and are never read here.
//!
//! ```rust
//! use oxiflac::{MetadataChain, OpaqueBlock};
//!
//! let mut chain = MetadataChain::new();
//! chain.push(OpaqueBlock::padding(16));
//! chain.vorbis_comment_mut().add("ARTIST", "Someone");
//!
//! let bytes = chain.to_bytes().unwrap();
//! let parsed = MetadataChain::from_bytes(&bytes).unwrap();
//! assert_eq!(parsed.vorbis_comment().unwrap().first("artist"), "Someone");
//! ```

use std::io::{Cursor, Read, Write};

use crate::error::{Error, Result};
use crate::flac::header::{BlockHeader, BlockType};
use crate::flac::metadata::{BlockData, MetadataBlock};
use crate::flac::opaque::OpaqueBlock;
use crate::flac::picture::FlacPicture;
use crate::flac::streaminfo::StreamInfo;
use crate::flac::vorbis::VorbisComment;
use crate::flac::FLAC_SIGNATURE;
use crate::utils::io::read_up_to;

/// Vendor string used for tag lists created from scratch
pub const DEFAULT_VENDOR: &str = concat!("oxiflac ", env!("CARGO_PKG_VERSION"));

/// Position of the parser within the container
#[derive(Debug, Clone, Copy)]
enum ParseState {
    ExpectMagic,
    ExpectHeader,
    ExpectPayload(BlockHeader),
    Done,
}

/// Ordered sequence of metadata blocks
///
/// The chain is a plain owned value; share it across threads only behind
/// your own lock, or clone it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataChain {
    blocks: Vec<MetadataBlock>,
}

impl MetadataChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<MetadataBlock>) -> Self {
        MetadataChain { blocks }
    }

    /// Parse the marker and every metadata block from `reader`.
    ///
    /// Reading stops right after the block flagged as last, leaving the
    /// reader positioned at the first audio frame.
    ///
    /// # Errors
    ///
    /// * [`Error::NotAContainer`] if the stream does not start with `fLaC`.
    /// * [`Error::TruncatedStream`] if the stream ends inside a header or a
    ///   declared payload.
    /// * Any decoder error from the typed payloads.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        Self::parse_with_offset(reader).map(|(chain, _)| chain)
    }

    /// Like [`MetadataChain::parse`], also returning how many bytes the
    /// metadata region occupied, which is where the audio frames begin.
    pub fn parse_with_offset<R: Read>(reader: &mut R) -> Result<(Self, u64)> {
        let mut blocks = Vec::new();
        let mut offset: u64 = 0;
        let mut state = ParseState::ExpectMagic;

        loop {
            state = match state {
                ParseState::ExpectMagic => {
                    let magic = read_up_to(reader, FLAC_SIGNATURE.len() as u64)?;
                    if magic.as_slice() != FLAC_SIGNATURE {
                        return Err(Error::NotAContainer { found: magic });
                    }
                    offset += magic.len() as u64;
                    ParseState::ExpectHeader
                }
                ParseState::ExpectHeader => {
                    let raw = read_up_to(reader, BlockHeader::SIZE as u64)?;
                    if raw.len() < BlockHeader::SIZE {
                        return Err(Error::TruncatedStream {
                            offset,
                            expected: BlockHeader::SIZE as u64,
                            available: raw.len() as u64,
                        });
                    }
                    offset += BlockHeader::SIZE as u64;
                    ParseState::ExpectPayload(BlockHeader::decode(&raw)?)
                }
                ParseState::ExpectPayload(header) => {
                    let payload = read_up_to(reader, u64::from(header.length))?;
                    if payload.len() < header.length as usize {
                        return Err(Error::TruncatedStream {
                            offset,
                            expected: u64::from(header.length),
                            available: payload.len() as u64,
                        });
                    }
                    tracing::debug!(
                        block_type = %header.kind(),
                        length = header.length,
                        is_last = header.is_last,
                        offset,
                        "Read metadata block"
                    );
                    offset += u64::from(header.length);
                    blocks.push(MetadataBlock::decode(&header, payload)?);

                    if header.is_last {
                        ParseState::Done
                    } else {
                        ParseState::ExpectHeader
                    }
                }
                ParseState::Done => break,
            };
        }

        if !blocks.iter().any(|b| b.as_stream_info().is_some()) {
            tracing::warn!("Metadata chain has no STREAMINFO block");
        }

        Ok((MetadataChain { blocks }, offset))
    }

    /// Parse a chain from an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(&mut Cursor::new(data))
    }

    /// Serialize marker and blocks.
    ///
    /// Every header is rebuilt from its encoded payload, and only the final
    /// block is flagged as last, whatever the in-memory `is_last` values say.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.blocks.is_empty() {
            return Err(Error::EmptyChain);
        }

        let mut result = FLAC_SIGNATURE.to_vec();
        let last = self.blocks.len() - 1;
        for (index, block) in self.blocks.iter().enumerate() {
            let encoded = block.encode(index == last)?;
            tracing::debug!(
                block_type = %block.kind(),
                length = encoded.len() - BlockHeader::SIZE,
                is_last = index == last,
                "Wrote metadata block"
            );
            result.extend_from_slice(&encoded);
        }
        Ok(result)
    }

    /// Serialize to `writer`; nothing is written if any block fails to encode
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn blocks(&self) -> &[MetadataBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<MetadataBlock> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn push(&mut self, block: impl Into<MetadataBlock>) {
        self.blocks.push(block.into());
    }

    pub fn insert(&mut self, index: usize, block: impl Into<MetadataBlock>) -> Result<()> {
        if index > self.blocks.len() {
            return Err(Error::InvalidArgument {
                name: "index",
                value: index as u64,
                reason: "past the end of the chain",
            });
        }
        self.blocks.insert(index, block.into());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<MetadataBlock> {
        (index < self.blocks.len()).then(|| self.blocks.remove(index))
    }

    /// Swap the block at `index`, returning the previous one
    pub fn replace(&mut self, index: usize, block: impl Into<MetadataBlock>) -> Option<MetadataBlock> {
        let slot = self.blocks.get_mut(index)?;
        Some(std::mem::replace(slot, block.into()))
    }

    pub fn retain(&mut self, f: impl FnMut(&MetadataBlock) -> bool) {
        self.blocks.retain(f);
    }

    /// Drop every block with the given type code, returning how many went
    pub fn remove_type(&mut self, block_type: u8) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.block_type() != block_type);
        before - self.blocks.len()
    }

    pub fn blocks_of_type(&self, block_type: u8) -> impl Iterator<Item = &MetadataBlock> {
        self.blocks.iter().filter(move |b| b.block_type() == block_type)
    }

    /// Raw payloads of the untyped blocks with the given type code
    pub fn opaque_blocks(&self, block_type: u8) -> impl Iterator<Item = &OpaqueBlock> {
        self.blocks
            .iter()
            .filter_map(MetadataBlock::as_opaque)
            .filter(move |b| b.block_type() == block_type)
    }

    /// First STREAMINFO block, if any
    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.blocks.iter().find_map(MetadataBlock::as_stream_info)
    }

    pub fn stream_info_mut(&mut self) -> Option<&mut StreamInfo> {
        self.blocks.iter_mut().find_map(|b| match &mut b.data {
            BlockData::StreamInfo(info) => Some(info),
            _ => None,
        })
    }

    /// First VORBIS_COMMENT block, if any
    pub fn vorbis_comment(&self) -> Option<&VorbisComment> {
        self.blocks.iter().find_map(MetadataBlock::as_vorbis_comment)
    }

    /// First VORBIS_COMMENT block, created empty if the chain has none
    ///
    /// A new block goes right after a leading STREAMINFO, or first otherwise.
    pub fn vorbis_comment_mut(&mut self) -> &mut VorbisComment {
        let position = match self.blocks.iter().position(|b| b.as_vorbis_comment().is_some()) {
            Some(position) => position,
            None => {
                let at = usize::from(self.blocks.first().is_some_and(|b| b.as_stream_info().is_some()));
                self.blocks.insert(at, VorbisComment::new(DEFAULT_VENDOR).into());
                at
            }
        };
        match &mut self.blocks[position].data {
            BlockData::VorbisComment(comment) => comment,
            _ => unreachable!("block {} was located as a VORBIS_COMMENT", position),
        }
    }

    /// Every decodable PICTURE block, in chain order
    pub fn pictures(&self) -> Vec<FlacPicture> {
        self.opaque_blocks(BlockType::Picture.code())
            .filter_map(|block| match FlacPicture::decode(&block.data) {
                Ok(picture) => Some(picture),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable PICTURE block");
                    None
                }
            })
            .collect()
    }

    /// Duration in whole seconds from STREAMINFO, 0 when unknown
    pub fn duration(&self) -> u64 {
        self.stream_info().map(StreamInfo::duration).unwrap_or(0)
    }
}
