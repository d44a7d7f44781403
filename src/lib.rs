//! Oxiflac - bit-exact FLAC metadata reader and writer
//!
//! Parses the `fLaC` marker and the chain of metadata blocks that follows it,
//! decodes STREAMINFO and VORBIS_COMMENT payloads, and carries every other
//! block type through untouched. Writing a parsed chain back produces the
//! same bytes for every block it did not decode.
//!
//! ```rust,no_run
//! use oxiflac::FlacFile;
//!
//! let mut file = FlacFile::open("track.flac").unwrap();
//! println!("{} seconds", file.duration());
//! file.chain_mut().vorbis_comment_mut().set("TITLE", "New title");
//! file.save().unwrap();
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub mod error;
pub mod fast;
pub mod field_mapping;
pub mod file;
pub mod flac;
pub mod utils;

pub use error::{Error, ParseError, Result, WriteError};
pub use field_mapping::StandardField;
pub use file::FlacFile;
pub use flac::{
    BlockData, BlockHeader, BlockType, FlacPicture, MetadataBlock, MetadataChain, OpaqueBlock,
    PictureType, StreamInfo, TagEntry, TagValues, VorbisComment, VorbisFields, FLAC_SIGNATURE,
};

/// Flat summary of a metadata chain
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub track: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    pub vendor: Option<String>,
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    pub total_samples: u64,
    /// Whole seconds, 0 when unknown
    pub duration: u64,
    pub md5: Option<String>,
    pub blocks: usize,
    pub pictures: usize,
    /// Every tag, keyed by upper-cased name
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    pub fn from_chain(chain: &MetadataChain) -> Self {
        let mut metadata = Metadata {
            blocks: chain.len(),
            pictures: chain.opaque_blocks(BlockType::Picture.code()).count(),
            duration: chain.duration(),
            ..Default::default()
        };

        if let Some(info) = chain.stream_info() {
            metadata.sample_rate = info.sample_rate;
            metadata.channels = info.channels;
            metadata.bits_per_sample = info.bits_per_sample;
            metadata.total_samples = info.total_samples;
            metadata.md5 = Some(info.md5_hex());
        }

        if let Some(comment) = chain.vorbis_comment() {
            let field = |f: StandardField| {
                let value = comment.first(f.vorbis_key());
                (!value.is_empty()).then(|| value.to_string())
            };
            metadata.title = field(StandardField::Title);
            metadata.artist = field(StandardField::Artist);
            metadata.album = field(StandardField::Album);
            metadata.year = field(StandardField::Year);
            metadata.track = field(StandardField::Track);
            metadata.genre = field(StandardField::Genre);
            metadata.comment = field(StandardField::Comment);
            metadata.vendor = Some(comment.vendor().to_string());
            metadata.tags = comment.to_map();
        }

        metadata
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metadata(title={}, artist={}, album={}, {} Hz, {} ch, {} bit, {}s)",
            self.title.as_deref().unwrap_or("None"),
            self.artist.as_deref().unwrap_or("None"),
            self.album.as_deref().unwrap_or("None"),
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_chain_without_tags() {
        let chain = MetadataChain::from_blocks(vec![OpaqueBlock::padding(4).into()]);
        let metadata = Metadata::from_chain(&chain);
        assert_eq!(metadata.blocks, 1);
        assert_eq!(metadata.duration, 0);
        assert!(metadata.title.is_none());
        assert!(metadata.md5.is_none());
        assert!(metadata.tags.is_empty());
    }

    #[test]
    fn summary_reads_standard_fields() {
        let mut chain = MetadataChain::new();
        let comment = chain.vorbis_comment_mut();
        comment.add("title", "Song");
        comment.add("DATE", "1999");
        comment.add("ARTIST", "");

        let metadata = Metadata::from_chain(&chain);
        assert_eq!(metadata.title.as_deref(), Some("Song"));
        assert_eq!(metadata.year.as_deref(), Some("1999"));
        assert_eq!(metadata.artist, None);
        assert_eq!(metadata.tags["TITLE"], ["Song"]);
        assert!(metadata.to_string().starts_with("Metadata(title=Song, artist=None"));
    }
}
