// FLAC metadata handling module

pub mod chain;
pub mod header;
pub mod metadata;
pub mod opaque;
pub mod picture;
pub mod streaminfo;
pub mod vorbis;

pub use chain::{MetadataChain, DEFAULT_VENDOR};
pub use header::{BlockHeader, BlockType};
pub use metadata::{BlockData, MetadataBlock};
pub use opaque::OpaqueBlock;
pub use picture::{FlacPicture, PictureType};
pub use streaminfo::StreamInfo;
pub use vorbis::{TagEntry, TagValues, VorbisComment, VorbisFields};

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";
