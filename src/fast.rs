//! One-shot accessors: open a file, pull out one piece of metadata, close it.
//!
//! Tag helpers return an empty string when the tag list or the field is
//! missing, and [`get_duration`] returns 0 when the length is unknown. Only
//! I/O and format errors are reported as `Err`.

use std::path::Path;

use crate::error::Result;
use crate::file::FlacFile;
use crate::flac::{MetadataBlock, StreamInfo, TagValues, VorbisComment, VorbisFields};

/// All metadata blocks of the file, in order
pub fn get_metadata(path: impl AsRef<Path>) -> Result<Vec<MetadataBlock>> {
    Ok(FlacFile::open(path)?.into_chain().into_blocks())
}

pub fn get_stream_info(path: impl AsRef<Path>) -> Result<Option<StreamInfo>> {
    Ok(FlacFile::open(path)?.stream_info().cloned())
}

pub fn get_vorbis_comment(path: impl AsRef<Path>) -> Result<Option<VorbisComment>> {
    Ok(FlacFile::open(path)?.vorbis_comment().cloned())
}

/// Every value of a Vorbis field; empty when absent
pub fn get_vorbis_field(path: impl AsRef<Path>, field: &str) -> Result<TagValues> {
    let file = FlacFile::open(path)?;
    Ok(file
        .vorbis_comment()
        .map(|comment| comment.get(field))
        .unwrap_or_default())
}

fn first_value(path: impl AsRef<Path>, field: &str) -> Result<String> {
    get_vorbis_field(path, field).map(|values| values.first().to_string())
}

pub fn get_artist(path: impl AsRef<Path>) -> Result<String> {
    first_value(path, VorbisFields::ARTIST)
}

pub fn get_title(path: impl AsRef<Path>) -> Result<String> {
    first_value(path, VorbisFields::TITLE)
}

pub fn get_album(path: impl AsRef<Path>) -> Result<String> {
    first_value(path, VorbisFields::ALBUM)
}

pub fn get_track_number(path: impl AsRef<Path>) -> Result<String> {
    first_value(path, VorbisFields::TRACKNUMBER)
}

pub fn get_genre(path: impl AsRef<Path>) -> Result<String> {
    first_value(path, VorbisFields::GENRE)
}

/// Duration in whole seconds, 0 when the sample count is unknown
pub fn get_duration(path: impl AsRef<Path>) -> Result<u64> {
    Ok(FlacFile::open(path)?.duration())
}
