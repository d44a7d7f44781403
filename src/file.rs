//! FLAC file handle: read the metadata region once, edit it, write it back.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::flac::{MetadataChain, StreamInfo, VorbisComment};

/// A FLAC file whose metadata chain has been loaded into memory.
///
/// The file handle is only held while reading or saving; between calls the
/// value owns nothing but the path, the chain and the audio offset.
#[derive(Debug, Clone)]
pub struct FlacFile {
    path: PathBuf,
    chain: MetadataChain,
    audio_offset: u64,
}

impl FlacFile {
    /// Open `path` and parse its metadata chain
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Opening FLAC file");

        let mut reader = BufReader::new(File::open(path)?);
        let (chain, audio_offset) = MetadataChain::parse_with_offset(&mut reader)?;

        tracing::debug!(blocks = chain.len(), audio_offset, "Parsed metadata chain");

        Ok(FlacFile {
            path: path.to_path_buf(),
            chain,
            audio_offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chain(&self) -> &MetadataChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut MetadataChain {
        &mut self.chain
    }

    pub fn into_chain(self) -> MetadataChain {
        self.chain
    }

    /// Byte offset of the first audio frame in the file on disk
    pub fn audio_offset(&self) -> u64 {
        self.audio_offset
    }

    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.chain.stream_info()
    }

    pub fn vorbis_comment(&self) -> Option<&VorbisComment> {
        self.chain.vorbis_comment()
    }

    /// Duration in whole seconds, 0 when unknown
    pub fn duration(&self) -> u64 {
        self.chain.duration()
    }

    /// Write the current chain back to the file it was read from
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.save_as(path)
    }

    /// Write the current chain followed by the original audio frames to
    /// `target`, which then becomes this file's path.
    pub fn save_as(&mut self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        let metadata = self.chain.to_bytes()?;

        let audio = {
            let mut source = File::open(&self.path)?;
            source.seek(SeekFrom::Start(self.audio_offset))?;
            let mut audio = Vec::new();
            source.read_to_end(&mut audio)?;
            audio
        };

        let metadata_len = metadata.len() as u64;
        let mut output = metadata;
        output.extend_from_slice(&audio);
        std::fs::write(target, &output)?;

        tracing::info!(
            path = %target.display(),
            metadata_bytes = metadata_len,
            audio_bytes = audio.len(),
            "Saved FLAC file"
        );

        self.path = target.to_path_buf();
        self.audio_offset = metadata_len;
        Ok(())
    }
}
