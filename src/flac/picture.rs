// FLAC PICTURE block implementation
//
// Pictures stay opaque inside the chain; this is a typed view decoded on
// demand from the raw payload.

use crate::error::{Error, Result};
use crate::flac::header::BlockType;
use crate::flac::opaque::OpaqueBlock;
use crate::utils::bits;
use crate::utils::io::ByteCursor;

/// Picture types defined by the FLAC format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureType {
    Other = 0,
    FileIcon = 1,
    OtherFileIcon = 2,
    CoverFront = 3,
    CoverBack = 4,
    LeafletPage = 5,
    Media = 6,
    LeadArtist = 7,
    Artist = 8,
    Conductor = 9,
    Band = 10,
    Composer = 11,
    Lyricist = 12,
    RecordingLocation = 13,
    DuringRecording = 14,
    DuringPerformance = 15,
    VideoScreenCapture = 16,
    BrightColouredFish = 17,
    Illustration = 18,
    BandLogo = 19,
    PublisherLogo = 20,
}

impl PictureType {
    pub fn from_u32(value: u32) -> Option<Self> {
        use PictureType::*;
        const ALL: [PictureType; 21] = [
            Other, FileIcon, OtherFileIcon, CoverFront, CoverBack, LeafletPage, Media,
            LeadArtist, Artist, Conductor, Band, Composer, Lyricist, RecordingLocation,
            DuringRecording, DuringPerformance, VideoScreenCapture, BrightColouredFish,
            Illustration, BandLogo, PublisherLogo,
        ];
        ALL.get(value as usize).copied()
    }

    pub fn description(self) -> &'static str {
        match self {
            PictureType::Other => "Other",
            PictureType::FileIcon => "File Icon",
            PictureType::OtherFileIcon => "Other File Icon",
            PictureType::CoverFront => "Cover (front)",
            PictureType::CoverBack => "Cover (back)",
            PictureType::LeafletPage => "Leaflet page",
            PictureType::Media => "Media",
            PictureType::LeadArtist => "Lead artist",
            PictureType::Artist => "Artist",
            PictureType::Conductor => "Conductor",
            PictureType::Band => "Band",
            PictureType::Composer => "Composer",
            PictureType::Lyricist => "Lyricist",
            PictureType::RecordingLocation => "Recording Location",
            PictureType::DuringRecording => "During recording",
            PictureType::DuringPerformance => "During performance",
            PictureType::VideoScreenCapture => "Video screen capture",
            PictureType::BrightColouredFish => "Bright coloured fish",
            PictureType::Illustration => "Illustration",
            PictureType::BandLogo => "Band logo",
            PictureType::PublisherLogo => "Publisher logo",
        }
    }
}

/// FLAC PICTURE block structure
///
/// All integers big-endian:
/// `[type][mime_len][mime][desc_len][desc][width][height][depth][colors][data_len][data]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacPicture {
    /// Raw picture type code; see [`FlacPicture::kind`]
    pub picture_type: u32,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub colors: u32,
    pub data: Vec<u8>,
}

impl FlacPicture {
    /// Create a front cover from image data
    pub fn new(data: Vec<u8>, mime_type: String, description: String) -> Self {
        FlacPicture {
            picture_type: PictureType::CoverFront as u32,
            mime_type,
            description,
            width: 0,
            height: 0,
            depth: 0,
            colors: 0,
            data,
        }
    }

    /// Decode a PICTURE payload
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let picture_type = cursor.be_u32()?;
        let mime_type = String::from_utf8_lossy(cursor.be_prefixed()?).into_owned();
        let description = String::from_utf8_lossy(cursor.be_prefixed()?).into_owned();
        let width = cursor.be_u32()?;
        let height = cursor.be_u32()?;
        let depth = cursor.be_u32()?;
        let colors = cursor.be_u32()?;
        let data = cursor.be_prefixed()?.to_vec();

        Ok(FlacPicture {
            picture_type,
            mime_type,
            description,
            width,
            height,
            depth,
            colors,
            data,
        })
    }

    /// Decode the picture held by an opaque PICTURE block
    pub fn from_opaque(block: &OpaqueBlock) -> Option<Result<Self>> {
        (block.kind() == BlockType::Picture).then(|| Self::decode(&block.data))
    }

    /// Encode FlacPicture to bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut result = Vec::new();

        result.extend_from_slice(&bits::write_u32(self.picture_type));

        for field in [self.mime_type.as_bytes(), self.description.as_bytes()] {
            result.extend_from_slice(&bits::write_u32(checked_len(field.len())?));
            result.extend_from_slice(field);
        }

        for value in [self.width, self.height, self.depth, self.colors] {
            result.extend_from_slice(&bits::write_u32(value));
        }

        result.extend_from_slice(&bits::write_u32(checked_len(self.data.len())?));
        result.extend_from_slice(&self.data);

        Ok(result)
    }

    /// Wrap the encoded picture in a block ready to add to a chain
    pub fn to_opaque(&self) -> Result<OpaqueBlock> {
        OpaqueBlock::new(BlockType::Picture.code(), self.encode()?)
    }

    pub fn kind(&self) -> Option<PictureType> {
        PictureType::from_u32(self.picture_type)
    }

    /// Get file extension based on MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "jpg",
        }
    }
}

fn checked_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::InvalidArgument {
        name: "picture_field_length",
        value: len as u64,
        reason: "must fit in 32 bits",
    })
}
