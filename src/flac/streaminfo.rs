// STREAMINFO block implementation

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::bits;

/// Fixed payload size of a STREAMINFO block
pub const STREAMINFO_SIZE: usize = 34;

/// Stream parameters carried by the mandatory first block.
///
/// Layout (34 bytes, big-endian, no padding between fields):
///
/// | bits | field |
/// |-----:|-------|
/// | 16 | minimum block size |
/// | 16 | maximum block size |
/// | 24 | minimum frame size |
/// | 24 | maximum frame size |
/// | 20 | sample rate |
/// |  3 | channels - 1 |
/// |  5 | bits per sample - 1 |
/// | 36 | total samples |
/// | 128 | MD5 of the decoded audio |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    pub min_block_size: u16,
    pub max_block_size: u16,
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    pub sample_rate: u32,
    /// Channel count, 1 to 8
    pub channels: u8,
    /// Bits per sample, 1 to 32
    pub bits_per_sample: u8,
    /// Samples per channel; 0 when unknown
    pub total_samples: u64,
    #[serde(serialize_with = "serialize_md5")]
    pub md5: [u8; 16],
}

impl StreamInfo {
    const SAMPLE_RATE_MAX: u32 = (1 << 20) - 1;
    const TOTAL_SAMPLES_MAX: u64 = (1 << 36) - 1;
    const FRAME_SIZE_MAX: u32 = (1 << 24) - 1;

    /// Decode a STREAMINFO payload
    pub fn decode(data: &[u8]) -> Result<Self> {
        let min_block_size = bits::read_u16(data, 0)?;
        let max_block_size = bits::read_u16(data, 2)?;
        let min_frame_size = bits::read_u24(data, 4)?;
        let max_frame_size = bits::read_u24(data, 7)?;
        let sample_rate = bits::read_bits(data, 10, 20, 0)? as u32;
        let channels = bits::read_bits(data, 12, 3, 4)? as u8 + 1;
        let bits_per_sample = bits::read_bits(data, 12, 5, 7)? as u8 + 1;
        let total_samples = bits::read_bits(data, 13, 36, 4)?;

        let mut md5 = [0u8; 16];
        md5.copy_from_slice(&bits::data_subset(data, 18, 16)?);

        Ok(StreamInfo {
            min_block_size,
            max_block_size,
            min_frame_size,
            max_frame_size,
            sample_rate,
            channels,
            bits_per_sample,
            total_samples,
            md5,
        })
    }

    /// Encode to the 34-byte payload, rejecting values that do not fit
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut result = Vec::with_capacity(STREAMINFO_SIZE);
        result.extend_from_slice(&bits::write_u16(self.min_block_size));
        result.extend_from_slice(&bits::write_u16(self.max_block_size));
        result.extend_from_slice(&bits::write_u24(self.min_frame_size));
        result.extend_from_slice(&bits::write_u24(self.max_frame_size));

        // sample rate, channels, bits per sample and total samples share 64 bits
        let packed = (u64::from(self.sample_rate) << 44)
            | (u64::from(self.channels - 1) << 41)
            | (u64::from(self.bits_per_sample - 1) << 36)
            | self.total_samples;
        result.extend_from_slice(&bits::write_u64(packed));
        result.extend_from_slice(&self.md5);

        Ok(result)
    }

    /// Duration in whole seconds; 0 when the sample rate or count is unknown
    pub fn duration(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.total_samples / u64::from(self.sample_rate)
    }

    fn validate(&self) -> Result<()> {
        let checks: [(&'static str, u64, u64, u64, &'static str); 5] = [
            ("min_frame_size", u64::from(self.min_frame_size), 0, u64::from(Self::FRAME_SIZE_MAX), "must fit in 24 bits"),
            ("max_frame_size", u64::from(self.max_frame_size), 0, u64::from(Self::FRAME_SIZE_MAX), "must fit in 24 bits"),
            ("sample_rate", u64::from(self.sample_rate), 0, u64::from(Self::SAMPLE_RATE_MAX), "must fit in 20 bits"),
            ("channels", u64::from(self.channels), 1, 8, "must be between 1 and 8"),
            ("bits_per_sample", u64::from(self.bits_per_sample), 1, 32, "must be between 1 and 32"),
        ];
        for (name, value, min, max, reason) in checks {
            if value < min || value > max {
                return Err(Error::InvalidArgument { name, value, reason });
            }
        }
        if self.total_samples > Self::TOTAL_SAMPLES_MAX {
            return Err(Error::InvalidArgument {
                name: "total_samples",
                value: self.total_samples,
                reason: "must fit in 36 bits",
            });
        }
        Ok(())
    }

    /// MD5 signature as lowercase hex
    pub fn md5_hex(&self) -> String {
        self.md5.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

fn serialize_md5<S: serde::Serializer>(md5: &[u8; 16], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let hex: String = md5.iter().map(|b| format!("{:02x}", b)).collect();
    serializer.serialize_str(&hex)
}
