use avs_types::ChromaFormat;
use bitio::BitReader;

use crate::Result;

/// The Shenzhan-profile tail of the sequence header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShenzhanFields {
    /// Background picture disabled
    pub background_picture_disable: bool,
    /// Core picture disabled
    pub core_picture_disable: bool,
    /// Core picture buffer size, present when core pictures are enabled
    pub core_picture_buffer_size: Option<u8>,
    /// Slice sets disabled
    pub slice_set_disable: bool,
    /// Scene model id
    pub scene_model: u8,
}

/// AVS1 `sequence_header()`
///
/// GB/T 20090.2 - 7.1.2.1. Carries everything the analyzer reports short of
/// the display extension.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceHeader {
    /// Profile id; 0x48 is the AVS+ broadcasting profile
    pub profile_id: u8,
    /// Level id
    pub level_id: u8,
    /// Progressive sequence flag
    pub progressive_sequence: bool,
    /// Luma width in samples
    pub horizontal_size: u32,
    /// Luma height in samples
    pub vertical_size: u32,
    /// Chroma subsampling
    pub chroma_format: ChromaFormat,
    /// 3-bit sample precision code
    pub sample_precision: u8,
    /// 4-bit aspect ratio code
    pub aspect_ratio_code: u8,
    /// 4-bit frame rate code
    pub frame_rate_code: u8,
    /// Low 18 bits of the coded bit rate
    pub bit_rate_lower: u32,
    /// High 12 bits of the coded bit rate
    pub bit_rate_upper: u32,
    /// Low delay flag
    pub low_delay: bool,
    /// BBV buffer size in coded units
    pub bbv_buffer_size: u32,
    /// Shenzhan-profile fields, when `profile_id` is 0x24
    pub shenzhan: Option<ShenzhanFields>,
}

impl SequenceHeader {
    /// Parses a sequence header from the bytes following the
    /// `00 00 01 B0` start code
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(data);

        let profile_id = r.read_bits(8)? as u8;
        let level_id = r.read_bits(8)? as u8;
        let progressive_sequence = r.read_bool()?;
        let horizontal_size = r.read_bits(14)?;
        let vertical_size = r.read_bits(14)?;
        let chroma_format = ChromaFormat::from(r.read_bits(2)? as u8);
        let sample_precision = r.read_bits(3)? as u8;
        let aspect_ratio_code = r.read_bits(4)? as u8;
        let frame_rate_code = r.read_bits(4)? as u8;
        let bit_rate_lower = r.read_bits(18)?;
        r.check_marker_bit()?;
        let bit_rate_upper = r.read_bits(12)?;
        let low_delay = r.read_bool()?;
        r.check_marker_bit()?;
        let bbv_buffer_size = r.read_bits(18)?;

        let shenzhan = if profile_id == PROFILE_SHENZHAN {
            let background_picture_disable = r.read_bool()?;
            let core_picture_disable = r.read_bool()?;
            let core_picture_buffer_size = if !core_picture_disable {
                Some(r.read_bits(4)? as u8)
            } else {
                None
            };
            let slice_set_disable = r.read_bool()?;
            r.check_marker_bit()?;
            let scene_model = r.read_bits(4)? as u8;
            r.skip_bits(if core_picture_disable { 5 } else { 3 });

            Some(ShenzhanFields {
                background_picture_disable,
                core_picture_disable,
                core_picture_buffer_size,
                slice_set_disable,
                scene_model,
            })
        } else {
            r.skip_bits(3);
            None
        };

        Ok(SequenceHeader {
            profile_id,
            level_id,
            progressive_sequence,
            horizontal_size,
            vertical_size,
            chroma_format,
            sample_precision,
            aspect_ratio_code,
            frame_rate_code,
            bit_rate_lower,
            bit_rate_upper,
            low_delay,
            bbv_buffer_size,
            shenzhan,
        })
    }

    /// Bit rate in bits per second
    #[must_use]
    pub fn bit_rate(&self) -> u64 {
        (((self.bit_rate_upper as u64) << 18) | (self.bit_rate_lower as u64 & 0x3FFFF)) * 400
    }

    /// `AVS+` for the broadcasting profile, `AVS` otherwise
    #[must_use]
    pub fn generation_name(&self) -> &'static str {
        if self.profile_id == PROFILE_BROADCASTING {
            "AVS+"
        } else {
            "AVS"
        }
    }

    /// Human-readable profile name
    #[must_use]
    pub fn profile_name(&self) -> String {
        match self.profile_id {
            PROFILE_JIZHUN => "Jizhun Profile".to_string(),
            PROFILE_SHENZHAN => "Shenzhan Profile".to_string(),
            PROFILE_YIDONG => "Yidong Profile".to_string(),
            PROFILE_BROADCASTING => "Guangbo (Broadcasting) Profile".to_string(),
            other => format!("Profile 0x{other:02X}"),
        }
    }

    /// Human-readable level name
    #[must_use]
    pub fn level_name(&self) -> String {
        match self.level_id {
            0x10 => "2.0".to_string(),
            0x20 => "4.0".to_string(),
            0x22 => "4.2".to_string(),
            0x40 => "6.0".to_string(),
            0x42 => "6.2".to_string(),
            other => format!("Level 0x{other:02X}"),
        }
    }
}

/// Jizhun (base) profile
pub const PROFILE_JIZHUN: u8 = 0x20;
/// Shenzhan (extended) profile
pub const PROFILE_SHENZHAN: u8 = 0x24;
/// Yidong (portable) profile
pub const PROFILE_YIDONG: u8 = 0x28;
/// Guangbo (broadcasting) profile, the AVS+ generation marker
pub const PROFILE_BROADCASTING: u8 = 0x48;
