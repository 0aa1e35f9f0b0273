use avs_types::{SampleRange, VideoFormat};
use bitio::BitReader;

use crate::Result;

/// AVS3 `sequence_display_extension()`
///
/// GY/T 368 - 7.1.2.3. A trimmed-down variant of the AVS2 extension: no
/// content description and no depth/camera records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDisplayExtension {
    /// Video format
    pub video_format: VideoFormat,
    /// Sample range
    pub sample_range: SampleRange,
    /// Raw colour primaries code, when colour description is present
    pub color_primaries: Option<u8>,
    /// Raw transfer characteristics code
    pub transfer_characteristics: Option<u8>,
    /// Raw matrix coefficients code
    pub matrix_coefficients: Option<u8>,
    /// Display width in samples
    pub display_horizontal_size: u32,
    /// Display height in samples
    pub display_vertical_size: u32,
    /// Texture+depth mode flag
    pub td_mode: bool,
    /// 8-bit TD packing code, when TD mode is on
    pub td_packing_mode: Option<u8>,
    /// View reverse flag, when TD mode is on
    pub view_reverse: Option<bool>,
}

impl SequenceDisplayExtension {
    /// Parses a display extension from the bytes following the
    /// `00 00 01 B5` start code
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(data);
        r.skip_bits(4); // extension id, checked by the caller

        let video_format = VideoFormat::from(r.read_bits(3)? as u8);
        let sample_range = SampleRange::from(r.read_bool()?);

        let colour_description = r.read_bool()?;
        let (color_primaries, transfer_characteristics, matrix_coefficients) =
            if colour_description {
                (
                    Some(r.read_bits(8)? as u8),
                    Some(r.read_bits(8)? as u8),
                    Some(r.read_bits(8)? as u8),
                )
            } else {
                (None, None, None)
            };

        let display_horizontal_size = r.read_bits(14)?;
        r.check_marker_bit()?;
        let display_vertical_size = r.read_bits(14)?;

        let td_mode = r.read_bool()?;
        let (td_packing_mode, view_reverse) = if td_mode {
            (Some(r.read_bits(8)? as u8), Some(r.read_bool()?))
        } else {
            (None, None)
        };

        Ok(SequenceDisplayExtension {
            video_format,
            sample_range,
            color_primaries,
            transfer_characteristics,
            matrix_coefficients,
            display_horizontal_size,
            display_vertical_size,
            td_mode,
            td_packing_mode,
            view_reverse,
        })
    }
}
