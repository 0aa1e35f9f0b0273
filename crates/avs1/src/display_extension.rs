use avs_types::{SampleRange, VideoFormat};
use bitio::BitReader;

use crate::Result;

/// AVS1 `sequence_display_extension()`
///
/// GB/T 20090.2 - 7.1.2.2. The colour codes are kept raw here; range
/// validation and the combined description happen when the semantic record
/// is built, because the valid ranges differ per AVS generation.
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
    /// 2-bit stereo packing code
    pub stereo_packing_mode: u8,
}

impl SequenceDisplayExtension {
    /// Parses a display extension from the bytes following the
    /// `00 00 01 B5` start code (the extension id nibble leads)
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
        let stereo_packing_mode = r.read_bits(2)? as u8;

        Ok(SequenceDisplayExtension {
            video_format,
            sample_range,
            color_primaries,
            transfer_characteristics,
            matrix_coefficients,
            display_horizontal_size,
            display_vertical_size,
            stereo_packing_mode,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bitio::{BitError, BitWriter};

    pub(crate) fn write_extension(
        writer: &mut BitWriter,
        colour: Option<(u8, u8, u8)>,
        width: u64,
        height: u64,
    ) {
        writer.write_bits(0b0010, 4); // sequence display extension id
        writer.write_bits(1, 3); // PAL
        writer.write_bit(false); // limited range
        match colour {
            Some((p, t, m)) => {
                writer.write_bit(true);
                writer.write_bits(p as u64, 8);
                writer.write_bits(t as u64, 8);
                writer.write_bits(m as u64, 8);
            }
            None => writer.write_bit(false),
        }
        writer.write_bits(width, 14);
        writer.write_marker_bit();
        writer.write_bits(height, 14);
        writer.write_bits(1, 2); // side by side
    }

    #[test]
    fn parse_with_colour_description() {
        let mut writer = BitWriter::new();
        write_extension(&mut writer, Some((1, 6, 1)), 1920, 1080);
        let ext = SequenceDisplayExtension::parse(&writer.finish()).unwrap();

        assert_eq!(ext.video_format, VideoFormat::Pal);
        assert_eq!(ext.sample_range, SampleRange::Limited);
        assert_eq!(ext.color_primaries, Some(1));
        assert_eq!(ext.transfer_characteristics, Some(6));
        assert_eq!(ext.matrix_coefficients, Some(1));
        assert_eq!(ext.display_horizontal_size, 1920);
        assert_eq!(ext.display_vertical_size, 1080);
        assert_eq!(ext.stereo_packing_mode, 1);
    }

    #[test]
    fn parse_without_colour_description() {
        let mut writer = BitWriter::new();
        write_extension(&mut writer, None, 720, 576);
        let ext = SequenceDisplayExtension::parse(&writer.finish()).unwrap();
        assert_eq!(ext.color_primaries, None);
        assert_eq!(ext.display_horizontal_size, 720);
    }

    #[test]
    fn display_size_marker_is_checked() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b0010, 4);
        writer.write_bits(1, 3);
        writer.write_bit(false);
        writer.write_bit(false);
        writer.write_bits(1920, 14);
        writer.write_bit(false); // marker violated
        writer.write_bits(1080, 14);
        writer.write_bits(0, 2);

        assert!(matches!(
            SequenceDisplayExtension::parse(&writer.finish()),
            Err(BitError::MarkerBitViolation { .. })
        ));
    }
}
