use avs_types::{SampleRange, VideoFormat};
use bitio::BitReader;

use crate::{Result, STEREO_PROFILES};

/// A sign/exponent/mantissa float as coded by the multi-view records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatField {
    /// Sign bit; fields without a coded sign keep `false`
    pub sign: bool,
    /// 8-bit exponent
    pub exponent: u8,
    /// 22-bit mantissa
    pub mantissa: u32,
}

/// `depth_range()` of the multi-view display extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRange {
    /// Near plane
    pub near: FloatField,
    /// Far plane
    pub far: FloatField,
}

impl DepthRange {
    fn parse(r: &mut BitReader) -> Result<Self> {
        let mut plane = || -> Result<FloatField> {
            let sign = r.read_bool()?;
            let exponent = r.read_bits(8)? as u8;
            r.check_marker_bit()?;
            let mantissa = r.read_bits(22)?;
            r.check_marker_bit()?;
            Ok(FloatField {
                sign,
                exponent,
                mantissa,
            })
        };
        Ok(DepthRange {
            near: plane()?,
            far: plane()?,
        })
    }
}

/// `camera_parameter_set()` of the multi-view display extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraParameterSet {
    /// Focal length (unsigned)
    pub focal_length: FloatField,
    /// Camera position
    pub camera_position: FloatField,
    /// Horizontal camera shift
    pub camera_shift_x: FloatField,
}

impl CameraParameterSet {
    fn parse(r: &mut BitReader) -> Result<Self> {
        // focal_length: exponent, mantissa
        let exponent = r.read_bits(8)? as u8;
        r.check_marker_bit()?;
        let mantissa = r.read_bits(22)?;
        r.check_marker_bit()?;
        let focal_length = FloatField {
            sign: false,
            exponent,
            mantissa,
        };

        // camera_position: sign, exponent, mantissa
        let sign = r.read_bool()?;
        let exponent = r.read_bits(8)? as u8;
        r.check_marker_bit()?;
        let mantissa = r.read_bits(22)?;
        r.check_marker_bit()?;
        let camera_position = FloatField {
            sign,
            exponent,
            mantissa,
        };

        // camera_shift_x: exponent, mantissa, sign
        let exponent = r.read_bits(8)? as u8;
        r.check_marker_bit()?;
        let mantissa = r.read_bits(22)?;
        r.check_marker_bit()?;
        let sign = r.read_bool()?;
        let camera_shift_x = FloatField {
            sign,
            exponent,
            mantissa,
        };

        Ok(CameraParameterSet {
            focal_length,
            camera_position,
            camera_shift_x,
        })
    }
}

/// AVS2 `sequence_display_extension()`
///
/// GB/T 33475.2 - 7.1.2.2, including the multi-view/3D additions. Colour
/// codes stay raw; validation happens at record-building time.
#[derive(Debug, Clone, PartialEq)]
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
    /// Content description, multi-view/3D profiles only
    pub sequence_content_description: Option<u8>,
    /// Depth-range and camera-parameter records driven by the content
    /// description
    pub depth_camera: Vec<(DepthRange, CameraParameterSet)>,
    /// Texture+depth mode flag
    pub td_mode: bool,
    /// 8-bit TD packing code, when TD mode is on
    pub td_packing_mode: Option<u8>,
    /// View reverse flag, when TD mode is on
    pub view_reverse: Option<bool>,
}

impl SequenceDisplayExtension {
    /// Parses a display extension from the bytes following the
    /// `00 00 01 B5` start code; `profile_id` gates the multi-view fields
    pub fn parse(data: &[u8], profile_id: u8) -> Result<Self> {
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

        let mut sequence_content_description = None;
        let mut depth_camera = Vec::new();
        if STEREO_PROFILES.contains(&profile_id) {
            let description = r.read_bits(2)? as u8;
            sequence_content_description = Some(description);
            // 2 = view plus depth, 3 = stereo plus depth.
            let views = match description {
                2 => 1,
                3 => 2,
                _ => 0,
            };
            for _ in 0..views {
                let range = DepthRange::parse(&mut r)?;
                let cameras = CameraParameterSet::parse(&mut r)?;
                depth_camera.push((range, cameras));
            }
        }

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
            sequence_content_description,
            depth_camera,
            td_mode,
            td_packing_mode,
            view_reverse,
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
        td_packing: Option<u8>,
    ) {
        writer.write_bits(0b0010, 4);
        writer.write_bits(0, 3); // component
        writer.write_bit(true); // full range
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
        match td_packing {
            Some(mode) => {
                writer.write_bit(true);
                writer.write_bits(mode as u64, 8);
                writer.write_bit(false); // view_reverse
            }
            None => writer.write_bit(false),
        }
    }

    #[test]
    fn parse_hdr_colour_description() {
        let mut writer = BitWriter::new();
        // BT.2020 primaries, PQ transfer, BT.2020 NCL matrix
        write_extension(&mut writer, Some((9, 11, 8)), 3840, 2160, None);
        let ext =
            SequenceDisplayExtension::parse(&writer.finish(), crate::PROFILE_MAIN10).unwrap();

        assert_eq!(ext.color_primaries, Some(9));
        assert_eq!(ext.transfer_characteristics, Some(11));
        assert_eq!(ext.matrix_coefficients, Some(8));
        assert_eq!(ext.display_horizontal_size, 3840);
        assert_eq!(ext.display_vertical_size, 2160);
        assert_eq!(ext.sequence_content_description, None);
        assert!(!ext.td_mode);
    }

    #[test]
    fn parse_td_packing() {
        let mut writer = BitWriter::new();
        write_extension(&mut writer, None, 1920, 1080, Some(2));
        let ext = SequenceDisplayExtension::parse(&writer.finish(), crate::PROFILE_MAIN).unwrap();
        assert!(ext.td_mode);
        assert_eq!(ext.td_packing_mode, Some(2));
        assert_eq!(ext.view_reverse, Some(false));
    }

    #[test]
    fn parse_multiview_depth_records() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b0010, 4);
        writer.write_bits(0, 3);
        writer.write_bit(false);
        writer.write_bit(false); // no colour description
        writer.write_bits(1920, 14);
        writer.write_marker_bit();
        writer.write_bits(1080, 14);
        writer.write_bits(2, 2); // view plus depth: one record
        // depth_range: near and far planes
        for _ in 0..2 {
            writer.write_bit(false);
            writer.write_bits(10, 8);
            writer.write_marker_bit();
            writer.write_bits(0x1234, 22);
            writer.write_marker_bit();
        }
        // camera_parameter_set
        writer.write_bits(20, 8); // focal exponent
        writer.write_marker_bit();
        writer.write_bits(0x2345, 22);
        writer.write_marker_bit();
        writer.write_bit(true); // position sign
        writer.write_bits(21, 8);
        writer.write_marker_bit();
        writer.write_bits(0x3456, 22);
        writer.write_marker_bit();
        writer.write_bits(22, 8); // shift exponent
        writer.write_marker_bit();
        writer.write_bits(0x4567, 22);
        writer.write_marker_bit();
        writer.write_bit(false); // shift sign
        writer.write_bit(false); // td_mode

        let ext =
            SequenceDisplayExtension::parse(&writer.finish(), crate::PROFILE_MULTI_VIEW).unwrap();
        assert_eq!(ext.sequence_content_description, Some(2));
        assert_eq!(ext.depth_camera.len(), 1);
        let (range, cameras) = &ext.depth_camera[0];
        assert_eq!(range.near.exponent, 10);
        assert_eq!(range.far.mantissa, 0x1234);
        assert_eq!(cameras.focal_length.exponent, 20);
        assert!(cameras.camera_position.sign);
        assert_eq!(cameras.camera_shift_x.mantissa, 0x4567);
    }

    #[test]
    fn depth_range_marker_is_checked() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b0010, 4);
        writer.write_bits(0, 3);
        writer.write_bit(false);
        writer.write_bit(false);
        writer.write_bits(1920, 14);
        writer.write_marker_bit();
        writer.write_bits(1080, 14);
        writer.write_bits(2, 2);
        writer.write_bit(false);
        writer.write_bits(10, 8);
        writer.write_bit(false); // marker violated
        writer.write_bits(0, 22);

        assert!(matches!(
            SequenceDisplayExtension::parse(&writer.finish(), crate::PROFILE_3D),
            Err(BitError::MarkerBitViolation { .. })
        ));
    }
}
