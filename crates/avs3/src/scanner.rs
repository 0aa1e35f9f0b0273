use avs_types::start_code::{
    EXT_HDR_DYNAMIC_METADATA, EXT_SEQUENCE_DISPLAY, EXTENSION, I_PICTURE, PB_PICTURE,
    SEQUENCE_HEADER, find_start_code,
};
use avs_types::{
    AvsVideoInfo, ColorPrimaries, MatrixCoefficients, PackingMode, TransferCharacteristics,
    aspect_ratio_strings, bit_depth_from_precision, combined_color_description, frame_rate,
};
use bitio::BitError;

use crate::{HdrDynamicMetadata, SequenceDisplayExtension, SequenceHeader};

/// Valid colour code ranges for AVS3 (GY/T 368)
const MAX_COLOR_PRIMARIES: u8 = 9;
const MAX_TRANSFER: u8 = 14;
const MAX_MATRIX: u8 = 9;

/// Highest assigned TD packing code
const MAX_TD_PACKING: u8 = 2;

/// Incremental scanner over an AVS3 elementary stream
///
/// Captures the sequence header, the display extension and the HDR dynamic
/// metadata extension; terminal at the first picture header.
#[derive(Debug, Default)]
pub struct SequenceScanner {
    es: Vec<u8>,
    scan_pos: usize,
    header: Option<SequenceHeader>,
    display: Option<SequenceDisplayExtension>,
    hdr: Option<HdrDynamicMetadata>,
    done: bool,
}

impl SequenceScanner {
    /// Creates an empty scanner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends elementary-stream bytes; returns `true` once terminal
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.done {
            return true;
        }
        self.es.extend_from_slice(chunk);
        self.scan();
        self.done
    }

    /// Whether the scan reached a picture header
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn scan(&mut self) {
        while let Some((pos, suffix)) = find_start_code(&self.es, self.scan_pos) {
            let payload = &self.es[pos + 4..];
            match suffix {
                SEQUENCE_HEADER => match SequenceHeader::parse(payload) {
                    Ok(header) => {
                        self.header = Some(header);
                        self.scan_pos = pos + 4;
                    }
                    Err(BitError::Truncated { .. }) => {
                        self.scan_pos = pos;
                        return;
                    }
                    Err(_) => {
                        self.scan_pos = pos + 4;
                    }
                },
                EXTENSION => {
                    if payload.is_empty() {
                        self.scan_pos = pos;
                        return;
                    }
                    if self.header.is_none() {
                        self.scan_pos = pos + 4;
                        continue;
                    }
                    match payload[0] >> 4 {
                        EXT_SEQUENCE_DISPLAY => {
                            match SequenceDisplayExtension::parse(payload) {
                                Ok(ext) => {
                                    self.display = Some(ext);
                                    self.scan_pos = pos + 4;
                                }
                                Err(BitError::Truncated { .. }) => {
                                    self.scan_pos = pos;
                                    return;
                                }
                                Err(_) => {
                                    self.scan_pos = pos + 4;
                                }
                            }
                        }
                        EXT_HDR_DYNAMIC_METADATA => match HdrDynamicMetadata::parse(payload) {
                            Ok(metadata) => {
                                self.hdr = Some(metadata);
                                self.scan_pos = pos + 4;
                            }
                            Err(_) => {
                                self.scan_pos = pos + 4;
                            }
                        },
                        _ => {
                            self.scan_pos = pos + 4;
                        }
                    }
                }
                I_PICTURE | PB_PICTURE if self.header.is_some() => {
                    self.done = true;
                    return;
                }
                _ => {
                    self.scan_pos = pos + 4;
                }
            }
        }

        self.scan_pos = self.scan_pos.max(self.es.len().saturating_sub(3));
    }

    /// The semantic record for what has been captured so far
    #[must_use]
    pub fn info(&self) -> Option<AvsVideoInfo> {
        let header = self.header.as_ref()?;
        let (sar, dar) = aspect_ratio_strings(header.aspect_ratio_code);
        let bit_depth = bit_depth_from_precision(header.effective_precision());

        let mut info = AvsVideoInfo {
            generation_name: "AVS3".to_string(),
            profile_name: header.profile_name(),
            level_name: header.level_name(),
            horizontal_size: header.horizontal_size,
            vertical_size: header.vertical_size,
            progressive: header.progressive_sequence,
            chroma_format: header.chroma_format,
            luma_bit_depth: bit_depth,
            chroma_bit_depth: bit_depth,
            frame_rate: frame_rate(header.frame_rate_code),
            bit_rate: header.bit_rate(),
            low_delay: header.low_delay,
            sar,
            dar,
            video_format: None,
            sample_range: None,
            hdr_dynamic_metadata: None,
            color_description: None,
            color_primaries: None,
            transfer_characteristics: None,
            matrix_coefficients: None,
            display_horizontal_size: None,
            display_vertical_size: None,
            packing_mode: None,
        };

        info.hdr_dynamic_metadata = self.hdr.as_ref().map(|metadata| metadata.metadata_type);

        if let Some(ext) = &self.display {
            info.video_format = Some(ext.video_format);
            info.sample_range = Some(ext.sample_range);
            info.color_primaries = ext
                .color_primaries
                .and_then(|v| ColorPrimaries::from_coded(v, MAX_COLOR_PRIMARIES));
            info.transfer_characteristics = ext
                .transfer_characteristics
                .and_then(|v| TransferCharacteristics::from_coded(v, MAX_TRANSFER));
            info.matrix_coefficients = ext
                .matrix_coefficients
                .and_then(|v| MatrixCoefficients::from_coded(v, MAX_MATRIX));
            if let (Some(p), Some(t), Some(m)) = (
                ext.color_primaries,
                ext.transfer_characteristics,
                ext.matrix_coefficients,
            ) {
                info.color_description = combined_color_description(p, t, m);
            }
            info.display_horizontal_size = Some(ext.display_horizontal_size);
            info.display_vertical_size = Some(ext.display_vertical_size);
            info.packing_mode = ext
                .td_packing_mode
                .map(|mode| PackingMode::from_td_packing(mode, MAX_TD_PACKING));
        }

        Some(info)
    }

    /// Consumes the scanner, yielding the captured record
    #[must_use]
    pub fn finish(self) -> Option<AvsVideoInfo> {
        self.info()
    }
}

/// One-shot convenience over a complete elementary-stream buffer
#[must_use]
pub fn parse_sequence_info(es: &[u8]) -> Option<AvsVideoInfo> {
    let mut scanner = SequenceScanner::new();
    scanner.push(es);
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use avs_types::{ChromaFormat, HdrDynamicMetadataType};
    use bitio::BitWriter;

    pub(crate) fn main8_1080p25_es() -> Vec<u8> {
        let mut es = vec![0x00, 0x00, 0x01, 0xB0];
        let mut writer = BitWriter::new();
        crate::sequence_header::tests::write_header(&mut writer, crate::PROFILE_MAIN8, 0x22);
        es.extend_from_slice(&writer.finish());
        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB3, 0x00]);
        es
    }

    #[test]
    fn main8_1080p25_info() {
        let info = parse_sequence_info(&main8_1080p25_es()).unwrap();

        assert_eq!(info.generation_name, "AVS3");
        assert!(info.profile_name.contains("Main 8bit"));
        assert_eq!(info.level_name, "4.0.60");
        assert_eq!(info.horizontal_size, 1920);
        assert_eq!(info.vertical_size, 1080);
        assert!(info.progressive);
        assert_eq!(info.chroma_format, ChromaFormat::Yuv420);
        assert_eq!(info.luma_bit_depth, Some(8));
        assert_eq!(info.frame_rate, 25.0);
        assert!(!info.low_delay);
        assert_eq!(info.dar, Some("16:9".into()));
    }

    #[test]
    fn hdr_vivid_extension_is_reported() {
        let mut es = vec![0x00, 0x00, 0x01, 0xB0];
        let mut writer = BitWriter::new();
        crate::sequence_header::tests::write_header(&mut writer, crate::PROFILE_HIGH10, 0x62);
        es.extend_from_slice(&writer.finish());

        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB5]);
        let mut writer = BitWriter::new();
        crate::display_extension::tests::write_extension(&mut writer, Some((9, 11, 8)), 3840, 2160);
        es.extend_from_slice(&writer.finish());

        // HDR dynamic metadata extension: id 0b0101, type 5 (HDR Vivid)
        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB5, 0b0101_0101]);
        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB6, 0x00]);

        let info = parse_sequence_info(&es).unwrap();
        assert_eq!(info.luma_bit_depth, Some(10));
        assert_eq!(
            info.hdr_dynamic_metadata,
            Some(HdrDynamicMetadataType::HdrVivid)
        );
        assert_eq!(info.color_primaries, Some(ColorPrimaries::Bt2020));
        assert_eq!(
            info.transfer_characteristics,
            Some(TransferCharacteristics::Pq)
        );
        assert_eq!(info.color_description, None);
    }

    #[test]
    fn split_pushes_reassemble() {
        let es = main8_1080p25_es();
        for split in 1..es.len() {
            let mut scanner = SequenceScanner::new();
            scanner.push(&es[..split]);
            assert!(scanner.push(&es[split..]), "split at {split}");
            assert_eq!(scanner.info().unwrap().horizontal_size, 1920);
        }
    }

    #[test]
    fn td_packing_beyond_avs3_range_is_reserved() {
        let mut es = vec![0x00, 0x00, 0x01, 0xB0];
        let mut writer = BitWriter::new();
        crate::sequence_header::tests::write_header(&mut writer, crate::PROFILE_MAIN8, 0x22);
        es.extend_from_slice(&writer.finish());

        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB5]);
        let mut writer = BitWriter::new();
        writer.write_bits(0b0010, 4);
        writer.write_bits(0, 3);
        writer.write_bit(false);
        writer.write_bit(false);
        writer.write_bits(1920, 14);
        writer.write_marker_bit();
        writer.write_bits(1080, 14);
        writer.write_bit(true); // td_mode
        writer.write_bits(3, 8); // valid for AVS2, reserved for AVS3
        writer.write_bit(false);
        es.extend_from_slice(&writer.finish());
        es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB3, 0x00]);

        let info = parse_sequence_info(&es).unwrap();
        assert_eq!(info.packing_mode, Some(PackingMode::Reserved));
    }
}
