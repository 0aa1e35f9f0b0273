use avs_types::start_code::{
    EXT_SEQUENCE_DISPLAY, EXTENSION, I_PICTURE, PB_PICTURE, SEQUENCE_HEADER, find_start_code,
};
use avs_types::{
    AvsVideoInfo, ColorPrimaries, MatrixCoefficients, PackingMode, TransferCharacteristics,
    aspect_ratio_strings, bit_depth_from_precision, combined_color_description, frame_rate,
};
use bitio::BitError;

use crate::{SequenceDisplayExtension, SequenceHeader};

/// Valid colour code ranges for AVS2 (GB/T 33475.2)
const MAX_COLOR_PRIMARIES: u8 = 9;
const MAX_TRANSFER: u8 = 14;
const MAX_MATRIX: u8 = 9;

/// Highest assigned TD packing code
const MAX_TD_PACKING: u8 = 4;

/// Incremental scanner over an AVS2 elementary stream
///
/// Same contract as the AVS1 scanner: append chunks, stop at the first
/// picture header, then read the captured record.
#[derive(Debug, Default)]
pub struct SequenceScanner {
    es: Vec<u8>,
    scan_pos: usize,
    header: Option<SequenceHeader>,
    display: Option<SequenceDisplayExtension>,
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
                    let profile_id = match &self.header {
                        Some(header) if payload[0] >> 4 == EXT_SEQUENCE_DISPLAY => {
                            Some(header.profile_id)
                        }
                        _ => None,
                    };
                    if let Some(profile_id) = profile_id {
                        match SequenceDisplayExtension::parse(payload, profile_id) {
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
                    } else {
                        self.scan_pos = pos + 4;
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
            generation_name: "AVS2".to_string(),
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
