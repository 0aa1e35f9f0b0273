use avs_types::{ChromaFormat, WeightQuantMatrix};
use bitio::BitReader;

use crate::{ENCODING_PRECISION_PROFILES, Result};

/// `reference_configuration_set(i)`
///
/// GB/T 33475.2 - 7.1.2.1. One entry of the reference configuration table;
/// only the shape matters to the analyzer, the DOI deltas are kept for
/// completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConfigurationSet {
    /// This configuration is referenced by other pictures
    pub refered_by_others: bool,
    /// DOI deltas of the reference pictures
    pub reference_deltas: Vec<u8>,
    /// DOI deltas of the pictures removed from the buffer
    pub removed_deltas: Vec<u8>,
}

impl ReferenceConfigurationSet {
    fn parse(r: &mut BitReader) -> Result<Self> {
        let refered_by_others = r.read_bool()?;

        let num_reference = r.read_bits(3)? as usize;
        let mut reference_deltas = Vec::with_capacity(num_reference);
        for _ in 0..num_reference {
            reference_deltas.push(r.read_bits(6)? as u8);
        }

        let num_removed = r.read_bits(3)? as usize;
        let mut removed_deltas = Vec::with_capacity(num_removed);
        for _ in 0..num_removed {
            removed_deltas.push(r.read_bits(6)? as u8);
        }

        r.check_marker_bit()?;

        Ok(ReferenceConfigurationSet {
            refered_by_others,
            reference_deltas,
            removed_deltas,
        })
    }
}

/// AVS2 `sequence_header()`
///
/// GB/T 33475.2 - 7.1.2.1.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceHeader {
    /// Profile id
    pub profile_id: u8,
    /// Level id
    pub level_id: u8,
    /// Progressive sequence flag
    pub progressive_sequence: bool,
    /// Field coded sequence flag
    pub field_coded_sequence: bool,
    /// Luma width in samples
    pub horizontal_size: u32,
    /// Luma height in samples
    pub vertical_size: u32,
    /// Chroma subsampling
    pub chroma_format: ChromaFormat,
    /// 3-bit sample precision code
    pub sample_precision: u8,
    /// 3-bit encoding precision code, present for the 10-bit profiles
    pub encoding_precision: Option<u8>,
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
    /// Temporal id enable flag
    pub temporal_id_enable: bool,
    /// BBV buffer size in coded units
    pub bbv_buffer_size: u32,
    /// 3-bit LCU size code (log2)
    pub lcu_size: u8,
    /// Weight quantization matrices in effect, when enabled
    pub weight_quant: Option<WeightQuantMatrix>,
    /// Tool enable flags in syntax order: background picture, MHP skip,
    /// DHP, WSM, AMP, NSQT, NSIP, secondary transform, SAO, ALF, PMVR
    pub tool_flags: [bool; 11],
    /// Reference configuration sets
    pub reference_configurations: Vec<ReferenceConfigurationSet>,
    /// Picture reorder delay, present when low delay is off
    pub output_reorder_delay: Option<u8>,
    /// Cross-slice loop filter enable flag
    pub cross_slice_loopfilter_enable: bool,
    /// Universal string prediction enable flag, 4:4:4 sequences only
    pub universal_string_prediction_enable: Option<bool>,
}

impl SequenceHeader {
    /// Parses a sequence header from the bytes following the
    /// `00 00 01 B0` start code
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(data);

        let profile_id = r.read_bits(8)? as u8;
        let level_id = r.read_bits(8)? as u8;
        let progressive_sequence = r.read_bool()?;
        let field_coded_sequence = r.read_bool()?;
        let horizontal_size = r.read_bits(14)?;
        let vertical_size = r.read_bits(14)?;
        let chroma_format = ChromaFormat::from(r.read_bits(2)? as u8);
        let sample_precision = r.read_bits(3)? as u8;
        let encoding_precision = if ENCODING_PRECISION_PROFILES.contains(&profile_id) {
            Some(r.read_bits(3)? as u8)
        } else {
            None
        };
        let aspect_ratio_code = r.read_bits(4)? as u8;
        let frame_rate_code = r.read_bits(4)? as u8;
        let bit_rate_lower = r.read_bits(18)?;
        r.check_marker_bit()?;
        let bit_rate_upper = r.read_bits(12)?;
        let low_delay = r.read_bool()?;
        r.check_marker_bit()?;
        let temporal_id_enable = r.read_bool()?;
        let bbv_buffer_size = r.read_bits(18)?;
        r.check_marker_bit()?;
        let lcu_size = r.read_bits(3)? as u8;

        let weight_quant_enable = r.read_bool()?;
        let weight_quant = if weight_quant_enable {
            let load_seq_weight_quant_data = r.read_bool()?;
            if load_seq_weight_quant_data {
                Some(parse_weight_quant_matrix(&mut r)?)
            } else {
                Some(WeightQuantMatrix::default())
            }
        } else {
            None
        };

        let mut tool_flags = [false; 11];
        for flag in &mut tool_flags {
            *flag = r.read_bool()?;
        }
        r.check_marker_bit()?;

        let num_of_rcs = r.read_bits(6)? as usize;
        let mut reference_configurations = Vec::with_capacity(num_of_rcs);
        for _ in 0..num_of_rcs {
            reference_configurations.push(ReferenceConfigurationSet::parse(&mut r)?);
        }

        let output_reorder_delay = if !low_delay {
            Some(r.read_bits(5)? as u8)
        } else {
            None
        };

        let cross_slice_loopfilter_enable = r.read_bool()?;
        let universal_string_prediction_enable = if chroma_format == ChromaFormat::Yuv444 {
            Some(r.read_bool()?)
        } else {
            None
        };
        r.skip_bits(2); // reserved

        Ok(SequenceHeader {
            profile_id,
            level_id,
            progressive_sequence,
            field_coded_sequence,
            horizontal_size,
            vertical_size,
            chroma_format,
            sample_precision,
            encoding_precision,
            aspect_ratio_code,
            frame_rate_code,
            bit_rate_lower,
            bit_rate_upper,
            low_delay,
            temporal_id_enable,
            bbv_buffer_size,
            lcu_size,
            weight_quant,
            tool_flags,
            reference_configurations,
            output_reorder_delay,
            cross_slice_loopfilter_enable,
            universal_string_prediction_enable,
        })
    }

    /// Bit rate in bits per second
    #[must_use]
    pub fn bit_rate(&self) -> u64 {
        (((self.bit_rate_upper as u64) << 18) | (self.bit_rate_lower as u64 & 0x3FFFF)) * 400
    }

    /// The precision code governing the coded bit depth
    #[must_use]
    pub fn effective_precision(&self) -> u8 {
        self.encoding_precision.unwrap_or(self.sample_precision)
    }

    /// Human-readable profile name
    #[must_use]
    pub fn profile_name(&self) -> String {
        match self.profile_id {
            crate::PROFILE_MAIN_PICTURE => "Main Picture Profile".to_string(),
            crate::PROFILE_MAIN => "Main Profile".to_string(),
            crate::PROFILE_MAIN10 => "Main-10bit Profile".to_string(),
            crate::PROFILE_MULTI_VIEW => "Multi-view Profile".to_string(),
            crate::PROFILE_3D => "3D Profile".to_string(),
            crate::PROFILE_SCENE => "Scene Profile".to_string(),
            crate::PROFILE_SCENE10 => "Scene-10bit Profile".to_string(),
            other => format!("Profile 0x{other:02X}"),
        }
    }

    /// Human-readable level name
    #[must_use]
    pub fn level_name(&self) -> String {
        level_name(self.level_id)
    }
}

fn parse_weight_quant_matrix(r: &mut BitReader) -> Result<WeightQuantMatrix> {
    let mut matrix = WeightQuantMatrix::default();
    for row in &mut matrix.m44 {
        for value in row {
            *value = r.read_ue()?;
        }
    }
    for row in &mut matrix.m88 {
        for value in row {
            *value = r.read_ue()?;
        }
    }
    Ok(matrix)
}

/// Level names per the GB/T 33475.2 level table
fn level_name(level_id: u8) -> String {
    match level_id {
        0x10 => "2.0.15".to_string(),
        0x12 => "2.0.30".to_string(),
        0x14 => "2.0.60".to_string(),
        0x20 => "4.0.30".to_string(),
        0x22 => "4.0.60".to_string(),
        0x40 => "6.0.30".to_string(),
        0x42 => "6.0.60".to_string(),
        0x44 => "6.0.120".to_string(),
        0x50 => "8.0.30".to_string(),
        0x52 => "8.0.60".to_string(),
        0x54 => "8.0.120".to_string(),
        0x60 => "10.0.30".to_string(),
        0x62 => "10.0.60".to_string(),
        0x64 => "10.0.120".to_string(),
        other => format!("Level 0x{other:02X}"),
    }
}
