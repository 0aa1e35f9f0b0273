use serde::{Deserialize, Serialize};

use crate::{
    ChromaFormat, ColorDescription, ColorPrimaries, HdrDynamicMetadataType, MatrixCoefficients,
    PackingMode, SampleRange, TransferCharacteristics, VideoFormat,
};

/// Semantic description of an AVS video elementary stream
///
/// Built by the codec parsers from the first sequence header (and, when
/// present, the sequence display extension). Fields past `dar` only appear
/// when the display extension was seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvsVideoInfo {
    /// Generation name: `AVS`, `AVS+`, `AVS2` or `AVS3`
    pub generation_name: String,
    /// Profile name derived from `profile_id`
    pub profile_name: String,
    /// Level name derived from `level_id`
    pub level_name: String,
    /// Luma width in samples
    pub horizontal_size: u32,
    /// Luma height in samples
    pub vertical_size: u32,
    /// Progressive sequence flag
    pub progressive: bool,
    /// Chroma subsampling
    pub chroma_format: ChromaFormat,
    /// Luma bits per sample; absent when the precision code is reserved
    pub luma_bit_depth: Option<u8>,
    /// Chroma bits per sample; absent when the precision code is reserved
    pub chroma_bit_depth: Option<u8>,
    /// Frame rate in Hz (0.0 when the code is forbidden/reserved)
    pub frame_rate: f64,
    /// Bit rate in bits per second
    pub bit_rate: u64,
    /// Low delay flag
    pub low_delay: bool,
    /// Sample aspect ratio, e.g. `1:1`
    pub sar: Option<String>,
    /// Display aspect ratio, e.g. `16:9`
    pub dar: Option<String>,

    /// Video format, from the display extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_format: Option<VideoFormat>,
    /// Sample range, from the display extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_range: Option<SampleRange>,
    /// HDR dynamic metadata type (AVS3 extension)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdr_dynamic_metadata: Option<HdrDynamicMetadataType>,
    /// Combined colour description when the coded triple names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_description: Option<ColorDescription>,
    /// Colour primaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_primaries: Option<ColorPrimaries>,
    /// Transfer characteristics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_characteristics: Option<TransferCharacteristics>,
    /// Matrix coefficients
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_coefficients: Option<MatrixCoefficients>,
    /// Display width in samples, from the display extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_horizontal_size: Option<u32>,
    /// Display height in samples, from the display extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_vertical_size: Option<u32>,
    /// 3D frame packing mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packing_mode: Option<PackingMode>,
}

/// Semantic description of an Audio Vivid elementary stream
///
/// Optional fields depend on the codec id and coding profile branches of the
/// AATF frame header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvsAudioInfo {
    /// Audio codec id name (`Lossless` or `General`)
    pub codec_name: String,
    /// Coding profile name
    pub coding_profile: String,
    /// Sampling frequency in Hz
    pub sampling_frequency: u32,
    /// Bits per sample (8, 16 or 24); absent when the code is reserved
    pub resolution_bits: Option<u8>,
    /// Neural network configuration name (General codec only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nn_type: Option<String>,
    /// Effective channel count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_number: Option<u16>,
    /// Channel configuration name, e.g. `Stereo` or `5.1.4`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_configuration: Option<String>,
    /// Number of object channels (object-metadata profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_channel_number: Option<u16>,
    /// Higher-order ambisonics order (FOA/HOA profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoa_order: Option<u8>,
    /// Total bit rate in bits per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u64>,
}

/// Either kind of in-band stream description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvsInfo {
    /// Video sequence information
    Video(AvsVideoInfo),
    /// Audio frame information
    Audio(AvsAudioInfo),
}

impl AvsInfo {
    /// The video record, if this is video
    #[must_use]
    pub fn as_video(&self) -> Option<&AvsVideoInfo> {
        match self {
            AvsInfo::Video(info) => Some(info),
            AvsInfo::Audio(_) => None,
        }
    }

    /// The audio record, if this is audio
    #[must_use]
    pub fn as_audio(&self) -> Option<&AvsAudioInfo> {
        match self {
            AvsInfo::Audio(info) => Some(info),
            AvsInfo::Video(_) => None,
        }
    }
}
