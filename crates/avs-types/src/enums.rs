use serde::{Deserialize, Serialize};

/// The AVS codec family member carried by an elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecKind {
    /// AVS1 video (GB/T 20090.2), including the AVS+ broadcasting profile
    Avs1,
    /// AVS2 video (GB/T 33475.2)
    Avs2,
    /// AVS3 video (T/AI 109.2, GY/T 368)
    Avs3Video,
    /// Audio Vivid / AV3A (GY/T 363, T/AI 109.3)
    Av3aAudio,
}

impl CodecKind {
    /// Whether this kind carries video
    #[must_use]
    pub const fn is_video(self) -> bool {
        !matches!(self, CodecKind::Av3aAudio)
    }
}

/// Chroma subsampling format, 2-bit coded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaFormat {
    /// Reserved code
    Reserved,
    /// 4:2:0 subsampling
    Yuv420,
    /// 4:2:2 subsampling
    Yuv422,
    /// 4:4:4 sampling
    Yuv444,
}

impl From<u8> for ChromaFormat {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            1 => ChromaFormat::Yuv420,
            2 => ChromaFormat::Yuv422,
            3 => ChromaFormat::Yuv444,
            _ => ChromaFormat::Reserved,
        }
    }
}

impl ChromaFormat {
    /// Human-readable form, e.g. `4:2:0`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChromaFormat::Reserved => "reserved",
            ChromaFormat::Yuv420 => "4:2:0",
            ChromaFormat::Yuv422 => "4:2:2",
            ChromaFormat::Yuv444 => "4:4:4",
        }
    }
}

/// Video format from the sequence display extension, 3-bit coded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoFormat {
    /// Component
    Component,
    /// PAL
    Pal,
    /// NTSC
    Ntsc,
    /// SECAM
    Secam,
    /// MAC
    Mac,
    /// Unspecified video format
    Unspecified,
}

impl From<u8> for VideoFormat {
    fn from(value: u8) -> Self {
        match value {
            0 => VideoFormat::Component,
            1 => VideoFormat::Pal,
            2 => VideoFormat::Ntsc,
            3 => VideoFormat::Secam,
            4 => VideoFormat::Mac,
            _ => VideoFormat::Unspecified,
        }
    }
}

/// Sample range from the sequence display extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleRange {
    /// Limited (studio) range
    Limited,
    /// Full range
    Full,
}

impl From<bool> for SampleRange {
    fn from(full: bool) -> Self {
        if full { SampleRange::Full } else { SampleRange::Limited }
    }
}

/// Unified frame packing mode across the AVS generations
///
/// AVS1 codes a 2-bit stereo packing mode, AVS2/AVS3 an 8-bit TD packing
/// mode; both map into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackingMode {
    /// Monoscopic 2D
    TwoD,
    /// Side-by-side packing
    SideBySide,
    /// Over-under (top-bottom) packing
    OverUnder,
    /// Four-view quad packing
    Quad,
    /// Texture+depth over-under packing
    TdOverUnder,
    /// Texture+depth side-by-side packing
    TdSideBySide,
    /// Reserved code
    Reserved,
}

impl PackingMode {
    /// Maps the AVS1 2-bit stereo packing code
    #[must_use]
    pub fn from_stereo_packing(code: u8) -> Self {
        match code {
            0 => PackingMode::TwoD,
            1 => PackingMode::SideBySide,
            2 => PackingMode::OverUnder,
            _ => PackingMode::Reserved,
        }
    }

    /// Maps the AVS2/AVS3 8-bit TD packing code; `max_valid` caps the range
    /// (4 for AVS2, 2 for AVS3)
    #[must_use]
    pub fn from_td_packing(code: u8, max_valid: u8) -> Self {
        if code > max_valid {
            return PackingMode::Reserved;
        }
        match code {
            0 => PackingMode::TwoD,
            1 => PackingMode::SideBySide,
            2 => PackingMode::OverUnder,
            3 => PackingMode::Quad,
            4 => PackingMode::TdOverUnder,
            _ => PackingMode::Reserved,
        }
    }
}

/// HDR dynamic metadata type from the AVS3 extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HdrDynamicMetadataType {
    /// HDR Vivid (type value 5)
    HdrVivid,
    /// Any other type value
    Reserved,
}

impl From<u8> for HdrDynamicMetadataType {
    fn from(value: u8) -> Self {
        match value {
            5 => HdrDynamicMetadataType::HdrVivid,
            _ => HdrDynamicMetadataType::Reserved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_codes() {
        assert_eq!(ChromaFormat::from(0), ChromaFormat::Reserved);
        assert_eq!(ChromaFormat::from(1), ChromaFormat::Yuv420);
        assert_eq!(ChromaFormat::from(3), ChromaFormat::Yuv444);
    }

    #[test]
    fn stereo_packing() {
        assert_eq!(PackingMode::from_stereo_packing(0), PackingMode::TwoD);
        assert_eq!(PackingMode::from_stereo_packing(1), PackingMode::SideBySide);
        assert_eq!(PackingMode::from_stereo_packing(3), PackingMode::Reserved);
    }

    #[test]
    fn td_packing_ranges() {
        assert_eq!(PackingMode::from_td_packing(4, 4), PackingMode::TdOverUnder);
        assert_eq!(PackingMode::from_td_packing(3, 2), PackingMode::Reserved);
        assert_eq!(PackingMode::from_td_packing(2, 2), PackingMode::OverUnder);
        assert_eq!(PackingMode::from_td_packing(200, 4), PackingMode::Reserved);
    }

    #[test]
    fn hdr_metadata_type() {
        assert_eq!(
            HdrDynamicMetadataType::from(5),
            HdrDynamicMetadataType::HdrVivid
        );
        assert_eq!(
            HdrDynamicMetadataType::from(0),
            HdrDynamicMetadataType::Reserved
        );
    }
}
