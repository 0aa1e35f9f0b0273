use serde::{Deserialize, Serialize};

/// Frame rates by `frame_rate_code`.
///
/// Codes 1..=8 are common to all AVS generations; 9..=14 are only assigned
/// for AVS2/AVS3. Code 0 is forbidden and unassigned codes are reserved,
/// both yielding 0.0.
pub const FRAME_RATES: [f64; 16] = [
    0.0,
    24000.0 / 1001.0,
    24.0,
    25.0,
    30000.0 / 1001.0,
    30.0,
    50.0,
    60000.0 / 1001.0,
    60.0,
    100.0,
    120.0,
    200.0,
    240.0,
    300.0,
    120000.0 / 1001.0,
    0.0,
];

/// Looks up a 4-bit frame rate code, yielding 0.0 for forbidden/reserved
#[must_use]
pub fn frame_rate(code: u8) -> f64 {
    FRAME_RATES[(code & 0x0F) as usize]
}

/// Aspect ratio by `aspect_ratio` code, as `(sar, dar)` strings.
///
/// Code 1 signals square samples; codes 2..=4 signal a display aspect ratio.
/// Everything else is forbidden or reserved.
pub const ASPECT_RATIOS: [(Option<&str>, Option<&str>); 16] = {
    let mut table: [(Option<&str>, Option<&str>); 16] = [(None, None); 16];
    table[1] = (Some("1:1"), None);
    table[2] = (None, Some("4:3"));
    table[3] = (None, Some("16:9"));
    table[4] = (None, Some("2.21:1"));
    table
};

/// Looks up a 4-bit aspect ratio code, yielding owned `(sar, dar)` strings
#[must_use]
pub fn aspect_ratio_strings(code: u8) -> (Option<String>, Option<String>) {
    let (sar, dar) = ASPECT_RATIOS[(code & 0x0F) as usize];
    (sar.map(str::to_owned), dar.map(str::to_owned))
}

/// Maps a 3-bit `sample_precision` / `encoding_precision` code to bits per
/// sample. Unassigned codes are forbidden or reserved.
#[must_use]
pub const fn bit_depth_from_precision(code: u8) -> Option<u8> {
    match code {
        1 => Some(8),
        3 => Some(10),
        5 => Some(12),
        _ => None,
    }
}

/// Default 4x4 weight quantization matrix, row major
pub const DEFAULT_WQM_4X4: [[u32; 4]; 4] = [
    [64, 64, 64, 68],
    [64, 64, 68, 72],
    [64, 68, 76, 80],
    [72, 76, 84, 96],
];

/// Default 8x8 weight quantization matrix, row major
pub const DEFAULT_WQM_8X8: [[u32; 8]; 8] = [
    [64, 64, 64, 64, 68, 68, 72, 76],
    [64, 64, 64, 68, 72, 76, 84, 92],
    [64, 64, 68, 72, 76, 80, 88, 100],
    [64, 68, 72, 80, 84, 92, 100, 112],
    [68, 72, 80, 84, 92, 104, 112, 128],
    [76, 80, 84, 92, 104, 116, 132, 152],
    [96, 100, 104, 116, 124, 140, 164, 188],
    [104, 108, 116, 128, 152, 172, 192, 216],
];

/// Sequence-level weight quantization matrices (AVS2/AVS3)
///
/// When `weight_quant_enable_flag` is set and no matrix is loaded from the
/// stream, the defaults above apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightQuantMatrix {
    /// 4x4 matrix, row major
    pub m44: [[u32; 4]; 4],
    /// 8x8 matrix, row major
    pub m88: [[u32; 8]; 8],
}

impl Default for WeightQuantMatrix {
    fn default() -> Self {
        Self {
            m44: DEFAULT_WQM_4X4,
            m88: DEFAULT_WQM_8X8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_codes() {
        assert_eq!(frame_rate(0), 0.0);
        assert_eq!(frame_rate(3), 25.0);
        assert_eq!(frame_rate(8), 60.0);
        assert!((frame_rate(1) - 23.976).abs() < 0.001);
        assert_eq!(frame_rate(13), 300.0);
        assert_eq!(frame_rate(15), 0.0);
    }

    #[test]
    fn aspect_ratio_codes() {
        assert_eq!(aspect_ratio_strings(1), (Some("1:1".into()), None));
        assert_eq!(aspect_ratio_strings(3), (None, Some("16:9".into())));
        assert_eq!(aspect_ratio_strings(0), (None, None));
        assert_eq!(aspect_ratio_strings(9), (None, None));
    }

    #[test]
    fn precision_codes() {
        assert_eq!(bit_depth_from_precision(1), Some(8));
        assert_eq!(bit_depth_from_precision(3), Some(10));
        assert_eq!(bit_depth_from_precision(5), Some(12));
        assert_eq!(bit_depth_from_precision(0), None);
        assert_eq!(bit_depth_from_precision(2), None);
    }
}
