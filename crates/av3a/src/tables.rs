use num_derive::FromPrimitive;

/// AATF audio codec id, 4-bit coded
///
/// GY/T 363 assigns 1 and 2; any other value means the candidate syncword
/// was not a frame header.
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AudioCodecId {
    /// Lossless coding
    Lossless = 1,
    /// General (lossy) coding
    General = 2,
}

impl AudioCodecId {
    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AudioCodecId::Lossless => "Lossless",
            AudioCodecId::General => "General",
        }
    }
}

/// Coding profile of the general codec, 3-bit coded
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CodingProfile {
    /// Channel-based basic profile
    Basic = 0,
    /// Object-metadata profile
    ObjectMetadata = 1,
    /// First-order / higher-order ambisonics profile
    FoaHoa = 2,
}

impl CodingProfile {
    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CodingProfile::Basic => "Basic",
            CodingProfile::ObjectMetadata => "Object Metadata",
            CodingProfile::FoaHoa => "FOA/HOA",
        }
    }
}

/// Sampling frequencies by `sampling_frequency_index`
///
/// GY/T 363 table; index 0xF is the 24-bit escape of the lossless codec and
/// the remaining indices are reserved.
const SAMPLING_FREQUENCIES: [Option<u32>; 16] = [
    Some(192000),
    Some(96000),
    Some(48000),
    Some(44100),
    Some(32000),
    Some(24000),
    Some(22050),
    Some(16000),
    Some(8000),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];

/// Looks up a 4-bit sampling frequency index
#[must_use]
pub fn sampling_frequency(index: u8) -> Option<u32> {
    SAMPLING_FREQUENCIES[(index & 0x0F) as usize]
}

/// Channel configuration by `channel_number_index`, 7-bit coded
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelConfig {
    /// Mono
    Mono = 0,
    /// Stereo
    Stereo = 1,
    /// 5.1 surround
    Mc5_1 = 2,
    /// 7.1 surround
    Mc7_1 = 3,
    /// 10.2 surround
    Mc10_2 = 4,
    /// 22.2 surround
    Mc22_2 = 5,
    /// 4.0 surround
    Mc4_0 = 6,
    /// 5.1.2 immersive
    Mc5_1_2 = 7,
    /// 5.1.4 immersive
    Mc5_1_4 = 8,
    /// 7.1.2 immersive
    Mc7_1_2 = 9,
    /// 7.1.4 immersive
    Mc7_1_4 = 10,
    /// First-order ambisonics
    HoaOrder1 = 11,
    /// Second-order ambisonics
    HoaOrder2 = 12,
    /// Third-order ambisonics
    HoaOrder3 = 13,
}

impl ChannelConfig {
    /// Number of coded channels in this configuration
    #[must_use]
    pub const fn channels(self) -> u16 {
        match self {
            ChannelConfig::Mono => 1,
            ChannelConfig::Stereo => 2,
            ChannelConfig::Mc5_1 => 6,
            ChannelConfig::Mc7_1 => 8,
            ChannelConfig::Mc10_2 => 12,
            ChannelConfig::Mc22_2 => 24,
            ChannelConfig::Mc4_0 => 4,
            ChannelConfig::Mc5_1_2 => 8,
            ChannelConfig::Mc5_1_4 => 10,
            ChannelConfig::Mc7_1_2 => 10,
            ChannelConfig::Mc7_1_4 => 12,
            ChannelConfig::HoaOrder1 => 4,
            ChannelConfig::HoaOrder2 => 9,
            ChannelConfig::HoaOrder3 => 16,
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ChannelConfig::Mono => "Mono",
            ChannelConfig::Stereo => "Stereo",
            ChannelConfig::Mc5_1 => "5.1",
            ChannelConfig::Mc7_1 => "7.1",
            ChannelConfig::Mc10_2 => "10.2",
            ChannelConfig::Mc22_2 => "22.2",
            ChannelConfig::Mc4_0 => "4.0",
            ChannelConfig::Mc5_1_2 => "5.1.2",
            ChannelConfig::Mc5_1_4 => "5.1.4",
            ChannelConfig::Mc7_1_2 => "7.1.2",
            ChannelConfig::Mc7_1_4 => "7.1.4",
            ChannelConfig::HoaOrder1 => "HOA order 1",
            ChannelConfig::HoaOrder2 => "HOA order 2",
            ChannelConfig::HoaOrder3 => "HOA order 3",
        }
    }

    /// The configuration for an ambisonics order, when assigned
    #[must_use]
    pub const fn from_hoa_order(order: u8) -> Option<Self> {
        match order {
            1 => Some(ChannelConfig::HoaOrder1),
            2 => Some(ChannelConfig::HoaOrder2),
            3 => Some(ChannelConfig::HoaOrder3),
            _ => None,
        }
    }
}

/// Per-configuration bit-rate ladders in kbit/s, indexed by `bitrate_index`
///
/// GY/T 363 assigns no ladder to the 10.2 and 22.2 configurations; frames
/// announcing them carry no derivable bit rate.
#[must_use]
pub const fn bit_rate_table(config: ChannelConfig) -> &'static [u32] {
    match config {
        ChannelConfig::Mono => &[16, 32, 44, 56, 64, 72, 80, 96, 128, 144, 164, 192],
        ChannelConfig::Stereo => &[24, 32, 48, 64, 80, 96, 128, 144, 192, 256, 320],
        ChannelConfig::Mc5_1 => &[192, 256, 320, 384, 448, 512, 640, 720, 144, 96, 128, 160],
        ChannelConfig::Mc7_1 => &[192, 480, 256, 384, 576, 640, 128, 160],
        ChannelConfig::Mc10_2 | ChannelConfig::Mc22_2 => &[],
        ChannelConfig::Mc4_0 => &[48, 96, 128, 192, 256],
        ChannelConfig::Mc5_1_2 => &[152, 320, 480, 576],
        ChannelConfig::Mc5_1_4 => &[176, 384, 576, 704, 256, 448],
        ChannelConfig::Mc7_1_2 => &[216, 480, 576, 384, 768],
        ChannelConfig::Mc7_1_4 => &[240, 608, 384, 512, 832],
        ChannelConfig::HoaOrder1 => &[48, 96, 128, 192, 256],
        ChannelConfig::HoaOrder2 => &[128, 256, 320, 448, 512],
        ChannelConfig::HoaOrder3 => &[256, 320, 448, 512],
    }
}

/// Looks up a bit rate in kbit/s for a configuration and index
#[must_use]
pub fn bit_rate_kbps(config: ChannelConfig, index: u8) -> Option<u32> {
    bit_rate_table(config).get(index as usize).copied()
}

/// Maps the 2-bit resolution code to bits per sample
#[must_use]
pub const fn resolution_bits(code: u8) -> Option<u8> {
    match code {
        0 => Some(8),
        1 => Some(16),
        2 => Some(24),
        _ => None,
    }
}

/// Neural-network configuration name for the general codec's `nn_type`
#[must_use]
pub const fn nn_type_name(code: u8) -> &'static str {
    match code {
        0 => "Basic",
        1 => "Low Complexity",
        _ => "Reserved",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn sampling_frequency_table() {
        assert_eq!(sampling_frequency(0), Some(192000));
        assert_eq!(sampling_frequency(2), Some(48000));
        assert_eq!(sampling_frequency(8), Some(8000));
        assert_eq!(sampling_frequency(9), None);
        assert_eq!(sampling_frequency(15), None);
    }

    #[test]
    fn channel_configs() {
        assert_eq!(ChannelConfig::from_u8(1), Some(ChannelConfig::Stereo));
        assert_eq!(ChannelConfig::Stereo.channels(), 2);
        assert_eq!(ChannelConfig::Mc7_1_4.channels(), 12);
        assert_eq!(ChannelConfig::HoaOrder3.channels(), 16);
        assert_eq!(ChannelConfig::from_u8(14), None);
    }

    #[test]
    fn stereo_ladder() {
        assert_eq!(bit_rate_kbps(ChannelConfig::Stereo, 7), Some(144));
        assert_eq!(bit_rate_kbps(ChannelConfig::Stereo, 10), Some(320));
        assert_eq!(bit_rate_kbps(ChannelConfig::Stereo, 11), None);
        assert_eq!(bit_rate_kbps(ChannelConfig::Mc22_2, 0), None);
    }

    #[test]
    fn resolution_codes() {
        assert_eq!(resolution_bits(0), Some(8));
        assert_eq!(resolution_bits(1), Some(16));
        assert_eq!(resolution_bits(2), Some(24));
        assert_eq!(resolution_bits(3), None);
    }
}
