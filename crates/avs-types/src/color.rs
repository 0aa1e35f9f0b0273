use serde::{Deserialize, Serialize};

/// Colour primaries as coded by the AVS video standards
///
/// Value 0 is forbidden; parsers report it as an absent field. Values past
/// a generation's valid range normalize to [`ColorPrimaries::Reserved`]
/// rather than being dropped, so downstream colour logic stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPrimaries {
    /// ITU-R BT.709
    Bt709,
    /// Unspecified video
    Unspecified,
    /// ITU-R BT.470-2 System M
    Bt470M,
    /// ITU-R BT.470-2 System B, G
    Bt470Bg,
    /// SMPTE 170M
    Smpte170m,
    /// SMPTE 240M
    Smpte240m,
    /// Generic film
    GenericFilm,
    /// ITU-R BT.2020
    Bt2020,
    /// Reserved value
    Reserved,
}

impl From<u8> for ColorPrimaries {
    fn from(value: u8) -> Self {
        match value {
            1 => ColorPrimaries::Bt709,
            2 => ColorPrimaries::Unspecified,
            4 => ColorPrimaries::Bt470M,
            5 => ColorPrimaries::Bt470Bg,
            6 => ColorPrimaries::Smpte170m,
            7 => ColorPrimaries::Smpte240m,
            8 => ColorPrimaries::GenericFilm,
            9 => ColorPrimaries::Bt2020,
            _ => ColorPrimaries::Reserved,
        }
    }
}

impl ColorPrimaries {
    /// Interprets a coded value: 0 is forbidden (absent), values above
    /// `max_valid` are reserved
    #[must_use]
    pub fn from_coded(value: u8, max_valid: u8) -> Option<Self> {
        match value {
            0 => None,
            v if v > max_valid => Some(ColorPrimaries::Reserved),
            v => Some(ColorPrimaries::from(v)),
        }
    }
}

/// Transfer characteristics as coded by the AVS video standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferCharacteristics {
    /// ITU-R BT.709
    Bt709,
    /// Unspecified video
    Unspecified,
    /// Assumed display gamma 2.2
    Gamma22,
    /// Assumed display gamma 2.8
    Gamma28,
    /// SMPTE 170M
    Smpte170m,
    /// SMPTE 240M
    Smpte240m,
    /// Linear transfer characteristics
    Linear,
    /// Logarithmic, 100:1 range
    Log100,
    /// Logarithmic, 316.2:1 range
    Log316,
    /// Perceptual quantizer (HDR)
    Pq,
    /// Hybrid log-gamma (HDR)
    Hlg,
    /// Reserved value
    Reserved,
}

impl From<u8> for TransferCharacteristics {
    fn from(value: u8) -> Self {
        match value {
            1 => TransferCharacteristics::Bt709,
            2 => TransferCharacteristics::Unspecified,
            4 => TransferCharacteristics::Gamma22,
            5 => TransferCharacteristics::Gamma28,
            6 => TransferCharacteristics::Smpte170m,
            7 => TransferCharacteristics::Smpte240m,
            8 => TransferCharacteristics::Linear,
            9 => TransferCharacteristics::Log100,
            10 => TransferCharacteristics::Log316,
            11 => TransferCharacteristics::Pq,
            14 => TransferCharacteristics::Hlg,
            _ => TransferCharacteristics::Reserved,
        }
    }
}

impl TransferCharacteristics {
    /// Interprets a coded value: 0 is forbidden (absent), values above
    /// `max_valid` are reserved
    #[must_use]
    pub fn from_coded(value: u8, max_valid: u8) -> Option<Self> {
        match value {
            0 => None,
            v if v > max_valid => Some(TransferCharacteristics::Reserved),
            v => Some(TransferCharacteristics::from(v)),
        }
    }
}

/// Matrix coefficients as coded by the AVS video standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixCoefficients {
    /// ITU-R BT.709
    Bt709,
    /// Unspecified video
    Unspecified,
    /// US FCC
    Fcc,
    /// ITU-R BT.470-2 System B, G
    Bt470Bg,
    /// SMPTE 170M
    Smpte170m,
    /// SMPTE 240M
    Smpte240m,
    /// ITU-R BT.2020 non-constant luminance
    Bt2020Ncl,
    /// ITU-R BT.2020 constant luminance
    Bt2020Cl,
    /// Reserved value
    Reserved,
}

impl From<u8> for MatrixCoefficients {
    fn from(value: u8) -> Self {
        match value {
            1 => MatrixCoefficients::Bt709,
            2 => MatrixCoefficients::Unspecified,
            4 => MatrixCoefficients::Fcc,
            5 => MatrixCoefficients::Bt470Bg,
            6 => MatrixCoefficients::Smpte170m,
            7 => MatrixCoefficients::Smpte240m,
            8 => MatrixCoefficients::Bt2020Ncl,
            9 => MatrixCoefficients::Bt2020Cl,
            _ => MatrixCoefficients::Reserved,
        }
    }
}

impl MatrixCoefficients {
    /// Interprets a coded value: 0 is forbidden (absent), values above
    /// `max_valid` are reserved
    #[must_use]
    pub fn from_coded(value: u8, max_valid: u8) -> Option<Self> {
        match value {
            0 => None,
            v if v > max_valid => Some(MatrixCoefficients::Reserved),
            v => Some(MatrixCoefficients::from(v)),
        }
    }
}

/// A combined description for the common primaries/transfer/matrix triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorDescription {
    /// ITU-R BT.709
    Bt709,
    /// ITU-R BT.601 (SMPTE 170M across all three fields)
    Bt601,
    /// SMPTE 240M
    Smpte240m,
}

/// Derives a combined colour description from the coded triple
///
/// The broadcast-typical `(1, 6, 1)` triple is reported as BT.709. Otherwise
/// a description is only reported when all three coded values agree and the
/// common value has a named triple.
#[must_use]
pub fn combined_color_description(
    primaries: u8,
    transfer: u8,
    matrix: u8,
) -> Option<ColorDescription> {
    if (primaries, transfer, matrix) == (1, 6, 1) {
        return Some(ColorDescription::Bt709);
    }

    if primaries == transfer && transfer == matrix {
        return match primaries {
            1 => Some(ColorDescription::Bt709),
            6 => Some(ColorDescription::Bt601),
            7 => Some(ColorDescription::Smpte240m),
            _ => None,
        };
    }

    None
}
