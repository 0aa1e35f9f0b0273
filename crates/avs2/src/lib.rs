//! AVS2 (GB/T 33475.2) sequence-level parsing.
//!
//! Decodes the sequence header (start code `0xB0`) with its reference
//! configuration sets and weight-quantization data, and the sequence display
//! extension (`0xB5`, extension id `0b0010`) including the multi-view
//! depth-range and camera-parameter records. Parsing stops at the first
//! picture header.
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or
//! [Apache-2.0](./LICENSE.Apache-2.0) license. You can choose between one of
//! them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod display_extension;
mod scanner;
mod sequence_header;

pub use display_extension::{CameraParameterSet, DepthRange, FloatField, SequenceDisplayExtension};
pub use scanner::{SequenceScanner, parse_sequence_info};
pub use sequence_header::{ReferenceConfigurationSet, SequenceHeader};

/// Result type for AVS2 parsing; all failures are bit-level
pub type Result<T> = bitio::Result<T>;

/// Main Picture profile
pub const PROFILE_MAIN_PICTURE: u8 = 0x12;
/// Main profile
pub const PROFILE_MAIN: u8 = 0x20;
/// Main-10bit profile
pub const PROFILE_MAIN10: u8 = 0x22;
/// Multi-view profile
pub const PROFILE_MULTI_VIEW: u8 = 0x26;
/// 3D profile
pub const PROFILE_3D: u8 = 0x28;
/// Scene profile
pub const PROFILE_SCENE: u8 = 0x30;
/// Scene-10bit profile
pub const PROFILE_SCENE10: u8 = 0x32;

/// Profiles carrying an `encoding_precision` field
pub(crate) const ENCODING_PRECISION_PROFILES: [u8; 3] =
    [PROFILE_MAIN_PICTURE, PROFILE_MAIN10, PROFILE_SCENE10];

/// Profiles whose display extension carries a content description
pub(crate) const STEREO_PROFILES: [u8; 2] = [PROFILE_MULTI_VIEW, PROFILE_3D];
