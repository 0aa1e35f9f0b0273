//! AVS3 video (T/AI 109.2, GY/T 368) sequence-level parsing.
//!
//! Decodes the sequence header (start code `0xB0`) with its reference
//! picture list sets and tool-flag blocks, the sequence display extension
//! (`0xB5`, extension id `0b0010`) and the HDR dynamic metadata extension
//! (extension id `0b0101`). Parsing stops at the first picture header.
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
mod hdr_metadata;
mod scanner;
mod sequence_header;

pub use display_extension::SequenceDisplayExtension;
pub use hdr_metadata::HdrDynamicMetadata;
pub use scanner::{SequenceScanner, parse_sequence_info};
pub use sequence_header::{
    EnhancedToolFlags, ReferencePictureListSet, RplEntry, SequenceHeader, ToolFlags,
};

/// Result type for AVS3 parsing; all failures are bit-level
pub type Result<T> = bitio::Result<T>;

/// Main 8-bit profile
pub const PROFILE_MAIN8: u8 = 0x20;
/// Main 10-bit profile
pub const PROFILE_MAIN10: u8 = 0x22;
/// High 8-bit profile
pub const PROFILE_HIGH8: u8 = 0x30;
/// High 10-bit profile
pub const PROFILE_HIGH10: u8 = 0x32;

/// Profiles carrying an `encoding_precision` field
pub(crate) const ENCODING_PRECISION_PROFILES: [u8; 2] = [PROFILE_MAIN10, PROFILE_HIGH10];

/// Profiles carrying the enhanced tool-flag block
pub(crate) const ENHANCED_PROFILES: [u8; 2] = [PROFILE_HIGH8, PROFILE_HIGH10];
