//! Audio Vivid / AV3A (GY/T 363, T/AI 109.3) frame-header parsing.
//!
//! Locates the 12-bit AATF syncword `0xFFF` in an elementary stream and
//! decodes the frame header: codec id, coding profile, sampling frequency,
//! channel or object configuration and the table-driven bit rate. Audio
//! payload data is never touched.
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

mod frame_header;
mod tables;

pub use frame_header::FrameHeader;
pub use tables::{
    AudioCodecId, ChannelConfig, CodingProfile, bit_rate_table, sampling_frequency,
};

use avs_types::AvsAudioInfo;
use thiserror::Error;

/// Errors that can occur while decoding an AATF frame header
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Av3aError {
    /// Bit-level failure (truncation)
    #[error(transparent)]
    Bits(#[from] bitio::BitError),

    /// The candidate offset did not hold a decodable syncword; the scan
    /// advances one byte and retries
    #[error("invalid AATF syncword")]
    InvalidSyncword,
}

/// Result type for AV3A parsing
pub type Result<T> = std::result::Result<T, Av3aError>;

/// Scans an elementary stream for the first decodable AATF frame header
///
/// Candidates are byte-aligned `0xFFF` syncwords; a candidate that fails to
/// decode advances the scan by one byte.
#[must_use]
pub fn parse_first_frame(data: &[u8]) -> Option<FrameHeader> {
    if data.len() < 2 {
        return None;
    }
    for offset in 0..data.len() - 1 {
        if data[offset] == 0xFF && data[offset + 1] & 0xF0 == 0xF0 {
            match FrameHeader::parse_at(data, offset) {
                Ok(header) => return Some(header),
                Err(_) => continue,
            }
        }
    }
    None
}

/// Scans an elementary stream and builds the semantic audio record
#[must_use]
pub fn parse_sequence_info(data: &[u8]) -> Option<AvsAudioInfo> {
    parse_first_frame(data).map(|header| header.info())
}
