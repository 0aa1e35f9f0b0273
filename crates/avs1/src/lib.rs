//! AVS1 (GB/T 20090.2) and AVS+ sequence-level parsing.
//!
//! Decodes the sequence header (start code `0xB0`) and the sequence display
//! extension (`0xB5`, extension id `0b0010`) from an AVS1 elementary stream.
//! Parsing stops at the first picture header; this crate never looks at
//! coded picture data.
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

pub use display_extension::SequenceDisplayExtension;
pub use scanner::{SequenceScanner, parse_sequence_info};
pub use sequence_header::{SequenceHeader, ShenzhanFields};

/// Result type for AVS1 parsing; all failures are bit-level
pub type Result<T> = bitio::Result<T>;
