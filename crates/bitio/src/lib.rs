//! Bit-level readers and writers for AVS-family bitstream syntax.
//!
//! AVS video sequence headers and the AATF audio frame header are specified
//! as MSB-first bit fields with mandatory marker bits and Exp-Golomb coded
//! values. [`BitReader`] covers exactly those needs: fixed-width reads,
//! marker-bit validation that fails the parse, and `ue(v)`/`se(v)` decoding.
//! [`BitWriter`] is the inverse and is primarily used to build syntax-exact
//! test vectors.
//!
//! ```rust
//! use bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_ue(4);
//! let data = writer.finish();
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_ue().unwrap(), 4);
//! ```
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

mod bit_read;
mod bit_write;
mod error;

pub use bit_read::BitReader;
pub use bit_write::BitWriter;
pub use error::BitError;

/// Result type for bit-level reads
pub type Result<T> = std::result::Result<T, BitError>;
