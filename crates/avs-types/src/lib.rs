//! Shared vocabulary for the AVS-family codec parsers.
//!
//! The AVS1/AVS2/AVS3 video standards and Audio Vivid reuse a common set of
//! numeric tables (frame rates, aspect ratios, weight-quantization matrices)
//! and signal-description enums (chroma format, colour description, frame
//! packing). This crate holds those as process-wide constants together with
//! the semantic records the parsers produce.
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or
//! [Apache-2.0](./LICENSE.Apache-2.0) license. You can choose between one of
//! them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![deny(unsafe_code)]

mod color;
mod enums;
mod info;
pub mod start_code;
mod tables;

pub use color::{
    ColorDescription, ColorPrimaries, MatrixCoefficients, TransferCharacteristics,
    combined_color_description,
};
pub use enums::{
    ChromaFormat, CodecKind, HdrDynamicMetadataType, PackingMode, SampleRange, VideoFormat,
};
pub use info::{AvsAudioInfo, AvsInfo, AvsVideoInfo};
pub use tables::{
    ASPECT_RATIOS, DEFAULT_WQM_4X4, DEFAULT_WQM_8X8, FRAME_RATES, WeightQuantMatrix,
    aspect_ratio_strings, bit_depth_from_precision, frame_rate,
};
