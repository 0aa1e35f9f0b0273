//! ISO BMFF track scanning for AVS codecs.
//!
//! Walks the box tree of an MP4/ISOBMFF file, enumerates the tracks, and
//! recognizes the AVS sample-entry FourCCs (`avst` for AVS2, `avs3` for
//! AVS3 video, `av3a` for Audio Vivid). For each matching track, the first
//! compressed sample is located through the sample tables and handed back
//! for bitstream analysis.
//!
//! Bytes can be appended in chunks; the tree is parsed when the scan is
//! finished.

mod box_utils;
mod sample_table;
mod scanner;

pub use box_utils::{BoxHeader, box_at, find_first_box, read_box_header};
pub use sample_table::SampleTable;
pub use scanner::{BmffScanner, BmffTrack, TrackHandler, codec_tag_label, is_bmff};
