//! MPEG transport-stream demultiplexer for AVS elementary streams.
//!
//! Parses PAT and PMT tables on the fly, reassembles PES packets per PID,
//! and drives the AVS codec parsers over the reassembled payloads until
//! every AVS stream announced by the PMTs has yielded a sequence header.
//! Both 188-byte transport streams and 192-byte M2TS files are handled.

pub mod demuxer;
pub mod descriptors;
pub mod detect;
pub mod error;
pub mod packet;
pub mod pat;
pub mod pes;
pub mod pmt;

pub use demuxer::{Program, StreamInfo, TsDemuxer, TsReport};
pub use descriptors::{AvsAudioDescriptor, AvsVideoDescriptor, EsDescriptors};
pub use detect::{PacketSize, SyncInfo, probe_packet_size};
pub use error::TsError;
pub use packet::{PID_NULL, PID_PAT, TS_PACKET_LEN, TsPacket};
pub use pat::{Pat, PatProgram};
pub use pes::{PesState, strip_pes_header};
pub use pmt::{Pmt, PmtStream, StreamType};

/// Result type for TS parsing operations
pub type Result<T> = std::result::Result<T, TsError>;
