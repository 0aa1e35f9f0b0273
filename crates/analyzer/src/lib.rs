//! Aggregate AVS media analysis over containers and raw elementary streams.
//!
//! Ties the container front ends together: transport streams go through the
//! [`ts`] demultiplexer, ISOBMFF files through the [`bmff`] scanner, raw
//! elementary streams straight into the codec parsers. External demuxers
//! plug in through [`SampleSource`]. The result is a flat list of
//! [`StreamReport`] records carrying container-side and in-band metadata
//! side by side.

mod report;
mod source;

pub use report::{AnalysisReport, StreamReport};
pub use source::SampleSource;

use avs_types::{AvsInfo, CodecKind};
use thiserror::Error;
use tracing::debug;

/// Container framing of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// MPEG transport stream (188- or 192-byte packets)
    Ts,
    /// ISO base media file format
    Bmff,
    /// Raw elementary stream of a known codec
    RawEs(CodecKind),
}

/// Analysis failures surfaced to the caller
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// No container structure was recognized in the input
    #[error("container format not recognized")]
    ContainerUnrecognized,

    /// The container parsed but nothing AVS was found; `observed` lists the
    /// stream types and FourCCs that were seen instead
    #[error("no recognizable AVS content (observed: {observed:?})")]
    NoAvsContent {
        /// Stream-type names / FourCCs encountered during the scan
        observed: Vec<String>,
    },
}

/// Tuning knobs for an analysis run
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Overrides the transport-stream fast-scan packet budget
    pub packet_budget: Option<usize>,
}

/// Guesses the container from the file head
#[must_use]
pub fn detect_container(data: &[u8]) -> Option<Container> {
    if bmff::is_bmff(data) {
        return Some(Container::Bmff);
    }
    // A transport stream syncs within the probe window.
    let head = &data[..data.len().min(192 * 21)];
    if memchr::memchr(0x47, head).is_some() && ts::probe_packet_size(head)?.confident {
        return Some(Container::Ts);
    }
    None
}

/// Analyzes a complete input buffer
///
/// With `container` unset, the framing is auto-detected;
/// [`AnalyzerError::ContainerUnrecognized`] is returned when neither a
/// transport stream nor an ISOBMFF signature is found.
pub fn analyze(
    data: &[u8],
    container: Option<Container>,
) -> Result<AnalysisReport, AnalyzerError> {
    analyze_with_options(data, container, Options::default())
}

/// [`analyze`] with explicit [`Options`]
pub fn analyze_with_options(
    data: &[u8],
    container: Option<Container>,
    options: Options,
) -> Result<AnalysisReport, AnalyzerError> {
    let container = container
        .or_else(|| detect_container(data))
        .ok_or(AnalyzerError::ContainerUnrecognized)?;
    debug!(?container, len = data.len(), "starting analysis");

    match container {
        Container::Ts => analyze_ts(data, options),
        Container::Bmff => analyze_bmff(data),
        Container::RawEs(kind) => analyze_raw_es(data, kind),
    }
}

fn analyze_ts(data: &[u8], options: Options) -> Result<AnalysisReport, AnalyzerError> {
    let mut demuxer = ts::TsDemuxer::new();
    if let Some(budget) = options.packet_budget {
        demuxer = demuxer.with_packet_budget(budget);
    }
    demuxer.push(data);
    let ts_report = demuxer.finish();

    let mut streams = Vec::new();
    let mut observed = Vec::new();
    for program in &ts_report.programs {
        for stream in &program.streams {
            observed.push(format!(
                "0x{:02X} ({})",
                stream.stream_type_byte,
                stream.stream_type.name()
            ));
            streams.push(StreamReport::from_ts(program, stream));
        }
    }

    let any_avs = streams.iter().any(|s| s.codec_kind.is_some() || s.info.is_some());
    if !any_avs {
        return Err(AnalyzerError::NoAvsContent { observed });
    }

    Ok(AnalysisReport {
        container: "MPEG-TS".to_string(),
        packet_size: ts_report.packet_size.map(|p| p.len() as u16),
        streams,
    })
}

fn analyze_bmff(data: &[u8]) -> Result<AnalysisReport, AnalyzerError> {
    let tracks = bmff::BmffScanner::analyze(data);

    let mut streams = Vec::new();
    let mut observed = Vec::new();
    for track in &tracks {
        observed.push(track.codec_tag_str());
        let info = match (track.codec_kind, &track.first_sample) {
            (Some(kind), Some(sample)) => parse_es_info(kind, sample),
            _ => None,
        };
        streams.push(StreamReport::from_bmff(track, info));
    }

    let any_avs = streams.iter().any(|s| s.codec_kind.is_some());
    if !any_avs {
        return Err(AnalyzerError::NoAvsContent { observed });
    }

    Ok(AnalysisReport {
        container: "ISO BMFF".to_string(),
        packet_size: None,
        streams,
    })
}

fn analyze_raw_es(data: &[u8], kind: CodecKind) -> Result<AnalysisReport, AnalyzerError> {
    let info = parse_es_info(kind, data).ok_or(AnalyzerError::NoAvsContent {
        observed: Vec::new(),
    })?;

    Ok(AnalysisReport {
        container: "Elementary stream".to_string(),
        packet_size: None,
        streams: vec![StreamReport::from_raw_es(kind, info)],
    })
}

/// Drives an external demuxer through the abstract sample interface
pub fn analyze_sample_source<S: SampleSource>(
    source: &mut S,
) -> Result<AnalysisReport, AnalyzerError> {
    let mut streams = Vec::new();
    let mut observed = Vec::new();

    while let Some((track_id, codec_tag, sample)) = source.next_sample() {
        observed.push(String::from_utf8_lossy(&codec_tag).into_owned());
        let kind = codec_kind_for_tag(codec_tag);
        let info = kind.and_then(|kind| parse_es_info(kind, &sample));
        streams.push(StreamReport::from_sample(track_id, codec_tag, kind, info));
    }

    if !streams.iter().any(|s| s.codec_kind.is_some()) {
        return Err(AnalyzerError::NoAvsContent { observed });
    }

    Ok(AnalysisReport {
        container: "External demuxer".to_string(),
        packet_size: None,
        streams,
    })
}

/// Maps an AVS sample-entry FourCC to the codec family member
#[must_use]
pub fn codec_kind_for_tag(tag: [u8; 4]) -> Option<CodecKind> {
    match &tag {
        b"avst" => Some(CodecKind::Avs2),
        b"avs3" => Some(CodecKind::Avs3Video),
        b"av3a" => Some(CodecKind::Av3aAudio),
        _ => None,
    }
}

/// Runs the matching codec parser over elementary-stream bytes
#[must_use]
pub fn parse_es_info(kind: CodecKind, es: &[u8]) -> Option<AvsInfo> {
    match kind {
        CodecKind::Avs1 => avs1::parse_sequence_info(es).map(AvsInfo::Video),
        CodecKind::Avs2 => avs2::parse_sequence_info(es).map(AvsInfo::Video),
        CodecKind::Avs3Video => avs3::parse_sequence_info(es).map(AvsInfo::Video),
        CodecKind::Av3aAudio => av3a::parse_sequence_info(es).map(AvsInfo::Audio),
    }
}
