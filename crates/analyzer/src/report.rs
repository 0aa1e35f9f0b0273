use avs_types::{AvsInfo, CodecKind};
use serde::Serialize;
use ts::{AvsAudioDescriptor, AvsVideoDescriptor, Program, StreamInfo};

/// One discovered elementary stream or track
///
/// Container-side metadata (descriptors, language, registration) and the
/// in-band sequence information coexist; either may be absent.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    /// Program number, transport streams only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_number: Option<u16>,
    /// Elementary PID (TS) or track id (BMFF / external)
    pub pid_or_track_id: u32,
    /// Stream type byte rendered as hex (TS) or sample-entry FourCC
    pub stream_type_or_fourcc: String,
    /// Human-readable stream label
    pub type_name: String,
    /// AVS codec family member, when announced by the container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_kind: Option<CodecKind>,
    /// ISO 639 language code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Registration descriptor fourCC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_fourcc: Option<String>,
    /// Maximum bitrate descriptor, bits per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_bitrate_bps: Option<u64>,
    /// Container-side AVS video descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_descriptor: Option<AvsVideoDescriptor>,
    /// Container-side AVS audio descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_descriptor: Option<AvsAudioDescriptor>,
    /// In-band sequence information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<AvsInfo>,
}

/// The aggregate result of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Container label
    pub container: String,
    /// Transport packet size, when the input was a transport stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<u16>,
    /// Discovered streams
    pub streams: Vec<StreamReport>,
}

impl AnalysisReport {
    /// Streams that carry decoded in-band information
    pub fn detected_streams(&self) -> impl Iterator<Item = &StreamReport> {
        self.streams.iter().filter(|s| s.info.is_some())
    }
}

impl StreamReport {
    pub(crate) fn from_ts(program: &Program, stream: &StreamInfo) -> Self {
        StreamReport {
            program_number: Some(program.program_number),
            pid_or_track_id: stream.pid as u32,
            stream_type_or_fourcc: format!("0x{:02X}", stream.stream_type_byte),
            type_name: stream.stream_type.name().to_string(),
            codec_kind: stream.codec_kind,
            language: stream.language.clone(),
            registration_fourcc: stream.registration.clone(),
            maximum_bitrate_bps: stream.maximum_bitrate_bps,
            video_descriptor: stream.video_descriptor.clone(),
            audio_descriptor: stream.audio_descriptor.clone(),
            info: stream.info.clone(),
        }
    }

    pub(crate) fn from_bmff(track: &bmff::BmffTrack, info: Option<AvsInfo>) -> Self {
        StreamReport {
            program_number: None,
            pid_or_track_id: track.track_id,
            stream_type_or_fourcc: track.codec_tag_str(),
            type_name: bmff::codec_tag_label(track.codec_tag)
                .unwrap_or("Unknown")
                .to_string(),
            codec_kind: track.codec_kind,
            language: None,
            registration_fourcc: None,
            maximum_bitrate_bps: None,
            video_descriptor: None,
            audio_descriptor: None,
            info,
        }
    }

    pub(crate) fn from_raw_es(kind: CodecKind, info: AvsInfo) -> Self {
        StreamReport {
            program_number: None,
            pid_or_track_id: 0,
            stream_type_or_fourcc: "-".to_string(),
            type_name: match kind {
                CodecKind::Avs1 => "AVS Video",
                CodecKind::Avs2 => "AVS2 Video",
                CodecKind::Avs3Video => "AVS3 Video",
                CodecKind::Av3aAudio => "Audio Vivid",
            }
            .to_string(),
            codec_kind: Some(kind),
            language: None,
            registration_fourcc: None,
            maximum_bitrate_bps: None,
            video_descriptor: None,
            audio_descriptor: None,
            info: Some(info),
        }
    }

    pub(crate) fn from_sample(
        track_id: u32,
        codec_tag: [u8; 4],
        kind: Option<CodecKind>,
        info: Option<AvsInfo>,
    ) -> Self {
        StreamReport {
            program_number: None,
            pid_or_track_id: track_id,
            stream_type_or_fourcc: String::from_utf8_lossy(&codec_tag).into_owned(),
            type_name: bmff::codec_tag_label(codec_tag).unwrap_or("Unknown").to_string(),
            codec_kind: kind,
            language: None,
            registration_fourcc: None,
            maximum_bitrate_bps: None,
            video_descriptor: None,
            audio_descriptor: None,
            info,
        }
    }
}
