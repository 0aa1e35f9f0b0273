use avs_types::{ChromaFormat, CodecKind};
use bitio::BitReader;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Descriptor tags the demuxer interprets
const TAG_REGISTRATION: u8 = 0x05;
const TAG_ISO639_LANGUAGE: u8 = 0x0A;
const TAG_MAXIMUM_BITRATE: u8 = 0x0E;
const TAG_AVS1_VIDEO: u8 = 0x3F;
const TAG_AVS2_VIDEO: u8 = 0x40;
const TAG_AVS3_VIDEO: u8 = 0xD1;
const TAG_AVS3_AUDIO: u8 = 0xD2;

/// Container-side AVS video metadata from a PMT descriptor
///
/// Tag 0x3F with stream type 0x42 (AVS1), tag 0x40 with 0xD2 (AVS2), tag
/// 0xD1 with 0xD4 (AVS3). The AVS3 variant adds the temporal/TD/library
/// flags and a colour triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsVideoDescriptor {
    /// Which AVS generation the descriptor describes
    pub kind: CodecKind,
    /// Profile id, same coding as the in-band sequence header
    pub profile_id: u8,
    /// Level id
    pub level_id: u8,
    /// The stream switches frame rates
    pub multiple_frame_rate_flag: bool,
    /// 4-bit frame rate code
    pub frame_rate_code: u8,
    /// AVS still pictures may be present (AVS1/AVS2 layout only)
    pub avs_still_present: Option<bool>,
    /// Chroma subsampling; AVS3 values other than 4:2:0 are reserved
    pub chroma_format: ChromaFormat,
    /// 3-bit sample precision code
    pub sample_precision: u8,
    /// Temporal layering flag (AVS3 only)
    pub temporal_id_flag: Option<bool>,
    /// Texture+depth mode flag (AVS3 only)
    pub td_mode_flag: Option<bool>,
    /// Library stream flag (AVS3 only)
    pub library_stream_flag: Option<bool>,
    /// Library picture enable flag (AVS3 only)
    pub library_picture_enable_flag: Option<bool>,
    /// Raw colour primaries code (AVS3 only)
    pub colour_primaries: Option<u8>,
    /// Raw transfer characteristics code (AVS3 only)
    pub transfer_characteristics: Option<u8>,
    /// Raw matrix coefficients code (AVS3 only)
    pub matrix_coefficients: Option<u8>,
}

/// Container-side Audio Vivid metadata from a PMT descriptor
///
/// Tag 0xD2 with stream type 0xD5. The content branches mirror the AATF
/// frame header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsAudioDescriptor {
    /// 4-bit audio codec id
    pub audio_codec_id: u8,
    /// 4-bit sampling frequency index
    pub sampling_frequency_index: u8,
    /// Sampling frequency in Hz; explicit 24-bit value when the index is
    /// the escape, table value otherwise (0 when reserved)
    pub sampling_frequency: u32,
    /// 4-bit content type driving the branch below
    pub content_type: u8,
    /// Channel configuration index, channel-bearing content only
    pub channel_number_index: Option<u8>,
    /// Object count, object-bearing content only
    pub object_channel_number: Option<u16>,
    /// Ambisonics order, HOA content only
    pub hoa_order: Option<u8>,
    /// Total bit rate in kbit/s
    pub total_bitrate_kbps: u16,
    /// 2-bit resolution code
    pub resolution: u8,
}

/// Everything the demuxer extracted from one elementary stream's
/// descriptor loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EsDescriptors {
    /// Registration descriptor fourCC
    pub registration: Option<[u8; 4]>,
    /// First ISO 639 language code
    pub language: Option<String>,
    /// Maximum bitrate in bits per second
    pub maximum_bitrate_bps: Option<u64>,
    /// Typed AVS video descriptor
    pub avs_video: Option<AvsVideoDescriptor>,
    /// Typed AVS audio descriptor
    pub avs_audio: Option<AvsAudioDescriptor>,
    /// Recognized but not decoded descriptors: `(tag, name)`
    pub known: Vec<(u8, &'static str)>,
}

/// Parses an elementary stream's descriptor loop
///
/// `stream_type` disambiguates the AVS descriptor tags (0x40 and 0xD1/0xD2
/// collide with other standards' assignments). Unknown tags are skipped.
#[must_use]
pub fn parse_es_descriptors(es_info: &[u8], stream_type: u8) -> EsDescriptors {
    let mut out = EsDescriptors::default();

    let mut offset = 0;
    while offset + 2 <= es_info.len() {
        let tag = es_info[offset];
        let length = es_info[offset + 1] as usize;
        offset += 2;
        if offset + length > es_info.len() {
            break;
        }
        let body = &es_info[offset..offset + length];
        offset += length;

        match (tag, stream_type) {
            (TAG_REGISTRATION, _) => {
                if body.len() >= 4 {
                    out.registration = Some([body[0], body[1], body[2], body[3]]);
                }
            }
            (TAG_ISO639_LANGUAGE, _) => {
                if body.len() >= 3 {
                    out.language = Some(
                        body[..3]
                            .iter()
                            .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
                            .collect(),
                    );
                }
            }
            (TAG_MAXIMUM_BITRATE, _) => {
                if body.len() >= 3 {
                    let value =
                        ((body[0] as u64 & 0x03) << 16) | ((body[1] as u64) << 8) | body[2] as u64;
                    out.maximum_bitrate_bps = Some(value * 400);
                }
            }
            (TAG_AVS1_VIDEO, 0x42) => {
                out.avs_video = parse_avs12_video_descriptor(body, CodecKind::Avs1);
            }
            (TAG_AVS2_VIDEO, 0xD2) => {
                out.avs_video = parse_avs12_video_descriptor(body, CodecKind::Avs2);
            }
            (TAG_AVS3_VIDEO, 0xD4) => {
                out.avs_video = parse_avs3_video_descriptor(body);
            }
            (TAG_AVS3_AUDIO, 0xD5) => {
                out.avs_audio = parse_avs3_audio_descriptor(body);
            }
            _ => {
                if let Some(name) = descriptor_name(tag) {
                    out.known.push((tag, name));
                } else {
                    trace!(tag, length, "skipping unknown descriptor");
                }
            }
        }
    }

    out
}

/// AVS1/AVS2 video descriptor body:
/// profile_id(8) level_id(8) multiple_frame_rate(1) frame_rate_code(4)
/// AVS_still_present(1) chroma_format(2) sample_precision(3) reserved(5)
fn parse_avs12_video_descriptor(body: &[u8], kind: CodecKind) -> Option<AvsVideoDescriptor> {
    let mut r = BitReader::new(body);
    let profile_id = r.read_bits(8).ok()? as u8;
    let level_id = r.read_bits(8).ok()? as u8;
    let multiple_frame_rate_flag = r.read_bool().ok()?;
    let frame_rate_code = r.read_bits(4).ok()? as u8;
    let avs_still_present = r.read_bool().ok()?;
    let chroma_format = ChromaFormat::from(r.read_bits(2).ok()? as u8);
    let sample_precision = r.read_bits(3).ok()? as u8;

    Some(AvsVideoDescriptor {
        kind,
        profile_id,
        level_id,
        multiple_frame_rate_flag,
        frame_rate_code,
        avs_still_present: Some(avs_still_present),
        chroma_format,
        sample_precision,
        temporal_id_flag: None,
        td_mode_flag: None,
        library_stream_flag: None,
        library_picture_enable_flag: None,
        colour_primaries: None,
        transfer_characteristics: None,
        matrix_coefficients: None,
    })
}

/// AVS3 video descriptor body:
/// profile_id(8) level_id(8) multiple_frame_rate(1) frame_rate_code(4)
/// sample_precision(3) chroma_format(2) temporal_id(1) td_mode(1)
/// library_stream(1) library_picture_enable(1) reserved(2)
/// colour_primaries(8) transfer_characteristics(8) matrix_coefficients(8)
fn parse_avs3_video_descriptor(body: &[u8]) -> Option<AvsVideoDescriptor> {
    let mut r = BitReader::new(body);
    let profile_id = r.read_bits(8).ok()? as u8;
    let level_id = r.read_bits(8).ok()? as u8;
    let multiple_frame_rate_flag = r.read_bool().ok()?;
    let frame_rate_code = r.read_bits(4).ok()? as u8;
    let sample_precision = r.read_bits(3).ok()? as u8;
    let chroma_code = r.read_bits(2).ok()? as u8;
    // AVS3 transport only defines 4:2:0; anything else is reserved.
    let chroma_format = if chroma_code == 1 {
        ChromaFormat::Yuv420
    } else {
        ChromaFormat::Reserved
    };
    let temporal_id_flag = r.read_bool().ok()?;
    let td_mode_flag = r.read_bool().ok()?;
    let library_stream_flag = r.read_bool().ok()?;
    let library_picture_enable_flag = r.read_bool().ok()?;
    r.skip_bits(2);
    let colour_primaries = r.read_bits(8).ok()? as u8;
    let transfer_characteristics = r.read_bits(8).ok()? as u8;
    let matrix_coefficients = r.read_bits(8).ok()? as u8;

    Some(AvsVideoDescriptor {
        kind: CodecKind::Avs3Video,
        profile_id,
        level_id,
        multiple_frame_rate_flag,
        frame_rate_code,
        avs_still_present: None,
        chroma_format,
        sample_precision,
        temporal_id_flag: Some(temporal_id_flag),
        td_mode_flag: Some(td_mode_flag),
        library_stream_flag: Some(library_stream_flag),
        library_picture_enable_flag: Some(library_picture_enable_flag),
        colour_primaries: Some(colour_primaries),
        transfer_characteristics: Some(transfer_characteristics),
        matrix_coefficients: Some(matrix_coefficients),
    })
}

/// AVS3 audio descriptor body:
/// audio_codec_id(4) sampling_frequency_index(4)
/// [sampling_frequency(24) when the index is 0xF]
/// content_type(4) then one branch:
///   0 channels: channel_number_index(7) reserved(1)
///   1 objects: object_channel_number(7) reserved(1)
///   2 both: channel_number_index(7) object_channel_number(7) reserved(2)
///   3 HOA: hoa_order(4)
/// total_bitrate(16) resolution(2) reserved(6)
fn parse_avs3_audio_descriptor(body: &[u8]) -> Option<AvsAudioDescriptor> {
    let mut r = BitReader::new(body);
    let audio_codec_id = r.read_bits(4).ok()? as u8;
    let sampling_frequency_index = r.read_bits(4).ok()? as u8;
    let sampling_frequency = if sampling_frequency_index == 0xF {
        r.read_bits(24).ok()?
    } else {
        av3a::sampling_frequency(sampling_frequency_index).unwrap_or(0)
    };

    let content_type = r.read_bits(4).ok()? as u8;
    let mut channel_number_index = None;
    let mut object_channel_number = None;
    let mut hoa_order = None;
    match content_type {
        0 => {
            channel_number_index = Some(r.read_bits(7).ok()? as u8);
            r.skip_bits(1);
        }
        1 => {
            object_channel_number = Some(r.read_bits(7).ok()? as u16 + 1);
            r.skip_bits(1);
        }
        2 => {
            channel_number_index = Some(r.read_bits(7).ok()? as u8);
            object_channel_number = Some(r.read_bits(7).ok()? as u16 + 1);
            r.skip_bits(2);
        }
        3 => {
            hoa_order = Some(r.read_bits(4).ok()? as u8);
        }
        _ => return None,
    }

    let total_bitrate_kbps = r.read_bits(16).ok()? as u16;
    let resolution = r.read_bits(2).ok()? as u8;

    Some(AvsAudioDescriptor {
        audio_codec_id,
        sampling_frequency_index,
        sampling_frequency,
        content_type,
        channel_number_index,
        object_channel_number,
        hoa_order,
        total_bitrate_kbps,
        resolution,
    })
}

/// Well-known descriptor tags surfaced by name only
#[must_use]
pub fn descriptor_name(tag: u8) -> Option<&'static str> {
    match tag {
        0x02 => Some("video stream descriptor"),
        0x03 => Some("audio stream descriptor"),
        0x28 => Some("AVC video descriptor"),
        0x2B => Some("MPEG-2 AAC audio descriptor"),
        0x38 => Some("HEVC video descriptor"),
        0x56 => Some("teletext descriptor"),
        0x59 => Some("DVB subtitling descriptor"),
        0x6A => Some("AC-3 descriptor"),
        0x7A => Some("E-AC-3 descriptor"),
        0x7B => Some("DTS descriptor"),
        0x7C => Some("AAC descriptor"),
        0x81 => Some("ATSC AC-3 audio descriptor"),
        0x86 => Some("caption service descriptor"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut d = vec![tag, body.len() as u8];
        d.extend_from_slice(body);
        d
    }

    #[test]
    fn registration_and_language() {
        let mut es_info = descriptor(0x05, b"AVS3");
        es_info.extend_from_slice(&descriptor(0x0A, &[b'c', b'h', b'i', 0x00]));

        let parsed = parse_es_descriptors(&es_info, 0xD4);
        assert_eq!(parsed.registration, Some(*b"AVS3"));
        assert_eq!(parsed.language.as_deref(), Some("chi"));
    }

    #[test]
    fn maximum_bitrate_scales_by_400() {
        let es_info = descriptor(0x0E, &[0xC0 | 0x01, 0x00, 0x00]);
        let parsed = parse_es_descriptors(&es_info, 0x42);
        assert_eq!(parsed.maximum_bitrate_bps, Some((1 << 16) * 400));
    }

    #[test]
    fn avs1_video_descriptor() {
        // profile 0x48, level 0x20, mfr=0 frc=3 still=0 chroma=1 prec=1
        let body = [0x48, 0x20, 0b0_0011_0_01, 0b001_00000];
        let es_info = descriptor(0x3F, &body);

        let parsed = parse_es_descriptors(&es_info, 0x42);
        let video = parsed.avs_video.expect("avs video descriptor");
        assert_eq!(video.kind, CodecKind::Avs1);
        assert_eq!(video.profile_id, 0x48);
        assert_eq!(video.level_id, 0x20);
        assert_eq!(video.frame_rate_code, 3);
        assert_eq!(video.avs_still_present, Some(false));
        assert_eq!(video.chroma_format, ChromaFormat::Yuv420);
        assert_eq!(video.sample_precision, 1);
        assert_eq!(video.colour_primaries, None);
    }

    #[test]
    fn avs1_tag_needs_avs1_stream_type() {
        let body = [0x48, 0x20, 0b0_0011_0_01, 0b001_00000];
        let es_info = descriptor(0x3F, &body);
        let parsed = parse_es_descriptors(&es_info, 0x1B);
        assert!(parsed.avs_video.is_none());
    }

    #[test]
    fn avs3_video_descriptor() {
        let mut bits = bitio::BitWriter::new();
        bits.write_bits(0x20, 8);
        bits.write_bits(0x22, 8);
        bits.write_bit(false); // multiple_frame_rate
        bits.write_bits(3, 4); // frame_rate_code
        bits.write_bits(1, 3); // sample_precision
        bits.write_bits(1, 2); // chroma 4:2:0
        bits.write_bit(true); // temporal_id
        bits.write_bit(false); // td_mode
        bits.write_bit(false); // library_stream
        bits.write_bit(false); // library_picture_enable
        bits.write_bits(0, 2); // reserved
        bits.write_bits(9, 8); // primaries
        bits.write_bits(11, 8); // transfer
        bits.write_bits(8, 8); // matrix
        let es_info = descriptor(0xD1, &bits.finish());

        let parsed = parse_es_descriptors(&es_info, 0xD4);
        let video = parsed.avs_video.expect("avs3 video descriptor");
        assert_eq!(video.kind, CodecKind::Avs3Video);
        assert_eq!(video.chroma_format, ChromaFormat::Yuv420);
        assert_eq!(video.temporal_id_flag, Some(true));
        assert_eq!(video.colour_primaries, Some(9));
        assert_eq!(video.transfer_characteristics, Some(11));
        assert_eq!(video.matrix_coefficients, Some(8));
    }

    #[test]
    fn avs3_audio_descriptor_channels() {
        let mut bits = bitio::BitWriter::new();
        bits.write_bits(2, 4); // General
        bits.write_bits(2, 4); // 48 kHz
        bits.write_bits(0, 4); // channel content
        bits.write_bits(1, 7); // Stereo
        bits.write_bit(false); // reserved
        bits.write_bits(144, 16); // total bitrate kbps
        bits.write_bits(1, 2); // 16-bit
        bits.write_bits(0, 6);
        let es_info = descriptor(0xD2, &bits.finish());

        let parsed = parse_es_descriptors(&es_info, 0xD5);
        let audio = parsed.avs_audio.expect("avs audio descriptor");
        assert_eq!(audio.audio_codec_id, 2);
        assert_eq!(audio.sampling_frequency, 48000);
        assert_eq!(audio.channel_number_index, Some(1));
        assert_eq!(audio.total_bitrate_kbps, 144);
        assert_eq!(audio.resolution, 1);
    }

    #[test]
    fn known_tags_are_named() {
        let es_info = descriptor(0x6A, &[0x00]);
        let parsed = parse_es_descriptors(&es_info, 0x81);
        assert_eq!(parsed.known, vec![(0x6A, "AC-3 descriptor")]);
    }

    #[test]
    fn unknown_tags_are_skipped() {
        let mut es_info = descriptor(0xC7, &[1, 2, 3]);
        es_info.extend_from_slice(&descriptor(0x05, b"HDMV"));
        let parsed = parse_es_descriptors(&es_info, 0x90);
        assert_eq!(parsed.registration, Some(*b"HDMV"));
        assert!(parsed.known.is_empty());
    }

    #[test]
    fn truncated_descriptor_loop_stops() {
        let es_info = [0x05, 0x08, b'A']; // claims 8 bytes, has 1
        let parsed = parse_es_descriptors(&es_info, 0x42);
        assert_eq!(parsed.registration, None);
    }
}
