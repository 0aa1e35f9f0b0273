use avs_types::CodecKind;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use tracing::{debug, trace};

use crate::box_utils::box_at;
use crate::sample_table::SampleTable;

/// Container box FourCCs the walker descends into
const CONTAINER_BOXES: &[[u8; 4]] = &[*b"moov", *b"mdia", *b"minf", *b"stbl"];

/// Track handler category, after FourCC correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackHandler {
    /// Video track
    Video,
    /// Audio track
    Audio,
    /// Anything else (hint, meta, ...)
    Other([u8; 4]),
}

/// One enumerated track
#[derive(Debug, Clone)]
pub struct BmffTrack {
    /// Track id from `tkhd`
    pub track_id: u32,
    /// Sample-entry FourCC from `stsd`
    pub codec_tag: [u8; 4],
    /// Handler category; AVS FourCCs override what the container claims
    pub handler: TrackHandler,
    /// AVS codec family member announced by the FourCC, if any
    pub codec_kind: Option<CodecKind>,
    /// First compressed sample of the track (the first sync sample when an
    /// `stss` table exists, sample 1 otherwise)
    pub first_sample: Option<Bytes>,
}

impl BmffTrack {
    /// The FourCC as printable text
    #[must_use]
    pub fn codec_tag_str(&self) -> String {
        self.codec_tag
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '?'
                }
            })
            .collect()
    }
}

/// Maps an AVS sample-entry FourCC to its codec family member
fn codec_kind_for_tag(tag: [u8; 4]) -> Option<CodecKind> {
    match &tag {
        b"avst" => Some(CodecKind::Avs2),
        b"avs3" => Some(CodecKind::Avs3Video),
        b"av3a" => Some(CodecKind::Av3aAudio),
        _ => None,
    }
}

/// Generic labels for common non-AVS sample entries
#[must_use]
pub fn codec_tag_label(tag: [u8; 4]) -> Option<&'static str> {
    match &tag {
        b"avst" => Some("AVS2 Video"),
        b"avs3" => Some("AVS3 Video"),
        b"av3a" => Some("Audio Vivid"),
        b"avc1" | b"avc3" => Some("H.264 / AVC"),
        b"hvc1" | b"hev1" => Some("H.265 / HEVC"),
        b"vvc1" | b"vvi1" => Some("H.266 / VVC"),
        b"av01" => Some("AV1"),
        b"vp09" => Some("VP9"),
        b"mp4a" => Some("AAC"),
        b"ac-3" => Some("AC-3"),
        b"ec-3" => Some("E-AC-3"),
        b"dtsc" | b"dtsh" | b"dtsl" => Some("DTS"),
        b"Opus" => Some("Opus"),
        b"fLaC" => Some("FLAC"),
        _ => None,
    }
}

/// Quick signature check: does this look like an ISOBMFF file?
#[must_use]
pub fn is_bmff(data: &[u8]) -> bool {
    data.len() >= 8 && matches!(&data[4..8], b"ftyp" | b"styp" | b"moov" | b"moof")
}

/// Incremental ISO BMFF scanner
///
/// Append file bytes with [`push`](Self::push), then [`finish`](Self::finish)
/// to walk the tree and extract the first sample of every AVS track.
#[derive(Debug, Default)]
pub struct BmffScanner {
    data: Vec<u8>,
}

impl BmffScanner {
    /// Creates an empty scanner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends file bytes
    pub fn push(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Walks the box tree and yields the enumerated tracks
    #[must_use]
    pub fn finish(self) -> Vec<BmffTrack> {
        let data = Bytes::from(self.data);
        scan(&data)
    }

    /// One-shot convenience over a complete file buffer
    #[must_use]
    pub fn analyze(data: &[u8]) -> Vec<BmffTrack> {
        let mut scanner = Self::new();
        scanner.push(data);
        scanner.finish()
    }
}

fn scan(data: &Bytes) -> Vec<BmffTrack> {
    let mut tracks = Vec::new();

    // Walk the top level for the moov box; trak boxes are its direct
    // children.
    let mut offset = 0;
    while let Some(parsed) = box_at(data, offset, data.len()) {
        if parsed.fourcc == *b"moov" {
            let mut child = parsed.body_start;
            while let Some(sub) = box_at(data, child, parsed.body_end) {
                if sub.fourcc == *b"trak" {
                    if let Some(track) = parse_trak(data, sub.body_start, sub.body_end) {
                        tracks.push(track);
                    }
                }
                child = sub.end;
            }
        }
        offset = parsed.end;
    }

    tracks
}

/// State collected while descending one trak subtree
#[derive(Debug, Default)]
struct TrakState {
    track_id: u32,
    handler: Option<[u8; 4]>,
    codec_tag: Option<[u8; 4]>,
    table: SampleTable,
}

fn parse_trak(data: &Bytes, start: usize, end: usize) -> Option<BmffTrack> {
    let mut state = TrakState::default();
    walk_trak(data, start, end, &mut state);

    let codec_tag = state.codec_tag?;
    let codec_kind = codec_kind_for_tag(codec_tag);

    // The FourCC decides the medium for AVS tracks, whatever the container
    // handler says.
    let handler = match codec_kind {
        Some(CodecKind::Av3aAudio) => TrackHandler::Audio,
        Some(_) => TrackHandler::Video,
        None => match state.handler {
            Some(h) if h == *b"vide" => TrackHandler::Video,
            Some(h) if h == *b"soun" => TrackHandler::Audio,
            Some(other) => TrackHandler::Other(other),
            None => TrackHandler::Other(*b"    "),
        },
    };

    let first_sample = if codec_kind.is_some() {
        extract_first_sample(data, &state.table)
    } else {
        None
    };

    debug!(
        track_id = state.track_id,
        tag = %String::from_utf8_lossy(&codec_tag),
        sample = first_sample.as_ref().map(Bytes::len),
        "track enumerated"
    );

    Some(BmffTrack {
        track_id: state.track_id,
        codec_tag,
        handler,
        codec_kind,
        first_sample,
    })
}

fn walk_trak(data: &Bytes, start: usize, end: usize, state: &mut TrakState) {
    let mut offset = start;
    while let Some(parsed) = box_at(data, offset, end) {
        let body = &data[parsed.body_start..parsed.body_end];
        if CONTAINER_BOXES.contains(&parsed.fourcc) {
            walk_trak(data, parsed.body_start, parsed.body_end, state);
        } else {
            match &parsed.fourcc {
                b"tkhd" => state.track_id = parse_tkhd_track_id(body).unwrap_or(0),
                b"hdlr" => {
                    if body.len() >= 12 {
                        state.handler = Some([body[8], body[9], body[10], body[11]]);
                    }
                }
                b"stsd" => state.codec_tag = parse_stsd_first_entry(data, &parsed),
                b"stsz" => state.table.parse_stsz(body),
                b"stsc" => state.table.parse_stsc(body),
                b"stco" => state.table.parse_chunk_offsets(body, false),
                b"co64" => state.table.parse_chunk_offsets(body, true),
                b"stss" => state.table.parse_stss(body),
                _ => trace!(tag = %String::from_utf8_lossy(&parsed.fourcc), "box skipped"),
            }
        }
        offset = parsed.end;
    }
}

/// `tkhd` is a FullBox; the track id sits after the two timestamps, whose
/// width depends on the version.
fn parse_tkhd_track_id(body: &[u8]) -> Option<u32> {
    let version = *body.first()?;
    let offset = if version == 1 { 4 + 8 + 8 } else { 4 + 4 + 4 };
    if body.len() < offset + 4 {
        return None;
    }
    Some(BigEndian::read_u32(&body[offset..]))
}

/// `stsd` is a FullBox holding sample entries; only the first entry's
/// FourCC matters here.
fn parse_stsd_first_entry(data: &Bytes, stsd: &crate::box_utils::BoxHeader) -> Option<[u8; 4]> {
    let body_start = stsd.body_start + 8; // version/flags + entry_count
    if body_start >= stsd.body_end {
        return None;
    }
    let entry = box_at(data, body_start, stsd.body_end)?;
    Some(entry.fourcc)
}

fn extract_first_sample(data: &Bytes, table: &SampleTable) -> Option<Bytes> {
    let number = table.first_sample_number();
    let offset = usize::try_from(table.sample_offset(number)?).ok()?;
    let size = usize::try_from(table.sample_size(number)?).ok()?;
    if offset + size > data.len() {
        return None;
    }
    Some(data.slice(offset..offset + size))
}
