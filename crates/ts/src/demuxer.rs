use std::collections::{BTreeMap, HashMap, HashSet};

use avs_types::{AvsInfo, CodecKind};
use tracing::{debug, trace};

use crate::descriptors::{AvsAudioDescriptor, AvsVideoDescriptor, parse_es_descriptors};
use crate::detect::{PacketSize, SyncInfo, probe_packet_size};
use crate::packet::{PID_NULL, PID_PAT, TS_PACKET_LEN, TsPacket};
use crate::pat::Pat;
use crate::pes::{PesState, strip_pes_header};
use crate::pmt::{Pmt, StreamType};

/// Bytes needed before the packet-size probe is attempted mid-stream;
/// covers the 20-packet verification window for both hypotheses.
const PROBE_BYTES: usize = 192 * 21;

/// Default packet budget of the fast-scan mode
const DEFAULT_PACKET_BUDGET: usize = 20_000;

/// One elementary stream of a program
#[derive(Debug)]
pub struct StreamInfo {
    /// Elementary PID
    pub pid: u16,
    /// Raw stream type byte from the PMT
    pub stream_type_byte: u8,
    /// Interpreted stream type
    pub stream_type: StreamType,
    /// AVS codec family member, when the stream type announces one
    pub codec_kind: Option<CodecKind>,
    /// ISO 639 language code from the descriptor loop
    pub language: Option<String>,
    /// Registration descriptor fourCC
    pub registration: Option<String>,
    /// Maximum bitrate descriptor, in bits per second
    pub maximum_bitrate_bps: Option<u64>,
    /// Typed AVS video descriptor, when present
    pub video_descriptor: Option<AvsVideoDescriptor>,
    /// Typed AVS audio descriptor, when present
    pub audio_descriptor: Option<AvsAudioDescriptor>,
    /// In-band sequence information decoded from the elementary stream
    pub info: Option<AvsInfo>,
}

/// One program from the PAT with its PMT contents
#[derive(Debug)]
pub struct Program {
    /// Program number from the PAT
    pub program_number: u16,
    /// PID carrying this program's PMT
    pub pmt_pid: u16,
    /// PCR PID, 0 until the PMT is parsed
    pub pcr_pid: u16,
    /// Elementary streams in PMT order
    pub streams: Vec<StreamInfo>,
}

/// Result of a demultiplexer run
#[derive(Debug)]
pub struct TsReport {
    /// Detected packet framing, absent when no sync byte was ever found
    pub packet_size: Option<PacketSize>,
    /// Whether the framing actually verified over the probe window
    pub confident: bool,
    /// Number of transport packets parsed
    pub packets_parsed: usize,
    /// Programs in program-number order
    pub programs: Vec<Program>,
}

impl TsReport {
    /// Whether any AVS stream was found (by stream type)
    #[must_use]
    pub fn has_avs_streams(&self) -> bool {
        self.programs
            .iter()
            .flat_map(|p| &p.streams)
            .any(|s| s.codec_kind.is_some())
    }
}

/// Per-PID in-band detection state, one per announced AVS stream
#[derive(Debug)]
enum Detector {
    Avs1(avs1::SequenceScanner),
    Avs2(avs2::SequenceScanner),
    Avs3(avs3::SequenceScanner),
    Av3a(Vec<u8>),
}

impl Detector {
    fn new(kind: CodecKind) -> Self {
        match kind {
            CodecKind::Avs1 => Detector::Avs1(avs1::SequenceScanner::new()),
            CodecKind::Avs2 => Detector::Avs2(avs2::SequenceScanner::new()),
            CodecKind::Avs3Video => Detector::Avs3(avs3::SequenceScanner::new()),
            CodecKind::Av3aAudio => Detector::Av3a(Vec::new()),
        }
    }

    /// Feeds reassembled ES bytes; `Some` when detection completed
    fn push(&mut self, es: &[u8]) -> Option<AvsInfo> {
        match self {
            Detector::Avs1(scanner) => scanner
                .push(es)
                .then(|| scanner.info().map(AvsInfo::Video))
                .flatten(),
            Detector::Avs2(scanner) => scanner
                .push(es)
                .then(|| scanner.info().map(AvsInfo::Video))
                .flatten(),
            Detector::Avs3(scanner) => scanner
                .push(es)
                .then(|| scanner.info().map(AvsInfo::Video))
                .flatten(),
            Detector::Av3a(buffer) => {
                buffer.extend_from_slice(es);
                av3a::parse_sequence_info(buffer).map(AvsInfo::Audio)
            }
        }
    }

    /// Best-effort result at end of input
    fn finish(self) -> Option<AvsInfo> {
        match self {
            Detector::Avs1(scanner) => scanner.finish().map(AvsInfo::Video),
            Detector::Avs2(scanner) => scanner.finish().map(AvsInfo::Video),
            Detector::Avs3(scanner) => scanner.finish().map(AvsInfo::Video),
            Detector::Av3a(buffer) => av3a::parse_sequence_info(&buffer).map(AvsInfo::Audio),
        }
    }
}

/// Push-based transport-stream demultiplexer
///
/// Append file bytes with [`push`](Self::push); tables are discovered and
/// the codec parsers driven on the fly. The scan terminates early once
/// every PMT announced by the PAT has been parsed and every announced AVS
/// stream has yielded its sequence information; subsequent pushes parse
/// zero further packets.
#[derive(Debug)]
pub struct TsDemuxer {
    buffer: Vec<u8>,
    consumed: usize,
    sync: Option<SyncInfo>,
    programs: BTreeMap<u16, Program>,
    pmt_pids: HashMap<u16, u16>,
    pat_version: Option<u8>,
    pmt_versions: HashMap<u16, u8>,
    detectors: HashMap<u16, Detector>,
    pes: HashMap<u16, PesState>,
    packets_parsed: usize,
    packet_budget: usize,
    stopped: bool,
}

impl Default for TsDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl TsDemuxer {
    /// Creates a demuxer with the default packet budget
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            consumed: 0,
            sync: None,
            programs: BTreeMap::new(),
            pmt_pids: HashMap::new(),
            pat_version: None,
            pmt_versions: HashMap::new(),
            detectors: HashMap::new(),
            pes: HashMap::new(),
            packets_parsed: 0,
            packet_budget: DEFAULT_PACKET_BUDGET,
            stopped: false,
        }
    }

    /// Overrides the fast-scan packet budget
    #[must_use]
    pub fn with_packet_budget(mut self, budget: usize) -> Self {
        self.packet_budget = budget;
        self
    }

    /// Number of transport packets parsed so far
    #[must_use]
    pub fn packets_parsed(&self) -> usize {
        self.packets_parsed
    }

    /// Whether every PMT is parsed and every AVS stream detected
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.pmt_pids.is_empty()
            && self
                .pmt_pids
                .values()
                .all(|program| self.pmt_versions.contains_key(program))
            && self.detectors.is_empty()
    }

    /// Appends stream bytes and processes whole packets
    pub fn push(&mut self, data: &[u8]) {
        if self.stopped {
            return;
        }
        self.buffer.extend_from_slice(data);
        self.ensure_sync(false);
        self.process();
        // Release consumed bytes so long inputs stay bounded.
        if self.consumed > 0 {
            self.buffer.drain(..self.consumed);
            self.consumed = 0;
        }
    }

    /// Finalizes the scan and builds the report
    #[must_use]
    pub fn finish(mut self) -> TsReport {
        if !self.stopped {
            self.ensure_sync(true);
            self.process();
        }

        // Any PES still under reassembly is finalized and detected.
        for state in self.pes.values_mut() {
            state.flush();
        }
        let pids: Vec<u16> = self.detectors.keys().copied().collect();
        for pid in pids {
            self.drive_detector(pid);
        }
        // Scanners that never reached a picture header still report what
        // they captured.
        let leftovers: Vec<(u16, Detector)> = self.detectors.drain().collect();
        for (pid, detector) in leftovers {
            if let Some(info) = detector.finish() {
                self.store_info(pid, info);
            }
        }

        TsReport {
            packet_size: self.sync.map(|s| s.packet_size),
            confident: self.sync.map(|s| s.confident).unwrap_or(false),
            packets_parsed: self.packets_parsed,
            programs: self.programs.into_values().collect(),
        }
    }

    /// One-shot convenience over a complete file buffer
    #[must_use]
    pub fn analyze(data: &[u8]) -> TsReport {
        let mut demuxer = TsDemuxer::new();
        demuxer.push(data);
        demuxer.finish()
    }

    fn ensure_sync(&mut self, flushing: bool) {
        if self.sync.is_some() {
            return;
        }
        if self.buffer.len() >= PROBE_BYTES || flushing {
            if let Some(info) = probe_packet_size(&self.buffer) {
                debug!(?info, "packet framing detected");
                self.consumed = info.start_offset;
                self.sync = Some(info);
            }
        }
    }

    fn process(&mut self) {
        let Some(sync) = self.sync else {
            return;
        };
        let step = sync.packet_size.len();
        let header = sync.packet_size.sync_offset();

        loop {
            if self.is_complete() {
                debug!(
                    packets = self.packets_parsed,
                    "all PMTs parsed and all streams detected, stopping scan"
                );
                self.stopped = true;
                return;
            }
            if self.buffer.len() - self.consumed < step {
                return;
            }

            let start = self.consumed + header;
            if self.buffer[start] != 0x47 {
                // Lost sync; slide one byte and rescan.
                self.consumed += 1;
                continue;
            }

            let packet = self.buffer[start..start + TS_PACKET_LEN].to_vec();
            self.consumed += step;
            self.packets_parsed += 1;
            self.handle_packet(&packet);

            if self.packets_parsed >= self.packet_budget
                && self.programs.values().any(|p| !p.streams.is_empty())
            {
                debug!(
                    budget = self.packet_budget,
                    "packet budget reached, stopping scan"
                );
                self.stopped = true;
                return;
            }
        }
    }

    fn handle_packet(&mut self, data: &[u8]) {
        let Ok(packet) = TsPacket::parse(data) else {
            return;
        };
        if packet.transport_error_indicator {
            return;
        }

        let pid = packet.pid;
        if pid == PID_PAT {
            if packet.payload_unit_start_indicator {
                if let Some(psi) = packet.psi_payload() {
                    if let Ok(pat) = Pat::parse(psi) {
                        self.handle_pat(&pat);
                    }
                }
            }
            return;
        }

        if let Some(&program_number) = self.pmt_pids.get(&pid) {
            if packet.payload_unit_start_indicator {
                if let Some(psi) = packet.psi_payload() {
                    self.handle_pmt(program_number, psi);
                }
            }
            return;
        }

        if pid == PID_NULL {
            return;
        }

        // PES path: collect while the PID is awaiting detection, or while
        // PMTs are still outstanding and the PID's role is unknown.
        let interested = self.detectors.contains_key(&pid) || !self.all_pmts_parsed();
        if !interested {
            return;
        }
        let Some(payload) = &packet.payload else {
            return;
        };
        self.pes
            .entry(pid)
            .or_default()
            .push(packet.payload_unit_start_indicator, payload);
        if self.detectors.contains_key(&pid) {
            self.drive_detector(pid);
        }
    }

    fn handle_pat(&mut self, pat: &Pat) {
        if self.pat_version == Some(pat.version_number) {
            // Unchanged PAT repeats carry nothing new.
            return;
        }
        let version_change = self.pat_version.is_some();
        self.pat_version = Some(pat.version_number);
        if version_change {
            debug!(
                version = pat.version_number,
                "PAT version change, resetting program map"
            );
            // Every PMT must be re-parsed against the new association.
            self.pmt_pids.clear();
            self.pmt_versions.clear();
        }

        for program in pat.real_programs() {
            self.pmt_pids.insert(program.pmt_pid, program.program_number);
            self.programs
                .entry(program.program_number)
                .and_modify(|existing| {
                    if existing.pmt_pid != program.pmt_pid {
                        debug!(
                            program = program.program_number,
                            pmt_pid = program.pmt_pid,
                            "program PMT PID reassigned"
                        );
                        existing.pmt_pid = program.pmt_pid;
                    }
                })
                .or_insert_with(|| {
                    debug!(
                        program = program.program_number,
                        pmt_pid = program.pmt_pid,
                        "program discovered"
                    );
                    Program {
                        program_number: program.program_number,
                        pmt_pid: program.pmt_pid,
                        pcr_pid: 0,
                        streams: Vec::new(),
                    }
                });
        }
    }

    fn handle_pmt(&mut self, program_number: u16, psi: &[u8]) {
        let Ok(pmt) = Pmt::parse(psi) else {
            return;
        };
        if self.pmt_versions.get(&program_number) == Some(&pmt.version_number) {
            // Same-version PMT occurrences are expected in any real stream.
            trace!(program = program_number, "duplicate PMT ignored");
            return;
        }

        // On a version bump, streams the new table drops or retypes stop
        // gating completion; their detection state is stale.
        let mut stale_pids = Vec::new();
        if let Some(program) = self.programs.get(&program_number) {
            for old in &program.streams {
                let kept = pmt.streams.iter().any(|s| {
                    s.elementary_pid == old.pid && s.stream_type_byte == old.stream_type_byte
                });
                if !kept {
                    stale_pids.push(old.pid);
                }
            }
        }
        for pid in stale_pids {
            self.detectors.remove(&pid);
            self.pes.remove(&pid);
        }

        let mut new_avs_pids = Vec::new();
        if let Some(program) = self.programs.get_mut(&program_number) {
            let old_streams = std::mem::take(&mut program.streams);
            program.pcr_pid = pmt.pcr_pid;
            for stream in &pmt.streams {
                let descriptors = parse_es_descriptors(&stream.es_info, stream.stream_type_byte);
                let codec_kind = stream.stream_type.codec_kind();
                debug!(
                    pid = stream.elementary_pid,
                    stream_type = stream.stream_type_byte,
                    name = stream.stream_type.name(),
                    "elementary stream"
                );

                // A version bump keeps what an earlier table of the same
                // shape already got decoded.
                let info = old_streams
                    .iter()
                    .find(|old| {
                        old.pid == stream.elementary_pid
                            && old.stream_type_byte == stream.stream_type_byte
                    })
                    .and_then(|old| old.info.clone());
                let already_detected = info.is_some();

                program.streams.push(StreamInfo {
                    pid: stream.elementary_pid,
                    stream_type_byte: stream.stream_type_byte,
                    stream_type: stream.stream_type,
                    codec_kind,
                    language: descriptors.language,
                    registration: descriptors
                        .registration
                        .map(|fourcc| String::from_utf8_lossy(&fourcc).into_owned()),
                    maximum_bitrate_bps: descriptors.maximum_bitrate_bps,
                    video_descriptor: descriptors.avs_video,
                    audio_descriptor: descriptors.avs_audio,
                    info,
                });

                if let Some(kind) = codec_kind {
                    if !already_detected {
                        self.detectors
                            .entry(stream.elementary_pid)
                            .or_insert_with(|| Detector::new(kind));
                        new_avs_pids.push(stream.elementary_pid);
                    }
                }
            }
        }
        self.pmt_versions.insert(program_number, pmt.version_number);

        // PES collected ahead of this PMT can now be classified.
        for pid in new_avs_pids {
            self.drive_detector(pid);
        }
        if self.all_pmts_parsed() {
            let keep: HashSet<u16> = self.detectors.keys().copied().collect();
            self.pes.retain(|pid, _| keep.contains(pid));
        }
    }

    fn all_pmts_parsed(&self) -> bool {
        !self.pmt_pids.is_empty()
            && self
                .pmt_pids
                .values()
                .all(|program| self.pmt_versions.contains_key(program))
    }

    fn drive_detector(&mut self, pid: u16) {
        let completed = match self.pes.get_mut(&pid) {
            Some(state) => state.drain_completed(),
            None => return,
        };
        if completed.is_empty() {
            return;
        }
        let Some(detector) = self.detectors.get_mut(&pid) else {
            return;
        };

        let mut detected = None;
        for pes in completed {
            if let Some(es) = strip_pes_header(&pes) {
                if let Some(info) = detector.push(es) {
                    detected = Some(info);
                    break;
                }
            }
        }

        if let Some(info) = detected {
            debug!(pid, "in-band sequence information detected");
            self.detectors.remove(&pid);
            self.pes.remove(&pid);
            self.store_info(pid, info);
        }
    }

    fn store_info(&mut self, pid: u16, info: AvsInfo) {
        for program in self.programs.values_mut() {
            if let Some(stream) = program.streams.iter_mut().find(|s| s.pid == pid) {
                stream.info = Some(info);
                return;
            }
        }
    }
}
