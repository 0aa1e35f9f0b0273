use avs_types::CodecKind;

use crate::{Result, TsError};

/// Stream types carried in PMT elementary-stream entries
///
/// The MPEG-2 assignments plus the AVS industry values (0x42 AVS1, 0xD2
/// AVS2, 0xD4 AVS3 video, 0xD5 Audio Vivid) and the Blu-ray range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    /// MPEG-1 Video
    Mpeg1Video,
    /// MPEG-2 Video
    Mpeg2Video,
    /// MPEG-1 Audio
    Mpeg1Audio,
    /// MPEG-2 Audio
    Mpeg2Audio,
    /// Private PES data
    PrivatePes,
    /// ADTS AAC audio
    AdtsAac,
    /// MPEG-4 Visual
    Mpeg4Visual,
    /// LATM AAC audio
    LatmAac,
    /// AVC / H.264 video
    H264,
    /// HEVC / H.265 video
    H265,
    /// AVS1 video (GB/T 20090.2)
    Avs1Video,
    /// Dirac video
    Dirac,
    /// AVS2 video (GB/T 33475.2)
    Avs2Video,
    /// AVS3 video (T/AI 109.2)
    Avs3Video,
    /// AVS3 audio / Audio Vivid (T/AI 109.3)
    Avs3Audio,
    /// Blu-ray LPCM audio
    BluRayLpcm,
    /// AC-3 audio
    Ac3,
    /// DTS audio
    Dts,
    /// Dolby TrueHD audio
    TrueHd,
    /// E-AC-3 audio
    EAc3,
    /// DTS-HD High Resolution audio
    DtsHd,
    /// DTS-HD Master Audio
    DtsHdMa,
    /// Dolby E audio
    DolbyE,
    /// Blu-ray secondary E-AC-3 audio
    EAc3Secondary,
    /// Blu-ray secondary DTS Express audio
    DtsExpress,
    /// Blu-ray presentation graphics subtitles
    PgsSubtitle,
    /// Blu-ray text subtitles
    TextSubtitle,
    /// Unknown stream type
    Unknown(u8),
}

impl From<u8> for StreamType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => StreamType::Mpeg1Video,
            0x02 => StreamType::Mpeg2Video,
            0x03 => StreamType::Mpeg1Audio,
            0x04 => StreamType::Mpeg2Audio,
            0x06 => StreamType::PrivatePes,
            0x0F => StreamType::AdtsAac,
            0x10 => StreamType::Mpeg4Visual,
            0x11 => StreamType::LatmAac,
            0x1B => StreamType::H264,
            0x24 => StreamType::H265,
            0x42 => StreamType::Avs1Video,
            0xD1 => StreamType::Dirac,
            0xD2 => StreamType::Avs2Video,
            0xD4 => StreamType::Avs3Video,
            0xD5 => StreamType::Avs3Audio,
            0x80 => StreamType::BluRayLpcm,
            0x81 => StreamType::Ac3,
            0x82 => StreamType::Dts,
            0x83 => StreamType::TrueHd,
            0x84 => StreamType::EAc3,
            0x85 => StreamType::DtsHd,
            0x86 => StreamType::DtsHdMa,
            0x87 => StreamType::DolbyE,
            0xA1 => StreamType::EAc3Secondary,
            0xA2 => StreamType::DtsExpress,
            0x90 => StreamType::PgsSubtitle,
            0x92 => StreamType::TextSubtitle,
            other => StreamType::Unknown(other),
        }
    }
}

impl StreamType {
    /// The AVS codec family member this stream type announces, if any
    pub fn codec_kind(self) -> Option<CodecKind> {
        match self {
            StreamType::Avs1Video => Some(CodecKind::Avs1),
            StreamType::Avs2Video => Some(CodecKind::Avs2),
            StreamType::Avs3Video => Some(CodecKind::Avs3Video),
            StreamType::Avs3Audio => Some(CodecKind::Av3aAudio),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            StreamType::Mpeg1Video => "MPEG-1 Video",
            StreamType::Mpeg2Video => "MPEG-2 Video",
            StreamType::Mpeg1Audio => "MPEG-1 Audio",
            StreamType::Mpeg2Audio => "MPEG-2 Audio",
            StreamType::PrivatePes => "Private PES data",
            StreamType::AdtsAac => "AAC (ADTS)",
            StreamType::Mpeg4Visual => "MPEG-4 Visual",
            StreamType::LatmAac => "AAC (LATM)",
            StreamType::H264 => "H.264 / AVC",
            StreamType::H265 => "H.265 / HEVC",
            StreamType::Avs1Video => "AVS Video",
            StreamType::Dirac => "Dirac Video",
            StreamType::Avs2Video => "AVS2 Video",
            StreamType::Avs3Video => "AVS3 Video",
            StreamType::Avs3Audio => "Audio Vivid",
            StreamType::BluRayLpcm => "LPCM Audio",
            StreamType::Ac3 => "AC-3 Audio",
            StreamType::Dts => "DTS Audio",
            StreamType::TrueHd => "Dolby TrueHD Audio",
            StreamType::EAc3 => "E-AC-3 Audio",
            StreamType::DtsHd => "DTS-HD High Resolution Audio",
            StreamType::DtsHdMa => "DTS-HD Master Audio",
            StreamType::DolbyE => "Dolby E Audio",
            StreamType::EAc3Secondary => "E-AC-3 Audio (secondary)",
            StreamType::DtsExpress => "DTS Express Audio (secondary)",
            StreamType::PgsSubtitle => "Presentation Graphics Subtitles",
            StreamType::TextSubtitle => "Text Subtitles",
            StreamType::Unknown(_) => "Unknown",
        }
    }

    /// Check if this stream type is video
    pub fn is_video(self) -> bool {
        matches!(
            self,
            StreamType::Mpeg1Video
                | StreamType::Mpeg2Video
                | StreamType::Mpeg4Visual
                | StreamType::H264
                | StreamType::H265
                | StreamType::Avs1Video
                | StreamType::Dirac
                | StreamType::Avs2Video
                | StreamType::Avs3Video
        )
    }

    /// Check if this stream type is audio
    pub fn is_audio(self) -> bool {
        matches!(
            self,
            StreamType::Mpeg1Audio
                | StreamType::Mpeg2Audio
                | StreamType::AdtsAac
                | StreamType::LatmAac
                | StreamType::Avs3Audio
                | StreamType::BluRayLpcm
                | StreamType::Ac3
                | StreamType::Dts
                | StreamType::TrueHd
                | StreamType::EAc3
                | StreamType::DtsHd
                | StreamType::DtsHdMa
                | StreamType::DolbyE
                | StreamType::EAc3Secondary
                | StreamType::DtsExpress
        )
    }
}

/// Program Map Table (PMT) - Table ID 0x02
#[derive(Debug, Clone)]
pub struct Pmt {
    /// Program number
    pub program_number: u16,
    /// Version number
    pub version_number: u8,
    /// Current/next indicator
    pub current_next_indicator: bool,
    /// PCR PID
    pub pcr_pid: u16,
    /// Program-level descriptor bytes
    pub program_info: Vec<u8>,
    /// Elementary streams
    pub streams: Vec<PmtStream>,
}

/// Elementary stream entry in PMT
#[derive(Debug, Clone)]
pub struct PmtStream {
    /// Raw stream type byte
    pub stream_type_byte: u8,
    /// Interpreted stream type
    pub stream_type: StreamType,
    /// Elementary PID
    pub elementary_pid: u16,
    /// ES info descriptor bytes
    pub es_info: Vec<u8>,
}

impl Pmt {
    /// Parse PMT from PSI section data
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 12 {
            return Err(TsError::InsufficientData {
                expected: 12,
                actual: data.len(),
            });
        }

        let table_id = data[0];
        if table_id != 0x02 {
            return Err(TsError::InvalidTableId {
                expected: 0x02,
                actual: table_id,
            });
        }

        let section_syntax_indicator = (data[1] & 0x80) != 0;
        if !section_syntax_indicator {
            return Err(TsError::ParseError(
                "PMT must have section syntax indicator set".to_string(),
            ));
        }

        let section_length = ((data[1] as u16 & 0x0F) << 8) | data[2] as u16;
        if section_length < 9 {
            return Err(TsError::InvalidSectionLength(section_length));
        }
        if data.len() < 3 + section_length as usize {
            return Err(TsError::InsufficientData {
                expected: 3 + section_length as usize,
                actual: data.len(),
            });
        }

        let program_number = ((data[3] as u16) << 8) | data[4] as u16;
        let version_number = (data[5] >> 1) & 0x1F;
        let current_next_indicator = (data[5] & 0x01) != 0;
        let pcr_pid = ((data[8] as u16 & 0x1F) << 8) | data[9] as u16;

        let program_info_length = ((data[10] as u16 & 0x0F) << 8) | data[11] as u16;
        let mut offset = 12;

        let program_info = if program_info_length > 0 {
            if offset + program_info_length as usize > data.len() {
                return Err(TsError::InsufficientData {
                    expected: offset + program_info_length as usize,
                    actual: data.len(),
                });
            }
            let info = data[offset..offset + program_info_length as usize].to_vec();
            offset += program_info_length as usize;
            info
        } else {
            Vec::new()
        };

        let mut streams = Vec::new();
        let streams_end = 3 + section_length as usize - 4; // Exclude CRC32

        while offset + 5 <= streams_end {
            let stream_type_byte = data[offset];
            let elementary_pid = ((data[offset + 1] as u16 & 0x1F) << 8) | data[offset + 2] as u16;
            let es_info_length = ((data[offset + 3] as u16 & 0x0F) << 8) | data[offset + 4] as u16;
            offset += 5;

            let es_info = if es_info_length > 0 {
                if offset + es_info_length as usize > streams_end {
                    return Err(TsError::InsufficientData {
                        expected: offset + es_info_length as usize,
                        actual: streams_end,
                    });
                }
                let info = data[offset..offset + es_info_length as usize].to_vec();
                offset += es_info_length as usize;
                info
            } else {
                Vec::new()
            };

            streams.push(PmtStream {
                stream_type_byte,
                stream_type: StreamType::from(stream_type_byte),
                elementary_pid,
                es_info,
            });
        }

        Ok(Pmt {
            program_number,
            version_number,
            current_next_indicator,
            pcr_pid,
            program_info,
            streams,
        })
    }

    /// Elementary streams announcing an AVS codec
    pub fn avs_streams(&self) -> impl Iterator<Item = &PmtStream> {
        self.streams
            .iter()
            .filter(|s| s.stream_type.codec_kind().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avs_stream_types() {
        assert_eq!(StreamType::from(0x42), StreamType::Avs1Video);
        assert_eq!(StreamType::from(0xD2), StreamType::Avs2Video);
        assert_eq!(StreamType::from(0xD4), StreamType::Avs3Video);
        assert_eq!(StreamType::from(0xD5), StreamType::Avs3Audio);
        assert_eq!(StreamType::from(0x42).codec_kind(), Some(CodecKind::Avs1));
        assert_eq!(
            StreamType::from(0xD5).codec_kind(),
            Some(CodecKind::Av3aAudio)
        );
        assert_eq!(StreamType::from(0x1B).codec_kind(), None);
        assert!(StreamType::Avs3Video.is_video());
        assert!(StreamType::Avs3Audio.is_audio());
    }

    #[test]
    fn unknown_stream_type() {
        assert_eq!(StreamType::from(0xEE), StreamType::Unknown(0xEE));
        assert_eq!(StreamType::from(0xEE).name(), "Unknown");
    }

    #[test]
    fn invalid_table_id() {
        let data = vec![
            0x01, 0x80, 0x0D, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        assert!(Pmt::parse(&data).is_err());
    }

    #[test]
    fn basic_parsing() {
        let data = vec![
            0x02, // Table ID
            0x80, // Section syntax indicator + section length high
            0x12, // Section length low
            0x00, 0x01, // Program number
            0x01, // Version 0 + current/next = 1
            0x00, // Section number
            0x00, // Last section number
            0xE1, 0x01, // PCR PID
            0x00, 0x00, // Program info length
            // Elementary stream: AVS3 video on PID 0x101
            0xD4, 0xE1, 0x01, 0x00, 0x00,
            // CRC32 placeholder
            0x00, 0x00, 0x00, 0x00,
        ];

        let pmt = Pmt::parse(&data).unwrap();
        assert_eq!(pmt.program_number, 1);
        assert_eq!(pmt.pcr_pid, 0x101);
        assert_eq!(pmt.streams.len(), 1);
        assert_eq!(pmt.streams[0].stream_type, StreamType::Avs3Video);
        assert_eq!(pmt.streams[0].elementary_pid, 0x101);
        assert_eq!(pmt.avs_streams().count(), 1);
    }
}
