use avs_types::{ChromaFormat, WeightQuantMatrix};
use bitio::BitReader;

use crate::{ENCODING_PRECISION_PROFILES, ENHANCED_PROFILES, Result};

/// One entry of a reference picture list set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RplEntry {
    /// Reference into the library picture buffer
    LibraryPicture {
        /// Referenced library picture index
        index: u32,
    },
    /// Ordinary reference by DOI delta (sign applied)
    DoiDelta {
        /// Signed DOI delta
        delta: i32,
    },
}

/// `reference_picture_list_set(list, i)`
///
/// T/AI 109.2 - 7.1.2.2. Library references are only coded when the
/// sequence enables library pictures and the set opts in; otherwise every
/// entry is a DOI delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePictureListSet {
    /// Whether this set may reference the library buffer
    pub reference_to_library_enable: bool,
    /// The reference entries
    pub entries: Vec<RplEntry>,
}

impl ReferencePictureListSet {
    fn parse(r: &mut BitReader, library_picture_enable: bool) -> Result<Self> {
        let reference_to_library_enable = if library_picture_enable {
            r.read_bool()?
        } else {
            false
        };

        let num_of_ref_pic = r.read_ue()? as usize;
        let mut entries = Vec::with_capacity(num_of_ref_pic);
        for _ in 0..num_of_ref_pic {
            // library_index_flag is only coded when library references are
            // possible; it is implicitly false otherwise.
            let library_index_flag = if reference_to_library_enable {
                r.read_bool()?
            } else {
                false
            };

            if library_index_flag {
                entries.push(RplEntry::LibraryPicture {
                    index: r.read_ue()?,
                });
            } else {
                let abs_delta_doi = r.read_ue()?;
                let delta = if abs_delta_doi > 0 && r.read_bool()? {
                    -(abs_delta_doi as i32)
                } else {
                    abs_delta_doi as i32
                };
                entries.push(RplEntry::DoiDelta { delta });
            }
        }

        Ok(ReferencePictureListSet {
            reference_to_library_enable,
            entries,
        })
    }
}

/// Base tool-enable flags of the sequence header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolFlags {
    /// Secondary transform
    pub st: bool,
    /// Sample adaptive offset; cleared when the enhanced block enables ESAO
    pub sao: bool,
    /// Adaptive loop filter
    pub alf: bool,
    /// Affine motion compensation
    pub affine: bool,
    /// Symmetric MVD coding
    pub smvd: bool,
    /// Intra PCM
    pub ipcm: bool,
    /// Adaptive motion vector resolution
    pub amvr: bool,
    /// Number of HMVP candidates
    pub num_of_hmvp_cand: u8,
    /// Ultimate motion vector expression
    pub umve: bool,
    /// Extended MVR; coded only when AMVR is on and HMVP candidates exist
    pub emvr: bool,
    /// Intra prediction filter
    pub intra_pf: bool,
    /// Two-step cross-component prediction mode
    pub tscpm: bool,
    /// Derived tree
    pub dt: bool,
    /// Max derived-tree size, coded when `dt` is on
    pub log2_max_dt_size_minus4: Option<u8>,
    /// Position-based transform
    pub pbt: bool,
}

/// Enhanced-profile tool flags (High profiles)
///
/// Presence of this block also implicitly enables the companion features
/// EIPM, MIPF, chroma intra PF, UMVE enhancement, affine UMVE, SbTMVP,
/// SRCC, enhanced ST, enhanced TSCPM and MAEC; they have no coded bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnhancedToolFlags {
    /// Prediction from multiple cross-components
    pub pmc: bool,
    /// Intra inter prediction
    pub iip: bool,
    /// Spatial angular weighted prediction
    pub sawp: bool,
    /// Affine secondary resolution; coded only when affine is on
    pub asr: bool,
    /// Angular weighted prediction
    pub awp: bool,
    /// Enhanced temporal MVP / MV angular prediction
    pub etmvp_mvap: bool,
    /// Decoder-side motion vector refinement
    pub dmvr: bool,
    /// Bi-directional optical flow
    pub bio: bool,
    /// Bi-directional gradient correction
    pub bgc: bool,
    /// Inter prediction filter
    pub inter_pf: bool,
    /// Inter prediction correction
    pub inter_pc: bool,
    /// Overlapped block motion compensation
    pub obmc: bool,
    /// Sub-block transform
    pub sbt: bool,
    /// Implicit selected transform
    pub ist: bool,
    /// Enhanced SAO
    pub esao: bool,
    /// Cross-component SAO
    pub ccsao: bool,
    /// Enhanced ALF; coded only when ALF is on
    pub ealf: bool,
    /// Intra block copy
    pub ibc: bool,
    /// Intra string copy
    pub isc: bool,
    /// Number of intra HMVP candidates; coded when IBC or ISC is on
    pub num_of_intra_hmvp_cand: Option<u8>,
    /// Frequency-based intra mode coding
    pub fimc: bool,
    /// Neural-network tool set hook
    pub nn_tools_set_hook: u8,
    /// Number of NN filters minus one; coded when hook bit 0 is set
    pub num_of_nn_filter_minus1: Option<u32>,
}

/// AVS3 `sequence_header()`
///
/// T/AI 109.2 - 7.1.2.1.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceHeader {
    /// Profile id
    pub profile_id: u8,
    /// Level id
    pub level_id: u8,
    /// Progressive sequence flag
    pub progressive_sequence: bool,
    /// Field coded sequence flag
    pub field_coded_sequence: bool,
    /// This stream is a library stream
    pub library_stream: bool,
    /// Library pictures may be referenced (non-library streams only)
    pub library_picture_enable: bool,
    /// Library and main stream share duplicate sequence headers
    pub duplicate_sequence_header: Option<bool>,
    /// Luma width in samples
    pub horizontal_size: u32,
    /// Luma height in samples
    pub vertical_size: u32,
    /// Chroma subsampling
    pub chroma_format: ChromaFormat,
    /// 3-bit sample precision code
    pub sample_precision: u8,
    /// 3-bit encoding precision code, present for the 10-bit profiles
    pub encoding_precision: Option<u8>,
    /// 4-bit aspect ratio code
    pub aspect_ratio_code: u8,
    /// 4-bit frame rate code
    pub frame_rate_code: u8,
    /// Low 18 bits of the coded bit rate
    pub bit_rate_lower: u32,
    /// High 12 bits of the coded bit rate
    pub bit_rate_upper: u32,
    /// Low delay flag
    pub low_delay: bool,
    /// Temporal id enable flag
    pub temporal_id_enable: bool,
    /// BBV buffer size in coded units
    pub bbv_buffer_size: u32,
    /// Max decoded picture buffer size minus one
    pub max_dpb_minus1: u32,
    /// List-1 reference index signalling exists
    pub rpl1_index_exist: bool,
    /// List 1 duplicates list 0
    pub rpl1_same_as_rpl0: bool,
    /// Reference picture list sets for list 0
    pub rpl0_sets: Vec<ReferencePictureListSet>,
    /// Reference picture list sets for list 1; empty when duplicated
    pub rpl1_sets: Vec<ReferencePictureListSet>,
    /// Default active reference counts minus one, per list
    pub num_ref_default_active_minus1: [u32; 2],
    /// Coding-tree geometry codes, in syntax order: log2_lcu_size_minus2,
    /// log2_min_cu_size_minus2, log2_max_part_ratio_minus2,
    /// max_split_times_minus6, log2_min_qt_size_minus2,
    /// log2_max_bt_size_minus2, log2_max_eqt_size_minus3
    pub coding_tree_codes: [u8; 7],
    /// Weight quantization matrices in effect, when enabled
    pub weight_quant: Option<WeightQuantMatrix>,
    /// Base tool flags
    pub tools: ToolFlags,
    /// Enhanced tool flags, High profiles only
    pub enhanced_tools: Option<EnhancedToolFlags>,
    /// Picture reorder delay, present when low delay is off
    pub output_reorder_delay: Option<u8>,
    /// Cross-patch loop filter enable flag
    pub cross_patch_loop_filter_enable: bool,
    /// Co-located patch reference flag
    pub ref_colocated_patch: bool,
    /// Stable patch flag
    pub stable_patch: bool,
    /// Uniform patch flag, when patches are stable
    pub uniform_patch: Option<bool>,
    /// Patch width minus one, when patches are uniform
    pub patch_width_minus1: Option<u32>,
    /// Patch height minus one, when patches are uniform
    pub patch_height_minus1: Option<u32>,
}

impl SequenceHeader {
    /// Parses a sequence header from the bytes following the
    /// `00 00 01 B0` start code
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(data);

        let profile_id = r.read_bits(8)? as u8;
        let level_id = r.read_bits(8)? as u8;
        let progressive_sequence = r.read_bool()?;
        let field_coded_sequence = r.read_bool()?;

        let library_stream = r.read_bool()?;
        let mut library_picture_enable = false;
        let mut duplicate_sequence_header = None;
        if !library_stream {
            library_picture_enable = r.read_bool()?;
            if library_picture_enable {
                duplicate_sequence_header = Some(r.read_bool()?);
            }
        }

        r.check_marker_bit()?;
        let horizontal_size = r.read_bits(14)?;
        r.check_marker_bit()?;
        let vertical_size = r.read_bits(14)?;
        let chroma_format = ChromaFormat::from(r.read_bits(2)? as u8);
        let sample_precision = r.read_bits(3)? as u8;
        let encoding_precision = if ENCODING_PRECISION_PROFILES.contains(&profile_id) {
            Some(r.read_bits(3)? as u8)
        } else {
            None
        };
        r.check_marker_bit()?;
        let aspect_ratio_code = r.read_bits(4)? as u8;
        let frame_rate_code = r.read_bits(4)? as u8;
        r.check_marker_bit()?;
        let bit_rate_lower = r.read_bits(18)?;
        r.check_marker_bit()?;
        let bit_rate_upper = r.read_bits(12)?;
        let low_delay = r.read_bool()?;
        let temporal_id_enable = r.read_bool()?;
        r.check_marker_bit()?;
        let bbv_buffer_size = r.read_bits(18)?;
        r.check_marker_bit()?;
        let max_dpb_minus1 = r.read_ue()?;
        let rpl1_index_exist = r.read_bool()?;
        let rpl1_same_as_rpl0 = r.read_bool()?;
        r.check_marker_bit()?;

        let num_rpl0 = r.read_ue()? as usize;
        let mut rpl0_sets = Vec::with_capacity(num_rpl0);
        for _ in 0..num_rpl0 {
            rpl0_sets.push(ReferencePictureListSet::parse(
                &mut r,
                library_picture_enable,
            )?);
        }

        let mut rpl1_sets = Vec::new();
        if !rpl1_same_as_rpl0 {
            let num_rpl1 = r.read_ue()? as usize;
            rpl1_sets.reserve(num_rpl1);
            for _ in 0..num_rpl1 {
                rpl1_sets.push(ReferencePictureListSet::parse(
                    &mut r,
                    library_picture_enable,
                )?);
            }
        }

        let num_ref_default_active_minus1 = [r.read_ue()?, r.read_ue()?];

        let coding_tree_codes = [
            r.read_bits(3)? as u8, // log2_lcu_size_minus2
            r.read_bits(2)? as u8, // log2_min_cu_size_minus2
            r.read_bits(2)? as u8, // log2_max_part_ratio_minus2
            r.read_bits(3)? as u8, // max_split_times_minus6
            r.read_bits(3)? as u8, // log2_min_qt_size_minus2
            r.read_bits(3)? as u8, // log2_max_bt_size_minus2
            r.read_bits(2)? as u8, // log2_max_eqt_size_minus3
        ];
        r.check_marker_bit()?;

        let weight_quant_enable = r.read_bool()?;
        let weight_quant = if weight_quant_enable {
            let load_seq_weight_quant_data = r.read_bool()?;
            if load_seq_weight_quant_data {
                Some(parse_weight_quant_matrix(&mut r)?)
            } else {
                Some(WeightQuantMatrix::default())
            }
        } else {
            None
        };

        let mut tools = ToolFlags {
            st: r.read_bool()?,
            sao: r.read_bool()?,
            alf: r.read_bool()?,
            affine: r.read_bool()?,
            smvd: r.read_bool()?,
            ipcm: r.read_bool()?,
            amvr: r.read_bool()?,
            num_of_hmvp_cand: r.read_bits(4)? as u8,
            umve: r.read_bool()?,
            ..ToolFlags::default()
        };
        if tools.amvr && tools.num_of_hmvp_cand != 0 {
            tools.emvr = r.read_bool()?;
        }
        tools.intra_pf = r.read_bool()?;
        tools.tscpm = r.read_bool()?;
        r.check_marker_bit()?;
        tools.dt = r.read_bool()?;
        if tools.dt {
            tools.log2_max_dt_size_minus4 = Some(r.read_bits(2)? as u8);
        }
        tools.pbt = r.read_bool()?;

        let enhanced_tools = if ENHANCED_PROFILES.contains(&profile_id) {
            let enhanced = EnhancedToolFlags::parse(&mut r, &tools)?;
            if enhanced.esao {
                tools.sao = false;
            }
            Some(enhanced)
        } else {
            None
        };

        let output_reorder_delay = if !low_delay {
            Some(r.read_bits(5)? as u8)
        } else {
            None
        };

        let cross_patch_loop_filter_enable = r.read_bool()?;
        let ref_colocated_patch = r.read_bool()?;
        let stable_patch = r.read_bool()?;
        let mut uniform_patch = None;
        let mut patch_width_minus1 = None;
        let mut patch_height_minus1 = None;
        if stable_patch {
            let uniform = r.read_bool()?;
            uniform_patch = Some(uniform);
            if uniform {
                r.check_marker_bit()?;
                patch_width_minus1 = Some(r.read_ue()?);
                patch_height_minus1 = Some(r.read_ue()?);
            }
        }
        r.skip_bits(2); // reserved

        Ok(SequenceHeader {
            profile_id,
            level_id,
            progressive_sequence,
            field_coded_sequence,
            library_stream,
            library_picture_enable,
            duplicate_sequence_header,
            horizontal_size,
            vertical_size,
            chroma_format,
            sample_precision,
            encoding_precision,
            aspect_ratio_code,
            frame_rate_code,
            bit_rate_lower,
            bit_rate_upper,
            low_delay,
            temporal_id_enable,
            bbv_buffer_size,
            max_dpb_minus1,
            rpl1_index_exist,
            rpl1_same_as_rpl0,
            rpl0_sets,
            rpl1_sets,
            num_ref_default_active_minus1,
            coding_tree_codes,
            weight_quant,
            tools,
            enhanced_tools,
            output_reorder_delay,
            cross_patch_loop_filter_enable,
            ref_colocated_patch,
            stable_patch,
            uniform_patch,
            patch_width_minus1,
            patch_height_minus1,
        })
    }

    /// Bit rate in bits per second
    #[must_use]
    pub fn bit_rate(&self) -> u64 {
        (((self.bit_rate_upper as u64) << 18) | (self.bit_rate_lower as u64 & 0x3FFFF)) * 400
    }

    /// The precision code governing the coded bit depth
    #[must_use]
    pub fn effective_precision(&self) -> u8 {
        self.encoding_precision.unwrap_or(self.sample_precision)
    }

    /// Human-readable profile name
    #[must_use]
    pub fn profile_name(&self) -> String {
        match self.profile_id {
            crate::PROFILE_MAIN8 => "Main 8bit Profile".to_string(),
            crate::PROFILE_MAIN10 => "Main 10bit Profile".to_string(),
            crate::PROFILE_HIGH8 => "High 8bit Profile".to_string(),
            crate::PROFILE_HIGH10 => "High 10bit Profile".to_string(),
            other => format!("Profile 0x{other:02X}"),
        }
    }

    /// Human-readable level name
    #[must_use]
    pub fn level_name(&self) -> String {
        level_name(self.level_id)
    }
}

impl EnhancedToolFlags {
    fn parse(r: &mut BitReader, tools: &ToolFlags) -> Result<Self> {
        let mut enhanced = EnhancedToolFlags {
            pmc: r.read_bool()?,
            iip: r.read_bool()?,
            sawp: r.read_bool()?,
            ..EnhancedToolFlags::default()
        };
        if tools.affine {
            enhanced.asr = r.read_bool()?;
        }
        enhanced.awp = r.read_bool()?;
        enhanced.etmvp_mvap = r.read_bool()?;
        enhanced.dmvr = r.read_bool()?;
        enhanced.bio = r.read_bool()?;
        enhanced.bgc = r.read_bool()?;
        enhanced.inter_pf = r.read_bool()?;
        enhanced.inter_pc = r.read_bool()?;
        enhanced.obmc = r.read_bool()?;
        enhanced.sbt = r.read_bool()?;
        enhanced.ist = r.read_bool()?;
        enhanced.esao = r.read_bool()?;
        enhanced.ccsao = r.read_bool()?;
        if tools.alf {
            enhanced.ealf = r.read_bool()?;
        }
        enhanced.ibc = r.read_bool()?;
        r.check_marker_bit()?;
        enhanced.isc = r.read_bool()?;
        if enhanced.ibc || enhanced.isc {
            enhanced.num_of_intra_hmvp_cand = Some(r.read_bits(4)? as u8);
        }
        enhanced.fimc = r.read_bool()?;
        enhanced.nn_tools_set_hook = r.read_bits(8)? as u8;
        if enhanced.nn_tools_set_hook & 0x01 != 0 {
            enhanced.num_of_nn_filter_minus1 = Some(r.read_ue()?);
        }
        r.check_marker_bit()?;
        Ok(enhanced)
    }
}

fn parse_weight_quant_matrix(r: &mut BitReader) -> Result<WeightQuantMatrix> {
    let mut matrix = WeightQuantMatrix::default();
    for row in &mut matrix.m44 {
        for value in row {
            *value = r.read_ue()?;
        }
    }
    for row in &mut matrix.m88 {
        for value in row {
            *value = r.read_ue()?;
        }
    }
    Ok(matrix)
}

/// Level names per the GY/T 368 level table
fn level_name(level_id: u8) -> String {
    let name = match level_id {
        0x10 => "2.0.15",
        0x12 => "2.0.30",
        0x14 => "2.0.60",
        0x20 => "4.0.30",
        0x22 => "4.0.60",
        0x40 => "6.0.30",
        0x41 => "6.2.30",
        0x42 => "6.0.60",
        0x43 => "6.2.60",
        0x44 => "6.0.120",
        0x45 => "6.2.120",
        0x50 => "8.0.30",
        0x51 => "8.2.30",
        0x52 => "8.0.60",
        0x53 => "8.2.60",
        0x54 => "8.0.120",
        0x55 => "8.2.120",
        0x60 => "10.0.30",
        0x61 => "10.2.30",
        0x62 => "10.0.60",
        0x63 => "10.2.60",
        0x64 => "10.0.120",
        0x65 => "10.2.120",
        other => return format!("Level 0x{other:02X}"),
    };
    name.to_string()
}
