//! Shared builders for the end-to-end tests: syntax-exact elementary
//! streams and minimal single-track ISOBMFF files.
#![allow(dead_code)]

use bitio::BitWriter;

/// AVS1 elementary stream: sequence header for the requested profile,
/// 1920x1080p25, terminated by an I-picture start code.
pub fn avs1_es(profile_id: u8) -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer.write_bits(profile_id as u64, 8);
    writer.write_bits(0x20, 8); // level 4.0
    writer.write_bit(true); // progressive
    writer.write_bits(1920, 14);
    writer.write_bits(1080, 14);
    writer.write_bits(1, 2); // 4:2:0
    writer.write_bits(1, 3); // 8-bit
    writer.write_bits(3, 4); // DAR 16:9
    writer.write_bits(3, 4); // 25 fps
    writer.write_bits(25000, 18);
    writer.write_marker_bit();
    writer.write_bits(0, 12);
    writer.write_bit(false); // low_delay
    writer.write_marker_bit();
    writer.write_bits(100, 18);
    writer.write_bits(0, 3); // reserved

    let mut es = vec![0x00, 0x00, 0x01, 0xB0];
    es.extend_from_slice(&writer.finish());
    es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB3, 0x00]);
    es
}

/// AVS3 elementary stream: Main-8bit level 4.0.60 sequence header,
/// 1920x1080p25 low-delay-off, terminated by an I-picture start code.
pub fn avs3_es() -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer.write_bits(0x20, 8); // Main 8bit
    writer.write_bits(0x22, 8); // level 4.0.60
    writer.write_bit(true); // progressive
    writer.write_bit(false); // field_coded
    writer.write_bit(false); // library_stream
    writer.write_bit(false); // library_picture_enable
    writer.write_marker_bit();
    writer.write_bits(1920, 14);
    writer.write_marker_bit();
    writer.write_bits(1080, 14);
    writer.write_bits(1, 2); // 4:2:0
    writer.write_bits(1, 3); // 8-bit
    writer.write_marker_bit();
    writer.write_bits(3, 4); // DAR 16:9
    writer.write_bits(3, 4); // 25 fps
    writer.write_marker_bit();
    writer.write_bits(30000, 18);
    writer.write_marker_bit();
    writer.write_bits(0, 12);
    writer.write_bit(false); // low_delay
    writer.write_bit(false); // temporal_id_enable
    writer.write_marker_bit();
    writer.write_bits(400, 18);
    writer.write_marker_bit();
    writer.write_ue(7); // max_dpb_minus1
    writer.write_bit(false); // rpl1_index_exist
    writer.write_bit(true); // rpl1_same_as_rpl0
    writer.write_marker_bit();
    writer.write_ue(1); // one RPL set
    writer.write_ue(1); // one reference
    writer.write_ue(1); // abs_delta_doi
    writer.write_bit(false); // positive
    writer.write_ue(0); // num_ref_default_active_minus1[0]
    writer.write_ue(0); // num_ref_default_active_minus1[1]
    writer.write_bits(3, 3); // log2_lcu_size_minus2
    writer.write_bits(0, 2);
    writer.write_bits(0, 2);
    writer.write_bits(0, 3);
    writer.write_bits(0, 3);
    writer.write_bits(0, 3);
    writer.write_bits(0, 2);
    writer.write_marker_bit();
    writer.write_bit(false); // weight_quant_enable
    for _ in 0..7 {
        writer.write_bit(false); // st..amvr
    }
    writer.write_bits(0, 4); // num_of_hmvp_cand
    writer.write_bit(false); // umve
    writer.write_bit(false); // intra_pf
    writer.write_bit(false); // tscpm
    writer.write_marker_bit();
    writer.write_bit(false); // dt
    writer.write_bit(false); // pbt
    writer.write_bits(4, 5); // output_reorder_delay
    writer.write_bit(false); // cross_patch_loop_filter
    writer.write_bit(false); // ref_colocated_patch
    writer.write_bit(false); // stable_patch
    writer.write_bits(0, 2); // reserved

    let mut es = vec![0x00, 0x00, 0x01, 0xB0];
    es.extend_from_slice(&writer.finish());
    es.extend_from_slice(&[0x00, 0x00, 0x01, 0xB3, 0x00]);
    es
}

/// AATF frame: General codec, Basic profile, 48 kHz stereo, 16-bit,
/// bitrate index 7 (144 kbps).
pub fn av3a_frame() -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer.write_bits(0xFFF, 12);
    writer.write_bits(2, 4); // General
    writer.write_bit(false); // anc_data_index
    writer.write_bits(0, 3); // nn_type
    writer.write_bits(0, 3); // Basic
    writer.write_bits(2, 4); // 48 kHz
    writer.write_bits(0, 8); // CRC
    writer.write_bits(1, 7); // Stereo
    writer.write_bits(1, 2); // 16-bit
    writer.write_bits(7, 4); // bitrate index 7
    writer.finish()
}

pub fn make_box(fourcc: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut b = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    b.extend_from_slice(fourcc);
    b.extend_from_slice(body);
    b
}

fn full_box(fourcc: &[u8; 4], content: &[u8]) -> Vec<u8> {
    let mut body = vec![0, 0, 0, 0];
    body.extend_from_slice(content);
    make_box(fourcc, &body)
}

/// Minimal single-track ISOBMFF file whose mdat holds exactly `sample`.
pub fn single_track_file(entry_fourcc: &[u8; 4], handler: &[u8; 4], sample: &[u8]) -> Vec<u8> {
    let build_moov = |chunk_offset: u32| -> Vec<u8> {
        let entry = make_box(entry_fourcc, &[0u8; 8]);
        let mut stsd_content = 1u32.to_be_bytes().to_vec();
        stsd_content.extend_from_slice(&entry);
        let mut stbl = full_box(b"stsd", &stsd_content);

        let mut stsz = 0u32.to_be_bytes().to_vec();
        stsz.extend_from_slice(&1u32.to_be_bytes());
        stsz.extend_from_slice(&(sample.len() as u32).to_be_bytes());
        stbl.extend_from_slice(&full_box(b"stsz", &stsz));

        let mut stsc = 1u32.to_be_bytes().to_vec();
        stsc.extend_from_slice(&1u32.to_be_bytes());
        stsc.extend_from_slice(&1u32.to_be_bytes());
        stsc.extend_from_slice(&1u32.to_be_bytes());
        stbl.extend_from_slice(&full_box(b"stsc", &stsc));

        let mut stco = 1u32.to_be_bytes().to_vec();
        stco.extend_from_slice(&chunk_offset.to_be_bytes());
        stbl.extend_from_slice(&full_box(b"stco", &stco));

        let stbl = make_box(b"stbl", &stbl);
        let minf = make_box(b"minf", &stbl);

        let mut hdlr_content = vec![0u8; 4];
        hdlr_content.extend_from_slice(handler);
        hdlr_content.extend_from_slice(&[0u8; 12]);
        let mut mdia = full_box(b"hdlr", &hdlr_content);
        mdia.extend_from_slice(&minf);
        let mdia = make_box(b"mdia", &mdia);

        let mut tkhd_content = vec![0u8; 8]; // creation + modification
        tkhd_content.extend_from_slice(&1u32.to_be_bytes()); // track id
        tkhd_content.extend_from_slice(&[0u8; 4]);
        let mut trak = full_box(b"tkhd", &tkhd_content);
        trak.extend_from_slice(&mdia);
        let trak = make_box(b"trak", &trak);
        make_box(b"moov", &trak)
    };

    let ftyp = make_box(b"ftyp", b"isom\x00\x00\x00\x01avs3");
    let moov_len = build_moov(0).len();
    let sample_offset = (ftyp.len() + moov_len + 8) as u32;

    let mut file = ftyp;
    file.extend_from_slice(&build_moov(sample_offset));
    file.extend_from_slice(&make_box(b"mdat", sample));
    file
}
