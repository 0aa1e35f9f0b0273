mod common;

use analyzer::{AnalyzerError, Container, analyze};
use avs_types::CodecKind;

#[test]
fn avs_plus_broadcasting_profile() {
    let es = common::avs1_es(0x48);
    let report = analyze(&es, Some(Container::RawEs(CodecKind::Avs1))).unwrap();

    assert_eq!(report.streams.len(), 1);
    let info = report.streams[0].info.as_ref().unwrap().as_video().unwrap();
    assert_eq!(info.generation_name, "AVS+");
    assert!(info.profile_name.contains("Broadcasting"));
}

#[test]
fn avs1_base_profile_keeps_avs_name() {
    let es = common::avs1_es(0x20);
    let report = analyze(&es, Some(Container::RawEs(CodecKind::Avs1))).unwrap();
    let info = report.streams[0].info.as_ref().unwrap().as_video().unwrap();
    assert_eq!(info.generation_name, "AVS");
    assert_eq!(info.horizontal_size, 1920);
    assert_eq!(info.frame_rate, 25.0);
}

#[test]
fn av3a_general_basic_stereo() {
    let es = common::av3a_frame();
    let report = analyze(&es, Some(Container::RawEs(CodecKind::Av3aAudio))).unwrap();

    let info = report.streams[0].info.as_ref().unwrap().as_audio().unwrap();
    assert_eq!(info.codec_name, "General");
    assert_eq!(info.coding_profile, "Basic");
    assert_eq!(info.sampling_frequency, 48000);
    assert_eq!(info.channel_configuration.as_deref(), Some("Stereo"));
    assert_eq!(info.channel_number, Some(2));
    assert_eq!(info.resolution_bits, Some(16));
    assert_eq!(info.bit_rate, Some(144_000));
}

#[test]
fn avs3_main8_1080p25() {
    let es = common::avs3_es();
    let report = analyze(&es, Some(Container::RawEs(CodecKind::Avs3Video))).unwrap();

    let info = report.streams[0].info.as_ref().unwrap().as_video().unwrap();
    assert_eq!(info.generation_name, "AVS3");
    assert!(info.profile_name.contains("Main 8bit"));
    assert_eq!(info.horizontal_size, 1920);
    assert_eq!(info.vertical_size, 1080);
    assert!(info.progressive);
    assert_eq!(info.luma_bit_depth, Some(8));
    assert_eq!(info.frame_rate, 25.0);
    assert!(!info.low_delay);
}

#[test]
fn garbage_es_reports_no_content() {
    let result = analyze(&[0u8; 512], Some(Container::RawEs(CodecKind::Avs2)));
    assert!(matches!(result, Err(AnalyzerError::NoAvsContent { .. })));
}

#[test]
fn unrecognized_container() {
    let result = analyze(&[0xABu8; 512], None);
    assert!(matches!(result, Err(AnalyzerError::ContainerUnrecognized)));
}

#[test]
fn json_serialization_roundtrip() {
    let es = common::av3a_frame();
    let report = analyze(&es, Some(Container::RawEs(CodecKind::Av3aAudio))).unwrap();
    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"sampling_frequency\": 48000"));
    assert!(json.contains("Audio Vivid"));
}
