mod common;

use analyzer::{AnalyzerError, Container, analyze, analyze_sample_source};
use avs_types::CodecKind;
use bytes::Bytes;

#[test]
fn bmff_avs3_track_end_to_end() {
    let file = common::single_track_file(b"avs3", b"vide", &common::avs3_es());

    // Container auto-detection must pick ISOBMFF.
    let report = analyze(&file, None).unwrap();
    assert_eq!(report.container, "ISO BMFF");
    assert_eq!(report.streams.len(), 1);

    let stream = &report.streams[0];
    assert_eq!(stream.pid_or_track_id, 1);
    assert_eq!(stream.stream_type_or_fourcc, "avs3");
    assert_eq!(stream.codec_kind, Some(CodecKind::Avs3Video));

    let info = stream.info.as_ref().unwrap().as_video().unwrap();
    assert_eq!(info.generation_name, "AVS3");
    assert_eq!(info.horizontal_size, 1920);
    assert_eq!(info.vertical_size, 1080);
}

#[test]
fn bmff_av3a_track_end_to_end() {
    let file = common::single_track_file(b"av3a", b"soun", &common::av3a_frame());
    let report = analyze(&file, Some(Container::Bmff)).unwrap();

    let info = report.streams[0].info.as_ref().unwrap().as_audio().unwrap();
    assert_eq!(info.sampling_frequency, 48000);
    assert_eq!(info.channel_number, Some(2));
    assert_eq!(info.bit_rate, Some(144_000));
}

#[test]
fn bmff_avst_track_is_avs2() {
    // An avst track with a non-AVS2 payload still registers as AVS2 by
    // fourCC; only the in-band info stays empty.
    let file = common::single_track_file(b"avst", b"vide", &[0u8; 16]);
    let report = analyze(&file, Some(Container::Bmff)).unwrap();
    let stream = &report.streams[0];
    assert_eq!(stream.codec_kind, Some(CodecKind::Avs2));
    assert!(stream.info.is_none());
}

#[test]
fn bmff_without_avs_tracks_reports_observed_fourccs() {
    let file = common::single_track_file(b"avc1", b"vide", &[0u8; 16]);
    match analyze(&file, Some(Container::Bmff)) {
        Err(AnalyzerError::NoAvsContent { observed }) => {
            assert_eq!(observed, vec!["avc1".to_string()]);
        }
        other => panic!("expected NoAvsContent, got {other:?}"),
    }
}

#[test]
fn sample_source_feeds_the_parsers() {
    let samples = vec![
        (1u32, *b"avs3", Bytes::from(common::avs3_es())),
        (2u32, *b"av3a", Bytes::from(common::av3a_frame())),
        (3u32, *b"avc1", Bytes::from_static(&[0u8; 8])),
    ];
    let mut source = samples.into_iter();

    let report = analyze_sample_source(&mut source).unwrap();
    assert_eq!(report.streams.len(), 3);
    assert!(report.streams[0].info.is_some());
    assert!(report.streams[1].info.is_some());
    assert!(report.streams[2].info.is_none());
    assert_eq!(report.detected_streams().count(), 2);
}

#[test]
fn ts_auto_detection() {
    // A garbage-free transport stream head: repeated null packets.
    let mut file = Vec::new();
    for _ in 0..30 {
        let mut packet = vec![0u8; 188];
        packet[0] = 0x47;
        packet[1] = 0x1F;
        packet[2] = 0xFF;
        packet[3] = 0x10;
        file.extend_from_slice(&packet);
    }
    assert_eq!(analyzer::detect_container(&file), Some(Container::Ts));

    // All null packets: parses as TS but carries nothing.
    let result = analyze(&file, None);
    assert!(matches!(result, Err(AnalyzerError::NoAvsContent { .. })));
}
