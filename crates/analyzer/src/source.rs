use bytes::Bytes;

/// An external demuxer feeding compressed samples into the analyzer
///
/// Containers beyond MPEG-TS and ISOBMFF are demultiplexed elsewhere; the
/// core only needs one compressed sample per track together with the
/// track's sample-entry FourCC.
pub trait SampleSource {
    /// Yields the next `(track_id, codec_tag, sample_bytes)` triple, or
    /// `None` when every track has been delivered
    fn next_sample(&mut self) -> Option<(u32, [u8; 4], Bytes)>;
}

impl SampleSource for std::vec::IntoIter<(u32, [u8; 4], Bytes)> {
    fn next_sample(&mut self) -> Option<(u32, [u8; 4], Bytes)> {
        self.next()
    }
}
