/// Start code suffix of a sequence header
pub const SEQUENCE_HEADER: u8 = 0xB0;
/// Start code suffix of an I-picture header
pub const I_PICTURE: u8 = 0xB3;
/// Start code suffix of an extension
pub const EXTENSION: u8 = 0xB5;
/// Start code suffix of a P/B-picture header
pub const PB_PICTURE: u8 = 0xB6;

/// Extension id of the sequence display extension
pub const EXT_SEQUENCE_DISPLAY: u8 = 0b0010;
/// Extension id of the HDR dynamic metadata extension (AVS3)
pub const EXT_HDR_DYNAMIC_METADATA: u8 = 0b0101;

/// Finds the next `00 00 01 xx` start code at or after `from`
///
/// Returns the offset of the first `00` and the suffix byte `xx`. All three
/// AVS video generations share this prefix (the marker-bit discipline of the
/// headers prevents in-header emulation).
#[must_use]
pub fn find_start_code(data: &[u8], from: usize) -> Option<(usize, u8)> {
    if data.len() < 4 || from > data.len() - 4 {
        return None;
    }
    data[from..]
        .windows(4)
        .position(|w| w[0] == 0x00 && w[1] == 0x00 && w[2] == 0x01)
        .map(|i| (from + i, data[from + i + 3]))
}
