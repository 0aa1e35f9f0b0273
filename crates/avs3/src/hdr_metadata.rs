use avs_types::HdrDynamicMetadataType;
use bitio::BitReader;

use crate::Result;

/// AVS3 `hdr_dynamic_metadata_extension()`
///
/// GY/T 368 - extension id `0b0101`. Only the metadata type is sequence
/// level; the per-picture payloads live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdrDynamicMetadata {
    /// Raw 4-bit type value
    pub raw_type: u8,
    /// Interpreted metadata type; 5 is HDR Vivid
    pub metadata_type: HdrDynamicMetadataType,
}

impl HdrDynamicMetadata {
    /// Parses the extension from the bytes following the `00 00 01 B5`
    /// start code
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = BitReader::new(data);
        r.skip_bits(4); // extension id, checked by the caller
        let raw_type = r.read_bits(4)? as u8;
        Ok(HdrDynamicMetadata {
            raw_type,
            metadata_type: HdrDynamicMetadataType::from(raw_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hdr_vivid_type() {
        // ext id 0b0101, type 5
        let data = [0b0101_0101];
        let metadata = HdrDynamicMetadata::parse(&data).unwrap();
        assert_eq!(metadata.metadata_type, HdrDynamicMetadataType::HdrVivid);
    }

    #[test]
    fn other_types_are_reserved() {
        let data = [0b0101_0010];
        let metadata = HdrDynamicMetadata::parse(&data).unwrap();
        assert_eq!(metadata.raw_type, 2);
        assert_eq!(metadata.metadata_type, HdrDynamicMetadataType::Reserved);
    }
}
