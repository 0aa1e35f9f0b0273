use avs_types::AvsAudioInfo;
use bitio::BitReader;
use num_traits::FromPrimitive;

use crate::tables::{
    AudioCodecId, ChannelConfig, CodingProfile, bit_rate_kbps, nn_type_name, resolution_bits,
    sampling_frequency,
};
use crate::{Av3aError, Result};

/// The 12-bit AATF syncword
const SYNCWORD: u32 = 0xFFF;

/// A decoded AATF frame header
///
/// GY/T 363 - AATF. Field presence follows the codec-id / coding-profile
/// branches; everything the syntax carries is kept, including values the
/// semantic record does not use (`raw_frame_length`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Audio codec id
    pub audio_codec_id: AudioCodecId,
    /// Raw neural-network type code, general codec only
    pub nn_type: Option<u8>,
    /// Raw 3-bit coding profile code
    pub coding_profile_raw: u8,
    /// 4-bit sampling frequency index
    pub sampling_frequency_index: u8,
    /// Sampling frequency in Hz; 0 when the index is reserved
    pub sampling_frequency: u32,
    /// Raw frame length, lossless codec only; not semantically used
    pub raw_frame_length: Option<u16>,
    /// Effective channel count, when the branch defines one
    pub channel_number: Option<u16>,
    /// Channel configuration, when the branch is configuration-driven
    pub channel_config: Option<ChannelConfig>,
    /// Sound bed type, object-metadata profile only
    pub sound_bed_type: Option<u8>,
    /// Number of object channels, object-metadata profile only
    pub object_channel_number: Option<u16>,
    /// Ambisonics order, FOA/HOA profile only
    pub hoa_order: Option<u8>,
    /// Raw 2-bit resolution code
    pub resolution: u8,
    /// Total bit rate in kbit/s, when a branch assigned one
    pub bit_rate_kbps: Option<u32>,
}

impl FrameHeader {
    /// Decodes a frame header at `offset` into `data`
    ///
    /// `offset` must point at a byte-aligned syncword candidate. An invalid
    /// syncword or codec id yields [`Av3aError::InvalidSyncword`]; the
    /// caller advances one byte and retries.
    pub fn parse_at(data: &[u8], offset: usize) -> Result<Self> {
        let mut r = BitReader::new_at(data, offset);

        if r.read_bits(12)? != SYNCWORD {
            return Err(Av3aError::InvalidSyncword);
        }

        let codec_id_raw = r.read_bits(4)? as u8;
        let Some(audio_codec_id) = AudioCodecId::from_u8(codec_id_raw) else {
            return Err(Av3aError::InvalidSyncword);
        };
        r.skip_bits(1); // anc_data_index

        let nn_type = if audio_codec_id == AudioCodecId::General {
            Some(r.read_bits(3)? as u8)
        } else {
            None
        };

        let coding_profile_raw = r.read_bits(3)? as u8;
        let coding_profile = CodingProfile::from_u8(coding_profile_raw);

        let sampling_frequency_index = r.read_bits(4)? as u8;
        let frequency = if audio_codec_id == AudioCodecId::Lossless
            && sampling_frequency_index == 0xF
        {
            r.read_bits(24)?
        } else {
            sampling_frequency(sampling_frequency_index).unwrap_or(0)
        };

        let raw_frame_length = if audio_codec_id != AudioCodecId::General {
            Some(r.read_bits(16)? as u16)
        } else {
            None
        };

        r.skip_bits(8); // aatf_error_check CRC

        let mut channel_number = None;
        let mut channel_config = None;
        let mut sound_bed_type = None;
        let mut object_channel_number = None;
        let mut hoa_order = None;
        let mut bit_rate = None;

        match (audio_codec_id, coding_profile) {
            (AudioCodecId::Lossless, _) => {
                // 4-bit count with an 8-bit escape at 15.
                let coded = r.read_bits(4)? as u16;
                channel_number = Some(if coded == 15 {
                    r.read_bits(8)? as u16
                } else {
                    coded
                });
            }
            (AudioCodecId::General, Some(CodingProfile::Basic)) => {
                let index = r.read_bits(7)? as u8;
                channel_config = ChannelConfig::from_u8(index);
                channel_number = channel_config.map(ChannelConfig::channels);
            }
            (AudioCodecId::General, Some(CodingProfile::ObjectMetadata)) => {
                let bed_type = r.read_bits(2)? as u8;
                sound_bed_type = Some(bed_type);
                match bed_type {
                    0 => {
                        let objects = r.read_bits(7)? as u16 + 1;
                        object_channel_number = Some(objects);
                        let index = r.read_bits(4)? as u8;
                        bit_rate = bit_rate_kbps(ChannelConfig::Mono, index)
                            .map(|rate| rate * objects as u32);
                    }
                    1 => {
                        let bed_index = r.read_bits(7)? as u8;
                        channel_config = ChannelConfig::from_u8(bed_index);
                        channel_number = channel_config.map(ChannelConfig::channels);
                        let bed_bitrate_index = r.read_bits(4)? as u8;
                        let objects = r.read_bits(7)? as u16 + 1;
                        object_channel_number = Some(objects);
                        let obj_bitrate_index = r.read_bits(4)? as u8;

                        let bed_rate = channel_config
                            .and_then(|config| bit_rate_kbps(config, bed_bitrate_index));
                        let obj_rate = bit_rate_kbps(ChannelConfig::Mono, obj_bitrate_index)
                            .map(|rate| rate * objects as u32);
                        bit_rate = match (bed_rate, obj_rate) {
                            (Some(bed), Some(obj)) => Some(bed + obj),
                            _ => None,
                        };
                    }
                    _ => {
                        // Reserved bed types carry no decodable layout.
                    }
                }
            }
            (AudioCodecId::General, Some(CodingProfile::FoaHoa)) => {
                let order = r.read_bits(4)? as u8;
                hoa_order = Some(order);
                channel_config = ChannelConfig::from_hoa_order(order);
                channel_number = channel_config.map(ChannelConfig::channels);
            }
            (AudioCodecId::General, None) => {
                // Reserved coding profile: nothing further is decodable.
            }
        }

        let resolution = r.read_bits(2)? as u8;

        if audio_codec_id == AudioCodecId::General
            && coding_profile.is_some()
            && coding_profile != Some(CodingProfile::ObjectMetadata)
        {
            let index = r.read_bits(4)? as u8;
            bit_rate = channel_config.and_then(|config| bit_rate_kbps(config, index));
        }

        Ok(FrameHeader {
            audio_codec_id,
            nn_type,
            coding_profile_raw,
            sampling_frequency_index,
            sampling_frequency: frequency,
            raw_frame_length,
            channel_number,
            channel_config,
            sound_bed_type,
            object_channel_number,
            hoa_order,
            resolution,
            bit_rate_kbps: bit_rate,
        })
    }

    /// Coding profile, when the raw code is assigned
    #[must_use]
    pub fn coding_profile(&self) -> Option<CodingProfile> {
        CodingProfile::from_u8(self.coding_profile_raw)
    }

    /// Builds the semantic audio record
    #[must_use]
    pub fn info(&self) -> AvsAudioInfo {
        AvsAudioInfo {
            codec_name: self.audio_codec_id.name().to_string(),
            coding_profile: self
                .coding_profile()
                .map_or("Reserved".to_string(), |profile| profile.name().to_string()),
            sampling_frequency: self.sampling_frequency,
            resolution_bits: resolution_bits(self.resolution),
            nn_type: self.nn_type.map(|code| nn_type_name(code).to_string()),
            channel_number: self.channel_number,
            channel_configuration: self
                .channel_config
                .map(|config| config.name().to_string()),
            object_channel_number: self.object_channel_number,
            hoa_order: self.hoa_order,
            // kbit/s on the wire, bits per second in the record.
            bit_rate: self.bit_rate_kbps.map(|rate| rate as u64 * 1000),
        }
    }
}
