use byteorder::{BigEndian, ByteOrder};

/// Sample-table state of one track, gathered from the `stbl` children
///
/// Enough of `stsz`/`stsc`/`stco`(`co64`)/`stss` to locate individual
/// samples in the file.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    /// Uniform sample size from `stsz`, when non-zero
    pub uniform_sample_size: u32,
    /// Per-sample sizes from `stsz`, when not uniform
    pub sample_sizes: Vec<u32>,
    /// `(first_chunk, samples_per_chunk)` runs from `stsc`, 1-based chunks
    pub sample_to_chunk: Vec<(u32, u32)>,
    /// Absolute chunk offsets from `stco`/`co64`
    pub chunk_offsets: Vec<u64>,
    /// Sync-sample numbers from `stss`, 1-based
    pub sync_samples: Vec<u32>,
}

impl SampleTable {
    /// Total number of samples described
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_sizes.len()
    }

    /// Size of sample `number` (1-based)
    #[must_use]
    pub fn sample_size(&self, number: u32) -> Option<u64> {
        if self.uniform_sample_size != 0 {
            return Some(self.uniform_sample_size as u64);
        }
        self.sample_sizes
            .get(number.checked_sub(1)? as usize)
            .map(|&s| s as u64)
    }

    /// The first sample to inspect: the first sync sample when `stss` is
    /// present, sample 1 otherwise
    #[must_use]
    pub fn first_sample_number(&self) -> u32 {
        self.sync_samples.first().copied().unwrap_or(1)
    }

    /// Absolute file offset of sample `number` (1-based)
    ///
    /// Walks the sample-to-chunk runs to find the containing chunk, then
    /// adds the sizes of the preceding samples in that chunk.
    #[must_use]
    pub fn sample_offset(&self, number: u32) -> Option<u64> {
        if self.sample_to_chunk.is_empty() || self.chunk_offsets.is_empty() || number == 0 {
            return None;
        }

        let target = number - 1; // 0-based
        let mut first_sample_of_run = 0u64; // 0-based running count

        for (i, &(first_chunk, samples_per_chunk)) in self.sample_to_chunk.iter().enumerate() {
            let first_chunk = first_chunk.checked_sub(1)? as u64; // 0-based
            let next_first_chunk = match self.sample_to_chunk.get(i + 1) {
                Some(&(next, _)) => next.checked_sub(1)? as u64,
                None => self.chunk_offsets.len() as u64,
            };
            let per_chunk = samples_per_chunk as u64;
            if per_chunk == 0 {
                continue;
            }

            let run_chunks = next_first_chunk.saturating_sub(first_chunk);
            let run_samples = run_chunks * per_chunk;

            if (target as u64) < first_sample_of_run + run_samples {
                let index_in_run = target as u64 - first_sample_of_run;
                let chunk = first_chunk + index_in_run / per_chunk;
                let index_in_chunk = index_in_run % per_chunk;

                let chunk_offset = *self.chunk_offsets.get(chunk as usize)?;
                let first_sample_of_chunk =
                    first_sample_of_run + (chunk - first_chunk) * per_chunk;

                let mut offset = chunk_offset;
                for i in 0..index_in_chunk {
                    offset += self.sample_size((first_sample_of_chunk + i) as u32 + 1)?;
                }
                debug_assert_eq!(first_sample_of_chunk + index_in_chunk, target as u64);
                return Some(offset);
            }

            first_sample_of_run += run_samples;
        }

        None
    }

    /// Parses an `stsz` body
    pub fn parse_stsz(&mut self, body: &[u8]) {
        if body.len() < 12 {
            return;
        }
        let sample_size = BigEndian::read_u32(&body[4..8]);
        let count = BigEndian::read_u32(&body[8..12]) as usize;
        self.uniform_sample_size = sample_size;
        if sample_size == 0 {
            let available = (body.len() - 12) / 4;
            self.sample_sizes = (0..count.min(available))
                .map(|i| BigEndian::read_u32(&body[12 + i * 4..]))
                .collect();
        } else {
            // Keep the count observable even with uniform sizes.
            self.sample_sizes = vec![sample_size; count];
        }
    }

    /// Parses an `stsc` body
    pub fn parse_stsc(&mut self, body: &[u8]) {
        if body.len() < 8 {
            return;
        }
        let count = BigEndian::read_u32(&body[4..8]) as usize;
        let available = (body.len() - 8) / 12;
        self.sample_to_chunk = (0..count.min(available))
            .map(|i| {
                let entry = &body[8 + i * 12..];
                (
                    BigEndian::read_u32(&entry[0..4]),
                    BigEndian::read_u32(&entry[4..8]),
                )
            })
            .collect();
    }

    /// Parses an `stco` (32-bit) or `co64` (64-bit) body
    pub fn parse_chunk_offsets(&mut self, body: &[u8], wide: bool) {
        if body.len() < 8 {
            return;
        }
        let count = BigEndian::read_u32(&body[4..8]) as usize;
        let width = if wide { 8 } else { 4 };
        let available = (body.len() - 8) / width;
        self.chunk_offsets = (0..count.min(available))
            .map(|i| {
                let entry = &body[8 + i * width..];
                if wide {
                    BigEndian::read_u64(&entry[0..8])
                } else {
                    BigEndian::read_u32(&entry[0..4]) as u64
                }
            })
            .collect();
    }

    /// Parses an `stss` body
    pub fn parse_stss(&mut self, body: &[u8]) {
        if body.len() < 8 {
            return;
        }
        let count = BigEndian::read_u32(&body[4..8]) as usize;
        let available = (body.len() - 8) / 4;
        self.sync_samples = (0..count.min(available))
            .map(|i| BigEndian::read_u32(&body[8 + i * 4..]))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_box_body(content: &[u8]) -> Vec<u8> {
        let mut body = vec![0, 0, 0, 0]; // version + flags
        body.extend_from_slice(content);
        body
    }

    fn table_with(sizes: &[u32], stsc: &[(u32, u32)], offsets: &[u64]) -> SampleTable {
        let mut table = SampleTable::default();

        let mut stsz = 0u32.to_be_bytes().to_vec(); // uniform size 0
        stsz.extend_from_slice(&(sizes.len() as u32).to_be_bytes());
        for s in sizes {
            stsz.extend_from_slice(&s.to_be_bytes());
        }
        table.parse_stsz(&full_box_body(&stsz));

        let mut stsc_body = (stsc.len() as u32).to_be_bytes().to_vec();
        for &(first, per) in stsc {
            stsc_body.extend_from_slice(&first.to_be_bytes());
            stsc_body.extend_from_slice(&per.to_be_bytes());
            stsc_body.extend_from_slice(&1u32.to_be_bytes()); // desc index
        }
        table.parse_stsc(&full_box_body(&stsc_body));

        let mut stco = (offsets.len() as u32).to_be_bytes().to_vec();
        for o in offsets {
            stco.extend_from_slice(&(*o as u32).to_be_bytes());
        }
        table.parse_chunk_offsets(&full_box_body(&stco), false);

        table
    }

    #[test]
    fn single_chunk_offsets() {
        let table = table_with(&[10, 20, 30], &[(1, 3)], &[1000]);
        assert_eq!(table.sample_offset(1), Some(1000));
        assert_eq!(table.sample_offset(2), Some(1010));
        assert_eq!(table.sample_offset(3), Some(1030));
        assert_eq!(table.sample_offset(4), None);
        assert_eq!(table.sample_size(2), Some(20));
    }

    #[test]
    fn multiple_chunk_runs() {
        // Two samples per chunk in the first run, one afterwards.
        let table = table_with(&[10, 10, 10, 10], &[(1, 2), (2, 1)], &[100, 300, 500]);
        assert_eq!(table.sample_offset(1), Some(100));
        assert_eq!(table.sample_offset(2), Some(110));
        assert_eq!(table.sample_offset(3), Some(300));
        assert_eq!(table.sample_offset(4), Some(500));
    }

    #[test]
    fn first_sample_prefers_sync_table() {
        let mut table = table_with(&[10, 20, 30], &[(1, 3)], &[0]);
        assert_eq!(table.first_sample_number(), 1);

        let mut stss = 1u32.to_be_bytes().to_vec();
        stss.extend_from_slice(&2u32.to_be_bytes());
        table.parse_stss(&full_box_body(&stss));
        assert_eq!(table.first_sample_number(), 2);
    }

    #[test]
    fn uniform_sizes() {
        let mut table = SampleTable::default();
        let mut stsz = 512u32.to_be_bytes().to_vec();
        stsz.extend_from_slice(&4u32.to_be_bytes());
        table.parse_stsz(&full_box_body(&stsz));
        assert_eq!(table.sample_size(1), Some(512));
        assert_eq!(table.sample_size(4), Some(512));
        assert_eq!(table.sample_count(), 4);
    }

    #[test]
    fn truncated_tables_are_clamped() {
        let mut table = SampleTable::default();
        let mut stsz = 0u32.to_be_bytes().to_vec();
        stsz.extend_from_slice(&100u32.to_be_bytes()); // claims 100 samples
        stsz.extend_from_slice(&7u32.to_be_bytes()); // only one present
        table.parse_stsz(&full_box_body(&stsz));
        assert_eq!(table.sample_sizes.len(), 1);
    }
}
