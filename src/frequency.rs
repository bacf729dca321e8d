use std::collections::BTreeMap;
use std::io::{self, BufRead};

/// Occurrence count of every byte seen in the input.
///
/// Ordered by byte value so tree construction sees the leaves in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Count every byte of a stream until it is exhausted.
    /// Returns the table and the number of bytes read.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<(Self, u64)> {
        let mut table = Self::new();
        let mut total = 0u64;
        loop {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            let len = chunk.len();
            table.update(chunk);
            reader.consume(len);
            total += len as u64;
        }
        Ok((table, total))
    }

    pub fn update(&mut self, data: &[u8]) {
        for &b in data {
            *self.counts.entry(b).or_insert(0) += 1;
        }
    }

    pub fn get(&self, byte: u8) -> Option<u64> {
        self.counts.get(&byte).copied()
    }

    /// Number of distinct bytes seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `(byte, count)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&b, &c)| (b, c))
    }
}
