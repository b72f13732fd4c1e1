//! Core types for the TDLPACK file index

use crate::constants::STATION_ID;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of record carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Packed TDLPACK data record (gridded or station values)
    Data,
    /// Station call-letter catalog
    Station,
    /// Trailer marking a logical boundary in the file
    Trailer,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Data => "data",
            RecordKind::Station => "station",
            RecordKind::Trailer => "trailer",
        };
        f.write_str(name)
    }
}

/// The 4-part MOS-2000 identifier of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(pub [i32; 4]);

impl Identifier {
    /// Identifier shared by all station call-letter records
    pub const STATION: Identifier = Identifier(STATION_ID);

    /// Create an identifier from its four words
    pub const fn new(id1: i32, id2: i32, id3: i32, id4: i32) -> Self {
        Self([id1, id2, id3, id4])
    }

    /// Get the four words
    pub const fn words(&self) -> [i32; 4] {
        self.0
    }

    /// Get one word by slot (0..4)
    pub fn slot(&self, slot: usize) -> Option<i32> {
        self.0.get(slot).copied()
    }
}

impl From<[i32; 4]> for Identifier {
    fn from(words: [i32; 4]) -> Self {
        Self(words)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{:09} {:09} {:09} {:010}", a, b, c, d)
    }
}

/// Index metadata for one frame of the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Byte offset of the packed record (after the length marker and record prefix)
    pub offset: u64,

    /// Length of the packed record in bytes
    pub size: u32,

    /// Byte offset of the frame's leading length marker
    pub frame_offset: u64,

    /// Payload length from the frame's length markers
    pub frame_len: u32,

    /// Record kind
    pub kind: RecordKind,

    /// Reference date (data records only)
    pub date: Option<i32>,

    /// Lead time in hours (data records only)
    pub lead: Option<i32>,

    /// Record identifier (absent for trailers)
    pub id: Option<Identifier>,

    /// Record number of the most recent preceding station record, 0 if none
    pub linked_station_record: usize,
}

/// Per-kind tallies for a built index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of data records
    pub data_records: usize,

    /// Number of station call-letter records
    pub station_records: usize,

    /// Number of trailer records
    pub trailer_records: usize,

    /// Bytes covered by the indexed frames, markers included
    pub bytes_indexed: u64,
}

impl IndexStats {
    /// Total number of records of all kinds
    pub fn total(&self) -> usize {
        self.data_records + self.station_records + self.trailer_records
    }
}

/// Ordered index of every record in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndex {
    entries: Vec<IndexEntry>,
    dates: Vec<i32>,
    leads: Vec<i32>,
    stats: IndexStats,
}

impl FileIndex {
    /// Build the index and its derived views from scanned entries
    pub(crate) fn from_entries(entries: Vec<IndexEntry>, bytes_indexed: u64) -> Self {
        let dates: BTreeSet<i32> = entries.iter().filter_map(|e| e.date).collect();
        let leads: BTreeSet<i32> = entries.iter().filter_map(|e| e.lead).collect();

        let mut stats = IndexStats {
            bytes_indexed,
            ..Default::default()
        };
        for entry in &entries {
            match entry.kind {
                RecordKind::Data => stats.data_records += 1,
                RecordKind::Station => stats.station_records += 1,
                RecordKind::Trailer => stats.trailer_records += 1,
            }
        }

        Self {
            entries,
            dates: dates.into_iter().collect(),
            leads: leads.into_iter().collect(),
            stats,
        }
    }

    /// Number of records in the file
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the file holds no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry for a 1-based record number
    pub fn get(&self, record: usize) -> Option<&IndexEntry> {
        record.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// All entries in file order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Iterate over entries in file order
    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }

    /// Distinct reference dates, ascending
    pub fn distinct_dates(&self) -> &[i32] {
        &self.dates
    }

    /// Distinct lead times, ascending
    pub fn distinct_leads(&self) -> &[i32] {
        &self.leads
    }

    /// Per-kind record tallies
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Record number of the station record linked to `record`, if any
    pub fn linked_station(&self, record: usize) -> Option<usize> {
        self.get(record)
            .map(|e| e.linked_station_record)
            .filter(|&n| n > 0)
    }
}

impl<'a> IntoIterator for &'a FileIndex {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
