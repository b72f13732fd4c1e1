//! Record decoding seam
//!
//! The reader hands each packed record to a [`RecordDecoder`]. Numeric
//! unpacking of data records lives outside this crate; [`BasicDecoder`]
//! keeps data records packed and decodes station call letters.

use crate::constants::WORD_SIZE;
use crate::record::{DataRecord, StationRecord};
use crate::types::{Identifier, RecordKind};
use bytes::Bytes;
use std::fmt;

/// A packed record and its index metadata, as given to a decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRecord {
    /// 1-based record number
    pub record_number: usize,

    /// Record kind
    pub kind: RecordKind,

    /// Packed length in bytes
    pub size: u32,

    /// Packed bytes. Station records arrive with every 4-byte word reversed.
    pub bytes: Bytes,

    /// Reference date (data records)
    pub reference_date: Option<i32>,

    /// Identifier
    pub id: Option<Identifier>,

    /// Lead time in hours (data records)
    pub lead: Option<i32>,
}

/// Turns packed records into typed records
pub trait RecordDecoder {
    /// Output for data records
    type Data;

    /// Output for station call-letter records
    type Station;

    /// Decoding failure, reported to callers by its message
    type Error: fmt::Display;

    /// Decode a data record
    fn decode_data(&mut self, packed: PackedRecord) -> Result<Self::Data, Self::Error>;

    /// Decode a station record whose words have been byte-swapped
    fn decode_station(&mut self, packed: PackedRecord) -> Result<Self::Station, Self::Error>;
}

/// Errors from [`BasicDecoder`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A call-letter slot holds non-ASCII bytes
    #[error("Station call letters in slot {slot} are not ASCII")]
    InvalidCallLetters {
        /// 0-based slot within the record.
        slot: usize,
    },
}

/// Default decoder: data stays packed, station call letters are decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicDecoder;

impl RecordDecoder for BasicDecoder {
    type Data = DataRecord;
    type Station = StationRecord;
    type Error = DecodeError;

    fn decode_data(&mut self, packed: PackedRecord) -> Result<DataRecord, DecodeError> {
        Ok(DataRecord {
            record_number: packed.record_number,
            reference_date: packed.reference_date,
            id: packed.id,
            lead_time: packed.lead,
            packed: packed.bytes,
        })
    }

    fn decode_station(&mut self, packed: PackedRecord) -> Result<StationRecord, DecodeError> {
        StationRecord::from_packed(&swap_words(&packed.bytes))
    }
}

/// Reverse the bytes of every whole 4-byte word; a partial last word is kept
pub fn swap_words(bytes: &[u8]) -> Bytes {
    let mut out = bytes.to_vec();
    for word in out.chunks_exact_mut(WORD_SIZE) {
        word.reverse();
    }
    Bytes::from(out)
}
