//! Typed records returned by the reader

use crate::constants::CALL_LETTERS_WIDTH;
use crate::decoder::DecodeError;
use crate::types::{Identifier, RecordKind};
use bytes::{BufMut, Bytes, BytesMut};

/// A record read from the file
///
/// `D` and `S` are the outputs of the [`RecordDecoder`](crate::decoder::RecordDecoder)
/// used by the reader; with the default decoder they are [`DataRecord`]
/// and [`StationRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Record<D = DataRecord, S = StationRecord> {
    /// Decoded data record
    Data(D),
    /// Decoded station call-letter record
    Station(S),
    /// Trailer marker
    Trailer(TrailerRecord),
}

impl<D, S> Record<D, S> {
    /// Kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Data(_) => RecordKind::Data,
            Record::Station(_) => RecordKind::Station,
            Record::Trailer(_) => RecordKind::Trailer,
        }
    }

    /// Get the data record, if this is one
    pub fn as_data(&self) -> Option<&D> {
        match self {
            Record::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Get the station record, if this is one
    pub fn as_station(&self) -> Option<&S> {
        match self {
            Record::Station(station) => Some(station),
            _ => None,
        }
    }

    /// Check if this is a trailer
    pub fn is_trailer(&self) -> bool {
        matches!(self, Record::Trailer(_))
    }
}

/// A data record with its index metadata and still-packed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// 1-based record number in the file
    pub record_number: usize,

    /// Reference date in YYYYMMDDHH form
    pub reference_date: Option<i32>,

    /// MOS-2000 identifier
    pub id: Option<Identifier>,

    /// Lead time in hours
    pub lead_time: Option<i32>,

    /// Packed TDLPACK record bytes
    pub packed: Bytes,
}

/// Station call letters, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRecord {
    /// Call letters with padding removed
    pub call_letters: Vec<String>,
}

impl StationRecord {
    /// Create a station record from call letters
    pub fn new<I, T>(call_letters: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            call_letters: call_letters.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of stations
    pub fn number_of_stations(&self) -> usize {
        self.call_letters.len()
    }

    /// Decode call letters from 8-byte, space-padded ASCII slots
    ///
    /// A partial slot at the end is ignored.
    pub fn from_packed(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut call_letters = Vec::with_capacity(bytes.len() / CALL_LETTERS_WIDTH);
        for (slot, chunk) in bytes.chunks_exact(CALL_LETTERS_WIDTH).enumerate() {
            if !chunk.is_ascii() {
                return Err(DecodeError::InvalidCallLetters { slot });
            }
            let text: String = chunk.iter().map(|&b| b as char).collect();
            call_letters.push(text.trim_end_matches([' ', '\0']).to_string());
        }
        Ok(Self { call_letters })
    }

    /// Encode call letters into 8-byte, space-padded slots
    ///
    /// Longer call letters are truncated to the slot width.
    pub fn to_packed(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.call_letters.len() * CALL_LETTERS_WIDTH);
        for call in &self.call_letters {
            let bytes = call.as_bytes();
            let n = bytes.len().min(CALL_LETTERS_WIDTH);
            buf.put_slice(&bytes[..n]);
            buf.put_bytes(b' ', CALL_LETTERS_WIDTH - n);
        }
        buf.freeze()
    }
}

/// Marker for a trailer record; its payload is not interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerRecord {
    /// 1-based record number in the file
    pub record_number: usize,

    /// Packed length in bytes
    pub size: u32,
}
