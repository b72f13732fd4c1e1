//! In-memory frame encoding
//!
//! Builds byte images of TDLPACK sequential records, for fixtures, benches
//! and fuzz seeds. Nothing here touches the filesystem.

use crate::constants::{DATA_MARKER, TRAILER_OCTETS, TRAILER_SENTINEL, WORD_SIZE};
use crate::record::StationRecord;
use crate::types::Identifier;
use bytes::{BufMut, Bytes, BytesMut};

/// Wrap a payload in leading and trailing big-endian length markers
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let len = payload.len() as u32;
    let mut buf = BytesMut::with_capacity(payload.len() + 8);
    buf.put_u32(len);
    buf.put_slice(payload);
    buf.put_u32(len);
    buf.freeze()
}

/// Frame a packed record behind the record prefix (unused word + octet count)
pub fn encode_record(packed: &[u8]) -> Bytes {
    let mut payload = BytesMut::with_capacity(packed.len() + 2 * WORD_SIZE);
    payload.put_u32(0);
    payload.put_u32(packed.len() as u32);
    payload.put_slice(packed);
    encode_frame(&payload)
}

/// Frame a station call-letter record
pub fn encode_station_record(station: &StationRecord) -> Bytes {
    encode_record(&station.to_packed())
}

/// Frame a trailer record
pub fn encode_trailer_record() -> Bytes {
    let mut packed = BytesMut::with_capacity(TRAILER_OCTETS as usize);
    for word in [0, 0, 0, 0, TRAILER_SENTINEL, 0] {
        packed.put_i32(word);
    }
    encode_record(&packed)
}

/// Builder for packed data records
///
/// Layout of the packed record:
/// 1. `TDLP` marker
/// 2. Packed length, then two zero words
/// 3. Reference date
/// 4. Identifier (4 words)
/// 5. Body (the remaining packed sections, opaque here)
#[derive(Debug, Clone)]
pub struct DataRecordBuilder {
    reference_date: i32,
    id: Identifier,
    body: Bytes,
}

impl DataRecordBuilder {
    /// Create a new builder for the given date and identifier
    pub fn new(reference_date: i32, id: impl Into<Identifier>) -> Self {
        Self {
            reference_date,
            id: id.into(),
            body: Bytes::new(),
        }
    }

    /// Set the opaque body following the identifier
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the packed record
    pub fn build(self) -> Bytes {
        let len = 9 * WORD_SIZE + self.body.len();
        let mut buf = BytesMut::with_capacity(len);
        buf.put_slice(DATA_MARKER);
        buf.put_u32(len as u32);
        buf.put_u32(0);
        buf.put_u32(0);
        buf.put_i32(self.reference_date);
        for word in self.id.words() {
            buf.put_i32(word);
        }
        buf.put_slice(&self.body);
        buf.freeze()
    }

    /// Build the record wrapped in its frame
    pub fn build_frame(self) -> Bytes {
        encode_record(&self.build())
    }
}
