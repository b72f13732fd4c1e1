//! Record classification from a frame's leading payload bytes
//!
//! The window is read as 4-byte big-endian words numbered from the start of
//! the payload. Word 1 holds the packed record's octet count and the packed
//! record itself starts at word 2.

use crate::constants::{
    DATA_TAG, LEAD_TIME_DIGITS, RECORD_PREFIX_LEN, TRAILER_OCTETS, TRAILER_SENTINEL, WORD_SIZE,
};
use crate::types::{Identifier, RecordKind};

#[cfg(feature = "logging")]
use tracing::warn;

/// Indexing fields extracted from a classification window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMeta {
    /// Record kind
    pub kind: RecordKind,

    /// Packed record length, bounded by the frame
    pub size: u32,

    /// Reference date (data records)
    pub date: Option<i32>,

    /// Lead time in hours (data records)
    pub lead: Option<i32>,

    /// Identifier (data and station records)
    pub id: Option<Identifier>,
}

/// Classify a record from up to 44 leading payload bytes
///
/// Rules, first match wins:
/// 1. word 2 reads as the tag `PLDT`: data record
/// 2. word 1 is 24 and word 6 is 9999: trailer record
/// 3. anything else: station call-letter record
///
/// Words past the end of `window` are treated as absent, so short frames
/// never match a rule that needs them.
///
/// Word 2 is compared with its bytes reversed, so a packed record that starts
/// with the text `TDLP` is the one that reads as `PLDT`. The trailer rule
/// tests the packed octet count in word 1, not the frame length: a 24-byte
/// frame has no word 6, while a trailer's packed record is 24 octets long
/// inside a 32-byte frame.
pub fn classify(window: &[u8], frame_len: u32) -> RecordMeta {
    let word = |index: usize| read_word(window, index);
    let size = record_size(word(1), frame_len);

    if word(2).map(tag_of).as_ref() == Some(DATA_TAG) {
        let id = match (word(7), word(8), word(9), word(10)) {
            (Some(a), Some(b), Some(c), Some(d)) => Some(Identifier::new(a, b, c, d)),
            _ => None,
        };
        return RecordMeta {
            kind: RecordKind::Data,
            size,
            date: word(6),
            lead: word(9).map(lead_time),
            id,
        };
    }

    if word(1) == Some(TRAILER_OCTETS) && word(6) == Some(TRAILER_SENTINEL) {
        return RecordMeta {
            kind: RecordKind::Trailer,
            size,
            date: None,
            lead: None,
            id: None,
        };
    }

    RecordMeta {
        kind: RecordKind::Station,
        size,
        date: None,
        lead: None,
        id: Some(Identifier::STATION),
    }
}

/// Read word `index` of `window` as a big-endian signed integer
pub fn read_word(window: &[u8], index: usize) -> Option<i32> {
    let start = index * WORD_SIZE;
    let bytes = window.get(start..start + WORD_SIZE)?;
    Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Characters of a word read low byte first
pub fn tag_of(word: i32) -> [u8; 4] {
    word.to_le_bytes()
}

/// Lead time carried in the last three decimal digits of an identifier word
///
/// `1234006` gives `6`. The digits are taken from the decimal text, so a
/// short negative word keeps its sign (`-5` gives `-5`).
pub fn lead_time(word: i32) -> i32 {
    let digits = word.to_string();
    let tail = &digits[digits.len().saturating_sub(LEAD_TIME_DIGITS)..];
    tail.parse().unwrap_or(0)
}

/// Packed record length from the declared octet count, kept inside the frame
fn record_size(octets: Option<i32>, frame_len: u32) -> u32 {
    let capacity = frame_len.saturating_sub(RECORD_PREFIX_LEN as u32);
    match octets {
        Some(n) if n >= 0 && n as u32 <= capacity => n as u32,
        Some(_n) => {
            #[cfg(feature = "logging")]
            warn!(
                "Record octet count {} does not fit frame of {} bytes, using {}",
                _n, frame_len, capacity
            );
            capacity
        }
        None => capacity,
    }
}
