//! Constants and limits for the TDLPACK sequential file format

/// Size of the big-endian length marker on either side of a frame payload
pub const LENGTH_MARKER_SIZE: usize = 4;

/// Size of one format word (4-byte big-endian signed integer)
pub const WORD_SIZE: usize = 4;

/// Number of leading payload bytes needed to classify and index a record
pub const CLASSIFY_WINDOW: usize = 44;

/// Payload prefix before the packed record: one unused word plus the
/// record octet count
pub const RECORD_PREFIX_LEN: usize = 2 * WORD_SIZE;

/// Tag identifying a data record, as read from payload word 2.
///
/// The tag is read low byte first, so the `b"TDLP"` bytes that open every
/// packed TDLPACK data record read as `PLDT`.
pub const DATA_TAG: &[u8; 4] = b"PLDT";

/// Bytes opening a packed TDLPACK data record on disk
pub const DATA_MARKER: &[u8; 4] = b"TDLP";

/// Record octet count of a trailer record
pub const TRAILER_OCTETS: i32 = 24;

/// Value of payload word 6 in a trailer record
pub const TRAILER_SENTINEL: i32 = 9999;

/// Synthetic identifier given to station call-letter records
pub const STATION_ID: [i32; 4] = [400001000, 0, 0, 0];

/// Identifier slot value that matches anything in a query
pub const ID_WILDCARD: i32 = -1;

/// Width of one station call-letter slot in bytes
pub const CALL_LETTERS_WIDTH: usize = 8;

/// Largest packed record the format produces, in words (ND5)
pub const MAX_RECORD_WORDS: u32 = 5_242_880;

/// Default ceiling on a frame's payload length
pub const MAX_FRAME_LEN: u32 = MAX_RECORD_WORDS * WORD_SIZE as u32 + RECORD_PREFIX_LEN as u32;

/// Default read buffer for files opened by path (64 KiB)
///
/// Also the longest gap crossed by reading forward instead of seeking.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Number of decimal digits of identifier word 3 that carry the lead time
pub const LEAD_TIME_DIGITS: usize = 3;
