//! Frame reading
//!
//! A frame is `[length L][L payload bytes][length L]` with both lengths as
//! 4-byte big-endian integers. Only the first [`CLASSIFY_WINDOW`] bytes of a
//! payload are read here; the rest is skipped.

use crate::config::ReaderConfig;
use crate::constants::{CLASSIFY_WINDOW, LENGTH_MARKER_SIZE};
use crate::error::TdlpackError;
use bytes::Bytes;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

#[cfg(feature = "logging")]
use tracing::warn;

/// A frame located in the stream, carrying its classification window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Byte offset of the leading length marker
    pub offset: u64,

    /// Payload length from the length markers
    pub len: u32,

    /// First `min(len, 44)` payload bytes
    pub window: Bytes,
}

impl RawFrame {
    /// Byte offset of the first payload byte
    pub fn payload_offset(&self) -> u64 {
        self.offset + LENGTH_MARKER_SIZE as u64
    }

    /// Size of the whole frame, both length markers included
    pub fn total_size(&self) -> u64 {
        self.len as u64 + 2 * LENGTH_MARKER_SIZE as u64
    }
}

/// Read one frame starting at the current stream position
///
/// Returns `Ok(None)` when fewer than 4 bytes remain, which is the normal end
/// of the file. Any failure after a full leading marker has been read is a
/// framing error:
/// - negative length
/// - length above `config.max_frame_len`
/// - stream ends inside the payload or trailing marker
/// - trailing length differs from leading length
///
/// On success the stream is left just past the trailing marker.
pub fn read_frame<R: Read + Seek>(
    reader: &mut R,
    config: &ReaderConfig,
) -> Result<Option<RawFrame>, TdlpackError> {
    let offset = reader.stream_position()?;

    let mut marker = [0u8; LENGTH_MARKER_SIZE];
    let got = read_full(reader, &mut marker)?;
    if got < LENGTH_MARKER_SIZE {
        if got > 0 {
            #[cfg(feature = "logging")]
            warn!("Ignoring {} trailing bytes at offset {}", got, offset);
        }
        return Ok(None);
    }

    let length = i32::from_be_bytes(marker);
    if length < 0 {
        return Err(TdlpackError::InvalidLength { offset, length });
    }
    let len = length as u32;
    if len > config.max_frame_len {
        return Err(TdlpackError::FrameTooLarge(len, config.max_frame_len));
    }

    // Classification window
    let window_len = (len as usize).min(CLASSIFY_WINDOW);
    let mut window = vec![0u8; window_len];
    let got = read_full(reader, &mut window)?;
    if got < window_len {
        return Err(TdlpackError::IncompleteFrame {
            offset,
            expected: window_len,
            actual: got,
        });
    }

    // Skip the rest of the payload
    let remaining = (len as usize - window_len) as u64;
    skip(reader, remaining, config.buffer_capacity as u64)?;

    // Seeking past the end succeeds, so truncation shows up here
    let mut trailer = [0u8; LENGTH_MARKER_SIZE];
    let got = read_full(reader, &mut trailer)?;
    if got < LENGTH_MARKER_SIZE {
        return Err(TdlpackError::IncompleteFrame {
            offset,
            expected: LENGTH_MARKER_SIZE,
            actual: got,
        });
    }

    let trailing = i32::from_be_bytes(trailer);
    if trailing != length {
        return Err(TdlpackError::LengthMismatch {
            offset,
            leading: len,
            trailing,
        });
    }

    Ok(Some(RawFrame {
        offset,
        len,
        window: Bytes::from(window),
    }))
}

/// Advance the stream by `n` bytes
///
/// Gaps of at most `read_limit` bytes are read and dropped, so a buffered
/// stream keeps its buffer. Longer gaps are seeked over.
pub(crate) fn skip<R: Read + Seek>(reader: &mut R, n: u64, read_limit: u64) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    if n <= read_limit {
        io::copy(&mut reader.by_ref().take(n), &mut io::sink())?;
    } else {
        reader.seek(SeekFrom::Current(n as i64))?;
    }
    Ok(())
}

/// Position the stream at byte `target`, reading forward over short gaps
pub(crate) fn move_to<R: Read + Seek>(
    reader: &mut R,
    target: u64,
    read_limit: u64,
) -> io::Result<()> {
    let here = reader.stream_position()?;
    if target >= here {
        skip(reader, target - here, read_limit)
    } else {
        reader.seek(SeekFrom::Start(target)).map(|_| ())
    }
}

/// Fill `buf` as far as the stream allows, returning the number of bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
