//! Error types for TDLPACK indexing and access

/// Errors that can occur while indexing or reading a TDLPACK sequential file
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TdlpackError {
    /// IO error during read/seek
    #[error("IO error: {0}")]
    Io(String),

    /// Leading length marker holds a negative length
    #[error("Invalid frame length {length} at offset {offset}")]
    InvalidLength {
        /// Offset of the leading length marker.
        offset: u64,
        /// The length as read.
        length: i32,
    },

    /// Frame length exceeds the configured maximum
    #[error("Frame length {0} exceeds maximum {1}")]
    FrameTooLarge(u32, u32),

    /// Stream ended inside a frame
    #[error("Incomplete frame at offset {offset}: expected {expected} bytes, got {actual}")]
    IncompleteFrame {
        /// Offset of the leading length marker.
        offset: u64,
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Leading and trailing length markers disagree
    #[error("Corrupt frame at offset {offset}: leading length {leading}, trailing length {trailing}")]
    LengthMismatch {
        /// Offset of the leading length marker.
        offset: u64,
        /// Length from the leading marker.
        leading: u32,
        /// Length from the trailing marker.
        trailing: i32,
    },

    /// The record decoder rejected a record
    #[error("Record {record} could not be decoded: {message}")]
    Decoder {
        /// 1-based record number.
        record: usize,
        /// The decoder's error message.
        message: String,
    },

    /// Identifier text could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl TdlpackError {
    /// Whether this error means the file's framing is corrupt.
    ///
    /// Framing errors abort index construction.
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            TdlpackError::InvalidLength { .. }
                | TdlpackError::FrameTooLarge(..)
                | TdlpackError::IncompleteFrame { .. }
                | TdlpackError::LengthMismatch { .. }
        )
    }
}

impl From<std::io::Error> for TdlpackError {
    fn from(err: std::io::Error) -> Self {
        TdlpackError::Io(err.to_string())
    }
}
