//! # Tdlpack Core
//!
//! Indexing and random access for TDLPACK sequential files (Fortran
//! unformatted files holding MOS-2000 gridded and station records).
//!
//! ## Modules
//!
//! - `constants`: Format constants and limits
//! - `config`: Reader configuration
//! - `types`: Index types (IndexEntry, FileIndex, RecordKind, Identifier)
//! - `frame`: Length-marker frame reading
//! - `classifier`: Record kind and metadata from a frame's leading bytes
//! - `index`: Single-pass index construction
//! - `record`: Typed records and the call-letter codec
//! - `decoder`: Record decoder seam
//! - `reader`: Random access, sequential iteration and lookups
//! - `query`: Lookup criteria and matching
//! - `encoder`: In-memory frame encoding

#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod index;
pub mod query;
pub mod reader;
pub mod record;
pub mod types;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use decoder::{BasicDecoder, PackedRecord, RecordDecoder};
pub use error::TdlpackError;
pub use query::{IdPattern, IdSlot, Query};
pub use reader::{DecodedRecord, Records, TdlpackReader};
pub use record::{DataRecord, Record, StationRecord, TrailerRecord};
pub use types::{FileIndex, Identifier, IndexEntry, IndexStats, RecordKind};

/// Result type alias for TDLPACK operations
pub type Result<T> = core::result::Result<T, TdlpackError>;
