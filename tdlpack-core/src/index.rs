//! Single-pass index construction

use crate::classifier::classify;
use crate::config::ReaderConfig;
use crate::constants::RECORD_PREFIX_LEN;
use crate::error::TdlpackError;
use crate::frame::read_frame;
use crate::types::{FileIndex, IndexEntry, RecordKind};
use std::io::{Read, Seek, SeekFrom};

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Index every frame of a stream
///
/// This function:
/// 1. Rewinds to byte 0 and reads frames until fewer than 4 bytes remain
/// 2. Classifies each frame from its leading 44 payload bytes
/// 3. Links every entry to the most recent station record before it
/// 4. Rewinds to byte 0 again and computes the derived views
///
/// Any framing error aborts the scan and is returned as is.
pub fn build_index<R: Read + Seek>(
    reader: &mut R,
    config: &ReaderConfig,
) -> Result<FileIndex, TdlpackError> {
    let start = reader.seek(SeekFrom::Start(0))?;

    #[cfg(feature = "logging")]
    debug!("Starting index scan at offset {}", start);

    let mut entries: Vec<IndexEntry> = Vec::new();
    let mut last_station_record = 0;
    let mut bytes_indexed = 0u64;

    loop {
        let frame = match read_frame(reader, config) {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!("Index scan aborted after {} records: {}", entries.len(), e);

                return Err(e);
            }
        };

        let meta = classify(&frame.window, frame.len);
        let prefix = (RECORD_PREFIX_LEN as u32).min(frame.len);

        entries.push(IndexEntry {
            offset: frame.payload_offset() + prefix as u64,
            size: meta.size,
            frame_offset: frame.offset,
            frame_len: frame.len,
            kind: meta.kind,
            date: meta.date,
            lead: meta.lead,
            id: meta.id,
            linked_station_record: last_station_record,
        });
        bytes_indexed += frame.total_size();

        let record = entries.len();

        #[cfg(feature = "logging")]
        debug!(
            "Record {}: {} at offset {} ({} bytes)",
            record, meta.kind, frame.offset, frame.len
        );

        if meta.kind == RecordKind::Station {
            last_station_record = record;
        }
    }

    reader.seek(SeekFrom::Start(start))?;

    let index = FileIndex::from_entries(entries, bytes_indexed);

    #[cfg(feature = "logging")]
    info!(
        "Indexed {} records ({} data, {} station, {} trailer) over {} bytes",
        index.len(),
        index.stats().data_records,
        index.stats().station_records,
        index.stats().trailer_records,
        index.stats().bytes_indexed
    );

    Ok(index)
}
