//! Random access to indexed records
//!
//! Opening a file builds its [`FileIndex`] once. After that every record is
//! reached by seeking straight to its offset; nothing before it is re-read.
//!
//! # Example
//! ```no_run
//! use tdlpack_core::{Query, TdlpackReader};
//!
//! let mut reader = TdlpackReader::open("mos2000.sq")?;
//! println!("{} records, dates {:?}", reader.record_count(), reader.dates());
//!
//! for record in reader.fetch(&Query::new().date(2020010100).lead(6))? {
//!     println!("{:?}", record.kind());
//! }
//! # Ok::<(), tdlpack_core::TdlpackError>(())
//! ```

use crate::config::ReaderConfig;
use crate::decoder::{swap_words, BasicDecoder, PackedRecord, RecordDecoder};
use crate::error::TdlpackError;
use crate::frame::move_to;
use crate::index::build_index;
use crate::query::Query;
use crate::record::{Record, TrailerRecord};
use crate::types::{FileIndex, RecordKind};
use crate::Result;
use bytes::Bytes;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Record type produced by a reader using decoder `D`
pub type DecodedRecord<D> =
    Record<<D as RecordDecoder>::Data, <D as RecordDecoder>::Station>;

/// Reader over an indexed TDLPACK sequential file
///
/// The cursor counts records: 0 is before the first record, and after
/// reading record `n` it is `n`.
pub struct TdlpackReader<R, D = BasicDecoder> {
    inner: R,
    decoder: D,
    index: FileIndex,
    config: ReaderConfig,
    position: usize,
}

impl TdlpackReader<BufReader<File>> {
    /// Open and index a file with the default configuration and decoder
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ReaderConfig::default(), BasicDecoder)
    }
}

impl<D: RecordDecoder> TdlpackReader<BufReader<File>, D> {
    /// Open and index a file with a configuration and decoder
    pub fn open_with<P: AsRef<Path>>(path: P, config: ReaderConfig, decoder: D) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(feature = "logging")]
        info!("Opening {}", path.display());

        let file = File::open(path)?;
        Self::with_decoder(
            BufReader::with_capacity(config.buffer_capacity, file),
            decoder,
            config,
        )
    }
}

impl<R: Read + Seek> TdlpackReader<R> {
    /// Index an already open stream with the default decoder
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_decoder(reader, BasicDecoder, ReaderConfig::default())
    }
}

impl<R: Read + Seek, D: RecordDecoder> TdlpackReader<R, D> {
    /// Index an already open stream with a decoder
    ///
    /// Fails if any frame is corrupt; no reader exists for such a stream.
    pub fn with_decoder(mut reader: R, decoder: D, config: ReaderConfig) -> Result<Self> {
        let index = build_index(&mut reader, &config)?;
        Ok(Self {
            inner: reader,
            decoder,
            index,
            config,
            position: 0,
        })
    }

    /// The file index
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// The record decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Number of records in the file, trailers included
    pub fn record_count(&self) -> usize {
        self.index.len()
    }

    /// Distinct reference dates, ascending
    pub fn dates(&self) -> &[i32] {
        self.index.distinct_dates()
    }

    /// Distinct lead times, ascending
    pub fn lead_times(&self) -> &[i32] {
        self.index.distinct_leads()
    }

    /// Current cursor position in records
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Position the stream so the next read returns `record`
    ///
    /// `seek(0)` moves before the first record. Record numbers past the end
    /// leave the reader unchanged.
    pub fn seek(&mut self, record: usize) -> Result<()> {
        let target = if record == 0 {
            self.index.entries().first()
        } else {
            self.index.get(record)
        };

        let Some(entry) = target else {
            if record > 0 {
                #[cfg(feature = "logging")]
                warn!(
                    "Cannot seek to record {}: file holds {} records",
                    record,
                    self.index.len()
                );
            }
            return Ok(());
        };

        move_to(&mut self.inner, entry.offset, self.config.buffer_capacity as u64)?;
        self.position = record.saturating_sub(1);
        Ok(())
    }

    /// Move before the first record
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0)
    }

    /// Step the cursor back by one record
    pub fn backspace(&mut self) -> Result<()> {
        if self.position > 0 {
            self.seek(self.position)?;
        }
        Ok(())
    }

    /// Read up to `count` records following the cursor
    ///
    /// Stops early at the end of the file. The cursor ends on the last record
    /// read.
    ///
    /// If the decoder fails, the records of this call decoded so far are
    /// dropped and the error is returned. The cursor then rests on the last
    /// record that decoded, so a following `read` starts at the failed one.
    pub fn read(&mut self, count: usize) -> Result<Vec<DecodedRecord<D>>> {
        let mut records = Vec::new();
        if count == 0 {
            return Ok(records);
        }

        let first = self.position + 1;
        let last = self.position.saturating_add(count).min(self.index.len());

        if last < self.position.saturating_add(count) {
            #[cfg(feature = "logging")]
            debug!(
                "Read of {} records from {} truncated at record {}",
                count, first, last
            );
        }

        for number in first..=last {
            let record = self.read_record(number)?;
            self.position = number;
            records.push(record);
        }

        Ok(records)
    }

    /// Read record `record` (1-based)
    ///
    /// Out-of-range numbers log a warning and return `Ok(None)`.
    pub fn record(&mut self, record: usize) -> Result<Option<DecodedRecord<D>>> {
        if record == 0 {
            #[cfg(feature = "logging")]
            warn!("Record numbers begin at 1");

            return Ok(None);
        }
        if record > self.index.len() {
            #[cfg(feature = "logging")]
            warn!(
                "Record {} requested but file holds {} records",
                record,
                self.index.len()
            );

            return Ok(None);
        }

        self.seek(record)?;
        Ok(self.read(1)?.pop())
    }

    /// Read every record matching `query`, in file order
    pub fn fetch(&mut self, query: &Query) -> Result<Vec<DecodedRecord<D>>> {
        let numbers = query.matching_records(&self.index);

        #[cfg(feature = "logging")]
        debug!("Query {:?} matched {} records", query, numbers.len());

        let mut records = Vec::with_capacity(numbers.len());
        for number in numbers {
            if let Some(record) = self.record(number)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Read the station record linked to `record`, if it has one
    pub fn linked_station(&mut self, record: usize) -> Result<Option<DecodedRecord<D>>> {
        match self.index.linked_station(record) {
            Some(station) => self.record(station),
            None => Ok(None),
        }
    }

    /// Iterate over the records after the cursor
    pub fn iter(&mut self) -> Records<'_, R, D> {
        Records {
            reader: self,
            failed: false,
        }
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Close the reader, dropping the stream and index
    pub fn close(self) {
        #[cfg(feature = "logging")]
        debug!("Closing reader over {} records", self.index.len());
    }

    fn read_record(&mut self, record: usize) -> Result<DecodedRecord<D>> {
        let entry = &self.index.entries()[record - 1];

        move_to(&mut self.inner, entry.offset, self.config.buffer_capacity as u64)?;
        let mut buf = vec![0u8; entry.size as usize];
        self.inner.read_exact(&mut buf)?;

        let packed = |bytes: Bytes| PackedRecord {
            record_number: record,
            kind: entry.kind,
            size: entry.size,
            bytes,
            reference_date: entry.date,
            id: entry.id,
            lead: entry.lead,
        };

        let decoded = match entry.kind {
            RecordKind::Data => self
                .decoder
                .decode_data(packed(Bytes::from(buf)))
                .map(Record::Data),
            RecordKind::Station => self
                .decoder
                .decode_station(packed(swap_words(&buf)))
                .map(Record::Station),
            RecordKind::Trailer => Ok(Record::Trailer(TrailerRecord {
                record_number: record,
                size: entry.size,
            })),
        };

        decoded.map_err(|e| TdlpackError::Decoder {
            record,
            message: e.to_string(),
        })
    }
}

/// Forward-only iterator over a reader's remaining records
///
/// Created by [`TdlpackReader::iter()`]. Stops after the last record or the
/// first error.
pub struct Records<'a, R, D = BasicDecoder> {
    reader: &'a mut TdlpackReader<R, D>,
    failed: bool,
}

impl<'a, R: Read + Seek, D: RecordDecoder> Iterator for Records<'a, R, D> {
    type Item = Result<DecodedRecord<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.position >= self.reader.index.len() {
            return None;
        }

        match self.reader.read(1) {
            Ok(mut records) => records.pop().map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.reader.index.len().saturating_sub(self.reader.position);
        (0, Some(remaining))
    }
}
