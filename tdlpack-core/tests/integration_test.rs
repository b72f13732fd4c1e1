//! Integration tests for the complete open → index → seek/read → fetch flow

use std::cell::Cell;
use std::fs;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;
use tempfile::tempdir;

use tdlpack_core::{
    constants::DEFAULT_BUFFER_CAPACITY,
    encoder::{encode_station_record, encode_trailer_record, DataRecordBuilder},
    BasicDecoder, IdPattern, Identifier, PackedRecord, Query, ReaderConfig, RecordDecoder,
    RecordKind, StationRecord, TdlpackError, TdlpackReader,
};

/// Station catalog, one data record, trailer
fn three_record_file() -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend_from_slice(&encode_station_record(&StationRecord::new([
        "KBWI", "KDCA", "KIAD",
    ])));
    stream.extend_from_slice(
        &DataRecordBuilder::new(2020010100, [204320008, 705, 1234006, 0])
            .body(vec![0x5Au8; 120])
            .build_frame(),
    );
    stream.extend_from_slice(&encode_trailer_record());
    stream
}

/// Two station blocks of forecasts for several dates and leads
fn forecast_file() -> Vec<u8> {
    let mut stream = Vec::new();
    for (stations, date) in [(["KBWI", "KDCA"], 2020010100), (["KJFK", "KLGA"], 2020010112)] {
        stream.extend_from_slice(&encode_station_record(&StationRecord::new(stations)));
        for lead in [6, 12, 24] {
            for variable in [204320008, 223000008] {
                stream.extend_from_slice(
                    &DataRecordBuilder::new(date, [variable, 705, 1234000 + lead, 0])
                        .body(vec![lead as u8; 32])
                        .build_frame(),
                );
            }
        }
        stream.extend_from_slice(&encode_trailer_record());
    }
    stream
}

#[test]
fn test_three_record_file() {
    let td = tempdir().unwrap();
    let path = td.path().join("three.sq");
    fs::write(&path, three_record_file()).unwrap();

    let mut reader = TdlpackReader::open(&path).unwrap();

    assert_eq!(reader.record_count(), 3);
    assert_eq!(reader.dates(), &[2020010100]);
    assert_eq!(reader.lead_times(), &[6]);

    let found = reader.fetch(&Query::new().date(2020010100)).unwrap();
    assert_eq!(found.len(), 1);
    let data = found[0].as_data().unwrap();
    assert_eq!(data.record_number, 2);
    assert_eq!(data.id, Some(Identifier::new(204320008, 705, 1234006, 0)));
    assert_eq!(data.packed.len(), 36 + 120);

    let first = reader.record(1).unwrap().unwrap();
    assert_eq!(
        first.as_station().unwrap().call_letters,
        vec!["KBWI", "KDCA", "KIAD"]
    );

    let last = reader.record(3).unwrap().unwrap();
    assert!(last.is_trailer());

    reader.close();
}

#[test]
fn test_out_of_range_is_soft() {
    let mut reader =
        TdlpackReader::from_reader(Cursor::new(three_record_file())).unwrap();

    assert!(reader.record(0).unwrap().is_none());
    assert!(reader.record(4).unwrap().is_none());

    // The reader keeps working afterwards
    assert_eq!(reader.record(2).unwrap().unwrap().kind(), RecordKind::Data);
}

#[test]
fn test_corrupt_file_fails_to_open() {
    let td = tempdir().unwrap();
    let path = td.path().join("corrupt.sq");

    let mut data = three_record_file();
    // Trailing marker of the station frame: payload is 8 + 24 bytes
    data[4 + 32 + 3] = 0x7F;
    fs::write(&path, data).unwrap();

    let err = TdlpackReader::open(&path).err().unwrap();
    assert!(err.is_framing_error());
    assert!(matches!(err, TdlpackError::LengthMismatch { offset: 0, .. }));
}

#[test]
fn test_truncated_file_fails_to_open() {
    let mut data = three_record_file();
    data.truncate(data.len() - 2);

    let result = TdlpackReader::from_reader(Cursor::new(data));
    assert!(matches!(
        result.err(),
        Some(TdlpackError::IncompleteFrame { .. })
    ));
}

#[test]
fn test_missing_file() {
    let td = tempdir().unwrap();
    let result = TdlpackReader::open(td.path().join("absent.sq"));
    assert!(matches!(result.err(), Some(TdlpackError::Io(_))));
}

#[test]
fn test_forecast_file_queries() {
    let td = tempdir().unwrap();
    let path = td.path().join("forecasts.sq");
    fs::write(&path, forecast_file()).unwrap();

    let config = ReaderConfig::new().buffer_capacity(8 * 1024);
    let mut reader = TdlpackReader::open_with(&path, config, BasicDecoder).unwrap();

    // 2 x (station + 6 data + trailer)
    assert_eq!(reader.record_count(), 16);
    assert_eq!(reader.dates(), &[2020010100, 2020010112]);
    assert_eq!(reader.lead_times(), &[6, 12, 24]);

    let stats = reader.index().stats();
    assert_eq!(stats.data_records, 12);
    assert_eq!(stats.station_records, 2);
    assert_eq!(stats.trailer_records, 2);

    let by_lead = reader.fetch(&Query::new().lead(12)).unwrap();
    let numbers: Vec<_> = by_lead
        .iter()
        .filter_map(|r| r.as_data().map(|d| d.record_number))
        .collect();
    assert_eq!(numbers, vec![4, 5, 12, 13]);

    let query = Query::new()
        .date(2020010112)
        .id([223000008, -1, -1, -1])
        .lead(24);
    let hits = query.matching_records(reader.index());
    assert_eq!(hits, vec![15]);

    // Data records after the second catalog link to it
    let station = reader.linked_station(15).unwrap().unwrap();
    assert_eq!(
        station.as_station().unwrap().call_letters,
        vec!["KJFK", "KLGA"]
    );
}

#[test]
fn test_wildcard_id_with_date_equals_date_alone() {
    let mut reader = TdlpackReader::from_reader(Cursor::new(forecast_file())).unwrap();

    let by_date = reader.fetch(&Query::new().date(2020010100)).unwrap();
    let with_wildcards = reader
        .fetch(&Query::new().date(2020010100).id(IdPattern::ANY))
        .unwrap();

    assert_eq!(by_date.len(), 6);
    assert_eq!(by_date, with_wildcards);
}

#[test]
fn test_string_identifier_query() {
    let mut reader = TdlpackReader::from_reader(Cursor::new(forecast_file())).unwrap();

    let pattern: IdPattern = "204320008 705 -1 0".parse().unwrap();
    let found = reader.fetch(&Query::new().id(pattern)).unwrap();
    assert_eq!(found.len(), 6);
    assert!(found
        .iter()
        .all(|r| r.as_data().and_then(|d| d.id).map(|id| id.words()[0]) == Some(204320008)));
}

#[test]
fn test_sequential_iteration_covers_every_record() {
    let mut reader = TdlpackReader::from_reader(Cursor::new(forecast_file())).unwrap();

    let kinds: Vec<_> = reader.iter().map(|r| r.unwrap().kind()).collect();
    assert_eq!(kinds.len(), 16);
    assert_eq!(kinds[0], RecordKind::Station);
    assert_eq!(kinds[7], RecordKind::Trailer);
    assert_eq!(reader.tell(), 16);

    // Exhausted until repositioned
    assert!(reader.iter().next().is_none());
    reader.seek(15).unwrap();
    assert_eq!(reader.iter().count(), 2);
}

/// Decoder that only reports what the reader handed it
struct Recorder {
    seen: Vec<(usize, RecordKind, Vec<u8>)>,
}

impl RecordDecoder for Recorder {
    type Data = Option<i32>;
    type Station = usize;
    type Error = String;

    fn decode_data(&mut self, packed: PackedRecord) -> Result<Option<i32>, String> {
        self.seen
            .push((packed.record_number, packed.kind, packed.bytes.to_vec()));
        Ok(packed.reference_date)
    }

    fn decode_station(&mut self, packed: PackedRecord) -> Result<usize, String> {
        self.seen
            .push((packed.record_number, packed.kind, packed.bytes.to_vec()));
        Ok(packed.size as usize)
    }
}

#[test]
fn test_custom_decoder_inputs() {
    let mut reader = TdlpackReader::with_decoder(
        Cursor::new(three_record_file()),
        Recorder { seen: Vec::new() },
        ReaderConfig::default(),
    )
    .unwrap();

    let records = reader.read(3).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].as_station(), Some(&24));
    assert_eq!(records[1].as_data(), Some(&Some(2020010100)));
    assert!(records[2].is_trailer());

    let reader_parts = reader.into_inner();
    assert_eq!(reader_parts.get_ref().len(), three_record_file().len());
}

#[test]
fn test_station_bytes_arrive_word_swapped() {
    let mut reader = TdlpackReader::with_decoder(
        Cursor::new(three_record_file()),
        Recorder { seen: Vec::new() },
        ReaderConfig::default(),
    )
    .unwrap();

    reader.record(1).unwrap();
    reader.record(2).unwrap();

    let decoder_view = &reader.decoder().seen;
    assert_eq!(decoder_view[0].1, RecordKind::Station);
    assert_eq!(&decoder_view[0].2[..8], b"IWBK    ");
    assert_eq!(decoder_view[1].1, RecordKind::Data);
    assert_eq!(&decoder_view[1].2[..4], b"TDLP");
}

#[test]
fn test_empty_file() {
    let td = tempdir().unwrap();
    let path = td.path().join("empty.sq");
    fs::write(&path, b"").unwrap();

    let mut reader = TdlpackReader::open(&path).unwrap();

    assert_eq!(reader.record_count(), 0);
    assert!(reader.dates().is_empty());
    assert!(reader.lead_times().is_empty());
    assert_eq!(reader.record(1).unwrap(), None);

    reader.seek(0).unwrap();
    assert_eq!(reader.tell(), 0);

    assert!(reader.read(5).unwrap().is_empty());
    assert_eq!(reader.iter().count(), 0);
    assert!(reader.fetch(&Query::new().date(2020010100)).unwrap().is_empty());
    assert!(reader.fetch(&Query::new().id(IdPattern::ANY)).unwrap().is_empty());
}

/// Stream that tallies every byte handed out by `read`
struct CountingReader {
    inner: Cursor<Vec<u8>>,
    pulled: Rc<Cell<u64>>,
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pulled.set(self.pulled.get() + n as u64);
        Ok(n)
    }
}

impl Seek for CountingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_buffered_reads_stay_proportional_to_file() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&encode_station_record(&StationRecord::new(["KBWI"])));
    for i in 0..2000 {
        stream.extend_from_slice(
            &DataRecordBuilder::new(2020010100, [204320008, 705, 1234000 + i % 48, 0])
                .body(vec![0xA5u8; 200])
                .build_frame(),
        );
    }
    let file_len = stream.len() as u64;

    let pulled = Rc::new(Cell::new(0u64));
    let counting = CountingReader {
        inner: Cursor::new(stream),
        pulled: Rc::clone(&pulled),
    };
    let mut reader = TdlpackReader::with_decoder(
        BufReader::with_capacity(DEFAULT_BUFFER_CAPACITY, counting),
        BasicDecoder,
        ReaderConfig::default(),
    )
    .unwrap();

    assert_eq!(reader.record_count(), 2001);
    let after_index = pulled.get();
    assert!(
        after_index <= 2 * file_len,
        "indexing pulled {} bytes for a {} byte file",
        after_index,
        file_len
    );

    let mut seen = 0;
    for record in reader.iter() {
        record.unwrap();
        seen += 1;
    }
    assert_eq!(seen, 2001);
    let after_iter = pulled.get();
    assert!(
        after_iter <= 4 * file_len,
        "indexing and iterating pulled {} bytes for a {} byte file",
        after_iter,
        file_len
    );

    let found = reader.fetch(&Query::new().date(2020010100)).unwrap();
    assert_eq!(found.len(), 2000);
    assert!(pulled.get() <= 6 * file_len);
}
