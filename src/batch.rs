//! Building, marshaling, and unmarshaling of Kafka record batches.
//!
//! The record batch is the unit of production, fetching, and compression.
//! When producing, create a [`Builder`], add records to it, and pass the
//! built [`Batch`] to the producer. When fetching, call [`batches`] on the
//! record set bytes, unmarshal each batch individually, then iterate
//! [`Batch::records`] and unmarshal records as late as possible; passing
//! batches around is much cheaper than passing individual records.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::compression::{self, Compressor, Decompressor};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::varint;

/// Record batch format this library speaks. Magic 0 and 1 are the legacy
/// message formats and are rejected.
pub const MAGIC: i8 = 2;

/// Bytes counted by the BatchLength field beyond the records payload:
/// everything from PartitionLeaderEpoch through NumRecords.
pub const BATCH_LENGTH_OVERHEAD: i32 = 49;

/// Offset of the Attributes field from the start of a marshaled batch.
/// The CRC is computed over everything from here on.
const CRC_SPAN_START: usize = 21;

/// Offset of the CRC field itself.
const CRC_FIELD_START: usize = 17;

/// Size of a marshaled batch header, BaseOffset through NumRecords.
const HEADER_LEN: usize = 61;

/// Timestamp type bit in batch attributes.
pub const TIMESTAMP_CREATE: i16 = 0b0000;
pub const TIMESTAMP_LOG_APPEND: i16 = 0b1000;

fn unix_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}

/// Accumulates records for a batch. There is no limit on the number of
/// records (up to the user). Not safe for concurrent use.
#[derive(Debug)]
pub struct Builder {
    t: SystemTime,
    records: Vec<Record>,
}

impl Builder {
    /// The time passed here becomes the batch FirstTimestamp.
    pub fn new(now: SystemTime) -> Builder {
        Builder {
            t: now,
            records: Vec::new(),
        }
    }

    /// Add a record. Records are kept after [`Builder::build`], so more can
    /// be added and build called again.
    pub fn add(&mut self, record: Record) -> &mut Builder {
        self.records.push(record);
        self
    }

    pub fn add_records(&mut self, records: impl IntoIterator<Item = Record>) -> &mut Builder {
        self.records.extend(records);
        self
    }

    /// Add one record per value, with no key.
    pub fn add_strings(&mut self, values: &[&str]) -> &mut Builder {
        for v in values {
            self.records.push(Record::new(b"", v.as_bytes()));
        }
        self
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Build a record batch: marshal the records and fill in the batch
    /// header. Each record gets its index as the OffsetDelta. Returns
    /// [`Error::EmptyBatch`] when no records have been added. Marshaled
    /// records are not compressed (call [`Batch::compress`]). FirstTimestamp
    /// is the builder's creation time, MaxTimestamp the time passed here.
    /// Repeated builds are permitted and deterministic for the same `now`.
    pub fn build(&mut self, now: SystemTime) -> Result<Batch> {
        if self.records.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let mut body = Vec::with_capacity(64);
        let mut out = Vec::new();
        for (i, r) in self.records.iter_mut().enumerate() {
            r.offset_delta = i as i64;
            r.marshal_into(&mut body, &mut out);
        }
        let n = self.records.len();
        Ok(Batch {
            base_offset: 0,
            batch_length: BATCH_LENGTH_OVERHEAD + out.len() as i32,
            partition_leader_epoch: 0,
            magic: MAGIC,
            crc: 0,
            attributes: compression::NONE,
            last_offset_delta: (n - 1) as i32,
            first_timestamp: unix_millis(self.t),
            max_timestamp: unix_millis(now),
            producer_id: -1,
            producer_epoch: -1,
            base_sequence: 0,
            num_records: n as i32,
            marshaled_records: Bytes::from(out),
        })
    }
}

/// A Kafka record batch in wire layout. Not safe for concurrent use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub base_offset: i64,
    /// Counts the bytes after this field.
    pub batch_length: i32,
    pub partition_leader_epoch: i32,
    /// Must be 2.
    pub magic: i8,
    /// CRC32-Castagnoli over everything after this field. Stamped by
    /// [`Batch::marshal`], zeroed by compress and decompress.
    pub crc: u32,
    /// Low 3 bits are the compression codec, bit 3 the timestamp type.
    pub attributes: i16,
    /// NumRecords - 1.
    pub last_offset_delta: i32,
    /// Milliseconds since epoch.
    pub first_timestamp: i64,
    pub max_timestamp: i64,
    /// -1 unless transactional (which this library is not).
    pub producer_id: i64,
    pub producer_epoch: i16,
    pub base_sequence: i32,
    pub num_records: i32,
    /// Marshaled (and possibly compressed) records. Not part of the header;
    /// shares the backing of the buffer the batch was unmarshaled from.
    pub marshaled_records: Bytes,
}

impl Batch {
    /// Parse a batch and verify its checksum. Returns
    /// [`Error::UnsupportedMagic`] for legacy formats and
    /// [`Error::CorruptedBatch`] when the CRC does not match; in the latter
    /// case there is no way to tell how many records the batch carried.
    pub fn unmarshal(b: &Bytes) -> Result<Batch> {
        if b.len() < HEADER_LEN {
            return Err(Error::Protocol("record batch too small".into()));
        }
        let mut header = b.clone();
        let base_offset = header.get_i64();
        let batch_length = header.get_i32();
        let partition_leader_epoch = header.get_i32();
        let magic = header.get_i8();
        if magic != MAGIC {
            return Err(Error::UnsupportedMagic(magic));
        }
        let crc = header.get_u32();
        let computed = crc32c::crc32c(&b[CRC_SPAN_START..]);
        if computed != crc {
            warn!(stored = crc, computed, "batch crc mismatch");
            return Err(Error::CorruptedBatch);
        }
        Ok(Batch {
            base_offset,
            batch_length,
            partition_leader_epoch,
            magic,
            crc,
            attributes: header.get_i16(),
            last_offset_delta: header.get_i32(),
            first_timestamp: header.get_i64(),
            max_timestamp: header.get_i64(),
            producer_id: header.get_i64(),
            producer_epoch: header.get_i16(),
            base_sequence: header.get_i32(),
            num_records: header.get_i32(),
            marshaled_records: b.slice(HEADER_LEN..),
        })
    }

    /// `attributes & 0b111`.
    pub fn compression_type(&self) -> i16 {
        self.attributes & 0b111
    }

    /// `attributes & 0b1000`, either [`TIMESTAMP_CREATE`] or
    /// [`TIMESTAMP_LOG_APPEND`].
    pub fn timestamp_type(&self) -> i16 {
        self.attributes & 0b1000
    }

    pub fn last_offset(&self) -> i64 {
        self.base_offset + i64::from(self.last_offset_delta)
    }

    /// Marshal the batch header and append the marshaled records. Computes
    /// the CRC over the produced bytes and stamps it into both the output
    /// and `self.crc`; otherwise leaves the batch untouched. Compress, if
    /// wanted, must happen before marshal.
    pub fn marshal(&mut self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.marshaled_records.len());
        buf.put_i64(self.base_offset);
        buf.put_i32(self.batch_length);
        buf.put_i32(self.partition_leader_epoch);
        buf.put_i8(self.magic);
        buf.put_u32(self.crc);
        buf.put_i16(self.attributes);
        buf.put_i32(self.last_offset_delta);
        buf.put_i64(self.first_timestamp);
        buf.put_i64(self.max_timestamp);
        buf.put_i64(self.producer_id);
        buf.put_i16(self.producer_epoch);
        buf.put_i32(self.base_sequence);
        buf.put_i32(self.num_records);
        buf.extend_from_slice(&self.marshaled_records);
        let crc = crc32c::crc32c(&buf[CRC_SPAN_START..]);
        self.crc = crc;
        buf[CRC_FIELD_START..CRC_SPAN_START].copy_from_slice(&crc.to_be_bytes());
        buf.freeze()
    }

    /// Compress the records payload. Mutates the batch on success only:
    /// replaces the payload, resets the batch length, stamps the codec into
    /// the attributes, and invalidates the CRC. Call before marshal. Not
    /// idempotent.
    pub fn compress(&mut self, c: &dyn Compressor) -> Result<()> {
        let compressed = c
            .compress(&self.marshaled_records)
            .map_err(|e| Error::Protocol(format!("error compressing batch records: {}", e)))?;
        self.batch_length = BATCH_LENGTH_OVERHEAD + compressed.len() as i32;
        self.attributes = c.codec();
        self.crc = 0;
        self.marshaled_records = Bytes::from(compressed);
        Ok(())
    }

    /// Decompress the records payload. Mutates the batch: replaces the
    /// payload, resets the batch length, clears the attributes, and
    /// invalidates the CRC. Call after unmarshal and before records. Not
    /// idempotent.
    pub fn decompress(&mut self, d: &dyn Decompressor) -> Result<()> {
        let decompressed = d
            .decompress(&self.marshaled_records)
            .map_err(|e| Error::Protocol(format!("error decompressing record batch: {}", e)))?;
        self.batch_length = BATCH_LENGTH_OVERHEAD + decompressed.len() as i32;
        self.attributes = compression::NONE;
        self.crc = 0;
        self.marshaled_records = Bytes::from(decompressed);
        Ok(())
    }

    /// Individual record byte slices, split on each record's leading length
    /// varint. Decompress first if the batch is compressed. The slices
    /// share the payload's backing.
    pub fn records(&self) -> Vec<Bytes> {
        let mut records = Vec::with_capacity(self.num_records.max(0) as usize);
        let mut pos = 0usize;
        while pos < self.marshaled_records.len() {
            let (len, n) = varint::decode_zigzag(&self.marshaled_records[pos..]);
            if n == 0 || len < 0 {
                break;
            }
            let end = pos + n + len as usize;
            if end > self.marshaled_records.len() {
                break;
            }
            records.push(self.marshaled_records.slice(pos..end));
            pos = end;
        }
        records
    }
}

/// Split a record set into its batches. Fetch responses carry record sets
/// of one or more concatenated batches; because Kafka limits response byte
/// sizes, the last batch may be truncated, in which case it is discarded
/// without error. The returned slices share the record set's backing.
pub fn batches(record_set: &Bytes) -> Vec<Bytes> {
    let mut out = Vec::new();
    let mut b = record_set.clone();
    loop {
        if b.len() < 12 {
            break;
        }
        let length = i32::from_be_bytes([b[8], b[9], b[10], b[11]]);
        if length < 0 {
            break;
        }
        let n = length as usize + 12;
        if b.len() < n {
            break; // incomplete trailing batch
        }
        out.push(b.slice(..n));
        b.advance(n);
    }
    out
}
