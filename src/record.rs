//! Marshaling and unmarshaling of individual Kafka records.
//!
//! A record is varint-framed: its total body length leads, then the body.
//! Attributes ride as one raw byte; the remaining integer fields are
//! ZigZag varints. A single Produce request can
//! carry thousands of records, so the marshal path writes into
//! caller-provided buffers instead of allocating per record.

use crate::error::{Error, Result};
use crate::varint;

/// A single key/value message inside a record batch.
///
/// `key_len` and `value_len` carry the wire lengths independently of the
/// buffers: a null key or value read off the wire has length -1 and an
/// empty buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Total body length as read off the wire. Set by [`Record::unmarshal`].
    pub len: i64,
    pub attributes: i8,
    /// Relative to the batch FirstTimestamp. Always written as 0: all
    /// records in a built batch appear produced at the batch timestamp.
    pub timestamp_delta: i64,
    /// Relative to the batch BaseOffset. The builder assigns the record's
    /// index within the batch.
    pub offset_delta: i64,
    pub key_len: i64,
    pub key: Vec<u8>,
    pub value_len: i64,
    pub value: Vec<u8>,
}

impl Record {
    /// Record with lengths taken from the slices. An absent key is length
    /// 0; to write a wire null set `key_len` or `value_len` to -1.
    pub fn new(key: &[u8], value: &[u8]) -> Record {
        Record {
            key_len: key.len() as i64,
            key: key.to_vec(),
            value_len: value.len() as i64,
            value: value.to_vec(),
            ..Record::default()
        }
    }

    /// Marshal into `out` using `body` as scratch. Both buffers grow as
    /// needed; reusing them across records avoids per-record allocation.
    pub fn marshal_into(&self, body: &mut Vec<u8>, out: &mut Vec<u8>) {
        body.clear();
        body.push(self.attributes as u8);
        varint::put_zigzag(body, self.timestamp_delta);
        varint::put_zigzag(body, self.offset_delta);
        varint::put_zigzag(body, self.key_len);
        body.extend_from_slice(&self.key);
        varint::put_zigzag(body, self.value_len);
        body.extend_from_slice(&self.value);
        varint::put_zigzag(body, 0); // no headers
        varint::put_zigzag(out, body.len() as i64);
        out.extend_from_slice(body);
    }

    /// Allocating convenience around [`Record::marshal_into`].
    pub fn marshal(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(32 + self.key.len() + self.value.len());
        let mut out = Vec::with_capacity(body.capacity() + varint::MAX_VARINT_LEN);
        self.marshal_into(&mut body, &mut out);
        out
    }

    /// Parse one record from the front of `b`. Headers are parsed and
    /// skipped; this library never populates them.
    pub fn unmarshal(b: &[u8]) -> Result<Record> {
        let mut r = Record::default();
        let mut pos = 0usize;

        let (len, n) = varint::decode_zigzag(b);
        if n == 0 {
            return Err(Error::Protocol("error reading record length".into()));
        }
        r.len = len;
        pos += n;

        let Some(&attributes) = b.get(pos) else {
            return Err(Error::Protocol("error reading record attributes".into()));
        };
        r.attributes = attributes as i8;
        pos += 1;

        let (timestamp_delta, n) = varint::decode_zigzag(&b[pos..]);
        if n == 0 {
            return Err(Error::Protocol("error reading record timestamp delta".into()));
        }
        r.timestamp_delta = timestamp_delta;
        pos += n;

        let (offset_delta, n) = varint::decode_zigzag(&b[pos..]);
        if n == 0 {
            return Err(Error::Protocol("error reading record offset delta".into()));
        }
        r.offset_delta = offset_delta;
        pos += n;

        let (key, n) = read_framed(&b[pos..], "key")?;
        r.key_len = key.0;
        r.key = key.1;
        pos += n;

        let (value, n) = read_framed(&b[pos..], "value")?;
        r.value_len = value.0;
        r.value = value.1;
        pos += n;

        skip_headers(&b[pos..])?;
        Ok(r)
    }
}

/// Read a varint length followed by that many bytes. Length -1 means null.
fn read_framed(b: &[u8], what: &str) -> Result<((i64, Vec<u8>), usize)> {
    let (len, n) = varint::decode_zigzag(b);
    if n == 0 {
        return Err(Error::Protocol(format!("error reading record {} length", what)));
    }
    if len < 1 {
        return Ok(((len, Vec::new()), n));
    }
    let len_usize = len as usize;
    let Some(body) = b.get(n..n + len_usize) else {
        return Err(Error::Protocol(format!("error reading record {} body", what)));
    };
    Ok(((len, body.to_vec()), n + len_usize))
}

fn skip_headers(b: &[u8]) -> Result<()> {
    let (count, n) = varint::decode_zigzag(b);
    if n == 0 {
        return Err(Error::Protocol("error reading record header count".into()));
    }
    let mut pos = n;
    for _ in 0..count.max(0) {
        for what in ["header key", "header value"] {
            let (len, n) = varint::decode_zigzag(&b[pos..]);
            if n == 0 {
                return Err(Error::Protocol(format!("error reading record {}", what)));
            }
            pos += n;
            if len > 0 {
                if b.len() < pos + len as usize {
                    return Err(Error::Protocol(format!("error reading record {}", what)));
                }
                pos += len as usize;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marshal_round_trip() {
        let tests: &[(Record, &[u8], &[u8])] = &[
            (Record::new(b"", b"m1"), b"", b"m1"),
            (Record::new(b"foo", b"m1"), b"foo", b"m1"),
            (Record::new(b"", b""), b"", b""),
            (Record::new(b"key", b""), b"key", b""),
        ];
        for (r, key, value) in tests {
            let b = r.marshal();
            let back = Record::unmarshal(&b).unwrap();
            assert_eq!(back.key, *key);
            assert_eq!(back.value, *value);
            assert_eq!(back.key_len, key.len() as i64);
            assert_eq!(back.value_len, value.len() as i64);
            assert_eq!(back.attributes, r.attributes);
        }
    }

    #[test]
    fn test_marshal_into_matches_marshal() {
        let r = Record::new(b"k", b"some value");
        let mut body = Vec::new();
        let mut out = Vec::new();
        r.marshal_into(&mut body, &mut out);
        assert_eq!(out, r.marshal());

        // reusing the buffers appends a second record
        let r2 = Record::new(b"", b"other");
        r2.marshal_into(&mut body, &mut out);
        assert!(out.starts_with(&r.marshal()));
        assert!(out.ends_with(&r2.marshal()));
    }

    #[test]
    fn test_attributes_round_trip() {
        // -1 and 64 would go wrong if attributes were varint-framed: -1
        // zigzags to 0x01 and 64 zigzags to a two byte encoding
        for attributes in [-1i8, 1, 64, i8::MIN, i8::MAX] {
            let mut r = Record::new(b"k", b"some value");
            r.attributes = attributes;
            r.timestamp_delta = 7;
            r.offset_delta = 3;
            let back = Record::unmarshal(&r.marshal()).unwrap();
            assert_eq!(back.attributes, attributes);
            // the fields after attributes must survive too
            assert_eq!(back.timestamp_delta, 7);
            assert_eq!(back.offset_delta, 3);
            assert_eq!(back.key, b"k");
            assert_eq!(back.value, b"some value");
        }
    }

    #[test]
    fn test_null_key_and_value() {
        let r = Record {
            key_len: -1,
            value_len: -1,
            ..Record::default()
        };
        let b = r.marshal();
        let back = Record::unmarshal(&b).unwrap();
        assert_eq!(back.key_len, -1);
        assert_eq!(back.value_len, -1);
        assert!(back.key.is_empty());
        assert!(back.value.is_empty());
    }

    #[test]
    fn test_unmarshal_fixture() {
        // single record with a null key and the value "m3" at offset delta 2,
        // as produced by a live kafka 1.0 broker
        let b = base64_decode("EAAABAEEbTMA");
        let r = Record::unmarshal(&b).unwrap();
        assert_eq!(r.value, b"m3");
        assert_eq!(r.key_len, -1);
        assert_eq!(r.offset_delta, 2);
        assert_eq!(r.len, 8);
    }

    #[test]
    fn test_large_value_round_trip() {
        let value = vec![0xABu8; 100_000];
        let r = Record::new(b"", &value);
        let back = Record::unmarshal(&r.marshal()).unwrap();
        assert_eq!(back.value, value);
        assert_eq!(back.value_len, 100_000);
    }

    #[test]
    fn test_unmarshal_truncated() {
        let b = Record::new(b"key", b"value").marshal();
        assert!(Record::unmarshal(&b[..b.len() - 3]).is_err());
        assert!(Record::unmarshal(&[]).is_err());
    }

    fn base64_decode(s: &str) -> Vec<u8> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.decode(s).unwrap()
    }
}
