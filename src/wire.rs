//! Kafka wire format primitives.
//!
//! The Kafka protocol is large and evolving, so request and response
//! bodies are not serialized by hand. Each body is declared with the
//! [`wire_struct!`] macro, which emits the struct plus [`WireWrite`] and
//! [`WireRead`] impls that walk the fields in declared order. Adding a new
//! API is a small data declaration, not a new block of serialization code.
//!
//! The closed set of wire kinds:
//!
//! * `i8`/`i16`/`i32`/`i64`/`u32` are big-endian fixed width
//! * `bool` is one byte, zero or non-zero
//! * `String` is an i16 length plus UTF-8 bytes; empty is written as
//!   length 0, a null (-1 length) reads back as empty
//! * `Bytes` is an i32 length plus raw bytes; null reads back as empty
//! * `Vec<T>` is an i32 count plus elements; null reads back as empty
//!
//! Fields that exist in memory but not on the wire simply do not appear in
//! the declaration (the record batch codec handles its own payload field).

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Decoder for reading Kafka protocol primitives off a response body.
pub struct Decoder<'a> {
    buf: &'a mut Bytes,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a mut Bytes) -> Self {
        Self { buf }
    }

    /// Bytes left in the body.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn check(&self, n: usize, kind: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(Error::Protocol(format!("error reading {}", kind)));
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.check(1, "bool")?;
        Ok(self.buf.get_u8() != 0)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.check(1, "i8")?;
        Ok(self.buf.get_i8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.check(2, "i16")?;
        Ok(self.buf.get_i16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.check(4, "i32")?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.check(8, "i64")?;
        Ok(self.buf.get_i64())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.check(4, "u32")?;
        Ok(self.buf.get_u32())
    }

    /// Read an i16 length-prefixed string. A length of -1 (null) reads as
    /// an empty string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self
            .read_i16()
            .map_err(|_| Error::Protocol("error reading string length".into()))?;
        if len < 0 {
            return Ok(String::new());
        }
        let len = len as usize;
        self.check(len, "string body")?;
        let bytes = self.buf.copy_to_bytes(len);
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Protocol(format!("invalid utf-8 in string: {}", e)))
    }

    /// Read an i32 length-prefixed byte sequence. A length of -1 (null)
    /// reads as empty. The returned `Bytes` shares the response backing.
    pub fn read_bytes(&mut self) -> Result<Bytes> {
        let len = self
            .read_i32()
            .map_err(|_| Error::Protocol("error reading bytes length".into()))?;
        if len < 0 {
            return Ok(Bytes::new());
        }
        let len = len as usize;
        self.check(len, "bytes body")?;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Read an i32 array count. A count of -1 (null) reads as 0.
    pub fn read_array_len(&mut self) -> Result<usize> {
        let len = self
            .read_i32()
            .map_err(|_| Error::Protocol("error reading array length".into()))?;
        Ok(if len < 0 { 0 } else { len as usize })
    }
}

/// Encoder for writing Kafka protocol primitives into a request buffer.
pub struct Encoder<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.put_u8(u8::from(v));
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    /// An empty string is written with length 0, not as a null.
    pub fn write_string(&mut self, v: &str) {
        self.write_i16(v.len() as i16);
        self.buf.put_slice(v.as_bytes());
    }

    pub fn write_bytes(&mut self, v: &[u8]) {
        self.write_i32(v.len() as i32);
        self.buf.put_slice(v);
    }

    pub fn write_array_len(&mut self, len: usize) {
        self.write_i32(len as i32);
    }
}

/// Serialize self in Kafka wire order.
pub trait WireWrite {
    fn write(&self, e: &mut Encoder<'_>);
}

/// Deserialize self from Kafka wire order.
pub trait WireRead: Sized {
    fn read(d: &mut Decoder<'_>) -> Result<Self>;
}

macro_rules! wire_primitive {
    ($ty:ty, $write:ident, $read:ident) => {
        impl WireWrite for $ty {
            fn write(&self, e: &mut Encoder<'_>) {
                e.$write(*self);
            }
        }
        impl WireRead for $ty {
            fn read(d: &mut Decoder<'_>) -> Result<Self> {
                d.$read()
            }
        }
    };
}

wire_primitive!(bool, write_bool, read_bool);
wire_primitive!(i8, write_i8, read_i8);
wire_primitive!(i16, write_i16, read_i16);
wire_primitive!(i32, write_i32, read_i32);
wire_primitive!(i64, write_i64, read_i64);
wire_primitive!(u32, write_u32, read_u32);

impl WireWrite for String {
    fn write(&self, e: &mut Encoder<'_>) {
        e.write_string(self);
    }
}

impl WireRead for String {
    fn read(d: &mut Decoder<'_>) -> Result<Self> {
        d.read_string()
    }
}

impl WireWrite for Bytes {
    fn write(&self, e: &mut Encoder<'_>) {
        e.write_bytes(self);
    }
}

impl WireRead for Bytes {
    fn read(d: &mut Decoder<'_>) -> Result<Self> {
        d.read_bytes()
    }
}

impl<T: WireWrite> WireWrite for Vec<T> {
    fn write(&self, e: &mut Encoder<'_>) {
        e.write_array_len(self.len());
        for item in self {
            item.write(e);
        }
    }
}

impl<T: WireRead> WireRead for Vec<T> {
    fn read(d: &mut Decoder<'_>) -> Result<Self> {
        let len = d.read_array_len()?;
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(T::read(d)?);
        }
        Ok(items)
    }
}

/// Empty body, used by requests whose schema has no fields.
impl WireWrite for () {
    fn write(&self, _e: &mut Encoder<'_>) {}
}

impl WireRead for () {
    fn read(_d: &mut Decoder<'_>) -> Result<Self> {
        Ok(())
    }
}

/// Declare a wire struct: the fields, in wire order, and nothing else.
/// Emits the struct plus `WireWrite` and `WireRead` impls.
macro_rules! wire_struct {
    ($(#[$meta:meta])* pub struct $name:ident {
        $($(#[$fmeta:meta])* pub $field:ident : $ty:ty,)*
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl $crate::wire::WireWrite for $name {
            fn write(&self, e: &mut $crate::wire::Encoder<'_>) {
                $($crate::wire::WireWrite::write(&self.$field, e);)*
            }
        }

        impl $crate::wire::WireRead for $name {
            fn read(d: &mut $crate::wire::Decoder<'_>) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: $crate::wire::WireRead::read(d)?,)*
                })
            }
        }
    };
}

pub(crate) use wire_struct;

/// Serialize a value into a fresh buffer.
pub fn to_bytes<T: WireWrite>(v: &T) -> Bytes {
    let mut buf = BytesMut::new();
    let mut e = Encoder::new(&mut buf);
    v.write(&mut e);
    buf.freeze()
}

/// Deserialize a value, ignoring any trailing bytes.
pub fn from_bytes<T: WireRead>(mut b: Bytes) -> Result<T> {
    let mut d = Decoder::new(&mut b);
    T::read(&mut d)
}

#[cfg(test)]
mod tests {
    use super::*;

    wire_struct! {
        pub struct Inner {
            pub id: i32,
            pub tags: Vec<i32>,
        }
    }

    wire_struct! {
        pub struct Outer {
            pub name: String,
            pub flag: bool,
            pub small: i8,
            pub medium: i16,
            pub big: i64,
            pub checksum: u32,
            pub payload: Bytes,
            pub inners: Vec<Inner>,
        }
    }

    #[test]
    fn test_struct_round_trip() {
        let v = Outer {
            name: "hello".to_string(),
            flag: true,
            small: -3,
            medium: 260,
            big: -1,
            checksum: 0xDEADBEEF,
            payload: Bytes::from_static(b"xyz"),
            inners: vec![
                Inner {
                    id: 1,
                    tags: vec![5, 6],
                },
                Inner {
                    id: 2,
                    tags: vec![],
                },
            ],
        };
        let b = to_bytes(&v);
        let back: Outer = from_bytes(b).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn test_primitives_big_endian() {
        let b = to_bytes(&0x0102_0304i32);
        assert_eq!(&b[..], &[1, 2, 3, 4]);
        let b = to_bytes(&0x0102i16);
        assert_eq!(&b[..], &[1, 2]);
    }

    #[test]
    fn test_empty_string_written_as_zero_length() {
        let b = to_bytes(&String::new());
        assert_eq!(&b[..], &[0, 0]);
    }

    #[test]
    fn test_null_string_reads_as_empty() {
        let mut b = Bytes::from_static(&[0xFF, 0xFF]);
        let mut d = Decoder::new(&mut b);
        assert_eq!(d.read_string().unwrap(), "");
    }

    #[test]
    fn test_null_bytes_and_array_read_as_empty() {
        let mut b = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let mut d = Decoder::new(&mut b);
        assert_eq!(d.read_bytes().unwrap(), Bytes::new());

        let b = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let v: Vec<i32> = from_bytes(b).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_short_read_reports_kind() {
        let b = Bytes::from_static(&[0, 0]);
        let err = from_bytes::<i32>(b).unwrap_err();
        assert!(err.to_string().contains("error reading i32"));

        // string length says 5 but only 2 bytes follow
        let b = Bytes::from_static(&[0, 5, b'a', b'b']);
        let err = from_bytes::<String>(b).unwrap_err();
        assert!(err.to_string().contains("string body"));
    }

    #[test]
    fn test_bool_encoding() {
        let b = to_bytes(&true);
        assert_eq!(&b[..], &[1]);
        let mut raw = Bytes::from_static(&[7]);
        let mut d = Decoder::new(&mut raw);
        assert!(d.read_bool().unwrap());
    }
}
