//! Record batch compression codecs.
//!
//! The batch codec never compresses on its own; the caller supplies a
//! [`Compressor`] or [`Decompressor`] identified by its Kafka codec id.
//! [`Nop`] handles uncompressed batches and [`Gzip`] is provided because it
//! needs nothing beyond flate2. Snappy, LZ4 and Zstd ids are defined here
//! but their implementations are up to the library user.

use std::io::Read;

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;

use crate::error::{Error, Result};

/// Codec ids as they appear in the low 3 bits of batch attributes.
pub const NONE: i16 = 0;
pub const GZIP: i16 = 1;
pub const SNAPPY: i16 = 2;
pub const LZ4: i16 = 3;
pub const ZSTD: i16 = 4;

/// Compresses a marshaled records payload.
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
    /// Codec id stamped into the batch attributes.
    fn codec(&self) -> i16;
}

/// Decompresses a marshaled records payload.
pub trait Decompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn codec(&self) -> i16;
}

/// Passthrough codec for uncompressed batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nop;

impl Compressor for Nop {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn codec(&self) -> i16 {
        NONE
    }
}

impl Decompressor for Nop {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn codec(&self) -> i16 {
        NONE
    }
}

/// Gzip codec backed by flate2.
#[derive(Debug, Clone, Copy)]
pub struct Gzip {
    level: Compression,
}

impl Gzip {
    pub fn new() -> Gzip {
        Gzip {
            level: Compression::default(),
        }
    }

    pub fn with_level(level: u32) -> Gzip {
        Gzip {
            level: Compression::new(level),
        }
    }
}

impl Default for Gzip {
    fn default() -> Self {
        Gzip::new()
    }
}

impl Compressor for Gzip {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(data, self.level);
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(|e| Error::Protocol(format!("gzip compression failed: {}", e)))?;
        Ok(compressed)
    }

    fn codec(&self) -> i16 {
        GZIP
    }
}

impl Decompressor for Gzip {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| Error::Protocol(format!("gzip decompression failed: {}", e)))?;
        Ok(decompressed)
    }

    fn codec(&self) -> i16 {
        GZIP
    }
}
