//! Byte order handling for TIFF files
//!
//! A TIFF declares its byte order in the first two bytes of the header. The
//! rest of the file (header fields, IFD entries and pixel samples) is read
//! through a [`ByteOrderHandler`] chosen from that marker.

use std::io::Result;

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian, ReadBytesExt};

use crate::errors::{FootprintError, FootprintResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::SampleType;

/// Byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> FootprintResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian),
            0x4D4D => Ok(ByteOrder::BigEndian),
            _ => Err(FootprintError::InvalidRaster(format!("invalid byte order marker {:#06x}", marker))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Reads multi-byte values in one byte order
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    /// Read an f32 value
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Decode the sample starting at `offset` in a decompressed block
    ///
    /// The caller guarantees that `offset + sample_type.size() <= block.len()`.
    fn sample_at(&self, block: &[u8], offset: usize, sample_type: SampleType) -> f64;

    /// Reverse horizontal differencing (TIFF predictor 2) in place
    ///
    /// `row_len` is the number of samples in one block row, `stride` the
    /// number of interleaved samples per pixel.
    fn undo_horizontal_predictor(&self, block: &mut [u8], sample_type: SampleType, row_len: usize, stride: usize);
}

fn sample_at<E: Endian>(block: &[u8], offset: usize, sample_type: SampleType) -> f64 {
    let bytes = &block[offset..offset + sample_type.size()];
    match sample_type {
        SampleType::U8 => bytes[0] as f64,
        SampleType::I8 => bytes[0] as i8 as f64,
        SampleType::U16 => E::read_u16(bytes) as f64,
        SampleType::I16 => E::read_i16(bytes) as f64,
        SampleType::U32 => E::read_u32(bytes) as f64,
        SampleType::I32 => E::read_i32(bytes) as f64,
        SampleType::F32 => E::read_f32(bytes) as f64,
        SampleType::F64 => E::read_f64(bytes),
    }
}

fn undo_horizontal_predictor<E: Endian>(block: &mut [u8], sample_type: SampleType, row_len: usize, stride: usize) {
    let size = sample_type.size();
    let row_bytes = row_len * size;
    if row_bytes == 0 {
        return;
    }

    for row in block.chunks_mut(row_bytes) {
        let samples = row.len() / size;
        for i in stride..samples {
            let (cur, prev) = (i * size, (i - stride) * size);
            match size {
                1 => row[cur] = row[cur].wrapping_add(row[prev]),
                2 => {
                    let v = E::read_u16(&row[cur..]).wrapping_add(E::read_u16(&row[prev..]));
                    E::write_u16(&mut row[cur..cur + 2], v);
                }
                4 => {
                    let v = E::read_u32(&row[cur..]).wrapping_add(E::read_u32(&row[prev..]));
                    E::write_u32(&mut row[cur..cur + 4], v);
                }
                _ => {
                    let v = E::read_u64(&row[cur..]).wrapping_add(E::read_u64(&row[prev..]));
                    E::write_u64(&mut row[cur..cur + 8], v);
                }
            }
        }
    }
}

macro_rules! byte_order_handler {
    ($name:ident, $endian:ty, $doc:expr) => {
        #[doc = $doc]
        pub struct $name;

        impl ByteOrderHandler for $name {
            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$endian>()
            }

            fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
                reader.read_u32::<$endian>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$endian>()
            }

            fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
                reader.read_f32::<$endian>()
            }

            fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
                reader.read_f64::<$endian>()
            }

            fn sample_at(&self, block: &[u8], offset: usize, sample_type: SampleType) -> f64 {
                sample_at::<$endian>(block, offset, sample_type)
            }

            fn undo_horizontal_predictor(&self, block: &mut [u8], sample_type: SampleType, row_len: usize, stride: usize) {
                undo_horizontal_predictor::<$endian>(block, sample_type, row_len, stride)
            }
        }
    };
}

byte_order_handler!(LittleEndianHandler, LittleEndian, "Little-endian byte order handler");
byte_order_handler!(BigEndianHandler, BigEndian, "Big-endian byte order handler");
