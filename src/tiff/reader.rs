//! TIFF file reader implementation
//!
//! Parses the header, walks the IFD chain and decodes tag values. The byte
//! order found in the header selects the [`ByteOrderHandler`] used for every
//! later read, so the same code serves little- and big-endian files.

use std::collections::HashSet;
use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::ReadBytesExt;
use log::{debug, warn};

use crate::errors::{FootprintError, FootprintResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header, tag_name};
use crate::tiff::ifd::{IFD, IFDEntry};

/// Upper bound on IFDs followed, guards against corrupt chains
const MAX_IFDS: usize = 1024;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
    is_big_tiff: bool,
    first_ifd_offset: u64,
}

impl TiffReader {
    /// Reads the file header
    ///
    /// Detects the byte order and the classic/BigTIFF variant, and records
    /// where the first IFD starts.
    pub fn from_header(reader: &mut dyn SeekableReader) -> FootprintResult<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let byte_order = ByteOrder::detect(reader)?;
        let handler = byte_order.create_handler();

        let version = handler.read_u16(reader)?;
        let (is_big_tiff, first_ifd_offset) = match version {
            header::TIFF_VERSION => (false, handler.read_u32(reader)? as u64),
            header::BIG_TIFF_VERSION => {
                let offset_size = handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE {
                    return Err(FootprintError::InvalidRaster(format!(
                        "invalid BigTIFF offset size {}", offset_size)));
                }
                let _reserved = handler.read_u16(reader)?;
                (true, handler.read_u64(reader)?)
            }
            other => {
                return Err(FootprintError::InvalidRaster(format!("unsupported TIFF version {}", other)));
            }
        };

        debug!("TIFF header: {}, {}, first IFD at {}",
               byte_order.name(), if is_big_tiff { "BigTIFF" } else { "classic TIFF" }, first_ifd_offset);

        Ok(TiffReader { byte_order, handler, is_big_tiff, first_ifd_offset })
    }

    /// Byte order of the file
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Handler for the file's byte order
    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.handler.as_ref()
    }

    /// Returns whether the file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Reads every IFD in the chain
    ///
    /// Stops at a zero next-offset, at an offset already visited, or after
    /// `MAX_IFDS` directories.
    pub fn read_ifd_chain(&self, reader: &mut dyn SeekableReader) -> FootprintResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut offset = self.first_ifd_offset;

        while offset != 0 && ifds.len() < MAX_IFDS {
            if !visited.insert(offset) {
                warn!("IFD chain loops back to offset {}, stopping", offset);
                break;
            }

            let (ifd, next) = self.read_ifd(reader, offset, ifds.len())?;
            debug!("Read IFD #{} with {} entries, next at {}", ifd.number, ifd.entry_count(), next);
            ifds.push(ifd);
            offset = next;
        }

        if ifds.is_empty() {
            return Err(FootprintError::InvalidRaster("TIFF has no image directory".to_string()));
        }

        Ok(ifds)
    }

    /// Reads one IFD and the offset of the next one
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> FootprintResult<(IFD, u64)> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u16(reader)? as u64
        };

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        let next = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u32(reader)? as u64
        };

        Ok((ifd, next))
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> FootprintResult<IFDEntry> {
        let tag = self.handler.read_u16(reader)?;
        let field_type = self.handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut raw_value = [0u8; 8];
        reader.read_exact(&mut raw_value[..field_len])?;

        let mut cursor = Cursor::new(raw_value.to_vec());
        let value_offset = if self.is_big_tiff {
            self.handler.read_u64(&mut cursor)?
        } else {
            self.handler.read_u32(&mut cursor)? as u64
        };

        Ok(IFDEntry::new(tag, field_type, count, value_offset, raw_value))
    }

    /// Reads the values of an entry, one `read_one` call per value
    fn read_values<T>(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
        mut read_one: impl FnMut(&dyn ByteOrderHandler, &mut dyn SeekableReader) -> FootprintResult<T>,
    ) -> FootprintResult<Vec<T>> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if !entry.is_value_inline(self.is_big_tiff) && entry.value_offset.saturating_add(entry.byte_len()) > file_size {
            return Err(FootprintError::InvalidRaster(format!(
                "tag {} ({}) values extend past the end of the file", entry.tag, tag_name(entry.tag))));
        }

        let mut values = Vec::with_capacity(entry.count as usize);

        if entry.is_value_inline(self.is_big_tiff) {
            let mut cursor = Cursor::new(entry.raw_value.to_vec());
            for _ in 0..entry.count {
                values.push(read_one(self.handler(), &mut cursor)?);
            }
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            for _ in 0..entry.count {
                values.push(read_one(self.handler(), &mut *reader)?);
            }
        }

        Ok(values)
    }

    /// Reads an integer-typed entry as `u64` values
    pub fn read_u64_values(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> FootprintResult<Vec<u64>> {
        let field_type = entry.field_type;
        self.read_values(reader, entry, |handler, r| {
            let value = match field_type {
                field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => r.read_u8()? as u64,
                field_types::SHORT | field_types::SSHORT => handler.read_u16(r)? as u64,
                field_types::LONG | field_types::SLONG => handler.read_u32(r)? as u64,
                field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.read_u64(r)?,
                other => {
                    return Err(FootprintError::InvalidRaster(format!(
                        "tag {} ({}) has non-integer field type {}", entry.tag, tag_name(entry.tag), other)));
                }
            };
            Ok(value)
        })
    }

    /// Reads a numeric entry as `f64` values
    pub fn read_f64_values(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> FootprintResult<Vec<f64>> {
        let field_type = entry.field_type;
        match field_type {
            field_types::DOUBLE => self.read_values(reader, entry, |h, r| Ok(h.read_f64(r)?)),
            field_types::FLOAT => self.read_values(reader, entry, |h, r| Ok(h.read_f32(r)? as f64)),
            field_types::RATIONAL => self.read_values(reader, entry, |h, r| {
                let numerator = h.read_u32(r)?;
                let denominator = h.read_u32(r)?;
                Ok(numerator as f64 / denominator as f64)
            }),
            _ => Ok(self.read_u64_values(reader, entry)?.into_iter().map(|v| v as f64).collect()),
        }
    }

    /// Reads an ASCII entry, dropping trailing NULs
    pub fn read_ascii(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> FootprintResult<String> {
        let bytes = self.read_values(reader, entry, |_, r| Ok(r.read_u8()?))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.trim_end_matches('\0').to_string())
    }

    /// First value of an integer tag, if present
    pub fn tag_u64(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> FootprintResult<Option<u64>> {
        match ifd.get_entry(tag) {
            Some(entry) => Ok(self.read_u64_values(reader, entry)?.first().copied()),
            None => Ok(None),
        }
    }

    /// All values of an integer tag; missing tags are an error
    pub fn require_u64s(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> FootprintResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or_else(|| {
            FootprintError::InvalidRaster(format!("missing required tag {} ({})", tag, tag_name(tag)))
        })?;
        self.read_u64_values(reader, entry)
    }
}
