//! Image File Directory (IFD) structures
//!
//! An IFD is a list of tag entries describing one image in a TIFF file. Each
//! entry either holds its value inline (when it fits in the 4 or 8 byte value
//! field) or points at the value elsewhere in the file.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::tiff::constants::{self, field_types};

/// One tag entry of an IFD
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value field interpreted as an offset
    pub value_offset: u64,
    /// Raw value field, in file byte order (4 or 8 meaningful bytes)
    pub raw_value: [u8; 8],
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, raw_value: [u8; 8]) -> Self {
        trace!("IFD entry: tag={} ({}), type={}, count={}, value/offset={}",
               tag, constants::tag_name(tag), field_type, count, value_offset);

        IFDEntry { tag, field_type, count, value_offset, raw_value }
    }

    /// Size in bytes of one value of this entry's type
    pub fn field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            _ => 1,
        }
    }

    /// Total size of the values in bytes
    pub fn byte_len(&self) -> u64 {
        self.field_type_size() as u64 * self.count
    }

    /// Whether the values are stored in the entry itself
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        self.byte_len() <= inline_size
    }
}

/// An Image File Directory
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset of this IFD in the file
    pub offset: u64,
    /// Entry position by tag
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    /// Creates an empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        IFD {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry; a repeated tag replaces the earlier lookup
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets an entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&i| &self.entries[i])
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Number of entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {}, {} entries)", self.number, self.offset, self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    {} ({}): type {}, count {}",
                     entry.tag, constants::tag_name(entry.tag), entry.field_type, entry.count)?;
        }
        Ok(())
    }
}
