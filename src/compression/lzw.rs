//! Handler for TIFF LZW compressed data
//!
//! TIFF LZW packs codes most-significant bit first, starts at 9 bits and
//! widens one code earlier than textbook LZW ("early change"): the decoder
//! moves to the next width as soon as the table reaches 511, 1023 or 2047
//! entries. Codes never exceed 12 bits.

use crate::errors::{FootprintError, FootprintResult};
use crate::tiff::constants::compression;
use super::handler::CompressionHandler;

const CLEAR_CODE: usize = 256;
const EOI_CODE: usize = 257;
const FIRST_FREE: usize = 258;
const MIN_WIDTH: usize = 9;
const MAX_WIDTH: usize = 12;
const TABLE_LIMIT: usize = 1 << MAX_WIDTH;

/// LZW compression handler (compression code 5)
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8]) -> FootprintResult<Vec<u8>> {
        decode(data)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        compression::LZW
    }
}

/// Reads MSB-first codes of varying width
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        BitReader { data, position: 0 }
    }

    fn read(&mut self, width: usize) -> Option<usize> {
        if self.position + width > self.data.len() * 8 {
            return None;
        }

        let mut code = 0;
        for _ in 0..width {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            code = (code << 1) | bit as usize;
            self.position += 1;
        }
        Some(code)
    }
}

fn fresh_table() -> Vec<Vec<u8>> {
    let mut table: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
    // Clear and EOI occupy 256 and 257
    table.push(Vec::new());
    table.push(Vec::new());
    table
}

fn decode(data: &[u8]) -> FootprintResult<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() * 2);
    let mut bits = BitReader::new(data);
    let mut table = fresh_table();
    let mut width = MIN_WIDTH;
    let mut previous: Option<usize> = None;

    // Streams that end without EOI are accepted, as libtiff does
    while let Some(code) = bits.read(width) {
        if code == CLEAR_CODE {
            table.truncate(FIRST_FREE);
            width = MIN_WIDTH;
            previous = None;
            continue;
        }
        if code == EOI_CODE {
            break;
        }

        let entry = if code < table.len() {
            table[code].clone()
        } else if code == table.len() {
            let prev = previous.ok_or_else(|| invalid_code(code))?;
            let mut entry = table[prev].clone();
            entry.push(table[prev][0]);
            entry
        } else {
            return Err(invalid_code(code));
        };

        output.extend_from_slice(&entry);

        if let Some(prev) = previous {
            if table.len() < TABLE_LIMIT {
                let mut added = table[prev].clone();
                added.push(entry[0]);
                table.push(added);
            }
        }
        previous = Some(code);

        if table.len() + 1 >= (1 << width) && width < MAX_WIDTH {
            width += 1;
        }
    }

    Ok(output)
}

fn invalid_code(code: usize) -> FootprintError {
    FootprintError::InvalidRaster(format!("corrupt LZW stream: unexpected code {}", code))
}

/// TIFF LZW encoder, used to build test rasters
#[cfg(test)]
pub(crate) fn encode(data: &[u8]) -> Vec<u8> {
    use std::collections::HashMap;

    struct BitWriter {
        bytes: Vec<u8>,
        acc: u64,
        filled: usize,
    }

    impl BitWriter {
        fn write(&mut self, code: usize, width: usize) {
            self.acc = (self.acc << width) | code as u64;
            self.filled += width;
            while self.filled >= 8 {
                self.filled -= 8;
                self.bytes.push((self.acc >> self.filled) as u8);
            }
        }

        fn finish(mut self) -> Vec<u8> {
            if self.filled > 0 {
                self.bytes.push((self.acc << (8 - self.filled)) as u8);
            }
            self.bytes
        }
    }

    let mut writer = BitWriter { bytes: Vec::new(), acc: 0, filled: 0 };
    let mut dict: HashMap<(usize, u8), usize> = HashMap::new();
    let mut next_code = FIRST_FREE;
    let mut width = MIN_WIDTH;
    let mut prefix: Option<usize> = None;

    writer.write(CLEAR_CODE, width);

    for &byte in data {
        let p = match prefix {
            None => {
                prefix = Some(byte as usize);
                continue;
            }
            Some(p) => p,
        };

        if let Some(&code) = dict.get(&(p, byte)) {
            prefix = Some(code);
            continue;
        }

        writer.write(p, width);
        dict.insert((p, byte), next_code);
        next_code += 1;
        if next_code > (1 << width) - 1 && width < MAX_WIDTH {
            width += 1;
        }
        prefix = Some(byte as usize);

        if next_code >= TABLE_LIMIT - 2 {
            writer.write(CLEAR_CODE, width);
            dict.clear();
            next_code = FIRST_FREE;
            width = MIN_WIDTH;
        }
    }

    if let Some(p) = prefix {
        writer.write(p, width);
        next_code += 1;
        if next_code > (1 << width) - 1 && width < MAX_WIDTH {
            width += 1;
        }
    }
    writer.write(EOI_CODE, width);

    writer.finish()
}
