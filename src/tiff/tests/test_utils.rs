//! In-memory GeoTIFF builder for tests

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::compression::lzw;
use crate::tiff::constants::{compression, field_types, predictor, tags};
use crate::tiff::SampleType;

/// Strip or tile organisation of the pixel data
#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// Strips of the given number of rows
    Strips(u32),
    /// Tiles of the given width and height
    Tiles(u32, u32),
}

/// Builds a single-image GeoTIFF from row-major band values
pub struct GeoTiffBuilder {
    width: u32,
    height: u32,
    bands: Vec<Vec<f64>>,
    sample_type: SampleType,
    big_endian: bool,
    big_tiff: bool,
    layout: Layout,
    planar: bool,
    compression: u64,
    predictor: bool,
    transform: [f64; 6],
    use_matrix: bool,
    pixel_is_point: bool,
    nodata: Option<String>,
    epsg: Option<u16>,
    byte_count_override: Option<(usize, u64)>,
}

impl GeoTiffBuilder {
    /// One band of `values`, Float32, uncompressed, single strip per row
    pub fn new(width: u32, height: u32, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), (width * height) as usize);
        GeoTiffBuilder {
            width,
            height,
            bands: vec![values],
            sample_type: SampleType::F32,
            big_endian: false,
            big_tiff: false,
            layout: Layout::Strips(1),
            planar: false,
            compression: compression::NONE,
            predictor: false,
            transform: [0.0, 1.0, 0.0, height as f64, 0.0, -1.0],
            use_matrix: false,
            pixel_is_point: false,
            nodata: None,
            epsg: Some(4326),
            byte_count_override: None,
        }
    }

    pub fn band(mut self, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), (self.width * self.height) as usize);
        self.bands.push(values);
        self
    }

    pub fn sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn big_tiff(mut self) -> Self {
        self.big_tiff = true;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn planar(mut self) -> Self {
        self.planar = true;
        self
    }

    pub fn compression(mut self, code: u64) -> Self {
        self.compression = code;
        self
    }

    pub fn predictor(mut self) -> Self {
        self.predictor = true;
        self
    }

    pub fn transform(mut self, transform: [f64; 6]) -> Self {
        self.transform = transform;
        self
    }

    /// Write a ModelTransformation matrix instead of scale + tiepoint
    pub fn matrix(mut self) -> Self {
        self.use_matrix = true;
        self
    }

    pub fn pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    pub fn nodata(mut self, text: &str) -> Self {
        self.nodata = Some(text.to_string());
        self
    }

    pub fn epsg(mut self, code: Option<u16>) -> Self {
        self.epsg = code;
        self
    }

    /// Record `count` as the byte count of block `block`, whatever its real size
    pub fn block_byte_count(mut self, block: usize, count: u64) -> Self {
        self.byte_count_override = Some((block, count));
        self
    }

    /// Encode the file
    pub fn build(&self) -> Vec<u8> {
        if self.big_endian {
            self.encode::<BigEndian>()
        } else {
            self.encode::<LittleEndian>()
        }
    }

    /// Encode the file behind a cursor
    pub fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.build())
    }

    fn block_size(&self) -> (u32, u32) {
        match self.layout {
            Layout::Strips(rows) => (self.width, rows.min(self.height)),
            Layout::Tiles(w, h) => (w, h),
        }
    }

    /// Raw block bytes in file order
    fn blocks<E: Endian>(&self) -> Vec<Vec<u8>> {
        let (bw, bh) = self.block_size();
        let across = (self.width + bw - 1) / bw;
        let down = (self.height + bh - 1) / bh;
        let tiled = matches!(self.layout, Layout::Tiles(..));

        let planes: Vec<Vec<usize>> = if self.planar {
            (0..self.bands.len()).map(|b| vec![b]).collect()
        } else {
            vec![(0..self.bands.len()).collect()]
        };

        let mut blocks = Vec::new();
        for plane in &planes {
            for by in 0..down {
                for bx in 0..across {
                    let rows = if tiled { bh } else { bh.min(self.height - by * bh) };
                    let mut raw = Vec::new();
                    for y in 0..rows {
                        for x in 0..bw {
                            let (row, col) = (by * bh + y, bx * bw + x);
                            for &band in plane {
                                let value = if row < self.height && col < self.width {
                                    self.bands[band][(row * self.width + col) as usize]
                                } else {
                                    0.0
                                };
                                write_sample::<E>(&mut raw, value, self.sample_type);
                            }
                        }
                    }
                    if self.predictor {
                        apply_predictor::<E>(&mut raw, self.sample_type.size(), bw as usize * plane.len(), plane.len());
                    }
                    blocks.push(self.compress(raw));
                }
            }
        }
        blocks
    }

    fn compress(&self, raw: Vec<u8>) -> Vec<u8> {
        match self.compression {
            compression::NONE => raw,
            compression::LZW => lzw::encode(&raw),
            compression::DEFLATE | compression::DEFLATE_OLD => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&raw).unwrap();
                encoder.finish().unwrap()
            }
            compression::ZSTD => zstd::encode_all(raw.as_slice(), 3).unwrap(),
            other => panic!("test builder cannot compress with code {}", other),
        }
    }

    fn entries<E: Endian>(&self, offsets: &[u64], counts: &[u64]) -> Vec<(u16, u16, u64, Vec<u8>)> {
        let spp = self.bands.len();
        let (bits, format) = match self.sample_type {
            SampleType::U8 => (8, 1),
            SampleType::I8 => (8, 2),
            SampleType::U16 => (16, 1),
            SampleType::I16 => (16, 2),
            SampleType::U32 => (32, 1),
            SampleType::I32 => (32, 2),
            SampleType::F32 => (32, 3),
            SampleType::F64 => (64, 3),
        };

        let shorts = |values: &[u16]| {
            let mut bytes = Vec::new();
            for &v in values {
                bytes.write_u16::<E>(v).unwrap();
            }
            (field_types::SHORT, values.len() as u64, bytes)
        };
        let long = |value: u32| {
            let mut bytes = Vec::new();
            bytes.write_u32::<E>(value).unwrap();
            (field_types::LONG, 1, bytes)
        };
        let doubles = |values: &[f64]| {
            let mut bytes = Vec::new();
            for &v in values {
                bytes.write_f64::<E>(v).unwrap();
            }
            (field_types::DOUBLE, values.len() as u64, bytes)
        };
        let offsets_field = |values: &[u64]| {
            let mut bytes = Vec::new();
            for &v in values {
                if self.big_tiff {
                    bytes.write_u64::<E>(v).unwrap();
                } else {
                    bytes.write_u32::<E>(v as u32).unwrap();
                }
            }
            let field_type = if self.big_tiff { field_types::LONG8 } else { field_types::LONG };
            (field_type, values.len() as u64, bytes)
        };

        let mut fields = vec![
            (tags::IMAGE_WIDTH, long(self.width)),
            (tags::IMAGE_LENGTH, long(self.height)),
            (tags::BITS_PER_SAMPLE, shorts(&vec![bits; spp])),
            (tags::COMPRESSION, shorts(&[self.compression as u16])),
            (tags::PHOTOMETRIC_INTERPRETATION, shorts(&[1])),
            (tags::SAMPLES_PER_PIXEL, shorts(&[spp as u16])),
            (tags::PLANAR_CONFIGURATION, shorts(&[if self.planar { 2 } else { 1 }])),
            (tags::SAMPLE_FORMAT, shorts(&vec![format; spp])),
        ];

        if self.predictor {
            fields.push((tags::PREDICTOR, shorts(&[predictor::HORIZONTAL_DIFFERENCING as u16])));
        }

        match self.layout {
            Layout::Strips(rows) => {
                fields.push((tags::STRIP_OFFSETS, offsets_field(offsets)));
                fields.push((tags::ROWS_PER_STRIP, long(rows)));
                fields.push((tags::STRIP_BYTE_COUNTS, offsets_field(counts)));
            }
            Layout::Tiles(w, h) => {
                fields.push((tags::TILE_WIDTH, long(w)));
                fields.push((tags::TILE_LENGTH, long(h)));
                fields.push((tags::TILE_OFFSETS, offsets_field(offsets)));
                fields.push((tags::TILE_BYTE_COUNTS, offsets_field(counts)));
            }
        }

        let [ox, a, b, oy, d, e] = self.transform;
        if self.use_matrix {
            let matrix = [a, b, 0.0, ox, d, e, 0.0, oy, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
            fields.push((tags::MODEL_TRANSFORMATION_TAG, doubles(&matrix)));
        } else {
            fields.push((tags::MODEL_PIXEL_SCALE_TAG, doubles(&[a, -e, 0.0])));
            fields.push((tags::MODEL_TIEPOINT_TAG, doubles(&[0.0, 0.0, 0.0, ox, oy, 0.0])));
        }

        let mut keys = vec![1u16, 1, 0, 0];
        keys.extend_from_slice(&[1024, 0, 1, 2]);
        keys.extend_from_slice(&[1025, 0, 1, if self.pixel_is_point { 2 } else { 1 }]);
        if let Some(code) = self.epsg {
            keys.extend_from_slice(&[2048, 0, 1, code]);
        }
        keys[3] = (keys.len() / 4 - 1) as u16;
        fields.push((tags::GEO_KEY_DIRECTORY_TAG, shorts(&keys)));

        if let Some(text) = &self.nodata {
            let mut bytes = text.as_bytes().to_vec();
            bytes.push(0);
            fields.push((tags::GDAL_NODATA, (field_types::ASCII, bytes.len() as u64, bytes)));
        }

        fields.sort_by_key(|(tag, _)| *tag);
        fields.into_iter().map(|(tag, (ty, count, bytes))| (tag, ty, count, bytes)).collect()
    }

    fn encode<E: Endian>(&self) -> Vec<u8> {
        let mut file = Vec::new();
        let marker: &[u8; 2] = if self.big_endian { b"MM" } else { b"II" };
        file.extend_from_slice(marker);

        let header_len = if self.big_tiff {
            file.write_u16::<E>(43).unwrap();
            file.write_u16::<E>(8).unwrap();
            file.write_u16::<E>(0).unwrap();
            file.write_u64::<E>(0).unwrap();
            16
        } else {
            file.write_u16::<E>(42).unwrap();
            file.write_u32::<E>(0).unwrap();
            8
        };
        debug_assert_eq!(file.len(), header_len);

        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for block in self.blocks::<E>() {
            offsets.push(file.len() as u64);
            counts.push(block.len() as u64);
            file.extend_from_slice(&block);
        }
        if let Some((block, count)) = self.byte_count_override {
            counts[block] = count;
        }

        let inline_len = if self.big_tiff { 8 } else { 4 };
        let mut entries = Vec::new();
        for (tag, ty, count, mut bytes) in self.entries::<E>(&offsets, &counts) {
            if bytes.len() <= inline_len {
                bytes.resize(8, 0);
                entries.push((tag, ty, count, bytes));
            } else {
                if file.len() % 2 == 1 {
                    file.push(0);
                }
                let offset = file.len() as u64;
                file.extend_from_slice(&bytes);
                let mut pointer = Vec::new();
                if self.big_tiff {
                    pointer.write_u64::<E>(offset).unwrap();
                } else {
                    pointer.write_u32::<E>(offset as u32).unwrap();
                    pointer.resize(8, 0);
                }
                entries.push((tag, ty, count, pointer));
            }
        }

        if file.len() % 2 == 1 {
            file.push(0);
        }
        let ifd_offset = file.len() as u64;
        if self.big_tiff {
            file.write_u64::<E>(entries.len() as u64).unwrap();
        } else {
            file.write_u16::<E>(entries.len() as u16).unwrap();
        }
        for (tag, ty, count, value) in &entries {
            file.write_u16::<E>(*tag).unwrap();
            file.write_u16::<E>(*ty).unwrap();
            if self.big_tiff {
                file.write_u64::<E>(*count).unwrap();
            } else {
                file.write_u32::<E>(*count as u32).unwrap();
            }
            file.extend_from_slice(&value[..inline_len]);
        }
        if self.big_tiff {
            file.write_u64::<E>(0).unwrap();
            E::write_u64(&mut file[8..16], ifd_offset);
        } else {
            file.write_u32::<E>(0).unwrap();
            E::write_u32(&mut file[4..8], ifd_offset as u32);
        }

        file
    }
}

fn write_sample<E: Endian>(buffer: &mut Vec<u8>, value: f64, sample_type: SampleType) {
    match sample_type {
        SampleType::U8 => buffer.write_u8(value as u8).unwrap(),
        SampleType::I8 => buffer.write_i8(value as i8).unwrap(),
        SampleType::U16 => buffer.write_u16::<E>(value as u16).unwrap(),
        SampleType::I16 => buffer.write_i16::<E>(value as i16).unwrap(),
        SampleType::U32 => buffer.write_u32::<E>(value as u32).unwrap(),
        SampleType::I32 => buffer.write_i32::<E>(value as i32).unwrap(),
        SampleType::F32 => buffer.write_f32::<E>(value as f32).unwrap(),
        SampleType::F64 => buffer.write_f64::<E>(value).unwrap(),
    }
}

/// Horizontal differencing, the inverse of predictor decoding
pub fn apply_predictor<E: Endian>(block: &mut [u8], size: usize, row_len: usize, stride: usize) {
    for row in block.chunks_mut(row_len * size) {
        let samples = row.len() / size;
        for i in (stride..samples).rev() {
            let (cur, prev) = (i * size, (i - stride) * size);
            match size {
                1 => row[cur] = row[cur].wrapping_sub(row[prev]),
                2 => {
                    let v = E::read_u16(&row[cur..]).wrapping_sub(E::read_u16(&row[prev..]));
                    E::write_u16(&mut row[cur..cur + 2], v);
                }
                4 => {
                    let v = E::read_u32(&row[cur..]).wrapping_sub(E::read_u32(&row[prev..]));
                    E::write_u32(&mut row[cur..cur + 4], v);
                }
                _ => {
                    let v = E::read_u64(&row[cur..]).wrapping_sub(E::read_u64(&row[prev..]));
                    E::write_u64(&mut row[cur..cur + 8], v);
                }
            }
        }
    }
}

/// Values `0, 1, 2, ...` scaled by `step`
pub fn ramp(count: usize, step: f64) -> Vec<f64> {
    (0..count).map(|i| i as f64 * step).collect()
}
