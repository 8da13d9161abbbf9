//! GeoTIFF raster accessor
//!
//! Opens the first image of a (Big)TIFF file and serves single-pixel reads
//! from one band. A pixel read decodes the strip or tile that holds it and
//! keeps the decoded block in a small FIFO cache, since footprint samples of
//! one observation cluster in a few blocks.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::coordinate::GeoTransform;
use crate::errors::{FootprintError, FootprintResult};
use crate::extractor::{PixelIndex, RasterDims};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{self, compression, planar_config, predictor, sample_format, tags};
use crate::tiff::{georef, SampleType, TiffReader, IFD};
use super::RasterAccessor;

/// Decoded blocks kept per raster
const BLOCK_CACHE_CAPACITY: usize = 64;

/// Buffer size for file-backed rasters
const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Metadata of an opened GeoTIFF band
#[derive(Debug, Clone)]
pub struct RasterInfo {
    /// Source path or name
    pub path: String,
    /// Width in pixels
    pub width: u64,
    /// Height in pixels
    pub height: u64,
    /// Samples per pixel
    pub bands: u64,
    /// Band served by the accessor (1-based)
    pub band: u64,
    /// Sample type of the band
    pub sample_type: SampleType,
    /// TIFF compression code
    pub compression: u64,
    /// TIFF predictor code
    pub predictor: u64,
    /// Bands stored in separate planes
    pub planar: bool,
    /// Tiled rather than stripped
    pub tiled: bool,
    /// Block width in pixels
    pub block_width: u64,
    /// Block height in pixels
    pub block_height: u64,
    /// Pixel to world transform
    pub geotransform: GeoTransform,
    /// GDAL NoData value
    pub nodata: Option<f64>,
    /// EPSG code from the GeoKeys
    pub epsg: Option<u16>,
    /// BigTIFF container
    pub big_tiff: bool,
    /// File byte order
    pub byte_order: ByteOrder,
    /// Number of images (IFDs) in the file
    pub ifd_count: usize,
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster: {}", self.path)?;
        writeln!(f, "  Format: {}, {}", if self.big_tiff { "BigTIFF" } else { "TIFF" }, self.byte_order.name())?;
        writeln!(f, "  Images: {}", self.ifd_count)?;
        writeln!(f, "  Size: {}x{}, {} band(s), reading band {}", self.width, self.height, self.bands, self.band)?;
        writeln!(f, "  Sample type: {}", self.sample_type)?;
        writeln!(f, "  Layout: {} {}x{}, {}",
                 if self.tiled { "tiles" } else { "strips" },
                 self.block_width, self.block_height,
                 if self.planar { "planar" } else { "interleaved" })?;
        writeln!(f, "  Compression: {} ({})", constants::compression_name(self.compression), self.compression)?;
        writeln!(f, "  Predictor: {}", self.predictor)?;
        writeln!(f, "  Geotransform: {}", self.geotransform)?;
        match self.epsg {
            Some(code) => writeln!(f, "  CRS: EPSG:{}", code)?,
            None => writeln!(f, "  CRS: unknown")?,
        }
        match self.nodata {
            Some(value) => write!(f, "  NoData: {}", value),
            None => write!(f, "  NoData: none"),
        }
    }
}

/// Strip or tile locations
struct BlockIndex {
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
    across: u64,
    down: u64,
    file_size: u64,
}

/// FIFO cache of decoded blocks
struct BlockCache {
    order: VecDeque<usize>,
    blocks: HashMap<usize, Arc<Vec<u8>>>,
}

impl BlockCache {
    fn new() -> Self {
        BlockCache { order: VecDeque::new(), blocks: HashMap::new() }
    }

    fn get(&self, key: usize) -> Option<Arc<Vec<u8>>> {
        self.blocks.get(&key).cloned()
    }

    fn insert(&mut self, key: usize, block: Arc<Vec<u8>>) {
        if self.blocks.insert(key, block).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > BLOCK_CACHE_CAPACITY {
            if let Some(evicted) = self.order.pop_front() {
                self.blocks.remove(&evicted);
            }
        }
    }
}

/// One band of a GeoTIFF file
pub struct GeoTiffRaster {
    info: RasterInfo,
    blocks: BlockIndex,
    tiff: TiffReader,
    decoder: Box<dyn CompressionHandler>,
    source: Mutex<Box<dyn SeekableReader>>,
    cache: Mutex<BlockCache>,
}

impl GeoTiffRaster {
    /// Open band `band` (1-based) of a GeoTIFF file
    pub fn open(path: &str, band: u64) -> FootprintResult<Self> {
        let file = File::open(path).map_err(|e| {
            FootprintError::InvalidRaster(format!("cannot open {}: {}", path, e))
        })?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        GeoTiffRaster::from_reader(Box::new(reader), path, band)
    }

    /// Open band `band` (1-based) of a GeoTIFF held by any seekable reader
    pub fn from_reader(mut source: Box<dyn SeekableReader>, name: &str, band: u64) -> FootprintResult<Self> {
        let tiff = TiffReader::from_header(source.as_mut())?;
        let ifds = tiff.read_ifd_chain(source.as_mut())?;
        let ifd = &ifds[0];
        debug!("{}", ifd);

        let (info, blocks) = read_layout(&tiff, source.as_mut(), ifd, name, band, ifds.len())?;
        let decoder = CompressionFactory::create_handler(info.compression)?;

        info!("Opened {}: {}x{} {} band {}/{}, {} {}x{}, {}",
              name, info.width, info.height, info.sample_type, info.band, info.bands,
              if info.tiled { "tiles" } else { "strips" }, info.block_width, info.block_height,
              decoder.name());

        Ok(GeoTiffRaster {
            info,
            blocks,
            tiff,
            decoder,
            source: Mutex::new(source),
            cache: Mutex::new(BlockCache::new()),
        })
    }

    /// Metadata of the opened band
    pub fn info(&self) -> &RasterInfo {
        &self.info
    }

    /// Block number and byte offset of a pixel's sample
    fn locate(&self, index: PixelIndex) -> (usize, usize, u64) {
        let (row, col) = (index.row as u64, index.col as u64);
        let info = &self.info;

        let (block_row, block_col) = (row / info.block_height, col / info.block_width);
        let (y, x) = (row % info.block_height, col % info.block_width);

        let mut block = block_row * self.blocks.across + block_col;
        let sample = if info.planar {
            block += (info.band - 1) * self.blocks.across * self.blocks.down;
            y * info.block_width + x
        } else {
            (y * info.block_width + x) * info.bands + (info.band - 1)
        };

        (block as usize, sample as usize * info.sample_type.size(), block_row)
    }

    /// Rows of decoded data in a block
    fn block_rows(&self, block_row: u64) -> u64 {
        if self.info.tiled {
            self.info.block_height
        } else {
            self.info.block_height.min(self.info.height - block_row * self.info.block_height)
        }
    }

    fn load_block(&self, block: usize, block_row: u64) -> FootprintResult<Arc<Vec<u8>>> {
        let offset = self.blocks.offsets[block];
        let byte_count = self.blocks.byte_counts[block];

        // Byte counts come from the file, so check them before allocating
        let in_file = matches!(offset.checked_add(byte_count), Some(end) if end <= self.blocks.file_size);
        if !in_file {
            return Err(FootprintError::InvalidRaster(format!(
                "block {} claims {} bytes at offset {}, past the end of the {}-byte file",
                block, byte_count, offset, self.blocks.file_size)));
        }

        let mut compressed = vec![0u8; byte_count as usize];
        {
            let mut source = self.source.lock()
                .map_err(|_| FootprintError::InvalidRaster("raster reader lock poisoned".to_string()))?;
            source.seek(SeekFrom::Start(offset))?;
            source.read_exact(&mut compressed)?;
        }

        let mut data = self.decoder.decompress(&compressed)?;

        let samples_per_row = if self.info.planar {
            self.info.block_width
        } else {
            self.info.block_width * self.info.bands
        };
        let row_bytes = samples_per_row as usize * self.info.sample_type.size();
        let expected = row_bytes * self.block_rows(block_row) as usize;
        if data.len() < expected {
            return Err(FootprintError::InvalidRaster(format!(
                "block {} decoded to {} bytes, expected {}", block, data.len(), expected)));
        }
        data.truncate(expected);

        if self.info.predictor == predictor::HORIZONTAL_DIFFERENCING {
            let stride = if self.info.planar { 1 } else { self.info.bands as usize };
            self.tiff.handler().undo_horizontal_predictor(
                &mut data, self.info.sample_type, samples_per_row as usize, stride);
        }

        debug!("Decoded block {} of {} ({} bytes)", block, self.info.path, data.len());
        Ok(Arc::new(data))
    }

    fn block(&self, block: usize, block_row: u64) -> FootprintResult<Arc<Vec<u8>>> {
        let lock_error = || FootprintError::InvalidRaster("block cache lock poisoned".to_string());

        if let Some(cached) = self.cache.lock().map_err(|_| lock_error())?.get(block) {
            return Ok(cached);
        }

        let data = self.load_block(block, block_row)?;
        self.cache.lock().map_err(|_| lock_error())?.insert(block, data.clone());
        Ok(data)
    }
}

impl RasterAccessor for GeoTiffRaster {
    fn dimensions(&self) -> RasterDims {
        RasterDims::new(self.info.width, self.info.height)
    }

    fn geotransform(&self) -> &GeoTransform {
        &self.info.geotransform
    }

    fn nodata(&self) -> Option<f64> {
        self.info.nodata
    }

    fn read_pixel(&self, index: PixelIndex) -> FootprintResult<f64> {
        let read_error = |message: String| FootprintError::RasterRead {
            row: index.row,
            col: index.col,
            message,
        };

        if !self.dimensions().contains(&index) {
            return Err(read_error(format!("outside {} raster", self.dimensions())));
        }

        let (block, offset, block_row) = self.locate(index);

        // Sparse block: GDAL reads these as NoData (or zero)
        if self.blocks.offsets[block] == 0 && self.blocks.byte_counts[block] == 0 {
            return Ok(self.info.nodata.unwrap_or(0.0));
        }

        let data = self.block(block, block_row).map_err(|e| read_error(e.to_string()))?;
        if offset + self.info.sample_type.size() > data.len() {
            return Err(read_error(format!("block {} is truncated", block)));
        }

        Ok(self.tiff.handler().sample_at(&data, offset, self.info.sample_type))
    }

    fn description(&self) -> String {
        self.info.path.clone()
    }
}

/// Read image structure and georeferencing from the first IFD
fn read_layout(tiff: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD, name: &str,
               band: u64, ifd_count: usize) -> FootprintResult<(RasterInfo, BlockIndex)> {
    let width = tiff.tag_u64(reader, ifd, tags::IMAGE_WIDTH)?.unwrap_or(0);
    let height = tiff.tag_u64(reader, ifd, tags::IMAGE_LENGTH)?.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(FootprintError::InvalidRaster(format!("{} has no image dimensions", name)));
    }

    let bands = tiff.tag_u64(reader, ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1).max(1);
    if band == 0 || band > bands {
        return Err(FootprintError::Config(format!(
            "band {} out of range, {} has {} band(s)", band, name, bands)));
    }

    let bits = match ifd.get_entry(tags::BITS_PER_SAMPLE) {
        Some(entry) => tiff.read_u64_values(reader, entry)?,
        None => vec![1],
    };
    let formats = match ifd.get_entry(tags::SAMPLE_FORMAT) {
        Some(entry) => tiff.read_u64_values(reader, entry)?,
        None => vec![sample_format::UNSIGNED],
    };
    let pick = |values: &[u64]| values.get(band as usize - 1).or_else(|| values.first()).copied().unwrap_or(0);
    let sample_type = SampleType::from_tags(pick(&bits), pick(&formats))?;

    let compression_code = tiff.tag_u64(reader, ifd, tags::COMPRESSION)?.unwrap_or(compression::NONE);
    let predictor_code = tiff.tag_u64(reader, ifd, tags::PREDICTOR)?.unwrap_or(predictor::NONE);
    match predictor_code {
        predictor::NONE => {}
        predictor::HORIZONTAL_DIFFERENCING if sample_type.is_integer() => {}
        other => {
            return Err(FootprintError::InvalidRaster(format!(
                "predictor {} is not supported for {} samples", other, sample_type)));
        }
    }

    let planar = tiff.tag_u64(reader, ifd, tags::PLANAR_CONFIGURATION)?.unwrap_or(planar_config::CHUNKY)
        == planar_config::PLANAR;

    let tiled = ifd.has_tag(tags::TILE_OFFSETS);
    let (block_width, block_height, offsets, byte_counts) = if tiled {
        (
            tiff.tag_u64(reader, ifd, tags::TILE_WIDTH)?.unwrap_or(0),
            tiff.tag_u64(reader, ifd, tags::TILE_LENGTH)?.unwrap_or(0),
            tiff.require_u64s(reader, ifd, tags::TILE_OFFSETS)?,
            tiff.require_u64s(reader, ifd, tags::TILE_BYTE_COUNTS)?,
        )
    } else {
        (
            width,
            tiff.tag_u64(reader, ifd, tags::ROWS_PER_STRIP)?.unwrap_or(height).min(height),
            tiff.require_u64s(reader, ifd, tags::STRIP_OFFSETS)?,
            tiff.require_u64s(reader, ifd, tags::STRIP_BYTE_COUNTS)?,
        )
    };
    if block_width == 0 || block_height == 0 {
        return Err(FootprintError::InvalidRaster(format!("{} has an empty block size", name)));
    }

    let across = (width + block_width - 1) / block_width;
    let down = (height + block_height - 1) / block_height;
    let planes = if planar { bands } else { 1 };
    let expected_blocks = (across * down * planes) as usize;
    if offsets.len() < expected_blocks || byte_counts.len() < expected_blocks {
        return Err(FootprintError::InvalidRaster(format!(
            "{} lists {} block offsets and {} byte counts, expected {}",
            name, offsets.len(), byte_counts.len(), expected_blocks)));
    }

    let file_size = reader.seek(SeekFrom::End(0))?;

    let keys = georef::read_geo_keys(tiff, reader, ifd)?;
    let geotransform = georef::read_geotransform(tiff, reader, ifd, &keys)?;
    let nodata = georef::read_nodata(tiff, reader, ifd)?;

    let info = RasterInfo {
        path: name.to_string(),
        width,
        height,
        bands,
        band,
        sample_type,
        compression: compression_code,
        predictor: predictor_code,
        planar,
        tiled,
        block_width,
        block_height,
        geotransform,
        nodata,
        epsg: georef::epsg_code(&keys),
        big_tiff: tiff.is_big_tiff(),
        byte_order: tiff.byte_order(),
        ifd_count,
    };

    Ok((info, BlockIndex { offsets, byte_counts, across, down, file_size }))
}
