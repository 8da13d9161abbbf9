//! Raster inspection command
//!
//! Prints what the extractor will see in a GeoTIFF: size, band layout,
//! sample type, compression, geotransform, CRS and NoData.

use clap::ArgMatches;
use log::info;

use crate::api::FootprintKit;
use crate::commands::command_traits::Command;
use crate::errors::{FootprintError, FootprintResult};

/// Command for describing a raster file
pub struct InspectCommand {
    /// Path to the raster
    input_file: String,
    /// Band to describe (1-based)
    band: u64,
}

impl InspectCommand {
    /// Create a new inspect command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new InspectCommand instance or an error
    pub fn new(args: &ArgMatches) -> FootprintResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| FootprintError::Config("Missing input raster".to_string()))?
            .clone();
        let band = args.get_one::<u64>("band").copied().unwrap_or(1);

        Ok(InspectCommand { input_file, band })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> FootprintResult<()> {
        info!("Inspecting {} (band {})", self.input_file, self.band);
        let raster_info = FootprintKit::inspect(&self.input_file, self.band)?;
        println!("{}", raster_info);
        Ok(())
    }
}
