//! Footprint extraction command
//!
//! Builds the run configuration from an optional TOML file plus command line
//! overrides, then extracts every layer for every row of the input CSV.

use clap::ArgMatches;
use log::{info, warn};

use crate::api::FootprintKit;
use crate::commands::command_traits::Command;
use crate::config::{LayerConfig, RunConfig};
use crate::errors::{FootprintError, FootprintResult};

/// Command for extracting raster values at observations
pub struct ExtractCommand {
    /// Path to the input CSV
    input_file: String,
    /// Path to the output CSV
    output_file: String,
    /// Run configuration after overrides
    config: RunConfig,
}

impl ExtractCommand {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches) -> FootprintResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| FootprintError::Config("Missing input table".to_string()))?
            .clone();
        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| FootprintError::Config("Missing output file (-o) for extraction".to_string()))?
            .clone();

        let config = ExtractCommand::build_config(args)?;
        info!("Input table: {}, output table: {}", input_file, output_file);

        Ok(ExtractCommand { input_file, output_file, config })
    }

    /// Merge the config file (if any) with command line options
    ///
    /// Command line values win; `--layer` entries are appended after the
    /// layers of the config file.
    pub fn build_config(args: &ArgMatches) -> FootprintResult<RunConfig> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(specs) = args.get_many::<String>("layer") {
            for spec in specs {
                config.layers.push(LayerConfig::parse_spec(spec)?);
            }
        }

        if let Some(samples) = args.get_one::<usize>("samples") {
            config.sample_count = *samples;
        }
        if let Some(radius) = args.get_one::<f64>("radius") {
            config.buffer_radius_m = *radius;
        }
        if let Some(seed) = args.get_one::<u64>("seed") {
            config.seed = Some(*seed);
        }
        if let Some(threads) = args.get_one::<usize>("threads") {
            config.threads = *threads;
        }
        if let Some(column) = args.get_one::<String>("x-column") {
            config.x_column = column.clone();
        }
        if let Some(column) = args.get_one::<String>("y-column") {
            config.y_column = column.clone();
        }

        config.abort_on_error |= args.get_flag("abort-on-error");
        config.progress |= args.get_flag("progress");
        config.sample_counts |= args.get_flag("sample-counts");

        Ok(config)
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> FootprintResult<()> {
        let kit = FootprintKit::new(self.config.clone())?;
        let summary = kit.extract_csv(&self.input_file, &self.output_file)?;

        for layer in &summary.layers {
            if layer.failed > 0 {
                warn!("{}: {} of {} observation(s) failed", layer.column, layer.failed, summary.observations);
            }
        }
        Ok(())
    }
}
