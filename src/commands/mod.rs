//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod extract_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use inspect_command::InspectCommand;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as ClapCommand};
use crate::errors::FootprintResult;

/// Command line definition of the `footprintkit` binary
pub fn cli() -> ClapCommand {
    ClapCommand::new("footprintkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sample sensor footprints and extract raster values for point observations")
        .arg(
            Arg::new("input")
                .help("Input CSV of observations (a GeoTIFF with --inspect)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output CSV file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Run configuration (TOML)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("layer")
                .short('l')
                .long("layer")
                .help("Layer to extract as PATH=REDUCER[:COLUMN][@RADIUS]; reducers: max, min, mean, median, std, count, unique, point")
                .value_name("SPEC")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("samples")
                .short('n')
                .long("samples")
                .help("Samples per footprint [default: 2000]")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("radius")
                .short('r')
                .long("radius")
                .help("Footprint radius in meters [default: 35]")
                .value_name("METERS")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for reproducible sampling")
                .value_name("SEED")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("x-column")
                .long("x-column")
                .help("Column with the x coordinate (longitude) [default: LON]")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("y-column")
                .long("y-column")
                .help("Column with the y coordinate (latitude) [default: LAT]")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .help("Worker threads (0 = all cores)")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("abort-on-error")
                .long("abort-on-error")
                .help("Stop at the first failed extraction instead of recording it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sample-counts")
                .long("sample-counts")
                .help("Add a <column>_n column with the number of values reduced")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show a progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Describe the input raster instead of extracting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("band")
                .long("band")
                .help("Band to describe with --inspect")
                .value_name("N")
                .default_value("1")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write the log to this file")
                .value_name("FILE"),
        )
}

/// Factory for creating command instances based on CLI arguments
///
/// `--inspect` selects the raster inspection command; everything else is an
/// extraction run.
#[derive(Default)]
pub struct FootprintCommandFactory;

impl FootprintCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FootprintCommandFactory
    }
}

impl CommandFactory for FootprintCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> FootprintResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args)?))
        } else {
            Ok(Box::new(ExtractCommand::new(args)?))
        }
    }
}
