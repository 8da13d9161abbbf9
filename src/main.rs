use std::process;

use log::error;

use footprintkit::commands::{cli, CommandFactory, FootprintCommandFactory};
use footprintkit::utils::logger::Logger;

fn main() {
    let matches = cli().get_matches();

    let level = Logger::level_for_verbosity(matches.get_count("verbose"));
    let log_file = matches.get_one::<String>("log-file").map(String::as_str);
    if let Err(e) = Logger::init_global_logger(log_file, level) {
        eprintln!("Error setting up logger: {}", e);
        process::exit(1);
    }

    let factory = FootprintCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
