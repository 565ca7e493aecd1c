#[macro_use]
extern crate log;

use std::env;
use std::process;

use crmgen::config::{self, Config};
use crmgen::logger::{init_logger, level_for};
use crmgen::output::generate_data;
use crmgen::Error;

fn run(config: &Config) -> Result<(), Error> {
    init_logger(level_for(config.verbose), config.log_file.as_deref())?;
    info!("Logging initialized, processing command line options.");
    config.log_received();

    let summary = generate_data(config)?;
    println!("Wrote {} records to {}", summary.rows, summary.path.display());
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("crmgen");

    let config = match config::load(args.get(1..).unwrap_or_default()) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print!("{}", config::usage(program));
            return;
        }
        Err(err) => {
            eprintln!("ERROR - {}", err);
            eprint!("{}", config::usage(program));
            process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        if config.log_file.is_some() {
            error!("{}", err);
        }
        eprintln!("ERROR - {}", err);
        process::exit(1);
    }
}
