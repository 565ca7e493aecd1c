use std::str::FromStr;

use getopts::{Matches, Options};

use crate::error::Error;
use crate::json::BUILTIN_ENTITIES;
use crate::schema::HeaderMode;

pub const OUTPUT_DIR_DEFAULT: &str = "outputs";
const BATCH_SIZE_DEFAULT: u64 = 10_000;

/// Which schema to generate from.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    Builtin(String),
    File(String),
}

/// Parsed command line. `None` fields fall back to the schema defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub schema: SchemaSource,
    pub num_rows: Option<u64>,
    pub output_file: Option<String>,
    pub seed: Option<u64>,
    pub output_dir: String,
    pub header: Option<HeaderMode>,
    pub batch_size: u64,
    pub log_file: Option<String>,
    pub verbose: bool,
}

impl Config {
    /// Options given on the command line, as `(long name, value)` pairs.
    pub fn received_options(&self) -> Vec<(&'static str, String)> {
        let mut received = Vec::new();
        match self.schema {
            SchemaSource::Builtin(ref entity) => received.push(("entity", entity.clone())),
            SchemaSource::File(ref file) => received.push(("schema", file.clone())),
        }
        if let Some(num_rows) = self.num_rows {
            received.push(("num_rows", num_rows.to_string()));
        }
        if let Some(ref out) = self.output_file {
            received.push(("out", out.clone()));
        }
        if let Some(seed) = self.seed {
            received.push(("seed", seed.to_string()));
        }
        if let Some(header) = self.header {
            let mode = match header {
                HeaderMode::Label => "label",
                HeaderMode::Api => "api",
            };
            received.push(("header", mode.to_string()));
        }
        received.push(("output_dir", self.output_dir.clone()));
        received.push(("batch_size", self.batch_size.to_string()));
        received
    }

    /// Logs every received option; call once the logger is installed.
    pub fn log_received(&self) {
        for (option, value) in self.received_options() {
            info!("Received option: {} = {}", option, value);
        }
    }
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt("n", "num_rows", "specify number of records to generate", "NUM_ROWS");
    opts.optopt("o", "out", "specify the output CSV file", "OUTPUT_FILE");
    opts.optopt("s", "seed", "specify the random seed", "SEED");
    opts.optopt(
        "d",
        "output_dir",
        "directory for bare output file names (default: outputs)",
        "DIR",
    );
    opts.optopt("S", "schema", "load the schema from a JSON file", "SCHEMA_FILE");
    opts.optopt("H", "header", "column headers to write: label or api", "MODE");
    opts.optopt(
        "b",
        "batch_size",
        "specify the number of rows between progress log lines",
        "BATCH_SIZE",
    );
    opts.optopt("l", "log_file", "specify a file to write the log to", "LOG_FILE_PATH");
    opts.optflag("v", "verbose", "enable debug logging");
    opts
}

/// Usage text for the command line.
pub fn usage(program: &str) -> String {
    let brief = format!(
        "Usage: {} [options] ENTITY\n       {} [options] --schema FILE\n\nENTITY is one of: {}",
        program,
        program,
        BUILTIN_ENTITIES.join(", ")
    );
    options().usage(&brief)
}

fn parse_number<T: FromStr>(matches: &Matches, option: &'static str) -> Result<Option<T>, Error>
where
    T::Err: ToString,
{
    match matches.opt_str(option) {
        None => Ok(None),
        Some(raw) => {
            let value = raw.trim();
            value
                .parse::<T>()
                .map(Some)
                .map_err(|err| Error::InvalidArgument {
                    option,
                    value: value.to_string(),
                    reason: err.to_string(),
                })
        }
    }
}

/// Parses the arguments following the program name.
///
/// Returns `Ok(None)` when help was requested.
///
/// # Examples
///
/// let config = load(&["contact", "-n", "50"])?;
///
pub fn load<S: AsRef<str>>(args: &[S]) -> Result<Option<Config>, Error> {
    let matches = options()
        .parse(args.iter().map(|a| a.as_ref()))
        .map_err(|err| Error::Usage(err.to_string()))?;

    if matches.opt_present("h") {
        return Ok(None);
    }

    // Exactly one of ENTITY or --schema
    let schema = match (matches.opt_str("schema"), matches.free.as_slice()) {
        (Some(file), []) => SchemaSource::File(file.trim().to_string()),
        (None, [entity]) => SchemaSource::Builtin(entity.trim().to_string()),
        (Some(_), _) => {
            return Err(Error::Usage(
                "Give either an ENTITY or --schema, not both.".to_string(),
            ))
        }
        (None, []) => {
            return Err(Error::Usage(
                "An ENTITY or --schema file must be provided.".to_string(),
            ))
        }
        (None, _) => return Err(Error::Usage("Only one ENTITY may be given.".to_string())),
    };

    let header = match matches.opt_str("header") {
        None => None,
        Some(raw) => {
            let value = raw.trim();
            let mode = HeaderMode::parse(value).ok_or_else(|| Error::InvalidArgument {
                option: "header",
                value: value.to_string(),
                reason: "expected 'label' or 'api'".to_string(),
            })?;
            Some(mode)
        }
    };

    let batch_size = parse_number::<u64>(&matches, "batch_size")?.unwrap_or(BATCH_SIZE_DEFAULT);
    if batch_size == 0 {
        return Err(Error::InvalidArgument {
            option: "batch_size",
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(Some(Config {
        schema,
        num_rows: parse_number(&matches, "num_rows")?,
        output_file: matches.opt_str("out").map(|f| f.trim().to_string()),
        seed: parse_number(&matches, "seed")?,
        output_dir: matches
            .opt_str("output_dir")
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| OUTPUT_DIR_DEFAULT.to_string()),
        header,
        batch_size,
        log_file: matches.opt_str("log_file").map(|f| f.trim().to_string()),
        verbose: matches.opt_present("verbose"),
    }))
}
