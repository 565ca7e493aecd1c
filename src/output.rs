use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::{Terminator, WriterBuilder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::{Builder, NamedTempFile};

use crate::config::{Config, SchemaSource};
use crate::error::Error;
use crate::json::{builtin_schema, load_schema_from_file};
use crate::schema::{Row, Schema};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: u64,
    pub path: PathBuf,
    pub seed: u64,
}

/// Resolves where the CSV is written.
///
/// A bare file name (optionally prefixed with `./`) lands in `output_dir`,
/// which is created if missing. Anything with directory components is used
/// as given.
///
/// # Examples
///
/// let path = resolve_output_path("accounts.csv", "outputs")?; // outputs/accounts.csv
///
pub fn resolve_output_path<P: AsRef<Path>, D: AsRef<Path>>(
    out: P,
    output_dir: D,
) -> Result<PathBuf, Error> {
    let out = out.as_ref();
    let is_bare = match out.parent() {
        None => true,
        Some(parent) => parent.as_os_str().is_empty() || parent == Path::new("."),
    };

    if !is_bare {
        return Ok(out.to_path_buf());
    }

    let file_name = out
        .file_name()
        .ok_or_else(|| Error::Usage(format!("Output path {:?} has no file name.", out)))?;
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    Ok(output_dir.join(file_name))
}

/// Opens the hidden file rows are staged in before the final rename.
///
/// The file is opened like any other new file, so the finished CSV gets the
/// process umask's permissions instead of tempfile's owner-only default.
fn create_staging_file(dir: &Path) -> Result<NamedTempFile, Error> {
    let temp = Builder::new()
        .prefix(".crmgen-")
        .suffix(".csv.tmp")
        .make_in(dir, |path| {
            File::options().write(true).create_new(true).open(path)
        })?;
    Ok(temp)
}

/// Writes a header and all `rows` to `path`.
///
/// Data is written to a temporary file next to `path` and moved into place
/// only once every row has been flushed, so a failed run leaves no output.
/// Progress is logged every `batch_size` rows. Returns the number of rows
/// written.
pub fn write_csv<I>(schema: &Schema, rows: I, path: &Path, batch_size: u64) -> Result<u64, Error>
where
    I: IntoIterator<Item = Row>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = create_staging_file(dir)?;

    let columns = schema.columns();
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(temp);
    writer.write_record(&columns)?;

    let mut written = 0u64;
    let mut batch_start = Instant::now();

    for row in rows {
        writer.write_record(row.ordered(&columns))?;
        written += 1;

        if batch_size > 0 && written % batch_size == 0 {
            info!(
                "{} rows processed, {:.3} s elapsed",
                batch_size,
                batch_start.elapsed().as_secs_f64()
            );
            batch_start = Instant::now();
        }
    }

    let temp = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    debug!("Persisted {} rows to {}", written, path.display());
    Ok(written)
}

/// Generate a CSV file as described by the command line configuration.
///
/// Command line values win over the schema's defaults. Without any seed a
/// fresh one is drawn and logged so the run can be repeated.
pub fn generate_data(config: &Config) -> Result<Summary, Error> {
    let schema = match config.schema {
        SchemaSource::Builtin(ref entity) => builtin_schema(entity)?,
        SchemaSource::File(ref file) => {
            info!("Loading schema from: {:?}", file);
            load_schema_from_file(file)?
        }
    };
    let schema = match config.header {
        Some(header) => schema.with_header(header),
        None => schema,
    };
    info!("Schema \"{}\" loaded with {} fields.", schema, schema.fields.len());

    let num_rows = config.num_rows.unwrap_or(schema.defaults.num_rows);
    let seed = config
        .seed
        .or(schema.defaults.seed)
        .unwrap_or_else(rand::random);
    info!("Generating {} rows with seed {}", num_rows, seed);

    let out = config
        .output_file
        .as_deref()
        .unwrap_or(&schema.defaults.output_file);
    let path = resolve_output_path(out, &config.output_dir)?;

    let start_time = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = write_csv(&schema, schema.rows(&mut rng, num_rows), &path, config.batch_size)?;
    info!("Elapsed time: {:.3} s", start_time.elapsed().as_secs_f64());

    Ok(Summary { rows, path, seed })
}
