//! HYG CSV to star document conversion.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use catalog::lenient::{coerce_i64, parse_f64};
use catalog::{NAMED_MAG_CUTOFF, SUN_NAME, StarDocument, StarRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::MultiGzDecoder;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug)]
pub enum PrepareError {
    Io(std::io::Error),
    EmptyInput,
    MissingColumn(&'static str),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for PrepareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepareError::Io(e) => write!(f, "io: {e}"),
            PrepareError::EmptyInput => write!(f, "input has no header row"),
            PrepareError::MissingColumn(name) => write!(f, "missing column: {name}"),
            PrepareError::Csv(e) => write!(f, "csv: {e}"),
            PrepareError::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for PrepareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrepareError::Io(e) => Some(e),
            PrepareError::Csv(e) => Some(e),
            PrepareError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepareError {
    fn from(e: std::io::Error) -> Self {
        PrepareError::Io(e)
    }
}

impl From<csv::Error> for PrepareError {
    fn from(e: csv::Error) -> Self {
        PrepareError::Csv(e)
    }
}

impl From<serde_json::Error> for PrepareError {
    fn from(e: serde_json::Error) -> Self {
        PrepareError::Json(e)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrepareOptions {
    /// Rows fainter than this are dropped.
    pub max_magnitude: f64,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            max_magnitude: NAMED_MAG_CUTOFF,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PrepareReport {
    /// Non-blank data rows read.
    pub rows: usize,
    pub kept: usize,
    pub too_faint: usize,
    pub unnamed: usize,
}

struct Columns {
    id: Option<usize>,
    proper: usize,
    ra: Option<usize>,
    dec: Option<usize>,
    dist: Option<usize>,
    mag: Option<usize>,
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, PrepareError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Ok(Self {
            id: find("id"),
            proper: find("proper").ok_or(PrepareError::MissingColumn("proper"))?,
            ra: find("ra"),
            dec: find("dec"),
            dist: find("dist"),
            mag: find("mag"),
            x: find("x"),
            y: find("y"),
            z: find("z"),
        })
    }
}

fn field(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}

fn number(row: &StringRecord, idx: Option<usize>) -> f64 {
    parse_f64(field(row, idx))
}

/// Reads HYG-style CSV and keeps bright named stars.
///
/// Unparseable numbers become 0, so a row with no magnitude is kept. Blank
/// lines are skipped and short rows read as empty trailing fields.
pub fn prepare_csv<R: Read>(
    reader: R,
    opts: PrepareOptions,
) -> Result<(Vec<StarRecord>, PrepareReport), PrepareError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(PrepareError::EmptyInput);
    }
    let cols = Columns::from_headers(headers)?;

    let mut report = PrepareReport::default();
    let mut stars = Vec::new();

    for row in rdr.records() {
        let row = row?;
        report.rows += 1;

        let mag = number(&row, cols.mag);
        if mag > opts.max_magnitude {
            report.too_faint += 1;
            continue;
        }
        let proper = field(&row, Some(cols.proper));
        if proper.is_empty() || proper == SUN_NAME {
            report.unnamed += 1;
            continue;
        }

        stars.push(StarRecord {
            id: coerce_i64(&Value::String(field(&row, cols.id).to_string())),
            proper: proper.to_string(),
            ra: number(&row, cols.ra),
            dec: number(&row, cols.dec),
            dist: number(&row, cols.dist),
            mag,
            x: number(&row, cols.x),
            y: number(&row, cols.y),
            z: number(&row, cols.z),
        });
    }

    report.kept = stars.len();
    debug!(?report, "csv processed");
    Ok((stars, report))
}

/// Opens `path` for reading, decompressing `.gz` files.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, PrepareError> {
    let file = File::open(path)?;
    let gz = path.extension().is_some_and(|e| e == "gz");
    Ok(if gz {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}

pub fn write_document(path: &Path, doc: &StarDocument) -> Result<(), PrepareError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, doc)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Full conversion: input file to a `{stars, namedStars}` document on disk.
pub fn prepare_file(
    input: &Path,
    output: &Path,
    opts: PrepareOptions,
) -> Result<PrepareReport, PrepareError> {
    let (stars, report) = prepare_csv(open_input(input)?, opts)?;
    let doc = StarDocument {
        named_stars: stars.clone(),
        stars,
    };
    write_document(output, &doc)?;
    info!(
        rows = report.rows,
        kept = report.kept,
        "wrote {} named stars (mag <= {}) to {}",
        report.kept,
        opts.max_magnitude,
        output.display()
    );
    Ok(report)
}
