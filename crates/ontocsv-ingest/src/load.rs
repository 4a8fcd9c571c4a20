//! Source table loading.
//!
//! BioPortal serves ontology CSV exports gzip-compressed. The loader accepts
//! an `http(s)://` URL or a local path and gunzips the stream whenever it
//! starts with the gzip magic bytes, so plain CSV works too.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::time::Duration;

use flate2::read::MultiGzDecoder;

use crate::error::{ConvertError, Result};
use crate::table::Table;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Load `location` restricted to `columns` (in that order).
pub fn load_table(location: &str, columns: &[String]) -> Result<Table> {
    tracing::info!(location, columns = columns.len(), "loading source table");
    let table = read_table(open_source(location)?, columns)?;
    tracing::info!(rows = table.len(), "source table loaded");
    Ok(table)
}

/// Open a local file or fetch a URL, decompressing gzip transparently.
pub fn open_source(location: &str) -> Result<Box<dyn Read>> {
    let raw: Box<dyn Read> = if is_remote(location) {
        Box::new(fetch(location)?)
    } else {
        let file = File::open(location)
            .map_err(|e| ConvertError::Load(format!("cannot open {location}: {e}")))?;
        Box::new(file)
    };
    maybe_gunzip(raw).map_err(|e| ConvertError::Load(format!("cannot read {location}: {e}")))
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn fetch(url: &str) -> Result<reqwest::blocking::Response> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| ConvertError::Load(format!("http client: {e}")))?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| ConvertError::Load(format!("download failed: {e}")))?;
    tracing::debug!(status = %response.status(), "download started");
    Ok(response)
}

fn maybe_gunzip(raw: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    let mut reader = BufReader::new(raw);
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if compressed {
        tracing::debug!("gzip stream detected");
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Parse a headered CSV, keeping exactly `columns`.
///
/// Missing cells (short records) become empty strings, which is also how
/// empty fields arrive, so "missing" and "empty" are indistinguishable
/// downstream. Null-like tokens such as `NA`, `NaN`, `null` and `N/A` are
/// kept as data and never rewritten to empty cells.
pub fn read_table<R: Read>(reader: R, columns: &[String]) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ConvertError::Load(format!("cannot read header row: {e}")))?
        .clone();

    let mut indices = Vec::with_capacity(columns.len());
    let mut missing = Vec::new();
    for column in columns {
        match headers.iter().position(|h| h == column) {
            Some(idx) => indices.push(idx),
            None => missing.push(column.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(ConvertError::Load(format!(
            "source table lacks column(s): {}",
            missing.join(", ")
        )));
    }

    let mut table = Table::new(columns.to_vec());
    for (i, record) in csv_reader.records().enumerate() {
        let record = record
            .map_err(|e| ConvertError::Load(format!("malformed record {}: {e}", i + 1)))?;
        let row = indices
            .iter()
            .map(|&idx| record.get(idx).unwrap_or_default().to_string())
            .collect();
        table.push_row(row);
    }
    Ok(table)
}
