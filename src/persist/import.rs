//! Bulk import of delimited edgelists and affiliation lists.
//!
//! Import is best effort: a row that cannot be parsed or is rejected by the
//! layer is skipped and counted, never fatal. Only a column beyond the
//! header row's width (`FileColumnsError`) or a broken input stream aborts
//! the import.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::NodeId;
use crate::network::Network;
use crate::outcome::OperationResult;
use crate::{Error, Result};

/// Column layout of an edgelist file. Column indices are 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgelistOptions {
    pub separator: u8,
    pub has_header: bool,
    pub from_col: usize,
    pub to_col: usize,
    /// Tie value column. Without it every tie gets value 1.
    pub value_col: Option<usize>,
    pub add_missing_nodes: bool,
}

impl Default for EdgelistOptions {
    fn default() -> Self {
        Self {
            separator: b'\t',
            has_header: false,
            from_col: 0,
            to_col: 1,
            value_col: None,
            add_missing_nodes: true,
        }
    }
}

/// Column layout of an affiliation file: one `(node, hyperedge)` pair per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationOptions {
    pub separator: u8,
    pub has_header: bool,
    pub node_col: usize,
    pub hyperedge_col: usize,
    pub add_missing_nodes: bool,
}

impl Default for AffiliationOptions {
    fn default() -> Self {
        Self {
            separator: b'\t',
            has_header: false,
            node_col: 0,
            hyperedge_col: 1,
            add_missing_nodes: true,
        }
    }
}

/// Imported and skipped row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub imported: usize,
    pub skipped: usize,
}

fn import_error(err: csv::Error) -> Error {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            other => Error::UnexpectedImport(format!("{other:?}")),
        }
    } else {
        Error::UnexpectedImport(err.to_string())
    }
}

fn open(path: &Path, separator: u8, has_header: bool) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(import_error)
}

/// Check requested columns against the header row. Without a header there
/// is no authoritative width, and short rows are skipped one by one.
fn check_columns(rdr: &mut csv::Reader<std::fs::File>, has_header: bool, columns: &[usize]) -> Result<bool> {
    if !has_header {
        return Ok(true);
    }
    let width = rdr.headers().map_err(import_error)?.len();
    if width == 0 {
        return Ok(false);
    }
    if let Some(&col) = columns.iter().find(|&&c| c >= width) {
        return Err(Error::FileColumns(format!(
            "column {col} requested but the file has {width} columns"
        )));
    }
    Ok(true)
}

/// Undecodable rows are skipped; only stream failures abort.
fn readable(row: usize, record: csv::Result<csv::StringRecord>) -> Result<Option<csv::StringRecord>> {
    match record {
        Ok(record) => Ok(Some(record)),
        Err(err) if err.is_io_error() => Err(import_error(err)),
        Err(err) => {
            debug!(row, %err, "undecodable row skipped");
            Ok(None)
        }
    }
}

fn cell<'r>(record: &'r csv::StringRecord, col: usize) -> Option<&'r str> {
    record.get(col).filter(|c| !c.is_empty())
}

fn parse_edge(record: &csv::StringRecord, opts: &EdgelistOptions) -> Option<(NodeId, NodeId, f32)> {
    let from = cell(record, opts.from_col)?.parse().ok()?;
    let to = cell(record, opts.to_col)?.parse().ok()?;
    let value = match opts.value_col {
        Some(col) => cell(record, col)?.parse().ok()?,
        None => 1.0,
    };
    Some((from, to, value))
}

fn try_import_edgelist(network: &mut Network, layer: &str, path: &Path, opts: &EdgelistOptions) -> Result<ImportCounts> {
    network.layer_ref(layer)?.as_one_mode()?;
    let mut rdr = open(path, opts.separator, opts.has_header)?;
    let mut columns = vec![opts.from_col, opts.to_col];
    columns.extend(opts.value_col);
    let mut counts = ImportCounts::default();
    if !check_columns(&mut rdr, opts.has_header, &columns)? {
        return Ok(counts);
    }

    for (row, record) in rdr.records().enumerate() {
        let Some(record) = readable(row, record)? else {
            counts.skipped += 1;
            continue;
        };
        let Some((from, to, value)) = parse_edge(&record, opts) else {
            debug!(row, "malformed edgelist row skipped");
            counts.skipped += 1;
            continue;
        };
        match network.try_add_edge(layer, from, to, value, opts.add_missing_nodes) {
            Ok(()) => counts.imported += 1,
            Err(err) => {
                debug!(row, %from, %to, %err, "edgelist row rejected");
                counts.skipped += 1;
            }
        }
    }
    info!(path = %path.display(), layer, imported = counts.imported, skipped = counts.skipped, "edgelist imported");
    Ok(counts)
}

/// Import ties into a one-mode layer. Payload: imported and skipped rows.
pub fn import_edgelist(network: &mut Network, layer: &str, path: &Path, opts: &EdgelistOptions) -> OperationResult<ImportCounts> {
    OperationResult::from_result(try_import_edgelist(network, layer, path, opts), |c| {
        format!("Imported {} edges into '{layer}' ({} rows skipped)", c.imported, c.skipped)
    })
}

fn try_import_affiliations(
    network: &mut Network,
    layer: &str,
    path: &Path,
    opts: &AffiliationOptions,
) -> Result<ImportCounts> {
    network.layer_ref(layer)?.as_two_mode()?;
    let mut rdr = open(path, opts.separator, opts.has_header)?;
    let mut counts = ImportCounts::default();
    if !check_columns(&mut rdr, opts.has_header, &[opts.node_col, opts.hyperedge_col])? {
        return Ok(counts);
    }

    for (row, record) in rdr.records().enumerate() {
        let Some(record) = readable(row, record)? else {
            counts.skipped += 1;
            continue;
        };
        let parsed = cell(&record, opts.node_col)
            .and_then(|c| c.parse::<NodeId>().ok())
            .zip(cell(&record, opts.hyperedge_col));
        let Some((node, hyper)) = parsed else {
            debug!(row, "malformed affiliation row skipped");
            counts.skipped += 1;
            continue;
        };
        match network.try_add_affiliation(layer, node, hyper, true, opts.add_missing_nodes) {
            Ok(true) => counts.imported += 1,
            Ok(false) => {
                debug!(row, %node, hyper, "duplicate affiliation skipped");
                counts.skipped += 1;
            }
            Err(err) => {
                debug!(row, %node, hyper, %err, "affiliation row rejected");
                counts.skipped += 1;
            }
        }
    }
    info!(path = %path.display(), layer, imported = counts.imported, skipped = counts.skipped, "affiliations imported");
    Ok(counts)
}

/// Import `(node, hyperedge)` pairs into a two-mode layer, creating
/// hyperedges on demand. Payload: imported and skipped rows.
pub fn import_affiliations(
    network: &mut Network,
    layer: &str,
    path: &Path,
    opts: &AffiliationOptions,
) -> OperationResult<ImportCounts> {
    OperationResult::from_result(try_import_affiliations(network, layer, path, opts), |c| {
        format!("Imported {} affiliations into '{layer}' ({} rows skipped)", c.imported, c.skipped)
    })
}
