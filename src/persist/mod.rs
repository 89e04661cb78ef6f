//! # Persistence
//!
//! Line-oriented text files for node-sets and networks, optionally gzip
//! wrapped. The format is chosen by the caller through [`FileFormat`];
//! nothing is sniffed from the file contents.
//!
//! | Function | Level | Errors |
//! |----------|-------|--------|
//! | [`read_nodeset`] / [`write_nodeset`] | any `BufRead` / `Write` | `Result` |
//! | [`read_network`] / [`write_network`] | any `BufRead` / `Write` | `Result` |
//! | [`load_nodeset`] / [`save_nodeset`] | file path | `OperationResult` |
//! | [`load_network`] / [`save_network`] | file path | `OperationResult` |
//!
//! At the path level, I/O failures are reported as `LoadError` or
//! `SaveError`; grammar violations keep their `FileFormatError` code.

pub mod import;
mod network_file;
mod nodeset_file;

pub use import::{AffiliationOptions, EdgelistOptions, ImportCounts, import_affiliations, import_edgelist};
pub use network_file::{NetworkFile, read_network, write_network};
pub use nodeset_file::{read_nodeset, write_nodeset};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::model::validate_name;
use crate::network::Network;
use crate::nodeset::Nodeset;
use crate::outcome::OperationResult;
use crate::{Error, Result};

// ============================================================================
// File format
// ============================================================================

/// Stream wrapping of a persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Text,
    Gzip,
}

impl FileFormat {
    /// `Gzip` for paths ending in `.gz`, `Text` otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => FileFormat::Gzip,
            _ => FileFormat::Text,
        }
    }
}

fn open_reader(path: &Path, format: FileFormat) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    match format {
        FileFormat::Text => Ok(Box::new(BufReader::new(file))),
        #[cfg(feature = "gzip")]
        FileFormat::Gzip => Ok(Box::new(BufReader::new(flate2::read::GzDecoder::new(file)))),
        #[cfg(not(feature = "gzip"))]
        FileFormat::Gzip => Err(Error::InvalidArgument("built without gzip support".into())),
    }
}

/// Output stream that must be finished explicitly so gzip trailers and
/// buffered bytes reach the file before the call returns.
enum Sink {
    Text(BufWriter<File>),
    #[cfg(feature = "gzip")]
    Gzip(flate2::write::GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn create(path: &Path, format: FileFormat) -> Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        match format {
            FileFormat::Text => Ok(Sink::Text(file)),
            #[cfg(feature = "gzip")]
            FileFormat::Gzip => Ok(Sink::Gzip(flate2::write::GzEncoder::new(
                file,
                flate2::Compression::default(),
            ))),
            #[cfg(not(feature = "gzip"))]
            FileFormat::Gzip => Err(Error::InvalidArgument("built without gzip support".into())),
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Sink::Text(mut w) => w.flush(),
            #[cfg(feature = "gzip")]
            Sink::Gzip(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Text(w) => w.write(buf),
            #[cfg(feature = "gzip")]
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Text(w) => w.flush(),
            #[cfg(feature = "gzip")]
            Sink::Gzip(w) => w.flush(),
        }
    }
}

fn load_error(path: &Path, err: Error) -> Error {
    match err {
        Error::Io(e) => Error::Load(format!("{}: {e}", path.display())),
        other => other,
    }
}

fn save_error(path: &Path, err: Error) -> Error {
    match err {
        Error::Io(e) => Error::Save(format!("{}: {e}", path.display())),
        other => other,
    }
}

/// A node-set reference is relative to the directory of the network file.
fn resolve_sibling(network_path: &Path, reference: &Path) -> PathBuf {
    if reference.is_absolute() {
        return reference.to_path_buf();
    }
    match network_path.parent() {
        Some(dir) => dir.join(reference),
        None => reference.to_path_buf(),
    }
}

// ============================================================================
// Node-set files
// ============================================================================

fn try_load_nodeset(path: &Path, format: FileFormat, config: &EngineConfig) -> Result<Nodeset> {
    let reader = open_reader(path, format).map_err(|e| load_error(path, e))?;
    let nodeset = read_nodeset(reader, config).map_err(|e| load_error(path, e))?;
    info!(
        path = %path.display(),
        nodes = nodeset.nbr_nodes(),
        attributes = nodeset.registry().len(),
        "nodeset loaded"
    );
    Ok(nodeset)
}

pub fn load_nodeset(path: &Path, format: FileFormat, config: &EngineConfig) -> OperationResult<Nodeset> {
    OperationResult::from_result(try_load_nodeset(path, format, config), |ns| {
        format!("Nodeset '{}' loaded with {} nodes", ns.name(), ns.nbr_nodes())
    })
}

fn try_save_nodeset(nodeset: &Nodeset, path: &Path, format: FileFormat) -> Result<()> {
    validate_name("nodeset", nodeset.name())?;
    let mut sink = Sink::create(path, format).map_err(|e| save_error(path, e))?;
    write_nodeset(nodeset, &mut sink).map_err(|e| save_error(path, e))?;
    sink.finish().map_err(|e| save_error(path, e.into()))?;
    info!(path = %path.display(), nodes = nodeset.nbr_nodes(), "nodeset saved");
    Ok(())
}

pub fn save_nodeset(nodeset: &Nodeset, path: &Path, format: FileFormat) -> OperationResult {
    OperationResult::from_unit(
        try_save_nodeset(nodeset, path, format),
        format!("Nodeset '{}' saved to {}", nodeset.name(), path.display()),
    )
}

// ============================================================================
// Network files
// ============================================================================

fn try_load_network(path: &Path, format: FileFormat, config: &EngineConfig) -> Result<Network> {
    let reader = open_reader(path, format).map_err(|e| load_error(path, e))?;
    let parsed = read_network(reader, config).map_err(|e| load_error(path, e))?;

    let mut nodeset = match &parsed.nodeset_file {
        Some(reference) => {
            let nodeset_path = resolve_sibling(path, Path::new(reference));
            try_load_nodeset(&nodeset_path, format, config)?
        }
        None => Nodeset::with_config(parsed.name.clone(), config),
    };
    let synthesized = parsed.nodeset_file.is_none();
    for layer in &parsed.layers {
        for id in layer.mentioned_node_ids() {
            if nodeset.ensure_node(id) && !synthesized {
                warn!(layer = layer.name(), node = %id, "node missing from nodeset file; added");
            }
        }
    }

    let mut network = Network::with_nodeset(parsed.name, nodeset, *config);
    let nbr_layers = parsed.layers.len();
    for layer in parsed.layers {
        network.insert_layer(layer)?;
    }
    network.mark_saved();
    info!(
        path = %path.display(),
        network = network.name(),
        nodes = network.nodeset().nbr_nodes(),
        layers = nbr_layers,
        "network loaded"
    );
    Ok(network)
}

/// Load a network file. A referenced node-set file is read with the same
/// `format`; without one, the node-set is built from every node id the
/// layers mention.
pub fn load_network(path: &Path, format: FileFormat, config: &EngineConfig) -> OperationResult<Network> {
    OperationResult::from_result(try_load_network(path, format, config), |net| {
        format!(
            "Network '{}' loaded: {} nodes, {} layers",
            net.name(),
            net.nodeset().nbr_nodes(),
            net.nbr_layers()
        )
    })
}

fn try_save_network(network: &Network, path: &Path, format: FileFormat, nodeset_file: Option<&Path>) -> Result<()> {
    validate_name("network", network.name())?;
    if let Some(reference) = nodeset_file {
        try_save_nodeset(network.nodeset(), &resolve_sibling(path, reference), format)?;
    }
    let reference = nodeset_file.map(|p| p.to_string_lossy().into_owned());
    let mut sink = Sink::create(path, format).map_err(|e| save_error(path, e))?;
    write_network(network, reference.as_deref(), &mut sink).map_err(|e| save_error(path, e))?;
    sink.finish().map_err(|e| save_error(path, e.into()))?;
    info!(path = %path.display(), network = network.name(), layers = network.nbr_layers(), "network saved");
    Ok(())
}

/// Save a network file. With `nodeset_file`, the node-set is written there
/// too (relative paths are taken from the network file's directory) and
/// referenced from the network file; without it, isolated nodes and
/// attributes are not persisted. Clears the modified flag on success.
pub fn save_network(network: &mut Network, path: &Path, format: FileFormat, nodeset_file: Option<&Path>) -> OperationResult {
    let res = try_save_network(network, path, format, nodeset_file);
    if res.is_ok() {
        network.mark_saved();
    }
    OperationResult::from_unit(res, format!("Network '{}' saved to {}", network.name(), path.display()))
}
