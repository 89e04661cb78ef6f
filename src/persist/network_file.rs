//! Network file grammar.
//!
//! ```text
//! Name: <network name>
//! NodesetFile: <path>                 (optional)
//!
//! LayerMode: 1
//! LayerName: <name>
//! Directionality: directed|undirected
//! ValueType: binary|valued
//! Selfties: true|false
//! <id>\t<alter>[;<value>]\t...
//!
//! LayerMode: 2
//! LayerName: <name>
//! <hyperedge>\t<member>\t...
//! ```
//!
//! A layer is built from its metadata when its first data row (or the next
//! `LayerMode:` line, or end of input) arrives, so the edge-set shape is
//! bound before any tie is ingested.

use std::io::{BufRead, Write};

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::layer::{Layer, LayerOneMode, LayerTwoMode};
use crate::model::{Directionality, NodeId, ValueType, validate_name};
use crate::network::Network;
use crate::{Error, Result};

/// The parsed contents of a network file, before node-set assembly.
#[derive(Debug)]
pub struct NetworkFile {
    pub name: String,
    pub nodeset_file: Option<String>,
    pub layers: Vec<Layer>,
}

// ============================================================================
// Writing
// ============================================================================

pub fn write_network<W: Write>(network: &Network, nodeset_file: Option<&str>, w: &mut W) -> Result<()> {
    validate_name("network", network.name())?;
    writeln!(w, "Name: {}", network.name())?;
    if let Some(reference) = nodeset_file {
        writeln!(w, "NodesetFile: {reference}")?;
    }
    for layer in network.layers() {
        writeln!(w)?;
        writeln!(w, "LayerMode: {}", layer.mode())?;
        writeln!(w, "LayerName: {}", layer.name())?;
        match layer {
            Layer::OneMode(l) => {
                writeln!(w, "Directionality: {}", l.directionality())?;
                writeln!(w, "ValueType: {}", l.value_type())?;
                writeln!(w, "Selfties: {}", l.selfties())?;
                for (node, row) in l.rows() {
                    writeln!(w, "{node}\t{row}")?;
                }
            }
            Layer::TwoMode(l) => {
                for (name, members) in l.rows() {
                    write!(w, "{name}")?;
                    // A lone name could read back as a `Key:` line.
                    if members.is_empty() {
                        write!(w, "\t")?;
                    }
                    for m in members {
                        write!(w, "\t{m}")?;
                    }
                    writeln!(w)?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

/// Metadata collected for a layer whose rows have not started yet.
#[derive(Debug)]
struct PendingLayer {
    line: usize,
    mode: u8,
    name: Option<String>,
    directionality: Option<Directionality>,
    value_type: Option<ValueType>,
    selfties: Option<bool>,
}

impl PendingLayer {
    /// `at` is the line that forced the build, reported on failure.
    fn build(self, at: usize, config: &EngineConfig) -> Result<Layer> {
        let name = self.name.ok_or_else(|| {
            Error::file_format(at, format!("layer block opened at line {} has no LayerName", self.line))
        })?;
        match self.mode {
            1 => {
                let directionality = self
                    .directionality
                    .ok_or_else(|| Error::file_format(at, format!("layer '{name}' has no Directionality")))?;
                let value_type = self
                    .value_type
                    .ok_or_else(|| Error::file_format(at, format!("layer '{name}' has no ValueType")))?;
                let mut layer = LayerOneMode::new(
                    name,
                    directionality,
                    value_type,
                    self.selfties.unwrap_or(false),
                    config.edge_policy(),
                );
                layer.rebind();
                Ok(Layer::OneMode(layer))
            }
            _ => Ok(Layer::TwoMode(LayerTwoMode::new(name))),
        }
    }
}

/// Where the reader stands inside the current layer block.
enum Block {
    Header,
    Pending(PendingLayer),
    Rows(Layer),
}

const KEYS: [&str; 7] = [
    "Name",
    "NodesetFile",
    "LayerMode",
    "LayerName",
    "Directionality",
    "ValueType",
    "Selfties",
];

/// `Key: value` for a known key, on a line without TAB.
fn metadata(line: &str) -> Option<(&str, &str)> {
    if line.contains('\t') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    KEYS.contains(&key).then(|| (key, value.trim()))
}

fn parse_bool(line: usize, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::file_format(line, format!("'{value}' is not a boolean"))),
    }
}

struct Reader<'a> {
    config: &'a EngineConfig,
    name: Option<String>,
    nodeset_file: Option<String>,
    layers: Vec<Layer>,
    seen: HashSet<String>,
    block: Block,
}

impl Reader<'_> {
    /// Close the current block, building its layer if rows never arrived.
    fn close_block(&mut self, at: usize) -> Result<()> {
        match std::mem::replace(&mut self.block, Block::Header) {
            Block::Header => {}
            Block::Pending(pending) => {
                let layer = pending.build(at, self.config)?;
                self.layers.push(layer);
            }
            Block::Rows(layer) => self.layers.push(layer),
        }
        Ok(())
    }

    fn pending(&mut self, line: usize, key: &str) -> Result<&mut PendingLayer> {
        match &mut self.block {
            Block::Pending(p) => Ok(p),
            Block::Header => Err(Error::file_format(line, format!("{key} outside a layer block"))),
            Block::Rows(_) => Err(Error::file_format(line, format!("{key} after data rows"))),
        }
    }

    fn on_metadata(&mut self, line: usize, key: &str, value: &str) -> Result<()> {
        match key {
            "Name" | "NodesetFile" => {
                if !matches!(self.block, Block::Header) {
                    return Err(Error::file_format(line, format!("{key} must precede the first layer")));
                }
                if key == "Name" {
                    self.name = Some(value.to_string());
                } else if !value.is_empty() {
                    self.nodeset_file = Some(value.to_string());
                }
            }
            "LayerMode" => {
                self.close_block(line)?;
                let mode = match value {
                    "1" => 1,
                    "2" => 2,
                    _ => return Err(Error::file_format(line, format!("'{value}' is not a layer mode"))),
                };
                self.block = Block::Pending(PendingLayer {
                    line,
                    mode,
                    name: None,
                    directionality: None,
                    value_type: None,
                    selfties: None,
                });
            }
            "LayerName" => {
                if value.is_empty() || !self.seen.insert(value.to_string()) {
                    return Err(Error::file_format(line, format!("duplicate or empty layer name '{value}'")));
                }
                self.pending(line, key)?.name = Some(value.to_string());
            }
            "Directionality" => {
                let d: Directionality = value.parse().map_err(|e: Error| Error::file_format(line, e.to_string()))?;
                self.pending(line, key)?.directionality = Some(d);
            }
            "ValueType" => {
                let v: ValueType = value.parse().map_err(|e: Error| Error::file_format(line, e.to_string()))?;
                self.pending(line, key)?.value_type = Some(v);
            }
            "Selfties" => {
                let s = parse_bool(line, value)?;
                self.pending(line, key)?.selfties = Some(s);
            }
            _ => {}
        }
        Ok(())
    }

    /// The layer receiving rows, built from pending metadata on first use.
    fn rows_layer(&mut self, line: usize) -> Result<&mut Layer> {
        if let Block::Pending(_) = self.block {
            let Block::Pending(pending) = std::mem::replace(&mut self.block, Block::Header) else {
                return Err(Error::file_format(line, "layer state lost"));
            };
            let layer = pending.build(line, self.config)?;
            debug!(layer = layer.name(), mode = layer.mode(), "layer bound");
            self.block = Block::Rows(layer);
        }
        match &mut self.block {
            Block::Rows(layer) => Ok(layer),
            _ => Err(Error::file_format(line, "data row before layer metadata")),
        }
    }

    fn on_row(&mut self, line_no: usize, line: &str) -> Result<()> {
        let layer = self.rows_layer(line_no)?;
        let mut cells = line.split('\t');
        let head = cells.next().unwrap_or_default();
        match layer {
            Layer::OneMode(l) => {
                let from: NodeId = head.parse().map_err(|e: Error| Error::file_format(line_no, e.to_string()))?;
                for cell in cells.filter(|c| !c.trim().is_empty()) {
                    let (to, value) = parse_alter(line_no, cell)?;
                    match l.add_edge(from, to, value) {
                        Ok(()) => {}
                        Err(Error::EdgeAlreadyExists(label)) => {
                            warn!(line = line_no, tie = %label, "duplicate tie skipped");
                        }
                        Err(e) => return Err(Error::file_format(line_no, e.to_string())),
                    }
                }
            }
            Layer::TwoMode(l) => {
                let members = cells
                    .filter(|c| !c.trim().is_empty())
                    .map(|c| c.parse::<NodeId>())
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e| Error::file_format(line_no, e.to_string()))?;
                if l.hyperedge(head).is_some() {
                    return Err(Error::file_format(line_no, format!("hyperedge '{head}' listed twice")));
                }
                l.add_hyperedge(head, &members)
                    .map_err(|e| Error::file_format(line_no, e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// `alter` or `alter;value`. A missing value reads as 1.
fn parse_alter(line: usize, cell: &str) -> Result<(NodeId, f32)> {
    let (id, value) = match cell.split_once(';') {
        Some((id, value)) => {
            let value: f32 = value
                .trim()
                .parse()
                .map_err(|_| Error::file_format(line, format!("'{value}' is not a tie value")))?;
            (id, value)
        }
        None => (cell, 1.0),
    };
    let id: NodeId = id.parse().map_err(|e: Error| Error::file_format(line, e.to_string()))?;
    Ok((id, value))
}

pub fn read_network<R: BufRead>(reader: R, config: &EngineConfig) -> Result<NetworkFile> {
    let mut state = Reader {
        config,
        name: None,
        nodeset_file: None,
        layers: Vec::new(),
        seen: HashSet::new(),
        block: Block::Header,
    };
    let mut last_line = 0;
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        last_line = line_no;
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        match metadata(line) {
            Some((key, value)) => state.on_metadata(line_no, key, value)?,
            None => state.on_row(line_no, line)?,
        }
    }
    state.close_block(last_line)?;
    let name = state
        .name
        .ok_or_else(|| Error::file_format(1, "missing Name line"))?;
    Ok(NetworkFile {
        name,
        nodeset_file: state.nodeset_file,
        layers: state.layers,
    })
}
