//! Node-set file grammar.
//!
//! ```text
//! <name>\t<attr>:<type>\t<attr>:<type>...
//! <id>\t<value>\t<value>...
//! ```
//!
//! Attribute columns follow definition index order. An empty cell means the
//! attribute is unset for that node.

use std::io::{BufRead, Write};

use crate::config::EngineConfig;
use crate::model::{AttributeType, AttributeValue, NodeId, validate_name};
use crate::nodeset::{AttrIndex, Nodeset};
use crate::{Error, Result};

pub fn write_nodeset<W: Write>(nodeset: &Nodeset, w: &mut W) -> Result<()> {
    validate_name("nodeset", nodeset.name())?;
    let definitions = nodeset.attribute_definitions();
    write!(w, "{}", nodeset.name())?;
    for def in &definitions {
        write!(w, "\t{}:{}", def.name, def.attr_type)?;
    }
    writeln!(w)?;

    for &id in nodeset.node_ids().iter() {
        write!(w, "{id}")?;
        for def in &definitions {
            match nodeset.attribute_value(id, def.index) {
                Some(value) => write!(w, "\t{value}")?,
                None => write!(w, "\t")?,
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

pub fn read_nodeset<R: BufRead>(reader: R, config: &EngineConfig) -> Result<Nodeset> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut nodeset: Option<Nodeset> = None;
    let mut columns: Vec<(AttrIndex, AttributeType)> = Vec::new();

    // Header: first non-blank line.
    for (line_no, line) in lines.by_ref() {
        let line = line?;
        let line = strip_eol(&line);
        if line.trim().is_empty() {
            continue;
        }
        let mut cells = line.split('\t');
        let name = cells.next().unwrap_or_default();
        let mut ns = Nodeset::with_config(name, config);
        for cell in cells {
            let (attr, type_name) = cell
                .split_once(':')
                .ok_or_else(|| Error::file_format(line_no, format!("expected attr:type, got '{cell}'")))?;
            let attr_type: AttributeType = type_name
                .parse()
                .map_err(|e: Error| Error::file_format(line_no, e.to_string()))?;
            let index = ns
                .registry_mut()
                .define(attr, attr_type)
                .map_err(|e| Error::file_format(line_no, e.to_string()))?;
            columns.push((index, attr_type));
        }
        nodeset = Some(ns);
        break;
    }
    let mut nodeset = nodeset.ok_or_else(|| Error::file_format(1, "missing nodeset header"))?;

    for (line_no, line) in lines {
        let line = line?;
        let line = strip_eol(&line);
        if line.trim().is_empty() {
            continue;
        }
        let mut cells = line.split('\t');
        let id: NodeId = cells
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|e: Error| Error::file_format(line_no, e.to_string()))?;
        nodeset
            .insert_node(id)
            .map_err(|e| Error::file_format(line_no, e.to_string()))?;
        for (col, cell) in cells.enumerate() {
            let &(index, attr_type) = columns
                .get(col)
                .ok_or_else(|| Error::file_format(line_no, format!("node {id} has more cells than attributes")))?;
            if cell.is_empty() {
                continue;
            }
            let value = AttributeValue::parse(attr_type, cell)
                .map_err(|e| Error::file_format(line_no, e.to_string()))?;
            nodeset.store_value(id, index, value);
        }
    }
    Ok(nodeset)
}
