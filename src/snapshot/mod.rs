// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

//! Loading of road network snapshots.
//!
//! A snapshot is a JSON document with two arrays, `nodes` and `edges`,
//! holding [Nodes](Node) and [Edges](Edge) in their serde representation:
//!
//! ```json
//! {
//!   "nodes": [{"id": 1, "lat": 43.54, "lon": -80.25}, {"id": 2, "lat": 43.54, "lon": -80.248}],
//!   "edges": [{"id": 10, "source": 1, "target": 2, "length": 161.2, "road_type": "residential"}]
//! }
//! ```
//!
//! Snapshots may be compressed with gzip or bzip2.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{load_graph, Edge, Graph, GraphHandle, LoadError, Node};

/// Format of the input snapshot file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the compression based on the content
    #[default]
    Unknown,

    /// Force uncompressed JSON
    Json,

    /// Force JSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force JSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

impl FileFormat {
    /// Guesses the format from the first few bytes of a snapshot.
    /// Anything which isn't gzip or bzip2 is assumed to be plain JSON.
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&[0x1f, 0x8b]) {
            FileFormat::JsonGz
        } else if prefix.starts_with(b"BZh") {
            FileFormat::JsonBz2
        } else {
            FileFormat::Json
        }
    }
}

/// Additional controls for reading snapshots.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Format of the input data.
    pub file_format: FileFormat,
}

/// Serialized form of a whole road network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    /// Captures all nodes and edges of a [Graph].
    pub fn from_graph(g: &Graph) -> Self {
        Self {
            nodes: g.iter().copied().collect(),
            edges: g.edges().cloned().collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Parses a [Snapshot] from a reader, without building a [Graph].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn read_from_io<R: io::Read>(options: &Options, reader: R) -> Result<Snapshot, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => {
            let detected = FileFormat::detect(b.fill_buf()?);
            log::debug!(target: "strider::snapshot", "detected format: {:?}", detected);
            detected
        }
        f => f,
    };

    let snapshot: Snapshot = match format {
        FileFormat::Unknown | FileFormat::Json => serde_json::from_reader(b)?,

        FileFormat::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            serde_json::from_reader(io::BufReader::new(d))?
        }

        FileFormat::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            serde_json::from_reader(io::BufReader::new(d))?
        }
    };
    Ok(snapshot)
}

/// Loads a snapshot from a reader into a [Graph] as per the provided [Options].
pub fn load_from_io<R: io::Read>(options: &Options, reader: R) -> Result<GraphHandle, Error> {
    let snapshot = read_from_io(options, reader)?;
    Ok(load_graph(snapshot.nodes, snapshot.edges)?)
}

/// Loads a snapshot from a file at the provided path into a [Graph] as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<GraphHandle, Error> {
    let f = File::open(path)?;
    load_from_io(options, f)
}

/// Loads a snapshot from a static buffer into a [Graph] as per the provided [Options].
pub fn load_from_buffer(options: &Options, data: &[u8]) -> Result<GraphHandle, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if format == FileFormat::Json {
        // Fast path is available for in-memory JSON data
        let snapshot: Snapshot = serde_json::from_slice(data)?;
        Ok(load_graph(snapshot.nodes, snapshot.edges)?)
    } else {
        load_from_io(&Options { file_format: format }, io::Cursor::new(data))
    }
}

/// Serializes all nodes and edges of a [Graph] as an uncompressed JSON snapshot.
pub fn write_to_io<W: io::Write>(g: &Graph, writer: W) -> Result<(), Error> {
    serde_json::to_writer(writer, &Snapshot::from_graph(g))?;
    Ok(())
}
