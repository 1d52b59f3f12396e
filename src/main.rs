// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use strider::cost::Dimension;
use strider::geojson::{feature_collection, StraightSegments};
use strider::{
    Algorithm, GraphHandle, InterpretedPreferences, KDTree, NodeLocator, PreferenceWeights,
    SearchOptions,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] strider::snapshot::Error);

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct PreferencesLoadError(PathBuf, #[source] Box<dyn Error>);

#[derive(Debug, thiserror::Error)]
enum EndpointError {
    #[error("either --{0} or --{0}-node must be provided")]
    Missing(&'static str),

    #[error("graph has no nodes")]
    EmptyGraph,
}

/// A `lat,lon` pair.
#[derive(Debug, Clone, Copy)]
struct Position {
    lat: f64,
    lon: f64,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {:?}", s))?;
    let lat = lat.trim().parse().map_err(|e| format!("latitude: {}", e))?;
    let lon = lon.trim().parse().map_err(|e| format!("longitude: {}", e))?;
    Ok(Position { lat, lon })
}

fn parse_weight(s: &str) -> Result<(Dimension, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=MULTIPLIER, got {:?}", s))?;
    let dimension = key.trim().parse().map_err(|e| format!("{}", e))?;
    let multiplier = value
        .trim()
        .parse()
        .map_err(|e| format!("multiplier: {}", e))?;
    Ok((dimension, multiplier))
}

/// Finds a route through a road network snapshot and prints it as GeoJSON.
#[derive(Parser)]
struct Cli {
    /// The path to the snapshot file (JSON, optionally gzip or bzip2 compressed)
    snapshot: PathBuf,

    /// Start position, snapped to the nearest node
    #[arg(long, value_name = "LAT,LON", value_parser = parse_position, allow_hyphen_values = true)]
    start: Option<Position>,

    /// End position, snapped to the nearest node
    #[arg(long, value_name = "LAT,LON", value_parser = parse_position, allow_hyphen_values = true)]
    end: Option<Position>,

    /// Start node id, instead of --start
    #[arg(long, conflicts_with = "start", allow_hyphen_values = true)]
    start_node: Option<i64>,

    /// End node id, instead of --end
    #[arg(long, conflicts_with = "end", allow_hyphen_values = true)]
    end_node: Option<i64>,

    /// Preference multiplier, e.g. "motorway=10" or "unlit=2.5"; may be repeated
    #[arg(short, long = "weight", value_name = "KEY=MULTIPLIER", value_parser = parse_weight)]
    weights: Vec<(Dimension, f64)>,

    /// Interpreter output (JSON) to take preference multipliers from;
    /// --weight values take precedence
    #[arg(short, long, value_name = "FILE")]
    preferences: Option<PathBuf>,

    /// Shortest path algorithm: "dijkstra" or "a-star"
    #[arg(short, long, default_value_t = Algorithm::Dijkstra)]
    algorithm: Algorithm,

    /// Maximum number of settled nodes before giving up
    #[arg(long, default_value_t = strider::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Time budget for the search, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_graph(&cli.snapshot)?;

    let mut weights = match cli.preferences {
        Some(ref path) => load_preferences(path)?,
        None => PreferenceWeights::default(),
    };
    for &(dimension, multiplier) in &cli.weights {
        weights.set(dimension, multiplier);
    }

    let (start, end) = resolve_endpoints(&cli, &g)?;

    let options = SearchOptions {
        algorithm: cli.algorithm,
        step_limit: Some(cli.step_limit),
        deadline: cli
            .timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms)),
    };

    let route = strider::find_route_with(&g, start, end, &weights, &options)?;
    log::info!(
        "route from {} to {}: {} segments, {:.2} km, cost {:.1}",
        start,
        end,
        route.segments.len(),
        route.length_km(),
        route.total_cost
    );

    let fc = feature_collection(&route, &StraightSegments(&g));
    serde_json::to_writer_pretty(io::stdout().lock(), &fc)?;
    println!();

    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P) -> Result<GraphHandle, GraphLoadError> {
    let options = strider::snapshot::Options::default();
    strider::snapshot::load_from_file(&options, path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}

fn load_preferences(path: &Path) -> Result<PreferenceWeights, PreferencesLoadError> {
    let read = || -> Result<InterpretedPreferences, Box<dyn Error>> {
        let f = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(f)?)
    };

    match read() {
        Ok(interpreted) => {
            if let Some(ref reasoning) = interpreted.reasoning {
                log::info!("preferences: {}", reasoning);
            }
            Ok(interpreted.preferences)
        }
        Err(e) => Err(PreferencesLoadError(path.to_path_buf(), e)),
    }
}

fn resolve_endpoints(cli: &Cli, g: &GraphHandle) -> Result<(i64, i64), EndpointError> {
    // Only build the spatial index when a position needs snapping
    let tree = if cli.start_node.is_none() || cli.end_node.is_none() {
        Some(KDTree::from_graph(g).ok_or(EndpointError::EmptyGraph)?)
    } else {
        None
    };

    let resolve = |node: Option<i64>,
                   position: Option<Position>,
                   name: &'static str|
     -> Result<i64, EndpointError> {
        if let Some(id) = node {
            return Ok(id);
        }
        let p = position.ok_or(EndpointError::Missing(name))?;
        let id = tree
            .as_ref()
            .and_then(|t| t.nearest_node(p.lat, p.lon))
            .ok_or(EndpointError::EmptyGraph)?;
        log::debug!("{} ({}, {}) snapped to node {}", name, p.lat, p.lon, id);
        Ok(id)
    };

    let start = resolve(cli.start_node, cli.start, "start")?;
    let end = resolve(cli.end_node, cli.end, "end")?;
    Ok((start, end))
}
