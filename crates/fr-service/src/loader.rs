//! Build a hazard-annotated road graph from the configured sources.

use std::path::Path;

use log::{info, warn};

use fr_spatial::{
    read_geojson, GraphBuilder, HazardIndex, HazardStats, RoadGraph, SpatialError, SpatialResult,
};

use crate::ServiceConfig;

/// Read both sources, build the graph and stamp hazard flags.
///
/// A missing hazard file is not an error: the graph is built with no
/// hazards.  Every other failure is returned to the caller.
pub fn load_network(config: &ServiceConfig) -> SpatialResult<(RoadGraph, HazardStats)> {
    let index = load_hazards(&config.hazards_path)?;
    let roads = read_geojson(&config.roads_path)?;
    let mut graph = GraphBuilder::with_precision(config.coord_precision).build(&roads)?;
    let stats = graph.annotate_hazards(&index);
    info!(
        "network loaded from {}: {} nodes, {} edges, {} flooded",
        config.roads_path.display(),
        graph.node_count(),
        graph.edge_count(),
        stats.num_flooded_edges,
    );
    Ok((graph, stats))
}

/// Hazard index from `path`, or an empty index if the file does not exist.
pub fn load_hazards(path: &Path) -> SpatialResult<HazardIndex> {
    match read_geojson(path) {
        Ok(doc) => HazardIndex::build(&doc),
        Err(SpatialError::MissingSource(p)) => {
            warn!("hazard source {} not found; routing without hazards", p.display());
            Ok(HazardIndex::empty())
        }
        Err(e) => Err(e),
    }
}
