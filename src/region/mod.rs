//! Region analysis: flood-fill region map, boundary extrema and the
//! directional adjacency graph the instruction graph is decoded from.

mod bounds;
mod fill;
mod graph;

pub use fill::{RegionId, RegionMap};
pub use graph::{Exit, Region, RegionGraph, ResolveConfig};
