#![forbid(unsafe_code)]
//! reservoir_survey: seeded oil-site grids and their partition into 8-connected reservoirs.
//!
//! Modules:
//! - grid: cells, grids, the Moore neighbor lookup, and seeded two-pass generation
//! - partition: reservoirs, partitions, and interchangeable traversal strategies
//!   (stack flood fill, adjacency graph with union-find or breadth-first labeling)
//! - events: observation of generation and partitioning runs
//!
//! Every strategy yields the same reservoirs for the same grid; see
//! [`partition::Partition::same_reservoirs`] and [`partition::Partition::check_invariants`].
pub mod error;
pub mod events;
pub mod grid;
pub mod partition;

/// Convenient re-exports for common types. Import with `use reservoir_survey::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        EventSink, FnSink, MultiSink, SurveyEvent, SurveyEventKind, VecSink,
    };
    pub use crate::grid::generator::generate_with_events;
    pub use crate::grid::{
        generate, neighbor_count, neighbors, Cell, CellLookup, GenerateConfig, Grid, GridOrigin,
        DEFAULT_PROBABILITY, MAX_GRID_SIZE,
    };
    pub use crate::partition::{
        partition, partition_by_id, AdjacencyGraph, CellGraph, FloodFill, Labeling, Partition,
        PartitionDefect, Reservoir, ReservoirFinder, ReservoirStrategy, StrategyKind,
        TraversalStats,
    };
}
