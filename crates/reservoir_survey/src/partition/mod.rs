//! Partitioning of active cells into maximal 8-connected reservoirs.
//!
//! Strategies implement [`ReservoirStrategy`] and are interchangeable: for the same
//! [`Grid`] every strategy returns the same set of reservoirs. [`ReservoirFinder`]
//! wraps a strategy, reports events and produces a [`Partition`].
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use thiserror::Error as ThisError;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::{EventSink, SurveyEvent, SurveyEventKind};
use crate::grid::{neighbors, Cell, Grid};

pub mod adjacency_graph;
pub mod flood_fill;
pub mod stats;

pub use adjacency_graph::{AdjacencyGraph, CellGraph, Labeling};
pub use flood_fill::FloodFill;
pub use stats::TraversalStats;

/// A maximal 8-connected set of active cells, stored sorted and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reservoir {
    cells: Vec<Cell>,
}

impl Reservoir {
    /// Canonicalizes `cells` into a reservoir. The caller guarantees connectivity.
    pub fn from_cells(mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in lexicographic order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Lowest cell in lexicographic order, `None` for an empty reservoir.
    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Reasons a set of reservoirs fails to be a partition of a grid.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PartitionDefect {
    #[error("reservoir {index} is empty")]
    EmptyReservoir { index: usize },

    #[error("cell {cell} in reservoir {index} is not active in the grid")]
    ForeignCell { cell: Cell, index: usize },

    #[error("cell {cell} appears in reservoirs {first} and {second}")]
    DuplicateCell {
        cell: Cell,
        first: usize,
        second: usize,
    },

    #[error("active cell {cell} belongs to no reservoir")]
    MissingCell { cell: Cell },

    #[error("reservoir {index} is not 8-connected")]
    Disconnected { index: usize },

    #[error("cells {cell} and {neighbor} are adjacent but in reservoirs {first} and {second}")]
    AdjacentReservoirs {
        cell: Cell,
        neighbor: Cell,
        first: usize,
        second: usize,
    },
}

/// Result of partitioning a grid: the reservoirs plus the strategy's work counters.
#[derive(Debug, Clone)]
pub struct Partition {
    reservoirs: Vec<Reservoir>,
    strategy: &'static str,
    stats: TraversalStats,
}

impl Partition {
    pub fn new(strategy: &'static str, reservoirs: Vec<Reservoir>, stats: TraversalStats) -> Self {
        Self {
            reservoirs,
            strategy,
            stats,
        }
    }

    /// Number of reservoirs.
    pub fn len(&self) -> usize {
        self.reservoirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservoirs.is_empty()
    }

    pub fn reservoirs(&self) -> &[Reservoir] {
        &self.reservoirs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reservoir> {
        self.reservoirs.iter()
    }

    pub fn into_reservoirs(self) -> Vec<Reservoir> {
        self.reservoirs
    }

    /// Name of the strategy that produced this partition.
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Sum of reservoir sizes.
    pub fn total_cells(&self) -> usize {
        self.reservoirs.iter().map(Reservoir::len).sum()
    }

    /// Mean reservoir size, 0 for an empty partition.
    pub fn average_size(&self) -> f64 {
        if self.reservoirs.is_empty() {
            0.0
        } else {
            self.total_cells() as f64 / self.reservoirs.len() as f64
        }
    }

    pub fn largest(&self) -> Option<&Reservoir> {
        self.reservoirs.iter().max_by_key(|r| r.len())
    }

    /// Sorts reservoirs by their lowest cell.
    pub fn canonicalize(&mut self) {
        self.reservoirs.sort_unstable_by(|a, b| a.cells().cmp(b.cells()));
    }

    /// True when both partitions hold the same reservoirs, in any order.
    pub fn same_reservoirs(&self, other: &Partition) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut a: Vec<&[Cell]> = self.reservoirs.iter().map(Reservoir::cells).collect();
        let mut b: Vec<&[Cell]> = other.reservoirs.iter().map(Reservoir::cells).collect();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    /// Checks coverage, disjointness, connectivity and maximality against `grid`.
    pub fn check_invariants(&self, grid: &Grid) -> std::result::Result<(), PartitionDefect> {
        let mut owner: HashMap<Cell, usize> = HashMap::with_capacity(grid.len());
        for (index, reservoir) in self.reservoirs.iter().enumerate() {
            if reservoir.is_empty() {
                return Err(PartitionDefect::EmptyReservoir { index });
            }
            for cell in reservoir.iter() {
                if !grid.contains(cell) {
                    return Err(PartitionDefect::ForeignCell { cell, index });
                }
                if let Some(first) = owner.insert(cell, index) {
                    return Err(PartitionDefect::DuplicateCell {
                        cell,
                        first,
                        second: index,
                    });
                }
            }
        }

        for cell in grid.iter() {
            let Some(&first) = owner.get(&cell) else {
                return Err(PartitionDefect::MissingCell { cell });
            };
            for neighbor in neighbors(cell, grid) {
                let Some(&second) = owner.get(&neighbor) else {
                    return Err(PartitionDefect::MissingCell { cell: neighbor });
                };
                if second != first {
                    return Err(PartitionDefect::AdjacentReservoirs {
                        cell,
                        neighbor,
                        first,
                        second,
                    });
                }
            }
        }

        for (index, reservoir) in self.reservoirs.iter().enumerate() {
            if !is_connected(reservoir) {
                return Err(PartitionDefect::Disconnected { index });
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Reservoir;
    type IntoIter = std::slice::Iter<'a, Reservoir>;

    fn into_iter(self) -> Self::IntoIter {
        self.reservoirs.iter()
    }
}

fn is_connected(reservoir: &Reservoir) -> bool {
    let cells = reservoir.cells();
    let mut seen = vec![false; cells.len()];
    let mut queue = VecDeque::from([0usize]);
    seen[0] = true;
    let mut reached = 1;
    while let Some(i) = queue.pop_front() {
        for n in cells[i].moore_neighborhood() {
            if let Ok(j) = cells.binary_search(&n) {
                if !seen[j] {
                    seen[j] = true;
                    reached += 1;
                    queue.push_back(j);
                }
            }
        }
    }
    reached == cells.len()
}

/// A traversal strategy that discovers reservoirs in a borrowed grid.
pub trait ReservoirStrategy: Send + Sync {
    /// Stable identifier, matching [`StrategyKind::as_str`] for built-in strategies.
    fn name(&self) -> &'static str;

    /// Returns every reservoir of `grid` and records work in `stats`.
    fn find_reservoirs(&self, grid: &Grid, stats: &mut TraversalStats) -> Vec<Reservoir>;
}

/// Identifiers of the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    #[default]
    FloodFill,
    AdjacencyGraph,
    AdjacencyGraphBfs,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::FloodFill,
        StrategyKind::AdjacencyGraph,
        StrategyKind::AdjacencyGraphBfs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::FloodFill => "flood_fill",
            StrategyKind::AdjacencyGraph => "adjacency_graph",
            StrategyKind::AdjacencyGraphBfs => "adjacency_graph_bfs",
        }
    }

    pub fn strategy(self) -> Box<dyn ReservoirStrategy> {
        match self {
            StrategyKind::FloodFill => Box::new(FloodFill),
            StrategyKind::AdjacencyGraph => Box::new(AdjacencyGraph::new(Labeling::UnionFind)),
            StrategyKind::AdjacencyGraphBfs => {
                Box::new(AdjacencyGraph::new(Labeling::BreadthFirst))
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnsupportedStrategy { id: s.to_owned() })
    }
}

/// Runs one traversal strategy over grids.
pub struct ReservoirFinder {
    strategy: Box<dyn ReservoirStrategy>,
}

impl Default for ReservoirFinder {
    fn default() -> Self {
        Self::new(StrategyKind::FloodFill)
    }
}

impl ReservoirFinder {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            strategy: kind.strategy(),
        }
    }

    /// Uses a caller-provided strategy.
    pub fn with_strategy(strategy: Box<dyn ReservoirStrategy>) -> Self {
        Self { strategy }
    }

    /// Resolves a strategy identifier; unknown ids fail with [`Error::UnsupportedStrategy`].
    pub fn from_id(id: &str) -> Result<Self> {
        Ok(Self::new(id.parse()?))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Partitions `grid`. The grid is borrowed and left unchanged.
    pub fn partition(&self, grid: &Grid) -> Partition {
        self.partition_with_events(grid, &mut ())
    }

    pub fn partition_with_events(&self, grid: &Grid, sink: &mut dyn EventSink) -> Partition {
        let name = self.strategy.name();
        debug!(strategy = name, active = grid.len(), "partition started");
        if sink.wants(SurveyEventKind::PartitionStarted) {
            sink.send(SurveyEvent::PartitionStarted {
                strategy: name,
                active_cells: grid.len(),
            });
        }

        let mut stats = TraversalStats::new();
        let reservoirs = if grid.is_empty() {
            Vec::new()
        } else {
            self.strategy.find_reservoirs(grid, &mut stats)
        };

        if sink.wants(SurveyEventKind::ReservoirFound) {
            for (index, r) in reservoirs.iter().enumerate() {
                sink.send(SurveyEvent::ReservoirFound {
                    index,
                    cells: r.len(),
                });
            }
        }

        info!(
            strategy = name,
            reservoirs = reservoirs.len(),
            cells_visited = stats.cells_visited,
            edges_created = stats.edges_created,
            "partition finished"
        );
        if sink.wants(SurveyEventKind::PartitionFinished) {
            sink.send(SurveyEvent::PartitionFinished {
                strategy: name,
                reservoirs: reservoirs.len(),
                stats,
            });
        }

        Partition::new(name, reservoirs, stats)
    }
}

/// Partitions `grid` with a built-in strategy.
pub fn partition(grid: &Grid, kind: StrategyKind) -> Partition {
    ReservoirFinder::new(kind).partition(grid)
}

/// Partitions `grid` with the strategy named `id`.
pub fn partition_by_id(grid: &Grid, id: &str) -> Result<Partition> {
    Ok(ReservoirFinder::from_id(id)?.partition(grid))
}
