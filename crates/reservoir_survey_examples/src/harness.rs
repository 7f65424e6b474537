//! Design-of-experiments harness: generates grids over a parameter sweep, times every
//! strategy on each grid, and cross-checks that all strategies agree.
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use reservoir_survey::error::Result;
use reservoir_survey::grid::{generate, GenerateConfig, Grid};
use reservoir_survey::partition::{Partition, ReservoirFinder, StrategyKind, TraversalStats};
use tracing::{info, warn};

/// Reservoir listings are printed only below this many reservoirs.
const DETAIL_LIMIT: usize = 10;

/// One partitioning run of one strategy over one grid.
pub struct SimulationRun<'a> {
    grid: &'a Grid,
    finder: ReservoirFinder,
    partition: Option<Partition>,
    elapsed: Option<Duration>,
}

impl<'a> SimulationRun<'a> {
    pub fn new(grid: &'a Grid, kind: StrategyKind) -> Self {
        Self {
            grid,
            finder: ReservoirFinder::new(kind),
            partition: None,
            elapsed: None,
        }
    }

    /// Partitions the grid and records the wall-clock time taken.
    pub fn execute(&mut self) -> &Partition {
        let start = Instant::now();
        let partition = self.finder.partition(self.grid);
        self.elapsed = Some(start.elapsed());
        self.partition.insert(partition)
    }

    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn time_to_run(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn number_of_reservoirs(&self) -> Option<usize> {
        self.partition.as_ref().map(Partition::len)
    }

    pub fn average_reservoir_size(&self) -> Option<f64> {
        self.partition.as_ref().map(Partition::average_size)
    }

    /// Human-readable summary; lists every reservoir when there are only a few.
    pub fn describe(&self) -> String {
        let Some(partition) = &self.partition else {
            return String::from("not executed");
        };
        let mut out = String::new();
        if partition.len() < DETAIL_LIMIT {
            let mut sorted = partition.clone();
            sorted.canonicalize();
            for reservoir in sorted.iter() {
                let locations: Vec<String> = reservoir.iter().map(|c| c.to_string()).collect();
                let _ = writeln!(
                    out,
                    "Reservoir size = {}, locations: {}",
                    reservoir.len(),
                    locations.join("; ")
                );
            }
        }
        let _ = writeln!(out, "Average reservoir size: {:.3}", partition.average_size());
        let _ = writeln!(out, "Number of reservoirs: {}", partition.len());
        if let Some(elapsed) = self.elapsed {
            let _ = writeln!(out, "Time to run: {:.3e} s", elapsed.as_secs_f64());
        }
        out
    }
}

/// Measurements of one strategy on one grid.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub size: usize,
    pub probability: f64,
    pub seed: u64,
    pub strategy: StrategyKind,
    /// Active cells in the grid.
    pub sites: usize,
    pub reservoirs: usize,
    pub average_reservoir_size: f64,
    pub generate_time: Duration,
    pub partition_time: Duration,
    pub stats: TraversalStats,
}

/// Every report of a sweep plus the parameter points where strategies disagreed.
#[derive(Debug, Clone, Default)]
pub struct ExperimentResult {
    pub reports: Vec<RunReport>,
    /// `(size, probability)` points whose partitions differed between strategies.
    pub mismatches: Vec<(usize, f64)>,
}

/// Parameter sweep over grid sizes, thresholds and strategies.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub grid_sizes: Vec<usize>,
    pub probabilities: Vec<f64>,
    pub strategies: Vec<StrategyKind>,
    pub seed: u64,
}

impl Experiment {
    pub fn new(grid_sizes: Vec<usize>, probabilities: Vec<f64>) -> Self {
        Self {
            grid_sizes,
            probabilities,
            strategies: StrategyKind::ALL.to_vec(),
            seed: 0,
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<StrategyKind>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the sweep. Each grid is generated once and shared by all strategies.
    pub fn run(&self) -> Result<ExperimentResult> {
        let mut result = ExperimentResult::default();

        for &size in &self.grid_sizes {
            for &probability in &self.probabilities {
                let config = GenerateConfig::new(size)
                    .with_probability(probability)
                    .with_seed(self.seed);
                let start = Instant::now();
                let grid = generate(&config)?;
                let generate_time = start.elapsed();
                info!(size, probability, sites = grid.len(), "grid ready");

                let mut reference: Option<Partition> = None;
                let mut agreed = true;
                for &strategy in &self.strategies {
                    let mut run = SimulationRun::new(&grid, strategy);
                    let partition = run.execute().clone();

                    result.reports.push(RunReport {
                        size,
                        probability,
                        seed: self.seed,
                        strategy,
                        sites: grid.len(),
                        reservoirs: partition.len(),
                        average_reservoir_size: partition.average_size(),
                        generate_time,
                        partition_time: run.time_to_run().unwrap_or_default(),
                        stats: *partition.stats(),
                    });

                    if let Some(r) = &reference {
                        if !r.same_reservoirs(&partition) {
                            warn!(
                                size,
                                probability,
                                strategy = strategy.as_str(),
                                reference = r.strategy(),
                                "strategies disagree"
                            );
                            agreed = false;
                        }
                    } else {
                        reference = Some(partition);
                    }
                }
                if !agreed {
                    result.mismatches.push((size, probability));
                }
            }
        }

        Ok(result)
    }
}

/// Formats reports as a fixed-width table.
pub fn format_table(reports: &[RunReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6} {:>6} {:<20} {:>9} {:>9} {:>9} {:>10} {:>12} {:>12}",
        "size", "prob", "strategy", "sites", "wells", "avg", "edges", "generate_s", "partition_s"
    );
    for r in reports {
        let _ = writeln!(
            out,
            "{:>6} {:>6.2} {:<20} {:>9} {:>9} {:>9.2} {:>10} {:>12.3e} {:>12.3e}",
            r.size,
            r.probability,
            r.strategy.as_str(),
            r.sites,
            r.reservoirs,
            r.average_reservoir_size,
            r.stats.edges_created,
            r.generate_time.as_secs_f64(),
            r.partition_time.as_secs_f64(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_reports_every_combination() {
        let experiment = Experiment::new(vec![10, 30], vec![0.9, 0.6]).with_seed(4);
        let result = experiment.run().unwrap();
        assert_eq!(result.reports.len(), 2 * 2 * StrategyKind::ALL.len());
        assert!(result.mismatches.is_empty());
        for chunk in result.reports.chunks(StrategyKind::ALL.len()) {
            assert!(chunk.iter().all(|r| r.reservoirs == chunk[0].reservoirs));
            assert!(chunk.iter().all(|r| r.sites == chunk[0].sites));
        }
    }

    #[test]
    fn invalid_parameters_abort_the_sweep() {
        let experiment = Experiment::new(vec![10], vec![1.2]);
        assert!(experiment.run().is_err());
    }

    #[test]
    fn simulation_run_reports_average() {
        let grid = Grid::from_cells(8, [(0, 0), (0, 1), (5, 5)]).unwrap();
        let mut run = SimulationRun::new(&grid, StrategyKind::AdjacencyGraph);
        assert_eq!(run.number_of_reservoirs(), None);
        assert_eq!(run.describe(), "not executed");
        run.execute();
        assert_eq!(run.number_of_reservoirs(), Some(2));
        assert_eq!(run.average_reservoir_size(), Some(1.5));
        let text = run.describe();
        assert!(text.contains("Reservoir size = 2, locations: (0, 0); (0, 1)"));
        assert!(text.contains("Number of reservoirs: 2"));
    }

    #[test]
    fn table_has_header_and_rows() {
        let result = Experiment::new(vec![10], vec![0.85])
            .with_strategies(vec![StrategyKind::FloodFill])
            .run()
            .unwrap();
        let table = format_table(&result.reports);
        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().nth(1).unwrap().contains("flood_fill"));
    }
}
