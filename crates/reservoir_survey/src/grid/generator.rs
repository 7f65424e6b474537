//! Seeded two-pass grid generation: one random seeding pass followed by a single
//! clustering pass.
//!
//! `probability` is the threshold a uniform draw must *exceed* for a site to be
//! provisionally active, so higher values produce sparser grids.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{EventSink, SurveyEvent, SurveyEventKind};
use crate::grid::{neighbor_count, validate_size, Cell, Grid, GridOrigin};

/// Threshold used when none is given.
pub const DEFAULT_PROBABILITY: f64 = 0.85;

/// Minimum active neighbors that activate an empty site during clustering.
pub const FILL_NEIGHBOR_COUNT: usize = 4;

/// Parameters for [`generate`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateConfig {
    /// Number of sites along one edge.
    pub size: usize,
    /// Draw threshold in `[0, 1]`; a site is seeded when its draw is strictly greater.
    pub probability: f64,
    /// Random seed. `None` draws a fresh seed from the thread RNG.
    pub seed: Option<u64>,
}

impl GenerateConfig {
    /// Creates a config for a `size × size` grid with the default threshold and no seed.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }

    /// Sets the draw threshold.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        validate_size(self.size)?;
        if !self.probability.is_finite() || !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::InvalidArgument(format!(
                "probability must be within [0, 1], got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

/// Generates a grid from `config`.
///
/// Fails with [`Error::InvalidArgument`] before any sampling when the size or
/// threshold is out of range. For a fixed seed the result is identical across calls.
pub fn generate(config: &GenerateConfig) -> Result<Grid> {
    generate_with_events(config, &mut ())
}

/// Like [`generate`], reporting a [`SurveyEvent::GridGenerated`] to `sink`.
pub fn generate_with_events(config: &GenerateConfig, sink: &mut dyn EventSink) -> Result<Grid> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);

    let provisional = seed_sites(config.size, config.probability, &mut rng);
    let mut grid = cluster(&provisional);
    grid.set_origin(GridOrigin {
        probability: config.probability,
        seed,
    });

    debug!(
        size = config.size,
        probability = config.probability,
        seed,
        seeded = provisional.len(),
        active = grid.len(),
        "generated grid"
    );
    if sink.wants(SurveyEventKind::GridGenerated) {
        sink.send(SurveyEvent::GridGenerated {
            size: config.size,
            probability: config.probability,
            seed,
            seeded_cells: provisional.len(),
            active_cells: grid.len(),
        });
    }

    Ok(grid)
}

/// Uniform draw in `[0, 1)` from the top 53 bits of a `u64`.
#[inline]
pub(crate) fn unit_f64(rng: &mut dyn Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Seeding pass: one draw per coordinate, `x` outer and `y` inner.
fn seed_sites(size: usize, probability: f64, rng: &mut dyn Rng) -> Grid {
    let mut grid = Grid::blank(size);
    for x in 0..size {
        for y in 0..size {
            if unit_f64(rng) > probability {
                grid.insert(Cell::new(x as i32, y as i32));
            }
        }
    }
    grid
}

/// Clustering pass, applied exactly once.
///
/// A site survives when it was seeded and has at least one seeded neighbor; an
/// empty site fills in when at least [`FILL_NEIGHBOR_COUNT`] neighbors were seeded.
fn cluster(provisional: &Grid) -> Grid {
    let size = provisional.size();
    let mut out = Grid::blank(size);
    for x in 0..size {
        for y in 0..size {
            let cell = Cell::new(x as i32, y as i32);
            let seeded = provisional.contains(cell);
            let count = neighbor_count(cell, provisional);
            if (seeded && count != 0) || count >= FILL_NEIGHBOR_COUNT {
                out.insert(cell);
            }
        }
    }
    out
}
