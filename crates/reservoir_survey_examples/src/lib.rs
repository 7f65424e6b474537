#![forbid(unsafe_code)]

pub mod harness;
pub mod render;
pub mod xml;

pub use harness::{format_table, Experiment, ExperimentResult, RunReport, SimulationRun};
pub use render::{render_ascii, Rendered, MAX_RENDER_SIZE};
pub use xml::{grid_to_xml, write_grid_xml};

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
