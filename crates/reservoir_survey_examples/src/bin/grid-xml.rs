use std::fs::File;
use std::io::{self, BufWriter};

use reservoir_survey::prelude::*;
use reservoir_survey_examples::{init_tracing, write_grid_xml};

/// Usage: grid-xml [output.xml]. Writes to stdout without an argument.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let grid = generate(&GenerateConfig::new(25).with_seed(25))?;

    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::create(&path)?;
            write_grid_xml(&grid, BufWriter::new(file))?;
            tracing::info!(path = %path, sites = grid.len(), "wrote grid");
        }
        None => write_grid_xml(&grid, io::stdout().lock())?,
    }

    Ok(())
}
