use anyhow::Context;
use reservoir_survey::prelude::*;
use reservoir_survey_examples::{init_tracing, render_ascii, SimulationRun};

/// Usage: survey-basic [size] [probability] [seed] [strategy]
fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let size: usize = match args.first() {
        Some(s) => s.parse().context("size must be a positive integer")?,
        None => 50,
    };
    let probability: f64 = match args.get(1) {
        Some(s) => s.parse().context("probability must be a number")?,
        None => DEFAULT_PROBABILITY,
    };
    let seed: Option<u64> = match args.get(2) {
        Some(s) => Some(s.parse().context("seed must be an unsigned integer")?),
        None => None,
    };
    let strategy: StrategyKind = match args.get(3) {
        Some(s) => s.parse()?,
        None => StrategyKind::FloodFill,
    };

    let mut config = GenerateConfig::new(size).with_probability(probability);
    config.seed = seed;
    let grid = generate(&config)?;

    println!(
        "Grid size: {}, probability: {}, seed: {}, sites: {} ({:.1}% dense)",
        grid.size(),
        probability,
        grid.seed().unwrap_or_default(),
        grid.len(),
        grid.density() * 100.0
    );

    let mut run = SimulationRun::new(&grid, strategy);
    let partition = run.execute().clone();
    println!("{}", render_ascii(&grid, Some(&partition)));
    println!("Method: {strategy}");
    print!("{}", run.describe());

    Ok(())
}
