use reservoir_survey::prelude::*;
use reservoir_survey_examples::{format_table, init_tracing, Experiment};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Sparse grids first; the adjacency graph cost grows with density.
    let experiment = Experiment::new(vec![10, 50, 100, 500], vec![0.99, 0.95, 0.9, 0.85])
        .with_strategies(StrategyKind::ALL.to_vec())
        .with_seed(2025);

    let result = experiment.run()?;
    print!("{}", format_table(&result.reports));

    if result.mismatches.is_empty() {
        println!("All strategies produced identical reservoirs.");
        Ok(())
    } else {
        anyhow::bail!(
            "strategies disagreed at (size, probability) points: {:?}",
            result.mismatches
        )
    }
}
