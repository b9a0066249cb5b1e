use std::{error::Error as StdError, fs::File, path::PathBuf};

use bradley_terry::{generate_outcomes, Estimator, SkillVector};
use bradley_terry_research::{init_logging, trace::CsvTrace};
use clap::Parser as _;
use log::info;
use rand::{rngs::StdRng, SeedableRng as _};
use rayon::prelude::*;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(clap::Parser)]
struct Opt {
    /// Ground truth skill of each player.
    #[clap(long, value_delimiter = ',', num_args = 1.., default_value = "1,2")]
    skills: Vec<f64>,
    /// Games simulated per trial.
    #[clap(long, default_value = "1000")]
    games: usize,
    /// Independent trials, each with its own random stream.
    #[clap(long, default_value = "1")]
    trials: u64,
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long)]
    max_iterations: Option<u64>,
    /// Write the convergence trace of the first trial to this CSV file.
    #[clap(long)]
    trace: Option<PathBuf>,
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run_trial(
    opt: &Opt,
    estimator: &Estimator,
    seed: u64,
    trial: u64,
) -> Result<SkillVector, BoxError> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial));
    let outcomes = generate_outcomes(&mut rng, &opt.skills, opt.games)?;
    Ok(match (trial, &opt.trace) {
        (0, Some(path)) => {
            estimator.estimate_with_trace(&mut rng, &outcomes, CsvTrace::new(File::create(path)?))?
        }
        _ => estimator.estimate(&mut rng, &outcomes)?,
    })
}

fn main() -> Result<(), BoxError> {
    let opt = Opt::parse();
    init_logging(opt.verbose)?;

    let seed = opt.seed.unwrap_or_else(rand::random);
    let truth = SkillVector::normalize(opt.skills.clone())?;
    let estimator = Estimator::builder()
        .max_iterations(opt.max_iterations)
        .build();

    info!(
        "simulating {} trials of {} games between {} players (seed {})",
        opt.trials,
        opt.games,
        truth.len(),
        seed
    );

    let estimates = (0..opt.trials)
        .into_par_iter()
        .map(|trial| run_trial(&opt, &estimator, seed, trial))
        .collect::<Result<Vec<_>, _>>()?;

    let mut mean = vec![0.0; truth.len()];
    let mut mean_abs_error = 0.0;
    for estimate in &estimates {
        // Players that never played are missing from the tail of an estimate.
        for (total, skill) in mean.iter_mut().zip(estimate) {
            *total += skill / estimates.len() as f64;
        }
        let error: f64 = truth
            .iter()
            .enumerate()
            .map(|(i, t)| (estimate.as_slice().get(i).copied().unwrap_or(0.0) - t).abs())
            .sum();
        mean_abs_error += error / (truth.len() * estimates.len()) as f64;
    }

    println!("player,truth,mean_estimate");
    for (i, (t, m)) in truth.iter().zip(&mean).enumerate() {
        println!("{i},{t},{m}");
    }
    println!("# mean absolute error: {mean_abs_error}");

    Ok(())
}
