use std::{error::Error as StdError, fs::File, io, path::PathBuf};

use bradley_terry::Estimator;
use bradley_terry_research::{
    init_logging,
    outcome::{PlayerIds, RawOutcome},
    trace::CsvTrace,
};
use clap::Parser as _;
use log::info;
use rand::{rngs::StdRng, SeedableRng as _};

/// Reads `winner,loser` records from stdin and prints the estimated skill of
/// every player, strongest first.
#[derive(clap::Parser)]
struct Opt {
    #[clap(long, default_value = "0.0001")]
    stop_threshold: f64,
    #[clap(long)]
    max_iterations: Option<u64>,
    #[clap(long)]
    seed: Option<u64>,
    /// Write the convergence trace to this CSV file.
    #[clap(long)]
    trace: Option<PathBuf>,
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn StdError>> {
    let opt = Opt::parse();
    init_logging(opt.verbose)?;

    if opt.stop_threshold.is_nan() || opt.stop_threshold < 0.0 {
        return Err("stop threshold must be non-negative".into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(io::stdin().lock());

    let mut players = PlayerIds::default();
    let mut outcomes = Vec::new();
    for raw in reader.deserialize() {
        let raw: RawOutcome = raw?;
        outcomes.push(players.outcome(&raw)?);
    }

    info!(
        "read {} outcomes between {} players",
        outcomes.len(),
        players.len()
    );

    let estimator = Estimator::builder()
        .stop_threshold(opt.stop_threshold)
        .max_iterations(opt.max_iterations)
        .build();
    let mut rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let skills = match &opt.trace {
        Some(path) => {
            estimator.estimate_with_trace(&mut rng, &outcomes, CsvTrace::new(File::create(path)?))?
        }
        None => estimator.estimate(&mut rng, &outcomes)?,
    };

    println!("player,skill");
    for (id, skill) in skills.leaderboard() {
        println!("{},{}", players.name(id).unwrap_or_default(), skill);
    }

    Ok(())
}
