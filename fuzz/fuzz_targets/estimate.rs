#![no_main]

use arbitrary::Arbitrary;
use bradley_terry::{Error, Estimator, GameOutcome, PlayerId};
use libfuzzer_sys::fuzz_target;
use rand::{rngs::StdRng, SeedableRng as _};

#[derive(Arbitrary, Debug)]
struct Input {
    seed: u64,
    outcomes: Vec<(u8, u8)>,
}

fuzz_target!(|input: Input| {
    let outcomes: Vec<GameOutcome> = input
        .outcomes
        .iter()
        .map(|&(winner, loser)| {
            GameOutcome::new(PlayerId(usize::from(winner % 16)), PlayerId(usize::from(loser % 16)))
        })
        .collect();

    let estimator = Estimator::builder().max_iterations(Some(500)).build();
    let mut rng = StdRng::seed_from_u64(input.seed);

    match estimator.estimate(&mut rng, &outcomes) {
        Ok(skills) => {
            let n = outcomes
                .iter()
                .map(|outcome| outcome.winner.max(outcome.loser).0 + 1)
                .max()
                .unwrap_or(0);
            assert_eq!(skills.len(), n);
            assert!(skills.iter().all(|s| s.is_finite() && *s >= 0.0));
            assert!((skills.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        Err(Error::InvalidInput(_)) => assert!(outcomes.is_empty()),
        Err(Error::NumericDegenerate | Error::NotConverged { .. }) => (),
        Err(err) => panic!("unexpected error: {err}"),
    }
});
