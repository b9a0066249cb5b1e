use std::error::Error as StdError;

use log::{debug, trace, warn};
use rand::Rng;

use crate::{Error, GameOutcome, NoTrace, PlayerId, SkillVector, TraceRow, TraceSink, WinMatrix};

#[derive(Debug, Clone)]
pub struct EstimatorBuilder {
    stop_threshold: f64,
    max_iterations: Option<u64>,
}

impl Default for EstimatorBuilder {
    fn default() -> EstimatorBuilder {
        EstimatorBuilder::new()
    }
}

impl EstimatorBuilder {
    pub fn new() -> EstimatorBuilder {
        EstimatorBuilder {
            stop_threshold: 1e-4,
            max_iterations: None,
        }
    }

    /// Iteration stops once no skill changes by this much or more.
    pub fn stop_threshold(&mut self, stop_threshold: f64) -> &mut Self {
        assert!(stop_threshold >= 0.0);
        self.stop_threshold = stop_threshold;
        self
    }

    /// Gives up after this many update steps. Unbounded by default, in which
    /// case estimation may not terminate for some pathological inputs.
    pub fn max_iterations(&mut self, max_iterations: Option<u64>) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> Estimator {
        Estimator {
            stop_threshold: self.stop_threshold,
            max_iterations: self.max_iterations,
        }
    }
}

/// Maximum likelihood estimator for the Bradley-Terry model, solved with the
/// minorization-maximization fixed-point iteration.
#[derive(Debug, Clone)]
pub struct Estimator {
    stop_threshold: f64,
    max_iterations: Option<u64>,
}

impl Default for Estimator {
    fn default() -> Estimator {
        Estimator::new()
    }
}

impl Estimator {
    pub fn builder() -> EstimatorBuilder {
        EstimatorBuilder::default()
    }

    pub fn new() -> Estimator {
        Estimator::builder().build()
    }

    pub fn stop_threshold(&self) -> f64 {
        self.stop_threshold
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Estimates the skill of every competitor from `(winner, loser)`
    /// outcomes. The result has one entry per id up to the largest id seen,
    /// and sums to `1.0`.
    pub fn estimate<R>(&self, rng: &mut R, outcomes: &[GameOutcome]) -> Result<SkillVector, Error>
    where
        R: Rng + ?Sized,
    {
        self.estimate_with_trace(rng, outcomes, NoTrace)
    }

    /// Like [`Estimator::estimate()`], additionally reporting every iteration
    /// (including the initial seed) to `sink`.
    pub fn estimate_with_trace<R, S>(
        &self,
        rng: &mut R,
        outcomes: &[GameOutcome],
        sink: S,
    ) -> Result<SkillVector, Error>
    where
        R: Rng + ?Sized,
        S: TraceSink,
        S::Error: StdError + Send + Sync + 'static,
    {
        let w = WinMatrix::from_outcomes(outcomes)?;
        debug!(
            "estimating {} competitors from {} outcomes",
            w.len(),
            outcomes.len()
        );
        self.solve(rng, &w, sink)
    }

    /// Runs the fixed-point iteration on an existing win matrix, starting
    /// from a random point on the simplex.
    pub fn solve<R, S>(&self, rng: &mut R, w: &WinMatrix, mut sink: S) -> Result<SkillVector, Error>
    where
        R: Rng + ?Sized,
        S: TraceSink,
        S::Error: StdError + Send + Sync + 'static,
    {
        let mut record = |iteration: u64, max_delta: f64, p: &SkillVector| {
            sink.record(TraceRow {
                iteration,
                max_delta,
                skills: p.as_slice(),
            })
            .map_err(|err| Error::Trace(Box::new(err)))
        };

        let mut p = SkillVector::normalize((0..w.len()).map(|_| rng.gen::<f64>()).collect())?;
        let mut max_delta = 1.0;
        let mut iteration = 0;
        record(iteration, max_delta, &p)?;

        let result = loop {
            if self.max_iterations.is_some_and(|max| iteration >= max) {
                warn!("giving up after {iteration} iterations (max delta {max_delta})");
                break Err(Error::NotConverged {
                    iterations: iteration,
                    max_delta,
                });
            }

            iteration += 1;
            let next = SkillVector::normalize(mm_step(&p, w))?;
            max_delta = next.max_abs_diff(&p);
            p = next;
            trace!("iteration {iteration}: max delta {max_delta}");
            record(iteration, max_delta, &p)?;

            if max_delta < self.stop_threshold {
                debug!("converged after {iteration} iterations");
                break Ok(p);
            }
        };

        sink.finish().map_err(|err| Error::Trace(Box::new(err)))?;
        result
    }
}

/// One unnormalized minorization-maximization update of the skill estimate
/// `p` given the win matrix `w`.
///
/// Opponents `j` with `p[i] + p[j] == 0` are left out of the denominator.
/// A competitor without any remaining comparisons gets `0.0`.
///
/// # Panics
///
/// Panics if `p` and `w` do not cover the same number of competitors.
pub fn mm_step(p: &SkillVector, w: &WinMatrix) -> Vec<f64> {
    assert_eq!(p.len(), w.len());
    let n = p.len();
    (0..n)
        .map(|i| {
            let numerator = w.total_wins(PlayerId(i)) as f64;
            let mut denominator = 0.0;
            for j in (0..n).filter(|&j| j != i) {
                let pair = p[PlayerId(i)] + p[PlayerId(j)];
                if pair == 0.0 {
                    continue;
                }
                denominator += w.games_between(PlayerId(i), PlayerId(j)) as f64 / pair;
            }
            if denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            }
        })
        .collect()
}

/// Log likelihood of the observed wins under skill estimate `p`.
///
/// Higher is better. Each update of [`mm_step()`] followed by normalization
/// does not decrease it.
///
/// # Panics
///
/// Panics if `p` and `w` do not cover the same number of competitors.
pub fn log_likelihood(p: &SkillVector, w: &WinMatrix) -> f64 {
    assert_eq!(p.len(), w.len());
    let n = p.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            let wins = w.wins(PlayerId(i), PlayerId(j));
            if wins > 0 {
                let (a, b) = (p[PlayerId(i)], p[PlayerId(j)]);
                total += f64::from(wins) * (a / (a + b)).ln();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use std::io;

    use rand::{rngs::StdRng, SeedableRng as _};

    use super::*;
    use crate::{generate_outcomes, TraceRecord};

    fn outcomes(pairs: &[(usize, usize)]) -> Vec<GameOutcome> {
        pairs.iter().copied().map(GameOutcome::from).collect()
    }

    fn assert_close(actual: &SkillVector, expected: &[f64], tolerance: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tolerance, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_solve_two_players() {
        let mut rng = StdRng::seed_from_u64(42);
        let games = generate_outcomes(&mut rng, &[1.0, 2.0], 1000).unwrap();
        let p = Estimator::new().estimate(&mut rng, &games).unwrap();
        assert!(p[PlayerId(0)] < 0.5);
        assert!(p[PlayerId(1)] > 0.5);
    }

    #[test]
    fn test_two_player_cycle() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Estimator::new()
            .estimate(&mut rng, &outcomes(&[(1, 0), (0, 1)]))
            .unwrap();
        assert_close(&p, &[0.5, 0.5], 1e-3);
    }

    #[test]
    fn test_three_player_cycle() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = Estimator::new()
            .estimate(&mut rng, &outcomes(&[(0, 1), (1, 2), (2, 0)]))
            .unwrap();
        let third = 1.0 / 3.0;
        assert_close(&p, &[third, third, third], 1e-3);
    }

    #[test]
    fn test_only_loser_goes_to_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = Estimator::new()
            .estimate(&mut rng, &outcomes(&[(0, 1), (1, 2), (2, 0), (0, 3)]))
            .unwrap();
        let third = 1.0 / 3.0;
        assert_close(&p, &[third, third, third, 0.0], 1e-3);
    }

    #[test]
    fn test_ghost_competitor() {
        let mut rng = StdRng::seed_from_u64(4);
        let p = Estimator::new()
            .estimate(&mut rng, &outcomes(&[(0, 2), (2, 0), (0, 2)]))
            .unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p[PlayerId(1)], 0.0);
        assert!(p[PlayerId(0)] > p[PlayerId(2)]);
    }

    #[test]
    fn test_simplex() {
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let games = generate_outcomes(&mut rng, &[1.0, 2.0, 3.0, 4.0, 0.5], 300).unwrap();
            // Spread ids out to leave gaps.
            let games: Vec<_> = games
                .into_iter()
                .map(|g| GameOutcome::new(PlayerId(g.winner.0 * 2), PlayerId(g.loser.0 * 2)))
                .collect();
            let max_id = games.iter().map(|g| g.winner.max(g.loser).0).max().unwrap();

            let p = Estimator::new().estimate(&mut rng, &games).unwrap();
            assert_eq!(p.len(), max_id + 1);
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!(p.iter().all(|&s| s >= 0.0));
        }
    }

    #[test]
    fn test_recovers_ordering() {
        let mut rng = StdRng::seed_from_u64(5);
        let games = generate_outcomes(&mut rng, &[1.0, 2.0, 4.0, 8.0], 4000).unwrap();
        let p = Estimator::new().estimate(&mut rng, &games).unwrap();
        let ids: Vec<_> = p.leaderboard().into_iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, [3, 2, 1, 0]);
    }

    #[test]
    fn test_invalid_input() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(matches!(
            Estimator::new().estimate(&mut rng, &[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_only_self_play_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            Estimator::new().estimate(&mut rng, &outcomes(&[(0, 0)])),
            Err(Error::NumericDegenerate)
        ));
    }

    #[test]
    fn test_mm_step_skips_zero_pairs() {
        let w = WinMatrix::from_outcomes(&outcomes(&[(0, 1), (2, 0)])).unwrap();
        let p = SkillVector::from(vec![0.0, 0.0, 1.0]);
        assert_eq!(mm_step(&p, &w), [1.0, 0.0, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_mm_step_size_mismatch() {
        let w = WinMatrix::from_outcomes(&outcomes(&[(0, 1)])).unwrap();
        mm_step(&SkillVector::from(vec![0.25; 4]), &w);
    }

    #[test]
    #[should_panic]
    fn test_log_likelihood_size_mismatch() {
        let w = WinMatrix::from_outcomes(&outcomes(&[(0, 1)])).unwrap();
        log_likelihood(&SkillVector::from(vec![0.25; 4]), &w);
    }

    #[test]
    fn test_trace() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rows: Vec<TraceRecord> = Vec::new();
        let p = Estimator::new()
            .estimate_with_trace(&mut rng, &outcomes(&[(0, 1), (1, 2), (2, 0), (0, 2)]), &mut rows)
            .unwrap();

        assert!(rows.len() >= 2);
        assert_eq!(rows[0].iteration, 0);
        assert_eq!(rows[0].max_delta, 1.0);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.iteration, i as u64);
            assert_eq!(row.skills.len(), 3);
            assert!((row.skills.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        let (last, rest) = rows.split_last().unwrap();
        assert_eq!(last.skills, p.as_slice());
        assert!(last.max_delta < 1e-4);
        assert!(rest[1..].iter().all(|row| row.max_delta >= 1e-4));
    }

    #[test]
    fn test_likelihood_does_not_decrease() {
        let mut rng = StdRng::seed_from_u64(9);
        let games = generate_outcomes(&mut rng, &[1.0, 3.0, 2.0], 200).unwrap();
        let w = WinMatrix::from_outcomes(&games).unwrap();
        let mut rows: Vec<TraceRecord> = Vec::new();
        Estimator::new().solve(&mut rng, &w, &mut rows).unwrap();

        let likelihoods: Vec<_> = rows
            .into_iter()
            .map(|row| log_likelihood(&SkillVector::from(row.skills), &w))
            .collect();
        for pair in likelihoods.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9, "{likelihoods:?}");
        }
    }

    #[test]
    fn test_max_iterations() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut rows: Vec<TraceRecord> = Vec::new();
        let estimator = Estimator::builder()
            .stop_threshold(0.0)
            .max_iterations(Some(5))
            .build();
        let result =
            estimator.estimate_with_trace(&mut rng, &outcomes(&[(0, 1), (1, 0)]), &mut rows);
        assert!(matches!(
            result,
            Err(Error::NotConverged { iterations: 5, .. })
        ));
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_stop_threshold() {
        let games = outcomes(&[(0, 1), (1, 2), (2, 0), (0, 2), (1, 0)]);
        let mut coarse: Vec<TraceRecord> = Vec::new();
        let mut fine: Vec<TraceRecord> = Vec::new();
        Estimator::builder()
            .stop_threshold(1e-2)
            .build()
            .estimate_with_trace(&mut StdRng::seed_from_u64(11), &games, &mut coarse)
            .unwrap();
        Estimator::builder()
            .stop_threshold(1e-8)
            .build()
            .estimate_with_trace(&mut StdRng::seed_from_u64(11), &games, &mut fine)
            .unwrap();
        assert!(coarse.len() < fine.len());
        assert_eq!(coarse[0], fine[0]);
    }

    struct FailingSink {
        budget: usize,
        finished: bool,
    }

    impl TraceSink for FailingSink {
        type Error = io::Error;

        fn record(&mut self, _row: TraceRow<'_>) -> io::Result<()> {
            if self.budget == 0 {
                return Err(io::Error::other("sink full"));
            }
            self.budget -= 1;
            Ok(())
        }

        fn finish(&mut self) -> io::Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn test_failing_sink() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut sink = FailingSink {
            budget: 1,
            finished: false,
        };
        let result =
            Estimator::new().estimate_with_trace(&mut rng, &outcomes(&[(0, 1), (1, 0)]), &mut sink);
        assert!(matches!(result, Err(Error::Trace(_))));
        assert!(!sink.finished);

        let mut sink = FailingSink {
            budget: usize::MAX,
            finished: false,
        };
        Estimator::new()
            .estimate_with_trace(&mut rng, &outcomes(&[(0, 1), (1, 0)]), &mut sink)
            .unwrap();
        assert!(sink.finished);
    }
}
