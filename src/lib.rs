//! Skill estimation from pairwise win/loss outcomes with the Bradley-Terry
//! model, where competitor `i` beats competitor `j` with probability
//! `p[i] / (p[i] + p[j])`.
//!
//! The maximum likelihood skills are found by a minorization-maximization
//! fixed-point iteration. A generator for synthetic outcomes with known
//! ground truth is included to validate the estimator.
//!
//! All randomness is drawn from a caller-supplied [`rand::Rng`], so runs can
//! be made reproducible, and concurrent runs can use independent streams.
//!
//! ```
//! use bradley_terry::{generate_outcomes, Estimator, PlayerId};
//! use rand::{rngs::StdRng, SeedableRng as _};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let outcomes = generate_outcomes(&mut rng, &[1.0, 2.0], 1000)?;
//! let skills = Estimator::new().estimate(&mut rng, &outcomes)?;
//! assert!(skills[PlayerId(0)] < skills[PlayerId(1)]);
//! # Ok::<_, bradley_terry::Error>(())
//! ```
//!
//! Estimation has no iteration limit unless one is configured with
//! [`EstimatorBuilder::max_iterations()`]. Adversarial or disconnected
//! comparison graphs may otherwise keep it running indefinitely.

mod error;
mod estimator;
mod outcome;
mod skill;
mod trace;
mod win_matrix;

pub use error::Error;
pub use estimator::{log_likelihood, mm_step, Estimator, EstimatorBuilder};
pub use outcome::{generate_one_outcome, generate_outcomes, GameOutcome, PlayerId};
pub use skill::SkillVector;
pub use trace::{NoTrace, TraceRecord, TraceRow, TraceSink};
pub use win_matrix::WinMatrix;
