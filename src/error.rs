use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("cannot normalize a vector that does not have a positive finite sum")]
    NumericDegenerate,
    #[error("not converged after {iterations} iterations (max delta {max_delta})")]
    NotConverged { iterations: u64, max_delta: f64 },
    #[error("trace sink failed: {0}")]
    Trace(#[source] Box<dyn StdError + Send + Sync>),
}
