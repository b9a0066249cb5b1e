use std::convert::Infallible;

/// One row of a convergence trace. Iteration `0` is the random seed, reported
/// with a `max_delta` of `1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TraceRow<'a> {
    pub iteration: u64,
    pub max_delta: f64,
    pub skills: &'a [f64],
}

impl TraceRow<'_> {
    pub fn to_record(&self) -> TraceRecord {
        TraceRecord {
            iteration: self.iteration,
            max_delta: self.max_delta,
            skills: self.skills.to_vec(),
        }
    }
}

/// Owned [`TraceRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub iteration: u64,
    pub max_delta: f64,
    pub skills: Vec<f64>,
}

/// Receives the per-iteration progress of an estimation.
pub trait TraceSink {
    type Error;

    fn record(&mut self, row: TraceRow<'_>) -> Result<(), Self::Error>;

    /// Called once after the last row.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Discards all rows.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    type Error = Infallible;

    #[inline]
    fn record(&mut self, _row: TraceRow<'_>) -> Result<(), Infallible> {
        Ok(())
    }
}

impl TraceSink for Vec<TraceRecord> {
    type Error = Infallible;

    fn record(&mut self, row: TraceRow<'_>) -> Result<(), Infallible> {
        self.push(row.to_record());
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    type Error = S::Error;

    #[inline]
    fn record(&mut self, row: TraceRow<'_>) -> Result<(), S::Error> {
        (**self).record(row)
    }

    #[inline]
    fn finish(&mut self) -> Result<(), S::Error> {
        (**self).finish()
    }
}
