use std::{cmp::Ordering, ops::Index, slice};

use crate::{Error, PlayerId};

/// Estimated skill of every competitor, indexed by [`PlayerId`].
///
/// Vectors returned by the estimator lie on the probability simplex: all
/// entries are non-negative and sum to `1.0`. [`SkillVector::normalize()`]
/// only rescales, and `From<Vec<f64>>` keeps the values as given, so neither
/// checks that invariant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillVector(Vec<f64>);

impl From<SkillVector> for Vec<f64> {
    #[inline]
    fn from(SkillVector(skills): SkillVector) -> Vec<f64> {
        skills
    }
}

impl From<Vec<f64>> for SkillVector {
    #[inline]
    fn from(skills: Vec<f64>) -> SkillVector {
        SkillVector(skills)
    }
}

impl Index<PlayerId> for SkillVector {
    type Output = f64;

    #[inline]
    fn index(&self, PlayerId(id): PlayerId) -> &f64 {
        &self.0[id]
    }
}

impl<'a> IntoIterator for &'a SkillVector {
    type Item = &'a f64;
    type IntoIter = slice::Iter<'a, f64>;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, f64> {
        self.0.iter()
    }
}

impl SkillVector {
    /// Rescales `values` so that they sum to `1.0`.
    ///
    /// Fails with [`Error::NumericDegenerate`] instead of producing `NaN` or
    /// infinite entries when the sum is zero (or not finite).
    pub fn normalize(values: Vec<f64>) -> Result<SkillVector, Error> {
        let divisor: f64 = values.iter().sum();
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(Error::NumericDegenerate);
        }
        Ok(SkillVector(values.into_iter().map(|v| v / divisor).collect()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, PlayerId(id): PlayerId) -> Option<f64> {
        self.0.get(id).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, f64> {
        self.0.iter()
    }

    #[inline]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Largest absolute entry-wise difference. Entries missing from the
    /// shorter vector are ignored.
    pub fn max_abs_diff(&self, other: &SkillVector) -> f64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Probability that `a` beats `b` according to the Bradley-Terry model.
    ///
    /// Undefined (`None`) if either id is out of range or both competitors
    /// have zero skill.
    pub fn win_probability(&self, a: PlayerId, b: PlayerId) -> Option<f64> {
        let (a, b) = (self.get(a)?, self.get(b)?);
        let total = a + b;
        (total > 0.0).then_some(a / total)
    }

    /// Competitors ordered from strongest to weakest. Ties are broken by id.
    pub fn leaderboard(&self) -> Vec<(PlayerId, f64)> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .enumerate()
            .map(|(id, &skill)| (PlayerId(id), skill))
            .collect();
        entries.sort_by(|(a_id, a), (b_id, b)| {
            b.partial_cmp(a)
                .unwrap_or(Ordering::Equal)
                .then(a_id.cmp(b_id))
        });
        entries
    }
}
