use crate::{Error, GameOutcome, PlayerId};

/// Dense `n × n` table of pairwise win counts, where `wins(i, j)` is the
/// number of games `i` won against `j`.
///
/// The population size `n` is one more than the largest id that appears in
/// any outcome. Ids that never played still get an all-zero row and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinMatrix {
    n: usize,
    counts: Vec<u32>,
}

impl WinMatrix {
    pub fn from_outcomes(outcomes: &[GameOutcome]) -> Result<WinMatrix, Error> {
        let PlayerId(max_id) = outcomes
            .iter()
            .map(|outcome| outcome.winner.max(outcome.loser))
            .max()
            .ok_or(Error::InvalidInput("no game outcomes"))?;
        let n = max_id
            .checked_add(1)
            .ok_or(Error::InvalidInput("population too large"))?;
        let cells = n
            .checked_mul(n)
            .ok_or(Error::InvalidInput("population too large"))?;

        let mut matrix = WinMatrix {
            n,
            counts: vec![0; cells],
        };
        for outcome in outcomes {
            matrix.counts[outcome.winner.0 * n + outcome.loser.0] += 1;
        }
        Ok(matrix)
    }

    /// Population size.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn wins(&self, PlayerId(winner): PlayerId, PlayerId(loser): PlayerId) -> u32 {
        self.counts[winner * self.n + loser]
    }

    /// Wins of `player` against everyone else. Self-play entries are not
    /// counted.
    pub fn total_wins(&self, player: PlayerId) -> u64 {
        (0..self.n)
            .map(PlayerId)
            .filter(|&opponent| opponent != player)
            .map(|opponent| u64::from(self.wins(player, opponent)))
            .sum()
    }

    #[inline]
    pub fn games_between(&self, a: PlayerId, b: PlayerId) -> u64 {
        u64::from(self.wins(a, b)) + u64::from(self.wins(b, a))
    }
}
