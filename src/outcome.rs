use rand::{seq::index, Rng};

use crate::Error;

/// A 0-based competitor index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct PlayerId(pub usize);

impl From<PlayerId> for usize {
    #[inline]
    fn from(PlayerId(id): PlayerId) -> usize {
        id
    }
}

impl From<usize> for PlayerId {
    #[inline]
    fn from(id: usize) -> PlayerId {
        PlayerId(id)
    }
}

/// A single observed game. There are no draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GameOutcome {
    pub winner: PlayerId,
    pub loser: PlayerId,
}

impl GameOutcome {
    #[inline]
    pub fn new(winner: PlayerId, loser: PlayerId) -> GameOutcome {
        GameOutcome { winner, loser }
    }
}

impl From<(usize, usize)> for GameOutcome {
    #[inline]
    fn from((winner, loser): (usize, usize)) -> GameOutcome {
        GameOutcome::new(PlayerId(winner), PlayerId(loser))
    }
}

#[inline]
fn is_positive(skill: f64) -> bool {
    skill.is_finite() && skill > 0.0
}

/// Plays a single game between competitors with skills `a` and `b` under the
/// Bradley-Terry model. Returns `true` if `a` wins, which happens with
/// probability `a / (a + b)`. Both skills must be positive and finite.
pub fn generate_one_outcome<R>(rng: &mut R, a: f64, b: f64) -> Result<bool, Error>
where
    R: Rng + ?Sized,
{
    if !is_positive(a) || !is_positive(b) {
        return Err(Error::InvalidInput("skills must be positive"));
    }
    Ok(rng.gen::<f64>() < 1.0 / (1.0 + b / a))
}

/// Simulates `games` independent games. Each game is played by a uniformly
/// chosen unordered pair of distinct competitors.
pub fn generate_outcomes<R>(
    rng: &mut R,
    skills: &[f64],
    games: usize,
) -> Result<Vec<GameOutcome>, Error>
where
    R: Rng + ?Sized,
{
    if skills.len() < 2 {
        return Err(Error::InvalidInput("need at least two competitors"));
    }
    if !skills.iter().copied().all(is_positive) {
        return Err(Error::InvalidInput("skills must be positive"));
    }

    let mut outcomes = Vec::with_capacity(games);
    for _ in 0..games {
        let pair = index::sample(rng, skills.len(), 2);
        let (j, k) = (pair.index(0), pair.index(1));
        outcomes.push(if generate_one_outcome(rng, skills[j], skills[k])? {
            GameOutcome::from((j, k))
        } else {
            GameOutcome::from((k, j))
        });
    }
    Ok(outcomes)
}
