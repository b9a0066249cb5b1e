use bradley_terry::{GameOutcome, PlayerId};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// A `winner,loser` CSV record of player names.
#[derive(Deserialize, Debug)]
pub struct RawOutcome {
    pub winner: String,
    pub loser: String,
}

#[derive(Debug, Error)]
pub enum InvalidRecord {
    #[error("empty player name")]
    EmptyName,
    #[error("player {0:?} cannot play against themselves")]
    SelfPlay(String),
}

/// Assigns dense ids to player names in order of first appearance.
#[derive(Default)]
pub struct PlayerIds {
    inner: FxHashMap<Box<str>, PlayerId>,
    names: Vec<Box<str>>,
}

impl PlayerIds {
    pub fn get_or_insert(&mut self, name: &str) -> PlayerId {
        if let Some(&id) = self.inner.get(name) {
            return id;
        }
        let id = PlayerId(self.names.len());
        self.names.push(name.into());
        self.inner.insert(name.into(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<PlayerId> {
        self.inner.get(name).copied()
    }

    pub fn name(&self, PlayerId(id): PlayerId) -> Option<&str> {
        self.names.get(id).map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn outcome(&mut self, raw: &RawOutcome) -> Result<GameOutcome, InvalidRecord> {
        if raw.winner.is_empty() || raw.loser.is_empty() {
            return Err(InvalidRecord::EmptyName);
        }
        if raw.winner == raw.loser {
            return Err(InvalidRecord::SelfPlay(raw.winner.clone()));
        }
        Ok(GameOutcome::new(
            self.get_or_insert(&raw.winner),
            self.get_or_insert(&raw.loser),
        ))
    }
}
