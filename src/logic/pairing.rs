//! Pairing universe: every possible partnership of the roster and which ones are used up.

use crate::models::PlayerId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Minimum roster size for a doubles schedule.
pub const MIN_PLAYERS: usize = 4;

/// Order-independent identity of a partnership: {A, B} and {B, A} give the same key.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PairKey(PlayerId, PlayerId);

impl PairKey {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }
}

/// Two players who could team up. Keeps the order it was enumerated in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Partnership(pub PlayerId, pub PlayerId);

impl Partnership {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.0, self.1)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.0 == player || self.1 == player
    }

    /// True iff the two partnerships share a player.
    pub fn overlaps(&self, other: &Partnership) -> bool {
        self.contains(other.0) || self.contains(other.1)
    }

    pub fn members(&self) -> [PlayerId; 2] {
        [self.0, self.1]
    }
}

/// All C(n, 2) partnerships of a roster in a seeded random order, plus the used set.
#[derive(Clone, Debug, Default)]
pub struct PairingUniverse {
    players: Vec<PlayerId>,
    pairs: Vec<Partnership>,
    used: HashSet<PairKey>,
}

impl PairingUniverse {
    /// Shuffle the roster with `rng` and enumerate every pair in that order.
    ///
    /// With fewer than [`MIN_PLAYERS`] players the universe is empty; check
    /// [`PairingUniverse::is_empty`].
    pub fn new<R: Rng + ?Sized>(player_ids: &[PlayerId], rng: &mut R) -> Self {
        if player_ids.len() < MIN_PLAYERS {
            return Self::default();
        }
        let mut players = player_ids.to_vec();
        players.shuffle(rng);

        let n = players.len();
        let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(Partnership(players[i], players[j]));
            }
        }
        Self {
            players,
            pairs,
            used: HashSet::new(),
        }
    }

    /// Roster in shuffled order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Every partnership, used or not, in enumeration order.
    pub fn pairs(&self) -> &[Partnership] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// No partnerships: the roster was too small.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_used(&self, pair: &Partnership) -> bool {
        self.used.contains(&pair.key())
    }

    pub fn mark_used(&mut self, pair: &Partnership) {
        self.used.insert(pair.key());
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Every partnership has been played.
    pub fn is_exhausted(&self) -> bool {
        self.used.len() >= self.pairs.len()
    }

    /// Partnerships not yet used, in enumeration order.
    pub fn unused(&self) -> Vec<Partnership> {
        self.pairs
            .iter()
            .filter(|p| !self.is_used(p))
            .copied()
            .collect()
    }
}
