//! Round and match bookkeeping.
//!
//! Owned by `SimulationEngine`, NOT stored as ECS entities. Targets and
//! projectiles live in the world; this is the scoreboard around them.

use serde::{Deserialize, Serialize};

use rangefire_core::enums::MatchPhase;

/// The round currently in progress, or the most recent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// 0-based round number.
    pub index: usize,
    /// Time spent in this round (ms).
    pub elapsed_ms: f64,
    /// Cumulative score when the round started.
    pub score_baseline: u32,
}

impl RoundState {
    pub fn remaining_ms(&self, duration_ms: f64) -> f64 {
        (duration_ms - self.elapsed_ms).max(0.0)
    }
}

/// Match-wide state carried across rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub score: u32,
    pub hits: u32,
    /// Points earned in each completed round, in order.
    pub round_scores: Vec<u32>,
    pub grenades_remaining: u32,
    pub round: Option<RoundState>,
}

impl MatchState {
    pub fn new(grenade_supply: u32) -> Self {
        Self {
            phase: MatchPhase::NotStarted,
            score: 0,
            hits: 0,
            round_scores: Vec::new(),
            grenades_remaining: grenade_supply,
            round: None,
        }
    }

    /// Index of the round an `AdvanceRound` would start, if any.
    pub fn next_round_index(&self, rounds_total: usize) -> Option<usize> {
        let next = match self.phase {
            MatchPhase::NotStarted => 0,
            MatchPhase::BetweenRounds => self.round.as_ref().map_or(0, |r| r.index + 1),
            MatchPhase::InRound | MatchPhase::Finished => return None,
        };
        (next < rounds_total).then_some(next)
    }

    pub fn begin_round(&mut self, index: usize) {
        self.round = Some(RoundState {
            index,
            elapsed_ms: 0.0,
            score_baseline: self.score,
        });
        self.phase = MatchPhase::InRound;
    }

    pub fn credit_kill(&mut self, points: u32) {
        self.score += points;
        self.hits += 1;
    }

    /// Close the current round and record its points.
    /// Returns `(round index, points earned)`.
    pub fn finish_round(&mut self, rounds_total: usize) -> Option<(usize, u32)> {
        let round = self.round.as_ref()?;
        // Score only ever grows within a match.
        let points = self.score - round.score_baseline;
        let index = round.index;

        self.round_scores.push(points);
        self.phase = if index + 1 >= rounds_total {
            MatchPhase::Finished
        } else {
            MatchPhase::BetweenRounds
        };
        Some((index, points))
    }

    pub fn in_round(&self) -> bool {
        self.phase == MatchPhase::InRound
    }
}
