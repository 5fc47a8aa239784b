//! Pruned one-ply lookahead.
//!
//! Candidates are first ranked by a metric. Only the best slice of them is
//! examined further: for each, every roll of the opponent's next turn is
//! enumerated and the probability that the opponent can win immediately is
//! folded back into the score.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::{choose_best, find_winning, BotStrategy};
use crate::engine::evaluator::Metric;
use crate::error::Result;
use crate::games::ninja_taisen::board::Board;
use crate::games::ninja_taisen::dice::all_outcomes;
use crate::games::ninja_taisen::moves::{gather_all_moves, CompletedMoves};
use crate::games::ninja_taisen::types::Team;

/// How many candidates receive the expensive next-turn analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookaheadParams {
    pub pool_fraction: f64,
    pub min_pool: usize,
    pub max_pool: usize,
}

impl Default for LookaheadParams {
    fn default() -> Self {
        Self {
            pool_fraction: 0.2,
            min_pool: 10,
            max_pool: 20,
        }
    }
}

impl LookaheadParams {
    /// Pool size for `candidates` plans: `pool_fraction` of them, clamped to
    /// `[min_pool, max_pool]` and never more than exist.
    pub fn pool_size(&self, candidates: usize) -> usize {
        let target = (candidates as f64 * self.pool_fraction).round() as usize;
        target
            .clamp(self.min_pool, self.max_pool.max(self.min_pool))
            .min(candidates)
    }
}

/// Weighted probability that `opponent` has an immediately winning reply
/// on its next turn from `board`.
pub fn opponent_win_probability(board: &Board, opponent: Team) -> Result<f64> {
    match board.victorious_team() {
        Some(team) if team == opponent => return Ok(1.0),
        Some(_) => return Ok(0.0),
        None => {}
    }

    let mut probability = 0.0;
    for outcome in all_outcomes() {
        let replies = gather_all_moves(board, opponent, &outcome.rolls)?;
        if replies.iter().any(CompletedMoves::is_winning) {
            probability += outcome.probability;
        }
    }
    Ok(probability)
}

/// Rescale a metric score by the opponent's chance of winning next turn.
/// Safe positions are doubled.
pub fn adjusted_score(score: f64, opponent_win_probability: f64) -> f64 {
    if opponent_win_probability == 0.0 {
        score * 2.0
    } else {
        score * (1.0 - opponent_win_probability)
    }
}

pub struct LookaheadStrategy {
    metric: Box<dyn Metric>,
    params: LookaheadParams,
    name: String,
}

impl LookaheadStrategy {
    pub fn new(metric: Box<dyn Metric>, params: LookaheadParams) -> Self {
        let name = format!("lookahead_{}", metric.name());
        Self {
            metric,
            params,
            name,
        }
    }

    /// Indices of the candidates that go through next-turn analysis, with
    /// their metric scores. Ties at the cutoff are broken by `rng`.
    pub fn select_pool(&self, candidates: &[CompletedMoves], rng: &mut StdRng) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (i, self.metric.calculate(&c.board, c.team)))
            .collect();
        scored.shuffle(rng);
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.params.pool_size(candidates.len()));
        scored
    }
}

impl BotStrategy for LookaheadStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_moves<'a>(
        &self,
        candidates: &'a [CompletedMoves],
        rng: &mut StdRng,
    ) -> Result<Option<&'a CompletedMoves>> {
        if let Some(win) = find_winning(candidates) {
            return Ok(Some(win));
        }

        let pool = self.select_pool(candidates, rng);
        let mut rescored = Vec::with_capacity(pool.len());
        for (index, score) in pool {
            let candidate = &candidates[index];
            let p = opponent_win_probability(&candidate.board, candidate.team.other())?;
            tracing::trace!(index, score, opponent_win = p, "lookahead candidate");
            rescored.push((candidate, adjusted_score(score, p)));
        }
        Ok(choose_best(rescored, rng))
    }
}
