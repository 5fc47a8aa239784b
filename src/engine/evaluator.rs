//! Board evaluation metrics used by the metric and lookahead strategies.
//!
//! Every metric scores a board from one team's point of view as its own
//! value minus the opponent's, so higher is better for `team`.

use crate::error::{EngineError, Result};
use crate::games::ninja_taisen::board::Board;
use crate::games::ninja_taisen::types::Team;

pub trait Metric: Send + Sync {
    fn name(&self) -> &'static str;

    fn calculate(&self, board: &Board, team: Team) -> f64;
}

/// Own card count minus the opponent's.
pub struct CountMetric;

impl Metric for CountMetric {
    fn name(&self) -> &'static str {
        "count"
    }

    fn calculate(&self, board: &Board, team: Team) -> f64 {
        board.card_count(team) as f64 - board.card_count(team.other()) as f64
    }
}

/// Cards weighted by how far they have advanced: -5 on the home slot up to
/// +5 on the goal slot.
pub struct PositionMetric;

impl PositionMetric {
    pub fn slot_weight(team: Team, slot: usize) -> f64 {
        let advanced = slot.abs_diff(team.home_slot()) as f64;
        advanced - 5.0
    }

    fn team_value(board: &Board, team: Team) -> f64 {
        board
            .piles(team)
            .iter()
            .enumerate()
            .map(|(slot, pile)| pile.len() as f64 * Self::slot_weight(team, slot))
            .sum()
    }
}

impl Metric for PositionMetric {
    fn name(&self) -> &'static str {
        "position"
    }

    fn calculate(&self, board: &Board, team: Team) -> f64 {
        Self::team_value(board, team) - Self::team_value(board, team.other())
    }
}

/// Cards weighted by how many opposing cards they can beat.
pub struct StrengthMetric;

impl StrengthMetric {
    pub fn strength_weight(strength: u8) -> f64 {
        match strength {
            1 => 3.0,
            2 => 4.0,
            3 => 5.0,
            _ => 9.0,
        }
    }

    fn team_value(board: &Board, team: Team) -> f64 {
        board
            .piles(team)
            .iter()
            .flatten()
            .map(|card| Self::strength_weight(card.strength))
            .sum()
    }
}

impl Metric for StrengthMetric {
    fn name(&self) -> &'static str {
        "strength"
    }

    fn calculate(&self, board: &Board, team: Team) -> f64 {
        Self::team_value(board, team) - Self::team_value(board, team.other())
    }
}

pub fn lookup_metric(name: &str) -> Result<Box<dyn Metric>> {
    match name {
        "count" => Ok(Box::new(CountMetric)),
        "position" => Ok(Box::new(PositionMetric)),
        "strength" => Ok(Box::new(StrengthMetric)),
        other => Err(EngineError::UnknownMetric(other.to_string())),
    }
}
