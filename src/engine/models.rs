//! Wire data types exchanged with callers of the engine.
//!
//! Cards travel as three-character codes ("MJ4", "WR2"); boards as a map
//! from slot to pile per team, bottom card first, empty piles omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::games::ninja_taisen::types::{Category, Team};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDto {
    #[serde(default)]
    pub monkey: BTreeMap<usize, Vec<String>>,
    #[serde(default)]
    pub wolf: BTreeMap<usize, Vec<String>>,
}

impl BoardDto {
    pub fn piles(&self, team: Team) -> &BTreeMap<usize, Vec<String>> {
        match team {
            Team::Monkey => &self.monkey,
            Team::Wolf => &self.wolf,
        }
    }

    pub fn piles_mut(&mut self, team: Team) -> &mut BTreeMap<usize, Vec<String>> {
        match team {
            Team::Monkey => &mut self.monkey,
            Team::Wolf => &mut self.wolf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollDto {
    pub rock: u8,
    pub paper: u8,
    pub scissors: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDto {
    pub dice_category: Category,
    pub card: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChooseRequest {
    pub board: BoardDto,
    pub dice: DiceRollDto,
    pub team: Team,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Seed for tie-breaking; unseeded requests use entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_strategy() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooseResponse {
    pub moves: Vec<MoveDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub board: BoardDto,
    pub dice: DiceRollDto,
    pub team: Team,
    pub moves: Vec<MoveDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub board: BoardDto,
}

/// One game to simulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionDto {
    pub id: u64,
    pub seed: u64,
    pub monkey_strategy: String,
    pub wolf_strategy: String,
}

/// Persisted outcome of one simulated game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDto {
    pub id: u64,
    pub seed: u64,
    pub monkey_strategy: String,
    pub wolf_strategy: String,
    /// "monkey", "wolf" or "none".
    pub winner: String,
    pub turn_count: usize,
    pub monkey_cards_left: usize,
    pub wolf_cards_left: usize,
    #[serde(default)]
    pub duration_ms: f64,
    #[serde(default)]
    pub worker: String,
}

pub fn winner_label(winner: Option<Team>) -> String {
    winner.map_or_else(|| "none".to_string(), |team| team.to_string())
}
