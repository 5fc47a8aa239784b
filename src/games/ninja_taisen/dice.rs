//! The three biased dice rolled at the start of every turn.

use once_cell::sync::Lazy;
use rand::Rng;

use super::types::Category;
use crate::error::{EngineError, Result};

pub const DICE_FACES: [u8; 6] = [1, 1, 1, 2, 2, 3];

/// Probability of a single die showing `face`.
pub fn face_probability(face: u8) -> f64 {
    DICE_FACES.iter().filter(|&&f| f == face).count() as f64 / DICE_FACES.len() as f64
}

/// One roll of the rock, paper and scissors dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiceRolls {
    pub rock: u8,
    pub paper: u8,
    pub scissors: u8,
}

impl DiceRolls {
    pub fn new(rock: u8, paper: u8, scissors: u8) -> Result<Self> {
        let rolls = Self {
            rock,
            paper,
            scissors,
        };
        for (category, roll) in rolls.iter() {
            if !DICE_FACES.contains(&roll) {
                return Err(EngineError::InvalidDice { category, roll });
            }
        }
        Ok(rolls)
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut face = || DICE_FACES[rng.gen_range(0..DICE_FACES.len())];
        Self {
            rock: face(),
            paper: face(),
            scissors: face(),
        }
    }

    /// The roll for a die category. Jokers have no die.
    pub fn get(&self, category: Category) -> Option<u8> {
        match category {
            Category::Rock => Some(self.rock),
            Category::Paper => Some(self.paper),
            Category::Scissors => Some(self.scissors),
            Category::Joker => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> {
        [
            (Category::Rock, self.rock),
            (Category::Paper, self.paper),
            (Category::Scissors, self.scissors),
        ]
        .into_iter()
    }

    /// Probability of this exact triple being rolled.
    pub fn probability(&self) -> f64 {
        self.iter().map(|(_, roll)| face_probability(roll)).product()
    }
}

/// A possible roll together with its probability.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRolls {
    pub rolls: DiceRolls,
    pub probability: f64,
}

static ALL_OUTCOMES: Lazy<Vec<WeightedRolls>> = Lazy::new(|| {
    let faces = [1u8, 2, 3];
    let mut outcomes = Vec::with_capacity(27);
    for rock in faces {
        for paper in faces {
            for scissors in faces {
                let rolls = DiceRolls {
                    rock,
                    paper,
                    scissors,
                };
                outcomes.push(WeightedRolls {
                    rolls,
                    probability: rolls.probability(),
                });
            }
        }
    }
    outcomes
});

/// Every distinct roll of the three dice, weighted by face probability.
pub fn all_outcomes() -> &'static [WeightedRolls] {
    &ALL_OUTCOMES
}
