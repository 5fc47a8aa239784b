//! Domain types for Ninja Taisen: categories, teams and cards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Combat category of a card. Rock, paper and scissors are also the dice names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rock,
    Paper,
    Scissors,
    Joker,
}

impl Category {
    /// The three categories that have a die.
    pub const DICE: [Category; 3] = [Category::Rock, Category::Paper, Category::Scissors];

    pub fn letter(self) -> char {
        match self {
            Category::Rock => 'R',
            Category::Paper => 'P',
            Category::Scissors => 'S',
            Category::Joker => 'J',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Category::Rock),
            'P' => Some(Category::Paper),
            'S' => Some(Category::Scissors),
            'J' => Some(Category::Joker),
            _ => None,
        }
    }

    pub fn is_joker(self) -> bool {
        self == Category::Joker
    }

    /// Cyclic rock-paper-scissors relation: X beats Y iff (X - Y) mod 3 == 1.
    /// Jokers never win on category alone.
    pub fn beats(self, other: Category) -> bool {
        if self.is_joker() || other.is_joker() {
            return false;
        }
        (self as u8 + 3 - other as u8) % 3 == 1
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Rock => "rock",
            Category::Paper => "paper",
            Category::Scissors => "scissors",
            Category::Joker => "joker",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Monkey,
    Wolf,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Monkey, Team::Wolf];

    pub fn other(self) -> Team {
        match self {
            Team::Monkey => Team::Wolf,
            Team::Wolf => Team::Monkey,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Team::Monkey => 0,
            Team::Wolf => 1,
        }
    }

    /// +1 when advancing moves toward higher slots.
    pub fn direction(self) -> i32 {
        match self {
            Team::Monkey => 1,
            Team::Wolf => -1,
        }
    }

    /// Slot the team's cards start from and retreat toward.
    pub fn home_slot(self) -> usize {
        match self {
            Team::Monkey => 0,
            Team::Wolf => 10,
        }
    }

    /// Slot a card of this team must reach to win.
    pub fn goal_slot(self) -> usize {
        self.other().home_slot()
    }

    pub fn letter(self) -> char {
        match self {
            Team::Monkey => 'M',
            Team::Wolf => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'M' => Some(Team::Monkey),
            'W' => Some(Team::Wolf),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Team::Monkey => "monkey",
            Team::Wolf => "wolf",
        })
    }
}

impl FromStr for Team {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monkey" => Ok(Team::Monkey),
            "wolf" => Ok(Team::Wolf),
            _ => Err(EngineError::UnknownTeam(s.to_string())),
        }
    }
}

/// Strength every joker starts a resolution cycle with.
pub const JOKER_STRENGTH: u8 = 4;

/// An immutable card. Joker strength in battle is tracked by the resolver,
/// so a joker card always carries `JOKER_STRENGTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub team: Team,
    pub category: Category,
    pub strength: u8,
}

impl Card {
    pub fn new(team: Team, category: Category, strength: u8) -> Self {
        Self {
            team,
            category,
            strength,
        }
    }

    pub fn joker(team: Team) -> Self {
        Self::new(team, Category::Joker, JOKER_STRENGTH)
    }

    pub fn is_joker(&self) -> bool {
        self.category.is_joker()
    }

    /// Three-character wire code, e.g. "MJ4" or "WR2".
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// The nine non-joker cards a team starts with, in a fixed order.
    pub fn soldiers(team: Team) -> Vec<Card> {
        Category::DICE
            .iter()
            .flat_map(|&category| (1..=3).map(move |strength| Card::new(team, category, strength)))
            .collect()
    }

    /// All ten cards of a team: the soldiers plus the joker.
    pub fn full_team(team: Team) -> Vec<Card> {
        let mut cards = Card::soldiers(team);
        cards.push(Card::joker(team));
        cards
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.team.letter(),
            self.category.letter(),
            self.strength
        )
    }
}

impl FromStr for Card {
    type Err = EngineError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidCardCode {
            code: code.to_string(),
            reason: reason.to_string(),
        };

        let chars: Vec<char> = code.chars().collect();
        if chars.len() != 3 {
            return Err(invalid("expected 3 characters"));
        }
        let team = Team::from_letter(chars[0]).ok_or_else(|| invalid("unknown team letter"))?;
        let category =
            Category::from_letter(chars[1]).ok_or_else(|| invalid("unknown category letter"))?;
        let strength = chars[2]
            .to_digit(10)
            .ok_or_else(|| invalid("strength is not a digit"))? as u8;

        match category {
            Category::Joker if strength != JOKER_STRENGTH => Err(invalid("joker strength must be 4")),
            Category::Joker => Ok(Card::joker(team)),
            _ if !(1..=3).contains(&strength) => Err(invalid("strength must be 1, 2 or 3")),
            _ => Ok(Card::new(team, category, strength)),
        }
    }
}
