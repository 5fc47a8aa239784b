//! Board state for Ninja Taisen.
//!
//! Each team owns 11 piles (slots 0..=10). A pile is ordered bottom to top;
//! only the top `MAX_REACHABLE` cards of a pile may be picked up.

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Card, Category, Team};
use crate::error::{EngineError, Result};

pub const SLOT_COUNT: usize = 11;
pub const MAX_REACHABLE: usize = 3;

/// Where a card sits inside its team's piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardLocation {
    pub slot: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    piles: [[Vec<Card>; SLOT_COUNT]; 2],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deal a fresh game. The joker sits at the bottom of the home pile and
    /// the nine shuffled soldiers are stacked 3/3/2/1 moving away from home.
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::empty();
        for team in Team::ALL {
            let mut soldiers = Card::soldiers(team);
            soldiers.shuffle(rng);

            let home = team.home_slot() as i32;
            let step = team.direction();
            let mut remaining = soldiers.into_iter();
            for (offset, count) in [3usize, 3, 2, 1].into_iter().enumerate() {
                let slot = (home + step * offset as i32) as usize;
                let pile = board.pile_mut(team, slot);
                if offset == 0 {
                    pile.push(Card::joker(team));
                }
                pile.extend(remaining.by_ref().take(count));
            }
        }
        board
    }

    pub fn pile(&self, team: Team, slot: usize) -> &[Card] {
        &self.piles[team.index()][slot]
    }

    pub fn piles(&self, team: Team) -> &[Vec<Card>; SLOT_COUNT] {
        &self.piles[team.index()]
    }

    pub(crate) fn pile_mut(&mut self, team: Team, slot: usize) -> &mut Vec<Card> {
        &mut self.piles[team.index()][slot]
    }

    /// Replace a whole pile. Intended for building positions by hand.
    pub fn set_pile(&mut self, team: Team, slot: usize, cards: Vec<Card>) {
        self.piles[team.index()][slot] = cards;
    }

    /// Build a pile from card codes, e.g. `board.with_pile(Team::Wolf, 7, &["WJ4"])`.
    pub fn with_pile(mut self, team: Team, slot: usize, codes: &[&str]) -> Result<Self> {
        if slot >= SLOT_COUNT {
            return Err(EngineError::InvalidBoard(format!("slot {slot} out of range")));
        }
        let cards = codes
            .iter()
            .map(|code| code.parse::<Card>())
            .collect::<Result<Vec<_>>>()?;
        self.set_pile(team, slot, cards);
        Ok(self)
    }

    pub fn top_card(&self, team: Team, slot: usize) -> Option<Card> {
        self.pile(team, slot).last().copied()
    }

    pub fn card_count(&self, team: Team) -> usize {
        self.piles(team).iter().map(Vec::len).sum()
    }

    /// Index of the lowest card in the pile that can still be picked up.
    pub fn reachable_start(&self, team: Team, slot: usize) -> usize {
        self.pile(team, slot).len().saturating_sub(MAX_REACHABLE)
    }

    /// Cards that may be moved with the die of `category`: reachable cards of
    /// that category, plus the joker when it is still available this turn.
    pub fn movable_cards(&self, team: Team, category: Category, joker_available: bool) -> Vec<CardLocation> {
        let mut locations = Vec::new();
        for (slot, pile) in self.piles(team).iter().enumerate() {
            let start = self.reachable_start(team, slot);
            for (index, card) in pile.iter().enumerate().skip(start) {
                if card.category == category || (card.is_joker() && joker_available) {
                    locations.push(CardLocation { slot, index });
                }
            }
        }
        locations
    }

    pub fn locate(&self, card: Card) -> Option<CardLocation> {
        self.piles(card.team).iter().enumerate().find_map(|(slot, pile)| {
            pile.iter()
                .position(|c| *c == card)
                .map(|index| CardLocation { slot, index })
        })
    }

    pub fn card_at(&self, team: Team, location: CardLocation) -> Option<Card> {
        self.piles(team)
            .get(location.slot)
            .and_then(|pile| pile.get(location.index))
            .copied()
    }

    /// The winning team, if the game is over.
    ///
    /// Panics if both teams stand on their goal slots at once; boards built
    /// from external input are rejected by `validate` before reaching here.
    pub fn victorious_team(&self) -> Option<Team> {
        let monkey_goal = !self.pile(Team::Monkey, Team::Monkey.goal_slot()).is_empty();
        let wolf_goal = !self.pile(Team::Wolf, Team::Wolf.goal_slot()).is_empty();
        if monkey_goal {
            assert!(!wolf_goal, "both teams reached their goal slot:\n{self}");
            return Some(Team::Monkey);
        }
        if wolf_goal {
            return Some(Team::Wolf);
        }

        let monkey_alive = self.card_count(Team::Monkey) > 0;
        let wolf_alive = self.card_count(Team::Wolf) > 0;
        match (monkey_alive, wolf_alive) {
            (true, false) => Some(Team::Monkey),
            (false, true) => Some(Team::Wolf),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.victorious_team().is_some()
    }

    /// Structural checks applied to boards arriving from outside the engine.
    /// Every card must belong to its team's deck; rejecting duplicates then
    /// caps each team at ten cards and one joker.
    pub fn validate(&self) -> Result<()> {
        for team in Team::ALL {
            let deck: HashSet<Card> = Card::full_team(team).into_iter().collect();
            let mut seen = HashSet::new();
            for card in self.piles(team).iter().flatten() {
                if card.team != team {
                    return Err(EngineError::InvalidBoard(format!(
                        "card {card} listed under team {team}"
                    )));
                }
                if !deck.contains(card) {
                    return Err(EngineError::InvalidBoard(format!(
                        "card {card} is not part of the {team} deck"
                    )));
                }
                if !seen.insert(*card) {
                    return Err(EngineError::InvalidBoard(format!("duplicate card {card}")));
                }
            }
        }

        if !self.pile(Team::Monkey, Team::Monkey.goal_slot()).is_empty()
            && !self.pile(Team::Wolf, Team::Wolf.goal_slot()).is_empty()
        {
            return Err(EngineError::InvalidBoard(
                "both teams occupy their goal slot".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |pile: &[Card]| {
            pile.iter()
                .map(Card::code)
                .collect::<Vec<_>>()
                .join(" ")
        };
        for slot in 0..SLOT_COUNT {
            writeln!(
                f,
                "{:>2} | {:<24} | {}",
                slot,
                render(self.pile(Team::Monkey, slot)),
                render(self.pile(Team::Wolf, slot)),
            )?;
        }
        Ok(())
    }
}
