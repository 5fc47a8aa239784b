//! Card combat and cascading battle resolution.
//!
//! A relocation pushes its destination slot onto a LIFO stack of pending
//! battles. Resolving a slot may push further slots when a draw forces both
//! top cards to retreat toward their own home. Joker strength is a resource
//! that depletes during one resolution cycle and is restored when the stack
//! empties; it lives here rather than on the cards.

use std::cmp::Ordering;

use super::board::{Board, SLOT_COUNT};
use super::types::{Card, Team, JOKER_STRENGTH};
use crate::error::{EngineError, Result};

/// Current joker strength of each team within one resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JokerStrengths([u8; 2]);

impl Default for JokerStrengths {
    fn default() -> Self {
        Self([JOKER_STRENGTH; 2])
    }
}

impl JokerStrengths {
    pub fn get(&self, team: Team) -> u8 {
        self.0[team.index()]
    }

    pub fn set(&mut self, team: Team, strength: u8) {
        self.0[team.index()] = strength;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn strength_winner(a_team: Team, a: u8, b_team: Team, b: u8) -> Option<Team> {
    match a.cmp(&b) {
        Ordering::Greater => Some(a_team),
        Ordering::Less => Some(b_team),
        Ordering::Equal => None,
    }
}

/// Decide a battle between two cards of opposing teams.
///
/// Returns the winning team, or `None` on a draw. Joker strengths are
/// updated in place: a winning joker loses the defeated card's strength and
/// a joker that draws drops to zero.
pub fn battle_winner(a: Card, b: Card, jokers: &mut JokerStrengths) -> Option<Team> {
    debug_assert_ne!(a.team, b.team, "battle between {a} and {b} of the same team");

    match (a.is_joker(), b.is_joker()) {
        (false, false) if a.category != b.category => {
            if a.category.beats(b.category) {
                Some(a.team)
            } else {
                Some(b.team)
            }
        }
        (false, false) => strength_winner(a.team, a.strength, b.team, b.strength),
        (true, true) => {
            let a_strength = jokers.get(a.team);
            let b_strength = jokers.get(b.team);
            let winner = strength_winner(a.team, a_strength, b.team, b_strength);
            match winner {
                Some(team) => jokers.set(team, a_strength.abs_diff(b_strength)),
                None => {
                    jokers.set(a.team, 0);
                    jokers.set(b.team, 0);
                }
            }
            winner
        }
        _ => {
            let (joker, other) = if a.is_joker() { (a, b) } else { (b, a) };
            let joker_strength = jokers.get(joker.team);
            let winner = strength_winner(joker.team, joker_strength, other.team, other.strength);
            match winner {
                Some(team) if team == joker.team => {
                    jokers.set(team, joker_strength - other.strength);
                }
                None => jokers.set(joker.team, 0),
                Some(_) => {}
            }
            winner
        }
    }
}

/// What happened while resolving one card relocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Slot the moved stack landed on.
    pub destination: usize,
    pub battles: usize,
    pub retreats: usize,
    pub eliminated: Vec<Card>,
}

/// Applies one die move to a board and resolves every battle it triggers.
pub struct BattleResolver<'a> {
    board: &'a mut Board,
    acting: Team,
    jokers: JokerStrengths,
    pending: Vec<usize>,
    summary: ResolutionSummary,
}

impl<'a> BattleResolver<'a> {
    pub fn new(board: &'a mut Board, acting: Team) -> Self {
        Self {
            board,
            acting,
            jokers: JokerStrengths::default(),
            pending: Vec::new(),
            summary: ResolutionSummary::default(),
        }
    }

    pub fn joker_strengths(&self) -> JokerStrengths {
        self.jokers
    }

    /// Move the card at `card_index` of the acting team's pile at `slot`,
    /// together with every card above it, `roll` slots forward (clamped to
    /// the board), then fight until no slot holds cards of both teams.
    pub fn move_card_and_resolve_battles(
        &mut self,
        slot: usize,
        card_index: usize,
        roll: u8,
    ) -> Result<ResolutionSummary> {
        if slot >= SLOT_COUNT || card_index >= self.board.pile(self.acting, slot).len() {
            return Err(EngineError::InvalidMove {
                team: self.acting,
                slot,
                card_index,
            });
        }

        self.summary = ResolutionSummary::default();
        let distance = i32::from(roll) * self.acting.direction();
        self.summary.destination = self.relocate(self.acting, slot, card_index, distance);

        while let Some(&next) = self.pending.last() {
            self.resolve_slot(next);
            self.pending.retain(|&s| s != next);
        }

        self.jokers.reset();
        Ok(std::mem::take(&mut self.summary))
    }

    fn relocate(&mut self, team: Team, slot: usize, card_index: usize, distance: i32) -> usize {
        let destination = (slot as i32 + distance).clamp(0, SLOT_COUNT as i32 - 1) as usize;
        let moving = self.board.pile_mut(team, slot).split_off(card_index);
        self.board.pile_mut(team, destination).extend(moving);
        self.pending.push(destination);
        destination
    }

    fn resolve_slot(&mut self, slot: usize) {
        let acting = self.acting;
        let opponent = acting.other();
        while let (Some(ours), Some(theirs)) =
            (self.board.top_card(acting, slot), self.board.top_card(opponent, slot))
        {
            self.summary.battles += 1;
            match battle_winner(ours, theirs, &mut self.jokers) {
                Some(winner) => self.eliminate(winner.other(), slot),
                None if slot == acting.goal_slot() => self.eliminate(opponent, slot),
                None => {
                    self.retreat(opponent, slot);
                    self.retreat(acting, slot);
                }
            }
        }
    }

    fn eliminate(&mut self, team: Team, slot: usize) {
        if let Some(card) = self.board.pile_mut(team, slot).pop() {
            tracing::trace!(%card, slot, "card eliminated");
            self.summary.eliminated.push(card);
        }
    }

    fn retreat(&mut self, team: Team, slot: usize) {
        let Some(top) = self.board.pile(team, slot).len().checked_sub(1) else {
            return;
        };
        let destination = self.relocate(team, slot, top, -team.direction());
        self.summary.retreats += 1;
        tracing::trace!(%team, from = slot, to = destination, "card retreated after draw");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ninja_taisen::types::Category;

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    #[test]
    fn test_category_beats_regardless_of_strength() {
        let mut jokers = JokerStrengths::default();
        assert_eq!(battle_winner(card("MR1"), card("WS3"), &mut jokers), Some(Team::Monkey));
        assert_eq!(battle_winner(card("MR3"), card("WP1"), &mut jokers), Some(Team::Wolf));
        assert_eq!(battle_winner(card("WS1"), card("MP3"), &mut jokers), Some(Team::Wolf));
    }

    #[test]
    fn test_same_category_strength() {
        let mut jokers = JokerStrengths::default();
        assert_eq!(battle_winner(card("MP3"), card("WP2"), &mut jokers), Some(Team::Monkey));
        assert_eq!(battle_winner(card("MP1"), card("WP2"), &mut jokers), Some(Team::Wolf));
        assert_eq!(battle_winner(card("MP2"), card("WP2"), &mut jokers), None);
        assert_eq!(jokers, JokerStrengths::default());
    }

    #[test]
    fn test_joker_depletes_on_win() {
        let mut jokers = JokerStrengths::default();
        assert_eq!(battle_winner(card("MJ4"), card("WR3"), &mut jokers), Some(Team::Monkey));
        assert_eq!(jokers.get(Team::Monkey), 1);
        assert_eq!(jokers.get(Team::Wolf), JOKER_STRENGTH);
    }

    #[test]
    fn test_joker_draw_zeroes_strength() {
        let mut jokers = JokerStrengths::default();
        jokers.set(Team::Wolf, 2);
        assert_eq!(battle_winner(card("MS2"), card("WJ4"), &mut jokers), None);
        assert_eq!(jokers.get(Team::Wolf), 0);
    }

    #[test]
    fn test_joker_loses_to_stronger_card() {
        let mut jokers = JokerStrengths::default();
        jokers.set(Team::Monkey, 1);
        assert_eq!(battle_winner(card("MJ4"), card("WS3"), &mut jokers), Some(Team::Wolf));
        assert_eq!(jokers.get(Team::Monkey), 1);
    }

    #[test]
    fn test_joker_versus_joker() {
        let mut jokers = JokerStrengths::default();
        jokers.set(Team::Monkey, 3);
        assert_eq!(battle_winner(card("MJ4"), card("WJ4"), &mut jokers), Some(Team::Wolf));
        assert_eq!(jokers.get(Team::Wolf), 1);

        let mut jokers = JokerStrengths::default();
        assert_eq!(battle_winner(card("WJ4"), card("MJ4"), &mut jokers), None);
        assert_eq!(jokers.get(Team::Monkey), 0);
        assert_eq!(jokers.get(Team::Wolf), 0);
    }

    #[test]
    fn test_resolver_moves_stack() {
        let mut board = Board::empty()
            .with_pile(Team::Monkey, 0, &["MJ4", "MR1", "MP1"])
            .unwrap()
            .with_pile(Team::Wolf, 10, &["WR1"])
            .unwrap();
        let summary = BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(0, 1, 2)
            .unwrap();
        assert_eq!(summary.destination, 2);
        assert_eq!(summary.battles, 0);
        assert_eq!(board.pile(Team::Monkey, 0), &[card("MJ4")]);
        assert_eq!(board.pile(Team::Monkey, 2), &[card("MR1"), card("MP1")]);
    }

    #[test]
    fn test_resolver_clamps_to_board() {
        let mut board = Board::empty()
            .with_pile(Team::Wolf, 1, &["WS2"])
            .unwrap()
            .with_pile(Team::Monkey, 5, &["MS2"])
            .unwrap();
        let summary = BattleResolver::new(&mut board, Team::Wolf)
            .move_card_and_resolve_battles(1, 0, 3)
            .unwrap();
        assert_eq!(summary.destination, 0);
        assert_eq!(board.pile(Team::Wolf, 0), &[card("WS2")]);
    }

    #[test]
    fn test_resolver_decisive_battle() {
        let mut board = Board::empty()
            .with_pile(Team::Monkey, 3, &["MP1"])
            .unwrap()
            .with_pile(Team::Wolf, 5, &["WS2", "WR3"])
            .unwrap();
        let summary = BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(3, 0, 2)
            .unwrap();
        // paper beats rock, then scissors beats paper
        assert_eq!(summary.battles, 2);
        assert_eq!(summary.eliminated, vec![card("WR3"), card("MP1")]);
        assert_eq!(board.pile(Team::Wolf, 5), &[card("WS2")]);
        assert!(board.pile(Team::Monkey, 5).is_empty());
    }

    #[test]
    fn test_resolver_draw_retreats_both() {
        let mut board = Board::empty()
            .with_pile(Team::Monkey, 2, &["MR2"])
            .unwrap()
            .with_pile(Team::Wolf, 4, &["WR2"])
            .unwrap();
        let summary = BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(2, 0, 2)
            .unwrap();
        assert_eq!(summary.retreats, 2);
        assert!(summary.eliminated.is_empty());
        assert_eq!(board.pile(Team::Monkey, 3), &[card("MR2")]);
        assert_eq!(board.pile(Team::Wolf, 5), &[card("WR2")]);
    }

    #[test]
    fn test_resolver_edge_draw_removes_opponent() {
        let mut board = Board::empty()
            .with_pile(Team::Monkey, 8, &["MR2"])
            .unwrap()
            .with_pile(Team::Wolf, 10, &["WJ4", "WR2"])
            .unwrap();
        let summary = BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(8, 0, 2)
            .unwrap();
        // the draw removes WR2, then MR2 faces the joker at full strength
        assert_eq!(summary.eliminated, vec![card("WR2"), card("MR2")]);
        assert_eq!(board.pile(Team::Wolf, 10), &[card("WJ4")]);
    }

    #[test]
    fn test_resolver_restores_jokers() {
        let mut board = Board::empty()
            .with_pile(Team::Monkey, 3, &["MJ4"])
            .unwrap()
            .with_pile(Team::Wolf, 4, &["WR3"])
            .unwrap();
        let mut resolver = BattleResolver::new(&mut board, Team::Monkey);
        resolver.move_card_and_resolve_battles(3, 0, 1).unwrap();
        assert_eq!(resolver.joker_strengths(), JokerStrengths::default());
        assert_eq!(board.pile(Team::Monkey, 4), &[Card::joker(Team::Monkey)]);
    }

    #[test]
    fn test_resolver_rejects_missing_card() {
        let mut board = Board::empty().with_pile(Team::Monkey, 3, &["MR1"]).unwrap();
        let err = BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(3, 1, 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove { slot: 3, card_index: 1, .. }));
        assert!(BattleResolver::new(&mut board, Team::Monkey)
            .move_card_and_resolve_battles(SLOT_COUNT, 0, 1)
            .is_err());
        assert_eq!(board.pile(Team::Monkey, 3)[0].category, Category::Rock);
    }
}
