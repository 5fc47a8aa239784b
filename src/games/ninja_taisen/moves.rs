//! Move enumeration and plan execution.
//!
//! A turn may use any non-empty subset of the three dice, in any order, each
//! die moving one card. `gather_all_moves` walks every such plan with an
//! explicit worklist and returns the board each plan leads to.

use super::battle::{BattleResolver, ResolutionSummary};
use super::board::{Board, CardLocation};
use super::dice::DiceRolls;
use super::types::{Card, Category, Team};
use crate::error::{EngineError, Result};

/// One die applied to one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dice_category: Category,
    pub roll: u8,
    pub card: Card,
}

/// A plan of moves for one turn and the board it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMoves {
    pub team: Team,
    pub moves: Vec<Move>,
    pub board: Board,
}

impl CompletedMoves {
    pub fn empty(team: Team, board: Board) -> Self {
        Self {
            team,
            moves: Vec::new(),
            board,
        }
    }

    /// A joker may act as the mover for at most one die per turn.
    pub fn used_joker(&self) -> bool {
        self.moves.iter().any(|m| m.card.is_joker())
    }

    pub fn used_dice(&self, category: Category) -> bool {
        self.moves.iter().any(|m| m.dice_category == category)
    }

    pub fn is_winning(&self) -> bool {
        self.board.victorious_team() == Some(self.team)
    }
}

/// Apply a single die move to `board` in place.
pub fn apply_move(
    board: &mut Board,
    team: Team,
    location: CardLocation,
    roll: u8,
) -> Result<ResolutionSummary> {
    BattleResolver::new(board, team).move_card_and_resolve_battles(location.slot, location.index, roll)
}

/// Every end-of-turn position reachable by `team` with `dice`.
///
/// Plans that reach a terminal board are not extended further. An empty
/// result means the team must pass.
pub fn gather_all_moves(board: &Board, team: Team, dice: &DiceRolls) -> Result<Vec<CompletedMoves>> {
    let mut completed = Vec::new();
    let mut worklist = vec![CompletedMoves::empty(team, board.clone())];

    while let Some(partial) = worklist.pop() {
        if partial.board.is_terminal() {
            continue;
        }
        let joker_available = !partial.used_joker();

        for (category, roll) in dice.iter() {
            if partial.used_dice(category) {
                continue;
            }
            for location in partial.board.movable_cards(team, category, joker_available) {
                let mut next_board = partial.board.clone();
                let Some(card) = next_board.card_at(team, location) else {
                    continue;
                };

                if let Err(e) = apply_move(&mut next_board, team, location, roll) {
                    tracing::error!(
                        %team,
                        %category,
                        roll,
                        slot = location.slot,
                        card_index = location.index,
                        %card,
                        board = %partial.board,
                        error = %e,
                        "failed to apply move during enumeration"
                    );
                    return Err(e);
                }

                let mut moves = partial.moves.clone();
                moves.push(Move {
                    dice_category: category,
                    roll,
                    card,
                });
                let next = CompletedMoves {
                    team,
                    moves,
                    board: next_board,
                };
                if next.moves.len() < Category::DICE.len() {
                    worklist.push(next.clone());
                }
                completed.push(next);
            }
        }
    }

    Ok(completed)
}

/// Check one plan step against the partial turn so far. Returns the card's
/// location and the roll to apply, or the reason the step is illegal.
fn check_step(
    state: &CompletedMoves,
    dice: &DiceRolls,
    category: Category,
    card: Card,
) -> std::result::Result<(CardLocation, u8), String> {
    let team = state.team;
    if state.board.is_terminal() {
        return Err(format!("game already over before moving {card}"));
    }
    let roll = dice.get(category).ok_or_else(|| format!("{category} has no die"))?;
    if state.used_dice(category) {
        return Err(format!("{category} die used twice"));
    }
    if card.team != team {
        return Err(format!("{card} belongs to {}", card.team));
    }
    if card.is_joker() {
        if state.used_joker() {
            return Err(format!("{card} already moved this turn"));
        }
    } else if card.category != category {
        return Err(format!("{card} cannot move with the {category} die"));
    }

    let location = state
        .board
        .locate(card)
        .ok_or_else(|| format!("{card} is not on the board"))?;
    if location.index < state.board.reachable_start(team, location.slot) {
        return Err(format!("{card} is buried too deep to move"));
    }
    Ok((location, roll))
}

/// Replay a plan of (die, card) steps, enforcing the same rules the
/// enumerator follows. Rejected steps are logged with the board they were
/// attempted on.
pub fn execute_moves(
    board: &Board,
    team: Team,
    dice: &DiceRolls,
    plan: &[(Category, Card)],
) -> Result<CompletedMoves> {
    let mut state = CompletedMoves::empty(team, board.clone());

    for (step, &(category, card)) in plan.iter().enumerate() {
        let (location, roll) = match check_step(&state, dice, category, card) {
            Ok(checked) => checked,
            Err(reason) => {
                tracing::error!(
                    %team,
                    %category,
                    %card,
                    step,
                    ?dice,
                    board = %state.board,
                    %reason,
                    "illegal planned move"
                );
                return Err(EngineError::IllegalMove { team, reason });
            }
        };

        if let Err(e) = apply_move(&mut state.board, team, location, roll) {
            tracing::error!(
                %team,
                %category,
                roll,
                slot = location.slot,
                card_index = location.index,
                %card,
                board = %state.board,
                error = %e,
                "failed to apply planned move"
            );
            return Err(e);
        }
        state.moves.push(Move {
            dice_category: category,
            roll,
            card,
        });
    }

    Ok(state)
}
