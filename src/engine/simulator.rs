//! Synchronous game simulator: roll, enumerate, choose, adopt, alternate.
//! Used by the arena and the CLI.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::bot_strategy::BotStrategy;
use crate::error::Result;
use crate::games::ninja_taisen::board::Board;
use crate::games::ninja_taisen::dice::DiceRolls;
use crate::games::ninja_taisen::moves::{gather_all_moves, Move};
use crate::games::ninja_taisen::types::Team;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub max_turns: usize,
    pub starting_team: Team,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_turns: 100,
            starting_team: Team::Monkey,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Option<Team>,
    pub turn_count: usize,
    pub board: Board,
}

impl GameOutcome {
    pub fn cards_left(&self, team: Team) -> usize {
        self.board.card_count(team)
    }
}

/// Play one turn for `team` in place. Returns the moves made, which are
/// empty when no plan exists and the team passes.
pub fn play_turn(
    board: &mut Board,
    team: Team,
    dice: &DiceRolls,
    strategy: &dyn BotStrategy,
    rng: &mut StdRng,
) -> Result<Vec<Move>> {
    let candidates = gather_all_moves(board, team, dice)?;
    match strategy.choose_moves(&candidates, rng)? {
        Some(chosen) => {
            *board = chosen.board.clone();
            Ok(chosen.moves.clone())
        }
        None => Ok(Vec::new()),
    }
}

/// Play a full game from a freshly dealt board. All randomness (deal, dice
/// and tie-breaks) comes from one generator seeded with `seed`.
pub fn play_game(
    monkey: &dyn BotStrategy,
    wolf: &dyn BotStrategy,
    seed: u64,
    settings: &SimulationSettings,
) -> Result<GameOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);
    let board = Board::new_game(&mut rng);
    play_game_from(board, monkey, wolf, &mut rng, settings)
}

pub fn play_game_from(
    mut board: Board,
    monkey: &dyn BotStrategy,
    wolf: &dyn BotStrategy,
    rng: &mut StdRng,
    settings: &SimulationSettings,
) -> Result<GameOutcome> {
    let mut team = settings.starting_team;
    let mut winner = board.victorious_team();
    let mut turn_count = 0;

    while winner.is_none() && turn_count < settings.max_turns {
        let strategy = match team {
            Team::Monkey => monkey,
            Team::Wolf => wolf,
        };
        let dice = DiceRolls::roll(rng);
        let moves = play_turn(&mut board, team, &dice, strategy, rng)?;
        if moves.is_empty() {
            tracing::debug!(turn = turn_count, %team, ?dice, "no legal moves, passing");
        } else {
            tracing::debug!(
                turn = turn_count,
                %team,
                strategy = strategy.name(),
                ?dice,
                moves = ?moves,
                "turn played"
            );
        }

        winner = board.victorious_team();
        team = team.other();
        turn_count += 1;
    }

    Ok(GameOutcome {
        winner,
        turn_count,
        board,
    })
}
