//! Ninja Taisen request handlers over the wire types in `engine::models`.
//!
//! Callers send a board, the dice and the acting team, and either ask the
//! engine to choose a plan or to apply one they already picked.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::{Board, SLOT_COUNT};
use super::dice::DiceRolls;
use super::moves::{execute_moves, gather_all_moves, Move};
use super::types::{Card, Category, Team};
use crate::engine::bot_profiles::BotProfilesFile;
use crate::engine::models::*;
use crate::error::{EngineError, Result};

impl TryFrom<&BoardDto> for Board {
    type Error = EngineError;

    fn try_from(dto: &BoardDto) -> Result<Self> {
        let mut board = Board::empty();
        for team in Team::ALL {
            for (&slot, codes) in dto.piles(team) {
                if slot >= SLOT_COUNT {
                    return Err(EngineError::InvalidBoard(format!(
                        "{team} slot {slot} out of range 0..{SLOT_COUNT}"
                    )));
                }
                let cards = codes
                    .iter()
                    .map(|code| code.parse::<Card>())
                    .collect::<Result<Vec<_>>>()?;
                board.set_pile(team, slot, cards);
            }
        }
        board.validate()?;
        Ok(board)
    }
}

impl From<&Board> for BoardDto {
    fn from(board: &Board) -> Self {
        let mut dto = BoardDto::default();
        for team in Team::ALL {
            let piles = dto.piles_mut(team);
            for (slot, pile) in board.piles(team).iter().enumerate() {
                if !pile.is_empty() {
                    piles.insert(slot, pile.iter().map(Card::code).collect());
                }
            }
        }
        dto
    }
}

impl TryFrom<&DiceRollDto> for DiceRolls {
    type Error = EngineError;

    fn try_from(dto: &DiceRollDto) -> Result<Self> {
        DiceRolls::new(dto.rock, dto.paper, dto.scissors)
    }
}

impl From<&Move> for MoveDto {
    fn from(m: &Move) -> Self {
        Self {
            dice_category: m.dice_category,
            card: m.card.code(),
        }
    }
}

fn parse_plan(moves: &[MoveDto]) -> Result<Vec<(Category, Card)>> {
    moves
        .iter()
        .map(|m| -> Result<(Category, Card)> { Ok((m.dice_category, m.card.parse::<Card>()?)) })
        .collect()
}

/// Choose a plan for the acting team with the requested strategy.
/// An empty plan means the team has to pass.
pub fn choose(request: &ChooseRequest, profiles: &BotProfilesFile) -> Result<ChooseResponse> {
    let board = Board::try_from(&request.board)?;
    let dice = DiceRolls::try_from(&request.dice)?;
    let strategy = profiles.resolve_strategy(&request.strategy)?;
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let candidates = gather_all_moves(&board, request.team, &dice)?;
    let moves = match strategy.choose_moves(&candidates, &mut rng)? {
        Some(chosen) => chosen.moves.iter().map(MoveDto::from).collect(),
        None => Vec::new(),
    };
    tracing::debug!(
        team = %request.team,
        strategy = strategy.name(),
        candidates = candidates.len(),
        moves = moves.len(),
        "chose moves"
    );
    Ok(ChooseResponse { moves })
}

/// Apply a caller-supplied plan and return the resulting board.
pub fn execute(request: &ExecuteRequest) -> Result<ExecuteResponse> {
    let board = Board::try_from(&request.board)?;
    let dice = DiceRolls::try_from(&request.dice)?;
    let plan = parse_plan(&request.moves)?;
    let completed = execute_moves(&board, request.team, &dice, &plan)?;
    Ok(ExecuteResponse {
        board: BoardDto::from(&completed.board),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_json() -> serde_json::Value {
        serde_json::json!({
            "monkey": {"0": ["MJ4", "MR1"], "3": ["MP2"]},
            "wolf": {"9": ["WS1"], "10": ["WJ4"]}
        })
    }

    #[test]
    fn test_board_dto_roundtrip() {
        let dto: BoardDto = serde_json::from_value(board_json()).unwrap();
        let board = Board::try_from(&dto).unwrap();
        assert_eq!(board.pile(Team::Monkey, 0).len(), 2);
        assert_eq!(BoardDto::from(&board), dto);
        assert_eq!(serde_json::to_value(&dto).unwrap(), board_json());
    }

    #[test]
    fn test_board_dto_validation() {
        let bad_code: BoardDto =
            serde_json::from_value(serde_json::json!({"monkey": {"0": ["MX1"]}})).unwrap();
        assert!(matches!(
            Board::try_from(&bad_code),
            Err(EngineError::InvalidCardCode { .. })
        ));

        let bad_slot: BoardDto =
            serde_json::from_value(serde_json::json!({"wolf": {"11": ["WR1"]}})).unwrap();
        assert!(matches!(Board::try_from(&bad_slot), Err(EngineError::InvalidBoard(_))));

        let wrong_side: BoardDto =
            serde_json::from_value(serde_json::json!({"wolf": {"4": ["MR1"]}})).unwrap();
        assert!(matches!(Board::try_from(&wrong_side), Err(EngineError::InvalidBoard(_))));
    }

    #[test]
    fn test_move_dto_wire_format() {
        let dto = MoveDto {
            dice_category: Category::Scissors,
            card: "MJ4".into(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({"diceCategory": "scissors", "card": "MJ4"}));
    }

    #[test]
    fn test_choose_then_execute() {
        let request: ChooseRequest = serde_json::from_value(serde_json::json!({
            "board": board_json(),
            "dice": {"rock": 2, "paper": 1, "scissors": 3},
            "team": "monkey",
            "strategy": "metric_position",
            "seed": 8
        }))
        .unwrap();
        let profiles = BotProfilesFile::default();
        let response = choose(&request, &profiles).unwrap();
        assert!(!response.moves.is_empty());
        assert_eq!(choose(&request, &profiles).unwrap(), response);

        let executed = execute(&ExecuteRequest {
            board: request.board.clone(),
            dice: request.dice,
            team: request.team,
            moves: response.moves.clone(),
        })
        .unwrap();
        assert_ne!(executed.board, request.board);
    }

    #[test]
    fn test_choose_rejects_bad_input() {
        let mut request: ChooseRequest = serde_json::from_value(serde_json::json!({
            "board": board_json(),
            "dice": {"rock": 4, "paper": 1, "scissors": 1},
            "team": "wolf"
        }))
        .unwrap();
        assert_eq!(request.strategy, "default");
        let profiles = BotProfilesFile::default();
        assert!(matches!(choose(&request, &profiles), Err(EngineError::InvalidDice { .. })));

        request.dice.rock = 1;
        request.strategy = "alphabeta".into();
        assert!(matches!(choose(&request, &profiles), Err(EngineError::UnknownStrategy(_))));
    }

    #[test]
    fn test_execute_rejects_illegal_plan() {
        let dto: BoardDto = serde_json::from_value(board_json()).unwrap();
        let request = ExecuteRequest {
            board: dto,
            dice: DiceRollDto {
                rock: 1,
                paper: 1,
                scissors: 1,
            },
            team: Team::Monkey,
            moves: vec![MoveDto {
                dice_category: Category::Paper,
                card: "MR1".into(),
            }],
        };
        assert!(matches!(execute(&request), Err(EngineError::IllegalMove { .. })));
    }
}
