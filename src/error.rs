//! Engine-wide error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::games::ninja_taisen::types::{Category, Team};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid card code '{code}': {reason}")]
    InvalidCardCode { code: String, reason: String },

    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid {category} die roll {roll}, expected 1, 2 or 3")]
    InvalidDice { category: Category, roll: u8 },

    #[error("no {team} card at slot {slot} index {card_index}")]
    InvalidMove {
        team: Team,
        slot: usize,
        card_index: usize,
    },

    #[error("illegal move for {team}: {reason}")]
    IllegalMove { team: Team, reason: String },

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
