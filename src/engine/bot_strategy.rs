//! Bot strategy trait, the simple strategies and the name-keyed factory.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::engine::evaluator::{lookup_metric, Metric};
use crate::engine::lookahead::{LookaheadParams, LookaheadStrategy};
use crate::error::{EngineError, Result};
use crate::games::ninja_taisen::moves::CompletedMoves;

/// Built-in strategy names accepted by `lookup_strategy`.
pub const STRATEGY_NAMES: [&str; 8] = [
    "random",
    "random_spot_win",
    "metric_count",
    "metric_position",
    "metric_strength",
    "lookahead_count",
    "lookahead_position",
    "lookahead_strength",
];

/// Alias resolved by `lookup_strategy`.
pub const DEFAULT_STRATEGY: &str = "metric_strength";

/// A bot strategy picks one plan out of every plan available this turn.
pub trait BotStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Returns `None` only when `candidates` is empty.
    fn choose_moves<'a>(
        &self,
        candidates: &'a [CompletedMoves],
        rng: &mut StdRng,
    ) -> Result<Option<&'a CompletedMoves>>;
}

/// First candidate that wins the game on the spot.
pub fn find_winning(candidates: &[CompletedMoves]) -> Option<&CompletedMoves> {
    candidates.iter().find(|c| c.is_winning())
}

/// Uniform choice among the candidates sharing the highest score.
pub(crate) fn choose_best<'a>(
    scored: impl IntoIterator<Item = (&'a CompletedMoves, f64)>,
    rng: &mut StdRng,
) -> Option<&'a CompletedMoves> {
    let scored: Vec<(&CompletedMoves, f64)> = scored.into_iter().collect();
    let best = scored
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::NEG_INFINITY, f64::max);
    let top: Vec<&CompletedMoves> = scored
        .iter()
        .filter(|(_, score)| *score == best)
        .map(|(candidate, _)| *candidate)
        .collect();
    top.choose(rng).copied()
}

/// Picks a uniformly random plan.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_moves<'a>(
        &self,
        candidates: &'a [CompletedMoves],
        rng: &mut StdRng,
    ) -> Result<Option<&'a CompletedMoves>> {
        Ok(candidates.choose(rng))
    }
}

/// Takes an immediate win when one exists, otherwise plays randomly.
pub struct RandomSpotWinStrategy;

impl BotStrategy for RandomSpotWinStrategy {
    fn name(&self) -> &str {
        "random_spot_win"
    }

    fn choose_moves<'a>(
        &self,
        candidates: &'a [CompletedMoves],
        rng: &mut StdRng,
    ) -> Result<Option<&'a CompletedMoves>> {
        if let Some(win) = find_winning(candidates) {
            return Ok(Some(win));
        }
        Ok(candidates.choose(rng))
    }
}

/// Maximises a board metric, preferring an immediate win.
pub struct MetricStrategy {
    metric: Box<dyn Metric>,
    name: String,
}

impl MetricStrategy {
    pub fn new(metric: Box<dyn Metric>) -> Self {
        let name = format!("metric_{}", metric.name());
        Self { metric, name }
    }
}

impl BotStrategy for MetricStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_moves<'a>(
        &self,
        candidates: &'a [CompletedMoves],
        rng: &mut StdRng,
    ) -> Result<Option<&'a CompletedMoves>> {
        if let Some(win) = find_winning(candidates) {
            return Ok(Some(win));
        }
        let scored = candidates
            .iter()
            .map(|c| (c, self.metric.calculate(&c.board, c.team)));
        Ok(choose_best(scored, rng))
    }
}

/// Build a strategy from its name with default lookahead parameters.
pub fn lookup_strategy(name: &str) -> Result<Box<dyn BotStrategy>> {
    lookup_strategy_with(name, &LookaheadParams::default())
}

pub fn lookup_strategy_with(name: &str, params: &LookaheadParams) -> Result<Box<dyn BotStrategy>> {
    let unknown = || EngineError::UnknownStrategy(name.to_string());
    match name {
        "default" => lookup_strategy_with(DEFAULT_STRATEGY, params),
        "random" => Ok(Box::new(RandomStrategy)),
        "random_spot_win" => Ok(Box::new(RandomSpotWinStrategy)),
        _ => {
            if let Some(metric) = name.strip_prefix("metric_") {
                let metric = lookup_metric(metric).map_err(|_| unknown())?;
                Ok(Box::new(MetricStrategy::new(metric)))
            } else if let Some(metric) = name.strip_prefix("lookahead_") {
                let metric = lookup_metric(metric).map_err(|_| unknown())?;
                Ok(Box::new(LookaheadStrategy::new(metric, params.clone())))
            } else {
                Err(unknown())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::games::ninja_taisen::board::Board;
    use crate::games::ninja_taisen::dice::DiceRolls;
    use crate::games::ninja_taisen::moves::gather_all_moves;
    use crate::games::ninja_taisen::types::Team;

    fn candidates_with_win() -> Vec<CompletedMoves> {
        let board = Board::empty()
            .with_pile(Team::Monkey, 8, &["MR1"])
            .unwrap()
            .with_pile(Team::Monkey, 2, &["MP1", "MS1"])
            .unwrap()
            .with_pile(Team::Wolf, 9, &["WP2"])
            .unwrap();
        gather_all_moves(&board, Team::Monkey, &DiceRolls::new(2, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_factory_names() {
        for name in STRATEGY_NAMES {
            let strategy = lookup_strategy(name).unwrap();
            assert_eq!(strategy.name(), name);
        }
        assert_eq!(lookup_strategy("default").unwrap().name(), DEFAULT_STRATEGY);
        for bad in ["", "metric_", "metric_speed", "lookahead", "minimax"] {
            assert!(matches!(lookup_strategy(bad), Err(EngineError::UnknownStrategy(_))));
        }
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = StdRng::seed_from_u64(0);
        for name in STRATEGY_NAMES {
            let strategy = lookup_strategy(name).unwrap();
            assert!(strategy.choose_moves(&[], &mut rng).unwrap().is_none());
        }
    }

    #[test]
    fn test_win_preferred() {
        let candidates = candidates_with_win();
        assert!(candidates.iter().any(|c| c.is_winning()));
        assert!(candidates.iter().any(|c| !c.is_winning()));

        for name in STRATEGY_NAMES.iter().filter(|n| **n != "random") {
            let strategy = lookup_strategy(name).unwrap();
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                let chosen = strategy.choose_moves(&candidates, &mut rng).unwrap().unwrap();
                assert!(chosen.is_winning(), "{name} missed the win");
            }
        }
    }

    #[test]
    fn test_metric_strategy_picks_max_group() {
        // rock takes the scissors, paper walking onto it loses
        let board = Board::empty()
            .with_pile(Team::Monkey, 2, &["MR2"])
            .unwrap()
            .with_pile(Team::Monkey, 3, &["MP1"])
            .unwrap()
            .with_pile(Team::Wolf, 4, &["WS1"])
            .unwrap()
            .with_pile(Team::Wolf, 9, &["WP3"])
            .unwrap();
        let candidates =
            gather_all_moves(&board, Team::Monkey, &DiceRolls::new(2, 1, 1).unwrap()).unwrap();
        assert_eq!(candidates.len(), 4);

        let strategy = lookup_strategy("metric_count").unwrap();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen = strategy.choose_moves(&candidates, &mut rng).unwrap().unwrap();
            assert_eq!(chosen.board.card_count(Team::Monkey), 2);
            assert_eq!(chosen.board.card_count(Team::Wolf), 1);
        }
    }

    #[test]
    fn test_random_strategy_is_seeded() {
        let candidates = candidates_with_win();
        let strategy = RandomStrategy;
        let a = strategy
            .choose_moves(&candidates, &mut StdRng::seed_from_u64(5))
            .unwrap()
            .unwrap();
        let b = strategy
            .choose_moves(&candidates, &mut StdRng::seed_from_u64(5))
            .unwrap()
            .unwrap();
        assert_eq!(a, b);
    }
}
