//! Named strategy profiles plus simulation and lookahead settings.
//! Loaded from TOML at runtime by the CLI and the arena.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::engine::bot_strategy::{lookup_strategy_with, BotStrategy, MetricStrategy, RandomSpotWinStrategy, RandomStrategy};
use crate::engine::evaluator::lookup_metric;
use crate::engine::lookahead::{LookaheadParams, LookaheadStrategy};
use crate::engine::simulator::SimulationSettings;
use crate::error::{EngineError, Result};

/// A named strategy with its own parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct BotProfile {
    pub description: Option<String>,
    /// "random", "random_spot_win", "metric" or "lookahead".
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,
    /// "count", "position" or "strength"; used by metric and lookahead.
    pub metric: Option<String>,

    // Lookahead overrides (defaults from the file's [lookahead] table)
    pub pool_fraction: Option<f64>,
    pub min_pool: Option<usize>,
    pub max_pool: Option<usize>,
}

fn default_strategy_type() -> String {
    "metric".into()
}

impl BotProfile {
    pub fn effective_metric(&self) -> &str {
        self.metric.as_deref().unwrap_or("strength")
    }

    /// Lookahead parameters with this profile's overrides applied.
    pub fn to_lookahead_params(&self, base: &LookaheadParams) -> LookaheadParams {
        LookaheadParams {
            pool_fraction: self.pool_fraction.unwrap_or(base.pool_fraction),
            min_pool: self.min_pool.unwrap_or(base.min_pool),
            max_pool: self.max_pool.unwrap_or(base.max_pool),
        }
    }

    pub fn build(&self, name: &str, base: &LookaheadParams) -> Result<Box<dyn BotStrategy>> {
        match self.strategy_type.as_str() {
            "random" => Ok(Box::new(RandomStrategy)),
            "random_spot_win" => Ok(Box::new(RandomSpotWinStrategy)),
            "metric" => Ok(Box::new(MetricStrategy::new(lookup_metric(self.effective_metric())?))),
            "lookahead" => Ok(Box::new(LookaheadStrategy::new(
                lookup_metric(self.effective_metric())?,
                self.to_lookahead_params(base),
            ))),
            other => Err(EngineError::UnknownStrategy(format!(
                "{other} (strategy_type of profile '{name}')"
            ))),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotProfilesFile {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub lookahead: LookaheadParams,
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
}

impl BotProfilesFile {
    /// Resolve a strategy by profile name first, then by built-in name.
    pub fn resolve_strategy(&self, name: &str) -> Result<Box<dyn BotStrategy>> {
        match self.profiles.get(name) {
            Some(profile) => profile.build(name, &self.lookahead),
            None => lookup_strategy_with(name, &self.lookahead),
        }
    }
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<BotProfilesFile> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| EngineError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load profiles from well-known paths, returning a default if none found.
pub fn load_default_profiles() -> BotProfilesFile {
    let candidates = [
        "profiles.toml",
        "../profiles.toml",
        "/etc/ninja-taisen/profiles.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded strategy profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load strategy profiles");
                }
            }
        }
    }
    tracing::info!("no profiles.toml found, using built-in defaults");
    BotProfilesFile::default()
}
