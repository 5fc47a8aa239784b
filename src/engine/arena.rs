//! Batch simulation and bot-vs-bot arena runner.
//!
//! Instructions are split into blocks; blocks run in parallel on the rayon
//! pool while each block plays its games one after another. Every game owns
//! its own seeded generator, so results do not depend on scheduling.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::engine::bot_profiles::BotProfilesFile;
use crate::engine::models::*;
use crate::engine::simulator::play_game;
use crate::error::{EngineError, Result};
use crate::games::ninja_taisen::types::Team;

/// Progress callback: (games completed, total games).
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

fn worker_label() -> String {
    rayon::current_thread_index().map_or_else(|| "main".to_string(), |i| format!("worker-{i}"))
}

/// Play the game described by one instruction.
pub fn simulate_one(instruction: &InstructionDto, profiles: &BotProfilesFile) -> Result<ResultDto> {
    let monkey = profiles.resolve_strategy(&instruction.monkey_strategy)?;
    let wolf = profiles.resolve_strategy(&instruction.wolf_strategy)?;

    let t0 = Instant::now();
    let outcome = play_game(monkey.as_ref(), wolf.as_ref(), instruction.seed, &profiles.simulation)?;
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let result = ResultDto {
        id: instruction.id,
        seed: instruction.seed,
        monkey_strategy: instruction.monkey_strategy.clone(),
        wolf_strategy: instruction.wolf_strategy.clone(),
        winner: winner_label(outcome.winner),
        turn_count: outcome.turn_count,
        monkey_cards_left: outcome.cards_left(Team::Monkey),
        wolf_cards_left: outcome.cards_left(Team::Wolf),
        duration_ms,
        worker: worker_label(),
    };
    tracing::debug!(
        id = result.id,
        seed = result.seed,
        winner = %result.winner,
        turns = result.turn_count,
        "game finished"
    );
    Ok(result)
}

fn simulate_block(
    block: &[InstructionDto],
    profiles: &BotProfilesFile,
    completed: &AtomicUsize,
    total: usize,
    progress: Option<ProgressFn<'_>>,
) -> Result<Vec<ResultDto>> {
    let (Some(first), Some(last)) = (block.first(), block.last()) else {
        return Ok(Vec::new());
    };
    let worker = worker_label();
    tracing::info!(first_id = first.id, last_id = last.id, %worker, "starting block");

    let t0 = Instant::now();
    let mut results = Vec::with_capacity(block.len());
    for instruction in block {
        results.push(simulate_one(instruction, profiles)?);
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(cb) = progress {
            cb(done, total);
        }
    }
    tracing::info!(
        first_id = first.id,
        last_id = last.id,
        %worker,
        elapsed_s = t0.elapsed().as_secs_f64(),
        "completed block"
    );
    Ok(results)
}

/// Simulate every instruction, `per_worker` games per parallel block.
/// Results come back in instruction order.
pub fn simulate_many(
    instructions: &[InstructionDto],
    profiles: &BotProfilesFile,
    per_worker: usize,
    progress: Option<ProgressFn<'_>>,
) -> Result<Vec<ResultDto>> {
    let per_worker = per_worker.max(1);
    let total = instructions.len();
    tracing::info!(
        games = total,
        per_worker,
        blocks = total.div_ceil(per_worker),
        threads = rayon::current_num_threads(),
        "assigning instructions to workers"
    );

    let completed = AtomicUsize::new(0);
    let blocks: Vec<Vec<ResultDto>> = instructions
        .par_chunks(per_worker)
        .map(|block| simulate_block(block, profiles, &completed, total, progress))
        .collect::<Result<_>>()?;
    Ok(blocks.into_iter().flatten().collect())
}

/// Instructions for `num_games` between two strategies. With
/// `alternate_seats` the strategies swap teams on every other game.
pub fn arena_instructions(
    strategy_a: &str,
    strategy_b: &str,
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
) -> Vec<InstructionDto> {
    (0..num_games)
        .map(|i| {
            let (monkey, wolf) = if alternate_seats && i % 2 == 1 {
                (strategy_b, strategy_a)
            } else {
                (strategy_a, strategy_b)
            };
            InstructionDto {
                id: i as u64,
                seed: base_seed + i as u64,
                monkey_strategy: monkey.to_string(),
                wolf_strategy: wolf.to_string(),
            }
        })
        .collect()
}

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: BTreeMap<String, usize>,
    pub monkey_wins: usize,
    pub wolf_wins: usize,
    pub draws: usize,
    pub turn_counts: Vec<usize>,
    pub game_durations_ms: Vec<f64>,
}

impl ArenaResult {
    pub fn from_results(strategy_names: &[&str], results: &[ResultDto]) -> Self {
        let mut arena = ArenaResult {
            num_games: results.len(),
            wins: strategy_names.iter().map(|n| (n.to_string(), 0)).collect(),
            monkey_wins: 0,
            wolf_wins: 0,
            draws: 0,
            turn_counts: Vec::with_capacity(results.len()),
            game_durations_ms: Vec::with_capacity(results.len()),
        };

        for r in results {
            arena.turn_counts.push(r.turn_count);
            arena.game_durations_ms.push(r.duration_ms);
            let winner_strategy = match r.winner.as_str() {
                "monkey" => {
                    arena.monkey_wins += 1;
                    &r.monkey_strategy
                }
                "wolf" => {
                    arena.wolf_wins += 1;
                    &r.wolf_strategy
                }
                _ => {
                    arena.draws += 1;
                    continue;
                }
            };
            *arena.wins.entry(winner_strategy.clone()).or_insert(0) += 1;
        }
        arena
    }

    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_turns(&self) -> f64 {
        if self.turn_counts.is_empty() {
            return 0.0;
        }
        self.turn_counts.iter().sum::<usize>() as f64 / self.turn_counts.len() as f64
    }

    pub fn turns_stddev(&self) -> f64 {
        if self.turn_counts.len() < 2 {
            return 0.0;
        }
        let avg = self.avg_turns();
        let variance = self
            .turn_counts
            .iter()
            .map(|&t| (t as f64 - avg).powi(2))
            .sum::<f64>()
            / (self.turn_counts.len() - 1) as f64;
        variance.sqrt()
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        for (name, wins) in &self.wins {
            let wr = self.win_rate(name);
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>20}: {:4} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
                name,
                wins,
                wr * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
            ));
        }
        lines.push(format!("  {:>20}: {}", "Draws", self.draws));
        lines.push(format!(
            "  {:>20}: monkey {}  wolf {}",
            "By team", self.monkey_wins, self.wolf_wins
        ));
        lines.push(format!(
            "  {:>20}: {:.1} +/- {:.1}",
            "Turns",
            self.avg_turns(),
            self.turns_stddev()
        ));
        if !self.game_durations_ms.is_empty() {
            let total_ms = self.game_durations_ms.iter().sum::<f64>();
            let avg_ms = total_ms / self.game_durations_ms.len() as f64;
            lines.push(format!(
                "  Avg game: {:.1}ms  |  Total CPU: {:.1}s",
                avg_ms,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Run `num_games` between two strategies and return aggregated stats.
pub fn run_arena(
    profiles: &BotProfilesFile,
    strategy_a: &str,
    strategy_b: &str,
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
    per_worker: usize,
    progress: Option<ProgressFn<'_>>,
) -> Result<ArenaResult> {
    // fail fast on unknown names before spinning up workers
    profiles.resolve_strategy(strategy_a)?;
    profiles.resolve_strategy(strategy_b)?;

    let instructions = arena_instructions(strategy_a, strategy_b, num_games, base_seed, alternate_seats);
    let results = simulate_many(&instructions, profiles, per_worker, progress)?;
    Ok(ArenaResult::from_results(&[strategy_a, strategy_b], &results))
}

/// Read instructions from a JSON array file.
pub fn read_instructions(path: &Path) -> Result<Vec<InstructionDto>> {
    let file = File::open(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write one JSON object per line.
pub fn write_results(path: &Path, results: &[ResultDto]) -> Result<()> {
    let io_err = |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    tracing::info!(path = %path.display(), count = results.len(), "wrote results");
    Ok(())
}

/// Read results written by `write_results`.
pub fn read_results(path: &Path) -> Result<Vec<ResultDto>> {
    let io_err = |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut results = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        results.push(serde_json::from_str(&line)?);
    }
    Ok(results)
}
