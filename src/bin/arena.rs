//! Arena CLI: run strategy-vs-strategy experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 200 --a lookahead_strength --b metric_strength
//!   cargo run --release --bin arena -- --games 100 --a cautious --b random --profiles profiles.toml

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use ninja_taisen_engine::engine::arena::run_arena;
use ninja_taisen_engine::engine::bot_profiles::{load_default_profiles, load_profiles};

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for Ninja Taisen")]
struct Cli {
    /// First strategy or profile name
    #[arg(long, default_value = "lookahead_strength")]
    a: String,

    /// Second strategy or profile name
    #[arg(long, default_value = "metric_strength")]
    b: String,

    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Alternate which strategy plays monkey between games (`--alternate-seats false` to fix seats)
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    alternate_seats: bool,

    /// Games per parallel block
    #[arg(long, default_value = "10")]
    per_worker: usize,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Path to profiles.toml
    #[arg(long)]
    profiles: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()))
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path).unwrap_or_else(|e| {
            eprintln!("Error loading profiles: {}", e);
            std::process::exit(1);
        }),
        None => load_default_profiles(),
    };

    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
            eprintln!("Error configuring thread pool: {}", e);
            std::process::exit(1);
        }
    }

    eprintln!(
        "Arena: {} games, seed={}, alternate_seats={}, max_turns={}",
        cli.games, cli.seed, cli.alternate_seats, profiles.simulation.max_turns
    );
    eprintln!("  a: {}", cli.a);
    eprintln!("  b: {}", cli.b);
    eprintln!();

    let completed = AtomicUsize::new(0);
    let progress_cb = |done: usize, total: usize| {
        // blocks finish out of order; only ever report forward progress
        let prev = completed.fetch_max(done, Ordering::Relaxed);
        if done > prev {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let result = run_arena(
        &profiles,
        &cli.a,
        &cli.b,
        cli.games,
        cli.seed,
        cli.alternate_seats,
        cli.per_worker,
        Some(&progress_cb),
    );

    eprintln!("\r                                    "); // clear progress line
    match result {
        Ok(result) => println!("{}", result.summary()),
        Err(e) => {
            eprintln!("Arena failed: {}", e);
            std::process::exit(1);
        }
    }
}
