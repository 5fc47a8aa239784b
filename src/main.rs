use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ninja_taisen_engine::engine::arena::{arena_instructions, read_instructions, simulate_many, write_results};
use ninja_taisen_engine::engine::bot_profiles::{load_default_profiles, load_profiles, BotProfilesFile};
use ninja_taisen_engine::engine::bot_strategy::DEFAULT_STRATEGY;
use ninja_taisen_engine::engine::models::{ChooseRequest, ExecuteRequest};
use ninja_taisen_engine::games::ninja_taisen::plugin::{choose, execute};
use ninja_taisen_engine::games::ninja_taisen::types::Team;

#[derive(Parser)]
#[command(name = "ninja-taisen", about = "Ninja Taisen game engine and simulator")]
struct Cli {
    /// Path to profiles.toml (default: auto-discover)
    #[arg(long, global = true, env = "NINJA_TAISEN_PROFILES")]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate many games in parallel and write JSON lines results
    Simulate {
        /// Number of games (ignored with --instructions)
        #[arg(long, default_value = "100")]
        games: usize,

        /// Seed of the first game; game i uses seed + i
        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = DEFAULT_STRATEGY)]
        monkey: String,

        #[arg(long, default_value = DEFAULT_STRATEGY)]
        wolf: String,

        /// JSON array of instructions to run instead of generated ones
        #[arg(long)]
        instructions: Option<PathBuf>,

        /// Games per parallel block
        #[arg(long, default_value = "10")]
        per_worker: usize,

        /// Worker threads (default: one per core)
        #[arg(long, env = "NINJA_TAISEN_THREADS")]
        threads: Option<usize>,

        /// Override max_turns from the profiles file
        #[arg(long)]
        max_turns: Option<usize>,

        /// Override starting_team from the profiles file
        #[arg(long)]
        starting_team: Option<Team>,

        #[arg(long, short, default_value = "results.jsonl")]
        output: PathBuf,
    },
    /// Choose a plan for one turn (request JSON from a file or stdin)
    Choose {
        request: Option<PathBuf>,
    },
    /// Apply a plan to a board (request JSON from a file or stdin)
    Execute {
        request: Option<PathBuf>,
    },
}

fn read_input(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(std::fs::read_to_string(p).map_err(|e| format!("{}: {}", p.display(), e))?),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut profiles: BotProfilesFile = match cli.profiles {
        Some(ref path) => load_profiles(path).map_err(|e| format!("Failed to load profiles: {}", e))?,
        None => load_default_profiles(),
    };

    match cli.command {
        Command::Simulate {
            games,
            seed,
            monkey,
            wolf,
            instructions,
            per_worker,
            threads,
            max_turns,
            starting_team,
            output,
        } => {
            if let Some(n) = threads {
                rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
            }
            if let Some(n) = max_turns {
                profiles.simulation.max_turns = n;
            }
            if let Some(team) = starting_team {
                profiles.simulation.starting_team = team;
            }

            let instructions = match instructions {
                Some(ref path) => read_instructions(path)?,
                None => arena_instructions(&monkey, &wolf, games, seed, false),
            };
            tracing::info!(
                games = instructions.len(),
                max_turns = profiles.simulation.max_turns,
                starting_team = %profiles.simulation.starting_team,
                "starting simulation"
            );

            let results = simulate_many(&instructions, &profiles, per_worker, None)?;
            write_results(&output, &results)?;
        }
        Command::Choose { request } => {
            let request: ChooseRequest = serde_json::from_str(&read_input(request.as_deref())?)?;
            let response = choose(&request, &profiles)?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Execute { request } => {
            let request: ExecuteRequest = serde_json::from_str(&read_input(request.as_deref())?)?;
            let response = execute(&request)?;
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}
