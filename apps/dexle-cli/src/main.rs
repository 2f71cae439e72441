use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod catalog_io;
mod commands;
mod terminal;

use commands::check::{cmd_check, CheckArgs};
use commands::config::{cmd_config, ConfigCmd};
use commands::evaluate::{cmd_evaluate, EvaluateArgs};
use commands::play::{cmd_play, PlayArgs};
use commands::simulate::{cmd_simulate, SimulateArgs};

#[derive(Parser)]
#[command(name = "dexle-cli", version, about = "Guess-selection helper for attribute-clue guessing games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively: the engine proposes, you type the clues
    Play(PlayArgs),
    /// Play against a known target and print the session report (JSON)
    Simulate(SimulateArgs),
    /// Simulate every catalog entity as the target and summarize (JSON)
    Evaluate(EvaluateArgs),
    /// Validate a catalog and report trait-slot repeats (JSON)
    CheckCatalog(CheckArgs),
    /// Session parameter helpers
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Play(args) => cmd_play(args),
        Commands::Simulate(args) => cmd_simulate(args),
        Commands::Evaluate(args) => cmd_evaluate(args),
        Commands::CheckCatalog(args) => cmd_check(args),
        Commands::Config { cmd } => cmd_config(cmd),
    };
    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
