//! CLI entry point for the tiervault rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tiervault_rebalancer::commands;
use tiervault_rebalancer::config::Config;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Tiered strategy reallocation: snapshot in, proposed allocations out")]
#[command(version)]
struct Cli {
    /// Path to config.toml (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reallocate a snapshot and print the annotated JSON
    Run {
        /// Path to snapshot.json, or - for stdin
        snapshot: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show current vs proposed allocations per tier
    Plan {
        /// Path to snapshot.json, or - for stdin
        snapshot: PathBuf,

        /// Print the plan as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Command::Run { snapshot, pretty } => commands::run(&config, &snapshot, pretty, &mut stdout),
        Command::Plan { snapshot, json } => {
            commands::show_plan(&config, &snapshot, json, &mut stdout)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
