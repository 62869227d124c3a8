use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use raychess::chess::perft;
use raychess::chess::position::Position;
use raychess::chess::zobrist::{ZobristKeys, DEFAULT_SEED};
use tracing_subscriber::EnvFilter;

/// Chess move generator: counts perft nodes and lists legal moves.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Seed of the Zobrist keys.
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts the leaf nodes of the legal move tree.
    Perft {
        depth: u8,
        /// Position to start from, the starting position by default.
        #[arg(long)]
        fen: Option<String>,
        /// Worker threads, all available cores by default.
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
    /// Prints perft node counts per root move.
    Divide {
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
    },
    /// Lists legal moves in long algebraic notation.
    Moves {
        #[arg(long)]
        fen: Option<String>,
    },
    /// Prints version and build information.
    Info,
}

fn load_position(fen: Option<&str>, keys: Arc<ZobristKeys>) -> anyhow::Result<Position> {
    match fen {
        Some(fen) => Position::from_fen_with_keys(fen.trim(), keys)
            .with_context(|| format!("can not load position {fen}")),
        None => Ok(Position::starting_with_keys(keys)),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    tracing::debug!(?config, "starting");
    let keys = Arc::new(ZobristKeys::new(config.seed));

    match config.command {
        Command::Perft {
            depth,
            fen,
            threads,
        } => {
            let position = load_position(fen.as_deref(), keys)?;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            println!("{}", perft::perft_parallel(&position, depth, &pool));
        },
        Command::Divide { depth, fen } => {
            let position = load_position(fen.as_deref(), keys)?;
            let split = perft::divide(&position, depth);
            for (next_move, nodes) in &split {
                println!("{}: {nodes}", next_move.uci());
            }
            println!();
            println!("total: {}", split.iter().map(|(_, nodes)| nodes).sum::<u64>());
        },
        Command::Moves { fen } => {
            let position = load_position(fen.as_deref(), keys)?;
            let moves = position.generate_moves();
            for next_move in &moves {
                println!("{next_move}");
            }
            let status = match (position.is_in_check(), moves.is_empty()) {
                (true, true) => "checkmate",
                (true, false) => "check",
                (false, true) => "stalemate",
                (false, false) => "no check",
            };
            println!("{} moves, {status}", moves.len());
        },
        Command::Info => {
            raychess::print_engine_info();
            raychess::print_binary_info();
        },
    }
    Ok(())
}
