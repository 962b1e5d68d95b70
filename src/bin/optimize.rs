use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tunebot::eval::params::EvalParams;
use tunebot::optimizer::{load_training_set, optimize, OptimizerParams};

#[derive(Parser, Debug)]
#[command(name = "optimize", about = "Tune the piece-square tables against an expert-game corpus")]
struct Args {
    /// PGN corpus of expert games
    #[arg(long)]
    pgn: PathBuf,

    /// Output parameter file
    #[arg(long, default_value = "optimized_params.json")]
    out: PathBuf,

    /// Starting parameter file (defaults to the built-in tables)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Improvement attempts
    #[arg(long, default_value_t = 200)]
    iterations: usize,

    /// Games used to build the training set
    #[arg(long, default_value_t = 100)]
    max_games: usize,

    /// Half-moves kept per game
    #[arg(long, default_value_t = 40)]
    max_plies: usize,

    /// Search depth while scoring candidates
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Positions sampled per fitness evaluation
    #[arg(long, default_value_t = 100)]
    sample_size: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let initial = match args.params {
        // A malformed starting file is a configuration error; only run
        // with tables that validated.
        Some(ref path) => EvalParams::load(path)
            .with_context(|| format!("cannot load parameters {}", path.display()))?,
        None => EvalParams::default(),
    };

    let file = File::open(&args.pgn)
        .with_context(|| format!("cannot open corpus {}", args.pgn.display()))?;
    let examples = load_training_set(BufReader::new(file), args.max_games, args.max_plies);
    anyhow::ensure!(!examples.is_empty(), "no training positions extracted from the corpus");
    eprintln!(
        "Tuning over {} positions: {} iterations at depth {}, sample {}",
        examples.len(),
        args.iterations,
        args.depth,
        args.sample_size
    );

    let opts = OptimizerParams {
        iterations: args.iterations,
        search_depth: args.depth,
        sample_size: args.sample_size,
        seed: args.seed,
    };
    let outcome = optimize(&examples, initial, &opts);
    outcome
        .params
        .save(&args.out)
        .with_context(|| format!("cannot write parameters {}", args.out.display()))?;
    eprintln!(
        "Best fitness {:.2}% after {} accepted mutations, wrote {}",
        outcome.fitness,
        outcome.accepted,
        args.out.display()
    );
    Ok(())
}
