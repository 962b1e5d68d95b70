use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tunebot::book::{BookBuildParams, OpeningBook};

#[derive(Parser, Debug)]
#[command(name = "build-book", about = "Build a weighted opening book from a PGN corpus")]
struct Args {
    /// PGN corpus to analyze
    #[arg(long)]
    pgn: PathBuf,

    /// Output book file
    #[arg(long, default_value = "book.json")]
    out: PathBuf,

    /// Maximum number of games to analyze
    #[arg(long, default_value_t = 6000)]
    max_games: usize,

    /// Half-moves analyzed per game
    #[arg(long, default_value_t = 20)]
    ply_depth: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = File::open(&args.pgn)
        .with_context(|| format!("cannot open corpus {}", args.pgn.display()))?;
    let params = BookBuildParams { max_games: args.max_games, ply_depth: args.ply_depth };
    eprintln!(
        "Analyzing up to {} games, {} plies each...",
        params.max_games, params.ply_depth
    );
    let (book, stats) = OpeningBook::build(BufReader::new(file), &params);
    book.save(&args.out)
        .with_context(|| format!("cannot write book {}", args.out.display()))?;
    eprintln!(
        "Read {} games ({} skipped), kept {} positions, wrote {}",
        stats.games_read,
        stats.games_skipped,
        book.len(),
        args.out.display()
    );
    Ok(())
}
