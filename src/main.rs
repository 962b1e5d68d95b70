use anyhow::Result;
use clap::Parser;
use cozy_chess::{Board, Color, GameStatus, Piece};
use std::io::{self, Write};
use std::path::PathBuf;

use tunebot::pgn::{resolve_move_text, san_for_move};
use tunebot::Engine;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against the engine", long_about = None)]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Path to a tuned parameter file (JSON)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Path to the opening book (JSON)
    #[arg(long, default_value = "book.json")]
    book: PathBuf,

    /// Disable the opening book
    #[arg(long)]
    no_book: bool,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Seed for the book's weighted draw
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn piece_char(color: Color, piece: Piece) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White { c.to_ascii_uppercase() } else { c }
}

fn print_board(board: &Board) {
    let mut grid = [['.'; 8]; 8];
    for &color in &[Color::White, Color::Black] {
        for &piece in &[Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let bb = board.colors(color) & board.pieces(piece);
            for sq in bb {
                let s = format!("{}", sq);
                let file = (s.as_bytes()[0] - b'a') as usize;
                let rank = (s.as_bytes()[1] - b'1') as usize;
                grid[rank][file] = piece_char(color, piece);
            }
        }
    }
    println!();
    for rank in (0..8).rev() {
        print!("{} ", rank + 1);
        for file in 0..8 {
            print!(" {}", grid[rank][file]);
        }
        println!();
    }
    println!("   a b c d e f g h");
}

fn get_human_move(board: &Board) -> Result<cozy_chess::Move> {
    loop {
        print!("Enter your move (SAN like Nf3 or UCI like g1f3): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        match resolve_move_text(board, input) {
            Some(mv) => return Ok(mv),
            None => println!("Illegal or unrecognized move!"),
        }
    }
}

fn announce_result(board: &Board) {
    match board.status() {
        GameStatus::Won => {
            // The side to move has been checkmated.
            let winner = if board.side_to_move() == Color::White { "Black" } else { "White" };
            println!("\nCheckmate! {winner} wins!");
        }
        GameStatus::Drawn => println!("\nGame is a draw!"),
        GameStatus::Ongoing => {}
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let human_color = parse_color(&args.color)?;
    let mut engine = Engine::from_files(args.params.as_deref(), Some(&args.book), args.seed)?;

    let mut board = match args.fen {
        Some(ref fen) => Board::from_fen(fen, false)
            .map_err(|e| anyhow::anyhow!("Invalid FEN string: {e:?}"))?,
        None => Board::default(),
    };

    loop {
        if board.status() != GameStatus::Ongoing {
            announce_result(&board);
            break;
        }

        println!(
            "\n{}'s turn",
            if board.side_to_move() == Color::White { "White" } else { "Black" }
        );
        print_board(&board);

        let mv = if board.side_to_move() == human_color {
            get_human_move(&board)?
        } else {
            println!("Thinking...");
            match engine.choose_move(&board, args.depth, !args.no_book) {
                Some(mv) => {
                    println!("Engine plays: {}", san_for_move(&board, mv));
                    mv
                }
                None => break,
            }
        };

        board.play(mv);
        println!("Evaluation: {:+.2}", engine.evaluate(&board));
    }

    Ok(())
}
