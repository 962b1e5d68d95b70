/// Well-known opening lines in UCI notation, eight half-moves each.
/// Used by the corpus tooling tests to synthesize small legal PGN inputs.
use cozy_chess::Board;

use crate::pgn::{resolve_move_text, san_for_move};

#[derive(Debug, Clone)]
pub struct ChessOpening {
    pub name: String,
    pub moves: Vec<String>,
}

impl ChessOpening {
    /// Render the line as one PGN game (tag pair, numbered SAN movetext,
    /// `*` result). Stops early if a move fails to resolve.
    pub fn to_pgn(&self) -> String {
        let mut board = Board::default();
        let mut out = format!("[Event \"{}\"]\n\n", self.name);
        for (ply, uci) in self.moves.iter().enumerate() {
            let Some(mv) = resolve_move_text(&board, uci) else { break };
            if ply % 2 == 0 {
                out.push_str(&format!("{}. ", ply / 2 + 1));
            }
            out.push_str(&san_for_move(&board, mv));
            out.push(' ');
            board.play(mv);
        }
        out.push_str("*\n\n");
        out
    }
}

/// Get all opening lines.
pub fn get_chess_openings() -> Vec<ChessOpening> {
    let lines: [(&str, [&str; 8]); 8] = [
        (
            "Italian Game",
            ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1h1", "g8f6"],
        ),
        (
            "Ruy Lopez",
            ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"],
        ),
        (
            "Queen's Gambit",
            ["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6", "c1g5", "f8e7"],
        ),
        (
            "Sicilian Defense",
            ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6"],
        ),
        (
            "French Defense",
            ["e2e4", "e7e6", "d2d4", "d7d5", "b1c3", "f8b4", "e4e5", "c7c5"],
        ),
        (
            "Caro-Kann Defense",
            ["e2e4", "c7c6", "d2d4", "d7d5", "b1c3", "d5e4", "c3e4", "c8f5"],
        ),
        (
            "King's Indian Defense",
            ["d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7", "e2e4", "d7d6"],
        ),
        (
            "London System",
            ["d2d4", "d7d5", "g1f3", "g8f6", "c1f4", "c7c5", "e2e3", "b8c6"],
        ),
    ];
    lines
        .into_iter()
        .map(|(name, moves)| ChessOpening {
            name: name.to_string(),
            moves: moves.into_iter().map(String::from).collect(),
        })
        .collect()
}

/// Get an opening by index, cycling through the list if necessary.
pub fn get_opening(index: usize) -> ChessOpening {
    let openings = get_chess_openings();
    openings[index % openings.len()].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lines_are_legal() {
        for opening in get_chess_openings() {
            let mut board = Board::default();
            for uci in &opening.moves {
                let mv = resolve_move_text(&board, uci)
                    .unwrap_or_else(|| panic!("{}: illegal move {uci}", opening.name));
                board.play(mv);
            }
        }
    }

    #[test]
    fn to_pgn_has_tag_and_result() {
        let pgn = get_opening(0).to_pgn();
        assert!(pgn.starts_with("[Event \"Italian Game\"]"));
        assert!(pgn.contains("1. e4 e5 2. Nf3 Nc6"));
        assert!(pgn.trim_end().ends_with('*'));
    }

    #[test]
    fn get_opening_cycles() {
        let n = get_chess_openings().len();
        assert_eq!(get_opening(0).name, get_opening(n).name);
    }
}
