//! Standard algebraic notation over cozy-chess moves.
//!
//! Notation is only ever resolved by rendering the legal moves of the
//! current position and comparing text, so a successful resolution is a
//! legal move by construction.

use cozy_chess::{Board, Color, GameStatus, Move, Piece};

fn piece_letter(piece: Piece) -> Option<char> {
    match piece {
        Piece::Pawn => None,
        Piece::Knight => Some('N'),
        Piece::Bishop => Some('B'),
        Piece::Rook => Some('R'),
        Piece::Queen => Some('Q'),
        Piece::King => Some('K'),
    }
}

fn opponent(color: Color) -> Color {
    if color == Color::White {
        Color::Black
    } else {
        Color::White
    }
}

/// True when `mv` captures, including en passant (a pawn moving
/// diagonally onto an empty square).
pub fn is_capture(board: &Board, mv: Move) -> bool {
    let stm = board.side_to_move();
    if board.color_on(mv.to) == Some(opponent(stm)) {
        return true;
    }
    if board.piece_on(mv.from) == Some(Piece::Pawn) {
        let from = format!("{}", mv.from);
        let to = format!("{}", mv.to);
        return from.as_bytes()[0] != to.as_bytes()[0] && board.piece_on(mv.to).is_none();
    }
    false
}

/// cozy-chess encodes castling as the king capturing its own rook.
fn is_castling(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move())
}

/// SAN for a legal move, with minimal disambiguation and the check or
/// checkmate suffix.
pub fn san_for_move(board: &Board, mv: Move) -> String {
    let moving_piece = board.piece_on(mv.from);
    let from = format!("{}", mv.from);
    let to = format!("{}", mv.to);

    let mut san = if is_castling(board, mv) {
        if to.as_bytes()[0] > from.as_bytes()[0] {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let mut s = String::new();
        let capture = is_capture(board, mv);
        if let Some(letter) = moving_piece.and_then(piece_letter) {
            s.push(letter);
            // Minimal disambiguation among same-type moves to the same
            // destination: file if unique, else rank, else both.
            let mut same_file = false;
            let mut same_rank = false;
            let mut ambiguous = false;
            board.generate_moves(|ml| {
                for m in ml {
                    if m != mv && m.to == mv.to && board.piece_on(m.from) == moving_piece {
                        ambiguous = true;
                        let other = format!("{}", m.from);
                        if other.as_bytes()[0] == from.as_bytes()[0] {
                            same_file = true;
                        }
                        if other.as_bytes()[1] == from.as_bytes()[1] {
                            same_rank = true;
                        }
                    }
                }
                false
            });
            if ambiguous {
                if !same_file {
                    s.push(from.as_bytes()[0] as char);
                } else if !same_rank {
                    s.push(from.as_bytes()[1] as char);
                } else {
                    s.push_str(&from);
                }
            }
        } else if capture {
            s.push(from.as_bytes()[0] as char);
        }
        if capture {
            s.push('x');
        }
        s.push_str(&to);
        if let Some(promo) = mv.promotion {
            s.push('=');
            if let Some(letter) = piece_letter(promo) {
                s.push(letter);
            }
        }
        s
    };

    let mut next = board.clone();
    next.play(mv);
    if !next.checkers().is_empty() {
        san.push(if next.status() == GameStatus::Won { '#' } else { '+' });
    }
    san
}

/// Resolve movetext to a legal move, or `None` when nothing matches.
/// Accepts SAN (annotations and check marks ignored), the engine's own
/// UCI text, the `0-0` digit form of castling, and the standard
/// king-two-squares castling UCI.
pub fn resolve_move_text(board: &Board, text: &str) -> Option<Move> {
    let cleaned = text.trim().trim_end_matches(['+', '#', '!', '?']);
    if cleaned.is_empty() {
        return None;
    }
    let cleaned = match cleaned {
        "0-0" => "O-O",
        "0-0-0" => "O-O-O",
        other => other,
    };
    let mut found = None;
    board.generate_moves(|ml| {
        for m in ml {
            if move_matches(board, m, cleaned) {
                found = Some(m);
                break;
            }
        }
        found.is_some()
    });
    found
}

fn move_matches(board: &Board, m: Move, text: &str) -> bool {
    if format!("{}", m) == text {
        return true;
    }
    let san = san_for_move(board, m);
    if san.trim_end_matches(['+', '#']) == text {
        return true;
    }
    if is_castling(board, m) {
        // Standard UCI writes castling as a two-square king move.
        let from = format!("{}", m.from);
        let to = format!("{}", m.to);
        let target_file = if to.as_bytes()[0] > from.as_bytes()[0] { 'g' } else { 'c' };
        let standard = format!("{}{}{}", from, target_file, from.as_bytes()[1] as char);
        if text == standard {
            return true;
        }
    }
    false
}
