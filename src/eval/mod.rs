pub mod params;

use cozy_chess::{Board, Color, Square};
use params::{EvalParams, MATERIAL, PIECES, piece_index};

/// PST entries are scaled down so positional terms stay small relative to
/// material.
pub const POSITIONAL_DIVISOR: f64 = 100.0;

fn square_index(sq: Square) -> usize {
    // a1 = 0, b1 = 1, ..., h8 = 63
    let s = format!("{}", sq);
    let b = s.as_bytes();
    let file = (b[0] - b'a') as usize;
    let rank = (b[1] - b'1') as usize;
    rank * 8 + file
}

/// Table slot for a piece of `color` on `sq`: White reads the table
/// directly, Black reads the rank-mirrored square.
fn pst_index(color: Color, sq: Square) -> usize {
    let idx = square_index(sq);
    match color {
        Color::White => idx,
        Color::Black => idx ^ 56,
    }
}

/// Static evaluation in pawn units: positive favours White regardless of
/// the side to move. Material plus scaled piece-square bonus per occupied
/// square; White contributions add, Black contributions subtract.
///
/// Pure and deterministic for a given (board, params) pair.
pub fn evaluate(board: &Board, params: &EvalParams) -> f64 {
    let mut total = 0.0;
    for &color in &[Color::White, Color::Black] {
        let sign = if color == Color::White { 1.0 } else { -1.0 };
        for &piece in &PIECES {
            let bb = board.colors(color) & board.pieces(piece);
            let table = params.table(piece);
            for sq in bb {
                let material = MATERIAL[piece_index(piece)];
                let positional = table[pst_index(color, sq)] as f64 / POSITIONAL_DIVISOR;
                total += sign * (material + positional);
            }
        }
    }
    total
}
