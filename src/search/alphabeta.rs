use cozy_chess::{Board, Color, GameStatus, Move};

use crate::eval::evaluate;
use crate::eval::params::EvalParams;

/// Scores live well inside these bounds; they double as the initial
/// alpha/beta window.
pub const SCORE_BOUND: f64 = 9999.0;

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub bestmove: Option<Move>,
    pub score: f64,
    pub nodes: u64,
}

/// Legal moves sorted lexicographically by their UCI text. This is the
/// engine's canonical enumeration order: tie-breaks ("first move reaching
/// the extremal score") are reproducible because of it, and the unpruned
/// and pruned searches agree on it.
pub fn ordered_moves(board: &Board) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(64);
    board.generate_moves(|ml| {
        for m in ml {
            moves.push(m);
        }
        false
    });
    moves.sort_by_key(|m| format!("{}", m));
    moves
}

/// Depth-bounded minimax with fail-hard alpha-beta pruning.
///
/// Scores are absolute (White-maximizing); the root picks the maximizing
/// or minimizing role from the side to move. No transposition table, no
/// quiescence, no iterative deepening, no ordering beyond
/// [`ordered_moves`]; depth is the sole bound on cost.
pub struct Searcher<'a> {
    params: &'a EvalParams,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(params: &'a EvalParams) -> Self {
        Self { params, nodes: 0 }
    }

    /// Search to `depth` plies. Depth 0 degenerates to a bare evaluator
    /// call with no move. Deterministic: identical (position, depth,
    /// params) always yields the identical (score, move).
    pub fn search(&mut self, board: &Board, depth: u32) -> SearchResult {
        self.nodes = 0;
        let maximizing = board.side_to_move() == Color::White;
        let (score, bestmove) = self.minimax(board, depth, -SCORE_BOUND, SCORE_BOUND, maximizing);
        SearchResult { bestmove, score, nodes: self.nodes }
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> (f64, Option<Move>) {
        self.nodes += 1;
        if depth == 0 || board.status() != GameStatus::Ongoing {
            return (evaluate(board, self.params), None);
        }

        let moves = ordered_moves(board);
        if moves.is_empty() {
            // No legal moves: terminal with a null move.
            return (evaluate(board, self.params), None);
        }

        if maximizing {
            let mut best = -SCORE_BOUND;
            let mut bestmove = None;
            for m in moves {
                let mut child = board.clone();
                child.play(m);
                let (score, _) = self.minimax(&child, depth - 1, alpha, beta, false);
                if score > best {
                    best = score;
                    bestmove = Some(m);
                }
                if score > alpha {
                    alpha = score;
                }
                if beta <= alpha {
                    break;
                }
            }
            (best, bestmove)
        } else {
            let mut best = SCORE_BOUND;
            let mut bestmove = None;
            for m in moves {
                let mut child = board.clone();
                child.play(m);
                let (score, _) = self.minimax(&child, depth - 1, alpha, beta, true);
                if score < best {
                    best = score;
                    bestmove = Some(m);
                }
                if score < beta {
                    beta = score;
                }
                if beta <= alpha {
                    break;
                }
            }
            (best, bestmove)
        }
    }
}
