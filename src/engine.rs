//! Move-selection policy: opening book first while the game is young,
//! alpha-beta search otherwise. This is the only orchestration logic in
//! the engine and it keeps no game state of its own.

use cozy_chess::{Board, Move};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;

use crate::book::{BookError, OpeningBook};
use crate::eval::evaluate;
use crate::eval::params::{EvalParams, ParamsError};
use crate::search::alphabeta::{SearchResult, Searcher};

/// The book is consulted only while the full-move counter is at or below
/// this; later positions go straight to search even when booked.
pub const BOOK_MOVE_LIMIT: u16 = 10;

pub struct Engine {
    params: EvalParams,
    book: OpeningBook,
    rng: SmallRng,
}

impl Engine {
    pub fn new(params: EvalParams, book: OpeningBook, seed: u64) -> Self {
        Self { params, book, rng: SmallRng::seed_from_u64(seed) }
    }

    /// Load parameters and book from optional files. A *missing* file is
    /// not fatal: defaults (or an empty book) are used with a warning and
    /// move selection still works via search alone. A file that exists
    /// but fails validation or parsing is a configuration error and
    /// propagates before any search runs.
    pub fn from_files(
        params_path: Option<&Path>,
        book_path: Option<&Path>,
        seed: u64,
    ) -> anyhow::Result<Self> {
        let params = match params_path {
            Some(path) => match EvalParams::load(path) {
                Ok(params) => {
                    info!("loaded tuned parameters from {}", path.display());
                    params
                }
                Err(ParamsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("parameter file {} not found, using defaults", path.display());
                    EvalParams::default()
                }
                Err(e) => return Err(e.into()),
            },
            None => EvalParams::default(),
        };
        let book = match book_path {
            Some(path) => match OpeningBook::load(path) {
                Ok(book) => {
                    info!("loaded opening book from {} ({} positions)", path.display(), book.len());
                    book
                }
                Err(BookError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("book file {} not found, relying on search alone", path.display());
                    OpeningBook::new()
                }
                Err(e) => return Err(e.into()),
            },
            None => OpeningBook::new(),
        };
        Ok(Self::new(params, book, seed))
    }

    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// Static evaluation of a position with this engine's parameters.
    pub fn evaluate(&self, board: &Board) -> f64 {
        evaluate(board, &self.params)
    }

    /// Search-only move choice, bypassing the book.
    pub fn search(&self, board: &Board, depth: u32) -> SearchResult {
        Searcher::new(&self.params).search(board, depth)
    }

    /// Book-then-search: consult the book inside the opening window, fall
    /// back to a depth-bounded search otherwise. `None` only for terminal
    /// positions.
    pub fn choose_move(&mut self, board: &Board, depth: u32, use_book: bool) -> Option<Move> {
        if use_book && board.fullmove_number() <= BOOK_MOVE_LIMIT {
            if let Some(mv) = self.book.pick_move(board, &mut self.rng) {
                info!("book move {mv}");
                return Some(mv);
            }
        }
        self.search(board, depth).bestmove
    }
}
