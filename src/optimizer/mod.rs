//! Offline hill-climbing tuner for the evaluation parameters.
//!
//! Greedy local search with a deliberately narrow neighbourhood: each
//! iteration perturbs a single piece-square cell and keeps the candidate
//! only on a strict fitness improvement. No annealing, no backtracking,
//! no memory of rejected mutations, and no mid-run checkpoint: the
//! iteration budget is the sole bound, and only the final accepted
//! parameter set is worth persisting.

use cozy_chess::{Board, Move};
use indicatif::ProgressBar;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::BufRead;

use crate::eval::params::{EvalParams, PIECES};
use crate::pgn::{replay_prefix, PgnReader};
use crate::search::alphabeta::Searcher;

/// One expert decision: the position faced and the move the expert played.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub board: Board,
    pub expert: Move,
}

#[derive(Debug, Clone, Copy)]
pub struct OptimizerParams {
    pub iterations: usize,
    pub search_depth: u32,
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self { iterations: 200, search_depth: 3, sample_size: 100, seed: 42 }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    pub params: EvalParams,
    pub fitness: f64,
    pub accepted: usize,
    /// Best fitness after each iteration; non-decreasing by construction.
    pub history: Vec<f64>,
}

/// Extract every (position-before-move, move-played) pair from the first
/// `max_plies` half-moves of up to `max_games` games. Unlike the book's
/// frequency-thresholded fingerprints, every prefix position is kept.
/// Malformed games are skipped.
pub fn load_training_set<R: BufRead>(
    reader: R,
    max_games: usize,
    max_plies: usize,
) -> Vec<TrainingExample> {
    let mut examples = Vec::new();
    let mut pgn = PgnReader::new(reader);
    let mut games = 0usize;
    while games < max_games {
        let Some(game) = pgn.next_game() else { break };
        games += 1;
        match replay_prefix(&game, max_plies) {
            Ok(prefix) => {
                examples.extend(
                    prefix
                        .into_iter()
                        .map(|(board, expert)| TrainingExample { board, expert }),
                );
            }
            Err(e) => debug!("skipping malformed game {games}: {e}"),
        }
    }
    info!("loaded {} training positions from {} games", examples.len(), games);
    examples
}

pub const MUTATION_DELTAS: [i32; 6] = [-5, -3, -1, 1, 3, 5];

/// One candidate per call: copy the parameters and add a small delta to a
/// single table cell, both chosen uniformly at random.
pub fn mutate(params: &EvalParams, rng: &mut SmallRng) -> EvalParams {
    let mut candidate = params.clone();
    let piece = PIECES[rng.gen_range(0..PIECES.len())];
    let square = rng.gen_range(0..64);
    let delta = MUTATION_DELTAS[rng.gen_range(0..MUTATION_DELTAS.len())];
    candidate.nudge(piece, square, delta);
    candidate
}

/// Percentage of a without-replacement sample of the training set for
/// which a fixed-depth search with `params` reproduces the expert move.
/// Always within [0, 100].
pub fn fitness(
    examples: &[TrainingExample],
    params: &EvalParams,
    depth: u32,
    sample_size: usize,
    rng: &mut SmallRng,
) -> f64 {
    let k = sample_size.min(examples.len());
    if k == 0 {
        return 0.0;
    }
    let sample = rand::seq::index::sample(rng, examples.len(), k);
    let mut matches = 0usize;
    for idx in sample {
        let example = &examples[idx];
        let result = Searcher::new(params).search(&example.board, depth);
        if result.bestmove == Some(example.expert) {
            matches += 1;
        }
    }
    matches as f64 / k as f64 * 100.0
}

/// Greedy hill climb from `initial` over the training set. The best
/// fitness starts at the initial parameters' own score; a candidate
/// replaces the incumbent only when strictly better.
pub fn optimize(
    examples: &[TrainingExample],
    initial: EvalParams,
    opts: &OptimizerParams,
) -> OptimizeOutcome {
    let mut rng = SmallRng::seed_from_u64(opts.seed);
    let mut current = initial;
    let mut best_fitness = fitness(examples, &current, opts.search_depth, opts.sample_size, &mut rng);
    info!("initial fitness {best_fitness:.2}%");

    let bar = ProgressBar::new(opts.iterations as u64);
    let mut accepted = 0usize;
    let mut history = Vec::with_capacity(opts.iterations);
    for iteration in 0..opts.iterations {
        let candidate = mutate(&current, &mut rng);
        let score = fitness(examples, &candidate, opts.search_depth, opts.sample_size, &mut rng);
        if score > best_fitness {
            info!(
                "iteration {}: fitness improved {best_fitness:.2}% -> {score:.2}%",
                iteration + 1
            );
            current = candidate;
            best_fitness = score;
            accepted += 1;
        }
        history.push(best_fitness);
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!("optimization finished: best fitness {best_fitness:.2}%, {accepted} accepted");

    OptimizeOutcome { params: current, fitness: best_fitness, accepted, history }
}
