//! Statistical opening book: built offline from a PGN corpus, consulted
//! online with a seeded weighted draw.
//!
//! Keys are full FEN fingerprints as produced by replaying games from the
//! initial position, so build and consult agree byte-for-byte. A
//! fingerprint is kept only when it was observed more than once across
//! the corpus; single observations are statistically insignificant and
//! are dropped.

use cozy_chess::{Board, Move};
use indicatif::ProgressBar;
use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::pgn::{replay_prefix, PgnReader};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("failed to read book file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse book file")]
    Parse(#[from] serde_json::Error),
}

/// One candidate move for a booked position.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMove {
    pub uci: String,
    pub probability: f64,
}

/// On-disk shape: fingerprint -> [[uci, probability], ...].
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct BookFile(BTreeMap<String, Vec<(String, f64)>>);

#[derive(Debug, Clone, Copy)]
pub struct BookBuildParams {
    pub max_games: usize,
    pub ply_depth: usize,
}

impl Default for BookBuildParams {
    fn default() -> Self {
        Self { max_games: 6000, ply_depth: 20 }
    }
}

/// Build statistics reported alongside the book.
#[derive(Debug, Default, Clone, Copy)]
pub struct BookBuildStats {
    pub games_read: usize,
    pub games_skipped: usize,
}

#[derive(Debug, Default, Clone)]
pub struct OpeningBook {
    entries: HashMap<String, Vec<WeightedMove>>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: HashMap<String, Vec<WeightedMove>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, fingerprint: &str) -> Option<&[WeightedMove]> {
        self.entries.get(fingerprint).map(Vec::as_slice)
    }

    pub fn fingerprints(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Replay up to `max_games` games to `ply_depth` half-moves each,
    /// counting (fingerprint, move) observations, then keep the
    /// fingerprints seen more than once and normalize counts to
    /// probabilities. Games that fail to replay are skipped.
    pub fn build<R: BufRead>(reader: R, params: &BookBuildParams) -> (Self, BookBuildStats) {
        let mut counts: HashMap<String, BTreeMap<String, u32>> = HashMap::new();
        let mut stats = BookBuildStats::default();
        let mut pgn = PgnReader::new(reader);
        let bar = ProgressBar::new(params.max_games as u64);
        while stats.games_read < params.max_games {
            let Some(game) = pgn.next_game() else { break };
            stats.games_read += 1;
            bar.inc(1);
            let prefix = match replay_prefix(&game, params.ply_depth) {
                Ok(prefix) => prefix,
                Err(e) => {
                    debug!("skipping malformed game {}: {e}", stats.games_read);
                    stats.games_skipped += 1;
                    continue;
                }
            };
            for (board, mv) in prefix {
                *counts
                    .entry(format!("{}", board))
                    .or_default()
                    .entry(format!("{}", mv))
                    .or_default() += 1;
            }
        }
        bar.finish_and_clear();

        let mut entries = HashMap::new();
        for (fingerprint, moves) in counts {
            let total: u32 = moves.values().sum();
            if total > 1 {
                let weighted = moves
                    .into_iter()
                    .map(|(uci, count)| WeightedMove {
                        uci,
                        probability: count as f64 / total as f64,
                    })
                    .collect();
                entries.insert(fingerprint, weighted);
            }
        }
        (Self { entries }, stats)
    }

    /// Weighted random draw for the current position, or `None` when the
    /// fingerprint is not booked. The draw is the only randomness in move
    /// selection and is driven entirely by the caller's seeded rng.
    ///
    /// Panics if the drawn text does not match a legal move: book entries
    /// come from replayed games, so a mismatch means the book file does
    /// not belong to this position and continuing would be unsound.
    pub fn pick_move(&self, board: &Board, rng: &mut SmallRng) -> Option<Move> {
        let entry = self.entries.get(&format!("{}", board))?;
        let last = entry.last()?;
        let roll: f64 = rng.gen();
        let mut cdf = 0.0;
        let mut drawn = &last.uci;
        for wm in entry {
            cdf += wm.probability;
            if roll <= cdf {
                drawn = &wm.uci;
                break;
            }
        }
        let mut found = None;
        board.generate_moves(|ml| {
            for m in ml {
                if format!("{}", m) == *drawn {
                    found = Some(m);
                    break;
                }
            }
            found.is_some()
        });
        match found {
            Some(m) => Some(m),
            None => panic!("book move {drawn} is not legal in position {board}"),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BookError> {
        let f = BufReader::new(File::open(path)?);
        let BookFile(map) = serde_json::from_reader(f)?;
        let entries = map
            .into_iter()
            .map(|(fingerprint, moves)| {
                let weighted = moves
                    .into_iter()
                    .map(|(uci, probability)| WeightedMove { uci, probability })
                    .collect();
                (fingerprint, weighted)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BookError> {
        let map = self
            .entries
            .iter()
            .map(|(fingerprint, moves)| {
                let pairs = moves
                    .iter()
                    .map(|wm| (wm.uci.clone(), wm.probability))
                    .collect();
                (fingerprint.clone(), pairs)
            })
            .collect();
        let f = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(f, &BookFile(map))?;
        Ok(())
    }
}
