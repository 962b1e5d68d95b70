//! Evaluator parameter set: one 64-entry piece-square table per piece type.
//!
//! Material values are fixed constants and are not part of the persisted
//! file; only the tables are tuned and serialized. The on-disk format is a
//! JSON object mapping piece-type name to a 64-length integer array in
//! a1-first square order, from White's perspective.

use cozy_chess::Piece;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// All piece types, in the order used for table indexing.
pub const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Fixed material values in pawn units, indexed by [`piece_index`].
pub const MATERIAL: [f64; 6] = [1.0, 3.0, 3.0, 5.0, 9.0, 0.0];

pub fn piece_index(piece: Piece) -> usize {
    match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    }
}

pub fn piece_name(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "pawn",
        Piece::Knight => "knight",
        Piece::Bishop => "bishop",
        Piece::Rook => "rook",
        Piece::Queen => "queen",
        Piece::King => "king",
    }
}

fn piece_from_name(name: &str) -> Option<Piece> {
    PIECES.iter().copied().find(|&p| piece_name(p) == name)
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("unknown piece type '{0}' in parameter file")]
    UnknownPiece(String),
    #[error("missing piece-square table for '{0}'")]
    MissingPiece(&'static str),
    #[error("piece-square table for '{piece}' has {got} entries, expected 64")]
    BadTableLength { piece: String, got: usize },
    #[error("failed to read parameter file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameter file")]
    Parse(#[from] serde_json::Error),
}

/// Tunable evaluation parameters: a piece-square table per piece type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalParams {
    tables: [[i32; 64]; 6],
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            tables: [
                DEFAULT_PAWN,
                DEFAULT_KNIGHT,
                DEFAULT_BISHOP,
                DEFAULT_ROOK,
                DEFAULT_QUEEN,
                DEFAULT_KING,
            ],
        }
    }
}

impl EvalParams {
    pub fn table(&self, piece: Piece) -> &[i32; 64] {
        &self.tables[piece_index(piece)]
    }

    pub fn table_mut(&mut self, piece: Piece) -> &mut [i32; 64] {
        &mut self.tables[piece_index(piece)]
    }

    /// Add `delta` to a single table cell. The optimizer's only write hook.
    pub fn nudge(&mut self, piece: Piece, square: usize, delta: i32) {
        self.tables[piece_index(piece)][square] += delta;
    }

    /// Validate a name -> table mapping into a parameter set. Every piece
    /// type must be present with exactly 64 entries; anything else is a
    /// configuration error.
    pub fn from_map(map: BTreeMap<String, Vec<i32>>) -> Result<Self, ParamsError> {
        let mut tables = [[0i32; 64]; 6];
        let mut seen = [false; 6];
        for (name, values) in map {
            let piece = piece_from_name(&name).ok_or_else(|| ParamsError::UnknownPiece(name.clone()))?;
            if values.len() != 64 {
                return Err(ParamsError::BadTableLength { piece: name, got: values.len() });
            }
            let idx = piece_index(piece);
            tables[idx].copy_from_slice(&values);
            seen[idx] = true;
        }
        for &piece in &PIECES {
            if !seen[piece_index(piece)] {
                return Err(ParamsError::MissingPiece(piece_name(piece)));
            }
        }
        Ok(Self { tables })
    }

    pub fn to_map(&self) -> BTreeMap<String, Vec<i32>> {
        PIECES
            .iter()
            .map(|&p| (piece_name(p).to_string(), self.table(p).to_vec()))
            .collect()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let map: BTreeMap<String, Vec<i32>> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    pub fn to_json_string(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(&self.to_map())?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let f = BufReader::new(File::open(path)?);
        let map: BTreeMap<String, Vec<i32>> = serde_json::from_reader(f)?;
        Self::from_map(map)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ParamsError> {
        let f = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(f, &self.to_map())?;
        Ok(())
    }
}

// Default tables (classic simplified-evaluation values), a1-first order,
// one row per rank from rank 1 up to rank 8, White's perspective.

const DEFAULT_PAWN: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0,
    5, 10, 10, -20, -20, 10, 10, 5,
    5, -5, -10, 0, 0, -10, -5, 5,
    0, 0, 0, 20, 20, 0, 0, 0,
    5, 5, 10, 25, 25, 10, 5, 5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
    0, 0, 0, 0, 0, 0, 0, 0,
];

const DEFAULT_KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20, 0, 5, 5, 0, -20, -40,
    -30, 5, 10, 15, 15, 10, 5, -30,
    -30, 0, 15, 20, 20, 15, 0, -30,
    -30, 5, 15, 20, 20, 15, 5, -30,
    -30, 0, 10, 15, 15, 10, 0, -30,
    -40, -20, 0, 0, 0, 0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const DEFAULT_BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10, 5, 0, 0, 0, 0, 5, -10,
    -10, 10, 10, 10, 10, 10, 10, -10,
    -10, 0, 10, 10, 10, 10, 0, -10,
    -10, 5, 5, 10, 10, 5, 5, -10,
    -10, 0, 5, 10, 10, 5, 0, -10,
    -10, 0, 0, 0, 0, 0, 0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

const DEFAULT_ROOK: [i32; 64] = [
    0, 0, 0, 5, 5, 0, 0, 0,
    -5, 0, 0, 0, 0, 0, 0, -5,
    -5, 0, 0, 0, 0, 0, 0, -5,
    -5, 0, 0, 0, 0, 0, 0, -5,
    -5, 0, 0, 0, 0, 0, 0, -5,
    -5, 0, 0, 0, 0, 0, 0, -5,
    5, 10, 10, 10, 10, 10, 10, 5,
    0, 0, 0, 0, 0, 0, 0, 0,
];

const DEFAULT_QUEEN: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10, 0, 5, 0, 0, 0, 0, -10,
    -10, 5, 5, 5, 5, 5, 0, -10,
    0, 0, 5, 5, 5, 5, 0, -5,
    -5, 0, 5, 5, 5, 5, 0, -5,
    -10, 0, 5, 5, 5, 5, 0, -10,
    -10, 0, 0, 0, 0, 0, 0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

const DEFAULT_KING: [i32; 64] = [
    20, 30, 10, 0, 0, 10, 30, 20,
    20, 20, 0, 0, 0, 0, 20, 20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let params = EvalParams::default();
        let json = params.to_json_string().unwrap();
        let back = EvalParams::from_json_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn missing_piece_is_a_config_error() {
        let mut map = EvalParams::default().to_map();
        map.remove("queen");
        let err = EvalParams::from_map(map).unwrap_err();
        assert!(matches!(err, ParamsError::MissingPiece("queen")));
    }

    #[test]
    fn short_table_is_a_config_error() {
        let mut map = EvalParams::default().to_map();
        map.get_mut("rook").unwrap().pop();
        let err = EvalParams::from_map(map).unwrap_err();
        assert!(matches!(err, ParamsError::BadTableLength { got: 63, .. }));
    }

    #[test]
    fn unknown_piece_is_a_config_error() {
        let mut map = EvalParams::default().to_map();
        map.insert("archbishop".to_string(), vec![0; 64]);
        let err = EvalParams::from_map(map).unwrap_err();
        assert!(matches!(err, ParamsError::UnknownPiece(_)));
    }

    #[test]
    fn nudge_touches_one_cell() {
        let mut params = EvalParams::default();
        let before = *params.table(Piece::Knight);
        params.nudge(Piece::Knight, 27, 5);
        let after = *params.table(Piece::Knight);
        assert_eq!(after[27], before[27] + 5);
        let diffs = before.iter().zip(after.iter()).filter(|(a, b)| a != b).count();
        assert_eq!(diffs, 1);
    }
}
