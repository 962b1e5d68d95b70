//! Streaming PGN corpus reader.
//!
//! Games are consumed one at a time; tag pairs, brace comments (which may
//! span lines), parenthesised variations (which may nest), numeric
//! annotation glyphs, and move numbers are skipped. A game ends at a
//! result token, at the tag section of the next game, or at end of input.
//! Callers skip games that fail to replay; a bad game is never fatal.

mod san;
pub use san::{is_capture, resolve_move_text, san_for_move};

use cozy_chess::{Board, Move};
use log::warn;
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PgnError {
    #[error("move '{text}' at ply {ply} does not resolve to a legal move")]
    UnresolvedMove { ply: usize, text: String },
}

/// One game's movetext tokens, in play order.
#[derive(Debug, Clone, Default)]
pub struct PgnGame {
    pub moves: Vec<String>,
}

pub struct PgnReader<R> {
    reader: R,
    pending: Option<String>,
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: None }
    }

    fn next_line(&mut self) -> Option<String> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end().to_string()),
            Err(e) => {
                warn!("corpus read error, treating as end of input: {e}");
                None
            }
        }
    }

    /// The next game's movetext, or `None` once the corpus is exhausted.
    pub fn next_game(&mut self) -> Option<PgnGame> {
        let mut game = PgnGame::default();
        let mut brace_depth = 0usize;
        let mut paren_depth = 0usize;
        while let Some(line) = self.next_line() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && brace_depth == 0 && paren_depth == 0 {
                if !game.moves.is_empty() {
                    // Tag section of the following game.
                    self.pending = Some(line);
                    return Some(game);
                }
                continue;
            }
            if scan_movetext(trimmed, &mut game, &mut brace_depth, &mut paren_depth) {
                return Some(game);
            }
        }
        if game.moves.is_empty() { None } else { Some(game) }
    }
}

/// Tokenize one movetext line into `game`. Returns true when a result
/// token closes the game.
fn scan_movetext(
    line: &str,
    game: &mut PgnGame,
    brace_depth: &mut usize,
    paren_depth: &mut usize,
) -> bool {
    let mut token = String::new();
    // A trailing space flushes the final token.
    for c in line.chars().chain(std::iter::once(' ')) {
        if *brace_depth > 0 {
            if c == '}' {
                *brace_depth -= 1;
            }
            continue;
        }
        match c {
            '{' => {
                if push_token(&mut token, game) {
                    return true;
                }
                *brace_depth += 1;
            }
            '(' => {
                if push_token(&mut token, game) {
                    return true;
                }
                *paren_depth += 1;
            }
            ')' => {
                *paren_depth = paren_depth.saturating_sub(1);
            }
            ';' => {
                // Comment to end of line.
                return push_token(&mut token, game);
            }
            // '.' delimits glued move numbers like "12.Nf3".
            c if c.is_whitespace() || c == '.' => {
                if push_token(&mut token, game) {
                    return true;
                }
            }
            c => {
                if *paren_depth == 0 {
                    token.push(c);
                }
            }
        }
    }
    false
}

/// Classify and store a finished token. Returns true for a result token.
fn push_token(token: &mut String, game: &mut PgnGame) -> bool {
    if token.is_empty() {
        return false;
    }
    let t = std::mem::take(token);
    match t.as_str() {
        "1-0" | "0-1" | "1/2-1/2" | "*" => return true,
        _ => {}
    }
    if t.starts_with('$') || t.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    // Annotation marks carry no move information.
    let t = t.trim_end_matches(['!', '?']);
    if !t.is_empty() {
        game.moves.push(t.to_string());
    }
    false
}

/// Replay the first `max_plies` half-moves of a game from the initial
/// position, yielding each position *before* the move together with the
/// move played in it.
pub fn replay_prefix(game: &PgnGame, max_plies: usize) -> Result<Vec<(Board, Move)>, PgnError> {
    let mut board = Board::default();
    let mut out = Vec::new();
    for (ply, text) in game.moves.iter().take(max_plies).enumerate() {
        let mv = resolve_move_text(&board, text)
            .ok_or_else(|| PgnError::UnresolvedMove { ply, text: text.clone() })?;
        out.push((board.clone(), mv));
        board.play(mv);
    }
    Ok(out)
}
