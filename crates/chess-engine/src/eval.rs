//! Static position evaluation.
//!
//! Scores are in centipawns from White's point of view: positive values favor
//! White, negative values favor Black. The score is material plus a bonus from
//! a piece-square table for every occupied square.

use serde::Serialize;
use shakmaty::{Chess, Color, Piece, Position, Role, Square};

use crate::rules::{self, GameStatus};

/// Finite score standing in for a forced mate (positive = White mates).
///
/// Every score the engine produces lies in `-MATE_SCORE..=MATE_SCORE`.
pub const MATE_SCORE: i32 = 9_999;

/// Piece values in centipawns
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
/// Keeps the sum well-defined; kings are never traded so it always cancels.
pub const KING_VALUE: i32 = 20_000;

/// Piece-square tables, from White's perspective.
///
/// Index 0 is a8 and index 63 is h1, so each table reads like a diagram with
/// White at the bottom. Black pieces use the vertically mirrored square.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

/// Material totals per side, kings excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MaterialBalance {
    pub white: i32,
    pub black: i32,
}

impl MaterialBalance {
    /// White's material minus Black's.
    pub fn difference(&self) -> i32 {
        self.white - self.black
    }
}

/// Returns the material value of a piece type in centipawns.
#[inline]
pub const fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

fn piece_square_table(role: Role) -> &'static [i32; 64] {
    match role {
        Role::Pawn => &PAWN_PST,
        Role::Knight => &KNIGHT_PST,
        Role::Bishop => &BISHOP_PST,
        Role::Rook => &ROOK_PST,
        Role::Queen => &QUEEN_PST,
        Role::King => &KING_PST,
    }
}

/// Table index for a piece on `square`.
///
/// Shakmaty numbers squares from a1 = 0, the tables from a8 = 0, so a White
/// piece uses the flipped square and a Black piece (already mirrored) does not.
#[inline]
fn table_index(square: Square, color: Color) -> usize {
    match color {
        Color::White => square.flip_vertical() as usize,
        Color::Black => square as usize,
    }
}

/// Material plus positional bonus for one piece, always positive.
#[inline]
fn piece_score(piece: Piece, square: Square) -> i32 {
    piece_value(piece.role) + piece_square_table(piece.role)[table_index(square, piece.color)]
}

/// Evaluates a position in centipawns, White-positive.
///
/// Checkmate scores [`MATE_SCORE`] for the side that is *not* to move;
/// stalemate and other drawn terminal states score 0.
pub fn evaluate(position: &Chess) -> i32 {
    match rules::status(position) {
        GameStatus::Checkmate { loser } => mate_score_against(loser),
        GameStatus::Draw(_) => 0,
        GameStatus::Ongoing => static_score(position),
    }
}

/// Score of a position where `loser` has been mated.
#[inline]
pub const fn mate_score_against(loser: Color) -> i32 {
    match loser {
        Color::White => -MATE_SCORE,
        Color::Black => MATE_SCORE,
    }
}

/// Material and piece-square sum, ignoring terminal states.
///
/// Clamped one short of [`MATE_SCORE`] so material never reads as mate.
pub fn static_score(position: &Chess) -> i32 {
    let board = position.board();
    let mut score = 0i32;

    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = piece_score(piece, square);
            match piece.color {
                Color::White => score += value,
                Color::Black => score -= value,
            }
        }
    }

    score.clamp(-(MATE_SCORE - 1), MATE_SCORE - 1)
}

/// Sums non-king material for each side.
pub fn material_balance(position: &Chess) -> MaterialBalance {
    let board = position.board();
    let mut balance = MaterialBalance::default();

    for square in board.occupied() {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        if piece.role == Role::King {
            continue;
        }
        match piece.color {
            Color::White => balance.white += piece_value(piece.role),
            Color::Black => balance.black += piece_value(piece.role),
        }
    }

    balance
}
