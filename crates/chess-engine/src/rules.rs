//! Rules engine adapter.
//!
//! Legality (move generation, applying moves, terminal detection, FEN and UCI
//! notation) is delegated to [`shakmaty`]. This module is the only place the
//! engine talks to it directly, so the evaluator and search only see
//! [`Chess`] values and the small vocabulary defined here.
//!
//! Positions are immutable from the engine's point of view: [`play`] clones
//! the position and applies the move to the copy.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Position};

use crate::EngineError;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without capture or pawn move after which the game is drawn.
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Reason a position is a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// Insufficient material to checkmate.
    InsufficientMaterial,
    /// 75-move rule (150 half-moves) - automatic draw.
    SeventyFiveMoveRule,
}

/// Terminal state of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The game continues.
    Ongoing,
    /// The side to move has been checkmated.
    Checkmate {
        /// The side that was mated.
        loser: Color,
    },
    /// Drawn terminal state.
    Draw(DrawReason),
}

impl GameStatus {
    /// Returns true if no further moves should be searched.
    pub fn is_game_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Parses a FEN string into a validated position.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPosition`] if the string is not valid FEN or
/// describes an illegal setup (missing kings, side not to move in check, ...).
pub fn parse_fen(fen: &str) -> Result<Chess, EngineError> {
    let invalid = |reason: String| EngineError::InvalidPosition {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))
}

/// Serializes a position to FEN.
pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// Returns the side to move.
#[inline]
pub fn side_to_move(position: &Chess) -> Color {
    position.turn()
}

/// Generates all legal moves.
///
/// The enumeration order is the one search ties are broken by.
#[inline]
pub fn legal_moves(position: &Chess) -> MoveList {
    position.legal_moves()
}

/// Applies a move to a copy of the position.
///
/// # Errors
///
/// Returns [`EngineError::IllegalMove`] if the move is not legal.
pub fn play(position: &Chess, mv: &Move) -> Result<Chess, EngineError> {
    position
        .clone()
        .play(mv.clone())
        .map_err(|_| EngineError::IllegalMove {
            uci: move_to_uci(mv),
            fen: to_fen(position),
        })
}

/// Returns the draw reason that ends the game even though moves remain.
///
/// Stalemate is not reported here because it requires move generation;
/// see [`status`].
pub fn draw_reason(position: &Chess) -> Option<DrawReason> {
    if position.is_insufficient_material() {
        Some(DrawReason::InsufficientMaterial)
    } else if position.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES {
        Some(DrawReason::SeventyFiveMoveRule)
    } else {
        None
    }
}

/// Returns the terminal state of the position.
pub fn status(position: &Chess) -> GameStatus {
    if position.is_checkmate() {
        GameStatus::Checkmate {
            loser: position.turn(),
        }
    } else if position.is_stalemate() {
        GameStatus::Draw(DrawReason::Stalemate)
    } else if let Some(reason) = draw_reason(position) {
        GameStatus::Draw(reason)
    } else {
        GameStatus::Ongoing
    }
}

/// Parses a move in UCI notation (e.g. `e2e4`, `e7e8q`) against a position.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMove`] if the text is not UCI notation and
/// [`EngineError::IllegalMove`] if the move is not legal in the position.
pub fn parse_uci_move(position: &Chess, uci: &str) -> Result<Move, EngineError> {
    let parsed: UciMove = uci
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidMove(uci.to_string()))?;
    parsed
        .to_move(position)
        .map_err(|_| EngineError::IllegalMove {
            uci: uci.to_string(),
            fen: to_fen(position),
        })
}

/// Formats a move in UCI notation.
pub fn move_to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}
