//! Move search and position evaluation for the chess coach.
//!
//! This crate provides:
//! - [`rules`] - adapter over the [`shakmaty`] rules engine (FEN, UCI, legality)
//! - [`evaluate`] - static evaluation: material plus piece-square tables
//! - [`best_move`] / [`search`] - fixed-depth minimax with alpha-beta pruning
//! - [`select_opponent_move`] - opponent move selection for a [`DifficultyProfile`]
//!
//! # Scores
//!
//! All scores are centipawns from White's point of view. A forced mate is the
//! finite sentinel [`MATE_SCORE`] (negated when Black mates), so scores can be
//! subtracted without overflow.
//!
//! # Example
//!
//! ```
//! use chess_engine::{best_move, evaluate, rules};
//!
//! let position = rules::parse_fen(rules::STARTING_FEN).unwrap();
//! assert_eq!(evaluate(&position), 0);
//!
//! let result = best_move(&position, 2).unwrap();
//! println!("best: {} ({})", rules::move_to_uci(&result.best_move), result.value);
//! ```

mod error;
pub mod eval;
pub mod opponent;
pub mod rules;
pub mod search;

pub use error::EngineError;
pub use eval::{evaluate, material_balance, piece_value, MaterialBalance, MATE_SCORE};
pub use opponent::{
    choose_move, select_opponent_move, Difficulty, DifficultyProfile, MoveChoice, MoveSource,
};
pub use rules::{DrawReason, GameStatus};
pub use search::{best_move, search, search_value, SearchResult, Searcher, SCORE_INFINITY};

pub use shakmaty::{Chess, Color, Move, Role};
