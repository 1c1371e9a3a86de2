//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! The search works on immutable positions: every child is a fresh copy
//! produced by [`rules::play`], so a search never shares mutable board state
//! with another call. There is no clock inside the recursion; a search runs to
//! completion at the requested depth.
//!
//! Scores are White-positive, so White is always the maximizing side.

use shakmaty::{Chess, Color, Move};

use crate::eval::evaluate;
use crate::rules;

/// Initial search window bound. Never returned as a value, since every
/// backed-up value comes from [`evaluate`].
pub const SCORE_INFINITY: i32 = i32::MAX;

/// Outcome of a root search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The chosen move (first in enumeration order among equal values).
    pub best_move: Move,
    /// Backed-up value of the chosen move, White-positive.
    pub value: i32,
    /// Number of nodes visited.
    pub nodes: u64,
}

/// Search state for a single top-level call.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited since this searcher was created.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Value search.
    ///
    /// Returns the static evaluation at `depth == 0` or at a terminal position.
    /// Otherwise the maximizing side keeps the largest child value and raises
    /// `alpha`, the minimizing side keeps the smallest and lowers `beta`, and
    /// the remaining siblings are skipped once `beta <= alpha`.
    pub fn search(
        &mut self,
        position: &Chess,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(position);
        }

        let moves = rules::legal_moves(position);
        if moves.is_empty() || rules::draw_reason(position).is_some() {
            return evaluate(position);
        }

        if maximizing {
            let mut value = -SCORE_INFINITY;
            for mv in &moves {
                let Ok(child) = rules::play(position, mv) else {
                    continue;
                };
                value = value.max(self.search(&child, depth - 1, alpha, beta, false));
                alpha = alpha.max(value);
                if beta <= alpha {
                    break;
                }
            }
            value
        } else {
            let mut value = SCORE_INFINITY;
            for mv in &moves {
                let Ok(child) = rules::play(position, mv) else {
                    continue;
                };
                value = value.min(self.search(&child, depth - 1, alpha, beta, true));
                beta = beta.min(value);
                if beta <= alpha {
                    break;
                }
            }
            value
        }
    }

    /// Root search returning the chosen move and its backed-up value.
    ///
    /// Returns `None` if the side to move has no legal moves. A depth of 0 is
    /// searched as depth 1, since a root search must look at least one move
    /// ahead to compare moves.
    pub fn best_move(&mut self, position: &Chess, depth: u32) -> Option<(Move, i32)> {
        let depth = depth.max(1);
        let maximizing = rules::side_to_move(position) == Color::White;
        let moves = rules::legal_moves(position);

        let mut alpha = -SCORE_INFINITY;
        let mut beta = SCORE_INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for mv in &moves {
            let Ok(child) = rules::play(position, mv) else {
                continue;
            };
            let value = self.search(&child, depth - 1, alpha, beta, !maximizing);

            // Strict comparison keeps the first-seen move on ties.
            let improves = match best {
                None => true,
                Some((_, best_value)) if maximizing => value > best_value,
                Some((_, best_value)) => value < best_value,
            };
            if improves {
                best = Some((mv.clone(), value));
            }

            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
        }

        best
    }
}

/// Value search with a fresh [`Searcher`].
pub fn search(position: &Chess, depth: u32, alpha: i32, beta: i32, maximizing: bool) -> i32 {
    Searcher::new().search(position, depth, alpha, beta, maximizing)
}

/// Full-window value of a position, searched from its side to move.
pub fn search_value(position: &Chess, depth: u32) -> i32 {
    let maximizing = rules::side_to_move(position) == Color::White;
    search(position, depth, -SCORE_INFINITY, SCORE_INFINITY, maximizing)
}

/// Root search with a fresh [`Searcher`].
pub fn best_move(position: &Chess, depth: u32) -> Option<SearchResult> {
    let mut searcher = Searcher::new();
    let (best_move, value) = searcher.best_move(position, depth)?;

    tracing::debug!(
        depth,
        value,
        nodes = searcher.nodes(),
        best_move = %rules::move_to_uci(&best_move),
        "search finished"
    );

    Some(SearchResult {
        best_move,
        value,
        nodes: searcher.nodes(),
    })
}
