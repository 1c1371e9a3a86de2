//! Game analysis with move quality classification.
//!
//! This module provides the [`GameAnalyzer`], which replays a finished game
//! ply by ply, searches each position the analyzed side moved from and grades
//! the played move against the engine's own best alternative.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_engine::{piece_value, rules, search, Chess, Color, EngineError, Move, MATE_SCORE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation::{GameAnalysisSummary, MoveEvaluation};
use crate::quality::{ClassificationThresholds, MoveFacts};

/// Search depth used for every analyzed position.
pub const DEFAULT_ANALYSIS_DEPTH: u32 = 4;

/// Material margin a capture has to give up to count as a sacrifice.
pub const SACRIFICE_MARGIN: i32 = 100;

/// Errors that can occur during game analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// Error from the engine, such as an unparseable position.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// The cancel flag was raised between plies.
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Configuration for game analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Plies searched from every position. Values below 1 are treated as 1.
    pub depth: u32,
    pub thresholds: ClassificationThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_ANALYSIS_DEPTH,
            thresholds: ClassificationThresholds::default(),
        }
    }
}

/// One ply of a game: the position before the move and the move played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlyInput {
    pub fen_before: String,
    /// The move in UCI notation (e.g., "e2e4").
    pub uci: String,
}

impl PlyInput {
    pub fn new(fen_before: impl Into<String>, uci: impl Into<String>) -> Self {
        Self {
            fen_before: fen_before.into(),
            uci: uci.into(),
        }
    }
}

/// A replayed move list, ready for analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    plies: Vec<PlyInput>,
}

impl GameRecord {
    /// Replays `moves` from `start_fen`, recording the position before each one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPosition`] if the start position does not
    /// parse, or [`EngineError::InvalidMove`] / [`EngineError::IllegalMove`] for
    /// the first move that cannot be played.
    pub fn from_uci_moves<I, S>(start_fen: &str, moves: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut position = rules::parse_fen(start_fen)?;
        let mut plies = Vec::new();

        for uci in moves {
            let uci = uci.as_ref();
            let mv = rules::parse_uci_move(&position, uci)?;
            plies.push(PlyInput::new(rules::to_fen(&position), uci));
            position = rules::play(&position, &mv)?;
        }

        Ok(Self { plies })
    }

    pub fn plies(&self) -> &[PlyInput] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }
}

impl From<Vec<PlyInput>> for GameRecord {
    fn from(plies: Vec<PlyInput>) -> Self {
        Self { plies }
    }
}

/// Progress notification sent after each graded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the ply just graded.
    pub current: usize,
    /// Number of plies in the game.
    pub total: usize,
}

/// Result of analyzing one side of a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    /// One entry per ply; `None` for plies that were not graded.
    pub evaluations: Vec<Option<MoveEvaluation>>,
    pub summary: GameAnalysisSummary,
}

/// Grades the moves of one side of a game.
///
/// Every call replays its own positions, so one analyzer can be shared across
/// threads and calls never interfere.
#[derive(Debug, Clone, Default)]
pub struct GameAnalyzer {
    config: AnalysisConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl GameAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Polls `flag` between plies and stops with [`AnalyzerError::Cancelled`]
    /// once it is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes the moves made by `color`.
    ///
    /// # Errors
    ///
    /// See [`GameAnalyzer::analyze_game_with_progress`].
    pub fn analyze_game(
        &self,
        plies: &[PlyInput],
        color: Color,
    ) -> Result<GameAnalysis, AnalyzerError> {
        self.analyze_game_with_progress(plies, color, |_| {})
    }

    /// Analyzes the moves made by `color`, reporting progress.
    ///
    /// For each ply moved by `color`:
    /// 1. Searches the position before the move for the best alternative.
    /// 2. Searches the position after the move from the opponent's side.
    /// 3. Derives the centipawn loss and gain from the mover's side.
    /// 4. Classifies the move and adds it to the summary.
    ///
    /// Plies moved by the other side, plies whose move is not legal and
    /// positions without legal moves yield `None`. `on_progress` is called
    /// once per graded move and never influences the analysis.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Engine`] if a `fen_before` does not parse and
    /// [`AnalyzerError::Cancelled`] if the cancel flag was raised.
    pub fn analyze_game_with_progress<F>(
        &self,
        plies: &[PlyInput],
        color: Color,
        mut on_progress: F,
    ) -> Result<GameAnalysis, AnalyzerError>
    where
        F: FnMut(Progress),
    {
        let total = plies.len();
        let mut evaluations = Vec::with_capacity(total);
        let mut summary = GameAnalysisSummary::default();

        for (index, ply) in plies.iter().enumerate() {
            if self.is_cancelled() {
                tracing::debug!(ply = index, "analysis cancelled");
                return Err(AnalyzerError::Cancelled);
            }

            let before = rules::parse_fen(&ply.fen_before)?;
            if rules::side_to_move(&before) != color {
                evaluations.push(None);
                continue;
            }

            let evaluation = self.evaluate_ply(&before, ply, color);
            if let Some(evaluation) = &evaluation {
                summary.record(evaluation);
                on_progress(Progress {
                    current: index + 1,
                    total,
                });
            }
            evaluations.push(evaluation);
        }

        tracing::info!(
            color = ?color,
            plies = total,
            player_moves = summary.player_moves,
            accuracy = summary.accuracy,
            blunders = summary.blunder,
            "game analysis finished"
        );

        Ok(GameAnalysis {
            evaluations,
            summary,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Grades a single move, or `None` if it cannot be graded.
    fn evaluate_ply(&self, before: &Chess, ply: &PlyInput, color: Color) -> Option<MoveEvaluation> {
        let depth = self.config.depth.max(1);

        let played = match rules::parse_uci_move(before, &ply.uci) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::warn!(fen = %ply.fen_before, uci = %ply.uci, error = %e, "skipping ply");
                return None;
            }
        };

        let Some(best) = search::best_move(before, depth) else {
            tracing::warn!(fen = %ply.fen_before, "no legal moves, skipping ply");
            return None;
        };

        let after = match rules::play(before, &played) {
            Ok(after) => after,
            Err(e) => {
                tracing::warn!(fen = %ply.fen_before, uci = %ply.uci, error = %e, "skipping ply");
                return None;
            }
        };

        let evaluation_before = best.value;
        let centipawns_after = search::search_value(&after, depth);

        // The after-search looks one ply past the root search, so the best
        // move is scored as lossless directly.
        let centipawn_loss = if played == best.best_move {
            0
        } else {
            mover_delta(best.value, centipawns_after, color)
        };
        let centipawn_gain = mover_delta(centipawns_after, evaluation_before, color);

        let facts = MoveFacts {
            cp_loss: centipawn_loss,
            is_only_legal_move: rules::legal_moves(before).len() == 1,
            is_sacrifice: is_sacrifice(&played),
            cp_gain: centipawn_gain,
        };
        let classification = self.config.thresholds.classify(&facts);

        tracing::debug!(
            uci = %ply.uci,
            best = %rules::move_to_uci(&best.best_move),
            before = evaluation_before,
            after = centipawns_after,
            loss = centipawn_loss,
            gain = centipawn_gain,
            %classification,
            "graded move"
        );

        Some(MoveEvaluation {
            played_move: ply.uci.clone(),
            centipawns_after,
            evaluation_before,
            best_alternative_move: rules::move_to_uci(&best.best_move),
            classification,
            centipawn_loss,
            centipawn_gain,
        })
    }
}

/// How far `higher` is above `lower` from `color`'s side, clamped to
/// `[0, MATE_SCORE]`.
fn mover_delta(higher: i32, lower: i32, color: Color) -> u32 {
    let delta = match color {
        Color::White => i64::from(higher) - i64::from(lower),
        Color::Black => i64::from(lower) - i64::from(higher),
    };
    delta.clamp(0, i64::from(MATE_SCORE)) as u32
}

/// Whether a move captures something worth clearly less than the capturing
/// piece.
///
/// Quiet moves are never sacrifices, even when they hang material.
pub fn is_sacrifice(mv: &Move) -> bool {
    match mv.capture() {
        Some(captured) => piece_value(mv.role()) > piece_value(captured) + SACRIFICE_MARGIN,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::rules::{parse_fen, parse_uci_move, STARTING_FEN};

    fn shallow() -> GameAnalyzer {
        GameAnalyzer::new(AnalysisConfig {
            depth: 2,
            ..AnalysisConfig::default()
        })
    }

    fn uci_move(fen: &str, uci: &str) -> Move {
        let position = parse_fen(fen).unwrap();
        parse_uci_move(&position, uci).unwrap()
    }

    #[test]
    fn default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.depth, 4);
        assert_eq!(config.thresholds, ClassificationThresholds::default());
    }

    #[test]
    fn sacrifice_requires_a_capture_of_lesser_value() {
        // Queen takes a defended pawn
        let fen = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1";
        assert!(is_sacrifice(&uci_move(fen, "d1d5")));

        // Rook takes undefended knight, still 80 over the margin
        let fen = "4k3/8/8/3n4/8/8/8/3RK3 w - - 0 1";
        assert!(is_sacrifice(&uci_move(fen, "d1d5")));

        // Knight takes bishop is not a sacrifice
        let fen = "4k3/8/8/8/8/2b5/8/1N5K w - - 0 1";
        assert!(!is_sacrifice(&uci_move(fen, "b1c3")));

        // Quiet moves never are
        assert!(!is_sacrifice(&uci_move(fen, "h1h2")));
    }

    #[test]
    fn mover_delta_is_signed_by_color_and_clamped() {
        assert_eq!(mover_delta(50, 20, Color::White), 30);
        assert_eq!(mover_delta(50, 20, Color::Black), 0);
        assert_eq!(mover_delta(-50, -20, Color::Black), 30);
        assert_eq!(mover_delta(MATE_SCORE, -MATE_SCORE, Color::White), 9999);
    }

    #[test]
    fn game_record_replays_moves() {
        let record = GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5"]).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.plies()[0].fen_before, STARTING_FEN);
        assert_eq!(
            record.plies()[1].fen_before,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(record.plies()[1].uci, "e7e5");
    }

    #[test]
    fn game_record_rejects_illegal_moves() {
        let result = GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e2e4"]);
        assert!(matches!(result, Err(EngineError::IllegalMove { .. })));

        let result = GameRecord::from_uci_moves(STARTING_FEN, ["zz"]);
        assert!(matches!(result, Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn opponent_plies_are_absent() {
        let record =
            GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5", "g1f3", "b8c6"]).unwrap();
        let analysis = shallow().analyze_game(record.plies(), Color::Black).unwrap();

        assert_eq!(analysis.evaluations.len(), 4);
        assert!(analysis.evaluations[0].is_none());
        assert!(analysis.evaluations[1].is_some());
        assert!(analysis.evaluations[2].is_none());
        assert!(analysis.evaluations[3].is_some());
        assert_eq!(analysis.summary.player_moves, 2);
    }

    #[test]
    fn illegal_move_is_skipped() {
        let plies = vec![
            PlyInput::new(STARTING_FEN, "e2e5"),
            PlyInput::new(STARTING_FEN, "d2d4"),
        ];
        let analysis = shallow().analyze_game(&plies, Color::White).unwrap();
        assert!(analysis.evaluations[0].is_none());
        assert!(analysis.evaluations[1].is_some());
        assert_eq!(analysis.summary.player_moves, 1);
    }

    #[test]
    fn unparseable_position_is_an_error() {
        let plies = vec![PlyInput::new("not a fen", "e2e4")];
        let result = shallow().analyze_game(&plies, Color::White);
        assert!(matches!(
            result,
            Err(AnalyzerError::Engine(EngineError::InvalidPosition { .. }))
        ));
    }

    #[test]
    fn progress_reports_graded_plies() {
        let record =
            GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5", "g1f3", "b8c6"]).unwrap();
        let mut seen = Vec::new();
        shallow()
            .analyze_game_with_progress(record.plies(), Color::White, |p| seen.push(p))
            .unwrap();
        assert_eq!(
            seen,
            vec![
                Progress {
                    current: 1,
                    total: 4
                },
                Progress {
                    current: 3,
                    total: 4
                },
            ]
        );
    }

    #[test]
    fn raised_flag_cancels() {
        let flag = Arc::new(AtomicBool::new(true));
        let analyzer = shallow().with_cancel_flag(Arc::clone(&flag));
        let plies = vec![PlyInput::new(STARTING_FEN, "e2e4")];
        assert_eq!(
            analyzer.analyze_game(&plies, Color::White),
            Err(AnalyzerError::Cancelled)
        );

        flag.store(false, Ordering::Relaxed);
        assert!(analyzer.analyze_game(&plies, Color::White).is_ok());
    }

    #[test]
    fn empty_game() {
        let analysis = shallow().analyze_game(&[], Color::White).unwrap();
        assert!(analysis.evaluations.is_empty());
        assert_eq!(analysis.summary.accuracy, 100.0);
    }
}
