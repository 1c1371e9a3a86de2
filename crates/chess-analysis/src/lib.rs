//! Retrospective game analysis for the chess coach.
//!
//! This crate grades every move one side made in a finished game by comparing
//! it to the engine's own best alternative from `chess-engine`.
//!
//! # Overview
//!
//! - [`MoveClassification`] - Quality tag for a move (Brilliant, Great, Good, etc.)
//! - [`classify`] - The classification decision table
//! - [`MoveEvaluation`] / [`GameAnalysisSummary`] - Per-move and per-game results
//! - [`GameAnalyzer`] - Analyzes complete games with move quality classification
//!
//! # Example
//!
//! ```no_run
//! use chess_analysis::{AnalysisConfig, GameAnalyzer, GameRecord};
//! use chess_engine::{rules::STARTING_FEN, Color};
//!
//! let record = GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5", "g1f3"]).unwrap();
//! let analyzer = GameAnalyzer::new(AnalysisConfig::default());
//! let analysis = analyzer.analyze_game(record.plies(), Color::White).unwrap();
//! println!("White accuracy: {:.1}%", analysis.summary.accuracy);
//! ```

pub mod analyzer;
pub mod evaluation;
pub mod quality;

pub use analyzer::{
    is_sacrifice, AnalysisConfig, AnalyzerError, GameAnalysis, GameAnalyzer, GameRecord, PlyInput,
    Progress, DEFAULT_ANALYSIS_DEPTH,
};
pub use evaluation::{accuracy, GameAnalysisSummary, MoveEvaluation};
pub use quality::{classify, ClassificationThresholds, MoveClassification, MoveFacts};
