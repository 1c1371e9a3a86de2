//! Integration tests for chess-analysis crate.
//!
//! These run the real search, so the slower ones stick to shallow depths.

use chess_analysis::{AnalysisConfig, GameAnalyzer, GameRecord, MoveClassification, PlyInput};
use chess_engine::rules::{self, STARTING_FEN};
use chess_engine::{search, Color};

fn analyzer_at_depth(depth: u32) -> GameAnalyzer {
    GameAnalyzer::new(AnalysisConfig {
        depth,
        ..AnalysisConfig::default()
    })
}

#[test]
fn test_opening_move_is_graded_well() {
    let analyzer = GameAnalyzer::new(AnalysisConfig::default());
    let plies = vec![PlyInput::new(STARTING_FEN, "e2e4")];

    let analysis = analyzer
        .analyze_game(&plies, Color::White)
        .expect("Failed to analyze game");

    assert_eq!(analysis.evaluations.len(), 1);
    let evaluation = analysis.evaluations[0]
        .as_ref()
        .expect("e2e4 should be graded");
    assert!(
        matches!(
            evaluation.classification,
            MoveClassification::Great | MoveClassification::Good
        ),
        "e2e4 should be great or good, got: {}",
        evaluation.classification
    );
    assert!(
        evaluation.centipawn_loss <= 30,
        "e2e4 should lose little, lost: {}",
        evaluation.centipawn_loss
    );
    assert_eq!(evaluation.played_move, "e2e4");
}

#[test]
fn test_only_legal_move_is_forced() {
    // The queen checks from g2 and only Kxg2 gets out of it
    let fen = "k7/8/8/8/8/8/6q1/7K w - - 0 1";
    let position = rules::parse_fen(fen).expect("Failed to parse FEN");
    assert_eq!(rules::legal_moves(&position).len(), 1);

    let analysis = GameAnalyzer::new(AnalysisConfig::default())
        .analyze_game(&[PlyInput::new(fen, "h1g2")], Color::White)
        .expect("Failed to analyze game");

    let evaluation = analysis.evaluations[0]
        .as_ref()
        .expect("forced move should be graded");
    assert_eq!(evaluation.classification, MoveClassification::Forced);

    let summary = &analysis.summary;
    assert_eq!(summary.brilliant, 0);
    assert_eq!(summary.great, 0);
    assert_eq!(summary.good, 0);
    assert_eq!(summary.inaccuracy, 0);
    assert_eq!(summary.mistake, 0);
    assert_eq!(summary.blunder, 0);
    assert_eq!(summary.player_moves, 1);
}

#[test]
fn test_allowing_mate_in_one_is_a_blunder() {
    // 1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6?? 4. Qxf7#
    let record = GameRecord::from_uci_moves(
        STARTING_FEN,
        ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"],
    )
    .expect("Failed to replay game");

    let analysis = analyzer_at_depth(2)
        .analyze_game(record.plies(), Color::Black)
        .expect("Failed to analyze game");

    let last = analysis.evaluations[5]
        .as_ref()
        .expect("Nf6 should be graded");
    assert_eq!(last.classification, MoveClassification::Blunder);
    assert!(last.centipawn_loss > 200);
    assert_ne!(last.best_alternative_move, "g8f6");
    assert!(analysis.summary.blunder >= 1);
    assert!(analysis.summary.accuracy < 100.0);
}

#[test]
fn test_engine_moves_score_full_accuracy() {
    let depth = 2;
    let mut position = rules::parse_fen(STARTING_FEN).expect("Failed to parse FEN");
    let mut moves = Vec::new();
    for _ in 0..6 {
        let best = search::best_move(&position, depth).expect("Game should not be over");
        moves.push(rules::move_to_uci(&best.best_move));
        position = rules::play(&position, &best.best_move).expect("Best move should be legal");
    }

    let record = GameRecord::from_uci_moves(STARTING_FEN, &moves).expect("Failed to replay game");
    let analysis = analyzer_at_depth(depth)
        .analyze_game(record.plies(), Color::White)
        .expect("Failed to analyze game");

    for evaluation in analysis.evaluations.iter().flatten() {
        assert_eq!(evaluation.centipawn_loss, 0);
        assert_eq!(evaluation.played_move, evaluation.best_alternative_move);
    }
    assert_eq!(analysis.summary.player_moves, 3);
    assert_eq!(analysis.summary.accuracy, 100.0);
}

#[test]
fn test_black_side_analysis() {
    let record = GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5", "g1f3", "d8h4"])
        .expect("Failed to replay game");

    let analysis = analyzer_at_depth(2)
        .analyze_game(record.plies(), Color::Black)
        .expect("Failed to analyze game");

    assert_eq!(analysis.evaluations.len(), 4);
    assert!(analysis.evaluations[0].is_none());
    assert!(analysis.evaluations[2].is_none());
    assert_eq!(analysis.summary.player_moves, 2);
    assert!((0.0..=100.0).contains(&analysis.summary.accuracy));
}

#[test]
fn test_analysis_serializes_to_json() {
    let record =
        GameRecord::from_uci_moves(STARTING_FEN, ["e2e4", "e7e5"]).expect("Failed to replay game");
    let analysis = analyzer_at_depth(1)
        .analyze_game(record.plies(), Color::White)
        .expect("Failed to analyze game");

    let json = serde_json::to_value(&analysis).expect("Failed to serialize analysis");
    assert!(json["evaluations"][1].is_null());
    assert_eq!(json["evaluations"][0]["played_move"], "e2e4");
    assert!(json["summary"]["accuracy"].is_number());
}
