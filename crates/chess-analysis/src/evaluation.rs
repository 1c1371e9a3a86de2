//! Per-move evaluations and the game summary they roll up into.

use serde::Serialize;

use crate::quality::MoveClassification;

/// Centipawn loss that maps to 0% accuracy when averaged over every move.
pub const ACCURACY_LOSS_SCALE: f64 = 50.0;

/// Evaluation of one move made by the analyzed side.
///
/// All scores are centipawns, White-positive; losses and gains are from the
/// mover's point of view and never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEvaluation {
    /// The move that was played, in UCI notation.
    pub played_move: String,
    /// Search value of the position after the move.
    pub centipawns_after: i32,
    /// Search value of the position before the move.
    pub evaluation_before: i32,
    /// The engine's preferred move in the position before, in UCI notation.
    pub best_alternative_move: String,
    pub classification: MoveClassification,
    pub centipawn_loss: u32,
    pub centipawn_gain: u32,
}

/// Aggregate counters for one analyzed game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysisSummary {
    pub brilliant: u32,
    pub great: u32,
    pub good: u32,
    pub inaccuracy: u32,
    pub mistake: u32,
    pub blunder: u32,
    /// Percentage in `[0, 100]` with one decimal place.
    pub accuracy: f64,
    /// Moves that received an evaluation, forced moves included.
    pub player_moves: u32,
    pub total_centipawn_loss: u64,
    pub average_centipawn_loss: f64,
}

impl Default for GameAnalysisSummary {
    fn default() -> Self {
        Self {
            brilliant: 0,
            great: 0,
            good: 0,
            inaccuracy: 0,
            mistake: 0,
            blunder: 0,
            accuracy: 100.0,
            player_moves: 0,
            total_centipawn_loss: 0,
            average_centipawn_loss: 0.0,
        }
    }
}

impl GameAnalysisSummary {
    /// Adds one evaluated move to the counters and refreshes the derived
    /// figures.
    ///
    /// Forced and book moves count toward `player_moves` and the loss total but
    /// not toward any classification counter.
    pub fn record(&mut self, evaluation: &MoveEvaluation) {
        match evaluation.classification {
            MoveClassification::Brilliant => self.brilliant += 1,
            MoveClassification::Great => self.great += 1,
            MoveClassification::Good => self.good += 1,
            MoveClassification::Inaccuracy => self.inaccuracy += 1,
            MoveClassification::Mistake => self.mistake += 1,
            MoveClassification::Blunder => self.blunder += 1,
            MoveClassification::Forced | MoveClassification::Book => {}
        }

        self.player_moves += 1;
        self.total_centipawn_loss += u64::from(evaluation.centipawn_loss);
        self.accuracy = accuracy(self.total_centipawn_loss, self.player_moves);
        self.average_centipawn_loss =
            self.total_centipawn_loss as f64 / f64::from(self.player_moves);
    }

    /// Sum of the six classification counters.
    pub fn counted_moves(&self) -> u32 {
        self.brilliant + self.great + self.good + self.inaccuracy + self.mistake + self.blunder
    }
}

/// Accuracy percentage for a total centipawn loss spread over `moves`.
///
/// `100 * (1 - total / (moves * 50))`, clamped to `[0, 100]` and rounded to
/// one decimal place. With no moves the accuracy is 100.
pub fn accuracy(total_centipawn_loss: u64, moves: u32) -> f64 {
    if moves == 0 {
        return 100.0;
    }
    let ratio = total_centipawn_loss as f64 / (f64::from(moves) * ACCURACY_LOSS_SCALE);
    let raw = (100.0 * (1.0 - ratio)).clamp(0.0, 100.0);
    (raw * 10.0).round() / 10.0
}
