//! Move quality classification.
//!
//! Classification is a decision table: an ordered list of rules, each pairing
//! a predicate over [`MoveFacts`] with a label. The first rule that matches
//! wins and [`MoveClassification::Blunder`] is the fallback. The numbers the
//! rules compare against live in [`ClassificationThresholds`], so tuning them
//! never touches control flow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of move quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveClassification {
    /// The only legal move in the position
    Forced,
    /// Opening database move. Reserved: the analyzer never assigns it.
    Book,
    /// A winning sacrifice that lost nothing
    Brilliant,
    /// Within 10 centipawns of the best move
    Great,
    /// Within 30 centipawns of the best move
    Good,
    /// Within 80 centipawns of the best move
    Inaccuracy,
    /// Within 200 centipawns of the best move
    Mistake,
    /// More than 200 centipawns worse than the best move
    Blunder,
}

impl MoveClassification {
    pub const ALL: [MoveClassification; 8] = [
        MoveClassification::Forced,
        MoveClassification::Book,
        MoveClassification::Brilliant,
        MoveClassification::Great,
        MoveClassification::Good,
        MoveClassification::Inaccuracy,
        MoveClassification::Mistake,
        MoveClassification::Blunder,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MoveClassification::Forced => "forced",
            MoveClassification::Book => "book",
            MoveClassification::Brilliant => "brilliant",
            MoveClassification::Great => "great",
            MoveClassification::Good => "good",
            MoveClassification::Inaccuracy => "inaccuracy",
            MoveClassification::Mistake => "mistake",
            MoveClassification::Blunder => "blunder",
        }
    }

    /// Whether this classification contributes to the summary counters.
    ///
    /// Forced and book moves say nothing about the player's skill.
    pub const fn is_counted(self) -> bool {
        !matches!(self, MoveClassification::Forced | MoveClassification::Book)
    }
}

impl fmt::Display for MoveClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier looks at for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveFacts {
    /// How much worse the move was than the engine's best, from the mover's side.
    pub cp_loss: u32,
    /// The mover had exactly one legal move.
    pub is_only_legal_move: bool,
    /// The move gave up material in a capture (see the analyzer).
    pub is_sacrifice: bool,
    /// How much the mover's evaluation improved over the position before.
    pub cp_gain: u32,
}

/// Numeric boundaries used by the classification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// Minimum gain for a sacrifice to count as brilliant.
    pub brilliant_min_gain: u32,
    /// Maximum loss for brilliant and great moves.
    pub great_max_loss: u32,
    pub good_max_loss: u32,
    pub inaccuracy_max_loss: u32,
    pub mistake_max_loss: u32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            brilliant_min_gain: 50,
            great_max_loss: 10,
            good_max_loss: 30,
            inaccuracy_max_loss: 80,
            mistake_max_loss: 200,
        }
    }
}

type Predicate = fn(&MoveFacts, &ClassificationThresholds) -> bool;

/// One row of the decision table.
struct Rule {
    label: MoveClassification,
    applies: Predicate,
}

fn only_legal_move(facts: &MoveFacts, _: &ClassificationThresholds) -> bool {
    facts.is_only_legal_move
}

fn winning_sacrifice(facts: &MoveFacts, t: &ClassificationThresholds) -> bool {
    facts.is_sacrifice && facts.cp_gain >= t.brilliant_min_gain && facts.cp_loss <= t.great_max_loss
}

fn within_great(facts: &MoveFacts, t: &ClassificationThresholds) -> bool {
    facts.cp_loss <= t.great_max_loss
}

fn within_good(facts: &MoveFacts, t: &ClassificationThresholds) -> bool {
    facts.cp_loss <= t.good_max_loss
}

fn within_inaccuracy(facts: &MoveFacts, t: &ClassificationThresholds) -> bool {
    facts.cp_loss <= t.inaccuracy_max_loss
}

fn within_mistake(facts: &MoveFacts, t: &ClassificationThresholds) -> bool {
    facts.cp_loss <= t.mistake_max_loss
}

/// Rules in priority order.
const RULES: [Rule; 6] = [
    Rule {
        label: MoveClassification::Forced,
        applies: only_legal_move,
    },
    Rule {
        label: MoveClassification::Brilliant,
        applies: winning_sacrifice,
    },
    Rule {
        label: MoveClassification::Great,
        applies: within_great,
    },
    Rule {
        label: MoveClassification::Good,
        applies: within_good,
    },
    Rule {
        label: MoveClassification::Inaccuracy,
        applies: within_inaccuracy,
    },
    Rule {
        label: MoveClassification::Mistake,
        applies: within_mistake,
    },
];

impl ClassificationThresholds {
    /// Classifies a move; the first matching rule wins.
    pub fn classify(&self, facts: &MoveFacts) -> MoveClassification {
        RULES
            .iter()
            .find(|rule| (rule.applies)(facts, self))
            .map_or(MoveClassification::Blunder, |rule| rule.label)
    }
}

/// Classifies a move with the default thresholds.
pub fn classify(
    cp_loss: u32,
    is_only_legal_move: bool,
    is_sacrifice: bool,
    cp_gain: u32,
) -> MoveClassification {
    ClassificationThresholds::default().classify(&MoveFacts {
        cp_loss,
        is_only_legal_move,
        is_sacrifice,
        cp_gain,
    })
}
