//! Opponent move selection at a configurable strength.
//!
//! A [`DifficultyProfile`] fixes the search depth, a minimum "think time" and
//! the probability of playing a uniformly random legal move instead of
//! searching. The random branch is deliberate weakness for the beginner
//! profile.
//!
//! [`choose_move`] is the synchronous core and takes its random source as a
//! parameter. [`select_opponent_move`] is the caller-facing operation: it runs
//! the search on the blocking pool and then waits out the rest of the think
//! time without holding a runtime worker.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};
use tokio::time::Instant;

use crate::{rules, search, EngineError};

/// Strength settings for the synthetic opponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Plies searched by [`search::best_move`].
    pub search_depth: u32,
    /// Minimum wall-clock time before a move is returned.
    pub min_think_time_ms: u64,
    /// Chance in `[0, 1]` of playing a random legal move instead of searching.
    pub random_move_probability: f64,
}

impl DifficultyProfile {
    pub const BEGINNER: Self = Self {
        search_depth: 2,
        min_think_time_ms: 500,
        random_move_probability: 0.4,
    };

    pub const INTERMEDIATE: Self = Self {
        search_depth: 8,
        min_think_time_ms: 800,
        random_move_probability: 0.0,
    };

    pub const ADVANCED: Self = Self {
        search_depth: 15,
        min_think_time_ms: 1000,
        random_move_probability: 0.0,
    };

    /// The think-time floor as a [`Duration`].
    pub fn min_think_time(&self) -> Duration {
        Duration::from_millis(self.min_think_time_ms)
    }

    /// Checks that the settings are in range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidProfile`] if the depth is 0 or the random
    /// move probability is outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.search_depth == 0 {
            return Err(EngineError::InvalidProfile(
                "search depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.random_move_probability) {
            return Err(EngineError::InvalidProfile(format!(
                "random move probability {} is outside [0, 1]",
                self.random_move_probability
            )));
        }
        Ok(())
    }
}

/// The three canonical difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All difficulty levels, weakest first.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Returns the profile for this level.
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Beginner => DifficultyProfile::BEGINNER,
            Difficulty::Intermediate => DifficultyProfile::INTERMEDIATE,
            Difficulty::Advanced => DifficultyProfile::ADVANCED,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::InvalidProfile(format!("unknown difficulty: {s}")))
    }
}

/// How a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Uniformly random legal move.
    Random,
    /// Root search result with its backed-up value.
    Search { value: i32 },
}

/// A move picked for the opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChoice {
    pub mv: Move,
    pub source: MoveSource,
}

impl MoveChoice {
    /// The move in UCI notation.
    pub fn uci(&self) -> String {
        rules::move_to_uci(&self.mv)
    }
}

/// Picks a move for the side to move, or `None` if there is no legal move.
///
/// With a non-zero random move probability, one uniform sample is drawn
/// before searching; if it falls under the probability a random legal move is
/// returned and no search runs.
pub fn choose_move<R: Rng + ?Sized>(
    position: &Chess,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Option<MoveChoice> {
    let moves = rules::legal_moves(position);
    if moves.is_empty() {
        return None;
    }

    if profile.random_move_probability > 0.0 && rng.gen::<f64>() < profile.random_move_probability
    {
        let mv = moves.as_slice().choose(rng)?.clone();
        return Some(MoveChoice {
            mv,
            source: MoveSource::Random,
        });
    }

    let result = search::best_move(position, profile.search_depth)?;
    Some(MoveChoice {
        mv: result.best_move,
        source: MoveSource::Search {
            value: result.value,
        },
    })
}

/// Selects the opponent's move for a FEN position.
///
/// The search runs on tokio's blocking pool. Once it completes, the call
/// sleeps until `min_think_time_ms` has passed since it started. A position
/// without legal moves returns `Ok(None)` immediately.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPosition`] for an unparseable FEN,
/// [`EngineError::InvalidProfile`] for out-of-range settings and
/// [`EngineError::TaskFailed`] if the search task panicked.
pub async fn select_opponent_move(
    fen: &str,
    profile: DifficultyProfile,
) -> Result<Option<MoveChoice>, EngineError> {
    profile.validate()?;
    let position = rules::parse_fen(fen)?;
    let started = Instant::now();

    let choice = tokio::task::spawn_blocking(move || {
        let mut rng = rand::thread_rng();
        choose_move(&position, &profile, &mut rng)
    })
    .await
    .map_err(|e| EngineError::TaskFailed(e.to_string()))?;

    let Some(choice) = choice else {
        tracing::debug!(fen, "no legal moves, game is over");
        return Ok(None);
    };

    let floor = profile.min_think_time();
    let elapsed = started.elapsed();
    if elapsed < floor {
        tokio::time::sleep(floor - elapsed).await;
    }

    tracing::debug!(
        fen,
        uci = %choice.uci(),
        source = ?choice.source,
        search_ms = elapsed.as_millis() as u64,
        "opponent move selected"
    );

    Ok(Some(choice))
}
