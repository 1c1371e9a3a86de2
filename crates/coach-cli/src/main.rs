//! Chess coach CLI - evaluates positions, plays opponent moves and grades games.
//!
//! Every command prints JSON on stdout; logs go to stderr.

mod config;

use std::path::PathBuf;

use anyhow::Context;
use chess_analysis::{GameAnalyzer, GameRecord, PlyInput, Progress};
use chess_engine::{
    evaluate, material_balance, rules, search, select_opponent_move, Color, Difficulty, MoveSource,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use config::CoachConfig;

/// Chess coach - move search and game analysis.
#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Move search and game analysis for the chess coach")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a position statically and, optionally, by search
    Eval {
        /// Position in FEN
        #[arg(long, default_value = rules::STARTING_FEN)]
        fen: String,
        /// Also search this many plies and report the best move
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Show each side's material
    Material {
        /// Position in FEN
        #[arg(long, default_value = rules::STARTING_FEN)]
        fen: String,
    },
    /// Pick the opponent's move for a position
    Move {
        /// Position in FEN
        #[arg(long)]
        fen: String,
        /// Strength level (overrides the config file)
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
    /// Grade one side's moves in a game
    Analyze {
        /// Space-separated UCI moves played from the start position
        #[arg(long, conflicts_with = "plies")]
        moves: Option<String>,
        /// Position the moves start from
        #[arg(long, default_value = rules::STARTING_FEN)]
        start_fen: String,
        /// JSON file with a list of {"fen_before", "uci"} plies
        #[arg(long)]
        plies: Option<PathBuf>,
        /// Side to grade
        #[arg(long, value_enum, default_value_t = Side::White)]
        color: Side,
        /// Search depth (overrides the config file)
        #[arg(long)]
        depth: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config_path = args.config.clone().unwrap_or_else(CoachConfig::default_path);
    let config = CoachConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Config: {:?}", config);

    let output = match args.command {
        Commands::Eval { fen, depth } => eval(&fen, depth)?,
        Commands::Material { fen } => {
            let position = rules::parse_fen(&fen)?;
            serde_json::to_value(material_balance(&position))?
        }
        Commands::Move { fen, difficulty } => {
            let profile = match difficulty {
                Some(difficulty) => difficulty.profile(),
                None => config.opponent.effective_profile(),
            };
            opponent_move(&fen, profile).await?
        }
        Commands::Analyze {
            moves,
            start_fen,
            plies,
            color,
            depth,
        } => {
            let plies = load_plies(moves.as_deref(), &start_fen, plies.as_deref())?;
            let mut analysis_config = config.analysis;
            if let Some(depth) = depth {
                analysis_config.depth = depth;
            }
            let analyzer = GameAnalyzer::new(analysis_config);
            let color = Color::from(color);

            // Analysis is synchronous and CPU-bound.
            let analysis = tokio::task::spawn_blocking(move || {
                analyzer.analyze_game_with_progress(&plies, color, |p: Progress| {
                    tracing::info!("Graded ply {}/{}", p.current, p.total);
                })
            })
            .await??;
            serde_json::to_value(analysis)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn eval(fen: &str, depth: Option<u32>) -> anyhow::Result<serde_json::Value> {
    let position = rules::parse_fen(fen)?;
    let mut output = json!({
        "fen": rules::to_fen(&position),
        "evaluation": evaluate(&position),
        "status": format!("{:?}", rules::status(&position)),
    });

    if let Some(depth) = depth {
        output["depth"] = json!(depth);
        output["search"] = match search::best_move(&position, depth) {
            Some(result) => json!({
                "best_move": rules::move_to_uci(&result.best_move),
                "value": result.value,
                "nodes": result.nodes,
            }),
            None => serde_json::Value::Null,
        };
    }

    Ok(output)
}

async fn opponent_move(
    fen: &str,
    profile: chess_engine::DifficultyProfile,
) -> anyhow::Result<serde_json::Value> {
    let choice = select_opponent_move(fen, profile).await?;
    Ok(match choice {
        Some(choice) => {
            let value = match choice.source {
                MoveSource::Search { value } => Some(value),
                MoveSource::Random => None,
            };
            json!({
                "move": choice.uci(),
                "random": value.is_none(),
                "value": value,
            })
        }
        None => json!({ "move": null }),
    })
}

fn load_plies(
    moves: Option<&str>,
    start_fen: &str,
    plies: Option<&std::path::Path>,
) -> anyhow::Result<Vec<PlyInput>> {
    if let Some(path) = plies {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse plies from {}", path.display()));
    }

    let moves = moves.context("Either --moves or --plies is required")?;
    let record = GameRecord::from_uci_moves(start_fen, moves.split_whitespace())?;
    Ok(record.plies().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_analyze() {
        let args = Cli::try_parse_from([
            "coach", "analyze", "--moves", "e2e4 e7e5", "--color", "black", "--depth", "2",
        ])
        .unwrap();
        match args.command {
            Commands::Analyze {
                moves,
                color,
                depth,
                ..
            } => {
                assert_eq!(moves.as_deref(), Some("e2e4 e7e5"));
                assert!(matches!(color, Side::Black));
                assert_eq!(depth, Some(2));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn args_parse_difficulty() {
        let args = Cli::try_parse_from([
            "coach",
            "move",
            "--fen",
            rules::STARTING_FEN,
            "--difficulty",
            "advanced",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Commands::Move {
                difficulty: Some(Difficulty::Advanced),
                ..
            }
        ));
    }

    #[test]
    fn eval_reports_search() {
        let output = eval("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", Some(2)).unwrap();
        assert_eq!(output["search"]["best_move"], "d1d5");
        assert!(output["evaluation"].as_i64().unwrap() < 0);
    }

    #[test]
    fn plies_from_move_list() {
        let plies = load_plies(Some("e2e4 e7e5"), rules::STARTING_FEN, None).unwrap();
        assert_eq!(plies.len(), 2);
        assert_eq!(plies[0].uci, "e2e4");
        assert!(load_plies(None, rules::STARTING_FEN, None).is_err());
        assert!(load_plies(Some("e2e5"), rules::STARTING_FEN, None).is_err());
    }
}
