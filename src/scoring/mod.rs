pub mod config;
pub mod engine;
pub mod matrix;
pub mod predictions;
pub mod streak;
pub mod validation;

pub use config::*;
pub use engine::{compile_league, compile_scores, Attribution, CompileInput, LeagueScores};
pub use matrix::{ScoreMatrix, Standing};
pub use predictions::score_predictions;
pub use streak::compute_streak_bonus;
pub use validation::validate_rules;
