pub mod selection;
pub mod types;
pub mod validation;

pub use selection::SelectionTimeline;
pub use types::{shot_played, League, Prediction, SelectionUpdate, ShotInTheDark};
pub use validation::validate_league;
