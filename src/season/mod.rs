pub mod eliminations;
pub mod episodes;
pub mod tribes;
pub mod types;
pub mod validation;

pub use episodes::{
    air_status, latest_scored_episode, parse_airing_window, scoring_horizon, AirStatus,
};
pub use tribes::{is_active, tribe_of, tribe_rosters};
pub use types::*;
pub use validation::validate_season;
