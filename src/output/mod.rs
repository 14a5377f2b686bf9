pub mod export;
pub mod formatter;

pub use export::{save_reports, LeagueReport};
pub use formatter::{
    format_episode_grid, format_episode_list, format_json, format_points, format_rosters,
    format_standings_table, format_tsv, should_use_colors,
};
