use chrono::{DateTime, Duration, Utc};

use super::types::{Episode, EpisodeNumber, Season};

/// Default length of the window in which an episode counts as airing.
pub const DEFAULT_AIRING_WINDOW: &str = "90m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirStatus {
    Aired,
    Airing,
    Upcoming,
}

impl AirStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AirStatus::Aired => "aired",
            AirStatus::Airing => "airing",
            AirStatus::Upcoming => "upcoming",
        }
    }
}

/// Classify an episode relative to `now`. An episode is airing from its air
/// date until `airing_window` has elapsed. A window reaching past the last
/// representable date never closes.
pub fn air_status(episode: &Episode, now: DateTime<Utc>, airing_window: Duration) -> AirStatus {
    let still_airing = episode
        .air_date
        .checked_add_signed(airing_window)
        .map_or(true, |window_end| now < window_end);
    if now < episode.air_date {
        AirStatus::Upcoming
    } else if still_airing {
        AirStatus::Airing
    } else {
        AirStatus::Aired
    }
}

/// Highest episode that has started airing. Scores are compiled through this
/// episode by default.
pub fn latest_scored_episode(
    episodes: &[Episode],
    now: DateTime<Utc>,
    airing_window: Duration,
) -> Option<EpisodeNumber> {
    episodes
        .iter()
        .filter(|e| air_status(e, now, airing_window) != AirStatus::Upcoming)
        .map(|e| e.number)
        .max()
}

/// Default compilation horizon for a season.
///
/// With an episode schedule this is the latest episode that has started
/// airing (0 before the premiere). Without one, every recorded event counts.
pub fn scoring_horizon(season: &Season, now: DateTime<Utc>, airing_window: Duration) -> EpisodeNumber {
    if season.episodes.is_empty() {
        return season.last_episode().unwrap_or(0);
    }
    latest_scored_episode(&season.episodes, now, airing_window).unwrap_or(0)
}

/// Parse a humantime duration string ("90m", "2h") into an airing window.
pub fn parse_airing_window(s: &str) -> anyhow::Result<Duration> {
    let std_duration = humantime::parse_duration(s.trim())?;
    Ok(Duration::from_std(std_duration)?)
}
