use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::RuleSet;
use crate::season::{EpisodeNumber, Event, EventReference};

/// A fantasy league following one season.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct League {
    pub name: String,
    /// League scoring rules; the configured default rule set applies when absent.
    #[serde(default)]
    pub rules: Option<RuleSet>,
    /// Draft picks and later swaps, in any order.
    #[serde(default)]
    pub selections: Vec<SelectionUpdate>,
    #[serde(default)]
    pub shots_in_the_dark: Vec<ShotInTheDark>,
    /// League-specific events scored against the league's own rules.
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// A member claiming a castaway from `episode` onward.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectionUpdate {
    pub member: String,
    pub castaway: String,
    pub episode: EpisodeNumber,
}

/// A member's once-per-season insurance, activated before `episode` airs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShotInTheDark {
    pub member: String,
    pub episode: EpisodeNumber,
}

/// Whether `member` played their shot in the dark for `episode`.
pub fn shot_played(shots: &[ShotInTheDark], member: &str, episode: EpisodeNumber) -> bool {
    shots
        .iter()
        .any(|shot| shot.member == member && shot.episode == episode)
}

/// A member's guess at the outcome of a prediction event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Prediction {
    pub member: String,
    /// Name of the prediction-kind league event being predicted.
    pub event: String,
    pub episode: EpisodeNumber,
    pub reference: EventReference,
    pub submitted_at: DateTime<Utc>,
}
