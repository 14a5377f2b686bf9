use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Position of an episode on the season's time axis. Episode 0 is the
/// pre-season slot where the draft lands.
pub type EpisodeNumber = u32;

/// Event name that redefines tribe membership instead of scoring points.
pub const TRIBE_UPDATE: &str = "tribeUpdate";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Episode {
    pub number: EpisodeNumber,
    #[serde(default)]
    pub title: Option<String>,
    pub air_date: DateTime<Utc>,
}

/// The entity an event concerns.
///
/// YAML: `{ castaway: "Kyle" }` or `{ tribe: "Lagi" }`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventReference {
    Castaway(String),
    Tribe(String),
}

impl fmt::Display for EventReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventReference::Castaway(name) => write!(f, "castaway {}", name),
            EventReference::Tribe(name) => write!(f, "tribe {}", name),
        }
    }
}

/// A season or league event. Base events and league events share the same
/// shape; only the rule set decides what a name is worth.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Event {
    pub episode: EpisodeNumber,
    pub name: String,
    #[serde(default)]
    pub references: Vec<EventReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Event {
    pub fn castaways(&self) -> impl Iterator<Item = &str> {
        self.references.iter().filter_map(|r| match r {
            EventReference::Castaway(name) => Some(name.as_str()),
            EventReference::Tribe(_) => None,
        })
    }

    pub fn tribes(&self) -> impl Iterator<Item = &str> {
        self.references.iter().filter_map(|r| match r {
            EventReference::Tribe(name) => Some(name.as_str()),
            EventReference::Castaway(_) => None,
        })
    }

    pub fn is_tribe_update(&self) -> bool {
        self.name == TRIBE_UPDATE
    }
}

/// The closed set of season-wide event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseEventName {
    AdvFound,
    AdvPlay,
    BadAdvPlay,
    AdvElim,
    SpokeEpTitle,
    Tribe1st,
    Tribe2nd,
    IndivWin,
    IndivReward,
    Finalists,
    FireWin,
    SoleSurvivor,
    Elim,
    NoVoteExit,
    TribeUpdate,
    OtherNotes,
}

impl BaseEventName {
    pub const ALL: [BaseEventName; 16] = [
        BaseEventName::AdvFound,
        BaseEventName::AdvPlay,
        BaseEventName::BadAdvPlay,
        BaseEventName::AdvElim,
        BaseEventName::SpokeEpTitle,
        BaseEventName::Tribe1st,
        BaseEventName::Tribe2nd,
        BaseEventName::IndivWin,
        BaseEventName::IndivReward,
        BaseEventName::Finalists,
        BaseEventName::FireWin,
        BaseEventName::SoleSurvivor,
        BaseEventName::Elim,
        BaseEventName::NoVoteExit,
        BaseEventName::TribeUpdate,
        BaseEventName::OtherNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseEventName::AdvFound => "advFound",
            BaseEventName::AdvPlay => "advPlay",
            BaseEventName::BadAdvPlay => "badAdvPlay",
            BaseEventName::AdvElim => "advElim",
            BaseEventName::SpokeEpTitle => "spokeEpTitle",
            BaseEventName::Tribe1st => "tribe1st",
            BaseEventName::Tribe2nd => "tribe2nd",
            BaseEventName::IndivWin => "indivWin",
            BaseEventName::IndivReward => "indivReward",
            BaseEventName::Finalists => "finalists",
            BaseEventName::FireWin => "fireWin",
            BaseEventName::SoleSurvivor => "soleSurvivor",
            BaseEventName::Elim => "elim",
            BaseEventName::NoVoteExit => "noVoteExit",
            BaseEventName::TribeUpdate => TRIBE_UPDATE,
            BaseEventName::OtherNotes => "otherNotes",
        }
    }

    /// Tribe placements are the only base events scored against a tribe
    /// reference.
    pub fn is_tribe_scored(&self) -> bool {
        matches!(self, BaseEventName::Tribe1st | BaseEventName::Tribe2nd)
    }

    /// Events that remove a castaway from the game.
    pub fn is_elimination(&self) -> bool {
        matches!(self, BaseEventName::Elim | BaseEventName::NoVoteExit)
    }
}

impl FromStr for BaseEventName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        BaseEventName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown base event: {}", s))
    }
}

impl fmt::Display for BaseEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tribe rosters keyed by tribe name.
pub type Rosters = BTreeMap<String, Vec<String>>;

/// Sparse tribe membership history: only episodes where membership changed
/// carry an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TribeTimeline(pub BTreeMap<EpisodeNumber, Rosters>);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Elimination {
    pub castaway: String,
    /// Name of the event that caused the elimination (`elim`, `noVoteExit`, ...)
    pub event: String,
}

/// Castaways eliminated per episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EliminationLog(pub BTreeMap<EpisodeNumber, Vec<Elimination>>);

/// A season's full event record as loaded from disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Season {
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
    #[serde(default)]
    pub events: Vec<Event>,
    /// Explicit tribe timeline; derived from `tribeUpdate` events when absent.
    #[serde(default)]
    pub tribe_updates: Option<TribeTimeline>,
    /// Explicit elimination log; derived from elimination events when absent.
    #[serde(default)]
    pub eliminations: Option<EliminationLog>,
}

impl Season {
    pub fn tribe_timeline(&self) -> TribeTimeline {
        self.tribe_updates
            .clone()
            .unwrap_or_else(|| TribeTimeline::from_events(&self.events))
    }

    pub fn elimination_log(&self) -> EliminationLog {
        self.eliminations
            .clone()
            .unwrap_or_else(|| EliminationLog::from_events(&self.events))
    }

    /// Highest episode number mentioned anywhere in the season.
    pub fn last_episode(&self) -> Option<EpisodeNumber> {
        let from_episodes = self.episodes.iter().map(|e| e.number);
        let from_events = self.events.iter().map(|e| e.episode);
        from_episodes.chain(from_events).max()
    }
}
