use serde::{Deserialize, Serialize};

use crate::scoring::RuleSet;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Season log (YAML or JSON), relative to the config file
    pub season: String,

    /// How long an episode counts as airing after its air date (default: 90m)
    #[serde(default)]
    pub airing_window: Option<String>,

    /// Rules for leagues that do not carry their own
    #[serde(default)]
    pub rules: Option<RuleSet>,

    #[serde(default)]
    pub leagues: Vec<LeagueConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LeagueConfig {
    /// Display name; the league file's own name is used when absent
    pub name: Option<String>,
    pub path: String,
}
