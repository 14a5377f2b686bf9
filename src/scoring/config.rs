use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::season::BaseEventName;

/// Point rules for one league.
///
/// Every section is optional. Base event values left out fall back to the
/// global defaults in [`BaseRules::default`]; event names that appear in no
/// section score nothing.
///
/// Example YAML:
/// ```yaml
/// rules:
///   base:
///     indivWin: 8
///     tribe1st: 2
///   league_events:
///     Confessional: { points: 1 }
///     Merge Predict: { points: 5, kind: prediction }
///   survival:
///     cap: 5
///     preserve_streak: true
///   prediction:
///     multiplier: 2
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default)]
    pub base: BaseRules,

    /// League events keyed by name
    #[serde(default)]
    pub league_events: BTreeMap<String, LeagueEventRule>,

    #[serde(default)]
    pub survival: SurvivalRules,

    #[serde(default)]
    pub prediction: PredictionRules,
}

impl RuleSet {
    /// Points awarded for a directly scored event, or None when the name is
    /// not scored (unknown names, `tribeUpdate`, prediction events).
    pub fn points_for(&self, name: &str) -> Option<i32> {
        if let Ok(base) = name.parse::<BaseEventName>() {
            return self.base.points(base);
        }
        self.league_events
            .get(name)
            .filter(|rule| rule.kind == LeagueEventKind::Direct)
            .map(|rule| rule.points)
    }

    /// Whether an event with this name is scored when it references a tribe.
    /// Only tribe placements among base events; any direct league event.
    pub fn scores_tribe_reference(&self, name: &str) -> bool {
        match name.parse::<BaseEventName>() {
            Ok(base) => base.is_tribe_scored(),
            Err(_) => self
                .league_events
                .get(name)
                .is_some_and(|rule| rule.kind == LeagueEventKind::Direct),
        }
    }

    /// Points for a correct prediction, multiplier included.
    pub fn prediction_points(&self, name: &str) -> Option<i32> {
        self.league_events
            .get(name)
            .filter(|rule| rule.kind == LeagueEventKind::Prediction)
            .map(|rule| {
                let multiplier = i32::try_from(self.prediction.multiplier).unwrap_or(i32::MAX);
                rule.points.saturating_mul(multiplier)
            })
    }
}

/// Point values for the season-wide base events.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BaseRules {
    pub adv_found: i32,
    pub adv_play: i32,
    pub bad_adv_play: i32,
    pub adv_elim: i32,
    pub spoke_ep_title: i32,
    pub tribe1st: i32,
    pub tribe2nd: i32,
    pub indiv_win: i32,
    pub indiv_reward: i32,
    pub finalists: i32,
    pub fire_win: i32,
    pub sole_survivor: i32,
}

impl Default for BaseRules {
    fn default() -> Self {
        Self {
            adv_found: 2,
            adv_play: 3,
            bad_adv_play: -3,
            adv_elim: -4,
            spoke_ep_title: 2,
            tribe1st: 2,
            tribe2nd: 1,
            indiv_win: 10,
            indiv_reward: 5,
            finalists: 5,
            fire_win: 5,
            sole_survivor: 10,
        }
    }
}

impl BaseRules {
    /// Rule value for a base event. Eliminations, tribe updates and notes
    /// carry no points.
    pub fn points(&self, name: BaseEventName) -> Option<i32> {
        match name {
            BaseEventName::AdvFound => Some(self.adv_found),
            BaseEventName::AdvPlay => Some(self.adv_play),
            BaseEventName::BadAdvPlay => Some(self.bad_adv_play),
            BaseEventName::AdvElim => Some(self.adv_elim),
            BaseEventName::SpokeEpTitle => Some(self.spoke_ep_title),
            BaseEventName::Tribe1st => Some(self.tribe1st),
            BaseEventName::Tribe2nd => Some(self.tribe2nd),
            BaseEventName::IndivWin => Some(self.indiv_win),
            BaseEventName::IndivReward => Some(self.indiv_reward),
            BaseEventName::Finalists => Some(self.finalists),
            BaseEventName::FireWin => Some(self.fire_win),
            BaseEventName::SoleSurvivor => Some(self.sole_survivor),
            BaseEventName::Elim
            | BaseEventName::NoVoteExit
            | BaseEventName::TribeUpdate
            | BaseEventName::OtherNotes => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeagueEventKind {
    /// Scored against the castaway or tribe the event references
    #[default]
    Direct,
    /// Scored for members who predicted the outcome beforehand
    Prediction,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LeagueEventRule {
    pub points: i32,
    #[serde(default)]
    pub kind: LeagueEventKind,
}

/// Survival streak bonus: each episode a member's castaway survives earns
/// the current streak length in points, up to `cap`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SurvivalRules {
    /// Maximum bonus per episode; streak scoring is off when unset
    #[serde(default)]
    pub cap: Option<u32>,

    /// Keep the streak through an elimination covered by a shot in the dark
    #[serde(default)]
    pub preserve_streak: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PredictionRules {
    /// Applied to a prediction event's points when the guess is right
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

fn default_multiplier() -> u32 {
    1
}

impl Default for PredictionRules {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_set() {
        let rules = RuleSet::default();

        assert_eq!(rules.base.indiv_win, 10);
        assert_eq!(rules.base.tribe1st, 2);
        assert!(rules.league_events.is_empty());
        assert_eq!(rules.survival.cap, None);
        assert_eq!(rules.prediction.multiplier, 1);
    }

    #[test]
    fn test_rule_set_serde_roundtrip() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            "Confessional".to_string(),
            LeagueEventRule { points: 1, kind: LeagueEventKind::Direct },
        );
        rules.survival.cap = Some(5);
        let yaml = serde_saphyr::to_string(&rules).unwrap();
        let parsed: RuleSet = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(rules, parsed);
    }

    #[test]
    fn test_partial_base_rules_fall_back_to_defaults() {
        let yaml = r#"
base:
  indivWin: 3
  tribe1st: 1
"#;
        let rules: RuleSet = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.base.indiv_win, 3);
        assert_eq!(rules.base.tribe1st, 1);
        assert_eq!(rules.base.tribe2nd, BaseRules::default().tribe2nd);
    }

    #[test]
    fn test_full_rule_set_parse() {
        let yaml = r#"
base:
  badAdvPlay: -5
league_events:
  Confessional:
    points: 1
  Merge Predict:
    points: 5
    kind: prediction
survival:
  cap: 4
  preserve_streak: true
prediction:
  multiplier: 2
"#;
        let rules: RuleSet = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.base.bad_adv_play, -5);
        assert_eq!(rules.league_events["Confessional"].kind, LeagueEventKind::Direct);
        assert_eq!(rules.league_events["Merge Predict"].kind, LeagueEventKind::Prediction);
        assert_eq!(rules.survival.cap, Some(4));
        assert!(rules.survival.preserve_streak);
        assert_eq!(rules.prediction.multiplier, 2);
    }

    #[test]
    fn test_empty_rule_set_parse() {
        let rules: RuleSet = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_unknown_base_key_rejected() {
        let yaml = r#"
base:
  immunityWin: 3
"#;
        assert!(serde_saphyr::from_str::<RuleSet>(yaml).is_err());
    }

    #[test]
    fn test_points_for() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            "Confessional".to_string(),
            LeagueEventRule { points: 1, kind: LeagueEventKind::Direct },
        );
        rules.league_events.insert(
            "Merge Predict".to_string(),
            LeagueEventRule { points: 5, kind: LeagueEventKind::Prediction },
        );

        assert_eq!(rules.points_for("indivWin"), Some(10));
        assert_eq!(rules.points_for("Confessional"), Some(1));
        assert_eq!(rules.points_for("tribeUpdate"), None);
        assert_eq!(rules.points_for("elim"), None);
        assert_eq!(rules.points_for("Merge Predict"), None);
        assert_eq!(rules.points_for("somethingElse"), None);
    }

    #[test]
    fn test_scores_tribe_reference() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            "Tribe Dance".to_string(),
            LeagueEventRule { points: 1, kind: LeagueEventKind::Direct },
        );
        assert!(rules.scores_tribe_reference("tribe1st"));
        assert!(rules.scores_tribe_reference("tribe2nd"));
        assert!(!rules.scores_tribe_reference("indivWin"));
        assert!(rules.scores_tribe_reference("Tribe Dance"));
        assert!(!rules.scores_tribe_reference("unknown"));
    }

    #[test]
    fn test_prediction_points_multiplier() {
        let mut rules = RuleSet::default();
        rules.prediction.multiplier = 3;
        rules.league_events.insert(
            "Merge Predict".to_string(),
            LeagueEventRule { points: 5, kind: LeagueEventKind::Prediction },
        );
        assert_eq!(rules.prediction_points("Merge Predict"), Some(15));
        assert_eq!(rules.prediction_points("indivWin"), None);
    }
}
