use super::config::{LeagueEventKind, RuleSet};
use crate::season::BaseEventName;

/// Validate a rule set before scoring.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &RuleSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // League event names must not shadow base events
    for (name, rule) in &rules.league_events {
        if name.trim().is_empty() {
            errors.push("rules.league_events: event name must not be empty".to_string());
            continue;
        }
        if name.parse::<BaseEventName>().is_ok() {
            errors.push(format!(
                "rules.league_events.{}: name is reserved for a base event",
                name
            ));
        }
        if rule.kind == LeagueEventKind::Prediction && rule.points < 0 {
            errors.push(format!(
                "rules.league_events.{}.points: prediction points must be non-negative",
                name
            ));
        }
    }

    match rules.survival.cap {
        Some(0) => errors.push(
            "rules.survival.cap: must be positive (omit it to disable streak scoring)".to_string(),
        ),
        None if rules.survival.preserve_streak => errors.push(
            "rules.survival.preserve_streak: requires rules.survival.cap".to_string(),
        ),
        _ => {}
    }

    if rules.prediction.multiplier == 0 {
        errors.push("rules.prediction.multiplier: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::LeagueEventRule;

    #[test]
    fn test_default_rules_valid() {
        assert!(validate_rules(&RuleSet::default()).is_ok());
    }

    #[test]
    fn test_league_event_shadows_base_event() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            "indivWin".to_string(),
            LeagueEventRule { points: 1, kind: LeagueEventKind::Direct },
        );
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("rules.league_events.indivWin"));
    }

    #[test]
    fn test_empty_league_event_name() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            " ".to_string(),
            LeagueEventRule { points: 1, kind: LeagueEventKind::Direct },
        );
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("must not be empty"));
    }

    #[test]
    fn test_negative_prediction_points() {
        let mut rules = RuleSet::default();
        rules.league_events.insert(
            "Merge Predict".to_string(),
            LeagueEventRule { points: -2, kind: LeagueEventKind::Prediction },
        );
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("Merge Predict.points"));
    }

    #[test]
    fn test_zero_survival_cap() {
        let mut rules = RuleSet::default();
        rules.survival.cap = Some(0);
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("rules.survival.cap"));
    }

    #[test]
    fn test_preserve_streak_without_cap() {
        let mut rules = RuleSet::default();
        rules.survival.preserve_streak = true;
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("preserve_streak"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut rules = RuleSet::default();
        rules.survival.cap = Some(0); // Error 1
        rules.prediction.multiplier = 0; // Error 2
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
