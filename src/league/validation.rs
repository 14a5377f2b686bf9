use std::collections::BTreeSet;

use super::types::League;
use crate::scoring::{LeagueEventKind, RuleSet};

/// Validate a league file against the rule set it will be scored with.
/// Returns all validation errors at once (not just the first).
pub fn validate_league(league: &League, rules: &RuleSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, selection) in league.selections.iter().enumerate() {
        if selection.member.trim().is_empty() {
            errors.push(format!("selections[{}].member: must not be empty", i));
        }
        if selection.castaway.trim().is_empty() {
            errors.push(format!("selections[{}].castaway: must not be empty", i));
        }
    }

    let mut played = BTreeSet::new();
    for (i, shot) in league.shots_in_the_dark.iter().enumerate() {
        if !played.insert(shot.member.as_str()) {
            errors.push(format!(
                "shots_in_the_dark[{}]: {} already played their shot this season",
                i, shot.member
            ));
        }
    }

    for (i, event) in league.events.iter().enumerate() {
        if !rules.league_events.contains_key(&event.name) {
            errors.push(format!(
                "events[{}].name: '{}' has no league rule",
                i, event.name
            ));
        }
    }

    for (i, prediction) in league.predictions.iter().enumerate() {
        match rules.league_events.get(&prediction.event) {
            Some(rule) if rule.kind == LeagueEventKind::Prediction => {}
            Some(_) => errors.push(format!(
                "predictions[{}].event: '{}' is not a prediction event",
                i, prediction.event
            )),
            None => errors.push(format!(
                "predictions[{}].event: '{}' has no league rule",
                i, prediction.event
            )),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
