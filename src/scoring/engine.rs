use log::{debug, info};

use super::config::RuleSet;
use super::matrix::ScoreMatrix;
use super::predictions::score_predictions;
use super::streak::compute_streak_bonus;
use super::validation::validate_rules;
use crate::league::{League, SelectionTimeline};
use crate::season::{
    is_active, tribe_of, tribe_rosters, EliminationLog, EpisodeNumber, Event, EventReference,
    Season, TribeTimeline,
};

/// The season record an event fold runs over.
#[derive(Debug, Clone, Copy)]
pub struct CompileInput<'a> {
    pub events: &'a [Event],
    pub tribe_updates: &'a TribeTimeline,
    pub eliminations: &'a EliminationLog,
}

/// Who receives the points an event earns.
#[derive(Debug, Clone, Copy)]
pub enum Attribution<'a> {
    /// League view: the member holding the castaway as of the event's episode
    Members(&'a SelectionTimeline),
    /// Season view keyed by castaway
    Castaways,
    /// Season view keyed by tribe
    Tribes,
}

impl Attribution<'_> {
    fn castaway_owner(
        &self,
        input: &CompileInput,
        castaway: &str,
        episode: EpisodeNumber,
    ) -> Option<String> {
        match self {
            Attribution::Members(selections) => selections
                .resolve_member(castaway, episode)
                .map(str::to_string),
            Attribution::Castaways => Some(castaway.to_string()),
            Attribution::Tribes => tribe_of(input.tribe_updates, input.eliminations, castaway, episode),
        }
    }

    /// Every entity credited when a tribe earns points, one entry per roster
    /// castaway. A member holding two castaways in the tribe appears twice.
    fn tribe_owners(
        &self,
        input: &CompileInput,
        tribe: &str,
        episode: EpisodeNumber,
    ) -> Vec<String> {
        if let Attribution::Tribes = self {
            return vec![tribe.to_string()];
        }

        let roster = tribe_rosters(input.tribe_updates, input.eliminations, episode)
            .remove(tribe)
            .unwrap_or_default();
        match self {
            Attribution::Members(selections) => roster
                .iter()
                .filter_map(|castaway| selections.resolve_member(castaway, episode))
                .map(str::to_string)
                .collect(),
            _ => roster.into_iter().collect(),
        }
    }
}

/// Fold a season's events into per-episode points.
///
/// Events are processed in episode order regardless of input order.
/// `tribeUpdate` events, names the rule set does not score, castaways already
/// out of the game and castaways nobody holds all contribute nothing.
pub fn compile_scores(input: &CompileInput, attribution: &Attribution, rules: &RuleSet) -> ScoreMatrix {
    let mut ordered: Vec<&Event> = input.events.iter().collect();
    ordered.sort_by_key(|event| event.episode);

    let mut scores = ScoreMatrix::new();
    let mut unowned = 0usize;

    for event in ordered {
        if event.is_tribe_update() {
            continue;
        }
        let Some(points) = rules.points_for(&event.name) else {
            debug!("Episode {}: '{}' is not scored", event.episode, event.name);
            continue;
        };

        for reference in &event.references {
            match reference {
                EventReference::Castaway(castaway) => {
                    if !is_active(input.tribe_updates, input.eliminations, castaway, event.episode) {
                        debug!(
                            "Episode {}: {} is out of the game, skipping '{}'",
                            event.episode, castaway, event.name
                        );
                        continue;
                    }
                    match attribution.castaway_owner(input, castaway, event.episode) {
                        Some(owner) => scores.add(&owner, event.episode, points),
                        None => unowned += 1,
                    }
                }
                EventReference::Tribe(tribe) => {
                    if !rules.scores_tribe_reference(&event.name) {
                        continue;
                    }
                    for owner in attribution.tribe_owners(input, tribe, event.episode) {
                        scores.add(&owner, event.episode, points);
                    }
                }
            }
        }
    }

    if unowned > 0 {
        debug!("{} castaway references had no owner", unowned);
    }
    scores
}

/// A league's scores split by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueScores {
    /// Season base events plus the league's direct events
    pub events: ScoreMatrix,
    pub streaks: ScoreMatrix,
    pub predictions: ScoreMatrix,
    pub total: ScoreMatrix,
}

/// Compile every scoring layer for one league through `through_episode`.
///
/// The rule set must already have passed [`validate_rules`].
pub fn compile_league(
    season: &Season,
    league: &League,
    rules: &RuleSet,
    through_episode: EpisodeNumber,
) -> LeagueScores {
    debug_assert!(
        validate_rules(rules).is_ok(),
        "compile_league called with an invalid rule set"
    );

    let tribe_updates = season.tribe_timeline();
    let eliminations = season.elimination_log();
    let selections = SelectionTimeline::from_updates(&league.selections);

    let events: Vec<Event> = season
        .events
        .iter()
        .chain(league.events.iter())
        .filter(|event| event.episode <= through_episode)
        .cloned()
        .collect();
    let input = CompileInput {
        events: &events,
        tribe_updates: &tribe_updates,
        eliminations: &eliminations,
    };

    let event_scores = compile_scores(&input, &Attribution::Members(&selections), rules);
    let streaks = compute_streak_bonus(
        &selections,
        &eliminations,
        &tribe_updates,
        &league.shots_in_the_dark,
        rules,
        through_episode,
    );
    let league_events: Vec<Event> = league
        .events
        .iter()
        .filter(|event| event.episode <= through_episode)
        .cloned()
        .collect();
    let predictions = score_predictions(&league.predictions, &league_events, &season.episodes, rules);

    let total = ScoreMatrix::combined(&[&event_scores, &streaks, &predictions]);
    if total.is_empty() {
        info!("Compiled {}: no points through episode {}", league.name, through_episode);
    } else {
        info!(
            "Compiled {}: {} members through episode {}",
            league.name,
            total.len(),
            through_episode
        );
    }

    LeagueScores {
        events: event_scores,
        streaks,
        predictions,
        total,
    }
}
