use log::debug;
use std::collections::BTreeMap;

use super::config::RuleSet;
use super::matrix::ScoreMatrix;
use crate::league::Prediction;
use crate::season::{Episode, EpisodeNumber, Event};

/// Score members' predictions against the league events that record the
/// actual outcomes.
///
/// A prediction only counts when it was submitted before its episode aired;
/// predictions for episodes without a known air date are ignored. When a
/// member submits several predictions for the same event and episode, the
/// latest one on time wins.
pub fn score_predictions(
    predictions: &[Prediction],
    outcomes: &[Event],
    episodes: &[Episode],
    rules: &RuleSet,
) -> ScoreMatrix {
    let mut latest: BTreeMap<(&str, &str, EpisodeNumber), &Prediction> = BTreeMap::new();
    for prediction in predictions {
        let Some(episode) = episodes.iter().find(|e| e.number == prediction.episode) else {
            debug!(
                "Ignoring {}'s prediction for unknown episode {}",
                prediction.member, prediction.episode
            );
            continue;
        };
        if prediction.submitted_at >= episode.air_date {
            debug!(
                "Ignoring {}'s late prediction for '{}' in episode {}",
                prediction.member, prediction.event, prediction.episode
            );
            continue;
        }

        let key = (
            prediction.member.as_str(),
            prediction.event.as_str(),
            prediction.episode,
        );
        let newer = latest
            .get(&key)
            .map_or(true, |existing| prediction.submitted_at > existing.submitted_at);
        if newer {
            latest.insert(key, prediction);
        }
    }

    let mut scores = ScoreMatrix::new();
    for ((member, event, episode), prediction) in latest {
        let Some(points) = rules.prediction_points(event) else {
            continue;
        };
        let correct = outcomes.iter().any(|outcome| {
            outcome.name == event
                && outcome.episode == episode
                && outcome.references.contains(&prediction.reference)
        });
        if correct {
            scores.add(member, episode, points);
        }
    }
    scores
}
