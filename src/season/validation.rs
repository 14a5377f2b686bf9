use std::collections::BTreeSet;

use super::tribes::duplicate_placements;
use super::types::Season;

/// Validate a season log before it is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_season(season: &Season) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut seen = BTreeSet::new();
    for episode in &season.episodes {
        if !seen.insert(episode.number) {
            errors.push(format!("episodes: episode {} listed twice", episode.number));
        }
    }

    for (i, event) in season.events.iter().enumerate() {
        if event.name.trim().is_empty() {
            errors.push(format!("events[{}].name: must not be empty", i));
        }
        if event.is_tribe_update() {
            let tribes = event.tribes().count();
            if tribes != 1 {
                errors.push(format!(
                    "events[{}]: tribeUpdate must reference exactly one tribe, found {}",
                    i, tribes
                ));
            }
        }
    }

    // Each castaway may sit in only one tribe per timeline entry
    for (episode, castaways) in duplicate_placements(&season.tribe_timeline()) {
        errors.push(format!(
            "tribe_updates[{}]: castaways in more than one tribe: {}",
            episode,
            castaways.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
