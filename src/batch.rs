use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use log::warn;
use std::sync::Arc;

use crate::config::LeagueInput;
use crate::league::{validate_league, League};
use crate::scoring::{compile_league, validate_rules, LeagueScores, RuleSet};
use crate::season::{EpisodeNumber, Season};

/// One league's compiled scores, labelled with its display name.
#[derive(Debug, Clone)]
pub struct CompiledLeague {
    pub name: String,
    pub scores: LeagueScores,
}

/// Check a league and its effective rules, then compile it.
fn compile_checked(
    season: &Season,
    league: &League,
    rules: &RuleSet,
    through_episode: EpisodeNumber,
) -> Result<LeagueScores> {
    if let Err(errors) = validate_rules(rules) {
        anyhow::bail!("Invalid rules: {}", errors.join("; "));
    }
    if let Err(errors) = validate_league(league, rules) {
        anyhow::bail!("Invalid league: {}", errors.join("; "));
    }
    Ok(compile_league(season, league, rules, through_episode))
}

/// Compile every league against the same season concurrently.
///
/// Each league runs on the blocking pool. A league that fails is reported and
/// skipped; the call only fails when every league does. Results are sorted by
/// league name.
pub async fn compile_leagues(
    season: Arc<Season>,
    leagues: Vec<LeagueInput>,
    default_rules: &RuleSet,
    through_episode: EpisodeNumber,
    verbose: bool,
) -> Result<Vec<CompiledLeague>> {
    let league_count = leagues.len();

    let mut futures = FuturesUnordered::new();
    for input in leagues {
        let season = Arc::clone(&season);
        let rules = input
            .league
            .rules
            .clone()
            .unwrap_or_else(|| default_rules.clone());
        futures.push(async move {
            let LeagueInput { name, league } = input;
            let result = tokio::task::spawn_blocking(move || {
                compile_checked(&season, &league, &rules, through_episode)
            })
            .await
            .context("League compilation task failed")
            .and_then(|scores| scores);
            (name, result)
        });
    }

    let mut compiled = Vec::new();
    while let Some((name, result)) = futures.next().await {
        match result {
            Ok(scores) => {
                if verbose {
                    match scores.total.last_episode() {
                        Some(last) => eprintln!(
                            "  Compiled {}: {} members, last scored episode {}",
                            name,
                            scores.total.len(),
                            last
                        ),
                        None => eprintln!("  Compiled {}: no points scored yet", name),
                    }
                }
                compiled.push(CompiledLeague { name, scores });
            }
            Err(e) => {
                warn!("League {} failed: {:#}", name, e);
                eprintln!("League failed: {} - {:#}", name, e);
            }
        }
    }

    if compiled.is_empty() && league_count > 0 {
        anyhow::bail!("All leagues failed to compile. Check the league files and rules.");
    }

    compiled.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(compiled)
}
