use std::collections::BTreeMap;
use std::io::IsTerminal;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::scoring::Standing;
use crate::season::{air_status, AirStatus, Episode, Rosters};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an episode delta with an explicit sign ("+3", "-2", "0")
pub fn format_points(points: i32) -> String {
    if points > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

/// Green for gains, red for losses, dimmed for zero
fn color_by_sign(text: &str, points: i32) -> String {
    match points.signum() {
        1 => text.green().to_string(),
        -1 => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn name_column_width(standings: &[Standing]) -> usize {
    standings
        .iter()
        .map(|s| s.entity.chars().count())
        .max()
        .unwrap_or(0)
}

/// Competition ranks for standings already sorted by total: tied totals
/// share a rank and the next distinct total skips ahead ("1, 2, 2, 4").
fn shared_ranks(standings: &[Standing]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(standings.len());
    for (idx, standing) in standings.iter().enumerate() {
        let rank = match idx.checked_sub(1) {
            Some(prev) if standings[prev].total == standing.total => ranks[prev],
            _ => idx + 1,
        };
        ranks.push(rank);
    }
    ranks
}

/// Format standings as a ranked table: index, name, total.
/// Tied totals share a rank.
pub fn format_standings_table(standings: &[Standing], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No scores yet.".to_string();
    }

    let total_width = 6;
    let mut name_width = name_column_width(standings);
    if let Some(width) = get_terminal_width() {
        // "NN. " + name + "  " + total
        let fixed = 4 + 2 + total_width;
        if width > fixed + 10 {
            name_width = name_width.min(width - fixed);
        }
    }

    standings
        .iter()
        .zip(shared_ranks(standings))
        .map(|(standing, rank)| {
            let index_str = format!("{:>2}.", rank);
            let name = truncate_name(&standing.entity, name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let total = format!("{:>width$}", standing.total, width = total_width);

            if use_colors {
                format!("{} {}  {}", index_str.dimmed(), name_padded, total.bold())
            } else {
                format!("{} {}  {}", index_str, name_padded, total)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, name, total (no headers, no colors). Ties share a rank.
pub fn format_tsv(standings: &[Standing]) -> String {
    standings
        .iter()
        .zip(shared_ranks(standings))
        .map(|(standing, rank)| format!("{}\t{}\t{}", rank, standing.entity, standing.total))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one row per entity with per-episode values, in standings order.
///
/// `rows` holds dense or cumulative arrays from the score matrix. Deltas are
/// shown signed; running totals are shown plain.
pub fn format_episode_grid(
    standings: &[Standing],
    rows: &BTreeMap<String, Vec<i32>>,
    cumulative: bool,
    use_colors: bool,
) -> String {
    if standings.is_empty() {
        return "No scores yet.".to_string();
    }

    let name_width = name_column_width(standings).max(4);
    let episodes = rows.values().map(Vec::len).max().unwrap_or(0);
    let cell = 5;

    let header = (0..episodes)
        .map(|ep| format!("{:>cell$}", format!("E{}", ep), cell = cell))
        .collect::<String>();
    let header = format!("{:<width$}{}", "", header, width = name_width);
    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for standing in standings {
        let Some(row) = rows.get(&standing.entity) else {
            continue;
        };
        let cells = row
            .iter()
            .map(|points| {
                let text = if cumulative {
                    points.to_string()
                } else {
                    format_points(*points)
                };
                let padded = format!("{:>cell$}", text, cell = cell);
                if use_colors && !cumulative {
                    color_by_sign(&padded, *points)
                } else {
                    padded
                }
            })
            .collect::<String>();
        lines.push(format!(
            "{:<width$}{}",
            standing.entity,
            cells,
            width = name_width
        ));
    }

    lines.join("\n")
}

/// Format tribe rosters, one tribe per line: "Red: A, B"
pub fn format_rosters(rosters: &Rosters, use_colors: bool) -> String {
    if rosters.is_empty() {
        return "No tribes recorded.".to_string();
    }

    rosters
        .iter()
        .map(|(tribe, castaways)| {
            let members = if castaways.is_empty() {
                "(empty)".to_string()
            } else {
                castaways.join(", ")
            };
            if use_colors {
                format!("{}: {}", tribe.cyan(), members)
            } else {
                format!("{}: {}", tribe, members)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the episode list with air status relative to `now`
pub fn format_episode_list(
    episodes: &[Episode],
    now: DateTime<Utc>,
    airing_window: Duration,
    use_colors: bool,
) -> String {
    if episodes.is_empty() {
        return "No episodes recorded.".to_string();
    }

    let mut sorted: Vec<&Episode> = episodes.iter().collect();
    sorted.sort_by_key(|e| e.number);

    sorted
        .into_iter()
        .map(|episode| {
            let status = air_status(episode, now, airing_window);
            let title = episode.title.as_deref().unwrap_or("");
            let date = episode.air_date.format("%Y-%m-%d %H:%M");
            let label = format!("{:<8}", status.label());
            let label = if use_colors {
                match status {
                    AirStatus::Aired => label.green().to_string(),
                    AirStatus::Airing => label.yellow().to_string(),
                    AirStatus::Upcoming => label.dimmed().to_string(),
                }
            } else {
                label
            };
            format!("{:>2}. {}  {}  {}", episode.number, label, date, title)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize any report as pretty JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize scores")
}
