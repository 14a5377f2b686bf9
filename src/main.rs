use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use survivor_scores::config::{self, Config, LeagueInput};
use survivor_scores::league::SelectionTimeline;
use survivor_scores::output::{self, LeagueReport};
use survivor_scores::scoring::{self, Attribution, CompileInput, RuleSet, ScoreMatrix};
use survivor_scores::season::{self, EpisodeNumber, Event, Season};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// League standings for every configured league (default if no subcommand)
    Standings {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show running totals per episode
        #[arg(long)]
        cumulative: bool,

        /// Compile through this episode instead of the latest aired one
        #[arg(short, long)]
        through: Option<EpisodeNumber>,

        /// Also save the compiled scores as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Season-wide points per castaway, independent of any league
    Castaways {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[arg(short, long)]
        through: Option<EpisodeNumber>,

        /// Key points by tribe instead of castaway
        #[arg(long)]
        by_tribe: bool,
    },
    /// Tribe rosters as of an episode
    Tribes {
        /// Episode to show (defaults to the latest aired one)
        #[arg(short, long)]
        episode: Option<EpisodeNumber>,
    },
    /// Episode schedule with air status
    Episodes,
    /// Validate config, rules, season and league files without scoring
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "survivor-scores")]
#[command(about = "Fantasy Survivor league score compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/survivor-scores/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Runs before the async runtime starts, while the process is still
/// single-threaded.
fn setup_logging(verbose: bool) {
    if verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "debug");
    }
    sensible_env_logger::init!();
}

fn exit_with_errors(heading: &str, errors: &[String], code: i32) -> ! {
    eprintln!("{}:", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(code);
}

/// Season events up to the horizon, for the league-independent views.
fn events_through(season: &Season, through: EpisodeNumber) -> Vec<Event> {
    season
        .events
        .iter()
        .filter(|event| event.episode <= through)
        .cloned()
        .collect()
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli);
}

#[tokio::main]
async fn run(cli: Cli) {
    let command = cli.command.unwrap_or(Commands::Standings {
        format: OutputFormat::Table,
        cumulative: false,
        through: None,
        output: None,
    });
    let start_time = Instant::now();

    // Load config
    let config_path = match cli.config.map(PathBuf::from) {
        Some(path) => path,
        None => match config::get_config_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    };
    let config: Config = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let airing_window = match config.airing_window() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!("Loaded config from {}", config_path.display());
        eprintln!("  Season: {}", config.season);
        for (i, league) in config.leagues.iter().enumerate() {
            eprintln!(
                "  League {}: {} ({})",
                i + 1,
                league.name.as_deref().unwrap_or("(unnamed)"),
                league.path
            );
        }
    }

    // Validate default rules at startup
    let default_rules: RuleSet = config.rules.clone().unwrap_or_default();
    if let Err(errors) = scoring::validate_rules(&default_rules) {
        exit_with_errors("Rule config errors", &errors, EXIT_CONFIG);
    }

    // Load and validate the season log
    let season_path = config::resolve_path(&config_path, &config.season);
    let season = match config::load_season(&season_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    if let Err(errors) = season::validate_season(&season) {
        exit_with_errors("Season errors", &errors, EXIT_INPUT);
    }

    let default_horizon = season::scoring_horizon(&season, Utc::now(), airing_window);
    if cli.verbose {
        eprintln!(
            "Season {}: {} events, scoring through episode {}",
            season.name,
            season.events.len(),
            default_horizon
        );
    }

    let use_colors = output::should_use_colors();

    match command {
        Commands::Standings {
            format,
            cumulative,
            through,
            output: output_path,
        } => {
            let through = through.unwrap_or(default_horizon);
            let leagues = load_leagues_or_exit(&config, &config_path);
            if leagues.is_empty() {
                eprintln!("No leagues configured in config file.");
                eprintln!("Add leagues to ~/.config/survivor-scores/config.yaml:");
                eprintln!("  leagues:");
                eprintln!("    - name: office");
                eprintln!("      path: office.yaml");
                std::process::exit(EXIT_CONFIG);
            }

            let compiled = match survivor_scores::batch::compile_leagues(
                Arc::new(season),
                leagues,
                &default_rules,
                through,
                cli.verbose,
            )
            .await
            {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let reports: Vec<LeagueReport> = compiled
                .iter()
                .map(|league| LeagueReport::new(&league.name, &league.scores, through))
                .collect();

            match format {
                OutputFormat::Table => {
                    for (i, league) in compiled.iter().enumerate() {
                        if i > 0 {
                            println!();
                        }
                        println!("{} (through episode {})", league.name, through);
                        let standings = league.scores.total.standings();
                        if cumulative {
                            let rows = league.scores.total.cumulative(through);
                            println!(
                                "{}",
                                output::format_episode_grid(&standings, &rows, true, use_colors)
                            );
                        } else {
                            println!("{}", output::format_standings_table(&standings, use_colors));
                        }
                    }
                }
                OutputFormat::Tsv => {
                    for league in &compiled {
                        let tsv = output::format_tsv(&league.scores.total.standings());
                        for line in tsv.lines() {
                            println!("{}\t{}", league.name, line);
                        }
                    }
                }
                OutputFormat::Json => match output::format_json(&reports) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }

            if let Some(path) = output_path {
                if let Err(e) = output::save_reports(&path, &reports) {
                    eprintln!("Export failed: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                if cli.verbose {
                    eprintln!("Saved {} league reports to {}", reports.len(), path.display());
                }
            }
        }
        Commands::Castaways {
            format,
            through,
            by_tribe,
        } => {
            let through = through.unwrap_or(default_horizon);
            let events = events_through(&season, through);
            let tribe_updates = season.tribe_timeline();
            let eliminations = season.elimination_log();
            let input = CompileInput {
                events: &events,
                tribe_updates: &tribe_updates,
                eliminations: &eliminations,
            };
            let attribution = if by_tribe {
                Attribution::Tribes
            } else {
                Attribution::Castaways
            };
            let scores: ScoreMatrix = scoring::compile_scores(&input, &attribution, &default_rules);
            let standings = scores.standings();

            match format {
                OutputFormat::Table => {
                    println!("{}", output::format_standings_table(&standings, use_colors))
                }
                OutputFormat::Tsv => println!("{}", output::format_tsv(&standings)),
                OutputFormat::Json => match output::format_json(&scores.to_sparse()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }
        }
        Commands::Tribes { episode } => {
            let episode = episode.unwrap_or(default_horizon);
            let rosters = season::tribe_rosters(
                &season.tribe_timeline(),
                &season.elimination_log(),
                episode,
            );
            println!("Tribes as of episode {}", episode);
            println!("{}", output::format_rosters(&rosters, use_colors));
        }
        Commands::Episodes => {
            println!(
                "{}",
                output::format_episode_list(&season.episodes, Utc::now(), airing_window, use_colors)
            );
        }
        Commands::Check => {
            let leagues = load_leagues_or_exit(&config, &config_path);
            let mut errors = Vec::new();
            for input in &leagues {
                let rules = input.league.rules.as_ref().unwrap_or(&default_rules);
                if let Err(league_errors) = scoring::validate_rules(rules) {
                    errors.extend(league_errors.into_iter().map(|e| format!("{}: {}", input.name, e)));
                }
                if let Err(league_errors) = survivor_scores::league::validate_league(&input.league, rules) {
                    errors.extend(league_errors.into_iter().map(|e| format!("{}: {}", input.name, e)));
                }
            }
            if !errors.is_empty() {
                exit_with_errors("League errors", &errors, EXIT_CONFIG);
            }

            if season.tribe_timeline().is_empty() {
                eprintln!("Warning: no tribe updates recorded; tribe events will score nothing");
            }
            if cli.verbose && season.elimination_log().is_empty() {
                eprintln!("No eliminations recorded yet");
            }
            for input in &leagues {
                if SelectionTimeline::from_updates(&input.league.selections).is_empty() {
                    eprintln!("Warning: {} has no selections; every member scores zero", input.name);
                }
            }
            println!(
                "OK: season {} ({} events), {} leagues",
                season.name,
                season.events.len(),
                leagues.len()
            );
        }
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

fn load_leagues_or_exit(config: &Config, config_path: &std::path::Path) -> Vec<LeagueInput> {
    match config::load_leagues(config, config_path) {
        Ok(leagues) => leagues,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}
