mod draw;
mod season;
mod settings;

use crate::season::{SeasonDownloader, write_json};
use crate::settings::AppSettings;
use log::warn;
use nfl_api::client::{NflApi, SeasonType};
use nfl_api::espn;
use nfl_api::{normalize_boxscore, normalize_clean};
use std::path::Path;

const DEFAULT_SEASON: u16 = 2023; // last complete season
const SHOWCASE_FILE: &str = "game_summary.json";

#[derive(Debug, PartialEq)]
enum Command {
    Showcase,
    DownloadSeason { year: u16 },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();

    let settings = AppSettings::load();
    env_logger::Builder::new()
        .filter_level(settings.log_level)
        .format_timestamp(None)
        .init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(arg) => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    let api = NflApi::new();
    match command {
        Command::Help => println!("{}", usage_text()),
        Command::Version => println!("nflgd {}", env!("CARGO_PKG_VERSION")),
        Command::DownloadSeason { year } => {
            print_banner();
            let downloader =
                SeasonDownloader::new(&api, &settings.output_dir, settings.request_delay);
            let report = downloader.download(year).await?;
            report.print(&settings.output_dir);
        }
        Command::Showcase => {
            print_banner();
            run_showcase(&api).await?;
            print_footer();
        }
    }

    Ok(())
}

/// `Err` carries the argument that could not be understood.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let Some(arg) = args.next() else {
        return Ok(Command::Showcase);
    };

    match arg.as_str() {
        "-h" | "--help" => Ok(Command::Help),
        "-V" | "--version" => Ok(Command::Version),
        "download-season" => {
            let year = match args.next() {
                None => DEFAULT_SEASON,
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("Invalid year: {raw}, using {DEFAULT_SEASON}");
                    DEFAULT_SEASON
                }),
            };
            Ok(Command::DownloadSeason { year })
        }
        _ => Err(arg),
    }
}

fn usage_text() -> &'static str {
    "nflgd - NFL game data from ESPN's public API

Usage:
  nflgd                         show a few week 1 games, one box score and some plays
  nflgd download-season [year]  save every game of a season as clean JSON (default 2023)
  nflgd --help
  nflgd --version

Environment:
  NFLGD_OUTPUT_DIR         Directory for downloaded games (default nflgames)
  NFLGD_LOG                Log level: error, warn, info, debug, trace (default info)
  NFLGD_REQUEST_DELAY_MS   Pause between game downloads (default 500)"
}

fn print_banner() {
    println!("NFL Data Fetcher - Using ESPN's Public API");
    println!("{}", "=".repeat(50));
}

fn print_footer() {
    println!("\n{}", "=".repeat(50));
    println!("Note: This uses ESPN's public API endpoints.");
    println!("\nTo download all games from a season, run:");
    println!("  nflgd download-season [year]");
    println!("\nExample:");
    println!("  nflgd download-season 2023");
    println!("\nThis will save all games to the 'nflgames' folder.");
}

/// Week 1 of 2024: a few scores, one full box score, a handful of plays.
async fn run_showcase(api: &NflApi) -> anyhow::Result<()> {
    println!("\n1. Fetching recent NFL games from 2024 season...");
    let events = api
        .fetch_scoreboard(2024, SeasonType::Regular, Some(1))
        .await
        .map(|board| board.events.unwrap_or_default())
        .unwrap_or_else(|e| {
            warn!("Error fetching scoreboard: {e}");
            Vec::new()
        });

    let Some(first) = events.first() else {
        println!("No games found or error fetching data");
        println!("\nTrying with a different week...");
        if let Ok(board) = api.fetch_scoreboard(2023, SeasonType::Regular, Some(10)).await {
            let count = board.events.map(|e| e.len()).unwrap_or_default();
            println!("Found {count} games from 2023 Week 10");
        }
        return Ok(());
    };

    println!("Found {} games", events.len());
    for (i, event) in events.iter().take(3).enumerate() {
        println!("\nGame {}:", i + 1);
        let competitors = espn::items(event, "/competitions/0/competitors");
        if let [away, home, ..] = competitors {
            println!(
                "  {} @ {}: {}-{}",
                espn::text(away, "/team/abbreviation"),
                espn::text(home, "/team/abbreviation"),
                score_or_zero(away),
                score_or_zero(home),
            );
            println!("  Event ID: {}", espn::text(event, "/id"));
            println!("  Date: {}", or_na(espn::text(event, "/date")));
            println!("  Status: {}", or_na(espn::text(event, "/status/type/description")));
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("2. Fetching detailed box score for the first game...");
    let event_id = espn::text(first, "/id");
    match api.fetch_game_summary(&event_id).await {
        Ok(summary) if !espn::is_blank(&summary) => {
            print!("{}", draw::render_box_score(&normalize_boxscore(&summary)));

            let clean = normalize_clean(&summary, Some(first));
            write_json(Path::new(SHOWCASE_FILE), &clean)?;
            println!("\n[Clean box score data saved to {SHOWCASE_FILE}]");
        }
        Ok(_) => warn!("Empty game summary for event {event_id}"),
        Err(e) => warn!("Error fetching game summary: {e}"),
    }

    println!("\n{}", "=".repeat(50));
    println!("3. Fetching play-by-play data (first 10 plays)...");
    match api.fetch_play_by_play(&event_id, 10).await {
        Ok(plays) => {
            let items = plays.items.unwrap_or_default();
            println!("Retrieved {} plays", items.len());
            for (i, play) in items.iter().take(5).enumerate() {
                println!("  Play {}: {}", i + 1, espn::play_text(play));
            }
        }
        Err(e) => warn!("Error fetching play-by-play: {e}"),
    }

    Ok(())
}

fn score_or_zero(competitor: &espn::RawDocument) -> String {
    or_default(espn::text(competitor, "/score"), "0")
}

fn or_na(s: String) -> String {
    or_default(s, "N/A")
}

fn or_default(s: String, fallback: &str) -> String {
    if s.is_empty() { fallback.to_owned() } else { s }
}
