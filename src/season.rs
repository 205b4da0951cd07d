use anyhow::Context;
use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use nfl_api::client::{NflApi, SeasonType};
use nfl_api::espn::{self, RawDocument};
use nfl_api::normalize_clean;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Regular season then playoffs: (season type, number of weeks).
pub const SEASON_STRUCTURE: [(SeasonType, u8); 2] =
    [(SeasonType::Regular, 18), (SeasonType::Postseason, 5)];

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub failed: Vec<String>,
    pub files_in_dir: usize,
}

pub struct SeasonDownloader<'a> {
    api: &'a NflApi,
    output_dir: PathBuf,
    delay: Duration,
}

impl<'a> SeasonDownloader<'a> {
    pub fn new(api: &'a NflApi, output_dir: impl Into<PathBuf>, delay: Duration) -> Self {
        Self { api, output_dir: output_dir.into(), delay }
    }

    /// Download every game of `year` into one clean JSON file per game.
    /// Files that already exist are left alone, so a rerun resumes.
    pub async fn download(&self, year: u16) -> anyhow::Result<DownloadReport> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)
                .with_context(|| format!("could not create {}", self.output_dir.display()))?;
            println!("Created directory: {}", self.output_dir.display());
        }

        println!("\nDownloading all games from {year} NFL season...");
        println!("{}", "=".repeat(60));

        let mut report = DownloadReport::default();

        for (season_type, weeks) in SEASON_STRUCTURE {
            println!("\n{}:", season_type.label());
            println!("{}", "-".repeat(40));

            for week in 1..=weeks {
                println!("\nWeek {week}:");
                let events = match self.api.fetch_scoreboard(year, season_type, Some(week)).await {
                    Ok(board) => board.events.unwrap_or_default(),
                    Err(e) => {
                        warn!("Error fetching scoreboard: {e}");
                        Vec::new()
                    }
                };

                if events.is_empty() {
                    println!("  No games found for week {week}");
                    continue;
                }
                println!("  Found {} games", events.len());

                for event in &events {
                    self.download_game(event, week, &mut report).await;
                }
            }
        }

        report.files_in_dir = count_json_files(&self.output_dir);
        Ok(report)
    }

    async fn download_game(&self, event: &RawDocument, week: u8, report: &mut DownloadReport) {
        let (away, home) = matchup(event);
        let path = self.output_dir.join(game_file_name(event));

        if path.exists() {
            println!("    ✓ {away} @ {home} - Already downloaded");
            return;
        }

        let event_id = espn::text(event, "/id");
        if event_id.is_empty() {
            println!("    ✗ Error: event has no id");
            report.failed.push(format!("Game ID unknown (Week {week})"));
            return;
        }

        print!("    Downloading: {away} @ {home}...");
        if let Err(e) = std::io::stdout().flush() {
            debug!("could not flush stdout: {e}");
        }
        let summary = match self.api.fetch_game_summary(&event_id).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Error fetching game summary: {e}");
                RawDocument::Null
            }
        };

        if espn::is_blank(&summary) {
            println!(" ✗ Failed to fetch data");
            report.failed.push(format!("{away} @ {home} (Week {week})"));
            return;
        }

        let record = normalize_clean(&summary, Some(event));
        match write_json(&path, &record) {
            Ok(()) => {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                println!(" ✓ Saved as {name}");
                report.downloaded += 1;
                tokio::time::sleep(self.delay).await;
            }
            Err(e) => {
                println!(" ✗ Error: {e:#}");
                report.failed.push(format!("Game ID {event_id} (Week {week})"));
            }
        }
    }
}

impl DownloadReport {
    pub fn print(&self, output_dir: &Path) {
        println!("\n{}", "=".repeat(60));
        println!("DOWNLOAD COMPLETE");
        println!("{}", "=".repeat(60));
        println!("Total games downloaded: {}", self.downloaded);
        println!("Files saved to: {}/", output_dir.display());

        if !self.failed.is_empty() {
            println!("\nFailed to download {} games:", self.failed.len());
            for game in &self.failed {
                println!("  - {game}");
            }
        }

        println!("\nTotal files in directory: {}", self.files_in_dir);
    }
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("could not write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// `YYYYMMDD_AWAY_at_HOME.json`
pub fn game_file_name(event: &RawDocument) -> String {
    let (away, home) = matchup(event);
    format!("{}_{away}_at_{home}.json", date_stamp(&espn::text(event, "/date")))
}

/// Away and home abbreviations; both empty unless the event lists two teams.
fn matchup(event: &RawDocument) -> (String, String) {
    let competitors = espn::items(event, "/competitions/0/competitors");
    let mut away = String::new();
    let mut home = String::new();
    if competitors.len() >= 2 {
        for competitor in competitors {
            let abbr = espn::text(competitor, "/team/abbreviation");
            if espn::text(competitor, "/homeAway") == "home" {
                home = abbr;
            } else {
                away = abbr;
            }
        }
    }
    (away, home)
}

fn date_stamp(date: &str) -> String {
    if date.is_empty() {
        return "unknown_date".into();
    }
    // ESPN usually drops the seconds: "2024-09-06T00:20Z".
    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%MZ").map(|dt| dt.date()));
    match parsed {
        Ok(day) => day.format("%Y%m%d").to_string(),
        Err(_) => date.chars().take(10).collect::<String>().replace('-', ""),
    }
}

fn count_json_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0)
}
