pub mod boxscore;
pub mod clean;
pub mod client;
pub mod espn;

pub use boxscore::{normalize_boxscore, normalize_boxscore_report};
pub use clean::{normalize_clean, normalize_clean_report};
pub use espn::RawDocument;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of ESPN wire format
// ---------------------------------------------------------------------------

/// Compact per-game record written to disk by the season downloader.
///
/// Keyed maps keep the order ESPN lists teams, stats and categories in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanGameRecord {
    pub game_id: String,
    pub date: String,
    pub status: String,
    pub venue: String,
    pub attendance: u64,
    pub teams: IndexMap<String, TeamInfo>,
    pub final_score: IndexMap<String, i64>,
    pub team_statistics: IndexMap<String, StatLine>,
    pub scoring_plays: Vec<ScoringPlay>,
    /// team abbreviation → category name → at most three players
    pub player_statistics: IndexMap<String, IndexMap<String, Vec<PlayerStats>>>,
}

/// Stat label → display value ("Total Yards" → "392").
pub type StatLine = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub home_away: HomeAway,
    pub record: String, // "10-7", empty when the source carries no record
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeAway {
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "away")]
    Away,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl HomeAway {
    pub fn parse(s: &str) -> Self {
        match s {
            "home" => HomeAway::Home,
            "away" => HomeAway::Away,
            _ => HomeAway::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeAway::Home => "home",
            HomeAway::Away => "away",
            HomeAway::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringPlay {
    pub quarter: i64,
    pub time: String,
    pub team: String,
    pub description: String,
    pub away_score: i64,
    pub home_score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub position: String,
    pub stats: StatLine,
}

/// Presentation-oriented box score: everything the summary carries, unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreRecord {
    pub game_info: GameInfo,
    pub team_stats: IndexMap<String, TeamBox>,
    pub scoring: Vec<BoxScoringPlay>,
    /// team abbreviation → category name → every athlete listed
    pub player_stats: IndexMap<String, IndexMap<String, Vec<PlayerLine>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub date: String,
    pub status: String,
    pub venue: String,
    pub attendance: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamBox {
    pub score: i64,
    pub home_away: HomeAway,
    pub record: String,
    pub statistics: StatLine,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScoringPlay {
    pub quarter: i64,
    pub time: String,
    pub team: String,
    pub description: String,
    pub score_home: i64,
    pub score_away: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub position: String,
    pub stats: Vec<serde_json::Value>, // raw, in the order ESPN lists them
}

// ---------------------------------------------------------------------------
// Normalization outcome
// ---------------------------------------------------------------------------

/// A best-effort record plus the condition that cut normalization short, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub record: T,
    pub error: Option<NormalizeError>,
}

impl<T> Normalized<T> {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_record(self) -> T {
        self.record
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// A score was present but could not be read as an integer.
    NonNumericScore { team: String, value: String },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::NonNumericScore { team, value } => {
                write!(f, "non-numeric score {value:?} for team {team:?}")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}
