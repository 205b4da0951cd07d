use crate::espn::{PlaysResponse, RawDocument, ScoreboardResponse};
use log::debug;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";
const ESPN_CORE_V2: &str = "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl";

/// NFL API client backed by ESPN's public endpoints.
#[derive(Debug, Clone)]
pub struct NflApi {
    client: Client,
    timeout: Duration,
    site_url: String,
    core_url: String,
}

impl Default for NflApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("nflgd/0.1 (nfl game data downloader)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            site_url: ESPN_SITE_V2.to_owned(),
            core_url: ESPN_CORE_V2.to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
        }
    }
}

/// ESPN's `seasontype` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonType {
    Preseason,
    Regular,
    Postseason,
}

impl SeasonType {
    pub fn code(&self) -> u8 {
        match self {
            SeasonType::Preseason => 1,
            SeasonType::Regular => 2,
            SeasonType::Postseason => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeasonType::Preseason => "Preseason",
            SeasonType::Regular => "Regular Season",
            SeasonType::Postseason => "Postseason",
        }
    }
}

impl NflApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client somewhere other than ESPN (mirrors, test servers).
    pub fn with_base_urls(site_url: impl Into<String>, core_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_owned(),
            core_url: core_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Scoreboard for one season, optionally narrowed to a single week.
    pub async fn fetch_scoreboard(
        &self,
        year: u16,
        season_type: SeasonType,
        week: Option<u8>,
    ) -> ApiResult<ScoreboardResponse> {
        let url = scoreboard_url(&self.site_url, year, season_type, week);
        self.get(&url).await
    }

    /// Full game summary (header, box score, scoring plays) for one event.
    pub async fn fetch_game_summary(&self, event_id: &str) -> ApiResult<RawDocument> {
        let url = format!("{}/summary?event={event_id}", self.site_url);
        self.get(&url).await
    }

    pub async fn fetch_team_statistics(
        &self,
        event_id: &str,
        team_id: &str,
    ) -> ApiResult<RawDocument> {
        let url = format!(
            "{}/events/{event_id}/competitions/{event_id}/competitors/{team_id}/statistics",
            self.core_url
        );
        self.get(&url).await
    }

    pub async fn fetch_play_by_play(&self, event_id: &str, limit: u32) -> ApiResult<PlaysResponse> {
        let url = format!(
            "{}/events/{event_id}/competitions/{event_id}/plays?limit={limit}",
            self.core_url
        );
        self.get(&url).await
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

fn scoreboard_url(base: &str, year: u16, season_type: SeasonType, week: Option<u8>) -> String {
    let mut url = format!("{base}/scoreboard?dates={year}&seasontype={}", season_type.code());
    if let Some(week) = week {
        url.push_str(&format!("&week={week}"));
    }
    url
}
