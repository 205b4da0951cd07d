//! Game summary → [`CleanGameRecord`].
//!
//! Identity, status, venue and the final score come from the scoreboard event
//! when one is supplied, otherwise from the summary header. Statistics, scoring
//! plays and player lines always come from the summary.

use crate::espn::{self, RawDocument};
use crate::{
    CleanGameRecord, HomeAway, NormalizeError, Normalized, PlayerStats, ScoringPlay, StatLine,
    TeamInfo,
};
use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

/// Player categories kept in the clean record, matched case-insensitively.
const KEY_CATEGORIES: [&str; 4] = ["passing", "rushing", "receiving", "defensive"];
const TOP_PLAYERS: usize = 3;

const PASSING_LABELS: &[&str] = &["C/ATT", "YDS", "AVG", "TD", "INT", "SACKS", "QBR", "RTG"];
const RUSHING_LABELS: &[&str] = &["CAR", "YDS", "AVG", "TD", "LONG"];
const RECEIVING_LABELS: &[&str] = &["REC", "YDS", "AVG", "TD", "LONG", "TGTS"];

/// Normalize a game summary, logging (not returning) anything that went wrong.
pub fn normalize_clean(summary: &RawDocument, event: Option<&RawDocument>) -> CleanGameRecord {
    let normalized = normalize_clean_report(summary, event);
    if let Some(err) = &normalized.error {
        warn!("error extracting clean game data: {err}");
    }
    normalized.into_record()
}

/// Same as [`normalize_clean`], but hands the diagnostic back to the caller.
pub fn normalize_clean_report(
    summary: &RawDocument,
    event: Option<&RawDocument>,
) -> Normalized<CleanGameRecord> {
    let mut record = CleanGameRecord::default();
    let error = fill(&mut record, summary, event.filter(|e| !espn::is_blank(e))).err();
    Normalized { record, error }
}

fn fill(
    record: &mut CleanGameRecord,
    summary: &Value,
    event: Option<&Value>,
) -> Result<(), NormalizeError> {
    match event {
        Some(event) => read_event(record, event)?,
        None => read_header(record, summary)?,
    }

    for team in espn::items(summary, "/boxscore/teams") {
        let abbr = espn::text(team, "/team/abbreviation");
        if !abbr.is_empty() {
            record.team_statistics.insert(abbr, stat_line(team));
        }
    }

    record.scoring_plays = espn::items(summary, "/scoringPlays")
        .iter()
        .map(|play| ScoringPlay {
            quarter: espn::int(play, "/period/number"),
            time: espn::text(play, "/clock/displayValue"),
            team: espn::text(play, "/team/abbreviation"),
            description: espn::text(play, "/text"),
            away_score: espn::int(play, "/awayScore"),
            home_score: espn::int(play, "/homeScore"),
        })
        .collect();

    for team_players in espn::items(summary, "/boxscore/players") {
        let abbr = espn::text(team_players, "/team/abbreviation");
        if !abbr.is_empty() {
            record
                .player_statistics
                .insert(abbr, key_player_categories(team_players));
        }
    }

    Ok(())
}

fn read_event(record: &mut CleanGameRecord, event: &Value) -> Result<(), NormalizeError> {
    record.game_id = espn::text(event, "/id");
    record.date = espn::text(event, "/date");
    record.status = espn::text(event, "/status/type/description");

    let Some(competition) = espn::lookup(event, "/competitions/0") else {
        return Ok(());
    };
    record.venue = espn::text(competition, "/venue/fullName");
    record.attendance = espn::attendance(competition, "/attendance");
    read_competitors(record, competition, |c| espn::text(c, "/records/0/summary"))
}

fn read_header(record: &mut CleanGameRecord, summary: &Value) -> Result<(), NormalizeError> {
    let Some(competition) = espn::lookup(summary, "/header/competitions/0") else {
        return Ok(());
    };
    record.date = espn::text(competition, "/date");
    record.status = espn::text(competition, "/status/type/description");
    record.venue = espn::text(competition, "/venue/fullName");
    record.attendance = espn::attendance(competition, "/attendance");
    // The header carries no enriched record data.
    read_competitors(record, competition, |_| String::new())
}

fn read_competitors(
    record: &mut CleanGameRecord,
    competition: &Value,
    team_record: impl Fn(&Value) -> String,
) -> Result<(), NormalizeError> {
    for competitor in espn::items(competition, "/competitors") {
        let abbr = espn::text(competitor, "/team/abbreviation");
        record.teams.insert(
            abbr.clone(),
            TeamInfo {
                name: espn::text(competitor, "/team/displayName"),
                home_away: HomeAway::parse(&espn::text(competitor, "/homeAway")),
                record: team_record(competitor),
            },
        );
        let score = espn::score(competitor, &abbr)?;
        record.final_score.insert(abbr, score);
    }
    Ok(())
}

/// `label` (else `name`) → `displayValue` (else `value`), later labels overwrite.
pub(crate) fn stat_line(team: &Value) -> StatLine {
    espn::items(team, "/statistics")
        .iter()
        .map(|stat| {
            (
                espn::first_text(stat, &["/label", "/name"]),
                espn::first_text(stat, &["/displayValue", "/value"]),
            )
        })
        .collect()
}

fn key_player_categories(team_players: &Value) -> IndexMap<String, Vec<PlayerStats>> {
    let mut categories = IndexMap::new();

    for category in espn::items(team_players, "/statistics") {
        let name = espn::text(category, "/name");
        let lowered = name.to_lowercase();
        if !KEY_CATEGORIES.contains(&lowered.as_str()) {
            continue;
        }

        let labels = category_labels(category);
        let players: Vec<PlayerStats> = espn::items(category, "/athletes")
            .iter()
            .take(TOP_PLAYERS)
            .map(|athlete| PlayerStats {
                name: espn::text(athlete, "/athlete/displayName"),
                position: espn::text(athlete, "/athlete/position/abbreviation"),
                stats: label_stats(&lowered, &labels, espn::items(athlete, "/stats")),
            })
            .collect();

        if !players.is_empty() {
            categories.insert(name, players);
        }
    }

    categories
}

/// `labels` if non-empty, else `keys`, else nothing.
fn category_labels(category: &Value) -> Vec<String> {
    ["/labels", "/keys"]
        .iter()
        .map(|p| espn::items(category, p))
        .find(|labels| !labels.is_empty())
        .unwrap_or_default()
        .iter()
        .map(espn::scalar_text)
        .collect()
}

fn label_stats(category: &str, labels: &[String], raw: &[Value]) -> StatLine {
    if !labels.is_empty() && labels.len() == raw.len() {
        return labels
            .iter()
            .cloned()
            .zip(raw.iter().map(espn::scalar_text))
            .collect();
    }

    match fallback_labels(category) {
        Some(fixed) => fixed
            .iter()
            .map(|l| l.to_string())
            .zip(raw.iter().map(espn::scalar_text))
            .collect(),
        None => raw
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("stat_{}", i + 1), espn::scalar_text(v)))
            .collect(),
    }
}

fn fallback_labels(category: &str) -> Option<&'static [&'static str]> {
    match category {
        "passing" => Some(PASSING_LABELS),
        "rushing" => Some(RUSHING_LABELS),
        "receiving" => Some(RECEIVING_LABELS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SUMMARY_JSON: &str = include_str!("../fixtures/summary_bal_at_kc.json");
    const EVENT_JSON: &str = include_str!("../fixtures/event_bal_at_kc.json");

    fn fixtures() -> (Value, Value) {
        (
            serde_json::from_str(SUMMARY_JSON).expect("summary fixture should parse"),
            serde_json::from_str(EVENT_JSON).expect("event fixture should parse"),
        )
    }

    fn stats(pairs: &[(&str, &str)]) -> StatLine {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_document_yields_all_defaults() {
        let normalized = normalize_clean_report(&json!({}), None);
        assert!(!normalized.is_degraded());
        assert_eq!(normalized.record, CleanGameRecord::default());

        let from_null = normalize_clean(&Value::Null, Some(&Value::Null));
        assert_eq!(from_null, CleanGameRecord::default());
    }

    #[test]
    fn event_takes_priority_over_header() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));

        assert_eq!(record.game_id, "401671789");
        assert_eq!(record.venue, "GEHA Field at Arrowhead Stadium");
        assert_eq!(record.attendance, 73_523);
        assert_eq!(record.status, "Final");
        assert_eq!(record.teams["KC"].record, "1-0");
        assert_eq!(record.teams["BAL"].home_away, HomeAway::Away);
        assert_eq!(record.final_score["KC"], 27);
        assert_eq!(record.final_score["BAL"], 20);
    }

    #[test]
    fn header_fallback_has_no_game_id_or_records() {
        let (summary, _) = fixtures();
        let record = normalize_clean(&summary, None);

        assert_eq!(record.game_id, "");
        assert_eq!(record.venue, "Arrowhead Stadium");
        assert_eq!(record.attendance, 73_000);
        assert_eq!(record.date, "2024-09-06T00:20Z");
        assert_eq!(record.teams["KC"].name, "Kansas City Chiefs");
        assert_eq!(record.teams["KC"].record, "");
        assert_eq!(record.final_score["BAL"], 20);
    }

    #[test]
    fn empty_event_object_falls_back_to_header() {
        let (summary, _) = fixtures();
        let record = normalize_clean(&summary, Some(&json!({})));
        assert_eq!(record.venue, "Arrowhead Stadium");
    }

    #[test]
    fn event_without_venue_does_not_borrow_from_header() {
        let (summary, _) = fixtures();
        let event = json!({"id": "1", "competitions": [{"competitors": []}]});
        let record = normalize_clean(&summary, Some(&event));
        assert_eq!(record.venue, "");
        assert_eq!(record.attendance, 0);
        assert!(record.teams.is_empty());
    }

    #[test]
    fn team_statistics_prefer_label_and_display_value() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));
        let bal = &record.team_statistics["BAL"];
        assert_eq!(bal["Total Yards"], "452");
        assert_eq!(bal["possessionTime"], "31:01");
        assert_eq!(bal.len(), 4);
    }

    #[test]
    fn scoring_plays_keep_source_order_and_defaults() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));
        assert_eq!(record.scoring_plays.len(), 3);
        assert_eq!(record.scoring_plays[0].team, "BAL");
        assert_eq!(record.scoring_plays[1].home_score, 7);
        assert_eq!(record.scoring_plays[2].quarter, 4);
        assert_eq!(record.scoring_plays[2].team, "");
        assert_eq!(record.scoring_plays[2].away_score, 20);
    }

    #[test]
    fn labels_zip_when_lengths_match() {
        let summary = json!({"boxscore": {"players": [{
            "team": {"abbreviation": "BUF"},
            "statistics": [{
                "name": "passing",
                "labels": ["C/ATT", "YDS"],
                "athletes": [{"athlete": {"displayName": "Josh Allen"}, "stats": ["18/25", "210"]}]
            }]
        }]}});
        let record = normalize_clean(&summary, None);
        assert_eq!(
            record.player_statistics["BUF"]["passing"][0].stats,
            stats(&[("C/ATT", "18/25"), ("YDS", "210")])
        );
    }

    #[test]
    fn rushing_without_labels_uses_fixed_list() {
        let summary = json!({"boxscore": {"players": [{
            "team": {"abbreviation": "BUF"},
            "statistics": [{
                "name": "rushing",
                "athletes": [{"athlete": {"displayName": "James Cook"}, "stats": ["15", "80", "5.3"]}]
            }]
        }]}});
        let record = normalize_clean(&summary, None);
        assert_eq!(
            record.player_statistics["BUF"]["rushing"][0].stats,
            stats(&[("CAR", "15"), ("YDS", "80"), ("AVG", "5.3")])
        );
    }

    #[test]
    fn mismatched_labels_fall_back_and_truncate() {
        let summary = json!({"boxscore": {"players": [{
            "team": {"abbreviation": "BUF"},
            "statistics": [
                {
                    "name": "Receiving",
                    "labels": ["REC", "YDS"],
                    "athletes": [{"stats": ["5", "61", "12.2", "1", "22", "7", "extra"]}]
                },
                {
                    "name": "defensive",
                    "athletes": [{"stats": ["4", "3"]}]
                }
            ]
        }]}});
        let record = normalize_clean(&summary, None);
        let receiving = &record.player_statistics["BUF"]["Receiving"][0].stats;
        assert_eq!(receiving.len(), 6);
        assert_eq!(receiving["TGTS"], "7");
        assert_eq!(
            record.player_statistics["BUF"]["defensive"][0].stats,
            stats(&[("stat_1", "4"), ("stat_2", "3")])
        );
    }

    #[test]
    fn only_key_categories_are_kept() {
        let summary = json!({"boxscore": {"players": [{
            "team": {"abbreviation": "DEN"},
            "statistics": [
                {"name": "Passing", "athletes": [{"stats": ["1/1"]}]},
                {"name": "Kicking", "athletes": [{"stats": ["1/1"]}]},
                {"name": "Defensive", "athletes": [{"stats": ["3"]}]}
            ]
        }]}});
        let record = normalize_clean(&summary, None);
        let keys: Vec<&str> = record.player_statistics["DEN"].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Passing", "Defensive"]);
    }

    #[test]
    fn at_most_three_players_in_source_order() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));
        let rushing = &record.player_statistics["BAL"]["rushing"];
        let names: Vec<&str> = rushing.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lamar Jackson", "Derrick Henry", "Justice Hill"]);
        assert_eq!(rushing[1].position, "RB");
        assert_eq!(rushing[1].stats["LONG"], "9");
    }

    #[test]
    fn categories_without_players_are_omitted() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));
        let kc = &record.player_statistics["KC"];
        assert!(kc.contains_key("passing"));
        assert!(kc.contains_key("defensive"));
        assert!(!kc.contains_key("interceptions"));
        // keys are used when labels are missing
        assert_eq!(kc["passing"][0].stats["passingYards"], "291");
    }

    #[test]
    fn missing_boxscore_leaves_statistics_empty() {
        let (mut summary, event) = fixtures();
        summary.as_object_mut().unwrap().remove("boxscore");
        let record = normalize_clean(&summary, Some(&event));
        assert!(record.team_statistics.is_empty());
        assert!(record.player_statistics.is_empty());
        assert_eq!(record.scoring_plays.len(), 3);
    }

    #[test]
    fn duplicate_abbreviation_is_last_wins() {
        let event = json!({"competitions": [{"competitors": [
            {"team": {"abbreviation": "NYG", "displayName": "First"}, "score": "3"},
            {"team": {"abbreviation": "NYG", "displayName": "Second"}, "score": 10}
        ]}]});
        let record = normalize_clean(&json!({}), Some(&event));
        assert_eq!(record.teams.len(), 1);
        assert_eq!(record.teams["NYG"].name, "Second");
        assert_eq!(record.final_score["NYG"], 10);
    }

    #[test]
    fn non_numeric_score_returns_partial_record() {
        let (summary, _) = fixtures();
        let event = json!({
            "id": "9",
            "competitions": [{
                "venue": {"fullName": "Lambeau Field"},
                "competitors": [
                    {"team": {"abbreviation": "GB"}, "score": "14"},
                    {"team": {"abbreviation": "CHI"}, "score": "--"}
                ]
            }]
        });
        let normalized = normalize_clean_report(&summary, Some(&event));

        assert_eq!(
            normalized.error,
            Some(NormalizeError::NonNumericScore { team: "CHI".into(), value: "\"--\"".into() })
        );
        let record = normalized.record;
        assert_eq!(record.venue, "Lambeau Field");
        assert_eq!(record.final_score.get("GB"), Some(&14));
        assert!(record.teams.contains_key("CHI"));
        assert!(!record.final_score.contains_key("CHI"));
        assert!(record.team_statistics.is_empty());
        assert!(record.scoring_plays.is_empty());
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let (summary, event) = fixtures();
        assert_eq!(
            normalize_clean(&summary, Some(&event)),
            normalize_clean(&summary, Some(&event))
        );
    }

    #[test]
    fn maps_keep_source_order() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));

        let teams: Vec<&str> = record.teams.keys().map(String::as_str).collect();
        assert_eq!(teams, vec!["KC", "BAL"]);
        let labels: Vec<&str> = record.team_statistics["BAL"].keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["1st Downs", "Total Yards", "possessionTime", "Turnovers"]);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.find("\"YDS\"").unwrap() < json.find("\"AVG\"").unwrap());
    }

    #[test]
    fn serializes_home_away_as_plain_strings() {
        let (summary, event) = fixtures();
        let record = normalize_clean(&summary, Some(&event));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["teams"]["KC"]["home_away"], "home");
        assert_eq!(json["attendance"], 73_523);
    }
}
