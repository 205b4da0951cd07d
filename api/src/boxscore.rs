//! Game summary → [`BoxScoreRecord`]: the unfiltered, presentation-oriented view.

use crate::clean::stat_line;
use crate::espn::{self, RawDocument};
use crate::{
    BoxScoreRecord, BoxScoringPlay, GameInfo, HomeAway, NormalizeError, Normalized, PlayerLine,
    TeamBox,
};
use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

pub fn normalize_boxscore(summary: &RawDocument) -> BoxScoreRecord {
    let normalized = normalize_boxscore_report(summary);
    if let Some(err) = &normalized.error {
        warn!("error extracting box score data: {err}");
    }
    normalized.into_record()
}

pub fn normalize_boxscore_report(summary: &RawDocument) -> Normalized<BoxScoreRecord> {
    let mut record = BoxScoreRecord::default();
    let error = fill(&mut record, summary).err();
    Normalized { record, error }
}

/// An unreadable score is zeroed and reported; the rest of the box score is still built.
fn fill(record: &mut BoxScoreRecord, summary: &Value) -> Result<(), NormalizeError> {
    let mut bad_score = None;

    if let Some(competition) = espn::lookup(summary, "/header/competitions/0") {
        record.game_info = GameInfo {
            date: espn::text(competition, "/date"),
            status: espn::text(competition, "/status/type/description"),
            venue: espn::text(competition, "/venue/fullName"),
            attendance: espn::attendance(competition, "/attendance"),
        };

        for competitor in espn::items(competition, "/competitors") {
            let abbr = espn::text(competitor, "/team/abbreviation");
            let score = espn::score(competitor, &abbr).unwrap_or_else(|err| {
                bad_score.get_or_insert(err);
                0
            });
            record.team_stats.insert(
                abbr,
                TeamBox {
                    score,
                    home_away: HomeAway::parse(&espn::text(competitor, "/homeAway")),
                    record: espn::first_text(
                        competitor,
                        &["/record/0/summary", "/records/0/summary"],
                    ),
                    statistics: Default::default(),
                },
            );
        }
    }

    for (idx, team) in espn::items(summary, "/boxscore/teams").iter().enumerate() {
        // Only a missing key gets a positional name; an empty abbreviation stays empty.
        let name = match espn::lookup(team, "/team/abbreviation") {
            Some(abbr) => espn::scalar_text(abbr),
            None => format!("Team{}", idx + 1),
        };
        record.team_stats.entry(name).or_default().statistics = stat_line(team);
    }

    for team_players in espn::items(summary, "/boxscore/players") {
        let abbr = espn::text(team_players, "/team/abbreviation");
        record
            .player_stats
            .insert(abbr, all_player_categories(team_players));
    }

    record.scoring = espn::items(summary, "/scoringPlays")
        .iter()
        .map(|play| BoxScoringPlay {
            quarter: espn::int(play, "/period/number"),
            time: espn::text(play, "/clock/displayValue"),
            team: espn::text(play, "/team/abbreviation"),
            description: espn::text(play, "/text"),
            score_home: espn::int(play, "/homeScore"),
            score_away: espn::int(play, "/awayScore"),
        })
        .collect();

    bad_score.map_or(Ok(()), Err)
}

fn all_player_categories(team_players: &Value) -> IndexMap<String, Vec<PlayerLine>> {
    espn::items(team_players, "/statistics")
        .iter()
        .map(|category| {
            let players = espn::items(category, "/athletes")
                .iter()
                .map(|athlete| PlayerLine {
                    name: espn::text(athlete, "/athlete/displayName"),
                    position: espn::text(athlete, "/athlete/position/abbreviation"),
                    stats: espn::items(athlete, "/stats").to_vec(),
                })
                .collect();
            (espn::text(category, "/name"), players)
        })
        .collect()
}
