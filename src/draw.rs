use nfl_api::{BoxScoreRecord, GameInfo};
use std::collections::BTreeSet;
use std::fmt::Write;

const WIDE: usize = 80;
const NARROW: usize = 40;

/// Plain-text box score for the terminal.
pub fn render_box_score(box_score: &BoxScoreRecord) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_box_score(&mut out, box_score);
    out
}

fn write_box_score(out: &mut String, box_score: &BoxScoreRecord) -> std::fmt::Result {
    writeln!(out, "\n{}", "=".repeat(WIDE))?;
    writeln!(out, "NFL GAME BOX SCORE")?;
    writeln!(out, "{}", "=".repeat(WIDE))?;

    let info = &box_score.game_info;
    if *info != GameInfo::default() {
        writeln!(out, "\nDate: {}", or_na(&info.date))?;
        writeln!(out, "Venue: {}", or_na(&info.venue))?;
        writeln!(out, "Attendance: {}", thousands(info.attendance))?;
        writeln!(out, "Status: {}", or_na(&info.status))?;
    }

    if !box_score.team_stats.is_empty() {
        section(out, "FINAL SCORE")?;
        for (team, stats) in &box_score.team_stats {
            writeln!(out, "{team}: {} ({})", stats.score, title_case(stats.home_away.as_str()))?;
        }

        section(out, "TEAM STATISTICS")?;
        let teams: Vec<_> = box_score.team_stats.iter().collect();
        if teams.len() >= 2 && teams.iter().all(|(_, t)| !t.statistics.is_empty()) {
            let (team1, left) = teams[0];
            let (team2, right) = teams[1];
            let labels: BTreeSet<&String> =
                left.statistics.keys().chain(right.statistics.keys()).collect();

            writeln!(out, "\n{:<30} {:>10} {:>10}", "Stat", team1, team2)?;
            writeln!(out, "{}", "-".repeat(52))?;
            for label in labels {
                let v1 = left.statistics.get(label).map_or("-", String::as_str);
                let v2 = right.statistics.get(label).map_or("-", String::as_str);
                writeln!(out, "{label:<30} {v1:>10} {v2:>10}")?;
            }
        }
    }

    if !box_score.scoring.is_empty() {
        section(out, "SCORING PLAYS")?;
        for play in &box_score.scoring {
            writeln!(out, "Q{} {}: {} - {}", play.quarter, play.time, play.team, play.description)?;
            writeln!(out, "  Score: Away {} - Home {}", play.score_away, play.score_home)?;
        }
    }

    if !box_score.player_stats.is_empty() {
        section(out, "TOP PERFORMERS")?;
        for (team, categories) in &box_score.player_stats {
            writeln!(out, "\n{team}:")?;
            // Just the first listed player of the first non-empty category.
            if let Some((category, player)) = categories
                .iter()
                .find_map(|(name, players)| players.first().map(|p| (name, p)))
            {
                writeln!(out, "  {category}: {} ({})", player.name, player.position)?;
            }
        }
    }

    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "\n{}", "-".repeat(NARROW))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(NARROW))
}

fn or_na(s: &str) -> &str {
    if s.is_empty() { "N/A" } else { s }
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}
