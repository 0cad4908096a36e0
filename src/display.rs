use chrono::{DateTime, Local, TimeZone, Utc};

use crate::locale::Locale;
use crate::state::{AppState, MatchAnalysis, MatchSummary, PhaseKind, PlayerStat, Team};

pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) if millis > 0 => dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        _ => "-".to_string(),
    }
}

pub fn result_label(win: bool, locale: Locale) -> &'static str {
    let table = locale.table();
    if win { table.victory } else { table.defeat }
}

pub fn match_row(m: &MatchSummary, locale: Locale) -> String {
    let mut line = format!(
        "{:<14} {}/{}/{} (KDA {:.2})  {}",
        m.champion,
        m.kills,
        m.deaths,
        m.assists,
        m.kda,
        format_timestamp(m.timestamp_millis)
    );
    if let Some(secs) = m.game_duration_secs {
        line.push_str(&format!("  {}", format_duration(secs)));
    }
    line.push_str(&format!("  {}", result_label(m.win, locale)));
    line
}

pub fn player_row(p: &PlayerStat) -> String {
    let name = if p.tag.is_empty() {
        p.name.clone()
    } else {
        format!("{}#{}", p.name, p.tag)
    };
    let mut line = format!(
        "{name:<22} {} • {}/{}/{} • KDA {:.2}",
        p.champion, p.kills, p.deaths, p.assists, p.kda
    );
    if let Some(damage) = p.damage {
        line.push_str(&format!(" • DMG {:.1}k", damage as f64 / 1000.0));
    }
    if let Some(cs) = p.cs {
        line.push_str(&format!(" • CS {cs}"));
    }
    line.push_str(&format!("  MII {:.1}", p.mii));
    line
}

pub fn team_header(analysis: &MatchAnalysis, team: Team, locale: Locale) -> String {
    let side = analysis.team(team);
    let mark = if side.won { "✓" } else { "✗" };
    format!(
        "{} {mark} {} | {}: {:.1}",
        team.label(locale),
        result_label(side.won, locale),
        locale.table().team_avg_mii,
        side.avg_mii
    )
}

/// Single status line for the current phase (loading, hint or error).
pub fn status_text(state: &AppState) -> String {
    let table = state.locale.table();
    if let Some(issue) = state.validation_text() {
        return format!("{}: {issue}", table.error_label);
    }
    match state.phase() {
        PhaseKind::Idle => table.idle_hint.to_string(),
        PhaseKind::Searching => table.loading_matches.to_string(),
        PhaseKind::Analyzing => table.loading_analysis.to_string(),
        PhaseKind::Error => format!(
            "{}: {}",
            table.error_label,
            state.error_text().unwrap_or_default()
        ),
        PhaseKind::MatchesLoaded | PhaseKind::AnalysisLoaded => String::new(),
    }
}

pub fn footer_text(state: &AppState) -> &'static str {
    let table = state.locale.table();
    if state.form_active {
        return table.footer_form;
    }
    match state.phase() {
        PhaseKind::Idle | PhaseKind::Error => table.footer_idle,
        PhaseKind::Searching | PhaseKind::Analyzing => table.footer_busy,
        PhaseKind::MatchesLoaded => table.footer_matches,
        PhaseKind::AnalysisLoaded => table.footer_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_pads_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(1805), "30:05");
    }

    #[test]
    fn timestamp_formats_in_given_zone() {
        assert_eq!(format_timestamp_in(1_700_000_000_000, &Utc), "2023-11-14 22:13");
        assert_eq!(format_timestamp_in(0, &Utc), "-");
    }
}
