use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::http_client::http_client;
use crate::region::ServerCode;
use crate::state::{
    MatchAnalysis, MatchListing, MatchSummary, PlayerStat, SearchQuery, TEAM_SIZE, Team,
    TeamAnalysis,
};
use crate::verdict::VerdictCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service answered `success: false`, with its message if it gave one.
    Rejected(Option<String>),
    /// No usable answer: network failure, timeout or a malformed payload.
    Transport(String),
}

impl LookupError {
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty());
        LookupError::Rejected(message)
    }

    pub fn transport(err: anyhow::Error) -> Self {
        LookupError::Transport(format!("{err:#}"))
    }
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// The two remote operations the client depends on.
pub trait MatchLookup: Send + Sync {
    fn list_recent_matches(&self, query: &SearchQuery) -> LookupResult<MatchListing>;

    fn analyze_match(&self, match_id: &str, server: ServerCode) -> LookupResult<MatchAnalysis>;
}

#[derive(Debug, Clone)]
pub struct MatchLookupClient {
    base_url: String,
    timeout: Duration,
}

impl MatchLookupClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.clone(), config.request_timeout)
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }

    fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let client = http_client(self.timeout)?;
        let url = self.endpoint_url(endpoint);
        let resp = client
            .get(&url)
            .query(params)
            .send()
            .with_context(|| format!("{endpoint} request failed"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        // Application errors come back as JSON with a 4xx/5xx status; anything
        // else on an error status is a transport problem.
        if !status.is_success() && !body.trim_start().starts_with('{') {
            let snippet: String = body.chars().take(120).collect();
            bail!("http {status}: {snippet}");
        }
        Ok(body)
    }
}

impl MatchLookup for MatchLookupClient {
    fn list_recent_matches(&self, query: &SearchQuery) -> LookupResult<MatchListing> {
        let body = self
            .fetch(
                "get_matches",
                &[
                    ("name", query.game_name()),
                    ("tag", query.tag_line()),
                    ("server", query.server().code()),
                ],
            )
            .map_err(LookupError::transport)?;
        parse_matches_response(&body, query)
    }

    fn analyze_match(&self, match_id: &str, server: ServerCode) -> LookupResult<MatchAnalysis> {
        let body = self
            .fetch(
                "analyze_match",
                &[("match_id", match_id), ("server", server.code())],
            )
            .map_err(LookupError::transport)?;
        parse_analysis_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    success: bool,
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    matches: Option<Vec<WireMatch>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    match_id: String,
    champion: String,
    kills: u32,
    deaths: u32,
    assists: u32,
    kda: f64,
    timestamp: i64,
    win: bool,
    team: Team,
    #[serde(default)]
    game_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(default)]
    match_id: Option<String>,
    #[serde(default)]
    game_duration: Option<u64>,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    blue_team: Option<WireTeam>,
    #[serde(default)]
    red_team: Option<WireTeam>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    won: bool,
    avg_mii: f64,
    players: Vec<WirePlayer>,
}

#[derive(Debug, Deserialize)]
struct WirePlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    champion: String,
    kills: u32,
    deaths: u32,
    assists: u32,
    kda: f64,
    mii: f64,
    #[serde(default)]
    damage: Option<u64>,
    #[serde(default)]
    gold: Option<u64>,
    #[serde(default)]
    cs: Option<u64>,
    #[serde(default)]
    vision_score: Option<u64>,
}

pub fn parse_matches_response(raw: &str, query: &SearchQuery) -> LookupResult<MatchListing> {
    let data: MatchesResponse =
        decode(raw, "invalid get_matches json").map_err(LookupError::transport)?;
    if !data.success {
        return Err(LookupError::rejected(data.error));
    }
    build_listing(data, query).map_err(LookupError::transport)
}

pub fn parse_analysis_response(raw: &str) -> LookupResult<MatchAnalysis> {
    let data: AnalysisResponse =
        decode(raw, "invalid analyze_match json").map_err(LookupError::transport)?;
    if !data.success {
        return Err(LookupError::rejected(data.error));
    }
    build_analysis(data).map_err(LookupError::transport)
}

fn decode<T: DeserializeOwned>(raw: &str, what: &'static str) -> Result<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("empty response body");
    }
    serde_json::from_str(trimmed).context(what)
}

fn build_listing(data: MatchesResponse, query: &SearchQuery) -> Result<MatchListing> {
    let player = data
        .player
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| query.riot_id());
    let wire = data.matches.context("success response without matches")?;

    let mut matches = Vec::with_capacity(wire.len());
    for m in wire {
        ensure!(!m.match_id.trim().is_empty(), "match without id");
        ensure!(
            valid_ratio(m.kda),
            "match {}: kda out of range ({})",
            m.match_id,
            m.kda
        );
        matches.push(MatchSummary {
            match_id: m.match_id,
            champion: m.champion,
            kills: m.kills,
            deaths: m.deaths,
            assists: m.assists,
            kda: m.kda,
            timestamp_millis: m.timestamp,
            win: m.win,
            team: m.team,
            game_duration_secs: m.game_duration,
        });
    }

    Ok(MatchListing {
        query: query.clone(),
        player,
        matches,
    })
}

fn build_analysis(data: AnalysisResponse) -> Result<MatchAnalysis> {
    let verdict = data
        .verdict
        .as_deref()
        .map(VerdictCode::from_wire)
        .context("success response without verdict")?;
    let blue_team = build_team(data.blue_team.context("missing blue_team")?, "blue")?;
    let red_team = build_team(data.red_team.context("missing red_team")?, "red")?;
    ensure!(
        blue_team.won != red_team.won,
        "exactly one team must be marked as winner (blue={}, red={})",
        blue_team.won,
        red_team.won
    );

    Ok(MatchAnalysis {
        verdict,
        blue_team,
        red_team,
        match_id: data.match_id,
        game_duration_secs: data.game_duration,
    })
}

fn build_team(wire: WireTeam, side: &str) -> Result<TeamAnalysis> {
    ensure!(
        wire.players.len() == TEAM_SIZE,
        "{side} team has {} players",
        wire.players.len()
    );
    ensure!(wire.avg_mii.is_finite(), "{side} team avg_mii is not finite");

    let mut players = Vec::with_capacity(TEAM_SIZE);
    for p in wire.players {
        let name = p.name.unwrap_or_default();
        ensure!(valid_ratio(p.kda), "{side} player {name}: kda out of range");
        ensure!(p.mii.is_finite(), "{side} player {name}: mii is not finite");
        players.push(PlayerStat {
            name,
            tag: p.tag.unwrap_or_default(),
            champion: p.champion,
            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,
            kda: p.kda,
            mii: p.mii,
            damage: p.damage,
            gold: p.gold,
            cs: p.cs,
            vision_score: p.vision_score,
        });
    }

    Ok(TeamAnalysis {
        won: wire.won,
        avg_mii: wire.avg_mii,
        players,
    })
}

fn valid_ratio(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SearchQuery {
        SearchQuery::new("Faker", "KR1", ServerCode::KR).unwrap()
    }

    #[test]
    fn rejected_message_is_trimmed_and_blank_means_none() {
        assert_eq!(
            LookupError::rejected(Some("  Player not found ".to_string())),
            LookupError::Rejected(Some("Player not found".to_string()))
        );
        assert_eq!(
            LookupError::rejected(Some("   ".to_string())),
            LookupError::Rejected(None)
        );
    }

    #[test]
    fn html_error_page_is_transport() {
        let err = parse_matches_response("<html>502 Bad Gateway</html>", &query()).unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }

    #[test]
    fn missing_player_label_falls_back_to_riot_id() {
        let raw = r#"{"success": true, "matches": []}"#;
        let listing = parse_matches_response(raw, &query()).unwrap();
        assert_eq!(listing.player, "Faker#KR1");
        assert!(listing.matches.is_empty());
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let client = MatchLookupClient::new("http://localhost:3000/api/", Duration::from_secs(1));
        assert_eq!(
            client.endpoint_url("get_matches"),
            "http://localhost:3000/api/get_matches"
        );
    }
}
