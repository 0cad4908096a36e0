use std::fs;
use std::path::PathBuf;

use mii_terminal::lookup_client::{LookupError, parse_analysis_response, parse_matches_response};
use mii_terminal::region::ServerCode;
use mii_terminal::state::{SearchQuery, Team};
use mii_terminal::verdict::VerdictCode;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn query() -> SearchQuery {
    SearchQuery::new("Hide on bush", "KR1", ServerCode::KR).expect("valid query")
}

#[test]
fn parses_match_list_fixture() {
    let raw = read_fixture("matches_ok.json");
    let listing = parse_matches_response(&raw, &query()).expect("fixture should parse");
    assert_eq!(listing.player, "Hide on bush#KR1");
    assert_eq!(listing.query, query());
    assert_eq!(listing.matches.len(), 1);
    let m = &listing.matches[0];
    assert_eq!(m.match_id, "KR_7012345678");
    assert_eq!(m.champion, "Ahri");
    assert_eq!((m.kills, m.deaths, m.assists), (7, 2, 9));
    assert_eq!(m.kda, 8.0);
    assert_eq!(m.timestamp_millis, 1_718_000_000_000);
    assert!(m.win);
    assert_eq!(m.team, Team::Blue);
    assert_eq!(m.game_duration_secs, Some(1805));
}

#[test]
fn accepts_title_case_team_names() {
    let raw = read_fixture("matches_legacy.json");
    let listing = parse_matches_response(&raw, &query()).expect("fixture should parse");
    let teams: Vec<Team> = listing.matches.iter().map(|m| m.team).collect();
    assert_eq!(teams, vec![Team::Blue, Team::Red]);
}

#[test]
fn server_rejection_keeps_message() {
    let raw = read_fixture("matches_not_found.json");
    let err = parse_matches_response(&raw, &query()).unwrap_err();
    assert_eq!(err, LookupError::Rejected(Some("player not found".to_string())));
}

#[test]
fn rejection_without_message_has_none() {
    let err = parse_analysis_response(r#"{"success": false}"#).unwrap_err();
    assert_eq!(err, LookupError::Rejected(None));
}

#[test]
fn parses_analysis_fixture() {
    let raw = read_fixture("analysis_slight.json");
    let analysis = parse_analysis_response(&raw).expect("fixture should parse");
    assert_eq!(analysis.verdict, VerdictCode::SlightImbalance);
    assert_eq!(analysis.blue_team.avg_mii, 30.0);
    assert_eq!(analysis.red_team.avg_mii, 55.0);
    assert_eq!(analysis.blue_team.players.len(), 5);
    assert_eq!(analysis.red_team.players.len(), 5);
    assert_eq!(analysis.winner(), Team::Blue);
    assert_eq!(analysis.match_id.as_deref(), Some("KR_7012345678"));
    assert_eq!(analysis.blue_team.players[0].name, "Faker");
    assert_eq!(analysis.blue_team.players[0].damage, None);
}

#[test]
fn legacy_analysis_keeps_extra_counters_and_maps_title() {
    let raw = read_fixture("analysis_legacy.json");
    let analysis = parse_analysis_response(&raw).expect("fixture should parse");
    assert_eq!(analysis.verdict, VerdictCode::SignificantImbalance);
    let faker = &analysis.blue_team.players[0];
    assert_eq!(faker.damage, Some(25_000));
    assert_eq!(faker.cs, Some(185));
    assert_eq!(faker.vision_score, Some(29));
}

#[test]
fn both_teams_winning_is_a_transport_error() {
    let raw = read_fixture("analysis_both_won.json");
    let err = parse_analysis_response(&raw).unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)), "{err:?}");
}

#[test]
fn success_without_teams_is_a_transport_error() {
    let err = parse_analysis_response(r#"{"success": true, "verdict": "BALANCED"}"#).unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}

#[test]
fn short_roster_is_a_transport_error() {
    let raw = read_fixture("analysis_slight.json");
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["red_team"]["players"]
        .as_array_mut()
        .unwrap()
        .truncate(4);
    let err = parse_analysis_response(&value.to_string()).unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}

#[test]
fn negative_kda_is_a_transport_error() {
    let raw = r#"{"success": true, "player": "A#B", "matches": [
        {"match_id": "X", "champion": "Ahri", "kills": 1, "deaths": 1, "assists": 1,
         "kda": -2.0, "timestamp": 1, "win": true, "team": "RED"}]}"#;
    let err = parse_matches_response(raw, &query()).unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}

#[test]
fn unknown_verdict_is_accepted_as_unrecognized() {
    let raw = read_fixture("analysis_slight.json");
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["verdict"] = serde_json::Value::String("LOPSIDED".to_string());
    let analysis = parse_analysis_response(&value.to_string()).expect("should parse");
    assert_eq!(analysis.verdict, VerdictCode::Unrecognized);
}

#[test]
fn empty_and_non_json_bodies_are_transport_errors() {
    for raw in ["", "null", "not json", "{\"player\": \"x\"}"] {
        let err = parse_matches_response(raw, &query()).unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)), "{raw:?}");
    }
}
