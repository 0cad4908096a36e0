use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mii_terminal::lookup_client::{LookupError, LookupResult, MatchLookup};
use mii_terminal::provider::{run_command, spawn_provider};
use mii_terminal::region::ServerCode;
use mii_terminal::state::{
    AppState, Delta, MatchAnalysis, MatchListing, MatchSummary, PhaseKind, PlayerStat,
    ProviderCommand, SearchQuery, Team, TeamAnalysis, apply_delta,
};
use mii_terminal::verdict::VerdictCode;

#[derive(Default)]
struct StubLookup {
    calls: Mutex<Vec<String>>,
}

fn player(name: &str, mii: f64) -> PlayerStat {
    PlayerStat {
        name: name.to_string(),
        tag: "T1".to_string(),
        champion: "Ahri".to_string(),
        kills: 3,
        deaths: 2,
        assists: 5,
        kda: 4.0,
        mii,
        damage: None,
        gold: None,
        cs: None,
        vision_score: None,
    }
}

fn team(won: bool, avg_mii: f64) -> TeamAnalysis {
    TeamAnalysis {
        won,
        avg_mii,
        players: (0..5).map(|i| player(&format!("P{i}"), avg_mii)).collect(),
    }
}

impl MatchLookup for StubLookup {
    fn list_recent_matches(&self, query: &SearchQuery) -> LookupResult<MatchListing> {
        self.calls.lock().unwrap().push(format!("list {}", query.riot_id()));
        if query.game_name() == "ghost" {
            return Err(LookupError::Rejected(Some("player not found".to_string())));
        }
        Ok(MatchListing {
            query: query.clone(),
            player: query.riot_id(),
            matches: vec![MatchSummary {
                match_id: "NA1_1".to_string(),
                champion: "Ahri".to_string(),
                kills: 7,
                deaths: 2,
                assists: 9,
                kda: 8.0,
                timestamp_millis: 1_718_000_000_000,
                win: true,
                team: Team::Blue,
                game_duration_secs: None,
            }],
        })
    }

    fn analyze_match(&self, match_id: &str, server: ServerCode) -> LookupResult<MatchAnalysis> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("analyze {match_id} {}", server.code()));
        Ok(MatchAnalysis {
            verdict: VerdictCode::Balanced,
            blue_team: team(true, 48.0),
            red_team: team(false, 52.0),
            match_id: Some(match_id.to_string()),
            game_duration_secs: None,
        })
    }
}

#[test]
fn run_command_tags_results_with_their_sequence() {
    let stub = StubLookup::default();
    let query = SearchQuery::new("Hide on bush", "KR1", ServerCode::KR).unwrap();

    let delta = run_command(&stub, ProviderCommand::FetchMatches { seq: 7, query });
    let Delta::MatchesFetched { seq, outcome } = delta else {
        panic!("expected a match list");
    };
    assert_eq!(seq, 7);
    assert_eq!(outcome.unwrap().player, "Hide on bush#KR1");

    let delta = run_command(
        &stub,
        ProviderCommand::AnalyzeMatch {
            seq: 3,
            match_id: "NA1_1".to_string(),
            server: ServerCode::KR,
        },
    );
    let Delta::AnalysisFetched {
        seq,
        match_id,
        outcome,
    } = delta
    else {
        panic!("expected an analysis");
    };
    assert_eq!((seq, match_id.as_str()), (3, "NA1_1"));
    assert!(outcome.is_ok());

    let calls = stub.calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["list Hide on bush#KR1", "analyze NA1_1 KR"]);
}

#[test]
fn rejection_passes_through_unchanged() {
    let stub = StubLookup::default();
    let query = SearchQuery::new("ghost", "0000", ServerCode::NA).unwrap();
    let Delta::MatchesFetched { outcome, .. } =
        run_command(&stub, ProviderCommand::FetchMatches { seq: 1, query })
    else {
        panic!("expected a match list");
    };
    assert_eq!(
        outcome.unwrap_err(),
        LookupError::Rejected(Some("player not found".to_string()))
    );
}

#[test]
fn spawned_provider_drives_a_full_session() {
    let (delta_tx, delta_rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(Arc::new(StubLookup::default()), delta_tx, cmd_rx);

    let mut state = AppState::new(Default::default(), ServerCode::NA);
    state.form.game_name = "Hide on bush".to_string();
    state.form.tag_line = "KR1".to_string();
    assert!(state.submit_search(&cmd_tx));

    let delta = delta_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("provider should answer");
    apply_delta(&mut state, delta);
    assert_eq!(state.phase(), PhaseKind::MatchesLoaded);

    assert!(state.analyze_selected(&cmd_tx));
    let delta = delta_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("provider should answer");
    apply_delta(&mut state, delta);
    assert_eq!(state.phase(), PhaseKind::AnalysisLoaded);
    assert_eq!(state.verdict_text().unwrap().title, "Balanced Match");

    drop(cmd_tx);
    handle.join().expect("provider thread should exit cleanly");
}
