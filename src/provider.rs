use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::lookup_client::MatchLookup;
use crate::state::{Delta, ProviderCommand};

/// Runs lookups off the UI thread. Each command gets its own worker so a
/// slow request never holds up a newer one; ordering is left to the
/// controllers' sequence numbers.
pub fn spawn_provider(
    lookup: Arc<dyn MatchLookup>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let lookup = Arc::clone(&lookup);
            let tx = tx.clone();
            thread::spawn(move || {
                let delta = run_command(lookup.as_ref(), cmd);
                let _ = tx.send(delta);
            });
        }
    })
}

pub fn run_command(lookup: &dyn MatchLookup, cmd: ProviderCommand) -> Delta {
    match cmd {
        ProviderCommand::FetchMatches { seq, query } => Delta::MatchesFetched {
            seq,
            outcome: lookup.list_recent_matches(&query),
        },
        ProviderCommand::AnalyzeMatch {
            seq,
            match_id,
            server,
        } => {
            let outcome = lookup.analyze_match(&match_id, server);
            Delta::AnalysisFetched {
                seq,
                match_id,
                outcome,
            }
        }
    }
}
