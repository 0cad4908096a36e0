use std::sync::mpsc::Sender;

use crate::region::ServerCode;
use crate::state::{
    ErrorMessage, ProviderCommand, SearchForm, ValidationIssue, ViewStateMachine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Form failed validation; nothing was sent and the phase is unchanged.
    Invalid(ValidationIssue),
    /// The provider is gone; the search already ended in a network error.
    Disconnected { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeError {
    /// No match list is showing, or the id is not part of it.
    NotAvailable,
    Disconnected { seq: u64 },
}

/// Request sequence for one controller. Only the newest request it issued
/// may land in the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Sequence {
    issued: u64,
}

impl Sequence {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued != 0 && seq == self.issued
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchController {
    seq: Sequence,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(
        &mut self,
        view: &mut ViewStateMachine,
        form: &SearchForm,
        tx: &Sender<ProviderCommand>,
    ) -> Result<u64, SubmitError> {
        let query = form.to_query().map_err(SubmitError::Invalid)?;
        let seq = self.seq.issue();
        view.begin_search(query.clone());
        if tx.send(ProviderCommand::FetchMatches { seq, query }).is_err() {
            view.finish_search(Err(ErrorMessage::Network));
            return Err(SubmitError::Disconnected { seq });
        }
        Ok(seq)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.seq.is_latest(seq)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisController {
    seq: Sequence,
}

impl AnalysisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(
        &mut self,
        view: &mut ViewStateMachine,
        match_id: &str,
        server: ServerCode,
        tx: &Sender<ProviderCommand>,
    ) -> Result<u64, AnalyzeError> {
        if !view.begin_analysis(match_id) {
            return Err(AnalyzeError::NotAvailable);
        }
        let seq = self.seq.issue();
        let cmd = ProviderCommand::AnalyzeMatch {
            seq,
            match_id: match_id.to_string(),
            server,
        };
        if tx.send(cmd).is_err() {
            view.finish_analysis(match_id, Err(ErrorMessage::Network));
            return Err(AnalyzeError::Disconnected { seq });
        }
        Ok(seq)
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.seq.is_latest(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_only_accepts_the_newest_number() {
        let mut seq = Sequence::default();
        assert!(!seq.is_latest(0));
        let first = seq.issue();
        let second = seq.issue();
        assert!(second > first);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }
}
