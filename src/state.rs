use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::controller::{AnalysisController, AnalyzeError, SearchController, SubmitError};
use crate::locale::Locale;
use crate::lookup_client::{LookupError, LookupResult};
use crate::region::ServerCode;
use crate::verdict::{ResolvedVerdict, VerdictCode, VerdictMemo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    #[serde(alias = "Blue", alias = "blue")]
    Blue,
    #[serde(alias = "Red", alias = "red")]
    Red,
}

impl Team {
    pub fn label(self, locale: Locale) -> &'static str {
        let table = locale.table();
        match self {
            Team::Blue => table.blue_team,
            Team::Red => table.red_team,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationIssue {
    MissingGameName,
    MissingTagLine,
}

impl ValidationIssue {
    pub fn text(self, locale: Locale) -> &'static str {
        let table = locale.table();
        match self {
            ValidationIssue::MissingGameName => table.missing_game_name,
            ValidationIssue::MissingTagLine => table.missing_tag_line,
        }
    }
}

/// A validated lookup request. Only `SearchQuery::new` builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    game_name: String,
    tag_line: String,
    server: ServerCode,
}

impl SearchQuery {
    pub fn new(game_name: &str, tag_line: &str, server: ServerCode) -> Result<Self, ValidationIssue> {
        let game_name = game_name.trim();
        let tag_line = tag_line.trim().trim_start_matches('#');
        if game_name.is_empty() {
            return Err(ValidationIssue::MissingGameName);
        }
        if tag_line.is_empty() {
            return Err(ValidationIssue::MissingTagLine);
        }
        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            server,
        })
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn tag_line(&self) -> &str {
        &self.tag_line
    }

    pub fn server(&self) -> ServerCode {
        self.server
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    GameName,
    TagLine,
    Server,
}

/// Raw text the user is typing; turned into a `SearchQuery` on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub game_name: String,
    pub tag_line: String,
    pub server: ServerCode,
    pub focus: FormField,
}

impl SearchForm {
    pub fn new(server: ServerCode) -> Self {
        Self {
            game_name: String::new(),
            tag_line: String::new(),
            server,
            focus: FormField::GameName,
        }
    }

    pub fn to_query(&self) -> Result<SearchQuery, ValidationIssue> {
        SearchQuery::new(&self.game_name, &self.tag_line, self.server)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::GameName => FormField::TagLine,
            FormField::TagLine => FormField::Server,
            FormField::Server => FormField::GameName,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormField::GameName => FormField::Server,
            FormField::TagLine => FormField::GameName,
            FormField::Server => FormField::TagLine,
        };
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            // "Name#TAG" typed in one go jumps to the tag field.
            FormField::GameName if ch == '#' => self.focus = FormField::TagLine,
            FormField::GameName => self.game_name.push(ch),
            FormField::TagLine if ch == '#' => {}
            FormField::TagLine => self.tag_line.push(ch),
            FormField::Server => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            FormField::GameName => {
                self.game_name.pop();
            }
            FormField::TagLine => {
                self.tag_line.pop();
            }
            FormField::Server => {}
        }
    }

    pub fn cycle_server(&mut self, forward: bool) {
        self.server = if forward {
            self.server.next()
        } else {
            self.server.prev()
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub timestamp_millis: i64,
    pub win: bool,
    pub team: Team,
    pub game_duration_secs: Option<u64>,
}

/// Everything one successful search produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchListing {
    pub query: SearchQuery,
    pub player: String,
    pub matches: Vec<MatchSummary>,
}

impl MatchListing {
    pub fn contains(&self, match_id: &str) -> bool {
        self.matches.iter().any(|m| m.match_id == match_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStat {
    pub name: String,
    pub tag: String,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub mii: f64,
    pub damage: Option<u64>,
    pub gold: Option<u64>,
    pub cs: Option<u64>,
    pub vision_score: Option<u64>,
}

pub const TEAM_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAnalysis {
    pub won: bool,
    pub avg_mii: f64,
    pub players: Vec<PlayerStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnalysis {
    pub verdict: VerdictCode,
    pub blue_team: TeamAnalysis,
    pub red_team: TeamAnalysis,
    pub match_id: Option<String>,
    pub game_duration_secs: Option<u64>,
}

impl MatchAnalysis {
    pub fn team(&self, team: Team) -> &TeamAnalysis {
        match team {
            Team::Blue => &self.blue_team,
            Team::Red => &self.red_team,
        }
    }

    pub fn winner(&self) -> Team {
        if self.blue_team.won {
            Team::Blue
        } else {
            Team::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseKind {
    Idle,
    Searching,
    MatchesLoaded,
    Analyzing,
    AnalysisLoaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ErrorMessage {
    /// Message the service reported, shown verbatim.
    Server(String),
    FetchMatchesFailed,
    AnalyzeMatchFailed,
    Network,
}

impl ErrorMessage {
    pub fn text(&self, locale: Locale) -> &str {
        let table = locale.table();
        match self {
            ErrorMessage::Server(msg) => msg.as_str(),
            ErrorMessage::FetchMatchesFailed => table.fallback_fetch_matches,
            ErrorMessage::AnalyzeMatchFailed => table.fallback_analyze_match,
            ErrorMessage::Network => table.network_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Searching {
        query: SearchQuery,
    },
    MatchesLoaded(MatchListing),
    // The listing rides along so "back" can restore it without a refetch.
    Analyzing {
        match_id: String,
        listing: MatchListing,
    },
    AnalysisLoaded {
        analysis: MatchAnalysis,
        listing: MatchListing,
    },
    Error {
        message: ErrorMessage,
        after: PhaseKind,
    },
}

impl ViewState {
    pub fn kind(&self) -> PhaseKind {
        match self {
            ViewState::Idle => PhaseKind::Idle,
            ViewState::Searching { .. } => PhaseKind::Searching,
            ViewState::MatchesLoaded(_) => PhaseKind::MatchesLoaded,
            ViewState::Analyzing { .. } => PhaseKind::Analyzing,
            ViewState::AnalysisLoaded { .. } => PhaseKind::AnalysisLoaded,
            ViewState::Error { .. } => PhaseKind::Error,
        }
    }
}

/// Sole owner of the session's `ViewState`. Every method either applies one
/// whole transition or leaves the state untouched and returns `false`.
#[derive(Debug, Clone, Default)]
pub struct ViewStateMachine {
    state: ViewState,
}

impl ViewStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> PhaseKind {
        self.state.kind()
    }

    pub fn begin_search(&mut self, query: SearchQuery) {
        self.state = ViewState::Searching { query };
    }

    pub fn finish_search(&mut self, outcome: Result<MatchListing, ErrorMessage>) -> bool {
        if !matches!(self.state, ViewState::Searching { .. }) {
            return false;
        }
        self.state = match outcome {
            Ok(listing) => ViewState::MatchesLoaded(listing),
            Err(message) => ViewState::Error {
                message,
                after: PhaseKind::Searching,
            },
        };
        true
    }

    pub fn begin_analysis(&mut self, match_id: &str) -> bool {
        match std::mem::take(&mut self.state) {
            ViewState::MatchesLoaded(listing) if listing.contains(match_id) => {
                self.state = ViewState::Analyzing {
                    match_id: match_id.to_string(),
                    listing,
                };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    pub fn finish_analysis(
        &mut self,
        match_id: &str,
        outcome: Result<MatchAnalysis, ErrorMessage>,
    ) -> bool {
        match std::mem::take(&mut self.state) {
            ViewState::Analyzing {
                match_id: pending,
                listing,
            } if pending == match_id => {
                self.state = match outcome {
                    Ok(analysis) => ViewState::AnalysisLoaded { analysis, listing },
                    Err(message) => ViewState::Error {
                        message,
                        after: PhaseKind::Analyzing,
                    },
                };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    pub fn back(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            ViewState::AnalysisLoaded { listing, .. } => {
                self.state = ViewState::MatchesLoaded(listing);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    pub fn listing(&self) -> Option<&MatchListing> {
        match &self.state {
            ViewState::MatchesLoaded(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&MatchAnalysis> {
        match &self.state {
            ViewState::AnalysisLoaded { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorMessage> {
        match &self.state {
            ViewState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            ViewState::Searching { .. } | ViewState::Analyzing { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    MatchesFetched {
        seq: u64,
        outcome: LookupResult<MatchListing>,
    },
    AnalysisFetched {
        seq: u64,
        match_id: String,
        outcome: LookupResult<MatchAnalysis>,
    },
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchMatches {
        seq: u64,
        query: SearchQuery,
    },
    AnalyzeMatch {
        seq: u64,
        match_id: String,
        server: ServerCode,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub locale: Locale,
    pub view: ViewStateMachine,
    pub form: SearchForm,
    pub form_active: bool,
    pub inline_error: Option<ValidationIssue>,
    pub selected: usize,
    pub search: SearchController,
    pub analysis: AnalysisController,
    pub verdict: VerdictMemo,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Locale::default(), ServerCode::default())
    }
}

impl AppState {
    pub fn new(locale: Locale, server: ServerCode) -> Self {
        Self {
            locale,
            view: ViewStateMachine::new(),
            form: SearchForm::new(server),
            form_active: false,
            inline_error: None,
            selected: 0,
            search: SearchController::new(),
            analysis: AnalysisController::new(),
            verdict: VerdictMemo::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.view.phase()
    }

    /// Validates the form and, if it passes, starts a new search.
    pub fn submit_search(&mut self, tx: &Sender<ProviderCommand>) -> bool {
        match self.search.submit(&mut self.view, &self.form, tx) {
            Ok(seq) => {
                self.inline_error = None;
                self.form_active = false;
                self.selected = 0;
                self.verdict.clear();
                self.push_log(format!(
                    "[INFO] Search #{seq} sent ({} on {})",
                    self.form.game_name.trim(),
                    self.form.server.code()
                ));
                true
            }
            Err(SubmitError::Invalid(issue)) => {
                self.inline_error = Some(issue);
                false
            }
            Err(SubmitError::Disconnected { seq }) => {
                self.inline_error = None;
                self.form_active = false;
                self.selected = 0;
                self.verdict.clear();
                self.push_log(format!("[WARN] Search #{seq} could not be dispatched"));
                true
            }
        }
    }

    pub fn analyze_selected(&mut self, tx: &Sender<ProviderCommand>) -> bool {
        let Some((match_id, server)) = self
            .view
            .listing()
            .and_then(|listing| {
                listing
                    .matches
                    .get(self.selected)
                    .map(|m| (m.match_id.clone(), listing.query.server()))
            })
        else {
            return false;
        };
        match self.analysis.analyze(&mut self.view, &match_id, server, tx) {
            Ok(seq) => {
                self.push_log(format!("[INFO] Analysis #{seq} sent ({match_id})"));
                true
            }
            Err(AnalyzeError::NotAvailable) => false,
            Err(AnalyzeError::Disconnected { seq }) => {
                self.push_log(format!("[WARN] Analysis #{seq} could not be dispatched"));
                true
            }
        }
    }

    pub fn back(&mut self) -> bool {
        if !self.view.back() {
            return false;
        }
        self.verdict.clear();
        let len = self.view.listing().map(|l| l.matches.len()).unwrap_or(0);
        self.selected = self.selected.min(len.saturating_sub(1));
        true
    }

    pub fn cycle_locale(&mut self) {
        self.locale = self.locale.next();
        self.refresh_verdict();
        self.push_log(format!("[INFO] Language: {}", self.locale.label()));
    }

    pub fn select_next(&mut self) {
        let len = self.view.listing().map(|l| l.matches.len()).unwrap_or(0);
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Re-resolves the verdict text if (and only if) its inputs changed.
    pub fn refresh_verdict(&mut self) {
        let locale = self.locale;
        match self.view.analysis() {
            Some(analysis) => {
                self.verdict.get(
                    analysis.verdict,
                    analysis.blue_team.avg_mii,
                    analysis.red_team.avg_mii,
                    locale,
                );
            }
            None => self.verdict.clear(),
        }
    }

    pub fn verdict_text(&self) -> Option<ResolvedVerdict> {
        self.view.analysis()?;
        self.verdict.cached()
    }

    pub fn error_text(&self) -> Option<&str> {
        self.view.error().map(|message| message.text(self.locale))
    }

    pub fn validation_text(&self) -> Option<&'static str> {
        self.inline_error.map(|issue| issue.text(self.locale))
    }
}

fn error_message(
    state: &mut AppState,
    err: LookupError,
    fallback: ErrorMessage,
    what: &str,
) -> ErrorMessage {
    match err {
        LookupError::Rejected(Some(msg)) => {
            state.push_log(format!("[WARN] {what} rejected: {msg}"));
            ErrorMessage::Server(msg)
        }
        LookupError::Rejected(None) => {
            state.push_log(format!("[WARN] {what} rejected without a message"));
            fallback
        }
        LookupError::Transport(cause) => {
            state.push_log(format!("[WARN] {what} transport error: {cause}"));
            ErrorMessage::Network
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::MatchesFetched { seq, outcome } => {
            if !state.search.is_latest(seq) {
                state.push_log(format!("[INFO] Dropped stale match list #{seq}"));
                return;
            }
            let outcome = match outcome {
                Ok(listing) => {
                    state.push_log(format!(
                        "[INFO] {} matches for {}",
                        listing.matches.len(),
                        listing.player
                    ));
                    Ok(listing)
                }
                Err(err) => Err(error_message(
                    state,
                    err,
                    ErrorMessage::FetchMatchesFailed,
                    "Match lookup",
                )),
            };
            if state.view.finish_search(outcome) {
                state.selected = 0;
            } else {
                state.push_log(format!("[INFO] Ignored match list #{seq} outside a search"));
            }
        }
        Delta::AnalysisFetched {
            seq,
            match_id,
            outcome,
        } => {
            if !state.analysis.is_latest(seq) {
                state.push_log(format!("[INFO] Dropped stale analysis #{seq}"));
                return;
            }
            let outcome = match outcome {
                Ok(analysis) => Ok(analysis),
                Err(err) => Err(error_message(
                    state,
                    err,
                    ErrorMessage::AnalyzeMatchFailed,
                    "Match analysis",
                )),
            };
            if state.view.finish_analysis(&match_id, outcome) {
                state.refresh_verdict();
            } else {
                state.push_log(format!("[INFO] Ignored analysis #{seq} for {match_id}"));
            }
        }
    }
}
