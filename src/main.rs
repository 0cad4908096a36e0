use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use mii_terminal::config::Config;
use mii_terminal::display::{
    footer_text, match_row, player_row, status_text, team_header,
};
use mii_terminal::lookup_client::MatchLookupClient;
use mii_terminal::provider::spawn_provider;
use mii_terminal::state::{
    self, AppState, FormField, MatchAnalysis, PhaseKind, ProviderCommand, Team, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(config: &Config, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        let mut state = AppState::new(config.locale, config.default_server);
        state.push_log(format!(
            "[INFO] API {} (timeout {}s)",
            config.api_base,
            config.request_timeout.as_secs()
        ));
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.form_active {
            self.on_form_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('s') => self.state.form_active = true,
            KeyCode::Char('g') | KeyCode::Char('G') => self.state.cycle_locale(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => {
                self.state.analyze_selected(&self.cmd_tx);
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.state.back();
                }
            }
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.form_active = false,
            KeyCode::Enter => {
                self.state.submit_search(&self.cmd_tx);
            }
            KeyCode::Tab => self.state.form.focus_next(),
            KeyCode::BackTab => self.state.form.focus_prev(),
            KeyCode::Left if self.state.form.focus == FormField::Server => {
                self.state.form.cycle_server(false)
            }
            KeyCode::Right if self.state.form.focus == FormField::Server => {
                self.state.form.cycle_server(true)
            }
            KeyCode::Backspace => {
                self.state.inline_error = None;
                self.state.form.pop_char();
            }
            KeyCode::Char(ch) => {
                self.state.inline_error = None;
                self.state.form.push_char(ch);
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let lookup = Arc::new(MatchLookupClient::from_config(&config));
    spawn_provider(lookup, tx, cmd_rx);

    let mut app = App::new(&config, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_search_form(frame, chunks[1], state);

    let status_style = if state.inline_error.is_some() || state.phase() == PhaseKind::Error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(status_text(state)).style(status_style),
        chunks[2],
    );

    match state.phase() {
        PhaseKind::MatchesLoaded => render_match_list(frame, chunks[3], state),
        PhaseKind::AnalysisLoaded => render_analysis(frame, chunks[3], state),
        PhaseKind::Error => render_error(frame, chunks[3], state),
        PhaseKind::Idle | PhaseKind::Searching | PhaseKind::Analyzing => {}
    }

    let console = Paragraph::new(console_text(state))
        .block(
            Block::default()
                .title(state.locale.table().console_title)
                .borders(Borders::ALL),
        );
    frame.render_widget(console, chunks[4]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[5]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size(), state);
    }
}

fn header_text(state: &AppState) -> String {
    let table = state.locale.table();
    format!(
        "  {} | {} | {} {}\n  {}",
        table.app_title,
        state.locale.label(),
        table.label_server,
        state.form.server.name(),
        table.app_subtitle
    )
}

fn render_search_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let table = state.locale.table();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Percentage(15),
        ])
        .split(area);

    let field_style = |field: FormField| {
        if state.form_active && state.form.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let name = Paragraph::new(state.form.game_name.as_str()).block(
        Block::default()
            .title(table.label_game_name)
            .borders(Borders::ALL)
            .border_style(field_style(FormField::GameName)),
    );
    frame.render_widget(name, cols[0]);

    let tag = Paragraph::new(state.form.tag_line.as_str()).block(
        Block::default()
            .title(table.label_tag_line)
            .borders(Borders::ALL)
            .border_style(field_style(FormField::TagLine)),
    );
    frame.render_widget(tag, cols[1]);

    let server = Paragraph::new(format!(
        "◂ {} {} ▸",
        state.form.server.code(),
        state.form.server.name()
    ))
    .block(
        Block::default()
            .title(table.label_server)
            .borders(Borders::ALL)
            .border_style(field_style(FormField::Server)),
    );
    frame.render_widget(server, cols[2]);

    let button_label = if state.view.is_busy() {
        table.searching_button
    } else {
        table.search_button
    };
    let button = Paragraph::new(button_label)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, cols[3]);
}

fn render_match_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(listing) = state.view.listing() else {
        return;
    };
    let table = state.locale.table();
    let block = Block::default()
        .title(format!("{} {}", table.recent_matches_for, listing.player))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if listing.matches.is_empty() {
        let empty = Paragraph::new(table.no_matches).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    if inner.height == 0 {
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected, listing.matches.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let m = &listing.matches[idx];
            let mut style = if m.win {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            let prefix = if idx == state.selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                "> "
            } else {
                "  "
            };
            Line::from(Span::styled(
                format!("{prefix}{}", match_row(m, state.locale)),
                style,
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_analysis(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(analysis) = state.view.analysis() else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let table = state.locale.table();
    let (title, detail) = state
        .verdict_text()
        .map(|v| (v.title, v.detail))
        .unwrap_or_default();
    let verdict = Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(format!("← b {}", table.back_to_matches))
            .borders(Borders::ALL),
    );
    frame.render_widget(verdict, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_team(frame, cols[0], analysis, Team::Blue, state);
    render_team(frame, cols[1], analysis, Team::Red, state);
}

fn render_team(frame: &mut Frame, area: Rect, analysis: &MatchAnalysis, team: Team, state: &AppState) {
    let color = match team {
        Team::Blue => Color::Blue,
        Team::Red => Color::Red,
    };
    let lines: Vec<Line> = analysis
        .team(team)
        .players
        .iter()
        .map(|p| Line::from(player_row(p)))
        .collect();
    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(team_header(analysis, team, state.locale))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(panel, area);
}

fn render_error(frame: &mut Frame, area: Rect, state: &AppState) {
    let table = state.locale.table();
    let text = format!(
        "{}: {}\n\n{}",
        table.error_label,
        state.error_text().unwrap_or_default(),
        table.error_hint
    );
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return state.locale.table().no_activity.to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let table = state.locale.table();
    let text = format!("{}\n\n{}", table.app_title, table.help_body);

    let help = Paragraph::new(text)
        .block(Block::default().title(table.help_title).borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
