use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::task::JoinHandle;

use crate::{
    config::ForensicsConfig,
    core::{error::LinkGuardError, scanner::Scanner, verdict::RiskLevel},
    modules::forensics::{fetch_forensics, ForensicReport},
    ui::app::{App, Entry, ForensicState},
};

type PendingFetch = (usize, JoinHandle<ForensicReport>);

pub async fn run_tui(
    scanner: Arc<Scanner>,
    fetch_cfg: Option<ForensicsConfig>,
) -> Result<(), LinkGuardError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = event_loop(&mut terminal, &scanner, fetch_cfg).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    scanner: &Scanner,
    fetch_cfg: Option<ForensicsConfig>,
) -> Result<(), LinkGuardError> {
    let mut app = App::new();
    let mut pending: Vec<PendingFetch> = Vec::new();

    loop {
        terminal.draw(|f| draw_ui(f, &app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('q') if app.input.is_empty() => break,
                    KeyCode::Enter => {
                        let raw = app.input.trim().to_string();
                        if let Some(idx) = app.submit(scanner, fetch_cfg.is_some()) {
                            if let Some(cfg) = fetch_cfg.clone() {
                                let handle = tokio::spawn(async move {
                                    fetch_forensics(&raw, &cfg).await
                                });
                                pending.push((idx, handle));
                            }
                        }
                    }
                    KeyCode::Char(c) => app.input.push(c),
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Tab => app.next_entry(),
                    _ => {}
                }
            }
        }

        let mut still_running = Vec::with_capacity(pending.len());
        for (idx, handle) in pending.drain(..) {
            if handle.is_finished() {
                let report = match handle.await {
                    Ok(report) => report,
                    Err(join_err) => ForensicReport::Error {
                        message: join_err.to_string(),
                    },
                };
                app.complete_forensics(idx, report);
            } else {
                still_running.push((idx, handle));
            }
        }
        pending = still_running;
    }

    for (_, handle) in pending {
        handle.abort();
    }
    Ok(())
}

fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Safe => Color::Green,
        RiskLevel::Suspicious => Color::Yellow,
        RiskLevel::Dangerous => Color::Red,
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" 🛡️ ", Style::default().fg(Color::Red)),
        Span::styled(
            "LINK-GUARD",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" zero-trust link audit ", Style::default().fg(Color::Yellow)),
        Span::raw("| ENTER=SCAN TAB=NEXT ESC=QUIT"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(title, rows[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    draw_history(f, app, middle[0]);
    match app.current() {
        Some(entry) => draw_verdict(f, entry, middle[1]),
        None => {
            let idle = Paragraph::new("Paste a link below and press ENTER")
                .block(Block::default().title(" 🔍 VERDICT ").borders(Borders::ALL));
            f.render_widget(idle, middle[1]);
        }
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);

    let input = Paragraph::new(app.input.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" 🎯 LINK TO SCAN ").borders(Borders::ALL));
    f.render_widget(input, bottom[0]);

    let log_items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(5)
        .map(|log| {
            ListItem::new(Line::from(vec![
                Span::styled("●", Style::default().fg(Color::Green)),
                Span::raw(" "),
                Span::raw(log.as_str()),
            ]))
        })
        .collect();
    let logs = List::new(log_items)
        .block(Block::default().title(" 📜 LOG ").borders(Borders::ALL));
    f.render_widget(logs, bottom[1]);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let color = risk_color(e.result.risk_level());
            let marker = if i == app.selected { ">" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Gray)),
                Span::styled(format!("{:>3} ", e.result.score), Style::default().fg(color)),
                Span::raw(e.input.as_str()),
            ]))
        })
        .collect();

    let history = List::new(items).block(
        Block::default()
            .title(" SCANNED LINKS ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(history, area);
}

fn draw_verdict(f: &mut Frame, entry: &Entry, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(8),
        ])
        .split(area);

    let level = entry.result.risk_level();
    let color = risk_color(level);

    let gauge = Gauge::default()
        .block(Block::default().title(" RISK SCORE ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(entry.result.score))
        .label(format!("{} / 100", entry.result.score));
    f.render_widget(gauge, parts[0]);

    let headline = Paragraph::new(Line::from(vec![
        Span::styled(
            level.headline(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(level.advice()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(headline, parts[1]);

    let findings: Vec<ListItem> = if entry.result.findings.is_empty() {
        vec![ListItem::new(Span::styled(
            "No threats detected",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        entry
            .result
            .findings
            .iter()
            .map(|finding| {
                ListItem::new(Line::from(vec![
                    Span::styled("⚠ ", Style::default().fg(Color::Red)),
                    Span::raw(finding.message.as_str()),
                ]))
            })
            .collect()
    };
    let findings = List::new(findings)
        .block(Block::default().title(" ⚠️ DETECTED THREATS ").borders(Borders::ALL));
    f.render_widget(findings, parts[2]);

    let lines = match &entry.forensics {
        ForensicState::Done(ForensicReport::Success(d)) => vec![
            field("HTTP", d.http_status_code.to_string()),
            field("Final", d.final_url.clone()),
            field("Server", d.server_header.clone()),
            field("Title", d.page_title.clone()),
            field("Chain", d.redirect_chain.join(" -> ")),
        ],
        other => vec![Line::from(Span::styled(
            other.to_string(),
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let forensics = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" 🧪 FORENSICS ").borders(Borders::ALL));
    f.render_widget(forensics, parts[3]);
}

fn field(name: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<7}", name), Style::default().fg(Color::White)),
        Span::styled(value, Style::default().fg(Color::Cyan)),
    ])
}
