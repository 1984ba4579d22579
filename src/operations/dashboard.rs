use crate::error::Result;
use crate::feed::TransactionFeed;
use crate::feed::ledger_feed::LedgerFeed;
use crate::feed::live::LiveStatistics;
use crate::models::statistics::Statistics;
use crate::models::transaction::{Transaction, TransactionType};
use crate::operations::add::parse_transaction_input;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use std::cmp::max;
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    Input,
}

#[derive(Debug, Clone)]
struct Status {
    message: String,
    is_error: bool,
    shown_at: Instant,
}

struct DashboardState {
    mode: Mode,
    table_state: TableState,
    input_buffer: String,
    status: Option<Status>,
    last_page_size: usize,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            mode: Mode::List,
            table_state: TableState::default(),
            input_buffer: String::new(),
            status: None,
            last_page_size: 10,
        }
    }

    fn clamp_selection(&mut self, rows: usize) {
        if rows == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(selected.min(rows - 1)));
        }
    }

    fn move_selection(&mut self, delta: i32, rows: usize) {
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, rows as i32 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "dashboard action failed");
        self.status = Some(Status {
            message,
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    fn expire_status(&mut self, now: Instant) {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|status| now.duration_since(status.shown_at) >= STATUS_TTL);
        if expired {
            self.status = None;
        }
    }

    fn commit_input(&mut self, feed: &mut LedgerFeed) {
        let result = parse_transaction_input(&self.input_buffer).and_then(|new| feed.create(new));
        match result {
            Ok(created) => {
                self.notify(format!(
                    "Added {} {} {}",
                    created.transaction_type,
                    created.category.as_deref().unwrap_or("-"),
                    created.amount_or_zero()
                ));
                self.input_buffer.clear();
                self.mode = Mode::List;
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    fn delete_selected(&mut self, feed: &mut LedgerFeed, snapshot: &[Transaction]) {
        let Some(selected) = self.table_state.selected().and_then(|i| snapshot.get(i)) else {
            self.notify_error("Nothing selected");
            return;
        };

        match feed.delete(&selected.id) {
            Ok(removed) => self.notify(format!("Deleted transaction {}", short_id(&removed.id))),
            Err(e) => self.notify_error(e.to_string()),
        }
    }
}

pub fn run_dashboard(feed: &mut LedgerFeed, live: &LiveStatistics) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        if let Err(raw) = disable_raw_mode() {
            warn!(error = %raw, "failed to disable raw mode");
        }
        return Err(e.into());
    }

    let result = (|| -> Result<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;
        let mut state = DashboardState::new();
        let user = feed.owner_id().to_string();

        loop {
            state.expire_status(Instant::now());
            let snapshot = live.snapshot();
            let statistics = live.statistics();
            state.clamp_selection(snapshot.len());

            terminal.draw(|frame| {
                let size = frame.area();
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(5),
                        Constraint::Min(6),
                        Constraint::Length(3),
                    ])
                    .split(size);

                render_cards(frame, layout[0], &user, &statistics);

                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(layout[1]);
                render_table(frame, body[0], &mut state, &snapshot);
                render_categories(frame, body[1], &statistics);
                render_footer(frame, layout[2], &state);

                if state.mode == Mode::Input {
                    render_input_modal(frame, size, &state);
                }
            })?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(feed, live, &mut state, &snapshot, key) {
                        break;
                    }
                }
            }
        }

        Ok(())
    })();

    let restored = restore_terminal(disable_raw_mode, || {
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen)
    });

    result?;
    restored?;
    Ok(())
}

// Both steps always run; the first failure is reported.
fn restore_terminal(
    disable_raw: impl FnOnce() -> io::Result<()>,
    leave_screen: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let raw = disable_raw();
    let screen = leave_screen();
    raw.and(screen)
}

fn handle_key(
    feed: &mut LedgerFeed,
    live: &LiveStatistics,
    state: &mut DashboardState,
    snapshot: &[Transaction],
    key: KeyEvent,
) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match state.mode {
        Mode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => state.move_selection(-1, snapshot.len()),
            KeyCode::Down => state.move_selection(1, snapshot.len()),
            KeyCode::PageUp => state.move_selection(-(max(1, state.last_page_size) as i32), snapshot.len()),
            KeyCode::PageDown => state.move_selection(max(1, state.last_page_size) as i32, snapshot.len()),
            KeyCode::Char('a') => {
                state.input_buffer.clear();
                state.mode = Mode::Input;
            }
            KeyCode::Char('d') | KeyCode::Delete => state.delete_selected(feed, snapshot),
            KeyCode::Char('r') => match feed.current_snapshot() {
                Ok(fresh) => {
                    live.apply(&fresh);
                    state.notify("Refreshed");
                }
                Err(e) => state.notify_error(e.to_string()),
            },
            _ => {}
        },
        Mode::Input => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                state.mode = Mode::List;
                return false;
            }

            match key.code {
                KeyCode::Esc => state.mode = Mode::List,
                KeyCode::Enter => state.commit_input(feed),
                KeyCode::Backspace => {
                    state.input_buffer.pop();
                }
                KeyCode::Char(ch) => state.input_buffer.push(ch),
                _ => {}
            }
        }
    }

    false
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn render_cards(frame: &mut ratatui::Frame, area: Rect, user: &str, statistics: &Statistics) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let savings_color = if statistics.savings.is_sign_negative() {
        Color::Red
    } else {
        Color::Cyan
    };

    let entries = [
        ("Income", statistics.total_credit.to_string(), Color::Green),
        ("Expense", statistics.total_debit.to_string(), Color::Red),
        (
            "Savings",
            statistics.savings.to_string(),
            savings_color,
        ),
    ];

    for (idx, (label, value, color)) in entries.into_iter().enumerate() {
        let title = if idx == 0 {
            format!("{} ({})", label, user)
        } else {
            label.to_string()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, cards[idx]);
    }
}

fn render_table(
    frame: &mut ratatui::Frame,
    area: Rect,
    state: &mut DashboardState,
    snapshot: &[Transaction],
) {
    let block = Block::default().title("Recent Transactions").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new([
        Cell::from("Date").style(bold),
        Cell::from("Type").style(bold),
        Cell::from("Category").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("Id").style(bold),
    ]);

    let rows = snapshot.iter().map(|tx| {
        let color = match tx.transaction_type {
            TransactionType::Credit => Color::Green,
            TransactionType::Debit => Color::Red,
            TransactionType::Other(_) => Color::DarkGray,
        };
        let amount = tx
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());

        Row::new([
            Cell::from(tx.date.format("%Y-%m-%d").to_string()),
            Cell::from(tx.transaction_type.to_string()),
            Cell::from(tx.category.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(amount),
            Cell::from(short_id(&tx.id).to_string()),
        ])
        .style(Style::default().fg(color))
    });

    state.last_page_size = max(1, inner.height.saturating_sub(2) as usize);

    let widths = [
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Min(12),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);

    if snapshot.is_empty() {
        let empty = Paragraph::new("No transactions yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_categories(frame: &mut ratatui::Frame, area: Rect, statistics: &Statistics) {
    let block = Block::default().title("By Category").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = statistics.categories_by_amount();
    if entries.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing to show").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = entries
        .iter()
        .map(|(category, amount)| {
            Line::from(vec![
                Span::raw(format!("{:15}", category)),
                Span::styled(format!("{:>12}", amount), Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let line = match &state.status {
        Some(status) => {
            let color = if status.is_error { Color::Red } else { Color::Green };
            Line::from(Span::styled(status.message.clone(), Style::default().fg(color)))
        }
        None => Line::from(match state.mode {
            Mode::List => "↑/↓ move  a add  d delete  r refresh  q/Esc exit",
            Mode::Input => "Type, Enter save, Esc cancel",
        }),
    };

    frame.render_widget(
        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_input_modal(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let popup_area = centered_rect(70, 30, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "New Transaction",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("type, category, amount[, YYYY-MM-DD]   e.g. Debit, Food, 12.50"),
        Line::from(""),
        Line::from(Span::styled(
            format!("> {}", state.input_buffer),
            Style::default().fg(Color::Yellow),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Add"))
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
