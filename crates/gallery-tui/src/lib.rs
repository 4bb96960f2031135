// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gallery_app::{
    ArtworkPage, ArtworkRecord, PAGE_SIZE_OPTIONS, PageRequest, PageState, TableCommand,
    TableEvent, TableState, parse_select_count,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";
const SELECT_INPUT_MAX_CHARS: usize = 9;
const COLUMN_LABELS: [&str; 6] = [
    "Title",
    "Place of Origin",
    "Artist Display",
    "Inscriptions",
    "Date Start",
    "Date End",
];

/// Source of artwork pages. `spawn_fetch_page` must eventually deliver
/// exactly one `FetchEvent` for the request on `tx`; the default runs the
/// fetch inline.
pub trait AppRuntime {
    fn fetch_page(&mut self, request: PageRequest) -> Result<ArtworkPage>;

    fn spawn_fetch_page(&mut self, request: PageRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.fetch_page(request) {
            Ok(page) => FetchEvent::Loaded {
                request_id: request.request_id,
                page,
            },
            Err(error) => FetchEvent::Failed {
                request_id: request.request_id,
                error: format!("{error:#}"),
            },
        };
        tx.send(InternalEvent::Fetch(event))
            .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    Loaded { request_id: u64, page: ArtworkPage },
    Failed { request_id: u64, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Fetch(FetchEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SelectPopoverState {
    visible: bool,
    input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    cursor: usize,
    select_popover: SelectPopoverState,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut TableState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    apply_table_command(
        state,
        runtime,
        &mut view_data,
        &internal_tx,
        TableCommand::Reload,
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetch(FetchEvent::Loaded { request_id, page }) => {
                apply_table_command(
                    state,
                    runtime,
                    view_data,
                    tx,
                    TableCommand::PageLoaded { request_id, page },
                );
            }
            InternalEvent::Fetch(FetchEvent::Failed { request_id, error }) => {
                apply_table_command(
                    state,
                    runtime,
                    view_data,
                    tx,
                    TableCommand::PageFailed { request_id, error },
                );
            }
        }
    }
}

fn apply_table_command<R: AppRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: TableCommand,
) {
    for event in state.dispatch(command) {
        match event {
            TableEvent::FetchRequested(request) => {
                tracing::debug!(
                    request_id = request.request_id,
                    page = request.page_number(),
                    limit = request.size,
                    "page fetch requested"
                );
                if let Err(error) = runtime.spawn_fetch_page(request, tx.clone()) {
                    tracing::warn!(
                        request_id = request.request_id,
                        error = %format!("{error:#}"),
                        "could not start page fetch"
                    );
                    apply_table_command(
                        state,
                        runtime,
                        view_data,
                        tx,
                        TableCommand::PageFailed {
                            request_id: request.request_id,
                            error: format!("{error:#}"),
                        },
                    );
                }
            }
            TableEvent::PageChanged { .. } => {
                view_data.cursor = 0;
            }
            TableEvent::PageReplaced { records, total } => {
                tracing::debug!(records, total, "page applied");
                view_data.cursor = view_data.cursor.min(records.saturating_sub(1));
            }
            TableEvent::FetchFailed { request_id, error } => {
                tracing::warn!(request_id, %error, "artworks fetch failed; keeping previous page");
            }
            TableEvent::StaleResponseDiscarded { request_id } => {
                tracing::debug!(request_id, "discarding stale page response");
            }
            TableEvent::SelectionChanged { count } => {
                tracing::trace!(count, "selection changed");
            }
            TableEvent::QuotaChanged(remaining) => {
                tracing::debug!(remaining, "selection quota updated");
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.select_popover.visible {
        handle_select_popover_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        KeyCode::Char('s') => {
            view_data.select_popover = SelectPopoverState {
                visible: true,
                input: String::new(),
            };
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if view_data.cursor + 1 < state.records.len() {
                view_data.cursor += 1;
            }
            return false;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
            return false;
        }
        KeyCode::Char(' ') => {
            let Some(record) = state.records.get(view_data.cursor) else {
                return false;
            };
            TableCommand::ToggleRow(record.id)
        }
        KeyCode::Char('a') => TableCommand::ToggleAllOnPage,
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => TableCommand::NextPage,
        KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => TableCommand::PrevPage,
        KeyCode::Char('g') => TableCommand::FirstPage,
        KeyCode::Char('G') => TableCommand::LastPage,
        KeyCode::Char('+') | KeyCode::Char('=') => TableCommand::CyclePageSize(1),
        KeyCode::Char('-') => TableCommand::CyclePageSize(-1),
        KeyCode::Char('r') => TableCommand::Reload,
        KeyCode::Char('x') => {
            apply_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::ClearSelection,
            );
            emit_status(view_data, internal_tx, "selection cleared");
            return false;
        }
        _ => return false,
    };

    apply_table_command(state, runtime, view_data, internal_tx, command);
    false
}

fn handle_select_popover_key<R: AppRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.select_popover = SelectPopoverState::default();
        }
        KeyCode::Backspace => {
            view_data.select_popover.input.pop();
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '-' => {
            if view_data.select_popover.input.chars().count() < SELECT_INPUT_MAX_CHARS {
                view_data.select_popover.input.push(ch);
            }
        }
        KeyCode::Enter => {
            let Some(count) = parse_select_count(&view_data.select_popover.input) else {
                emit_status(view_data, internal_tx, "enter a positive number of rows");
                return;
            };
            apply_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::SelectFirst(count),
            );
            view_data.select_popover = SelectPopoverState::default();
            let message = if state.pending_quota > 0 {
                format!(
                    "{} selected; {} more from upcoming pages",
                    state.selection.len(),
                    state.pending_quota
                )
            } else {
                format!("{} selected", state.selection.len())
            };
            emit_status(view_data, internal_tx, message);
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &TableState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let paginator = Paragraph::new(render_paginator_text(&state.page))
        .block(Block::default().title("gallery").borders(Borders::ALL));
    frame.render_widget(paginator, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let selection = Paragraph::new(render_selection_text(state))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("selection").borders(Borders::ALL));
    frame.render_widget(selection, layout[2]);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if view_data.select_popover.visible {
        let area = centered_rect(40, 30, frame.area());
        frame.render_widget(Clear, area);
        let popover = Paragraph::new(render_select_popover_text(&view_data.select_popover))
            .block(
                Block::default()
                    .title("select rows")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(popover, area);
    }

    if view_data.help_visible {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &TableState,
    view_data: &ViewData,
) {
    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Min(12),
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let bold = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let header_cells = std::iter::once(Cell::from(header_checkbox_label(state)).style(bold))
        .chain(
            COLUMN_LABELS
                .iter()
                .map(|label| Cell::from(*label).style(bold)),
        );
    let header = Row::new(header_cells);

    let rows = state.records.iter().enumerate().map(|(row_index, record)| {
        let checked = state.selection.contains(record.id);
        let mut style = Style::default();
        if checked {
            style = style.fg(Color::Cyan);
        }
        if row_index == view_data.cursor {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        let cells = row_cells(record, checked)
            .into_iter()
            .map(Cell::from)
            .collect::<Vec<_>>();
        Row::new(cells).style(style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_checkbox_label(state: &TableState) -> &'static str {
    if state.all_on_page_selected() {
        CHECKED
    } else {
        UNCHECKED
    }
}

fn row_cells(record: &ArtworkRecord, checked: bool) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let year = |value: Option<i64>| value.map(|year| year.to_string()).unwrap_or_default();
    vec![
        if checked { CHECKED } else { UNCHECKED }.to_owned(),
        text(&record.title),
        text(&record.place_of_origin),
        text(&record.artist_display),
        text(&record.inscriptions),
        year(record.date_start),
        year(record.date_end),
    ]
}

fn table_title(state: &TableState) -> String {
    if state.loading {
        "artworks (loading...)".to_owned()
    } else {
        "artworks".to_owned()
    }
}

fn render_paginator_text(page: &PageState) -> String {
    let pages = page.page_count().max(1);
    let rows = match page.row_range() {
        Some((first, last)) => format!("{first}-{last} of {}", page.total),
        None => format!("0 of {}", page.total),
    };
    let sizes = PAGE_SIZE_OPTIONS
        .iter()
        .map(|size| {
            if *size == page.size {
                format!("[{size}]")
            } else {
                size.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "page {}/{pages} | rows {rows} | per page {sizes}",
        page.index + 1
    )
}

fn render_selection_text(state: &TableState) -> String {
    let ids = state
        .selection
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = format!("count: {}", state.selection.len());
    if state.pending_quota > 0 {
        out.push_str(&format!(" | pending: {}", state.pending_quota));
    }
    out.push('\n');
    if ids.is_empty() {
        out.push_str("(none)");
    } else {
        out.push_str(&format!("ids: [{ids}]"));
    }
    out
}

fn render_select_popover_text(popover: &SelectPopoverState) -> String {
    format!(
        "rows to select: {}_\n\nenter select | esc cancel",
        popover.input
    )
}

fn status_text(view_data: &ViewData) -> String {
    let default = "j/k row | space toggle | a page | s select n | h/l page | +/- size | ? help | q";
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "j/k, up/down    move row cursor\n\
     space           toggle row\n\
     a               toggle every row on this page\n\
     s               select the first N unselected rows\n\
     l/n/right       next page\n\
     h/p/left        previous page\n\
     g/G             first/last page\n\
     +/-             cycle rows per page\n\
     r               reload page\n\
     x               clear selection\n\
     ?               close help\n\
     q/esc/ctrl+c    quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
