// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use octofit_app::{
    AppCommand, AppEvent, AppMode, AppState, EmptyState, ListView, LoadApplied, LoadOutcome,
    LoadTicket, ResourceKind, RowKey,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const LOADING_MESSAGE: &str = "Loading...";
const FILTER_CURSOR: &str = "█";

/// Source of collection data for the UI. Implementations decide whether a
/// load runs inline or on a background thread.
pub trait AppRuntime {
    fn endpoint(&self, resource: ResourceKind) -> String;
    fn load_collection(&mut self, resource: ResourceKind) -> LoadOutcome;
    fn spawn_load(
        &mut self,
        resource: ResourceKind,
        ticket: LoadTicket,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self.load_collection(resource);
        tx.send(InternalEvent::LoadFinished {
            resource,
            ticket,
            outcome,
        })
        .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    LoadFinished {
        resource: ResourceKind,
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    views: Vec<ListView>,
    cursors: [usize; ResourceKind::ALL.len()],
    endpoints: Vec<String>,
    detail_scroll: u16,
    help_visible: bool,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            views: ResourceKind::ALL
                .iter()
                .map(|kind| ListView::for_resource(*kind))
                .collect(),
            cursors: [0; ResourceKind::ALL.len()],
            endpoints: Vec::new(),
            detail_scroll: 0,
            help_visible: false,
            status_token: 0,
        }
    }
}

impl ViewData {
    fn for_runtime<R: AppRuntime>(runtime: &R) -> Self {
        Self {
            endpoints: ResourceKind::ALL
                .iter()
                .map(|kind| runtime.endpoint(*kind))
                .collect(),
            ..Self::default()
        }
    }

    fn view(&self, tab: ResourceKind) -> &ListView {
        &self.views[tab.index()]
    }

    fn view_mut(&mut self, tab: ResourceKind) -> &mut ListView {
        &mut self.views[tab.index()]
    }

    fn cursor(&self, tab: ResourceKind) -> usize {
        self.cursors[tab.index()]
    }

    fn endpoint(&self, tab: ResourceKind) -> &str {
        self.endpoints
            .get(tab.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn dispose_all(&mut self) {
        for view in &mut self.views {
            view.dispose();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertKind {
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alert {
    kind: AlertKind,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableRowProjection {
    key: RowKey,
    cells: [String; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableProjection {
    rows: Vec<TableRowProjection>,
    trailer: Option<&'static str>,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::for_runtime(runtime);
    let (internal_tx, internal_rx) = mpsc::channel();

    ensure_loaded(runtime, &mut view_data, &internal_tx, state.active_tab);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

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

    view_data.dispose_all();
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::LoadFinished {
                resource,
                ticket,
                outcome,
            } => apply_load_result(state, view_data, tx, resource, ticket, outcome),
        }
    }
}

fn apply_load_result(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    resource: ResourceKind,
    ticket: LoadTicket,
    outcome: LoadOutcome,
) {
    let anchor = cursor_key(view_data, resource);
    let view = view_data.view_mut(resource);
    match view.finish_load(ticket, outcome) {
        LoadApplied::Applied => {
            let notice = view.notice().map(str::to_owned);
            if let Some(error) = view.error() {
                tracing::warn!(resource = resource.as_str(), %error, "load failed");
            }
            restore_cursor(view_data, resource, anchor);
            if let Some(notice) = notice {
                tracing::warn!(resource = resource.as_str(), %notice, "unrecognized response shape");
                emit_status(state, view_data, tx, notice);
            }
        }
        LoadApplied::Stale => {
            tracing::debug!(
                resource = resource.as_str(),
                ticket = ticket.get(),
                "dropping stale load result"
            );
        }
        LoadApplied::Disposed => {
            tracing::debug!(
                resource = resource.as_str(),
                "dropping load result for disposed view"
            );
        }
    }
}

fn ensure_loaded<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    resource: ResourceKind,
) {
    if view_data.view(resource).needs_initial_load() {
        start_load(runtime, view_data, tx, resource);
    }
}

fn start_load<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    resource: ResourceKind,
) {
    let view = view_data.view_mut(resource);
    let ticket = view.begin_load();
    tracing::debug!(
        resource = resource.as_str(),
        ticket = ticket.get(),
        "load started"
    );
    if let Err(error) = runtime.spawn_load(resource, ticket, tx.clone()) {
        tracing::warn!(
            resource = resource.as_str(),
            error = %format!("{error:#}"),
            "load could not start"
        );
        view.finish_load(
            ticket,
            LoadOutcome::Failed(format!("Failed to load {}: {error}", resource.as_str())),
        );
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.home_visible {
        return handle_home_key(state, runtime, view_data, internal_tx, key);
    }

    match state.mode {
        AppMode::Filter => {
            handle_filter_key(state, view_data, internal_tx, key);
            false
        }
        AppMode::Detail => {
            handle_detail_key(state, view_data, internal_tx, key);
            false
        }
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_home_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(digit @ '1'..='5') => {
            if let Some(tab) = tab_for_digit(digit) {
                dispatch_and_refresh(state, runtime, view_data, AppCommand::HideHome, internal_tx);
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::SelectTab(tab),
                    internal_tx,
                );
            }
        }
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('H') => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::HideHome, internal_tx);
        }
        _ => {}
    }
    false
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let tab = state.active_tab;
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => move_row(view_data, tab, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => move_row(view_data, tab, -1),
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            move_row(view_data, tab, HALF_PAGE_ROWS);
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            move_row(view_data, tab, -HALF_PAGE_ROWS);
        }
        (KeyCode::PageDown, _) => move_row(view_data, tab, FULL_PAGE_ROWS),
        (KeyCode::PageUp, _) => move_row(view_data, tab, -FULL_PAGE_ROWS),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => {
            view_data.cursors[tab.index()] = 0;
        }
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            let last = view_data.view(tab).visible_count().saturating_sub(1);
            view_data.cursors[tab.index()] = last;
        }
        (KeyCode::Enter, _) => open_detail(state, runtime, view_data, internal_tx),
        (KeyCode::Char('/'), _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::BeginFilter, internal_tx);
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            view_data.view_mut(tab).clear_filter();
            clamp_cursor(view_data, tab);
            emit_status(state, view_data, internal_tx, "filter reset");
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            start_load(runtime, view_data, internal_tx, tab);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("refreshing {}", tab.as_str()),
            );
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextTab, internal_tx);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevTab, internal_tx);
        }
        (KeyCode::Char(digit @ '1'..='5'), _) => {
            if let Some(target) = tab_for_digit(digit) {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::SelectTab(target),
                    internal_tx,
                );
            }
        }
        (KeyCode::Char('H'), _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ShowHome, internal_tx);
        }
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
        }
        _ => {}
    }
    false
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let tab = state.active_tab;
    match (key.code, key.modifiers) {
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.view_mut(tab).clear_filter();
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let mut query = view_data.view(tab).filter().to_owned();
            query.push(ch);
            view_data.view_mut(tab).set_filter(query);
        }
        (KeyCode::Backspace, _) => {
            let mut query = view_data.view(tab).filter().to_owned();
            query.pop();
            view_data.view_mut(tab).set_filter(query);
        }
        (KeyCode::Enter, _) => {
            state.dispatch(AppCommand::ExitToNav);
            let count = view_data.view(tab).visible_count();
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("filter applied: {count} match(es)"),
            );
        }
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ExitToNav);
        }
        _ => {}
    }
    clamp_cursor(view_data, tab);
}

fn handle_detail_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            view_data.view_mut(state.active_tab).dismiss();
            view_data.detail_scroll = 0;
            state.dispatch(AppCommand::CloseDetail);
            emit_status(state, view_data, internal_tx, "details closed");
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_add(FULL_PAGE_ROWS as u16);
        }
        KeyCode::PageUp => {
            view_data.detail_scroll = view_data.detail_scroll.saturating_sub(FULL_PAGE_ROWS as u16);
        }
        KeyCode::Char('g') => {
            view_data.detail_scroll = 0;
        }
        _ => {}
    }
}

fn open_detail<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let tab = state.active_tab;
    let row = view_data.cursor(tab);
    if !view_data.view_mut(tab).select(row) {
        emit_status(state, view_data, internal_tx, "no row selected");
        return;
    }
    view_data.detail_scroll = 0;
    dispatch_and_refresh(state, runtime, view_data, AppCommand::OpenDetail, internal_tx);
}

fn tab_for_digit(digit: char) -> Option<ResourceKind> {
    let index = digit.to_digit(10)? as usize;
    ResourceKind::ALL.get(index.checked_sub(1)?).copied()
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    for event in state.dispatch(command) {
        if let AppEvent::TabChanged(tab) = event {
            ensure_loaded(runtime, view_data, internal_tx, tab);
            clamp_cursor(view_data, tab);
        }
    }
}

fn move_row(view_data: &mut ViewData, tab: ResourceKind, delta: isize) {
    let count = view_data.view(tab).visible_count();
    if count == 0 {
        view_data.cursors[tab.index()] = 0;
        return;
    }
    let current = view_data.cursor(tab) as isize;
    let next = (current + delta).clamp(0, count as isize - 1);
    view_data.cursors[tab.index()] = next as usize;
}

/// Key of the record under the cursor, when the record carries an id.
fn cursor_key(view_data: &ViewData, tab: ResourceKind) -> Option<RowKey> {
    table_projection(view_data.view(tab))
        .rows
        .into_iter()
        .nth(view_data.cursor(tab))
        .map(|row| row.key)
        .filter(|key| matches!(key, RowKey::Id(_)))
}

fn restore_cursor(view_data: &mut ViewData, tab: ResourceKind, anchor: Option<RowKey>) {
    let found = anchor.and_then(|key| {
        table_projection(view_data.view(tab))
            .rows
            .iter()
            .position(|row| row.key == key)
    });
    if let Some(row) = found {
        view_data.cursors[tab.index()] = row;
    }
    clamp_cursor(view_data, tab);
}

fn clamp_cursor(view_data: &mut ViewData, tab: ResourceKind) {
    let last = view_data.view(tab).visible_count().saturating_sub(1);
    let cursor = &mut view_data.cursors[tab.index()];
    *cursor = (*cursor).min(last);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tab_titles = ResourceKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, view_data.view(*tab)))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .title("Octofit Tracker")
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(state.active_tab.index());
    frame.render_widget(tabs, layout[0]);

    let tab = state.active_tab;
    let view = view_data.view(tab);

    let header_style = match alert_for(view).map(|alert| alert.kind) {
        Some(AlertKind::Error) => Style::default().fg(Color::Red),
        Some(AlertKind::Notice) => Style::default().fg(Color::Yellow),
        None => Style::default(),
    };
    let header = Paragraph::new(header_text(view, view_data.endpoint(tab)))
        .style(header_style)
        .block(
            Block::default()
                .title(view.spec().title)
                .borders(Borders::ALL),
        );
    frame.render_widget(header, layout[1]);

    let filter_style = if state.mode == AppMode::Filter {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let filter = Paragraph::new(filter_line_text(state, view))
        .style(filter_style)
        .block(Block::default().title("filter").borders(Borders::ALL));
    frame.render_widget(filter, layout[2]);

    render_table(frame, layout[3], view, view_data.cursor(tab));

    let footer = Paragraph::new(view.footer()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, layout[4]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[5]);

    if let Some(body) = view.detail_text().filter(|_| state.mode == AppMode::Detail) {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(body)
            .scroll((view_data.detail_scroll, 0))
            .block(
                Block::default()
                    .title(view.spec().detail_title)
                    .title_bottom("j/k scroll | esc close")
                    .borders(Borders::ALL),
            );
        frame.render_widget(detail, area);
    }

    if state.home_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let home = Paragraph::new(home_overlay_text()).block(
            Block::default()
                .title("home")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(home, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ListView, cursor: usize) {
    let projection = table_projection(view);

    let header = Row::new(
        ["#", view.spec().singular, "Summary"]
            .into_iter()
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let mut rows = projection
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let style = if index == cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(row.cells.iter().cloned().map(Cell::from).collect::<Vec<_>>()).style(style)
        })
        .collect::<Vec<_>>();
    if let Some(trailer) = projection.trailer {
        rows.push(
            Row::new(vec![Cell::from(""), Cell::from(trailer), Cell::from("")])
                .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(35),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn table_projection(view: &ListView) -> TableProjection {
    let spec = view.spec();
    let rows = view
        .visible_rows()
        .map(|row| TableRowProjection {
            key: row.record.row_key(row.position),
            cells: [
                (row.position + 1).to_string(),
                row.record
                    .label(spec.label_fields, spec.singular, row.position),
                row.record.summary(),
            ],
        })
        .collect();

    let trailer = if view.is_loading() {
        Some(LOADING_MESSAGE)
    } else {
        view.empty_state().map(EmptyState::message)
    };

    TableProjection { rows, trailer }
}

fn alert_for(view: &ListView) -> Option<Alert> {
    if let Some(error) = view.error() {
        return Some(Alert {
            kind: AlertKind::Error,
            message: error.to_owned(),
        });
    }
    view.notice().map(|notice| Alert {
        kind: AlertKind::Notice,
        message: notice.to_owned(),
    })
}

fn header_text(view: &ListView, endpoint: &str) -> String {
    let mut lines = vec![view.spec().tagline.to_owned()];
    let loaded = view
        .loaded_at()
        .and_then(format_clock)
        .map(|clock| format!(" | loaded {clock}"))
        .unwrap_or_default();
    lines.push(format!("endpoint: {endpoint}{loaded}"));
    if let Some(alert) = alert_for(view) {
        lines.push(alert.message);
    }
    lines.join("\n")
}

fn format_clock(at: OffsetDateTime) -> Option<String> {
    at.format(&time::macros::format_description!(
        "[hour]:[minute]:[second]"
    ))
    .ok()
}

fn filter_line_text(state: &AppState, view: &ListView) -> String {
    let placeholder = format!("Filter {}", view.spec().path);
    match (state.mode, view.filter().is_empty()) {
        (AppMode::Filter, _) => format!("{}{FILTER_CURSOR}", view.filter()),
        (_, true) => format!("{placeholder} (press / to type)"),
        (_, false) => view.filter().to_owned(),
    }
}

fn tab_title(tab: ResourceKind, view: &ListView) -> String {
    let mut title = tab.label().to_owned();
    if view.is_loading() {
        title.push_str(" …");
    } else if view.error().is_some() {
        title.push_str(" !");
    } else if !view.filter().trim().is_empty() {
        title.push_str(&format!(" ({}/{})", view.visible_count(), view.total_count()));
    }
    title
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible || state.home_visible {
        return String::new();
    }

    let (mode, default) = match state.mode {
        AppMode::Nav => (
            "NAV",
            "j/k g/G | enter details | / filter x reset | r refresh | f/b 1-5 tabs | H home | ? help | q quit",
        ),
        AppMode::Filter => (
            "FILTER",
            "type to filter | backspace delete | ctrl+u reset | enter apply | esc done",
        ),
        AppMode::Detail => ("DETAIL", "j/k scroll | esc close"),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn home_overlay_text() -> String {
    let mut lines = vec![
        "Octofit Tracker".to_owned(),
        String::new(),
        "Track activities, manage teams, and see the latest leaderboard stats.".to_owned(),
        String::new(),
    ];
    for (index, tab) in ResourceKind::ALL.iter().enumerate() {
        lines.push(format!("{} {:<12} {}", index + 1, tab.label(), tab.spec().tagline));
    }
    lines.push(String::new());
    lines.push("1-5 open | esc close | q quit".to_owned());
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k up/down | g/G first/last | ctrl+d/u pgup/pgdn half pages\n\
nav: enter details | / filter | x reset filter | r refresh\n\
nav: f/b or tab/shift+tab switch | 1-5 jump to tab | H home | q quit\n\
filter: type to filter live | backspace delete | ctrl+u reset | enter apply | esc done\n\
details: j/k scroll | g top | esc/enter/q close"
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
