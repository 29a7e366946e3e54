use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

use crate::auth::{AuthModal, AuthMode, Phase};
use crate::catalog::Catalog;
use crate::models::{Category, Choice, JobPosting};
use crate::search::{POPULAR_SEARCHES, SearchBar, SearchField};
use crate::state::{Action, AppState, AuthInput, Effect};
use crate::storage::LocalStorage;
use crate::theme::{Palette, load_dark_mode, save_dark_mode};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Listing,
    Search,
}

/// View-only state: what is being typed, what is highlighted.
struct UiState {
    search: SearchBar,
    focus: Focus,
    selected: usize,
    scroll_offset: u16,
}

impl UiState {
    fn new() -> Self {
        Self {
            search: SearchBar::default(),
            focus: Focus::Listing,
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

/// Silences the `log` macros until dropped; stderr shares the alternate screen.
struct MutedLogs(log::LevelFilter);

impl MutedLogs {
    fn new() -> Self {
        let previous = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        Self(previous)
    }
}

impl Drop for MutedLogs {
    fn drop(&mut self) {
        log::set_max_level(self.0);
    }
}

enum KeyOutcome {
    Quit,
    Dispatch(Action),
    Handled,
}

pub fn run_board(catalog: &Catalog, storage: &LocalStorage) -> Result<()> {
    let state = AppState::new(load_dark_mode(storage)?);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = {
        let _muted = MutedLogs::new();
        run_loop(&mut terminal, state, catalog, storage)
    };

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state: AppState,
    catalog: &Catalog,
    storage: &LocalStorage,
) -> Result<()> {
    let mut ui = UiState::new();
    let mut list_state = ListState::default();

    loop {
        let visible = state.visible(catalog);
        ui.clamp(state.cursor.page(&visible).len());
        list_state.select((!visible.is_empty()).then_some(ui.selected));

        terminal.draw(|frame| draw(frame, &state, &ui, &visible, &mut list_state))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, &state, &mut ui, &visible) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Dispatch(action) => state = dispatch(state, action, storage),
                    KeyOutcome::Handled => {}
                }
            }
        }
        state = dispatch(state, Action::Tick, storage);
    }
    Ok(())
}

fn dispatch(state: AppState, action: Action, storage: &LocalStorage) -> AppState {
    let (state, effect) = state.reduce(action, Instant::now());
    if let Some(Effect::PersistDarkMode(dark)) = effect {
        if let Err(e) = save_dark_mode(storage, dark) {
            log::warn!("Failed to save theme preference: {:#}", e);
        }
    }
    state
}

fn handle_key(
    key: KeyEvent,
    state: &AppState,
    ui: &mut UiState,
    visible: &[&JobPosting],
) -> KeyOutcome {
    if state.auth.is_open() {
        return handle_auth_key(key, &state.auth);
    }
    if let Some(term) = popular_term(key.code) {
        ui.focus = Focus::Listing;
        return KeyOutcome::Dispatch(Action::Search(ui.search.quick_search(term)));
    }
    match ui.focus {
        Focus::Search => handle_search_key(key, ui),
        Focus::Listing => handle_listing_key(key, state, ui, visible),
    }
}

fn handle_auth_key(key: KeyEvent, auth: &AuthModal) -> KeyOutcome {
    if auth.phase() == Phase::Succeeded && key.code == KeyCode::Enter {
        return KeyOutcome::Dispatch(Action::CloseAuth);
    }
    let input = match key.code {
        KeyCode::Esc => return KeyOutcome::Dispatch(Action::CloseAuth),
        KeyCode::Tab | KeyCode::Down => AuthInput::NextField,
        KeyCode::BackTab | KeyCode::Up => AuthInput::PrevField,
        KeyCode::Enter => AuthInput::Submit,
        KeyCode::Backspace => AuthInput::Backspace,
        KeyCode::F(2) => AuthInput::SwitchMode,
        KeyCode::F(3) => AuthInput::TogglePassword,
        KeyCode::Char(c) => AuthInput::Char(c),
        _ => return KeyOutcome::Handled,
    };
    KeyOutcome::Dispatch(Action::Auth(input))
}

fn handle_search_key(key: KeyEvent, ui: &mut UiState) -> KeyOutcome {
    let search = &mut ui.search;
    match key.code {
        KeyCode::Esc => ui.focus = Focus::Listing,
        KeyCode::Enter => {
            ui.focus = Focus::Listing;
            return KeyOutcome::Dispatch(Action::Search(search.submit()));
        }
        KeyCode::Tab => search.focus_next(),
        KeyCode::BackTab => search.focus_prev(),
        KeyCode::Left => search.cycle(false),
        KeyCode::Right => search.cycle(true),
        KeyCode::Backspace => search.backspace(),
        KeyCode::Char(c) => search.type_char(c),
        _ => {}
    }
    KeyOutcome::Handled
}

fn handle_listing_key(
    key: KeyEvent,
    state: &AppState,
    ui: &mut UiState,
    visible: &[&JobPosting],
) -> KeyOutcome {
    let page = state.cursor.page(visible);
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Down | KeyCode::Char('j') => {
            ui.next(page.len());
            return KeyOutcome::Handled;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.prev();
            return KeyOutcome::Handled;
        }
        KeyCode::Char('J') | KeyCode::PageDown => {
            ui.scroll_down();
            return KeyOutcome::Handled;
        }
        KeyCode::Char('K') | KeyCode::PageUp => {
            ui.scroll_up();
            return KeyOutcome::Handled;
        }
        KeyCode::Char('/') => {
            ui.focus = Focus::Search;
            return KeyOutcome::Handled;
        }
        KeyCode::Char('f') => {
            ui.search.toggle_filters();
            return KeyOutcome::Handled;
        }
        KeyCode::Char('c') if ui.search.has_input() => Action::Search(ui.search.clear()),
        KeyCode::Char(c @ '1'..='6') => {
            Action::SelectCategory(Category::ALL[c as usize - '1' as usize])
        }
        KeyCode::Left => Action::SelectCategory(step_category(state.category, false)),
        KeyCode::Right => Action::SelectCategory(step_category(state.category, true)),
        KeyCode::Char('v') => Action::ToggleSavedOnly,
        KeyCode::Char('s') | KeyCode::Char(' ') => match page.get(ui.selected) {
            Some(job) => Action::ToggleSave(job.id),
            None => return KeyOutcome::Handled,
        },
        KeyCode::Char('m') if state.cursor.has_more(visible.len()) => Action::LoadMore,
        KeyCode::Char('d') => Action::ToggleDarkMode,
        KeyCode::Char('i') => Action::OpenAuth(AuthMode::Login),
        KeyCode::Char('r') => Action::OpenAuth(AuthMode::Register),
        _ => return KeyOutcome::Handled,
    };
    KeyOutcome::Dispatch(action)
}

fn step_category(current: Category, forward: bool) -> Category {
    let all = Category::ALL;
    let at = all.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward {
        (at + 1) % all.len()
    } else {
        (at + all.len() - 1) % all.len()
    };
    all[next]
}

fn draw(
    frame: &mut Frame,
    state: &AppState,
    ui: &UiState,
    visible: &[&JobPosting],
    list_state: &mut ListState,
) {
    let p = Palette::for_mode(state.dark_mode);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(p.bg).fg(p.text)),
        area,
    );

    let search_height = if ui.search.show_filters() { 6 } else { 3 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(search_height),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_nav(frame, rows[0], state, &p);
    draw_search(frame, rows[1], ui, &p);
    draw_popular(frame, rows[2], &p);
    draw_categories(frame, rows[3], state, &p);
    draw_listing(frame, rows[4], state, ui, visible, list_state, &p);

    let help = if state.auth.is_open() {
        " Tab:next field  Enter:submit  F2:login/register  F3:show password  Esc:close".to_string()
    } else if ui.focus == Focus::Search {
        " Tab:next field  \u{2190}/\u{2192}:change option  Enter:search  Esc:back".to_string()
    } else {
        let clear = if ui.search.has_input() { "c:clear  " } else { "" };
        format!(
            " j/k:navigate  /:search  f:filters  {}1-6:category  v:saved  s:save  m:more  d:theme  i/r:login/register  q:quit",
            clear
        )
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(p.muted)),
        rows[5],
    );

    if let Some(toast) = &state.toast {
        draw_toast(frame, rows[4], toast.message, &p);
    }
    if state.auth.is_open() {
        draw_auth(frame, area, &state.auth, &p);
    }
}

fn draw_nav(frame: &mut Frame, area: Rect, state: &AppState, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    let brand = Line::from(vec![
        Span::styled(
            " SeekJob ",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Jobs  Companies  About  Blog  Contact",
            Style::default().fg(p.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(brand), chunks[0]);

    let theme = if state.dark_mode { "\u{263e} Dark" } else { "\u{2600} Light" };
    let actions = Line::from(vec![
        Span::styled(format!("{}  ", theme), Style::default().fg(p.muted)),
        Span::styled("[i] Login  ", Style::default().fg(p.text)),
        Span::styled(
            "[r] Register ",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
    ])
    .alignment(Alignment::Right);
    frame.render_widget(Paragraph::new(actions), chunks[1]);
}

fn draw_popular(frame: &mut Frame, area: Rect, p: &Palette) {
    let mut spans = vec![Span::styled(" Popular: ", Style::default().fg(p.muted))];
    for (i, term) in POPULAR_SEARCHES.iter().enumerate() {
        spans.push(Span::styled(
            format!("F{}", i + 5),
            Style::default().fg(p.accent),
        ));
        spans.push(Span::styled(format!(" {}   ", term), Style::default().fg(p.text)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn popular_term(key: KeyCode) -> Option<&'static str> {
    match key {
        KeyCode::F(n @ 5..=9) => POPULAR_SEARCHES.get(usize::from(n - 5)).copied(),
        _ => None,
    }
}

fn draw_search(frame: &mut Frame, area: Rect, ui: &UiState, p: &Palette) {
    let fields = ui.search.fields();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(area);

    for (row, chunk) in fields.chunks(3).zip(rows.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(*chunk);
        for (field, col) in row.iter().zip(cols.iter()) {
            draw_search_field(frame, *col, ui, *field, p);
        }
    }
}

fn draw_search_field(frame: &mut Frame, area: Rect, ui: &UiState, field: SearchField, p: &Palette) {
    let focused = ui.focus == Focus::Search && ui.search.focus() == field;
    let mut spans = match ui.search.display(field) {
        Some(value) if field.is_text() => {
            vec![Span::styled(value.to_string(), Style::default().fg(p.text))]
        }
        Some(value) => vec![Span::styled(
            format!("\u{25c2} {} \u{25b8}", value),
            Style::default().fg(p.text),
        )],
        None => vec![Span::styled(field.placeholder(), Style::default().fg(p.muted))],
    };
    if focused && field.is_text() {
        spans.push(Span::styled("\u{258f}", Style::default().fg(p.accent)));
    }

    let title = match field {
        SearchField::Job => " Job ",
        SearchField::Company => " Company ",
        SearchField::Location => " Location ",
        SearchField::Sort => " Sort ",
        SearchField::Type => " Type ",
        SearchField::Level => " Level ",
    };
    let border = if focused { p.accent } else { p.border };
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    frame.render_widget(widget, area);
}

fn draw_categories(frame: &mut Frame, area: Rect, state: &AppState, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(14)])
        .split(area);

    let titles = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {}", i + 1, c.label()));
    let selected = Category::ALL
        .iter()
        .position(|c| *c == state.category)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(p.muted))
        .highlight_style(
            Style::default()
                .fg(p.bg)
                .bg(p.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" ");
    frame.render_widget(tabs, chunks[0]);

    let saved_style = if state.saved_only {
        Style::default().fg(p.bg).bg(p.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(p.muted)
    };
    let saved = Paragraph::new(Span::styled(
        format!("\u{2665} Saved ({})", state.saved.len()),
        saved_style,
    ))
    .alignment(Alignment::Right);
    frame.render_widget(saved, chunks[1]);
}

fn draw_listing(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    ui: &UiState,
    visible: &[&JobPosting],
    list_state: &mut ListState,
    p: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let page = state.cursor.page(visible);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(format!(
            " Latest Job Listings ({} opportunities found) ",
            visible.len()
        ));
    if state.cursor.has_more(visible.len()) {
        block = block.title_bottom(
            Line::from(format!(
                " m: Load More Jobs ({} more) ",
                visible.len() - page.len()
            ))
            .alignment(Alignment::Right),
        );
    }

    if page.is_empty() {
        let msg = if state.saved_only && state.saved.is_empty() {
            "No saved jobs yet. Press s on a listing to save it."
        } else {
            "No jobs found. Try adjusting your search filters."
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(p.muted))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = page
            .iter()
            .map(|job| {
                let saved = if state.saved.contains(job.id) { "\u{2665} " } else { "  " };
                let featured = if job.featured { "\u{2605} " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(saved, Style::default().fg(p.accent)),
                    Span::styled(featured, Style::default().fg(p.featured)),
                    Span::styled(
                        crate::truncate(&job.title, 24),
                        Style::default().fg(p.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", job.company), Style::default().fg(p.muted)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(p.surface)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[0], list_state);
    }

    let detail = match page.get(ui.selected) {
        Some(job) => build_detail(job, state, p, chunks[1].width),
        None => Text::raw("No job selected"),
    };
    let detail_widget = Paragraph::new(detail)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(" Detail "),
        )
        .wrap(Wrap { trim: false })
        .scroll((ui.scroll_offset, 0));
    frame.render_widget(detail_widget, chunks[1]);
}

fn build_detail<'a>(job: &'a JobPosting, state: &AppState, p: &Palette, width: u16) -> Text<'a> {
    let mut lines: Vec<Line> = Vec::new();

    // Header
    let mut header = vec![Span::styled(
        &job.title,
        Style::default().fg(p.text).add_modifier(Modifier::BOLD),
    )];
    if job.featured {
        header.push(Span::styled(
            "  \u{2b50} Featured",
            Style::default().fg(p.featured),
        ));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(Span::styled(
        &job.company,
        Style::default().fg(p.muted),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}]", job.job_type.as_str()),
            Style::default().fg(p.accent),
        ),
        Span::styled(
            format!(
                "  {}  \u{b7}  {}  \u{b7}  {}",
                job.location,
                job.time,
                job.level.label()
            ),
            Style::default().fg(p.muted),
        ),
    ]));
    lines.push(Line::from(""));

    let wrap_width = usize::from(width.saturating_sub(4)).max(20);
    for line in textwrap::fill(&job.desc, wrap_width).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        job.tags.join(" \u{b7} "),
        Style::default().fg(p.muted),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(
            &job.salary,
            Style::default().fg(p.salary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" /year", Style::default().fg(p.muted)),
    ]));
    lines.push(Line::from(""));

    if state.saved.contains(job.id) {
        lines.push(Line::from(Span::styled(
            "\u{2665} Saved (s to remove)",
            Style::default().fg(p.accent),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "\u{2661} Press s to save",
            Style::default().fg(p.muted),
        )));
    }

    Text::from(lines)
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, p: &Palette) {
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let height = area.height.min(3);
    let rect = Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area.bottom().saturating_sub(height + 1).max(area.y),
        width,
        height,
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bg(p.accent))
            .block(Block::default().borders(Borders::ALL)),
        rect,
    );
}

fn draw_auth(frame: &mut Frame, area: Rect, auth: &AuthModal, p: &Palette) {
    let mode = auth.mode();
    let fields = mode.fields();
    let rect = centered_rect(60, fields.len() as u16 * 3 + 6, area);

    let mut lines: Vec<Line> = Vec::new();
    match auth.phase() {
        Phase::Succeeded => {
            let (title, message) = mode.success_text();
            lines.push(Line::from(""));
            lines.push(
                Line::from(Span::styled(
                    format!("\u{2713} {}", title),
                    Style::default().fg(p.success).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
            lines.push(Line::from(message).alignment(Alignment::Center));
            lines.push(Line::from(""));
            lines.push(
                Line::from(Span::styled(
                    format!("[ {} ]", mode.success_button()),
                    Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
        }
        phase => {
            for field in fields {
                let focused = auth.focused() == *field;
                let value = auth.fields().get(*field);
                let shown = if !auth.is_revealed(*field) {
                    "\u{2022}".repeat(value.chars().count())
                } else {
                    value.to_string()
                };
                let label_style = if focused {
                    Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(p.muted)
                };
                lines.push(Line::from(Span::styled(field.label(), label_style)));
                let cursor = if focused { "\u{258f}" } else { "" };
                lines.push(Line::from(format!("  {}{}", shown, cursor)));
                lines.push(match auth.error(*field) {
                    Some(err) => Line::from(Span::styled(
                        format!("  {}", err),
                        Style::default().fg(p.error),
                    )),
                    None => Line::from(""),
                });
            }

            let button = match phase {
                Phase::Submitting(_) => mode.pending_label(),
                _ => mode.title(),
            };
            lines.push(
                Line::from(Span::styled(
                    format!("[ {} ]", button),
                    Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
            let switch = match mode {
                AuthMode::Login => "Don't have an account? F2: Register",
                AuthMode::Register => "Already have an account? F2: Sign In",
            };
            lines.push(
                Line::from(Span::styled(switch, Style::default().fg(p.muted)))
                    .alignment(Alignment::Center),
            );
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.surface).fg(p.text))
        .title(format!(" {} ", mode.heading()));
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
