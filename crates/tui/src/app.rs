use std::{
    collections::HashSet,
    io,
    ops::Range,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use radar_core::{
    catalog::{self, DateKind, GameFilter, ReleaseStatus},
    dates,
    error::FormError,
    events::EventCalendar,
    form::{
        self, CreditField, CreditList, ErrorField, FieldPath, FormEdit, FormMode, FormPhase,
        GameForm, SubmitOutcome,
    },
    leaks::LeakPost,
    models::{Game, GameDocument, GameId, Platform, ReleaseDate},
    prefs::{FilterPreferences, PreferenceStore},
    state::{AppState, Modal, View},
    store::{AuthProvider, DocumentStore, GameRepository, LocalAuth},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::feeds::{FeedEvent, Feeds};

const TICK_RATE: Duration = Duration::from_millis(250);
const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    level: NoticeLevel,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct LoginForm {
    email: String,
    password: String,
    on_password: bool,
}

impl LoginForm {
    fn active_mut(&mut self) -> &mut String {
        if self.on_password {
            &mut self.password
        } else {
            &mut self.email
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

struct FormModal {
    form: GameForm,
    focus: usize,
}

impl FormModal {
    fn new(form: GameForm) -> Self {
        Self { form, focus: 0 }
    }

    fn focused(&self) -> Option<FieldPath> {
        self.form.draft().fields().get(self.focus).copied()
    }

    fn move_focus(&mut self, delta: isize) {
        let total = self.form.draft().fields().len() as isize;
        if total == 0 {
            self.focus = 0;
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(total) as usize;
    }

    fn clamp_focus(&mut self) {
        let total = self.form.draft().fields().len();
        if self.focus >= total {
            self.focus = total.saturating_sub(1);
        }
    }

    fn focused_credit(&self) -> Option<(CreditList, usize, CreditField)> {
        match self.focused()? {
            FieldPath::Credit { list, index, field } => Some((list, index, field)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Create,
    Update,
    Delete,
}

impl WriteKind {
    fn success_message(self) -> &'static str {
        match self {
            WriteKind::Create => "Game added successfully!",
            WriteKind::Update => "Game updated successfully!",
            WriteKind::Delete => "Game deleted.",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            WriteKind::Create => "Failed to add game.",
            WriteKind::Update => "Failed to update game.",
            WriteKind::Delete => "Failed to delete game.",
        }
    }
}

enum WriteOp {
    Create(GameDocument),
    Update(GameId, GameDocument),
    Delete(GameId),
}

impl WriteOp {
    fn kind(&self) -> WriteKind {
        match self {
            WriteOp::Create(_) => WriteKind::Create,
            WriteOp::Update(..) => WriteKind::Update,
            WriteOp::Delete(_) => WriteKind::Delete,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    WriteFinished(WriteKind, Result<(), String>),
}

#[derive(Debug, Default, Clone, Copy)]
struct ListCursor {
    cursor: usize,
    offset: usize,
    height: usize,
}

impl ListCursor {
    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            *self = Self {
                height: self.height,
                ..Self::default()
            };
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = idx as usize;
        self.ensure_visible(len);
    }

    fn move_to(&mut self, index: usize, len: usize) {
        self.cursor = index;
        self.move_by(0, len);
    }

    fn page(&mut self, direction: isize, len: usize) {
        let step = self.height.max(1) as isize;
        self.move_by(step * direction, len);
    }

    fn ensure_visible(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            self.offset = 0;
            return;
        }
        if self.cursor >= len {
            self.cursor = len - 1;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        self.offset = self.offset.min(len.saturating_sub(self.height));
    }

    fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = (start + self.height.max(1)).min(len);
        start..end
    }
}

/// Terminal frontend: games catalog, weekly events and the leaks listing.
pub struct RadarApp {
    store: Arc<DocumentStore>,
    auth: Arc<LocalAuth>,
    preferences: PreferenceStore,
    feeds: Feeds,
    feed_rx: Option<mpsc::Receiver<FeedEvent>>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    state: AppState,
    theme: Theme,
    mode: InputMode,
    games: Vec<Game>,
    visible: Vec<Game>,
    filter: GameFilter,
    filters_visible: bool,
    expanded: HashSet<GameId>,
    games_cursor: ListCursor,
    calendar: EventCalendar<Local>,
    events_loading: bool,
    leaks: Vec<LeakPost>,
    leaks_loading: bool,
    leaks_cursor: ListCursor,
    login: LoginForm,
    form: Option<FormModal>,
    deleting: bool,
    notice: Option<Notice>,
    should_quit: bool,
}

impl RadarApp {
    pub fn new(
        store: Arc<DocumentStore>,
        auth: Arc<LocalAuth>,
        preferences: PreferenceStore,
        feeds: Feeds,
    ) -> Self {
        let saved = preferences.load();
        let mut filter = GameFilter::default();
        saved.apply_to(&mut filter);
        let leaks_loading = feeds.has_leaks();
        Self {
            store,
            auth,
            preferences,
            feeds,
            feed_rx: None,
            event_tx: None,
            state: AppState::new(),
            theme: Theme::default(),
            mode: InputMode::Browse,
            games: Vec::new(),
            visible: Vec::new(),
            filter,
            filters_visible: saved.is_active(),
            expanded: HashSet::new(),
            games_cursor: ListCursor::default(),
            calendar: EventCalendar::empty(Local),
            events_loading: true,
            leaks: Vec::new(),
            leaks_loading,
            leaks_cursor: ListCursor::default(),
            login: LoginForm::default(),
            form: None,
            deleting: false,
            notice: None,
            should_quit: false,
        }
    }

    pub fn attach_feeds(&mut self, receiver: mpsc::Receiver<FeedEvent>) {
        self.feed_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut subscription = self
            .store
            .subscribe()
            .context("failed to subscribe to the games collection")?;
        let mut auth_rx = self.auth.watch();
        let signed_in = auth_rx.borrow_and_update().is_some();
        self.state.set_signed_in(signed_in);

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        let mut feed_rx = self.feed_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    if !self.process_app_event(maybe_event) {
                        break;
                    }
                }
                Some(games) = subscription.next() => self.apply_snapshot(games),
                changed = auth_rx.changed() => {
                    if changed.is_ok() {
                        let signed_in = auth_rx.borrow_and_update().is_some();
                        self.handle_auth_change(signed_in);
                    }
                }
                Some(update) = recv_feed(&mut feed_rx) => self.handle_feed_event(update),
            }
        }

        subscription.dispose();
        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    error!(?err, "input handling failed");
                    self.notify(NoticeLevel::Error, format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            Some(AppEvent::WriteFinished(kind, result)) => {
                self.handle_write_finished(kind, result);
                true
            }
            None => false,
        }
    }

    fn handle_tick(&mut self) {
        if self
            .notice
            .as_ref()
            .map_or(false, |notice| notice.expires_at <= Instant::now())
        {
            self.notice = None;
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            level,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    fn apply_snapshot(&mut self, games: Vec<Game>) {
        debug!(count = games.len(), "games snapshot received");
        let selected = self.selected_game().map(|game| game.id.clone());
        self.games = games;
        self.refresh_visible(selected.as_ref());
    }

    fn refresh_visible(&mut self, keep: Option<&GameId>) {
        self.visible = catalog::visible_games(&self.games, &self.filter, &Utc::now());
        let len = self.visible.len();
        match keep.and_then(|id| self.visible.iter().position(|game| &game.id == id)) {
            Some(index) => self.games_cursor.move_to(index, len),
            None => self.games_cursor.move_by(0, len),
        }
    }

    fn handle_auth_change(&mut self, signed_in: bool) {
        if self.state.signed_in() == signed_in {
            return;
        }
        self.state.set_signed_in(signed_in);
        self.sync_form_with_modal();
        info!(signed_in, "auth state changed");
    }

    fn handle_feed_event(&mut self, update: FeedEvent) {
        match update {
            FeedEvent::Events { ical, custom } => {
                let query = self.calendar.query().to_string();
                self.calendar = EventCalendar::new(ical, custom, &Utc::now(), Local);
                if !query.is_empty() {
                    self.calendar.set_query(&query);
                }
                self.events_loading = false;
                info!(count = self.calendar.events().len(), "events calendar refreshed");
            }
            FeedEvent::Leaks(posts) => {
                self.leaks = posts;
                self.leaks_loading = false;
                let len = self.visible_leaks().len();
                self.leaks_cursor.move_by(0, len);
            }
            FeedEvent::Unavailable(message) => self.notify(NoticeLevel::Error, message),
        }
    }

    fn handle_write_finished(&mut self, kind: WriteKind, result: Result<(), String>) {
        if let Err(err) = &result {
            error!(?kind, %err, "store write failed");
        }
        match kind {
            WriteKind::Delete => {
                self.deleting = false;
                if result.is_ok() {
                    self.state.close_modal();
                }
            }
            WriteKind::Create | WriteKind::Update => {
                if let Some(modal) = self.form.as_mut() {
                    if let Err(err) = modal.form.finish_submit(result.clone()) {
                        warn!(%err, "write finished without a pending submission");
                    }
                    if modal.form.phase() == &FormPhase::Succeeded {
                        self.state.close_modal();
                        self.form = None;
                    }
                }
            }
        }
        match result {
            Ok(()) => self.notify(NoticeLevel::Success, kind.success_message()),
            Err(_) => self.notify(NoticeLevel::Error, kind.failure_message()),
        }
    }

    fn spawn_write(&self, op: WriteOp) {
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let kind = op.kind();
            let result = match op {
                WriteOp::Create(document) => store.create(document).map(|_| ()),
                WriteOp::Update(id, document) => store.update(&id, document),
                WriteOp::Delete(id) => store.delete(&id),
            }
            .map_err(|err| err.to_string());
            if sender
                .blocking_send(AppEvent::WriteFinished(kind, result))
                .is_err()
            {
                warn!(?kind, "write finished after the UI closed");
            }
        });
    }

    fn sync_form_with_modal(&mut self) {
        let keep = matches!(
            self.state.modal(),
            Some(Modal::AddGame) | Some(Modal::EditGame(_))
        );
        if !keep {
            self.form = None;
        }
    }

    fn selected_game(&self) -> Option<&Game> {
        self.visible.get(self.games_cursor.cursor)
    }

    fn game_by_id(&self, id: &GameId) -> Option<&Game> {
        self.games.iter().find(|game| &game.id == id)
    }

    fn visible_leaks(&self) -> Vec<&LeakPost> {
        let needle = self.state.search().to_lowercase();
        self.leaks
            .iter()
            .filter(|post| needle.is_empty() || post.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn save_filters(&mut self) {
        let preferences = FilterPreferences::from_filter(&self.filter);
        if let Err(err) = self.preferences.save(&preferences) {
            error!(?err, "failed to save filter preferences");
            self.notify(NoticeLevel::Error, "Could not save filters");
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != event::KeyEventKind::Press {
            return Ok(());
        }
        if let Some(modal) = self.state.modal().cloned() {
            return self.handle_modal_key(modal, key);
        }
        match self.mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Browse => self.handle_browse_key(key),
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Browse;
                self.state.set_search("");
                self.sync_search();
            }
            KeyCode::Enter => self.mode = InputMode::Browse,
            KeyCode::Backspace => {
                let mut text = self.state.search().to_string();
                text.pop();
                self.state.set_search(text);
                self.sync_search();
            }
            KeyCode::Char(ch) if is_text_input(&key) => {
                let mut text = self.state.search().to_string();
                text.push(ch);
                self.state.set_search(text);
                self.sync_search();
            }
            _ => {}
        }
    }

    fn sync_search(&mut self) {
        let search = self.state.search().to_string();
        if self.filter.search != search {
            self.filter.search = search.clone();
            let selected = self.selected_game().map(|game| game.id.clone());
            self.refresh_visible(selected.as_ref());
        }
        if self.state.view() == View::Events && self.calendar.query() != search {
            let found = self.calendar.set_query(&search);
            if !found && !search.trim().is_empty() {
                self.notify(NoticeLevel::Info, format!("No event matches \"{search}\""));
            }
        }
        if self.state.view() == View::Leaks {
            let len = self.visible_leaks().len();
            self.leaks_cursor.move_to(0, len);
        }
    }

    fn switch_view(&mut self, view: View) {
        self.state.switch_view(view);
        self.mode = InputMode::Browse;
        if !self.calendar.query().is_empty() {
            self.calendar.set_query("");
        }
        self.sync_search();
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.switch_view(self.state.view().next());
                return;
            }
            KeyCode::BackTab => {
                let previous = self.state.view().next().next();
                self.switch_view(previous);
                return;
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
                return;
            }
            KeyCode::Char('L') => {
                self.toggle_session();
                return;
            }
            _ => {}
        }
        match self.state.view() {
            View::Games => self.handle_games_key(key),
            View::Events => self.handle_events_key(key),
            View::Leaks => self.handle_leaks_key(key),
        }
    }

    fn toggle_session(&mut self) {
        if self.state.signed_in() {
            self.auth.sign_out();
            self.handle_auth_change(false);
            self.notify(NoticeLevel::Info, "Signed out");
        } else {
            self.login.clear();
            self.state.request_login();
        }
    }

    fn handle_games_key(&mut self, key: KeyEvent) {
        let len = self.visible.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.games_cursor.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.games_cursor.move_by(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.games_cursor.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => {
                self.games_cursor.move_to(len.saturating_sub(1), len)
            }
            KeyCode::PageDown => self.games_cursor.page(1, len),
            KeyCode::PageUp => self.games_cursor.page(-1, len),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_game().map(|game| game.id.clone()) {
                    if !self.expanded.remove(&id) {
                        self.expanded.insert(id);
                    }
                }
            }
            KeyCode::Esc => self.state.clear_focus(),
            KeyCode::Char('e') => self.state.toggle_expand_all(),
            KeyCode::Char('f') => self.focus_featured(),
            KeyCode::Char('F') => self.filters_visible = !self.filters_visible,
            KeyCode::Char('d') => {
                self.filter.date_kind = self.filter.date_kind.toggled();
                self.refresh_visible(None);
            }
            KeyCode::Char('u') => {
                self.filter.release_status = match self.filter.release_status {
                    None => Some(ReleaseStatus::Upcoming),
                    Some(ReleaseStatus::Upcoming) => Some(ReleaseStatus::Released),
                    Some(ReleaseStatus::Released) => None,
                };
                self.filters_visible = true;
                self.refresh_visible(None);
                self.save_filters();
            }
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                if let Some(platform) = Platform::ALL.get(index).copied() {
                    if !self.filter.platforms.remove(&platform) {
                        self.filter.platforms.insert(platform);
                    }
                    self.filters_visible = true;
                    self.refresh_visible(None);
                    self.save_filters();
                }
            }
            KeyCode::Char('R') => self.reset_filters(),
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('E') => {
                if self.state.toggle_edit_mode() {
                    let message = if self.state.edit_mode() {
                        "Edit mode on"
                    } else {
                        "Edit mode off"
                    };
                    self.notify(NoticeLevel::Info, message);
                } else {
                    self.notify(NoticeLevel::Info, "Sign in to edit games");
                }
            }
            KeyCode::Char('m') => self.open_edit_form(),
            KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(id) = self.selected_game().map(|game| game.id.clone()) {
                    if !self.state.request_delete(id) {
                        self.notify(NoticeLevel::Info, "Enable edit mode (E) to delete games");
                    }
                }
            }
            _ => {}
        }
    }

    fn reset_filters(&mut self) {
        self.filter.platforms.clear();
        self.filter.release_status = None;
        self.refresh_visible(None);
        match self.preferences.clear() {
            Ok(()) => self.notify(NoticeLevel::Info, "Filters reset"),
            Err(err) => {
                error!(?err, "failed to clear filter preferences");
                self.notify(NoticeLevel::Error, "Could not reset saved filters");
            }
        }
    }

    fn focus_featured(&mut self) {
        let Some(id) = catalog::select_featured(&self.games, &Utc::now(), &Local)
            .map(|game| game.id.clone())
        else {
            self.notify(NoticeLevel::Info, "No upcoming release");
            return;
        };
        self.state.focus_featured(id.clone());
        if !self.visible.iter().any(|game| game.id == id) {
            self.state.set_search("");
            self.filter.search.clear();
            self.filter.date_kind = DateKind::Dated;
            self.filter.release_status = None;
        }
        self.expanded.insert(id.clone());
        self.refresh_visible(Some(&id));
    }

    fn open_add_form(&mut self) {
        self.state.request_add();
        match self.state.modal() {
            Some(Modal::AddGame) => self.form = Some(FormModal::new(GameForm::add())),
            _ => {
                self.login.clear();
                self.notify(NoticeLevel::Info, "Sign in to add games");
            }
        }
    }

    fn open_edit_form(&mut self) {
        let Some(game) = self.selected_game().cloned() else {
            return;
        };
        if self.state.request_edit(game.id.clone()) {
            self.form = Some(FormModal::new(GameForm::edit(&game)));
        } else {
            self.notify(NoticeLevel::Info, "Enable edit mode (E) to edit games");
        }
    }

    fn handle_events_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.calendar.shift(-1),
            KeyCode::Char('l') | KeyCode::Right => self.calendar.shift(1),
            KeyCode::Char('t') => self.calendar.reset(),
            KeyCode::Char('r') => {
                self.events_loading = true;
                self.feeds.refresh_events();
            }
            _ => {}
        }
    }

    fn handle_leaks_key(&mut self, key: KeyEvent) {
        let len = self.visible_leaks().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.leaks_cursor.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.leaks_cursor.move_by(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.leaks_cursor.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => {
                self.leaks_cursor.move_to(len.saturating_sub(1), len)
            }
            KeyCode::PageDown => self.leaks_cursor.page(1, len),
            KeyCode::PageUp => self.leaks_cursor.page(-1, len),
            KeyCode::Char('r') => {
                if self.feeds.has_leaks() {
                    self.leaks_loading = true;
                    self.feeds.refresh_leaks();
                }
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> Result<()> {
        match modal {
            Modal::Login => self.handle_login_key(key),
            Modal::AddGame | Modal::EditGame(_) => self.handle_form_key(key),
            Modal::ConfirmDelete(id) => self.handle_delete_key(id, key),
        }
        Ok(())
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.login.clear();
                self.state.close_modal();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.on_password = !self.login.on_password;
            }
            KeyCode::Enter => {
                if !self.login.on_password && self.login.password.is_empty() {
                    self.login.on_password = true;
                    return;
                }
                let email = self.login.email.clone();
                match self.auth.sign_in(&email, &self.login.password) {
                    Ok(session) => {
                        self.login.clear();
                        self.handle_auth_change(true);
                        let message = format!("Signed in as {}", session.email);
                        self.notify(NoticeLevel::Success, message);
                    }
                    Err(err) => {
                        self.login.password.clear();
                        self.notify(NoticeLevel::Error, err.to_string());
                    }
                }
            }
            KeyCode::Backspace => {
                self.login.active_mut().pop();
            }
            KeyCode::Char(ch) if is_text_input(&key) => self.login.active_mut().push(ch),
            _ => {}
        }
    }

    fn handle_delete_key(&mut self, id: GameId, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if self.deleting {
                    return;
                }
                self.deleting = true;
                self.spawn_write(WriteOp::Delete(id));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                if !self.deleting {
                    self.state.close_modal();
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.form.as_mut() else {
            self.state.close_modal();
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let edit = match key.code {
            KeyCode::Esc => {
                if modal.form.is_submitting() {
                    self.notify(NoticeLevel::Info, "Saving, please wait");
                } else {
                    self.form = None;
                    self.state.close_modal();
                }
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                modal.move_focus(1);
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                modal.move_focus(-1);
                return;
            }
            KeyCode::Enter => {
                self.submit_form();
                return;
            }
            KeyCode::F(n @ 1..=5) => FormEdit::TogglePlatform(Platform::ALL[usize::from(n - 1)]),
            KeyCode::Char('t') if ctrl => FormEdit::ToggleReleaseLabel,
            KeyCode::Char('n') if ctrl => FormEdit::AddCredit(CreditList::Developers),
            KeyCode::Char('e') if ctrl => FormEdit::AddCredit(CreditList::Editors),
            KeyCode::Char('d') if ctrl => match modal.focused_credit() {
                Some((list, index, _)) => FormEdit::RemoveCredit(list, index),
                None => return,
            },
            KeyCode::Char('f') if ctrl => {
                let Some((list, index, CreditField::Name)) = modal.focused_credit() else {
                    return;
                };
                let query = modal
                    .form
                    .draft()
                    .credits(list)
                    .get(index)
                    .map(|company| company.name.clone())
                    .unwrap_or_default();
                match form::suggestions(&self.games, list, &query).into_iter().next() {
                    Some(company) => FormEdit::ApplySuggestion {
                        list,
                        index,
                        company,
                    },
                    None => return,
                }
            }
            KeyCode::Backspace => {
                let Some(path) = modal.focused() else { return };
                let mut value = modal.form.draft().value(path).unwrap_or_default().to_string();
                value.pop();
                FormEdit::Set(path, value)
            }
            KeyCode::Char(ch) if is_text_input(&key) => {
                let Some(path) = modal.focused() else { return };
                let mut value = modal.form.draft().value(path).unwrap_or_default().to_string();
                value.push(ch);
                FormEdit::Set(path, value)
            }
            _ => return,
        };
        if let Err(err) = modal.form.apply(edit) {
            self.notify(NoticeLevel::Info, err.to_string());
            return;
        }
        modal.clamp_focus();
    }

    fn submit_form(&mut self) {
        let Some(modal) = self.form.as_mut() else {
            return;
        };
        let target = match modal.form.mode() {
            FormMode::Add => None,
            FormMode::Edit(id) => Some(id.clone()),
        };
        match modal.form.begin_submit() {
            Ok(SubmitOutcome::Ready(document)) => {
                let op = match target {
                    Some(id) => WriteOp::Update(id, document),
                    None => WriteOp::Create(document),
                };
                self.spawn_write(op);
            }
            Ok(SubmitOutcome::Invalid(errors)) => {
                let count = errors.iter().count();
                self.notify(
                    NoticeLevel::Error,
                    format!("Please fix {count} field(s) before saving"),
                );
            }
            Err(FormError::Unchanged) => self.notify(NoticeLevel::Info, "No changes to save"),
            Err(err) => self.notify(NoticeLevel::Info, err.to_string()),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_tabs(frame, chunks[0]);
        match self.state.view() {
            View::Games => self.draw_games(frame, chunks[1]),
            View::Events => self.draw_events(frame, chunks[1]),
            View::Leaks => self.draw_leaks(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);

        match self.state.modal() {
            Some(Modal::Login) => self.render_login(frame),
            Some(Modal::AddGame) | Some(Modal::EditGame(_)) => self.render_form(frame),
            Some(Modal::ConfirmDelete(id)) => self.render_delete_confirm(frame, id),
            None => {}
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for view in View::ALL {
            let style = if view == self.state.view() {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.theme.muted)
            };
            spans.push(Span::styled(format!(" {} ", view.title()), style));
            spans.push(Span::raw(" "));
        }
        let session = match self.auth.current() {
            Some(session) => Span::styled(
                format!("  admin: {}", session.email),
                Style::default().fg(self.theme.success),
            ),
            None => Span::styled("  signed out", Style::default().fg(self.theme.muted)),
        };
        spans.push(session);
        if self.state.edit_mode() {
            spans.push(Span::styled(
                "  EDIT",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Release Radar"));
        frame.render_widget(paragraph, area);
    }

    fn draw_games(&mut self, frame: &mut Frame, area: Rect) {
        let featured_lines = self.featured_lines();
        let mut constraints = Vec::new();
        if !featured_lines.is_empty() {
            constraints.push(Constraint::Length(featured_lines.len() as u16 + 2));
        }
        if self.filters_visible {
            constraints.push(Constraint::Length(4));
        }
        constraints.push(Constraint::Min(5));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut chunk_iter = chunks.iter().copied();
        if !featured_lines.is_empty() {
            if let Some(chunk) = chunk_iter.next() {
                let banner = Paragraph::new(featured_lines)
                    .block(Block::default().borders(Borders::ALL).title("Next release"))
                    .wrap(Wrap { trim: true });
                frame.render_widget(banner, chunk);
            }
        }
        if self.filters_visible {
            if let Some(chunk) = chunk_iter.next() {
                self.render_filters(frame, chunk);
            }
        }
        let body = chunk_iter.next().unwrap_or(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        self.render_game_list(frame, columns[0]);
        self.render_game_detail(frame, columns[1]);
    }

    fn featured_lines(&self) -> Vec<Line<'static>> {
        let now = Utc::now();
        let Some(game) = catalog::select_featured(&self.games, &now, &Local) else {
            return Vec::new();
        };
        let Some(instant) = game.release_date().instant() else {
            return Vec::new();
        };
        vec![
            Line::from(vec![
                Span::styled(
                    game.name().to_string(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  By {}", catalog::format_credits(&game.document.developers)),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
            Line::from(vec![
                Span::styled(
                    catalog::release_message(&instant, &now, &Local),
                    Style::default().fg(self.theme.accent),
                ),
                Span::raw(format!(
                    "  ({})  press f to jump to it",
                    dates::format_release_day(&instant, &Local)
                )),
            ]),
        ]
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let available = catalog::available_platforms(&self.games);
        let mut chips = vec![Span::raw("Platforms: ")];
        for (index, platform) in Platform::ALL.iter().enumerate() {
            let style = if self.filter.platforms.contains(platform) {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if available.contains(platform) {
                Style::default().fg(self.theme.primary_fg)
            } else {
                Style::default().fg(self.theme.muted)
            };
            chips.push(Span::styled(format!("[{}] {}", index + 1, platform.label()), style));
            chips.push(Span::raw("  "));
        }
        let dates_label = match self.filter.date_kind {
            DateKind::Dated => "dated",
            DateKind::Labelled => "to be dated",
        };
        let status_label = match self.filter.release_status {
            None => "all",
            Some(ReleaseStatus::Upcoming) => "upcoming only",
            Some(ReleaseStatus::Released) => "released only",
        };
        let summary = Line::from(vec![
            Span::raw("Showing "),
            Span::styled(dates_label, Style::default().fg(self.theme.accent_alt)),
            Span::raw(" games (d)  Status: "),
            Span::styled(status_label, Style::default().fg(self.theme.accent_alt)),
            Span::raw(" (u)  R resets"),
        ]);
        let paragraph = Paragraph::new(vec![Line::from(chips), summary])
            .block(Block::default().borders(Borders::ALL).title("Filters"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        self.games_cursor.height = usize::from(area.height.saturating_sub(2)).max(1);
        self.games_cursor.ensure_visible(self.visible.len());

        let window = self.games_cursor.window(self.visible.len());
        let offset = window.start;
        let items: Vec<ListItem> = self.visible[window]
            .iter()
            .map(|game| self.game_item(game))
            .collect();

        let mut list_state = ListState::default();
        if !self.visible.is_empty() {
            list_state.select(Some(self.games_cursor.cursor.saturating_sub(offset)));
        }
        let title = format!("Games ({})", self.visible.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn game_item(&self, game: &Game) -> ListItem<'static> {
        let focused = self.state.featured_focus() == Some(&game.id);
        let name_style = if focused {
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.primary_fg)
                .add_modifier(Modifier::BOLD)
        };
        let platforms: Vec<&str> = game.document.platforms.enabled().map(Platform::key).collect();
        let mut lines = vec![Line::from(vec![
            Span::styled(game.name().to_string(), name_style),
            Span::styled(
                format!("  {}", release_label(game.release_date())),
                Style::default().fg(self.theme.accent_alt),
            ),
            Span::styled(
                format!("  {}", platforms.join(" ")),
                Style::default().fg(self.theme.muted),
            ),
        ])];
        let expanded = self.state.expand_all() || focused || self.expanded.contains(&game.id);
        if expanded {
            lines.push(Line::from(Span::styled(
                format!(
                    "  Dev: {}  Pub: {}",
                    catalog::format_credits(&game.document.developers),
                    catalog::format_credits(&game.document.editors)
                ),
                Style::default().fg(self.theme.muted),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "  Critics {}  Players {}",
                    game.document.ratings.display_critics(),
                    game.document.ratings.display_players()
                ),
                Style::default().fg(self.theme.muted),
            )));
        }
        ListItem::new(lines)
    }

    fn render_game_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let Some(game) = self.selected_game() else {
            let message = if self.games.is_empty() {
                "No games yet. Sign in (L) and press a to add one."
            } else {
                "No game matches the current filters."
            };
            frame.render_widget(
                Paragraph::new(message).block(block).wrap(Wrap { trim: true }),
                area,
            );
            return;
        };

        let now = Utc::now();
        let label_style = Style::default().fg(self.theme.muted);
        let badge = if catalog::is_released(game, &now) {
            Span::styled("Released", Style::default().fg(self.theme.success))
        } else {
            Span::styled("Coming soon", Style::default().fg(self.theme.warning))
        };
        let mut lines = vec![
            Line::from(Span::styled(
                game.name().to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(badge),
            Line::from(vec![
                Span::styled("Site: ", label_style),
                Span::raw(game.document.link.clone()),
            ]),
            Line::from(vec![
                Span::styled("Release: ", label_style),
                Span::raw(release_label(game.release_date())),
            ]),
        ];
        if let Some(instant) = game.release_date().instant() {
            lines.push(Line::from(Span::styled(
                catalog::release_message(&instant, &now, &Local),
                Style::default().fg(self.theme.accent_alt),
            )));
        }
        lines.push(Line::from(""));
        for (title, companies) in [
            ("Developers", &game.document.developers),
            ("Editors", &game.document.editors),
        ] {
            lines.push(Line::from(Span::styled(format!("{title}:"), label_style)));
            for company in companies {
                lines.push(Line::from(format!("  {}  {}", company.name, company.link)));
            }
        }
        let platforms: Vec<&str> = game
            .document
            .platforms
            .enabled()
            .map(Platform::label)
            .collect();
        lines.push(Line::from(vec![
            Span::styled("Platforms: ", label_style),
            Span::raw(platforms.join(", ")),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Ratings: ", label_style),
            Span::raw(format!(
                "critics {}  players {}",
                game.document.ratings.display_critics(),
                game.document.ratings.display_players()
            )),
        ]));
        if let Some(link) = &game.document.ratings.link {
            lines.push(Line::from(format!("  {link}")));
        }
        if self.state.edit_mode() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "m edit  D delete",
                Style::default().fg(self.theme.warning),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
    }

    fn draw_events(&mut self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        let week = self
            .calendar
            .current_week()
            .unwrap_or_else(|| self.calendar.this_week(&now));
        let mut title = format!("Week of {}", dates::format_week_range(week));
        if self.events_loading {
            title.push_str("  (loading…)");
        }

        let days = self.calendar.current_days();
        let mut lines: Vec<Line> = Vec::new();
        if self.calendar.current_week_is_empty() {
            let message = if self.calendar.events().is_empty() && !self.events_loading {
                "No events available."
            } else {
                "No events this week."
            };
            lines.push(Line::from(Span::styled(message, Style::default().fg(self.theme.muted))));
        }
        for (day, events) in days {
            lines.push(Line::from(Span::styled(
                dates::format_day_heading(day),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for item in events {
                let time = if item.all_day {
                    "All day".to_string()
                } else {
                    dates::format_time_range(&item.start, item.end.as_ref(), &Local)
                };
                let mut spans = vec![
                    Span::styled(
                        format!("  {time:<15}"),
                        Style::default().fg(self.theme.accent_alt),
                    ),
                    Span::styled(
                        item.title.clone(),
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                ];
                if item.duration.is_some() {
                    spans.push(Span::styled(
                        format!("  {}", dates::format_duration(item.duration)),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                if item.source == radar_core::models::EventSource::Custom {
                    spans.push(Span::styled("  ★", Style::default().fg(self.theme.warning)));
                }
                lines.push(Line::from(spans));
                if let Some(description) = &item.description {
                    lines.push(Line::from(Span::styled(
                        format!("    {description}"),
                        Style::default().fg(self.theme.muted),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_leaks(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);
        self.leaks_cursor.height = usize::from(chunks[0].height.saturating_sub(2) / 2).max(1);

        let len = self.visible_leaks().len();
        self.leaks_cursor.ensure_visible(len);
        let posts = self.visible_leaks();
        let window = self.leaks_cursor.window(posts.len());
        let offset = window.start;
        let items: Vec<ListItem> = posts[window]
            .iter()
            .map(|post| {
                let mut header = vec![Span::styled(
                    post.title.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                )];
                if let Some(flair) = &post.flair {
                    header.push(Span::styled(
                        format!("  [{flair}]"),
                        Style::default().fg(self.theme.warning),
                    ));
                }
                let published = post.published.with_timezone(&Local).format("%Y-%m-%d %H:%M");
                let byline = match &post.author {
                    Some(author) => format!("  Published: {published} by u/{author}"),
                    None => format!("  Published: {published}"),
                };
                ListItem::new(vec![
                    Line::from(header),
                    Line::from(Span::styled(byline, Style::default().fg(self.theme.muted))),
                ])
            })
            .collect();

        let mut list_state = ListState::default();
        if !posts.is_empty() {
            list_state.select(Some(self.leaks_cursor.cursor.saturating_sub(offset)));
        }
        let mut title = format!("Leaks & Rumours ({})", posts.len());
        if self.leaks_loading {
            title.push_str("  (loading…)");
        } else if !self.feeds.has_leaks() {
            title.push_str("  (feed disabled)");
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        let link = posts
            .get(self.leaks_cursor.cursor)
            .map(|post| post.url.clone())
            .unwrap_or_default();
        let footer = Paragraph::new(link)
            .block(Block::default().borders(Borders::ALL).title("Link"))
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, chunks[1]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.mode == InputMode::Search {
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(self.theme.accent)),
                Span::raw(format!("{}_", self.state.search())),
            ])
        } else if let Some(notice) = &self.notice {
            let color = match notice.level {
                NoticeLevel::Info => self.theme.primary_fg,
                NoticeLevel::Success => self.theme.success,
                NoticeLevel::Error => self.theme.danger,
            };
            Line::from(Span::styled(notice.message.clone(), Style::default().fg(color)))
        } else if !self.state.search().is_empty() {
            Line::from(format!(
                "Search: {}  (/ to change, Esc in search to clear)",
                self.state.search()
            ))
        } else {
            Line::from("Ready")
        };
        let hints = match self.state.view() {
            View::Games => "Tab views  / search  j/k move  Enter expand  e expand all  f next release  F filters  1-5 platforms  a add  E edit mode  L login  q quit",
            View::Events => "Tab views  / search  h/l week  t this week  r refresh  L login  q quit",
            View::Leaks => "Tab views  / search  j/k move  r refresh  L login  q quit",
        };
        let paragraph = Paragraph::new(vec![
            primary,
            Line::from(Span::styled(hints, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_login(&self, frame: &mut Frame) {
        let area = centered_rect(56, 8, frame.size());
        frame.render_widget(Clear, area);
        let field = |label: &str, value: String, active: bool| {
            let marker = if active { "▶ " } else { "  " };
            Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(self.theme.accent)),
                Span::styled(format!("{label:<10}"), Style::default().fg(self.theme.muted)),
                Span::raw(value),
            ])
        };
        let lines = vec![
            field("Email", self.login.email.clone(), !self.login.on_password),
            field(
                "Password",
                "•".repeat(self.login.password.chars().count()),
                self.login.on_password,
            ),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" sign in  "),
                Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" switch field  "),
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Admin sign-in"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame) {
        let Some(modal) = self.form.as_ref() else {
            return;
        };
        let size = frame.size();
        let area = centered_rect(
            size.width.saturating_sub(8).min(90),
            size.height.saturating_sub(4),
            size,
        );
        frame.render_widget(Clear, area);

        let game_form = &modal.form;
        let draft = game_form.draft();
        let mut lines: Vec<Line> = Vec::new();
        for (index, path) in draft.fields().into_iter().enumerate() {
            let active = index == modal.focus;
            let marker = if active { "▶ " } else { "  " };
            let mut label = path.to_string();
            if path == FieldPath::ReleaseDate {
                label = if draft.release_is_label {
                    "Release label".to_string()
                } else {
                    "Release (YYYY-MM-DD)".to_string()
                };
            }
            let value_style = if active {
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.accent)),
                Span::styled(format!("{label:<22}"), Style::default().fg(self.theme.muted)),
                Span::styled(draft.value(path).unwrap_or_default().to_string(), value_style),
            ]));
        }

        let mut platforms = vec![Span::styled(
            format!("  {:<22}", "Platforms"),
            Style::default().fg(self.theme.muted),
        )];
        for (index, platform) in Platform::ALL.iter().enumerate() {
            let enabled = draft.platforms.is_enabled(*platform);
            let style = if enabled {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            let check = if enabled { "x" } else { " " };
            platforms.push(Span::styled(
                format!("F{} [{check}] {}  ", index + 1, platform.label()),
                style,
            ));
        }
        lines.push(Line::from(platforms));

        if let Some((list, index, CreditField::Name)) = modal.focused_credit() {
            let query = draft
                .credits(list)
                .get(index)
                .map(|company| company.name.as_str())
                .unwrap_or_default();
            let names: Vec<String> = form::suggestions(&self.games, list, query)
                .into_iter()
                .take(5)
                .map(|company| company.name)
                .collect();
            if !names.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  Known (Ctrl+F): {}", names.join(", ")),
                    Style::default().fg(self.theme.accent_alt),
                )));
            }
        }

        lines.push(Line::from(""));
        if let Some(errors) = game_form.errors() {
            for (field, message) in errors.iter() {
                let prefix = match field {
                    ErrorField::Ratings => "⚠ ",
                    _ => "✗ ",
                };
                lines.push(Line::from(Span::styled(
                    format!("{prefix}{message}"),
                    Style::default().fg(self.theme.danger),
                )));
            }
        }
        match game_form.phase() {
            FormPhase::Submitting => lines.push(Line::from(Span::styled(
                "Saving…",
                Style::default().fg(self.theme.warning),
            ))),
            FormPhase::Editing {
                failure: Some(message),
            } => lines.push(Line::from(Span::styled(
                format!("Last save failed: {message}"),
                Style::default().fg(self.theme.danger),
            ))),
            _ => {}
        }
        let submit_hint = match game_form.mode() {
            FormMode::Edit(_) if !game_form.has_changes() => "no changes",
            FormMode::Edit(_) => "Enter save changes",
            FormMode::Add => "Enter add game",
        };
        lines.push(Line::from(Span::styled(
            format!("{submit_hint}  Tab/↑↓ field  Ctrl+T date/label  Ctrl+N/E add dev/editor  Ctrl+D remove  Esc close"),
            Style::default().fg(self.theme.muted),
        )));

        let title = match game_form.mode() {
            FormMode::Add => "Add game".to_string(),
            FormMode::Edit(id) => match self.game_by_id(id) {
                Some(game) => format!("Edit {}", game.name()),
                None => "Edit game".to_string(),
            },
        };
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_delete_confirm(&self, frame: &mut Frame, id: &GameId) {
        let area = centered_rect(52, 6, frame.size());
        frame.render_widget(Clear, area);
        let name = self
            .game_by_id(id)
            .map(|game| game.name().to_string())
            .unwrap_or_else(|| id.to_string());
        let action = if self.deleting {
            Line::from(Span::styled("Deleting…", Style::default().fg(self.theme.warning)))
        } else {
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" delete  "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" keep"),
            ])
        };
        let paragraph = Paragraph::new(vec![
            Line::from(format!("Delete \"{name}\" permanently?")),
            Line::from(""),
            action,
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm delete")
                .border_style(Style::default().fg(self.theme.danger)),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

async fn recv_feed(receiver: &mut Option<mpsc::Receiver<FeedEvent>>) -> Option<FeedEvent> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

fn release_label(release_date: &ReleaseDate) -> String {
    match release_date {
        ReleaseDate::Label(label) => label.clone(),
        stamp => stamp
            .instant()
            .map(|instant| dates::format_release_day(&instant, &Local))
            .unwrap_or_default(),
    }
}

fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        let next = match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => AppEvent::Input(evt),
                Err(_) => break,
            },
            Ok(false) => AppEvent::Tick,
            Err(_) => break,
        };
        if sender.blocking_send(next).is_err() {
            break;
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds_and_visible() {
        let mut cursor = ListCursor {
            height: 3,
            ..ListCursor::default()
        };
        cursor.move_by(5, 10);
        assert_eq!(cursor.cursor, 5);
        assert_eq!(cursor.window(10), 3..6);

        cursor.move_by(-10, 10);
        assert_eq!(cursor.cursor, 0);
        assert_eq!(cursor.offset, 0);

        cursor.page(1, 10);
        assert_eq!(cursor.cursor, 3);
        cursor.move_to(42, 10);
        assert_eq!(cursor.cursor, 9);
        assert_eq!(cursor.window(10), 7..10);

        cursor.move_by(0, 2);
        assert_eq!(cursor.cursor, 1);
        assert_eq!(cursor.offset, 0);

        cursor.move_by(1, 0);
        assert_eq!((cursor.cursor, cursor.offset, cursor.height), (0, 0, 3));
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 40, area), area);
    }

    #[test]
    fn release_labels_keep_free_text() {
        assert_eq!(release_label(&ReleaseDate::Label("Q3 2026".to_string())), "Q3 2026");
        assert!(!release_label(&ReleaseDate::Timestamp(1_772_323_200)).is_empty());
    }

    #[test]
    fn write_messages_match_the_operation() {
        assert_eq!(WriteKind::Create.success_message(), "Game added successfully!");
        assert_eq!(WriteKind::Update.failure_message(), "Failed to update game.");
    }
}
