//! App state and core application logic
//!
//! Manages routing, the navigation stack, and per-screen state. Key presses
//! become intents for the acquisition controller or requests for the
//! peripheral screens; backend work is queued as `AppEffect`s for the
//! runtime and comes back as `AppEvent`s.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::acquisition::{
    AcquisitionController, Completion, Effect, Intent, LockPolicy, QueryEdit, ShowView, Tab,
};
use crate::api::GatewayError;
use crate::models::{LogEntry, ShowSummary};

// =============================================================================
// Routes
// =============================================================================

/// Screen currently displayed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// `/` - tracked series list
    #[default]
    Series,
    /// `/show/{id}` - show detail and acquisition
    Show(String),
    /// `/logs` - backend log records
    Logs,
    /// `/tasks` - background task triggers
    Tasks,
}

impl Route {
    /// Parse a route path such as `/show/42`
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Series),
            "/logs" => Some(Route::Logs),
            "/tasks" => Some(Route::Tasks),
            _ => {
                let id = trimmed.strip_prefix("/show/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::Show(id.to_string()))
                }
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Series => "SERIES",
            Route::Show(_) => "SHOW",
            Route::Logs => "LOGS",
            Route::Tasks => "TASKS",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Series => write!(f, "/"),
            Route::Show(id) => write!(f, "/show/{}", id),
            Route::Logs => write!(f, "/logs"),
            Route::Tasks => write!(f, "/tasks"),
        }
    }
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for the peripheral screens
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update length (e.g., when a new snapshot comes in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Peripheral Screen State
// =============================================================================

/// Series list state
#[derive(Debug, Clone, Default)]
pub struct SeriesState {
    pub shows: Vec<ShowSummary>,
    pub list: ListState,
    pub loading: LoadingState,
    /// Only list shows with missing seasons
    pub only_missing: bool,
    /// Tag of the latest list request; older responses are dropped
    pub request: u64,
}

impl SeriesState {
    pub fn set_shows(&mut self, shows: Vec<ShowSummary>) {
        self.list.set_len(shows.len());
        self.shows = shows;
        self.loading = LoadingState::Idle;
    }

    pub fn selected_show(&self) -> Option<&ShowSummary> {
        self.shows.get(self.list.selected)
    }
}

/// Logs table state
#[derive(Debug, Clone, Default)]
pub struct LogsState {
    pub records: Vec<LogEntry>,
    pub list: ListState,
    pub loading: LoadingState,
    pub request: u64,
}

impl LogsState {
    pub fn set_records(&mut self, records: Vec<LogEntry>) {
        self.list.set_len(records.len());
        self.records = records;
        self.loading = LoadingState::Idle;
    }
}

/// "Sync all" trigger state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TaskStatus {
    #[default]
    Idle,
    /// Waiting for the user to confirm
    Confirming,
    Pending,
    Done,
    Failed(String),
}

// =============================================================================
// Effects and Events
// =============================================================================

/// Backend work requested by the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEffect {
    Acquisition(Effect),
    LoadShows { request: u64, only_missing: bool },
    LoadLogs { request: u64 },
    SyncAll,
}

/// Results delivered back to the app
#[derive(Debug)]
pub enum AppEvent {
    Acquisition(Completion),
    ShowsLoaded {
        request: u64,
        result: Result<Vec<ShowSummary>, GatewayError>,
    },
    LogsLoaded {
        request: u64,
        result: Result<Vec<LogEntry>, GatewayError>,
    },
    SyncFinished(Result<(), GatewayError>),
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    pub route: Route,
    /// Navigation history stack
    pub nav_stack: Vec<Route>,
    pub running: bool,
    pub input_mode: InputMode,

    pub series: SeriesState,
    pub acquisition: AcquisitionController,
    /// Cursor within the active show tab
    pub show_list: ListState,
    pub logs: LogsState,
    pub tasks: TaskStatus,

    effects: Vec<AppEffect>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(LockPolicy::default(), true)
    }
}

impl App {
    pub fn new(policy: LockPolicy, only_missing: bool) -> Self {
        Self {
            route: Route::Series,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,

            series: SeriesState {
                only_missing,
                ..SeriesState::default()
            },
            acquisition: AcquisitionController::new(policy),
            show_list: ListState::default(),
            logs: LogsState::default(),
            tasks: TaskStatus::Idle,

            effects: Vec::new(),
        }
    }

    /// Enter the initial route without touching the history
    pub fn start(&mut self, route: Route) {
        self.route = route;
        self.activate();
    }

    /// Navigate to a new route, pushing the current one to the stack
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            self.leave_current();
            let prev = std::mem::replace(&mut self.route, route);
            self.nav_stack.push(prev);
            self.activate();
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous route
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.leave_current();
            self.route = prev;
            self.activate();
            true
        } else {
            false
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Mounted show view, if the detail route is active
    pub fn show_view(&self) -> Option<&ShowView> {
        self.acquisition.view()
    }

    /// Drain queued backend work
    pub fn take_effects(&mut self) -> Vec<AppEffect> {
        std::mem::take(&mut self.effects)
    }

    fn leave_current(&mut self) {
        if matches!(self.route, Route::Show(_)) {
            self.intent(Intent::Leave);
        }
    }

    fn activate(&mut self) {
        match self.route.clone() {
            Route::Series => self.reload_series(),
            Route::Show(id) => {
                self.show_list = ListState::default();
                self.intent(Intent::Enter(id));
            }
            Route::Logs => self.reload_logs(),
            Route::Tasks => {
                if self.tasks != TaskStatus::Pending {
                    self.tasks = TaskStatus::Idle;
                }
            }
        }
    }

    fn reload_series(&mut self) {
        self.series.request += 1;
        self.series.loading = LoadingState::Loading(Some("Loading series...".into()));
        self.effects.push(AppEffect::LoadShows {
            request: self.series.request,
            only_missing: self.series.only_missing,
        });
    }

    fn reload_logs(&mut self) {
        self.logs.request += 1;
        self.logs.loading = LoadingState::Loading(Some("Loading logs...".into()));
        self.effects.push(AppEffect::LoadLogs {
            request: self.logs.request,
        });
    }

    /// Forward an intent to the acquisition controller
    pub fn intent(&mut self, intent: Intent) {
        let effects = self.acquisition.handle(intent);
        self.effects
            .extend(effects.into_iter().map(AppEffect::Acquisition));
        self.sync_show_list();
    }

    /// Apply a completed backend call
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Acquisition(completion) => {
                let effects = self.acquisition.complete(completion);
                self.effects
                    .extend(effects.into_iter().map(AppEffect::Acquisition));
                self.sync_show_list();
            }
            AppEvent::ShowsLoaded { request, .. } if request != self.series.request => {
                debug!(request, latest = self.series.request, "dropping stale series list");
            }
            AppEvent::ShowsLoaded { result, .. } => match result {
                Ok(shows) => self.series.set_shows(shows),
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "failed to load series list");
                    self.series.loading = LoadingState::Error(e.to_string());
                }
            },
            AppEvent::LogsLoaded { request, .. } if request != self.logs.request => {
                debug!(request, latest = self.logs.request, "dropping stale logs");
            }
            AppEvent::LogsLoaded { result, .. } => match result {
                Ok(records) => self.logs.set_records(records),
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "failed to load logs");
                    self.logs.loading = LoadingState::Error(e.to_string());
                }
            },
            AppEvent::SyncFinished(Ok(())) => {
                info!("sync all accepted");
                self.tasks = TaskStatus::Done;
            }
            AppEvent::SyncFinished(Err(e)) => {
                warn!(kind = e.kind(), error = %e, "sync all failed");
                self.tasks = TaskStatus::Failed(e.to_string());
            }
        }
    }

    /// Keep the show cursor within the active tab's rows
    fn sync_show_list(&mut self) {
        let len = self
            .show_view()
            .and_then(|view| {
                let show = view.snapshot()?;
                Some(match view.active_tab() {
                    Tab::Seasons => show.coverage.numbered().count(),
                    Tab::Releases => show.releases.len(),
                    Tab::Search => show.search_results.len(),
                })
            })
            .unwrap_or(0);
        self.show_list.set_len(len);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys while the search box is focused
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        let edit = match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                return true;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.intent(Intent::SubmitSearch);
                return true;
            }
            KeyCode::Char(c) => QueryEdit::Insert(c),
            KeyCode::Backspace => QueryEdit::Backspace,
            KeyCode::Delete => QueryEdit::Delete,
            KeyCode::Left => QueryEdit::Left,
            KeyCode::Right => QueryEdit::Right,
            KeyCode::Home => QueryEdit::Home,
            KeyCode::End => QueryEdit::End,
            _ => return false,
        };
        self.intent(Intent::EditQuery(edit));
        true
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        // The confirmation prompt captures Esc
        if self.tasks == TaskStatus::Confirming && key.code == KeyCode::Esc {
            self.tasks = TaskStatus::Idle;
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Esc => return self.back(),
            KeyCode::Char('1') => {
                self.navigate(Route::Series);
                return true;
            }
            KeyCode::Char('2') => {
                self.navigate(Route::Logs);
                return true;
            }
            KeyCode::Char('3') => {
                self.navigate(Route::Tasks);
                return true;
            }
            _ => {}
        }

        match &self.route {
            Route::Series => self.handle_series_key(key),
            Route::Show(_) => self.handle_show_key(key),
            Route::Logs => self.handle_logs_key(key),
            Route::Tasks => self.handle_tasks_key(key),
        }
    }

    fn handle_series_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.series.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.series.list.down(),
            KeyCode::PageUp => self.series.list.page_up(10),
            KeyCode::PageDown => self.series.list.page_down(10),
            KeyCode::Home => self.series.list.first(),
            KeyCode::End => self.series.list.last(),
            KeyCode::Enter => {
                if let Some(show) = self.series.selected_show() {
                    let id = show.id.clone();
                    self.navigate(Route::Show(id));
                }
            }
            KeyCode::Char('a') => {
                self.series.only_missing = !self.series.only_missing;
                self.series.list.first();
                self.reload_series();
            }
            KeyCode::Char('r') => self.reload_series(),
            _ => return false,
        }
        true
    }

    fn handle_show_key(&mut self, key: KeyEvent) -> bool {
        let Some(tab) = self.show_view().map(|v| v.active_tab()) else {
            return false;
        };

        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.select_tab(tab.next()),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.select_tab(tab.prev()),
            KeyCode::Up | KeyCode::Char('k') => self.show_list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.show_list.down(),
            KeyCode::PageUp => self.show_list.page_up(10),
            KeyCode::PageDown => self.show_list.page_down(10),
            KeyCode::Char('/') | KeyCode::Char('e') if tab == Tab::Search => {
                if self.show_view().is_some_and(|v| v.snapshot().is_some()) {
                    self.input_mode = InputMode::Editing;
                }
            }
            KeyCode::Char('s') if tab == Tab::Search => self.intent(Intent::SubmitSearch),
            KeyCode::Enter | KeyCode::Char('g') if tab == Tab::Search => {
                let selected = self
                    .show_view()
                    .and_then(|v| v.snapshot())
                    .and_then(|s| s.search_results.get(self.show_list.selected))
                    .map(|hit| hit.primary_key.clone());
                if let Some(release_pk) = selected {
                    self.intent(Intent::Grab(release_pk));
                }
            }
            _ => return false,
        }
        true
    }

    fn select_tab(&mut self, tab: Tab) {
        self.show_list.first();
        self.intent(Intent::SelectTab(tab));
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.logs.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.logs.list.down(),
            KeyCode::PageUp => self.logs.list.page_up(10),
            KeyCode::PageDown => self.logs.list.page_down(10),
            KeyCode::Home => self.logs.list.first(),
            KeyCode::End => self.logs.list.last(),
            KeyCode::Char('r') => self.reload_logs(),
            _ => return false,
        }
        true
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) -> bool {
        match (&self.tasks, key.code) {
            (TaskStatus::Pending, _) => return false,
            (TaskStatus::Confirming, KeyCode::Char('y')) => {
                self.tasks = TaskStatus::Pending;
                self.effects.push(AppEffect::SyncAll);
            }
            (TaskStatus::Confirming, KeyCode::Char('n')) => self.tasks = TaskStatus::Idle,
            (_, KeyCode::Enter | KeyCode::Char('s')) => self.tasks = TaskStatus::Confirming,
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
