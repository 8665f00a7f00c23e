//! Application state management for Campdesk.
//!
//! This module contains the core `App` struct that holds the loaded agenda,
//! UI state, the open dialog (form, delete prompt, copy picker), and the
//! background task channel that REST calls report back through.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use campdesk_core::agenda::{
    fetch_agenda_days, fetch_camp, fetch_references, filter_sessions, project, validate_session,
    CopyOutcome, CopySelection, DeleteConfirmation, ExportOutcome, SessionFilter, SessionGateway,
    SessionRow, SessionStore, ViewMode,
};
use campdesk_core::api::ApiClient;
use campdesk_core::cache::{CacheAges, CacheManager, QueryCache};
use campdesk_core::config::Config;
use campdesk_core::error::Notice;
use campdesk_core::models::{AgendaDay, AgendaItem, Camp, ReferenceData};

use crate::form::{FormMode, SessionForm};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// How long the add form stays up showing its success state before closing.
const FORM_SETTLE_MS: u64 = 400;

const REFRESHING_MESSAGE: &str = "Refreshing agenda...";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    EditingSession,
    ConfirmingDelete,
    SelectingCopyDays,
    ConfirmingQuit,
    Quitting,
}

/// An in-flight server mutation. While one is pending no other may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Save,
    Delete,
    Copy,
    Export,
}

impl Mutation {
    pub fn status_text(&self) -> &'static str {
        match self {
            Mutation::Save => "Saving...",
            Mutation::Delete => "Deleting...",
            Mutation::Copy => "Copying...",
            Mutation::Export => "Exporting...",
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Messages sent from spawned REST tasks back to the event loop.
#[derive(Debug)]
enum TaskResult {
    /// Tagged with the refresh generation that requested it.
    Agenda(u64, Result<Vec<AgendaDay>, String>),
    Camp(u64, Camp),
    References(ReferenceData),
    SessionSaved { added: bool, title: String },
    SessionDeleted,
    Copied(CopyOutcome),
    Exported { path: PathBuf, rows: usize },
    Notice(Notice),
    MutationFailed(String),
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub camp_id: i64,
    gateway: SessionGateway<Arc<ApiClient>>,
    disk_cache: Option<CacheManager>,
    export_dir: PathBuf,

    // Agenda data
    pub store: SessionStore,
    pub camp: Option<Camp>,
    pub refs: ReferenceData,

    // UI State
    pub state: AppState,
    pub day_index: usize,
    pub selection: usize,
    pub view_mode: ViewMode,
    pub filter: SessionFilter,

    // Dialogs
    pub form: Option<SessionForm>,
    pub delete_prompt: Option<DeleteConfirmation>,
    pub copy_selection: Option<CopySelection>,
    pub copy_cursor: usize,

    pub pending: Option<Mutation>,
    close_form_at: Option<Instant>,
    /// Bumped per refresh; agenda and camp results from older refreshes are dropped.
    refresh_generation: u64,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message
    pub status_message: Option<String>,

    // Snapshot ages for status bar
    pub cache_ages: CacheAges,
}

impl App {
    /// Create a new application instance for `camp_id`.
    pub fn new(config: Config, camp_id: i64, export_dir: PathBuf) -> Result<Self> {
        let mut api = ApiClient::new(config.base_url())?;
        if let Some(ref token) = config.api_token {
            api.set_token(token.clone());
        }
        debug!(base_url = api.base_url(), camp_id, "API client configured");

        let disk_cache = match config.cache_dir(camp_id).and_then(CacheManager::new) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "Offline snapshot unavailable");
                None
            }
        };

        let gateway = SessionGateway::new(Arc::new(api), Arc::new(QueryCache::new()));
        Ok(Self::with_gateway(config, camp_id, gateway, disk_cache, export_dir))
    }

    fn with_gateway(
        config: Config,
        camp_id: i64,
        gateway: SessionGateway<Arc<ApiClient>>,
        disk_cache: Option<CacheManager>,
        export_dir: PathBuf,
    ) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            config,
            camp_id,
            gateway,
            disk_cache,
            export_dir,

            store: SessionStore::new(camp_id),
            camp: None,
            refs: ReferenceData::default(),

            state: AppState::Normal,
            day_index: 0,
            selection: 0,
            view_mode: ViewMode::default(),
            filter: SessionFilter::default(),

            form: None,
            delete_prompt: None,
            copy_selection: None,
            copy_cursor: 0,

            pending: None,
            close_form_at: None,
            refresh_generation: 0,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
            cache_ages: CacheAges::default(),
        }
    }

    // =========================================================================
    // Offline Snapshot
    // =========================================================================

    /// Show the last saved agenda until the first fetch completes.
    pub fn load_from_cache(&mut self) {
        let Some(ref cache) = self.disk_cache else {
            return;
        };

        if let Ok(Some(cached)) = cache.load_agenda() {
            self.store.seed(cached.data);
        }
        if let Ok(Some(cached)) = cache.load_camp() {
            self.camp = Some(cached.data);
        }
        if let Ok(Some(cached)) = cache.load_references() {
            self.refs = cached.data;
        }
        self.cache_ages = cache.get_cache_ages();
    }

    // =========================================================================
    // Background Refresh
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// User-requested refresh. Skips the query cache so changes made by
    /// other operators show up.
    pub fn refresh(&mut self) {
        self.gateway.cache().invalidate_camp(self.camp_id);
        self.refresh_background();
    }

    /// Re-fetch agenda, camp and reference data in the background. Cached
    /// queries still within their max age are reused.
    pub fn refresh_background(&mut self) {
        self.refresh_generation += 1;
        let generation = self.refresh_generation;
        info!(camp_id = self.camp_id, generation, "Refreshing agenda");
        self.store.begin_loading();

        let gateway = self.gateway.clone();
        let tx = self.task_tx.clone();
        let camp_id = self.camp_id;

        tokio::spawn(async move {
            let api = gateway.api();
            let cache = gateway.cache();
            let (agenda, camp, refs) = futures::join!(
                fetch_agenda_days(api, cache, camp_id),
                fetch_camp(api, cache, camp_id),
                fetch_references(api, cache, camp_id),
            );

            let agenda = agenda.map_err(|e| e.user_message());
            Self::send_result(&tx, TaskResult::Agenda(generation, agenda)).await;
            match camp {
                Ok(camp) => Self::send_result(&tx, TaskResult::Camp(generation, camp)).await,
                Err(e) => warn!(error = %e, "Camp fetch failed"),
            }
            match refs {
                Ok(refs) => Self::send_result(&tx, TaskResult::References(refs)).await,
                Err(e) => {
                    Self::send_result(&tx, TaskResult::Error(e.user_message())).await;
                }
            }
        });

        // Keep a mutation's result message visible over the refresh.
        if self.status_message.is_none() {
            self.status_message = Some(REFRESHING_MESSAGE.to_string());
        }
    }

    /// Drain finished background tasks and run timers.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }

        if let Some(at) = self.close_form_at {
            if Instant::now() >= at {
                self.close_form_at = None;
                self.close_form();
            }
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Agenda(generation, _) | TaskResult::Camp(generation, _)
                if generation < self.refresh_generation =>
            {
                debug!(generation, latest = self.refresh_generation, "Dropping superseded refresh result");
            }
            TaskResult::Agenda(_, Ok(days)) => {
                if let Some(ref cache) = self.disk_cache {
                    if let Err(e) = cache.save_agenda(&days) {
                        warn!(error = %e, "Failed to cache agenda");
                    }
                    self.cache_ages = cache.get_cache_ages();
                }
                self.store.finish_loading(Ok(days));
                self.clamp_selection();
                if self.status_message.as_deref() == Some(REFRESHING_MESSAGE) {
                    self.status_message = None;
                }
            }
            TaskResult::Agenda(_, Err(message)) => {
                self.store.finish_loading(Err(message.clone()));
                self.status_message = Some(format!("Error: {}", message));
            }
            TaskResult::Camp(_, camp) => {
                if let Some(ref cache) = self.disk_cache {
                    if let Err(e) = cache.save_camp(&camp) {
                        warn!(error = %e, "Failed to cache camp");
                    }
                }
                self.camp = Some(camp);
            }
            TaskResult::References(refs) => {
                if let Some(ref cache) = self.disk_cache {
                    if let Err(e) = cache.save_references(&refs) {
                        warn!(error = %e, "Failed to cache reference data");
                    }
                }
                self.refs = refs;
            }
            TaskResult::SessionSaved { added, title } => {
                self.pending = None;
                if added {
                    if let Some(ref mut form) = self.form {
                        form.reset();
                    }
                    self.close_form_at = Some(Instant::now() + Duration::from_millis(FORM_SETTLE_MS));
                    self.status_message = Some(format!("Added \"{}\"", title));
                } else {
                    self.close_form();
                    self.status_message = Some(format!("Saved \"{}\"", title));
                }
                self.refresh_background();
            }
            TaskResult::SessionDeleted => {
                self.pending = None;
                self.status_message = Some("Session deleted".to_string());
                self.refresh_background();
            }
            TaskResult::Copied(outcome) => {
                self.pending = None;
                match outcome {
                    CopyOutcome::Copied { days, .. } => {
                        self.copy_selection = None;
                        self.state = AppState::Normal;
                        let list: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                        self.status_message = Some(format!("Copied to day {}", list.join(", ")));
                        self.refresh_background();
                    }
                    CopyOutcome::NoTargetDays => {
                        self.status_message = Some(Notice::NoTargetDays.to_string());
                    }
                }
            }
            TaskResult::Exported { path, rows } => {
                self.pending = None;
                self.status_message =
                    Some(format!("Exported {} sessions to {}", rows, path.display()));
            }
            TaskResult::Notice(notice) => {
                self.pending = None;
                self.status_message = Some(notice.to_string());
            }
            TaskResult::MutationFailed(message) => {
                self.pending = None;
                if let Some(ref mut form) = self.form {
                    form.error = Some(message.clone());
                }
                self.status_message = Some(format!("Error: {}", message));
            }
            TaskResult::Error(message) => {
                self.status_message = Some(format!("Error: {}", message));
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn days(&self) -> &[AgendaDay] {
        self.store.days()
    }

    pub fn current_day(&self) -> Option<&AgendaDay> {
        self.days().get(self.day_index)
    }

    pub fn next_day(&mut self) {
        let count = self.days().len();
        if count > 0 {
            self.day_index = (self.day_index + 1) % count;
            self.selection = 0;
        }
    }

    pub fn prev_day(&mut self) {
        let count = self.days().len();
        if count > 0 {
            self.day_index = (self.day_index + count - 1) % count;
            self.selection = 0;
        }
    }

    /// Jump to day tab `index` (0-based) if it exists.
    pub fn select_day(&mut self, index: usize) {
        if index < self.days().len() {
            self.day_index = index;
            self.selection = 0;
        }
    }

    /// Sessions of the current day that pass the filter, by start time.
    pub fn visible_sessions(&self) -> Vec<&AgendaItem> {
        match self.current_day() {
            Some(day) => filter_sessions(&day.items, &self.filter),
            None => Vec::new(),
        }
    }

    pub fn visible_rows(&self) -> Vec<SessionRow<'_>> {
        project(self.view_mode, &self.visible_sessions(), &self.refs)
    }

    pub fn selected_session(&self) -> Option<&AgendaItem> {
        self.visible_sessions().get(self.selection).copied()
    }

    pub fn select_next(&mut self, step: usize) {
        let count = self.visible_sessions().len();
        if count > 0 {
            self.selection = (self.selection + step).min(count - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    fn clamp_selection(&mut self) {
        let days = self.days().len();
        if days == 0 {
            self.day_index = 0;
        } else if self.day_index >= days {
            self.day_index = days - 1;
        }
        let count = self.visible_sessions().len();
        self.selection = self.selection.min(count.saturating_sub(1));
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggle();
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn cycle_type_filter(&mut self) {
        self.filter.session_type = self.filter.session_type.next();
        self.selection = 0;
    }

    pub fn cycle_clinician_filter(&mut self) {
        let ids: Vec<i64> = self.refs.clinicians.iter().map(|c| c.id).collect();
        self.filter.clinician_id = next_filter_id(&ids, self.filter.clinician_id);
        self.selection = 0;
    }

    pub fn cycle_location_filter(&mut self) {
        let ids: Vec<i64> = self.refs.locations.iter().map(|l| l.id).collect();
        self.filter.location_id = next_filter_id(&ids, self.filter.location_id);
        self.selection = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.selection = 0;
    }

    /// "All types · Jordan Reyes · Any location"
    pub fn filter_summary(&self) -> String {
        let clinician = match self.filter.clinician_id {
            None | Some(0) => "Any clinician",
            id => self.refs.clinician_name(id),
        };
        let location = match self.filter.location_id {
            None | Some(0) => "Any location",
            id => self.refs.location_name(id),
        };
        format!("{} · {} · {}", self.filter.session_type, clinician, location)
    }

    // =========================================================================
    // Session Mutations
    // =========================================================================

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    fn block_if_busy(&mut self) -> bool {
        if let Some(mutation) = self.pending {
            self.status_message = Some(format!("Please wait: {}", mutation.status_text()));
            return true;
        }
        false
    }

    pub fn start_add(&mut self) {
        if self.block_if_busy() {
            return;
        }
        let Some(day) = self.current_day().map(|d| d.day) else {
            self.status_message = Some("No camp days loaded".to_string());
            return;
        };
        self.close_form_at = None;
        self.form = Some(SessionForm::add(day));
        self.state = AppState::EditingSession;
    }

    pub fn start_edit(&mut self) {
        if self.block_if_busy() {
            return;
        }
        let Some(form) = self.selected_session().map(SessionForm::edit) else {
            return;
        };
        self.close_form_at = None;
        self.form = Some(form);
        self.state = AppState::EditingSession;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        if self.state == AppState::EditingSession {
            self.state = AppState::Normal;
        }
    }

    /// Validate the open form and dispatch it. Invalid input stays in the
    /// form with the error shown; nothing is sent.
    pub fn submit_form(&mut self) {
        if self.block_if_busy() {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let draft = form.to_draft();
        if let Err(e) = validate_session(&draft) {
            debug!(field = e.field(), "Session form rejected");
            form.show_validation_error(&e);
            return;
        }
        form.error = None;
        let mode = form.mode;

        self.pending = Some(Mutation::Save);
        self.status_message = Some(Mutation::Save.status_text().to_string());

        let gateway = self.gateway.clone();
        let tx = self.task_tx.clone();
        let camp_id = self.camp_id;

        tokio::spawn(async move {
            let (added, result) = match mode {
                FormMode::Add { day } => (true, gateway.add_session(camp_id, day, &draft).await),
                FormMode::Edit { session_id, .. } => (
                    false,
                    gateway.update_session(camp_id, session_id, &draft).await,
                ),
            };
            let message = match result {
                Ok(item) => TaskResult::SessionSaved {
                    added,
                    title: item.title,
                },
                Err(e) => TaskResult::MutationFailed(e.user_message()),
            };
            Self::send_result(&tx, message).await;
        });
    }

    pub fn start_delete(&mut self) {
        if self.block_if_busy() {
            return;
        }
        if let Some(prompt) = self.selected_session().map(DeleteConfirmation::for_item) {
            self.delete_prompt = Some(prompt);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt = None;
        self.state = AppState::Normal;
    }

    pub fn confirm_delete(&mut self) {
        let Some(prompt) = self.delete_prompt.take() else {
            return;
        };
        self.state = AppState::Normal;
        let confirmed = prompt.confirm();

        self.pending = Some(Mutation::Delete);
        self.status_message = Some(Mutation::Delete.status_text().to_string());

        let gateway = self.gateway.clone();
        let tx = self.task_tx.clone();
        let camp_id = self.camp_id;

        tokio::spawn(async move {
            let message = match gateway.delete_session(camp_id, confirmed).await {
                Ok(()) => TaskResult::SessionDeleted,
                Err(e) => TaskResult::MutationFailed(e.user_message()),
            };
            Self::send_result(&tx, message).await;
        });
    }

    pub fn start_copy(&mut self) {
        if self.block_if_busy() {
            return;
        }
        let Some(selection) = self
            .selected_session()
            .map(|item| CopySelection::for_session(item, self.days()))
        else {
            return;
        };
        if selection.candidates().is_empty() {
            self.status_message = Some("This camp has no other days to copy to".to_string());
            return;
        }
        self.copy_selection = Some(selection);
        self.copy_cursor = 0;
        self.state = AppState::SelectingCopyDays;
    }

    pub fn cancel_copy(&mut self) {
        self.copy_selection = None;
        self.state = AppState::Normal;
    }

    pub fn move_copy_cursor(&mut self, forward: bool) {
        let Some(ref selection) = self.copy_selection else {
            return;
        };
        let len = selection.candidates().len();
        if len > 0 {
            self.copy_cursor = if forward {
                (self.copy_cursor + 1) % len
            } else {
                (self.copy_cursor + len - 1) % len
            };
        }
    }

    pub fn toggle_copy_day(&mut self) {
        if let Some(ref mut selection) = self.copy_selection {
            if let Some(&day) = selection.candidates().get(self.copy_cursor) {
                selection.toggle(day);
            }
        }
    }

    pub fn toggle_all_copy_days(&mut self) {
        if let Some(ref mut selection) = self.copy_selection {
            if selection.selected_days().len() == selection.candidates().len() {
                selection.clear();
            } else {
                selection.select_all();
            }
        }
    }

    pub fn submit_copy(&mut self) {
        if self.block_if_busy() {
            return;
        }
        let Some(selection) = self.copy_selection.clone() else {
            return;
        };

        self.pending = Some(Mutation::Copy);
        self.status_message = Some(Mutation::Copy.status_text().to_string());

        let gateway = self.gateway.clone();
        let tx = self.task_tx.clone();
        let camp_id = self.camp_id;

        tokio::spawn(async move {
            let message = match gateway.copy_session(camp_id, &selection).await {
                Ok(outcome) => TaskResult::Copied(outcome),
                Err(e) => TaskResult::MutationFailed(e.user_message()),
            };
            Self::send_result(&tx, message).await;
        });
    }

    /// Export the agenda to CSV in the export directory.
    pub fn export(&mut self) {
        if self.block_if_busy() {
            return;
        }
        self.pending = Some(Mutation::Export);
        self.status_message = Some(Mutation::Export.status_text().to_string());

        let gateway = self.gateway.clone();
        let tx = self.task_tx.clone();
        let camp_id = self.camp_id;
        let dir = self.export_dir.clone();

        tokio::spawn(async move {
            let message = match gateway.export_agenda(camp_id).await {
                Ok(ExportOutcome::Exported(export)) => match export.write_to(&dir) {
                    Ok(path) => TaskResult::Exported {
                        path,
                        rows: export.rows,
                    },
                    Err(e) => TaskResult::MutationFailed(format!("Export failed: {}", e)),
                },
                Ok(ExportOutcome::NothingToExport) => TaskResult::Notice(Notice::NothingToExport),
                Err(e) => TaskResult::MutationFailed(e.user_message()),
            };
            Self::send_result(&tx, message).await;
        });
    }

    /// Camp name for the title bar.
    pub fn camp_title(&self) -> String {
        match self.camp {
            Some(ref camp) => format!("{} ({})", camp.name, camp.date_range_display()),
            None => format!("Camp {}", self.camp_id),
        }
    }
}

/// Step a filter id through `None` and then each id in `ids`.
fn next_filter_id(ids: &[i64], current: Option<i64>) -> Option<i64> {
    match current.and_then(|id| ids.iter().position(|&i| i == id)) {
        None => ids.first().copied(),
        Some(i) => ids.get(i + 1).copied(),
    }
}

// ============================================================================
// Tests
// ============================================================================
