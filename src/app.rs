//! Application state management for tutorial-tui.
//!
//! This module contains the core `App` struct that owns the query
//! cache, the per-view UI state, and the background task coordination.
//! Network requests run on spawned Tokio tasks and report back through
//! an MPSC channel; `process_task_result` is the single serialized
//! reducer that applies results to the cache in arrival order and
//! turns mutation successes into tag invalidations.

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::cache::{Mutation, QueryData, QueryKey, Store};
use crate::config::Config;
use crate::models::{Draft, DraftErrors, Tutorial};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 covers a full refresh plus in-flight mutations with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for a form field input buffer.
/// Validation enforces the real limits on submit; this only bounds typing.
const MAX_FIELD_INPUT_LENGTH: usize = 256;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tutorials,
    Add,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Tutorials => "Tutorials",
            Tab::Add => "Add",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Tutorials => Tab::Add,
            Tab::Add => Tab::Tutorials,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Filtering,
    ShowingHelp,
    ConfirmingRemoveAll,
    ConfirmingQuit,
    Quitting,
}

/// Focused field in the create/edit forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Save,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Save,
            FormField::Save => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Save,
            FormField::Description => FormField::Title,
            FormField::Save => FormField::Description,
        }
    }
}

/// Which edit-view write path produced an update.
/// The two paths share the update operation but show different messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Form submit replacing title/description
    Content,
    /// Publish flag toggle
    Status,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types sent back from spawned network tasks.
///
/// Each variant carries the outcome of one request; errors travel as
/// rendered strings because the reducer only logs or displays them.
#[derive(Debug)]
pub enum TaskResult {
    /// A read finished (list, single record, or published listing)
    Query(QueryKey, Result<QueryData, String>),
    /// POST /tutorials finished
    Created(Result<(), String>),
    /// PUT /tutorials/:id finished
    Updated(i64, UpdateKind, Result<(), String>),
    /// DELETE /tutorials/:id finished
    Deleted(i64, Result<(), String>),
    /// DELETE /tutorials finished
    DeletedAll(Result<(), String>),
}

// ============================================================================
// View State
// ============================================================================

/// Select the indices of tutorials whose title contains `filter`.
/// Substring match, case-sensitive.
pub fn filter_by_title(items: &[Tutorial], filter: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, t)| t.title.contains(filter))
        .map(|(i, _)| i)
        .collect()
}

/// List view state: local selection plus the memoized filtered subset.
#[derive(Debug, Default)]
pub struct ListView {
    pub selection: usize,
    pub filter: String,
    pub published_only: bool,
    filtered: Vec<usize>,
    /// (generation, filter, published_only) the memo was computed for
    memo: Option<(u64, String, bool)>,
}

impl ListView {
    /// Recompute the filtered subset only when the cache generation,
    /// the filter string, or the data source changed. Typing in the
    /// filter therefore never causes a network request, and the
    /// selection resets exactly when the underlying data changes.
    pub fn sync(&mut self, items: &[Tutorial], generation: u64) {
        let unchanged = self
            .memo
            .as_ref()
            .is_some_and(|(g, f, p)| *g == generation && *f == self.filter && *p == self.published_only);
        if unchanged {
            return;
        }

        let data_changed = self
            .memo
            .as_ref()
            .map(|(g, _, p)| *g != generation || *p != self.published_only)
            .unwrap_or(true);

        self.filtered = filter_by_title(items, &self.filter);

        if data_changed {
            self.selection = 0;
        } else if self.selection >= self.filtered.len() {
            // Filter narrowed past the cursor; clamp instead of reset
            self.selection = self.filtered.len().saturating_sub(1);
        }

        self.memo = Some((generation, self.filter.clone(), self.published_only));
    }

    /// Indices into the cached collection, post-filter.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }
}

/// Edit view state: a draft owned solely by this view, seeded from the
/// fetch result for its record.
#[derive(Debug)]
pub struct EditView {
    pub id: i64,
    pub draft: Draft,
    /// Publish flag of the snapshot, target of the toggle
    pub published: bool,
    pub field: FormField,
    pub errors: DraftErrors,
    pub message: Option<String>,
    /// Set once the user edits a field; blocks re-seeding from re-fetches
    pub dirty: bool,
    pub seeded: bool,
}

impl EditView {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            draft: Draft::default(),
            published: false,
            field: FormField::Title,
            errors: DraftErrors::default(),
            message: None,
            dirty: false,
            seeded: false,
        }
    }

    /// Seed (or re-seed) the draft from a fetched record.
    pub fn seed(&mut self, tutorial: &Tutorial) {
        self.draft = Draft::from_tutorial(tutorial);
        self.published = tutorial.published;
        self.seeded = true;
    }
}

/// Create view state. The form is never cleared after a submit.
#[derive(Debug)]
pub struct CreateView {
    pub draft: Draft,
    pub field: FormField,
    pub errors: DraftErrors,
    pub message: Option<String>,
}

impl Default for CreateView {
    fn default() -> Self {
        Self {
            draft: Draft::default(),
            field: FormField::Title,
            errors: DraftErrors::default(),
            message: None,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub store: Store,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub list: ListView,
    pub edit: Option<EditView>,
    pub create: CreateView,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message for the bottom bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let base_url = config.base_url();
        debug!(%base_url, "API base URL resolved");
        let api = ApiClient::new(base_url)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            api,
            store: Store::new(),

            state: AppState::Normal,
            current_tab: Tab::Tutorials,
            list: ListView::default(),
            edit: None,
            create: CreateView::default(),

            task_rx: rx,
            task_tx: tx,

            status_message: None,
        })
    }

    // =========================================================================
    // Subscriptions & Navigation
    // =========================================================================

    /// The query key the list view currently renders from.
    pub fn list_key(&self) -> QueryKey {
        if self.list.published_only {
            QueryKey::Published
        } else {
            QueryKey::Tutorials
        }
    }

    /// Subscribe the list view and fetch if the cache has nothing usable.
    pub fn mount_list(&mut self) {
        let key = self.list_key();
        if self.store.subscribe(key) {
            self.spawn_queries(vec![key]);
        }
    }

    pub fn unmount_list(&mut self) {
        self.store.unsubscribe(self.list_key());
    }

    /// Switch the list between the full collection and published-only.
    pub fn toggle_published_only(&mut self) {
        self.unmount_list();
        self.list.published_only = !self.list.published_only;
        self.list.selection = 0;
        self.mount_list();
    }

    /// Open the edit view for a record. The list view unmounts for the
    /// duration, the way a route change would unmount it.
    pub fn open_edit(&mut self, id: i64) {
        self.unmount_list();
        let mut edit = EditView::new(id);
        if self.store.subscribe(QueryKey::Tutorial(id)) {
            self.spawn_queries(vec![QueryKey::Tutorial(id)]);
        }
        // Seed immediately when the record is already cached
        if let Some(tutorial) = self.store.tutorial(id) {
            edit.seed(tutorial);
        }
        self.edit = Some(edit);
    }

    /// Leave the edit view, dropping its subscription and draft.
    pub fn close_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            self.store.unsubscribe(QueryKey::Tutorial(edit.id));
        }
    }

    /// Navigate from the edit view back to the list. Remounting picks
    /// up any staleness accumulated while the list was hidden.
    pub fn back_to_list(&mut self) {
        self.close_edit();
        self.mount_list();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        // Leaving the Tutorials tab unmounts the list and any open edit
        if self.current_tab == Tab::Tutorials {
            self.close_edit();
            self.unmount_list();
        }
        self.current_tab = tab;
        if tab == Tab::Tutorials {
            self.mount_list();
        }
    }

    /// Re-fetch everything a view is currently subscribed to.
    pub fn refresh_subscribed(&mut self) {
        let keys = self.store.subscribed_keys();
        if !keys.is_empty() {
            self.status_message = Some("Refreshing...".to_string());
            self.spawn_queries(keys);
        }
    }

    // =========================================================================
    // Derived List State
    // =========================================================================

    /// Recompute memoized view state. Called once per event-loop tick,
    /// before drawing.
    pub fn update_derived(&mut self) {
        let generation = self.store.generation();
        let items = if self.list.published_only {
            self.store.published()
        } else {
            self.store.tutorials()
        };
        self.list.sync(items.unwrap_or(&[]), generation);
    }

    /// The record under the list cursor, if any.
    pub fn selected_tutorial(&self) -> Option<&Tutorial> {
        let items = if self.list.published_only {
            self.store.published()?
        } else {
            self.store.tutorials()?
        };
        let index = *self.list.filtered_indices().get(self.list.selection)?;
        items.get(index)
    }

    pub fn list_move_up(&mut self, amount: usize) {
        self.list.selection = self.list.selection.saturating_sub(amount);
    }

    pub fn list_move_down(&mut self, amount: usize) {
        let len = self.list.filtered_indices().len();
        if len > 0 {
            self.list.selection = (self.list.selection + amount).min(len - 1);
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate and submit the create form. Invalid drafts are rejected
    /// here, before any request is sent.
    pub fn submit_create(&mut self) {
        self.create.message = None;
        match self.create.draft.validate() {
            Ok(()) => {
                self.create.errors = DraftErrors::default();
                let payload = self.create.draft.to_new_tutorial();
                let api = self.api.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let result = api.create_tutorial(&payload).await;
                    Self::send_result(&tx, TaskResult::Created(stringify_err(result))).await;
                });
            }
            Err(errors) => {
                self.create.errors = errors;
            }
        }
    }

    /// Validate and submit the edit form (content write path).
    pub fn submit_edit(&mut self) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        edit.message = None;
        match edit.draft.validate() {
            Ok(()) => {
                edit.errors = DraftErrors::default();
                let payload = edit.draft.to_update(edit.id, edit.published);
                let id = edit.id;
                let api = self.api.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let result = api.update_tutorial(&payload).await;
                    Self::send_result(
                        &tx,
                        TaskResult::Updated(id, UpdateKind::Content, stringify_err(result)),
                    )
                    .await;
                });
            }
            Err(errors) => {
                edit.errors = errors;
            }
        }
    }

    /// Flip the publish flag (status write path). Sends the same
    /// full-record payload as the form submit, only `published` differs.
    pub fn toggle_publish(&mut self) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if !edit.seeded {
            // Nothing fetched yet to toggle
            return;
        }
        edit.message = None;
        // The displayed flag follows the cache: it flips when the
        // invalidation re-fetch lands, not optimistically.
        let target = !edit.published;
        let payload = edit.draft.to_update(edit.id, target);
        let id = edit.id;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.update_tutorial(&payload).await;
            Self::send_result(
                &tx,
                TaskResult::Updated(id, UpdateKind::Status, stringify_err(result)),
            )
            .await;
        });
    }

    /// Delete the record open in the edit view and navigate back to the
    /// list immediately, without waiting for the response.
    pub fn delete_current(&mut self) {
        let Some(edit) = self.edit.as_ref() else {
            return;
        };
        let id = edit.id;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_tutorial(id).await;
            Self::send_result(&tx, TaskResult::Deleted(id, stringify_err(result))).await;
        });
        self.back_to_list();
    }

    /// Bulk delete: one request that invalidates the collection tag.
    pub fn remove_all(&mut self) {
        self.status_message = Some("Removing all tutorials...".to_string());
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_all().await;
            Self::send_result(&tx, TaskResult::DeletedAll(stringify_err(result))).await;
        });
    }

    // =========================================================================
    // Background Task Plumbing
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// Spawn one task that runs the given reads concurrently and sends
    /// each result back as it lands.
    fn spawn_queries(&mut self, keys: Vec<QueryKey>) {
        if keys.is_empty() {
            return;
        }
        for &key in &keys {
            self.store.mark_loading(key);
        }

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let fetches = keys.into_iter().map(|key| {
                let api = api.clone();
                async move {
                    let result = match key {
                        QueryKey::Tutorials => api.fetch_tutorials().await.map(QueryData::List),
                        QueryKey::Published => api.fetch_published().await.map(QueryData::List),
                        QueryKey::Tutorial(id) => api.fetch_tutorial(id).await.map(QueryData::One),
                    };
                    (key, result)
                }
            });

            for (key, result) in join_all(fetches).await {
                Self::send_result(&tx, TaskResult::Query(key, stringify_err(result))).await;
            }
        });
    }

    /// Drain completed background tasks and apply their results. Any
    /// invalidation fallout is re-fetched afterwards.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        if results.is_empty() {
            return;
        }

        let mut refetch = Vec::new();
        for result in results {
            refetch.extend(self.process_task_result(result));
        }
        // Progress messages are transient
        self.status_message = None;

        let mut seen = std::collections::HashSet::new();
        refetch.retain(|key| seen.insert(*key));
        self.spawn_queries(refetch);
    }

    /// The serialized reducer: applies one task result to the cache and
    /// view state, returning the subscribed keys invalidated by it.
    fn process_task_result(&mut self, result: TaskResult) -> Vec<QueryKey> {
        match result {
            TaskResult::Query(key, Ok(data)) => {
                self.store.apply_success(key, data);
                // Re-seed an open, unedited draft from its fresh record.
                // A dirty draft keeps its text, but the publish flag is
                // not a form field and always tracks the cache.
                if let QueryKey::Tutorial(id) = key {
                    if let Some(edit) = self.edit.as_mut() {
                        if edit.id == id {
                            if let Some(tutorial) = self.store.tutorial(id) {
                                if edit.dirty {
                                    edit.published = tutorial.published;
                                } else {
                                    edit.seed(tutorial);
                                }
                            }
                        }
                    }
                }
                Vec::new()
            }
            TaskResult::Query(key, Err(message)) => {
                error!(?key, error = %message, "Query failed");
                self.store.apply_error(key, message);
                Vec::new()
            }
            TaskResult::Created(Ok(())) => {
                info!("Tutorial created");
                self.create.message = Some("The tutorial was added successfully!".to_string());
                self.store.invalidate(&Mutation::Create.invalidates())
            }
            TaskResult::Created(Err(message)) => {
                // Create failures are logged, not surfaced in the form
                error!(error = %message, "Create failed");
                Vec::new()
            }
            TaskResult::Updated(id, kind, Ok(())) => {
                let message = match kind {
                    UpdateKind::Content => "The tutorial was updated successfully!",
                    UpdateKind::Status => "The status was updated successfully!",
                };
                if let Some(edit) = self.edit.as_mut() {
                    if edit.id == id {
                        edit.message = Some(message.to_string());
                        edit.dirty = false;
                    }
                }
                self.store.invalidate(&Mutation::Update(id).invalidates())
            }
            TaskResult::Updated(id, _, Err(message)) => {
                error!(id, error = %message, "Update failed");
                if let Some(edit) = self.edit.as_mut() {
                    if edit.id == id {
                        edit.message = Some("The update failed.".to_string());
                    }
                }
                Vec::new()
            }
            TaskResult::Deleted(id, Ok(())) => {
                info!(id, "Tutorial deleted");
                self.store.invalidate(&Mutation::Delete(id).invalidates())
            }
            TaskResult::Deleted(id, Err(message)) => {
                error!(id, error = %message, "Delete failed");
                Vec::new()
            }
            TaskResult::DeletedAll(Ok(())) => {
                info!("All tutorials deleted");
                self.store.invalidate(&Mutation::DeleteAll.invalidates())
            }
            TaskResult::DeletedAll(Err(message)) => {
                error!(error = %message, "Delete all failed");
                Vec::new()
            }
        }
    }
}

fn stringify_err<T>(result: Result<T>) -> Result<T, String> {
    result.map_err(|e| format!("{:#}", e))
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a form field character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_INPUT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial(id: i64, title: &str) -> Tutorial {
        Tutorial {
            id,
            title: title.to_string(),
            description: "desc".to_string(),
            published: false,
        }
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Tutorials.next(), Tab::Add);
        assert_eq!(Tab::Add.next(), Tab::Tutorials); // Wraps around
        assert_eq!(Tab::Tutorials.prev(), Tab::Add);
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Title.next(), FormField::Description);
        assert_eq!(FormField::Description.next(), FormField::Save);
        assert_eq!(FormField::Save.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Save);
    }

    // -------------------------------------------------------------------------
    // Filter / Memoization Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_filter_by_title_substring() {
        let items = vec![
            tutorial(1, "Rust basics"),
            tutorial(2, "Advanced Rust"),
            tutorial(3, "Go basics"),
        ];
        assert_eq!(filter_by_title(&items, "Rust"), vec![0, 1]);
        assert_eq!(filter_by_title(&items, "basics"), vec![0, 2]);
        assert_eq!(filter_by_title(&items, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_by_title_no_match_is_empty() {
        let items = vec![tutorial(1, "Rust"), tutorial(2, "Go")];
        assert!(filter_by_title(&items, "zig").is_empty());
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let items = vec![tutorial(1, "Rust")];
        assert!(filter_by_title(&items, "rust").is_empty());
    }

    #[test]
    fn test_list_sync_memoizes_per_generation_and_filter() {
        let items = vec![tutorial(1, "Rust"), tutorial(2, "Go")];
        let mut list = ListView::default();

        list.filter = "Rust".to_string();
        list.sync(&items, 1);
        assert_eq!(list.filtered_indices(), &[0]);

        // Same generation and filter: the memo short-circuits, even if
        // a different slice were passed in
        list.sync(&[], 1);
        assert_eq!(list.filtered_indices(), &[0]);

        // Filter change recomputes without a generation bump
        list.filter.clear();
        list.sync(&items, 1);
        assert_eq!(list.filtered_indices(), &[0, 1]);
    }

    #[test]
    fn test_list_sync_resets_selection_on_data_change() {
        let items = vec![tutorial(1, "a"), tutorial(2, "b"), tutorial(3, "c")];
        let mut list = ListView::default();
        list.sync(&items, 1);
        list.selection = 2;

        // Filter change alone keeps (clamps) the selection
        list.filter = "a".to_string();
        list.sync(&items, 1);
        assert_eq!(list.selection, 0); // clamped to the single match

        // Generation bump (data changed) resets it
        list.filter.clear();
        list.sync(&items, 1);
        list.selection = 2;
        list.sync(&items, 2);
        assert_eq!(list.selection, 0);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(0, 'a'));
        assert!(can_add_field_char(255, 'z'));
        // Exceeds max length
        assert!(!can_add_field_char(256, 'a'));
        // Control characters rejected
        assert!(!can_add_field_char(0, '\x00'));
        assert!(!can_add_field_char(0, '\n'));
        assert!(!can_add_field_char(0, '\t'));
    }

    // -------------------------------------------------------------------------
    // Reducer Tests
    // -------------------------------------------------------------------------

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:8080/api").expect("client");
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        App {
            config: Config::default(),
            api,
            store: Store::new(),
            state: AppState::Normal,
            current_tab: Tab::Tutorials,
            list: ListView::default(),
            edit: None,
            create: CreateView::default(),
            task_rx: rx,
            task_tx: tx,
            status_message: None,
        }
    }

    #[test]
    fn test_reducer_applies_query_success() {
        let mut app = test_app();
        let refetch = app.process_task_result(TaskResult::Query(
            QueryKey::Tutorials,
            Ok(QueryData::List(vec![tutorial(1, "a")])),
        ));
        assert!(refetch.is_empty());
        assert_eq!(app.store.tutorials().map(<[Tutorial]>::len), Some(1));
    }

    #[test]
    fn test_reducer_update_success_triggers_refetch_of_subscribed() {
        let mut app = test_app();
        app.store.subscribe(QueryKey::Tutorials);
        app.store.subscribe(QueryKey::Tutorial(1));
        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorials,
            Ok(QueryData::List(vec![tutorial(1, "a")])),
        ));
        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorial(1),
            Ok(QueryData::One(tutorial(1, "a"))),
        ));

        let refetch = app.process_task_result(TaskResult::Updated(1, UpdateKind::Content, Ok(())));
        assert!(refetch.contains(&QueryKey::Tutorials));
        assert!(refetch.contains(&QueryKey::Tutorial(1)));
    }

    #[test]
    fn test_reducer_update_success_sets_outcome_message() {
        let mut app = test_app();
        app.edit = Some(EditView::new(1));
        app.process_task_result(TaskResult::Updated(1, UpdateKind::Status, Ok(())));
        assert_eq!(
            app.edit.as_ref().unwrap().message.as_deref(),
            Some("The status was updated successfully!")
        );
    }

    #[test]
    fn test_reducer_update_failure_does_not_claim_success() {
        let mut app = test_app();
        app.edit = Some(EditView::new(1));
        let refetch = app.process_task_result(TaskResult::Updated(
            1,
            UpdateKind::Content,
            Err("boom".to_string()),
        ));
        assert!(refetch.is_empty());
        assert_eq!(
            app.edit.as_ref().unwrap().message.as_deref(),
            Some("The update failed.")
        );
    }

    #[test]
    fn test_reducer_create_success_invalidates_list() {
        let mut app = test_app();
        app.store.subscribe(QueryKey::Tutorials);
        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorials,
            Ok(QueryData::List(vec![])),
        ));

        let refetch = app.process_task_result(TaskResult::Created(Ok(())));
        assert_eq!(refetch, vec![QueryKey::Tutorials]);
        assert_eq!(
            app.create.message.as_deref(),
            Some("The tutorial was added successfully!")
        );
    }

    #[test]
    fn test_reducer_create_failure_only_logs() {
        let mut app = test_app();
        let refetch = app.process_task_result(TaskResult::Created(Err("boom".to_string())));
        assert!(refetch.is_empty());
        assert!(app.create.message.is_none());
    }

    #[test]
    fn test_reducer_seeds_open_edit_draft() {
        let mut app = test_app();
        app.edit = Some(EditView::new(5));
        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorial(5),
            Ok(QueryData::One(Tutorial {
                id: 5,
                title: "Rust".to_string(),
                description: "Ownership".to_string(),
                published: true,
            })),
        ));

        let edit = app.edit.as_ref().unwrap();
        assert!(edit.seeded);
        assert_eq!(edit.draft.title, "Rust");
        assert!(edit.published);
    }

    #[test]
    fn test_reducer_does_not_clobber_dirty_draft() {
        let mut app = test_app();
        let mut edit = EditView::new(5);
        edit.seed(&tutorial(5, "saved"));
        edit.draft.title = "edited".to_string();
        edit.dirty = true;
        app.edit = Some(edit);

        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorial(5),
            Ok(QueryData::One(tutorial(5, "fresh"))),
        ));
        assert_eq!(app.edit.as_ref().unwrap().draft.title, "edited");
    }

    #[test]
    fn test_reducer_syncs_publish_flag_into_dirty_draft() {
        let mut app = test_app();
        let mut edit = EditView::new(5);
        edit.seed(&tutorial(5, "saved"));
        edit.draft.title = "edited".to_string();
        edit.dirty = true;
        app.edit = Some(edit);

        // Publish toggle settled server-side; the re-fetch carries the
        // new flag while the text edits stay local
        let mut fresh = tutorial(5, "saved");
        fresh.published = true;
        app.process_task_result(TaskResult::Query(
            QueryKey::Tutorial(5),
            Ok(QueryData::One(fresh)),
        ));

        let edit = app.edit.as_ref().unwrap();
        assert!(edit.published);
        assert_eq!(edit.draft.title, "edited");
    }

    #[test]
    fn test_close_edit_unsubscribes() {
        let mut app = test_app();
        app.open_edit_state_only(7);
        assert!(app.store.is_subscribed(QueryKey::Tutorial(7)));
        app.close_edit();
        assert!(app.edit.is_none());
        assert!(!app.store.is_subscribed(QueryKey::Tutorial(7)));
    }

    impl App {
        /// Test helper: open_edit without spawning a fetch task
        fn open_edit_state_only(&mut self, id: i64) {
            self.store.subscribe(QueryKey::Tutorial(id));
            self.edit = Some(EditView::new(id));
        }
    }
}
