//! Debounced marketplace search and autocomplete
//!
//! Keystrokes arm a debounce task that fetches suggestions once input has
//! been quiet for the configured interval. An explicit search sets a
//! suppression flag so a late suggestion response cannot reopen the list
//! over fresh results; typing again clears the flag.

use crate::notice::NoticeBoard;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vsynx_core::types::{ExtensionMetadata, SearchConfig, ValidationResult};
use vsynx_core::{Error, ExtensionBackend, Result};

/// Keys handled by the suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug)]
struct SearchState {
    query: String,
    suggestions: Vec<ExtensionMetadata>,
    suggestions_visible: bool,
    /// -1 means no suggestion is highlighted
    highlighted: isize,
    suppressed: bool,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    results: Vec<ExtensionMetadata>,
    searching: bool,
    selected: Option<ExtensionMetadata>,
    details: Option<ValidationResult>,
    details_loading: bool,
}

impl SearchState {
    fn new() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            suggestions_visible: false,
            highlighted: -1,
            suppressed: false,
            generation: 0,
            pending: None,
            results: Vec::new(),
            searching: false,
            selected: None,
            details: None,
            details_loading: false,
        }
    }

    /// Abort the pending debounce task and invalidate its response
    fn cancel_pending(&mut self) {
        self.generation += 1;
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    fn hide_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_visible = false;
        self.highlighted = -1;
    }
}

/// Cloneable handle to the search controller
#[derive(Clone)]
pub struct SearchController {
    backend: Arc<dyn ExtensionBackend>,
    notices: NoticeBoard,
    config: SearchConfig,
    state: Arc<RwLock<SearchState>>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn ExtensionBackend>, notices: NoticeBoard, config: SearchConfig) -> Self {
        Self {
            backend,
            notices,
            config,
            state: Arc::new(RwLock::new(SearchState::new())),
        }
    }

    /// Record a keystroke
    ///
    /// Cancels any pending debounce. Below the length floor suggestions are
    /// hidden and no request is made; otherwise a new debounce is armed.
    pub async fn on_input(&self, query: impl Into<String>) {
        let query = query.into();
        let mut state = self.state.write().await;
        state.cancel_pending();
        state.suppressed = false;
        state.highlighted = -1;
        state.query = query;

        let trimmed = state.query.trim().to_string();
        if trimmed.chars().count() < self.config.min_query_len {
            state.hide_suggestions();
            return;
        }

        let generation = state.generation;
        let this = self.clone();
        let delay = self.config.debounce();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.fetch_suggestions(generation, trimmed).await;
        }));
    }

    async fn fetch_suggestions(&self, generation: u64, query: String) {
        {
            let state = self.state.read().await;
            if state.suppressed || state.generation != generation {
                return;
            }
        }

        debug!("Fetching suggestions for '{}'", query);
        let result = self.backend.search_marketplace(&query).await;

        let mut state = self.state.write().await;
        if state.suppressed || state.generation != generation {
            debug!("Dropping suggestions for '{}'", query);
            return;
        }
        state.pending = None;
        match result {
            Ok(mut hits) => {
                hits.truncate(self.config.suggestion_limit);
                state.suggestions_visible = !hits.is_empty();
                state.suggestions = hits;
                state.highlighted = -1;
            }
            Err(e) => {
                warn!("Suggestion fetch for '{}' failed: {}", query, e);
                state.hide_suggestions();
            }
        }
    }

    /// Keyboard handling for the search box
    pub async fn on_key(&self, key: NavKey) -> Result<()> {
        let (visible, highlighted) = {
            let state = self.state.read().await;
            (state.suggestions_visible, state.highlighted_suggestion())
        };

        match key {
            NavKey::Enter => match highlighted {
                Some(suggestion) if visible => self.select_suggestion(suggestion).await.map(|_| ()),
                _ => self.search().await.map(|_| ()),
            },
            NavKey::Escape => {
                self.hide_suggestions().await;
                Ok(())
            }
            NavKey::Down | NavKey::Up if visible => {
                let mut state = self.state.write().await;
                let last = state.suggestions.len() as isize - 1;
                state.highlighted = if key == NavKey::Down {
                    (state.highlighted + 1).min(last)
                } else {
                    (state.highlighted - 1).max(-1)
                };
                Ok(())
            }
            NavKey::Down | NavKey::Up => Ok(()),
        }
    }

    /// Hide the suggestion list without touching the query
    pub async fn hide_suggestions(&self) {
        self.state.write().await.hide_suggestions();
    }

    /// Explicit search; replaces the result list on success
    pub async fn search(&self) -> Result<Vec<ExtensionMetadata>> {
        let query = {
            let mut state = self.state.write().await;
            state.cancel_pending();
            state.suppressed = true;
            state.hide_suggestions();
            state.query.trim().to_string()
        };
        if query.is_empty() {
            let e = Error::validation("Please enter a search term");
            self.notices.post_error(e.to_string()).await;
            return Err(e);
        }

        self.notices.clear_error().await;
        {
            let mut state = self.state.write().await;
            state.searching = true;
            state.selected = None;
            state.details = None;
            state.details_loading = false;
        }
        info!("Searching marketplace for '{}'", query);
        let result = self.backend.search_marketplace(&query).await;

        let mut state = self.state.write().await;
        state.searching = false;
        match result {
            Ok(hits) => {
                state.results = hits.clone();
                drop(state);
                if hits.is_empty() {
                    self.notices
                        .post_info(format!("No extensions found for '{}'", query))
                        .await;
                }
                Ok(hits)
            }
            Err(e) => {
                drop(state);
                self.notices.post_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Commit a suggestion: fill the query with its id and validate it
    pub async fn select_suggestion(&self, suggestion: ExtensionMetadata) -> Result<ValidationResult> {
        {
            let mut state = self.state.write().await;
            state.cancel_pending();
            state.suppressed = true;
            state.hide_suggestions();
            state.query = suggestion.id.clone();
        }
        self.select_result(suggestion).await
    }

    /// Select a marketplace result and load its validation details
    pub async fn select_result(&self, result: ExtensionMetadata) -> Result<ValidationResult> {
        let id = result.id.clone();
        {
            let mut state = self.state.write().await;
            state.selected = Some(result);
            state.details = None;
            state.details_loading = true;
        }

        let validation = self.backend.validate_extension(&id).await;

        let mut state = self.state.write().await;
        let still_selected = state.selected.as_ref().is_some_and(|s| s.id == id);
        if still_selected {
            state.details_loading = false;
        }
        match validation {
            Ok(details) => {
                if still_selected {
                    state.details = Some(details.clone());
                }
                Ok(details)
            }
            Err(e) => {
                drop(state);
                self.notices.post_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Forget the selected result and its details
    pub async fn clear_selection(&self) {
        let mut state = self.state.write().await;
        state.selected = None;
        state.details = None;
        state.details_loading = false;
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    pub async fn suggestions(&self) -> Vec<ExtensionMetadata> {
        self.state.read().await.suggestions.clone()
    }

    pub async fn suggestions_visible(&self) -> bool {
        self.state.read().await.suggestions_visible
    }

    /// Cursor position in `[-1, len - 1]`
    pub async fn highlighted(&self) -> isize {
        self.state.read().await.highlighted
    }

    pub async fn is_suppressed(&self) -> bool {
        self.state.read().await.suppressed
    }

    pub async fn results(&self) -> Vec<ExtensionMetadata> {
        self.state.read().await.results.clone()
    }

    pub async fn is_searching(&self) -> bool {
        self.state.read().await.searching
    }

    pub async fn selected(&self) -> Option<ExtensionMetadata> {
        self.state.read().await.selected.clone()
    }

    pub async fn details(&self) -> Option<ValidationResult> {
        self.state.read().await.details.clone()
    }

    pub async fn is_details_loading(&self) -> bool {
        self.state.read().await.details_loading
    }
}

impl SearchState {
    fn highlighted_suggestion(&self) -> Option<ExtensionMetadata> {
        usize::try_from(self.highlighted)
            .ok()
            .and_then(|i| self.suggestions.get(i))
            .cloned()
    }
}
