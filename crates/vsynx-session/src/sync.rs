//! Guided multi-target sync orchestrator
//!
//! Flow: pick a source and targets, build a selection, run a conflict
//! pre-flight across every target, optionally confirm a resolution, execute
//! once, show the report, then reset after a short delay.

use crate::directory::EditorDirectory;
use crate::inventory::InventoryCache;
use crate::notice::NoticeBoard;
use crate::selection::{CandidateFilter, SelectionSet, ViewMode};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vsynx_core::types::{
    EditorId, ExtensionId, ExtensionRecord, SyncConfig, SyncReport, SyncRequest,
};
use vsynx_core::{Error, ExtensionBackend, Result};

/// Where the orchestrator is in the sync flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Selecting,
    CheckingConflicts,
    AwaitingConfirmation,
    Executing,
    Reporting,
}

/// How to treat extensions that already exist in a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    SkipConflicts,
    OverwriteAll,
}

impl ConflictResolution {
    pub fn overwrite(self) -> bool {
        self == ConflictResolution::OverwriteAll
    }
}

/// Result of starting a sync
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Conflicts were found; call `resolve_conflicts` or `cancel_conflicts`
    NeedsConfirmation(Vec<ExtensionId>),
    /// No conflicts; the sync ran with overwrite disabled
    Completed(SyncReport),
}

/// Dry-run outcome of a sync for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPreview {
    pub target: EditorId,
    /// Selected ids the target does not have yet
    pub new_count: usize,
    /// Selected ids the target already has
    pub conflicts: Vec<ExtensionId>,
}

/// The exact request a conflict confirmation applies to
#[derive(Debug, Clone)]
struct PendingSync {
    source: EditorId,
    targets: Vec<EditorId>,
    extension_ids: Vec<String>,
}

#[derive(Debug)]
struct SyncState {
    phase: SyncPhase,
    source: Option<EditorId>,
    candidates: Vec<ExtensionRecord>,
    candidates_loading: bool,
    /// Bumped per `set_source` call so only the latest load applies
    source_request: u64,
    selection: SelectionSet,
    targets: BTreeSet<EditorId>,
    conflicts: BTreeSet<ExtensionId>,
    pending: Option<PendingSync>,
    report: Option<SyncReport>,
    filter: CandidateFilter,
    /// Bumped on every completed sync so a stale reset timer does nothing
    reset_generation: u64,
}

impl SyncState {
    fn new() -> Self {
        Self {
            phase: SyncPhase::Selecting,
            source: None,
            candidates: Vec::new(),
            candidates_loading: false,
            source_request: 0,
            selection: SelectionSet::new(),
            targets: BTreeSet::new(),
            conflicts: BTreeSet::new(),
            pending: None,
            report: None,
            filter: CandidateFilter::default(),
            reset_generation: 0,
        }
    }

    fn text_filtered(&self) -> impl Iterator<Item = &ExtensionRecord> {
        self.candidates
            .iter()
            .filter(|r| self.filter.matches_text(r))
    }

    /// Source, targets and ids of a sync, or the validation error blocking it
    fn checked_request(&self) -> Result<(EditorId, Vec<EditorId>, Vec<String>)> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| Error::validation("Please select a source editor"))?;
        if self.selection.is_empty() {
            return Err(Error::validation("Please select at least one extension to sync"));
        }
        if self.targets.is_empty() {
            return Err(Error::validation("Please select at least one target editor"));
        }
        let targets = self.targets.iter().cloned().collect();
        Ok((source, targets, self.selection.to_ids()))
    }

    fn require_phase(&self, expected: SyncPhase) -> Result<()> {
        if self.phase != expected {
            return Err(Error::invalid_state(format!(
                "sync is {:?}, expected {:?}",
                self.phase, expected
            )));
        }
        Ok(())
    }
}

/// Cloneable handle to the sync orchestrator
#[derive(Clone)]
pub struct SyncOrchestrator {
    backend: Arc<dyn ExtensionBackend>,
    directory: EditorDirectory,
    inventory: InventoryCache,
    notices: NoticeBoard,
    config: SyncConfig,
    state: Arc<RwLock<SyncState>>,
}

impl SyncOrchestrator {
    pub fn new(
        backend: Arc<dyn ExtensionBackend>,
        directory: EditorDirectory,
        inventory: InventoryCache,
        notices: NoticeBoard,
        config: SyncConfig,
    ) -> Self {
        Self {
            backend,
            directory,
            inventory,
            notices,
            config,
            state: Arc::new(RwLock::new(SyncState::new())),
        }
    }

    async fn fail<T>(&self, error: Error) -> Result<T> {
        self.notices.post_error(error.to_string()).await;
        Err(error)
    }

    // Source and candidates

    /// Choose the source editor and load its extensions as candidates
    ///
    /// Changing the source clears the selection and drops the source from
    /// the targets. A failed load leaves the previous source in place.
    pub async fn set_source(&self, editor: &EditorId) -> Result<()> {
        if let Err(e) = self.directory.require_available(editor).await {
            return self.fail(e).await;
        }
        let request = {
            let mut state = self.state.write().await;
            if let Err(e) = state.require_phase(SyncPhase::Selecting) {
                drop(state);
                return self.fail(e).await;
            }
            state.source_request += 1;
            state.candidates_loading = true;
            state.source_request
        };
        debug!("Loading sync source {}", editor);

        let result = self.backend.list_extensions(editor).await;

        let mut state = self.state.write().await;
        if state.source_request != request {
            return Ok(());
        }
        state.candidates_loading = false;
        match result {
            Ok(records) => {
                if state.source.as_ref() != Some(editor) {
                    state.selection.clear();
                }
                state.source = Some(editor.clone());
                state.targets.remove(editor);
                state.candidates = records;
                debug!("Sync source set to {}", editor);
                Ok(())
            }
            Err(e) => {
                drop(state);
                self.fail(e).await
            }
        }
    }

    pub async fn source(&self) -> Option<EditorId> {
        self.state.read().await.source.clone()
    }

    pub async fn candidates(&self) -> Vec<ExtensionRecord> {
        self.state.read().await.candidates.clone()
    }

    pub async fn is_loading_candidates(&self) -> bool {
        self.state.read().await.candidates_loading
    }

    // View filter

    pub async fn set_filter_text(&self, text: impl Into<String>) {
        self.state.write().await.filter.text = text.into();
    }

    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.filter.mode = mode;
    }

    pub async fn filter(&self) -> CandidateFilter {
        self.state.read().await.filter.clone()
    }

    /// Candidates passing the text filter and view mode
    ///
    /// `Missing` and `Present` show nothing until every target is loaded.
    pub async fn visible_candidates(&self) -> Vec<ExtensionRecord> {
        let state = self.state.read().await;
        let text_matches: Vec<ExtensionRecord> = state.text_filtered().cloned().collect();
        let mode = state.filter.mode;
        let targets: Vec<EditorId> = state.targets.iter().cloned().collect();
        drop(state);

        if mode == ViewMode::All {
            return text_matches;
        }
        if !self.loaded(&targets).await {
            return Vec::new();
        }
        let mut visible = Vec::with_capacity(text_matches.len());
        for record in text_matches {
            let present = self.present_in_any(&targets, &record.id).await;
            if present == (mode == ViewMode::Present) {
                visible.push(record);
            }
        }
        visible
    }

    async fn loaded(&self, targets: &[EditorId]) -> bool {
        if targets.is_empty() {
            return false;
        }
        for target in targets {
            if !self.inventory.is_loaded(target).await {
                return false;
            }
        }
        true
    }

    async fn present_in_any(&self, targets: &[EditorId], id: &ExtensionId) -> bool {
        for target in targets {
            if self.inventory.has(target, id).await {
                return true;
            }
        }
        false
    }

    async fn snapshot_for_bulk(&self) -> (Vec<ExtensionId>, Vec<EditorId>) {
        let state = self.state.read().await;
        let ids = state.text_filtered().map(|r| r.id.clone()).collect();
        let targets = state.targets.iter().cloned().collect();
        (ids, targets)
    }

    /// True when at least one target is selected and all targets are loaded
    pub async fn targets_loaded(&self) -> bool {
        let targets: Vec<EditorId> = self.state.read().await.targets.iter().cloned().collect();
        self.loaded(&targets).await
    }

    pub async fn bulk_actions_enabled(&self) -> bool {
        self.targets_loaded().await
    }

    /// Text-filtered candidates absent from every target; 0 while gated
    pub async fn missing_count(&self) -> usize {
        let (ids, targets) = self.snapshot_for_bulk().await;
        if !self.loaded(&targets).await {
            return 0;
        }
        let mut count = 0;
        for id in &ids {
            if !self.present_in_any(&targets, id).await {
                count += 1;
            }
        }
        count
    }

    /// Text-filtered candidates present in at least one target; 0 while gated
    pub async fn present_count(&self) -> usize {
        let (ids, targets) = self.snapshot_for_bulk().await;
        if !self.loaded(&targets).await {
            return 0;
        }
        let mut count = 0;
        for id in &ids {
            if self.present_in_any(&targets, id).await {
                count += 1;
            }
        }
        count
    }

    // Selection

    /// Returns true when the id is now selected
    pub async fn toggle_extension(&self, id: impl Into<ExtensionId>) -> bool {
        self.state.write().await.selection.toggle(id.into())
    }

    /// Union the selection with every candidate passing the active filter
    pub async fn select_all_visible(&self) -> usize {
        let visible: Vec<ExtensionId> = self
            .visible_candidates()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        self.state.write().await.selection.union(visible)
    }

    /// Union with text-filtered candidates absent from every target
    ///
    /// An unloaded target counts as not containing the id.
    pub async fn select_missing(&self) -> usize {
        let (ids, targets) = self.snapshot_for_bulk().await;
        let mut missing = Vec::new();
        for id in ids {
            if !self.present_in_any(&targets, &id).await {
                missing.push(id);
            }
        }
        self.state.write().await.selection.union(missing)
    }

    /// Union with text-filtered candidates present in at least one target
    pub async fn select_present(&self) -> usize {
        let (ids, targets) = self.snapshot_for_bulk().await;
        let mut present = Vec::new();
        for id in ids {
            if self.present_in_any(&targets, &id).await {
                present.push(id);
            }
        }
        self.state.write().await.selection.union(present)
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    pub async fn selection(&self) -> SelectionSet {
        self.state.read().await.selection.clone()
    }

    pub async fn is_selected(&self, id: &ExtensionId) -> bool {
        self.state.read().await.selection.contains(id)
    }

    // Targets

    /// Add or remove a target; returns true when the target is now selected
    ///
    /// Adding loads the target's inventory. Removing marks the cached
    /// inventory stale so a later re-add fetches it again.
    pub async fn toggle_target(&self, editor: &EditorId) -> Result<bool> {
        let removed = {
            let mut state = self.state.write().await;
            state.targets.remove(editor)
        };
        if removed {
            self.inventory.mark_stale(editor).await;
            debug!("Target {} removed", editor);
            return Ok(false);
        }

        if let Err(e) = self.directory.require_available(editor).await {
            return self.fail(e).await;
        }
        {
            let mut state = self.state.write().await;
            if state.source.as_ref() == Some(editor) {
                drop(state);
                return self
                    .fail(Error::validation(format!(
                        "{} is the sync source and cannot also be a target",
                        editor
                    )))
                    .await;
            }
            state.targets.insert(editor.clone());
        }
        debug!("Target {} added", editor);

        if let Err(e) = self.inventory.ensure_loaded(editor).await {
            warn!("Failed to load inventory of {}: {}", editor, e);
            return self.fail(e).await;
        }
        Ok(true)
    }

    pub async fn targets(&self) -> Vec<EditorId> {
        self.state.read().await.targets.iter().cloned().collect()
    }

    // Execution

    /// Validate the selection, then run the conflict pre-flight
    ///
    /// Conflicts from every target are unioned; a target whose query fails
    /// contributes nothing. Without conflicts the sync runs immediately with
    /// overwrite disabled.
    pub async fn start_sync(&self) -> Result<SyncOutcome> {
        let (source, targets, ids) = {
            let mut state = self.state.write().await;
            let checked = state
                .require_phase(SyncPhase::Selecting)
                .and_then(|_| state.checked_request());
            let (source, targets, ids) = match checked {
                Ok(request) => request,
                Err(e) => {
                    drop(state);
                    return self.fail(e).await;
                }
            };
            state.phase = SyncPhase::CheckingConflicts;
            state.conflicts.clear();
            (source, targets, ids)
        };
        self.notices.clear_error().await;

        let mut conflicts = BTreeSet::new();
        for target in &targets {
            match self.backend.detect_conflicts(&source, target, &ids).await {
                Ok(found) => {
                    debug!("{} conflicts in {}", found.len(), target);
                    conflicts.extend(found.into_iter().map(ExtensionId::from));
                }
                Err(e) => warn!("Conflict check for {} failed: {}", target, e),
            }
        }

        if conflicts.is_empty() {
            return self
                .execute(source, targets, ids, false)
                .await
                .map(SyncOutcome::Completed);
        }

        info!("{} conflicting extensions need confirmation", conflicts.len());
        let mut state = self.state.write().await;
        state.conflicts = conflicts.clone();
        state.pending = Some(PendingSync {
            source,
            targets,
            extension_ids: ids,
        });
        state.phase = SyncPhase::AwaitingConfirmation;
        Ok(SyncOutcome::NeedsConfirmation(conflicts.into_iter().collect()))
    }

    /// Report, per target, what a sync of the current selection would do
    ///
    /// Runs the conflict queries only; the phase and selection are left as
    /// they are. A target whose query fails is left out of the preview.
    pub async fn preview(&self) -> Result<Vec<TargetPreview>> {
        let checked = self.state.read().await.checked_request();
        let (source, targets, ids) = match checked {
            Ok(request) => request,
            Err(e) => return self.fail(e).await,
        };

        let mut previews = Vec::with_capacity(targets.len());
        for target in targets {
            match self.backend.detect_conflicts(&source, &target, &ids).await {
                Ok(found) => {
                    let conflicts: BTreeSet<ExtensionId> =
                        found.into_iter().map(ExtensionId::from).collect();
                    previews.push(TargetPreview {
                        new_count: ids.len().saturating_sub(conflicts.len()),
                        conflicts: conflicts.into_iter().collect(),
                        target,
                    });
                }
                Err(e) => warn!("Conflict check for {} failed: {}", target, e),
            }
        }
        Ok(previews)
    }

    /// Execute the pending sync with the chosen conflict resolution
    ///
    /// Runs the source, targets and ids the conflicts were computed for;
    /// edits made while awaiting confirmation do not leak into the request.
    pub async fn resolve_conflicts(&self, resolution: ConflictResolution) -> Result<SyncReport> {
        let pending = {
            let mut state = self.state.write().await;
            state
                .require_phase(SyncPhase::AwaitingConfirmation)
                .and_then(|_| {
                    state
                        .pending
                        .take()
                        .ok_or_else(|| Error::invalid_state("no sync awaiting confirmation"))
                })
        };
        let pending = match pending {
            Ok(pending) => pending,
            Err(e) => return self.fail(e).await,
        };
        self.execute(
            pending.source,
            pending.targets,
            pending.extension_ids,
            resolution.overwrite(),
        )
        .await
    }

    /// Leave the confirmation step without syncing
    pub async fn cancel_conflicts(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.require_phase(SyncPhase::AwaitingConfirmation)?;
        state.conflicts.clear();
        state.pending = None;
        state.phase = SyncPhase::Selecting;
        debug!("Conflict confirmation cancelled");
        Ok(())
    }

    async fn execute(
        &self,
        source: EditorId,
        targets: Vec<EditorId>,
        extension_ids: Vec<String>,
        overwrite: bool,
    ) -> Result<SyncReport> {
        self.state.write().await.phase = SyncPhase::Executing;
        let request = SyncRequest {
            source_editor: source,
            target_editors: targets,
            extension_ids,
            overwrite_conflicts: overwrite,
        };
        info!(
            "Syncing {} extensions from {} to {} targets (overwrite: {})",
            request.extension_ids.len(),
            request.source_editor,
            request.target_editors.len(),
            overwrite
        );

        let report = match self.backend.execute_sync(&request).await {
            Ok(report) => report,
            Err(e) => {
                {
                    let mut state = self.state.write().await;
                    state.phase = SyncPhase::Selecting;
                    state.conflicts.clear();
                }
                return self.fail(e).await;
            }
        };

        let generation = {
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Reporting;
            state.report = Some(report.clone());
            state.reset_generation += 1;
            state.reset_generation
        };

        if report.has_errors() {
            self.notices
                .post_error(format!(
                    "Sync completed with {} errors. {} extensions copied.",
                    report.total_errors, report.total_copied
                ))
                .await;
        } else {
            self.notices
                .post_info(format!(
                    "Synced {} extensions to {} editors ({} skipped)",
                    report.total_copied,
                    report.results.len(),
                    report.total_skipped
                ))
                .await;
        }

        if let Err(e) = self.directory.reload().await {
            warn!("Failed to refresh editor statuses after sync: {}", e);
        }
        self.schedule_reset(generation);
        Ok(report)
    }

    fn schedule_reset(&self, generation: u64) {
        let this = self.clone();
        let delay = self.config.reset_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.reset_after_report(generation).await;
        });
    }

    async fn reset_after_report(&self, generation: u64) {
        {
            let state = self.state.read().await;
            if state.phase != SyncPhase::Reporting || state.reset_generation != generation {
                return;
            }
        }
        self.reset().await;
    }

    /// Return to a clean starting state, keeping the source and its candidates
    pub async fn reset(&self) {
        {
            let mut state = self.state.write().await;
            state.selection.clear();
            state.targets.clear();
            state.conflicts.clear();
            state.pending = None;
            state.report = None;
            state.phase = SyncPhase::Selecting;
        }
        self.inventory.clear().await;
        debug!("Sync orchestrator reset");
    }

    pub async fn phase(&self) -> SyncPhase {
        self.state.read().await.phase
    }

    pub async fn conflicts(&self) -> Vec<ExtensionId> {
        self.state.read().await.conflicts.iter().cloned().collect()
    }

    pub async fn report(&self) -> Option<SyncReport> {
        self.state.read().await.report.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeKind;
    use crate::test_support::fixture_backend;
    use std::time::Duration;

    async fn orchestrator() -> (SyncOrchestrator, NoticeBoard) {
        let backend = fixture_backend();
        let directory = EditorDirectory::load(backend.clone()).await.unwrap();
        let notices = NoticeBoard::new();
        let sync = SyncOrchestrator::new(
            backend.clone(),
            directory,
            InventoryCache::new(backend),
            notices.clone(),
            SyncConfig::default(),
        );
        sync.set_source(&EditorId::from("vscode")).await.unwrap();
        (sync, notices)
    }

    #[tokio::test]
    async fn test_set_source_loads_candidates() {
        let (sync, _) = orchestrator().await;
        assert_eq!(sync.candidates().await.len(), 3);
        assert!(!sync.is_loading_candidates().await);
    }

    #[tokio::test]
    async fn test_start_requires_selection_and_targets() {
        let (sync, notices) = orchestrator().await;
        let err = sync.start_sync().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            notices.current().await.unwrap().message,
            "Please select at least one extension to sync"
        );

        sync.toggle_extension("a.two").await;
        let err = sync.start_sync().await.unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one target editor");
        assert_eq!(sync.phase().await, SyncPhase::Selecting);
    }

    #[tokio::test]
    async fn test_source_cannot_be_a_target() {
        let (sync, _) = orchestrator().await;
        let err = sync.toggle_target(&EditorId::from("vscode")).await.unwrap_err();
        assert!(err.is_validation());
        let err = sync.toggle_target(&EditorId::from("cursor")).await.unwrap_err();
        assert!(err.is_validation());
        assert!(sync.targets().await.is_empty());
    }

    #[tokio::test]
    async fn test_view_modes_are_gated_until_targets_load() {
        let (sync, _) = orchestrator().await;
        sync.set_view_mode(ViewMode::Missing).await;
        assert!(sync.visible_candidates().await.is_empty());
        assert!(!sync.bulk_actions_enabled().await);
        assert_eq!(sync.missing_count().await, 0);

        sync.toggle_target(&EditorId::from("windsurf")).await.unwrap();
        assert!(sync.targets_loaded().await);
        assert_eq!(sync.visible_candidates().await.len(), 2);
        assert_eq!(sync.missing_count().await, 2);
        assert_eq!(sync.present_count().await, 1);

        sync.set_view_mode(ViewMode::Present).await;
        let present = sync.visible_candidates().await;
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].id.as_str(), "a.one");
    }

    #[tokio::test]
    async fn test_filter_does_not_touch_selection() {
        let (sync, _) = orchestrator().await;
        sync.select_all_visible().await;
        sync.set_filter_text("two").await;
        assert_eq!(sync.visible_candidates().await.len(), 1);
        assert_eq!(sync.selection().await.len(), 3);
    }

    #[tokio::test]
    async fn test_conflict_free_sync_runs_immediately() {
        let (sync, notices) = orchestrator().await;
        sync.toggle_extension("a.two").await;
        sync.toggle_target(&EditorId::from("kiro")).await.unwrap();

        let SyncOutcome::Completed(report) = sync.start_sync().await.unwrap() else {
            panic!("no conflicts expected");
        };
        assert_eq!(report.total_copied, 1);
        assert_eq!(sync.phase().await, SyncPhase::Reporting);
        assert_eq!(notices.current().await.unwrap().kind, NoticeKind::Info);
    }

    #[tokio::test]
    async fn test_cancel_conflicts_returns_to_selecting() {
        let (sync, _) = orchestrator().await;
        sync.toggle_extension("a.one").await;
        sync.toggle_target(&EditorId::from("windsurf")).await.unwrap();

        let outcome = sync.start_sync().await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::NeedsConfirmation(vec![ExtensionId::from("a.one")])
        );
        sync.cancel_conflicts().await.unwrap();
        assert_eq!(sync.phase().await, SyncPhase::Selecting);
        assert!(sync.conflicts().await.is_empty());
        assert_eq!(sync.selection().await.len(), 1);
        assert!(sync
            .resolve_conflicts(ConflictResolution::OverwriteAll)
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_runs_after_delay() {
        let (sync, _) = orchestrator().await;
        sync.toggle_extension("a.two").await;
        sync.toggle_target(&EditorId::from("kiro")).await.unwrap();
        sync.start_sync().await.unwrap();

        assert!(sync.report().await.is_some());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sync.phase().await, SyncPhase::Reporting);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sync.phase().await, SyncPhase::Selecting);
        assert!(sync.selection().await.is_empty());
        assert!(sync.targets().await.is_empty());
        assert!(sync.report().await.is_none());
        assert_eq!(sync.source().await, Some(EditorId::from("vscode")));
    }
}
