//! Mock backends for testing
//!
//! `ScriptedBackend` delegates to a snapshot backend while recording every
//! call. Tests can inject failures, hold audit responses behind a gate, add
//! search latency, and replace the sync report with a canned one.
//! `MockBackend` is a mockall mock for strict call-count expectations.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use vsynx_core::backend::SnapshotBackend;
use vsynx_core::types::{
    AuditReport, CliStatus, EditorId, EditorProfile, EditorStatus, ExtensionMetadata,
    ExtensionRecord, SyncReport, SyncRequest, ValidationResult,
};
use vsynx_core::{Error, ExtensionBackend, Result};

/// Record of a backend invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendCall {
    pub operation: &'static str,
    pub args: Vec<String>,
}

pub struct ScriptedBackend {
    inner: SnapshotBackend,
    /// Recorded invocations
    calls: Arc<Mutex<Vec<BackendCall>>>,
    /// Every sync request received
    sync_requests: Arc<Mutex<Vec<SyncRequest>>>,
    /// Keys are `operation` or `operation:first-arg`
    failures: Mutex<HashSet<String>>,
    audit_gate: Mutex<Option<Arc<Semaphore>>>,
    search_latency: Mutex<Option<Duration>>,
    canned_sync_report: Mutex<Option<SyncReport>>,
}

impl ScriptedBackend {
    pub fn new(inner: SnapshotBackend) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            sync_requests: Arc::new(Mutex::new(Vec::new())),
            failures: Mutex::new(HashSet::new()),
            audit_gate: Mutex::new(None),
            search_latency: Mutex::new(None),
            canned_sync_report: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &SnapshotBackend {
        &self.inner
    }

    /// Make `key` (`operation` or `operation:first-arg`) fail
    pub fn fail(&self, key: &str) {
        self.failures.lock().unwrap().insert(key.to_string());
    }

    pub fn recover(&self, key: &str) {
        self.failures.lock().unwrap().remove(key);
    }

    /// Hold audit responses until `release_audit` is called
    pub fn gate_audits(&self) {
        *self.audit_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_audit(&self) {
        if let Some(gate) = self.audit_gate.lock().unwrap().as_ref() {
            gate.add_permits(1);
        }
    }

    pub fn set_search_latency(&self, latency: Duration) {
        *self.search_latency.lock().unwrap() = Some(latency);
    }

    /// Answer every sync with `report` instead of running it
    pub fn set_sync_report(&self, report: SyncReport) {
        *self.canned_sync_report.lock().unwrap() = Some(report);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls_to(operation).len()
    }

    pub fn sync_requests(&self) -> Vec<SyncRequest> {
        self.sync_requests.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, args: &[&str]) -> Result<()> {
        self.calls.lock().unwrap().push(BackendCall {
            operation,
            args: args.iter().map(|s| s.to_string()).collect(),
        });

        let failures = self.failures.lock().unwrap();
        let keyed = args
            .first()
            .map(|first| format!("{}:{}", operation, first))
            .is_some_and(|key| failures.contains(&key));
        if keyed || failures.contains(operation) {
            return Err(Error::backend(operation.replace('_', " "), "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExtensionBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn list_extensions(&self, editor: &EditorId) -> Result<Vec<ExtensionRecord>> {
        self.record("list_extensions", &[editor.as_str()])?;
        self.inner.list_extensions(editor).await
    }

    async fn validate_extension(&self, extension_id: &str) -> Result<ValidationResult> {
        self.record("validate_extension", &[extension_id])?;
        self.inner.validate_extension(extension_id).await
    }

    async fn audit_extensions(&self, extensions_dir: &str) -> Result<AuditReport> {
        self.record("audit_extensions", &[extensions_dir])?;
        let gate = self.audit_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| Error::backend("audit extensions", e.to_string()))?
                .forget();
        }
        self.inner.audit_extensions(extensions_dir).await
    }

    async fn search_marketplace(&self, keyword: &str) -> Result<Vec<ExtensionMetadata>> {
        self.record("search_marketplace", &[keyword])?;
        let latency = *self.search_latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.inner.search_marketplace(keyword).await
    }

    async fn editor_profiles(&self) -> Result<Vec<EditorProfile>> {
        self.record("editor_profiles", &[])?;
        self.inner.editor_profiles().await
    }

    async fn editor_statuses(&self) -> Result<Vec<EditorStatus>> {
        self.record("editor_statuses", &[])?;
        self.inner.editor_statuses().await
    }

    async fn cli_status(&self) -> Result<CliStatus> {
        self.record("cli_status", &[])?;
        self.inner.cli_status().await
    }

    async fn install_via_cli(&self, cli_command: &str, extension_id: &str) -> Result<()> {
        self.record("install_via_cli", &[cli_command, extension_id])?;
        self.inner.install_via_cli(cli_command, extension_id).await
    }

    async fn execute_sync(&self, request: &SyncRequest) -> Result<SyncReport> {
        self.sync_requests.lock().unwrap().push(request.clone());
        self.record("execute_sync", &[request.source_editor.as_str()])?;
        let canned = self.canned_sync_report.lock().unwrap().clone();
        match canned {
            Some(report) => Ok(report),
            None => self.inner.execute_sync(request).await,
        }
    }

    async fn detect_conflicts(
        &self,
        source: &EditorId,
        target: &EditorId,
        extension_ids: &[String],
    ) -> Result<Vec<String>> {
        self.record("detect_conflicts", &[target.as_str(), source.as_str()])?;
        self.inner
            .detect_conflicts(source, target, extension_ids)
            .await
    }
}

mock! {
    pub Backend {}

    #[async_trait]
    impl ExtensionBackend for Backend {
        fn name(&self) -> &'static str;
        async fn list_extensions(&self, editor: &EditorId) -> Result<Vec<ExtensionRecord>>;
        async fn validate_extension(&self, extension_id: &str) -> Result<ValidationResult>;
        async fn audit_extensions(&self, extensions_dir: &str) -> Result<AuditReport>;
        async fn search_marketplace(&self, keyword: &str) -> Result<Vec<ExtensionMetadata>>;
        async fn editor_profiles(&self) -> Result<Vec<EditorProfile>>;
        async fn editor_statuses(&self) -> Result<Vec<EditorStatus>>;
        async fn cli_status(&self) -> Result<CliStatus>;
        async fn install_via_cli(&self, cli_command: &str, extension_id: &str) -> Result<()>;
        async fn execute_sync(&self, request: &SyncRequest) -> Result<SyncReport>;
        async fn detect_conflicts(
            &self,
            source: &EditorId,
            target: &EditorId,
            extension_ids: &[String],
        ) -> Result<Vec<String>>;
    }
}

/// Marketplace hits named `prefix-0`, `prefix-1`, ...
pub fn hits(prefix: &str, count: usize) -> Vec<ExtensionMetadata> {
    (0..count)
        .map(|i| ExtensionMetadata {
            id: format!("publisher.{}-{}", prefix, i),
            publisher: "publisher".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        })
        .collect()
}
