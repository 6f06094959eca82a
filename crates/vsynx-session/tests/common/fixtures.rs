//! Snapshot fixtures and controller builders

#![allow(dead_code)]

use super::mocks::ScriptedBackend;
use std::sync::Arc;
use vsynx_core::backend::SnapshotBackend;
use vsynx_core::types::{EditorId, SessionConfig, SyncConfig};
use vsynx_core::ExtensionBackend;
use vsynx_session::{
    AuditSession, EditorDirectory, InstallSync, InventoryCache, NoticeBoard, SyncOrchestrator,
};

/// vscode holds a.one..a.three, windsurf holds a.one, cursor and vscodium are
/// empty, kiro is not installed. The `code` and `codium` CLIs exist.
pub const DEV_MACHINE: &str = r#"
editors:
  - profile: { id: vscode, name: VS Code, extensionsDir: /home/dev/.vscode/extensions, cliCommand: code, family: vs-code }
    extensions:
      - { id: a.one, version: 1.0.0 }
      - { id: a.two, version: 2.0.0 }
      - { id: a.three, version: 3.0.0 }
  - profile: { id: vscodium, name: VSCodium, extensionsDir: /home/dev/.vscode-oss/extensions, cliCommand: codium, family: vs-code }
  - profile: { id: windsurf, name: Windsurf, extensionsDir: /home/dev/.windsurf/extensions, family: clone }
    extensions:
      - { id: a.one, version: 0.9.0 }
  - profile: { id: cursor, name: Cursor, extensionsDir: /home/dev/.cursor/extensions, family: clone }
  - profile: { id: kiro, name: Kiro, extensionsDir: /home/dev/.kiro/extensions, family: clone }
    available: false
cli:
  tools:
    code: /usr/bin/code
    codium: /usr/bin/codium
verdicts:
  a.one: Legitimate
  a.two: Suspicious
  a.three: Malicious
marketplace:
  - { id: ms-python.python, publisher: ms-python, version: 2024.1.0, displayName: Python }
  - { id: ms-python.pylint, publisher: ms-python, version: 2023.10.0, displayName: Pylint }
  - { id: ms-python.black-formatter, publisher: ms-python, version: 2024.0.0, displayName: Black Formatter }
  - { id: ms-python.isort, publisher: ms-python, version: 2023.10.1, displayName: isort }
  - { id: ms-python.flake8, publisher: ms-python, version: 2023.10.0, displayName: Flake8 }
  - { id: ms-python.mypy-type-checker, publisher: ms-python, version: 2023.6.0, displayName: Mypy }
  - { id: ms-python.debugpy, publisher: ms-python, version: 2024.0.0, displayName: Python Debugger }
  - { id: ms-python.autopep8, publisher: ms-python, version: 2023.8.0, displayName: autopep8 }
  - { id: ms-python.vscode-pylance, publisher: ms-python, version: 2024.1.1, displayName: Pylance }
  - { id: ms-toolsai.jupyter, publisher: ms-toolsai, version: 2024.1.0, displayName: Jupyter }
  - { id: esbenp.prettier-vscode, publisher: esbenp, version: 10.1.0, displayName: Prettier }
"#;

/// Same editors with no CLI installed
pub const NO_CLI_MACHINE: &str = r#"
editors:
  - profile: { id: vscode, name: VS Code, extensionsDir: /home/dev/.vscode/extensions, cliCommand: code, family: vs-code }
  - profile: { id: cursor, name: Cursor, extensionsDir: /home/dev/.cursor/extensions, family: clone }
marketplace:
  - { id: ms-python.python, publisher: ms-python, version: 2024.1.0 }
"#;

pub fn snapshot(yaml: &str) -> SnapshotBackend {
    SnapshotBackend::from_yaml_str(yaml).unwrap()
}

pub fn scripted(yaml: &str) -> Arc<ScriptedBackend> {
    Arc::new(ScriptedBackend::new(snapshot(yaml)))
}

pub fn editor(id: &str) -> EditorId {
    EditorId::from(id)
}

/// Sync orchestrator with `vscode` as source, sharing the returned cache
pub async fn sync_fixture(
    backend: Arc<dyn ExtensionBackend>,
) -> (SyncOrchestrator, InventoryCache, NoticeBoard) {
    let directory = EditorDirectory::load(backend.clone()).await.unwrap();
    let inventory = InventoryCache::new(backend.clone());
    let notices = NoticeBoard::new();
    let sync = SyncOrchestrator::new(
        backend,
        directory,
        inventory.clone(),
        notices.clone(),
        SyncConfig::default(),
    );
    sync.set_source(&editor("vscode")).await.unwrap();
    (sync, inventory, notices)
}

pub async fn audit_fixture(backend: Arc<dyn ExtensionBackend>) -> (AuditSession, NoticeBoard) {
    let directory = EditorDirectory::load(backend.clone()).await.unwrap();
    let notices = NoticeBoard::new();
    let audit = AuditSession::new(backend, directory, notices.clone(), editor("vscode"));
    (audit, notices)
}

pub async fn install_fixture(backend: Arc<dyn ExtensionBackend>) -> (InstallSync, NoticeBoard) {
    let directory = EditorDirectory::load(backend.clone()).await.unwrap();
    let notices = NoticeBoard::new();
    (InstallSync::new(backend, directory, notices.clone()), notices)
}

pub fn default_config() -> SessionConfig {
    SessionConfig::default()
}
