//! Shared fixtures for unit tests

use std::sync::Arc;
use vsynx_core::backend::SnapshotBackend;
use vsynx_core::ExtensionBackend;

/// vscode holds a.one..a.three, windsurf holds A.One, kiro is empty,
/// vscodium and cursor are not installed. Only the `code` CLI exists.
pub const FIXTURE: &str = r#"
editors:
  - profile: { id: vscode, name: VS Code, extensionsDir: /home/dev/.vscode/extensions, cliCommand: code, family: vs-code }
    extensions:
      - { id: a.one, version: 1.0.0 }
      - { id: a.two, version: 2.0.0 }
      - { id: a.three, version: 3.0.0 }
  - profile: { id: vscodium, name: VSCodium, extensionsDir: /home/dev/.vscode-oss/extensions, cliCommand: codium, family: vs-code }
    available: false
  - profile: { id: windsurf, name: Windsurf, extensionsDir: /home/dev/.windsurf/extensions, family: clone }
    extensions:
      - { id: A.One, version: 0.9.0 }
  - profile: { id: cursor, name: Cursor, extensionsDir: /home/dev/.cursor/extensions, family: clone }
    available: false
  - profile: { id: kiro, name: Kiro, extensionsDir: /home/dev/.kiro/extensions, family: clone }
cli:
  tools:
    code: /usr/bin/code
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
  - { id: ms-toolsai.jupyter, publisher: ms-toolsai, version: 2024.1.0, displayName: Jupyter, description: Python notebooks }
  - { id: esbenp.prettier-vscode, publisher: esbenp, version: 10.1.0, displayName: Prettier }
"#;

pub fn fixture_snapshot_backend() -> Arc<SnapshotBackend> {
    Arc::new(SnapshotBackend::from_yaml_str(FIXTURE).unwrap())
}

pub fn fixture_backend() -> Arc<dyn ExtensionBackend> {
    fixture_snapshot_backend()
}
