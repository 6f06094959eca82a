//! Audit session tests
//!
//! Cooperative cancellation, supersession, the per-editor report cache and
//! failure recovery, driven with audit responses held behind a gate.

mod common;

use common::*;
use vsynx_core::Error;
use vsynx_session::AuditOutcome;

#[tokio::test]
async fn test_cancelled_audit_result_is_discarded() {
    let backend = scripted(DEV_MACHINE);
    backend.gate_audits();
    let (audit, _) = audit_fixture(backend.clone()).await;

    let running = audit.clone();
    let task = tokio::spawn(async move { running.start(&editor("vscode")).await });
    wait_until(|| backend.count("audit_extensions") == 1).await;
    assert!(audit.is_running().await);

    assert!(audit.cancel().await);
    assert!(!audit.is_running().await);
    assert!(audit.report().await.is_none());

    backend.release_audit();
    let outcome = task.await.unwrap().unwrap();
    assert_eq!(outcome, AuditOutcome::Discarded);
    assert!(!audit.is_running().await);
    assert!(audit.report().await.is_none());
    assert_eq!(audit.cached_count().await, 0);
}

#[tokio::test]
async fn test_cancel_keeps_previous_report_displayed() {
    let backend = scripted(DEV_MACHINE);
    let (audit, _) = audit_fixture(backend.clone()).await;
    audit.start(&editor("vscode")).await.unwrap();
    let before = audit.report().await;
    assert!(before.is_some());

    backend.gate_audits();
    let running = audit.clone();
    let task = tokio::spawn(async move { running.start(&editor("vscode")).await });
    wait_until(|| backend.count("audit_extensions") == 2).await;
    audit.cancel().await;
    backend.release_audit();

    assert_eq!(task.await.unwrap().unwrap(), AuditOutcome::Discarded);
    assert_eq!(audit.report().await, before);
}

#[tokio::test]
async fn test_audit_of_another_editor_while_running_is_rejected() {
    let backend = scripted(DEV_MACHINE);
    backend.gate_audits();
    let (audit, notices) = audit_fixture(backend.clone()).await;

    let running = audit.clone();
    let task = tokio::spawn(async move { running.start(&editor("vscode")).await });
    wait_until(|| backend.count("audit_extensions") == 1).await;

    let err = audit.start(&editor("windsurf")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(notices.current().await.unwrap().is_error());
    assert_eq!(audit.running_editor().await, Some(editor("vscode")));

    backend.release_audit();
    assert!(matches!(
        task.await.unwrap().unwrap(),
        AuditOutcome::Completed(_)
    ));
}

#[tokio::test]
async fn test_restart_for_same_editor_supersedes() {
    let backend = scripted(DEV_MACHINE);
    backend.gate_audits();
    let (audit, _) = audit_fixture(backend.clone()).await;

    let first = {
        let audit = audit.clone();
        tokio::spawn(async move { audit.start(&editor("vscode")).await })
    };
    wait_until(|| backend.count("audit_extensions") == 1).await;
    let second = {
        let audit = audit.clone();
        tokio::spawn(async move { audit.start(&editor("vscode")).await })
    };
    wait_until(|| backend.count("audit_extensions") == 2).await;

    backend.release_audit();
    backend.release_audit();
    assert_eq!(first.await.unwrap().unwrap(), AuditOutcome::Discarded);
    assert!(matches!(
        second.await.unwrap().unwrap(),
        AuditOutcome::Completed(_)
    ));
    assert_eq!(audit.cached_count().await, 1);
}

#[tokio::test]
async fn test_switching_editors_never_shows_another_editors_report() {
    let backend = scripted(DEV_MACHINE);
    let (audit, _) = audit_fixture(backend.clone()).await;

    audit.start(&editor("vscode")).await.unwrap();
    audit.start(&editor("windsurf")).await.unwrap();
    let vscode_report = audit.cached_report(&editor("vscode")).await.unwrap();
    let windsurf_report = audit.cached_report(&editor("windsurf")).await.unwrap();
    assert_eq!(vscode_report.total_extensions, 3);
    assert_eq!(windsurf_report.total_extensions, 1);

    for (id, expected) in [
        ("vscode", Some(&vscode_report)),
        ("cursor", None),
        ("windsurf", Some(&windsurf_report)),
        ("vscodium", None),
        ("vscode", Some(&vscode_report)),
    ] {
        audit.switch_editor(&editor(id)).await.unwrap();
        assert_eq!(audit.current_editor().await, editor(id));
        assert_eq!(audit.report().await.as_ref(), expected, "after switching to {}", id);
    }
    assert_eq!(backend.count("audit_extensions"), 2);
}

#[tokio::test]
async fn test_switch_cancels_running_audit() {
    let backend = scripted(DEV_MACHINE);
    backend.gate_audits();
    let (audit, _) = audit_fixture(backend.clone()).await;

    let running = audit.clone();
    let task = tokio::spawn(async move { running.start(&editor("vscode")).await });
    wait_until(|| backend.count("audit_extensions") == 1).await;

    audit.switch_editor(&editor("windsurf")).await.unwrap();
    assert!(!audit.is_running().await);
    backend.release_audit();

    assert_eq!(task.await.unwrap().unwrap(), AuditOutcome::Discarded);
    assert!(audit.report().await.is_none());
    assert!(audit.cached_report(&editor("vscode")).await.is_none());
}

#[tokio::test]
async fn test_failed_audit_keeps_cached_report() {
    let backend = scripted(DEV_MACHINE);
    let (audit, notices) = audit_fixture(backend.clone()).await;
    audit.start(&editor("vscode")).await.unwrap();
    let cached = audit.cached_report(&editor("vscode")).await;

    backend.fail("audit_extensions");
    let err = audit.start(&editor("vscode")).await.unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert!(!audit.is_running().await);
    assert_eq!(audit.cached_report(&editor("vscode")).await, cached);
    assert_eq!(audit.report().await, cached);
    assert_eq!(
        notices.current().await.unwrap().message,
        "Failed to audit extensions: injected failure"
    );

    notices.dismiss().await;
    backend.recover("audit_extensions");
    assert!(audit.start(&editor("vscode")).await.is_ok());
    assert!(notices.current().await.is_none());
}

#[tokio::test]
async fn test_failed_extension_list_surfaces_error() {
    let backend = scripted(DEV_MACHINE);
    backend.fail("list_extensions:cursor");
    let (audit, notices) = audit_fixture(backend.clone()).await;

    assert!(audit.switch_editor(&editor("cursor")).await.is_err());
    assert!(audit.extensions().await.is_empty());
    assert!(!audit.is_loading_extensions().await);
    assert!(notices.current().await.unwrap().is_error());
}
