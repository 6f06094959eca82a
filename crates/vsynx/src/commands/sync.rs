//! Sync command

use anyhow::{bail, Result};
use dialoguer::Select;
use tabled::{settings::Style, Table, Tabled};
use vsynx_core::types::{EditorId, SyncReport};
use vsynx_session::{ConflictResolution, Session, SyncOutcome, TargetPreview};

use crate::cli::{SyncAction, SyncArgs, SyncPreviewArgs, SyncSelection};
use crate::output;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "COPIED")]
    copied: usize,
    #[tabled(rename = "SKIPPED")]
    skipped: usize,
    #[tabled(rename = "OVERWRITTEN")]
    overwritten: usize,
    #[tabled(rename = "ERRORS")]
    errors: usize,
}

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "NEW")]
    new: usize,
    #[tabled(rename = "CONFLICTS")]
    conflicts: usize,
    #[tabled(rename = "EXISTING")]
    existing: String,
}

impl From<&TargetPreview> for PreviewRow {
    fn from(preview: &TargetPreview) -> Self {
        Self {
            target: preview.target.to_string(),
            new: preview.new_count,
            conflicts: preview.conflicts.len(),
            existing: preview
                .conflicts
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub async fn run(args: SyncArgs, session: &Session) -> Result<()> {
    match args.action {
        Some(SyncAction::Preview(preview_args)) => preview(preview_args, session, false).await,
        Some(SyncAction::Conflicts(preview_args)) => preview(preview_args, session, true).await,
        None => execute(args, session).await,
    }
}

/// Apply source, filter, targets and extension choice to the orchestrator
async fn apply_selection(selection: &SyncSelection, session: &Session) -> Result<usize> {
    let sync = session.sync();

    if let Some(from) = &selection.from {
        sync.set_source(&EditorId::from(from.as_str())).await?;
    }
    if let Some(filter) = &selection.filter {
        sync.set_filter_text(filter.as_str()).await;
    }
    for target in &selection.to {
        sync.toggle_target(&EditorId::from(target.as_str())).await?;
    }

    if selection.all {
        sync.select_all_visible().await;
    } else if selection.missing {
        if !sync.targets_loaded().await {
            output::warning("Some target inventories are not loaded; treating them as empty");
        }
        sync.select_missing().await;
    } else {
        let candidates = sync.candidates().await;
        for id in &selection.ext {
            let Some(candidate) = candidates
                .iter()
                .find(|c| c.id.as_str().eq_ignore_ascii_case(id))
            else {
                bail!("Extension {} is not installed in the source editor", id);
            };
            if !sync.is_selected(&candidate.id).await {
                sync.toggle_extension(candidate.id.clone()).await;
            }
        }
    }

    Ok(sync.selection().await.len())
}

/// Dry run of the conflict pre-flight; nothing is copied
async fn preview(args: SyncPreviewArgs, session: &Session, conflicts_only: bool) -> Result<()> {
    if apply_selection(&args.selection, session).await? == 0 {
        output::info("Nothing to sync");
        return Ok(());
    }

    let mut previews = session.sync().preview().await?;
    if conflicts_only {
        previews.retain(|p| !p.conflicts.is_empty());
    }

    if args.json {
        let value: Vec<serde_json::Value> = previews
            .iter()
            .map(|p| {
                serde_json::json!({
                    "target": p.target.to_string(),
                    "newCount": p.new_count,
                    "conflicts": p.conflicts.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if previews.is_empty() {
        if conflicts_only {
            output::success("No conflicts in the selected targets");
        } else {
            output::warning("No target could be checked");
        }
        return Ok(());
    }
    output::header("Sync preview");
    let rows: Vec<PreviewRow> = previews.iter().map(PreviewRow::from).collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

async fn execute(args: SyncArgs, session: &Session) -> Result<()> {
    let sync = session.sync();
    let selected = apply_selection(&args.selection, session).await?;
    if selected == 0 {
        output::info("Nothing to sync");
        return Ok(());
    }
    output::info(&format!("Syncing {} extension(s)", selected));

    let report = match sync.start_sync().await? {
        SyncOutcome::Completed(report) => report,
        SyncOutcome::NeedsConfirmation(conflicts) => {
            output::header(&format!("{} extension(s) already exist in a target", conflicts.len()));
            for id in &conflicts {
                println!("  {}", id);
            }
            let resolution = if args.overwrite {
                Some(ConflictResolution::OverwriteAll)
            } else if args.skip_conflicts {
                Some(ConflictResolution::SkipConflicts)
            } else {
                prompt_resolution()?
            };
            match resolution {
                Some(resolution) => sync.resolve_conflicts(resolution).await?,
                None => {
                    sync.cancel_conflicts().await?;
                    output::warning("Sync cancelled");
                    return Ok(());
                }
            }
        }
    };

    print_report(&report);
    output::notice(session.notices().current().await);
    Ok(())
}

fn prompt_resolution() -> Result<Option<ConflictResolution>> {
    let choice = Select::new()
        .with_prompt("How should conflicts be handled?")
        .items(&["Skip conflicts", "Overwrite all", "Cancel"])
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => Some(ConflictResolution::SkipConflicts),
        1 => Some(ConflictResolution::OverwriteAll),
        _ => None,
    })
}

/// Print per-target results of a sync
pub fn print_report(report: &SyncReport) {
    output::header(&format!("Sync from {}", report.source_editor));
    let rows: Vec<ResultRow> = report
        .results
        .iter()
        .map(|result| ResultRow {
            target: result.target_editor.to_string(),
            copied: result.copied_count,
            skipped: result.skipped_count,
            overwritten: result.overwritten_count,
            errors: result.errors.len(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));

    for result in &report.results {
        for error in &result.errors {
            output::error(&format!("{}: {}", result.target_editor, error));
        }
    }
}
