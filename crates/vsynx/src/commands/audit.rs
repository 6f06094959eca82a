//! Audit command
//!
//! The audit runs on a background task; Ctrl-C cancels it through the
//! session, which discards whatever the backend eventually returns.
//! Exits with status 2 when any extension is judged malicious.

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};
use vsynx_core::types::{AuditReport, TrustLevel, ValidationResult};
use vsynx_session::{AuditOutcome, Session};

use super::editor_or_default;
use crate::cli::AuditArgs;
use crate::output;

#[derive(Tabled)]
struct VerdictRow {
    #[tabled(rename = "EXTENSION")]
    extension: String,
    #[tabled(rename = "TRUST")]
    trust: String,
    #[tabled(rename = "RECOMMENDATION")]
    recommendation: String,
}

impl From<&ValidationResult> for VerdictRow {
    fn from(result: &ValidationResult) -> Self {
        Self {
            extension: result.extension_id.clone(),
            trust: output::trust(result.trust_level),
            recommendation: result.recommendation.clone(),
        }
    }
}

pub async fn run(args: AuditArgs, session: &Session) -> Result<()> {
    let editor = editor_or_default(args.editor.as_deref(), session);
    let audit = session.audit().clone();

    let spinner = output::spinner(&format!("Auditing extensions in {}...", editor));
    let mut task = {
        let audit = audit.clone();
        let editor = editor.clone();
        tokio::spawn(async move { audit.start(&editor).await })
    };

    let outcome = tokio::select! {
        joined = &mut task => joined??,
        _ = tokio::signal::ctrl_c() => {
            audit.cancel().await;
            spinner.finish_and_clear();
            output::warning("Audit cancelled");
            return Ok(());
        }
    };
    spinner.finish_and_clear();

    let report = match outcome {
        AuditOutcome::Completed(report) => report,
        AuditOutcome::Discarded => {
            output::warning("Audit was superseded");
            return Ok(());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&editor.to_string(), &report, args.all);
    }

    if report.malicious_count > 0 {
        std::process::exit(2);
    }
    Ok(())
}

fn print_report(editor: &str, report: &AuditReport, all: bool) {
    output::header(&format!("Audit of {}", editor));
    output::kv("extensions", &report.total_extensions.to_string());
    for level in [
        TrustLevel::Legitimate,
        TrustLevel::Suspicious,
        TrustLevel::Malicious,
        TrustLevel::Unknown,
    ] {
        output::kv(&level.to_string().to_lowercase(), &report.count(level).to_string());
    }
    output::kv("audited at", &report.audit_time.to_rfc3339());

    let rows: Vec<VerdictRow> = if all {
        report.results.iter().map(VerdictRow::from).collect()
    } else {
        report.flagged().into_iter().map(VerdictRow::from).collect()
    };

    if rows.is_empty() {
        output::success("No suspicious or malicious extensions found");
        return;
    }
    println!();
    println!("{}", Table::new(rows).with(Style::sharp()));
}
