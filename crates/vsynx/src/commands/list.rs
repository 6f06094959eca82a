//! List command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};
use vsynx_session::Session;

use super::editor_or_default;
use crate::cli::ListArgs;
use crate::output;

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "ENABLED")]
    enabled: String,
}

pub async fn run(args: ListArgs, session: &Session) -> Result<()> {
    let editor = editor_or_default(args.editor.as_deref(), session);
    let audit = session.audit();
    audit.switch_editor(&editor).await?;
    let extensions = audit.extensions().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&extensions)?);
        return Ok(());
    }

    if extensions.is_empty() {
        output::info(&format!("No extensions installed in {}", editor));
        return Ok(());
    }

    output::header(&format!("Extensions in {} ({})", editor, extensions.len()));
    let rows: Vec<ExtensionRow> = extensions
        .into_iter()
        .map(|ext| ExtensionRow {
            id: ext.id.to_string(),
            version: ext.version,
            enabled: if ext.is_enabled { "yes" } else { "no" }.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}
