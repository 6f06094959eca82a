//! Editors command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};
use vsynx_core::types::{CliFlavor, EditorFamily};
use vsynx_session::Session;

use crate::cli::EditorsArgs;
use crate::output;

#[derive(Tabled)]
struct EditorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "FAMILY")]
    family: String,
    #[tabled(rename = "EXTENSIONS")]
    extensions: String,
    #[tabled(rename = "CLI")]
    cli: String,
}

pub async fn run(args: EditorsArgs, session: &Session) -> Result<()> {
    let directory = session.directory();
    let statuses = directory.statuses().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    output::header("Editors");
    let rows: Vec<EditorRow> = statuses
        .iter()
        .map(|status| EditorRow {
            id: status.editor.id.to_string(),
            name: status.editor.name.clone(),
            family: match status.editor.family {
                EditorFamily::VsCode => "vscode".to_string(),
                EditorFamily::Clone => "clone".to_string(),
            },
            extensions: if status.is_available {
                status.extension_count.to_string()
            } else {
                status
                    .disabled_reason
                    .clone()
                    .unwrap_or_else(|| "unavailable".to_string())
            },
            cli: status.cli_path.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));

    let cli = directory.cli_status().await;
    output::header("Command line tools");
    for flavor in CliFlavor::ALL {
        let value = cli.path(flavor).unwrap_or("not found");
        output::kv(flavor.command(), value);
    }
    match directory.install_target().await {
        Some(flavor) => output::kv("install target", flavor.command()),
        None => output::warning("No VS Code CLI available"),
    }
    Ok(())
}
