//! Search command

use anyhow::{bail, Result};
use tabled::{settings::Style, Table, Tabled};
use vsynx_core::types::{ExtensionMetadata, ValidationResult};
use vsynx_session::Session;

use crate::cli::SearchArgs;
use crate::output;

#[derive(Tabled)]
struct HitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "PUBLISHER")]
    publisher: String,
}

impl From<&ExtensionMetadata> for HitRow {
    fn from(hit: &ExtensionMetadata) -> Self {
        let publisher = if hit.is_verified_publisher {
            format!("{} ✓", hit.publisher)
        } else {
            hit.publisher.clone()
        };
        Self {
            id: hit.id.clone(),
            name: hit.display_name.clone(),
            version: hit.version.clone(),
            publisher,
        }
    }
}

pub async fn run(args: SearchArgs, session: &Session) -> Result<()> {
    let search = session.search();
    search.on_input(args.query.as_str()).await;

    let spinner = output::spinner(&format!("Searching for '{}'...", args.query.trim()));
    let results = search.search().await;
    spinner.finish_and_clear();
    let results = results?;

    if results.is_empty() {
        output::notice(session.notices().current().await);
        return Ok(());
    }

    output::header(&format!("Results ({})", results.len()));
    let rows: Vec<HitRow> = results.iter().map(HitRow::from).collect();
    println!("{}", Table::new(rows).with(Style::sharp()));

    if let Some(id) = args.validate {
        let Some(hit) = results.iter().find(|r| r.id.eq_ignore_ascii_case(&id)) else {
            bail!("{} is not among the results", id);
        };
        let details = search.select_result(hit.clone()).await?;
        print_details(&details);
    }
    Ok(())
}

/// Print a validation verdict
pub fn print_details(details: &ValidationResult) {
    output::header(&details.extension_id);
    output::kv("trust", &output::trust(details.trust_level));
    if !details.recommendation.is_empty() {
        output::kv("recommendation", &details.recommendation);
    }
    for difference in &details.differences {
        output::kv("difference", difference);
    }
    if let Some(error) = &details.error {
        output::warning(error);
    }
}
