//! Install and install-sync commands

use anyhow::{anyhow, bail, Result};
use vsynx_core::types::{CliFlavor, EditorId, ExtensionMetadata};
use vsynx_session::Session;

use super::search::print_details;
use super::sync::print_report;
use crate::cli::{InstallArgs, InstallSyncArgs};
use crate::output;

/// Point the install target at the CLI named by `--via`
async fn choose_cli(via: Option<&str>, session: &Session) -> Result<()> {
    if let Some(via) = via {
        let flavor = CliFlavor::ALL
            .into_iter()
            .find(|f| f.command() == via)
            .ok_or_else(|| anyhow!("Unknown CLI '{}' (expected code, code-insiders or codium)", via))?;
        session.directory().set_install_target(flavor).await?;
    }
    Ok(())
}

/// Look an id up in the marketplace through the search controller
async fn find_in_marketplace(id: &str, session: &Session) -> Result<ExtensionMetadata> {
    let search = session.search();
    search.on_input(id).await;
    let hits = search.search().await?;
    hits.into_iter()
        .find(|hit| hit.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| anyhow!("Extension '{}' not found in marketplace", id))
}

/// Install each id in turn; the remaining ids still run after a failure
pub async fn install(args: InstallArgs, session: &Session) -> Result<()> {
    choose_cli(args.via.as_deref(), session).await?;

    let composite = session.install_sync();
    let mut failed = 0;
    for id in &args.ids {
        let extension = match find_in_marketplace(id, session).await {
            Ok(extension) => extension,
            Err(e) => {
                output::error(&e.to_string());
                failed += 1;
                continue;
            }
        };

        let spinner = output::spinner(&format!("Installing {}...", extension.id));
        let result = composite.install(&extension).await;
        spinner.finish_and_clear();
        match result {
            Ok(()) => output::notice(session.notices().current().await),
            Err(e) => {
                output::error(&format!("{}: {}", extension.id, e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} extension(s) failed to install", failed, args.ids.len());
    }
    Ok(())
}

pub async fn run(args: InstallSyncArgs, session: &Session) -> Result<()> {
    choose_cli(args.via.as_deref(), session).await?;

    let search = session.search();
    let extension = find_in_marketplace(&args.id, session).await?;

    let details = search.select_result(extension.clone()).await?;
    print_details(&details);

    let composite = session.install_sync();
    for target in &args.to {
        composite.toggle_target(&EditorId::from(target.as_str())).await?;
    }

    let spinner = output::spinner(&format!("Installing {}...", extension.id));
    let result = composite.install_and_sync(search.selected().await.as_ref()).await;
    spinner.finish_and_clear();
    let report = result?;

    print_report(&report);
    output::notice(session.notices().current().await);
    Ok(())
}
