//! Validate command
//!
//! Exits with status 2 when the extension is judged malicious.

use anyhow::Result;
use vsynx_core::types::TrustLevel;
use vsynx_session::Session;

use super::search::print_details;
use crate::cli::ValidateArgs;
use crate::output;

pub async fn run(args: ValidateArgs, session: &Session) -> Result<()> {
    let spinner = output::spinner(&format!("Validating {}...", args.id));
    let result = session.audit().validate_extension(&args.id).await;
    spinner.finish_and_clear();
    let validation = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else {
        print_details(&validation);
    }

    if validation.trust_level == TrustLevel::Malicious {
        std::process::exit(2);
    }
    Ok(())
}
