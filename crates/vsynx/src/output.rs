//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use vsynx_core::types::TrustLevel;
use vsynx_session::{Notice, NoticeKind};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print the session's current notice, if any
pub fn notice(notice: Option<Notice>) {
    match notice {
        Some(n) if n.kind == NoticeKind::Error => error(&n.message),
        Some(n) => success(&n.message),
        None => {}
    }
}

/// Trust level colored for terminals
pub fn trust(level: TrustLevel) -> String {
    let label = level.to_string();
    match level {
        TrustLevel::Legitimate => style(label).green().to_string(),
        TrustLevel::Suspicious => style(label).yellow().to_string(),
        TrustLevel::Malicious => style(label).red().bold().to_string(),
        TrustLevel::Unknown => style(label).dim().to_string(),
    }
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
