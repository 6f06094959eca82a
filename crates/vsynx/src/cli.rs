//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{ArgGroup, Args, Parser, Subcommand};

/// vsynx - keep editor extensions in sync and audited
#[derive(Parser, Debug)]
#[command(name = "vsynx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding config.yaml (default: ~/.vsynx)
    #[arg(long, global = true, env = "VSYNX_CONFIG_DIR")]
    pub config_dir: Option<Utf8PathBuf>,

    /// Backend snapshot file describing editors, CLIs and the marketplace
    #[arg(short, long, env = "VSYNX_SNAPSHOT")]
    pub snapshot: Utf8PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show known editors and CLI availability
    Editors(EditorsArgs),

    /// List the extensions installed in an editor
    List(ListArgs),

    /// Audit an editor's extensions against the public registries
    Audit(AuditArgs),

    /// Validate a single extension by id
    Validate(ValidateArgs),

    /// Search the marketplace
    Search(SearchArgs),

    /// Copy extensions from one editor to others
    Sync(SyncArgs),

    /// Install extensions via the VS Code CLI
    Install(InstallArgs),

    /// Install an extension via CLI, then sync it to other editors
    InstallSync(InstallSyncArgs),
}

#[derive(Args, Debug)]
pub struct EditorsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Editor id (default: the configured default source)
    #[arg(short, long)]
    pub editor: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Editor id (default: the configured default source)
    #[arg(short, long)]
    pub editor: Option<String>,

    /// Show every result, not only flagged ones
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword
    pub query: String,

    /// Validate one of the hits by id
    #[arg(long, value_name = "ID")]
    pub validate: Option<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Extension id (publisher.name)
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub action: Option<SyncAction>,

    #[command(flatten)]
    pub selection: SyncSelection,

    /// Overwrite conflicting extensions without asking
    #[arg(long, conflicts_with = "skip_conflicts")]
    pub overwrite: bool,

    /// Skip conflicting extensions without asking
    #[arg(long)]
    pub skip_conflicts: bool,
}

#[derive(Subcommand, Debug)]
pub enum SyncAction {
    /// Show per target what a sync would install and overwrite
    Preview(SyncPreviewArgs),

    /// List the selected extensions that already exist in the targets
    Conflicts(SyncPreviewArgs),
}

#[derive(Args, Debug)]
pub struct SyncPreviewArgs {
    #[command(flatten)]
    pub selection: SyncSelection,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Source, targets and extensions of a sync
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("selection").required(true).args(["ext", "all", "missing"])))]
pub struct SyncSelection {
    /// Source editor (default: the configured default source)
    #[arg(long)]
    pub from: Option<String>,

    /// Target editors
    #[arg(long, required = true, value_delimiter = ',')]
    pub to: Vec<String>,

    /// Extension ids to sync
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Sync every extension of the source
    #[arg(long)]
    pub all: bool,

    /// Sync extensions missing from every target
    #[arg(long)]
    pub missing: bool,

    /// Only consider extensions whose id or name contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Marketplace extension ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// CLI to install with: code, code-insiders or codium
    #[arg(long)]
    pub via: Option<String>,
}

#[derive(Args, Debug)]
pub struct InstallSyncArgs {
    /// Marketplace extension id
    pub id: String,

    /// Target editors
    #[arg(long, required = true, value_delimiter = ',')]
    pub to: Vec<String>,

    /// CLI to install with: code, code-insiders or codium
    #[arg(long)]
    pub via: Option<String>,
}
