use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pl", about = concat!("plotline v", env!("CARGO_PKG_VERSION"), " - chapter timelines from plain text"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Chapter directory (default: current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// More log output on stderr (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List dated chapters sorted by plot and date
    List(ListArgs),
    /// Show one chapter's metadata
    Show(ShowArgs),
    /// Edit a chapter's metadata and write it back
    Edit(EditArgs),
    /// Write back a JSON list of chapter records
    Apply(ApplyArgs),
    /// Draw the chapter timeline as text
    Timeline(TimelineArgs),
    /// List story threads with chapter counts
    Plots,
    /// Report chapter files without dates or without an anchor line
    Check,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only chapters belonging to this plot thread
    #[arg(long)]
    pub plot: Option<String>,
    /// Only chapters starting on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Only chapters ending on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Chapter file (relative to the chapter directory)
    pub file: PathBuf,
}

#[derive(Args)]
pub struct EditArgs {
    /// Chapter file (relative to the chapter directory)
    pub file: PathBuf,
    /// New chapter name (also renames the first heading)
    #[arg(long)]
    pub name: Option<String>,
    /// Plot thread(s), comma-separated
    #[arg(long)]
    pub plot: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Point of view
    #[arg(long)]
    pub pov: Option<String>,
    /// Characters
    #[arg(long = "char")]
    pub characters: Option<String>,
    /// Synopsis
    #[arg(long)]
    pub synopsis: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON file with a list of records, as printed by `pl list --json` (- for stdin)
    pub input: String,
}

#[derive(Args)]
pub struct TimelineArgs {
    /// Window start (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Window end (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Width of the bar area in cells
    #[arg(long)]
    pub width: Option<usize>,
    /// One lane per comma-separated thread
    #[arg(long)]
    pub split: bool,
}
