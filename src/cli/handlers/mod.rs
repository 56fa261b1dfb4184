mod apply;
pub use apply::cmd_apply;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::chapter_io::{self, ChapterError};
use crate::io::config_io;
use crate::io::directory_io;
use crate::model::chapter::ChapterRecord;
use crate::model::config::TimelineConfig;
use crate::ops::edit::{self, ChapterEdit, EditError};
use crate::ops::timeline;
use crate::parse::parse_date;

/// Chapter directory and its config, resolved once per invocation.
pub struct Context {
    pub dir: PathBuf,
    pub config: TimelineConfig,
    pub json: bool,
}

impl Context {
    pub fn load(dir: Option<&Path>, json: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => std::env::current_dir()?,
        };
        if !dir.is_dir() {
            return Err(format!("not a directory: {}", dir.display()).into());
        }
        let config = config_io::load_config(&dir)?;
        Ok(Context { dir, config, json })
    }

    /// Resolve a chapter file argument against the chapter directory.
    fn chapter_path(&self, file: &Path) -> PathBuf {
        self.dir.join(file)
    }

    fn scan(&self) -> Result<Vec<ChapterRecord>, directory_io::ScanError> {
        directory_io::scan_directory(&self.dir, &self.config)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(cli.dir.as_deref(), cli.json)?;

    match cli.command {
        None => crate::tui::run(ctx.dir, ctx.config),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ctx, args),
            Commands::Show(args) => cmd_show(&ctx, args),
            Commands::Timeline(args) => cmd_timeline(&ctx, args),
            Commands::Plots => cmd_plots(&ctx),
            Commands::Check => cmd_check(&ctx),

            // Write commands
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Apply(args) => cmd_apply(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_date_arg(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, EditError> {
    value
        .map(|v| {
            parse_date(v).ok_or_else(|| EditError::InvalidDate {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn print_records(ctx: &Context, records: &[ChapterRecord]) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        for record in records {
            println!("{}", format_record_line(record));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let from = parse_date_arg("from", args.from.as_deref())?;
    let to = parse_date_arg("to", args.to.as_deref())?;

    let mut records = timeline::filter_window(&ctx.scan()?, from, to);
    if let Some(ref plot) = args.plot {
        records.retain(|r| r.has_plot(plot));
    }
    print_records(ctx, &records)
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = ctx.chapter_path(&args.file);
    let record = chapter_io::read_chapter(&path, &ctx.config.timeline.default_plot)?
        .ok_or(ChapterError::NoDates(path))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", format_record_detail(&record));
    }
    Ok(())
}

fn cmd_timeline(ctx: &Context, args: TimelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let from = parse_date_arg("from", args.from.as_deref())?;
    let to = parse_date_arg("to", args.to.as_deref())?;
    let width = args
        .width
        .unwrap_or(ctx.config.timeline.width)
        .clamp(1, timeline::MAX_BAR_WIDTH);
    let split = args.split || ctx.config.timeline.split_threads;

    let records = timeline::filter_window(&ctx.scan()?, from, to);
    println!("{}", timeline::render_timeline(&records, width, split));
    Ok(())
}

fn cmd_plots(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let records = ctx.scan()?;
    let counts = timeline::thread_counts(&records);

    if ctx.json {
        let threads: Vec<ThreadJson> = counts
            .into_iter()
            .map(|(plot, chapters)| ThreadJson { plot, chapters })
            .collect();
        println!("{}", serde_json::to_string_pretty(&threads)?);
    } else {
        for (plot, n) in &counts {
            println!("{:>4}  {}", n, plot);
        }
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut undated = Vec::new();
    let mut missing_anchor = Vec::new();
    let mut unreadable = Vec::new();

    for path in directory_io::list_chapter_files(&ctx.dir, &ctx.config.scan.extension)? {
        let label = file_label(&path);
        match chapter_io::read_chapter(&path, &ctx.config.timeline.default_plot) {
            Ok(record) => {
                if record.is_none() {
                    undated.push(label.clone());
                }
                if !chapter_io::has_anchor(&path)? {
                    missing_anchor.push(label);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "check: unreadable chapter file");
                unreadable.push(label);
            }
        }
    }

    if ctx.json {
        let report = CheckJson {
            undated,
            missing_anchor,
            unreadable,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if undated.is_empty() && missing_anchor.is_empty() && unreadable.is_empty() {
        println!("all chapter files are dated and have an anchor line");
        return Ok(());
    }
    for f in &unreadable {
        println!("unreadable: {} (not UTF-8 text, or no read permission)", f);
    }
    for f in &undated {
        println!("undated: {} (not on the timeline)", f);
    }
    for f in &missing_anchor {
        println!("no anchor: {} (saving drops its front-matter)", f);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_edit(ctx: &Context, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = ctx.chapter_path(&args.file);
    let mut record = chapter_io::read_chapter(&path, &ctx.config.timeline.default_plot)?
        .ok_or_else(|| ChapterError::NoDates(path.clone()))?;

    let changes = ChapterEdit {
        name: args.name,
        plot: args.plot,
        start: args.start,
        end: args.end,
        pov: args.pov,
        characters: args.characters,
        synopsis: args.synopsis,
    };
    if changes.is_empty() {
        return Err("nothing to change (see `pl edit --help`)".into());
    }
    edit::apply_edit(&mut record, &changes, &ctx.config.timeline.default_plot)?;

    let outcome = chapter_io::write_chapter(&path, &record)?;
    if !outcome.anchor_found {
        eprintln!(
            "warning: {} has no %%~date: line; its front-matter was dropped",
            file_label(&path)
        );
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", format_record_detail(&record));
    }
    Ok(())
}
