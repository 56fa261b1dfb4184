use std::fs;
use std::io::Read;

use crate::cli::commands::ApplyArgs;
use crate::cli::output::SaveResultJson;
use crate::io::directory_io;
use crate::model::chapter::ChapterRecord;

use super::Context;

/// Write back an edited record list (`pl list --json`, modified) to the
/// chapter files. Records with an inverted date range are rejected before
/// any write; every other record is attempted even if some fail.
pub fn cmd_apply(ctx: &Context, args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| format!("could not read {}: {}", args.input, e))?
    };
    let records: Vec<ChapterRecord> = serde_json::from_str(&text)?;

    let mut results: Vec<SaveResultJson> = Vec::new();
    let mut valid = Vec::with_capacity(records.len());
    for record in records {
        match record.validate() {
            Ok(()) => valid.push(record),
            Err(e) => results.push(SaveResultJson {
                path: record.source_path.display().to_string(),
                ok: false,
                anchor_found: None,
                error: Some(e.to_string()),
            }),
        }
    }

    let report = directory_io::save_records(&ctx.dir, &ctx.config, &valid)?;
    for (path, result) in &report.results {
        results.push(match result {
            Ok(outcome) => SaveResultJson {
                path: path.display().to_string(),
                ok: true,
                anchor_found: Some(outcome.anchor_found),
                error: None,
            },
            Err(e) => SaveResultJson {
                path: path.display().to_string(),
                ok: false,
                anchor_found: None,
                error: Some(e.to_string()),
            },
        });
    }

    let failed = results.iter().filter(|r| !r.ok).count();
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for r in &results {
            match (&r.error, r.anchor_found) {
                (Some(e), _) => println!("error: {}", e),
                (None, Some(false)) => {
                    println!("saved (no anchor, front-matter dropped): {}", r.path)
                }
                (None, _) => println!("saved: {}", r.path),
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} records not saved", failed, results.len()).into());
    }
    Ok(())
}
