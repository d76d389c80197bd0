use clap::Args;
use serde::Serialize;
use std::path::Path;

use luarewrite::defaults::RewriteConfig;
use luarewrite::report;
use luarewrite::{Error, FileHits, Rewriter, RunMode};

use super::{resolve_root, CmdResult, GlobalArgs};
use crate::output;

#[derive(Args)]
pub struct RewriteArgs {
    /// Directory to rewrite (defaults to current directory)
    #[arg(long)]
    path: Option<String>,
    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,
    /// JSON file overriding the built-in rules, markers, and file filters
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RewriteOutput {
    #[serde(rename = "rewrite")]
    Rewrite {
        root: String,
        dry_run: bool,
        rules: usize,
        total_hits: usize,
        total_files: usize,
        applied: bool,
        files: Vec<FileHits>,
    },
}

pub fn run(args: RewriteArgs, global: &GlobalArgs) -> CmdResult<RewriteOutput> {
    let root = resolve_root(args.path.as_deref())?;
    let config = match args.config.as_deref() {
        Some(path) => RewriteConfig::load(Path::new(path))?,
        None => RewriteConfig::default(),
    };

    let rewriter = Rewriter::from_config(&config)?;
    let mode = RunMode::from_write_flag(args.write);

    // Text mode prints each file before it is written. JSON mode keeps them
    // so a failed run can still list what it reported.
    let mut reported: Vec<FileHits> = Vec::new();
    let outcome = rewriter.run_with(&root, mode, |file| {
        if global.json {
            reported.push(file.clone());
            Ok(())
        } else {
            output::print_raw(&report::render_file_hits(file))
        }
    });
    let result = outcome.map_err(|e| with_reported_files(e, &reported))?;

    Ok((
        RewriteOutput::Rewrite {
            root: root.display().to_string(),
            dry_run: !mode.is_apply(),
            rules: rewriter.rules().len(),
            total_hits: result.total_hits(),
            total_files: result.total_files(),
            applied: result.applied,
            files: result.files,
        },
        0,
    ))
}

fn with_reported_files(err: Error, reported: &[FileHits]) -> Error {
    if reported.is_empty() {
        err
    } else {
        err.with_detail("reportedFiles", reported)
    }
}
