use clap::Args;
use serde::Serialize;

use luarewrite::defaults::{LEGACY_EXTENSIONS, LEGACY_SEARCH_TERMS};
use luarewrite::legacy::{self, SearchMatch};
use luarewrite::report;

use super::{resolve_root, CmdResult, GlobalArgs};
use crate::output;

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for (defaults to the built-in legacy terms)
    terms: Vec<String>,
    /// Directory to scan (defaults to current directory)
    #[arg(long)]
    path: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum SearchOutput {
    #[serde(rename = "search")]
    Search {
        root: String,
        matches: Vec<SearchMatch>,
    },
}

pub fn run(args: SearchArgs, global: &GlobalArgs) -> CmdResult<SearchOutput> {
    let root = resolve_root(args.path.as_deref())?;
    let terms: Vec<String> = if args.terms.is_empty() {
        LEGACY_SEARCH_TERMS.iter().map(|t| t.to_string()).collect()
    } else {
        args.terms
    };

    let matches = legacy::search(&root, terms.as_slice(), LEGACY_EXTENSIONS)?;

    if !global.json {
        for m in &matches {
            output::print_raw(&report::render_paths(&m.files))?;
        }
    }

    Ok((
        SearchOutput::Search {
            root: root.display().to_string(),
            matches,
        },
        0,
    ))
}
