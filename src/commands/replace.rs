use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use luarewrite::defaults::{LEGACY_EXTENSIONS, LEGACY_RULES};
use luarewrite::legacy::{self, LegacyRule, ReplaceOutcome};
use luarewrite::report;
use luarewrite::RunMode;

use super::{resolve_root, CmdResult, GlobalArgs};
use crate::output;

#[derive(Args)]
pub struct ReplaceArgs {
    /// Directory to scan (defaults to current directory)
    #[arg(long)]
    path: Option<String>,
    /// Text to replace (defaults to the built-in legacy rename)
    #[arg(long, requires = "to")]
    from: Option<String>,
    /// Replacement text
    #[arg(long, requires = "from")]
    to: Option<String>,
    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ReplaceOutput {
    #[serde(rename = "replace")]
    Replace {
        root: String,
        dry_run: bool,
        total_files: usize,
        rules: Vec<ReplaceOutcome>,
    },
}

fn rules_from_args(from: Option<String>, to: Option<String>) -> luarewrite::Result<Vec<LegacyRule>> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(vec![LegacyRule::new(from, to)?]),
        _ => LEGACY_RULES
            .iter()
            .map(|(from, to)| LegacyRule::new(*from, *to))
            .collect(),
    }
}

pub fn run(args: ReplaceArgs, global: &GlobalArgs) -> CmdResult<ReplaceOutput> {
    let root = resolve_root(args.path.as_deref())?;
    let rules = rules_from_args(args.from, args.to)?;
    let mode = RunMode::from_write_flag(args.write);

    let mut reported: Vec<PathBuf> = Vec::new();
    let outcome = legacy::replace(&root, &rules, LEGACY_EXTENSIONS, mode, |path| {
        if global.json {
            reported.push(path.to_path_buf());
            Ok(())
        } else {
            output::print_raw(&report::render_paths(&[PathBuf::from(path)]))
        }
    });
    let outcomes = outcome.map_err(|e| {
        if reported.is_empty() {
            e
        } else {
            e.with_detail("reportedFiles", &reported)
        }
    })?;

    let total_files = outcomes.iter().map(|o| o.files.len()).sum();

    Ok((
        ReplaceOutput::Replace {
            root: root.display().to_string(),
            dry_run: !mode.is_apply(),
            total_files,
            rules: outcomes,
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn json_run_error_lists_files_reported_so_far() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.lua"), "require 'resty.model'\n").unwrap();
        fs::write(dir.path().join("b.tml"), [0xffu8, b'\n']).unwrap();

        let args = ReplaceArgs {
            path: Some(dir.path().display().to_string()),
            from: None,
            to: None,
            write: true,
        };
        let err = match run(args, &GlobalArgs { json: true }) {
            Ok(_) => panic!("expected the invalid file to abort the run"),
            Err(err) => err,
        };

        assert_eq!(err.code.as_str(), "internal.encoding_error");
        let files = err.details["reportedFiles"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].as_str().unwrap().ends_with("a.lua"));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.lua")).unwrap(),
            "require 'resty.mvc'\n"
        );
    }

    #[test]
    fn defaults_to_builtin_legacy_rule() {
        let rules = rules_from_args(None, None).unwrap();
        assert_eq!(rules, vec![LegacyRule::new("resty.model", "resty.mvc").unwrap()]);
    }

    #[test]
    fn explicit_pair_overrides_defaults() {
        let rules = rules_from_args(Some("a.b".into()), Some("c.d".into())).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].from, "a.b");
    }
}
