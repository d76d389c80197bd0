use std::path::PathBuf;

pub type CmdResult<T> = luarewrite::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Emit the JSON envelope instead of the plain-text report.
    pub json: bool,
}

pub mod replace;
pub mod rewrite;
pub mod search;

/// Resolve the traversal root: `--path` when given, else the working directory.
pub(crate) fn resolve_root(path: Option<&str>) -> luarewrite::Result<PathBuf> {
    match path {
        Some(p) => Ok(PathBuf::from(p)),
        None => std::env::current_dir().map_err(|e| {
            luarewrite::Error::internal_io(e.to_string(), Some("get current dir".to_string()))
        }),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (luarewrite::Result<serde_json::Value>, i32) {
    crate::tty::status("luarewrite is working...");

    match command {
        crate::Commands::Rewrite(args) => dispatch!(args, global, rewrite),
        crate::Commands::Replace(args) => dispatch!(args, global, replace),
        crate::Commands::Search(args) => dispatch!(args, global, search),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        assert_eq!(resolve_root(Some("lua/app")).unwrap(), PathBuf::from("lua/app"));
    }

    #[test]
    fn default_root_is_current_dir() {
        assert_eq!(resolve_root(None).unwrap(), std::env::current_dir().unwrap());
    }
}
