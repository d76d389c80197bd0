use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{replace, rewrite, search};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "luarewrite")]
#[command(version = VERSION)]
#[command(about = "Redirect bare helper calls across a Lua tree (dry-run by default)")]
struct Cli {
    /// Print a JSON envelope instead of the plain-text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite call sites using the ordered whole-word rule table
    Rewrite(rewrite::RewriteArgs),
    /// Legacy whole-file substring rename across .lua and .tml files
    Replace(replace::ReplaceArgs),
    /// List .lua and .tml files containing the given text
    Search(search::SearchArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { json: cli.json };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if global.json {
        if let Err(e) = output::print_json_result(json_result) {
            output::print_error_text(&e);
            return std::process::ExitCode::from(exit_code_to_u8(1));
        }
    } else if let Err(e) = json_result {
        output::print_error_text(&e);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
