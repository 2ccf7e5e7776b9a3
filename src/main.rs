mod checker;
mod commands;
mod config;
mod diagnostics;
mod error;
mod reconciler;
mod scanner;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::Invocation;

#[derive(Parser)]
#[command(
    name = "fnref",
    version,
    about = "Check that every markdown footnote reference has a matching definition"
)]
struct Cli {
    /// Print one JSON report per document on stdout
    #[arg(long)]
    json: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Markdown file, or directory of markdown files
    path: PathBuf,
    /// Check markdown files in subdirectories too
    #[arg(short, long)]
    recursive: bool,
    /// Print the ids found by each extraction step
    #[arg(short, long)]
    verbose: bool,
    /// Re-run the check whenever the path changes
    #[arg(short, long)]
    watch: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Err(e) => {
            // Help and version go to stdout and are not failures.
            if e.print().is_err() || e.use_stderr() {
                return ExitCode::FAILURE;
            }
            return ExitCode::SUCCESS;
        },
        Ok(cli) => cli,
    };

    return commands::run(Invocation {
        color: !cli.no_color,
        json: cli.json,
        path: cli.path,
        recursive: cli.recursive,
        verbose: cli.verbose,
        watch: cli.watch,
    });
}
