//! CLI tool to tokenize, quote, and check Elixir source files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use elixir_syntax::{Lexer, Metadata, Options, QuoteOptions, analyze, categories, macros};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "elixir-syntax", version, about = "Elixir lexer, parser, and quoter")]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every token with its offsets, state, and text
    Tokens { files: Vec<PathBuf> },
    /// Print the quoted form of each file
    Quote {
        /// Record columns as well as lines in metadata
        #[arg(long, conflicts_with = "no_metadata")]
        columns: bool,
        /// Leave metadata lists empty
        #[arg(long)]
        no_metadata: bool,
        files: Vec<PathBuf>,
    },
    /// Report lexical and syntax errors
    Check { files: Vec<PathBuf> },
    /// Quote each file and render the result back to source
    ToString { files: Vec<PathBuf> },
    /// Print tokens with their color scheme keys
    Highlight { files: Vec<PathBuf> },
}

impl Command {
    fn files(&self) -> &[PathBuf] {
        match self {
            Self::Tokens { files }
            | Self::Quote { files, .. }
            | Self::Check { files }
            | Self::ToString { files }
            | Self::Highlight { files } => files,
        }
    }
}

const fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.command.files().is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;
    for path in cli.command.files() {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_error = true;
                continue;
            }
        };
        debug!(path = %path.display(), bytes = content.len(), "read source");
        had_error |= run(&cli.command, path, &content);
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Run `command` on one file; returns whether it found errors.
fn run(command: &Command, path: &Path, content: &str) -> bool {
    match command {
        Command::Tokens { .. } => {
            let mut lexer = Lexer::new(content);
            while let Some(token) = lexer.next() {
                println!(
                    "{}..{}\t{}\t{}\t{:?}",
                    token.span.start,
                    token.span.end,
                    token.kind,
                    lexer.state(),
                    token.text
                );
            }
            report(path, lexer.errors().iter())
        }
        Command::Highlight { .. } => {
            let lexer = Lexer::new(content);
            for token in lexer {
                let keys: Vec<&str> = categories(token.kind)
                    .iter()
                    .map(|category| category.key())
                    .collect();
                println!("{:?}\t{}", token.text, keys.join(","));
            }
            false
        }
        Command::Quote {
            columns,
            no_metadata,
            ..
        } => {
            let metadata = if *no_metadata {
                Metadata::None
            } else if *columns {
                Metadata::LineColumn
            } else {
                Metadata::Line
            };
            let options = Options {
                quote: QuoteOptions { metadata },
                cancellation: None,
            };
            analyze_file(path, content, &options, |analysis| {
                println!("{}", analysis.term);
            })
        }
        Command::ToString { .. } => {
            let options = Options {
                quote: QuoteOptions {
                    metadata: Metadata::None,
                },
                cancellation: None,
            };
            analyze_file(path, content, &options, |analysis| {
                println!("{}", macros::to_string(&analysis.term));
            })
        }
        Command::Check { .. } => analyze_file(path, content, &Options::default(), |analysis| {
            if analysis.errors.is_empty() {
                eprintln!(
                    "{}: valid ({} expression(s))",
                    path.display(),
                    analysis.document.expressions.len()
                );
            }
        }),
    }
}

fn analyze_file<F>(path: &Path, content: &str, options: &Options, print: F) -> bool
where
    F: FnOnce(&elixir_syntax::Analysis),
{
    match analyze(content, options) {
        Ok(analysis) => {
            print(&analysis);
            report(path, analysis.errors.iter())
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            true
        }
    }
}

fn report<E: std::fmt::Display>(path: &Path, errors: impl Iterator<Item = E>) -> bool {
    let mut any = false;
    for error in errors {
        eprintln!("{}: {error}", path.display());
        any = true;
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(directive_for_verbosity(0), "warn");
        assert_eq!(directive_for_verbosity(1), "debug");
        assert_eq!(directive_for_verbosity(4), "trace");
    }

    #[test]
    fn quote_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "elixir-syntax",
            "quote",
            "--columns",
            "--no-metadata",
            "a.ex",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["elixir-syntax", "check", "-vv", "a.ex", "b.ex"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command.files().len(), 2);
    }

    #[test]
    fn check_reports_errors() {
        let path = Path::new("broken.ex");
        assert!(run(&Command::Check { files: Vec::new() }, path, "foo(1 2)"));
        assert!(!run(&Command::Check { files: Vec::new() }, path, "foo(1, 2)"));
    }
}
